//! Command paths of literal and placeholder segments.
//!
//! A path string like `teleport <target> here` splits on whitespace into
//! segments; `<name>` segments are placeholders resolved against declared
//! parameters at ingestion.

use std::fmt;

use herald_foundation::{Error, Result};

/// One segment of a command path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// A fixed token, matched case-insensitively.
    Literal(String),
    /// A `<name>` placeholder bound to a declared parameter.
    Placeholder(String),
}

impl Segment {
    /// The literal spelling, if this is a literal segment.
    #[must_use]
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            Self::Literal(s) => Some(s),
            Self::Placeholder(_) => None,
        }
    }

    /// The placeholder name, if this is a placeholder segment.
    #[must_use]
    pub fn as_placeholder(&self) -> Option<&str> {
        match self {
            Self::Placeholder(s) => Some(s),
            Self::Literal(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(s) => f.write_str(s),
            Self::Placeholder(s) => write!(f, "<{s}>"),
        }
    }
}

/// An ordered sequence of path segments.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct CommandPath {
    segments: Vec<Segment>,
}

impl CommandPath {
    /// Parses a path string, splitting on whitespace.
    ///
    /// # Errors
    ///
    /// Fails with `MalformedPath` on empty placeholders (`<>`) or tokens
    /// mixing literal text with angle brackets.
    pub fn parse(path: &str) -> Result<Self> {
        let mut segments = Vec::new();
        for token in path.split_whitespace() {
            segments.push(Self::parse_segment(path, token)?);
        }
        Ok(Self { segments })
    }

    fn parse_segment(path: &str, token: &str) -> Result<Segment> {
        if let Some(inner) = token.strip_prefix('<') {
            let Some(name) = inner.strip_suffix('>') else {
                return Err(Error::malformed_path(path, format!("unclosed placeholder {token}")));
            };
            if name.is_empty() {
                return Err(Error::malformed_path(path, "empty placeholder <>"));
            }
            if name.contains(['<', '>']) {
                return Err(Error::malformed_path(path, format!("nested placeholder {token}")));
            }
            return Ok(Segment::Placeholder(name.to_string()));
        }
        if token.contains(['<', '>']) {
            return Err(Error::malformed_path(
                path,
                format!("literal {token} contains angle brackets"),
            ));
        }
        Ok(Segment::Literal(token.to_string()))
    }

    /// Creates a path from already-parsed segments.
    #[must_use]
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Concatenates two paths (enclosing path then subpath).
    #[must_use]
    pub fn join(&self, tail: &Self) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(tail.segments.iter().cloned());
        Self { segments }
    }

    /// The segments in order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// True if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Placeholder names in path order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(Segment::as_placeholder)
    }

    /// True if `self` is a strict prefix of `other`.
    ///
    /// Literals compare case-insensitively; placeholders compare by name.
    #[must_use]
    pub fn is_strict_prefix_of(&self, other: &Self) -> bool {
        self.len() < other.len() && self.matches_prefix(other)
    }

    /// True if `self` shares every leading segment with `other` up to
    /// `self`'s length.
    #[must_use]
    pub fn matches_prefix(&self, other: &Self) -> bool {
        self.len() <= other.len()
            && self
                .segments
                .iter()
                .zip(&other.segments)
                .all(|(a, b)| segments_equal(a, b))
    }

    /// The path without its last segment, if any.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }
        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }
}

fn segments_equal(a: &Segment, b: &Segment) -> bool {
    match (a, b) {
        (Segment::Literal(x), Segment::Literal(y)) => x.eq_ignore_ascii_case(y),
        (Segment::Placeholder(x), Segment::Placeholder(y)) => x == y,
        _ => false,
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
