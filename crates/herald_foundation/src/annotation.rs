//! Typed metadata attached to commands and parameters.
//!
//! An [`AnnotationList`] is an ordered, immutable collection keyed by the
//! annotation's Rust type: a given kind appears at most once per element.
//! Declarations carry annotation lists through ingestion, where
//! [`AnnotationReplacers`] may rewrite them before the lists are frozen
//! into the command tree.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, ErrorKind};
use crate::Result;

/// One annotation instance: its kind and its erased value.
#[derive(Clone)]
pub struct AnnotationEntry {
    kind: TypeId,
    kind_name: &'static str,
    value: Arc<dyn Any + Send + Sync>,
}

impl AnnotationEntry {
    /// Wraps a typed annotation value.
    #[must_use]
    pub fn of<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            kind: TypeId::of::<T>(),
            kind_name: std::any::type_name::<T>(),
            value: Arc::new(value),
        }
    }

    /// The kind identifier of this annotation.
    #[must_use]
    pub fn kind(&self) -> TypeId {
        self.kind
    }

    /// The Rust type name of this annotation's kind, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        self.kind_name
    }

    /// Downcasts this entry to a concrete annotation type.
    #[must_use]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for AnnotationEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", short_kind_name(self.kind_name))
    }
}

fn short_kind_name(name: &str) -> &str {
    name.rsplit("::").next().unwrap_or(name)
}

/// Ordered, de-duplicated collection of typed annotations.
#[derive(Clone, Default)]
pub struct AnnotationList {
    entries: Vec<AnnotationEntry>,
}

impl AnnotationList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the list holds no annotations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of annotations in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Typed lookup of an annotation by kind.
    #[must_use]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.entries
            .iter()
            .find(|e| e.kind == TypeId::of::<T>())
            .and_then(AnnotationEntry::downcast_ref)
    }

    /// Returns true if an annotation of the given kind is present.
    #[must_use]
    pub fn has<T: Any>(&self) -> bool {
        self.entries.iter().any(|e| e.kind == TypeId::of::<T>())
    }

    /// Copy-with-addition: returns a list containing the given annotation.
    ///
    /// If the kind is already present, the existing entry is replaced in
    /// place, preserving its position in the order.
    #[must_use]
    pub fn with<T: Any + Send + Sync>(&self, value: T) -> Self {
        let mut copy = self.clone();
        copy.insert(AnnotationEntry::of(value));
        copy
    }

    /// Inserts an entry, replacing any existing entry of the same kind.
    pub fn insert(&mut self, entry: AnnotationEntry) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.kind == entry.kind) {
            *existing = entry;
        } else {
            self.entries.push(entry);
        }
    }

    /// Iterates the annotations in order.
    pub fn iter(&self) -> impl Iterator<Item = &AnnotationEntry> {
        self.entries.iter()
    }
}

impl fmt::Debug for AnnotationList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}

impl FromIterator<AnnotationEntry> for AnnotationList {
    fn from_iter<I: IntoIterator<Item = AnnotationEntry>>(iter: I) -> Self {
        let mut list = Self::new();
        for entry in iter {
            list.insert(entry);
        }
        list
    }
}

/// The element an annotation replacer is being applied to.
#[derive(Clone, Copy, Debug)]
pub enum ReplaceTarget<'a> {
    /// A command declaration, identified by its first declared path.
    Command {
        /// The declaration's primary path string.
        path: &'a str,
    },
    /// A declared parameter.
    Parameter {
        /// The parameter name.
        name: &'a str,
    },
}

type ReplacerFn =
    Arc<dyn Fn(&ReplaceTarget<'_>, &AnnotationEntry) -> Vec<AnnotationEntry> + Send + Sync>;

/// Registered annotation rewriters, applied at ingestion.
///
/// A replacer maps one annotation kind to zero or more substitute
/// annotations. Replacement runs to a fix-point with a bounded iteration
/// cap; a substitution reintroducing the replaced kind is rejected as a
/// cycle.
#[derive(Clone, Default)]
pub struct AnnotationReplacers {
    replacers: HashMap<TypeId, ReplacerFn>,
}

impl AnnotationReplacers {
    /// Iteration cap for the replacement fix-point.
    pub const MAX_PASSES: usize = 16;

    /// Creates an empty replacer set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no replacers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.replacers.is_empty()
    }

    /// Registers a replacer for annotation kind `T`.
    ///
    /// The function receives the target element and the annotation
    /// instance, and yields the annotations that substitute it.
    pub fn register<T, F>(&mut self, replacer: F)
    where
        T: Any + Send + Sync,
        F: Fn(&ReplaceTarget<'_>, &T) -> Vec<AnnotationEntry> + Send + Sync + 'static,
    {
        self.replacers.insert(
            TypeId::of::<T>(),
            Arc::new(move |target, entry| {
                entry
                    .downcast_ref::<T>()
                    .map(|value| replacer(target, value))
                    .unwrap_or_default()
            }),
        );
    }

    /// Applies all registered replacers to a list, to a fix-point.
    ///
    /// # Errors
    ///
    /// Fails with `ReplacerCycle` if a replacement reintroduces its own
    /// kind or the fix-point does not converge within [`Self::MAX_PASSES`].
    pub fn apply(&self, target: &ReplaceTarget<'_>, list: &AnnotationList) -> Result<AnnotationList> {
        if self.replacers.is_empty() {
            return Ok(list.clone());
        }

        let mut current = list.clone();
        for _ in 0..Self::MAX_PASSES {
            let Some(index) = current
                .entries
                .iter()
                .position(|e| self.replacers.contains_key(&e.kind))
            else {
                return Ok(current);
            };

            let entry = current.entries.remove(index);
            let replacer = &self.replacers[&entry.kind];
            let substitutes = replacer(target, &entry);

            if substitutes.iter().any(|s| s.kind == entry.kind) {
                return Err(Error::new(ErrorKind::ReplacerCycle {
                    kind: short_kind_name(entry.kind_name).to_string(),
                }));
            }
            let mut inserted = 0;
            for substitute in substitutes {
                // Keep the one-entry-per-kind invariant while splicing.
                if let Some(existing) = current
                    .entries
                    .iter_mut()
                    .find(|e| e.kind == substitute.kind)
                {
                    *existing = substitute;
                } else {
                    current.entries.insert(index + inserted, substitute);
                    inserted += 1;
                }
            }
        }

        let unconverged = current
            .entries
            .iter()
            .find(|e| self.replacers.contains_key(&e.kind))
            .map_or("unknown", |e| short_kind_name(e.kind_name));
        Err(Error::new(ErrorKind::ReplacerCycle {
            kind: unconverged.to_string(),
        }))
    }
}

impl fmt::Debug for AnnotationReplacers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AnnotationReplacers({})", self.replacers.len())
    }
}
