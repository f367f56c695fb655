//! Error types for the Herald system.
//!
//! Uses `thiserror` for ergonomic error definition. Every failure carries
//! structured fields sufficient to render a message without string parsing,
//! so embedders can translate or re-render errors freely.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// The main error type for Herald operations.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// The parameter being parsed when the error occurred, if any.
    pub parameter: Option<String>,
    /// The input cursor position reached when the error occurred, if known.
    pub position: Option<usize>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            parameter: None,
            position: None,
        }
    }

    /// Attaches the name of the parameter being parsed.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>) -> Self {
        self.parameter = Some(name.into());
        self
    }

    /// Attaches the input position reached when the error occurred.
    #[must_use]
    pub fn with_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Creates an expected-input error (read past end of input).
    #[must_use]
    pub fn expected_input() -> Self {
        Self::new(ErrorKind::ExpectedInput)
    }

    /// Creates an unknown-command error.
    #[must_use]
    pub fn unknown_command(input: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownCommand {
            input: input.into(),
        })
    }

    /// Creates a missing-argument error.
    #[must_use]
    pub fn missing_argument(parameter: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingArgument {
            parameter: parameter.into(),
            type_name: type_name.into(),
        })
    }

    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid_value(
        parameter: impl Into<String>,
        token: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::InvalidValue {
            parameter: parameter.into(),
            token: token.into(),
            reason: reason.into(),
        })
    }

    /// Creates an invalid-value error from inside a parser, which does
    /// not know its parameter's name; the dispatcher fills it in.
    #[must_use]
    pub fn rejected_token(token: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::invalid_value("", token, reason)
    }

    /// Creates an invalid-number error.
    #[must_use]
    pub fn invalid_number(token: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidNumber {
            token: token.into(),
        })
    }

    /// Creates a number-out-of-range error.
    #[must_use]
    pub fn number_out_of_range(token: impl Into<String>) -> Self {
        Self::new(ErrorKind::NumberOutOfRange {
            token: token.into(),
        })
    }

    /// Creates an invalid-enum error.
    #[must_use]
    pub fn invalid_enum(token: impl Into<String>, allowed: Vec<String>) -> Self {
        Self::new(ErrorKind::InvalidEnum {
            token: token.into(),
            allowed,
        })
    }

    /// Creates a no-permission error.
    #[must_use]
    pub fn no_permission(required: impl Into<String>) -> Self {
        Self::new(ErrorKind::NoPermission {
            required: required.into(),
        })
    }

    /// Creates an on-cooldown error.
    #[must_use]
    pub fn on_cooldown(remaining: Duration) -> Self {
        Self::new(ErrorKind::OnCooldown { remaining })
    }

    /// Creates an extra-arguments error.
    #[must_use]
    pub fn extra_arguments(surplus: impl Into<String>) -> Self {
        Self::new(ErrorKind::ExtraArguments {
            surplus: surplus.into(),
        })
    }

    /// Creates a duplicate-command registration error.
    #[must_use]
    pub fn duplicate_command(path: impl Into<String>) -> Self {
        Self::new(ErrorKind::DuplicateCommand { path: path.into() })
    }

    /// Creates a malformed-path registration error.
    #[must_use]
    pub fn malformed_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedPath {
            path: path.into(),
            reason: reason.into(),
        })
    }

    /// Creates an unresolved-placeholder registration error.
    #[must_use]
    pub fn unresolved_placeholder(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnresolvedPlaceholder {
            path: path.into(),
            name: name.into(),
        })
    }

    /// Creates a generic handler-raised command error.
    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::CommandError {
            message: message.into(),
        })
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Clone, Error)]
pub enum ErrorKind {
    /// A read was attempted past the end of input.
    #[error("expected more input")]
    ExpectedInput,

    /// A quoted string was not closed before the end of input.
    #[error("unterminated quoted string starting at position {position}")]
    UnterminatedQuote {
        /// Position of the opening quote.
        position: usize,
    },

    /// No command matched the leading token of the input.
    #[error("unknown command: {input}")]
    UnknownCommand {
        /// The unmatched input prefix.
        input: String,
    },

    /// The stream was empty where a non-optional parameter expected input.
    #[error("missing argument <{parameter}> of type {type_name}")]
    MissingArgument {
        /// The parameter name.
        parameter: String,
        /// The parameter's declared type.
        type_name: String,
    },

    /// A parser rejected the token.
    #[error("invalid value for <{parameter}>: {token} ({reason})")]
    InvalidValue {
        /// The parameter name.
        parameter: String,
        /// The rejected raw token.
        token: String,
        /// Why the token was rejected.
        reason: String,
    },

    /// A token could not be parsed as a number.
    #[error("invalid number: {token}")]
    InvalidNumber {
        /// The rejected raw token.
        token: String,
    },

    /// A numeric token overflowed the target type.
    #[error("number out of range: {token}")]
    NumberOutOfRange {
        /// The rejected raw token.
        token: String,
    },

    /// A token was not a valid boolean literal.
    #[error("expected true or false, got {token}")]
    InvalidBoolean {
        /// The rejected raw token.
        token: String,
    },

    /// A token did not match any variant of an enum parameter.
    #[error("invalid choice: {token} (allowed: {})", allowed.join(", "))]
    InvalidEnum {
        /// The rejected raw token.
        token: String,
        /// The allowed variant names.
        allowed: Vec<String>,
    },

    /// The actor lacks the required permission.
    #[error("missing permission: {required}")]
    NoPermission {
        /// Description of the required permission.
        required: String,
    },

    /// The actor is still cooling down from a previous execution.
    #[error("on cooldown for another {}.{:03}s", remaining.as_secs(), remaining.subsec_millis())]
    OnCooldown {
        /// Time left until the command may run again.
        remaining: Duration,
    },

    /// Input remained past the matched command leaf.
    #[error("unexpected trailing input: {surplus}")]
    ExtraArguments {
        /// The surplus tokens.
        surplus: String,
    },

    /// Registration would install a second command on an identical path
    /// with an identical parameter type sequence.
    #[error("duplicate command: {path}")]
    DuplicateCommand {
        /// The conflicting full path.
        path: String,
    },

    /// A declared command path could not be parsed into segments.
    #[error("malformed path \"{path}\": {reason}")]
    MalformedPath {
        /// The offending path string.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// A `<name>` placeholder in a path matched no declared parameter.
    #[error("path \"{path}\" references undeclared parameter <{name}>")]
    UnresolvedPlaceholder {
        /// The offending path string.
        path: String,
        /// The placeholder name with no matching parameter.
        name: String,
    },

    /// No registered factory produced a parser for a parameter.
    #[error("no parser registered for <{parameter}> of type {type_name}")]
    UnresolvedParameterType {
        /// The parameter name.
        parameter: String,
        /// The parameter's declared type.
        type_name: String,
    },

    /// Generic handler-raised error with an arbitrary message.
    #[error("{message}")]
    CommandError {
        /// The message supplied by the handler.
        message: String,
    },

    /// The no-argument cooldown operation was invoked on an unbound handle.
    #[error("cooldown() requires a bound duration")]
    UnboundCooldown,

    /// An annotation replacer reintroduced the kind it replaces, or the
    /// replacement fix-point did not converge within the iteration cap.
    #[error("annotation replacer cycle on kind {kind}")]
    ReplacerCycle {
        /// Name of the annotation kind that cycled.
        kind: String,
    },

    /// A hook triggered re-entrant dispatch past the configured depth.
    #[error("hook-triggered dispatch exceeded depth limit {limit}")]
    HookDepthExceeded {
        /// The configured depth limit.
        limit: usize,
    },

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ErrorKind {
    /// Ranking weight used when reporting the best of several branch
    /// failures. Higher weights win ties at equal input depth.
    #[must_use]
    pub fn weight(&self) -> u8 {
        match self {
            Self::NoPermission { .. } | Self::OnCooldown { .. } => 4,
            Self::InvalidValue { .. }
            | Self::InvalidNumber { .. }
            | Self::NumberOutOfRange { .. }
            | Self::InvalidBoolean { .. }
            | Self::InvalidEnum { .. }
            | Self::ExtraArguments { .. }
            | Self::CommandError { .. } => 3,
            Self::MissingArgument { .. } | Self::ExpectedInput | Self::UnterminatedQuote { .. } => {
                2
            }
            Self::UnknownCommand { .. } => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for ErrorKindName<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self.0 {
            ErrorKind::ExpectedInput => "expected-input",
            ErrorKind::UnterminatedQuote { .. } => "unterminated-quote",
            ErrorKind::UnknownCommand { .. } => "unknown-command",
            ErrorKind::MissingArgument { .. } => "missing-argument",
            ErrorKind::InvalidValue { .. } => "invalid-value",
            ErrorKind::InvalidNumber { .. } => "invalid-number",
            ErrorKind::NumberOutOfRange { .. } => "number-out-of-range",
            ErrorKind::InvalidBoolean { .. } => "invalid-boolean",
            ErrorKind::InvalidEnum { .. } => "invalid-enum",
            ErrorKind::NoPermission { .. } => "no-permission",
            ErrorKind::OnCooldown { .. } => "on-cooldown",
            ErrorKind::ExtraArguments { .. } => "extra-arguments",
            ErrorKind::DuplicateCommand { .. } => "duplicate-command",
            ErrorKind::MalformedPath { .. } => "malformed-path",
            ErrorKind::UnresolvedPlaceholder { .. } => "unresolved-placeholder",
            ErrorKind::UnresolvedParameterType { .. } => "unresolved-parameter-type",
            ErrorKind::CommandError { .. } => "command-error",
            ErrorKind::UnboundCooldown => "unbound-cooldown",
            ErrorKind::ReplacerCycle { .. } => "replacer-cycle",
            ErrorKind::HookDepthExceeded { .. } => "hook-depth-exceeded",
            ErrorKind::Internal(_) => "internal",
        };
        f.write_str(name)
    }
}

/// Displays the stable kebab-case name of an [`ErrorKind`], used by
/// exception-handler matching and logging.
pub struct ErrorKindName<'a>(pub &'a ErrorKind);

impl ErrorKind {
    /// Returns the stable kebab-case name of this kind.
    #[must_use]
    pub fn name(&self) -> ErrorKindName<'_> {
        ErrorKindName(self)
    }
}
