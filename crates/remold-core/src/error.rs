//! Error types for hooks and decoding.
//!
//! Two lineages: [`HookError`] is what a single hook reports about a single
//! value, [`DecodeError`] is what the decoder reports about a field or a
//! whole pass. Catalog hooks build their errors from the expected shape and
//! a sanitized reason so rejected input never reaches a message.

use std::fmt;

use thiserror::Error;

use crate::shape::Shape;

/// Failure reported by a hook.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HookError {
    /// Text could not be parsed into the expected shape.
    #[error("cannot parse value as '{expected}': {reason}")]
    Parse {
        /// Display form of the expected shape.
        expected: String,
        /// Sanitized failure description.
        reason: String,
    },

    /// The source category cannot become the expected one.
    #[error("expected type '{expected}', got unconvertible type '{found}'")]
    Unconvertible {
        /// Display form of the expected shape.
        expected: String,
        /// Display form of the source shape.
        found: String,
    },

    /// Every alternative of an OR composition failed.
    #[error("{}", join_lines(.messages))]
    Alternatives {
        /// Messages in declaration order.
        messages: Vec<String>,
    },

    /// Recursion went deeper than the configured maximum.
    #[error("maximum decode depth of {max} exceeded")]
    DepthExceeded {
        /// Configured maximum.
        max: usize,
    },

    /// Error from a nested decode started by the hook.
    #[error(transparent)]
    Decode(Box<DecodeError>),

    /// Free-form message from a user hook.
    #[error("{0}")]
    Message(String),
}

impl HookError {
    /// Parse failure against `expected`.
    pub fn parse(expected: &Shape, reason: impl fmt::Display) -> Self {
        Self::Parse {
            expected: expected.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Category mismatch between `found` and `expected`.
    #[must_use]
    pub fn unconvertible(expected: &Shape, found: &Shape) -> Self {
        Self::Unconvertible {
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }

    /// Free-form message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self::Message(message.to_owned())
    }
}

impl From<DecodeError> for HookError {
    fn from(err: DecodeError) -> Self {
        Self::Decode(Box::new(err))
    }
}

fn join_lines(messages: &[String]) -> String {
    if messages.is_empty() {
        return "no decode hook alternatives configured".to_owned();
    }
    messages.iter().fold(String::new(), |mut out, message| {
        out.push_str(message);
        out.push('\n');
        out
    })
}

/// Failure reported by the decoder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    /// A hook or assignment failed for one field.
    #[error("'{name}' {source}")]
    Field {
        /// Field path, empty at the root.
        name: String,
        /// Underlying failure.
        #[source]
        source: HookError,
    },

    /// Source map carried keys the destination record does not declare.
    #[error("'{name}' has invalid keys: {}", .keys.join(", "))]
    UnusedKeys {
        /// Record path.
        name: String,
        /// Unused keys in sorted order.
        keys: Vec<String>,
    },

    /// Several independent failures.
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

impl DecodeError {
    /// Wrap a hook error with its field path.
    pub fn field(name: impl Into<String>, source: HookError) -> Self {
        Self::Field {
            name: name.into(),
            source,
        }
    }
}

/// Collection of independent decode failures.
///
/// Messages keep insertion order; [`Display`](fmt::Display) sorts them so
/// reports are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateError {
    errors: Vec<String>,
}

impl AggregateError {
    /// Create an empty aggregate.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message.
    pub fn push(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    /// Record an error, splicing nested aggregates instead of nesting them.
    pub fn append(&mut self, err: DecodeError) {
        match err {
            DecodeError::Aggregate(inner) => self.errors.extend(inner.errors),
            other => self.errors.push(other.to_string()),
        }
    }

    /// Messages in insertion order.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.errors
    }

    /// Decompose into one primitive error per message.
    #[must_use]
    pub fn errors(&self) -> Vec<MessageError> {
        self.errors.iter().cloned().map(MessageError).collect()
    }

    /// Number of recorded failures.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Whether nothing failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// `Ok(value)` when empty, otherwise the aggregate as an error.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Aggregate`] if any failure was recorded.
    pub fn into_result<T>(self, value: T) -> DecodeResult<T> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(DecodeError::Aggregate(self))
        }
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sorted: Vec<&str> = self.errors.iter().map(String::as_str).collect();
        sorted.sort_unstable();
        let bullets: Vec<String> = sorted.iter().map(|m| format!("* {m}")).collect();
        write!(
            f,
            "{} error(s) decoding:\n\n{}",
            self.errors.len(),
            bullets.join("\n")
        )
    }
}

impl std::error::Error for AggregateError {}

/// Single message split out of an [`AggregateError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct MessageError(pub String);

/// Result of a hook invocation.
pub type HookResult<T> = Result<T, HookError>;

/// Result of a decode operation.
pub type DecodeResult<T> = Result<T, DecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_display_sorted() {
        let mut agg = AggregateError::new();
        agg.push("zeta failed");
        agg.push("alpha failed");
        assert_eq!(
            agg.to_string(),
            "2 error(s) decoding:\n\n* alpha failed\n* zeta failed"
        );
        assert_eq!(agg.messages(), ["zeta failed", "alpha failed"]);
    }

    #[test]
    fn test_append_splices_aggregates() {
        let mut inner = AggregateError::new();
        inner.push("a");
        inner.push("b");

        let mut outer = AggregateError::new();
        outer.push("c");
        outer.append(DecodeError::Aggregate(inner));
        outer.append(DecodeError::field("port", HookError::msg("bad")));

        assert_eq!(outer.len(), 4);
        assert_eq!(outer.messages()[3], "'port' bad");
        let primitives = outer.errors();
        assert_eq!(primitives[0], MessageError("c".to_owned()));
    }

    #[test]
    fn test_into_result() {
        assert_eq!(AggregateError::new().into_result(5), Ok(5));
        let mut agg = AggregateError::new();
        agg.push("x");
        assert!(agg.into_result(5).is_err());
    }

    #[test]
    fn test_alternatives_newline_terminated() {
        let err = HookError::Alternatives {
            messages: vec!["f1 error".to_owned(), "f2 error".to_owned()],
        };
        assert_eq!(err.to_string(), "f1 error\nf2 error\n");
        let empty = HookError::Alternatives { messages: vec![] };
        assert_eq!(empty.to_string(), "no decode hook alternatives configured");
    }

    #[test]
    fn test_field_error_names_field() {
        let err = DecodeError::field("limits.max", HookError::parse(&Shape::U32, "invalid syntax"));
        assert_eq!(
            err.to_string(),
            "'limits.max' cannot parse value as 'u32': invalid syntax"
        );
    }
}
