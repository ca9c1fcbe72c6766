use core::fmt;

use thiserror::Error;

/// The class of a fatal parse error.
///
/// Every error ends the session: the parser must be discarded and a fresh
/// one created to parse further input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// A malformed or misplaced object key.
    InvalidKey,
    /// A value matched no grammar alternative, or a delimiter was
    /// unexpected.
    InvalidValue,
    /// A host callback reported a failure.
    CallbackError,
    /// Invalid bytes at the start of the document or after its end.
    MalformedData,
    /// Nesting exceeded the recursion limit.
    RecursionError,
    /// The recursion stack protocol was violated.
    ContainerError,
    /// Overflow while accumulating an integer, fraction, or exponent.
    InvalidInteger,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ErrorKind::InvalidKey => "invalid key",
            ErrorKind::InvalidValue => "invalid value",
            ErrorKind::CallbackError => "callback error",
            ErrorKind::MalformedData => "malformed data",
            ErrorKind::RecursionError => "recursion error",
            ErrorKind::ContainerError => "container error",
            ErrorKind::InvalidInteger => "invalid integer",
        })
    }
}

/// A fatal error, carrying the absolute byte offset at which it was
/// detected.
///
/// `E` is the host handler's error type.
#[derive(Error, Debug, PartialEq)]
pub enum ParseError<E> {
    /// The engine rejected the input or its own bookkeeping failed.
    #[error("{kind}: {reason} at byte {offset}")]
    Syntax {
        /// Error class.
        kind: ErrorKind,
        /// Human-readable cause.
        reason: &'static str,
        /// Absolute byte offset into the stream.
        offset: usize,
    },
    /// A host callback aborted parsing.
    #[error("callback error: {error} at byte {offset}")]
    Callback {
        /// The error returned by the handler.
        error: E,
        /// Absolute byte offset into the stream.
        offset: usize,
    },
}

impl<E> ParseError<E> {
    pub(crate) fn syntax(kind: ErrorKind, reason: &'static str, offset: usize) -> Self {
        ParseError::Syntax {
            kind,
            reason,
            offset,
        }
    }

    /// The error class.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            ParseError::Syntax { kind, .. } => *kind,
            ParseError::Callback { .. } => ErrorKind::CallbackError,
        }
    }

    /// The absolute byte offset at which the error was detected.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            ParseError::Syntax { offset, .. } | ParseError::Callback { offset, .. } => *offset,
        }
    }

    /// The engine's cause string, if the engine raised the error.
    #[must_use]
    pub fn reason(&self) -> Option<&'static str> {
        match self {
            ParseError::Syntax { reason, .. } => Some(*reason),
            ParseError::Callback { .. } => None,
        }
    }
}

/// Remembered after the first error so later calls fail the same way
/// without reaching the handler again.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Failure {
    pub kind: ErrorKind,
    pub reason: &'static str,
    pub offset: usize,
}

impl Failure {
    pub(crate) fn record<E>(err: &ParseError<E>) -> Self {
        Failure {
            kind: err.kind(),
            reason: err.reason().unwrap_or("Host callback aborted parsing"),
            offset: err.offset(),
        }
    }

    pub(crate) fn replay<E>(self) -> ParseError<E> {
        ParseError::syntax(self.kind, self.reason, self.offset)
    }
}
