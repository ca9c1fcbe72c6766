use core::ops::Range;

/// What the host wants the parser to do after a pausable callback.
///
/// Returning `Err` from a callback is the third arm: it aborts the session
/// with [`ErrorKind::CallbackError`](crate::ErrorKind::CallbackError).
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Keep parsing.
    #[default]
    Continue,
    /// Stop `feed` after this callback. The host resumes by feeding the
    /// unconsumed remainder of the chunk.
    Pause,
}

/// Whether a string is an object key or a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StringRole {
    /// An object member name.
    Key,
    /// A string value in an array or object.
    Value,
}

/// Absolute byte offsets of a string's raw content, excluding the quotes.
///
/// Offsets count every byte fed to the parser during the session. Escape
/// sequences are included verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    /// Offset of the first content byte.
    pub start: usize,
    /// Offset of the closing quote.
    pub end: usize,
}

impl Span {
    /// Number of raw content bytes. A span with `start > end` is empty.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the string was `""`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Span as a range, relative to a buffer that begins at stream offset
    /// `base`.
    ///
    /// Returns `None` if the span starts before `base`.
    #[must_use]
    pub fn relative_to(&self, base: usize) -> Option<Range<usize>> {
        Some(self.start.checked_sub(base)?..self.end.checked_sub(base)?)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

/// Host callbacks invoked as the parser recognizes JSON elements.
///
/// Every method has a default that accepts and continues, so a handler only
/// overrides what it cares about. Scalar callbacks cannot pause; structural
/// and string delimiter callbacks return a [`Flow`].
pub trait Handler {
    /// Error a callback may return to abort parsing.
    type Error: core::error::Error;

    /// `{` opened an object.
    fn on_object_start(&mut self) -> Result<Flow, Self::Error> {
        Ok(Flow::Continue)
    }

    /// `}` closed an object.
    fn on_object_end(&mut self) -> Result<Flow, Self::Error> {
        Ok(Flow::Continue)
    }

    /// `[` opened an array.
    fn on_array_start(&mut self) -> Result<Flow, Self::Error> {
        Ok(Flow::Continue)
    }

    /// `]` closed an array.
    fn on_array_end(&mut self) -> Result<Flow, Self::Error> {
        Ok(Flow::Continue)
    }

    /// Opening quote of a key or string value. `start` is the offset of the
    /// first content byte.
    fn on_string_start(&mut self, role: StringRole, start: usize) -> Result<Flow, Self::Error> {
        let _ = (role, start);
        Ok(Flow::Continue)
    }

    /// A contiguous run of raw string content, borrowed from the current
    /// chunk.
    ///
    /// A string's content may arrive in several runs: one per chunk it
    /// spans, split again after each `\uXXXX` escape. Concatenating the
    /// runs yields the bytes covered by the string's [`Span`].
    fn on_string_data(&mut self, role: StringRole, data: &[u8]) -> Result<(), Self::Error> {
        let _ = (role, data);
        Ok(())
    }

    /// A `\uXXXX` escape was validated. Called after the run that ends with
    /// the escape's last hex digit.
    fn on_unicode_escape(&mut self, role: StringRole, unit: u16) -> Result<(), Self::Error> {
        let _ = (role, unit);
        Ok(())
    }

    /// Closing quote of a key or string value.
    fn on_string_end(&mut self, role: StringRole, span: Span) -> Result<Flow, Self::Error> {
        let _ = (role, span);
        Ok(Flow::Continue)
    }

    /// `true` or `false`.
    fn on_boolean(&mut self, value: bool) -> Result<(), Self::Error> {
        let _ = value;
        Ok(())
    }

    /// `null`.
    fn on_null(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// A complete number.
    fn on_number(&mut self, number: crate::Number) -> Result<(), Self::Error> {
        let _ = number;
        Ok(())
    }

    /// The top-level container closed.
    fn on_end(&mut self) -> Result<Flow, Self::Error> {
        Ok(Flow::Continue)
    }
}

/// Validation only: accepts every element.
impl Handler for () {
    type Error = core::convert::Infallible;
}

impl<H: Handler + ?Sized> Handler for &mut H {
    type Error = H::Error;

    fn on_object_start(&mut self) -> Result<Flow, Self::Error> {
        (**self).on_object_start()
    }

    fn on_object_end(&mut self) -> Result<Flow, Self::Error> {
        (**self).on_object_end()
    }

    fn on_array_start(&mut self) -> Result<Flow, Self::Error> {
        (**self).on_array_start()
    }

    fn on_array_end(&mut self) -> Result<Flow, Self::Error> {
        (**self).on_array_end()
    }

    fn on_string_start(&mut self, role: StringRole, start: usize) -> Result<Flow, Self::Error> {
        (**self).on_string_start(role, start)
    }

    fn on_string_data(&mut self, role: StringRole, data: &[u8]) -> Result<(), Self::Error> {
        (**self).on_string_data(role, data)
    }

    fn on_unicode_escape(&mut self, role: StringRole, unit: u16) -> Result<(), Self::Error> {
        (**self).on_unicode_escape(role, unit)
    }

    fn on_string_end(&mut self, role: StringRole, span: Span) -> Result<Flow, Self::Error> {
        (**self).on_string_end(role, span)
    }

    fn on_boolean(&mut self, value: bool) -> Result<(), Self::Error> {
        (**self).on_boolean(value)
    }

    fn on_null(&mut self) -> Result<(), Self::Error> {
        (**self).on_null()
    }

    fn on_number(&mut self, number: crate::Number) -> Result<(), Self::Error> {
        (**self).on_number(number)
    }

    fn on_end(&mut self) -> Result<Flow, Self::Error> {
        (**self).on_end()
    }
}
