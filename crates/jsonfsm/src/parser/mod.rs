//! The resumable JSON automaton.
//!
//! Overview
//! - Every grammar position is a variant of [`State`]. [`Parser::feed`]
//!   walks the chunk one byte at a time, applying the transition for the
//!   current state. Nothing is rescanned: when the chunk runs out, the state
//!   (plus the number accumulator, hex accumulator, and literal matcher it
//!   refers to) is exactly what the next chunk needs.
//! - A finished value hands control to a [`Resume`] continuation: the colon
//!   search for keys, or the comma-or-closure state of the enclosing array or
//!   object. Containers themselves are tracked by the [`RecursionGuard`], so
//!   the engine's own stack depth is constant.
//! - String content is never copied. Each contiguous run of content within a
//!   chunk is lent to the handler; spans are reported as absolute offsets.
//!
//! Suspension
//! - At a chunk boundary, the feed returns [`Status::Continue`].
//! - When a pausable callback returns [`Flow::Pause`], the feed returns
//!   [`Status::Paused`] with the number of bytes consumed, including the byte
//!   that triggered the callback. The host feeds the remainder to resume.
//! - A closing delimiter whose callback paused leaves the parser in
//!   [`State::Close`]; the pop (and `on_end`, for the top-level container)
//!   happens at the start of the next feed, even an empty one.
//!
//! Errors
//! - Every error is fatal. The first one is returned with its offset and
//!   recorded; later calls replay it without reaching the handler.

mod number;
mod string;


use tracing::{debug, trace};

use crate::{
    ErrorKind, Flow, Handler, ParseError, ParserOptions, StringRole,
    error::Failure,
    escape::HexAccumulator,
    literal::{Literal, LiteralMatcher, Step},
    number::Accumulator,
    stack::{Container, GuardError, RecursionGuard, TagStore, Unwind},
};

/// Outcome of a successful [`Parser::feed`].
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The whole chunk was consumed and the document is still open.
    Continue,
    /// A callback requested a pause after `consumed` bytes of the chunk.
    /// Feed `&chunk[consumed..]` to resume.
    Paused {
        /// Bytes of the chunk already processed.
        consumed: usize,
    },
    /// The whole chunk was consumed and the document is complete.
    Completed,
}

/// Where control goes once a value or key is complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resume {
    Key,
    Element,
    Member,
}

impl Resume {
    fn state(self) -> State {
        match self {
            Resume::Key => State::Colon,
            Resume::Element => State::ArrayCommaOrClose,
            Resume::Member => State::ObjectCommaOrClose,
        }
    }

    fn role(self) -> StringRole {
        match self {
            Resume::Key => StringRole::Key,
            Resume::Element | Resume::Member => StringRole::Value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StringScan {
    Content,
    Escape,
    /// Inside `\uXXXX`; the digit count lives in the hex accumulator.
    Hex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberScan {
    /// After `-`.
    Minus,
    /// After a leading `0`.
    Zero,
    Integer,
    /// After `.`.
    FractionStart,
    Fraction,
    /// After `e` or `E`.
    ExponentMark,
    /// After the exponent's sign.
    ExponentSign,
    Exponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Start,
    ArrayValueOrClose,
    /// After `,` in an array.
    ArrayValue,
    ArrayCommaOrClose,
    ObjectKeyOrClose,
    /// After `,` in an object.
    ObjectKey,
    Colon,
    ObjectValue,
    ObjectCommaOrClose,
    Literal(LiteralMatcher, Resume),
    String(StringScan, Resume),
    Number(NumberScan, Resume),
    /// A closing delimiter was consumed but the guard not yet popped.
    Close,
    End,
}

impl State {
    fn string_role(self) -> Option<StringRole> {
        match self {
            State::String(_, resume) => Some(resume.role()),
            _ => None,
        }
    }
}

/// What the driver does with the current byte after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    Consume,
    /// Re-examine the byte in the new state.
    Hold,
    /// Consume the byte and return to the host.
    Pause,
}

impl Advance {
    fn after(flow: Flow) -> Self {
        match flow {
            Flow::Continue => Advance::Consume,
            Flow::Pause => Advance::Pause,
        }
    }
}

#[inline]
fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// A streaming JSON parser session.
///
/// `H` receives the callbacks; `S` is the host's container tag storage.
/// One parser handles one stream (or, with
/// [`ParserOptions::allow_multiple_documents`], one sequence of documents).
pub struct Parser<H: Handler, S: TagStore> {
    handler: H,
    guard: RecursionGuard<S>,
    options: ParserOptions,

    state: State,
    /// Absolute offset of the byte being examined, or of the next byte to
    /// be fed between calls.
    offset: usize,
    string_start: usize,
    number: Accumulator,
    hex: HexAccumulator,

    documents: usize,
    failure: Option<Failure>,
}

type Fallible<T, H> = Result<T, ParseError<<H as Handler>::Error>>;

impl<H: Handler, S: TagStore> Parser<H, S> {
    /// Creates a parser with default options.
    pub fn new(handler: H, guard: RecursionGuard<S>) -> Self {
        Self::with_options(handler, guard, ParserOptions::default())
    }

    /// Creates a parser with the given options.
    pub fn with_options(handler: H, guard: RecursionGuard<S>, options: ParserOptions) -> Self {
        Self {
            handler,
            guard,
            options,
            state: State::Start,
            offset: 0,
            string_start: 0,
            number: Accumulator::default(),
            hex: HexAccumulator::default(),
            documents: 0,
            failure: None,
        }
    }

    /// Parses the next chunk of the stream.
    ///
    /// Chunks may be any length, including zero, and may split any token.
    ///
    /// # Errors
    ///
    /// A [`ParseError`] ends the session. Every later call returns an error
    /// of the same kind at the same offset.
    pub fn feed(&mut self, chunk: &[u8]) -> Fallible<Status, H> {
        if let Some(failure) = self.failure {
            return Err(failure.replay());
        }
        let result = self.drive(chunk);
        if let Err(err) = &result {
            let failure = Failure::record(err);
            debug!(
                offset = failure.offset,
                kind = %failure.kind,
                reason = failure.reason,
                "parse failed"
            );
            self.failure = Some(failure);
        }
        result
    }

    /// Declares the end of input.
    ///
    /// Completes a pending closure left by a paused callback, then checks
    /// that a whole document was parsed.
    ///
    /// # Errors
    ///
    /// [`ErrorKind::MalformedData`] if the input ended inside a document or
    /// before one started, or any error [`feed`](Self::feed) can return.
    pub fn finish(&mut self) -> Fallible<(), H> {
        let _ = self.feed(&[])?;
        if self.state == State::End {
            return Ok(());
        }
        let err = ParseError::syntax(
            ErrorKind::MalformedData,
            "Unexpected end of input",
            self.offset,
        );
        self.failure = Some(Failure::record(&err));
        Err(err)
    }

    /// Absolute offset of the next byte to be fed.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Current container nesting depth.
    pub fn depth(&self) -> usize {
        self.guard.depth()
    }

    /// Number of top-level documents completed so far.
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Whether the parser sits after a complete document.
    pub fn is_complete(&self) -> bool {
        self.state == State::End
    }

    /// The options this parser was created with.
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Borrows the handler.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutably borrows the handler, e.g. to flush its output during a pause.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Borrows the recursion guard.
    pub fn guard(&self) -> &RecursionGuard<S> {
        &self.guard
    }

    /// Ends the session and returns the handler and the guard.
    pub fn into_parts(self) -> (H, RecursionGuard<S>) {
        (self.handler, self.guard)
    }

    // --------------------------------------------------------------------
    // Driver
    // --------------------------------------------------------------------

    fn drive(&mut self, chunk: &[u8]) -> Fallible<Status, H> {
        let base = self.offset;
        let mut pos = 0;
        // Start of string content not yet lent to the handler.
        let mut run = self.state.string_role().map(|_| 0);

        loop {
            self.offset = base + pos;
            if self.state == State::Close {
                if self.unwind()? == Flow::Pause {
                    trace!(offset = self.offset, "paused by host callback");
                    return Ok(Status::Paused { consumed: pos });
                }
                continue;
            }
            if let State::String(StringScan::Content, _) = self.state {
                pos += self.skip_content(&chunk[pos..]);
                self.offset = base + pos;
            }
            if pos == chunk.len() {
                break;
            }

            let advance = match self.state {
                State::String(scan, resume) => {
                    self.step_string(scan, resume, chunk, pos, &mut run)?
                }
                _ => self.step(chunk[pos])?,
            };
            match advance {
                Advance::Consume => pos += 1,
                Advance::Hold => {}
                Advance::Pause => {
                    pos += 1;
                    self.offset = base + pos;
                    trace!(offset = self.offset, "paused by host callback");
                    return Ok(Status::Paused { consumed: pos });
                }
            }
            if run.is_none() && self.state.string_role().is_some() {
                run = Some(pos);
            }
        }

        if let Some(role) = self.state.string_role() {
            self.flush(role, chunk, run, pos)?;
        }
        Ok(if self.state == State::End {
            Status::Completed
        } else {
            Status::Continue
        })
    }

    /// One transition for every state except string scanning.
    fn step(&mut self, byte: u8) -> Fallible<Advance, H> {
        match self.state {
            State::Start => self.document_start(byte, "Invalid start delimiter"),
            State::End => {
                if is_whitespace(byte) {
                    Ok(Advance::Consume)
                } else if self.options.allow_multiple_documents {
                    self.document_start(byte, "Unexpected data after end of document")
                } else {
                    Err(self.error(
                        ErrorKind::MalformedData,
                        "Unexpected data after end of document",
                    ))
                }
            }
            State::ArrayValueOrClose if byte == b']' => self.close(Container::Array),
            State::ArrayValue if byte == b']' => Err(self.error(
                ErrorKind::InvalidValue,
                "Trailing comma before array closure",
            )),
            State::ArrayValueOrClose | State::ArrayValue => {
                self.dispatch_value(byte, Resume::Element)
            }
            State::ArrayCommaOrClose => match byte {
                b if is_whitespace(b) => Ok(Advance::Consume),
                b',' => {
                    self.state = State::ArrayValue;
                    Ok(Advance::Consume)
                }
                b']' => self.close(Container::Array),
                _ => Err(self.error(ErrorKind::InvalidValue, "Invalid array value or closure")),
            },
            State::ObjectKeyOrClose | State::ObjectKey => match byte {
                b if is_whitespace(b) => Ok(Advance::Consume),
                b'"' => self.open_string(Resume::Key),
                b'}' if self.state == State::ObjectKeyOrClose => self.close(Container::Object),
                _ => Err(self.error(ErrorKind::InvalidKey, "Invalid object key")),
            },
            State::Colon => match byte {
                b if is_whitespace(b) => Ok(Advance::Consume),
                b':' => {
                    self.state = State::ObjectValue;
                    Ok(Advance::Consume)
                }
                _ => Err(self.error(ErrorKind::InvalidValue, "Invalid middle delimiter")),
            },
            State::ObjectValue => self.dispatch_value(byte, Resume::Member),
            State::ObjectCommaOrClose => match byte {
                b if is_whitespace(b) => Ok(Advance::Consume),
                b',' => {
                    self.state = State::ObjectKey;
                    Ok(Advance::Consume)
                }
                b'}' => self.close(Container::Object),
                _ => Err(self.error(ErrorKind::InvalidValue, "Invalid object value or closure")),
            },
            State::Literal(mut matcher, resume) => match matcher.step(byte) {
                Step::NeedMore => {
                    self.state = State::Literal(matcher, resume);
                    Ok(Advance::Consume)
                }
                Step::Done(literal) => {
                    self.state = resume.state();
                    match literal {
                        Literal::True => self.callback(|h| h.on_boolean(true))?,
                        Literal::False => self.callback(|h| h.on_boolean(false))?,
                        Literal::Null => self.callback(Handler::on_null)?,
                    }
                    Ok(Advance::Consume)
                }
                Step::Reject => Err(self.error(ErrorKind::InvalidValue, "Invalid literal")),
            },
            State::Number(scan, resume) => self.step_number(scan, resume, byte),
            // The driver handles these before stepping.
            State::String(..) | State::Close => Ok(Advance::Hold),
        }
    }

    fn document_start(&mut self, byte: u8, reason: &'static str) -> Fallible<Advance, H> {
        match byte {
            b if is_whitespace(b) => Ok(Advance::Consume),
            b'{' => self.open(Container::Object),
            b'[' => self.open(Container::Array),
            _ => Err(self.error(ErrorKind::MalformedData, reason)),
        }
    }

    // --------------------------------------------------------------------
    // Value dispatch
    // --------------------------------------------------------------------

    fn dispatch_value(&mut self, byte: u8, resume: Resume) -> Fallible<Advance, H> {
        let next = match byte {
            b if is_whitespace(b) => return Ok(Advance::Consume),
            b'"' => return self.open_string(resume),
            b'{' => return self.open(Container::Object),
            b'[' => return self.open(Container::Array),
            b'-' => {
                self.number.set_negative();
                State::Number(NumberScan::Minus, resume)
            }
            b'0' => State::Number(NumberScan::Zero, resume),
            b'1'..=b'9' => {
                self.push_integer(byte)?;
                State::Number(NumberScan::Integer, resume)
            }
            _ => match LiteralMatcher::new(byte) {
                Some(matcher) => State::Literal(matcher, resume),
                None => return Err(self.error(ErrorKind::InvalidValue, "Invalid JSON value")),
            },
        };
        self.state = next;
        Ok(Advance::Consume)
    }

    // --------------------------------------------------------------------
    // Containers
    // --------------------------------------------------------------------

    fn open(&mut self, tag: Container) -> Fallible<Advance, H> {
        if let Err(err) = self.guard.push(tag) {
            return Err(self.guard_error(err));
        }
        let flow = match tag {
            Container::Array => {
                self.state = State::ArrayValueOrClose;
                self.callback(Handler::on_array_start)?
            }
            Container::Object => {
                self.state = State::ObjectKeyOrClose;
                self.callback(Handler::on_object_start)?
            }
        };
        Ok(Advance::after(flow))
    }

    fn close(&mut self, tag: Container) -> Fallible<Advance, H> {
        let flow = match tag {
            Container::Array => self.callback(Handler::on_array_end)?,
            Container::Object => self.callback(Handler::on_object_end)?,
        };
        self.state = State::Close;
        if flow == Flow::Pause {
            return Ok(Advance::Pause);
        }
        Ok(Advance::after(self.unwind()?))
    }

    /// Pops the guard and routes to the enclosing container, or ends the
    /// document.
    fn unwind(&mut self) -> Fallible<Flow, H> {
        let unwind = match self.guard.pop() {
            Ok(unwind) => unwind,
            Err(err) => return Err(self.guard_error(err)),
        };
        match unwind {
            Unwind::Array => {
                self.state = State::ArrayCommaOrClose;
                Ok(Flow::Continue)
            }
            Unwind::Object => {
                self.state = State::ObjectCommaOrClose;
                Ok(Flow::Continue)
            }
            Unwind::EndRecursion => {
                self.state = State::End;
                self.documents += 1;
                trace!(
                    offset = self.offset,
                    documents = self.documents,
                    "document complete"
                );
                self.callback(Handler::on_end)
            }
        }
    }

    // --------------------------------------------------------------------
    // Helpers
    // --------------------------------------------------------------------

    fn callback<T>(&mut self, f: impl FnOnce(&mut H) -> Result<T, H::Error>) -> Fallible<T, H> {
        let offset = self.offset;
        f(&mut self.handler).map_err(|error| ParseError::Callback { error, offset })
    }

    fn error(&self, kind: ErrorKind, reason: &'static str) -> ParseError<H::Error> {
        ParseError::syntax(kind, reason, self.offset)
    }

    fn guard_error(&self, err: GuardError) -> ParseError<H::Error> {
        self.error(err.kind(), err.reason())
    }
}
