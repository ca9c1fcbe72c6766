//! String scanning: content runs, escapes, and `\uXXXX` digits.

use super::{Advance, Fallible, Parser, Resume, State, StringScan};
use crate::{ErrorKind, Handler, Span, StringRole, stack::TagStore};

impl<H: Handler, S: TagStore> Parser<H, S> {
    /// Enters a string at its opening quote.
    pub(super) fn open_string(&mut self, resume: Resume) -> Fallible<Advance, H> {
        let start = self.offset + 1;
        self.string_start = start;
        self.state = State::String(StringScan::Content, resume);
        let flow = self.callback(|h| h.on_string_start(resume.role(), start))?;
        Ok(Advance::after(flow))
    }

    /// Length of the plain content at the head of `rest`: everything up to
    /// the next quote, backslash, or rejected control byte.
    pub(super) fn skip_content(&self, rest: &[u8]) -> usize {
        let allow_control = self.options.allow_control_characters;
        rest.iter()
            .position(|&b| b == b'"' || b == b'\\' || (b < 0x20 && !allow_control))
            .unwrap_or(rest.len())
    }

    /// One transition inside a string. `run` is the start of the content
    /// not yet lent to the handler.
    pub(super) fn step_string(
        &mut self,
        scan: StringScan,
        resume: Resume,
        chunk: &[u8],
        pos: usize,
        run: &mut Option<usize>,
    ) -> Fallible<Advance, H> {
        let role = resume.role();
        let byte = chunk[pos];
        match scan {
            StringScan::Content => match byte {
                b'"' => {
                    self.flush(role, chunk, run.take(), pos)?;
                    let span = Span {
                        start: self.string_start,
                        end: self.offset,
                    };
                    self.state = resume.state();
                    let flow = self.callback(|h| h.on_string_end(role, span))?;
                    Ok(Advance::after(flow))
                }
                b'\\' => {
                    self.state = State::String(StringScan::Escape, resume);
                    Ok(Advance::Consume)
                }
                b if b < 0x20 && !self.options.allow_control_characters => Err(self.error(
                    ErrorKind::InvalidValue,
                    "Unescaped control character in string",
                )),
                _ => Ok(Advance::Consume),
            },
            StringScan::Escape => match byte {
                b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => {
                    self.state = State::String(StringScan::Content, resume);
                    Ok(Advance::Consume)
                }
                b'u' => {
                    self.hex.reset();
                    self.state = State::String(StringScan::Hex, resume);
                    Ok(Advance::Consume)
                }
                _ => Err(self.error(ErrorKind::InvalidValue, "Invalid escape character")),
            },
            StringScan::Hex => match self.hex.feed(byte) {
                Ok(None) => Ok(Advance::Consume),
                Ok(Some(unit)) => {
                    let end = pos + 1;
                    self.flush(role, chunk, *run, end)?;
                    *run = Some(end);
                    self.state = State::String(StringScan::Content, resume);
                    self.callback(|h| h.on_unicode_escape(role, unit))?;
                    Ok(Advance::Consume)
                }
                Err(reason) => Err(self.error(ErrorKind::InvalidValue, reason)),
            },
        }
    }

    /// Lends `chunk[start..end]` to the handler. Empty runs are skipped.
    pub(super) fn flush(
        &mut self,
        role: StringRole,
        chunk: &[u8],
        start: Option<usize>,
        end: usize,
    ) -> Fallible<(), H> {
        match start {
            Some(start) if start < end => {
                let data = &chunk[start..end];
                self.callback(|h| h.on_string_data(role, data))
            }
            _ => Ok(()),
        }
    }
}
