use core::fmt;
use std::{string::String, vec::Vec};

use bstr::BStr;
use thiserror::Error;

use crate::{
    Container, Flow, Handler, Number, ParseError, Parser, ParserOptions, RecursionGuard, Span,
    Status, StringRole,
};

pub const STORAGE: usize = 64;

pub type Storage = [Container; STORAGE];

/// One recorded callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    StringStart(StringRole, usize),
    Data(StringRole, Vec<u8>),
    Unicode(StringRole, u16),
    StringEnd(StringRole, Span),
    Boolean(bool),
    Null,
    Number(Number),
    End,
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::ObjectStart => f.write_str("object_start"),
            Event::ObjectEnd => f.write_str("object_end"),
            Event::ArrayStart => f.write_str("array_start"),
            Event::ArrayEnd => f.write_str("array_end"),
            Event::StringStart(role, start) => write!(f, "string_start {role:?} @{start}"),
            Event::Data(role, data) => write!(f, "data {role:?} {:?}", BStr::new(data)),
            Event::Unicode(role, unit) => write!(f, "unicode {role:?} {unit:04X}"),
            Event::StringEnd(role, span) => {
                write!(f, "string_end {role:?} {}..{}", span.start, span.end)
            }
            Event::Boolean(value) => write!(f, "boolean {value}"),
            Event::Null => f.write_str("null"),
            Event::Number(number) => write!(f, "number {number}"),
            Event::End => f.write_str("end"),
        }
    }
}

/// The recorder's abort.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("host rejected event #{0}")]
pub struct Rejected(pub usize);

/// Records every callback; optionally pauses on each pausable one, or fails
/// on the event with a given index.
#[derive(Debug, Default)]
pub struct Recorder {
    pub events: Vec<Event>,
    pub pause: bool,
    pub fail_at: Option<usize>,
}

impl Recorder {
    pub fn pausing() -> Self {
        Self {
            pause: true,
            ..Self::default()
        }
    }

    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    fn record(&mut self, event: Event) -> Result<Flow, Rejected> {
        let index = self.events.len();
        self.events.push(event);
        if self.fail_at == Some(index) {
            return Err(Rejected(index));
        }
        Ok(if self.pause {
            Flow::Pause
        } else {
            Flow::Continue
        })
    }

    fn scalar(&mut self, event: Event) -> Result<(), Rejected> {
        self.record(event).map(|_| ())
    }
}

impl Handler for Recorder {
    type Error = Rejected;

    fn on_object_start(&mut self) -> Result<Flow, Rejected> {
        self.record(Event::ObjectStart)
    }

    fn on_object_end(&mut self) -> Result<Flow, Rejected> {
        self.record(Event::ObjectEnd)
    }

    fn on_array_start(&mut self) -> Result<Flow, Rejected> {
        self.record(Event::ArrayStart)
    }

    fn on_array_end(&mut self) -> Result<Flow, Rejected> {
        self.record(Event::ArrayEnd)
    }

    fn on_string_start(&mut self, role: StringRole, start: usize) -> Result<Flow, Rejected> {
        self.record(Event::StringStart(role, start))
    }

    fn on_string_data(&mut self, role: StringRole, data: &[u8]) -> Result<(), Rejected> {
        self.scalar(Event::Data(role, data.to_vec()))
    }

    fn on_unicode_escape(&mut self, role: StringRole, unit: u16) -> Result<(), Rejected> {
        self.scalar(Event::Unicode(role, unit))
    }

    fn on_string_end(&mut self, role: StringRole, span: Span) -> Result<Flow, Rejected> {
        self.record(Event::StringEnd(role, span))
    }

    fn on_boolean(&mut self, value: bool) -> Result<(), Rejected> {
        self.scalar(Event::Boolean(value))
    }

    fn on_null(&mut self) -> Result<(), Rejected> {
        self.scalar(Event::Null)
    }

    fn on_number(&mut self, number: Number) -> Result<(), Rejected> {
        self.scalar(Event::Number(number))
    }

    fn on_end(&mut self) -> Result<Flow, Rejected> {
        self.record(Event::End)
    }
}

pub type TestParser = Parser<Recorder, Storage>;

pub fn parser(recorder: Recorder, limit: usize, options: ParserOptions) -> TestParser {
    let guard = RecursionGuard::new([Container::default(); STORAGE], limit).unwrap();
    Parser::with_options(recorder, guard, options)
}

/// Feeds every chunk, re-feeding the remainder after each pause, then
/// finishes.
pub fn drive<'a>(
    parser: &mut TestParser,
    chunks: impl IntoIterator<Item = &'a [u8]>,
) -> Result<(), ParseError<Rejected>> {
    for chunk in chunks {
        let mut rest = chunk;
        loop {
            match parser.feed(rest)? {
                Status::Paused { consumed } => rest = &rest[consumed..],
                Status::Continue | Status::Completed => break,
            }
        }
    }
    parser.finish()
}

#[derive(Debug, PartialEq)]
pub struct Outcome {
    pub events: Vec<Event>,
    pub result: Result<(), ParseError<Rejected>>,
}

pub fn run_chunks<'a>(
    recorder: Recorder,
    options: ParserOptions,
    chunks: impl IntoIterator<Item = &'a [u8]>,
) -> Outcome {
    let mut parser = parser(recorder, STORAGE, options);
    let result = drive(&mut parser, chunks);
    let (recorder, _) = parser.into_parts();
    Outcome {
        events: normalize(recorder.events),
        result,
    }
}

pub fn run(input: &[u8]) -> Outcome {
    run_chunks(Recorder::default(), ParserOptions::default(), [input])
}

/// Feeds one byte at a time.
pub fn run_bytewise(input: &[u8]) -> Outcome {
    run_chunks(
        Recorder::default(),
        ParserOptions::default(),
        input.chunks(1),
    )
}

/// Merges adjacent data runs of one string; chunking only changes where
/// runs are cut.
pub fn normalize(events: Vec<Event>) -> Vec<Event> {
    let mut merged: Vec<Event> = Vec::with_capacity(events.len());
    for event in events {
        if let (Some(Event::Data(prev_role, prev)), Event::Data(role, data)) =
            (merged.last_mut(), &event)
        {
            if prev_role == role {
                prev.extend_from_slice(data);
                continue;
            }
        }
        merged.push(event);
    }
    merged
}

pub fn render(events: &[Event]) -> String {
    use core::fmt::Write;

    let mut out = String::new();
    for event in events {
        writeln!(out, "{event}").unwrap();
    }
    out
}

pub fn num(negative: bool, integer: u64, fraction: u64, fraction_digits: u32, exponent: i32) -> Number {
    Number {
        negative,
        integer,
        fraction,
        fraction_digits,
        exponent,
    }
}
