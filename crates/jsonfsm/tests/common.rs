#![allow(missing_docs, dead_code)]

use core::{convert::Infallible, fmt::Write};

use bstr::BStr;
use jsonfsm::{
    Container, Flow, Handler, Number, Parser, ParserOptions, RecursionGuard, Span, Status,
    StringRole,
};

/// Renders each callback as one line of text.
#[derive(Default)]
pub struct Trace {
    pub out: String,
}

impl Trace {
    fn line(&mut self, args: core::fmt::Arguments<'_>) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.write_fmt(args).unwrap();
    }
}

fn role(role: StringRole) -> &'static str {
    match role {
        StringRole::Key => "key",
        StringRole::Value => "value",
    }
}

impl Handler for Trace {
    type Error = Infallible;

    fn on_object_start(&mut self) -> Result<Flow, Infallible> {
        self.line(format_args!("object_start"));
        Ok(Flow::Continue)
    }

    fn on_object_end(&mut self) -> Result<Flow, Infallible> {
        self.line(format_args!("object_end"));
        Ok(Flow::Continue)
    }

    fn on_array_start(&mut self) -> Result<Flow, Infallible> {
        self.line(format_args!("array_start"));
        Ok(Flow::Continue)
    }

    fn on_array_end(&mut self) -> Result<Flow, Infallible> {
        self.line(format_args!("array_end"));
        Ok(Flow::Continue)
    }

    fn on_string_start(&mut self, r: StringRole, start: usize) -> Result<Flow, Infallible> {
        self.line(format_args!("string_start {} @{start}", role(r)));
        Ok(Flow::Continue)
    }

    fn on_string_data(&mut self, r: StringRole, data: &[u8]) -> Result<(), Infallible> {
        self.line(format_args!("data {} [{}]", role(r), BStr::new(data)));
        Ok(())
    }

    fn on_unicode_escape(&mut self, r: StringRole, unit: u16) -> Result<(), Infallible> {
        self.line(format_args!("unicode {} {unit:04X}", role(r)));
        Ok(())
    }

    fn on_string_end(&mut self, r: StringRole, span: Span) -> Result<Flow, Infallible> {
        self.line(format_args!(
            "string_end {} {}..{}",
            role(r),
            span.start,
            span.end
        ));
        Ok(Flow::Continue)
    }

    fn on_boolean(&mut self, value: bool) -> Result<(), Infallible> {
        self.line(format_args!("boolean {value}"));
        Ok(())
    }

    fn on_null(&mut self) -> Result<(), Infallible> {
        self.line(format_args!("null"));
        Ok(())
    }

    fn on_number(&mut self, number: Number) -> Result<(), Infallible> {
        self.line(format_args!("number {number}"));
        Ok(())
    }

    fn on_end(&mut self) -> Result<Flow, Infallible> {
        self.line(format_args!("end"));
        Ok(Flow::Continue)
    }
}

/// Feeds `chunks` in order, then finishes. A parse error becomes the last
/// line of the trace.
pub fn trace_chunks(chunks: &[&[u8]], options: ParserOptions) -> String {
    let guard = RecursionGuard::new(Vec::<Container>::new(), 32).unwrap();
    let mut parser = Parser::with_options(Trace::default(), guard, options);
    let mut failure = None;
    for chunk in chunks {
        match parser.feed(chunk) {
            Ok(Status::Continue | Status::Completed) => {}
            Ok(Status::Paused { .. }) => unreachable!("trace never pauses"),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
    }
    if failure.is_none() {
        failure = parser.finish().err();
    }
    let (mut trace, _) = parser.into_parts();
    if let Some(err) = failure {
        trace.line(format_args!("error: {err}"));
    }
    trace.out
}

pub fn trace(input: &[u8]) -> String {
    trace_chunks(&[input], ParserOptions::default())
}
