//! Prints an indented outline of JSON read from standard input, parsing it
//! in small fixed-size reads so no document is ever held in memory whole.
//!
//! Keys are decoded with [`jsonfsm::escape::Unescape`]; string values are
//! printed as their length only, which the engine reports without copying.
//!
//! Run with
//!
//! ```bash
//! echo '{"a":[1,true,"xyz"]}' | cargo run -p jsonfsm --example stream_stdin
//! printf '{"a":1}\n{"b":2}\n' | cargo run -p jsonfsm --example stream_stdin -- --lines
//! ```

use std::io::{self, Read, Write};

use jsonfsm::{
    Container, Flow, Handler, Number, Parser, ParserOptions, RecursionGuard, Span, StringRole,
    escape::{Unescape, UnescapeError},
};

#[derive(Debug, thiserror::Error)]
enum OutlineError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Key(#[from] UnescapeError),
}

struct Outline<W> {
    out: W,
    depth: usize,
    key: Vec<u8>,
}

impl<W: Write> Outline<W> {
    fn line(&mut self, text: std::fmt::Arguments<'_>) -> Result<(), OutlineError> {
        write!(self.out, "{:width$}", "", width = self.depth * 2)?;
        self.out.write_fmt(text)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn open(&mut self, bracket: char) -> Result<Flow, OutlineError> {
        self.line(format_args!("{bracket}"))?;
        self.depth += 1;
        Ok(Flow::Continue)
    }

    fn close(&mut self, bracket: char) -> Result<Flow, OutlineError> {
        self.depth = self.depth.saturating_sub(1);
        self.line(format_args!("{bracket}"))?;
        Ok(Flow::Continue)
    }
}

impl<W: Write> Handler for Outline<W> {
    type Error = OutlineError;

    fn on_object_start(&mut self) -> Result<Flow, OutlineError> {
        self.open('{')
    }

    fn on_object_end(&mut self) -> Result<Flow, OutlineError> {
        self.close('}')
    }

    fn on_array_start(&mut self) -> Result<Flow, OutlineError> {
        self.open('[')
    }

    fn on_array_end(&mut self) -> Result<Flow, OutlineError> {
        self.close(']')
    }

    fn on_string_start(&mut self, _role: StringRole, _start: usize) -> Result<Flow, OutlineError> {
        self.key.clear();
        Ok(Flow::Continue)
    }

    fn on_string_data(&mut self, role: StringRole, data: &[u8]) -> Result<(), OutlineError> {
        if role == StringRole::Key {
            self.key.extend_from_slice(data);
        }
        Ok(())
    }

    fn on_string_end(&mut self, role: StringRole, span: Span) -> Result<Flow, OutlineError> {
        match role {
            StringRole::Key => {
                let key = Unescape::new(&self.key).collect::<Result<String, _>>()?;
                self.line(format_args!("{key}:"))?;
            }
            StringRole::Value => self.line(format_args!("string ({} raw bytes)", span.len()))?,
        }
        Ok(Flow::Continue)
    }

    fn on_boolean(&mut self, value: bool) -> Result<(), OutlineError> {
        self.line(format_args!("{value}"))
    }

    fn on_null(&mut self) -> Result<(), OutlineError> {
        self.line(format_args!("null"))
    }

    fn on_number(&mut self, number: Number) -> Result<(), OutlineError> {
        self.line(format_args!("{number}"))
    }

    fn on_end(&mut self) -> Result<Flow, OutlineError> {
        self.line(format_args!("---"))?;
        Ok(Flow::Continue)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let options = ParserOptions {
        allow_multiple_documents: std::env::args().any(|arg| arg == "--lines"),
        ..ParserOptions::default()
    };
    let outline = Outline {
        out: io::stdout().lock(),
        depth: 0,
        key: Vec::new(),
    };
    let guard = RecursionGuard::new(Vec::<Container>::new(), 256)?;
    let mut parser = Parser::with_options(outline, guard, options);

    let mut stdin = io::stdin().lock();
    let mut buf = [0u8; 64];
    loop {
        let n = stdin.read(&mut buf)?;
        if n == 0 {
            break;
        }
        let _ = parser.feed(&buf[..n])?;
    }
    parser.finish()?;
    Ok(())
}
