//! A resumable, callback-driven JSON parser expressed as an explicit state
//! machine.
//!
//! Input is fed in chunks of any size. The [`Parser`] reports every
//! recognized element to a host [`Handler`] and keeps all of its state in a
//! single record, so a chunk may end in the middle of any token and parsing
//! picks up with the next chunk exactly where it stopped.
//!
//! The engine never allocates. Strings are reported as [`Span`]s of absolute
//! byte offsets (plus borrowed runs of the current chunk), numbers are
//! decoded digit by digit into a [`Number`], and container nesting is
//! tracked in host-owned storage through a [`RecursionGuard`].
//!
//! ```rust
//! use jsonfsm::{Container, Handler, Number, Parser, RecursionGuard, Status};
//!
//! #[derive(Default)]
//! struct Sum(i64);
//!
//! impl Handler for Sum {
//!     type Error = core::convert::Infallible;
//!
//!     fn on_number(&mut self, number: Number) -> Result<(), Self::Error> {
//!         self.0 += number.integer as i64;
//!         Ok(())
//!     }
//! }
//!
//! let guard = RecursionGuard::new([Container::default(); 8], 8).unwrap();
//! let mut parser = Parser::new(Sum::default(), guard);
//! assert_eq!(parser.feed(b"[1, 2").unwrap(), Status::Continue);
//! assert_eq!(parser.feed(b"0, 3]").unwrap(), Status::Completed);
//! parser.finish().unwrap();
//! assert_eq!(parser.handler().0, 24);
//! ```

#![no_std]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod error;
pub mod escape;
mod handler;
mod literal;
mod number;
mod options;
mod parser;
mod stack;

#[cfg(all(feature = "alloc", any(test, feature = "fuzzing")))]
pub mod chunk_utils;

#[cfg(test)]
mod tests;

pub use error::{ErrorKind, ParseError};
pub use handler::{Flow, Handler, Span, StringRole};
pub use number::{MAX_EXPONENT, MIN_EXPONENT, MUL_ADD_LIMIT, Number};
pub use options::ParserOptions;
pub use parser::{Parser, Status};
pub use stack::{Container, GuardError, LimitError, RecursionGuard, TagStore, Unwind};
