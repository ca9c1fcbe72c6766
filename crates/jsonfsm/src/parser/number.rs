//! Number states. Digits go straight into the accumulator; the number is
//! reported at the first byte that cannot continue it, and that byte is
//! handed back to the continuation.

use super::{Advance, Fallible, NumberScan, Parser, Resume, State};
use crate::{
    ErrorKind, ParseError,
    handler::Handler,
    number::Overflow,
    stack::TagStore,
};

impl<H: Handler, S: TagStore> Parser<H, S> {
    /// Accumulates an integer digit given as its ASCII byte.
    pub(super) fn push_integer(&mut self, byte: u8) -> Fallible<(), H> {
        let result = self.number.push_integer(byte - b'0');
        result.map_err(|overflow| self.overflow(overflow))
    }

    pub(super) fn step_number(
        &mut self,
        scan: NumberScan,
        resume: Resume,
        byte: u8,
    ) -> Fallible<Advance, H> {
        use NumberScan::{
            Exponent, ExponentMark, ExponentSign, Fraction, FractionStart, Integer, Minus, Zero,
        };

        let next = match (scan, byte) {
            (Minus, b'0') => Zero,
            (Minus, b'1'..=b'9') | (Integer, b'0'..=b'9') => {
                self.push_integer(byte)?;
                Integer
            }
            (Minus, _) => {
                return Err(self.error(ErrorKind::InvalidValue, "Expected digit after minus sign"));
            }
            (Zero, b'0'..=b'9') => {
                return Err(self.error(ErrorKind::InvalidValue, "Leading zeros are not allowed"));
            }
            (Zero | Integer, b'.') => FractionStart,
            (FractionStart | Fraction, b'0'..=b'9') => {
                let result = self.number.push_fraction(byte - b'0');
                result.map_err(|overflow| self.overflow(overflow))?;
                Fraction
            }
            (FractionStart, _) => {
                return Err(self.error(ErrorKind::InvalidValue, "Expected digit after decimal point"));
            }
            (Zero | Integer | Fraction, b'e' | b'E') => ExponentMark,
            (ExponentMark, b'+') => ExponentSign,
            (ExponentMark, b'-') => {
                self.number.set_exponent_negative();
                ExponentSign
            }
            (ExponentMark | ExponentSign | Exponent, b'0'..=b'9') => {
                let result = self.number.push_exponent(byte - b'0');
                result.map_err(|overflow| self.overflow(overflow))?;
                Exponent
            }
            (ExponentMark | ExponentSign, _) => {
                return Err(self.error(ErrorKind::InvalidValue, "Expected digit in exponent"));
            }
            (Zero | Integer | Fraction | Exponent, _) => return self.end_number(resume),
        };
        self.state = State::Number(next, resume);
        Ok(Advance::Consume)
    }

    /// Reports the finished number and re-examines `byte` in the
    /// continuation.
    fn end_number(&mut self, resume: Resume) -> Fallible<Advance, H> {
        let number = self.number.number();
        self.number.reset();
        self.state = resume.state();
        self.callback(|h| h.on_number(number))?;
        Ok(Advance::Hold)
    }

    fn overflow(&self, overflow: Overflow) -> ParseError<H::Error> {
        self.error(ErrorKind::InvalidInteger, overflow.reason())
    }
}
