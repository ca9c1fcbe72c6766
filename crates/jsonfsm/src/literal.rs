/// The three JSON keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Literal {
    Null,
    True,
    False,
}

/// Result of matching one more byte of a keyword.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Byte matched, more to come.
    NeedMore,
    /// Byte matched and completed the keyword.
    Done(Literal),
    /// Byte did not match. Matching is exact; there is no backtracking.
    Reject,
}

/// Remaining bytes of a keyword in flight. Survives chunk boundaries, so
/// `tr` + `ue` matches `true`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LiteralMatcher {
    rest: &'static [u8],
    kind: Literal,
}

impl LiteralMatcher {
    /// Starts matching after the first byte (`n`, `t`, or `f`).
    pub(crate) fn new(first: u8) -> Option<Self> {
        let (rest, kind): (&'static [u8], _) = match first {
            b'n' => (b"ull", Literal::Null),
            b't' => (b"rue", Literal::True),
            b'f' => (b"alse", Literal::False),
            _ => return None,
        };
        Some(Self { rest, kind })
    }

    pub(crate) fn step(&mut self, byte: u8) -> Step {
        match self.rest.split_first() {
            Some((&expected, rest)) if expected == byte => {
                self.rest = rest;
                if rest.is_empty() {
                    Step::Done(self.kind)
                } else {
                    Step::NeedMore
                }
            }
            _ => Step::Reject,
        }
    }
}
