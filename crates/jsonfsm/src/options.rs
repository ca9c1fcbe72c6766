/// Configuration options for the parser.
///
/// The recursion limit and its storage are configured separately through
/// [`RecursionGuard`](crate::RecursionGuard).
///
/// # Examples
///
/// ```rust
/// use jsonfsm::{Container, Parser, ParserOptions, RecursionGuard, Status};
///
/// let options = ParserOptions {
///     allow_multiple_documents: true,
///     ..Default::default()
/// };
/// let guard = RecursionGuard::new([Container::default(); 4], 4).unwrap();
/// let mut parser = Parser::with_options((), guard, options);
/// assert_eq!(parser.feed(b"{}\n[]\n").unwrap(), Status::Completed);
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParserOptions {
    /// Whether to parse several top-level documents from one stream.
    ///
    /// When `true`, the parser returns to its start state after each
    /// document's closing delimiter and accepts another `{` or `[`. This
    /// supports JSON Lines (JSONL), newline-delimited JSON (ND-JSON), and
    /// plain concatenation such as `{}[]{}`.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_documents: bool,

    /// Whether to accept raw control bytes (`0x00`..=`0x1F`) inside
    /// strings.
    ///
    /// RFC 8259 requires them to be escaped, so by default they are an
    /// [`InvalidValue`](crate::ErrorKind::InvalidValue) error.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_control_characters: bool,
}
