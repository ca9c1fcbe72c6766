#[cfg(feature = "alloc")]
mod chunk_helpers;
mod parse_bad;
pub(crate) mod utils;
