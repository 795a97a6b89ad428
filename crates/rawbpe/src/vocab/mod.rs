//! # Token Vocabulary
//!
//! The interned token table: content-addressed byte sequences with dense,
//! acceptance-ordered integer ids.

mod token_table;

#[doc(inline)]
pub use token_table::{TokenTable, check_vocab_capacity};
