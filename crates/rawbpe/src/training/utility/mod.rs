//! # Training Utilities

mod pair_doc_index;
mod token_doc_buffer;

#[doc(inline)]
pub use pair_doc_index::{PairCountMap, PairDocIndex, PairDocMap};
#[doc(inline)]
pub use token_doc_buffer::TokenDocBuf;
