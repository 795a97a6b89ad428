//! # `rawbpe` Byte-Level BPE Vocabulary Trainer
//!
//! Learns a byte-level BPE vocabulary from raw byte documents: the most
//! frequent adjacent token pair is repeatedly merged into a new token until
//! a size or frequency budget is exhausted, and the merge history and
//! vocabulary are emitted in interoperable formats.
//!
//! See:
//! * [`training`] to learn a [`training::TrainedByteBpe`] from a corpus.
//! * [`vocab`] for the interned token table.
//! * [`io`] for the artifact formats (`merges.txt`, `vocab.json`, and the
//!   GPT-2-style readable form).
//!
//! ## Training Example
//!
//! ```rust
//! use rawbpe::training::{ByteBpeTrainer, ByteBpeTrainerOptions};
//!
//! let options = ByteBpeTrainerOptions::new(300).with_min_pair_count(1);
//! let mut trainer: ByteBpeTrainer<u32> = options.init();
//!
//! trainer.update_from_documents(["sea shells", "she sells sea shells"]);
//!
//! let trained = trainer.train::<u64>().expect("training failed");
//! assert!(trained.vocab_size() <= 300);
//!
//! let mut merges = Vec::new();
//! rawbpe::io::write_merges_txt(&trained, &mut merges).unwrap();
//! ```
//!
//! ## Crate Features
//!
//! #### feature: ``ahash``
//!
//! This swaps all HashMap/HashSet implementations for ``ahash``.
//!
//! This is done by the ``types::RbHash{*}`` type alias machinery.
//!
//! #### feature: ``rayon``
//!
//! This parallelizes the initial pair count scan across documents.
//! Merges never span a document boundary, so the per-document partitioning
//! does not affect results.

#![warn(missing_docs, unused)]

pub mod errors;
pub mod io;
pub mod training;
pub mod types;
pub mod vocab;

#[doc(inline)]
pub use errors::{RawBpeError, RbResult};
#[doc(inline)]
pub use types::{Pair, TokenType};
