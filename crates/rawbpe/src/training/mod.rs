//! # Vocabulary Training
//!
//! Support for learning a byte-level BPE vocabulary from a raw byte corpus.
//!
//! Training owns its corpus: each document starts as one single-byte token
//! per input byte and is rewritten in place once per accepted merge. Pair
//! frequencies are maintained incrementally; only the positions adjacent to
//! each merge site are adjusted between steps.
//!
//! ## Training Example
//!
//! ```rust
//! use rawbpe::training::{ByteBpeTrainer, ByteBpeTrainerOptions};
//!
//! let options = ByteBpeTrainerOptions::new(258).with_min_pair_count(1);
//! let mut trainer: ByteBpeTrainer<u32> = options.init();
//! trainer.push_document(b"aaab");
//!
//! let trained = trainer.train::<u64>().unwrap();
//! assert_eq!(trained.vocab_size(), 258);
//! ```

pub mod utility;

mod bpe_trainer;
mod training_types;

#[doc(inline)]
pub use bpe_trainer::{ByteBpeTrainer, ByteBpeTrainerOptions, MergeRule, TrainedByteBpe};
#[doc(inline)]
pub use training_types::CountType;
