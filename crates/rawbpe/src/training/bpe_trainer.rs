//! # Byte-Level BPE Trainer

use core::cmp::{Ordering, Reverse};

use dary_heap::OctonaryHeap;

use crate::errors::RbResult;
use crate::io::render_token_escaped;
use crate::training::CountType;
use crate::training::utility::{PairDocIndex, PairDocMap, TokenDocBuf};
use crate::types::{Pair, RbHashMap, RbHashSet, TokenType};
use crate::vocab::{TokenTable, check_vocab_capacity};

/// Options for [`ByteBpeTrainer`].
#[derive(Debug, Clone)]
pub struct ByteBpeTrainerOptions {
    /// Target maximum vocabulary size, including the 256 byte tokens.
    pub vocab_size: usize,

    /// Minimum pair frequency for a merge to be accepted.
    pub min_pair_count: usize,

    /// Hard cap on accepted merges; defaults to `vocab_size - 256`.
    pub max_merges: Option<usize>,
}

impl ByteBpeTrainerOptions {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `vocab_size` - the target maximum vocabulary size.
    ///
    /// ## Returns
    /// Options with the default minimum pair count (2) and merge cap.
    pub fn new(vocab_size: usize) -> Self {
        Self {
            vocab_size,
            min_pair_count: 2,
            max_merges: None,
        }
    }

    /// Sets the target vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Sets the minimum pair frequency for a merge to be accepted.
    pub fn with_min_pair_count(
        self,
        min_pair_count: usize,
    ) -> Self {
        Self {
            min_pair_count,
            ..self
        }
    }

    /// Sets the hard cap on accepted merges.
    pub fn with_max_merges(
        self,
        max_merges: usize,
    ) -> Self {
        Self {
            max_merges: Some(max_merges),
            ..self
        }
    }

    /// The effective merge cap.
    pub fn merge_cap(&self) -> usize {
        self.max_merges
            .unwrap_or_else(|| self.vocab_size.saturating_sub(256))
    }

    /// Initializes a [`ByteBpeTrainer`] from these options.
    pub fn init<T: TokenType>(self) -> ByteBpeTrainer<T> {
        ByteBpeTrainer::new(self)
    }
}

/// Info about a [`Pair`] that could be merged.
#[derive(Debug, Eq)]
pub struct MergeJob<T: TokenType, C: CountType> {
    /// The number of occurrences of this pair in the corpus.
    pub count: C,

    /// The pair to merge.
    pub pair: Pair<T>,

    /// The concatenated byte content of the pair.
    pub merged_bytes: Vec<u8>,

    /// Indices of documents that may contain this pair.
    pub doc_indices: RbHashSet<usize>,
}

impl<T: TokenType, C: CountType> MergeJob<T, C> {
    /// The job key.
    ///
    /// Max-heap by count; ties break to the lexicographically smallest
    /// merged byte content, then to the smallest id pair. Ids are assigned
    /// in acceptance order, so the whole order is reproducible across runs.
    fn heap_key(&self) -> (C, Reverse<&[u8]>, Reverse<Pair<T>>) {
        (
            self.count,
            Reverse(self.merged_bytes.as_slice()),
            Reverse(self.pair),
        )
    }
}

impl<T: TokenType, C: CountType> PartialEq for MergeJob<T, C> {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.heap_key() == other.heap_key()
    }
}

impl<T: TokenType, C: CountType> PartialOrd for MergeJob<T, C> {
    fn partial_cmp(
        &self,
        other: &Self,
    ) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: TokenType, C: CountType> Ord for MergeJob<T, C> {
    fn cmp(
        &self,
        other: &Self,
    ) -> Ordering {
        self.heap_key().cmp(&other.heap_key())
    }
}

/// A single accepted merge: `a` then `b` rewrites to `merged`.
///
/// The rank of a rule is its index in the accepted list, and
/// `merged` is always `256 + rank`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRule<T: TokenType> {
    /// The left token.
    pub a: T,

    /// The right token.
    pub b: T,

    /// The merged token.
    pub merged: T,
}

/// A trained byte-level BPE vocabulary and its merge history.
#[derive(Debug, Clone)]
pub struct TrainedByteBpe<T: TokenType> {
    table: TokenTable<T>,
    merges: Vec<MergeRule<T>>,
}

impl<T: TokenType> TrainedByteBpe<T> {
    /// The token table (vocabulary).
    pub fn token_table(&self) -> &TokenTable<T> {
        &self.table
    }

    /// The accepted merges, in acceptance order.
    pub fn merge_rules(&self) -> &[MergeRule<T>] {
        &self.merges
    }

    /// The final vocabulary size: 256 + the number of accepted merges.
    pub fn vocab_size(&self) -> usize {
        self.table.len()
    }

    /// The byte contents of a merge rule: `(a bytes, b bytes)`.
    pub fn rule_bytes(
        &self,
        rule: &MergeRule<T>,
    ) -> (&[u8], &[u8]) {
        (self.table.bytes(rule.a), self.table.bytes(rule.b))
    }
}

/// Trainer for learning a byte-level BPE vocabulary.
///
/// Owns the corpus for the duration of the run: documents are rewritten in
/// place once per accepted merge, and discarded when training ends. A merge
/// step fully completes (count update, selection, rewrite, vocabulary
/// insert) before the next step observes the corpus.
///
/// # Parameters
/// * `T` - the token id type.
pub struct ByteBpeTrainer<T = u32>
where
    T: TokenType,
{
    /// Trainer options.
    pub options: ByteBpeTrainerOptions,

    corpus: Vec<TokenDocBuf<T>>,
}

impl<T: TokenType> ByteBpeTrainer<T> {
    /// Initializes a [`ByteBpeTrainer`].
    ///
    /// ## Arguments
    /// * `options` - the trainer options.
    pub fn new(options: ByteBpeTrainerOptions) -> Self {
        Self {
            options,
            corpus: Vec::new(),
        }
    }

    /// Add one document from raw bytes.
    ///
    /// The document becomes one single-byte token per input byte.
    pub fn push_document<B: AsRef<[u8]>>(
        &mut self,
        bytes: B,
    ) {
        self.corpus.push(TokenDocBuf::from_bytes(bytes));
    }

    /// Add documents from an iterator of byte buffers.
    pub fn update_from_documents<I>(
        &mut self,
        docs: I,
    ) where
        I: IntoIterator,
        I::Item: AsRef<[u8]>,
    {
        for doc in docs {
            self.push_document(doc);
        }
    }

    /// The number of corpus documents.
    pub fn document_count(&self) -> usize {
        self.corpus.len()
    }

    /// Train, consuming the trainer and its corpus.
    ///
    /// Training ends at the first of: the vocab size target, the merge cap,
    /// no pairs remaining, the best pair falling below the minimum count,
    /// or a merged token colliding with existing vocabulary content. None
    /// of these are errors; the result holds whatever was learned.
    ///
    /// # Parameters
    /// * `C` - the pair count type.
    ///
    /// ## Returns
    /// The trained vocabulary and merge history.
    pub fn train<C: CountType>(mut self) -> RbResult<TrainedByteBpe<T>> {
        check_vocab_capacity::<T>(self.options.vocab_size)?;

        let vocab_size = self.options.vocab_size;
        let merge_cap = self.options.merge_cap();

        // Pair counts fit in C, so a minimum beyond C::max() can never
        // be met; saturate rather than fail.
        let min_count =
            C::from_usize(self.options.min_pair_count).unwrap_or_else(C::max_value);

        let mut table = TokenTable::<T>::new();
        let mut merges: Vec<MergeRule<T>> = Vec::new();

        log::info!(
            "Training byte BPE: target vocab {}, merge cap {}, {} documents",
            vocab_size,
            merge_cap,
            self.corpus.len()
        );

        let PairDocIndex {
            mut pair_counts,
            pair_docs,
        } = PairDocIndex::<T, C>::from_documents(&self.corpus);

        let zero = C::zero();
        let one = C::one();

        log::info!("Building heap with {} unique pairs", pair_counts.len());
        let mut heap = OctonaryHeap::with_capacity(pair_counts.len());
        for (pair, doc_indices) in pair_docs {
            let count = *pair_counts.get(&pair).unwrap_or(&zero);
            if count > zero {
                heap.push(MergeJob {
                    count,
                    merged_bytes: table.pair_bytes(pair),
                    pair,
                    doc_indices,
                });
            }
        }

        let mut last_log_percent = 0;

        while table.len() < vocab_size && merges.len() < merge_cap {
            let Some(mut job) = heap.pop() else {
                log::info!("No pairs remain; stopping at vocab size {}", table.len());
                break;
            };

            {
                // Lazy refresh of stale counts.
                let current = *pair_counts.get(&job.pair).unwrap_or(&zero);
                if job.count != current {
                    job.count = current;
                    if job.count > zero {
                        heap.push(job);
                    }
                    continue;
                }
            }

            if job.count == zero {
                log::info!(
                    "No live pairs remain; stopping at vocab size {}",
                    table.len()
                );
                break;
            }

            if job.count < min_count {
                log::info!(
                    "Best pair frequency {} is below the minimum {}; stopping at vocab size {}",
                    job.count,
                    self.options.min_pair_count,
                    table.len()
                );
                break;
            }

            // Collision guard: a merged token that already exists would
            // break vocabulary bijectivity.
            let Some(new_token) = table.try_insert(job.merged_bytes.clone()) else {
                log::warn!(
                    "Merged token \"{}\" already in vocabulary; stopping at vocab size {}",
                    render_token_escaped(&job.merged_bytes),
                    table.len()
                );
                break;
            };

            merges.push(MergeRule {
                a: job.pair.0,
                b: job.pair.1,
                merged: new_token,
            });

            // Merge this pair in every document where it may occur,
            // adjusting the global counts from the per-site deltas.
            let mut new_pair_docs: PairDocMap<T> = RbHashMap::default();
            for &doc_idx in &job.doc_indices {
                self.corpus[doc_idx].merge_pair_cb(job.pair, new_token, &mut |pair, delta| {
                    if delta < 0 {
                        *pair_counts.entry(pair).or_default() -= one;
                    } else {
                        *pair_counts.entry(pair).or_default() += one;
                        new_pair_docs.entry(pair).or_default().insert(doc_idx);
                    }
                });
            }

            // These all contain the new token and are not yet in the heap.
            for (pair, doc_indices) in new_pair_docs {
                let count = *pair_counts.get(&pair).unwrap_or(&zero);
                if count > zero {
                    heap.push(MergeJob {
                        count,
                        merged_bytes: table.pair_bytes(pair),
                        pair,
                        doc_indices,
                    });
                }
            }

            log::debug!(
                "merge {}: \"{}\" + \"{}\" -> {} (frequency {})",
                merges.len() - 1,
                render_token_escaped(table.bytes(job.pair.0)),
                render_token_escaped(table.bytes(job.pair.1)),
                new_token,
                job.count
            );

            // Log progress every 1%.
            let current_percent = (merges.len() * 100) / merge_cap;
            if current_percent > last_log_percent {
                log::info!(
                    "Progress: {}% ({}/{} merges)",
                    current_percent,
                    merges.len(),
                    merge_cap
                );
                last_log_percent = current_percent;
            }
        }

        log::info!(
            "Finished training: {} merges, vocabulary size {}",
            merges.len(),
            table.len()
        );

        Ok(TrainedByteBpe { table, merges })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trainer_options() {
        let options = ByteBpeTrainerOptions::new(1000);

        assert_eq!(options.vocab_size, 1000);
        assert_eq!(options.min_pair_count, 2);
        assert_eq!(options.merge_cap(), 744);

        let options = options
            .with_vocab_size(2000)
            .with_min_pair_count(5)
            .with_max_merges(10);

        assert_eq!(options.vocab_size, 2000);
        assert_eq!(options.min_pair_count, 5);
        assert_eq!(options.merge_cap(), 10);
    }

    #[test]
    fn test_merge_cap_small_vocab() {
        assert_eq!(ByteBpeTrainerOptions::new(200).merge_cap(), 0);
        assert_eq!(ByteBpeTrainerOptions::new(256).merge_cap(), 0);
    }

    #[test]
    fn test_merge_job_ordering() {
        type T = u32;
        type C = u64;

        fn job(
            count: C,
            pair: Pair<T>,
            merged_bytes: &[u8],
        ) -> MergeJob<T, C> {
            MergeJob {
                count,
                pair,
                merged_bytes: merged_bytes.to_vec(),
                doc_indices: Default::default(),
            }
        }

        // Higher count wins.
        let frequent = job(3, (98, 99), b"bc");
        let rare = job(1, (97, 98), b"ab");
        assert!(frequent > rare);

        // Equal counts: lexicographically smallest merged content wins.
        let aaa = job(1, (256, 97), b"aaa");
        let ab = job(1, (97, 98), b"ab");
        assert!(aaa > ab);

        // Residual ties fall to the smallest id pair.
        let left = job(1, (97, 256), b"aab");
        let right = job(1, (256, 98), b"aab");
        assert!(left > right);

        assert_eq!(&left, &left);
        assert_ne!(&left, &right);
        assert_eq!(left.cmp(&left), Ordering::Equal);
        assert_eq!(left.partial_cmp(&right), Some(Ordering::Greater));
    }

    #[test]
    fn test_train_example_aaab() {
        // "aaab": (a,a) has frequency 2; merge to "aa"; then (aa,a) and
        // (a,b) tie at 1, and "aaa" < "ab" wins the tie.
        let mut trainer: ByteBpeTrainer<u32> = ByteBpeTrainerOptions::new(258)
            .with_min_pair_count(1)
            .init();
        trainer.push_document(b"aaab");

        let trained = trainer.train::<u64>().unwrap();

        assert_eq!(trained.vocab_size(), 258);
        assert_eq!(
            trained.merge_rules(),
            &[
                MergeRule {
                    a: 97,
                    b: 97,
                    merged: 256
                },
                MergeRule {
                    a: 256,
                    b: 97,
                    merged: 257
                },
            ]
        );
        assert_eq!(trained.token_table().bytes(256), b"aa");
        assert_eq!(trained.token_table().bytes(257), b"aaa");
    }

    #[test]
    fn test_train_stops_when_no_pairs_remain() {
        // Two "ab" documents: (a,b) has frequency 2, merges everywhere,
        // and no pairs remain.
        let mut trainer: ByteBpeTrainer<u32> = ByteBpeTrainerOptions::new(512).init();
        trainer.update_from_documents([b"ab", b"ab"]);

        let trained = trainer.train::<u64>().unwrap();

        assert_eq!(trained.vocab_size(), 257);
        assert_eq!(
            trained.merge_rules(),
            &[MergeRule {
                a: 97,
                b: 98,
                merged: 256
            }]
        );
    }

    #[test]
    fn test_train_min_pair_count_stop() {
        // Best pair reaches frequency 4 < 5: zero merges accepted.
        let mut trainer: ByteBpeTrainer<u32> = ByteBpeTrainerOptions::new(512)
            .with_min_pair_count(5)
            .init();
        trainer.push_document(b"abababab");

        let trained = trainer.train::<u64>().unwrap();

        assert_eq!(trained.vocab_size(), 256);
        assert!(trained.merge_rules().is_empty());
    }

    #[test]
    fn test_train_empty_corpus() {
        let trainer: ByteBpeTrainer<u32> = ByteBpeTrainerOptions::new(512).init();
        let trained = trainer.train::<u64>().unwrap();
        assert_eq!(trained.vocab_size(), 256);
    }

    #[test]
    fn test_train_small_vocab_trains_nothing() {
        let mut trainer: ByteBpeTrainer<u32> = ByteBpeTrainerOptions::new(200).init();
        trainer.push_document(b"aaaa");
        let trained = trainer.train::<u64>().unwrap();
        assert_eq!(trained.vocab_size(), 256);
    }

    #[test]
    fn test_train_vocab_capacity_overflow() {
        let trainer: ByteBpeTrainer<u16> = ByteBpeTrainerOptions::new(100_000).init();
        assert!(trainer.train::<u64>().is_err());
    }
}
