//! # Pair / Document Index

use crate::training::CountType;
use crate::training::utility::token_doc_buffer::TokenDocBuf;
use crate::types::{Pair, RbHashMap, RbHashSet, TokenType};

/// A map from [`Pair`] to its corpus-wide occurrence count.
pub type PairCountMap<T, C> = RbHashMap<Pair<T>, C>;

/// A map from [`Pair`] to the indices of documents that may contain it.
pub type PairDocMap<T> = RbHashMap<Pair<T>, RbHashSet<usize>>;

/// Adjacent-pair statistics over a corpus of [`TokenDocBuf`]s.
///
/// The full-scan build runs once at the start of training; afterwards the
/// counts are maintained incrementally from per-merge-site deltas, so the
/// corpus is never rescanned.
#[derive(Debug, Clone, Default)]
pub struct PairDocIndex<T: TokenType, C: CountType> {
    /// A map from [`Pair`] to its occurrence count across all documents.
    pub pair_counts: PairCountMap<T, C>,

    /// A map from [`Pair`] to document indices.
    pub pair_docs: PairDocMap<T>,
}

impl<T: TokenType, C: CountType> PairDocIndex<T, C> {
    /// True if no document contributes any pair.
    pub fn is_empty(&self) -> bool {
        self.pair_counts.is_empty()
    }

    fn scan_document(
        &mut self,
        index: usize,
        doc: &TokenDocBuf<T>,
    ) {
        for p in doc.pairs() {
            *self.pair_counts.entry(p).or_default() += C::one();
            self.pair_docs.entry(p).or_default().insert(index);
        }
    }

    fn merge_from(
        mut self,
        other: Self,
    ) -> Self {
        for (p, c) in other.pair_counts {
            *self.pair_counts.entry(p).or_default() += c;
        }
        for (p, docs) in other.pair_docs {
            self.pair_docs.entry(p).or_default().extend(docs);
        }
        self
    }

    /// Build a [`PairDocIndex`] from a full scan of the corpus.
    ///
    /// Documents with fewer than two tokens contribute nothing; an empty
    /// result means no pairs exist anywhere.
    ///
    /// The corpus is never mutated; the scan fans out per document and the
    /// disjoint partial indexes are reduced into one.
    #[cfg(feature = "rayon")]
    pub fn from_documents(docs: &[TokenDocBuf<T>]) -> Self {
        use rayon::prelude::*;

        docs.par_iter()
            .enumerate()
            .fold(Self::default, |mut index, (i, doc)| {
                index.scan_document(i, doc);
                index
            })
            .reduce(Self::default, Self::merge_from)
    }

    /// Build a [`PairDocIndex`] from a full scan of the corpus.
    ///
    /// Documents with fewer than two tokens contribute nothing; an empty
    /// result means no pairs exist anywhere.
    #[cfg(not(feature = "rayon"))]
    pub fn from_documents(docs: &[TokenDocBuf<T>]) -> Self {
        let mut index = Self::default();
        for (i, doc) in docs.iter().enumerate() {
            index.scan_document(i, doc);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_index_token_u32_count_u64() {
        test_pair_index::<u32, u64>();
    }

    #[test]
    fn test_pair_index_token_u16_count_i32() {
        test_pair_index::<u16, i32>();
    }

    fn test_pair_index<T: TokenType, C: CountType>() {
        let docs: Vec<TokenDocBuf<T>> = vec![
            TokenDocBuf::from_bytes(b"hello"),
            TokenDocBuf::from_bytes(b"world"),
            TokenDocBuf::from_bytes(b"help"),
            TokenDocBuf::from_bytes(b"x"),
        ];

        let PairDocIndex {
            pair_counts,
            pair_docs,
        } = PairDocIndex::<T, C>::from_documents(&docs);

        assert_eq!(
            pair_counts,
            [
                (('h', 'e'), 2), // [he]llo, [he]lp
                (('e', 'l'), 2), // h[el]lo, h[el]p
                (('l', 'l'), 1), // he[ll]o
                (('l', 'o'), 1), // hel[lo]
                (('w', 'o'), 1),
                (('o', 'r'), 1),
                (('r', 'l'), 1),
                (('l', 'd'), 1),
                (('l', 'p'), 1), // he[lp]
            ]
            .into_iter()
            .map(|((a, b), c)| {
                (
                    (T::from_u8(a as u8).unwrap(), T::from_u8(b as u8).unwrap()),
                    C::from_u32(c).unwrap(),
                )
            })
            .collect::<PairCountMap<T, C>>()
        );

        assert_eq!(
            pair_docs,
            [
                (('h', 'e'), vec![0, 2]),
                (('e', 'l'), vec![0, 2]),
                (('l', 'l'), vec![0]),
                (('l', 'o'), vec![0]),
                (('w', 'o'), vec![1]),
                (('o', 'r'), vec![1]),
                (('r', 'l'), vec![1]),
                (('l', 'd'), vec![1]),
                (('l', 'p'), vec![2]),
            ]
            .into_iter()
            .map(|((a, b), s)| {
                (
                    (T::from_u8(a as u8).unwrap(), T::from_u8(b as u8).unwrap()),
                    RbHashSet::from_iter(s),
                )
            })
            .collect::<PairDocMap<T>>()
        );
    }

    #[test]
    fn test_pair_index_empty_corpus() {
        let docs: Vec<TokenDocBuf<u32>> = vec![
            TokenDocBuf::from_bytes(b""),
            TokenDocBuf::from_bytes(b"q"),
        ];
        let index = PairDocIndex::<u32, u64>::from_documents(&docs);
        assert!(index.is_empty());
    }
}
