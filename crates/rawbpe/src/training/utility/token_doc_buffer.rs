//! # Token Document Buffer

use crate::types::{Pair, TokenType};
use crate::vocab::TokenTable;

/// A mutable token sequence for one corpus document.
///
/// Starts as one single-byte token per input byte, and is iteratively
/// rewritten during BPE vocabulary training. Flattening the tokens back to
/// bytes reproduces the document's original content at every step.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenDocBuf<T: TokenType> {
    tokens: Vec<T>,
}

impl<T: TokenType> TokenDocBuf<T> {
    const DEC: i32 = -1;
    const INC: i32 = 1;

    /// Create a document of single-byte tokens, one per input byte.
    pub fn from_bytes<B: AsRef<[u8]>>(bytes: B) -> Self {
        Self {
            tokens: bytes
                .as_ref()
                .iter()
                .map(|&b| T::from_u8(b).unwrap())
                .collect(),
        }
    }

    /// Create a document from existing tokens.
    pub fn from_tokens<S: AsRef<[T]>>(tokens: S) -> Self {
        Self {
            tokens: tokens.as_ref().to_vec(),
        }
    }

    /// View the tokens as a slice.
    pub fn tokens(&self) -> &[T] {
        &self.tokens
    }

    /// Get the length of the document, in tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Is this document empty?
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Get an iterator over adjacent [`Pair<T>`] windows of this document.
    pub fn pairs(&self) -> impl Iterator<Item = Pair<T>> + '_ {
        self.tokens.windows(2).map(|w| (w[0], w[1]))
    }

    /// Flatten the current tokens back to the original byte content.
    ///
    /// ## Arguments
    /// * `table` - the token table interning this document's tokens.
    pub fn flatten_bytes(
        &self,
        table: &TokenTable<T>,
    ) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.tokens.len());
        for &token in &self.tokens {
            bytes.extend_from_slice(table.bytes(token));
        }
        bytes
    }

    /// Merge all non-overlapping occurrences of `pair -> replacement`.
    ///
    /// One greedy left-to-right pass: at each position, if the current and
    /// next tokens equal the pair, the replacement is emitted and the scan
    /// advances by two; otherwise the current token is emitted. A run of
    /// consecutive matching slots collapses per this single pass, not to an
    /// optimal packing.
    ///
    /// ## Arguments
    /// * `pair` - the pair to merge.
    /// * `replacement` - the token to replace `pair` with.
    /// * `on_merge` - a callback invoked for each incremental pair delta:
    ///   - `pair` - the affected adjacent pair.
    ///   - `delta` - `+1` for an added pair, `-1` for a removed pair.
    ///
    /// ## Returns
    /// The number of merge sites found; the token count decreases by
    /// exactly this much.
    pub fn merge_pair_cb<F>(
        &mut self,
        pair: Pair<T>,
        replacement: T,
        on_merge: &mut F,
    ) -> usize
    where
        F: FnMut(Pair<T>, i32),
    {
        let (a, b) = pair;
        let n = self.tokens.len();

        if n < 2 {
            // Single-token documents have no pairs to merge.
            return 0;
        }

        let mut new_tokens: Vec<T> = Vec::with_capacity(n);
        let mut sites = 0;

        let mut i = 0;
        while i < n {
            let current = self.tokens[i];

            if i + 1 < n && pair == (current, self.tokens[i + 1]) {
                // Remove Previous Pair?
                if let Some(&x) = new_tokens.last() {
                    on_merge((x, a), Self::DEC);
                    on_merge((x, replacement), Self::INC);
                }

                // Remove Current Pair.
                on_merge(pair, Self::DEC);

                // Remove Next Pair?
                if i + 2 < n {
                    let y = self.tokens[i + 2];
                    on_merge((b, y), Self::DEC);
                    on_merge((replacement, y), Self::INC);
                }

                new_tokens.push(replacement);
                sites += 1;

                // Skip 'a' and 'b'.
                i += 2;
            } else {
                new_tokens.push(current);
                i += 1;
            }
        }

        self.tokens = new_tokens;
        sites
    }

    /// Merge all non-overlapping occurrences of `pair -> replacement`.
    ///
    /// ## Arguments
    /// * `pair` - the pair to merge.
    /// * `replacement` - the token to replace `pair` with.
    ///
    /// ## Returns
    /// a delta list of pair count deltas for this document:
    /// * `(Pair, +1)` - for each instance of an added `Pair`.
    /// * `(Pair, -1)` - for each instance of a removed `Pair`.
    pub fn merge_pair(
        &mut self,
        pair: Pair<T>,
        replacement: T,
    ) -> Vec<(Pair<T>, i32)> {
        let mut deltas: Vec<(Pair<T>, i32)> = Vec::with_capacity(6);
        self.merge_pair_cb(pair, replacement, &mut |p, d| deltas.push((p, d)));
        deltas
    }
}
