//! # Interned Token Table

use crate::errors::{RawBpeError, RbResult};
use crate::types::{Pair, RbHashMap, TokenType};

/// Check that `vocab_size` token ids fit in `T`.
///
/// ## Arguments
/// * `vocab_size` - the requested maximum vocabulary size.
///
/// ## Returns
/// `Ok(())`, or [`RawBpeError::VocabSizeOverflow`] when the largest id
/// (`vocab_size - 1`) does not fit in `T`.
pub fn check_vocab_capacity<T: TokenType>(vocab_size: usize) -> RbResult<()> {
    if vocab_size > 0 && T::from_usize(vocab_size - 1).is_none() {
        return Err(RawBpeError::VocabSizeOverflow { size: vocab_size });
    }
    Ok(())
}

/// Interned token content table.
///
/// Ids `0..=255` are the single-byte tokens, in byte order; later ids are
/// dense and assigned in insertion order. Token content is unique: equal
/// byte sequences intern to one id, so pairs key and compare in O(1)
/// regardless of token length.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenTable<T: TokenType> {
    /// Token content, indexed by id.
    token_bytes: Vec<Box<[u8]>>,

    /// Content to id map.
    byte_tokens: RbHashMap<Box<[u8]>, T>,
}

impl<T: TokenType> Default for TokenTable<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TokenType> TokenTable<T> {
    /// Create a table seeded with the 256 single-byte tokens.
    pub fn new() -> Self {
        let token_bytes: Vec<Box<[u8]>> = (0..=255u8)
            .map(|b| vec![b].into_boxed_slice())
            .collect();

        let byte_tokens: RbHashMap<Box<[u8]>, T> = token_bytes
            .iter()
            .enumerate()
            .map(|(id, bytes)| (bytes.clone(), T::from_usize(id).unwrap()))
            .collect();

        Self {
            token_bytes,
            byte_tokens,
        }
    }

    /// Get the number of tokens in the table.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.token_bytes.len()
    }

    /// Get the byte content of a token.
    ///
    /// ## Panics
    /// Panics if the token id is not in the table.
    #[inline(always)]
    pub fn bytes(
        &self,
        token: T,
    ) -> &[u8] {
        &self.token_bytes[token.to_usize().unwrap()]
    }

    /// Get the byte content of a token, if the id is in the table.
    pub fn get_bytes(
        &self,
        token: T,
    ) -> Option<&[u8]> {
        self.token_bytes
            .get(token.to_usize()?)
            .map(|bytes| bytes.as_ref())
    }

    /// Get the token id for exact byte content, if interned.
    pub fn get_token(
        &self,
        bytes: &[u8],
    ) -> Option<T> {
        self.byte_tokens.get(bytes).copied()
    }

    /// Does the table contain this content?
    pub fn contains(
        &self,
        bytes: &[u8],
    ) -> bool {
        self.byte_tokens.contains_key(bytes)
    }

    /// Get the concatenated byte content of a pair.
    pub fn pair_bytes(
        &self,
        pair: Pair<T>,
    ) -> Vec<u8> {
        let (a, b) = pair;
        let mut bytes = self.bytes(a).to_vec();
        bytes.extend_from_slice(self.bytes(b));
        bytes
    }

    /// Intern new content with the next sequential id.
    ///
    /// ## Arguments
    /// * `bytes` - the token content to intern.
    ///
    /// ## Returns
    /// The assigned id, or `None` when the content already exists
    /// (the collision guard for the training loop).
    pub fn try_insert(
        &mut self,
        bytes: Vec<u8>,
    ) -> Option<T> {
        if self.byte_tokens.contains_key(bytes.as_slice()) {
            return None;
        }

        let token = T::from_usize(self.token_bytes.len())?;
        let bytes = bytes.into_boxed_slice();
        self.token_bytes.push(bytes.clone());
        self.byte_tokens.insert(bytes, token);
        Some(token)
    }

    /// Get an id-ordered iterator over `(content, id)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], T)> {
        self.token_bytes
            .iter()
            .enumerate()
            .map(|(id, bytes)| (bytes.as_ref(), T::from_usize(id).unwrap()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_table_seed() {
        type T = u32;
        let table: TokenTable<T> = TokenTable::new();

        assert_eq!(table.len(), 256);

        for id in 0..256 {
            let byte = id as u8;
            let token = id as u32;

            assert_eq!(table.bytes(token), &[byte]);
            assert_eq!(table.get_token(&[byte]), Some(token));
        }

        assert_eq!(table.get_bytes(256), None);
        assert_eq!(table.get_token(b"ab"), None);
        assert!(!table.contains(b"ab"));
    }

    #[test]
    fn test_token_table_insert() {
        type T = u32;
        let mut table: TokenTable<T> = TokenTable::default();

        assert_eq!(table.try_insert(b"ab".to_vec()), Some(256));
        assert_eq!(table.try_insert(b"abc".to_vec()), Some(257));

        // Duplicate content is refused.
        assert_eq!(table.try_insert(b"ab".to_vec()), None);
        assert_eq!(table.try_insert(b"a".to_vec()), None);

        assert_eq!(table.len(), 258);
        assert_eq!(table.bytes(256), b"ab");
        assert_eq!(table.get_token(b"abc"), Some(257));

        assert_eq!(table.pair_bytes((256, 257)), b"ababc".to_vec());
        assert_eq!(table.pair_bytes((97, 98)), b"ab".to_vec());
    }

    #[test]
    fn test_token_table_iter_order() {
        type T = u32;
        let mut table: TokenTable<T> = TokenTable::new();
        table.try_insert(b"th".to_vec()).unwrap();
        table.try_insert(b"the".to_vec()).unwrap();

        let entries: Vec<(&[u8], T)> = table.iter().collect();
        assert_eq!(entries.len(), 258);
        assert_eq!(entries[0], (&[0u8][..], 0));
        assert_eq!(entries[255], (&[255u8][..], 255));
        assert_eq!(entries[256], (&b"th"[..], 256));
        assert_eq!(entries[257], (&b"the"[..], 257));
    }

    #[test]
    fn test_check_vocab_capacity() {
        assert!(check_vocab_capacity::<u16>(65536).is_ok());
        assert!(check_vocab_capacity::<u16>(65537).is_err());
        assert!(check_vocab_capacity::<u32>(100_000).is_ok());
        assert!(check_vocab_capacity::<u8>(256).is_ok());
        assert!(check_vocab_capacity::<u8>(257).is_err());
    }
}
