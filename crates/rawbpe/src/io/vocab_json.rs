//! # Vocabulary JSON Reader and Writer

use std::io::{BufReader, Read, Write};
use std::path::Path;

use crate::errors::{RawBpeError, RbResult};
use crate::io::render::{hex_to_bytes, token_to_hex};
use crate::io::stage_artifact;
use crate::types::{RbHashMap, TokenType};
use crate::vocab::TokenTable;

/// Write the vocabulary as pretty-printed JSON.
///
/// Keys are the hex spelling of each token's byte content, values are the
/// token ids. Entries appear in id order, byte tokens first, then merged
/// tokens in acceptance order.
pub fn write_vocab_json<T: TokenType, W: Write>(
    table: &TokenTable<T>,
    writer: &mut W,
) -> RbResult<()> {
    let mut map = serde_json::Map::with_capacity(table.len());
    for (bytes, token) in table.iter() {
        map.insert(
            token_to_hex(bytes),
            serde_json::Value::from(token.to_u64().unwrap()),
        );
    }
    serde_json::to_writer_pretty(&mut *writer, &serde_json::Value::Object(map))?;
    writeln!(writer)?;
    Ok(())
}

/// Read a vocabulary JSON file back into a content-to-id map.
pub fn read_vocab_json<T: TokenType, R: Read>(reader: R) -> RbResult<RbHashMap<Vec<u8>, T>> {
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(reader))?;
    let object = value
        .as_object()
        .ok_or_else(|| RawBpeError::Parse("vocabulary is not a JSON object".to_string()))?;

    let mut vocab = RbHashMap::with_capacity(object.len());
    for (hex, id) in object {
        let bytes = hex_to_bytes(hex)?;
        let token = id
            .as_u64()
            .and_then(T::from_u64)
            .ok_or_else(|| RawBpeError::Parse(format!("bad token id for {hex:?}: {id}")))?;
        vocab.insert(bytes, token);
    }
    Ok(vocab)
}

/// Atomically write the vocabulary JSON to a path.
pub fn save_vocab_json_path<T: TokenType, P: AsRef<Path>>(
    table: &TokenTable<T>,
    path: P,
) -> RbResult<()> {
    stage_artifact(path, |writer| write_vocab_json(table, writer))
}
