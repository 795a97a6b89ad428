//! # Merge List Readers and Writers

use std::io::{BufRead, Write};
use std::path::Path;

use crate::errors::{RawBpeError, RbResult};
use crate::io::byte_unicode::render_token_unicode;
use crate::io::render::{hex_to_bytes, render_token_escaped, token_to_hex};
use crate::io::stage_artifact;
use crate::training::{MergeRule, TrainedByteBpe};
use crate::types::{RbHashMap, TokenType};

/// Version header of the canonical `merges.txt` artifact.
pub const MERGES_VERSION_HEADER: &str = "#version: raw-byte-bpe";

/// Version header of the `merges_readable.txt` artifact.
pub const READABLE_VERSION_HEADER: &str = "#version: gpt2-readable";

/// Write the canonical merge list.
///
/// One header line, then one line per merge in acceptance order:
/// the hex bytes of the left token, a single space, the hex bytes of
/// the right token. Byte-exact across runs on the same corpus.
pub fn write_merges_txt<T: TokenType, W: Write>(
    trained: &TrainedByteBpe<T>,
    writer: &mut W,
) -> RbResult<()> {
    writeln!(writer, "{MERGES_VERSION_HEADER}")?;
    for rule in trained.merge_rules() {
        let (a, b) = trained.rule_bytes(rule);
        writeln!(writer, "{} {}", token_to_hex(a), token_to_hex(b))?;
    }
    Ok(())
}

/// Write the human-oriented merge list.
///
/// One line per merge, both sides rendered with the GPT-2 byte-to-unicode
/// mapping. For inspection; the hex artifact is the canonical one.
pub fn write_readable_merges<T: TokenType, W: Write>(
    trained: &TrainedByteBpe<T>,
    writer: &mut W,
) -> RbResult<()> {
    writeln!(writer, "{READABLE_VERSION_HEADER}")?;
    for rule in trained.merge_rules() {
        let (a, b) = trained.rule_bytes(rule);
        writeln!(
            writer,
            "{} {}",
            render_token_unicode(a),
            render_token_unicode(b)
        )?;
    }
    Ok(())
}

/// Write the escape-ASCII merge list.
///
/// One line per merge: the hex spelling of both sides, then both sides
/// rendered with printable ASCII literal and `\n` / `\t` / `\xHH`
/// escapes. For quick visual inspection only.
pub fn write_escaped_merges<T: TokenType, W: Write>(
    trained: &TrainedByteBpe<T>,
    writer: &mut W,
) -> RbResult<()> {
    writeln!(writer, "# Human-readable merge rules")?;
    writeln!(writer, "# Format: HEX -> \"A\" + \"B\"")?;
    writeln!(writer)?;
    for rule in trained.merge_rules() {
        let (a, b) = trained.rule_bytes(rule);
        writeln!(
            writer,
            "{}   {}    ->    \"{}\" + \"{}\"",
            token_to_hex(a),
            token_to_hex(b),
            render_token_escaped(a),
            render_token_escaped(b)
        )?;
    }
    Ok(())
}

/// Atomically write the canonical merge list to a path.
pub fn save_merges_txt_path<T: TokenType, P: AsRef<Path>>(
    trained: &TrainedByteBpe<T>,
    path: P,
) -> RbResult<()> {
    stage_artifact(path, |writer| write_merges_txt(trained, writer))
}

/// Atomically write the human-oriented merge list to a path.
pub fn save_readable_merges_path<T: TokenType, P: AsRef<Path>>(
    trained: &TrainedByteBpe<T>,
    path: P,
) -> RbResult<()> {
    stage_artifact(path, |writer| write_readable_merges(trained, writer))
}

/// Atomically write the escape-ASCII merge list to a path.
pub fn save_escaped_merges_path<T: TokenType, P: AsRef<Path>>(
    trained: &TrainedByteBpe<T>,
    path: P,
) -> RbResult<()> {
    stage_artifact(path, |writer| write_escaped_merges(trained, writer))
}

/// Read a canonical merge list back into merge rules.
///
/// A hex line carries the merged token's byte content; the split between
/// the two parent tokens is not recorded in the format. Each line is
/// replayed against the growing vocabulary: the combined bytes are split
/// at the first position where both halves are already-known tokens, and
/// the concatenation becomes known under the next id.
///
/// Ids and merged contents therefore match the writing run line for line.
/// The `(a, b)` split of a returned rule is one valid derivation of that
/// content; when a line admits several valid splits (e.g. `61 61 61` from
/// either `"aa" + "a"` or `"a" + "aa"`), the first cut is taken, which is
/// deterministic but not necessarily the pair the writer merged.
pub fn read_merges_txt<T: TokenType, R: BufRead>(reader: R) -> RbResult<Vec<MergeRule<T>>> {
    let mut lines = reader.lines();

    let header = lines
        .next()
        .transpose()?
        .ok_or_else(|| RawBpeError::Parse("empty merge list".to_string()))?;
    if header.trim() != MERGES_VERSION_HEADER {
        return Err(RawBpeError::Parse(format!(
            "unexpected merge list header: {header:?}"
        )));
    }

    let mut known: RbHashMap<Vec<u8>, T> = (0..=255u8)
        .map(|b| (vec![b], T::from_u8(b).unwrap()))
        .collect();
    let mut next_id = 256usize;
    let mut rules = Vec::new();

    for (line_no, line) in lines.enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let combined = hex_to_bytes(&line)?;
        let mut split = None;
        for cut in 1..combined.len() {
            if let (Some(&a), Some(&b)) =
                (known.get(&combined[..cut]), known.get(&combined[cut..]))
            {
                split = Some((a, b));
                break;
            }
        }

        let Some((a, b)) = split else {
            return Err(RawBpeError::Parse(format!(
                "merge line {} does not split into known tokens: {line:?}",
                line_no + 2
            )));
        };

        let merged = T::from_usize(next_id).ok_or(RawBpeError::VocabSizeOverflow {
            size: next_id + 1,
        })?;
        next_id += 1;

        known.insert(combined, merged);
        rules.push(MergeRule { a, b, merged });
    }

    Ok(rules)
}
