//! # Artifact Input / Output
//!
//! Readers and writers for the training artifacts:
//! * `merges.txt` - hex merge list, the canonical artifact.
//! * `vocab.json` - hex token content to id map.
//! * `merges_readable.txt` - GPT-2 unicode-rendered merge list.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::RbResult;

mod byte_unicode;
mod merges_io;
mod render;
mod vocab_json;

#[doc(inline)]
pub use byte_unicode::{byte_to_unicode, parse_token_unicode, render_token_unicode, unicode_to_byte};
#[doc(inline)]
pub use merges_io::{
    MERGES_VERSION_HEADER, READABLE_VERSION_HEADER, read_merges_txt, save_escaped_merges_path,
    save_merges_txt_path, save_readable_merges_path, write_escaped_merges, write_merges_txt,
    write_readable_merges,
};
#[doc(inline)]
pub use render::{hex_to_bytes, render_token_escaped, token_to_hex};
#[doc(inline)]
pub use vocab_json::{read_vocab_json, save_vocab_json_path, write_vocab_json};

/// Write an artifact file atomically.
///
/// The content is staged to a `.tmp` sibling and renamed over the target,
/// so readers never observe a partially written artifact.
pub(crate) fn stage_artifact<P, F>(
    path: P,
    write: F,
) -> RbResult<()>
where
    P: AsRef<Path>,
    F: FnOnce(&mut BufWriter<File>) -> RbResult<()>,
{
    let path = path.as_ref();
    let mut tmp_os = path.as_os_str().to_os_string();
    tmp_os.push(".tmp");
    let tmp_path = std::path::PathBuf::from(tmp_os);

    {
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        write(&mut writer)?;
        writer.flush()?;
    }

    std::fs::rename(&tmp_path, path)?;
    Ok(())
}
