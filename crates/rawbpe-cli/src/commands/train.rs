//! # Train Command

use std::path::Path;

use rawbpe::io::{save_merges_txt_path, save_readable_merges_path, save_vocab_json_path};
use rawbpe::training::{ByteBpeTrainer, ByteBpeTrainerOptions};

use crate::LogArgs;

/// Args for the train command.
#[derive(clap::Args, Debug)]
pub struct TrainArgs {
    /// Input files, read as raw bytes, one document each.
    #[arg(required = true)]
    files: Vec<String>,

    #[clap(flatten)]
    pub logging: LogArgs,

    /// Max vocab size, including the 256 byte tokens.
    #[arg(long, default_value = "50000")]
    vocab_size: usize,

    /// Minimum pair frequency for a merge to be accepted.
    #[arg(long, default_value = "2")]
    min_pair_count: usize,

    /// Hard cap on accepted merges.
    #[arg(long)]
    max_merges: Option<usize>,

    /// Output directory for the artifacts.
    #[arg(long, default_value = "byte_bpe")]
    out: String,

    /// Also write the GPT-2 unicode-rendered merge list.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    dump_readable: bool,
}

impl TrainArgs {
    /// Run the train command.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        let mut options =
            ByteBpeTrainerOptions::new(self.vocab_size).with_min_pair_count(self.min_pair_count);
        if let Some(max_merges) = self.max_merges {
            options = options.with_max_merges(max_merges);
        }

        let mut trainer: ByteBpeTrainer<u32> = options.init();

        log::info!("Reading documents:");
        for (idx, path) in self.files.iter().enumerate() {
            log::info!("{idx}: {path}");
            let bytes = std::fs::read(path)
                .map_err(|err| format!("failed to read {path:?}: {err}"))?;
            trainer.push_document(bytes);
        }

        log::info!("Training vocabulary...");
        let trained = trainer.train::<u64>()?;

        log::info!("Vocabulary size: {}", trained.vocab_size());

        let out_dir = Path::new(&self.out);
        std::fs::create_dir_all(out_dir)?;

        let merges_path = out_dir.join("merges.txt");
        save_merges_txt_path(&trained, &merges_path)?;
        log::info!("Wrote {}", merges_path.display());

        let vocab_path = out_dir.join("vocab.json");
        save_vocab_json_path(trained.token_table(), &vocab_path)?;
        log::info!("Wrote {}", vocab_path.display());

        if self.dump_readable {
            let readable_path = out_dir.join("merges_readable.txt");
            save_readable_merges_path(&trained, &readable_path)?;
            log::info!("Wrote {}", readable_path.display());
        }

        Ok(())
    }
}
