//! CLI for the bvmirror archive mirror orchestrator.

mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use bvmirror_core::config::{self, MirrorConfig};

use commands::{run_clear, run_plan, run_status, run_sync};

/// Top-level CLI for the bvmirror orchestrator.
#[derive(Debug, Parser)]
#[command(name = "bvmirror")]
#[command(about = "bvmirror: selective, incremental archive mirroring through a download daemon", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

/// Selection overrides shared by `sync` and `plan`; unset values fall back
/// to the config file.
#[derive(Debug, Args, Default)]
pub struct SelectionArgs {
    /// Restrict the run to these trading pairs (repeatable).
    #[arg(long = "pair", value_name = "SYMBOL")]
    pub pairs: Vec<String>,

    /// Restrict to symbols ending with this suffix, e.g. a quote currency (repeatable).
    #[arg(long = "keyword", value_name = "SUFFIX")]
    pub keywords: Vec<String>,

    /// Data types to mirror, e.g. klines, aggTrades, trades (repeatable).
    #[arg(long = "data-type", value_name = "TYPE")]
    pub data_types: Vec<String>,

    /// Inclusive start date, YYYY-MM or YYYY-MM-DD.
    #[arg(long, value_name = "DATE")]
    pub start_date: Option<String>,

    /// Inclusive end date, YYYY-MM or YYYY-MM-DD.
    #[arg(long, value_name = "DATE")]
    pub end_date: Option<String>,
}

impl SelectionArgs {
    /// Overlay these overrides onto the loaded config.
    pub fn apply(&self, cfg: &mut MirrorConfig) {
        if !self.pairs.is_empty() {
            cfg.trading_pairs = Some(self.pairs.clone());
        }
        if !self.keywords.is_empty() {
            cfg.key_words = Some(self.keywords.clone());
        }
        if !self.data_types.is_empty() {
            cfg.data_types = self.data_types.clone();
        }
        if self.start_date.is_some() {
            cfg.start_date = self.start_date.clone();
        }
        if self.end_date.is_some() {
            cfg.end_date = self.end_date.clone();
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Run a full mirror pass: discover, plan, and download via the daemon.
    Sync {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Dry run: print the files a sync would download, without touching the daemon.
    Plan {
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Delete all tasks from the daemon's queue.
    Clear,

    /// Show daemon version and task counts.
    Status,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Sync { selection } => {
                selection.apply(&mut cfg);
                run_sync(&cfg).await?;
            }
            CliCommand::Plan { selection } => {
                selection.apply(&mut cfg);
                run_plan(&cfg).await?;
            }
            CliCommand::Clear => run_clear(&cfg).await?,
            CliCommand::Status => run_status(&cfg).await?,
        }

        Ok(())
    }
}
