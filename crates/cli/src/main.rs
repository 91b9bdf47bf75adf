use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use buildscout::commands::{
    decode_command, extract_command, history_command, list_accounts_command,
    list_classifiers_command, scan_command, PayloadSource,
};
use buildscout::init_logging;
use scout_core::db::ScanConfig;

/// Function extraction and build-provenance decoding for on-chain programs.
///
/// This CLI is a thin wrapper around `scout-core` (exposed in code as `scout_core`).
/// All substantive logic lives in the library so it can be tested thoroughly
/// and reused from other frontends.
#[derive(Parser, Debug)]
#[command(
    name = "buildscout",
    version,
    about = "Function extraction and build-provenance decoding for on-chain programs",
    long_about = None
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract function records from a single Rust source file.
    Extract {
        /// Source file to parse.
        #[arg(long)]
        file: PathBuf,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Decode a build-provenance account payload.
    ///
    /// Exactly one of `--hex` or `--file` must be given.
    Decode {
        /// Payload as hex (optionally 0x-prefixed).
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        hex: Option<String>,

        /// File containing the raw payload bytes.
        #[arg(long)]
        file: Option<PathBuf>,

        /// Number of leading tag bytes to drop before decoding.
        #[arg(long, default_value_t = 0)]
        discriminator_len: usize,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Also store the decoded record in this SQLite database.
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Scan a local checkout: extract, classify, and write function reports.
    ///
    /// Reports are written as a JSON array to `<program-id>.json` unless
    /// `--output` is given.
    Scan {
        /// Repository checkout root. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Optional JSON/YAML file with scan settings; flags override it.
        #[arg(long)]
        config: Option<PathBuf>,

        /// On-chain program address attached to every report.
        #[arg(long, env = "PROGRAM_ID")]
        program_id: Option<String>,

        /// Repository URL attached to every report.
        #[arg(long, env = "REPO_URL")]
        repo_url: Option<String>,

        /// Workspace directory relative to the root.
        #[arg(long, env = "WORKSPACE_ROOT")]
        workspace_root: Option<String>,

        /// Classifier to apply (see `classifiers`).
        #[arg(long)]
        classifier: Option<String>,

        /// Report output path.
        #[arg(long)]
        output: Option<String>,

        /// Also store reports in this SQLite database.
        #[arg(long)]
        db: Option<String>,

        /// Emit the run summary as JSON.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List available classifiers.
    Classifiers {
        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List reports stored in a scan database.
    History {
        /// Scan database path.
        #[arg(long)]
        db: PathBuf,

        /// Only show reports for this program.
        #[arg(long)]
        program_id: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List decoded accounts stored in a scan database.
    Accounts {
        /// Scan database path.
        #[arg(long)]
        db: PathBuf,

        /// Only show records for this program address.
        #[arg(long)]
        address: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Extract { file, json } => extract_command(&file, json)?,
        Command::Decode { hex, file, discriminator_len, json, db } => {
            let source = match (hex, file) {
                (Some(hex), _) => PayloadSource::Hex(hex),
                (None, Some(file)) => PayloadSource::File(file),
                (None, None) => anyhow::bail!("Either --hex or --file is required"),
            };
            decode_command(&source, discriminator_len, json, db.as_deref())?
        }
        Command::Scan {
            root,
            config,
            program_id,
            repo_url,
            workspace_root,
            classifier,
            output,
            db,
            json,
        } => {
            let overrides =
                ScanConfig { repo_url, program_id, workspace_root, classifier, output, db };
            scan_command(&root, config.as_deref(), overrides, json)?
        }
        Command::Classifiers { json } => list_classifiers_command(json)?,
        Command::History { db, program_id, json } => {
            history_command(&db, program_id.as_deref(), json)?
        }
        Command::Accounts { db, address, json } => {
            list_accounts_command(&db, address.as_deref(), json)?
        }
    }

    Ok(())
}
