mod config;
mod display;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use justicia_core::{DocumentPair, clean, rule_checks};
use justicia_store::{AuditStore, now_rfc3339, read_document, stem_of};
use tracing::Level;

use crate::config::Settings;

const DEFAULT_OUT: &str = "data/outputs";

#[derive(Parser)]
#[command(name = "justicia", author, version, about = "Verify plain-language rewrites of Spanish judgments")]
struct Cli {
    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run only the deterministic rule checks and print them as JSON
    Check {
        #[arg(long)]
        original: PathBuf,
        #[arg(long)]
        simplified: PathBuf,
    },
    /// Verify an existing rewrite against its original
    Verify {
        #[arg(long)]
        original: PathBuf,
        #[arg(long)]
        simplified: PathBuf,
        /// Also persist the record in this directory
        #[arg(long)]
        out: Option<PathBuf>,
        /// Replace an existing record
        #[arg(long)]
        force: bool,
    },
    /// Ingest a judgment, rewrite it, verify the rewrite and persist the record
    Process {
        input: PathBuf,
        #[arg(long, default_value = DEFAULT_OUT)]
        out: PathBuf,
        /// Replace an existing record
        #[arg(long)]
        force: bool,
    },
    /// Print a stored record as a card
    Show { record: PathBuf },
    /// List stored records
    List {
        #[arg(long, default_value = DEFAULT_OUT)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
    tracing::info!("justicia v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Check {
            original,
            simplified,
        } => {
            let (original, simplified) = read_pair(&original, &simplified)?;
            let (checks, details) = rule_checks(&original, &simplified);
            let json = serde_json::json!({ "checks": checks, "details": details });
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Commands::Verify {
            original,
            simplified,
            out,
            force,
        } => {
            let source = file_name(&original);
            let stem = stem_of(&original);
            let (original, simplified) = read_pair(&original, &simplified)?;
            let verification = cli
                .settings
                .verifier()?
                .verify(&DocumentPair::new(original, simplified))
                .await;
            eprintln!("{}", display::decision_summary(&verification.decision));

            let record = verification.into_record(source, now_rfc3339());
            println!("{}", serde_json::to_string_pretty(&record)?);
            if let Some(dir) = out {
                let stem = stem.context("original file name cannot name a record")?;
                let path = AuditStore::new(dir).write(&stem, &record, force)?;
                eprintln!("record: {}", path.display());
            }
        }
        Commands::Process { input, out, force } => {
            let stem = stem_of(&input).context("input file name cannot name a record")?;
            let store = AuditStore::new(out);
            if !force && store.path_for(&stem).exists() {
                anyhow::bail!(
                    "{} already exists (use --force to replace it)",
                    store.path_for(&stem).display()
                );
            }

            let text = read_document(&input)
                .with_context(|| format!("reading {}", input.display()))?;
            let verification = cli.settings.pipeline()?.process_text(&text).await?;
            eprintln!("{}", display::decision_summary(&verification.decision));

            let record = verification.into_record(file_name(&input), now_rfc3339());
            let path = store.write(&stem, &record, force)?;
            println!("{}", serde_json::to_string_pretty(&record)?);
            eprintln!("record: {}", path.display());
        }
        Commands::Show { record } => {
            let rec = AuditStore::read(&record)?;
            print!("{}", display::record_card(&record, &rec));
        }
        Commands::List { out } => {
            let store = AuditStore::new(out);
            let paths = store.list()?;
            if paths.is_empty() {
                eprintln!("no records in {}", store.dir().display());
            }
            for path in paths {
                match AuditStore::read(&path) {
                    Ok(rec) => println!("{}", display::list_line(&path, &rec)),
                    Err(e) => println!("{:<10} {}  ({e})", "ILEGIBLE", path.display()),
                }
            }
        }
    }

    Ok(())
}

fn read_pair(original: &Path, simplified: &Path) -> anyhow::Result<(String, String)> {
    let original = read_document(original)
        .with_context(|| format!("reading {}", original.display()))?;
    let simplified = read_document(simplified)
        .with_context(|| format!("reading {}", simplified.display()))?;
    Ok((clean(&original), clean(&simplified)))
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}
