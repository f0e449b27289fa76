use anyhow::{Context, Result, bail};
use chunktree::bracket::{to_pretty_string, write_bracketed};
use chunktree::engine::parse_tagged_output;
use chunktree::{ChunkTreeConfig, ChunkTreeParser, ParseTree};
use clap::Parser;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

/// Builds trees from saved engine output, one sentence per line.
#[derive(Parser)]
#[command(name = "chunktree")]
#[command(about = "Rebuild constituency trees from chunker and entity detector output", long_about = None)]
#[command(version)]
struct Cli {
    /// Tagger output (word_TAG pairs)
    #[arg(long)]
    tags: PathBuf,

    /// Chunker output for the same sentences
    #[arg(long)]
    chunks: PathBuf,

    /// Entity detector output; repeat for several detectors, applied in order
    #[arg(long)]
    entities: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Retag punctuation leaves as PUNC
    #[arg(long)]
    punctuation: bool,

    /// Label of the sentence root (overrides config)
    #[arg(long)]
    root_label: Option<String>,

    /// Draw trees instead of printing bracket notation
    #[arg(long)]
    pretty: bool,

    /// Set log level (overridden by RUST_LOG)
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chunktree={}", cli.log_level.to_lowercase())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let mut config = match &cli.config {
        Some(path) => ChunkTreeConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ChunkTreeConfig::default(),
    };
    if cli.punctuation {
        config = config.with_punctuation_tags(true);
    }
    if let Some(label) = &cli.root_label {
        config = config.with_root_label(label.clone());
    }
    config.validate().context("Invalid configuration")?;

    let tags = read_sentences(&cli.tags)?;
    let chunks = read_sentences(&cli.chunks)?;
    ensure_same_length(&cli.chunks, chunks.len(), tags.len())?;

    let mut entities = Vec::with_capacity(cli.entities.len());
    for path in &cli.entities {
        let lines = read_sentences(path)?;
        ensure_same_length(path, lines.len(), tags.len())?;
        entities.push(lines);
    }

    let parser = ChunkTreeParser::new(config);
    let mut trees = Vec::with_capacity(tags.len());
    let mut failed = 0;

    for (i, (tagged, chunked)) in tags.iter().zip(&chunks).enumerate() {
        let detector_outputs: Vec<&str> = entities.iter().map(|lines| lines[i].as_str()).collect();
        let result = parse_tagged_output(tagged)
            .and_then(|tokens| parser.parse(&tokens, chunked, &detector_outputs));

        match result {
            Ok(tree) => trees.push(tree),
            Err(err) => {
                error!("sentence {}: {err}", i + 1);
                failed += 1;
                trees.push(ParseTree::new());
            }
        }
    }
    debug!(sentences = tags.len(), failed, "done");

    if cli.pretty {
        for tree in &trees {
            println!("{}", to_pretty_string(tree));
        }
    } else {
        write_bracketed(&mut io::stdout().lock(), &trees).context("Failed to write trees")?;
    }

    if failed > 0 {
        bail!("{failed} of {} sentences failed", tags.len());
    }

    Ok(())
}

/// Start of the timing line an engine prints after its output.
const DIAGNOSTIC_PREFIX: &str = "Execution time:";

/// Reads one sentence per line, see [split_sentences].
fn read_sentences(path: &Path) -> Result<Vec<String>> {
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(split_sentences(&text))
}

/// Splits saved engine output into sentences, one per line.
///
/// Blank lines are skipped, as are diagnostic lines following a sentence.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences: Vec<String> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() || (!sentences.is_empty() && line.starts_with(DIAGNOSTIC_PREFIX)) {
            continue;
        }
        sentences.push(line.to_string());
    }

    sentences
}

fn ensure_same_length(path: &Path, found: usize, expected: usize) -> Result<()> {
    if found != expected {
        bail!("{} has {found} sentences, expected {expected}", path.display());
    }

    Ok(())
}
