use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use deptree::{
    parser::{read_lines, BatchReader, ReaderConfig},
    tree::Node,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        report(&err);
        std::process::exit(1);
    }
}

fn report(err: &anyhow::Error) {
    eprintln!("error: {err}");
    for cause in err.chain().skip(1) {
        eprintln!("  caused by: {cause}");
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Box-drawing rendering of every tree.
    Tree,
    /// One JSON object per line.
    Json,
    /// `line nodes depth leaves` per line.
    Summary,
}

#[derive(Parser, Debug)]
#[command(
    name = "deptree",
    about = "Reconstruct trees from parent-pointer lines and print them."
)]
struct Cli {
    /// File with one parent-pointer line per sentence.
    #[arg(value_name = "PARENTS")]
    parents: PathBuf,
    /// Label file aligned line by line and token by token with PARENTS.
    #[arg(long, value_name = "FILE")]
    labels: Option<PathBuf>,
    /// Output format.
    #[arg(long, value_enum, default_value_t = Format::Tree)]
    format: Format,
    /// Reconstruct lines on all cores.
    #[arg(long)]
    parallel: bool,
    /// Smallest number of lines for which --parallel takes effect.
    #[arg(long, value_name = "N", default_value_t = ReaderConfig::default().parallel_threshold)]
    parallel_threshold: usize,
    /// Report failing lines and keep going instead of stopping at the first one.
    #[arg(long)]
    lenient: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let reader = BatchReader::new(
        ReaderConfig::default()
            .with_parallel(cli.parallel)
            .with_parallel_threshold(cli.parallel_threshold),
    );

    let parent_lines = read_lines(&cli.parents)?;
    let label_lines = cli.labels.as_deref().map(read_lines).transpose()?;

    let results = reader
        .read_each(&parent_lines, label_lines.as_deref())
        .context("failed to pair parent and label lines")?;

    let results = if cli.lenient {
        results
    } else {
        results
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("failed to reconstruct {}", cli.parents.display()))?
            .into_iter()
            .map(Ok)
            .collect()
    };

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(tree) => write_tree(&mut out, cli.format, i + 1, &tree)?,
            Err(err) => report(&err.into()),
        }
    }
    out.flush().context("failed to write output")?;
    Ok(())
}

fn write_tree(out: &mut impl Write, format: Format, line: usize, tree: &Node) -> Result<()> {
    match format {
        Format::Tree => writeln!(out, "{}", tree.debug_draw())?,
        Format::Json => {
            serde_json::to_writer(&mut *out, tree).context("failed to serialize tree")?;
            writeln!(out)?;
        }
        Format::Summary => writeln!(
            out,
            "{line} {} {} {}",
            tree.len(),
            tree.depth(),
            tree.leaves().count()
        )?,
    }
    Ok(())
}
