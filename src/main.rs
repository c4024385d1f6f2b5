//! Command line front end: converts cladogram markup to Newick.
//!
//! Reads HTML from a file or stdin. With `--page` the input is a full
//! article and every top-level cladogram becomes its own tree; otherwise
//! the input is a single taxonomy fragment. Trees go to stdout one per line,
//! or to `--output`. Anomalies and skipped cladograms are logged to stderr.

use anyhow::{Context, Result, bail};
use clap::Parser;
use cladewick::convert::{Conversion, Converter};
use cladewick::newick::{NewickStyle, write_newick_file};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "cladewick", version, about = "Convert cladogram markup to Newick trees")]
struct Cli {
    /// HTML input file (reads stdin if omitted)
    input: Option<PathBuf>,

    /// Treat the input as a full article and convert every cladogram in it
    #[arg(long)]
    page: bool,

    /// Write links, images, secondary labels and uncertain branches as NHX comments
    #[arg(long)]
    nhx: bool,

    /// Keep adjacent duplicate taxa instead of merging them
    #[arg(long)]
    keep_duplicates: bool,

    /// Additional CSS class to treat as noise (repeatable)
    #[arg(long = "noise-class", value_name = "CLASS")]
    noise_classes: Vec<String>,

    /// Output file; with several trees, `name-<i>.ext` is written per tree
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();
    let html = read_input(cli.input.as_deref())?;

    let style = if cli.nhx {
        NewickStyle::Nhx
    } else {
        NewickStyle::Plain
    };
    let converter = cli
        .noise_classes
        .iter()
        .fold(Converter::new(), |converter, class| converter.with_noise_class(class.as_str()))
        .with_style(style)
        .with_collapse_duplicates(!cli.keep_duplicates);

    let conversions = if cli.page {
        let results = converter.convert_page(&html);
        if results.is_empty() {
            bail!("no cladogram found in input");
        }
        log::info!("Found {} phylogenetic trees", results.len());
        let total = results.len();
        let conversions: Vec<Conversion> = results.into_iter().filter_map(Result::ok).collect();
        if conversions.is_empty() {
            bail!("none of the {total} cladograms could be converted");
        }
        conversions
    } else {
        vec![converter.convert_html(&html).context("failed to convert taxonomy fragment")?]
    };

    for (i, conversion) in conversions.iter().enumerate() {
        for anomaly in &conversion.anomalies {
            log::info!("Tree {i}: {anomaly}");
        }
    }

    match &cli.output {
        Some(path) => write_output(path, &conversions, style),
        None => {
            for conversion in &conversions {
                println!("{}", conversion.newick);
            }
            Ok(())
        }
    }
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) => fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut html = String::new();
            io::stdin().read_to_string(&mut html).context("failed to read stdin")?;
            Ok(html)
        }
    }
}

fn write_output(path: &Path, conversions: &[Conversion], style: NewickStyle) -> Result<()> {
    if let [conversion] = conversions {
        return write_newick_file(path, std::slice::from_ref(&conversion.tree), style)
            .with_context(|| format!("failed to write {}", path.display()));
    }

    for (i, conversion) in conversions.iter().enumerate() {
        let numbered = numbered_path(path, i);
        write_newick_file(&numbered, std::slice::from_ref(&conversion.tree), style)
            .with_context(|| format!("failed to write {}", numbered.display()))?;
    }
    Ok(())
}

/// `trees.nwk` → `trees-<i>.nwk`
fn numbered_path(path: &Path, i: usize) -> PathBuf {
    let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{i}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{i}"),
    };
    path.with_file_name(name)
}
