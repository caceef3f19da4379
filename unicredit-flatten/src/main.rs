//! CLI-утилита, печатающая все поля XML-файла в виде `путь: значение`.
//!
//! Удобна, чтобы посмотреть, какие элементы банк заполняет в выгрузке.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

/// CAMT Flatten - плоский список полей XML-файла.
#[derive(Parser)]
#[command(name = "camt-flatten")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// XML-файл
    file: PathBuf,

    /// Печатать только пути, содержащие подстроку
    #[arg(long = "filter", short = 'f')]
    filter: Option<String>,
}

fn run(args: &Args) -> Result<()> {
    let content = fs::read_to_string(&args.file)
        .with_context(|| format!("failed to read '{}'", args.file.display()))?;
    let fields = unicredit_camt::flatten(&content)
        .with_context(|| format!("failed to parse '{}'", args.file.display()))?;

    let mut out = BufWriter::new(io::stdout().lock());
    for field in fields
        .iter()
        .filter(|f| args.filter.as_deref().map_or(true, |needle| f.path.contains(needle)))
    {
        writeln!(out, "{}", field)?;
    }
    out.flush()?;

    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
