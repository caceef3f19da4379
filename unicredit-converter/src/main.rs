//! CLI-утилита для конвертации выписок Unicredit CAMT.053 в CSV.

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use unicredit_camt::{PluginSettings, UnicreditPlugin};

/// Unicredit Converter - конвертер выписок CAMT.053 в CSV.
///
/// Если в файле выписки по нескольким счетам, нужный счет задается
/// через --account (дефисы допускаются).
#[derive(Parser)]
#[command(name = "unicredit-converter")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Входной файл CAMT.053
    #[arg(long = "input", short = 'i')]
    input: PathBuf,

    /// Выходной файл (по умолчанию stdout)
    #[arg(long = "output", short = 'o')]
    output: Option<PathBuf>,

    /// Счет, выписку по которому нужно взять из файла
    #[arg(long = "account", short = 'a', env = "UNICREDIT_ACCOUNT")]
    account: Option<String>,

    /// Подробный вывод
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &Args) -> Result<()> {
    let settings = PluginSettings {
        account: args.account.clone(),
    };
    let plugin = UnicreditPlugin::new(settings);

    let statement = plugin
        .parser(&args.input)
        .parse()
        .with_context(|| format!("failed to convert '{}'", args.input.display()))?;

    tracing::info!(
        account = %statement.summary.account_id,
        lines = statement.lines.len(),
        "writing CSV"
    );

    match &args.output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create '{}'", path.display()))?;
            statement.write_csv(&mut file)?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            statement.write_csv(&mut stdout)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}
