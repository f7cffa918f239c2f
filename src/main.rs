use std::env;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use log::{info, warn};

use statemento::accounting::summary::Dashboard;
use statemento::cache::TransactionCache;
use statemento::config::StatementMapping;
use statemento::data;

const USAGE: &str = "Usage: cargo run -- <input_file_or_dir> [--mapping <mapping.json>] [--csv]";

fn main() -> Result<()> {
    env_logger::init();

    let mut input: Option<PathBuf> = None;
    let mut mapping_path: Option<PathBuf> = None;
    let mut csv_output = false;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mapping" => match args.next() {
                Some(path) => mapping_path = Some(PathBuf::from(path)),
                None => usage(),
            },
            "--csv" => csv_output = true,
            _ if input.is_none() => input = Some(PathBuf::from(&arg)),
            _ => usage(),
        }
    }

    let Some(input) = input else { usage() };

    let mapping = match mapping_path {
        Some(path) => StatementMapping::load(path)?,
        None => StatementMapping::default(),
    };

    let mut cache = TransactionCache::new(mapping);

    // a directory means "show the most recent statement in it"
    let path = if input.is_dir() {
        match cache.load_all(&input)?.into_iter().next() {
            Some(latest) => latest,
            None => bail!("no readable statements in {}", input.display()),
        }
    } else {
        input
    };
    info!("loading statement, path={}", path.display());

    let statement = match cache.get_or_parse(&path) {
        Ok(statement) => statement,
        Err(err) if !err.is_fatal() => {
            warn!("nothing to show, err={}", err);
            eprintln!("Nothing to show: {}", err);
            return Ok(());
        },
        Err(err) => return Err(err.into()),
    };

    if !statement.row_errors.is_empty() {
        eprintln!("Skipped {} malformed rows", statement.row_errors.len());
    }

    if csv_output {
        data::export_csv(&statement.transactions, io::stdout())?;
    } else {
        let dashboard = Dashboard::new(statement.transactions.clone());
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &dashboard)?;
        writeln!(stdout)?;
    }

    Ok(())
}

fn usage() -> ! {
    eprintln!("{}", USAGE);
    std::process::exit(1);
}
