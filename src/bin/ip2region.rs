//! ip2region: look up IPv4 addresses in a region index from the command line.

use clap::{Parser, Subcommand};
use ip2region::{RegionInfo, RegionSearcher, SearchAlgorithm, SearcherConfig};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ip2region")]
#[command(author = "Kaitu.io")]
#[command(version = "0.1.0")]
#[command(about = "Resolve IPv4 addresses to regions using an ip2region index", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one or more addresses (read from stdin when none are given)
    Search {
        /// IPv4 addresses in dotted-quad form
        ips: Vec<String>,

        /// Index file (overrides the config file)
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// Search algorithm: memory, binary or btree
        #[arg(short, long)]
        algorithm: Option<String>,

        /// YAML or JSON searcher config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },

    /// Print index layout statistics
    Info {
        /// Index file (overrides the config file)
        #[arg(short, long)]
        db: Option<PathBuf>,

        /// YAML or JSON searcher config
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Serialize)]
struct SearchOutput<'a> {
    ip: &'a str,
    #[serde(flatten)]
    region: Option<RegionInfo>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Search {
            ips,
            db,
            algorithm,
            config,
            json,
        } => search(ips, db, algorithm, config, json),
        Commands::Info { db, config, json } => info(db, config, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(
    db: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<SearcherConfig, Box<dyn std::error::Error>> {
    let mut searcher_config = match config {
        Some(path) => SearcherConfig::load(&path)?,
        None => SearcherConfig::default(),
    };
    if let Some(db) = db {
        searcher_config.path = db;
    }
    Ok(searcher_config)
}

fn search(
    ips: Vec<String>,
    db: Option<PathBuf>,
    algorithm: Option<String>,
    config: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut searcher_config = load_config(db, config)?;
    if let Some(name) = algorithm {
        searcher_config.algorithm = name.parse::<SearchAlgorithm>()?;
    }

    let mut searcher = RegionSearcher::from_config(&searcher_config);
    searcher.warm_up()?;

    let queries: Vec<String> = if ips.is_empty() {
        io::stdin()
            .lock()
            .lines()
            .map(|line| line.map(|l| l.trim().to_string()))
            .filter(|line| !matches!(line, Ok(l) if l.is_empty()))
            .collect::<Result<_, _>>()?
    } else {
        ips
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut failures = 0usize;

    for query in &queries {
        let region = match searcher.find(query.as_str()) {
            Ok(region) => region,
            Err(ip2region::Error::InvalidAddress(addr)) => {
                eprintln!("Skipping invalid address: {}", addr);
                failures += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if json {
            let line = serde_json::to_string(&SearchOutput { ip: query, region })?;
            writeln!(out, "{}", line)?;
        } else {
            match region {
                Some(info) => writeln!(out, "{}\t{}", query, info)?,
                None => writeln!(out, "{}\tnot found", query)?,
            }
        }
    }

    searcher.close();

    if failures > 0 {
        return Err(format!("{} of {} addresses were invalid", failures, queries.len()).into());
    }
    Ok(())
}

fn info(
    db: Option<PathBuf>,
    config: Option<PathBuf>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let searcher_config = load_config(db, config)?;
    let mut searcher = RegionSearcher::from_config(&searcher_config);
    let info = searcher.index_info()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("Index:           {:?}", searcher_config.path);
        println!("First index ptr: {}", info.first_index_ptr);
        println!("Last index ptr:  {}", info.last_index_ptr);
        println!("Index blocks:    {}", info.total_blocks);
        println!("Header entries:  {}", info.header_entries);
    }
    Ok(())
}
