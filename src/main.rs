//! Lanai - command-line entrypoint.
//!
//! Loads tab-separated key/value files into a Lanai Trie and answers exact and
//! prefix queries against them. Also validates and generates configuration files.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use lanai_lib::config::{self, ConfigLoader, LanaiConfig, LogConfig};
use lanai_lib::data_structures::lanai_trie::LanaiTrieConfig;
use lanai_lib::error::{
    report_error, set_error_reporter, ErrorContext, LanaiError, LanaiResult, TracingErrorReporter,
};
use lanai_lib::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for Lanai.
#[derive(Parser, Debug)]
#[clap(name = "lanai", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Load a key<TAB>value file and query it
    Query {
        /// Tab-separated input file
        #[clap(short, long, value_parser)]
        input: PathBuf,

        /// Look up a single key
        #[clap(short, long, conflicts_with = "prefix")]
        key: Option<String>,

        /// Enumerate every key starting with this prefix
        #[clap(short, long)]
        prefix: Option<String>,

        /// Skip keys longer than this many bytes
        #[clap(short, long)]
        max_key_len: Option<usize>,

        /// Print results as JSON
        #[clap(long)]
        json: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Initialize the logging system.
///
/// `RUST_LOG` takes precedence over the configured level. Logs go to stderr so
/// query output on stdout stays machine readable.
fn init_logging(log: &LogConfig) -> LanaiResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_file(log.source_location)
        .with_line_number(log.source_location);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };
    result.map_err(|e| LanaiError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

fn run_query(
    config: &LanaiConfig,
    input: PathBuf,
    key: Option<String>,
    prefix: Option<String>,
    max_key_len: Option<usize>,
    json: bool,
) -> LanaiResult<()> {
    let file = File::open(&input)?;
    let trie = query::load_entries(BufReader::new(file), LanaiTrieConfig::from(&config.trie))?;
    info!(input = %input.display(), keys = trie.len(), "Index built");

    let entries = match key {
        Some(key) => query::lookup(&trie, &key).into_iter().collect(),
        None => {
            let prefix = prefix.unwrap_or_default();
            let ceiling = max_key_len.unwrap_or_else(|| trie.max_key_len_added());
            query::prefix_entries(&trie, &prefix, ceiling)?
        }
    };

    let rendered = if json {
        query::render_json(&entries)?
    } else {
        query::render_plain(&entries)
    };
    print!("{rendered}");
    if json {
        println!();
    }
    Ok(())
}

fn run(args: Args, config: LanaiConfig) -> LanaiResult<()> {
    match args.command {
        Command::Query {
            input,
            key,
            prefix,
            max_key_len,
            json,
        } => run_query(&config, input, key, prefix, max_key_len, json),
        Command::Validate => {
            info!(config = ?args.config, "Configuration validated successfully");
            Ok(())
        }
        Command::GenConfig { output } => {
            if let Some(parent) = output.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&output, LanaiConfig::default().to_toml()?)?;
            info!("Default configuration written to {:?}", output);
            Ok(())
        }
    }
}

/// Main entry point for the application.
fn main() {
    let args = Args::parse();

    let loaded = ConfigLoader::new(args.config.as_deref(), config::ENV_PREFIX).load();
    let log = match &loaded {
        Ok(config) => config.log.clone(),
        Err(_) => LogConfig::default(),
    };
    if let Err(e) = init_logging(&log) {
        eprintln!("{e}");
        process::exit(1);
    }
    set_error_reporter(Arc::new(TracingErrorReporter));

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            report_error(
                ErrorContext::new(LanaiError::from(e), "config")
                    .with_details(format!("{:?}", args.config)),
            );
            process::exit(1);
        }
    };

    if let Err(e) = run(args, config) {
        report_error(ErrorContext::new(e, "cli"));
        process::exit(1);
    }
}
