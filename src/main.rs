use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use rust_ddlparser::{parse_files, OutputMode, ParseFilesOptions, ParseOptions};

#[derive(Parser)]
#[command(name = "rust-ddlparser")]
#[command(author, version, about = "Parse SQL DDL scripts into JSON schema descriptions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse DDL files (or directories of .sql files) into JSON
    Parse {
        /// Files or directories to parse
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Group entities by kind (tables, sequences, types, ...)
        #[arg(short, long)]
        group_by_type: bool,

        /// Output shape: sql, bigquery, redshift or snowflake
        #[arg(short, long, default_value = "sql")]
        output_mode: String,

        /// Write each result to <DIR>/<file stem>_schema.json instead of stdout
        #[arg(short, long)]
        dump_dir: Option<PathBuf>,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Parse {
            files,
            group_by_type,
            output_mode,
            dump_dir,
            verbose,
        } => {
            init_tracing(verbose);

            let options = ParseFilesOptions {
                inputs: files,
                dump_dir,
                parse: ParseOptions {
                    group_by_type,
                    output_mode: OutputMode::from_name(&output_mode),
                },
            };

            let parsed = parse_files(&options)?;
            if options.dump_dir.is_none() {
                for file in &parsed {
                    println!("{}", serde_json::to_string_pretty(&file.result)?);
                }
            }
        }
    }

    Ok(())
}
