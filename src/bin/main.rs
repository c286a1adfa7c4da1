//! r2rml-unfold CLI - Unfold R2RML mappings to SQL
//!
//! Usage:
//!   r2rml-unfold unfold <mapping.json> [--dialect <dialect>] [--config <file>]
//!                       [--triples-map <id> [--subject <value>]] [--aliases]
//!   r2rml-unfold validate <mapping.json>
//!
//! Examples:
//!   r2rml-unfold unfold mapping.json
//!   r2rml-unfold unfold mapping.json --dialect tsql --aliases
//!   r2rml-unfold unfold mapping.json --triples-map EmployeeMap --subject http://ex.org/emp/7

use clap::{Parser, Subcommand, ValueEnum};
use r2rml_unfold::config::Settings;
use r2rml_unfold::mapping::MappingDocument;
use r2rml_unfold::sql::Dialect;
use r2rml_unfold::unfold::Unfolder;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "r2rml-unfold")]
#[command(about = "Unfold R2RML triples maps into multi-dialect SQL queries")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Unfold a mapping document to SQL
    Unfold {
        /// Path to the JSON mapping document
        file: PathBuf,

        /// SQL dialect to generate (overrides the config file)
        #[arg(short, long)]
        dialect: Option<DialectArg>,

        /// Path to a config file (defaults to the usual lookup locations)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Unfold only this triples map
        #[arg(short, long)]
        triples_map: Option<String>,

        /// Restrict the triples map to one subject value
        #[arg(short, long, requires = "triples_map")]
        subject: Option<String>,

        /// Print the alias registry as JSON after the queries
        #[arg(long)]
        aliases: bool,
    },

    /// Check that a mapping document loads and all references resolve
    Validate {
        /// Path to the JSON mapping document
        file: PathBuf,
    },
}

#[derive(Clone, ValueEnum)]
enum DialectArg {
    Postgres,
    Mysql,
    Tsql,
    Duckdb,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Tsql => Dialect::TSql,
            DialectArg::Duckdb => Dialect::DuckDb,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Unfold {
            file,
            dialect,
            config,
            triples_map,
            subject,
            aliases,
        } => cmd_unfold(file, dialect, config, triples_map, subject, aliases),
        Commands::Validate { file } => cmd_validate(file),
    }
}

fn load_document(file: &Path) -> Option<MappingDocument> {
    match MappingDocument::from_file(file) {
        Ok(doc) => Some(doc),
        Err(e) => {
            eprintln!("Error loading mapping '{}': {}", file.display(), e);
            None
        }
    }
}

fn cmd_unfold(
    file: PathBuf,
    dialect: Option<DialectArg>,
    config: Option<PathBuf>,
    triples_map: Option<String>,
    subject: Option<String>,
    aliases: bool,
) -> ExitCode {
    let settings = match &config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let mut settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    if let Some(dialect) = dialect {
        settings.unfold.dialect = dialect.into();
    }

    let Some(document) = load_document(&file) else {
        return ExitCode::FAILURE;
    };

    let mut unfolder = Unfolder::new(&settings);

    match &triples_map {
        Some(id) => {
            let Some(tm) = document.get(id) else {
                eprintln!("Triples map not found: {}", id);
                return ExitCode::FAILURE;
            };
            match unfolder.unfold_triples_map(tm, subject.as_deref()) {
                Ok(Some(query)) => {
                    println!("-- {}", tm.id);
                    println!("{};", query);
                }
                Ok(None) => {
                    println!("-- {}: no rows can produce the requested subject", tm.id);
                }
                Err(e) => {
                    eprintln!("Unfolding error: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => {
            let queries = unfolder.unfold_document(&document);
            for (id, query) in &queries {
                println!("-- {}", id);
                println!("{};", query);
                println!();
            }
        }
    }

    if aliases {
        match serde_json::to_string_pretty(&unfolder.registry().summary()) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing alias registry: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn cmd_validate(file: PathBuf) -> ExitCode {
    let Some(document) = load_document(&file) else {
        return ExitCode::FAILURE;
    };

    if let Err(e) = document.check_references() {
        eprintln!("Validation error: {}", e);
        return ExitCode::FAILURE;
    }

    println!(
        "File: {} ({} triples maps)",
        file.display(),
        document.triples_maps.len()
    );
    ExitCode::SUCCESS
}
