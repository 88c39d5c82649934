use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tally_core::{Engine, EngineError, Role, RoleMap};
use tally_ingest::{SourceKind, load_table};

mod config;
mod report;

#[derive(Parser, Debug)]
#[command(name = "tally", version, about = "Summarize transaction exports with unknown columns")]
struct Cli {
    /// Config file (default: ~/.tally/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect columns, normalize rows and print period summaries
    Analyze {
        file: PathBuf,

        #[command(flatten)]
        source: SourceArgs,

        /// First day to include (YYYY-MM-DD, default: earliest transaction)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day to include (YYYY-MM-DD, default: latest transaction)
        #[arg(long)]
        to: Option<NaiveDate>,

        #[command(flatten)]
        columns: ColumnArgs,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Also list every transaction (text format only)
        #[arg(long)]
        transactions: bool,
    },

    /// Show how each column was classified
    Columns {
        file: PathBuf,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// Manage the config file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(clap::Args, Debug)]
struct SourceArgs {
    /// File layout (default: from the extension)
    #[arg(long, value_enum)]
    kind: Option<Kind>,
}

/// Explicit column choices; these win over detection.
#[derive(clap::Args, Debug)]
struct ColumnArgs {
    #[arg(long)]
    date_column: Option<String>,
    #[arg(long)]
    amount_column: Option<String>,
    #[arg(long)]
    type_column: Option<String>,
    #[arg(long)]
    description_column: Option<String>,
    #[arg(long)]
    reference_column: Option<String>,
}

impl ColumnArgs {
    fn overrides(&self) -> RoleMap {
        let mut map = RoleMap::new();
        let pairs = [
            (Role::Date, &self.date_column),
            (Role::Amount, &self.amount_column),
            (Role::Type, &self.type_column),
            (Role::Description, &self.description_column),
            (Role::CounterpartyRef, &self.reference_column),
        ];
        for (role, column) in pairs {
            if let Some(column) = column {
                map.assign(role, column.clone());
            }
        }
        map
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Delimited,
    Text,
}

impl From<Kind> for SourceKind {
    fn from(k: Kind) -> Self {
        match k {
            Kind::Delimited => SourceKind::Delimited,
            Kind::Text => SourceKind::DocumentText,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config file if none exists
    Init,
    /// Print the effective config
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Command::Analyze {
            file,
            source,
            from,
            to,
            columns,
            format,
            transactions,
        } => {
            if let (Some(from), Some(to)) = (from, to) {
                if from > to {
                    bail!("--from {from} is after --to {to}");
                }
            }

            let engine = engine(cli.config.as_deref())?;
            let table = load(&file, source.kind)?;
            let analysis = match engine.analyze_between(&table, &columns.overrides(), from, to) {
                Ok(a) => a,
                Err(e) => return Err(explain(e, &file)),
            };

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&analysis)?),
                Format::Text => print!("{}", report::render_analysis(&analysis, transactions)),
            }
        }

        Command::Columns { file, source } => {
            let engine = engine(cli.config.as_deref())?;
            let table = load(&file, source.kind)?;
            let classification = engine
                .classify(&table)
                .map_err(|e| explain(e, &file))?;

            println!("{} rows in {}\n", table.row_count(), file.display());
            print!(
                "{}",
                report::render_columns(&classification.roles, &classification.profiles)
            );
            for role in &classification.unresolved {
                println!(
                    "\nNo {role} column detected; pass {} <NAME>",
                    report::override_flag(*role)
                );
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                config::init_config(cli.config.as_deref())?;
            }
            ConfigCommand::Show => {
                let cfg = config::load_config(cli.config.as_deref())?;
                print!("{}", config::render_config(&cfg)?);
            }
        },
    }

    Ok(())
}

fn engine(config_path: Option<&Path>) -> Result<Engine> {
    let cfg = config::load_config(config_path)?;
    Ok(Engine::new(cfg)?)
}

fn load(file: &Path, kind: Option<Kind>) -> Result<tally_core::RawTable> {
    if !file.exists() {
        bail!("file not found: {}", file.display());
    }
    load_table(file, kind.map(SourceKind::from))
        .with_context(|| format!("loading {}", file.display()))
}

/// Turn engine errors into messages that say what to do next.
fn explain(err: EngineError, file: &Path) -> anyhow::Error {
    match err {
        EngineError::UnresolvedRoles { roles, candidates } => {
            let mut msg = format!("could not detect every required column in {}", file.display());
            for role in &roles {
                msg.push_str(&format!(
                    "\n  {role}: pass {} <NAME>",
                    report::override_flag(*role)
                ));
            }
            msg.push_str(&format!("\n  candidates: {}", candidates.join(", ")));
            anyhow::anyhow!(msg)
        }
        other => anyhow::Error::new(other).context(format!("analyzing {}", file.display())),
    }
}
