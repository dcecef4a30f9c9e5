use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use cp_registry::{
    derive_suffix, maturity_date, open_registry, AppConfig, Dispatcher, EntityKind, LedgerConfig,
    NamespaceConfig, SqliteLedger,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LedgerMode {
    Memory,
    Sqlite,
}

#[derive(Debug, Parser)]
#[command(name = "cp-registry", version, about = "Commercial paper and account registry")]
struct Cli {
    /// Ledger backend. `memory` forgets everything on exit.
    #[arg(long, value_enum, default_value_t = LedgerMode::Sqlite, env = "CP_REGISTRY_LEDGER")]
    ledger: LedgerMode,

    /// SQLite ledger file
    #[arg(long, default_value = "cp-registry.db", env = "CP_REGISTRY_DB")]
    db: PathBuf,

    /// JSON file overriding namespace prefixes
    #[arg(long, env = "CP_REGISTRY_NAMESPACES")]
    namespaces: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a registry function, e.g. `invoke createVendor V1 Acme retail 100`
    Invoke {
        function: String,
        args: Vec<String>,
    },

    /// Compute the CUSIP maturity suffix without touching the ledger
    DeriveSuffix {
        /// Issue date, Unix epoch milliseconds
        issue_millis: String,
        /// Holding period in days
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },

    /// Show every version written for a record (SQLite ledger only)
    History { kind: EntityKind, id: String },
}

fn build_config(cli: &Cli) -> Result<AppConfig> {
    let namespaces = match &cli.namespaces {
        Some(path) => NamespaceConfig::from_json_file(path)?,
        None => NamespaceConfig::default(),
    };
    let ledger = match cli.ledger {
        LedgerMode::Memory => LedgerConfig::Memory,
        LedgerMode::Sqlite => LedgerConfig::Sqlite {
            path: cli.db.clone(),
        },
    };
    Ok(AppConfig { ledger, namespaces })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "cp_registry=info,warn".to_string()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli)?;

    match &cli.command {
        Command::Invoke { function, args } => {
            let dispatcher = Dispatcher::new(open_registry(&config)?);
            let payload = dispatcher
                .invoke(function, args)
                .with_context(|| format!("{} failed", function))?;
            if !payload.is_empty() {
                println!("{}", String::from_utf8_lossy(&payload));
            }
        }
        Command::DeriveSuffix { issue_millis, days } => {
            let maturity = maturity_date(issue_millis, *days)?;
            let suffix = derive_suffix(issue_millis, *days)?;
            println!("maturity: {}", maturity);
            println!("suffix:   {}", suffix);
        }
        Command::History { kind, id } => {
            let LedgerConfig::Sqlite { path } = &config.ledger else {
                anyhow::bail!("history needs the sqlite ledger");
            };
            let ledger = SqliteLedger::open(path)?;
            let key = format!("{}{}", config.namespaces.prefix(*kind), id);
            let versions = ledger.history(&key)?;
            if versions.is_empty() {
                println!("no writes recorded for {}", key);
            }
            for write in versions {
                println!(
                    "#{} {} {}",
                    write.seq,
                    write.written_at.to_rfc3339(),
                    String::from_utf8_lossy(&write.value)
                );
            }
        }
    }

    Ok(())
}
