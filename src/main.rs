use chrono::Utc;
use clap::{Parser, Subcommand};
use course_checkout::application::engine::CheckoutEngine;
use course_checkout::domain::order_code;
use course_checkout::domain::plan::PlanCatalog;
use course_checkout::domain::ports::{PromoCodeStoreBox, RegistrationStoreBox};
use course_checkout::infrastructure::in_memory::{InMemoryPromoCodeStore, InMemoryRegistrationStore};
use course_checkout::interfaces::csv::catalog_reader::{PromoCodeReader, read_plan_catalog};
use course_checkout::interfaces::csv::checkout_reader::{CallbackReader, CheckoutReader, QuoteReader};
use course_checkout::interfaces::csv::report_writer::ReportWriter;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "COURSE_CHECKOUT_LOG";

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Price checkout requests and print their gateway order codes
    Quote {
        /// Checkout requests CSV file
        requests: PathBuf,

        /// Promo codes CSV file to load before quoting
        #[arg(long)]
        promos: Option<PathBuf>,

        /// Plan price list CSV file (`plan,price`)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
    /// Settle payment-gateway callbacks listed in a CSV file
    Settle {
        /// Callbacks CSV file with an `order_code` column
        callbacks: PathBuf,

        /// Quote CSV written by an earlier `quote` run; its registrations are reopened as pending
        #[arg(long)]
        quotes: Option<PathBuf>,

        /// Promo codes CSV file, so settled quotes can redeem their codes
        #[arg(long)]
        promos: Option<PathBuf>,

        /// Path to persistent database (optional). If provided, uses RocksDB.
        #[arg(long)]
        db_path: Option<PathBuf>,
    },
    /// Print the registration id embedded in an order code
    Decode {
        code: String,
    },
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_stores(db_path: Option<&Path>) -> Result<(PromoCodeStoreBox, RegistrationStoreBox)> {
    use course_checkout::infrastructure::rocksdb::RocksDBStore;

    if let Some(db_path) = db_path {
        let store = RocksDBStore::open(db_path).into_diagnostic()?;
        return Ok((Box::new(store.clone()), Box::new(store)));
    }
    Ok(in_memory_stores())
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_stores(db_path: Option<&Path>) -> Result<(PromoCodeStoreBox, RegistrationStoreBox)> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(in_memory_stores())
}

fn in_memory_stores() -> (PromoCodeStoreBox, RegistrationStoreBox) {
    (
        Box::new(InMemoryPromoCodeStore::new()),
        Box::new(InMemoryRegistrationStore::new()),
    )
}

async fn load_promos(engine: &CheckoutEngine, path: PathBuf) -> Result<()> {
    let reader = PromoCodeReader::new(File::open(path).into_diagnostic()?);
    for promo in reader.promo_codes() {
        match promo {
            Ok(promo) => engine.import_promo_code(promo).await.into_diagnostic()?,
            Err(e) => warn!("Error reading promo code: {}", e),
        }
    }
    Ok(())
}

async fn quote(
    requests: PathBuf,
    promos: Option<PathBuf>,
    catalog: Option<PathBuf>,
    db_path: Option<PathBuf>,
) -> Result<()> {
    let catalog = match catalog {
        Some(path) => read_plan_catalog(File::open(path).into_diagnostic()?).into_diagnostic()?,
        None => PlanCatalog::standard(),
    };
    let (promo_store, registration_store) = open_stores(db_path.as_deref())?;
    let engine = CheckoutEngine::new(catalog, promo_store, registration_store);
    if let Some(path) = promos {
        load_promos(&engine, path).await?;
    }

    let reader = CheckoutReader::new(File::open(requests).into_diagnostic()?);
    let mut quotes = Vec::new();
    for request in reader.requests() {
        match request {
            Ok(request) => {
                let registration = request.registration;
                match engine.quote(request, Utc::now()).await {
                    Ok(quote) => quotes.push(quote),
                    Err(e) => warn!("Error quoting registration {}: {}", registration, e),
                }
            }
            Err(e) => warn!("Error reading checkout request: {}", e),
        }
    }

    let stdout = io::stdout();
    ReportWriter::new(stdout.lock())
        .write_quotes(quotes)
        .into_diagnostic()
}

async fn settle(
    callbacks: PathBuf,
    quotes: Option<PathBuf>,
    promos: Option<PathBuf>,
    db_path: Option<PathBuf>,
) -> Result<()> {
    let (promo_store, registration_store) = open_stores(db_path.as_deref())?;
    let engine = CheckoutEngine::new(PlanCatalog::standard(), promo_store, registration_store);
    if let Some(path) = promos {
        load_promos(&engine, path).await?;
    }
    if let Some(path) = quotes {
        let reader = QuoteReader::new(File::open(path).into_diagnostic()?);
        for quote in reader.quotes() {
            let reopened = match quote {
                Ok(quote) => engine.reopen_quote(quote).await,
                Err(e) => Err(e),
            };
            if let Err(e) = reopened {
                warn!("Error reading quote: {}", e);
            }
        }
    }

    let reader = CallbackReader::new(File::open(callbacks).into_diagnostic()?);
    let mut settled = Vec::new();
    for code in reader.order_codes() {
        match code {
            Ok(code) => match engine.confirm_payment(&code).await {
                Ok(registration) => settled.push(registration),
                // Needs an operator: the gateway sent something we never issued
                Err(e) => warn!("Rejected payment callback {:?}: {}", code, e),
            },
            Err(e) => warn!("Error reading callback: {}", e),
        }
    }

    let stdout = io::stdout();
    ReportWriter::new(stdout.lock())
        .write_settlements(&settled)
        .into_diagnostic()
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Quote {
            requests,
            promos,
            catalog,
            db_path,
        } => quote(requests, promos, catalog, db_path).await,
        Command::Settle {
            callbacks,
            quotes,
            promos,
            db_path,
        } => settle(callbacks, quotes, promos, db_path).await,
        Command::Decode { code } => {
            let id = order_code::decode(&code).into_diagnostic()?;
            println!("{id}");
            Ok(())
        }
    }
}
