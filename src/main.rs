//! Rust Book Catalog CLI
//!
//! Command-line interface for managing a book catalog.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- add --id 1 --title "Dune" --author "Frank Herbert" --year 1965
//! cargo run -- list > books_out.csv
//! cargo run -- --store json --path books.json find-author herbert
//! cargo run -- --store json --path books.json import books.csv --max-retries 5 --backoff linear
//! ```
//!
//! Listings are written to stdout as CSV. Diagnostics go to stderr and are
//! controlled with `RUST_LOG` (default `warn`).
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid input, unknown book, unreadable or unwritable file, etc.)

use rust_book_catalog::cli::{self, CliArgs, Command};
use rust_book_catalog::io::serialize_books;
use rust_book_catalog::pump::{
    BackoffPolicy, CsvBookSource, ExponentialBackoff, PumpConfig, PumpService, RepositorySink,
    SystemClock, TokioDelay,
};
use rust_book_catalog::repository::{create_repository, BoxedBookRepository};
use rust_book_catalog::service::CatalogService;
use rust_book_catalog::types::{Book, BoxError};
use std::io::Write;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    init_tracing();

    // Parse command-line arguments using clap
    let args = cli::parse_args();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: CliArgs) -> Result<(), BoxError> {
    let repo = create_repository(args.store, &args.path)?;
    let pump_config = args.to_pump_config();
    let backoff = args.to_backoff_policy();
    let mut catalog = CatalogService::new(repo);

    match args.command {
        Command::List => print_books(&catalog.list_all()?),
        Command::Show { id } => match catalog.find_by_id(id)? {
            Some(book) => print_books(&[book]),
            None => Err(not_found(id)),
        },
        Command::Add {
            id,
            title,
            author,
            year,
        } => {
            let book = catalog.register(Book::new(id, title, author, year))?;
            info!(id = book.id, "Book registered");
            Ok(())
        }
        Command::UpdateTitle { id, title } => match catalog.update_title(id, &title)? {
            true => Ok(()),
            false => Err(not_found(id)),
        },
        Command::Remove { id } => match catalog.remove_book(id)? {
            true => Ok(()),
            false => Err(not_found(id)),
        },
        Command::FindAuthor { text } => print_books(&catalog.find_by_author(&text)?),
        Command::FindTitle { text } => print_books(&catalog.find_by_title(&text)?),
        Command::Import { input, .. } => {
            let backoff = backoff.unwrap_or_else(|| {
                Box::new(ExponentialBackoff::default()) as Box<dyn BackoffPolicy>
            });
            import(input, catalog.into_inner(), pump_config, backoff)
        }
    }
}

/// Pump every book of `input` into `repo`
fn import(
    input: PathBuf,
    repo: BoxedBookRepository,
    config: PumpConfig,
    backoff: Box<dyn BackoffPolicy>,
) -> Result<(), BoxError> {
    let sink = Arc::new(RepositorySink::new(repo));
    let pump = PumpService::<Book>::new(
        Arc::new(CsvBookSource::new(input)),
        sink.clone(),
        Arc::new(SystemClock),
        Arc::new(TokioDelay),
        Arc::from(backoff),
        config,
    );

    // Create tokio runtime for the pump
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let cancel = CancellationToken::new();
    let written = runtime.block_on(pump.run(&cancel))?;

    info!(written, total = sink.snapshot()?.len(), "Import finished");
    Ok(())
}

fn not_found(id: i32) -> BoxError {
    format!("Book {} not found", id).into()
}

fn print_books(books: &[Book]) -> Result<(), BoxError> {
    let csv = serialize_books(books)?;
    let mut stdout = std::io::stdout();
    stdout.write_all(csv.as_bytes())?;
    stdout.flush()?;
    Ok(())
}
