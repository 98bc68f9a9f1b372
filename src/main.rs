//! Sales Order Engine CLI
//!
//! Command-line interface for ingesting fixed-width sales order files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- orders.txt
//! cargo run -- --batch-size 500 --max-concurrent 8 orders.txt
//! cargo run -- --pretty orders.txt
//! ```
//!
//! The program reads order records from the input file, writes them to
//! an in-memory repository through the batched concurrent writer, and
//! prints the upload summary (counts plus the aggregated user view) as
//! JSON to stdout. Diagnostics go to stderr via `tracing`, controlled by
//! `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, wrong extension, storage failure, etc.)

use std::process;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use sales_order_engine::cli::{self, CliArgs};
use sales_order_engine::repository::InMemoryOrderRepository;
use sales_order_engine::{OrderError, OrderRepository, UploadOrders};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    if let Err(error) = run(args).await {
        eprintln!("Error: {}", error);
        process::exit(1);
    }
}

async fn run(args: CliArgs) -> Result<(), OrderError> {
    // One connection-equivalent handle for the process lifetime,
    // injected into everything that needs persistence.
    let repository: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());

    // The process must not start work when storage is unreachable.
    repository
        .ping()
        .await
        .map_err(|source| OrderError::Connectivity { source })?;

    let file_name = args
        .input_file
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
        .to_string();
    let content = tokio::fs::read(&args.input_file).await?;

    let upload = UploadOrders::new(Arc::clone(&repository), args.to_batch_config());
    let summary = upload.execute(&file_name, &content).await?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&summary)
    } else {
        serde_json::to_string(&summary)
    }
    .map_err(|error| OrderError::Io {
        message: error.to_string(),
    })?;
    println!("{}", json);

    Ok(())
}
