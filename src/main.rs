//! Send-to-Kindle - Entry Point
//!
//! Opens the book store and prints the library inventory.

use log::info;
use std::process::ExitCode;

use sendtokindle::error::AppError;
use sendtokindle::error::handlers::handle_error;
use sendtokindle::utils::format::{format_bytes, format_time};
use sendtokindle::utils::logging::setup_logging;
use sendtokindle::{AppConfig, SharedStore, Store};

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    info!("Opening book store...");

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(&e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = SharedStore::new(Store::open_configured(&config)?);

    info!("Storage dir: {}", store.store().root().display());
    info!(
        "Upload limit: {}",
        format_bytes(config.max_upload_bytes())
    );

    let books = store.list().await?;
    info!("{} books stored", books.len());

    for book in &books {
        println!(
            "{:<16}  {:>10}  {}",
            format_time(book.mod_time),
            format_bytes(book.size),
            book.name
        );
    }

    Ok(())
}
