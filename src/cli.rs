// ABOUTME: Command-line interface: argument parsing and command dispatch onto the gateway.
// ABOUTME: Every command runs the gateway's init hook before doing its work.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use perfectwood_store::{
    DirectorySink, FileStore, FsHost, HostApi, KeyValueStore, PersistenceGateway,
};

use crate::config::{AppConfig, BackendChoice};

#[derive(Debug, Parser)]
#[command(name = "perfectwood", version, about = "Inspect, back up and restore Perfect Wood data")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run initialization (copies legacy keys on the browser backend)
    Init,
    /// Print how many records each dataset holds
    Show,
    /// Write a backup file
    Export {
        /// Directory to write into (defaults to PERFECTWOOD_EXPORT_DIR)
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Restore data from a backup file
    Import {
        file: PathBuf,
    },
    /// Delete all stored data
    Clear,
}

/// Wire the configured backend into a gateway.
pub fn build_gateway(config: &AppConfig) -> anyhow::Result<PersistenceGateway> {
    let store: Arc<dyn KeyValueStore> = Arc::new(
        FileStore::open(config.local_storage_dir())
            .context("failed to open local storage directory")?,
    );
    let host: Option<Arc<dyn HostApi>> = match config.backend {
        BackendChoice::Host => Some(Arc::new(FsHost::new(config.host_data_dir()))),
        BackendChoice::Browser => None,
    };
    Ok(PersistenceGateway::detect(host, store))
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    let gateway = build_gateway(&config)?;
    let migrated = gateway.init();
    tracing::debug!(
        "using {} backend at {} ({} legacy keys copied)",
        gateway.backend_kind(),
        config.home.display(),
        migrated
    );

    match cli.command {
        Command::Init => {
            println!(
                "initialized {} backend, {} legacy keys copied",
                gateway.backend_kind(),
                migrated
            );
        }
        Command::Show => {
            let dataset = gateway.load_dataset().await;
            let customer = gateway.load_customer_transactions().await;
            let supplier = gateway.load_supplier_transactions().await;
            let summary = serde_json::json!({
                "backend": gateway.backend_kind().to_string(),
                "products": dataset.products.len(),
                "customers": dataset.customers.len(),
                "sellers": dataset.sellers.len(),
                "customerTransactions": customer.len(),
                "supplierTransactions": supplier.len(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        Command::Export { out } => {
            let sink = DirectorySink::new(out.unwrap_or_else(|| config.export_dir.clone()));
            if !gateway.export_backup(&sink).await {
                bail!("export failed; see log for details");
            }
            println!("backup written to {}", sink.dir().display());
        }
        Command::Import { file } => {
            let complete = gateway
                .import_backup_file(&file)
                .await
                .with_context(|| format!("failed to import {}", file.display()))?;
            if !complete {
                bail!("import validated but some data could not be saved; see log for details");
            }
            println!("imported {}", file.display());
        }
        Command::Clear => {
            if !gateway.clear_all().await {
                bail!("failed to clear data; see log for details");
            }
            println!("all data cleared");
        }
    }

    Ok(())
}
