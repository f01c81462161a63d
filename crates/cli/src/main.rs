//! # glos-harvest
//!
//! Harvests ISO metadata records from the GLOS CSW catalogue into a
//! web-accessible folder and reports the records tagged with GLOS Categories.

mod config;

use anyhow::{Context, Result};
use clap::Parser;
use config::HarvestArgs;
use glos_harvest::{
    fetch_records, summarize, write_summaries_json, IsoPath, WRITE_LOG_TARGET,
};
use glos_harvest_csw::CswClient;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // File confirmations are shown whatever the RUST_LOG level.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(format!("{WRITE_LOG_TARGET}=info").parse()?);
    fmt().with_env_filter(filter).init();

    let args = HarvestArgs::parse();
    run(&args).await
}

async fn run(args: &HarvestArgs) -> Result<()> {
    let mut csw = CswClient::new(&args.endpoint)?;
    if let Some(timeout) = args.timeout() {
        csw = csw.with_timeout(timeout)?;
    }

    let write_dir = args.write_dir();
    if let Some(dir) = write_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;
    }

    info!("Harvesting {}", args.endpoint);
    let matches = fetch_records(&mut csw, args.filter(), write_dir.map(|d| d.as_path())).await?;

    for document in &matches {
        let title = document.extract(IsoPath::Title)?;
        info!(
            identifier = document.identifier(),
            "GLOS record: {}",
            title.first().map(String::as_str).unwrap_or("(untitled)")
        );
    }
    println!("Found {} GLOS records.", matches.len());

    if let Some(path) = &args.matches_json {
        let summaries = matches
            .iter()
            .map(summarize)
            .collect::<Result<Vec<_>, _>>()?;
        write_summaries_json(path, &summaries)?;
        println!("Wrote {} summaries to {}", summaries.len(), path.display());
    }

    Ok(())
}
