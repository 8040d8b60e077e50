//! Ad-hoc coverage lookups and API key management.

use anyhow::Context as _;
use clap::Subcommand;
use covscan_core::LatLon;
use covscan_coverage::CoverageService;

use crate::render::mask_key;

/// Sub-commands available under `key`.
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum KeyCommands {
    /// Store the scraping backend API key
    Save {
        /// API key to store
        key: String,
    },
    /// Remove the stored API key
    Clear,
    /// Show the stored API key (masked)
    Show,
    /// Check an API key with one lightweight scrape
    Test {
        /// Key to test; defaults to the stored key
        key: Option<String>,
    },
}

pub(crate) async fn run_classify(
    service: &CoverageService,
    address: &str,
    city: &str,
) -> anyhow::Result<()> {
    let status = service.classify(city, address).await?;
    match service.cached(city, address).await {
        Some(entry) => println!(
            "{}, {}: {status} (checked {})",
            address.trim(),
            city.trim(),
            entry.checked_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => println!("{}, {}: {status}", address.trim(), city.trim()),
    }
    Ok(())
}

pub(crate) async fn run_locate(
    service: &CoverageService,
    name: &str,
    coords: &str,
) -> anyhow::Result<()> {
    let point = LatLon::parse(coords)?;
    let address = service
        .locate_address(name, point.lat, point.lon)
        .await
        .with_context(|| format!("address lookup for '{name}' failed"))?;
    if address.is_empty() {
        println!("no address found for '{}'", name.trim());
    } else {
        println!("{address}");
    }
    Ok(())
}

pub(crate) async fn run_key(service: &CoverageService, command: &KeyCommands) -> anyhow::Result<()> {
    match command {
        KeyCommands::Save { key } => {
            service.save(key).await?;
            println!("API key saved");
        }
        KeyCommands::Clear => {
            service.clear().await?;
            println!("API key cleared");
        }
        KeyCommands::Show => match service.get().await? {
            Some(key) => println!("{}", mask_key(&key)),
            None => println!("no API key stored"),
        },
        KeyCommands::Test { key } => {
            let key = match key {
                Some(key) => key.clone(),
                None => service
                    .get()
                    .await?
                    .context("no API key stored; pass one to test or run `key save <KEY>`")?,
            };
            if service.test_credential(&key).await {
                println!("API key works");
            } else {
                println!("API key was rejected or the backend is unreachable");
            }
        }
    }
    Ok(())
}
