//! Duplicate retirement command

use std::path::PathBuf;

use crate::config::Config;
use crate::engine::SyncEngine;
use crate::error::Result;

/// Archive duplicate activity records, keeping the first of each group
pub async fn dedup(config_path: Option<PathBuf>, dry_run: bool) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let engine = SyncEngine::from_config(&config)?;

    if dry_run {
        println!("Dry run mode - no changes will be made");
    }

    println!("Scanning for duplicate records...");
    let retired = engine.dedup_activities(dry_run).await?;

    if retired.is_empty() {
        println!("No duplicates found");
    } else {
        println!("\n{} duplicates archived", retired.len());
    }

    Ok(())
}
