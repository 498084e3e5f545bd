//! Sync commands

use std::path::PathBuf;

use chrono::{Duration, NaiveDate};

use crate::config::Config;
use crate::engine::SyncEngine;
use crate::error::{Result, SyncError};

/// Mirror recent activities into the workspace database
pub async fn sync_activities(
    config_path: Option<PathBuf>,
    limit: u32,
    dedup_first: bool,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let engine = SyncEngine::from_config(&config)?;

    if dry_run {
        println!("Dry run mode - no changes will be made");
    }

    if dedup_first {
        println!("Archiving duplicates...");
        let retired = engine.dedup_activities(dry_run).await?;
        println!("  {} duplicates archived", retired.len());
    }

    println!("Syncing activities (limit {})...", limit);
    let stats = engine.sync_activities(limit, dry_run).await?;
    println!("\nSync complete: {}", stats);

    Ok(())
}

/// Mirror sleep sessions into the workspace database
pub async fn sync_sleep(
    config_path: Option<PathBuf>,
    date: Option<String>,
    days: u32,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let engine = SyncEngine::from_config(&config)?;

    if dry_run {
        println!("Dry run mode - no changes will be made");
    }

    let dates = match date {
        Some(date) => vec![parse_date(&date)?],
        None => trailing_dates(engine.today(), days),
    };

    println!("Syncing sleep for {} night(s)...", dates.len());
    let stats = engine.sync_sleep(&dates, dry_run).await?;
    println!("\nSync complete: {}", stats);

    Ok(())
}

/// Run the full mirror: dedup, activities, then sleep
pub async fn sync_all(
    config_path: Option<PathBuf>,
    limit: u32,
    days: u32,
    dry_run: bool,
) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let engine = SyncEngine::from_config(&config)?;

    if dry_run {
        println!("Dry run mode - no changes will be made");
    }

    println!("Archiving duplicates...");
    let retired = engine.dedup_activities(dry_run).await?;
    println!("  {} duplicates archived", retired.len());

    println!("Syncing activities (limit {})...", limit);
    let activity_stats = engine.sync_activities(limit, dry_run).await?;
    println!("  Activities: {}", activity_stats);

    let dates = trailing_dates(engine.today(), days);
    println!("Syncing sleep for {} night(s)...", dates.len());
    let sleep_stats = engine.sync_sleep(&dates, dry_run).await?;
    println!("  Sleep: {}", sleep_stats);

    Ok(())
}

/// Parse a `YYYY-MM-DD` date argument
fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| SyncError::InvalidDateFormat(s.to_string()))
}

/// The last `days` calendar dates ending today, oldest first
fn trailing_dates(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
    let days = days.max(1);
    (0..days)
        .rev()
        .map(|back| today - Duration::days(i64::from(back)))
        .collect()
}
