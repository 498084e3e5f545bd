//! Reconciliation engine
//!
//! One pass walks a batch of incoming activities and reconciles each one
//! against the workspace database: classify, split the embedded location,
//! find an existing record under tolerant identity, then create, update or
//! skip. Records are processed strictly one at a time; a failed write ends
//! that record's pass and the loop moves on, while a failed query aborts
//! the whole pass.

use std::fmt;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::client::FitnessClient;
use crate::config::Config;
use crate::engine::dedup::DedupReconciler;
use crate::engine::fields::ActivityFields;
use crate::engine::matcher;
use crate::engine::sleep::SleepFields;
use crate::error::Result;
use crate::store::{Icon, WorkspaceStore};

/// Terminal state of one record's reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Created,
    Updated,
    Skipped,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Created => write!(f, "Created"),
            Outcome::Updated => write!(f, "Updated"),
            Outcome::Skipped => write!(f, "Skipped"),
            Outcome::Failed => write!(f, "Failed"),
        }
    }
}

/// Statistics for one reconciliation pass
#[derive(Debug, Default, Clone, Copy)]
pub struct SyncStats {
    pub created: u32,
    pub updated: u32,
    pub skipped: u32,
    pub failed: u32,
}

impl SyncStats {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created => self.created += 1,
            Outcome::Updated => self.updated += 1,
            Outcome::Skipped => self.skipped += 1,
            Outcome::Failed => self.failed += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.created + self.updated + self.skipped + self.failed
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} created, {} updated, {} skipped, {} failed",
            self.created, self.updated, self.skipped, self.failed
        )
    }
}

/// Engine options resolved from configuration
#[derive(Debug, Clone)]
pub struct EngineOptions {
    pub activity_database: String,
    pub sleep_database: String,
    pub timezone: Tz,
}

/// Sync engine orchestrating reconciliation passes
pub struct SyncEngine {
    client: FitnessClient,
    store: WorkspaceStore,
    options: EngineOptions,
}

impl SyncEngine {
    pub fn new(client: FitnessClient, store: WorkspaceStore, options: EngineOptions) -> Self {
        Self {
            client,
            store,
            options,
        }
    }

    /// Build an engine from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.ensure_ready()?;
        let timezone = config.timezone()?;
        let client = FitnessClient::new(
            &config.source.base_url,
            &config.source.token,
            &config.source.user,
        );
        let store = WorkspaceStore::new(
            &config.store.base_url,
            &config.store.token,
            &config.store.version,
            config.page_size,
        );
        Ok(Self::new(
            client,
            store,
            EngineOptions {
                activity_database: config.store.activity_database.clone(),
                sleep_database: config.store.sleep_database.clone(),
                timezone,
            },
        ))
    }

    /// Local timezone used for sleep formatting and goal evaluation
    pub fn timezone(&self) -> Tz {
        self.options.timezone
    }

    /// Today's calendar date in the configured timezone
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.options.timezone).date_naive()
    }

    /// Reconcile one batch of incoming activities
    pub async fn sync_activities(&self, limit: u32, dry_run: bool) -> Result<SyncStats> {
        let activities = self.client.list_activities(0, limit).await?;
        println!("Fetched {} activities", activities.len());

        let mut stats = SyncStats::default();
        for activity in &activities {
            let fields = ActivityFields::build(activity);

            let Some(date) = fields.date else {
                // Without a date there is no candidate query to run
                tracing::warn!(name = %fields.name, "activity has no start time, cannot reconcile");
                println!("  Failed: {} (missing start time)", fields.name);
                stats.record(Outcome::Failed);
                continue;
            };

            let candidates = self
                .store
                .query_by_date(&self.options.activity_database, "Date", date)
                .await?;

            let outcome = match matcher::find_existing(&fields.match_target(), &candidates) {
                Some(existing) if fields.differs_from(existing) => {
                    if dry_run {
                        Outcome::Updated
                    } else {
                        match self
                            .store
                            .update_record(
                                &existing.id,
                                fields.properties(true),
                                fields.icon().as_ref(),
                            )
                            .await
                        {
                            Ok(()) => Outcome::Updated,
                            Err(e) => {
                                tracing::warn!(record_id = %existing.id, error = %e, "update failed");
                                println!("  Failed: {} ({})", fields.name, e);
                                stats.record(Outcome::Failed);
                                continue;
                            }
                        }
                    }
                }
                Some(_) => Outcome::Skipped,
                None => {
                    if dry_run {
                        Outcome::Created
                    } else {
                        match self
                            .store
                            .create_record(
                                &self.options.activity_database,
                                fields.properties(false),
                                fields.icon().as_ref(),
                            )
                            .await
                        {
                            Ok(_) => Outcome::Created,
                            Err(e) => {
                                tracing::warn!(name = %fields.name, error = %e, "create failed");
                                println!("  Failed: {} ({})", fields.name, e);
                                stats.record(Outcome::Failed);
                                continue;
                            }
                        }
                    }
                }
            };

            match outcome {
                Outcome::Skipped => println!("  Skipped (exists): {}", fields.name),
                other => println!("  {}: {}", other, fields.name),
            }
            stats.record(outcome);
        }

        Ok(stats)
    }

    /// Mirror sleep sessions for the given dates. Nights already stored
    /// (looked up via the date-keyed field) are skipped, never updated.
    pub async fn sync_sleep(&self, dates: &[NaiveDate], dry_run: bool) -> Result<SyncStats> {
        let tz = self.options.timezone;
        let mut stats = SyncStats::default();

        for &date in dates {
            let Some(session) = self.client.sleep_session(date).await? else {
                println!("  No sleep data for {}", date);
                stats.record(Outcome::Skipped);
                continue;
            };

            let Some(fields) = SleepFields::build(&session, tz) else {
                println!("  Skipping sleep data for {} as total sleep is 0", date);
                stats.record(Outcome::Skipped);
                continue;
            };

            let existing = self
                .store
                .query_by_date(&self.options.sleep_database, "Long Date", fields.date)
                .await?;
            if !existing.is_empty() {
                println!("  Skipped (exists): sleep entry for {}", fields.date);
                stats.record(Outcome::Skipped);
                continue;
            }

            if dry_run {
                println!("  Created: sleep entry for {} (dry run)", fields.date);
                stats.record(Outcome::Created);
                continue;
            }

            match self
                .store
                .create_record(
                    &self.options.sleep_database,
                    fields.properties(tz),
                    Some(&Icon::Emoji("😴".to_string())),
                )
                .await
            {
                Ok(_) => {
                    println!(
                        "  Created: sleep entry for {} (Sleep Goal = {})",
                        fields.date, fields.goal_met
                    );
                    stats.record(Outcome::Created);
                }
                Err(e) => {
                    tracing::warn!(date = %fields.date, error = %e, "sleep create failed");
                    println!("  Failed: sleep entry for {} ({})", fields.date, e);
                    stats.record(Outcome::Failed);
                }
            }
        }

        Ok(stats)
    }

    /// Retire duplicate activity records
    pub async fn dedup_activities(&self, dry_run: bool) -> Result<Vec<String>> {
        DedupReconciler::new(&self.store, &self.options.activity_database)
            .reconcile(dry_run)
            .await
    }
}
