//! Duplicate retirement for the stored collection
//!
//! A separate maintenance pass: scan every active record, group by a
//! derived identity key and archive everything beyond the first record in
//! each group. Archiving is a soft delete; running the pass again retires
//! nothing because archived records never come back from the query.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::error::Result;
use crate::format::round2;
use crate::store::{StoredRecord, WorkspaceStore};

/// Derived identity of a stored record. Numeric parts are kept as
/// centi-units so the key is hashable; records missing a numeric field
/// only collide with records missing the same field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatchKey {
    date: Option<NaiveDate>,
    duration_centi_min: Option<i64>,
    distance_centi_km: Option<i64>,
    title: String,
}

impl MatchKey {
    pub fn of(record: &StoredRecord) -> Self {
        Self {
            date: record.date,
            duration_centi_min: record.duration_min.map(to_centi),
            distance_centi_km: record.distance_km.map(to_centi),
            title: record.title.trim().to_lowercase(),
        }
    }
}

fn to_centi(value: f64) -> i64 {
    (round2(value) * 100.0).round() as i64
}

/// Ids of every record beyond the first of its MatchKey group, in
/// retrieval order
pub fn duplicate_ids(records: &[StoredRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();

    for record in records {
        if !seen.insert(MatchKey::of(record)) {
            duplicates.push(record.id.clone());
        }
    }

    duplicates
}

/// Maintenance pass retiring duplicate records from one database
pub struct DedupReconciler<'a> {
    store: &'a WorkspaceStore,
    database_id: &'a str,
}

impl<'a> DedupReconciler<'a> {
    pub fn new(store: &'a WorkspaceStore, database_id: &'a str) -> Self {
        Self { store, database_id }
    }

    /// Scan the collection and archive duplicates. Each retirement is
    /// independent: one failure is reported and the rest proceed. Returns
    /// the ids actually retired.
    pub async fn reconcile(&self, dry_run: bool) -> Result<Vec<String>> {
        let records = self.store.query_all(self.database_id).await?;
        let duplicates = duplicate_ids(&records);

        let mut retired = Vec::new();
        for id in duplicates {
            if dry_run {
                println!("  Would archive duplicate: {}", id);
                retired.push(id);
                continue;
            }
            match self.store.archive_record(&id).await {
                Ok(()) => {
                    println!("  Archived duplicate: {}", id);
                    retired.push(id);
                }
                Err(e) => {
                    tracing::warn!(record_id = %id, error = %e, "failed to archive duplicate");
                    println!("  Failed to archive {}: {}", id, e);
                }
            }
        }

        Ok(retired)
    }
}
