//! Duplicate detection for incoming activities
//!
//! Both sides of the sync round their numeric fields independently, so exact
//! equality is too brittle; a 0.02 tolerance absorbs rounding drift without
//! risking collisions between genuinely different same-day sessions.

use crate::format::round2;
use crate::store::StoredRecord;

/// Absolute tolerance applied to 2-decimal-rounded minutes and kilometers
pub const NUMERIC_TOLERANCE: f64 = 0.02;

/// The incoming record's identity, reduced to the fields matching runs on
#[derive(Debug, Clone, PartialEq)]
pub struct MatchTarget {
    /// Duration in minutes, rounded to 2 decimals
    pub duration_min: f64,
    /// Distance in kilometers, rounded to 2 decimals
    pub distance_km: f64,
    /// Display label, lowercased
    pub title: String,
}

/// Decide whether one of the same-date candidates represents the same
/// real-world event as the incoming record.
///
/// Candidates are examined in retrieval order. A candidate carrying both
/// numeric fields matches when duration and distance each agree within the
/// tolerance; candidates that miss the numeric gate (fields absent or
/// deltas out of tolerance) fall through to an exact case-insensitive
/// title comparison.
pub fn find_existing<'a>(
    target: &MatchTarget,
    candidates: &'a [StoredRecord],
) -> Option<&'a StoredRecord> {
    for candidate in candidates {
        if let (Some(duration), Some(distance)) = (candidate.duration_min, candidate.distance_km)
        {
            if (round2(duration) - target.duration_min).abs() <= NUMERIC_TOLERANCE
                && (round2(distance) - target.distance_km).abs() <= NUMERIC_TOLERANCE
            {
                return Some(candidate);
            }
        }

        if !target.title.is_empty()
            && !candidate.title.is_empty()
            && candidate.title.trim().to_lowercase() == target.title
        {
            return Some(candidate);
        }
    }

    None
}
