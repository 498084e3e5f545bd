//! Record classification and reconciliation engine
//!
//! - [`rules`] maps raw type codes and free-text names to canonical
//!   categories and splits embedded locations
//! - [`fields`] computes the full target-field set per activity
//! - [`matcher`] decides record identity under tolerant comparison
//! - [`sync`] orchestrates the per-record create/update/skip pass
//! - [`dedup`] retires duplicate stored records

pub mod dedup;
pub mod fields;
pub mod matcher;
pub mod rules;
pub mod sleep;
pub mod sync;

pub use dedup::DedupReconciler;
pub use fields::ActivityFields;
pub use rules::{classify, split_name, Category};
pub use sleep::SleepFields;
pub use sync::{EngineOptions, Outcome, SyncEngine, SyncStats};
