//! Activity payload models for the fitness-platform API
//!
//! Every field the platform may omit is optional; the accessor methods
//! implement the documented default policy (zero, "Unknown", empty string)
//! so defaulting happens in exactly one place.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Activity summary returned from the activity list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Unique activity identifier
    #[serde(default)]
    pub activity_id: Option<i64>,

    /// User-provided or auto-generated activity name
    #[serde(default)]
    pub activity_name: Option<String>,

    /// Start time in GMT (`YYYY-MM-DD HH:MM:SS` or ISO 8601)
    #[serde(default, rename = "startTimeGMT")]
    pub start_time_gmt: Option<String>,

    /// Start time in the local timezone
    #[serde(default)]
    pub start_time_local: Option<String>,

    /// Activity type information
    #[serde(default)]
    pub activity_type: Option<ActivityType>,

    /// Distance in meters
    #[serde(default)]
    pub distance: Option<f64>,

    /// Duration in seconds
    #[serde(default)]
    pub duration: Option<f64>,

    /// Calories burned
    #[serde(default)]
    pub calories: Option<f64>,

    /// Average speed in m/s
    #[serde(default)]
    pub average_speed: Option<f64>,

    /// Average power in watts
    #[serde(default)]
    pub avg_power: Option<f64>,

    /// Maximum power in watts
    #[serde(default)]
    pub max_power: Option<f64>,

    /// Training-effect label code (e.g. "TEMPO")
    #[serde(default)]
    pub training_effect_label: Option<String>,

    /// Aerobic training-effect score
    #[serde(default)]
    pub aerobic_training_effect: Option<f64>,

    /// Aerobic training-effect message code
    #[serde(default)]
    pub aerobic_training_effect_message: Option<String>,

    /// Anaerobic training-effect score
    #[serde(default)]
    pub anaerobic_training_effect: Option<f64>,

    /// Anaerobic training-effect message code
    #[serde(default)]
    pub anaerobic_training_effect_message: Option<String>,

    /// Whether this activity set a personal record
    #[serde(default)]
    pub pr: Option<bool>,

    /// Whether the user marked this activity as a favorite
    #[serde(default)]
    pub favorite: Option<bool>,
}

/// Activity type information
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityType {
    /// Type key (e.g. "running", "treadmill_running")
    pub type_key: String,

    /// Type ID
    #[serde(default)]
    pub type_id: Option<u64>,
}

impl Activity {
    /// Get a display-friendly name for the activity
    pub fn display_name(&self) -> String {
        self.activity_name
            .clone()
            .unwrap_or_else(|| "Unnamed Activity".to_string())
    }

    /// Get the activity type key
    pub fn type_key(&self) -> String {
        self.activity_type
            .as_ref()
            .map(|t| t.type_key.clone())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Raw GMT start timestamp as reported by the platform
    pub fn start_time(&self) -> &str {
        self.start_time_gmt.as_deref().unwrap_or("")
    }

    /// Calendar date portion of the GMT start timestamp
    pub fn start_date(&self) -> Option<NaiveDate> {
        // Handle both ISO format (T separator) and space-separated format
        self.start_time_gmt
            .as_deref()
            .and_then(|s| s.split(['T', ' ']).next())
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    pub fn distance_meters(&self) -> f64 {
        self.distance.unwrap_or(0.0)
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    pub fn calorie_count(&self) -> f64 {
        self.calories.unwrap_or(0.0)
    }

    pub fn speed_mps(&self) -> f64 {
        self.average_speed.unwrap_or(0.0)
    }

    pub fn average_power(&self) -> f64 {
        self.avg_power.unwrap_or(0.0)
    }

    pub fn maximum_power(&self) -> f64 {
        self.max_power.unwrap_or(0.0)
    }

    pub fn effect_label(&self) -> &str {
        self.training_effect_label.as_deref().unwrap_or("Unknown")
    }

    pub fn aerobic_effect(&self) -> f64 {
        self.aerobic_training_effect.unwrap_or(0.0)
    }

    pub fn aerobic_message(&self) -> &str {
        self.aerobic_training_effect_message
            .as_deref()
            .unwrap_or("Unknown")
    }

    pub fn anaerobic_effect(&self) -> f64 {
        self.anaerobic_training_effect.unwrap_or(0.0)
    }

    pub fn anaerobic_message(&self) -> &str {
        self.anaerobic_training_effect_message
            .as_deref()
            .unwrap_or("Unknown")
    }

    pub fn is_pr(&self) -> bool {
        self.pr.unwrap_or(false)
    }

    pub fn is_favorite(&self) -> bool {
        self.favorite.unwrap_or(false)
    }
}
