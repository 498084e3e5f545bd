//! Sleep payload models for the fitness-platform API

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sleep session returned from the daily sleep endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSession {
    /// Per-night summary; absent when the platform has no data for the day
    #[serde(default, rename = "dailySleepDTO")]
    pub daily_sleep: Option<DailySleep>,

    /// Resting heart rate in bpm
    #[serde(default)]
    pub resting_heart_rate: Option<i64>,
}

/// Per-night sleep summary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySleep {
    /// Calendar date (`YYYY-MM-DD`)
    #[serde(default)]
    pub calendar_date: Option<String>,

    #[serde(default)]
    pub light_sleep_seconds: Option<i64>,

    #[serde(default)]
    pub deep_sleep_seconds: Option<i64>,

    #[serde(default)]
    pub rem_sleep_seconds: Option<i64>,

    #[serde(default)]
    pub awake_sleep_seconds: Option<i64>,

    /// Sleep start, epoch milliseconds GMT
    #[serde(default, rename = "sleepStartTimestampGMT")]
    pub sleep_start_timestamp_gmt: Option<i64>,

    /// Sleep end, epoch milliseconds GMT
    #[serde(default, rename = "sleepEndTimestampGMT")]
    pub sleep_end_timestamp_gmt: Option<i64>,
}

impl SleepSession {
    pub fn resting_heart_rate(&self) -> i64 {
        self.resting_heart_rate.unwrap_or(0)
    }
}

impl DailySleep {
    pub fn date(&self) -> Option<NaiveDate> {
        self.calendar_date
            .as_deref()
            .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
    }

    pub fn light_seconds(&self) -> i64 {
        self.light_sleep_seconds.unwrap_or(0)
    }

    pub fn deep_seconds(&self) -> i64 {
        self.deep_sleep_seconds.unwrap_or(0)
    }

    pub fn rem_seconds(&self) -> i64 {
        self.rem_sleep_seconds.unwrap_or(0)
    }

    pub fn awake_seconds(&self) -> i64 {
        self.awake_sleep_seconds.unwrap_or(0)
    }

    /// Total sleep: light + deep + REM, awake time excluded
    pub fn total_sleep_seconds(&self) -> i64 {
        self.light_seconds() + self.deep_seconds() + self.rem_seconds()
    }
}
