//! Target-field computation for one sleep night

use chrono::{NaiveDate, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde_json::{json, Value};

use crate::format::{
    format_clock, format_date_title, format_duration, format_timestamp, round1,
};
use crate::models::SleepSession;
use crate::store::page;

/// The computed field set for one sleep record
#[derive(Debug, Clone)]
pub struct SleepFields {
    pub date: NaiveDate,
    pub total_sec: i64,
    pub light_sec: i64,
    pub deep_sec: i64,
    pub rem_sec: i64,
    pub awake_sec: i64,
    pub start_ms: Option<i64>,
    pub end_ms: Option<i64>,
    pub resting_hr: i64,
    pub goal_met: bool,
}

impl SleepFields {
    /// Compute the field set for a sleep session. Nights without any
    /// recorded sleep (or without a calendar date) produce `None` and are
    /// never written.
    pub fn build(session: &SleepSession, tz: Tz) -> Option<Self> {
        let daily = session.daily_sleep.as_ref()?;
        let date = daily.date()?;

        let light_sec = daily.light_seconds();
        let deep_sec = daily.deep_seconds();
        let rem_sec = daily.rem_seconds();
        let total_sec = daily.total_sleep_seconds();
        if total_sec == 0 {
            return None;
        }

        let start_ms = daily.sleep_start_timestamp_gmt;
        let end_ms = daily.sleep_end_timestamp_gmt;

        Some(Self {
            date,
            total_sec,
            light_sec,
            deep_sec,
            rem_sec,
            awake_sec: daily.awake_seconds(),
            start_ms,
            end_ms,
            resting_hr: session.resting_heart_rate(),
            goal_met: sleep_goal_met(start_ms, end_ms, total_sec, tz),
        })
    }

    /// Render the property set for a create call
    pub fn properties(&self, tz: Tz) -> Value {
        let clock = |ms: Option<i64>| {
            ms.and_then(|ms| format_clock(ms, tz))
                .unwrap_or_else(|| "-".to_string())
        };

        let mut properties = json!({
            "Date": page::title(&format_date_title(self.date)),
            "Times": page::rich_text(&format!(
                "{} → {}",
                clock(self.start_ms),
                clock(self.end_ms)
            )),
            "Long Date": page::date_start(&self.date.to_string()),
            "Total Sleep (h)": page::number(round1(self.total_sec as f64 / 3600.0)),
            "Light Sleep (h)": page::number(round1(self.light_sec as f64 / 3600.0)),
            "Deep Sleep (h)": page::number(round1(self.deep_sec as f64 / 3600.0)),
            "REM Sleep (h)": page::number(round1(self.rem_sec as f64 / 3600.0)),
            "Awake Time (h)": page::number(round1(self.awake_sec as f64 / 3600.0)),
            "Total Sleep": page::rich_text(&format_duration(self.total_sec)),
            "Light Sleep": page::rich_text(&format_duration(self.light_sec)),
            "Deep Sleep": page::rich_text(&format_duration(self.deep_sec)),
            "REM Sleep": page::rich_text(&format_duration(self.rem_sec)),
            "Awake Time": page::rich_text(&format_duration(self.awake_sec)),
            "Resting HR": page::number(self.resting_hr as f64),
            "Sleep Goal": page::checkbox(self.goal_met),
        });

        if let (Some(start), Some(end)) = (
            self.start_ms.and_then(|ms| format_timestamp(ms, tz)),
            self.end_ms.and_then(|ms| format_timestamp(ms, tz)),
        ) {
            properties["Full Date/Time"] = page::date_range(&start, &end);
        }

        properties
    }
}

/// The sleep goal is met when the night started before 23:00 local, ended
/// before 08:30 local and total sleep exceeds 7.5 hours (strictly).
pub fn sleep_goal_met(
    start_ms: Option<i64>,
    end_ms: Option<i64>,
    total_sleep_sec: i64,
    tz: Tz,
) -> bool {
    let (Some(start_ms), Some(end_ms)) = (start_ms, end_ms) else {
        return false;
    };
    let (Some(start), Some(end)) = (local_time(start_ms, tz), local_time(end_ms, tz)) else {
        return false;
    };

    let started_early = start.0 < 23;
    let ended_early = end.0 < 8 || (end.0 == 8 && end.1 < 30);
    let slept_enough = total_sleep_sec as f64 / 3600.0 > 7.5;

    started_early && ended_early && slept_enough
}

/// Local wall-clock (hour, minute) of an epoch-milliseconds timestamp
fn local_time(epoch_ms: i64, tz: Tz) -> Option<(u32, u32)> {
    match Utc.timestamp_millis_opt(epoch_ms) {
        chrono::LocalResult::Single(dt) => {
            let local = dt.with_timezone(&tz);
            Some((local.hour(), local.minute()))
        }
        _ => None,
    }
}
