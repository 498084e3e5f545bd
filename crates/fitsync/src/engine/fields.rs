//! Target-field computation for one incoming activity
//!
//! Everything the workspace record will hold is computed up front into an
//! `ActivityFields` value: classification, split name/location, rounded
//! numbers and display strings. The same value drives matching, the
//! create/update diff and property rendering.

use chrono::NaiveDate;
use serde_json::{json, Value};

use crate::engine::matcher::MatchTarget;
use crate::engine::rules;
use crate::format::{format_pace, format_training_effect, format_training_message, round1, round2};
use crate::models::Activity;
use crate::store::{page, Icon, StoredRecord};

/// Platform tag substituted with a human label before name splitting
const ENTERTAINMENT_TAG: &str = "ENTERTAINMENT";
const ENTERTAINMENT_LABEL: &str = "Netflix";

/// The full computed field set for one activity record
#[derive(Debug, Clone)]
pub struct ActivityFields {
    /// Raw GMT start timestamp, written as the record date on create
    pub start_time: String,
    /// Calendar date used for the date-scoped candidate query
    pub date: Option<NaiveDate>,
    pub kind: String,
    pub subtype: String,
    /// Display label after substitution and location splitting
    pub name: String,
    pub location: String,
    pub distance_km: f64,
    pub duration_min: f64,
    pub calories: f64,
    pub pace: String,
    pub avg_power: f64,
    pub max_power: f64,
    pub training_effect: String,
    pub aerobic: f64,
    pub aerobic_message: String,
    pub anaerobic: f64,
    pub anaerobic_message: String,
    pub pr: bool,
    pub favorite: bool,
    pub icon: Option<&'static str>,
}

impl ActivityFields {
    /// Compute the full target-field set for an incoming activity
    pub fn build(activity: &Activity) -> Self {
        let raw_name = activity
            .display_name()
            .replace(ENTERTAINMENT_TAG, ENTERTAINMENT_LABEL);
        let (name, location) = rules::split_name(&raw_name);
        let category = rules::classify(&activity.type_key(), &name);
        let icon = rules::icon_for(&category);

        Self {
            start_time: activity.start_time().to_string(),
            date: activity.start_date(),
            kind: category.kind,
            subtype: category.label,
            name,
            location,
            distance_km: round2(activity.distance_meters() / 1000.0),
            duration_min: round2(activity.duration_seconds() / 60.0),
            calories: activity.calorie_count().round(),
            pace: format_pace(activity.speed_mps()),
            avg_power: round1(activity.average_power()),
            max_power: round1(activity.maximum_power()),
            training_effect: format_training_effect(activity.effect_label()),
            aerobic: round1(activity.aerobic_effect()),
            aerobic_message: format_training_message(activity.aerobic_message()),
            anaerobic: round1(activity.anaerobic_effect()),
            anaerobic_message: format_training_message(activity.anaerobic_message()),
            pr: activity.is_pr(),
            favorite: activity.is_favorite(),
            icon,
        }
    }

    /// Identity fields the matcher runs on
    pub fn match_target(&self) -> MatchTarget {
        MatchTarget {
            duration_min: self.duration_min,
            distance_km: self.distance_km,
            title: self.name.trim().to_lowercase(),
        }
    }

    pub fn icon(&self) -> Option<Icon> {
        self.icon.map(|url| Icon::External(url.to_string()))
    }

    /// Render the property set for a create or update call.
    ///
    /// Updates keep the original Date but always write Location: an empty
    /// location clears the stored field rather than leaving it stale.
    pub fn properties(&self, for_update: bool) -> Value {
        let mut properties = json!({
            "Activity Type": page::select(&self.kind),
            "Subactivity Type": page::select(&self.subtype),
            "Activity Name": page::title(&self.name),
            "Distance (km)": page::number(self.distance_km),
            "Duration (min)": page::number(self.duration_min),
            "Calories": page::number(self.calories),
            "Avg Pace": page::rich_text(&self.pace),
            "Avg Power": page::number(self.avg_power),
            "Max Power": page::number(self.max_power),
            "Training Effect": page::select(&self.training_effect),
            "Aerobic": page::number(self.aerobic),
            "Aerobic Effect": page::select(&self.aerobic_message),
            "Anaerobic": page::number(self.anaerobic),
            "Anaerobic Effect": page::select(&self.anaerobic_message),
            "PR": page::checkbox(self.pr),
            "Fav": page::checkbox(self.favorite),
        });

        if !for_update {
            properties["Date"] = page::date_start(&self.start_time);
        }

        if !self.location.is_empty() {
            properties["Location"] = page::rich_text(&self.location);
        } else if for_update {
            properties["Location"] = page::rich_text("");
        }

        properties
    }

    /// Decide whether any tracked field differs from the stored record's
    /// current values.
    pub fn differs_from(&self, stored: &StoredRecord) -> bool {
        let props = &stored.properties;

        let numbers_match = number_matches(page::prop_number(props, "Distance (km)"), self.distance_km)
            && number_matches(page::prop_number(props, "Duration (min)"), self.duration_min)
            && number_matches(page::prop_number(props, "Calories"), self.calories)
            && number_matches(page::prop_number(props, "Avg Power"), self.avg_power)
            && number_matches(page::prop_number(props, "Max Power"), self.max_power)
            && number_matches(page::prop_number(props, "Aerobic"), self.aerobic)
            && number_matches(page::prop_number(props, "Anaerobic"), self.anaerobic);

        let labels_match = page::prop_rich_text(props, "Avg Pace").unwrap_or_default() == self.pace
            && page::prop_select(props, "Training Effect").unwrap_or_default()
                == self.training_effect
            && page::prop_select(props, "Aerobic Effect").unwrap_or_default()
                == self.aerobic_message
            && page::prop_select(props, "Anaerobic Effect").unwrap_or_default()
                == self.anaerobic_message
            && page::prop_select(props, "Activity Type").unwrap_or_default() == self.kind
            && page::prop_select(props, "Subactivity Type").unwrap_or_default() == self.subtype;

        let flags_match = page::prop_checkbox(props, "PR").unwrap_or(false) == self.pr
            && page::prop_checkbox(props, "Fav").unwrap_or(false) == self.favorite;

        !(numbers_match && labels_match && flags_match)
    }
}

/// A stored number matches when it agrees with the computed value after
/// 2-decimal rounding; an absent stored number always differs.
fn number_matches(stored: Option<f64>, computed: f64) -> bool {
    stored.is_some_and(|value| (round2(value) - computed).abs() < 1e-9)
}
