//! Activity classification rules
//!
//! One ordered rule table drives both the classifier and the name splitter.
//! The traversal policies differ and are deliberate: the classifier walks the
//! table in declared order (earlier rules take priority over later ones, even
//! when a later key is a longer substring match), while the name splitter
//! tries keys longest-first so a short key can never match inside a longer
//! suffix.

use crate::format::title_case;

/// A canonical `(Type, Subtype)` category pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Coarse grouping, e.g. "Running"
    pub kind: String,
    /// Display-level label, e.g. "Treadmill Running"
    pub label: String,
}

/// One classification rule: a lowercase match key and its category
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub key: &'static str,
    pub kind: &'static str,
    pub label: &'static str,
}

impl Rule {
    fn category(&self) -> Category {
        Category {
            kind: self.kind.to_string(),
            label: self.label.to_string(),
        }
    }
}

/// Closed rule table, versioned with the binary. Declaration order is the
/// classifier's tie-break.
pub const RULES: &[Rule] = &[
    Rule { key: "marche à pied", kind: "Walking", label: "Marche à pied" },
    Rule { key: "course à pied", kind: "Running", label: "Running" },
    Rule { key: "musculation", kind: "Strength", label: "Strength Training" },
    Rule { key: "barre", kind: "Strength", label: "Barre" },
    Rule { key: "cardio interieur", kind: "Cardio", label: "Indoor Cardio" },
    Rule { key: "vélo d'interieur", kind: "Cycling", label: "Indoor Cycling" },
    Rule { key: "rameur", kind: "Rowing", label: "Indoor Rowing" },
    Rule { key: "treadmill running", kind: "Running", label: "Treadmill Running" },
    Rule { key: "rowing v2", kind: "Rowing", label: "Rowing" },
    Rule { key: "yoga", kind: "Yoga/Pilates", label: "Yoga" },
    Rule { key: "pilates", kind: "Yoga/Pilates", label: "Pilates" },
    Rule { key: "meditation", kind: "Meditation", label: "Meditation" },
    Rule { key: "étirement", kind: "Stretching", label: "Stretching" },
    Rule { key: "natation en piscine", kind: "Swimming", label: "Swimming" },
    Rule { key: "natation en eau libre", kind: "Swimming", label: "Open Water Swimming" },
    Rule { key: "me suivre", kind: "Other", label: "Me Suivre" },
];

/// Display icons keyed by category label (Subtype first, Type as fallback)
const ICONS: &[(&str, &str)] = &[
    ("Barre", "https://img.icons8.com/?size=100&id=66924&format=png&color=000000"),
    ("Breathwork", "https://img.icons8.com/?size=100&id=9798&format=png&color=000000"),
    ("Cardio", "https://img.icons8.com/?size=100&id=71221&format=png&color=000000"),
    ("Cycling", "https://img.icons8.com/?size=100&id=47443&format=png&color=000000"),
    ("Hiking", "https://img.icons8.com/?size=100&id=9844&format=png&color=000000"),
    ("Marche à pied", "https://img.icons8.com/?size=100&id=9844&format=png&color=000000"),
    ("Me Suivre", "https://img.icons8.com/?size=100&id=9844&format=png&color=000000"),
    ("Indoor Cardio", "https://img.icons8.com/?size=100&id=62779&format=png&color=000000"),
    ("Indoor Cycling", "https://img.icons8.com/?size=100&id=47443&format=png&color=000000"),
    ("Indoor Rowing", "https://img.icons8.com/?size=100&id=71098&format=png&color=000000"),
    ("Pilates", "https://img.icons8.com/?size=100&id=9774&format=png&color=000000"),
    ("Meditation", "https://img.icons8.com/?size=100&id=9798&format=png&color=000000"),
    ("Rowing", "https://img.icons8.com/?size=100&id=71491&format=png&color=000000"),
    ("Running", "https://img.icons8.com/?size=100&id=k1l1XFkME39t&format=png&color=000000"),
    ("Strength Training", "https://img.icons8.com/?size=100&id=107640&format=png&color=000000"),
    ("Stretching", "https://img.icons8.com/?size=100&id=djfOcRn1m_kh&format=png&color=000000"),
    ("Swimming", "https://img.icons8.com/?size=100&id=9777&format=png&color=000000"),
    ("Treadmill Running", "https://img.icons8.com/?size=100&id=9794&format=png&color=000000"),
    ("Walking", "https://img.icons8.com/?size=100&id=9807&format=png&color=000000"),
    ("Yoga", "https://img.icons8.com/?size=100&id=9783&format=png&color=000000"),
];

/// Normalize a raw activity type code: separators become spaces, lowercased.
/// An empty code degrades to "unknown".
pub fn normalize_type_code(type_code: &str) -> String {
    if type_code.is_empty() {
        return "unknown".to_string();
    }
    type_code.replace(['_', '-'], " ").to_lowercase()
}

/// Map a raw activity type code plus a free-text name to a canonical
/// category.
///
/// Resolution order: exact rule key match on the normalized type code, then
/// the first declared rule whose key appears anywhere in the lowercased
/// name, then a title-cased rendition of the type code itself. Always
/// returns a category; unknown input becomes its own category.
pub fn classify(type_code: &str, name: &str) -> Category {
    let normalized = normalize_type_code(type_code);

    if let Some(rule) = RULES.iter().find(|r| r.key == normalized) {
        return rule.category();
    }

    if !name.is_empty() {
        let name_lower = name.to_lowercase();
        if let Some(rule) = RULES.iter().find(|r| name_lower.contains(r.key)) {
            return rule.category();
        }
    }

    let fallback = title_case(&normalized);
    Category {
        kind: fallback.clone(),
        label: fallback,
    }
}

/// Separate an embedded location prefix from a raw activity name.
///
/// Rule keys are tried longest-first as suffixes of the lowercased name; the
/// first hit yields the rule's display label plus the trimmed prefix as the
/// location. Without a suffix hit the last whitespace token becomes the
/// label and everything before it the location.
pub fn split_name(raw_name: &str) -> (String, String) {
    let trimmed = raw_name.trim();
    let name_lower = trimmed.to_lowercase();

    let mut by_length: Vec<&Rule> = RULES.iter().collect();
    by_length.sort_by_key(|r| std::cmp::Reverse(r.key.chars().count()));

    for rule in by_length {
        if name_lower.ends_with(rule.key) {
            let keep = trimmed
                .chars()
                .count()
                .saturating_sub(rule.key.chars().count());
            let location: String = trimmed.chars().take(keep).collect();
            return (rule.label.to_string(), location.trim().to_string());
        }
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() => ((*last).to_string(), rest.join(" ")),
        Some((last, _)) => ((*last).to_string(), String::new()),
        None => (String::new(), String::new()),
    }
}

/// Resolve the display icon for a category: Subtype entry first, Type entry
/// as fallback. A miss is not an error.
pub fn icon_for(category: &Category) -> Option<&'static str> {
    icon_by_label(&category.label).or_else(|| icon_by_label(&category.kind))
}

fn icon_by_label(label: &str) -> Option<&'static str> {
    ICONS.iter().find(|(key, _)| *key == label).map(|(_, url)| *url)
}
