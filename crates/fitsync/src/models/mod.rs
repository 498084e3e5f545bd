pub mod activity;
pub mod sleep;

pub use activity::{Activity, ActivityType};
pub use sleep::{DailySleep, SleepSession};
