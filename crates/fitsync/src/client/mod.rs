//! Source platform collaborator: read-only access to activity and sleep
//! data.

pub mod api;

pub use api::FitnessClient;
