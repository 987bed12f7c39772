//! Health data aggregation from the Oura ring API.
//!
//! Four daily collections are read over a trailing date window and handed
//! on unmodified. Payload shape is never validated here; the insight prompt
//! embeds the raw JSON.

pub mod client;
pub mod model;

pub use client::{HealthDataSource, OuraClient, OuraConfig};
pub use model::{DateWindow, HealthCategory, HealthSnapshot};
