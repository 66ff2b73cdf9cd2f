pub mod config;
pub mod error;
pub mod mailer;
pub mod marketplace;
pub mod pipeline;
pub mod portfolio;
pub mod report;
pub mod secrets;
pub mod ticker;
pub mod trade;

pub use error::{Result, StatsError};
