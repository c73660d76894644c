//! Receipt intake and reward-points scoring.

pub mod config;
pub mod error;
pub mod receipts;
pub mod telemetry;
