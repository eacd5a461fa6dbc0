//! Carbon Tracker
//!
//! Estimates a personal monthly carbon footprint from transport,
//! electricity, diet and waste figures, keeps a session history, and asks a
//! text-generation service for reduction tips.

pub mod advisor;
pub mod calculator;
pub mod config;
pub mod db;
pub mod error;
pub mod factors;
pub mod history;
pub mod logging;
pub mod models;
pub mod report;
pub mod repl;
pub mod session;

pub use advisor::{Advice, GeminiClient, TipProvider, TipRequest};
pub use calculator::{calculate_footprint, Footprint};
pub use config::Config;
pub use error::{AdvisoryError, TrackerError, TrackerResult, TransportFailure};
pub use factors::EmissionFactors;
pub use history::HistoryStore;
pub use models::{ActivityInput, Breakdown, Category, DietProfile, FootprintRecord, TransportMode};
pub use session::Session;
