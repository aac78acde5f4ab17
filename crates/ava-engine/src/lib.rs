//! ava-engine: Headless engine for the Ava two-panel chat demo
//!
//! This crate provides the core logic, with no terminal I/O:
//! - Bag-of-words matching against canned question/answer tables
//! - Per-panel conversation sessions with delayed replies
//! - The two-panel coordinator and built-in patient profiles
//! - QA document loading and configuration

pub mod config;
pub mod dataset;
pub mod matcher;
pub mod panel;
pub mod profile;
pub mod scheduler;
pub mod session;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use dataset::{DataLoadError, LenientParse, QaDocument};
pub use matcher::{best_match, find_answer, normalize, tokenize, Match, QaEntry, QaTable};
pub use panel::{Panel, PanelId, Panels};
pub use profile::{Demographic, Profile};
pub use scheduler::{
    Delivery, ManualScheduler, ReplyDelay, Scheduler, TaskHandle, TokioScheduler,
};
pub use session::{
    DeliveryOutcome, IgnoredDelivery, Message, Rejection, ReplyContext, Role, Session,
    SessionState, SubmitOutcome, ASSISTANT_NAME,
};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
