#![warn(clippy::all, missing_docs)]

//! Core engine of the Verse setup guide.
//!
//! This crate hosts the content catalog, the step flow composer and
//! directive resolvers, the draft calculator and the persistence layer
//! used by the terminal UI and any future frontends.

pub mod callouts;
pub mod catalog;
pub mod config;
pub mod conflict;
pub mod flow;
pub mod guide;
pub mod impact;
pub mod models;
pub mod normalize;
pub mod resolve;
pub mod store;
pub mod turn_order;

pub use catalog::{Catalog, ContentError};
pub use config::AppConfig;
pub use conflict::{Conflict, ConflictSide};
pub use flow::compose;
pub use guide::{build_guide, stale_since, Selections, StepDetails, StepView};
pub use models::{Configuration, DetailMode};
pub use store::{ConfigStore, FileStore, MemoryStore};
pub use turn_order::DraftState;
