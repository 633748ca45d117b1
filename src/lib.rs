pub mod api;
pub mod cli;
pub mod entity;
pub mod error;
pub mod projection;
pub mod service;
pub mod store;

pub use error::{Result, SkilltrackError};
pub use store::SqliteStore;
