pub mod access;
pub mod api;
pub mod config;
pub mod database;
pub mod due;
pub mod errors;
pub mod logging;
pub mod models;
pub mod review_service;
pub mod scheduler;

pub use access::{AccessDecision, AccessPolicy, Action, UnrestrictedPolicy};
pub use database::Database;
pub use errors::*;
pub use models::*;
pub use review_service::ReviewService;
pub use scheduler::{Rating, SchedulerConfig, Sm2Scheduler};
