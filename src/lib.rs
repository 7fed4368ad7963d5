pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod fixtures;
pub mod models;
pub mod seeder;
pub mod store;

pub use error::{SeedError, SeedResult, exit_status};
pub use fixtures::{FakerSource, FixtureSource};
pub use seeder::{SeedPlan, SeedReport, Seeder};
pub use store::{MemoryStore, OrmStore, Store};
