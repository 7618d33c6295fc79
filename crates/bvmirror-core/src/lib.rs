pub mod catalog;
pub mod config;
pub mod daemon;
pub mod driver;
pub mod fetch;
pub mod jobs;
pub mod logging;
pub mod mirror;
pub mod planner;
pub mod schema;
