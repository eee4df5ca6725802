pub mod config;
pub mod facts;
pub mod report;
pub mod score;
