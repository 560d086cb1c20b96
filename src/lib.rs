pub mod address;
pub mod config;
pub mod engine;
pub mod errors;
pub mod ledger;
pub mod market;
pub mod models;
pub mod telegram;
