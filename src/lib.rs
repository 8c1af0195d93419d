pub mod account;
pub mod auction;
pub mod auth;
pub mod bidding;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod query;
pub mod state;
pub mod store;
