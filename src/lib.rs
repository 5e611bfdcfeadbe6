//! gofinances: summarizes locally stored financial transactions into a dashboard of total
//! entries, total expenses, the net balance and a display-ready transaction listing.

pub mod args;
pub mod commands;
mod config;
pub mod dashboard;
mod db;
mod error;
pub mod format;
pub mod model;
pub mod store;
pub mod summary;
mod utils;

pub use config::Config;
pub use error::{Error, ErrorType, Result};
