//! opbind - operations bound to contracts and JSON representers
//!
//! The album/song catalog, CLI definition, and config loading behind the
//! `opbind` binary.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod cli;
pub mod config;

pub use catalog::{CatalogOperation, Outcome};
pub use config::{load_config, Config};
