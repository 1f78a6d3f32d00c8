//! # opbind-core
//!
//! Binds a contract (a validated form over a domain model) to a JSON
//! representer inside a request-handling operation.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Error Handling
//!
//! Input that cannot be bound (malformed JSON, wrong value types, missing
//! params) is an [`Error`]. A failed validation is not: it is reported as
//! `Ok((false, op))` with [`Errors`] recorded on the contract.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod contract;
mod error;
pub mod fields;
pub mod operation;
pub mod params;
pub mod representer;

pub use contract::{Constraint, Contract, ContractSchema, Errors, FieldContract};
pub use error::{Error, Result};
pub use fields::{integer_value, text, text_value, Fields, Slot};
pub use operation::{Operation, OperationConfig, Process, Represented};
pub use params::Params;
pub use representer::{Link, RenderOptions, Representer, LINKS_KEY};
