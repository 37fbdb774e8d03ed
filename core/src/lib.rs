//! Roll-call caseload redistribution.
//!
//! Takes one day's staff roster as raw rows with arbitrary headers and
//! moves the caseload of absent or overloaded staff onto colleagues with
//! spare capacity, most urgent tier first, without pushing anyone over
//! the cap. See `engine` for the stage order.

pub mod capacity;
pub mod cell;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod field_resolver;
pub mod normalizer;
pub mod queue;
pub mod record;
pub mod redistribution;
pub mod report;
pub mod snapshot;
pub mod tier;
pub mod types;

pub use cell::{Cell, RawRow};
pub use config::RedistributionConfig;
pub use engine::{redistribute, RollCallEngine};
pub use error::{RosterError, RosterResult, SchemaError};
pub use report::RedistributionReport;
pub use tier::Tier;
