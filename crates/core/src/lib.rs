//! Domain types and pure logic for the Slate study planner.
//!
//! Nothing in this crate touches the database or the network; the `db` and
//! `api` crates call into it for validation, timer transitions, and the
//! analytics arithmetic behind the dashboards.

pub mod analytics;
pub mod error;
pub mod focus;
pub mod party;
pub mod planner;
pub mod timer;
pub mod timezone;
pub mod types;
pub mod validation;
