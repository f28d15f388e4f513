//! Fleet Payout library crate.
//!
//! This crate exposes the fleet payout distribution engine: fleets
//! split their proceeds among members by role and modifiers, reports
//! roll several fleets up into one ledger per participant, and the
//! batch engine settles many reports at once. External applications may
//! depend on the `fleet_payout` crate and call into `engine::run`
//! directly or drive [`fleet::Fleet`] and [`report::Report`] themselves.

pub mod composition;
pub mod config;
pub mod engine;
pub mod error;
pub mod fleet;
pub mod ledger;
pub mod member;
pub mod models;
pub mod policy;
pub mod report;
pub mod role;

pub use error::{CompositionError, FleetError};
pub use fleet::Fleet;
pub use member::Member;
pub use report::Report;
