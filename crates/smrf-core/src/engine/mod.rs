//! # Engine Module
//!
//! The analysis side of a design iteration: the [`solver`] trait through
//! which elastic results enter the loop, the built-in approximate
//! [`portal`]-frame solver, and the [`members`] builder that turns a frame
//! and its governing demands into per-story beam, column and connection
//! check snapshots.
//!
//! - **Solver abstraction** ([`solver`]) - trait contract and response types
//! - **Approximate analysis** ([`portal`]) - portal-method lateral forces,
//!   gravity fixed-end forces, story-stiffness drifts, Rayleigh period
//! - **Check assembly** ([`members`]) - builds the check sets consumed by the
//!   design workflow
//! - **Progress Monitoring** ([`progress`]) - callback-based progress events
//! - **Error Handling** ([`error`]) - engine-level error taxonomy

pub mod error;
pub mod members;
pub mod portal;
pub mod progress;
pub mod solver;
