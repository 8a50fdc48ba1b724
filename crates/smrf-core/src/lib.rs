//! # SMRF Design Core Library
//!
//! A library for automated seismic design of steel special moment-resisting
//! frames, following the equivalent-lateral-force procedure of ASCE 7-10
//! and the member and connection provisions of AISC 341, 358 and 360.
//!
//! ## Architectural Philosophy
//!
//! The library is designed with a strict layered architecture to ensure a
//! clear separation of concerns, making it modular, testable, and
//! extensible.
//!
//! - **[`core`]: The Foundation.** Stateless data and calculators: the
//!   wide-flange section catalog, steel material properties, the seismic
//!   design spectrum, and the per-member code-check engines.
//!
//! - **[`model`]: The Design State.** The frame being designed: geometry,
//!   gravity loads, candidate section pools, the current member sizes, and
//!   the load-combination machinery that turns elastic results into
//!   governing demands.
//!
//! - **[`engine`]: The Logic Core.** The analysis side of an iteration:
//!   the [`engine::solver::ElasticSolver`] seam, the built-in portal-method
//!   solver, and the builder that assembles the member and connection check
//!   snapshots.
//!
//! - **[`workflows`]: The Public API.** The highest-level, user-facing
//!   layer. It ties the `engine` and `model` together to execute the
//!   complete design procedure and returns the optimal and constructable
//!   designs.

pub mod core;
pub mod engine;
pub mod model;
pub mod workflows;
