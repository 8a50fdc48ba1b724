//! # Core Module
//!
//! The stateless foundation of the library: the data and calculators every
//! higher layer builds on, with no knowledge of the design loop.
//!
//! - **Section Catalog** ([`catalog`]) - the wide-flange database, loaded
//!   from CSV, with property-ordered candidate selection
//! - **Materials** ([`material`]) - structural steel grade properties
//! - **Seismic Loading** ([`seismic`]) - ASCE 7-10 site coefficients,
//!   design spectrum and equivalent-lateral-force parameters
//! - **Code Checks** ([`checks`]) - AISC 341/358/360 strength and
//!   detailing check engines for beams, columns and RBS connections

pub mod catalog;
pub mod checks;
pub mod material;
pub mod seismic;
