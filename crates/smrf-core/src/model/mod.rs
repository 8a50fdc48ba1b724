//! # Structural Model
//!
//! The mutable frame description driven by the design loop (geometry,
//! gravity loads, ELF parameters, candidate pools and the current member
//! size assignment) and the demand aggregation that reduces elastic
//! analysis results through the ASCE 7 load combinations.

pub mod config;
pub mod demand;
pub mod frame;
