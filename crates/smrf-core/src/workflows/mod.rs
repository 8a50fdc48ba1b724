//! # Design Workflows
//!
//! The highest-level, user-facing layer. A workflow ties the `engine` and
//! `core` layers together to execute a complete design procedure: it owns
//! the resize loops, decides which member to adjust when a check fails,
//! and returns the finished design as an immutable snapshot.

pub mod design;
