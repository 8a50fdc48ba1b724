//! # Member and Connection Check Engines
//!
//! Pure strength- and detailing-check calculators. Each engine takes a
//! section, a demand set and a material, computes every code check up front,
//! and exposes the results as an immutable snapshot: strengths,
//! demand/capacity ratios, per-check feasibility flags, and (for members)
//! the modified-IMK plastic-hinge parameters used by downstream nonlinear
//! modeling. Engines never mutate shared state; the design loop rebuilds
//! them whenever sizes or demands change.

pub mod beam;
pub mod column;
pub mod connection;

/// Modified-IMK deterioration parameters for a member plastic hinge.
///
/// Units are kips and inches; rotations are radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HingeParams {
    /// Rotational stiffness 6EI/L.
    pub k0: f64,
    /// Nominal bending strength Zx·Fy.
    pub myp: f64,
    /// Effective yield strength.
    pub my: f64,
    /// Reference cumulative plastic rotation.
    pub lambda: f64,
    /// Pre-capping plastic rotation.
    pub theta_p: f64,
    /// Post-capping plastic rotation.
    pub theta_pc: f64,
    /// Yield rotation My/K0.
    pub theta_y: f64,
    /// Strain-hardening ratio before the n = 10 modification.
    pub strain_hardening: f64,
    /// Residual strength ratio.
    pub residual: f64,
    /// Ultimate rotation.
    pub theta_u: f64,
}
