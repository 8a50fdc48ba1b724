//! # Steel Material Properties
//!
//! Defines the immutable material record shared by all member and connection
//! strength checks. Values are in kip/inch units (ksi).

/// Mechanical properties of a structural steel grade.
///
/// `ry` is the ratio of expected to nominal yield stress (AISC 341 Table A3.1)
/// used by capacity-design checks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SteelMaterial {
    /// Nominal yield stress, ksi.
    pub fy: f64,
    /// Nominal ultimate stress, ksi.
    pub fu: f64,
    /// Elastic modulus, ksi.
    pub e: f64,
    /// Expected-to-nominal yield stress ratio.
    pub ry: f64,
}

impl SteelMaterial {
    pub fn new(fy: f64, fu: f64, e: f64, ry: f64) -> Self {
        Self { fy, fu, e, ry }
    }

    /// Peak-connection-strength factor Cpr (AISC 358 Eq. 2.4-2), capped at 1.2.
    pub fn cpr(&self) -> f64 {
        ((self.fy + self.fu) / (2.0 * self.fy)).min(1.2)
    }
}

impl Default for SteelMaterial {
    /// ASTM A992, the default grade for rolled W-shapes.
    fn default() -> Self {
        Self::new(50.0, 65.0, 29000.0, 1.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    #[test]
    fn default_material_is_a992() {
        let steel = SteelMaterial::default();
        assert_eq!(steel.fy, 50.0);
        assert_eq!(steel.fu, 65.0);
        assert_eq!(steel.e, 29000.0);
        assert_eq!(steel.ry, 1.1);
    }

    #[test]
    fn cpr_for_a992_is_below_cap() {
        let steel = SteelMaterial::default();
        assert!((steel.cpr() - 1.15).abs() < TOLERANCE);
    }

    #[test]
    fn cpr_is_capped_at_one_point_two() {
        let steel = SteelMaterial::new(36.0, 58.0, 29000.0, 1.5);
        assert!((steel.cpr() - 1.2).abs() < TOLERANCE);
    }
}
