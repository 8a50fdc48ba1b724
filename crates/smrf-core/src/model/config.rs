//! Tunable ratios and limits steering the automated design loop.

use serde::Deserialize;

/// Design-loop parameters with the customary defaults for a two-frame
/// perimeter SMF layout checked against a strong-column-weak-beam ratio
/// of 1.0.
///
/// All fields are optional in serialized form; missing fields take the
/// defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DesignConfig {
    /// Allowable story drift ratio (ASCE 7-10 Table 12.12-1).
    pub drift_limit: f64,
    /// Amplifier on elastic drifts accounting for the stiffness loss of
    /// reduced beam sections.
    pub rbs_stiffness_factor: f64,
    /// Lateral-force amplifier for accidental torsion on a perimeter frame.
    pub accidental_torsion: f64,
    /// When true the drift-level period is bounded by CuTa, i.e. the
    /// relief of ASCE 7-10 §12.8.6.2 is not taken.
    pub bound_drift_period: bool,
    /// Minimum column-to-beam moment ratio at a joint (AISC 341 §E3.4a).
    pub scwb_ratio: f64,
    /// Target beam Zx as a fraction of the interior column Zx when a beam
    /// is sized from its supporting column.
    pub beam_to_column_zx_ratio: f64,
    /// Target exterior-column Ix as a fraction of the interior column Ix.
    pub exterior_interior_ix_ratio: f64,
    /// When a joint fails the strong-column check, the upper column is
    /// upsized instead of the lower one if its Zx falls below this
    /// fraction of the lower column Zx.
    pub upper_lower_column_zx_ratio: f64,
    /// Number of adjacent stories forced to share one member size in the
    /// constructability pass.
    pub identical_size_per_story: usize,
    /// Hard cap on member-resize iterations before the loop is declared
    /// non-convergent.
    pub max_resize_iterations: usize,
}

impl Default for DesignConfig {
    fn default() -> Self {
        Self {
            drift_limit: 0.02,
            rbs_stiffness_factor: 1.09,
            accidental_torsion: 1.1,
            bound_drift_period: true,
            scwb_ratio: 1.0,
            beam_to_column_zx_ratio: 0.80,
            exterior_interior_ix_ratio: 1.0,
            upper_lower_column_zx_ratio: 0.5,
            identical_size_per_story: 2,
            max_resize_iterations: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_customary_design_values() {
        let config = DesignConfig::default();
        assert_eq!(config.drift_limit, 0.02);
        assert_eq!(config.rbs_stiffness_factor, 1.09);
        assert_eq!(config.accidental_torsion, 1.1);
        assert_eq!(config.scwb_ratio, 1.0);
        assert_eq!(config.identical_size_per_story, 2);
        assert!(config.bound_drift_period);
    }
}
