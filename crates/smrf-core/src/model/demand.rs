//! # Demand Aggregation
//!
//! ## Overview
//!
//! Reduces the elastic element forces of the three load cases (dead, live,
//! earthquake) through the six ASCE 7-10 §2.3.2 strength combinations and
//! keeps, per member end and force component, the combination value of
//! largest magnitude. Column axial forces use the overstrength factor Ω0 in
//! place of the redundancy factor ρ in the seismic combinations
//! (AISC 341 §D1.4a).
//!
//! Force matrices are indexed `[story][2·element + end]` with end 0 at the
//! bottom (columns) or left (beams) node. Forces are in kips, moments in
//! kip·in.

use crate::core::checks::beam::BeamDemand;
use crate::core::checks::column::ColumnDemand;

/// Redundancy factor applied to seismic force effects.
const REDUNDANCY_FACTOR: f64 = 1.0;
/// Overstrength factor replacing ρ for column axial force.
const OVERSTRENGTH_FACTOR: f64 = 3.0;

/// Element end forces for one load case.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CaseForces {
    /// Column axial force, `[story][2·(bays+1)]`.
    pub column_axial: Vec<Vec<f64>>,
    /// Column shear force, same shape as `column_axial`.
    pub column_shear: Vec<Vec<f64>>,
    /// Column end moments, same shape as `column_axial`.
    pub column_moment: Vec<Vec<f64>>,
    /// Beam end shears, `[story][2·bays]`.
    pub beam_shear: Vec<Vec<f64>>,
    /// Beam end moments, same shape as `beam_shear`.
    pub beam_moment: Vec<Vec<f64>>,
}

impl CaseForces {
    /// An all-zero force table for a frame with `stories` stories and
    /// `bays` bays.
    pub fn zeros(stories: usize, bays: usize) -> Self {
        Self {
            column_axial: vec![vec![0.0; 2 * (bays + 1)]; stories],
            column_shear: vec![vec![0.0; 2 * (bays + 1)]; stories],
            column_moment: vec![vec![0.0; 2 * (bays + 1)]; stories],
            beam_shear: vec![vec![0.0; 2 * bays]; stories],
            beam_moment: vec![vec![0.0; 2 * bays]; stories],
        }
    }
}

/// The three elastic load cases a design iteration analyzes.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadCaseForces {
    pub dead: CaseForces,
    pub live: CaseForces,
    pub earthquake: CaseForces,
}

/// Per-cell governing values over the six strength combinations.
#[derive(Debug, Clone, PartialEq)]
pub struct GoverningDemand {
    pub column_axial: Vec<Vec<f64>>,
    pub column_shear: Vec<Vec<f64>>,
    pub column_moment: Vec<Vec<f64>>,
    pub beam_shear: Vec<Vec<f64>>,
    pub beam_moment: Vec<Vec<f64>>,
}

impl GoverningDemand {
    /// Runs all six combinations on every cell and keeps the governing value.
    pub fn from_cases(cases: &LoadCaseForces, sds: f64) -> Self {
        Self {
            column_axial: combine_matrix(
                &cases.dead.column_axial,
                &cases.live.column_axial,
                &cases.earthquake.column_axial,
                sds,
                OVERSTRENGTH_FACTOR,
            ),
            column_shear: combine_matrix(
                &cases.dead.column_shear,
                &cases.live.column_shear,
                &cases.earthquake.column_shear,
                sds,
                REDUNDANCY_FACTOR,
            ),
            column_moment: combine_matrix(
                &cases.dead.column_moment,
                &cases.live.column_moment,
                &cases.earthquake.column_moment,
                sds,
                REDUNDANCY_FACTOR,
            ),
            beam_shear: combine_matrix(
                &cases.dead.beam_shear,
                &cases.live.beam_shear,
                &cases.earthquake.beam_shear,
                sds,
                REDUNDANCY_FACTOR,
            ),
            beam_moment: combine_matrix(
                &cases.dead.beam_moment,
                &cases.live.beam_moment,
                &cases.earthquake.beam_moment,
                sds,
                REDUNDANCY_FACTOR,
            ),
        }
    }

    /// Governing forces for one column, magnitudes for axial and shear and
    /// signed end moments.
    pub fn column_demand(&self, story: usize, column_no: usize) -> ColumnDemand {
        ColumnDemand {
            axial: self.column_axial[story][2 * column_no].abs(),
            shear: self.column_shear[story][2 * column_no].abs(),
            moment_bottom: self.column_moment[story][2 * column_no],
            moment_top: self.column_moment[story][2 * column_no + 1],
        }
    }

    /// Governing forces for one beam.
    pub fn beam_demand(&self, story: usize, bay: usize) -> BeamDemand {
        BeamDemand {
            shear: self.beam_shear[story][2 * bay].abs(),
            moment_left: self.beam_moment[story][2 * bay],
            moment_right: self.beam_moment[story][2 * bay + 1],
        }
    }
}

/// The six-combination governing value for one cell.
///
/// When the maximum and minimum have equal magnitude the minimum (negative
/// branch) wins.
fn governing_value(dead: f64, live: f64, earthquake: f64, sds: f64, seismic_factor: f64) -> f64 {
    let combos = [
        1.4 * dead,
        1.2 * dead + 1.6 * live,
        (1.2 + 0.2 * sds) * dead + 0.5 * live + seismic_factor * earthquake,
        (1.2 + 0.2 * sds) * dead + 0.5 * live - seismic_factor * earthquake,
        (0.9 - 0.2 * sds) * dead + seismic_factor * earthquake,
        (0.9 - 0.2 * sds) * dead - seismic_factor * earthquake,
    ];
    let maximum = combos.iter().cloned().fold(f64::MIN, f64::max);
    let minimum = combos.iter().cloned().fold(f64::MAX, f64::min);
    if maximum.abs() > minimum.abs() {
        maximum
    } else {
        minimum
    }
}

fn combine_matrix(
    dead: &[Vec<f64>],
    live: &[Vec<f64>],
    earthquake: &[Vec<f64>],
    sds: f64,
    seismic_factor: f64,
) -> Vec<Vec<f64>> {
    dead.iter()
        .zip(live)
        .zip(earthquake)
        .map(|((dead_row, live_row), eq_row)| {
            dead_row
                .iter()
                .zip(live_row)
                .zip(eq_row)
                .map(|((d, l), e)| governing_value(*d, *l, *e, sds, seismic_factor))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    #[test]
    fn gravity_only_cell_is_governed_by_second_combination() {
        // 1.2·10 + 1.6·5 = 20 beats 1.4·10 = 14 and the seismic combos.
        let value = governing_value(10.0, 5.0, 0.0, 1.0, REDUNDANCY_FACTOR);
        assert!(f64_approx_equal(value, 20.0));
    }

    #[test]
    fn seismic_cell_keeps_signed_minimum_when_magnitudes_tie() {
        // Zero gravity: combos reduce to ±ρE, so |max| == |min| and the
        // negative branch wins.
        let value = governing_value(0.0, 0.0, 30.0, 1.0, REDUNDANCY_FACTOR);
        assert!(f64_approx_equal(value, -30.0));
    }

    #[test]
    fn seismic_cell_keeps_maximum_when_it_dominates() {
        // Dead load shifts the envelope positive: (1.2+0.2)·10 + 30 = 44
        // against the minimum (0.9-0.2)·10 - 30 = -23.
        let value = governing_value(10.0, 0.0, 30.0, 1.0, REDUNDANCY_FACTOR);
        assert!(f64_approx_equal(value, 44.0));
    }

    #[test]
    fn overstrength_applies_to_column_axial_only() {
        let stories = 1;
        let bays = 1;
        let mut dead = CaseForces::zeros(stories, bays);
        let mut earthquake = CaseForces::zeros(stories, bays);
        dead.column_axial[0][0] = 1.0;
        dead.column_shear[0][0] = 1.0;
        earthquake.column_axial[0][0] = 10.0;
        earthquake.column_shear[0][0] = 10.0;
        let cases = LoadCaseForces {
            dead,
            live: CaseForces::zeros(stories, bays),
            earthquake,
        };
        let governing = GoverningDemand::from_cases(&cases, 1.0);
        // Axial: (1.2+0.2)·1 + 3.0·10 = 31.4; shear: (1.2+0.2)·1 + 1.0·10 = 11.4.
        assert!(f64_approx_equal(governing.column_axial[0][0], 31.4));
        assert!(f64_approx_equal(governing.column_shear[0][0], 11.4));
    }

    #[test]
    fn member_demand_accessors_use_end_indices_and_magnitudes() {
        let stories = 1;
        let bays = 2;
        let mut earthquake = CaseForces::zeros(stories, bays);
        // Interior column (index 1): bottom entries at 2, top at 3.
        earthquake.column_axial[0][2] = 8.0;
        earthquake.column_shear[0][2] = 4.0;
        earthquake.column_moment[0][2] = 120.0;
        earthquake.column_moment[0][3] = -90.0;
        // Second bay: left end at 2, right end at 3.
        earthquake.beam_shear[0][2] = 6.0;
        earthquake.beam_moment[0][2] = 150.0;
        earthquake.beam_moment[0][3] = -110.0;
        let cases = LoadCaseForces {
            dead: CaseForces::zeros(stories, bays),
            live: CaseForces::zeros(stories, bays),
            earthquake,
        };
        let governing = GoverningDemand::from_cases(&cases, 1.0);
        let column = governing.column_demand(0, 1);
        // Ties resolve to the negative branch; accessors take magnitudes for
        // axial and shear and keep moment signs.
        assert!(f64_approx_equal(column.axial, 24.0));
        assert!(f64_approx_equal(column.shear, 4.0));
        assert!(f64_approx_equal(column.moment_bottom, -120.0));
        assert!(f64_approx_equal(column.moment_top, 90.0));
        let beam = governing.beam_demand(0, 1);
        assert!(f64_approx_equal(beam.shear, 6.0));
        assert!(f64_approx_equal(beam.moment_left, -150.0));
        assert!(f64_approx_equal(beam.moment_right, 110.0));
    }
}
