//! # Portal-Method Elastic Solver
//!
//! ## Overview
//!
//! A closed-form approximation of the elastic frame analysis, good enough to
//! drive the design loop without an external finite-element engine:
//!
//! - **Gravity cases**: fixed-end beam forces (`wL/2`, `wL²/12`) and
//!   tributary column axial forces accumulated from the roof down.
//! - **Earthquake case**: the classic portal method. Story shear is split
//!   among columns with interior columns taking two shares, columns bend in
//!   double curvature with inflection at mid-height, beam end moments
//!   balance the column moments at each joint, and exterior column axial
//!   force accumulates the beam shears.
//! - **Drifts**: shear-building estimate, story shear over the story's
//!   `Σ 12EI/h³` column stiffness.
//! - **Period**: Rayleigh quotient under an inverted-triangular load
//!   pattern.
//!
//! Gravity column moments are neglected; the seismic combinations dominate
//! the column flexural demands for the frames this targets. Leaning-column
//! gravity loads enter neither the lateral stiffness nor the member forces.

use crate::core::catalog::SectionCatalog;
use crate::core::material::SteelMaterial;
use crate::engine::solver::{ElasticResponse, ElasticSolver, SolverError};
use crate::model::demand::{CaseForces, LoadCaseForces};
use crate::model::frame::Frame;
use nalgebra::DVector;
use tracing::debug;

/// Standard gravity, in/s².
const GRAVITY_IN_PER_S2: f64 = 386.4;

/// The built-in approximate solver.
#[derive(Debug, Clone)]
pub struct PortalFrameSolver<'a> {
    catalog: &'a SectionCatalog,
    steel: SteelMaterial,
}

impl<'a> PortalFrameSolver<'a> {
    pub fn new(catalog: &'a SectionCatalog, steel: SteelMaterial) -> Self {
        Self { catalog, steel }
    }

    /// Lateral stiffness of every story, kip/in, from the fixed-fixed
    /// column sway stiffness `12EI/h³`.
    fn story_stiffnesses(&self, frame: &Frame) -> Result<Vec<f64>, SolverError> {
        let stories = frame.num_stories();
        let interior_count = (frame.geometry.num_bays - 1) as f64;
        let mut stiffnesses = Vec::with_capacity(stories);
        for story in 0..stories {
            let height_in = frame.geometry.story_height_ft(story) * 12.0;
            let exterior = self.catalog.lookup(&frame.sizes.exterior_column[story])?;
            let interior = self.catalog.lookup(&frame.sizes.interior_column[story])?;
            let total_ix = 2.0 * exterior.ix + interior_count * interior.ix;
            let stiffness = 12.0 * self.steel.e * total_ix / height_in.powi(3);
            if stiffness <= 0.0 {
                return Err(SolverError::NonPositiveStiffness { story });
            }
            stiffnesses.push(stiffness);
        }
        Ok(stiffnesses)
    }

    /// Column shear at `column_no` under a story shear of `story_shear`,
    /// with interior columns carrying twice the exterior share.
    fn portal_column_shear(frame: &Frame, story_shear: f64, column_no: usize) -> f64 {
        let bays = frame.geometry.num_bays;
        let share = if column_no == 0 || column_no == bays {
            1.0
        } else {
            2.0
        };
        story_shear * share / (2.0 * bays as f64)
    }

    fn gravity_case(&self, frame: &Frame, line_loads_lb_ft: &[f64]) -> CaseForces {
        let stories = frame.num_stories();
        let bays = frame.geometry.num_bays;
        let span_in = frame.geometry.bay_width_ft * 12.0;
        let mut case = CaseForces::zeros(stories, bays);

        // Tributary gravity per column and story, kips.
        let mut tributary = vec![vec![0.0; bays + 1]; stories];
        for story in 0..stories {
            let w = line_loads_lb_ft[story] * 0.001 / 12.0;
            for bay in 0..bays {
                case.beam_shear[story][2 * bay] = w * span_in / 2.0;
                case.beam_shear[story][2 * bay + 1] = w * span_in / 2.0;
                case.beam_moment[story][2 * bay] = -w * span_in * span_in / 12.0;
                case.beam_moment[story][2 * bay + 1] = w * span_in * span_in / 12.0;
            }
            for column_no in 0..=bays {
                let spans = if column_no == 0 || column_no == bays {
                    0.5
                } else {
                    1.0
                };
                tributary[story][column_no] = w * span_in * spans;
            }
        }
        for column_no in 0..=bays {
            let mut accumulated = 0.0;
            for story in (0..stories).rev() {
                accumulated += tributary[story][column_no];
                case.column_axial[story][2 * column_no] = accumulated;
                case.column_axial[story][2 * column_no + 1] = accumulated;
            }
        }
        case
    }

    fn earthquake_case(&self, frame: &Frame, frame_story_forces: &[f64]) -> CaseForces {
        let stories = frame.num_stories();
        let bays = frame.geometry.num_bays;
        let span_in = frame.geometry.bay_width_ft * 12.0;
        let mut case = CaseForces::zeros(stories, bays);

        let mut story_shears = vec![0.0; stories];
        let mut running = 0.0;
        for story in (0..stories).rev() {
            running += frame_story_forces[story];
            story_shears[story] = running;
        }

        // Column shears and mid-height-inflection end moments.
        let mut column_end_moment = vec![vec![0.0; bays + 1]; stories];
        for story in 0..stories {
            let height_in = frame.geometry.story_height_ft(story) * 12.0;
            for column_no in 0..=bays {
                let shear = Self::portal_column_shear(frame, story_shears[story], column_no);
                let end_moment = shear * height_in / 2.0;
                column_end_moment[story][column_no] = end_moment;
                case.column_shear[story][2 * column_no] = shear;
                case.column_shear[story][2 * column_no + 1] = shear;
                case.column_moment[story][2 * column_no] = end_moment;
                case.column_moment[story][2 * column_no + 1] = end_moment;
            }
        }

        // Beam end moments from joint balance at the floor above each story,
        // split between the two beam ends at interior joints.
        for story in 0..stories {
            let joint_moment = |joint: usize| -> f64 {
                let below = column_end_moment[story][joint];
                let above = if story + 1 < stories {
                    column_end_moment[story + 1][joint]
                } else {
                    0.0
                };
                let beam_ends = if joint == 0 || joint == bays { 1.0 } else { 2.0 };
                (below + above) / beam_ends
            };
            for bay in 0..bays {
                let moment_left = joint_moment(bay);
                let moment_right = -joint_moment(bay + 1);
                let shear = (moment_left.abs() + moment_right.abs()) / span_in;
                case.beam_moment[story][2 * bay] = moment_left;
                case.beam_moment[story][2 * bay + 1] = moment_right;
                case.beam_shear[story][2 * bay] = shear;
                case.beam_shear[story][2 * bay + 1] = shear;
            }
        }

        // Exterior column axial force from accumulated beam shears.
        for story in (0..stories).rev() {
            let mut left = 0.0;
            let mut right = 0.0;
            for upper in story..stories {
                left += case.beam_shear[upper][0];
                right += case.beam_shear[upper][2 * (bays - 1)];
            }
            case.column_axial[story][0] = left;
            case.column_axial[story][1] = left;
            case.column_axial[story][2 * bays] = right;
            case.column_axial[story][2 * bays + 1] = right;
        }
        case
    }
}

impl ElasticSolver for PortalFrameSolver<'_> {
    fn modal_period(&self, frame: &Frame) -> Result<f64, SolverError> {
        let stories = frame.num_stories();
        let stiffnesses = self.story_stiffnesses(frame)?;
        let heights_in: Vec<f64> = frame.geometry.floor_heights_ft()[1..]
            .iter()
            .map(|h| h * 12.0)
            .collect();
        let frames = frame.geometry.num_lateral_frames as f64;
        let frame_weights: Vec<f64> = frame
            .loads
            .floor_weight_kips
            .iter()
            .map(|w| w / frames)
            .collect();
        if frame_weights.iter().sum::<f64>() <= 0.0 {
            return Err(SolverError::NonPositiveWeight);
        }

        // Inverted-triangular load pattern; the pattern scale cancels in the
        // Rayleigh quotient.
        let pattern = DVector::from_iterator(
            stories,
            frame_weights.iter().zip(&heights_in).map(|(w, h)| w * h),
        );
        let mut shear = DVector::zeros(stories);
        let mut running = 0.0;
        for story in (0..stories).rev() {
            running += pattern[story];
            shear[story] = running;
        }
        let mut displacement = 0.0;
        let displacements = DVector::from_iterator(
            stories,
            (0..stories).map(|story| {
                displacement += shear[story] / stiffnesses[story];
                displacement
            }),
        );
        let masses = DVector::from_iterator(
            stories,
            frame_weights.iter().map(|w| w / GRAVITY_IN_PER_S2),
        );
        let kinetic = masses.dot(&displacements.component_mul(&displacements));
        let work = pattern.dot(&displacements);
        let period = 2.0 * std::f64::consts::PI * (kinetic / work).sqrt();
        debug!(period_s = period, "Rayleigh period estimate");
        Ok(period)
    }

    fn analyze(&self, frame: &Frame) -> Result<ElasticResponse, SolverError> {
        let strength = frame
            .seismic_strength
            .as_ref()
            .ok_or(SolverError::MissingSeismicForces)?;
        let drift_level = frame
            .seismic_drift
            .as_ref()
            .ok_or(SolverError::MissingSeismicForces)?;
        let stiffnesses = self.story_stiffnesses(frame)?;

        let stories = frame.num_stories();
        let mut story_drifts = Vec::with_capacity(stories);
        let mut running = 0.0;
        let mut drift_shears = vec![0.0; stories];
        for story in (0..stories).rev() {
            running += drift_level.frame_story_force_kips[story];
            drift_shears[story] = running;
        }
        for story in 0..stories {
            let height_in = frame.geometry.story_height_ft(story) * 12.0;
            story_drifts.push(drift_shears[story] / stiffnesses[story] / height_in);
        }

        let forces = LoadCaseForces {
            dead: self.gravity_case(frame, &frame.loads.beam_dead_load_lb_ft),
            live: self.gravity_case(frame, &frame.loads.beam_live_load_lb_ft),
            earthquake: self.earthquake_case(frame, &strength.frame_story_force_kips),
        };
        Ok(ElasticResponse {
            story_drifts,
            forces,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Section;
    use crate::core::seismic::{SeismicSite, SiteClass};
    use crate::model::config::DesignConfig;
    use crate::model::frame::{FrameGeometry, GravityLoads, MemberDepths};

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn sample_csv() -> &'static str {
        "section size,d,bf,tf,tw,A,Ix,Iy,Zx,Sx,rx,ry,rts,J,Cw,h to tw ratio,bf to tf ratio\n\
         W14X193,15.5,15.7,1.440,0.890,56.8,2400.0,931.0,355.0,310.0,6.50,4.05,4.53,34.8,45900.0,12.8,5.45\n\
         W14X159,15.0,15.6,1.190,0.745,46.7,1900.0,748.0,287.0,254.0,6.38,4.00,4.47,19.7,35600.0,15.3,6.54\n\
         W14X90,14.0,14.5,0.710,0.440,26.5,999.0,362.0,157.0,143.0,6.14,3.70,4.10,4.06,16000.0,25.9,10.2\n\
         W21X57,21.1,6.56,0.650,0.405,16.7,1170.0,30.6,129.0,111.0,8.36,1.35,1.68,1.77,3190.0,46.3,5.04\n\
         W21X44,20.7,6.50,0.450,0.350,13.0,843.0,20.7,95.4,81.6,8.06,1.26,1.60,0.770,2110.0,53.6,7.22\n"
    }

    fn sample_catalog() -> SectionCatalog {
        let mut reader = csv::Reader::from_reader(sample_csv().as_bytes());
        let sections: Vec<Section> = reader
            .deserialize()
            .collect::<Result<_, _>>()
            .expect("sample CSV should parse");
        SectionCatalog::new(sections).expect("sample catalog should validate")
    }

    fn sample_site() -> SeismicSite {
        SeismicSite {
            site_class: SiteClass::D,
            ss: 1.5,
            s1: 0.6,
            tl: 8.0,
            r: 8.0,
            cd: 5.5,
            ie: 1.0,
            rho: 1.0,
            ct: 0.028,
            x: 0.8,
        }
    }

    fn sample_frame(stories: usize, bays: usize) -> Frame {
        let geometry = FrameGeometry {
            num_stories: stories,
            num_bays: bays,
            first_story_height_ft: 13.0,
            typical_story_height_ft: 13.0,
            bay_width_ft: 30.0,
            num_lateral_frames: 2,
        };
        let loads = GravityLoads {
            floor_weight_kips: vec![1000.0; stories],
            beam_dead_load_lb_ft: vec![600.0; stories],
            beam_live_load_lb_ft: vec![300.0; stories],
            leaning_column_dead_load_kips: vec![300.0; stories],
            leaning_column_live_load_kips: vec![150.0; stories],
        };
        let depths = MemberDepths {
            exterior_column: vec![vec!["W14".to_string()]; stories],
            interior_column: vec![vec!["W14".to_string()]; stories],
            beam: vec![vec!["W21".to_string()]; stories],
        };
        Frame::new(
            geometry,
            loads,
            sample_site(),
            &depths,
            &sample_catalog(),
            &DesignConfig::default(),
        )
        .expect("sample frame should build")
    }

    #[test]
    fn modal_period_is_positive_and_grows_when_sections_shrink() {
        let catalog = sample_catalog();
        let solver = PortalFrameSolver::new(&catalog, SteelMaterial::default());
        let stiff = sample_frame(3, 2);
        let mut soft = sample_frame(3, 2);
        for story in 0..3 {
            soft.sizes.interior_column[story] = "W14X90".to_string();
            soft.sizes.exterior_column[story] = "W14X90".to_string();
        }
        let period_stiff = solver.modal_period(&stiff).expect("period");
        let period_soft = solver.modal_period(&soft).expect("period");
        assert!(period_stiff > 0.0);
        assert!(period_soft > period_stiff);
    }

    #[test]
    fn analyze_without_seismic_forces_fails() {
        let catalog = sample_catalog();
        let solver = PortalFrameSolver::new(&catalog, SteelMaterial::default());
        let frame = sample_frame(2, 1);
        assert!(matches!(
            solver.analyze(&frame),
            Err(SolverError::MissingSeismicForces)
        ));
    }

    #[test]
    fn single_story_drift_matches_shear_over_stiffness() {
        let catalog = sample_catalog();
        let solver = PortalFrameSolver::new(&catalog, SteelMaterial::default());
        let mut frame = sample_frame(1, 1);
        let config = DesignConfig::default();
        let period = solver.modal_period(&frame).expect("period");
        frame.compute_seismic_forces(period, &config);
        let response = solver.analyze(&frame).expect("analysis");

        let drift_force = frame.seismic_drift.as_ref().expect("drift forces");
        let shear = drift_force.frame_story_force_kips[0];
        let height_in: f64 = 13.0 * 12.0;
        // Two exterior W14X193 columns.
        let stiffness = 12.0 * 29000.0 * 2.0 * 2400.0 / height_in.powi(3);
        assert!(f64_approx_equal(
            response.story_drifts[0],
            shear / stiffness / height_in
        ));
    }

    #[test]
    fn gravity_beam_forces_are_fixed_end_values() {
        let catalog = sample_catalog();
        let solver = PortalFrameSolver::new(&catalog, SteelMaterial::default());
        let mut frame = sample_frame(2, 2);
        let config = DesignConfig::default();
        frame.compute_seismic_forces(1.0, &config);
        let response = solver.analyze(&frame).expect("analysis");

        let w = 600.0 * 0.001 / 12.0; // kip/in
        let span_in = 360.0;
        let dead = &response.forces.dead;
        assert!(f64_approx_equal(dead.beam_shear[0][0], w * span_in / 2.0));
        assert!(f64_approx_equal(
            dead.beam_moment[0][1],
            w * span_in * span_in / 12.0
        ));
        // Interior column carries a full span per floor, two floors at the
        // first story.
        assert!(f64_approx_equal(
            dead.column_axial[0][2],
            2.0 * w * span_in
        ));
        assert!(f64_approx_equal(dead.column_axial[1][2], w * span_in));
        // Gravity puts no moment into the columns in this approximation.
        assert!(f64_approx_equal(dead.column_moment[0][2], 0.0));
    }

    #[test]
    fn portal_column_shears_sum_to_story_shear() {
        let catalog = sample_catalog();
        let solver = PortalFrameSolver::new(&catalog, SteelMaterial::default());
        let mut frame = sample_frame(2, 3);
        let config = DesignConfig::default();
        frame.compute_seismic_forces(1.0, &config);
        let response = solver.analyze(&frame).expect("analysis");

        let strength = frame.seismic_strength.as_ref().expect("strength forces");
        let story_shear: f64 = strength.frame_story_force_kips.iter().sum();
        let eq = &response.forces.earthquake;
        let column_total: f64 = (0..4).map(|col| eq.column_shear[0][2 * col]).sum();
        assert!(f64_approx_equal(column_total, story_shear));
        // Interior columns take twice the exterior share.
        assert!(f64_approx_equal(
            eq.column_shear[0][2],
            2.0 * eq.column_shear[0][0]
        ));
    }

    #[test]
    fn exterior_column_axial_accumulates_beam_shears() {
        let catalog = sample_catalog();
        let solver = PortalFrameSolver::new(&catalog, SteelMaterial::default());
        let mut frame = sample_frame(2, 2);
        let config = DesignConfig::default();
        frame.compute_seismic_forces(1.0, &config);
        let response = solver.analyze(&frame).expect("analysis");

        let eq = &response.forces.earthquake;
        let expected = eq.beam_shear[0][0] + eq.beam_shear[1][0];
        assert!(f64_approx_equal(eq.column_axial[0][0], expected));
        assert!(f64_approx_equal(eq.column_axial[1][0], eq.beam_shear[1][0]));
        // Interior columns see no net seismic axial force.
        assert!(f64_approx_equal(eq.column_axial[0][2], 0.0));
    }
}
