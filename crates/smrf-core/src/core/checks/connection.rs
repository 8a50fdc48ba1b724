//! # RBS Connection Check Engine
//!
//! ## Overview
//!
//! Evaluates one beam-to-column joint per the AISC 358 §5.8 design
//! procedure for reduced-beam-section moment connections: prequalification
//! geometry limits, probable maximum moment at the RBS center, shear at the
//! RBS from plastic-mechanism statics plus gravity, probable moment at the
//! column face against the beam's expected plastic moment, beam shear
//! sufficiency, the strong-column-weak-beam (SCWB) moment-ratio check of
//! AISC 341 §E3.4a, and panel-zone doubler-plate sizing in 1/4-inch steps.
//!
//! A joint is one of four topologies depending on its position in the
//! frame; the sides that exist determine which demands are summed.

use crate::core::catalog::Section;
use crate::core::checks::beam::BeamCheck;
use crate::core::checks::column::ColumnCheck;
use crate::core::material::SteelMaterial;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Unrecognized connection topology '{0}'")]
    UnknownTopology(String),
    #[error("{kind} connection requires a {member}")]
    MissingMember {
        kind: JointTopology,
        member: &'static str,
    },
}

/// Position of a joint within the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointTopology {
    /// Exterior joint below the roof: one beam, two columns.
    TypicalExterior,
    /// Interior joint below the roof: two beams, two columns.
    TypicalInterior,
    /// Exterior roof joint: one beam, one column.
    TopExterior,
    /// Interior roof joint: two beams, one column.
    TopInterior,
}

impl JointTopology {
    pub fn is_interior(&self) -> bool {
        matches!(self, JointTopology::TypicalInterior | JointTopology::TopInterior)
    }

    pub fn is_roof(&self) -> bool {
        matches!(self, JointTopology::TopExterior | JointTopology::TopInterior)
    }
}

impl fmt::Display for JointTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JointTopology::TypicalExterior => "typical exterior",
            JointTopology::TypicalInterior => "typical interior",
            JointTopology::TopExterior => "top exterior",
            JointTopology::TopInterior => "top interior",
        };
        f.write_str(label)
    }
}

impl FromStr for JointTopology {
    type Err = ConnectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "typical exterior" => Ok(JointTopology::TypicalExterior),
            "typical interior" => Ok(JointTopology::TypicalInterior),
            "top exterior" => Ok(JointTopology::TopExterior),
            "top interior" => Ok(JointTopology::TopInterior),
            other => Err(ConnectionError::UnknownTopology(other.to_string())),
        }
    }
}

/// Everything a joint evaluation needs, borrowed from the current member set.
#[derive(Debug, Clone, Copy)]
pub struct JointInputs<'a> {
    pub kind: JointTopology,
    pub steel: &'a SteelMaterial,
    /// Beam dead load, lb/ft.
    pub beam_dead_load: f64,
    /// Beam live load, lb/ft.
    pub beam_live_load: f64,
    /// Bay width between column center lines, ft.
    pub span_ft: f64,
    pub left_beam: &'a BeamCheck,
    pub right_beam: Option<&'a BeamCheck>,
    pub top_column: Option<&'a ColumnCheck>,
    pub bottom_column: &'a ColumnCheck,
    /// Required SCWB moment ratio ΣMpc/ΣMpb.
    pub scwb_ratio: f64,
}

/// Probable and expected moments at the joint, kip·in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointMoments {
    /// Probable maximum moment at the RBS center, per side.
    pub mpr_left: f64,
    pub mpr_right: Option<f64>,
    /// Probable maximum moment at the column face, per side.
    pub mf_left: f64,
    pub mf_right: Option<f64>,
    /// Expected plastic moment of the gross beam section, per side.
    pub mpe_left: f64,
    pub mpe_right: Option<f64>,
}

/// Shear forces through the joint, kips.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointShear {
    /// Shear at the RBS center, per side.
    pub vrbs_left: f64,
    pub vrbs_right: Option<f64>,
    /// Required beam shear strength at the column face, per side.
    pub vu_left: f64,
    pub vu_right: Option<f64>,
    /// Column shear participating in panel-zone equilibrium.
    pub column_shear: f64,
    /// Panel-zone shear demand Ru.
    pub panel_demand: f64,
    /// Panel-zone shear strength Rn of the bare column web.
    pub panel_strength: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionFeasibility {
    pub geometry_limits: bool,
    pub flexural_strength: bool,
    pub shear_strength: bool,
    pub scwb: bool,
}

impl ConnectionFeasibility {
    pub fn all(&self) -> bool {
        self.geometry_limits && self.flexural_strength && self.shear_strength && self.scwb
    }
}

/// Immutable check snapshot for one joint.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionCheck {
    pub kind: JointTopology,
    pub moments: JointMoments,
    pub shear: JointShear,
    /// SCWB moment ratio; `None` when the roof exemption applies.
    pub scwb_ratio: Option<f64>,
    /// Required doubler-plate thickness, in (0 when the bare web suffices).
    pub doubler_plate_thickness: f64,
    pub feasibility: ConnectionFeasibility,
}

impl ConnectionCheck {
    pub fn evaluate(inputs: &JointInputs<'_>) -> Result<Self, ConnectionError> {
        let kind = inputs.kind;
        let right_beam = match (kind.is_interior(), inputs.right_beam) {
            (true, Some(beam)) => Some(beam),
            (true, None) => {
                return Err(ConnectionError::MissingMember {
                    kind,
                    member: "right beam",
                });
            }
            (false, _) => None,
        };
        let top_column = match (kind.is_roof(), inputs.top_column) {
            (false, Some(column)) => Some(column),
            (false, None) => {
                return Err(ConnectionError::MissingMember {
                    kind,
                    member: "top column",
                });
            }
            (true, _) => None,
        };

        let steel = inputs.steel;
        let left = inputs.left_beam;
        let bottom = inputs.bottom_column;

        let geometry_limits = check_geometry(left, right_beam, top_column, bottom);

        // Probable maximum moment at the RBS center (358 Eq. 5.8-5).
        let cpr = steel.cpr();
        let mpr_left = cpr * steel.ry * steel.fy * left.rbs_plastic_modulus();
        let mpr_right = right_beam.map(|beam| cpr * steel.ry * steel.fy * beam.rbs_plastic_modulus());

        // Gravity line load on the beam, kips/in, under 1.2D + 0.5L.
        let wu = 1.2 * (inputs.beam_dead_load * 0.001 / 12.0)
            + 0.5 * (inputs.beam_live_load * 0.001 / 12.0);
        // Both sides share the left beam's hinge offset; beams across a joint
        // carry the same section in practice.
        let sh = left.rbs.hinge_offset();
        let lh = inputs.span_ft * 12.0 - 2.0 * bottom.section.d - 2.0 * sh;

        let vrbs_left = 2.0 * mpr_left / lh + wu * lh / 2.0;
        let vrbs_right = mpr_right.map(|mpr| 2.0 * mpr / lh - wu * lh / 2.0);

        let mf_left = mpr_left + vrbs_left * sh;
        let mf_right = match (mpr_right, vrbs_right) {
            (Some(mpr), Some(vrbs)) => Some(mpr + vrbs * sh),
            _ => None,
        };

        let mpe_left = steel.ry * steel.fy * left.section.zx;
        let mpe_right = right_beam.map(|beam| steel.ry * steel.fy * beam.section.zx);

        let phi_d = 1.0;
        let flexural_strength = phi_d * mpe_left >= mf_left
            && match (mpe_right, mf_right) {
                (Some(mpe), Some(mf)) => phi_d * mpe >= mf,
                _ => true,
            };

        let vu_left = vrbs_left + wu * sh;
        let vu_right = vrbs_right.map(|vrbs| vrbs + wu * sh);
        let shear_strength = left.strength.shear >= vu_left
            && match (right_beam, vu_right) {
                (Some(beam), Some(vu)) => beam.strength.shear >= vu,
                _ => true,
            };

        let scwb_ratio = scwb_moment_ratio(
            kind, steel, left, right_beam, top_column, bottom, mpr_left, mpr_right, vrbs_left,
            vrbs_right,
        );
        let scwb = match scwb_ratio {
            Some(ratio) => ratio >= inputs.scwb_ratio,
            None => true,
        };

        let (column_shear, panel_demand) =
            panel_zone_demand(left, right_beam, top_column, bottom, mf_left, mf_right);
        // Panel-zone strength of the bare column web (AISC 360 Eq. J10-11).
        let dc = bottom.section.d;
        let tw = bottom.section.tw;
        let bcf = bottom.section.bf;
        let tcf = bottom.section.tf;
        let db = left.section.d;
        let panel_strength =
            0.60 * steel.fy * dc * tw * (1.0 + (3.0 * bcf * tcf * tcf) / (db * dc * tw));

        let phi = 1.0;
        let doubler_plate_thickness = if phi * panel_strength >= panel_demand {
            0.0
        } else {
            let required =
                (panel_demand - 0.60 * steel.fy * (3.0 * bcf * tcf * tcf) / db) / (0.60 * steel.fy * dc);
            let mut tp = 0.25;
            while tp < required {
                tp += 0.25;
            }
            tp
        };

        Ok(Self {
            kind,
            moments: JointMoments {
                mpr_left,
                mpr_right,
                mf_left,
                mf_right,
                mpe_left,
                mpe_right,
            },
            shear: JointShear {
                vrbs_left,
                vrbs_right,
                vu_left,
                vu_right,
                column_shear,
                panel_demand,
                panel_strength,
            },
            scwb_ratio,
            doubler_plate_thickness,
            feasibility: ConnectionFeasibility {
                geometry_limits,
                flexural_strength,
                shear_strength,
                scwb,
            },
        })
    }

    pub fn is_feasible(&self) -> bool {
        self.feasibility.all()
    }
}

/// Prequalification limits of AISC 358 §5.3.1: beams at most W36 and
/// 300 lb/ft, columns at most W36.
fn check_geometry(
    left: &BeamCheck,
    right: Option<&BeamCheck>,
    top: Option<&ColumnCheck>,
    bottom: &ColumnCheck,
) -> bool {
    fn beam_ok(section: &Section) -> bool {
        section.nominal_depth().is_some_and(|d| d <= 36.0)
            && section.nominal_weight().is_some_and(|w| w <= 300.0)
    }
    fn column_ok(section: &Section) -> bool {
        section.nominal_depth().is_some_and(|d| d <= 36.0)
    }
    beam_ok(&left.section)
        && right.is_none_or(|beam| beam_ok(&beam.section))
        && top.is_none_or(|column| column_ok(&column.section))
        && column_ok(&bottom.section)
}

/// Column flexural contribution Zx·(Fy − Pu/Ag) projected to the beam
/// center line.
fn column_moment_term(column: &ColumnCheck, db: f64, steel: &SteelMaterial) -> f64 {
    let h = column.lx_ft * 12.0;
    column.section.zx * (steel.fy - column.demand.axial / column.section.area) * (h / (h - db / 2.0))
}

#[allow(clippy::too_many_arguments)]
fn scwb_moment_ratio(
    kind: JointTopology,
    steel: &SteelMaterial,
    left: &BeamCheck,
    right: Option<&BeamCheck>,
    top: Option<&ColumnCheck>,
    bottom: &ColumnCheck,
    mpr_left: f64,
    mpr_right: Option<f64>,
    vrbs_left: f64,
    vrbs_right: Option<f64>,
) -> Option<f64> {
    // Roof joints are exempt while the column axial ratio stays below 0.3
    // (AISC 341 §E3.4a exception).
    if kind.is_roof() && bottom.demand.axial / bottom.strength.axial < 0.3 {
        return None;
    }

    let db = match right {
        Some(beam) => (left.section.d + beam.section.d) / 2.0,
        None => left.section.d,
    };
    let mut mpc = column_moment_term(bottom, db, steel);
    if let Some(column) = top {
        mpc += column_moment_term(column, db, steel);
    }

    let vrbs_sum = vrbs_left + vrbs_right.unwrap_or(0.0);
    // Moment amplification from the RBS center to the column center line.
    let muv = vrbs_sum * (left.rbs.hinge_offset() + bottom.section.d / 2.0);
    let mpb = mpr_left + mpr_right.unwrap_or(0.0) + muv;
    Some(mpc / mpb)
}

fn panel_zone_demand(
    left: &BeamCheck,
    right: Option<&BeamCheck>,
    top: Option<&ColumnCheck>,
    bottom: &ColumnCheck,
    mf_left: f64,
    mf_right: Option<f64>,
) -> (f64, f64) {
    let mf_sum = mf_left + mf_right.unwrap_or(0.0);
    let (db, tf) = match right {
        Some(beam) => (
            (left.section.d + beam.section.d) / 2.0,
            (left.section.tf + beam.section.tf) / 2.0,
        ),
        None => (left.section.d, left.section.tf),
    };
    let mut column_half_heights = bottom.lx_ft * 12.0 / 2.0;
    if let Some(column) = top {
        column_half_heights += column.lx_ft * 12.0 / 2.0;
    }
    let column_shear = mf_sum / column_half_heights;
    let panel_demand = mf_sum / (db - tf) - column_shear;
    (column_shear, panel_demand)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::test_sections::{w14x90, w14x193, w21x44, w21x57};
    use crate::core::checks::beam::BeamDemand;
    use crate::core::checks::column::ColumnDemand;

    const TOLERANCE: f64 = 1e-9;

    fn beam(section: crate::core::catalog::Section) -> BeamCheck {
        BeamCheck::new(
            section,
            30.0,
            BeamDemand {
                shear: 0.0,
                moment_left: 0.0,
                moment_right: 0.0,
            },
            &SteelMaterial::default(),
        )
    }

    fn column(section: crate::core::catalog::Section, axial: f64) -> ColumnCheck {
        ColumnCheck::new(
            section,
            ColumnDemand {
                axial,
                shear: 0.0,
                moment_bottom: 0.0,
                moment_top: 0.0,
            },
            13.0,
            13.0,
            &SteelMaterial::default(),
        )
    }

    fn interior_joint<'a>(
        steel: &'a SteelMaterial,
        left: &'a BeamCheck,
        right: &'a BeamCheck,
        top: &'a ColumnCheck,
        bottom: &'a ColumnCheck,
    ) -> JointInputs<'a> {
        JointInputs {
            kind: JointTopology::TypicalInterior,
            steel,
            beam_dead_load: 1000.0,
            beam_live_load: 500.0,
            span_ft: 30.0,
            left_beam: left,
            right_beam: Some(right),
            top_column: Some(top),
            bottom_column: bottom,
            scwb_ratio: 1.0,
        }
    }

    #[test]
    fn topology_parses_from_tokens() {
        assert_eq!(
            "typical interior".parse::<JointTopology>().ok(),
            Some(JointTopology::TypicalInterior)
        );
        assert_eq!(
            "Top Exterior".parse::<JointTopology>().ok(),
            Some(JointTopology::TopExterior)
        );
        assert!("corner".parse::<JointTopology>().is_err());
    }

    #[test]
    fn interior_joint_without_right_beam_is_rejected() {
        let steel = SteelMaterial::default();
        let left = beam(w21x44());
        let top = column(w14x90(), 100.0);
        let bottom = column(w14x90(), 150.0);
        let mut inputs = interior_joint(&steel, &left, &left, &top, &bottom);
        inputs.right_beam = None;
        let result = ConnectionCheck::evaluate(&inputs);
        assert!(matches!(
            result,
            Err(ConnectionError::MissingMember { member: "right beam", .. })
        ));
    }

    #[test]
    fn probable_moment_uses_cpr_ry_and_rbs_modulus() {
        let steel = SteelMaterial::default();
        let left = beam(w21x44());
        let right = beam(w21x44());
        let top = column(w14x90(), 100.0);
        let bottom = column(w14x90(), 150.0);
        let inputs = interior_joint(&steel, &left, &right, &top, &bottom);
        let connection = ConnectionCheck::evaluate(&inputs).expect("joint should evaluate");
        let expected = steel.cpr() * steel.ry * steel.fy * left.rbs_plastic_modulus();
        assert!((connection.moments.mpr_left - expected).abs() < TOLERANCE);
        assert_eq!(connection.moments.mpr_right, Some(connection.moments.mpr_left));
    }

    #[test]
    fn column_face_moment_exceeds_rbs_moment() {
        let steel = SteelMaterial::default();
        let left = beam(w21x44());
        let right = beam(w21x44());
        let top = column(w14x90(), 100.0);
        let bottom = column(w14x90(), 150.0);
        let inputs = interior_joint(&steel, &left, &right, &top, &bottom);
        let connection = ConnectionCheck::evaluate(&inputs).expect("joint should evaluate");
        assert!(connection.moments.mf_left > connection.moments.mpr_left);
    }

    #[test]
    fn roof_joint_with_low_axial_ratio_skips_scwb() {
        let steel = SteelMaterial::default();
        let left = beam(w21x44());
        let bottom = column(w14x90(), 50.0);
        let inputs = JointInputs {
            kind: JointTopology::TopExterior,
            steel: &steel,
            beam_dead_load: 1000.0,
            beam_live_load: 500.0,
            span_ft: 30.0,
            left_beam: &left,
            right_beam: None,
            top_column: None,
            bottom_column: &bottom,
            scwb_ratio: 1.0,
        };
        let connection = ConnectionCheck::evaluate(&inputs).expect("joint should evaluate");
        assert_eq!(connection.scwb_ratio, None);
        assert!(connection.feasibility.scwb);
    }

    #[test]
    fn scwb_ratio_is_invariant_under_proportional_scaling() {
        // Scaling Zx together with area and axial load leaves the
        // moment-ratio check unchanged (gravity load is zero so all joint
        // moments scale linearly too).
        let steel = SteelMaterial::default();
        let scale = 2.0;

        let base_section = w21x44();
        // The RBS modulus is Zx minus a fixed cut deduction, so the scaled
        // beam's Zx is chosen to scale the reduced modulus exactly.
        let rbs_deduction = 2.0
            * (0.25 * base_section.bf)
            * base_section.tf
            * (base_section.d - base_section.tf);
        let base_beam = beam(base_section.clone());
        let mut scaled_beam_section = base_section;
        scaled_beam_section.zx = scale * scaled_beam_section.zx - (scale - 1.0) * rbs_deduction;
        let scaled_beam = beam(scaled_beam_section);

        let make_column = |scale: f64, axial: f64| {
            let mut section = w14x90();
            section.zx *= scale;
            section.area *= scale;
            column(section, axial * scale)
        };
        let base_top = make_column(1.0, 100.0);
        let base_bottom = make_column(1.0, 150.0);
        let scaled_top = make_column(scale, 100.0);
        let scaled_bottom = make_column(scale, 150.0);

        let mut base_inputs = interior_joint(&steel, &base_beam, &base_beam, &base_top, &base_bottom);
        base_inputs.beam_dead_load = 0.0;
        base_inputs.beam_live_load = 0.0;
        let mut scaled_inputs =
            interior_joint(&steel, &scaled_beam, &scaled_beam, &scaled_top, &scaled_bottom);
        scaled_inputs.beam_dead_load = 0.0;
        scaled_inputs.beam_live_load = 0.0;

        let base = ConnectionCheck::evaluate(&base_inputs).expect("joint should evaluate");
        let scaled = ConnectionCheck::evaluate(&scaled_inputs).expect("joint should evaluate");
        let base_ratio = base.scwb_ratio.expect("ratio computed");
        let scaled_ratio = scaled.scwb_ratio.expect("ratio computed");
        assert!((base_ratio - scaled_ratio).abs() < 1e-6);
    }

    #[test]
    fn doubler_plate_is_zero_when_bare_web_suffices() {
        let steel = SteelMaterial::default();
        let left = beam(w21x44());
        let right = beam(w21x44());
        // A heavy column web against light beams needs no reinforcement.
        let top = column(w14x193(), 100.0);
        let bottom = column(w14x193(), 150.0);
        let inputs = interior_joint(&steel, &left, &right, &top, &bottom);
        let connection = ConnectionCheck::evaluate(&inputs).expect("joint should evaluate");
        assert!(connection.shear.panel_strength >= connection.shear.panel_demand);
        assert_eq!(connection.doubler_plate_thickness, 0.0);
    }

    #[test]
    fn doubler_plate_is_smallest_quarter_inch_multiple() {
        let steel = SteelMaterial::default();
        let left = beam(w21x57());
        let right = beam(w21x57());
        let top = column(w14x90(), 100.0);
        let bottom = column(w14x90(), 150.0);
        let inputs = interior_joint(&steel, &left, &right, &top, &bottom);
        let connection = ConnectionCheck::evaluate(&inputs).expect("joint should evaluate");
        assert!(connection.shear.panel_demand > connection.shear.panel_strength);

        let tp = connection.doubler_plate_thickness;
        assert!(tp > 0.0);
        let section = &bottom.section;
        let required = (connection.shear.panel_demand
            - 0.60 * steel.fy * (3.0 * section.bf * section.tf * section.tf) / left.section.d)
            / (0.60 * steel.fy * section.d);
        assert!(tp >= required);
        assert!(tp - 0.25 < required);
        let quarters = tp / 0.25;
        assert!((quarters - quarters.round()).abs() < TOLERANCE);
    }

    #[test]
    fn geometry_limits_reject_overweight_beams() {
        let steel = SteelMaterial::default();
        let mut heavy_section = w21x44();
        heavy_section.name = "W36X330".to_string();
        let left = beam(heavy_section);
        let right = beam(w21x44());
        let top = column(w14x90(), 100.0);
        let bottom = column(w14x90(), 150.0);
        let inputs = interior_joint(&steel, &left, &right, &top, &bottom);
        let connection = ConnectionCheck::evaluate(&inputs).expect("joint should evaluate");
        assert!(!connection.feasibility.geometry_limits);
        assert!(!connection.is_feasible());
    }
}
