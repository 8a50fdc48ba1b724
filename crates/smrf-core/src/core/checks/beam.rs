//! # Beam Check Engine
//!
//! Checks one reduced-beam-section (RBS) girder: local-buckling limits for
//! the highly ductile classification (AISC 341 Table D1.1), lateral-brace
//! spacing, shear and flexural strength at the reduced section, and the
//! modified-IMK hinge parameters.
//!
//! Forces are kips and kip·in; member length is in feet, section properties
//! in inches.

use super::HingeParams;
use crate::core::catalog::Section;
use crate::core::material::SteelMaterial;

/// RBS cut dimensions per AISC 358 §5.8, all in inches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RbsCut {
    /// Distance from column face to the start of the cut.
    pub a: f64,
    /// Length of the cut.
    pub b: f64,
    /// Depth of the cut.
    pub c: f64,
}

impl RbsCut {
    /// Lower-bound dimensions for a given section.
    pub fn lower_bound(section: &Section) -> Self {
        Self {
            a: 0.5 * section.bf,
            b: 0.65 * section.d,
            c: 0.25 * section.bf,
        }
    }

    /// Distance from the column face to the center of the cut, in.
    pub fn hinge_offset(&self) -> f64 {
        self.a + self.b / 2.0
    }
}

/// Factored demands on the beam, kips and kip·in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamDemand {
    pub shear: f64,
    pub moment_left: f64,
    pub moment_right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamStrength {
    /// Design shear strength φVn, kips.
    pub shear: f64,
    /// Design flexural strength at the reduced section φMn, kip·in.
    pub flexural_rbs: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamRatios {
    pub shear: f64,
    pub flexural: f64,
}

/// Outcome of each individual beam check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeamFeasibility {
    pub flange_limit: bool,
    pub web_limit: bool,
    pub shear_strength: bool,
    pub flexural_strength: bool,
}

impl BeamFeasibility {
    pub fn all(&self) -> bool {
        self.flange_limit && self.web_limit && self.shear_strength && self.flexural_strength
    }
}

/// Immutable check snapshot for one beam.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamCheck {
    pub section: Section,
    /// Clear span, ft.
    pub length_ft: f64,
    pub demand: BeamDemand,
    pub rbs: RbsCut,
    /// Spacing between lateral braces, ft.
    pub brace_spacing_ft: f64,
    pub strength: BeamStrength,
    pub ratios: BeamRatios,
    pub feasibility: BeamFeasibility,
    pub hinge: HingeParams,
}

impl BeamCheck {
    pub fn new(section: Section, length_ft: f64, demand: BeamDemand, steel: &SteelMaterial) -> Self {
        let rbs = RbsCut::lower_bound(&section);
        let brace_spacing_ft = brace_spacing(&section, length_ft, steel);

        let flange_limit = check_flange(&section, &rbs, steel);
        let web_limit = section.h_over_tw <= 2.45 * (steel.e / steel.fy).sqrt();

        let strength = BeamStrength {
            shear: 1.0 * 0.6 * steel.fy * section.tw * section.d,
            flexural_rbs: 0.9 * steel.fy * rbs_plastic_modulus(&section, &rbs),
        };
        let moment_max = demand.moment_left.abs().max(demand.moment_right.abs());
        let ratios = BeamRatios {
            shear: demand.shear / strength.shear,
            flexural: moment_max / strength.flexural_rbs,
        };
        let feasibility = BeamFeasibility {
            flange_limit,
            web_limit,
            shear_strength: strength.shear >= demand.shear,
            flexural_strength: strength.flexural_rbs >= moment_max,
        };
        let hinge = hinge_parameters(&section, length_ft, brace_spacing_ft, steel);

        Self {
            section,
            length_ft,
            demand,
            rbs,
            brace_spacing_ft,
            strength,
            ratios,
            feasibility,
            hinge,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.feasibility.all()
    }

    /// Plastic section modulus at the center of the reduced section, in³.
    pub fn rbs_plastic_modulus(&self) -> f64 {
        rbs_plastic_modulus(&self.section, &self.rbs)
    }
}

fn rbs_plastic_modulus(section: &Section, rbs: &RbsCut) -> f64 {
    section.zx - 2.0 * rbs.c * section.tf * (section.d - section.tf)
}

fn check_flange(section: &Section, rbs: &RbsCut, steel: &SteelMaterial) -> bool {
    // Equivalent flange width at the narrowest point of the radius cut.
    let radius = (4.0 * rbs.c * rbs.c + rbs.b * rbs.b) / (8.0 * rbs.c);
    let bf_rbs = 2.0 * (radius - rbs.c) + section.bf
        - 2.0 * (radius * radius - (rbs.b / 3.0) * (rbs.b / 3.0)).sqrt();
    let lambda_f = bf_rbs / (2.0 * section.tf);
    lambda_f <= 0.30 * (steel.e / steel.fy).sqrt()
}

fn brace_spacing(section: &Section, length_ft: f64, steel: &SteelMaterial) -> f64 {
    // AISC 341 D1.2b spacing limit, converted to feet.
    let spacing_limit = 0.086 * section.ry * steel.e / steel.fy / 12.0;
    let mut braces = 1u32;
    while length_ft / f64::from(braces + 1) > spacing_limit {
        braces += 1;
    }
    // Also keep the spacing under Lp so flexural strength is governed by
    // plastic yielding rather than lateral-torsional buckling.
    let lp = 1.76 * section.ry * (steel.e / steel.fy).sqrt();
    while length_ft / f64::from(braces) + 1.0 > lp {
        braces += 1;
    }
    length_ft / f64::from(braces + 1)
}

fn hinge_parameters(
    section: &Section,
    length_ft: f64,
    spacing_ft: f64,
    steel: &SteelMaterial,
) -> HingeParams {
    // Lignos-Krawinkler regressions for other-than-RBS beams; c1 and c2 are
    // the mm and MPa unit conversions the regressions were fitted in.
    let c1 = 25.4;
    let c2 = 6.895;
    let mc_over_my = 1.10;
    let h = section.d - 2.0 * section.tf;

    let k0 = 6.0 * steel.e * section.ix / (length_ft * 12.0);
    let myp = section.zx * steel.fy;
    let my = 1.00 * myp;
    let lambda = 585.0
        * (h / section.tw).powf(-1.14)
        * (section.bf / (2.0 * section.tf)).powf(-0.632)
        * (spacing_ft * 12.0 / section.ry).powf(-0.205)
        * (c2 * steel.fy / 355.0).powf(-0.391);
    let theta_p = 0.19
        * (h / section.tw).powf(-0.314)
        * (section.bf / (2.0 * section.tf)).powf(-0.100)
        * (spacing_ft * 12.0 / section.ry).powf(-0.185)
        * (length_ft * 12.0 / section.d).powf(0.113)
        * (c1 * section.d / 533.0).powf(-0.760)
        * (c2 * steel.fy / 355.0).powf(-0.070);
    // Exclude the elastic share of the pre-capping rotation.
    let theta_p = theta_p - (mc_over_my - 1.0) * my / k0;
    let theta_pc = 9.52
        * (h / section.tw).powf(-0.513)
        * (section.bf / (2.0 * section.tf)).powf(-0.863)
        * (spacing_ft * 12.0 / section.ry).powf(-0.108)
        * (c2 * steel.fy / 355.0).powf(-0.360);
    let theta_y = my / k0;
    let theta_pc = theta_pc + theta_y + (mc_over_my - 1.0) * my / k0;

    HingeParams {
        k0,
        myp,
        my,
        lambda,
        theta_p,
        theta_pc,
        theta_y,
        strain_hardening: (mc_over_my - 1.0) * my / (theta_p * k0),
        residual: 0.40,
        theta_u: 0.20,
    }
}
