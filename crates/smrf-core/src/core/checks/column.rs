//! # Column Check Engine
//!
//! Checks one column: highly ductile local-buckling limits (with the
//! axial-load-dependent web limit), axial strength on the AISC column curve,
//! shear and flexural strength (lateral-torsional buckling with the Cb
//! moment-gradient factor), the combined-load interaction of AISC H1-1, and
//! the modified-IMK hinge parameters with their axial-ratio dependence.
//!
//! Forces are kips and kip·in; unbraced lengths are in feet, section
//! properties in inches.

use super::HingeParams;
use crate::core::catalog::Section;
use crate::core::material::SteelMaterial;
use std::f64::consts::PI;

/// Factored demands on the column, kips and kip·in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnDemand {
    pub axial: f64,
    pub shear: f64,
    pub moment_bottom: f64,
    pub moment_top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnStrength {
    /// Design compressive strength φPn, kips.
    pub axial: f64,
    /// Design shear strength φVn, kips.
    pub shear: f64,
    /// Design flexural strength φMn, kip·in.
    pub flexural: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRatios {
    pub axial: f64,
    pub shear: f64,
    pub flexural: f64,
}

/// Outcome of each individual column check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnFeasibility {
    pub flange_limit: bool,
    pub web_limit: bool,
    pub axial_strength: bool,
    pub shear_strength: bool,
    pub flexural_strength: bool,
    pub combined_strength: bool,
}

impl ColumnFeasibility {
    pub fn all(&self) -> bool {
        self.flange_limit
            && self.web_limit
            && self.axial_strength
            && self.shear_strength
            && self.flexural_strength
            && self.combined_strength
    }
}

/// Immutable check snapshot for one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnCheck {
    pub section: Section,
    pub demand: ColumnDemand,
    /// Strong-axis unbraced length, ft.
    pub lx_ft: f64,
    /// Weak-axis unbraced length, ft.
    pub ly_ft: f64,
    pub strength: ColumnStrength,
    pub ratios: ColumnRatios,
    pub feasibility: ColumnFeasibility,
    pub hinge: HingeParams,
}

impl ColumnCheck {
    pub fn new(
        section: Section,
        demand: ColumnDemand,
        lx_ft: f64,
        ly_ft: f64,
        steel: &SteelMaterial,
    ) -> Self {
        let flange_limit = section.bf_over_2tf <= 0.30 * (steel.e / steel.fy).sqrt();
        let web_limit = check_web(&section, demand.axial, steel);

        let axial = axial_strength(&section, lx_ft, ly_ft, steel);
        let shear = 0.9 * 0.6 * steel.fy * section.tw * section.d;
        let flexural = flexural_strength(&section, &demand, lx_ft, ly_ft, steel);
        let strength = ColumnStrength {
            axial,
            shear,
            flexural,
        };

        let moment_max = demand.moment_bottom.abs().max(demand.moment_top.abs());
        let ratios = ColumnRatios {
            axial: demand.axial / strength.axial,
            shear: demand.shear / strength.shear,
            flexural: moment_max / strength.flexural,
        };
        let combined = combined_interaction(&strength, demand.axial, moment_max);
        let feasibility = ColumnFeasibility {
            flange_limit,
            web_limit,
            axial_strength: strength.axial >= demand.axial,
            shear_strength: strength.shear >= demand.shear,
            flexural_strength: strength.flexural >= moment_max,
            combined_strength: combined <= 1.0,
        };
        let hinge = hinge_parameters(&section, lx_ft, ratios.axial, steel);

        Self {
            section,
            demand,
            lx_ft,
            ly_ft,
            strength,
            ratios,
            feasibility,
            hinge,
        }
    }

    pub fn is_feasible(&self) -> bool {
        self.feasibility.all()
    }
}

fn check_web(section: &Section, axial_demand: f64, steel: &SteelMaterial) -> bool {
    let phi = 0.9;
    let ca = axial_demand / (phi * steel.fy * section.area);
    let root = (steel.e / steel.fy).sqrt();
    let web_limit = if ca <= 0.125 {
        2.45 * root * (1.0 - 0.93 * ca)
    } else {
        (0.77 * root * (2.93 - ca)).max(1.49 * root)
    };
    section.h_over_tw <= web_limit
}

fn axial_strength(section: &Section, lx_ft: f64, ly_ft: f64, steel: &SteelMaterial) -> f64 {
    // Effective length factors taken as 1.0 for both axes.
    let slenderness = (lx_ft / section.rx).max(ly_ft / section.ry);
    let fe = PI * PI * steel.e / (slenderness * slenderness);
    let fcr = if slenderness <= 4.71 * (steel.e / steel.fy).sqrt() {
        0.658_f64.powf(steel.fy / fe) * steel.fy
    } else {
        0.877 * fe
    };
    0.9 * fcr * section.area
}

fn moment_gradient_factor(demand: &ColumnDemand) -> f64 {
    let moment_max = demand.moment_bottom.abs().max(demand.moment_top.abs());
    if moment_max == 0.0 {
        return 1.0;
    }
    // Quarter-point moments along the member, assuming a linear diagram
    // between the bottom moment and the reversed top moment.
    let at = |t: f64| (demand.moment_bottom + t * (-demand.moment_top - demand.moment_bottom)).abs();
    let (ma, mb, mc) = (at(0.25), at(0.50), at(0.75));
    12.5 * moment_max / (2.5 * moment_max + 3.0 * ma + 4.0 * mb + 3.0 * mc)
}

fn flexural_strength(
    section: &Section,
    demand: &ColumnDemand,
    lx_ft: f64,
    ly_ft: f64,
    steel: &SteelMaterial,
) -> f64 {
    let h0 = section.d - section.tf;
    let c = if section.name.starts_with('W') {
        1.0
    } else {
        h0 / 2.0 * (section.iy / section.cw).sqrt()
    };
    let lp = 1.76 * section.ry * (steel.e / steel.fy).sqrt();
    let jc_over_sxh0 = section.j * c / (section.sx * h0);
    let temp = (jc_over_sxh0 * jc_over_sxh0 + 6.76 * (0.7 * steel.fy / steel.e).powi(2)).sqrt();
    let lr = 1.95 * section.rts * steel.e / (0.7 * steel.fy) * (jc_over_sxh0 + temp).sqrt();
    let lb = lx_ft.min(ly_ft);
    let mp = steel.fy * section.zx;
    let cb = moment_gradient_factor(demand);

    let mn = if lb <= lp {
        mp
    } else if lb <= lr {
        cb * (mp - (mp - 0.7 * steel.fy * section.sx) * (lb - lp) / (lr - lp))
    } else {
        let slenderness = lb / section.rts;
        let fcr = cb * PI * PI * steel.e / (slenderness * slenderness)
            * ((1.0 + 0.078 * section.j * c) / (section.sx * h0) * slenderness * slenderness)
                .sqrt();
        fcr * section.sx
    };
    0.9 * mn.min(mp)
}

fn combined_interaction(strength: &ColumnStrength, axial: f64, moment_max: f64) -> f64 {
    let phi = 0.9;
    let pc = strength.axial / phi;
    let mcx = strength.flexural / phi;
    if axial / pc <= 0.2 {
        axial / pc + 8.0 / 9.0 * (moment_max / mcx)
    } else {
        axial / (2.0 * pc) + moment_max / mcx
    }
}

fn hinge_parameters(
    section: &Section,
    lx_ft: f64,
    axial_ratio: f64,
    steel: &SteelMaterial,
) -> HingeParams {
    let h = section.d - 2.0 * section.tf;
    let mc_over_my = (12.5
        * (h / section.tw).powf(-0.2)
        * (lx_ft * 12.0 / section.ry).powf(-0.4)
        * (1.0 - axial_ratio).powf(0.4))
    .clamp(1.0, 1.3);

    let k0 = 6.0 * steel.e * section.ix / (lx_ft * 12.0);
    let myp = section.zx * steel.fy;
    let my = if axial_ratio <= 0.2 {
        1.15 * steel.ry * myp * (1.0 - 0.5 * axial_ratio)
    } else {
        1.15 * steel.ry * myp * 9.0 / 8.0 * (1.0 - axial_ratio)
    };
    let lambda = if axial_ratio <= 0.35 {
        255000.0
            * (h / section.tw).powf(-2.14)
            * (lx_ft / section.ry).powf(-0.53)
            * (1.0 - axial_ratio).powf(4.92)
    } else {
        268000.0
            * (h / section.tw).powf(-2.30)
            * (lx_ft / section.ry).powf(-1.30)
            * (1.0 - axial_ratio).powf(1.19)
    };
    let theta_p = (294.0
        * (h / section.tw).powf(-1.7)
        * (lx_ft / section.ry).powf(-0.7)
        * (1.0 - axial_ratio).powf(1.6))
    .min(0.20);
    // Exclude the elastic share of the pre-capping rotation.
    let theta_p = theta_p - (mc_over_my - 1.0) * my / k0;
    let theta_pc = 90.0
        * (h / section.tw).powf(-0.8)
        * (lx_ft / section.ry).powf(-0.8)
        * (1.0 - axial_ratio).powf(2.5);
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
        residual: 0.5 - 0.4 * axial_ratio,
        theta_u: 0.15,
    }
}
