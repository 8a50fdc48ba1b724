//! # Equivalent Lateral Force Parameters
//!
//! ## Overview
//!
//! Derives the ASCE 7-10 equivalent-lateral-force quantities from mapped
//! spectral accelerations: site coefficients Fa and Fv (Tables 11.4-1/2),
//! design spectral accelerations (§11.4.4), the period upper-bound
//! coefficient Cu (Table 12.8-1), the seismic response coefficient Cs
//! (§12.8.1.1), the vertical-distribution exponent k, and the story force
//! distribution (Eq. 12.8-12).
//!
//! Table lookups interpolate linearly between breakpoints and clamp at the
//! table edges.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("Unknown site class '{0}' (expected A, B, C, D, or E)")]
pub struct UnknownSiteClass(pub String);

/// ASCE 7 site classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum SiteClass {
    A,
    B,
    C,
    D,
    E,
}

impl FromStr for SiteClass {
    type Err = UnknownSiteClass;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(SiteClass::A),
            "B" => Ok(SiteClass::B),
            "C" => Ok(SiteClass::C),
            "D" => Ok(SiteClass::D),
            "E" => Ok(SiteClass::E),
            other => Err(UnknownSiteClass(other.to_string())),
        }
    }
}

impl fmt::Display for SiteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SiteClass::A => "A",
            SiteClass::B => "B",
            SiteClass::C => "C",
            SiteClass::D => "D",
            SiteClass::E => "E",
        };
        f.write_str(label)
    }
}

/// Site and code parameters describing the seismic hazard and system.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SeismicSite {
    pub site_class: SiteClass,
    /// Mapped short-period spectral acceleration Ss, g.
    pub ss: f64,
    /// Mapped 1-second spectral acceleration S1, g.
    pub s1: f64,
    /// Long-period transition period TL, s.
    pub tl: f64,
    /// Response modification coefficient R.
    pub r: f64,
    /// Deflection amplification factor Cd.
    pub cd: f64,
    /// Importance factor Ie.
    pub ie: f64,
    /// Redundancy factor ρ for the drift limit.
    pub rho: f64,
    /// Approximate-period coefficient Ct.
    pub ct: f64,
    /// Approximate-period exponent x.
    pub x: f64,
}

fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }
    for i in 1..xs.len() {
        if x <= xs[i] {
            let t = (x - xs[i - 1]) / (xs[i] - xs[i - 1]);
            return ys[i - 1] + t * (ys[i] - ys[i - 1]);
        }
    }
    ys[ys.len() - 1]
}

/// Short-period site coefficient Fa (Table 11.4-1).
pub fn fa_coefficient(site_class: SiteClass, ss: f64) -> f64 {
    const SS: [f64; 5] = [0.25, 0.50, 0.75, 1.00, 1.25];
    let row: [f64; 5] = match site_class {
        SiteClass::A => [0.8, 0.8, 0.8, 0.8, 0.8],
        SiteClass::B => [1.0, 1.0, 1.0, 1.0, 1.0],
        SiteClass::C => [1.2, 1.2, 1.1, 1.0, 1.0],
        SiteClass::D => [1.6, 1.4, 1.2, 1.1, 1.0],
        SiteClass::E => [2.5, 1.7, 1.2, 0.9, 0.9],
    };
    interpolate(ss, &SS, &row)
}

/// One-second site coefficient Fv (Table 11.4-2).
pub fn fv_coefficient(site_class: SiteClass, s1: f64) -> f64 {
    const S1: [f64; 5] = [0.1, 0.2, 0.3, 0.4, 0.5];
    let row: [f64; 5] = match site_class {
        SiteClass::A => [0.8, 0.8, 0.8, 0.8, 0.8],
        SiteClass::B => [1.0, 1.0, 1.0, 1.0, 1.0],
        SiteClass::C => [1.7, 1.6, 1.5, 1.4, 1.3],
        SiteClass::D => [2.4, 2.0, 1.8, 1.6, 1.5],
        SiteClass::E => [3.5, 3.2, 2.8, 2.4, 2.4],
    };
    interpolate(s1, &S1, &row)
}

/// Design-level spectral accelerations (§11.4.3–11.4.4).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DesignSpectrum {
    pub sms: f64,
    pub sm1: f64,
    pub sds: f64,
    pub sd1: f64,
}

pub fn design_spectrum(ss: f64, s1: f64, fa: f64, fv: f64) -> DesignSpectrum {
    let sms = fa * ss;
    let sm1 = fv * s1;
    DesignSpectrum {
        sms,
        sm1,
        sds: 2.0 / 3.0 * sms,
        sd1: 2.0 / 3.0 * sm1,
    }
}

/// Coefficient for the upper limit on the calculated period (Table 12.8-1).
pub fn cu_coefficient(sd1: f64) -> f64 {
    const SD1: [f64; 5] = [0.1, 0.15, 0.2, 0.3, 0.4];
    const CU: [f64; 5] = [1.7, 1.6, 1.5, 1.4, 1.4];
    interpolate(sd1, &SD1, &CU)
}

/// Seismic response coefficient Cs (§12.8.1.1).
///
/// The drift variant omits the Eq. 12.8-5 minimum, as permitted by §12.8.6.2
/// for drift determination.
pub fn cs_coefficient(
    spectrum: &DesignSpectrum,
    s1: f64,
    period: f64,
    tl: f64,
    r: f64,
    ie: f64,
    for_drift: bool,
) -> f64 {
    let r_over_ie = r / ie;
    let mut cs = spectrum.sds / r_over_ie;
    let cs_upper = if period <= tl {
        spectrum.sd1 / (period * r_over_ie)
    } else {
        spectrum.sd1 * tl / (period * period * r_over_ie)
    };
    cs = cs.min(cs_upper);
    if !for_drift {
        cs = cs.max((0.044 * spectrum.sds * ie).max(0.01));
    }
    if s1 >= 0.6 {
        cs = cs.max(0.5 * s1 / r_over_ie);
    }
    cs
}

/// Vertical-distribution exponent k (§12.8.3).
pub fn k_exponent(period: f64) -> f64 {
    if period <= 0.5 {
        1.0
    } else if period >= 2.5 {
        2.0
    } else {
        1.0 + (period - 0.5) / 2.0
    }
}

/// Lateral story forces and story shears from Eq. 12.8-11/12/13.
///
/// `floor_weights` holds the seismic weight of each elevated floor (kips,
/// bottom to top) and `floor_heights` the corresponding heights above the
/// base (ft). Returns `(story_forces, story_shears)`, each bottom to top.
pub fn distribute_base_shear(
    base_shear: f64,
    floor_weights: &[f64],
    floor_heights: &[f64],
    k: f64,
) -> (Vec<f64>, Vec<f64>) {
    let denominator: f64 = floor_weights
        .iter()
        .zip(floor_heights)
        .map(|(w, h)| w * h.powf(k))
        .sum();
    let forces: Vec<f64> = floor_weights
        .iter()
        .zip(floor_heights)
        .map(|(w, h)| base_shear * w * h.powf(k) / denominator)
        .collect();
    let mut shears = vec![0.0; forces.len()];
    let mut running = 0.0;
    for story in (0..forces.len()).rev() {
        running += forces[story];
        shears[story] = running;
    }
    (forces, shears)
}

/// Derived ELF parameters for one frame, computed once at model build time.
#[derive(Debug, Clone, PartialEq)]
pub struct ElfParameters {
    pub site: SeismicSite,
    pub fa: f64,
    pub fv: f64,
    pub spectrum: DesignSpectrum,
    pub cu: f64,
    /// Approximate fundamental period Ta = Ct·hn^x, s.
    pub approximate_period: f64,
    /// Upper bound Cu·Ta on the period used for strength design, s.
    pub upper_period: f64,
}

impl ElfParameters {
    pub fn from_site(site: SeismicSite, roof_height_ft: f64) -> Self {
        let fa = fa_coefficient(site.site_class, site.ss);
        let fv = fv_coefficient(site.site_class, site.s1);
        let spectrum = design_spectrum(site.ss, site.s1, fa, fv);
        let cu = cu_coefficient(spectrum.sd1);
        let approximate_period = site.ct * roof_height_ft.powf(site.x);
        let upper_period = cu * approximate_period;
        Self {
            site,
            fa,
            fv,
            spectrum,
            cu,
            approximate_period,
            upper_period,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
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

    #[test]
    fn fa_clamps_at_table_edges() {
        assert!(f64_approx_equal(fa_coefficient(SiteClass::D, 0.1), 1.6));
        assert!(f64_approx_equal(fa_coefficient(SiteClass::D, 2.0), 1.0));
    }

    #[test]
    fn fa_interpolates_between_breakpoints() {
        // Site D, Ss = 0.375 lies halfway between 1.6 and 1.4.
        assert!(f64_approx_equal(fa_coefficient(SiteClass::D, 0.375), 1.5));
    }

    #[test]
    fn fv_interpolates_between_breakpoints() {
        // Site C, S1 = 0.25 lies halfway between 1.6 and 1.5.
        assert!(f64_approx_equal(fv_coefficient(SiteClass::C, 0.25), 1.55));
    }

    #[test]
    fn rock_sites_use_constant_coefficients() {
        assert!(f64_approx_equal(fa_coefficient(SiteClass::A, 1.2), 0.8));
        assert!(f64_approx_equal(fv_coefficient(SiteClass::B, 0.3), 1.0));
    }

    #[test]
    fn design_spectrum_applies_two_thirds_factor() {
        let spectrum = design_spectrum(1.5, 0.6, 1.0, 1.5);
        assert!(f64_approx_equal(spectrum.sms, 1.5));
        assert!(f64_approx_equal(spectrum.sm1, 0.9));
        assert!(f64_approx_equal(spectrum.sds, 1.0));
        assert!(f64_approx_equal(spectrum.sd1, 0.6));
    }

    #[test]
    fn cu_is_one_point_four_for_high_sd1() {
        assert!(f64_approx_equal(cu_coefficient(0.6), 1.4));
    }

    #[test]
    fn cs_short_period_is_plateau_value() {
        let spectrum = design_spectrum(1.5, 0.6, 1.0, 1.5);
        let cs = cs_coefficient(&spectrum, 0.6, 0.5, 8.0, 8.0, 1.0, false);
        // Plateau SDS/(R/Ie) = 0.125 is below SD1/(T·R/Ie) = 0.15.
        assert!(f64_approx_equal(cs, 0.125));
    }

    #[test]
    fn cs_long_period_is_velocity_branch() {
        let spectrum = design_spectrum(1.5, 0.6, 1.0, 1.0);
        let cs = cs_coefficient(&spectrum, 0.4, 1.0, 8.0, 8.0, 1.0, false);
        assert!(f64_approx_equal(cs, 0.4 / (1.0 * 8.0)));
    }

    #[test]
    fn cs_near_fault_floor_applies_for_high_s1() {
        let spectrum = design_spectrum(1.5, 0.75, 1.0, 1.5);
        let cs = cs_coefficient(&spectrum, 0.75, 6.0, 8.0, 8.0, 1.0, false);
        assert!(f64_approx_equal(cs, 0.5 * 0.75 / 8.0));
    }

    #[test]
    fn drift_variant_skips_minimum_floor() {
        let spectrum = design_spectrum(1.5, 0.3, 1.0, 1.5);
        let strength = cs_coefficient(&spectrum, 0.3, 7.0, 8.0, 8.0, 1.0, false);
        let drift = cs_coefficient(&spectrum, 0.3, 7.0, 8.0, 8.0, 1.0, true);
        assert!(f64_approx_equal(strength, 0.044 * spectrum.sds));
        assert!(drift < strength);
    }

    #[test]
    fn k_exponent_interpolates_between_half_and_two_and_half_seconds() {
        assert!(f64_approx_equal(k_exponent(0.3), 1.0));
        assert!(f64_approx_equal(k_exponent(1.5), 1.5));
        assert!(f64_approx_equal(k_exponent(3.0), 2.0));
    }

    #[test]
    fn story_forces_sum_to_base_shear_and_shears_accumulate_from_top() {
        let weights = [100.0, 100.0, 80.0];
        let heights = [13.0, 26.0, 39.0];
        let (forces, shears) = distribute_base_shear(120.0, &weights, &heights, 1.0);
        let total: f64 = forces.iter().sum();
        assert!(f64_approx_equal(total, 120.0));
        assert!(f64_approx_equal(shears[0], 120.0));
        assert!(f64_approx_equal(shears[2], forces[2]));
        assert!(forces[2] > forces[0]);
    }

    #[test]
    fn elf_parameters_derive_period_bounds() {
        let elf = ElfParameters::from_site(sample_site(), 39.0);
        assert!(f64_approx_equal(elf.approximate_period, 0.028 * 39.0_f64.powf(0.8)));
        assert!(f64_approx_equal(elf.upper_period, elf.cu * elf.approximate_period));
        assert!(f64_approx_equal(elf.spectrum.sds, 1.0));
    }

    #[test]
    fn site_class_parses_case_insensitively() {
        assert_eq!("d".parse::<SiteClass>().ok(), Some(SiteClass::D));
        assert!("F".parse::<SiteClass>().is_err());
    }
}
