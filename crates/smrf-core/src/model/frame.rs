//! # Frame Model
//!
//! ## Overview
//!
//! The design-time description of one perimeter moment frame: geometry,
//! gravity loads, derived ELF parameters, per-story candidate pools and the
//! current member size assignment. The resize operations the design loop
//! relies on live here: initial sizing from the candidate pools, drift-driven
//! downsizing, strength-driven upsizing, and the constructability pass that
//! forces adjacent stories to share sizes while keeping the elevation in
//! descending order of stiffness.
//!
//! Member sizes are tracked per story for three roles (exterior column,
//! interior column, beam); all frames of the building in one direction are
//! assumed identical, so a single frame carries the design.

use crate::core::catalog::{CatalogError, SectionCatalog, SectionProperty};
use crate::core::seismic::{
    ElfParameters, SeismicSite, cs_coefficient, distribute_base_shear, k_exponent,
};
use crate::model::config::DesignConfig;
use serde::Deserialize;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("'{name}' must list one entry per story (expected {expected}, found {found})")]
    MismatchedStoryCount {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("No sections match the {role} depth list for story {story}")]
    EmptyCandidatePool { story: usize, role: MemberRole },
    #[error("Story {story} {role} '{size}' is already the lightest candidate")]
    NoLighterSection {
        story: usize,
        role: MemberRole,
        size: String,
    },
    #[error("Story {story} {role} '{size}' is already the strongest candidate")]
    NoStrongerSection {
        story: usize,
        role: MemberRole,
        size: String,
    },
    #[error("Story {story} {role} '{size}' is not in its candidate pool")]
    SizeOutsidePool {
        story: usize,
        role: MemberRole,
        size: String,
    },
}

/// The three member roles tracked per story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRole {
    ExteriorColumn,
    InteriorColumn,
    Beam,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MemberRole::ExteriorColumn => "exterior column",
            MemberRole::InteriorColumn => "interior column",
            MemberRole::Beam => "beam",
        };
        f.write_str(label)
    }
}

/// Plan and elevation dimensions of the frame.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FrameGeometry {
    pub num_stories: usize,
    pub num_bays: usize,
    /// First story height, ft.
    pub first_story_height_ft: f64,
    /// Height of every story above the first, ft.
    pub typical_story_height_ft: f64,
    /// Bay width, ft (all bays equal).
    pub bay_width_ft: f64,
    /// Number of moment frames resisting lateral load in this direction.
    pub num_lateral_frames: usize,
}

impl FrameGeometry {
    pub fn story_height_ft(&self, story: usize) -> f64 {
        if story == 0 {
            self.first_story_height_ft
        } else {
            self.typical_story_height_ft
        }
    }

    /// Floor elevations above the base, ft, from ground (0.0) to roof.
    pub fn floor_heights_ft(&self) -> Vec<f64> {
        let mut heights = Vec::with_capacity(self.num_stories + 1);
        heights.push(0.0);
        let mut elevation = 0.0;
        for story in 0..self.num_stories {
            elevation += self.story_height_ft(story);
            heights.push(elevation);
        }
        heights
    }

    pub fn total_height_ft(&self) -> f64 {
        self.first_story_height_ft + self.typical_story_height_ft * (self.num_stories - 1) as f64
    }
}

/// Gravity loads, one entry per story (bottom to top).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GravityLoads {
    /// Seismic weight of each elevated floor for the whole building, kips.
    pub floor_weight_kips: Vec<f64>,
    /// Dead load on a frame beam, lb/ft.
    pub beam_dead_load_lb_ft: Vec<f64>,
    /// Live load on a frame beam, lb/ft.
    pub beam_live_load_lb_ft: Vec<f64>,
    /// Gravity dead load carried by the leaning column, kips.
    pub leaning_column_dead_load_kips: Vec<f64>,
    /// Gravity live load carried by the leaning column, kips.
    pub leaning_column_live_load_kips: Vec<f64>,
}

/// Allowed nominal depth groups per story and role (tokens like `W14`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MemberDepths {
    pub exterior_column: Vec<Vec<String>>,
    pub interior_column: Vec<Vec<String>>,
    pub beam: Vec<Vec<String>>,
}

/// The current size assignment, one size name per story and role.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberSizes {
    pub exterior_column: Vec<String>,
    pub interior_column: Vec<String>,
    pub beam: Vec<String>,
}

/// One set of equivalent-lateral-force results (strength or drift level).
#[derive(Debug, Clone, PartialEq)]
pub struct SeismicForce {
    /// Seismic response coefficient Cs.
    pub cs: f64,
    /// Design base shear for the whole building, kips.
    pub base_shear_kips: f64,
    /// Lateral force at each elevated floor, kips (bottom to top).
    pub story_force_kips: Vec<f64>,
    /// Story shear at each story, kips (bottom to top).
    pub story_shear_kips: Vec<f64>,
    /// Floor forces applied to one frame, including accidental torsion, kips.
    pub frame_story_force_kips: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
struct CandidatePools {
    exterior_column: Vec<Vec<String>>,
    interior_column: Vec<Vec<String>>,
    beam: Vec<Vec<String>>,
}

/// One perimeter moment frame under design.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub geometry: FrameGeometry,
    pub loads: GravityLoads,
    pub elf: ElfParameters,
    pub sizes: MemberSizes,
    candidates: CandidatePools,
    /// Fundamental period from the last eigenvalue analysis, s.
    pub modal_period: Option<f64>,
    pub seismic_strength: Option<SeismicForce>,
    pub seismic_drift: Option<SeismicForce>,
}

impl Frame {
    /// Builds the frame, derives the candidate pools from the depth lists
    /// and assigns the initial member sizes: the strongest column candidates
    /// and beams sized from the interior column Zx.
    pub fn new(
        geometry: FrameGeometry,
        loads: GravityLoads,
        site: SeismicSite,
        depths: &MemberDepths,
        catalog: &SectionCatalog,
        config: &DesignConfig,
    ) -> Result<Self, FrameError> {
        let stories = geometry.num_stories;
        check_story_count("floor_weight_kips", stories, loads.floor_weight_kips.len())?;
        check_story_count(
            "beam_dead_load_lb_ft",
            stories,
            loads.beam_dead_load_lb_ft.len(),
        )?;
        check_story_count(
            "beam_live_load_lb_ft",
            stories,
            loads.beam_live_load_lb_ft.len(),
        )?;
        check_story_count(
            "leaning_column_dead_load_kips",
            stories,
            loads.leaning_column_dead_load_kips.len(),
        )?;
        check_story_count(
            "leaning_column_live_load_kips",
            stories,
            loads.leaning_column_live_load_kips.len(),
        )?;
        check_story_count("exterior_column depths", stories, depths.exterior_column.len())?;
        check_story_count("interior_column depths", stories, depths.interior_column.len())?;
        check_story_count("beam depths", stories, depths.beam.len())?;

        let candidates = CandidatePools {
            exterior_column: build_pools(
                catalog,
                &depths.exterior_column,
                SectionProperty::Ix,
                MemberRole::ExteriorColumn,
            )?,
            interior_column: build_pools(
                catalog,
                &depths.interior_column,
                SectionProperty::Ix,
                MemberRole::InteriorColumn,
            )?,
            beam: build_pools(catalog, &depths.beam, SectionProperty::Zx, MemberRole::Beam)?,
        };

        let elf = ElfParameters::from_site(site, geometry.total_height_ft());
        let mut sizes = MemberSizes {
            exterior_column: Vec::with_capacity(stories),
            interior_column: Vec::with_capacity(stories),
            beam: Vec::with_capacity(stories),
        };
        for story in 0..stories {
            let interior = candidates.interior_column[story][0].clone();
            let exterior = candidates.exterior_column[story][0].clone();
            let interior_zx = catalog.lookup(&interior)?.zx;
            let beam = catalog.nearest_at_least(
                SectionProperty::Zx,
                config.beam_to_column_zx_ratio * interior_zx,
                &candidates.beam[story],
            )?;
            sizes.interior_column.push(interior);
            sizes.exterior_column.push(exterior);
            sizes.beam.push(beam);
        }

        Ok(Self {
            geometry,
            loads,
            elf,
            sizes,
            candidates,
            modal_period: None,
            seismic_strength: None,
            seismic_drift: None,
        })
    }

    pub fn num_stories(&self) -> usize {
        self.geometry.num_stories
    }

    pub fn candidate_pool(&self, story: usize, role: MemberRole) -> &[String] {
        match role {
            MemberRole::ExteriorColumn => &self.candidates.exterior_column[story],
            MemberRole::InteriorColumn => &self.candidates.interior_column[story],
            MemberRole::Beam => &self.candidates.beam[story],
        }
    }

    pub fn size(&self, story: usize, role: MemberRole) -> &str {
        match role {
            MemberRole::ExteriorColumn => &self.sizes.exterior_column[story],
            MemberRole::InteriorColumn => &self.sizes.interior_column[story],
            MemberRole::Beam => &self.sizes.beam[story],
        }
    }

    /// Recomputes the strength- and drift-level lateral forces from the
    /// fundamental period of the current member sizes (ASCE 7-10 §12.8).
    ///
    /// The strength-level period is bounded by CuTa; the drift-level period
    /// is bounded only when the configuration keeps the bound. The
    /// vertical-distribution exponent k always uses CuTa.
    pub fn compute_seismic_forces(&mut self, modal_period: f64, config: &DesignConfig) {
        let period_strength = modal_period.min(self.elf.upper_period);
        let period_drift = if config.bound_drift_period {
            period_strength
        } else {
            modal_period
        };
        let k = k_exponent(self.elf.upper_period);
        let heights: Vec<f64> = self.geometry.floor_heights_ft()[1..].to_vec();
        let frame_share = config.accidental_torsion / self.geometry.num_lateral_frames as f64;
        let strength = self.seismic_force(period_strength, false, k, &heights, frame_share);
        let drift = self.seismic_force(period_drift, true, k, &heights, frame_share);
        self.modal_period = Some(modal_period);
        self.seismic_strength = Some(strength);
        self.seismic_drift = Some(drift);
    }

    fn seismic_force(
        &self,
        period: f64,
        for_drift: bool,
        k: f64,
        heights: &[f64],
        frame_share: f64,
    ) -> SeismicForce {
        let site = &self.elf.site;
        let cs = cs_coefficient(
            &self.elf.spectrum,
            site.s1,
            period,
            site.tl,
            site.r,
            site.ie,
            for_drift,
        );
        let total_weight: f64 = self.loads.floor_weight_kips.iter().sum();
        let base_shear = cs * total_weight;
        let (story_force, story_shear) =
            distribute_base_shear(base_shear, &self.loads.floor_weight_kips, heights, k);
        let frame_story_force = story_force.iter().map(|f| f * frame_share).collect();
        SeismicForce {
            cs,
            base_shear_kips: base_shear,
            story_force_kips: story_force,
            story_shear_kips: story_shear,
            frame_story_force_kips: frame_story_force,
        }
    }

    /// Steps the interior column at `story` down one candidate and re-derives
    /// the beam and exterior column for that story from the new interior
    /// section. Called for the story with the most drift reserve.
    pub fn downsize_for_drift(
        &mut self,
        story: usize,
        catalog: &SectionCatalog,
        config: &DesignConfig,
    ) -> Result<(), FrameError> {
        let pool = &self.candidates.interior_column[story];
        let current = &self.sizes.interior_column[story];
        let index = pool_index(pool, story, MemberRole::InteriorColumn, current)?;
        if index + 1 >= pool.len() {
            return Err(FrameError::NoLighterSection {
                story,
                role: MemberRole::InteriorColumn,
                size: current.clone(),
            });
        }
        let interior = pool[index + 1].clone();
        debug!(story, from = %current, to = %interior, "downsizing interior column");
        let reference = catalog.lookup(&interior)?.clone();
        self.sizes.interior_column[story] = interior;
        self.sizes.beam[story] = catalog.nearest_at_least(
            SectionProperty::Zx,
            config.beam_to_column_zx_ratio * reference.zx,
            &self.candidates.beam[story],
        )?;
        self.sizes.exterior_column[story] = catalog.nearest_at_least(
            SectionProperty::Ix,
            config.exterior_interior_ix_ratio * reference.ix,
            &self.candidates.exterior_column[story],
        )?;
        Ok(())
    }

    /// Steps the member at `story` up one candidate toward the strongest.
    pub fn upscale(&mut self, story: usize, role: MemberRole) -> Result<(), FrameError> {
        let (pool, sizes) = match role {
            MemberRole::ExteriorColumn => (
                &self.candidates.exterior_column[story],
                &mut self.sizes.exterior_column[story],
            ),
            MemberRole::InteriorColumn => (
                &self.candidates.interior_column[story],
                &mut self.sizes.interior_column[story],
            ),
            MemberRole::Beam => (&self.candidates.beam[story], &mut self.sizes.beam[story]),
        };
        let index = pool_index(pool, story, role, sizes)?;
        if index == 0 {
            return Err(FrameError::NoStrongerSection {
                story,
                role,
                size: sizes.clone(),
            });
        }
        debug!(story, %role, from = %sizes, to = %pool[index - 1], "upsizing member");
        *sizes = pool[index - 1].clone();
        Ok(())
    }

    /// The construction beam sizes: the optimal beams smoothed so adjacent
    /// story groups share one size, columns unchanged.
    pub fn constructability_beams(
        &self,
        catalog: &SectionCatalog,
        config: &DesignConfig,
    ) -> Result<MemberSizes, FrameError> {
        let mut sizes = self.sizes.clone();
        smooth_sizes(
            &mut sizes.beam,
            config.identical_size_per_story,
            catalog,
            SectionProperty::Ix,
        )?;
        Ok(sizes)
    }

    /// The construction column sizes: both column lines smoothed the same
    /// way the beams are.
    pub fn constructability_columns(
        &self,
        catalog: &SectionCatalog,
        config: &DesignConfig,
    ) -> Result<MemberSizes, FrameError> {
        let mut sizes = self.sizes.clone();
        smooth_sizes(
            &mut sizes.interior_column,
            config.identical_size_per_story,
            catalog,
            SectionProperty::Ix,
        )?;
        smooth_sizes(
            &mut sizes.exterior_column,
            config.identical_size_per_story,
            catalog,
            SectionProperty::Ix,
        )?;
        Ok(sizes)
    }

    /// A copy of the frame carrying `sizes`, with the analysis state cleared
    /// so the next refresh recomputes it.
    pub fn with_sizes(&self, sizes: MemberSizes) -> Frame {
        let mut frame = self.clone();
        frame.sizes = sizes;
        frame.modal_period = None;
        frame.seismic_strength = None;
        frame.seismic_drift = None;
        frame
    }
}

fn check_story_count(name: &'static str, expected: usize, found: usize) -> Result<(), FrameError> {
    if expected == found {
        Ok(())
    } else {
        Err(FrameError::MismatchedStoryCount {
            name,
            expected,
            found,
        })
    }
}

fn build_pools(
    catalog: &SectionCatalog,
    depths: &[Vec<String>],
    key: SectionProperty,
    role: MemberRole,
) -> Result<Vec<Vec<String>>, FrameError> {
    depths
        .iter()
        .enumerate()
        .map(|(story, groups)| {
            let pool = catalog.candidates_by_depth(groups, key);
            if pool.is_empty() {
                Err(FrameError::EmptyCandidatePool { story, role })
            } else {
                Ok(pool)
            }
        })
        .collect()
}

fn pool_index(
    pool: &[String],
    story: usize,
    role: MemberRole,
    size: &str,
) -> Result<usize, FrameError> {
    pool.iter()
        .position(|name| name == size)
        .ok_or_else(|| FrameError::SizeOutsidePool {
            story,
            role,
            size: size.to_string(),
        })
}

fn nominal_depth_of(catalog: &SectionCatalog, name: &str) -> Result<f64, CatalogError> {
    catalog
        .lookup(name)?
        .nominal_depth()
        .ok_or_else(|| CatalogError::MalformedSizeName(name.to_string()))
}

/// Depth token of a size name (`W14X90` → `W14`).
fn depth_token(name: &str) -> String {
    match name.split_once('X') {
        Some((token, _)) => token.to_string(),
        None => name.to_string(),
    }
}

/// Smooths one size list (bottom to top) so every group of
/// `identical_per_story` adjacent stories shares a size and the elevation
/// stays in descending order of `key`.
///
/// Two passes: first, any same-depth chunk that is deeper than both its
/// neighbors but weaker than the story below is re-picked at the lower
/// story's depth with a comparable property. Then, working top-down in
/// identical-story blocks, adjacent sizes are reconciled by copying the
/// stronger size through the block (or re-picking at the current depth when
/// the story below is shallower but stronger), and block boundaries are
/// fixed so the lower block is never weaker.
fn smooth_sizes(
    sizes: &mut [String],
    identical_per_story: usize,
    catalog: &SectionCatalog,
    key: SectionProperty,
) -> Result<(), CatalogError> {
    let total = sizes.len();
    if total < 2 {
        return Ok(());
    }
    let per_story = identical_per_story.clamp(1, total);
    let mut variation: Vec<usize> = (0..total).filter(|i| i % per_story == 0).collect();

    fn property_of(
        catalog: &SectionCatalog,
        key: SectionProperty,
        name: &str,
    ) -> Result<f64, CatalogError> {
        Ok(key.of(catalog.lookup(name)?))
    }

    // Pass 1: a same-depth chunk deeper than both neighbors but with its
    // property between theirs is re-picked at the lower neighbor's depth.
    let mut i = 0;
    while i < total - 1 {
        let mut j = i + 1;
        let mut chunk_open = true;
        while j < total {
            if nominal_depth_of(catalog, &sizes[j])? != nominal_depth_of(catalog, &sizes[i])? {
                chunk_open = false;
                break;
            }
            j += 1;
        }
        if chunk_open {
            j = total - 1;
        }
        if i > 0 {
            let chunk_properties: Vec<f64> = sizes[i..j]
                .iter()
                .map(|name| property_of(catalog, key, name))
                .collect::<Result<_, _>>()?;
            let chunk_max = chunk_properties.iter().cloned().fold(f64::MIN, f64::max);
            let lower_property = property_of(catalog, key, &sizes[i - 1])?;
            let upper_property = property_of(catalog, key, &sizes[j])?;
            let current_depth = nominal_depth_of(catalog, &sizes[i])?;
            let lower_depth = nominal_depth_of(catalog, &sizes[i - 1])?;
            let upper_depth = nominal_depth_of(catalog, &sizes[j])?;
            if current_depth > lower_depth
                && current_depth > upper_depth
                && lower_depth >= upper_depth
                && chunk_max < lower_property
                && chunk_max > upper_property
            {
                let candidates =
                    catalog.candidates_by_depth(&[depth_token(&sizes[i - 1])], key);
                for k in i..j {
                    sizes[k] =
                        catalog.nearest_at_least(key, chunk_properties[k - i], &candidates)?;
                }
            }
        }
        i = j;
    }

    // Pass 2: reconcile adjacent stories top-down within each identical
    // block, then the block boundaries.
    let mut starting = total - 1;
    let mut ending = variation[variation.len() - 1];
    while starting > 0 {
        let mut indx = starting;
        while indx > ending {
            if sizes[indx - 1] != sizes[indx] {
                let current_property = property_of(catalog, key, &sizes[indx])?;
                let lower_property = property_of(catalog, key, &sizes[indx - 1])?;
                let current_depth = nominal_depth_of(catalog, &sizes[indx])?;
                let lower_depth = nominal_depth_of(catalog, &sizes[indx - 1])?;
                if current_depth <= lower_depth {
                    if current_property > lower_property {
                        sizes[indx - 1] = sizes[indx].clone();
                    } else {
                        let replacement = sizes[indx - 1].clone();
                        for k in indx..=starting {
                            sizes[k] = replacement.clone();
                        }
                    }
                } else if current_property > lower_property {
                    sizes[indx - 1] = sizes[indx].clone();
                } else {
                    let candidates = catalog.candidates_by_depth(&[depth_token(&sizes[indx])], key);
                    let replacement = catalog.nearest_at_least(key, lower_property, &candidates)?;
                    sizes[indx - 1] = replacement.clone();
                    for k in indx..=starting {
                        sizes[k] = replacement.clone();
                    }
                }
            }
            indx -= 1;
        }
        let boundary = variation[variation.len() - 1];
        if boundary == 0 {
            break;
        }
        let current_property = property_of(catalog, key, &sizes[boundary])?;
        let lower_property = property_of(catalog, key, &sizes[boundary - 1])?;
        let current_depth = nominal_depth_of(catalog, &sizes[boundary])?;
        let lower_depth = nominal_depth_of(catalog, &sizes[boundary - 1])?;
        if lower_depth == current_depth {
            if lower_property < current_property {
                sizes[boundary - 1] = sizes[boundary].clone();
            }
        } else if lower_depth < current_depth {
            let candidates = catalog.candidates_by_depth(&[depth_token(&sizes[boundary])], key);
            sizes[boundary - 1] = catalog.nearest_at_least(key, lower_property, &candidates)?;
        } else if lower_property < current_property {
            sizes[boundary - 1] = sizes[boundary].clone();
        }
        starting = boundary - 1;
        if starting == 0 {
            break;
        }
        variation.pop();
        ending = variation[variation.len() - 1];
    }
    Ok(())
}
