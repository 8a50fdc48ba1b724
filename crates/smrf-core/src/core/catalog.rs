//! # Standard Section Catalog
//!
//! ## Overview
//!
//! Loads the table of rolled W-shapes from CSV and answers the queries the
//! design loop needs: exact lookup by size name, per-depth candidate pools
//! ordered by a chosen section property, and nearest-at-least searches used
//! when a member is sized from a target property value.
//!
//! All section properties are in inch units. Size names follow the AISC
//! convention `W{depth}X{weight}` (e.g. `W14X90`); the nominal depth and the
//! weight per foot are recovered from the name itself.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },
    #[error("Unknown section size '{0}'")]
    UnknownSection(String),
    #[error("Section size '{0}' is not of the form W<depth>X<weight>")]
    MalformedSizeName(String),
    #[error("Empty candidate pool for nearest-section search")]
    EmptyCandidatePool,
}

/// Geometric and sectional properties of a single rolled shape.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Section {
    /// AISC size name, e.g. `W14X90`.
    #[serde(rename = "section size")]
    pub name: String,
    /// Actual depth, in.
    pub d: f64,
    /// Flange width, in.
    pub bf: f64,
    /// Flange thickness, in.
    pub tf: f64,
    /// Web thickness, in.
    pub tw: f64,
    /// Cross-sectional area, in².
    #[serde(rename = "A")]
    pub area: f64,
    /// Strong-axis moment of inertia, in⁴.
    #[serde(rename = "Ix")]
    pub ix: f64,
    /// Weak-axis moment of inertia, in⁴.
    #[serde(rename = "Iy")]
    pub iy: f64,
    /// Strong-axis plastic section modulus, in³.
    #[serde(rename = "Zx")]
    pub zx: f64,
    /// Strong-axis elastic section modulus, in³.
    #[serde(rename = "Sx")]
    pub sx: f64,
    /// Strong-axis radius of gyration, in.
    pub rx: f64,
    /// Weak-axis radius of gyration, in.
    pub ry: f64,
    /// Effective radius of gyration for LTB, in.
    pub rts: f64,
    /// Torsional constant, in⁴.
    #[serde(rename = "J")]
    pub j: f64,
    /// Warping constant, in⁶.
    #[serde(rename = "Cw")]
    pub cw: f64,
    /// Web slenderness h/tw.
    #[serde(rename = "h to tw ratio")]
    pub h_over_tw: f64,
    /// Flange slenderness bf/2tf.
    #[serde(rename = "bf to tf ratio")]
    pub bf_over_2tf: f64,
}

impl Section {
    /// Nominal depth parsed from the size name (`W14X90` → 14).
    pub fn nominal_depth(&self) -> Option<f64> {
        parse_size_name(&self.name).map(|(depth, _)| depth)
    }

    /// Weight per foot parsed from the size name (`W14X90` → 90).
    pub fn nominal_weight(&self) -> Option<f64> {
        parse_size_name(&self.name).map(|(_, weight)| weight)
    }
}

/// Section property keys the catalog can rank and search on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionProperty {
    Ix,
    Zx,
}

impl SectionProperty {
    pub fn of(&self, section: &Section) -> f64 {
        match self {
            SectionProperty::Ix => section.ix,
            SectionProperty::Zx => section.zx,
        }
    }
}

fn parse_size_name(name: &str) -> Option<(f64, f64)> {
    let rest = name.strip_prefix('W')?;
    let (depth, weight) = rest.split_once('X')?;
    Some((depth.trim().parse().ok()?, weight.trim().parse().ok()?))
}

/// The loaded shape table.
#[derive(Debug, Clone)]
pub struct SectionCatalog {
    sections: Vec<Section>,
    by_name: HashMap<String, usize>,
}

impl SectionCatalog {
    /// Builds a catalog from an in-memory list, validating every size name.
    pub fn new(sections: Vec<Section>) -> Result<Self, CatalogError> {
        let mut by_name = HashMap::with_capacity(sections.len());
        for (index, section) in sections.iter().enumerate() {
            if parse_size_name(&section.name).is_none() {
                return Err(CatalogError::MalformedSizeName(section.name.clone()));
            }
            by_name.insert(section.name.clone(), index);
        }
        Ok(Self { sections, by_name })
    }

    /// Loads the catalog from a CSV file with the standard header row.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let path_str = path.display().to_string();
        let file = File::open(path).map_err(|e| CatalogError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));
        let mut sections = Vec::new();
        for record in reader.deserialize() {
            let section: Section = record.map_err(|e| CatalogError::Csv {
                path: path_str.clone(),
                source: e,
            })?;
            sections.push(section);
        }
        Self::new(sections)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn lookup(&self, name: &str) -> Result<&Section, CatalogError> {
        self.by_name
            .get(name)
            .map(|&index| &self.sections[index])
            .ok_or_else(|| CatalogError::UnknownSection(name.to_string()))
    }

    /// All sizes whose nominal depth matches one of `depth_groups` (tokens
    /// like `W14`), ordered by `key` descending so index 0 is the strongest.
    pub fn candidates_by_depth(&self, depth_groups: &[String], key: SectionProperty) -> Vec<String> {
        let mut matched: Vec<&Section> = self
            .sections
            .iter()
            .filter(|section| {
                depth_groups.iter().any(|group| {
                    section
                        .name
                        .strip_prefix(group.as_str())
                        .is_some_and(|rest| rest.starts_with('X'))
                })
            })
            .collect();
        matched.sort_by(|a, b| {
            key.of(b)
                .partial_cmp(&key.of(a))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matched.iter().map(|section| section.name.clone()).collect()
    }

    /// The lightest candidate whose `key` property is at least `target`.
    ///
    /// `candidates` must be ordered descending by `key` (as produced by
    /// [`Self::candidates_by_depth`]). When even the strongest candidate falls
    /// short the strongest is returned and a warning is logged; the caller's
    /// strength checks will then flag the deficit.
    pub fn nearest_at_least(
        &self,
        key: SectionProperty,
        target: f64,
        candidates: &[String],
    ) -> Result<String, CatalogError> {
        if candidates.is_empty() {
            return Err(CatalogError::EmptyCandidatePool);
        }
        let mut chosen: Option<&str> = None;
        for name in candidates {
            let section = self.lookup(name)?;
            if key.of(section) >= target {
                chosen = Some(name);
            } else {
                break;
            }
        }
        match chosen {
            Some(name) => Ok(name.to_string()),
            None => {
                warn!(
                    target_value = target,
                    strongest = %candidates[0],
                    "no candidate reaches the target property; using the strongest available"
                );
                Ok(candidates[0].clone())
            }
        }
    }
}
