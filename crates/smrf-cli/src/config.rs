//! The building definition file.
//!
//! One TOML file describes everything the design workflow needs besides the
//! section database: frame geometry, gravity loads, seismic hazard, the
//! candidate depth groups per story, and optional overrides for the steel
//! grade and the design parameters.

use crate::error::{CliError, Result};
use serde::Deserialize;
use smrfdesign::core::material::SteelMaterial;
use smrfdesign::core::seismic::SeismicSite;
use smrfdesign::model::config::DesignConfig;
use smrfdesign::model::frame::{FrameGeometry, GravityLoads, MemberDepths};
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct BuildingFile {
    pub geometry: FrameGeometry,
    pub loads: GravityLoads,
    pub seismic: SeismicSite,
    pub members: MemberDepths,
    #[serde(default)]
    pub material: MaterialSection,
    #[serde(default)]
    pub design: DesignConfig,
}

/// Steel grade overrides; every field defaults to ASTM A992.
#[derive(Deserialize, Debug)]
#[serde(default, deny_unknown_fields)]
pub struct MaterialSection {
    pub fy: f64,
    pub fu: f64,
    pub e: f64,
    pub ry: f64,
}

impl Default for MaterialSection {
    fn default() -> Self {
        let steel = SteelMaterial::default();
        Self {
            fy: steel.fy,
            fu: steel.fu,
            e: steel.e,
            ry: steel.ry,
        }
    }
}

impl MaterialSection {
    pub fn to_steel(&self) -> SteelMaterial {
        SteelMaterial::new(self.fy, self.fu, self.e, self.ry)
    }
}

impl BuildingFile {
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading building definition from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
        [geometry]
        num_stories = 2
        num_bays = 1
        first_story_height_ft = 13.0
        typical_story_height_ft = 13.0
        bay_width_ft = 30.0
        num_lateral_frames = 2

        [loads]
        floor_weight_kips = [800.0, 800.0]
        beam_dead_load_lb_ft = [600.0, 600.0]
        beam_live_load_lb_ft = [300.0, 300.0]
        leaning_column_dead_load_kips = [300.0, 300.0]
        leaning_column_live_load_kips = [150.0, 150.0]

        [seismic]
        site_class = "D"
        ss = 1.5
        s1 = 0.6
        tl = 8.0
        r = 8.0
        cd = 5.5
        ie = 1.0
        rho = 1.0
        ct = 0.028
        x = 0.8

        [members]
        exterior_column = [["W14"], ["W14"]]
        interior_column = [["W14"], ["W14"]]
        beam = [["W21"], ["W21"]]

        [design]
        drift_limit = 0.015
    "#;

    #[test]
    fn full_building_file_parses() {
        let building: BuildingFile = toml::from_str(SAMPLE).expect("sample should parse");
        assert_eq!(building.geometry.num_stories, 2);
        assert_eq!(building.loads.floor_weight_kips.len(), 2);
        assert_eq!(building.seismic.cd, 5.5);
        assert_eq!(building.members.beam[0], vec!["W21".to_string()]);
        assert_eq!(building.design.drift_limit, 0.015);
        // Unset design fields keep their defaults.
        assert_eq!(building.design.identical_size_per_story, 2);
        let steel = building.material.to_steel();
        assert_eq!(steel.fy, 50.0);
    }

    #[test]
    fn unknown_top_level_key_is_rejected() {
        let broken = format!("{SAMPLE}\n[foundation]\npiles = 4\n");
        let result: std::result::Result<BuildingFile, _> = toml::from_str(&broken);
        assert!(result.is_err());
    }

    #[test]
    fn load_reports_the_offending_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file should create");
        write!(file, "[geometry]\nnum_stories = \"two\"\n").expect("write should succeed");
        let result = BuildingFile::load(file.path());
        match result {
            Err(CliError::Config { path, .. }) => assert_eq!(path, file.path()),
            other => panic!("expected a config error, got {other:?}"),
        }
    }
}
