//! Builds the per-story check snapshots a design iteration works from.
//!
//! Column and beam checks are created from the governing demands, then the
//! joint connections are evaluated against the freshly built member sets.
//! Infeasible members are not errors here: they are logged and the workflow
//! reacts by resizing.

use crate::core::catalog::SectionCatalog;
use crate::core::checks::beam::BeamCheck;
use crate::core::checks::column::ColumnCheck;
use crate::core::checks::connection::{ConnectionCheck, JointInputs, JointTopology};
use crate::core::material::SteelMaterial;
use crate::engine::error::DesignError;
use crate::model::config::DesignConfig;
use crate::model::demand::GoverningDemand;
use crate::model::frame::Frame;
use tracing::warn;

/// Check snapshots for every member and joint of the frame,
/// `[story][element]`.
#[derive(Debug, Clone)]
pub struct MemberChecks {
    /// `bays + 1` columns per story.
    pub columns: Vec<Vec<ColumnCheck>>,
    /// `bays` beams per story.
    pub beams: Vec<Vec<BeamCheck>>,
    /// `bays + 1` joints per story.
    pub connections: Vec<Vec<ConnectionCheck>>,
}

impl MemberChecks {
    pub fn build(
        frame: &Frame,
        catalog: &SectionCatalog,
        demand: &GoverningDemand,
        steel: &SteelMaterial,
        config: &DesignConfig,
    ) -> Result<Self, DesignError> {
        let columns = build_columns(frame, catalog, demand, steel)?;
        let beams = build_beams(frame, catalog, demand, steel)?;
        let connections = build_connections(frame, &columns, &beams, steel, config)?;
        Ok(Self {
            columns,
            beams,
            connections,
        })
    }
}

fn build_columns(
    frame: &Frame,
    catalog: &SectionCatalog,
    demand: &GoverningDemand,
    steel: &SteelMaterial,
) -> Result<Vec<Vec<ColumnCheck>>, DesignError> {
    let bays = frame.geometry.num_bays;
    let mut columns = Vec::with_capacity(frame.num_stories());
    for story in 0..frame.num_stories() {
        let length_ft = frame.geometry.story_height_ft(story);
        let mut row = Vec::with_capacity(bays + 1);
        for column_no in 0..=bays {
            let size = if column_no == 0 || column_no == bays {
                &frame.sizes.exterior_column[story]
            } else {
                &frame.sizes.interior_column[story]
            };
            let section = catalog.lookup(size)?.clone();
            let check = ColumnCheck::new(
                section,
                demand.column_demand(story, column_no),
                length_ft,
                length_ft,
                steel,
            );
            if !check.is_feasible() {
                warn!(story, column_no, size = %size, "column is not feasible");
            }
            row.push(check);
        }
        columns.push(row);
    }
    Ok(columns)
}

fn build_beams(
    frame: &Frame,
    catalog: &SectionCatalog,
    demand: &GoverningDemand,
    steel: &SteelMaterial,
) -> Result<Vec<Vec<BeamCheck>>, DesignError> {
    let bays = frame.geometry.num_bays;
    let mut beams = Vec::with_capacity(frame.num_stories());
    for story in 0..frame.num_stories() {
        let mut row = Vec::with_capacity(bays);
        for bay in 0..bays {
            let size = &frame.sizes.beam[story];
            let section = catalog.lookup(size)?.clone();
            let check = BeamCheck::new(
                section,
                frame.geometry.bay_width_ft,
                demand.beam_demand(story, bay),
                steel,
            );
            if !check.is_feasible() {
                warn!(story, bay, size = %size, "beam is not feasible");
            }
            row.push(check);
        }
        beams.push(row);
    }
    Ok(beams)
}

fn build_connections(
    frame: &Frame,
    columns: &[Vec<ColumnCheck>],
    beams: &[Vec<BeamCheck>],
    steel: &SteelMaterial,
    config: &DesignConfig,
) -> Result<Vec<Vec<ConnectionCheck>>, DesignError> {
    let bays = frame.geometry.num_bays;
    let top_story = frame.num_stories() - 1;
    let mut connections = Vec::with_capacity(frame.num_stories());
    for story in 0..frame.num_stories() {
        let mut row = Vec::with_capacity(bays + 1);
        for joint in 0..=bays {
            let roof = story == top_story;
            let kind = match (roof, joint == 0 || joint == bays) {
                (false, true) => JointTopology::TypicalExterior,
                (false, false) => JointTopology::TypicalInterior,
                (true, true) => JointTopology::TopExterior,
                (true, false) => JointTopology::TopInterior,
            };
            // Exterior joints see their single adjacent beam; top interior
            // joints use the right-hand beam for both sides.
            let (left_beam, right_beam) = match kind {
                JointTopology::TypicalExterior | JointTopology::TopExterior => {
                    let bay = if joint == 0 { 0 } else { bays - 1 };
                    (&beams[story][bay], None)
                }
                JointTopology::TypicalInterior => {
                    (&beams[story][joint - 1], Some(&beams[story][joint]))
                }
                JointTopology::TopInterior => (&beams[story][joint], Some(&beams[story][joint])),
            };
            let top_column = if roof {
                None
            } else {
                Some(&columns[story + 1][joint])
            };
            let inputs = JointInputs {
                kind,
                steel,
                beam_dead_load: frame.loads.beam_dead_load_lb_ft[story],
                beam_live_load: frame.loads.beam_live_load_lb_ft[story],
                span_ft: frame.geometry.bay_width_ft,
                left_beam,
                right_beam,
                top_column,
                bottom_column: &columns[story][joint],
                scwb_ratio: config.scwb_ratio,
            };
            let check = ConnectionCheck::evaluate(&inputs)?;
            if !check.is_feasible() {
                warn!(story, joint, "connection is not feasible");
            }
            row.push(check);
        }
        connections.push(row);
    }
    Ok(connections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Section;
    use crate::core::seismic::{SeismicSite, SiteClass};
    use crate::model::demand::{CaseForces, LoadCaseForces};
    use crate::model::frame::{FrameGeometry, GravityLoads, MemberDepths};

    fn sample_csv() -> &'static str {
        "section size,d,bf,tf,tw,A,Ix,Iy,Zx,Sx,rx,ry,rts,J,Cw,h to tw ratio,bf to tf ratio\n\
         W14X193,15.5,15.7,1.440,0.890,56.8,2400.0,931.0,355.0,310.0,6.50,4.05,4.53,34.8,45900.0,12.8,5.45\n\
         W21X57,21.1,6.56,0.650,0.405,16.7,1170.0,30.6,129.0,111.0,8.36,1.35,1.68,1.77,3190.0,46.3,5.04\n"
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

    fn zero_demand(stories: usize, bays: usize) -> GoverningDemand {
        let cases = LoadCaseForces {
            dead: CaseForces::zeros(stories, bays),
            live: CaseForces::zeros(stories, bays),
            earthquake: CaseForces::zeros(stories, bays),
        };
        GoverningDemand::from_cases(&cases, 1.0)
    }

    #[test]
    fn member_checks_have_one_row_per_story_with_expected_widths() {
        let frame = sample_frame(3, 2);
        let checks = MemberChecks::build(
            &frame,
            &sample_catalog(),
            &zero_demand(3, 2),
            &SteelMaterial::default(),
            &DesignConfig::default(),
        )
        .expect("checks should build");
        assert_eq!(checks.columns.len(), 3);
        assert_eq!(checks.columns[0].len(), 3);
        assert_eq!(checks.beams[0].len(), 2);
        assert_eq!(checks.connections[0].len(), 3);
    }

    #[test]
    fn joint_topology_follows_story_and_position() {
        let frame = sample_frame(2, 2);
        let checks = MemberChecks::build(
            &frame,
            &sample_catalog(),
            &zero_demand(2, 2),
            &SteelMaterial::default(),
            &DesignConfig::default(),
        )
        .expect("checks should build");
        assert_eq!(checks.connections[0][0].kind, JointTopology::TypicalExterior);
        assert_eq!(checks.connections[0][1].kind, JointTopology::TypicalInterior);
        assert_eq!(checks.connections[1][0].kind, JointTopology::TopExterior);
        assert_eq!(checks.connections[1][1].kind, JointTopology::TopInterior);
    }

    #[test]
    fn roof_joints_carry_no_scwb_ratio() {
        let frame = sample_frame(2, 1);
        let checks = MemberChecks::build(
            &frame,
            &sample_catalog(),
            &zero_demand(2, 1),
            &SteelMaterial::default(),
            &DesignConfig::default(),
        )
        .expect("checks should build");
        assert!(checks.connections[1][0].scwb_ratio.is_none());
        assert!(checks.connections[0][0].scwb_ratio.is_some());
    }

    #[test]
    fn exterior_columns_use_the_exterior_size() {
        let mut frame = sample_frame(1, 2);
        frame.sizes.interior_column[0] = "W14X193".to_string();
        let checks = MemberChecks::build(
            &frame,
            &sample_catalog(),
            &zero_demand(1, 2),
            &SteelMaterial::default(),
            &DesignConfig::default(),
        )
        .expect("checks should build");
        assert_eq!(checks.columns[0][0].section.name, frame.sizes.exterior_column[0]);
        assert_eq!(checks.columns[0][1].section.name, "W14X193");
    }
}
