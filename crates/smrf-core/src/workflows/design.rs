//! Automated member sizing for one steel special moment frame.
//!
//! The workflow starts from the stiffest candidate in every pool and walks
//! the design toward the lightest section set that satisfies every code
//! check:
//!
//! 1. Downsize for drift until the amplified story drift reaches the limit,
//!    then step back to the last satisfying set.
//! 2. Upsize members whose strength checks fail, re-analyzing after every
//!    change because the seismic forces track the fundamental period.
//! 3. Enforce the connection checks, upsizing beams for shear and flexure
//!    and columns for the strong-column-weak-beam criterion.
//! 4. Smooth the sizes for constructability and re-verify the connections
//!    on the smoothed design.
//!
//! The result carries two designs: the drift/strength optimum and the
//! constructable variant fabricators would actually order.

use crate::core::catalog::SectionCatalog;
use crate::core::material::SteelMaterial;
use crate::engine::error::DesignError;
use crate::engine::members::MemberChecks;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::solver::{ElasticSolver, SolverError};
use crate::model::config::DesignConfig;
use crate::model::demand::GoverningDemand;
use crate::model::frame::{Frame, FrameError, MemberRole, MemberSizes, SeismicForce};
use tracing::{info, instrument, warn};

/// One finished design: the sizes, the analysis state they were verified
/// under, and the full check snapshots.
#[derive(Debug, Clone)]
pub struct DesignSnapshot {
    pub sizes: MemberSizes,
    /// Fundamental period of the sized frame, s.
    pub modal_period: f64,
    pub seismic_strength: SeismicForce,
    pub seismic_drift: SeismicForce,
    /// Story drift ratio per story under the drift-level forces.
    pub story_drifts: Vec<f64>,
    pub checks: MemberChecks,
}

/// The two designs the workflow produces.
#[derive(Debug, Clone)]
pub struct DesignOutcome {
    /// Lightest section set that satisfies drift and every strength check.
    pub optimal: DesignSnapshot,
    /// The optimum smoothed so member sizes repeat across story groups,
    /// re-verified against the connection checks.
    pub construction: DesignSnapshot,
}

/// Analysis products of one design iteration, rebuilt after every resize.
struct IterationState {
    story_drifts: Vec<f64>,
    checks: MemberChecks,
}

/// Caps the total number of resizes so an infeasible combination of site
/// and candidate pools fails loudly instead of cycling.
struct ResizeBudget {
    used: usize,
    limit: usize,
}

impl ResizeBudget {
    fn new(limit: usize) -> Self {
        Self { used: 0, limit }
    }

    fn spend(&mut self) -> Result<(), DesignError> {
        self.used += 1;
        if self.used > self.limit {
            return Err(DesignError::Convergence {
                iterations: self.limit,
            });
        }
        Ok(())
    }
}

#[instrument(skip_all, name = "design_workflow")]
pub fn run<S>(
    initial_frame: &Frame,
    solver: &S,
    catalog: &SectionCatalog,
    steel: &SteelMaterial,
    config: &DesignConfig,
    reporter: &ProgressReporter,
) -> Result<DesignOutcome, DesignError>
where
    S: ElasticSolver + ?Sized,
{
    let mut frame = initial_frame.clone();
    let mut budget = ResizeBudget::new(config.max_resize_iterations);

    // === Phase 0: Analyze the initial (stiffest) section set ===
    reporter.report(Progress::PhaseStart {
        name: "Initial analysis",
    });
    info!("Analyzing the frame with the stiffest candidate sections.");
    let mut state = refresh(&mut frame, solver, catalog, steel, config)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 1: Drift optimization ===
    optimize_for_drift(
        &mut frame,
        &mut state,
        solver,
        catalog,
        steel,
        config,
        reporter,
        &mut budget,
    )?;

    // === Phase 2: Column strength ===
    reporter.report(Progress::PhaseStart {
        name: "Column strength",
    });
    let bays = frame.geometry.num_bays;
    for story in 0..frame.num_stories() {
        for column_no in 0..=bays {
            while !state.checks.columns[story][column_no].is_feasible() {
                budget.spend()?;
                let role = column_role(column_no, bays);
                frame.upscale(story, role)?;
                reporter.report(Progress::Resize {
                    story,
                    size: frame.size(story, role).to_string(),
                });
                state = refresh(&mut frame, solver, catalog, steel, config)?;
            }
        }
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Beam strength ===
    reporter.report(Progress::PhaseStart {
        name: "Beam strength",
    });
    for story in 0..frame.num_stories() {
        for bay in 0..bays {
            while !state.checks.beams[story][bay].is_feasible() {
                budget.spend()?;
                frame.upscale(story, MemberRole::Beam)?;
                reporter.report(Progress::Resize {
                    story,
                    size: frame.size(story, MemberRole::Beam).to_string(),
                });
                state = refresh(&mut frame, solver, catalog, steel, config)?;
            }
        }
    }
    reporter.report(Progress::PhaseFinish);

    // === Phase 4: Connection checks ===
    reporter.report(Progress::PhaseStart {
        name: "Connection checks",
    });
    enforce_connections(
        &mut frame,
        &mut state,
        solver,
        catalog,
        steel,
        config,
        reporter,
        &mut budget,
    )?;
    reporter.report(Progress::PhaseFinish);

    let optimal = DesignSnapshot::capture(&frame, &state)?;

    // === Phase 5: Constructability ===
    reporter.report(Progress::PhaseStart {
        name: "Constructability",
    });
    info!("Smoothing member sizes across story groups.");

    // Beams first; the stiffened beams can break connection checks, so the
    // full connection pass runs again before the columns are smoothed.
    let beam_sizes = frame.constructability_beams(catalog, config)?;
    let mut construction = frame.with_sizes(beam_sizes);
    let mut construction_state = refresh(&mut construction, solver, catalog, steel, config)?;
    enforce_connections(
        &mut construction,
        &mut construction_state,
        solver,
        catalog,
        steel,
        config,
        reporter,
        &mut budget,
    )?;

    let column_sizes = construction.constructability_columns(catalog, config)?;
    let mut construction = construction.with_sizes(column_sizes);
    let construction_state = refresh(&mut construction, solver, catalog, steel, config)?;
    report_narrow_column_flanges(&construction_state.checks);
    reporter.report(Progress::PhaseFinish);

    let construction = DesignSnapshot::capture(&construction, &construction_state)?;

    info!(
        iterations = budget.used,
        "Design complete. Returning the optimal and construction designs."
    );
    Ok(DesignOutcome {
        optimal,
        construction,
    })
}

impl DesignSnapshot {
    fn capture(frame: &Frame, state: &IterationState) -> Result<Self, DesignError> {
        let modal_period = frame
            .modal_period
            .ok_or(SolverError::MissingSeismicForces)?;
        let seismic_strength = frame
            .seismic_strength
            .clone()
            .ok_or(SolverError::MissingSeismicForces)?;
        let seismic_drift = frame
            .seismic_drift
            .clone()
            .ok_or(SolverError::MissingSeismicForces)?;
        Ok(Self {
            sizes: frame.sizes.clone(),
            modal_period,
            seismic_strength,
            seismic_drift,
            story_drifts: state.story_drifts.clone(),
            checks: state.checks.clone(),
        })
    }
}

/// Re-runs the full analysis chain for the frame's current sizes: period,
/// seismic forces, elastic response, governing demands, member checks.
fn refresh<S>(
    frame: &mut Frame,
    solver: &S,
    catalog: &SectionCatalog,
    steel: &SteelMaterial,
    config: &DesignConfig,
) -> Result<IterationState, DesignError>
where
    S: ElasticSolver + ?Sized,
{
    let period = solver.modal_period(frame)?;
    frame.compute_seismic_forces(period, config);
    let response = solver.analyze(frame)?;
    let demand = GoverningDemand::from_cases(&response.forces, frame.elf.spectrum.sds);
    let checks = MemberChecks::build(frame, catalog, &demand, steel, config)?;
    Ok(IterationState {
        story_drifts: response.story_drifts,
        checks,
    })
}

/// Shrinks the frame one candidate at a time while the amplified drift
/// stays within the limit, then restores the last satisfying set.
///
/// The drift is amplified by Cd and by the flexibility added when the
/// reduced beam sections are cut. Downsizing always targets the story with
/// the smallest drift; exhausting its candidate pool ends the phase with
/// the current (still satisfying) sizes.
#[allow(clippy::too_many_arguments)]
fn optimize_for_drift<S>(
    frame: &mut Frame,
    state: &mut IterationState,
    solver: &S,
    catalog: &SectionCatalog,
    steel: &SteelMaterial,
    config: &DesignConfig,
    reporter: &ProgressReporter,
    budget: &mut ResizeBudget,
) -> Result<(), DesignError>
where
    S: ElasticSolver + ?Sized,
{
    reporter.report(Progress::PhaseStart {
        name: "Drift optimization",
    });
    let allowable = config.drift_limit / frame.elf.site.rho;
    let cd = frame.elf.site.cd;
    let mut downsized = 0usize;
    let mut pool_exhausted = false;
    let mut last_sizes = frame.sizes.clone();
    loop {
        let amplified = max_drift(&state.story_drifts) * cd * config.rbs_stiffness_factor;
        if amplified > allowable {
            break;
        }
        last_sizes = frame.sizes.clone();
        let story = smallest_drift_story(&state.story_drifts);
        match frame.downsize_for_drift(story, catalog, config) {
            Ok(()) => {}
            Err(FrameError::NoLighterSection { .. }) => {
                info!(story, "Candidate pool exhausted; keeping current sizes.");
                pool_exhausted = true;
                break;
            }
            Err(err) => return Err(err.into()),
        }
        budget.spend()?;
        reporter.report(Progress::Resize {
            story,
            size: frame
                .size(story, MemberRole::InteriorColumn)
                .to_string(),
        });
        *state = refresh(frame, solver, catalog, steel, config)?;
        downsized += 1;
    }
    if !pool_exhausted {
        if downsized == 0 {
            return Err(DesignError::InitialStiffnessTooLow);
        }
        // The last downsize went too far.
        frame.sizes = last_sizes;
        *state = refresh(frame, solver, catalog, steel, config)?;
    }
    info!(downsized, "Drift optimization finished.");
    reporter.report(Progress::PhaseFinish);
    Ok(())
}

/// Walks every joint and resizes until its connection checks pass.
///
/// Failed shear or flexural checks upsize the beam of that story. A failed
/// strong-column-weak-beam check upsizes a column: the one above the joint
/// when it is much lighter than the one below, otherwise the one below; at
/// the roof only the top-story column exists.
#[allow(clippy::too_many_arguments)]
fn enforce_connections<S>(
    frame: &mut Frame,
    state: &mut IterationState,
    solver: &S,
    catalog: &SectionCatalog,
    steel: &SteelMaterial,
    config: &DesignConfig,
    reporter: &ProgressReporter,
    budget: &mut ResizeBudget,
) -> Result<(), DesignError>
where
    S: ElasticSolver + ?Sized,
{
    let bays = frame.geometry.num_bays;
    let top_story = frame.num_stories() - 1;
    for story in 0..frame.num_stories() {
        for joint in 0..=bays {
            loop {
                let feasibility = &state.checks.connections[story][joint].feasibility;
                if feasibility.shear_strength && feasibility.flexural_strength {
                    break;
                }
                budget.spend()?;
                frame.upscale(story, MemberRole::Beam)?;
                reporter.report(Progress::Resize {
                    story,
                    size: frame.size(story, MemberRole::Beam).to_string(),
                });
                *state = refresh(frame, solver, catalog, steel, config)?;
            }
            loop {
                if state.checks.connections[story][joint].feasibility.scwb {
                    break;
                }
                budget.spend()?;
                let target_story = if story == top_story {
                    story
                } else {
                    // Upsize the upper column when it is much lighter than
                    // the lower one; the joint imbalance comes from it.
                    let upper = state.checks.columns[story + 1][joint].section.zx;
                    let lower = state.checks.columns[story][joint].section.zx;
                    if upper < config.upper_lower_column_zx_ratio * lower {
                        story + 1
                    } else {
                        story
                    }
                };
                let role = column_role(joint, bays);
                frame.upscale(target_story, role)?;
                reporter.report(Progress::Resize {
                    story: target_story,
                    size: frame.size(target_story, role).to_string(),
                });
                *state = refresh(frame, solver, catalog, steel, config)?;
            }
        }
    }
    Ok(())
}

fn column_role(column_no: usize, bays: usize) -> MemberRole {
    if column_no == 0 || column_no == bays {
        MemberRole::ExteriorColumn
    } else {
        MemberRole::InteriorColumn
    }
}

fn max_drift(drifts: &[f64]) -> f64 {
    drifts.iter().copied().fold(0.0, f64::max)
}

fn smallest_drift_story(drifts: &[f64]) -> usize {
    let mut best = 0;
    for (story, drift) in drifts.iter().enumerate() {
        if *drift < drifts[best] {
            best = story;
        }
    }
    best
}

/// Erection advisory: a column flange narrower than the beam flange
/// complicates the welded flange connection.
fn report_narrow_column_flanges(checks: &MemberChecks) {
    for (story, columns) in checks.columns.iter().enumerate() {
        let beam_bf = checks.beams[story][0].section.bf;
        if columns.iter().any(|column| column.section.bf < beam_bf) {
            warn!(story, "column flange is narrower than the beam flange");
        }
    }
}
