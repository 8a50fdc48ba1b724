//! The seam between the design loop and the elastic analysis engine.
//!
//! The workflow only ever talks to an [`ElasticSolver`]; the built-in
//! portal-method solver implements it, and an external finite-element
//! engine can be substituted behind the same trait.

use thiserror::Error;

use crate::core::catalog::CatalogError;
use crate::model::demand::LoadCaseForces;
use crate::model::frame::Frame;

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Seismic forces have not been computed for the current sizes")]
    MissingSeismicForces,
    #[error("Lateral stiffness is not positive at story {story}")]
    NonPositiveStiffness { story: usize },
    #[error("Total seismic weight must be positive")]
    NonPositiveWeight,
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Elastic results for one design iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticResponse {
    /// Story drift ratio per story (bottom to top), from the drift-level
    /// seismic forces.
    pub story_drifts: Vec<f64>,
    /// Element end forces for the dead, live and earthquake load cases;
    /// the earthquake case uses the strength-level forces.
    pub forces: LoadCaseForces,
}

/// An elastic analysis engine for one moment frame.
pub trait ElasticSolver {
    /// Fundamental period of the frame with its current member sizes, s.
    fn modal_period(&self, frame: &Frame) -> Result<f64, SolverError>;

    /// Analyzes the frame under the three load cases. The frame must carry
    /// seismic forces for its current sizes.
    fn analyze(&self, frame: &Frame) -> Result<ElasticResponse, SolverError>;
}
