use thiserror::Error;

use crate::core::catalog::CatalogError;
use crate::core::checks::connection::ConnectionError;
use crate::engine::solver::SolverError;
use crate::model::frame::FrameError;

#[derive(Debug, Error)]
pub enum DesignError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Frame(#[from] FrameError),

    #[error("Elastic analysis failed: {source}")]
    Solver {
        #[from]
        source: SolverError,
    },

    #[error("Connection evaluation failed: {source}")]
    Connection {
        #[from]
        source: ConnectionError,
    },

    #[error(
        "The stiffest candidate sections already violate the drift limit; \
         the candidate pools are too flexible for this building"
    )]
    InitialStiffnessTooLow,

    #[error("Design failed to converge after {iterations} resize iterations")]
    Convergence { iterations: usize },
}
