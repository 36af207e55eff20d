use thiserror::Error;

/// Top-level error type for the crossway geometry stage.
#[derive(Debug, Error)]
pub enum CrosswayError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    Operation(#[from] OperationError),
}

/// Errors related to curve evaluation and road profiles.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("invalid road profile: {0}")]
    InvalidProfile(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to lookups in the road network arena.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("entity not found: {0}")]
    EntityNotFound(&'static str),

    #[error("endpoint already belongs to an intersection")]
    EndpointTaken,

    #[error("an intersection needs endpoints on two different curves")]
    SameCurve,
}

/// Errors raised by the intersection operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("{stage} requires {requirement}")]
    MissingStage {
        stage: &'static str,
        requirement: &'static str,
    },

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Convenience type alias for results using [`CrosswayError`] by default.
pub type Result<T, E = CrosswayError> = std::result::Result<T, E>;
