use thiserror::Error;

/// Error types
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("Illegal compute {style} command: {reason}")]
    IllegalCommand { style: String, reason: String },
    #[error("Could not find group ID {0}")]
    UnknownGroup(String),
    #[error("Too many groups, at most {0} can be defined")]
    GroupLimit(usize),
    #[error("Could not find compute ID {0}")]
    ComputeNotFound(String),
    #[error("Compute ID {0} already exists")]
    DuplicateCompute(String),
    #[error("Bias compute {0} does not calculate temperature")]
    BiasNotTemperature(String),
    #[error("Bias compute {0} does not calculate a velocity bias")]
    BiasWithoutVelocityBias(String),
    #[error("Bias compute {bias} group {bias_group} does not match compute group {group}")]
    BiasGroupMismatch {
        bias: String,
        bias_group: String,
        group: String,
    },
    #[error("Compute {0} cannot use itself as a temperature bias")]
    BiasSelfReference(String),
    #[error("Compute {compute} requires extended particles, atom {id} is a point particle")]
    PointParticle { compute: String, id: usize },
    #[error("Compute {compute} found a degenerate ellipsoid shape on atom {id}")]
    DegenerateShape { compute: String, id: usize },
    #[error("Compute {compute} found {count} invalid particles on other processes")]
    ParticleCheckFailed { compute: String, count: usize },
    #[error("Compute {0} must be initialized before use")]
    NotInitialized(String),
    #[error("Compute {0} is already in use")]
    ComputeBusy(String),
    #[error("Collective communication failed: {0}")]
    Disconnected(String),
}
