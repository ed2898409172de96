use thiserror::Error;

use crate::hierarchy::SENTINEL_ROOT;

/// Problems with the shape of a treemap hierarchy. Any of these aborts the
/// render pass that hit it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("category key collides with the root sentinel {:?}", SENTINEL_ROOT)]
    SentinelCollision,
    #[error("hierarchy has no root node")]
    MissingRoot,
    #[error("hierarchy has more than one root: {first:?} and {second:?}")]
    MultipleRoots { first: String, second: String },
    #[error("node {id:?} has parent {parent:?}, expected the root {root:?}")]
    NotFlat {
        id: String,
        parent: String,
        root: String,
    },
    #[error("duplicate node id {0:?}")]
    DuplicateId(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid JSON5: {0}")]
    Json5(#[from] json5::Error),
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error("invalid geometry for region {region:?}: {reason}")]
    InvalidGeometry { region: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
