use thiserror::Error;

use crate::{
    catalog::NodeTypeId,
    channel::Channel,
    memory::{DocumentId, MaterialId, NodeId},
};

/// An error while building the node graph for a material.
///
/// Nodes created before the failing step remain in the material.
#[derive(Debug, Error)]
#[error("error setting up {channel} texture")]
pub struct SetupTexturesError {
    /// The channel of the assembly step that failed.
    pub channel: Channel,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync + 'static>,
}

impl SetupTexturesError {
    pub fn new<E>(channel: Channel, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self {
            channel,
            source: Box::new(source),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadCatalogError {
    #[error("error reading catalog file")]
    Io(#[from] std::io::Error),

    #[error("error deserializing catalog JSON")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum SaveCatalogError {
    #[error("error writing catalog file")]
    Io(#[from] std::io::Error),

    #[error("error serializing catalog JSON")]
    Json(#[from] serde_json::Error),
}

/// An operation rejected by a [MemoryHost](crate::memory::MemoryHost).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MemoryHostError {
    #[error("node type {0:?} is not in the catalog")]
    UnknownNodeType(NodeTypeId),

    #[error("material type {0:?} is not in the catalog")]
    UnknownMaterialType(NodeTypeId),

    #[error("node {0:?} does not exist")]
    UnknownNode(NodeId),

    #[error("material {0:?} does not exist")]
    UnknownMaterial(MaterialId),

    #[error("document {0:?} does not exist")]
    UnknownDocument(DocumentId),
}
