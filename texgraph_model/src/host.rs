//! The operations needed from the application that owns materials and shader nodes.
use ordered_float::OrderedFloat;
use serde::Serialize;

use crate::catalog::{NodeTypeId, SlotId};

/// A value assigned to a node or material parameter slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum ParamValue<N> {
    Bool(bool),
    Int(i32),
    Float(OrderedFloat<f32>),
    String(String),
    /// A link to the output of another node.
    Node(N),
}

impl<N> ParamValue<N> {
    pub fn float(value: f32) -> Self {
        Self::Float(OrderedFloat(value))
    }

    pub fn as_node(&self) -> Option<&N> {
        match self {
            Self::Node(n) => Some(n),
            _ => None,
        }
    }
}

/// Node and material creation in an external scene or document.
///
/// Handles are cheap references into data owned by the host.
/// Any failure should be returned as [Self::Error]
/// instead of panicking so that callers can report which step failed.
pub trait GraphHost {
    type Node: Clone;
    type Material: Clone;
    type Document;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create a new node that is not yet owned by any material.
    fn create_node(&mut self, node_type: NodeTypeId) -> Result<Self::Node, Self::Error>;

    /// Add `node` to the shader collection of `material`.
    fn insert_into_material(
        &mut self,
        material: &Self::Material,
        node: &Self::Node,
    ) -> Result<(), Self::Error>;

    fn set_parameter(
        &mut self,
        node: &Self::Node,
        slot: SlotId,
        value: ParamValue<Self::Node>,
    ) -> Result<(), Self::Error>;

    fn set_name(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;

    fn create_material(
        &mut self,
        material_type: NodeTypeId,
        name: &str,
    ) -> Result<Self::Material, Self::Error>;

    fn register_material(
        &mut self,
        document: &Self::Document,
        material: &Self::Material,
    ) -> Result<(), Self::Error>;

    /// The document used when the caller does not specify one.
    fn active_document(&self) -> Self::Document;

    /// Link `node` to an input like the diffuse color of `material`.
    fn set_material_input(
        &mut self,
        material: &Self::Material,
        slot: SlotId,
        node: &Self::Node,
    ) -> Result<(), Self::Error>;

    fn set_material_parameter(
        &mut self,
        material: &Self::Material,
        slot: SlotId,
        value: ParamValue<Self::Node>,
    ) -> Result<(), Self::Error>;
}
