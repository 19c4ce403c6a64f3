//! A [GraphHost] that stores documents, materials, and nodes in memory.
//!
//! This is useful for previewing or exporting the generated graphs
//! without a running host application.
use std::{collections::BTreeSet, fmt::Display};

use indexmap::IndexMap;
use serde::Serialize;
use smol_str::SmolStr;

use crate::{
    catalog::{NodeCatalog, NodeTypeId, SlotId},
    error::MemoryHostError,
    host::{GraphHost, ParamValue},
};

/// The index of a node in [nodes](struct.MemoryHost.html#structfield.nodes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// The index of a material in [materials](struct.MemoryHost.html#structfield.materials).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct MaterialId(pub usize);

/// The index of a document in [documents](struct.MemoryHost.html#structfield.documents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DocumentId(pub usize);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryHost {
    pub documents: Vec<Document>,
    pub materials: Vec<Material>,
    pub nodes: Vec<Node>,
    #[serde(skip)]
    node_types: BTreeSet<NodeTypeId>,
    #[serde(skip)]
    material_type: NodeTypeId,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Document {
    pub materials: Vec<MaterialId>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Material {
    pub name: SmolStr,
    pub material_type: NodeTypeId,
    /// The shader collection in insertion order.
    pub nodes: Vec<NodeId>,
    pub inputs: IndexMap<SlotId, ParamValue<NodeId>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub name: Option<SmolStr>,
    pub node_type: NodeTypeId,
    pub parameters: IndexMap<SlotId, ParamValue<NodeId>>,
}

impl MemoryHost {
    /// Create a host with a single active document
    /// that accepts the node and material types in `catalog`.
    pub fn new(catalog: &NodeCatalog) -> Self {
        Self {
            documents: vec![Document::default()],
            materials: Vec::new(),
            nodes: Vec::new(),
            node_types: catalog.node_types().into_iter().collect(),
            material_type: catalog.nodes.standard_surface,
        }
    }

    pub fn add_document(&mut self) -> DocumentId {
        self.documents.push(Document::default());
        DocumentId(self.documents.len() - 1)
    }

    pub fn document(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(id.0)
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(id.0)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// The nodes in the shader collection of `material` with the given type.
    pub fn material_nodes_of_type(&self, material: MaterialId, node_type: NodeTypeId) -> Vec<NodeId> {
        self.material(material)
            .map(|m| {
                m.nodes
                    .iter()
                    .copied()
                    .filter(|n| self.node(*n).map(|n| n.node_type) == Some(node_type))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// The node linked to the material input `slot`.
    pub fn material_input(&self, material: MaterialId, slot: SlotId) -> Option<NodeId> {
        self.material(material)?.inputs.get(&slot)?.as_node().copied()
    }

    /// A human readable listing of the material inputs and shader collection of `material`.
    pub fn graph_text(&self, material: MaterialId) -> Option<String> {
        let material = self.material(material)?;
        Some(GraphText { host: self, material }.to_string())
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, MemoryHostError> {
        self.nodes
            .get_mut(id.0)
            .ok_or(MemoryHostError::UnknownNode(id))
    }

    fn material_mut(&mut self, id: MaterialId) -> Result<&mut Material, MemoryHostError> {
        self.materials
            .get_mut(id.0)
            .ok_or(MemoryHostError::UnknownMaterial(id))
    }

    fn check_value(&self, value: &ParamValue<NodeId>) -> Result<(), MemoryHostError> {
        match value {
            ParamValue::Node(n) if self.node(*n).is_none() => Err(MemoryHostError::UnknownNode(*n)),
            _ => Ok(()),
        }
    }
}

impl GraphHost for MemoryHost {
    type Node = NodeId;
    type Material = MaterialId;
    type Document = DocumentId;
    type Error = MemoryHostError;

    fn create_node(&mut self, node_type: NodeTypeId) -> Result<NodeId, MemoryHostError> {
        if !self.node_types.contains(&node_type) {
            return Err(MemoryHostError::UnknownNodeType(node_type));
        }

        self.nodes.push(Node {
            name: None,
            node_type,
            parameters: IndexMap::new(),
        });
        Ok(NodeId(self.nodes.len() - 1))
    }

    fn insert_into_material(
        &mut self,
        material: &MaterialId,
        node: &NodeId,
    ) -> Result<(), MemoryHostError> {
        self.node_mut(*node)?;
        self.material_mut(*material)?.nodes.push(*node);
        Ok(())
    }

    fn set_parameter(
        &mut self,
        node: &NodeId,
        slot: SlotId,
        value: ParamValue<NodeId>,
    ) -> Result<(), MemoryHostError> {
        self.check_value(&value)?;
        self.node_mut(*node)?.parameters.insert(slot, value);
        Ok(())
    }

    fn set_name(&mut self, node: &NodeId, name: &str) -> Result<(), MemoryHostError> {
        self.node_mut(*node)?.name = Some(name.into());
        Ok(())
    }

    fn create_material(
        &mut self,
        material_type: NodeTypeId,
        name: &str,
    ) -> Result<MaterialId, MemoryHostError> {
        if material_type != self.material_type {
            return Err(MemoryHostError::UnknownMaterialType(material_type));
        }

        self.materials.push(Material {
            name: name.into(),
            material_type,
            nodes: Vec::new(),
            inputs: IndexMap::new(),
        });
        Ok(MaterialId(self.materials.len() - 1))
    }

    fn register_material(
        &mut self,
        document: &DocumentId,
        material: &MaterialId,
    ) -> Result<(), MemoryHostError> {
        self.material_mut(*material)?;
        self.documents
            .get_mut(document.0)
            .ok_or(MemoryHostError::UnknownDocument(*document))?
            .materials
            .push(*material);
        Ok(())
    }

    fn active_document(&self) -> DocumentId {
        DocumentId(0)
    }

    fn set_material_input(
        &mut self,
        material: &MaterialId,
        slot: SlotId,
        node: &NodeId,
    ) -> Result<(), MemoryHostError> {
        self.set_material_parameter(material, slot, ParamValue::Node(*node))
    }

    fn set_material_parameter(
        &mut self,
        material: &MaterialId,
        slot: SlotId,
        value: ParamValue<NodeId>,
    ) -> Result<(), MemoryHostError> {
        self.check_value(&value)?;
        self.material_mut(*material)?.inputs.insert(slot, value);
        Ok(())
    }
}

struct GraphText<'a> {
    host: &'a MemoryHost,
    material: &'a Material,
}

impl Display for GraphText<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "material {:?} ({})",
            self.material.name, self.material.material_type.0
        )?;
        for (slot, value) in &self.material.inputs {
            writeln!(f, "    {} = {}", slot.0, ValueText(value))?;
        }

        for id in &self.material.nodes {
            if let Some(node) = self.host.node(*id) {
                match &node.name {
                    Some(name) => writeln!(f, "node {} {name:?} ({})", id.0, node.node_type.0)?,
                    None => writeln!(f, "node {} ({})", id.0, node.node_type.0)?,
                }
                for (slot, value) in &node.parameters {
                    writeln!(f, "    {} = {}", slot.0, ValueText(value))?;
                }
            }
        }
        Ok(())
    }
}

struct ValueText<'a>(&'a ParamValue<NodeId>);

impl Display for ValueText<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            ParamValue::Bool(b) => write!(f, "{b}"),
            ParamValue::Int(i) => write!(f, "{i}"),
            ParamValue::Float(v) => write!(f, "{:?}", v.0),
            ParamValue::String(s) => write!(f, "{s:?}"),
            ParamValue::Node(n) => write!(f, "node {}", n.0),
        }
    }
}
