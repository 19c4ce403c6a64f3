//! Helpers for creating individual shader nodes in a material.
use std::path::Path;

use crate::{
    catalog::{NodeCatalog, NodeTypeId, SlotId},
    host::{GraphHost, ParamValue},
};

/// The gamma for color textures like albedo.
pub const DEFAULT_COLOR_GAMMA: f32 = 2.2;

/// The gamma for non color data like roughness or normals.
pub const LINEAR_GAMMA: f32 = 1.0;

pub const DEFAULT_MATERIAL_NAME: &str = "Standard Surface";

/// Settings for [MaterialNodes::add_image_texture].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTextureOptions<'a> {
    /// The node name or the file name of the path if not set or empty.
    pub name: Option<&'a str>,
    /// Sample the texture as single channel float data instead of color.
    pub is_float: bool,
    pub gamma: f32,
    pub invert: bool,
}

impl Default for ImageTextureOptions<'_> {
    fn default() -> Self {
        Self {
            name: None,
            is_float: false,
            gamma: DEFAULT_COLOR_GAMMA,
            invert: false,
        }
    }
}

impl ImageTextureOptions<'_> {
    /// The gamma actually assigned to the node.
    ///
    /// Float textures with the default color gamma use [LINEAR_GAMMA] instead.
    /// Any other gamma is used as is.
    pub fn effective_gamma(&self) -> f32 {
        if self.is_float && self.gamma == DEFAULT_COLOR_GAMMA {
            LINEAR_GAMMA
        } else {
            self.gamma
        }
    }
}

/// Creates nodes owned by a single material.
///
/// Nodes are always inserted into the material before any parameters are set.
/// None of the methods link the created node to a material input.
pub struct MaterialNodes<'a, H: GraphHost> {
    pub host: &'a mut H,
    pub catalog: &'a NodeCatalog,
    pub material: &'a H::Material,
}

impl<'a, H: GraphHost> MaterialNodes<'a, H> {
    pub fn new(host: &'a mut H, catalog: &'a NodeCatalog, material: &'a H::Material) -> Self {
        Self {
            host,
            catalog,
            material,
        }
    }

    /// Create a node of type `node_type` in the material's shader collection.
    pub fn add_node(&mut self, node_type: NodeTypeId) -> Result<H::Node, H::Error> {
        let node = self.host.create_node(node_type)?;
        self.host.insert_into_material(self.material, &node)?;
        Ok(node)
    }

    /// Create an image texture node for the file at `path`.
    /// An empty `path` leaves the file unassigned.
    pub fn add_image_texture(
        &mut self,
        path: &str,
        options: &ImageTextureOptions,
    ) -> Result<H::Node, H::Error> {
        let catalog = self.catalog;
        let slots = &catalog.image_texture;
        let node = self.add_node(catalog.nodes.image_texture)?;

        if !path.is_empty() {
            self.host
                .set_parameter(&node, slots.file, ParamValue::String(path.to_string()))?;
        }
        self.host
            .set_parameter(&node, slots.invert, ParamValue::Bool(options.invert))?;
        self.host.set_parameter(
            &node,
            slots.mode,
            ParamValue::Int(if options.is_float { 1 } else { 0 }),
        )?;
        self.host.set_parameter(
            &node,
            slots.gamma,
            ParamValue::float(options.effective_gamma()),
        )?;

        match options.name {
            Some(name) if !name.is_empty() => self.host.set_name(&node, name)?,
            _ => self.host.set_name(&node, &file_name(path))?,
        }

        Ok(node)
    }

    pub fn add_color_correction(&mut self, input: Option<&H::Node>) -> Result<H::Node, H::Error> {
        let node = self.add_node(self.catalog.nodes.color_correction)?;
        if let Some(input) = input {
            self.link(&node, self.catalog.color_correction.texture, input)?;
        }
        Ok(node)
    }

    pub fn add_multiply(
        &mut self,
        texture1: Option<&H::Node>,
        texture2: Option<&H::Node>,
    ) -> Result<H::Node, H::Error> {
        let node = self.add_node(self.catalog.nodes.multiply)?;
        if let Some(texture1) = texture1 {
            self.link(&node, self.catalog.multiply.texture1, texture1)?;
        }
        if let Some(texture2) = texture2 {
            self.link(&node, self.catalog.multiply.texture2, texture2)?;
        }
        Ok(node)
    }

    pub fn add_invert(&mut self, input: Option<&H::Node>) -> Result<H::Node, H::Error> {
        let node = self.add_node(self.catalog.nodes.invert)?;
        if let Some(input) = input {
            self.link(&node, self.catalog.invert.texture, input)?;
        }
        Ok(node)
    }

    pub fn add_displacement(&mut self) -> Result<H::Node, H::Error> {
        self.add_node(self.catalog.nodes.displacement)
    }

    /// Create an emission node since emission inputs do not accept textures directly.
    pub fn add_texture_emission(&mut self, input: Option<&H::Node>) -> Result<H::Node, H::Error> {
        let node = self.add_node(self.catalog.nodes.texture_emission)?;
        if let Some(input) = input {
            self.link(&node, self.catalog.texture_emission.texture, input)?;
        }
        Ok(node)
    }

    fn link(
        &mut self,
        node: &H::Node,
        slot: SlotId,
        input: &H::Node,
    ) -> Result<(), H::Error> {
        self.host
            .set_parameter(node, slot, ParamValue::Node(input.clone()))
    }
}

/// Create a standard surface material and add it to `document`
/// or the host's active document if not specified.
pub fn create_standard_material<H: GraphHost>(
    host: &mut H,
    catalog: &NodeCatalog,
    document: Option<&H::Document>,
    name: Option<&str>,
) -> Result<H::Material, H::Error> {
    let material = host.create_material(
        catalog.nodes.standard_surface,
        name.unwrap_or(DEFAULT_MATERIAL_NAME),
    )?;
    match document {
        Some(document) => host.register_material(document, &material)?,
        None => {
            let document = host.active_document();
            host.register_material(&document, &material)?
        }
    }
    Ok(material)
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    use crate::memory::{MaterialId, MemoryHost, NodeId};

    fn material_host(catalog: &NodeCatalog) -> (MemoryHost, MaterialId) {
        let mut host = MemoryHost::new(catalog);
        let material = create_standard_material(&mut host, catalog, None, None).unwrap();
        (host, material)
    }

    fn parameter(host: &MemoryHost, node: NodeId, slot: SlotId) -> ParamValue<NodeId> {
        host.node(node).unwrap().parameters[&slot].clone()
    }

    #[test]
    fn add_image_texture_color() {
        let catalog = NodeCatalog::default();
        let (mut host, material) = material_host(&catalog);

        let node = MaterialNodes::new(&mut host, &catalog, &material)
            .add_image_texture("textures/wall_basecolor.png", &ImageTextureOptions::default())
            .unwrap();

        let slots = &catalog.image_texture;
        assert_eq!(
            ParamValue::String("textures/wall_basecolor.png".to_string()),
            parameter(&host, node, slots.file)
        );
        assert_eq!(ParamValue::Bool(false), parameter(&host, node, slots.invert));
        assert_eq!(ParamValue::Int(0), parameter(&host, node, slots.mode));
        assert_eq!(ParamValue::float(2.2), parameter(&host, node, slots.gamma));
        assert_eq!(
            Some("wall_basecolor.png"),
            host.node(node).unwrap().name.as_deref()
        );
        assert_eq!(vec![node], host.materials[material.0].nodes);
    }

    #[test]
    fn add_image_texture_float_default_gamma_is_linear() {
        let catalog = NodeCatalog::default();
        let (mut host, material) = material_host(&catalog);

        let node = MaterialNodes::new(&mut host, &catalog, &material)
            .add_image_texture(
                "rough.png",
                &ImageTextureOptions {
                    is_float: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(
            ParamValue::float(1.0),
            parameter(&host, node, catalog.image_texture.gamma)
        );
        assert_eq!(
            ParamValue::Int(1),
            parameter(&host, node, catalog.image_texture.mode)
        );
    }

    #[test]
    fn add_image_texture_float_custom_gamma() {
        let catalog = NodeCatalog::default();
        let (mut host, material) = material_host(&catalog);

        let node = MaterialNodes::new(&mut host, &catalog, &material)
            .add_image_texture(
                "mask.png",
                &ImageTextureOptions {
                    name: Some("Mask"),
                    is_float: true,
                    gamma: 1.8,
                    invert: true,
                },
            )
            .unwrap();

        assert_eq!(
            ParamValue::float(1.8),
            parameter(&host, node, catalog.image_texture.gamma)
        );
        assert_eq!(
            ParamValue::Bool(true),
            parameter(&host, node, catalog.image_texture.invert)
        );
        assert_eq!(Some("Mask"), host.node(node).unwrap().name.as_deref());
    }

    #[test]
    fn add_image_texture_color_linear_gamma() {
        let options = ImageTextureOptions {
            gamma: 1.0,
            ..Default::default()
        };
        assert_eq!(1.0, options.effective_gamma());
    }

    #[test]
    fn add_image_texture_empty_path() {
        let catalog = NodeCatalog::default();
        let (mut host, material) = material_host(&catalog);

        let node = MaterialNodes::new(&mut host, &catalog, &material)
            .add_image_texture("", &ImageTextureOptions::default())
            .unwrap();

        let node = host.node(node).unwrap();
        assert!(!node.parameters.contains_key(&catalog.image_texture.file));
        assert_eq!(Some(""), node.name.as_deref());
    }

    #[test]
    fn add_image_texture_empty_name_uses_file_name() {
        let catalog = NodeCatalog::default();
        let (mut host, material) = material_host(&catalog);

        let node = MaterialNodes::new(&mut host, &catalog, &material)
            .add_image_texture(
                "textures/wall_rough.png",
                &ImageTextureOptions {
                    name: Some(""),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(
            Some("wall_rough.png"),
            host.node(node).unwrap().name.as_deref()
        );
    }

    #[test]
    fn add_multiply_links_both_textures() {
        let catalog = NodeCatalog::default();
        let (mut host, material) = material_host(&catalog);

        let mut nodes = MaterialNodes::new(&mut host, &catalog, &material);
        let a = nodes.add_color_correction(None).unwrap();
        let b = nodes.add_invert(None).unwrap();
        let multiply = nodes.add_multiply(Some(&a), Some(&b)).unwrap();

        assert_eq!(
            ParamValue::Node(a),
            parameter(&host, multiply, catalog.multiply.texture1)
        );
        assert_eq!(
            ParamValue::Node(b),
            parameter(&host, multiply, catalog.multiply.texture2)
        );
        assert!(host.node(a).unwrap().parameters.is_empty());
    }

    #[test]
    fn create_standard_material_active_document() {
        let catalog = NodeCatalog::default();
        let mut host = MemoryHost::new(&catalog);

        let material = create_standard_material(&mut host, &catalog, None, None).unwrap();

        let material = &host.materials[material.0];
        assert_eq!("Standard Surface", material.name);
        assert_eq!(catalog.nodes.standard_surface, material.material_type);
        assert_eq!(1, host.documents[0].materials.len());
    }

    #[test]
    fn create_standard_material_document() {
        let catalog = NodeCatalog::default();
        let mut host = MemoryHost::new(&catalog);
        let document = host.add_document();

        let material =
            create_standard_material(&mut host, &catalog, Some(&document), Some("Brick")).unwrap();

        assert_eq!("Brick", host.materials[material.0].name);
        assert!(host.documents[0].materials.is_empty());
        assert_eq!(vec![material], host.documents[1].materials);
    }
}
