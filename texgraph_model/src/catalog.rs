//! Node type and parameter slot identifiers understood by the graph host.
//!
//! Hosts address node types and parameters by integer ID rather than by name.
//! The values must match the host's node catalog exactly,
//! so they are kept in a single table that can be replaced per host version.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LoadCatalogError, SaveCatalogError};

/// The type ID for a node or material like an image texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeTypeId(pub u32);

/// The ID of a parameter or input link on a node or material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotId(pub u32);

/// Identifiers for all node types and slots used when building materials.
///
/// The [Default] values match the Octane render plugin for Cinema 4D.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeCatalog {
    /// A label for the host version these identifiers were taken from.
    pub version: String,
    pub nodes: NodeTypes,
    pub material: MaterialSlots,
    pub image_texture: ImageTextureSlots,
    pub color_correction: ColorCorrectionSlots,
    pub multiply: MultiplySlots,
    pub invert: InvertSlots,
    pub displacement: DisplacementSlots,
    pub texture_emission: TextureEmissionSlots,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeTypes {
    pub standard_surface: NodeTypeId,
    pub image_texture: NodeTypeId,
    pub multiply: NodeTypeId,
    pub color_correction: NodeTypeId,
    pub invert: NodeTypeId,
    pub displacement: NodeTypeId,
    pub texture_emission: NodeTypeId,
}

/// Inputs on the standard surface material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSlots {
    pub use_color: SlotId,
    pub diffuse: SlotId,
    pub specular: SlotId,
    pub roughness: SlotId,
    pub bump: SlotId,
    pub normal: SlotId,
    /// Not linked by the default assembly steps since translucency textures are ignored.
    /// Hosts can still provide it for custom steps.
    pub transmission: SlotId,
    pub opacity: SlotId,
    pub emission: SlotId,
    pub displacement: SlotId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageTextureSlots {
    pub file: SlotId,
    pub gamma: SlotId,
    pub invert: SlotId,
    /// `0` for color and `1` for float data.
    pub mode: SlotId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorCorrectionSlots {
    pub texture: SlotId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplySlots {
    pub texture1: SlotId,
    pub texture2: SlotId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvertSlots {
    pub texture: SlotId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplacementSlots {
    pub amount: SlotId,
    pub level_of_detail: SlotId,
    pub texture: SlotId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureEmissionSlots {
    pub texture: SlotId,
}

impl Default for NodeCatalog {
    fn default() -> Self {
        Self {
            version: "octane-c4d".to_string(),
            nodes: Default::default(),
            material: Default::default(),
            image_texture: Default::default(),
            color_correction: Default::default(),
            multiply: Default::default(),
            invert: Default::default(),
            displacement: Default::default(),
            texture_emission: Default::default(),
        }
    }
}

impl Default for NodeTypes {
    fn default() -> Self {
        Self {
            standard_surface: NodeTypeId(1058763),
            image_texture: NodeTypeId(1029508),
            multiply: NodeTypeId(1029516),
            color_correction: NodeTypeId(1029512),
            invert: NodeTypeId(1029514),
            displacement: NodeTypeId(1031901),
            texture_emission: NodeTypeId(1029642),
        }
    }
}

impl Default for MaterialSlots {
    fn default() -> Self {
        Self {
            use_color: SlotId(2002),
            diffuse: SlotId(2003),
            specular: SlotId(2006),
            roughness: SlotId(2007),
            bump: SlotId(2008),
            normal: SlotId(2009),
            transmission: SlotId(2010),
            opacity: SlotId(2011),
            emission: SlotId(2012),
            displacement: SlotId(2013),
        }
    }
}

impl Default for ImageTextureSlots {
    fn default() -> Self {
        Self {
            file: SlotId(1000),
            gamma: SlotId(1005),
            invert: SlotId(1006),
            mode: SlotId(1012),
        }
    }
}

impl Default for ColorCorrectionSlots {
    fn default() -> Self {
        Self {
            texture: SlotId(1000),
        }
    }
}

impl Default for MultiplySlots {
    fn default() -> Self {
        Self {
            texture1: SlotId(1000),
            texture2: SlotId(1001),
        }
    }
}

impl Default for InvertSlots {
    fn default() -> Self {
        Self {
            texture: SlotId(1000),
        }
    }
}

impl Default for DisplacementSlots {
    fn default() -> Self {
        Self {
            amount: SlotId(1000),
            level_of_detail: SlotId(1001),
            texture: SlotId(1003),
        }
    }
}

impl Default for TextureEmissionSlots {
    fn default() -> Self {
        Self {
            texture: SlotId(1000),
        }
    }
}

impl NodeCatalog {
    /// Load a catalog from a JSON file.
    /// Missing fields use the values from [NodeCatalog::default].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadCatalogError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn from_json(json: &str) -> Result<Self, LoadCatalogError> {
        serde_json::from_str(json).map_err(Into::into)
    }

    pub fn to_json(&self) -> Result<String, SaveCatalogError> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), SaveCatalogError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// All node types that may be created while building a material.
    pub fn node_types(&self) -> [NodeTypeId; 6] {
        [
            self.nodes.image_texture,
            self.nodes.multiply,
            self.nodes.color_correction,
            self.nodes.invert,
            self.nodes.displacement,
            self.nodes.texture_emission,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use indoc::indoc;
    use pretty_assertions::assert_eq;

    #[test]
    fn catalog_json_overrides_fields() {
        let json = indoc! {r#"
            {
                "version": "custom",
                "nodes": { "image_texture": 7 },
                "material": { "diffuse": 1, "emission": 2 }
            }
        "#};
        let catalog = NodeCatalog::from_json(json).unwrap();

        assert_eq!("custom", catalog.version);
        assert_eq!(NodeTypeId(7), catalog.nodes.image_texture);
        assert_eq!(NodeTypeId(1029516), catalog.nodes.multiply);
        assert_eq!(SlotId(1), catalog.material.diffuse);
        assert_eq!(SlotId(2), catalog.material.emission);
        assert_eq!(SlotId(2007), catalog.material.roughness);
        assert_eq!(ImageTextureSlots::default(), catalog.image_texture);
    }

    #[test]
    fn catalog_json_transmission_slot() {
        assert_eq!(SlotId(2010), NodeCatalog::default().material.transmission);

        let catalog = NodeCatalog::from_json(r#"{ "material": { "transmission": 3000 } }"#).unwrap();
        assert_eq!(SlotId(3000), catalog.material.transmission);
        assert_eq!(SlotId(2011), catalog.material.opacity);
    }

    #[test]
    fn catalog_json_empty_object() {
        assert_eq!(NodeCatalog::default(), NodeCatalog::from_json("{}").unwrap());
    }

    #[test]
    fn catalog_json_invalid() {
        assert!(matches!(
            NodeCatalog::from_json(r#"{ "nodes": { "invert": "a" } }"#),
            Err(LoadCatalogError::Json(_))
        ));
    }

    #[test]
    fn catalog_json_ids_are_integers() {
        let json = NodeCatalog::default().to_json().unwrap();
        assert!(json.contains("\"standard_surface\": 1058763"));
        assert_eq!(NodeCatalog::default(), NodeCatalog::from_json(&json).unwrap());
    }
}
