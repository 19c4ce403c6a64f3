//! Assembly of a material's node graph from its detected textures.
//!
//! Each [AssemblyStep] fills a single material input.
//! Steps run in a fixed order since some steps combine multiple channels
//! like multiplying albedo by ambient occlusion.
use log::debug;

use crate::{
    catalog::{MaterialSlots, NodeCatalog, SlotId},
    channel::{Channel, ChannelPaths},
    error::SetupTexturesError,
    host::{GraphHost, ParamValue},
    nodes::{DEFAULT_COLOR_GAMMA, ImageTextureOptions, LINEAR_GAMMA, MaterialNodes},
};

/// An input on the standard surface material that accepts a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialInput {
    Diffuse,
    Roughness,
    Specular,
    Normal,
    Bump,
    Displacement,
    Opacity,
    Emission,
}

impl MaterialInput {
    pub fn slot(self, slots: &MaterialSlots) -> SlotId {
        match self {
            MaterialInput::Diffuse => slots.diffuse,
            MaterialInput::Roughness => slots.roughness,
            MaterialInput::Specular => slots.specular,
            MaterialInput::Normal => slots.normal,
            MaterialInput::Bump => slots.bump,
            MaterialInput::Displacement => slots.displacement,
            MaterialInput::Opacity => slots.opacity,
            MaterialInput::Emission => slots.emission,
        }
    }
}

/// The image texture settings and node chain for a single channel.
#[derive(Debug, PartialEq)]
pub struct TextureRule {
    pub channel: Channel,
    pub name: &'static str,
    pub is_float: bool,
    pub gamma: f32,
    pub shape: NodeShape,
}

/// The nodes created between the image texture and the material input.
#[derive(Debug, PartialEq)]
pub enum NodeShape {
    /// Link the image texture directly.
    Image,
    /// Link the image texture directly and disable the material's color flag.
    ImageWithoutColor,
    /// Multiply the color corrected image by the given texture if present.
    /// The image is linked directly if the texture is missing.
    MultiplyBy(&'static TextureRule),
    /// Link the image through a color correction node.
    ColorCorrection,
    /// Link the image through a color correction node and invert node.
    InvertedColorCorrection,
    /// Use the image as the texture for a displacement node.
    Displacement { amount: f32, level_of_detail: i32 },
    /// Use the image as the texture for an emission node.
    TextureEmission,
}

/// A material input and the channels that can fill it.
#[derive(Debug, PartialEq)]
pub struct AssemblyStep {
    pub input: MaterialInput,
    /// Alternative channels in priority order.
    /// Only the first channel with a texture is used.
    pub textures: &'static [TextureRule],
}

impl TextureRule {
    pub fn image_options(&self) -> ImageTextureOptions<'static> {
        ImageTextureOptions {
            name: Some(self.name),
            is_float: self.is_float,
            gamma: self.gamma,
            invert: false,
        }
    }
}

impl AssemblyStep {
    /// All channels that may be read by this step.
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        self.textures.iter().flat_map(|t| {
            let extra = match t.shape {
                NodeShape::MultiplyBy(other) => Some(other.channel),
                _ => None,
            };
            std::iter::once(t.channel).chain(extra)
        })
    }
}

pub const AMBIENT_OCCLUSION: TextureRule = TextureRule {
    channel: Channel::Ao,
    name: "AO",
    is_float: true,
    gamma: LINEAR_GAMMA,
    shape: NodeShape::Image,
};

/// The default assembly for the standard surface material.
pub const ASSEMBLY_STEPS: &[AssemblyStep] = &[
    AssemblyStep {
        input: MaterialInput::Diffuse,
        textures: &[TextureRule {
            channel: Channel::BaseColor,
            name: "Albedo",
            is_float: false,
            gamma: DEFAULT_COLOR_GAMMA,
            shape: NodeShape::MultiplyBy(&AMBIENT_OCCLUSION),
        }],
    },
    AssemblyStep {
        input: MaterialInput::Roughness,
        textures: &[
            TextureRule {
                channel: Channel::ReflRoughness,
                name: "Roughness",
                is_float: true,
                gamma: LINEAR_GAMMA,
                shape: NodeShape::ColorCorrection,
            },
            // Glossiness is the inverse of roughness.
            TextureRule {
                channel: Channel::Glossiness,
                name: "Glossiness",
                is_float: true,
                gamma: LINEAR_GAMMA,
                shape: NodeShape::InvertedColorCorrection,
            },
        ],
    },
    AssemblyStep {
        input: MaterialInput::Specular,
        textures: &[
            // TODO: Check if metalness should use a dedicated metallic input instead of specular.
            TextureRule {
                channel: Channel::Metalness,
                name: "Metalness",
                is_float: true,
                gamma: LINEAR_GAMMA,
                shape: NodeShape::ImageWithoutColor,
            },
            TextureRule {
                channel: Channel::ReflWeight,
                name: "Specular",
                is_float: false,
                gamma: DEFAULT_COLOR_GAMMA,
                shape: NodeShape::Image,
            },
        ],
    },
    AssemblyStep {
        input: MaterialInput::Normal,
        textures: &[TextureRule {
            channel: Channel::Normal,
            name: "Normal",
            is_float: false,
            gamma: LINEAR_GAMMA,
            shape: NodeShape::Image,
        }],
    },
    AssemblyStep {
        input: MaterialInput::Bump,
        textures: &[TextureRule {
            channel: Channel::Bump,
            name: "Bump",
            is_float: true,
            gamma: LINEAR_GAMMA,
            shape: NodeShape::Image,
        }],
    },
    AssemblyStep {
        input: MaterialInput::Displacement,
        textures: &[TextureRule {
            channel: Channel::Displacement,
            name: "Displacement",
            is_float: true,
            gamma: LINEAR_GAMMA,
            // A level of detail of 11 is 2048x2048.
            shape: NodeShape::Displacement {
                amount: 10.0,
                level_of_detail: 11,
            },
        }],
    },
    AssemblyStep {
        input: MaterialInput::Opacity,
        textures: &[TextureRule {
            channel: Channel::OpacityColor,
            name: "Opacity",
            is_float: true,
            gamma: LINEAR_GAMMA,
            shape: NodeShape::Image,
        }],
    },
    AssemblyStep {
        input: MaterialInput::Emission,
        textures: &[TextureRule {
            channel: Channel::EmissionColor,
            name: "Emission",
            is_float: false,
            gamma: DEFAULT_COLOR_GAMMA,
            shape: NodeShape::TextureEmission,
        }],
    },
];

/// Builds node graphs using a [NodeCatalog] and a list of [AssemblyStep].
#[derive(Debug, Clone, Copy)]
pub struct MaterialGraphBuilder<'a> {
    catalog: &'a NodeCatalog,
    steps: &'a [AssemblyStep],
}

impl<'a> MaterialGraphBuilder<'a> {
    /// Use the default [ASSEMBLY_STEPS].
    pub fn new(catalog: &'a NodeCatalog) -> Self {
        Self::with_steps(catalog, ASSEMBLY_STEPS)
    }

    pub fn with_steps(catalog: &'a NodeCatalog, steps: &'a [AssemblyStep]) -> Self {
        Self { catalog, steps }
    }

    /// Create and link the nodes for `textures` to the inputs of `material`.
    ///
    /// The first failed host operation stops the build.
    /// Nodes from earlier steps are left in the material.
    #[tracing::instrument(skip_all)]
    pub fn build<H: GraphHost>(
        &self,
        host: &mut H,
        material: &H::Material,
        textures: &ChannelPaths,
    ) -> Result<(), SetupTexturesError> {
        for (channel, path) in textures.iter() {
            if !self.steps.iter().any(|s| s.channels().any(|c| c == channel)) {
                debug!("Ignoring {channel} texture {path:?} with no material input");
            }
        }

        for step in self.steps {
            // Alternatives like roughness and glossiness are mutually exclusive.
            let Some((rule, path)) = step
                .textures
                .iter()
                .find_map(|t| textures.get(t.channel).map(|p| (t, p)))
            else {
                continue;
            };

            self.assemble(host, material, step.input, rule, path, textures)
                .map_err(|e| SetupTexturesError::new(rule.channel, e))?;
        }

        Ok(())
    }

    fn assemble<H: GraphHost>(
        &self,
        host: &mut H,
        material: &H::Material,
        input: MaterialInput,
        rule: &TextureRule,
        path: &str,
        textures: &ChannelPaths,
    ) -> Result<(), H::Error> {
        let catalog = self.catalog;
        let mut nodes = MaterialNodes::new(host, catalog, material);

        let image = nodes.add_image_texture(path, &rule.image_options())?;
        let output = match &rule.shape {
            NodeShape::Image | NodeShape::ImageWithoutColor => image,
            NodeShape::MultiplyBy(other) => match textures.get(other.channel) {
                Some(other_path) => {
                    let other_image = nodes.add_image_texture(other_path, &other.image_options())?;
                    let corrected = nodes.add_color_correction(Some(&image))?;
                    nodes.add_multiply(Some(&corrected), Some(&other_image))?
                }
                None => image,
            },
            NodeShape::ColorCorrection => nodes.add_color_correction(Some(&image))?,
            NodeShape::InvertedColorCorrection => {
                let corrected = nodes.add_color_correction(Some(&image))?;
                nodes.add_invert(Some(&corrected))?
            }
            NodeShape::Displacement {
                amount,
                level_of_detail,
            } => {
                let slots = &catalog.displacement;
                let displacement = nodes.add_displacement()?;
                nodes.host.set_parameter(
                    &displacement,
                    slots.texture,
                    ParamValue::Node(image),
                )?;
                nodes.host.set_parameter(
                    &displacement,
                    slots.level_of_detail,
                    ParamValue::Int(*level_of_detail),
                )?;
                nodes.host.set_parameter(
                    &displacement,
                    slots.amount,
                    ParamValue::float(*amount),
                )?;
                displacement
            }
            NodeShape::TextureEmission => nodes.add_texture_emission(Some(&image))?,
        };

        host.set_material_input(material, input.slot(&catalog.material), &output)?;
        debug!("Linked {} texture {path:?} to {input:?}", rule.channel);

        if matches!(rule.shape, NodeShape::ImageWithoutColor) {
            host.set_material_parameter(material, catalog.material.use_color, ParamValue::Int(0))?;
        }

        Ok(())
    }
}

/// Create and link the nodes for `textures` using the default [ASSEMBLY_STEPS].
///
/// # Examples
/// ```rust
/// use texgraph_model::{
///     catalog::NodeCatalog, channel::ChannelPaths, memory::MemoryHost,
///     nodes::create_standard_material, setup_textures,
/// };
///
/// let catalog = NodeCatalog::default();
/// let mut host = MemoryHost::new(&catalog);
/// let material = create_standard_material(&mut host, &catalog, None, Some("Brick"))?;
///
/// let textures = ChannelPaths::from_files(["brick_albedo.png", "brick_ao.png", "brick_nrm.png"]);
/// setup_textures(&mut host, &catalog, &material, &textures)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn setup_textures<H: GraphHost>(
    host: &mut H,
    catalog: &NodeCatalog,
    material: &H::Material,
    textures: &ChannelPaths,
) -> Result<(), SetupTexturesError> {
    MaterialGraphBuilder::new(catalog).build(host, material, textures)
}
