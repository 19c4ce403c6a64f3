//! # texgraph_model
//! texgraph_model creates PBR material node graphs from loose texture files.
//!
//! The usage of each texture like albedo or roughness is detected from its file name
//! with [texture_channel]. The resulting [ChannelPaths] are then assembled into image texture,
//! color correction, and other nodes linked to the inputs of a material with [setup_textures].
//!
//! Materials and nodes are owned by the application implementing [GraphHost].
//! [MemoryHost] provides an implementation for previewing or exporting the generated graphs.
//!
//! # Examples
//! ```rust
//! use texgraph_model::{
//!     catalog::NodeCatalog, memory::MemoryHost, nodes::create_standard_material, setup_textures,
//!     ChannelPaths,
//! };
//!
//! let files = ["wall_basecolor_2k.png", "wall_roughness_2k.png", "wall_normal_2k.png"];
//! let textures = ChannelPaths::from_files(files);
//!
//! let catalog = NodeCatalog::default();
//! let mut host = MemoryHost::new(&catalog);
//! let material = create_standard_material(&mut host, &catalog, None, Some("Wall"))?;
//! setup_textures(&mut host, &catalog, &material, &textures)?;
//!
//! println!("{}", host.graph_text(material).unwrap_or_default());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod builder;
pub mod catalog;
pub mod channel;
pub mod error;
pub mod host;
pub mod memory;
pub mod nodes;

pub use builder::{MaterialGraphBuilder, setup_textures};
pub use channel::{Channel, ChannelPaths, texture_channel};
pub use host::{GraphHost, ParamValue};
pub use memory::MemoryHost;
