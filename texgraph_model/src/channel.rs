//! Texture channel detection from file names.
//!
//! Texture sets exported from tools like Substance Painter or downloaded from
//! texture libraries encode the usage of each image in its file name
//! like `wall_basecolor_2k.png` or `brick-nrm.tga`.
//! There is no metadata to check, so the channel is inferred from the name alone.
use std::{collections::BTreeMap, path::Path};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The semantic usage of a texture in a PBR material.
///
/// The declaration order matches [CHANNEL_KEYWORDS]
/// and is also the iteration order of [ChannelPaths].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    BaseColor,
    Normal,
    Bump,
    Ao,
    Metalness,
    ReflRoughness,
    ReflWeight,
    Glossiness,
    OpacityColor,
    Translucency,
    Displacement,
    EmissionColor,
}

/// Recognized file name components for each [Channel].
///
/// Channels are checked in order, so a component listed for more than one channel
/// always resolves to the earlier channel.
pub const CHANNEL_KEYWORDS: &[(Channel, &[&str])] = &[
    (
        Channel::BaseColor,
        &[
            "basecolor",
            "base",
            "color",
            "albedo",
            "diffuse",
            "diff",
            "col",
            "bc",
            "alb",
            "rgb",
            "d",
            "dif",
        ],
    ),
    (
        Channel::Normal,
        &[
            "normalgl",
            "normalopengl",
            "normal",
            "norm",
            "nrm",
            "nml",
            "nrml",
            "nor",
            "n",
        ],
    ),
    (Channel::Bump, &["bump", "b"]),
    (
        Channel::Ao,
        &[
            "ao",
            "ambient",
            "occlusion",
            "occ",
            "amb",
            "ambientocclusion",
        ],
    ),
    (
        Channel::Metalness,
        &["metallic", "metalness", "metal", "mtl", "met", "m"],
    ),
    (Channel::ReflRoughness, &["roughness", "rough", "rgh", "r"]),
    (
        Channel::ReflWeight,
        &["specular", "spec", "s", "refl", "reflection"],
    ),
    (Channel::Glossiness, &["glossiness", "gloss", "g"]),
    (
        Channel::OpacityColor,
        &["opacity", "opac", "alpha", "o", "a", "cutout"],
    ),
    (
        Channel::Translucency,
        &[
            "translucency",
            "transmission",
            "trans",
            "sss",
            "subsurface",
            "scatter",
            "scattering",
        ],
    ),
    (
        Channel::Displacement,
        &["displacement", "disp", "dsp", "height", "h"],
    ),
    (
        Channel::EmissionColor,
        &[
            "emissive",
            "emission",
            "emit",
            "illu",
            "illumination",
            "selfillum",
            "e",
        ],
    ),
];

// Applied in order, so "--" and "__" only matter for what earlier replacements leave behind.
const SEPARATORS: [&str; 6] = [" ", ".", "-", "__", "--", "#"];

/// Detect the channel of a texture from its file name
/// or [None] if no component of the name is a known keyword.
///
/// Components are checked starting from the end of the name,
/// so `albedo_roughness.png` is a roughness map.
///
/// # Examples
/// ```rust
/// use texgraph_model::channel::{texture_channel, Channel};
///
/// assert_eq!(Some(Channel::BaseColor), texture_channel("wall_basecolor_2k.png"));
/// assert_eq!(Some(Channel::Normal), texture_channel("brick-nrm.tga"));
/// assert_eq!(None, texture_channel("noise99.png"));
/// ```
pub fn texture_channel(file_name: &str) -> Option<Channel> {
    split_into_components(file_name)
        .iter()
        .rev()
        .find_map(|c| keyword_channel(c))
}

/// The channel whose keywords contain `component` exactly.
pub fn keyword_channel(component: &str) -> Option<Channel> {
    CHANNEL_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.contains(&component))
        .map(|(channel, _)| *channel)
}

/// Split a file name into lowercase components without digits
/// like `"Wall_BaseColor_2K.png"` -> `["wall", "basecolor", "k"]`.
///
/// Digits are any numeric character like `2`, `²` or `٣`.
/// Other numeric characters like `½` are also removed.
pub fn split_into_components(file_name: &str) -> Vec<String> {
    let mut name: String = strip_extension(file_name)
        .chars()
        .filter(|c| !c.is_numeric())
        .collect();
    for separator in SEPARATORS {
        name = name.replace(separator, "_");
    }

    name.split('_')
        .filter(|c| !c.trim().is_empty())
        .map(|c| c.to_lowercase())
        .collect()
}

fn strip_extension(file_name: &str) -> &str {
    let base_start = file_name.rfind(['/', '\\']).map(|i| i + 1).unwrap_or(0);
    let base_name = &file_name[base_start..];

    // A leading dot like ".png" is part of the name and not an extension.
    let leading_dots = base_name.len() - base_name.trim_start_matches('.').len();
    match base_name[leading_dots..].rfind('.') {
        Some(i) => &file_name[..base_start + leading_dots + i],
        None => file_name,
    }
}

/// The texture file path for each detected [Channel] of a material.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChannelPaths {
    paths: BTreeMap<Channel, String>,
}

impl ChannelPaths {
    pub fn new() -> Self {
        Self::default()
    }

    /// Detect the channel for the file name of each path using [texture_channel].
    ///
    /// Files with no detected channel are skipped.
    /// If multiple files resolve to the same channel, the first file is used.
    pub fn from_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut paths = Self::new();
        for file in files {
            let file = file.as_ref();
            let name = Path::new(file)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or(file);
            match texture_channel(name) {
                Some(channel) => {
                    if let Some(previous) = paths.get(channel) {
                        warn!("Ignoring {file:?} for {channel} since {previous:?} is already assigned");
                    } else {
                        paths.insert(channel, file);
                    }
                }
                None => debug!("Unable to determine texture channel for {file:?}"),
            }
        }
        paths
    }

    /// Assign `path` to `channel` and return the previous path if present.
    pub fn insert(&mut self, channel: Channel, path: impl Into<String>) -> Option<String> {
        self.paths.insert(channel, path.into())
    }

    pub fn get(&self, channel: Channel) -> Option<&str> {
        self.paths.get(&channel).map(String::as_str)
    }

    pub fn contains(&self, channel: Channel) -> bool {
        self.paths.contains_key(&channel)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over the assigned channels in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &str)> {
        self.paths.iter().map(|(c, p)| (*c, p.as_str()))
    }
}

impl<S: Into<String>> FromIterator<(Channel, S)> for ChannelPaths {
    fn from_iter<T: IntoIterator<Item = (Channel, S)>>(iter: T) -> Self {
        Self {
            paths: iter.into_iter().map(|(c, p)| (c, p.into())).collect(),
        }
    }
}
