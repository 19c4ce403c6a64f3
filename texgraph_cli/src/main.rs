use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{error, info, warn};
use rayon::prelude::*;
use texgraph_model::{
    ChannelPaths, MemoryHost, catalog::NodeCatalog, memory::MaterialId,
    nodes::create_standard_material, setup_textures, texture_channel,
};

#[cfg(feature = "tracing")]
use tracing_subscriber::prelude::*;

const IMAGE_PATTERNS: &[&str] = &["*.{png,jpg,jpeg,tga,tif,tiff,exr,bmp,hdr}"];

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Also print info logs like detected texture channels.
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the detected texture channel for each file name.
    Classify {
        /// The texture file names or paths.
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Create a material for each folder of textures.
    /// The graph for each material is printed if no output file is specified.
    Build {
        /// The root folder to search recursively for texture files.
        input_folder: String,
        /// The output JSON file for the generated documents, materials, and nodes.
        output_file: Option<String>,
        /// A node catalog JSON file with host specific node type and slot ids.
        /// Uses the default catalog if not specified.
        #[arg(long)]
        catalog: Option<String>,
    },
    /// Save the default node catalog as a starting point for customization.
    Catalog {
        /// The output JSON file.
        output_file: String,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose)?;

    let start = std::time::Instant::now();

    match cli.command {
        Commands::Classify { files } => classify(&files),
        Commands::Build {
            input_folder,
            output_file,
            catalog,
        } => {
            let catalog = match catalog {
                Some(path) => NodeCatalog::from_file(&path)
                    .with_context(|| format!("failed to load catalog {path:?}"))?,
                None => NodeCatalog::default(),
            };
            build(&input_folder, output_file.as_deref(), &catalog)?;
        }
        Commands::Catalog { output_file } => {
            NodeCatalog::default()
                .save(&output_file)
                .with_context(|| format!("failed to save catalog {output_file:?}"))?;
        }
    }

    info!("Finished in {:?}", start.elapsed());
    Ok(())
}

fn init_logging(verbose: bool) -> anyhow::Result<()> {
    // Ignore most logs to avoid flooding the console.
    #[cfg(not(feature = "tracing"))]
    {
        let level = if verbose {
            log::LevelFilter::Info
        } else {
            log::LevelFilter::Warn
        };
        simple_logger::SimpleLogger::new().with_level(level).init()?;
    }

    // Log records are forwarded to the subscriber by the default tracing-log feature.
    #[cfg(feature = "tracing")]
    {
        let level = if verbose {
            tracing_subscriber::filter::LevelFilter::INFO
        } else {
            tracing_subscriber::filter::LevelFilter::WARN
        };
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_span_events(tracing_subscriber::fmt::format::FmtSpan::CLOSE)
                    .with_filter(level),
            )
            .try_init()?;
    }

    Ok(())
}

fn classify(files: &[String]) {
    for file in files {
        let name = Path::new(file)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(file);
        match texture_channel(name) {
            Some(channel) => println!("{file}: {channel}"),
            None => println!("{file}: undetermined"),
        }
    }
}

fn build(input_folder: &str, output_file: Option<&str>, catalog: &NodeCatalog) -> anyhow::Result<()> {
    let folders = texture_folders(input_folder)?;
    if folders.is_empty() {
        warn!("No texture files found in {input_folder:?}");
    }

    let hosts: BTreeMap<_, _> = folders
        .par_iter()
        .filter_map(|(folder, files)| match build_material(folder, files, catalog) {
            Ok(host) => Some((folder.to_string_lossy().into_owned(), host)),
            Err(e) => {
                error!("Error building material for {folder:?}: {e:#}");
                None
            }
        })
        .collect();

    match output_file {
        Some(output_file) => {
            let json = serde_json::to_string_pretty(&hosts)?;
            std::fs::write(output_file, json)
                .with_context(|| format!("failed to write {output_file:?}"))?;
        }
        None => {
            for host in hosts.values() {
                for i in 0..host.materials.len() {
                    if let Some(text) = host.graph_text(MaterialId(i)) {
                        println!("{text}");
                    }
                }
            }
        }
    }

    Ok(())
}

/// Texture files grouped by their parent folder.
fn texture_folders(input_folder: &str) -> anyhow::Result<BTreeMap<PathBuf, Vec<String>>> {
    let mut folders = BTreeMap::new();
    for entry in globwalk::GlobWalkerBuilder::from_patterns(input_folder, IMAGE_PATTERNS)
        .case_insensitive(true)
        .build()
        .with_context(|| format!("failed to search {input_folder:?}"))?
    {
        let entry = entry?;
        let path = entry.path();
        let folder = path.parent().map(Path::to_path_buf).unwrap_or_default();
        folders
            .entry(folder)
            .or_insert_with(Vec::new)
            .push(path.to_string_lossy().into_owned());
    }

    // Walk order depends on the file system.
    for files in folders.values_mut() {
        files.sort();
    }
    Ok(folders)
}

fn build_material(folder: &Path, files: &[String], catalog: &NodeCatalog) -> anyhow::Result<MemoryHost> {
    let _span = tracing::info_span!("build_material", ?folder).entered();

    let textures = ChannelPaths::from_files(files);
    for (channel, path) in textures.iter() {
        info!("{path:?}: {channel}");
    }

    let name = folder
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut host = MemoryHost::new(catalog);
    let material = create_standard_material(
        &mut host,
        catalog,
        None,
        (!name.is_empty()).then_some(name.as_str()),
    )?;
    setup_textures(&mut host, catalog, &material, &textures)?;
    Ok(host)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    /// Create empty files under a fresh folder in the temp directory.
    fn texture_tree(name: &str, files: &[&str]) -> PathBuf {
        let root = std::env::temp_dir().join(format!("texgraph_cli_{name}_{}", std::process::id()));
        if root.exists() {
            std::fs::remove_dir_all(&root).unwrap();
        }
        for file in files {
            let path = root.join(file);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(path, []).unwrap();
        }
        std::fs::canonicalize(root).unwrap()
    }

    fn path_string(path: PathBuf) -> String {
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn texture_folders_grouped_by_parent() {
        let root = texture_tree(
            "grouped",
            &[
                "brick/brick_nrm.png",
                "brick/brick_albedo.PNG",
                "brick/readme.txt",
                "stone/stone_color.tga",
                "stone/rough/stone_Rough.JPG",
                "stone/rough/stone_height.Exr",
            ],
        );

        let folders = texture_folders(&root.to_string_lossy()).unwrap();

        assert_eq!(
            BTreeMap::from([
                (
                    root.join("brick"),
                    vec![
                        path_string(root.join("brick/brick_albedo.PNG")),
                        path_string(root.join("brick/brick_nrm.png")),
                    ]
                ),
                (
                    root.join("stone"),
                    vec![path_string(root.join("stone/stone_color.tga"))]
                ),
                (
                    root.join("stone/rough"),
                    vec![
                        path_string(root.join("stone/rough/stone_Rough.JPG")),
                        path_string(root.join("stone/rough/stone_height.Exr")),
                    ]
                ),
            ]),
            folders
        );

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn texture_folders_empty() {
        let root = texture_tree("empty", &["notes/readme.txt"]);
        assert!(texture_folders(&root.to_string_lossy()).unwrap().is_empty());
        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn build_material_first_sorted_file_wins() {
        let root = texture_tree("sorted", &["wall/wall_albedo_2.png", "wall/wall_albedo.png"]);
        let folders = texture_folders(&root.to_string_lossy()).unwrap();
        let folder = root.join("wall");

        let catalog = NodeCatalog::default();
        let host = build_material(&folder, &folders[&folder], &catalog).unwrap();

        assert_eq!("wall", host.materials[0].name);
        let albedo = host.material_input(MaterialId(0), catalog.material.diffuse).unwrap();
        assert_eq!(
            Some(&texgraph_model::ParamValue::String(path_string(
                folder.join("wall_albedo.png")
            ))),
            host.node(albedo)
                .unwrap()
                .parameters
                .get(&catalog.image_texture.file)
        );

        std::fs::remove_dir_all(root).unwrap();
    }

    #[test]
    fn build_material_empty_folder_name() {
        let catalog = NodeCatalog::default();
        let host = build_material(Path::new("/"), &[], &catalog).unwrap();
        assert_eq!("Standard Surface", host.materials[0].name);
        assert!(host.nodes.is_empty());
    }

    #[test]
    fn init_logging_forwards_log_records() {
        init_logging(false).unwrap();
        assert!(log::log_enabled!(log::Level::Warn));
        assert!(!log::log_enabled!(log::Level::Debug));
    }
}
