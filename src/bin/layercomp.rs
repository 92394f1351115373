use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use layercomp::{
    ComposeThreading, CompositorConfig, CpuBackend, LayerNode, OutputNode, RasterImage, Resource,
    ResourceKey, SourceImages,
};

#[derive(Parser, Debug)]
#[command(name = "layercomp", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Composite all outputs of an artwork description and print the written paths as JSON.
    Compose(ComposeArgs),
    /// Parse an artwork description and print its layer tree.
    Inspect(InspectArgs),
}

#[derive(Parser, Debug)]
struct ComposeArgs {
    /// Artwork XML description.
    #[arg(long)]
    artwork: PathBuf,

    /// Compositor config JSON (defaults apply when omitted).
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    cover: Option<PathBuf>,

    #[arg(long)]
    screenshot: Option<PathBuf>,

    #[arg(long)]
    wheel: Option<PathBuf>,

    #[arg(long)]
    marquee: Option<PathBuf>,

    /// Base file name (without extension) for every written image.
    #[arg(long)]
    name: String,

    /// Render outputs concurrently.
    #[arg(long)]
    parallel: bool,

    /// Worker threads for --parallel.
    #[arg(long)]
    threads: Option<usize>,
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Artwork XML description.
    #[arg(long)]
    artwork: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Compose(args) => cmd_compose(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))
}

fn cmd_compose(args: ComposeArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => CompositorConfig::from_json_file(path)?,
        None => CompositorConfig::default(),
    };
    let artwork = layercomp::parse_artwork(&read_text(&args.artwork)?);

    let mut sources = SourceImages::<RasterImage>::default();
    for (key, path) in [
        (ResourceKey::Cover, &args.cover),
        (ResourceKey::Screenshot, &args.screenshot),
        (ResourceKey::Wheel, &args.wheel),
        (ResourceKey::Marquee, &args.marquee),
    ] {
        let Some(path) = path else { continue };
        match load_source(path) {
            Ok(image) => sources.set(key, image),
            Err(err) => tracing::warn!(%key, error = %format!("{err:#}"), "ignoring source image"),
        }
    }

    let backend = CpuBackend::from_config(&config);
    let threading = ComposeThreading {
        parallel: args.parallel,
        threads: args.threads,
    };
    let paths = layercomp::compose_all_with(
        &artwork, &sources, &backend, &config, &args.name, &threading,
    );

    println!("{}", serde_json::to_string_pretty(&paths)?);
    Ok(())
}

fn load_source(path: &Path) -> anyhow::Result<RasterImage> {
    let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
    Ok(RasterImage::decode(&bytes)?)
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let artwork = layercomp::parse_artwork_strict(&read_text(&args.artwork)?)?;
    if artwork.is_empty() {
        println!("(no outputs)");
    }
    for output in &artwork.outputs {
        print_output(output);
    }
    Ok(())
}

fn print_output(output: &OutputNode) {
    let known = if output.key().is_some() { "" } else { " (unknown type)" };
    println!(
        "output {}{known} {}",
        output.resource,
        size_label(output.size)
    );
    print_children(&output.children, 1);
}

fn print_children(children: &[LayerNode], depth: usize) {
    let indent = "  ".repeat(depth);
    for child in children {
        match child {
            LayerNode::Image(layer) => {
                let resource = match &layer.resource {
                    Resource::Named(key) => key.to_string(),
                    Resource::File(file) => format!("file:{file}"),
                };
                println!(
                    "{indent}layer {resource} {} align={:?}/{:?} offset=({}, {})",
                    size_label(layer.size),
                    layer.align,
                    layer.valign,
                    layer.x,
                    layer.y
                );
                print_children(&layer.children, depth + 1);
            }
            LayerNode::Shadow(s) => println!(
                "{indent}shadow distance={} softness={} opacity={}",
                s.distance, s.softness, s.opacity
            ),
            LayerNode::Mask(m) => println!("{indent}mask {} {}", m.file, size_label(m.size)),
            LayerNode::Frame(f) => println!("{indent}frame {} {}", f.file, size_label(f.size)),
        }
    }
}

fn size_label(size: layercomp::DeclaredSize) -> String {
    let axis = |v: Option<u32>| v.map_or_else(|| "auto".to_string(), |v| v.to_string());
    format!("{}x{}", axis(size.width), axis(size.height))
}
