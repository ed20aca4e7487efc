use anyhow::{bail, Context};
use clap::Parser;
use icon_compositor::{parse_descriptions, Icon, LayerContext, Settings, TileGrid};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// icon-compositor: Render layered icon descriptions to PNG files
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Path to a JSON file holding one icon description or an array of them
    #[clap(short, long)]
    pub input: PathBuf,

    /// Directory the PNG files are written to
    #[clap(short, long)]
    pub output_dir: PathBuf,

    /// Path to a JSON settings file
    #[clap(short, long)]
    pub settings: Option<PathBuf>,

    /// Override the tile grid of every icon, e.g. 3x1
    #[clap(long)]
    pub tiles: Option<String>,

    /// Override the PNG compression level (0-9)
    #[clap(short, long)]
    pub compression_level: Option<u8>,

    /// Log verbosity, repeat for more detail
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let settings = match &args.settings {
        Some(path) => Settings::from_json_file(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?,
        None => Settings::default(),
    };
    let tiles = match &args.tiles {
        Some(tiles) => Some(
            TileGrid::from_str(tiles)
                .map_err(anyhow::Error::msg)
                .with_context(|| format!("Invalid tile grid: {tiles}"))?,
        ),
        None => None,
    };
    if let Some(grid) = tiles {
        if grid.cols == 0 || grid.rows == 0 {
            bail!("Invalid tile grid: {grid}");
        }
    }
    if let Some(level) = args.compression_level {
        if level > 9 {
            bail!("Compression level must be between 0 and 9, got {level}");
        }
    }

    let input = std::fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input.display()))?;
    let descriptions = parse_descriptions(&input)
        .with_context(|| format!("Failed to parse icon descriptions: {}", args.input.display()))?;

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "Failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;

    // One image cache shared by every icon in the document
    let context = LayerContext::from_settings(&settings);
    let mut written = 0usize;
    for description in &descriptions {
        let mut icon = Icon::from_description(description, &settings, context.clone());
        if let Some(tiles) = tiles {
            icon.set_tiles(tiles);
        }
        if let Some(level) = args.compression_level {
            icon.set_compression_level(level);
        }

        let images = icon.render().await;
        if images.is_empty() {
            log::error!("Icon '{}' produced no output", description.name);
            continue;
        }
        for image in images {
            let path = output_path(&args.output_dir, &image.id);
            std::fs::write(&path, &image.png)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
            written += 1;
        }
    }

    if written == 0 && !descriptions.is_empty() {
        bail!("No icons were rendered");
    }
    Ok(())
}

fn output_path(dir: &Path, id: &str) -> PathBuf {
    dir.join(format!("{id}.png"))
}
