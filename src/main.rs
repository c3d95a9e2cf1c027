//! Demo driver: justify a directory of images into rows and print them.
//!
//! The filesystem plays the part of the rendering host — intrinsic widths
//! come from image headers, applied styles are logged instead of rendered.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use galleria::{measure, GalleryConfig, GalleryController, GalleryHost, LoadCapability};

#[derive(Debug, Parser)]
#[command(name = "galleria", about = "Justified gallery layout over a directory of images")]
struct Args {
    /// Directory to scan for images.
    dir: PathBuf,
    /// Container width in pixels.
    #[arg(long, default_value_t = 1000.0)]
    width: f32,
    /// Fixed row height in pixels before justification.
    #[arg(long, default_value_t = 200.0)]
    row_height: f32,
    /// Spacing around each item in pixels.
    #[arg(long, default_value_t = 5.0)]
    spacing: f32,
}

fn is_image(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .as_deref(),
        Some("jpg" | "jpeg" | "png" | "webp" | "gif" | "bmp" | "tiff" | "tif")
    )
}

/// Host over a directory of image files.
struct DirectoryHost {
    root: PathBuf,
    row_height: f32,
    container: f32,
}

impl GalleryHost for DirectoryHost {
    type Handle = PathBuf;

    fn discover(&mut self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| is_image(path))
            .collect();
        paths.sort();
        paths
    }

    fn container_width(&mut self) -> f32 {
        self.container
    }

    fn intrinsic_width(&mut self, handle: &PathBuf) -> f32 {
        match measure::intrinsic_width_at(handle, self.row_height) {
            Ok(width) => width,
            Err(err) => {
                warn!(path = %handle.display(), %err, "unreadable image, skipping");
                0.0
            }
        }
    }

    fn apply_baseline(&mut self, config: &GalleryConfig) {
        debug!(
            row_height = config.row_height,
            spacing = config.spacing,
            "baseline applied"
        );
    }

    fn apply_item_style(&mut self, handle: &PathBuf, width_percent: f32) {
        info!(path = %handle.display(), width_percent, "item styled");
    }

    fn apply_image_style(&mut self, _handle: &PathBuf) {}

    fn mark_broken(&mut self, handle: &PathBuf) {
        warn!(path = %handle.display(), "image hidden as broken");
    }

    fn load_capability(&mut self) -> LoadCapability {
        // File headers resolve synchronously; one pass sees everything.
        LoadCapability::Batch
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("galleria=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();
    if !args.dir.is_dir() {
        bail!("not a directory: {:?}", args.dir);
    }

    let config = GalleryConfig {
        row_height: args.row_height,
        spacing: args.spacing,
        ..GalleryConfig::default()
    };
    config
        .validate()
        .with_context(|| "invalid gallery geometry")?;

    let host = DirectoryHost {
        root: args.dir,
        row_height: args.row_height,
        container: args.width,
    };
    let mut controller = GalleryController::new(config, host);
    controller.init();

    for (row, scaled) in controller
        .finished_rows()
        .iter()
        .zip(controller.scaled_rows())
    {
        let percents: Vec<String> = scaled
            .items
            .iter()
            .map(|item| format!("{:.2}%", item.width_percent))
            .collect();
        info!(
            images = row.item_count(),
            row_width = row.row_width,
            target_width = scaled.target_width,
            widths = percents.join(" + "),
            "justified row"
        );
    }
    if let Some(trailing) = controller.trailing_row() {
        info!(
            images = trailing.item_count(),
            "trailing row left unjustified"
        );
    }

    Ok(())
}
