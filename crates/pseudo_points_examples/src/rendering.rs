//! PNG rendering of batch results and tracing setup for the example binaries.
use std::path::Path;

use glam::DVec2;
use image::{Rgb, RgbImage};
use pseudo_points::prelude::*;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install a fmt subscriber at `info`, or `debug` when `VERBOSE` is set.
pub fn init_tracing() {
    let level = if std::env::var_os("VERBOSE").is_some() {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    // A subscriber installed by the caller wins.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// Colors and size of a rendered batch.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Output width in pixels; height follows the aspect ratio of `bounds`.
    pub width_px: u32,
    /// World-space window to render.
    pub bounds: BoundingBox,
    pub background: [u8; 3],
    /// Tint for pixels admitted by the region constraints.
    pub region: [u8; 3],
    pub reference: [u8; 3],
    pub seed: [u8; 3],
    pub accepted: [u8; 3],
    pub point_radius_px: i32,
}

impl RenderConfig {
    pub fn new(bounds: BoundingBox, width_px: u32) -> Self {
        Self {
            width_px,
            bounds,
            background: [24, 26, 32],
            region: [40, 58, 48],
            reference: [220, 90, 80],
            seed: [150, 150, 160],
            accepted: [240, 220, 120],
            point_radius_px: 2,
        }
    }

    fn height_px(&self) -> u32 {
        let size = self.bounds.size();
        ((self.width_px as f64) * size.y / size.x).round().max(1.0) as u32
    }

    fn to_pixel(&self, p: DVec2) -> (i64, i64) {
        let size = self.bounds.size();
        let rel = (p - self.bounds.min) / size;
        let x = (rel.x * self.width_px as f64).floor() as i64;
        // Image rows grow downwards.
        let y = ((1.0 - rel.y) * self.height_px() as f64).floor() as i64;
        (x, y)
    }

    fn to_world(&self, x: u32, y: u32) -> DVec2 {
        let size = self.bounds.size();
        let rel = DVec2::new(
            (x as f64 + 0.5) / self.width_px as f64,
            1.0 - (y as f64 + 0.5) / self.height_px() as f64,
        );
        self.bounds.min + rel * size
    }
}

/// Render regions, reference points, seeds and accepted points to a PNG file.
pub fn render_batch_to_png(
    path: impl AsRef<Path>,
    config: &RenderConfig,
    regions: &RegionConstraints,
    references: &[DVec2],
    result: &BatchResult,
) -> anyhow::Result<()> {
    let (w, h) = (config.width_px, config.height_px());
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    if !regions.is_empty() {
        for y in 0..h {
            for x in 0..w {
                if regions.admits(config.to_world(x, y)) {
                    img.put_pixel(x, y, Rgb(config.region));
                }
            }
        }
    }

    for r in references {
        stamp(&mut img, config, *r, config.reference);
    }
    for record in &result.records {
        stamp(&mut img, config, record.seed, config.seed);
    }
    for p in result.registry.iter() {
        stamp(&mut img, config, *p, config.accepted);
    }

    img.save(path.as_ref())?;
    Ok(())
}

fn stamp(img: &mut RgbImage, config: &RenderConfig, p: DVec2, color: [u8; 3]) {
    let (cx, cy) = config.to_pixel(p);
    let r = config.point_radius_px as i64;
    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r * r {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
                img.put_pixel(x as u32, y as u32, Rgb(color));
            }
        }
    }
}
