use crate::config::AssetSource;
use crate::data::types::{CoreAssets, LuminancePage};
use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use strata::{ColumnIndex, ColumnMetadata};

/// Columns per synthetic page; the column width is its reciprocal.
const SYNTHETIC_COLUMNS_PER_PAGE: usize = 16;
/// Pixel size of one synthetic column.
const SYNTHETIC_COLUMN_PX: u32 = 32;
const SYNTHETIC_PAGE_HEIGHT_PX: u32 = 512;

/// Load (or generate) the column layout and its pages.
pub fn load(source: &AssetSource) -> Result<CoreAssets> {
    match source {
        AssetSource::Files { metadata, images } => {
            let metadata = load_metadata(metadata)?;
            let pages = load_pages(images)?;
            Ok(CoreAssets { metadata, pages })
        }
        AssetSource::Synthetic { columns } => Ok(synthetic(*columns)),
    }
}

/// Read the JSON column layout.
pub fn load_metadata(path: &Path) -> Result<ColumnMetadata> {
    let file = File::open(path)
        .with_context(|| format!("opening metadata {}", path.display()))?;
    let reader = BufReader::new(file);
    let metadata: ColumnMetadata = serde_json::from_reader(reader)
        .with_context(|| format!("parsing metadata {}", path.display()))?;

    log::info!(
        "Metadata {}: {} columns, column width {}",
        path.display(),
        metadata.heights.len(),
        metadata.width
    );
    Ok(metadata)
}

/// Decode every page image to luminance, in parallel. Pages must share one size.
pub fn load_pages(paths: &[PathBuf]) -> Result<Vec<LuminancePage>> {
    if paths.is_empty() {
        bail!("no texture pages given");
    }

    let pages = paths
        .par_iter()
        .map(|p| decode_page(p))
        .collect::<Result<Vec<_>>>()?;

    let (w, h) = (pages[0].width, pages[0].height);
    for (page, path) in pages.iter().zip(paths) {
        if (page.width, page.height) != (w, h) {
            bail!(
                "page {} is {}x{}, expected {}x{} like the first page",
                path.display(),
                page.width,
                page.height,
                w,
                h
            );
        }
    }

    log::info!("Loaded {} pages of {}x{} px", pages.len(), w, h);
    Ok(pages)
}

fn decode_page(path: &Path) -> Result<LuminancePage> {
    let img = image::open(path).with_context(|| format!("decoding page {}", path.display()))?;
    let luma = img.to_luma8();
    log::debug!("Page {}: {}x{}", path.display(), luma.width(), luma.height());

    Ok(LuminancePage {
        width: luma.width(),
        height: luma.height(),
        pixels: luma.into_raw(),
    })
}

/// Make sure every column has a page to live on.
pub fn check_pages(index: &ColumnIndex, pages: &[LuminancePage]) -> Result<()> {
    let needed = index.page_count() as usize;
    if pages.len() < needed {
        bail!(
            "{} columns of width {} span {} pages, but only {} were given",
            index.column_count(),
            index.column_width(),
            needed,
            pages.len()
        );
    }
    if pages.len() > needed {
        log::warn!("{} pages given, only {} are used", pages.len(), needed);
    }
    Ok(())
}

/// True when the seam epsilon, converted to page `v` units, stays below one texel.
pub fn seam_epsilon_fits(index: &ColumnIndex, seam_epsilon: f64, page_height_px: u32) -> bool {
    let eps_v = seam_epsilon * index.total_height();
    eps_v < 1.0 / page_height_px.max(1) as f64
}

/// Cheap deterministic hash to [0, 1).
fn hash01(i: u32) -> f32 {
    let mut x = i.wrapping_mul(0x9E37_79B9) ^ 0x85EB_CA6B;
    x ^= x >> 16;
    x = x.wrapping_mul(0x7FEB_352D);
    x ^= x >> 15;
    (x >> 8) as f32 / (1u32 << 24) as f32
}

/// A striped demo strip: columns of varying height with layered bands, so
/// seams and column order are easy to spot on screen.
pub fn synthetic(columns: usize) -> CoreAssets {
    let heights: Vec<f64> = (0..columns)
        .map(|c| 0.6 + 0.4 * hash01(c as u32) as f64)
        .collect();
    let metadata = ColumnMetadata {
        width: 1.0 / SYNTHETIC_COLUMNS_PER_PAGE as f64,
        heights,
    };

    let page_count = columns.div_ceil(SYNTHETIC_COLUMNS_PER_PAGE);
    let width = SYNTHETIC_COLUMN_PX * SYNTHETIC_COLUMNS_PER_PAGE as u32;
    let height = SYNTHETIC_PAGE_HEIGHT_PX;

    let pages = (0..page_count)
        .into_par_iter()
        .map(|page| {
            let mut pixels = vec![0u8; (width * height) as usize];
            for (y, row) in pixels.chunks_exact_mut(width as usize).enumerate() {
                let v = y as f64 / height as f64;
                for (x, px) in row.iter_mut().enumerate() {
                    let local = x / SYNTHETIC_COLUMN_PX as usize;
                    let column = page * SYNTHETIC_COLUMNS_PER_PAGE + local;
                    let Some(&column_height) = metadata.heights.get(column) else {
                        continue;
                    };
                    if v >= column_height {
                        continue;
                    }
                    // Layer bands drift per column; odd columns are darker.
                    let band = ((v * 40.0 + column as f64 * 0.37).sin() * 0.5 + 0.5) as f32;
                    let base = if column % 2 == 0 { 0.55 } else { 0.35 };
                    *px = ((base + 0.4 * band * hash01(column as u32 + 7)) * 255.0) as u8;
                }
            }
            LuminancePage {
                width,
                height,
                pixels,
            }
        })
        .collect();

    log::info!(
        "Generated synthetic strip: {} columns on {} pages",
        columns,
        page_count
    );

    CoreAssets { metadata, pages }
}
