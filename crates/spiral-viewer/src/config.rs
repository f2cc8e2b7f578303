//! Command-line configuration.

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;
use strata::SpiralParams;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "spiral-viewer",
    about = "Render a scanned core strip as a logarithmic-looking spiral ribbon."
)]
pub struct Args {
    /// JSON column metadata: `{ "width": <f64>, "heights": [<f64>, ...] }`.
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Texture page image; repeat once per page, in page order.
    #[arg(long = "image")]
    pub images: Vec<PathBuf>,

    /// Spiral steps (vertex pairs before seam breaks).
    #[arg(long, default_value_t = 30_000)]
    pub segments: usize,

    /// Full turns of the spiral.
    #[arg(long, default_value_t = 10)]
    pub rotations: u32,

    /// Radial thickness of the ribbon.
    #[arg(long, default_value_t = 0.05)]
    pub band_width: f64,

    /// Texture offset either side of a column boundary, normalized strip units.
    #[arg(long, default_value_t = 1e-6)]
    pub seam_epsilon: f64,

    /// Columns in the generated strip used when no metadata is given.
    #[arg(long, default_value_t = 64)]
    pub synthetic_columns: usize,

    /// Present without waiting for vertical blank.
    #[arg(long, default_value_t = false)]
    pub no_vsync: bool,
}

/// Where the column layout and pages come from.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetSource {
    Files {
        metadata: PathBuf,
        images: Vec<PathBuf>,
    },
    Synthetic {
        columns: usize,
    },
}

impl Args {
    pub fn spiral_params(&self) -> SpiralParams {
        SpiralParams {
            num_segment: self.segments,
            num_rotation: self.rotations,
            band_width: self.band_width,
            min_radius: 5.0 * self.band_width,
            seam_epsilon: self.seam_epsilon,
            ..SpiralParams::default()
        }
    }

    pub fn asset_source(&self) -> Result<AssetSource> {
        match (&self.metadata, self.images.is_empty()) {
            (Some(metadata), false) => Ok(AssetSource::Files {
                metadata: metadata.clone(),
                images: self.images.clone(),
            }),
            (Some(_), true) => bail!("--metadata needs at least one --image page"),
            (None, false) => bail!("--image pages need a --metadata file"),
            (None, true) => {
                if self.synthetic_columns == 0 {
                    bail!("--synthetic-columns must be > 0");
                }
                Ok(AssetSource::Synthetic {
                    columns: self.synthetic_columns,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_library_defaults() {
        let args = Args::try_parse_from(["spiral-viewer"]).unwrap();
        let params = args.spiral_params();
        assert_eq!(params, SpiralParams::default());
        assert_eq!(
            args.asset_source().unwrap(),
            AssetSource::Synthetic { columns: 64 }
        );
    }

    #[test]
    fn file_sources_need_both_parts() {
        let args = Args::try_parse_from([
            "spiral-viewer",
            "--metadata",
            "core.json",
            "--image",
            "page0.png",
            "--image",
            "page1.png",
        ])
        .unwrap();
        match args.asset_source().unwrap() {
            AssetSource::Files { metadata, images } => {
                assert_eq!(metadata, PathBuf::from("core.json"));
                assert_eq!(images.len(), 2);
            }
            other => panic!("unexpected source {other:?}"),
        }

        let missing_images =
            Args::try_parse_from(["spiral-viewer", "--metadata", "core.json"]).unwrap();
        assert!(missing_images.asset_source().is_err());

        let missing_meta = Args::try_parse_from(["spiral-viewer", "--image", "a.png"]).unwrap();
        assert!(missing_meta.asset_source().is_err());
    }

    #[test]
    fn band_width_sets_inner_clearance() {
        let args = Args::try_parse_from(["spiral-viewer", "--band-width", "0.02", "--segments", "500"])
            .unwrap();
        let params = args.spiral_params();
        assert_eq!(params.num_segment, 500);
        assert!((params.min_radius - 0.1).abs() < 1e-12);
    }
}
