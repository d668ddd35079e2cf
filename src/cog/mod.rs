//! Cloud Optimized GeoTIFF creation.
//!
//! ```no_run
//! use cogeo::cog::{create_cog_in_memory, CogOptions, CogProfile, ProfileName};
//! use cogeo::Dataset;
//!
//! # fn main() -> cogeo::errors::Result<()> {
//! let src = Dataset::open("scene.tif")?;
//! let options = CogOptions {
//!     bands: vec![1, 2, 3],
//!     profile: CogProfile::named(ProfileName::Jpeg),
//!     overview_level: Some(5),
//!     ..CogOptions::default()
//! };
//! let cog = create_cog_in_memory(&src, &options, None)?;
//! cog.persist("scene_cog.tif")?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod mask;
mod profile;

pub use builder::{create_cog, create_cog_in_memory};
pub use mask::{binarize, nodata_mask, MaskSource, MASKED, VALID};
pub use profile::{CogProfile, ProfileName, DEFAULT_BLOCK_SIZE};

use crate::raster::ResampleAlg;

/// Metadata domain of the overview resampling tag.
pub const OVERVIEW_TAG_DOMAIN: &str = "rio_overview";
/// Metadata key of the overview resampling tag.
pub const OVERVIEW_TAG_KEY: &str = "RESAMPLING";

/// What to build and how.
#[derive(Debug, Clone)]
pub struct CogOptions {
    /// 1-based source band indices, in output order. Empty selects every
    /// source band except the alpha band.
    pub bands: Vec<usize>,
    pub profile: CogProfile,
    /// Nodata value to derive the mask from when the source bands have none.
    /// A nodata value set on the first requested source band always takes
    /// precedence, `0` included.
    pub nodata: Option<f64>,
    /// 1-based index of a source alpha band to derive the mask from.
    pub alpha: Option<usize>,
    /// Number of overviews; derived from the raster and block size when `None`.
    pub overview_level: Option<u32>,
    pub overview_resampling: ResampleAlg,
}

impl Default for CogOptions {
    fn default() -> Self {
        CogOptions {
            bands: Vec::new(),
            profile: CogProfile::default(),
            nodata: None,
            alpha: None,
            overview_level: None,
            overview_resampling: ResampleAlg::NearestNeighbour,
        }
    }
}

/// Decimation factors `2^1 ..= 2^level`.
pub fn overview_factors(level: u32) -> Vec<i32> {
    (1..=level).map(|j| 1i32 << j).collect()
}

/// Number of halvings until the smaller side of `size` fits in `min_size`.
pub fn max_overview_level(size: (usize, usize), min_size: usize) -> u32 {
    let min_size = min_size.max(1);
    let mut level = 0;
    let mut factor = 1;
    while (size.0 / factor).min(size.1 / factor) > min_size {
        factor *= 2;
        level += 1;
    }
    level
}
