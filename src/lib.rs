//! Cloud Optimized GeoTIFF creation on top of [GDAL](https://gdal.org/).
//!
//! The crate carries a small safe layer over `gdal-sys` (datasets, bands,
//! drivers, metadata, configuration and `/vsimem/` files) and the
//! [`cog`] module, which turns any raster GDAL can read into a tiled GeoTIFF
//! with an internal binary mask and a power-of-two overview pyramid.
//!
//! ## Use
//!
//! ```no_run
//! use cogeo::cog::{create_cog, CogOptions};
//! use cogeo::Dataset;
//!
//! # fn main() -> cogeo::errors::Result<()> {
//! let src = Dataset::open("scene.tif")?;
//! let report = |done: f64| println!("{:.0}%", done * 100.0);
//! create_cog(&src, "scene_cog.tif", &CogOptions::default(), Some(&report))?;
//! # Ok(())
//! # }
//! ```
//!
//! GDAL reports diagnostics through its own error handler, which prints to
//! stderr. Call [`config::install_log_error_handler`] to route them into the
//! [`log`] facade instead.

pub mod cog;
pub mod config;
pub mod cpl;
mod dataset;
mod driver;
pub mod errors;
mod gdal_major_object;
mod metadata;
mod options;
pub mod progress;
pub mod raster;
#[cfg(test)]
mod test_utils;
mod utils;
pub mod vsi;

pub use dataset::{Dataset, GeoTransform};
pub use driver::Driver;
pub use gdal_major_object::MajorObject;
pub use metadata::Metadata;
pub use options::{DatasetOptions, GdalMaskFlags, GdalOpenFlags};
