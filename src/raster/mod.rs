//! GDAL Raster Data

mod buffer;
mod rasterband;
mod resample;
mod types;
mod window;

pub use buffer::{Buffer, ByteBuffer};
pub use rasterband::RasterBand;
pub use resample::ResampleAlg;
pub use types::{GDALDataType, GdalDataType, GdalType};
pub use window::{BlockWindows, Window};

#[cfg(test)]
mod tests;
