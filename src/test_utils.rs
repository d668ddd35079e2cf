use std::ffi::c_void;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use crate::dataset::{Dataset, GeoTransform};
use crate::driver::Driver;
use crate::errors::Result;
use crate::raster::{Buffer, GdalDataType};

pub const WGS84_WKT: &str = r#"GEOGCS["WGS 84",DATUM["WGS_1984",SPHEROID["WGS 84",6378137,298.257223563]],PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#;
pub const TEST_GEO_TRANSFORM: GeoTransform = [2.0, 0.001, 0.0, 48.0, 0.0, -0.001];

/// A struct that contains a temporary directory and a path to a file in that directory.
pub struct TempFixture {
    _temp_dir: tempfile::TempDir,
    temp_path: PathBuf,
}

impl TempFixture {
    /// Creates a temporary directory and path to a non-existent file with given `name`.
    /// Useful for writing results to during testing
    pub fn empty(name: &str) -> Self {
        let _temp_dir = tempfile::tempdir().unwrap();
        let temp_path = _temp_dir.path().join(name);
        Self {
            _temp_dir,
            temp_path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.temp_path
    }
}

impl AsRef<Path> for TempFixture {
    fn as_ref(&self) -> &Path {
        self.path()
    }
}

type PixelFn = Box<dyn Fn(usize, usize, usize) -> f64>;
type MaskFn = Box<dyn Fn(usize, usize) -> bool>;

/// Builds synthetic source rasters with the `MEM` driver.
pub struct MemSource {
    size: (usize, usize),
    bands: usize,
    data_type: GdalDataType,
    nodata: Option<f64>,
    georeferenced: bool,
    pixel: PixelFn,
    mask: Option<MaskFn>,
}

impl MemSource {
    /// `bands` bands of bytes; every pixel is non-zero.
    pub fn new(size: (usize, usize), bands: usize) -> Self {
        MemSource {
            size,
            bands,
            data_type: GdalDataType::UInt8,
            nodata: None,
            georeferenced: false,
            pixel: Box::new(|band, col, row| ((col + 3 * row + 7 * band) % 200 + 1) as f64),
            mask: None,
        }
    }

    pub fn data_type(mut self, data_type: GdalDataType) -> Self {
        self.data_type = data_type;
        self
    }

    pub fn nodata(mut self, nodata: f64) -> Self {
        self.nodata = Some(nodata);
        self
    }

    pub fn georeferenced(mut self) -> Self {
        self.georeferenced = true;
        self
    }

    /// Pixel value of `(band, col, row)`, `band` counted from 1.
    pub fn pixels(mut self, pixel: impl Fn(usize, usize, usize) -> f64 + 'static) -> Self {
        self.pixel = Box::new(pixel);
        self
    }

    /// An explicit per-dataset mask, valid where `valid(col, row)` holds.
    pub fn mask(mut self, valid: impl Fn(usize, usize) -> bool + 'static) -> Self {
        self.mask = Some(Box::new(valid));
        self
    }

    pub fn build(&self) -> Result<Dataset> {
        let driver = Driver::get_by_name("MEM")?;
        let mut dataset = driver.create("", self.size, self.bands, self.data_type)?;
        let (cols, rows) = self.size;

        for band in 1..=self.bands {
            let data = (0..rows)
                .flat_map(|row| (0..cols).map(move |col| (col, row)))
                .map(|(col, row)| (self.pixel)(band, col, row))
                .collect();
            let mut raster_band = dataset.rasterband(band)?;
            raster_band.write((0, 0), self.size, &Buffer::<f64>::new(self.size, data))?;
            if let Some(nodata) = self.nodata {
                raster_band.set_no_data_value(nodata)?;
            }
        }

        if self.georeferenced {
            dataset.set_geo_transform(&TEST_GEO_TRANSFORM)?;
            dataset.set_projection(WGS84_WKT)?;
        }

        if let Some(valid) = &self.mask {
            dataset.create_mask_band()?;
            let data = (0..rows)
                .flat_map(|row| (0..cols).map(move |col| (col, row)))
                .map(|(col, row)| if valid(col, row) { 255u8 } else { 0 })
                .collect();
            let mut mask_band = dataset.rasterband(1)?.open_mask_band()?;
            mask_band.write((0, 0), self.size, &Buffer::new(self.size, data))?;
        }
        Ok(dataset)
    }
}

/// Scoped value for temporarily suppressing thread-local GDAL log messages.
///
/// Useful for tests that expect GDAL errors and want to keep the output log clean
/// of distracting yet expected error messages.
pub(crate) struct SuppressGDALErrorLog {
    // Make !Sync and !Send, and force use of `new`.
    _private: PhantomData<*mut c_void>,
}

impl SuppressGDALErrorLog {
    pub(crate) fn new() -> Self {
        unsafe { gdal_sys::CPLPushErrorHandler(Some(gdal_sys::CPLQuietErrorHandler)) };
        SuppressGDALErrorLog {
            _private: PhantomData,
        }
    }
}

impl Drop for SuppressGDALErrorLog {
    fn drop(&mut self) {
        unsafe { gdal_sys::CPLPopErrorHandler() };
    }
}
