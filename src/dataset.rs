use std::ffi::{c_int, CString, NulError};
use std::path::Path;
use std::ptr;

use gdal_sys::{self, CPLErr, GDALDatasetH, GDALMajorObjectH};

use crate::cpl::CslStringList;
use crate::driver::{Driver, _register_drivers};
use crate::errors::*;
use crate::gdal_major_object::MajorObject;
use crate::metadata::Metadata;
use crate::options::{DatasetOptions, GdalMaskFlags, GdalOpenFlags};
use crate::progress::ScaledProgress;
use crate::raster::{RasterBand, ResampleAlg};
use crate::utils::{_last_cpl_err, _last_null_pointer_err, _path_to_c_string, _string};

/// Affine pixel to georeferenced coordinate transform.
///
/// `[x_origin, pixel_width, row_rotation, y_origin, column_rotation, pixel_height]`
pub type GeoTransform = [f64; 6];

/// Wrapper around a `GDALDataset` handle.
#[derive(Debug)]
pub struct Dataset {
    c_dataset: GDALDatasetH,
}

// GDAL Docs state: The returned dataset should only be accessed by one thread at a time.
// See: https://gdal.org/api/raster_c_api.html#_CPPv48GDALOpenPKc10GDALAccess
unsafe impl Send for Dataset {}

impl Dataset {
    /// Returns the wrapped C pointer
    ///
    /// # Safety
    /// This method returns a raw C pointer
    pub unsafe fn c_dataset(&self) -> GDALDatasetH {
        self.c_dataset
    }

    /// Creates a new Dataset by wrapping a C pointer
    ///
    /// # Safety
    /// This method operates on a raw C pointer
    pub unsafe fn from_c_dataset(c_dataset: GDALDatasetH) -> Dataset {
        Dataset { c_dataset }
    }

    /// Open a raster read-only.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        Self::open_ex(path, DatasetOptions::default())
    }

    /// Open a raster with extended options.
    pub fn open_ex<P: AsRef<Path>>(path: P, options: DatasetOptions) -> Result<Dataset> {
        _register_drivers();
        let c_filename = _path_to_c_string(path.as_ref())?;

        // the CStrings must outlive the pointer arrays handed to GDAL
        let c_allowed_drivers = to_c_strings(options.allowed_drivers)?;
        let c_drivers_ptrs = null_terminated(&c_allowed_drivers);
        let c_open_options = to_c_strings(options.open_options)?;
        let c_open_options_ptrs = null_terminated(&c_open_options);

        let c_dataset = unsafe {
            gdal_sys::GDALOpenEx(
                c_filename.as_ptr(),
                options.open_flags.bits(),
                c_drivers_ptrs
                    .as_ref()
                    .map_or(ptr::null(), |ptrs| ptrs.as_ptr()),
                c_open_options_ptrs
                    .as_ref()
                    .map_or(ptr::null(), |ptrs| ptrs.as_ptr()),
                ptr::null(),
            )
        };
        if c_dataset.is_null() {
            return Err(_last_null_pointer_err("GDALOpenEx"));
        }
        Ok(Dataset { c_dataset })
    }

    /// Open a raster for writing.
    pub fn open_for_update<P: AsRef<Path>>(path: P) -> Result<Dataset> {
        Self::open_ex(
            path,
            DatasetOptions {
                open_flags: GdalOpenFlags::GDAL_OF_UPDATE | GdalOpenFlags::GDAL_OF_RASTER,
                ..DatasetOptions::default()
            },
        )
    }

    pub fn driver(&self) -> Driver {
        unsafe {
            let c_driver = gdal_sys::GDALGetDatasetDriver(self.c_dataset);
            Driver::from_c_driver(c_driver)
        }
    }

    /// Band `band_index`, counted from 1.
    pub fn rasterband(&self, band_index: usize) -> Result<RasterBand> {
        unsafe {
            let c_band = gdal_sys::GDALGetRasterBand(self.c_dataset, band_index as c_int);
            if c_band.is_null() {
                return Err(_last_null_pointer_err("GDALGetRasterBand"));
            }
            Ok(RasterBand::from_c_rasterband(self, c_band))
        }
    }

    pub fn raster_count(&self) -> usize {
        (unsafe { gdal_sys::GDALGetRasterCount(self.c_dataset) }) as usize
    }

    /// `(cols, rows)` of the full resolution raster.
    pub fn raster_size(&self) -> (usize, usize) {
        let size_x = unsafe { gdal_sys::GDALGetRasterXSize(self.c_dataset) } as usize;
        let size_y = unsafe { gdal_sys::GDALGetRasterYSize(self.c_dataset) } as usize;
        (size_x, size_y)
    }

    /// The dataset's CRS as WKT, empty when it has none.
    pub fn projection(&self) -> String {
        let rv = unsafe { gdal_sys::GDALGetProjectionRef(self.c_dataset) };
        _string(rv)
    }

    pub fn set_projection(&mut self, projection: &str) -> Result<()> {
        let c_projection = CString::new(projection)?;
        let rv = unsafe { gdal_sys::GDALSetProjection(self.c_dataset, c_projection.as_ptr()) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Get affine transformation coefficients.
    pub fn geo_transform(&self) -> Result<GeoTransform> {
        let mut transformation = GeoTransform::default();
        let rv =
            unsafe { gdal_sys::GDALGetGeoTransform(self.c_dataset, transformation.as_mut_ptr()) };

        // check if the dataset has a GeoTransform
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(transformation)
    }

    pub fn set_geo_transform(&mut self, transformation: &GeoTransform) -> Result<()> {
        let rv = unsafe {
            gdal_sys::GDALSetGeoTransform(self.c_dataset, transformation.as_ptr() as *mut f64)
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Copy this dataset to `filename` with `driver` and its creation `options`.
    pub fn create_copy<P: AsRef<Path>>(
        &self,
        driver: &Driver,
        filename: P,
        options: &CslStringList,
        progress: Option<&ScaledProgress>,
    ) -> Result<Dataset> {
        let c_filename = _path_to_c_string(filename.as_ref())?;
        let (pfn_progress, progress_arg) = progress
            .map(|progress| progress.as_gdal())
            .unwrap_or((None, ptr::null_mut()));
        let c_dataset = unsafe {
            gdal_sys::GDALCreateCopy(
                driver.c_driver(),
                c_filename.as_ptr(),
                self.c_dataset,
                0,
                options.as_ptr(),
                pfn_progress,
                progress_arg,
            )
        };
        if c_dataset.is_null() {
            return Err(_last_null_pointer_err("GDALCreateCopy"));
        }
        Ok(unsafe { Dataset::from_c_dataset(c_dataset) })
    }

    /// Build reduced resolution overviews for all bands (and the mask, when
    /// there is one).
    ///
    /// # Arguments
    /// * resampling - the kernel used to compute overview pixels
    /// * factors - the decimation factors, e.g. `[2, 4, 8]`
    pub fn build_overviews(
        &mut self,
        resampling: ResampleAlg,
        factors: &[i32],
        progress: Option<&ScaledProgress>,
    ) -> Result<()> {
        let c_resampling = CString::new(resampling.overview_name())?;
        let (pfn_progress, progress_arg) = progress
            .map(|progress| progress.as_gdal())
            .unwrap_or((None, ptr::null_mut()));
        let rv = unsafe {
            gdal_sys::GDALBuildOverviews(
                self.c_dataset,
                c_resampling.as_ptr(),
                factors.len() as c_int,
                factors.as_ptr() as *mut c_int,
                0,
                ptr::null_mut::<c_int>(),
                pfn_progress,
                progress_arg,
            )
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Create a mask shared by all bands of the dataset.
    pub fn create_mask_band(&mut self) -> Result<()> {
        let rv = unsafe {
            gdal_sys::GDALCreateDatasetMaskBand(
                self.c_dataset,
                GdalMaskFlags::GMF_PER_DATASET.bits(),
            )
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }
}

fn to_c_strings(values: Option<&[&str]>) -> Result<Option<Vec<CString>>> {
    values
        .map(|values| {
            values
                .iter()
                .map(|&s| CString::new(s))
                .collect::<std::result::Result<Vec<CString>, NulError>>()
        })
        .transpose()
        .map_err(Into::into)
}

fn null_terminated(values: &Option<Vec<CString>>) -> Option<Vec<*const std::ffi::c_char>> {
    values.as_ref().map(|values| {
        let mut ptrs: Vec<_> = values.iter().map(|s| s.as_ptr()).collect();
        ptrs.push(ptr::null());
        ptrs
    })
}

impl MajorObject for Dataset {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH {
        self.c_dataset
    }
}

impl Metadata for Dataset {}

impl Drop for Dataset {
    fn drop(&mut self) {
        unsafe {
            gdal_sys::GDALClose(self.c_dataset);
        }
    }
}
