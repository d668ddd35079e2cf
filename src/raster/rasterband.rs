use std::ffi::c_int;
use std::marker::PhantomData;

use gdal_sys::{self, CPLErr, GDALMajorObjectH, GDALRWFlag, GDALRasterBandH, GDALRasterIOExtraArg};

use crate::dataset::Dataset;
use crate::errors::*;
use crate::gdal_major_object::MajorObject;
use crate::metadata::Metadata;
use crate::options::GdalMaskFlags;
use crate::raster::{Buffer, GdalDataType, GdalType, ResampleAlg, Window};
use crate::utils::{_last_cpl_err, _last_null_pointer_err};

/// Represents a single band of a dataset.
///
/// This object carries the lifetime of the dataset that
/// contains it. This is necessary to prevent the dataset
/// from being dropped before the band.
pub struct RasterBand<'a> {
    c_rasterband: GDALRasterBandH,
    phantom: PhantomData<&'a Dataset>,
}

impl<'a> RasterBand<'a> {
    /// Create a RasterBand from a wrapped C pointer
    ///
    /// # Safety
    /// This method operates on a raw C pointer
    pub unsafe fn from_c_rasterband(_: &'a Dataset, c_rasterband: GDALRasterBandH) -> Self {
        RasterBand {
            c_rasterband,
            phantom: PhantomData,
        }
    }

    /// Returns the wrapped C pointer
    ///
    /// # Safety
    /// This method returns a raw C pointer
    pub unsafe fn c_rasterband(&self) -> GDALRasterBandH {
        self.c_rasterband
    }

    /// Natural block size `(cols, rows)` of the band.
    pub fn block_size(&self) -> (usize, usize) {
        let mut size_x = 0;
        let mut size_y = 0;
        unsafe { gdal_sys::GDALGetBlockSize(self.c_rasterband, &mut size_x, &mut size_y) };
        (size_x as usize, size_y as usize)
    }

    pub fn x_size(&self) -> usize {
        let out = unsafe { gdal_sys::GDALGetRasterBandXSize(self.c_rasterband) };
        out as usize
    }

    pub fn y_size(&self) -> usize {
        let out = unsafe { gdal_sys::GDALGetRasterBandYSize(self.c_rasterband) };
        out as usize
    }

    /// Get dimensions of the band.
    /// Note that overview bands are smaller than their owning dataset.
    pub fn size(&self) -> (usize, usize) {
        (self.x_size(), self.y_size())
    }

    /// Read data from this band into a slice, resampling with `resample_alg`
    /// when `window_size` differs from `size`.
    ///
    /// # Arguments
    /// * window - the window position from top left
    /// * window_size - the window size (GDAL will interpolate data if window_size != buffer_size)
    /// * size - the desired size to read
    /// * buffer - a slice to hold the data (length must equal product of size parameter)
    /// * resample_alg - the resample algorithm, nearest neighbour when `None`
    pub fn read_into_slice<T: GdalType>(
        &self,
        window: (isize, isize),
        window_size: (usize, usize),
        size: (usize, usize),
        buffer: &mut [T],
        resample_alg: Option<ResampleAlg>,
    ) -> Result<()> {
        if buffer.len() != size.0 * size.1 {
            return Err(GdalError::BadArgument(format!(
                "buffer length {} does not match size {size:?}",
                buffer.len()
            )));
        }

        let mut extra_arg = raster_io_extra_arg(resample_alg.unwrap_or_default());
        let rv = unsafe {
            gdal_sys::GDALRasterIOEx(
                self.c_rasterband,
                GDALRWFlag::GF_Read,
                window.0 as c_int,
                window.1 as c_int,
                window_size.0 as c_int,
                window_size.1 as c_int,
                buffer.as_mut_ptr() as *mut std::ffi::c_void,
                size.0 as c_int,
                size.1 as c_int,
                T::gdal_type(),
                0,
                0,
                &mut extra_arg,
            )
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }

        Ok(())
    }

    /// Read a [`Buffer<T>`] from this band.
    pub fn read_as<T: GdalType>(
        &self,
        window: (isize, isize),
        window_size: (usize, usize),
        size: (usize, usize),
        resample_alg: Option<ResampleAlg>,
    ) -> Result<Buffer<T>> {
        let mut data = vec![T::default(); size.0 * size.1];
        self.read_into_slice(window, window_size, size, &mut data, resample_alg)?;
        Ok(Buffer::new(size, data))
    }

    /// Read the pixels of `window` at full resolution.
    pub fn read_window<T: GdalType>(
        &self,
        window: &Window,
        resample_alg: Option<ResampleAlg>,
    ) -> Result<Buffer<T>> {
        self.read_as(window.offset(), window.size(), window.size(), resample_alg)
    }

    /// Read the full band as a [`Buffer<T>`].
    pub fn read_band_as<T: GdalType>(&self) -> Result<Buffer<T>> {
        let size = self.size();
        self.read_as::<T>((0, 0), size, size, None)
    }

    /// Write a [`Buffer<T>`] into the band.
    ///
    /// # Arguments
    /// * window - the window position from top left
    /// * window_size - the window size (GDAL will interpolate data if window_size != Buffer.size)
    pub fn write<T: GdalType>(
        &mut self,
        window: (isize, isize),
        window_size: (usize, usize),
        buffer: &Buffer<T>,
    ) -> Result<()> {
        let rv = unsafe {
            gdal_sys::GDALRasterIO(
                self.c_rasterband,
                GDALRWFlag::GF_Write,
                window.0 as c_int,
                window.1 as c_int,
                window_size.0 as c_int,
                window_size.1 as c_int,
                buffer.data.as_ptr() as *mut std::ffi::c_void,
                buffer.size.0 as c_int,
                buffer.size.1 as c_int,
                T::gdal_type(),
                0,
                0,
            )
        };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Write a block-sized buffer at the window's position.
    pub fn write_window<T: GdalType>(&mut self, window: &Window, buffer: &Buffer<T>) -> Result<()> {
        self.write(window.offset(), window.size(), buffer)
    }

    /// The raw GDAL data type of the band.
    pub fn band_type(&self) -> gdal_sys::GDALDataType::Type {
        unsafe { gdal_sys::GDALGetRasterDataType(self.c_rasterband) }
    }

    /// The band's data type, if it is one COGs can be built from.
    pub fn data_type(&self) -> Result<GdalDataType> {
        self.band_type().try_into()
    }

    pub fn no_data_value(&self) -> Option<f64> {
        let mut pb_success = 1;
        let no_data =
            unsafe { gdal_sys::GDALGetRasterNoDataValue(self.c_rasterband, &mut pb_success) };
        if pb_success == 1 {
            return Some(no_data);
        }
        None
    }

    pub fn set_no_data_value(&mut self, no_data: f64) -> Result<()> {
        let rv = unsafe { gdal_sys::GDALSetRasterNoDataValue(self.c_rasterband, no_data) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    /// Flags describing where the band's mask comes from.
    pub fn mask_flags(&self) -> GdalMaskFlags {
        let flags = unsafe { gdal_sys::GDALGetMaskFlags(self.c_rasterband) };
        GdalMaskFlags::from_bits_truncate(flags)
    }

    /// Open the band's mask. GDAL synthesises one from nodata, alpha or
    /// "all valid" when the dataset has no explicit mask.
    pub fn open_mask_band(&self) -> Result<RasterBand<'a>> {
        let mask_band = unsafe { gdal_sys::GDALGetMaskBand(self.c_rasterband) };
        if mask_band.is_null() {
            return Err(_last_null_pointer_err("GDALGetMaskBand"));
        }
        Ok(RasterBand {
            c_rasterband: mask_band,
            phantom: PhantomData,
        })
    }

    /// Create an explicit mask for this band, shared by all bands of the
    /// dataset when `shared_between_all_bands` is set.
    pub fn create_mask_band(&mut self, shared_between_all_bands: bool) -> Result<()> {
        let flags = if shared_between_all_bands {
            GdalMaskFlags::GMF_PER_DATASET
        } else {
            GdalMaskFlags::empty()
        };
        let rv = unsafe { gdal_sys::GDALCreateMaskBand(self.c_rasterband, flags.bits()) };
        if rv != CPLErr::CE_None {
            return Err(_last_cpl_err(rv));
        }
        Ok(())
    }

    pub fn overview_count(&self) -> usize {
        (unsafe { gdal_sys::GDALGetOverviewCount(self.c_rasterband) }) as usize
    }

    /// Overview `index`, starting at 0 for the largest one.
    pub fn overview(&self, index: usize) -> Result<RasterBand<'a>> {
        let c_band = unsafe { gdal_sys::GDALGetOverview(self.c_rasterband, index as c_int) };
        if c_band.is_null() {
            return Err(_last_null_pointer_err("GDALGetOverview"));
        }
        Ok(RasterBand {
            c_rasterband: c_band,
            phantom: PhantomData,
        })
    }
}

fn raster_io_extra_arg(resample_alg: ResampleAlg) -> GDALRasterIOExtraArg {
    // Equivalent of INIT_RASTERIO_EXTRA_ARG; later struct versions only append fields.
    let mut extra_arg: GDALRasterIOExtraArg = unsafe { std::mem::zeroed() };
    extra_arg.nVersion = 1;
    extra_arg.eResampleAlg = resample_alg.to_gdal();
    extra_arg
}

impl MajorObject for RasterBand<'_> {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH {
        self.c_rasterband
    }
}

impl Metadata for RasterBand<'_> {}
