use std::ffi::c_uint;

use bitflags::bitflags;

/// Open options for [`crate::Dataset::open_ex`]
#[derive(Debug, Default)]
pub struct DatasetOptions<'a> {
    pub open_flags: GdalOpenFlags,
    pub allowed_drivers: Option<&'a [&'a str]>,
    pub open_options: Option<&'a [&'a str]>,
}

// These are skipped by bindgen and manually updated.
bitflags! {
    /// Extended open flags, passed as `nOpenFlags` to [`GDALOpenEx`].
    ///
    /// [`GDALOpenEx`]: https://gdal.org/api/raster_c_api.html#_CPPv410GDALOpenExPKcjPPCKcPPCKcPPCKc
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GdalOpenFlags: c_uint {
        /// Open in read-only mode (default).
        const GDAL_OF_READONLY = 0x00;
        /// Open in update mode.
        const GDAL_OF_UPDATE = 0x01;
        /// Allow raster drivers to be used.
        const GDAL_OF_RASTER = 0x02;
        /// Emit error message in case of failed open.
        const GDAL_OF_VERBOSE_ERROR = 0x40;
    }
}

impl Default for GdalOpenFlags {
    fn default() -> GdalOpenFlags {
        GdalOpenFlags::GDAL_OF_READONLY | GdalOpenFlags::GDAL_OF_RASTER
    }
}

bitflags! {
    /// Mask band flags as reported by `GDALGetMaskFlags` and accepted by
    /// `GDALCreateMaskBand`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct GdalMaskFlags: i32 {
        /// Every pixel is valid; the mask is synthesized.
        const GMF_ALL_VALID = 0x01;
        /// The mask is shared between all bands of the dataset.
        const GMF_PER_DATASET = 0x02;
        /// The mask is derived from an alpha band.
        const GMF_ALPHA = 0x04;
        /// The mask is derived from the band's nodata value.
        const GMF_NODATA = 0x08;
    }
}

impl GdalMaskFlags {
    pub fn is_all_valid(&self) -> bool {
        self.contains(GdalMaskFlags::GMF_ALL_VALID)
    }

    pub fn is_per_dataset(&self) -> bool {
        self.contains(GdalMaskFlags::GMF_PER_DATASET)
    }

    pub fn is_alpha(&self) -> bool {
        self.contains(GdalMaskFlags::GMF_ALPHA)
    }

    pub fn is_nodata(&self) -> bool {
        self.contains(GdalMaskFlags::GMF_NODATA)
    }
}
