use gdal_sys::GDALMajorObjectH;

/// Common trait for GDAL datasets, bands and drivers.
pub trait MajorObject {
    fn gdal_object_ptr(&self) -> GDALMajorObjectH;
}
