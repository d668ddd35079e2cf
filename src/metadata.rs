use std::ffi::CString;
use std::ptr;

use gdal_sys::CPLErr;

use crate::errors::*;
use crate::gdal_major_object::MajorObject;
use crate::utils::{_last_cpl_err, _string};

/// Read and write `KEY=VALUE` metadata items on datasets and bands.
///
/// An empty `domain` is GDAL's default metadata domain.
pub trait Metadata: MajorObject {
    fn metadata_item(&self, key: &str, domain: &str) -> Option<String> {
        let c_key = CString::new(key).ok()?;
        let c_domain = CString::new(domain).ok()?;
        let c_domain_ptr = if domain.is_empty() {
            ptr::null()
        } else {
            c_domain.as_ptr()
        };

        let c_res = unsafe {
            gdal_sys::GDALGetMetadataItem(self.gdal_object_ptr(), c_key.as_ptr(), c_domain_ptr)
        };
        if c_res.is_null() {
            None
        } else {
            Some(_string(c_res))
        }
    }

    fn set_metadata_item(&mut self, key: &str, value: &str, domain: &str) -> Result<()> {
        let c_key = CString::new(key)?;
        let c_domain = CString::new(domain)?;
        let c_value = CString::new(value)?;
        let c_domain_ptr = if domain.is_empty() {
            ptr::null()
        } else {
            c_domain.as_ptr()
        };

        let c_res = unsafe {
            gdal_sys::GDALSetMetadataItem(
                self.gdal_object_ptr(),
                c_key.as_ptr(),
                c_value.as_ptr(),
                c_domain_ptr,
            )
        };
        if c_res != CPLErr::CE_None {
            return Err(_last_cpl_err(c_res));
        }
        Ok(())
    }
}
