use crate::dataset::Dataset;
use crate::errors::Result;
use crate::raster::{Buffer, ByteBuffer, GdalType, ResampleAlg, Window};

/// Mask value of a pixel holding data.
pub const VALID: u8 = 255;
/// Mask value of a pixel without data.
pub const MASKED: u8 = 0;

/// Where the output mask is derived from, in priority order.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MaskSource {
    /// Pixels where every band equals the nodata value are masked.
    Nodata(f64),
    /// The given 1-based source band is an alpha channel.
    Alpha(usize),
    /// The source's own mask of the first requested band. With the default
    /// band list that is band 1; per-dataset masks are shared by all bands.
    Internal,
}

impl MaskSource {
    pub fn select(nodata: Option<f64>, alpha: Option<usize>) -> Self {
        match (nodata, alpha) {
            (Some(nodata), _) => MaskSource::Nodata(nodata),
            (None, Some(alpha)) => MaskSource::Alpha(alpha),
            (None, None) => MaskSource::Internal,
        }
    }

    /// Compute the mask of `window`. `bands` are the already read pixels of
    /// the requested bands for that window, `first_band` the 1-based index of
    /// the first requested source band.
    pub fn block_mask<T: GdalType>(
        &self,
        src: &Dataset,
        first_band: usize,
        window: &Window,
        bands: &[Buffer<T>],
    ) -> Result<ByteBuffer> {
        match *self {
            MaskSource::Nodata(nodata) => Ok(nodata_mask(window.size(), bands, nodata)),
            MaskSource::Alpha(alpha) => {
                let values = src
                    .rasterband(alpha)?
                    .read_window::<u8>(window, Some(ResampleAlg::Bilinear))?;
                Ok(binarize(values))
            }
            MaskSource::Internal => {
                let values = src
                    .rasterband(first_band)?
                    .open_mask_band()?
                    .read_window::<u8>(window, Some(ResampleAlg::Bilinear))?;
                Ok(binarize(values))
            }
        }
    }
}

/// 0 where every band equals `nodata`, 255 elsewhere.
///
/// The comparison happens in `T`: `nodata` is first converted to the pixel
/// type, so a `Float32` sentinel matches the stored value GDAL rounded it to.
/// A `nodata` that no value of `T` can hold masks nothing.
pub fn nodata_mask<T: GdalType>(size: (usize, usize), bands: &[Buffer<T>], nodata: f64) -> ByteBuffer {
    let pixels = size.0 * size.1;
    let sentinel = T::from_f64(nodata);
    let is_nodata = |value: T| match sentinel {
        // only NaN is unordered against itself
        Some(_) if nodata.is_nan() => value.partial_cmp(&value).is_none(),
        Some(sentinel) => value == sentinel,
        None => false,
    };
    let data = (0..pixels)
        .map(|i| {
            let all_nodata =
                !bands.is_empty() && bands.iter().all(|band| is_nodata(band.data[i]));
            if all_nodata {
                MASKED
            } else {
                VALID
            }
        })
        .collect();
    Buffer::new(size, data)
}

/// Maps 0 to [`MASKED`] and any other value to [`VALID`].
pub fn binarize(mut values: ByteBuffer) -> ByteBuffer {
    for value in values.data.iter_mut() {
        *value = if *value == 0 { MASKED } else { VALID };
    }
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_priority() {
        assert_eq!(MaskSource::select(Some(0.0), Some(4)), MaskSource::Nodata(0.0));
        assert_eq!(MaskSource::select(None, Some(4)), MaskSource::Alpha(4));
        assert_eq!(MaskSource::select(None, None), MaskSource::Internal);
    }

    #[test]
    fn masked_only_when_all_bands_match() {
        let red = Buffer::new((4, 1), vec![0u8, 0, 10, 0]);
        let green = Buffer::new((4, 1), vec![0u8, 5, 0, 0]);
        let blue = Buffer::new((4, 1), vec![0u8, 0, 0, 7]);
        let mask = nodata_mask((4, 1), &[red, green, blue], 0.0);
        assert_eq!(mask.data, vec![MASKED, VALID, VALID, VALID]);
    }

    #[test]
    fn float_and_nan_nodata() {
        let band = Buffer::new((3, 1), vec![-9999.0f32, 1.5, f32::NAN]);
        let mask = nodata_mask((3, 1), std::slice::from_ref(&band), -9999.0);
        assert_eq!(mask.data, vec![MASKED, VALID, VALID]);

        let mask = nodata_mask((3, 1), &[band], f64::NAN);
        assert_eq!(mask.data, vec![VALID, VALID, MASKED]);
    }

    #[test]
    fn float32_nodata_not_exact_in_f64() {
        // GDAL reports the sentinel as the f64 it was set with, the band holds the f32 rounding.
        let band = Buffer::new((2, 1), vec![0.1f32, 0.2]);
        let mask = nodata_mask((2, 1), &[band], 0.1);
        assert_eq!(mask.data, vec![MASKED, VALID]);

        let band = Buffer::new((2, 1), vec![f32::MIN, 0.0]);
        let mask = nodata_mask((2, 1), &[band], -3.40282346638529e+38);
        assert_eq!(mask.data, vec![MASKED, VALID]);
    }

    #[test]
    fn nodata_out_of_type_range() {
        let band = Buffer::new((3, 1), vec![0u8, 15, 255]);
        let mask = nodata_mask((3, 1), std::slice::from_ref(&band), -9999.0);
        assert_eq!(mask.data, vec![VALID, VALID, VALID]);

        let mask = nodata_mask((3, 1), &[band], 15.5);
        assert_eq!(mask.data, vec![VALID, VALID, VALID]);
    }

    #[test]
    fn mask_is_binary() {
        let mask = binarize(Buffer::new((5, 1), vec![0u8, 1, 128, 254, 255]));
        assert_eq!(mask.data, vec![0, 255, 255, 255, 255]);
    }
}
