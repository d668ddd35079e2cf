use std::path::Path;

use log::{debug, trace};

use crate::cog::mask::{MaskSource, MASKED};
use crate::cog::profile::CogProfile;
use crate::cog::{
    max_overview_level, overview_factors, CogOptions, OVERVIEW_TAG_DOMAIN, OVERVIEW_TAG_KEY,
};
use crate::config::ThreadLocalConfigGuard;
use crate::cpl::CslStringList;
use crate::dataset::Dataset;
use crate::driver::Driver;
use crate::errors::{GdalError, Result};
use crate::metadata::Metadata;
use crate::progress::{CountingProgress, ProgressCallback, ScaledProgress};
use crate::raster::{BlockWindows, ByteBuffer, GdalDataType, GdalType, ResampleAlg};
use crate::vsi::{unique_mem_path, MemFile};

// Progress share of each phase: blocks, then overviews, then the final copy.
const BLOCKS_END: f64 = 0.7;
const OVERVIEWS_END: f64 = 0.9;

// Creation options that shape the staging file. Compression is only applied
// by the final copy.
const LAYOUT_OPTIONS: [&str; 4] = ["TILED", "BLOCKXSIZE", "BLOCKYSIZE", "INTERLEAVE"];

/// Convert `src` into a Cloud Optimized GeoTIFF at `dst_path`.
///
/// `dst_path` may be any path GDAL can write to, `/vsimem/` included. Errors
/// raised by GDAL are returned as they are; a partially written destination
/// is left behind.
pub fn create_cog<P: AsRef<Path>>(
    src: &Dataset,
    dst_path: P,
    options: &CogOptions,
    progress: Option<&ProgressCallback<'_>>,
) -> Result<()> {
    let dst_path = dst_path.as_ref();
    let staging = MemFile::from_path(unique_mem_path("cogeo-staging", "tif"));
    build_staging(src, staging.path(), options, progress)?;
    copy_layout(staging.path(), dst_path, &options.profile, progress)?;
    debug!("wrote COG to {}", dst_path.display());
    Ok(())
}

/// Convert `src` into a Cloud Optimized GeoTIFF held in a `/vsimem/` file.
pub fn create_cog_in_memory(
    src: &Dataset,
    options: &CogOptions,
    progress: Option<&ProgressCallback<'_>>,
) -> Result<MemFile> {
    let file = MemFile::from_path(unique_mem_path("cogeo", "tif"));
    create_cog(src, file.path(), options, progress)?;
    Ok(file)
}

fn requested_bands(src: &Dataset, options: &CogOptions) -> Result<Vec<usize>> {
    let bands: Vec<usize> = if options.bands.is_empty() {
        (1..=src.raster_count())
            .filter(|&band| Some(band) != options.alpha)
            .collect()
    } else {
        options.bands.clone()
    };
    if bands.is_empty() {
        return Err(GdalError::BadArgument("no source bands to copy".to_string()));
    }
    Ok(bands)
}

fn staging_options(profile: &CogProfile) -> Result<CslStringList> {
    CslStringList::from_pairs(
        profile
            .iter()
            .filter(|(key, _)| LAYOUT_OPTIONS.contains(key))
            .chain([("BIGTIFF", "IF_SAFER")]),
    )
}

fn copy_options(profile: &CogProfile) -> Result<CslStringList> {
    profile.to_csl_string_list(&[("COPY_SRC_OVERVIEWS", "YES"), ("BIGTIFF", "IF_SAFER")])
}

fn copy_georeferencing(src: &Dataset, dst: &mut Dataset) -> Result<()> {
    if let Ok(transform) = src.geo_transform() {
        dst.set_geo_transform(&transform)?;
    }
    let projection = src.projection();
    if !projection.is_empty() {
        dst.set_projection(&projection)?;
    }
    Ok(())
}

/// Write the requested bands, the mask and the overviews into a plain tiled
/// GTiff at `path`.
fn build_staging(
    src: &Dataset,
    path: &Path,
    options: &CogOptions,
    progress: Option<&ProgressCallback<'_>>,
) -> Result<()> {
    let bands = requested_bands(src, options)?;
    for &band in &bands {
        src.rasterband(band)?;
    }
    let first_band = src.rasterband(bands[0])?;
    let data_type = first_band.data_type()?;
    let src_nodata = first_band.no_data_value();
    let size = src.raster_size();

    let _internal_mask = ThreadLocalConfigGuard::set("GDAL_TIFF_INTERNAL_MASK", "YES")?;
    let driver = Driver::get_by_name("GTiff")?;
    let mut staging = driver.create_with_options(
        path,
        size,
        bands.len(),
        data_type,
        &staging_options(&options.profile)?,
    )?;
    copy_georeferencing(src, &mut staging)?;
    if let Some(nodata) = src_nodata {
        for index in 1..=bands.len() {
            staging.rasterband(index)?.set_no_data_value(nodata)?;
        }
    }

    let mask_source = MaskSource::select(src_nodata.or(options.nodata), options.alpha);
    let block_size = staging.rasterband(1)?.block_size();
    debug!(
        "copying bands {bands:?} ({data_type}, {}x{}) in {}x{} blocks, mask from {mask_source:?}",
        size.0, size.1, block_size.0, block_size.1
    );

    let block_progress = ScaledProgress::new(progress, 0.0, BLOCKS_END);
    let mask = match data_type {
        GdalDataType::UInt8 => copy_blocks::<u8>(src, &staging, &bands, mask_source, block_progress),
        GdalDataType::Int8 => copy_blocks::<i8>(src, &staging, &bands, mask_source, block_progress),
        GdalDataType::UInt16 => copy_blocks::<u16>(src, &staging, &bands, mask_source, block_progress),
        GdalDataType::Int16 => copy_blocks::<i16>(src, &staging, &bands, mask_source, block_progress),
        GdalDataType::UInt32 => copy_blocks::<u32>(src, &staging, &bands, mask_source, block_progress),
        GdalDataType::Int32 => copy_blocks::<i32>(src, &staging, &bands, mask_source, block_progress),
        GdalDataType::UInt64 => copy_blocks::<u64>(src, &staging, &bands, mask_source, block_progress),
        GdalDataType::Int64 => copy_blocks::<i64>(src, &staging, &bands, mask_source, block_progress),
        GdalDataType::Float32 => copy_blocks::<f32>(src, &staging, &bands, mask_source, block_progress),
        GdalDataType::Float64 => copy_blocks::<f64>(src, &staging, &bands, mask_source, block_progress),
    }?;

    staging.create_mask_band()?;
    let mut mask_band = staging.rasterband(1)?.open_mask_band()?;
    mask_band.write((0, 0), size, &mask)?;

    let level = options
        .overview_level
        .unwrap_or_else(|| max_overview_level(size, block_size.0.min(block_size.1)));
    let overview_progress = ScaledProgress::new(progress, BLOCKS_END, OVERVIEWS_END - BLOCKS_END);
    if level > 0 {
        let factors = overview_factors(level);
        let _ovr_block_size = options
            .profile
            .block_size()
            .map(|(x, _)| ThreadLocalConfigGuard::set("GDAL_TIFF_OVR_BLOCKSIZE", &x.to_string()))
            .transpose()?;
        debug!(
            "building overviews {factors:?} with {} resampling",
            options.overview_resampling
        );
        staging.build_overviews(
            options.overview_resampling,
            &factors,
            Some(&overview_progress),
        )?;
    }
    overview_progress.report(1.0);

    staging.set_metadata_item(
        OVERVIEW_TAG_KEY,
        &options.overview_resampling.rasterio_code().to_string(),
        OVERVIEW_TAG_DOMAIN,
    )?;
    Ok(())
}

/// Copy every block of `bands` from `src` into the bands of `dst` and
/// return the mask of the whole raster.
fn copy_blocks<T: GdalType>(
    src: &Dataset,
    dst: &Dataset,
    bands: &[usize],
    mask_source: MaskSource,
    progress: ScaledProgress<'_>,
) -> Result<ByteBuffer> {
    let size = src.raster_size();
    let windows = BlockWindows::new(size, dst.rasterband(1)?.block_size());
    let counter = CountingProgress::new(windows.len(), progress);
    let mut mask = ByteBuffer::filled(size, MASKED);

    for ((row, col), window) in windows {
        let blocks = bands
            .iter()
            .map(|&band| {
                src.rasterband(band)?
                    .read_window::<T>(&window, Some(ResampleAlg::Bilinear))
            })
            .collect::<Result<Vec<_>>>()?;
        for (index, block) in blocks.iter().enumerate() {
            dst.rasterband(index + 1)?.write_window(&window, block)?;
        }

        let block_mask = mask_source.block_mask(src, bands[0], &window, &blocks)?;
        mask.paste(&window, &block_mask);
        trace!("copied block ({row}, {col}) {window:?}");
        counter.increment();
    }
    Ok(mask)
}

/// Rewrite the staging file at `staging_path` with the profile's compression
/// so that overviews and mask precede the full resolution data.
fn copy_layout(
    staging_path: &Path,
    dst_path: &Path,
    profile: &CogProfile,
    progress: Option<&ProgressCallback<'_>>,
) -> Result<()> {
    let staging = Dataset::open(staging_path)?;
    let driver = Driver::get_by_name("GTiff")?;
    let creation_options = copy_options(profile)?;
    let _internal_mask = ThreadLocalConfigGuard::set("GDAL_TIFF_INTERNAL_MASK", "YES")?;

    debug!("copying to {} with {creation_options:?}", dst_path.display());
    let copy_progress = ScaledProgress::new(progress, OVERVIEWS_END, 1.0 - OVERVIEWS_END);
    let cog = staging.create_copy(&driver, dst_path, &creation_options, Some(&copy_progress))?;
    // flushed on close
    drop(cog);
    copy_progress.report(1.0);
    Ok(())
}
