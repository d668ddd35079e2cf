use crate::cpl::CslStringList;
use crate::dataset::Dataset;
use crate::driver::Driver;
use crate::metadata::Metadata;
use crate::raster::{Buffer, GdalDataType, ResampleAlg, Window};
use crate::test_utils::{MemSource, SuppressGDALErrorLog, TEST_GEO_TRANSFORM};
use crate::vsi::{unique_mem_path, MemFile};

fn tiled_gtiff(size: (usize, usize), block: usize) -> (MemFile, Dataset) {
    let file = MemFile::from_path(unique_mem_path("raster-test", "tif"));
    let options = CslStringList::from_pairs([
        ("TILED", "YES"),
        ("BLOCKXSIZE", &*block.to_string()),
        ("BLOCKYSIZE", &*block.to_string()),
    ])
    .unwrap();
    let dataset = Driver::get_by_name("GTiff")
        .unwrap()
        .create_with_options(file.path(), size, 1, GdalDataType::UInt8, &options)
        .unwrap();
    (file, dataset)
}

#[test]
fn test_open() {
    let (file, dataset) = tiled_gtiff((16, 16), 16);
    drop(dataset);
    assert!(Dataset::open(file.path()).is_ok());

    let _quiet = SuppressGDALErrorLog::new();
    let missing_dataset = Dataset::open("/vsimem/no_such_file.tif");
    assert!(missing_dataset.is_err());
}

#[test]
fn test_get_raster_size_and_count() {
    let dataset = MemSource::new((100, 50), 3).build().unwrap();
    assert_eq!(dataset.raster_size(), (100, 50));
    assert_eq!(dataset.raster_count(), 3);
    assert_eq!(dataset.rasterband(2).unwrap().size(), (100, 50));
}

#[test]
fn test_get_rasterband() {
    let dataset = MemSource::new((10, 10), 1).build().unwrap();
    assert!(dataset.rasterband(1).is_ok());

    let _quiet = SuppressGDALErrorLog::new();
    assert!(dataset.rasterband(0).is_err());
    assert!(dataset.rasterband(2).is_err());
}

#[test]
fn test_georeferencing() {
    let dataset = MemSource::new((10, 10), 1).georeferenced().build().unwrap();
    assert_eq!(dataset.geo_transform().unwrap(), TEST_GEO_TRANSFORM);
    assert!(dataset.projection().starts_with("GEOGCS[\"WGS 84\""));

    let bare = MemSource::new((10, 10), 1).build().unwrap();
    assert!(bare.geo_transform().is_err());
    assert!(bare.projection().is_empty());
}

#[test]
fn test_read_window() {
    let dataset = MemSource::new((10, 6), 1)
        .pixels(|_, col, row| (col + 10 * row) as f64)
        .build()
        .unwrap();
    let rb = dataset.rasterband(1).unwrap();
    let rv = rb
        .read_window::<u8>(&Window::new(2, 1, 3, 2), Some(ResampleAlg::Bilinear))
        .unwrap();
    assert_eq!(rv.size, (3, 2));
    assert_eq!(rv.data, vec![12, 13, 14, 22, 23, 24]);

    let mut buf = rv;
    rb.read_into_slice((2, 1), (3, 2), (3, 2), &mut buf.data, None)
        .unwrap();
    assert_eq!(buf.data, vec![12, 13, 14, 22, 23, 24]);
}

#[test]
fn test_read_raster_with_average_resample() {
    let dataset = MemSource::new((4, 4), 1)
        .data_type(GdalDataType::Float32)
        .pixels(|_, col, _| col as f64)
        .build()
        .unwrap();
    let rb = dataset.rasterband(1).unwrap();
    let rv = rb
        .read_as::<f32>((0, 0), (4, 4), (2, 2), Some(ResampleAlg::Average))
        .unwrap();
    assert_eq!(rv.data, vec![0.5, 2.5, 0.5, 2.5]);
}

#[test]
fn test_read_buffer_length_mismatch() {
    let dataset = MemSource::new((4, 4), 1).build().unwrap();
    let rb = dataset.rasterband(1).unwrap();
    let mut data = vec![0u8; 3];
    assert!(rb
        .read_into_slice((0, 0), (2, 2), (2, 2), &mut data, None)
        .is_err());
}

#[test]
fn test_write_raster() {
    let (file, dataset) = tiled_gtiff((64, 64), 32);
    {
        let mut rb = dataset.rasterband(1).unwrap();
        let block = Buffer::new((2, 2), vec![1u8, 2, 3, 4]);
        rb.write_window(&Window::new(31, 31, 2, 2), &block).unwrap();
    }
    drop(dataset);

    let dataset = Dataset::open(file.path()).unwrap();
    let rb = dataset.rasterband(1).unwrap();
    let rv = rb.read_as::<u8>((30, 30), (4, 4), (4, 4), None).unwrap();
    assert_eq!(
        rv.data,
        vec![0, 0, 0, 0, 0, 1, 2, 0, 0, 3, 4, 0, 0, 0, 0, 0]
    );
}

#[test]
fn test_get_rasterband_block_size() {
    let (_file, dataset) = tiled_gtiff((100, 100), 32);
    assert_eq!(dataset.rasterband(1).unwrap().block_size(), (32, 32));
}

#[test]
fn test_get_band_type() {
    let dataset = MemSource::new((4, 4), 1)
        .data_type(GdalDataType::Int16)
        .build()
        .unwrap();
    let rb = dataset.rasterband(1).unwrap();
    assert_eq!(rb.data_type().unwrap(), GdalDataType::Int16);
    assert_eq!(rb.band_type(), GdalDataType::Int16.gdal_ordinal());
}

#[test]
fn test_no_data_value() {
    let dataset = MemSource::new((4, 4), 1).build().unwrap();
    let mut rb = dataset.rasterband(1).unwrap();
    assert_eq!(rb.no_data_value(), None);
    rb.set_no_data_value(3.0).unwrap();
    assert_eq!(rb.no_data_value(), Some(3.0));

    let dataset = MemSource::new((4, 4), 1).nodata(0.0).build().unwrap();
    assert_eq!(dataset.rasterband(1).unwrap().no_data_value(), Some(0.0));
}

#[test]
fn mask_flags() {
    let dataset = MemSource::new((8, 8), 1).build().unwrap();
    let mask_flags = dataset.rasterband(1).unwrap().mask_flags();
    assert!(mask_flags.is_all_valid());
    assert!(!mask_flags.is_nodata());
    assert!(!mask_flags.is_per_dataset());

    let dataset = MemSource::new((8, 8), 1).nodata(1.0).build().unwrap();
    assert!(dataset.rasterband(1).unwrap().mask_flags().is_nodata());

    let dataset = MemSource::new((8, 8), 2).mask(|_, _| true).build().unwrap();
    let mask_flags = dataset.rasterband(2).unwrap().mask_flags();
    assert!(mask_flags.is_per_dataset());
    assert!(!mask_flags.is_all_valid());
}

#[test]
fn open_mask_band() {
    let dataset = MemSource::new((4, 2), 1)
        .mask(|col, _| col < 2)
        .build()
        .unwrap();
    let mb = dataset.rasterband(1).unwrap().open_mask_band().unwrap();
    let mask_values = mb.read_band_as::<u8>().unwrap();
    assert_eq!(mask_values.data, vec![255, 255, 0, 0, 255, 255, 0, 0]);
}

#[test]
fn create_mask_band() {
    let driver = Driver::get_by_name("MEM").unwrap();
    let dataset = driver.create("", (20, 10), 1, GdalDataType::UInt8).unwrap();
    let mut rb = dataset.rasterband(1).unwrap();
    rb.create_mask_band(false).unwrap();

    let mb = rb.open_mask_band().unwrap();
    let mask_values = mb.read_as::<u8>((0, 0), (20, 10), (20, 10), None).unwrap();
    assert_eq!(mask_values.data, [0; 200])
}

#[test]
fn test_build_and_read_overviews() {
    let (_file, mut dataset) = tiled_gtiff((100, 50), 32);
    dataset
        .build_overviews(ResampleAlg::NearestNeighbour, &[2, 4], None)
        .unwrap();

    let rasterband = dataset.rasterband(1).unwrap();
    assert_eq!(rasterband.overview_count(), 2);
    let overview_2 = rasterband.overview(0).unwrap();
    let overview_4 = rasterband.overview(1).unwrap();
    assert_eq!(overview_2.size(), (50, 25));
    assert_eq!(overview_4.size(), (25, 13));
}

#[test]
fn test_fail_read_overviews() {
    let dataset = MemSource::new((10, 10), 1).build().unwrap();
    let rasterband = dataset.rasterband(1).unwrap();
    assert_eq!(rasterband.overview_count(), 0);

    let _quiet = SuppressGDALErrorLog::new();
    assert!(rasterband.overview(0).is_err());
}

#[test]
fn test_rasterband_lifetime() {
    let (_file, mut dataset) = tiled_gtiff((64, 64), 32);
    dataset
        .build_overviews(ResampleAlg::Average, &[2], None)
        .unwrap();

    let overview = {
        let rasterband = dataset.rasterband(1).unwrap();
        rasterband.overview(0).unwrap()
    };
    assert!(overview.no_data_value().is_none());
}

#[test]
fn test_metadata_item() {
    let mut dataset = MemSource::new((4, 4), 1).build().unwrap();
    assert_eq!(dataset.metadata_item("RESAMPLING", "rio_overview"), None);
    dataset
        .set_metadata_item("RESAMPLING", "0", "rio_overview")
        .unwrap();
    assert_eq!(
        dataset.metadata_item("RESAMPLING", "rio_overview"),
        Some("0".to_string())
    );
    assert_eq!(dataset.metadata_item("RESAMPLING", ""), None);

    let mut rb = dataset.rasterband(1).unwrap();
    rb.set_metadata_item("NAME", "red", "").unwrap();
    assert_eq!(rb.metadata_item("NAME", ""), Some("red".to_string()));
}

#[test]
fn test_driver_short_name() {
    let dataset = MemSource::new((4, 4), 1).build().unwrap();
    assert_eq!(dataset.driver().short_name(), "MEM");
    assert_eq!(Driver::get_by_name("GTiff").unwrap().short_name(), "GTiff");

    let _quiet = SuppressGDALErrorLog::new();
    assert!(Driver::get_by_name("NOT_A_DRIVER").is_err());
}
