use std::fmt::{Display, Formatter};
use std::str::FromStr;

use gdal_sys::GDALRIOResampleAlg;

use crate::errors::GdalError;

/// Resampling kernels shared by windowed reads and overview building.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ResampleAlg {
    /// Nearest neighbour
    #[default]
    NearestNeighbour,
    /// Bilinear (2x2 kernel)
    Bilinear,
    /// Cubic Convolution Approximation (4x4 kernel)
    Cubic,
    /// Cubic B-Spline Approximation (4x4 kernel)
    CubicSpline,
    /// Lanczos windowed sinc interpolation (6x6 kernel)
    Lanczos,
    /// Average
    Average,
    /// Mode (selects the value which appears most often of all the sampled points)
    Mode,
    /// Gauss blurring
    Gauss,
}

impl ResampleAlg {
    pub const ALL: [ResampleAlg; 8] = [
        ResampleAlg::NearestNeighbour,
        ResampleAlg::Bilinear,
        ResampleAlg::Cubic,
        ResampleAlg::CubicSpline,
        ResampleAlg::Lanczos,
        ResampleAlg::Average,
        ResampleAlg::Mode,
        ResampleAlg::Gauss,
    ];

    /// Kernel for `GDALRasterIOEx` reads.
    pub fn to_gdal(&self) -> GDALRIOResampleAlg::Type {
        match self {
            ResampleAlg::NearestNeighbour => GDALRIOResampleAlg::GRIORA_NearestNeighbour,
            ResampleAlg::Bilinear => GDALRIOResampleAlg::GRIORA_Bilinear,
            ResampleAlg::Cubic => GDALRIOResampleAlg::GRIORA_Cubic,
            ResampleAlg::CubicSpline => GDALRIOResampleAlg::GRIORA_CubicSpline,
            ResampleAlg::Lanczos => GDALRIOResampleAlg::GRIORA_Lanczos,
            ResampleAlg::Average => GDALRIOResampleAlg::GRIORA_Average,
            ResampleAlg::Mode => GDALRIOResampleAlg::GRIORA_Mode,
            ResampleAlg::Gauss => GDALRIOResampleAlg::GRIORA_Gauss,
        }
    }

    /// Name understood by `GDALBuildOverviews`.
    pub fn overview_name(&self) -> &'static str {
        match self {
            ResampleAlg::NearestNeighbour => "NEAREST",
            ResampleAlg::Bilinear => "BILINEAR",
            ResampleAlg::Cubic => "CUBIC",
            ResampleAlg::CubicSpline => "CUBICSPLINE",
            ResampleAlg::Lanczos => "LANCZOS",
            ResampleAlg::Average => "AVERAGE",
            ResampleAlg::Mode => "MODE",
            ResampleAlg::Gauss => "GAUSS",
        }
    }

    /// Numeric code rasterio assigns to the method; rio-cogeo readers expect
    /// it in the `rio_overview` tag.
    pub fn rasterio_code(&self) -> u8 {
        match self {
            ResampleAlg::NearestNeighbour => 0,
            ResampleAlg::Bilinear => 1,
            ResampleAlg::Cubic => 2,
            ResampleAlg::CubicSpline => 3,
            ResampleAlg::Lanczos => 4,
            ResampleAlg::Average => 5,
            ResampleAlg::Mode => 6,
            ResampleAlg::Gauss => 7,
        }
    }

    fn short_name(&self) -> &'static str {
        match self {
            ResampleAlg::NearestNeighbour => "nearest",
            ResampleAlg::Bilinear => "bilinear",
            ResampleAlg::Cubic => "cubic",
            ResampleAlg::CubicSpline => "cubic_spline",
            ResampleAlg::Lanczos => "lanczos",
            ResampleAlg::Average => "average",
            ResampleAlg::Mode => "mode",
            ResampleAlg::Gauss => "gauss",
        }
    }
}

impl Display for ResampleAlg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for ResampleAlg {
    type Err = GdalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        let name = match lowered.as_str() {
            "nearestneighbour" | "near" => "nearest",
            "cubicspline" => "cubic_spline",
            other => other,
        };
        ResampleAlg::ALL
            .into_iter()
            .find(|alg| alg.short_name() == name)
            .ok_or_else(|| GdalError::BadArgument(format!("unknown resampling method '{s}'")))
    }
}
