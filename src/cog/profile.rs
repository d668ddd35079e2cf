use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::cpl::CslStringList;
use crate::errors::{GdalError, Result};

pub const DEFAULT_BLOCK_SIZE: usize = 512;

/// Named compression presets for COG output.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ProfileName {
    /// JPEG compression in the YCbCr color space, for 3-band 8-bit imagery.
    Ycbcr,
    Jpeg,
    Webp,
    Zstd,
    Lzw,
    #[default]
    Deflate,
    Packbits,
    /// No compression.
    Raw,
}

impl ProfileName {
    pub const ALL: [ProfileName; 8] = [
        ProfileName::Ycbcr,
        ProfileName::Jpeg,
        ProfileName::Webp,
        ProfileName::Zstd,
        ProfileName::Lzw,
        ProfileName::Deflate,
        ProfileName::Packbits,
        ProfileName::Raw,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ProfileName::Ycbcr => "ycbcr",
            ProfileName::Jpeg => "jpeg",
            ProfileName::Webp => "webp",
            ProfileName::Zstd => "zstd",
            ProfileName::Lzw => "lzw",
            ProfileName::Deflate => "deflate",
            ProfileName::Packbits => "packbits",
            ProfileName::Raw => "raw",
        }
    }

    fn compression_options(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ProfileName::Ycbcr => &[("COMPRESS", "JPEG"), ("PHOTOMETRIC", "YCbCr")],
            ProfileName::Jpeg => &[("COMPRESS", "JPEG")],
            ProfileName::Webp => &[("COMPRESS", "WEBP")],
            ProfileName::Zstd => &[("COMPRESS", "ZSTD")],
            ProfileName::Lzw => &[("COMPRESS", "LZW")],
            ProfileName::Deflate => &[("COMPRESS", "DEFLATE")],
            ProfileName::Packbits => &[("COMPRESS", "PACKBITS")],
            ProfileName::Raw => &[("COMPRESS", "NONE")],
        }
    }
}

impl Display for ProfileName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileName {
    type Err = GdalError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase();
        ProfileName::ALL
            .into_iter()
            .find(|name| name.as_str() == lowered)
            .ok_or_else(|| GdalError::BadArgument(format!("unknown COG profile '{s}'")))
    }
}

/// GTiff creation options for the output.
///
/// Options are kept in insertion order; setting a key again replaces its
/// value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CogProfile {
    options: Vec<(String, String)>,
}

impl CogProfile {
    /// A profile with no options at all, not even tiling.
    pub fn empty() -> Self {
        CogProfile {
            options: Vec::new(),
        }
    }

    /// The preset `name`, tiled in 512x512 blocks with pixel interleaving.
    pub fn named(name: ProfileName) -> Self {
        let mut profile = CogProfile::empty();
        profile.set("TILED", "YES");
        profile.set_block_size(DEFAULT_BLOCK_SIZE);
        for (key, value) in name.compression_options() {
            profile.set(key, value);
        }
        profile.set("INTERLEAVE", "PIXEL");
        profile
    }

    /// Set `key` to `value`. Keys are case-insensitive and stored upper case.
    pub fn set(&mut self, key: &str, value: &str) -> &mut Self {
        let key = key.to_ascii_uppercase();
        match self.options.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value.to_string(),
            None => self.options.push((key, value.to_string())),
        }
        self
    }

    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// Parse and apply a `KEY=VALUE` creation option.
    pub fn set_creation_option(&mut self, option: &str) -> Result<&mut Self> {
        let (key, value) = option.split_once('=').ok_or_else(|| {
            GdalError::BadArgument(format!("creation option '{option}' is not KEY=VALUE"))
        })?;
        Ok(self.set(key.trim(), value.trim()))
    }

    /// Square blocks of `size` pixels.
    pub fn set_block_size(&mut self, size: usize) -> &mut Self {
        let size = size.to_string();
        self.set("BLOCKXSIZE", &size);
        self.set("BLOCKYSIZE", &size)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        let key = key.to_ascii_uppercase();
        self.options
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The requested block size, if the profile is tiled.
    pub fn block_size(&self) -> Option<(usize, usize)> {
        if !self.get("TILED").is_some_and(|v| v.eq_ignore_ascii_case("YES")) {
            return None;
        }
        let dim = |key: &str| {
            self.get(key)
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(256)
        };
        Some((dim("BLOCKXSIZE"), dim("BLOCKYSIZE")))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.options.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render as GDAL creation options, with `extra` options appended.
    pub fn to_csl_string_list(&self, extra: &[(&str, &str)]) -> Result<CslStringList> {
        CslStringList::from_pairs(self.iter().chain(extra.iter().copied()))
    }
}

impl Default for CogProfile {
    fn default() -> Self {
        CogProfile::named(ProfileName::default())
    }
}

impl From<ProfileName> for CogProfile {
    fn from(name: ProfileName) -> Self {
        CogProfile::named(name)
    }
}
