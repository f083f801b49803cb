use crate::constants::{HORIZONTAL_MIN_RATIO, VERTICAL_MAX_RATIO};
use crate::error::{LayoutError, Result};

use image::ImageReader;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Cursor;
use std::path::Path;
use strum_macros::{Display, EnumString};

/// Photo orientation derived from the pixel aspect ratio
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Orientation {
    #[default]
    Horizontal,
    Vertical,
    Square,
}

/// Persisted orientations keyed by upload index ("0", "1", ...)
pub type OrientationMap = BTreeMap<String, Orientation>;

impl Orientation {
    /// Classify by `width / height`.
    ///
    /// Ratios above 1.05 are horizontal, below 0.95 vertical, anything in
    /// between (inclusive) is square.
    pub fn from_dimensions(width: u32, height: u32) -> Self {
        let ratio = width as f64 / height as f64;
        if ratio > HORIZONTAL_MIN_RATIO {
            Orientation::Horizontal
        } else if ratio < VERTICAL_MAX_RATIO {
            Orientation::Vertical
        } else {
            Orientation::Square
        }
    }

    /// Layout selection only distinguishes vertical photos; square counts as horizontal.
    pub fn is_vertical(self) -> bool {
        matches!(self, Orientation::Vertical)
    }
}

/// Orientation of the image at `index`, horizontal when nothing was recorded
pub fn orientation_at(map: &OrientationMap, index: usize) -> Orientation {
    match map.get(&index.to_string()) {
        Some(&o) => o,
        None => {
            debug!("No orientation recorded for image #{index}, assuming horizontal");
            Orientation::Horizontal
        }
    }
}

/// Reads only the header of an image file.
/// Unreadable files fall back to horizontal.
pub fn detect_file_orientation<P: AsRef<Path>>(path: P) -> Orientation {
    let path = path.as_ref();
    match image::image_dimensions(path) {
        Ok((w, h)) => {
            let o = Orientation::from_dimensions(w, h);
            debug!("{}: {w}x{h} -> {o}", path.display());
            o
        }
        Err(e) => {
            warn!(
                "Could not read dimensions of {}: {e}; defaulting to horizontal",
                path.display()
            );
            Orientation::Horizontal
        }
    }
}

/// Same as [`detect_file_orientation`] for an in-memory upload
pub fn detect_bytes_orientation(bytes: &[u8]) -> Orientation {
    match read_dimensions(bytes) {
        Ok((w, h)) => Orientation::from_dimensions(w, h),
        Err(e) => {
            warn!("Could not read image dimensions: {e}; defaulting to horizontal");
            Orientation::Horizontal
        }
    }
}

fn read_dimensions(bytes: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    reader.into_dimensions().map_err(LayoutError::from)
}

/// Classify a list of local files in upload order
pub fn classify_files<P: AsRef<Path>>(paths: &[P]) -> OrientationMap {
    paths
        .iter()
        .enumerate()
        .map(|(i, p)| (i.to_string(), detect_file_orientation(p)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::str::FromStr;
    use tempfile::TempDir;

    fn png_bytes(w: u32, h: u32) -> Vec<u8> {
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(RgbImage::new(w, h))
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn test_ratio_thresholds() {
        assert_eq!(Orientation::from_dimensions(1600, 900), Orientation::Horizontal);
        assert_eq!(Orientation::from_dimensions(900, 1600), Orientation::Vertical);
        assert_eq!(Orientation::from_dimensions(1000, 1000), Orientation::Square);
        // boundaries are square
        assert_eq!(Orientation::from_dimensions(105, 100), Orientation::Square);
        assert_eq!(Orientation::from_dimensions(95, 100), Orientation::Square);
        assert_eq!(Orientation::from_dimensions(106, 100), Orientation::Horizontal);
        assert_eq!(Orientation::from_dimensions(94, 100), Orientation::Vertical);
        // degenerate headers
        assert_eq!(Orientation::from_dimensions(640, 0), Orientation::Horizontal);
        assert_eq!(Orientation::from_dimensions(0, 0), Orientation::Square);
        assert_eq!(Orientation::from_dimensions(0, 480), Orientation::Vertical);
    }

    #[test]
    fn test_square_folds_into_horizontal() {
        assert!(!Orientation::Square.is_vertical());
        assert!(!Orientation::Horizontal.is_vertical());
        assert!(Orientation::Vertical.is_vertical());
    }

    #[test]
    fn test_orientation_at_defaults_to_horizontal() {
        let mut map = OrientationMap::new();
        map.insert("1".to_string(), Orientation::Vertical);
        assert_eq!(orientation_at(&map, 0), Orientation::Horizontal);
        assert_eq!(orientation_at(&map, 1), Orientation::Vertical);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Orientation::Square).unwrap();
        assert_eq!(json, "\"square\"");
        let map: OrientationMap =
            serde_json::from_str(r#"{"0":"vertical","1":"horizontal"}"#).unwrap();
        assert_eq!(map["0"], Orientation::Vertical);
        assert_eq!(Orientation::from_str("vertical").unwrap(), Orientation::Vertical);
        assert_eq!(Orientation::Horizontal.to_string(), "horizontal");
    }

    #[test]
    fn test_detect_bytes() {
        assert_eq!(detect_bytes_orientation(&png_bytes(40, 20)), Orientation::Horizontal);
        assert_eq!(detect_bytes_orientation(&png_bytes(20, 40)), Orientation::Vertical);
        assert_eq!(detect_bytes_orientation(&png_bytes(30, 30)), Orientation::Square);
    }

    #[test]
    fn test_undecodable_bytes_default_to_horizontal() {
        assert_eq!(
            detect_bytes_orientation(b"definitely not an image"),
            Orientation::Horizontal
        );
    }

    #[test]
    fn test_classify_files_in_upload_order() {
        let dir = TempDir::new().unwrap();
        let tall = dir.path().join("tall.png");
        let wide = dir.path().join("wide.png");
        let missing = dir.path().join("missing.png");
        RgbImage::new(10, 30).save(&tall).unwrap();
        RgbImage::new(30, 10).save(&wide).unwrap();

        let map = classify_files(&[tall, wide, missing]);
        assert_eq!(map.len(), 3);
        assert_eq!(map["0"], Orientation::Vertical);
        assert_eq!(map["1"], Orientation::Horizontal);
        assert_eq!(map["2"], Orientation::Horizontal);
    }
}
