use crate::constants::{
    EXTERIOR_FIRST_PAGE, INTERIOR_FIRST_PAGE, MAX_GROUP_IMAGES, MIN_GROUP_IMAGES,
};
use crate::error::{LayoutError, Result};
use crate::orientation::{Orientation, OrientationMap, orientation_at};

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Slide layout template
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
pub enum LayoutType {
    A, // 2 horizontal
    B, // 4 vertical
    C, // 1 horizontal + 2 vertical
    D, // 1 vertical
    E, // 1 horizontal
}

/// Photos one layout instance holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capacity {
    pub horizontal: usize,
    pub vertical: usize,
}

impl LayoutType {
    pub const fn capacity(self) -> Capacity {
        let (horizontal, vertical) = match self {
            LayoutType::A => (2, 0),
            LayoutType::B => (0, 4),
            LayoutType::C => (1, 2),
            LayoutType::D => (0, 1),
            LayoutType::E => (1, 0),
        };
        Capacity {
            horizontal,
            vertical,
        }
    }

    /// Lowercase letter used inside placeholder tokens
    pub fn token_letter(self) -> char {
        match self {
            LayoutType::A => 'a',
            LayoutType::B => 'b',
            LayoutType::C => 'c',
            LayoutType::D => 'd',
            LayoutType::E => 'e',
        }
    }

    fn page_offset(self) -> u32 {
        match self {
            LayoutType::A => 0,
            LayoutType::B => 1,
            LayoutType::C => 2,
            LayoutType::D => 3,
            LayoutType::E => 4,
        }
    }
}

/// Exterior or interior photo set
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GroupKind {
    Exterior,
    Interior,
}

impl GroupKind {
    pub fn prefix(self) -> &'static str {
        match self {
            GroupKind::Exterior => "ext",
            GroupKind::Interior => "int",
        }
    }

    fn first_page(self) -> u32 {
        match self {
            GroupKind::Exterior => EXTERIOR_FIRST_PAGE,
            GroupKind::Interior => INTERIOR_FIRST_PAGE,
        }
    }

    /// Template page holding `layout` for this group (exterior 7..=11, interior 12..=16)
    pub fn page_number(self, layout: LayoutType) -> u32 {
        self.first_page() + layout.page_offset()
    }

    /// Inverse of [`GroupKind::page_number`]
    pub fn layout_for_page(self, page: u32) -> Option<LayoutType> {
        LayoutType::iter().find(|&l| self.page_number(l) == page)
    }

    /// All layout pages owned by this group
    pub fn pages(self) -> RangeInclusive<u32> {
        self.page_number(LayoutType::A)..=self.page_number(LayoutType::E)
    }
}

/// A classified upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageItem {
    pub url: String,
    pub orientation: Orientation,
}

impl ImageItem {
    pub fn new(url: impl Into<String>, orientation: Orientation) -> Self {
        Self {
            url: url.into(),
            orientation,
        }
    }
}

/// Ordered photos of one group, 2..=6 of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageGroup {
    kind: GroupKind,
    images: Vec<ImageItem>,
}

impl ImageGroup {
    pub fn new(kind: GroupKind, images: Vec<ImageItem>) -> Result<Self> {
        if !(MIN_GROUP_IMAGES..=MAX_GROUP_IMAGES).contains(&images.len()) {
            let vertical = images.iter().filter(|i| i.orientation.is_vertical()).count();
            return Err(LayoutError::UnsupportedDistribution {
                horizontal: images.len() - vertical,
                vertical,
            });
        }
        Ok(Self { kind, images })
    }

    /// Build from persisted upload order and orientation map; gaps are horizontal.
    pub fn from_urls(
        kind: GroupKind,
        urls: &[String],
        orientations: &OrientationMap,
    ) -> Result<Self> {
        let images = urls
            .iter()
            .enumerate()
            .map(|(i, url)| ImageItem::new(url.clone(), orientation_at(orientations, i)))
            .collect();
        Self::new(kind, images)
    }

    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    pub fn images(&self) -> &[ImageItem] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// (horizontal, vertical) with square counted as horizontal
    pub fn counts(&self) -> (usize, usize) {
        let vertical = self
            .images
            .iter()
            .filter(|i| i.orientation.is_vertical())
            .count();
        (self.images.len() - vertical, vertical)
    }

    /// Horizontal and vertical URLs, each in upload order
    pub fn split(&self) -> (Vec<&str>, Vec<&str>) {
        let (vertical, horizontal): (Vec<&ImageItem>, Vec<&ImageItem>) = self
            .images
            .iter()
            .partition(|i| i.orientation.is_vertical());
        (
            horizontal.into_iter().map(|i| i.url.as_str()).collect(),
            vertical.into_iter().map(|i| i.url.as_str()).collect(),
        )
    }
}

/// One instance of a layout placed on a template page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutPage {
    pub layout: LayoutType,
    pub page_number: u32,
}

impl LayoutPage {
    pub fn capacity(&self) -> Capacity {
        self.layout.capacity()
    }
}
