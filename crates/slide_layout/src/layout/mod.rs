//! Photo -> slide layout assignment.
//!
//! [`assign_group`] classifies counts, picks the layout sequence from the
//! fixed table and fills the placeholder slots. [`regenerate_group`] replays
//! a stored page sequence so a later document generation reproduces the
//! same mapping without classifying again.

pub mod emit;
pub mod special;
pub mod table;
pub mod types;

pub use emit::{PlaceholderAssignment, PlaceholderMapping, emit_placeholders, template_key};
pub use special::SpecialImages;
pub use table::{place_layouts, select_layouts};
pub use types::{Capacity, GroupKind, ImageGroup, ImageItem, LayoutPage, LayoutType};

use crate::error::{LayoutError, Result};
use crate::orientation::OrientationMap;

use itertools::Itertools;
use log::{info, warn};
use serde::{Deserialize, Serialize};

/// Result of laying out one image group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupLayout {
    pub kind: GroupKind,
    pub layouts: Vec<LayoutType>,
    pub pages: Vec<LayoutPage>,
    pub mapping: PlaceholderMapping,
}

impl GroupLayout {
    /// Page sequence as persisted (`exteriorLayoutPages` / `interiorLayoutPages`)
    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.iter().map(|p| p.page_number).collect()
    }

    /// Summed capacity of all placed layouts
    pub fn capacity(&self) -> Capacity {
        pages_capacity(&self.pages)
    }
}

fn pages_capacity(pages: &[LayoutPage]) -> Capacity {
    pages.iter().fold(Capacity::default(), |acc, p| Capacity {
        horizontal: acc.horizontal + p.capacity().horizontal,
        vertical: acc.vertical + p.capacity().vertical,
    })
}

/// Select layouts for `group` and map every photo to a placeholder.
///
/// # Errors
/// `UnsupportedDistribution` when the orientation counts are not in the table.
pub fn assign_group(group: &ImageGroup) -> Result<GroupLayout> {
    let kind = group.kind();
    let (h, v) = group.counts();
    let layouts = select_layouts(h, v)?;
    let pages = place_layouts(kind, layouts);
    let (horizontal, vertical) = group.split();
    let mapping = emit_placeholders(kind, &pages, &horizontal, &vertical);

    info!(
        "{kind}: {h} horizontal, {v} vertical -> [{}] (pages {})",
        layouts.iter().join(", "),
        pages.iter().map(|p| p.page_number).join(", ")
    );

    Ok(GroupLayout {
        kind,
        layouts: layouts.to_vec(),
        pages,
        mapping,
    })
}

/// Rebuild a group layout from persisted state.
///
/// Page numbers that do not belong to `kind` are logged and ignored.
///
/// # Errors
/// `UnsupportedDistribution` when the group size is out of range or the
/// stored pages do not hold exactly the group's orientation counts.
pub fn regenerate_group(
    kind: GroupKind,
    urls: &[String],
    orientations: &OrientationMap,
    stored_pages: &[u32],
) -> Result<GroupLayout> {
    let group = ImageGroup::from_urls(kind, urls, orientations)?;
    let pages: Vec<LayoutPage> = stored_pages
        .iter()
        .filter_map(|&page_number| match kind.layout_for_page(page_number) {
            Some(layout) => Some(LayoutPage {
                layout,
                page_number,
            }),
            None => {
                warn!("{kind}: page {page_number} is not a layout page, ignored");
                None
            }
        })
        .collect();

    let (h, v) = group.counts();
    let capacity = pages_capacity(&pages);
    if capacity != (Capacity { horizontal: h, vertical: v }) {
        warn!(
            "{kind}: stored pages {stored_pages:?} hold {}h/{}v, group has {h}h/{v}v",
            capacity.horizontal, capacity.vertical
        );
        return Err(LayoutError::UnsupportedDistribution {
            horizontal: h,
            vertical: v,
        });
    }

    let (horizontal, vertical) = group.split();
    let mapping = emit_placeholders(kind, &pages, &horizontal, &vertical);

    Ok(GroupLayout {
        kind,
        layouts: pages.iter().map(|p| p.layout).collect(),
        pages,
        mapping,
    })
}
