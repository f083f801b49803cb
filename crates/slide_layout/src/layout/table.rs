use super::types::{GroupKind, LayoutPage, LayoutType};
use crate::error::{LayoutError, Result};

use LayoutType::{A, B, C, D, E};

/// Layout sequence for `horizontal` + `vertical` photos.
///
/// This is a curated table, not a packing: dense layouts (A, B) are
/// preferred over single-photo ones (D, E), and the order of the returned
/// slice is the order in which photos are consumed.
///
/// # Errors
/// `UnsupportedDistribution` for any pair whose total is outside 2..=6.
pub fn select_layouts(horizontal: usize, vertical: usize) -> Result<&'static [LayoutType]> {
    let layouts: &'static [LayoutType] = match (horizontal, vertical) {
        // 2
        (2, 0) => &[A],
        (1, 1) => &[D, E],
        (0, 2) => &[D, D],
        // 3
        (3, 0) => &[A, E],
        (2, 1) => &[A, D],
        (1, 2) => &[C],
        (0, 3) => &[D, D, D],
        // 4
        (4, 0) => &[A, A],
        (3, 1) => &[A, D, E],
        (2, 2) => &[C, E],
        (1, 3) => &[C, D],
        (0, 4) => &[B],
        // 5
        (5, 0) => &[A, A, E],
        (4, 1) => &[A, A, D],
        (3, 2) => &[A, C],
        (2, 3) => &[C, D, E],
        (1, 4) => &[B, E],
        (0, 5) => &[B, D],
        // 6
        (6, 0) => &[A, A, A],
        (5, 1) => &[A, A, D, E],
        (4, 2) => &[A, A, D, D],
        (3, 3) => &[A, C, D],
        (2, 4) => &[A, B],
        (1, 5) => &[B, D, E],
        (0, 6) => &[B, D, D],
        _ => {
            return Err(LayoutError::UnsupportedDistribution {
                horizontal,
                vertical,
            });
        }
    };
    Ok(layouts)
}

/// Stamp each layout with its template page; repeats share a page number.
pub fn place_layouts(kind: GroupKind, layouts: &[LayoutType]) -> Vec<LayoutPage> {
    layouts
        .iter()
        .map(|&layout| LayoutPage {
            layout,
            page_number: kind.page_number(layout),
        })
        .collect()
}
