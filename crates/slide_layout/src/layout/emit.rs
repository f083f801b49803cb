use super::types::{GroupKind, LayoutPage, LayoutType};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One photo placed into one placeholder slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderAssignment {
    pub token: String,
    pub url: String,
    /// 0-based occurrence of the page within its layout sequence
    pub instance: usize,
}

/// Page number -> slot assignments in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaceholderMapping {
    pages: BTreeMap<u32, Vec<PlaceholderAssignment>>,
}

impl PlaceholderMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, page: u32, assignment: PlaceholderAssignment) {
        self.pages.entry(page).or_default().push(assignment);
    }

    pub fn pages(&self) -> &BTreeMap<u32, Vec<PlaceholderAssignment>> {
        &self.pages
    }

    pub fn page(&self, page: u32) -> &[PlaceholderAssignment] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of assigned slots over all pages
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.values().all(Vec::is_empty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &PlaceholderAssignment)> {
        self.pages
            .iter()
            .flat_map(|(&page, slots)| slots.iter().map(move |a| (page, a)))
    }

    pub fn merge(&mut self, other: PlaceholderMapping) {
        for (page, slots) in other.pages {
            self.pages.entry(page).or_default().extend(slots);
        }
    }

    /// Flat token -> url view.
    ///
    /// Repeated D/E instances share a bare token, so the last one wins here;
    /// use [`PlaceholderMapping::pages`] when every slot matters.
    pub fn token_map(&self) -> BTreeMap<String, String> {
        self.iter()
            .map(|(_, a)| (a.token.clone(), a.url.clone()))
            .collect()
    }
}

/// Substitution key as written in the slide template, e.g. `{{{{ext_a_himg1}}}}`
pub fn template_key(token: &str) -> String {
    ["{{{{", token, "}}}}"].concat()
}

/// Placeholder tokens of one layout instance: (horizontal slots, vertical slots).
///
/// Numbered slots continue across repeated instances (a second A uses
/// himg3/himg4); single-slot layouts reuse the bare token.
pub fn slot_tokens(
    kind: GroupKind,
    layout: LayoutType,
    instance: usize,
) -> (Vec<String>, Vec<String>) {
    let p = kind.prefix();
    let l = layout.token_letter();
    let cap = layout.capacity();
    let numbered = |orient: &str, n: usize| -> Vec<String> {
        (1..=n)
            .map(|i| format!("{p}_{l}_{orient}{}", instance * n + i))
            .collect()
    };
    match layout {
        LayoutType::A => (numbered("himg", cap.horizontal), vec![]),
        LayoutType::B => (vec![], numbered("vimg", cap.vertical)),
        LayoutType::C => (
            vec![format!("{p}_{l}_himg")],
            (1..=cap.vertical).map(|i| format!("{p}_{l}_vimg{i}")).collect(),
        ),
        LayoutType::D => (vec![], vec![format!("{p}_{l}_vimg")]),
        LayoutType::E => (vec![format!("{p}_{l}_himg")], vec![]),
    }
}

/// Fill the placeholders of `pages` from the ordered photo lists.
///
/// Layouts are visited in sequence order and each takes the next unused
/// photos of the orientation it holds. A slot without a photo is an
/// inconsistency between pages and counts; it is logged and left empty.
pub fn emit_placeholders(
    kind: GroupKind,
    pages: &[LayoutPage],
    horizontal: &[&str],
    vertical: &[&str],
) -> PlaceholderMapping {
    let mut mapping = PlaceholderMapping::new();
    let mut instances: HashMap<u32, usize> = HashMap::new();
    let (mut h_next, mut v_next) = (0usize, 0usize);

    for page in pages {
        let counter = instances.entry(page.page_number).or_insert(0);
        let instance = *counter;
        *counter += 1;
        let (h_tokens, v_tokens) = slot_tokens(kind, page.layout, instance);

        for (tokens, images, next, label) in [
            (h_tokens, horizontal, &mut h_next, "horizontal"),
            (v_tokens, vertical, &mut v_next, "vertical"),
        ] {
            for token in tokens {
                let Some(url) = images.get(*next) else {
                    warn!(
                        "No {label} image #{} for {token} on page {}; slot skipped",
                        *next, page.page_number
                    );
                    continue;
                };
                debug!("page {}: {token} -> {url}", page.page_number);
                mapping.push(
                    page.page_number,
                    PlaceholderAssignment {
                        token,
                        url: (*url).to_string(),
                        instance,
                    },
                );
                *next += 1;
            }
        }
    }

    mapping
}
