use crate::error::{LayoutError, Result};
use crate::layout::{GroupKind, template_key};
use crate::orientation::Orientation;
use crate::project::{LayoutPlan, ProjectDetails};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Brochure sections a user can switch on or off
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
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum Section {
    ProjectOverview,
    CityDescription,
    BuildingLayout,
    Amenities,
    Description,
    ExteriorPhotos,
    InteriorPhotos,
    FloorPlan,
    EnergyCertificate,
    TermsConditions,
}

const HORIZONTAL_TITLE_PAGE: u32 = 1;
const VERTICAL_TITLE_PAGE: u32 = 2;

impl Section {
    /// Template pages (1-based) owned by the section
    pub fn pages(self) -> Vec<u32> {
        match self {
            Section::ProjectOverview => vec![HORIZONTAL_TITLE_PAGE, VERTICAL_TITLE_PAGE],
            Section::CityDescription => vec![3],
            Section::BuildingLayout => vec![4],
            Section::Amenities => vec![5],
            Section::Description => vec![6],
            Section::ExteriorPhotos => GroupKind::Exterior.pages().collect(),
            Section::InteriorPhotos => GroupKind::Interior.pages().collect(),
            Section::FloorPlan => vec![17],
            Section::EnergyCertificate => vec![18],
            Section::TermsConditions => vec![19],
        }
    }

    fn photo_group(self) -> Option<GroupKind> {
        match self {
            Section::ExteriorPhotos => Some(GroupKind::Exterior),
            Section::InteriorPhotos => Some(GroupKind::Interior),
            _ => None,
        }
    }
}

/// Parse configured section names
pub fn parse_sections<S: AsRef<str>>(names: &[S]) -> Result<BTreeSet<Section>> {
    names
        .iter()
        .map(|n| {
            let n = n.as_ref();
            Section::from_str(n.trim()).map_err(|_| LayoutError::UnknownSection(n.to_string()))
        })
        .collect()
}

/// Selected sections from a stored `selected_pages` map; unknown names are ignored
pub fn selected_sections(selected_pages: &BTreeMap<String, bool>) -> BTreeSet<Section> {
    selected_pages
        .iter()
        .filter(|(_, on)| **on)
        .filter_map(|(name, _)| match Section::from_str(name) {
            Ok(s) => Some(s),
            Err(_) => {
                warn!("Ignoring unknown section '{name}'");
                None
            }
        })
        .collect()
}

/// Template pages to remove from the generated document.
///
/// Unselected sections lose all their pages. Selected photo sections keep
/// only the layout pages the plan uses, and the title section keeps the
/// page matching the title photo orientation.
pub fn pages_to_delete(
    selected: &BTreeSet<Section>,
    plan: &LayoutPlan,
    title_orientation: Orientation,
) -> BTreeSet<u32> {
    let mut delete = BTreeSet::new();
    for section in Section::iter() {
        if !selected.contains(&section) {
            delete.extend(section.pages());
            continue;
        }
        if section == Section::ProjectOverview {
            delete.insert(if title_orientation.is_vertical() {
                HORIZONTAL_TITLE_PAGE
            } else {
                VERTICAL_TITLE_PAGE
            });
        } else if let Some(kind) = section.photo_group() {
            let used = plan.layout_pages(kind);
            delete.extend(section.pages().into_iter().filter(|p| !used.contains(p)));
        }
    }
    delete
}

/// One batch-update request for the presentation service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DocumentRequest {
    ReplaceAllText {
        contains_text: String,
        replace_text: String,
        match_case: bool,
    },
    ReplaceImage {
        page_number: u32,
        placeholder: String,
        image_url: String,
    },
    DeletePage {
        page_number: u32,
    },
}

/// Text replacements, then image replacements, then page deletions.
///
/// Images on pages that are about to be deleted are not requested.
pub fn build_requests(
    project: &ProjectDetails,
    plan: &LayoutPlan,
    selected: &BTreeSet<Section>,
) -> Vec<DocumentRequest> {
    let title = project.title_image_orientation.unwrap_or_default();
    let delete = pages_to_delete(selected, plan, title);
    let mut requests = Vec::new();

    for (key, value) in &project.business_fields {
        if key.trim().is_empty() {
            continue;
        }
        requests.push(DocumentRequest::ReplaceAllText {
            contains_text: format!("{{{key}}}"),
            replace_text: value.clone(),
            match_case: false,
        });
    }

    for (page, assignment) in plan.mapping.iter() {
        if delete.contains(&page) {
            debug!("Skipping {} on deleted page {page}", assignment.token);
            continue;
        }
        requests.push(DocumentRequest::ReplaceImage {
            page_number: page,
            placeholder: template_key(&assignment.token),
            image_url: assignment.url.clone(),
        });
    }

    requests.extend(
        delete
            .into_iter()
            .map(|page_number| DocumentRequest::DeletePage { page_number }),
    );
    requests
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::TEMPLATE_PAGES;
    use crate::project::StoredImages;

    fn project() -> ProjectDetails {
        let mut business_fields = BTreeMap::new();
        business_fields.insert("title".to_string(), "Villa".to_string());
        business_fields.insert(String::new(), "ignored".to_string());
        ProjectDetails {
            business_fields,
            images: StoredImages {
                exterior_images: vec!["h1".into(), "h2".into(), "h3".into(), "v1".into()],
                exterior_orientations: [("3".to_string(), Orientation::Vertical)].into(),
                floor_plan_image: Some("plan".into()),
                ..Default::default()
            },
            selected_pages: None,
            title_image_orientation: Some(Orientation::Vertical),
        }
    }

    fn all_sections() -> BTreeSet<Section> {
        Section::iter().collect()
    }

    #[test]
    fn test_sections_cover_template_once() {
        let mut pages: Vec<u32> = Section::iter().flat_map(Section::pages).collect();
        pages.sort_unstable();
        assert_eq!(pages, (1..=TEMPLATE_PAGES).collect::<Vec<_>>());
    }

    #[test]
    fn test_parse_sections() {
        let parsed = parse_sections(&["exteriorPhotos", " floorPlan "]).unwrap();
        assert!(parsed.contains(&Section::ExteriorPhotos));
        assert!(parsed.contains(&Section::FloorPlan));
        assert!(matches!(
            parse_sections(&["garden"]),
            Err(LayoutError::UnknownSection(name)) if name == "garden"
        ));
    }

    #[test]
    fn test_selected_sections_skips_false_and_unknown() {
        let mut map = BTreeMap::new();
        map.insert("amenities".to_string(), true);
        map.insert("description".to_string(), false);
        map.insert("pool".to_string(), true);
        let selected = selected_sections(&map);
        assert_eq!(selected.into_iter().collect::<Vec<_>>(), vec![Section::Amenities]);
    }

    #[test]
    fn test_unused_layout_pages_are_deleted() {
        let project = project();
        let plan = LayoutPlan::build(&project, true).unwrap();
        let delete = pages_to_delete(&all_sections(), &plan, Orientation::Vertical);
        // exterior keeps 7, 10, 11; no interior photos; vertical title keeps page 2
        assert_eq!(
            delete.into_iter().collect::<Vec<_>>(),
            vec![1, 8, 9, 12, 13, 14, 15, 16]
        );
    }

    #[test]
    fn test_unselected_section_removes_everything() {
        let project = project();
        let plan = LayoutPlan::build(&project, true).unwrap();
        let mut selected = all_sections();
        selected.remove(&Section::ExteriorPhotos);
        selected.remove(&Section::ProjectOverview);
        let delete = pages_to_delete(&selected, &plan, Orientation::Square);
        for page in [1, 2, 7, 8, 9, 10, 11] {
            assert!(delete.contains(&page), "page {page}");
        }
    }

    #[test]
    fn test_square_title_keeps_horizontal_page() {
        let plan = LayoutPlan::default();
        let delete = pages_to_delete(&all_sections(), &plan, Orientation::Square);
        assert!(delete.contains(&2));
        assert!(!delete.contains(&1));
    }

    #[test]
    fn test_build_requests_order_and_shape() {
        let project = project();
        let plan = LayoutPlan::build(&project, true).unwrap();
        let requests = build_requests(&project, &plan, &all_sections());

        assert_eq!(
            requests[0],
            DocumentRequest::ReplaceAllText {
                contains_text: "{title}".into(),
                replace_text: "Villa".into(),
                match_case: false,
            }
        );
        assert_eq!(
            requests[1],
            DocumentRequest::ReplaceImage {
                page_number: 7,
                placeholder: "{{{{ext_a_himg1}}}}".into(),
                image_url: "h1".into(),
            }
        );
        let images = requests
            .iter()
            .filter(|r| matches!(r, DocumentRequest::ReplaceImage { .. }))
            .count();
        assert_eq!(images, 5);
        assert_eq!(
            requests.last(),
            Some(&DocumentRequest::DeletePage { page_number: 16 })
        );

        let json = serde_json::to_value(&requests[0]).unwrap();
        assert_eq!(json["replaceAllText"]["containsText"], "{title}");
        assert_eq!(json["replaceAllText"]["matchCase"], false);
    }

    #[test]
    fn test_images_on_deleted_pages_are_not_requested() {
        let project = project();
        let plan = LayoutPlan::build(&project, true).unwrap();
        let mut selected = all_sections();
        selected.remove(&Section::FloorPlan);
        let requests = build_requests(&project, &plan, &selected);
        assert!(!requests.iter().any(|r| matches!(
            r,
            DocumentRequest::ReplaceImage { page_number: 17, .. }
        )));
        assert!(requests.contains(&DocumentRequest::DeletePage { page_number: 17 }));
    }
}
