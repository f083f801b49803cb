use crate::constants::MAX_GROUP_IMAGES;
use crate::error::{LayoutError, Result};
use crate::layout::{
    GroupKind, GroupLayout, ImageGroup, PlaceholderMapping, SpecialImages, assign_group,
    regenerate_group,
};
use crate::orientation::{Orientation, OrientationMap};

use log::{info, warn};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Image state as persisted with the project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImages {
    #[serde(default)]
    pub exterior_images: Vec<String>,
    #[serde(default)]
    pub interior_images: Vec<String>,
    #[serde(default)]
    pub exterior_orientations: OrientationMap,
    #[serde(default)]
    pub interior_orientations: OrientationMap,
    #[serde(default, deserialize_with = "page_list")]
    pub exterior_layout_pages: Vec<u32>,
    #[serde(default, deserialize_with = "page_list")]
    pub interior_layout_pages: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_plan_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub energy_certificate_image: Option<String>,
}

/// Older records stored page numbers as strings
fn page_list<'de, D>(deserializer: D) -> std::result::Result<Vec<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PageRef {
        Number(u32),
        Text(String),
    }

    Vec::<PageRef>::deserialize(deserializer)?
        .into_iter()
        .map(|p| match p {
            PageRef::Number(n) => Ok(n),
            PageRef::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| serde::de::Error::custom(format!("invalid page number: {s:?}"))),
        })
        .collect()
}

impl StoredImages {
    pub fn urls(&self, kind: GroupKind) -> &[String] {
        match kind {
            GroupKind::Exterior => &self.exterior_images,
            GroupKind::Interior => &self.interior_images,
        }
    }

    pub fn orientations(&self, kind: GroupKind) -> &OrientationMap {
        match kind {
            GroupKind::Exterior => &self.exterior_orientations,
            GroupKind::Interior => &self.interior_orientations,
        }
    }

    pub fn layout_pages(&self, kind: GroupKind) -> &[u32] {
        match kind {
            GroupKind::Exterior => &self.exterior_layout_pages,
            GroupKind::Interior => &self.interior_layout_pages,
        }
    }

    pub fn special_images(&self) -> SpecialImages {
        SpecialImages {
            floor_plan: self.floor_plan_image.clone(),
            energy_certificate: self.energy_certificate_image.clone(),
        }
    }

    /// Copy with the plan's page sequences recorded, so the next generation replays them
    pub fn with_layouts(&self, plan: &LayoutPlan) -> StoredImages {
        StoredImages {
            exterior_layout_pages: plan.layout_pages(GroupKind::Exterior),
            interior_layout_pages: plan.layout_pages(GroupKind::Interior),
            ..self.clone()
        }
    }
}

/// Everything needed to generate one brochure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetails {
    /// Text placeholders, e.g. `title`, `price`, `address`
    #[serde(default)]
    pub business_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub images: StoredImages,
    /// Section name -> selected; `None` means use the configured defaults
    #[serde(default)]
    pub selected_pages: Option<BTreeMap<String, bool>>,
    #[serde(default)]
    pub title_image_orientation: Option<Orientation>,
}

impl ProjectDetails {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let project = serde_json::from_reader(BufReader::new(file))?;
        Ok(project)
    }
}

/// Keep at most `max` uploads, dropping the newest
pub fn truncate_upload(urls: &[String], max: usize) -> &[String] {
    if urls.len() > max {
        warn!("{} images uploaded, keeping the first {max}", urls.len());
        &urls[..max]
    } else {
        urls
    }
}

/// Layouts of both groups plus the merged placeholder mapping
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPlan {
    pub exterior: Option<GroupLayout>,
    pub interior: Option<GroupLayout>,
    pub mapping: PlaceholderMapping,
}

impl LayoutPlan {
    /// Lay out both groups and the fixed images.
    ///
    /// Stored page sequences are replayed when they still fit the stored
    /// orientations; otherwise the layouts are selected again. A group
    /// without uploads gets no layout.
    pub fn build(project: &ProjectDetails, truncate_oversized: bool) -> Result<Self> {
        let images = &project.images;
        let mut plan = LayoutPlan::default();

        for kind in [GroupKind::Exterior, GroupKind::Interior] {
            let layout = plan_group(
                kind,
                images.urls(kind),
                images.orientations(kind),
                images.layout_pages(kind),
                truncate_oversized,
            )?;
            if let Some(layout) = &layout {
                plan.mapping.merge(layout.mapping.clone());
            }
            match kind {
                GroupKind::Exterior => plan.exterior = layout,
                GroupKind::Interior => plan.interior = layout,
            }
        }

        images.special_images().assign_into(&mut plan.mapping);
        info!("Plan places {} images", plan.mapping.len());
        Ok(plan)
    }

    pub fn group(&self, kind: GroupKind) -> Option<&GroupLayout> {
        match kind {
            GroupKind::Exterior => self.exterior.as_ref(),
            GroupKind::Interior => self.interior.as_ref(),
        }
    }

    pub fn layout_pages(&self, kind: GroupKind) -> Vec<u32> {
        self.group(kind)
            .map(GroupLayout::page_numbers)
            .unwrap_or_default()
    }
}

fn plan_group(
    kind: GroupKind,
    urls: &[String],
    orientations: &OrientationMap,
    stored_pages: &[u32],
    truncate_oversized: bool,
) -> Result<Option<GroupLayout>> {
    if urls.is_empty() {
        info!("{kind}: no images");
        return Ok(None);
    }
    let urls = if truncate_oversized {
        truncate_upload(urls, MAX_GROUP_IMAGES)
    } else {
        urls
    };
    let group = ImageGroup::from_urls(kind, urls, orientations)?;

    if !stored_pages.is_empty() {
        match regenerate_group(kind, urls, orientations, stored_pages) {
            Ok(replay) => {
                info!("{kind}: reusing stored pages {stored_pages:?}");
                return Ok(Some(replay));
            }
            Err(LayoutError::UnsupportedDistribution { .. }) => {
                warn!("{kind}: stored pages {stored_pages:?} no longer fit, selecting again");
            }
            Err(e) => return Err(e),
        }
    }

    assign_group(&group).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const PROJECT_JSON: &str = r#"{
        "businessFields": { "title": "Sunny flat", "price": "450.000 EUR" },
        "images": {
            "exteriorImages": ["e1", "e2", "e3", "e4"],
            "exteriorOrientations": { "0": "horizontal", "1": "square", "2": "horizontal", "3": "vertical" },
            "interiorImages": ["i1", "i2", "i3", "i4"],
            "interiorOrientations": { "0": "vertical", "1": "vertical", "2": "vertical", "3": "vertical" },
            "floorPlanImage": "plan.png"
        },
        "selectedPages": { "exteriorPhotos": true, "interiorPhotos": true }
    }"#;

    fn project() -> ProjectDetails {
        serde_json::from_str(PROJECT_JSON).unwrap()
    }

    #[test]
    fn test_build_plan_from_orientations() {
        let plan = LayoutPlan::build(&project(), true).unwrap();
        assert_eq!(plan.layout_pages(GroupKind::Exterior), vec![7, 10, 11]);
        assert_eq!(plan.layout_pages(GroupKind::Interior), vec![13]);
        assert_eq!(plan.mapping.page(17)[0].url, "plan.png");
        assert!(plan.mapping.page(18).is_empty());
        // 4 exterior + 4 interior + floor plan
        assert_eq!(plan.mapping.len(), 9);
    }

    #[test]
    fn test_stored_pages_round_trip() {
        let mut project = project();
        let plan = LayoutPlan::build(&project, true).unwrap();
        project.images = project.images.with_layouts(&plan);
        assert_eq!(project.images.exterior_layout_pages, vec![7, 10, 11]);

        let json = serde_json::to_string(&project).unwrap();
        let reloaded: ProjectDetails = serde_json::from_str(&json).unwrap();
        let replay = LayoutPlan::build(&reloaded, true).unwrap();
        assert_eq!(
            serde_json::to_string(&replay.mapping).unwrap(),
            serde_json::to_string(&plan.mapping).unwrap()
        );
    }

    #[test]
    fn test_page_numbers_accept_strings() {
        let images: StoredImages =
            serde_json::from_str(r#"{ "exteriorLayoutPages": ["7", 10, " 11 "] }"#).unwrap();
        assert_eq!(images.exterior_layout_pages, vec![7, 10, 11]);
        assert!(serde_json::from_str::<StoredImages>(r#"{ "interiorLayoutPages": ["x"] }"#).is_err());
    }

    #[test]
    fn test_stale_stored_pages_are_reselected() {
        let mut project = project();
        // B cannot hold 3 horizontal + 1 vertical
        project.images.exterior_layout_pages = vec![8];
        let plan = LayoutPlan::build(&project, true).unwrap();
        assert_eq!(plan.layout_pages(GroupKind::Exterior), vec![7, 10, 11]);

        // a single A holds only 2 of the 4 photos
        project.images.exterior_layout_pages = vec![7];
        let plan = LayoutPlan::build(&project, true).unwrap();
        assert_eq!(plan.layout_pages(GroupKind::Exterior), vec![7, 10, 11]);
        assert_eq!(plan.mapping.len(), 9);
    }

    #[test]
    fn test_empty_group_has_no_layout() {
        let mut project = project();
        project.images.interior_images.clear();
        let plan = LayoutPlan::build(&project, true).unwrap();
        assert!(plan.interior.is_none());
        assert!(plan.layout_pages(GroupKind::Interior).is_empty());
    }

    #[test]
    fn test_oversized_group_truncated_or_rejected() {
        let mut project = project();
        project.images.interior_images = (1..=8).map(|i| format!("i{i}")).collect();
        project.images.interior_orientations.clear();

        let plan = LayoutPlan::build(&project, true).unwrap();
        assert_eq!(plan.layout_pages(GroupKind::Interior), vec![12, 12, 12]);
        assert!(plan.mapping.iter().all(|(_, a)| a.url != "i7" && a.url != "i8"));

        assert!(matches!(
            LayoutPlan::build(&project, false),
            Err(LayoutError::UnsupportedDistribution {
                horizontal: 8,
                vertical: 0
            })
        ));
    }

    #[test]
    fn test_single_image_is_rejected() {
        let mut project = project();
        project.images.exterior_images.truncate(1);
        assert!(matches!(
            LayoutPlan::build(&project, true),
            Err(LayoutError::UnsupportedDistribution { .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("project.json");
        std::fs::write(&path, PROJECT_JSON).unwrap();
        let loaded = ProjectDetails::load(&path).unwrap();
        assert_eq!(loaded.business_fields["title"], "Sunny flat");
        assert!(ProjectDetails::load(dir.path().join("missing.json")).is_err());
    }
}
