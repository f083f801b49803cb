pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod layout;
pub mod orientation;
pub mod project;
pub mod requests;

pub use config::Config;
pub use constants::{
    ENERGY_CERTIFICATE_PAGE, ENERGY_CERTIFICATE_TOKEN, FLOOR_PLAN_PAGE, FLOOR_PLAN_TOKEN,
    MAX_GROUP_IMAGES, MIN_GROUP_IMAGES,
};
pub use error::LayoutError;
pub use layout::{
    GroupKind, GroupLayout, ImageGroup, ImageItem, LayoutPage, LayoutType, PlaceholderMapping,
    SpecialImages, assign_group, regenerate_group, select_layouts,
};
pub use orientation::{Orientation, OrientationMap};
pub use project::{LayoutPlan, ProjectDetails, StoredImages};
pub use requests::{DocumentRequest, Section, build_requests};
