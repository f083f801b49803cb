/// Orientation thresholds (width / height)
pub const HORIZONTAL_MIN_RATIO: f64 = 1.05; // above -> horizontal
pub const VERTICAL_MAX_RATIO: f64 = 0.95; // below -> vertical

/// Images per exterior / interior group
pub const MIN_GROUP_IMAGES: usize = 2;
pub const MAX_GROUP_IMAGES: usize = 6;

/// First template page of each group (layout A), B..E follow consecutively
pub const EXTERIOR_FIRST_PAGE: u32 = 7;
pub const INTERIOR_FIRST_PAGE: u32 = 12;

/// Fixed-position images
pub const FLOOR_PLAN_PAGE: u32 = 17;
pub const FLOOR_PLAN_TOKEN: &str = "image7";
pub const ENERGY_CERTIFICATE_PAGE: u32 = 18;
pub const ENERGY_CERTIFICATE_TOKEN: &str = "image8";

/// Total pages in the brochure template
pub const TEMPLATE_PAGES: u32 = 19;

/// Mapping report headers
pub const REPORT_HEADERS: [&str; 4] = ["Page", "Instance", "Token", "Url"];

/// Defaults for the binary
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const DEFAULT_OUTPUT_DIR: &str = "out";
pub const ENV_OUTPUT_DIR: &str = "SLIDE_LAYOUT_OUTPUT_DIR";
