use crate::{
    constants::{DEFAULT_OUTPUT_DIR, ENV_OUTPUT_DIR},
    error::{LayoutError, Result},
    project::ProjectDetails,
    requests::{Section, parse_sections, selected_sections},
};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeSet,
    env,
    path::{Path, PathBuf},
};
use strum::IntoEnumIterator;

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub sections: SectionsConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub pretty_json: bool,
    pub write_report: bool, // CSV of every placed image
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            pretty_json: true,
            write_report: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Keep the first 6 uploads instead of rejecting larger groups
    pub truncate_oversized: bool,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            truncate_oversized: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SectionsConfig {
    /// Used when a project has no stored page selection
    pub default_selected: Vec<String>,
}

impl Default for SectionsConfig {
    fn default() -> Self {
        Self {
            default_selected: Section::iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Config {
    /// Read and validate a TOML config file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            LayoutError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| {
            LayoutError::Config(format!(
                "Failed to parse config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load_from_file`], falling back to defaults when the file is missing
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            warn!(
                "Config file not found: {}, using default settings",
                path.display()
            );
            Ok(Self::default())
        }
    }

    /// `SLIDE_LAYOUT_OUTPUT_DIR` overrides `output.dir` when set and non-blank
    pub fn apply_env(&mut self) -> Result<()> {
        if let Ok(dir) = env::var(ENV_OUTPUT_DIR)
            && !dir.trim().is_empty()
        {
            let path = PathBuf::from(dir);
            if path.exists() && !path.is_dir() {
                return Err(LayoutError::Config(format!(
                    "Output path is not a directory: {}",
                    path.display()
                )));
            }
            self.output.dir = path;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.output.dir.as_os_str().is_empty() {
            return Err(LayoutError::Config("output.dir must not be empty".to_string()));
        }
        parse_sections(&self.sections.default_selected)?;
        Ok(())
    }

    /// Sections to render for `project`: its own selection if stored, else the defaults
    pub fn sections_for(&self, project: &ProjectDetails) -> Result<BTreeSet<Section>> {
        match &project.selected_pages {
            Some(pages) => Ok(selected_sections(pages)),
            None => parse_sections(&self.sections.default_selected),
        }
    }
}
