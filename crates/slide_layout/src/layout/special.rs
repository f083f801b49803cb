use super::emit::{PlaceholderAssignment, PlaceholderMapping};
use crate::constants::{
    ENERGY_CERTIFICATE_PAGE, ENERGY_CERTIFICATE_TOKEN, FLOOR_PLAN_PAGE, FLOOR_PLAN_TOKEN,
};

use log::debug;
use serde::{Deserialize, Serialize};

/// Single images with a fixed page, outside the orientation-driven groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecialImages {
    #[serde(default)]
    pub floor_plan: Option<String>,
    #[serde(default)]
    pub energy_certificate: Option<String>,
}

impl SpecialImages {
    /// Floor plan -> page 17 / `image7`, energy certificate -> page 18 / `image8`.
    /// Blank URLs count as absent.
    pub fn assign_into(&self, mapping: &mut PlaceholderMapping) {
        let fixed = [
            (&self.floor_plan, FLOOR_PLAN_PAGE, FLOOR_PLAN_TOKEN),
            (&self.energy_certificate, ENERGY_CERTIFICATE_PAGE, ENERGY_CERTIFICATE_TOKEN),
        ];
        for (url, page, token) in fixed {
            if let Some(url) = url
                && !url.trim().is_empty()
            {
                debug!("page {page}: {token} -> {url}");
                mapping.push(
                    page,
                    PlaceholderAssignment {
                        token: token.to_string(),
                        url: url.clone(),
                        instance: 0,
                    },
                );
            }
        }
    }
}
