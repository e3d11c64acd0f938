//! Chart rendering configuration

use domain::{DomainError, Timezone};
use serde::{Deserialize, Serialize};

/// Settings for turning a forecast into a chart series
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartAppConfig {
    /// IANA zone used for hour labels ("local" or unset uses the system zone)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl ChartAppConfig {
    /// Resolve the configured label timezone
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not a known IANA zone.
    pub fn timezone(&self) -> Result<Timezone, DomainError> {
        self.timezone
            .as_deref()
            .map_or(Ok(Timezone::Local), str::parse)
    }
}
