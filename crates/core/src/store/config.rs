use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:7272";
pub const DEFAULT_API_PREFIX: &str = "v2";

/// Where the delete filter travels. The store accepts either.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeleteFilterPlacement {
    /// `DELETE delete?filters=<json>`
    #[default]
    Query,
    /// `DELETE delete` with `{"filters": ...}` as the JSON body.
    Body,
}

impl FromStr for DeleteFilterPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "query" => Ok(DeleteFilterPlacement::Query),
            "body" => Ok(DeleteFilterPlacement::Body),
            other => Err(format!("expected `query` or `body`, got `{other}`")),
        }
    }
}

/// Connection settings for [`super::HttpDocumentStore`].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub base_url: String,
    /// Path segment between the base URL and the endpoint, e.g. `v2`.
    /// Empty for unversioned endpoints.
    pub api_prefix: String,
    /// Per-request timeout. Elapsed timeouts surface as transport errors.
    pub timeout: Option<Duration>,
    pub delete_placement: DeleteFilterPlacement,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            timeout: None,
            delete_placement: DeleteFilterPlacement::Query,
        }
    }
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_api_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.api_prefix = prefix.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_delete_placement(mut self, placement: DeleteFilterPlacement) -> Self {
        self.delete_placement = placement;
        self
    }

    /// Full URL of an endpoint, e.g. `http://localhost:7272/v2/delete`.
    pub fn endpoint(&self, name: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let prefix = self.api_prefix.trim_matches('/');
        if prefix.is_empty() {
            format!("{base}/{name}")
        } else {
            format!("{base}/{prefix}/{name}")
        }
    }
}
