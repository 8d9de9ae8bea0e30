use serde::{Deserialize, Serialize};

/// Document-level settings handed to the generator by its caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// `info.title` of the generated document
    pub title: String,
    /// `host` of the generated document
    pub host: String,
    /// `basePath` of the generated document
    #[serde(rename = "basePath", default = "default_base_path")]
    pub base_path: String,
    /// Emit the `x-a127-apply` default quota marker on every path
    #[serde(rename = "includeQuota", default)]
    pub include_quota: bool,
}

fn default_base_path() -> String {
    "/".to_string()
}

impl GeneratorConfig {
    /// Create a config with the fixed `/` base path and no quota marker
    pub fn new(title: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            host: host.into(),
            base_path: default_base_path(),
            include_quota: false,
        }
    }

    pub fn with_quota(mut self, include_quota: bool) -> Self {
        self.include_quota = include_quota;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = GeneratorConfig::new("Items API", "api.example.com");

        assert_eq!(config.title, "Items API");
        assert_eq!(config.host, "api.example.com");
        assert_eq!(config.base_path, "/");
        assert!(!config.include_quota);
        assert!(config.with_quota(true).include_quota);
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{"title":"T","host":"localhost:8080"}"#).unwrap();

        assert_eq!(config.base_path, "/");
        assert!(!config.include_quota);
    }
}
