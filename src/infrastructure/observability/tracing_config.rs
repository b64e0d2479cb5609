pub const DEFAULT_LOG_FILTER: &str = "info,chatforge=debug,tower_http=debug,sqlx=warn";

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: String,
    pub json_format: bool,
    pub default_filter: String,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            environment: "local".to_string(),
            json_format: false,
            default_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}
