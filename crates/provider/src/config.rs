/// Provider connection settings, resolved once at process start.
///
/// The credential is the single shared secret this system carries; it is
/// read-only for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Base URL of the provider API, without a trailing slash.
    pub base_url: String,
    /// Bearer credential for every provider call. `None` means the
    /// service starts but rejects submissions until one is configured.
    pub api_key: Option<String>,
}

/// Default provider endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

impl ProviderConfig {
    /// Load provider configuration from environment variables.
    ///
    /// | Env Var                | Default                     |
    /// |------------------------|-----------------------------|
    /// | `VIDGATE_PROVIDER_URL` | `https://api.openai.com/v1` |
    /// | `VIDGATE_API_KEY`      | falls back to `OPENAI_API_KEY`, else unset |
    pub fn from_env() -> Self {
        let base_url = std::env::var("VIDGATE_PROVIDER_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.into())
            .trim_end_matches('/')
            .to_string();

        let api_key = std::env::var("VIDGATE_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        Self { base_url, api_key }
    }
}
