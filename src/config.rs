//! Application configuration read once at startup.
//!
//! Components receive explicit configuration values at construction time;
//! nothing reads the process environment after `AppConfig::from_env`.

use std::net::SocketAddr;

use url::Url;

/// Deployment environment reported by the host.
///
/// Anything other than a production environment name is treated as
/// non-production and may expose diagnostic detail in error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeEnvironment {
    Development,
    Production,
}

impl RuntimeEnvironment {
    /// Parse an environment name, case-insensitively.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("production") {
            Self::Production
        } else {
            Self::Development
        }
    }

    /// Return whether diagnostic detail may be exposed to callers.
    pub fn exposes_detail(self) -> bool {
        matches!(self, Self::Development)
    }
}

/// Failures raised while assembling [`AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("CADASTRO_LOOKUP_URL is not a valid URL: {message}")]
    InvalidLookupUrl { message: String },
    #[error("CADASTRO_APPLICATION_KEY must not be empty")]
    EmptyApplicationKey,
    #[error("CADASTRO_BIND_ADDR is not a valid socket address: {message}")]
    InvalidBindAddr { message: String },
}

const DEFAULT_LOOKUP_URL: &str = "https://viacep.com.br/ws/";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Startup configuration for the whole service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base address of the postal-code lookup service.
    pub lookup_base_url: Url,
    /// Application-identifying key used for telemetry correlation.
    pub application_key: String,
    /// Deployment environment controlling error-detail exposure.
    pub environment: RuntimeEnvironment,
    /// Socket address the HTTP server binds to.
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Build configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the lookup URL or bind address fail to
    /// parse, or when the application key is missing or blank.
    pub fn from_env() -> Result<Self, ConfigError> {
        let lookup_url =
            std::env::var("CADASTRO_LOOKUP_URL").unwrap_or_else(|_| DEFAULT_LOOKUP_URL.into());
        let application_key = std::env::var("CADASTRO_APPLICATION_KEY").unwrap_or_default();
        let environment = std::env::var("CADASTRO_ENVIRONMENT").unwrap_or_default();
        let bind_addr =
            std::env::var("CADASTRO_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

        Self::build(&lookup_url, &application_key, &environment, &bind_addr)
    }

    /// Build configuration from explicit values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] under the same conditions as
    /// [`AppConfig::from_env`].
    pub fn build(
        lookup_url: &str,
        application_key: &str,
        environment_name: &str,
        bind_addr: &str,
    ) -> Result<Self, ConfigError> {
        let lookup_base_url =
            Url::parse(lookup_url).map_err(|error| ConfigError::InvalidLookupUrl {
                message: error.to_string(),
            })?;
        let application_key = application_key.trim();
        if application_key.is_empty() {
            return Err(ConfigError::EmptyApplicationKey);
        }
        let bind_addr = bind_addr
            .parse()
            .map_err(|error: std::net::AddrParseError| ConfigError::InvalidBindAddr {
                message: error.to_string(),
            })?;

        Ok(Self {
            lookup_base_url,
            application_key: application_key.to_owned(),
            environment: RuntimeEnvironment::from_name(environment_name),
            bind_addr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn builds_with_explicit_values() {
        let config = AppConfig::build(
            "https://viacep.com.br/ws/",
            "app-key",
            "Production",
            "127.0.0.1:9000",
        )
        .expect("config should build");

        assert_eq!(config.environment, RuntimeEnvironment::Production);
        assert_eq!(config.application_key, "app-key");
        assert_eq!(config.bind_addr.port(), 9000);
    }

    #[test]
    fn rejects_blank_application_key() {
        let error = AppConfig::build("https://viacep.com.br/ws/", "   ", "Development", "0.0.0.0:8080")
            .expect_err("blank key must fail");
        assert_eq!(error, ConfigError::EmptyApplicationKey);
    }

    #[test]
    fn rejects_malformed_lookup_url() {
        let error = AppConfig::build("not a url", "key", "Development", "0.0.0.0:8080")
            .expect_err("bad URL must fail");
        assert!(matches!(error, ConfigError::InvalidLookupUrl { .. }));
    }

    #[rstest]
    #[case::exact("production", RuntimeEnvironment::Production)]
    #[case::mixed_case("Production", RuntimeEnvironment::Production)]
    #[case::padded(" PRODUCTION ", RuntimeEnvironment::Production)]
    #[case::development("Development", RuntimeEnvironment::Development)]
    #[case::staging("Staging", RuntimeEnvironment::Development)]
    #[case::empty("", RuntimeEnvironment::Development)]
    fn parses_environment_names(#[case] name: &str, #[case] expected: RuntimeEnvironment) {
        assert_eq!(RuntimeEnvironment::from_name(name), expected);
    }

    #[test]
    fn production_hides_detail() {
        assert!(!RuntimeEnvironment::Production.exposes_detail());
        assert!(RuntimeEnvironment::Development.exposes_detail());
    }
}
