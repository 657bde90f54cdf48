//! Backend client factory.

use crate::client::BackendClient;
use crate::providers::HttpBackendClient;
use citeline_core::config::BackendConfig;
use citeline_core::{AppError, AppResult};
use std::sync::Arc;

/// Create a backend client from configuration.
///
/// Only HTTP(S) backends exist today; the URL scheme picks the client.
///
/// # Errors
/// Returns a configuration error for unsupported schemes or when the HTTP
/// client cannot be built.
pub fn create_client(config: &BackendConfig) -> AppResult<Arc<dyn BackendClient>> {
    let url = config.base_url.trim();

    if url.starts_with("http://") || url.starts_with("https://") {
        tracing::debug!("Using HTTP backend at {}", config.analyze_url());
        Ok(Arc::new(HttpBackendClient::new(config)?))
    } else {
        Err(AppError::Config(format!(
            "Unsupported backend URL: {}",
            config.base_url
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_http_client() {
        let client = create_client(&BackendConfig::default()).unwrap();
        assert_eq!(client.name(), "http");
    }

    #[test]
    fn test_unsupported_scheme() {
        let config = BackendConfig {
            base_url: "unix:///tmp/rag.sock".to_string(),
            ..Default::default()
        };

        match create_client(&config) {
            Err(err) => assert!(err.to_string().contains("Unsupported backend URL")),
            Ok(_) => panic!("Expected error for unix socket URL"),
        }
    }
}
