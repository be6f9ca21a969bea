//! Audit API binding
//!
//! Where the audit API listens and which browser origins (the work paper
//! frontend) may call it. An empty origin list opens the API to any origin.

use std::net::SocketAddr;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Loopback by default; the API trusts the identity headers it receives
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Frontend origins allowed by CORS, e.g. `http://localhost:5173`
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://localhost:3000".to_string(),
    ]
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: default_cors_origins(),
        }
    }
}

impl HttpServerConfig {
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Host and port as a bindable address; the host must be an IP literal.
    pub fn bind_addr(&self) -> Result<SocketAddr, String> {
        self.socket_addr()
            .parse()
            .map_err(|e| format!("http address '{}' is invalid: {}", self.socket_addr(), e))
    }

    /// CORS origins as header values, in configured order.
    pub fn origin_values(&self) -> Result<Vec<HeaderValue>, String> {
        self.cors_origins
            .iter()
            .map(|origin| {
                let origin = origin.trim();
                if !(origin.starts_with("http://") || origin.starts_with("https://")) {
                    return Err(format!(
                        "cors origin '{}' must start with http:// or https://",
                        origin
                    ));
                }
                HeaderValue::from_str(origin.trim_end_matches('/'))
                    .map_err(|e| format!("cors origin '{}' is invalid: {}", origin, e))
            })
            .collect()
    }

    /// Load-time checks for the API binding.
    pub fn check(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("http.port must be > 0".into());
        }
        self.bind_addr()?;
        self.origin_values()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_binding_is_loopback() {
        let config = HttpServerConfig::default();
        assert_eq!(config.bind_addr().unwrap().to_string(), "127.0.0.1:8000");
        assert_eq!(config.origin_values().unwrap().len(), 2);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        assert_eq!(HttpServerConfig::with_port(9100).socket_addr(), "127.0.0.1:9100");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: HttpServerConfig = serde_json::from_str(r#"{"port": 9000}"#).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_origin_trailing_slash_dropped() {
        let config = HttpServerConfig {
            cors_origins: vec!["https://audit.example.com/".into()],
            ..Default::default()
        };
        assert_eq!(config.origin_values().unwrap()[0], "https://audit.example.com");
    }

    #[test]
    fn test_check_rejects_bad_binding() {
        let zero_port = HttpServerConfig::with_port(0);
        assert!(zero_port.check().unwrap_err().contains("http.port"));

        let hostname = HttpServerConfig {
            host: "audit-host".into(),
            ..Default::default()
        };
        assert!(hostname.check().is_err());

        let bare_origin = HttpServerConfig {
            cors_origins: vec!["localhost:5173".into()],
            ..Default::default()
        };
        assert!(bare_origin.check().unwrap_err().contains("http://"));
    }
}
