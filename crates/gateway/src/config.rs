//! Gateway configuration.

use std::env;

use common::{GrpcClientConfig, JwtConfig};

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Catalog service gRPC connection
    pub catalog: GrpcClientConfig,
    /// Admin token verification
    pub jwt: JwtConfig,
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            catalog: GrpcClientConfig {
                endpoint: env::var("CATALOG_SERVICE_URL").unwrap_or(defaults.catalog.endpoint),
                connect_timeout_ms: env::var("CATALOG_SERVICE_CONNECT_TIMEOUT_MS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(defaults.catalog.connect_timeout_ms),
                request_timeout_ms: env::var("CATALOG_SERVICE_REQUEST_TIMEOUT_MS")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(defaults.catalog.request_timeout_ms),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").unwrap_or_default(),
                leeway_seconds: env::var("JWT_LEEWAY_SECONDS")
                    .ok()
                    .and_then(|l| l.parse().ok())
                    .unwrap_or(defaults.jwt.leeway_seconds),
            },
            host: env::var("GATEWAY_HOST").unwrap_or(defaults.host),
            port: env::var("GATEWAY_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
        }
    }

    /// Extract catalog service port from URL.
    pub fn catalog_port(&self) -> u16 {
        self.catalog
            .endpoint
            .rsplit(':')
            .next()
            .and_then(|p| p.trim_end_matches('/').parse().ok())
            .unwrap_or(50053)
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            catalog: GrpcClientConfig::default(),
            jwt: JwtConfig::default(),
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}
