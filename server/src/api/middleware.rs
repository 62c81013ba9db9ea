//! HTTP middleware (CORS, 404 handler)

use axum::Json;
use axum::extract::Request;
use axum::http::{HeaderValue, Method, StatusCode, header};
use axum::response::IntoResponse;
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::types::ErrorBody;
use crate::core::config::is_all_interfaces;

/// Allowed origins configuration
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    /// Create allowed origins from host and port configuration
    pub fn new(host: &str, port: u16) -> Self {
        let mut origins = Vec::new();
        let dev_port = port + 1;
        let is_all = is_all_interfaces(host);

        // When binding to all interfaces or localhost, allow both localhost
        // and 127.0.0.1; otherwise use the configured host directly.
        let base_hosts: Vec<&str> = if is_all || host == "127.0.0.1" || host == "localhost" {
            vec!["localhost", "127.0.0.1"]
        } else {
            vec![host]
        };

        for h in &base_hosts {
            origins.push(format!("http://{}:{}", h, port));
            origins.push(format!("http://{}:{}", h, dev_port));
            origins.push(format!("http://{}", h));
        }

        // Allow LAN IPs when binding to all interfaces
        if is_all && let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                origins.push(format!("http://{}:{}", ip, port));
                origins.push(format!("http://{}:{}", ip, dev_port));
            }
        }

        Self { origins }
    }

    /// Check if an origin is allowed
    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    /// Get origins as HeaderValues for CORS
    fn as_header_values(&self) -> Vec<HeaderValue> {
        self.origins.iter().filter_map(|o| o.parse().ok()).collect()
    }
}

/// Create CORS layer
pub fn cors(allowed: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed.as_header_values()))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            header::CACHE_CONTROL,
        ])
        .allow_credentials(true)
}

/// JSON 404 for unmatched routes
pub async fn handle_404(req: Request) -> impl IntoResponse {
    tracing::debug!(method = %req.method(), uri = %req.uri(), "[404] No route");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: format!("No route for {} {}", req.method(), req.uri().path()),
            code: "NOT_FOUND".to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localhost_origins() {
        let allowed = AllowedOrigins::new("127.0.0.1", 5390);
        assert!(allowed.is_allowed("http://localhost:5390"));
        assert!(allowed.is_allowed("http://127.0.0.1:5391"));
        assert!(!allowed.is_allowed("http://evil.example.com"));
    }

    #[test]
    fn test_custom_host_origins() {
        let allowed = AllowedOrigins::new("board.internal", 8080);
        assert!(allowed.is_allowed("http://board.internal:8080"));
        assert!(!allowed.is_allowed("http://localhost:8080"));
    }
}
