//! Reverse-proxy detection
//!
//! The rig's web UI can be served two ways: straight from the Flask
//! controller on port 8081, or behind nginx, which fronts the static
//! site and rewrites `/api/...` through to the controller. Which one we
//! are talking to decides the OAuth base path, and the only signal is
//! the `server` header on the page response.

use reqwest::Client;
use tracing::{debug, warn};

use crate::DIRECT_API_PORT;

/// How the controller's OAuth endpoints are reached for this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiRoot {
    /// Behind nginx; the `/api` prefix is rewritten onto the controller.
    Proxied,
    /// The controller answers directly on its own port.
    Direct,
}

impl ApiRoot {
    /// Base URL for the OAuth endpoints on the given host. The direct
    /// controller answers on its own port, so any port already on
    /// `host` is replaced rather than appended to.
    pub fn oauth_base(&self, host: &str) -> String {
        match self {
            ApiRoot::Proxied => format!("http://{host}/api/oauth"),
            ApiRoot::Direct => {
                let name = match host.rsplit_once(':') {
                    Some((name, port)) if port.parse::<u16>().is_ok() => name,
                    _ => host,
                };
                format!("http://{name}:{DIRECT_API_PORT}/oauth")
            }
        }
    }
}

/// Classify a `server` response header value. Only nginx means proxied;
/// anything else, including an absent header, means direct.
pub fn classify_server_header(server: Option<&str>) -> ApiRoot {
    match server {
        Some(value) if value.contains("nginx") => ApiRoot::Proxied,
        _ => ApiRoot::Direct,
    }
}

/// Probe the page URL with a HEAD request and classify the responding
/// server. A failed probe resolves to `Direct` rather than erroring;
/// callers resolve once per session and cache the result.
pub async fn resolve_api_root(http: &Client, page_url: &str) -> ApiRoot {
    match http.head(page_url).send().await {
        Ok(response) => {
            let server = response
                .headers()
                .get(reqwest::header::SERVER)
                .and_then(|v| v.to_str().ok());
            let root = classify_server_header(server);
            debug!("resolved API root from server header {:?}: {:?}", server, root);
            root
        }
        Err(e) => {
            warn!("API root probe failed, assuming direct controller: {}", e);
            ApiRoot::Direct
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nginx_header_is_proxied() {
        assert_eq!(
            classify_server_header(Some("nginx/1.18.0")),
            ApiRoot::Proxied
        );
        assert_eq!(classify_server_header(Some("nginx")), ApiRoot::Proxied);
    }

    #[test]
    fn test_other_servers_are_direct() {
        assert_eq!(classify_server_header(Some("Apache/2.4")), ApiRoot::Direct);
        assert_eq!(
            classify_server_header(Some("gunicorn/19.9.0")),
            ApiRoot::Direct
        );
    }

    #[test]
    fn test_absent_header_is_direct() {
        assert_eq!(classify_server_header(None), ApiRoot::Direct);
    }

    #[test]
    fn test_oauth_base_paths() {
        assert_eq!(
            ApiRoot::Proxied.oauth_base("rig.local"),
            "http://rig.local/api/oauth"
        );
        assert_eq!(
            ApiRoot::Direct.oauth_base("rig.local"),
            "http://rig.local:8081/oauth"
        );
    }

    #[test]
    fn test_oauth_base_replaces_existing_port() {
        assert_eq!(
            ApiRoot::Direct.oauth_base("rig.local:8080"),
            "http://rig.local:8081/oauth"
        );
        assert_eq!(
            ApiRoot::Direct.oauth_base("127.0.0.1:49152"),
            "http://127.0.0.1:8081/oauth"
        );
        // The proxied root addresses whatever front end served the
        // page, port and all.
        assert_eq!(
            ApiRoot::Proxied.oauth_base("rig.local:8080"),
            "http://rig.local:8080/api/oauth"
        );
    }

    /// One-shot HEAD responder advertising the given `Server` header.
    async fn spawn_head_server(server_header: &'static str) -> std::net::SocketAddr {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let mut buf = [0u8; 1024];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 200 OK\r\nServer: {server_header}\r\n\
                     Content-Length: 0\r\nConnection: close\r\n\r\n"
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_resolve_detects_nginx_front_end() {
        let addr = spawn_head_server("nginx/1.18.0").await;
        let http = Client::new();
        let root = resolve_api_root(&http, &format!("http://{addr}/")).await;
        assert_eq!(root, ApiRoot::Proxied);
    }

    #[tokio::test]
    async fn test_resolve_treats_gunicorn_as_direct() {
        let addr = spawn_head_server("gunicorn/19.9.0").await;
        let http = Client::new();
        let root = resolve_api_root(&http, &format!("http://{addr}/")).await;
        assert_eq!(root, ApiRoot::Direct);
    }

    #[tokio::test]
    async fn test_resolve_against_unreachable_host_falls_back_to_direct() {
        let http = Client::new();
        // Nothing listens on this port; the probe fails and we assume
        // the direct controller.
        let root = resolve_api_root(&http, "http://127.0.0.1:1/").await;
        assert_eq!(root, ApiRoot::Direct);
    }
}
