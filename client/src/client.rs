//! Rig session client
//!
//! One `RigClient` per browser-session equivalent: it resolves the API
//! root once, carries the cookie store the token flow reads from, and
//! owns the event log the status poller appends to.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use pgrig_plan::ScanRequest;

use crate::cookies::{CookieStore, TOKEN_COOKIE};
use crate::error::RigError;
use crate::poll::{start_status_polling, EventLog, PollHandle};
use crate::proxy::{resolve_api_root, ApiRoot};

/// Timeout configuration for the session's HTTP traffic
#[derive(Debug, Clone)]
pub struct RigTimeoutConfig {
    /// Timeout for the reverse-proxy probe (HEAD of the page URL)
    pub probe_ms: u64,
    /// Timeout for commands (scan, home, cancel, token forward)
    pub command_ms: u64,
    /// Timeout for one status poll request
    pub poll_ms: u64,
    /// Connection timeout
    pub connect_ms: u64,
}

impl Default for RigTimeoutConfig {
    fn default() -> Self {
        Self {
            probe_ms: 5000,     // the probe blocks session setup, keep it short
            command_ms: 30000,  // the controller queues work, replies fast
            poll_ms: 8000,      // must fit inside the 10s poll interval
            connect_ms: 10000,
        }
    }
}

/// Response envelope the controller wraps command acknowledgements in.
#[derive(Debug, Deserialize)]
struct MsgResponse {
    msg: String,
}

/// Session client for the photogrammetry rig controller
pub struct RigClient {
    http: Client,
    host: String,
    api_root: ApiRoot,
    timeout_config: RigTimeoutConfig,
    cookies: Arc<CookieStore>,
    events: Arc<EventLog>,
}

impl RigClient {
    /// Create a session against `host`, probing it once to resolve the
    /// API root. The probe failing is not an error; it resolves to the
    /// direct controller.
    pub async fn connect(host: &str) -> Self {
        Self::connect_with_config(host, RigTimeoutConfig::default()).await
    }

    /// Create a session with custom timeouts, probing for the API root.
    pub async fn connect_with_config(host: &str, timeout_config: RigTimeoutConfig) -> Self {
        let http = build_http_client(&timeout_config);
        let page_url = format!("http://{host}/");
        // The probe blocks session setup, so it runs on its own short
        // budget instead of the command timeout.
        let probe_http = Client::builder()
            .timeout(Duration::from_millis(timeout_config.probe_ms))
            .connect_timeout(Duration::from_millis(timeout_config.connect_ms))
            .build()
            .expect("Failed to create HTTP client");
        let api_root = resolve_api_root(&probe_http, &page_url).await;
        Self::assemble(http, host, api_root, timeout_config)
    }

    /// Create a session with a known API root, skipping the probe.
    pub fn with_api_root(host: &str, api_root: ApiRoot) -> Self {
        let timeout_config = RigTimeoutConfig::default();
        let http = build_http_client(&timeout_config);
        Self::assemble(http, host, api_root, timeout_config)
    }

    fn assemble(
        http: Client,
        host: &str,
        api_root: ApiRoot,
        timeout_config: RigTimeoutConfig,
    ) -> Self {
        Self {
            http,
            host: host.to_string(),
            api_root,
            timeout_config,
            cookies: Arc::new(CookieStore::new()),
            events: Arc::new(EventLog::new()),
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// The API root resolved (or supplied) at session setup. Cached for
    /// the whole session; never re-probed.
    pub fn api_root(&self) -> ApiRoot {
        self.api_root
    }

    pub fn timeout_config(&self) -> &RigTimeoutConfig {
        &self.timeout_config
    }

    /// The session cookie store. The external auth flow writes the
    /// `token` cookie here; this client only reads it.
    pub fn cookies(&self) -> &Arc<CookieStore> {
        &self.cookies
    }

    /// The status event log the poller appends to.
    pub fn events(&self) -> &Arc<EventLog> {
        &self.events
    }

    /// Forward the drive-authorization token to the controller if the
    /// `token` cookie is present. Fire-and-forget: both outcomes are
    /// logged and neither is surfaced or retried.
    pub async fn forward_token_if_present(&self) {
        let Some(token) = self.cookies.read(TOKEN_COOKIE) else {
            debug!("no drive token cookie; nothing to forward");
            return;
        };

        let url = format!("{}/token", self.api_root.oauth_base(&self.host));
        let payload = serde_json::json!({ "token": token });
        match self.http.post(&url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("forwarded drive token to controller");
            }
            Ok(response) => warn!("token forward rejected: HTTP {}", response.status()),
            Err(e) => warn!("token forward failed: {}", e),
        }
    }

    /// Submit a scan. The token forward is issued (and awaited) before
    /// the scan POST goes out; that ordering is the only guarantee the
    /// controller contract asks for.
    ///
    /// The scan endpoint always uses the `/api` path on the plain host,
    /// regardless of the resolved API root: the deployed controller has
    /// only ever served `/scan` behind the nginx rewrite, so that path
    /// is the only one the wire contract has ever seen. The token
    /// endpoint honors the resolved root; do not make the two match
    /// without confirming against the controller.
    pub async fn submit_scan(&self, request: &ScanRequest) {
        self.forward_token_if_present().await;

        let url = format!("http://{}/api/scan", self.host);
        match self.http.post(&url).json(request).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("scan submitted");
            }
            Ok(response) => warn!("scan rejected: HTTP {}", response.status()),
            Err(e) => warn!("scan submit failed: {}", e),
        }
    }

    /// Home the rig. Returns the controller's acknowledgement message.
    pub async fn send_home(&self) -> Result<String, RigError> {
        self.command("home").await
    }

    /// Cancel whatever the rig is doing and flush its work queues.
    pub async fn send_cancel(&self) -> Result<String, RigError> {
        self.command("cancel").await
    }

    async fn command(&self, endpoint: &str) -> Result<String, RigError> {
        let url = format!("http://{}/api/{}", self.host, endpoint);
        let response = self.http.post(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RigError::HttpStatus {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let ack: MsgResponse = serde_json::from_str(&body)?;
        Ok(ack.msg)
    }

    /// Start the status poll loop against this session's controller.
    /// Events land in [`RigClient::events`]; the returned handle stops
    /// the loop.
    pub fn start_status_polling(&self, interval: Duration) -> PollHandle {
        // Polls get their own timeout so a hung request cannot hold a
        // connection across many intervals.
        let poll_http = Client::builder()
            .timeout(Duration::from_millis(self.timeout_config.poll_ms))
            .connect_timeout(Duration::from_millis(self.timeout_config.connect_ms))
            .build()
            .expect("Failed to create HTTP client");
        start_status_polling(poll_http, self.host.clone(), interval, Arc::clone(&self.events))
    }
}

fn build_http_client(timeout_config: &RigTimeoutConfig) -> Client {
    Client::builder()
        .timeout(Duration::from_millis(timeout_config.command_ms))
        .connect_timeout(Duration::from_millis(timeout_config.connect_ms))
        .pool_idle_timeout(Duration::from_secs(30))
        .build()
        .expect("Failed to create HTTP client")
}
