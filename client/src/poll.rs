//! Status polling
//!
//! The controller exposes a one-shot status queue: each GET drains at
//! most one message. The UI polled it on a fixed 10 second interval for
//! the life of the page; here the loop is a spawned task behind a
//! handle so callers (and tests) can stop it deterministically.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// One message drained from the controller's status queue.
#[derive(Debug, Clone)]
pub struct StatusEvent {
    pub msg: String,
    pub received_at: Instant,
}

/// Append-only log of status events, in arrival order.
///
/// Nothing is ever deduplicated or evicted; any snapshot taken earlier
/// is a prefix of any snapshot taken later. Consumers that render the
/// log are expected to cope with unbounded growth, as the original UI
/// did.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<StatusEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&self, msg: String) {
        let event = StatusEvent {
            msg,
            received_at: Instant::now(),
        };
        self.events.lock().expect("event log poisoned").push(event);
    }

    /// Clone out the current contents.
    pub fn snapshot(&self) -> Vec<StatusEvent> {
        self.events.lock().expect("event log poisoned").clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().expect("event log poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Extract the status message from one poll response body.
///
/// The controller double-encodes: the response is a JSON *string* whose
/// contents are themselves a JSON object. Both decodes happen here and
/// nowhere else. Anything that is not a double-encoded object with a
/// string `msg` field (a literal `null`, a bare object, junk bytes)
/// yields `None` without error.
pub fn decode_status_body(body: &str) -> Option<String> {
    let outer: serde_json::Value = serde_json::from_str(body).ok()?;
    let inner_text = outer.as_str()?;
    let inner: serde_json::Value = serde_json::from_str(inner_text).ok()?;
    inner.get("msg")?.as_str().map(|msg| msg.to_string())
}

/// Handle to a running poll loop. `stop` (or dropping the handle) ends
/// the loop; nothing appends to the log afterward.
pub struct PollHandle {
    cancelled: Arc<AtomicBool>,
    task: JoinHandle<()>,
}

impl PollHandle {
    /// Stop polling. In-flight requests are allowed to finish on the
    /// wire but their results are discarded.
    pub fn stop(self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.task.abort();
    }
}

/// Start polling `http://{host}/api/status`. The first request goes out
/// immediately, then one per `interval`, fixed-rate. Ticks are not
/// serialized against in-flight requests: a slow response will overlap
/// the next tick, matching the original timer behavior.
pub fn start_status_polling(
    http: Client,
    host: String,
    interval: Duration,
    log: Arc<EventLog>,
) -> PollHandle {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancelled);
    let url = format!("http://{host}/api/status");

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            if flag.load(Ordering::SeqCst) {
                break;
            }
            let http = http.clone();
            let url = url.clone();
            let log = Arc::clone(&log);
            let flag = Arc::clone(&flag);
            tokio::spawn(async move {
                poll_once(&http, &url, &log, &flag).await;
            });
        }
    });

    PollHandle { cancelled, task }
}

/// One poll tick. Every failure class is logged and swallowed; the loop
/// never stops because of a bad response.
async fn poll_once(http: &Client, url: &str, log: &EventLog, cancelled: &AtomicBool) {
    let response = match http.get(url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("status poll failed: {}", e);
            return;
        }
    };

    let status = response.status();
    if status == StatusCode::NO_CONTENT {
        debug!("no status pending");
        return;
    }
    if !status.is_success() {
        warn!("status poll returned HTTP {}", status);
        return;
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("status body unreadable: {}", e);
            return;
        }
    };

    match decode_status_body(&body) {
        Some(msg) => {
            if !cancelled.load(Ordering::SeqCst) {
                debug!("rig status: {}", msg);
                log.append(msg);
            }
        }
        None => debug!("status body carried no message: {}", body),
    }
}
