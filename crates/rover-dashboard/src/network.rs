//! Request client for backend communication
//!
//! Commands are fire-and-forget POSTs: the response is never inspected and
//! failures are only logged at debug level. Polling GETs hand the parsed JSON
//! body to a continuation, and only when the backend answered `200 OK`.
//! Neither retries nor cancels anything.

use rover_core::Command;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tracing::debug;

/// Callback receiving the JSON body of a successful GET
pub type Continuation = Box<dyn FnOnce(Value) + Send + 'static>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to create HTTP client: {0}")]
    Build(#[from] reqwest::Error),
    #[error("HTTP client must be created inside a tokio runtime")]
    NoRuntime,
}

/// Issues requests against the vehicle backend
pub trait RequestClient: Send + Sync {
    /// Send `payload` as JSON to `path` without waiting for the answer
    fn post(&self, path: &str, payload: Value);

    /// Fetch `path` and call `on_ok` with the body if the status is 200
    fn get(&self, path: &str, on_ok: Continuation);

    /// Send a backend command
    fn send(&self, command: Command) {
        self.post(command.path(), command.payload());
    }
}

impl<T: RequestClient + ?Sized> RequestClient for Arc<T> {
    fn post(&self, path: &str, payload: Value) {
        (**self).post(path, payload)
    }

    fn get(&self, path: &str, on_ok: Continuation) {
        (**self).get(path, on_ok)
    }
}

/// Join a backend-relative path (`./x`, `/x` or `x`) onto a base URL
pub fn join_url(base_url: &str, path: &str) -> String {
    let path = path.trim_start_matches("./").trim_start_matches('/');
    format!("{}/{}", base_url.trim_end_matches('/'), path)
}

/// HTTP implementation backed by `reqwest`.
///
/// Every request runs as its own task on the runtime the client was created
/// in; overlapping requests are not deduplicated.
#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    runtime: Handle,
}

impl HttpClient {
    /// Create a client for the backend at `base_url` (e.g. "http://192.168.4.1:5000")
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        let runtime = Handle::try_current().map_err(|_| ClientError::NoRuntime)?;
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            runtime,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Fetch `path` and return the JSON body on `200 OK`
    pub async fn fetch(&self, path: &str) -> Option<Value> {
        fetch_json(&self.client, self.url(path)).await
    }
}

async fn fetch_json(client: &reqwest::Client, url: String) -> Option<Value> {
    let response = match client.get(&url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            debug!(url = %url, error = %e, "GET failed");
            return None;
        }
    };

    if response.status() != reqwest::StatusCode::OK {
        debug!(url = %url, status = %response.status(), "GET ignored, status is not 200");
        return None;
    }

    match response.json::<Value>().await {
        Ok(body) => Some(body),
        Err(e) => {
            debug!(url = %url, error = %e, "GET body is not JSON");
            None
        }
    }
}

impl RequestClient for HttpClient {
    fn post(&self, path: &str, payload: Value) {
        let client = self.client.clone();
        let url = self.url(path);

        self.runtime.spawn(async move {
            if let Err(e) = client.post(&url).json(&payload).send().await {
                debug!(url = %url, error = %e, "POST failed");
            }
        });
    }

    fn get(&self, path: &str, on_ok: Continuation) {
        let client = self.client.clone();
        let url = self.url(path);

        self.runtime.spawn(async move {
            if let Some(body) = fetch_json(&client, url).await {
                on_ok(body);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        extract::State,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::json;
    use std::sync::Mutex;
    use tokio::sync::oneshot;

    type Received = Arc<Mutex<Vec<(String, Value)>>>;

    async fn record_mode(State(received): State<Received>, Json(body): Json<Value>) -> StatusCode {
        received.lock().unwrap().push(("change-mode".to_string(), body));
        StatusCode::OK
    }

    async fn record_stop(State(received): State<Received>, Json(body): Json<Value>) -> StatusCode {
        received.lock().unwrap().push(("emergency-stop".to_string(), body));
        StatusCode::OK
    }

    async fn spawn_backend() -> (String, Received) {
        let received: Received = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(
                "/data-interval",
                get(|| async { Json(json!([{ "id": "velocity", "value": 42, "unit": "km/h" }])) }),
            )
            .route(
                "/data",
                get(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(json!({}))) }),
            )
            .route("/garbage", get(|| async { "not json" }))
            .route("/change-mode", post(record_mode))
            .route("/emergency-stop", post(record_stop))
            .with_state(received.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{}/", addr), received)
    }

    async fn wait_for(received: &Received, count: usize) {
        for _ in 0..100 {
            if received.lock().unwrap().len() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        panic!("backend did not receive {} requests", count);
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://car:5000", "./data-interval"), "http://car:5000/data-interval");
        assert_eq!(join_url("http://car:5000/", "/data"), "http://car:5000/data");
        assert_eq!(join_url("http://car:5000/ui/", "steer-left"), "http://car:5000/ui/steer-left");
    }

    #[test]
    fn test_new_outside_runtime() {
        let result = HttpClient::new("http://localhost:5000", Duration::from_secs(1));
        assert!(matches!(result, Err(ClientError::NoRuntime)));
    }

    #[tokio::test]
    async fn test_get_calls_continuation_on_ok() {
        let (base, _) = spawn_backend().await;
        let client = HttpClient::new(&base, Duration::from_secs(2)).unwrap();
        assert!(!client.base_url().ends_with('/'));

        let (tx, rx) = oneshot::channel();
        client.get("./data-interval", Box::new(move |body| {
            let _ = tx.send(body);
        }));

        let body = rx.await.unwrap();
        assert_eq!(body[0]["id"], "velocity");
        assert_eq!(body[0]["value"], 42);
    }

    #[tokio::test]
    async fn test_get_ignores_errors() {
        let (base, _) = spawn_backend().await;
        let client = HttpClient::new(&base, Duration::from_secs(2)).unwrap();

        for path in ["data", "garbage", "does-not-exist"] {
            let (tx, rx) = oneshot::channel::<Value>();
            client.get(path, Box::new(move |body| {
                let _ = tx.send(body);
            }));
            // The continuation is dropped without being called
            assert!(rx.await.is_err(), "continuation ran for {}", path);
        }
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_silent() {
        let client = HttpClient::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        assert!(client.fetch("data").await.is_none());
        client.send(Command::EmergencyStop);
    }

    #[tokio::test]
    async fn test_post_sends_command_payload() {
        let (base, received) = spawn_backend().await;
        let client = HttpClient::new(&base, Duration::from_secs(2)).unwrap();

        client.send(Command::ChangeMode(None));
        wait_for(&received, 1).await;
        client.send(Command::EmergencyStop);
        wait_for(&received, 2).await;

        let received = received.lock().unwrap();
        assert!(received.contains(&("change-mode".to_string(), json!({ "mode": null }))));
        assert!(received.contains(&("emergency-stop".to_string(), json!({}))));
    }

    #[tokio::test]
    async fn test_fetch() {
        let (base, _) = spawn_backend().await;
        let client = HttpClient::new(&base, Duration::from_secs(2)).unwrap();
        assert!(client.fetch("data-interval").await.is_some());
        assert!(client.fetch("data").await.is_none());
    }
}
