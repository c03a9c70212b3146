//! In-process request client for unit tests

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::network::{Continuation, RequestClient};

/// Records every POST and lets the test decide when and how GETs complete.
///
/// A GET to a path with a canned reply completes synchronously; any other GET
/// is parked until [`RecordingClient::complete`] or dropped by
/// [`RecordingClient::fail`].
#[derive(Default)]
pub struct RecordingClient {
    posts: Mutex<Vec<(String, Value)>>,
    replies: Mutex<HashMap<String, Value>>,
    parked: Mutex<Vec<(String, Option<Continuation>)>>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every future GET of `path` immediately with `body`
    pub fn reply(&self, path: &str, body: Value) {
        self.replies.lock().unwrap().insert(path.to_string(), body);
    }

    pub fn posts(&self) -> Vec<(String, Value)> {
        self.posts.lock().unwrap().clone()
    }

    pub fn post_paths(&self) -> Vec<String> {
        self.posts().into_iter().map(|(path, _)| path).collect()
    }

    pub fn clear_posts(&self) {
        self.posts.lock().unwrap().clear();
    }

    /// Paths of all parked GETs, including completed ones, in issue order
    pub fn parked_paths(&self) -> Vec<String> {
        self.parked.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    /// Complete the parked GET number `index` with `body`
    pub fn complete(&self, index: usize, body: Value) {
        let on_ok = self.parked.lock().unwrap()[index].1.take();
        if let Some(on_ok) = on_ok {
            on_ok(body);
        }
    }

    /// Drop the parked GET number `index`, as a failed request would
    pub fn fail(&self, index: usize) {
        self.parked.lock().unwrap()[index].1.take();
    }
}

impl RequestClient for RecordingClient {
    fn post(&self, path: &str, payload: Value) {
        self.posts.lock().unwrap().push((path.to_string(), payload));
    }

    fn get(&self, path: &str, on_ok: Continuation) {
        let reply = self.replies.lock().unwrap().get(path).cloned();
        match reply {
            Some(body) => on_ok(body),
            None => self
                .parked
                .lock()
                .unwrap()
                .push((path.to_string(), Some(on_ok))),
        }
    }
}
