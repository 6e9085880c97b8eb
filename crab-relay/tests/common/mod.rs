//! Test harness: in-process app, fixed clock, JSON helpers

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use chrono::{DateTime, TimeZone, Utc};
use crab_relay::{Config, FixedClock, ServerState, api};
use futures::StreamExt;
use http::{Method, Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
    pub clock: Arc<FixedClock>,
}

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_config(Duration::from_secs(30), "public")
    }

    pub fn with_config(heartbeat: Duration, public_dir: impl AsRef<Path>) -> Self {
        let config = Config::with_overrides(0, heartbeat, public_dir.as_ref());
        let clock = Arc::new(FixedClock::new(t0()));
        let state = ServerState::with_clock(config, clock.clone());
        let app = api::build_app(&state);
        Self { app, state, clock }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
        let builder = Request::builder().method(method).uri(uri);
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.app.clone().oneshot(req).await.unwrap()
    }

    /// Send a request and decode the JSON response body
    pub async fn json(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let resp = self.request(method, uri, body).await;
        let status = resp.status();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    pub async fn post_order(&self, payload: Value) -> (StatusCode, Value) {
        self.json(Method::POST, "/webhook/orders", Some(payload)).await
    }

    pub async fn patch_status(&self, order_id: &str, body: Value) -> (StatusCode, Value) {
        self.json(
            Method::PATCH,
            &format!("/admin/orders/{order_id}/status"),
            Some(body),
        )
        .await
    }

    pub async fn list_orders(&self) -> Vec<Value> {
        let (status, body) = self.json(Method::GET, "/admin/orders", None).await;
        assert_eq!(status, StatusCode::OK);
        body["orders"].as_array().cloned().unwrap_or_default()
    }

    /// Open `/admin/stream` and return a frame reader over its body
    pub async fn open_stream(&self) -> SseReader {
        let resp = self.request(Method::GET, "/admin/stream", None).await;
        assert_eq!(resp.status(), StatusCode::OK);
        SseReader::new(resp)
    }
}

/// Parsed SSE frame
#[derive(Debug, Clone, PartialEq)]
pub enum SseFrame {
    Data(Value),
    Comment(String),
}

pub struct SseReader {
    pub headers: http::HeaderMap,
    body: axum::body::BodyDataStream,
    buffer: String,
}

impl SseReader {
    fn new(resp: Response<Body>) -> Self {
        let (parts, body) = resp.into_parts();
        Self {
            headers: parts.headers,
            body: body.into_data_stream(),
            buffer: String::new(),
        }
    }

    /// Next complete frame, `None` once the stream has ended
    pub async fn next_frame(&mut self) -> Option<SseFrame> {
        loop {
            if let Some(end) = self.buffer.find("\n\n") {
                let raw: String = self.buffer.drain(..end + 2).collect();
                return Some(parse_frame(raw.trim_end()));
            }
            let chunk = self.body.next().await?.ok()?;
            self.buffer.push_str(std::str::from_utf8(&chunk).unwrap());
        }
    }

    /// Next frame with a timeout so a missing event fails instead of hanging
    pub async fn next_frame_within(&mut self, limit: Duration) -> Option<SseFrame> {
        tokio::time::timeout(limit, self.next_frame())
            .await
            .expect("timed out waiting for stream frame")
    }

    /// Next data frame, skipping heartbeats
    pub async fn next_event(&mut self) -> Value {
        loop {
            match self.next_frame_within(Duration::from_secs(2)).await {
                Some(SseFrame::Data(value)) => return value,
                Some(SseFrame::Comment(_)) => continue,
                None => panic!("stream ended before the next event"),
            }
        }
    }
}

fn parse_frame(raw: &str) -> SseFrame {
    let mut data = String::new();
    for line in raw.lines() {
        if let Some(comment) = line.strip_prefix(':') {
            return SseFrame::Comment(comment.trim().to_string());
        }
        if let Some(chunk) = line.strip_prefix("data:") {
            data.push_str(chunk.trim_start());
        }
    }
    SseFrame::Data(serde_json::from_str(&data).unwrap())
}
