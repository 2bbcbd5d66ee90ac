// ABOUTME: Fluent request builder for exercising axum routers in tests
// ABOUTME: Drives a router through tower::ServiceExt::oneshot and decodes JSON bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 FitPlanHub

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tower::ServiceExt;

/// Fluent test request against an in-process router
pub struct AxumTestRequest {
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Option<Vec<u8>>,
}

impl AxumTestRequest {
    fn new(method: Method, uri: &str) -> Self {
        Self {
            method,
            uri: uri.to_owned(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(uri: &str) -> Self {
        Self::new(Method::GET, uri)
    }

    pub fn post(uri: &str) -> Self {
        Self::new(Method::POST, uri)
    }

    pub fn put(uri: &str) -> Self {
        Self::new(Method::PUT, uri)
    }

    pub fn delete(uri: &str) -> Self {
        Self::new(Method::DELETE, uri)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_owned(), value.to_owned()));
        self
    }

    pub fn json<T: Serialize>(mut self, body: &T) -> Self {
        self.body = Some(serde_json::to_vec(body).unwrap());
        self.headers
            .push(("content-type".to_owned(), "application/json".to_owned()));
        self
    }

    pub async fn send(self, router: Router) -> AxumTestResponse {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        for (name, value) in self.headers {
            builder = builder.header(name, value);
        }
        let body = self.body.map_or_else(Body::empty, Body::from);
        let request = builder.body(body).unwrap();

        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        AxumTestResponse {
            status,
            body: bytes.to_vec(),
        }
    }
}

/// Captured response: status plus buffered body
pub struct AxumTestResponse {
    status: StatusCode,
    body: Vec<u8>,
}

impl AxumTestResponse {
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Decode the body into a typed value, panicking with the raw body on
    /// mismatch so failures stay debuggable
    pub fn json<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).unwrap_or_else(|e| {
            panic!(
                "Failed to decode response body: {e}\nbody: {}",
                String::from_utf8_lossy(&self.body)
            )
        })
    }

    /// Decode the body as loose JSON
    pub fn json_value(&self) -> serde_json::Value {
        self.json()
    }
}
