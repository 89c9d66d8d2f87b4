#![allow(dead_code)]

use std::collections::HashMap;

use axum::{
    body::Body,
    http::{self, Request, StatusCode},
    Router,
};
use envconfig::Envconfig;
use http_body_util::BodyExt; // for `collect`
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use image_service::config::{Config, ServiceConfig};
use image_service::prometheus::setup_metrics_registry;
use image_service::router::{router, State};

pub const FULLY_CONFIGURED: &[(&str, &str)] = &[
    ("JWT_SECRET", "jwt"),
    ("IMAGE_SERVICE_TOKEN", "token"),
    ("S3_ACCESS_KEY", "access"),
    ("S3_SECRET_KEY", "secret"),
    ("S3_BUCKET", "images"),
    ("S3_REGION", "eu-central-1"),
];

pub fn service_config(vars: &[(&str, &str)]) -> ServiceConfig {
    let env: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::init_from_hashmap(&env)
        .expect("invalid test configuration")
        .into()
}

pub fn app(vars: &[(&str, &str)]) -> Router {
    let metrics = setup_metrics_registry().expect("failed to build metrics registry");
    router(State::new(service_config(vars), metrics))
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("response is not json")
    }

    pub fn text(&self) -> String {
        String::from_utf8(self.body.clone()).expect("response is not utf-8")
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(http::header::CONTENT_TYPE)
        .map(|value| value.to_str().unwrap().to_owned());
    let body = response.into_body().collect().await.unwrap().to_bytes();

    TestResponse {
        status,
        content_type,
        body: body.to_vec(),
    }
}

pub async fn get(app: &Router, uri: &str) -> TestResponse {
    send(app, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

pub async fn post_process(app: &Router, authorization: Option<&str>, body: &str) -> TestResponse {
    let mut request = Request::builder()
        .method(http::Method::POST)
        .uri("/process")
        .header(http::header::CONTENT_TYPE, "application/json");
    if let Some(value) = authorization {
        request = request.header(http::header::AUTHORIZATION, value);
    }

    send(app, request.body(Body::from(body.to_owned())).unwrap()).await
}
