// tests/common/request.rs
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    response::Response,
};
use serde::Serialize;

pub const MULTIPART_BOUNDARY: &str = "----breach-test-boundary";

/// JSONのHTTPリクエストを作成（トークンは任意）
pub fn json_request<T: Serialize>(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: &T,
) -> Request<Body> {
    let method = Method::from_bytes(method.as_bytes()).unwrap();
    let body_json = serde_json::to_string(body).unwrap();

    with_token(Request::builder().method(method).uri(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body_json))
        .unwrap()
}

/// ボディなしのリクエスト
pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let method = Method::from_bytes(method.as_bytes()).unwrap();

    with_token(Request::builder().method(method).uri(uri), token)
        .body(Body::empty())
        .unwrap()
}

fn with_token(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {}", token)),
        None => builder,
    }
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// multipart/form-data のボディを組み立てる
#[derive(Default)]
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                MULTIPART_BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                MULTIPART_BOUNDARY, name, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn into_request(mut self, uri: &str, token: Option<&str>) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", MULTIPART_BOUNDARY).as_bytes());

        with_token(Request::builder().method(Method::POST).uri(uri), token)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", MULTIPART_BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}
