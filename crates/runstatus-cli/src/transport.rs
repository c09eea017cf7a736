//! HTTP transport to the status page API.
//!
//! A [`Transport`] performs exactly one signed request and hands back the
//! raw status and body; interpreting them is left to
//! [`ApiClient`](crate::client::ApiClient). There are no retries and no
//! client-side timeout.

use std::fmt;
use std::future::Future;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, DATE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::error::CliError;
use crate::sign::RequestSigner;

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        })
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Delete => Self::DELETE,
        }
    }
}

/// An unsigned API request.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// Method.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// JSON body, if any.
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    /// A `GET` request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    /// A `DELETE` request.
    #[must_use]
    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            body: None,
        }
    }

    /// A `POST` request with a JSON body.
    pub fn post<B: Serialize>(url: impl Into<String>, body: &B) -> Result<Self, CliError> {
        let body = serde_json::to_value(body)
            .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
        Ok(Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body),
        })
    }
}

/// Status and body of an API response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw body.
    pub body: String,
}

impl ApiResponse {
    /// Create a response.
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, CliError> {
        serde_json::from_str(&self.body).map_err(|e| CliError::Decode(e.to_string()))
    }
}

/// Sends one request, returns one response.
///
/// This trait allows for testing with fake implementations.
pub trait Transport: Send + Sync {
    /// Perform the request.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::Transport`] if no HTTP response was received.
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<ApiResponse, CliError>> + Send;
}

/// Real transport over HTTPS with signed requests.
pub struct HttpTransport<S> {
    client: reqwest::Client,
    signer: S,
}

impl<S> fmt::Debug for HttpTransport<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport").finish_non_exhaustive()
    }
}

impl<S: RequestSigner> HttpTransport<S> {
    /// Create a transport signing every request with `signer`.
    pub fn new(signer: S) -> Result<Self, CliError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("runstatus-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CliError::Transport(e.to_string()))?;
        Ok(Self { client, signer })
    }
}

impl<S: RequestSigner> Transport for HttpTransport<S> {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, CliError> {
        // The signed bytes must be the sent bytes.
        let body = match &request.body {
            Some(value) => serde_json::to_string(value)
                .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?,
            None => String::new(),
        };
        let signed = self.signer.sign(&request.url, &body)?;

        let mut builder = self
            .client
            .request(request.method.into(), &request.url)
            .header(ACCEPT, "application/json")
            .header(DATE, signed.date)
            .header(AUTHORIZATION, signed.authorization);
        if request.body.is_some() {
            builder = builder.header(CONTENT_TYPE, "application/json").body(body);
        }

        debug!(method = %request.method, url = %request.url, "Sending request");
        let response = builder
            .send()
            .await
            .map_err(|e| CliError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CliError::Transport(e.to_string()))?;
        debug!(status, "Received response");
        trace!(body = %body, "Response body");

        Ok(ApiResponse { status, body })
    }
}

/// Fake transport for testing: records requests, replays canned responses.
#[cfg(test)]
pub struct FakeTransport {
    responses: parking_lot::Mutex<std::collections::VecDeque<ApiResponse>>,
    requests: parking_lot::Mutex<Vec<ApiRequest>>,
}

#[cfg(test)]
impl FakeTransport {
    /// Create a fake that answers with `responses` in order.
    pub fn new(responses: impl IntoIterator<Item = ApiResponse>) -> Self {
        Self {
            responses: parking_lot::Mutex::new(responses.into_iter().collect()),
            requests: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().clone()
    }
}

#[cfg(test)]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, CliError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .ok_or_else(|| CliError::Transport("connection refused".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sign::ExoscaleSigner;

    #[test]
    fn post_serializes_body() {
        #[derive(Serialize)]
        struct Body<'a> {
            name: &'a str,
        }
        let request = ApiRequest::post("http://x/services", &Body { name: "api" }).expect("post");
        assert_eq!(request.method, Method::Post);
        assert_eq!(request.body, Some(serde_json::json!({"name": "api"})));
    }

    #[test]
    fn bodyless_requests() {
        assert_eq!(ApiRequest::get("http://x").body, None);
        assert_eq!(ApiRequest::delete("http://x").method, Method::Delete);
    }

    #[test]
    fn method_display() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::Post.to_string(), "POST");
        assert_eq!(Method::Delete.to_string(), "DELETE");
    }

    #[test]
    fn response_json_decode_error() {
        let response = ApiResponse::new(200, "<html>");
        let result: Result<serde_json::Value, _> = response.json();
        assert!(matches!(result, Err(CliError::Decode(_))));
    }

    #[tokio::test]
    async fn fake_transport_records_and_replays() {
        let fake = FakeTransport::new([ApiResponse::new(200, "{}")]);
        let response = fake.send(ApiRequest::get("http://x")).await.expect("send");
        assert_eq!(response.status, 200);
        assert!(fake.send(ApiRequest::get("http://y")).await.is_err());
        assert_eq!(fake.requests().len(), 2);
    }

    #[tokio::test]
    async fn http_transport_unreachable_host() {
        let transport = HttpTransport::new(ExoscaleSigner::new("key", "secret")).expect("client");
        let result = transport.send(ApiRequest::get("http://127.0.0.1:9/pages/x")).await;
        assert!(matches!(result, Err(CliError::Transport(_))));
    }
}
