use crate::error::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;
use travel_market_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: String) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析响应体；空响应体视为 JSON `null`，以便 `()` 类型的响应
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body)
            .map_err(|e| ApiError::unknown(format!("Malformed response body: {}", e)))
    }
}

/// HTTP 客户端特性 (Trait)
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器环境下某些类型不是 Send 的
///
/// 实现者只负责传输：网络失败与超时返回 `ApiErrorKind::Transport`，
/// 任何状态码的响应都作为 `Ok` 返回。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

// =========================================================
// 实现层: Reqwest 客户端 (Native)
// =========================================================

#[cfg(not(target_arch = "wasm32"))]
#[derive(Clone, Default)]
pub struct ReqwestHttpClient {
    client: reqwest::Client,
}

#[cfg(not(target_arch = "wasm32"))]
impl ReqwestHttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait::async_trait(?Send)]
impl HttpClient for ReqwestHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let method = match req.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.client.request(method, &req.url);

        for (k, v) in req.headers {
            builder = builder.header(k, v);
        }

        if let Some(body) = req.body {
            builder = builder.body(body);
        }

        if let Some(timeout) = req.timeout {
            builder = builder.timeout(timeout);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| ApiError::transport(format!("Reqwest Error: {}", e)))?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::transport(format!("Reqwest Body Error: {}", e)))?;

        Ok(HttpResponse { status, body })
    }
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

/// 已记录的请求 (Method, URL, Headers, Body)
#[cfg(test)]
pub type RecordedRequest = (HttpMethod, String, HashMap<String, String>, Option<String>);

#[cfg(test)]
pub struct MockHttpClient {
    // ((Method, URL), Result<(Status, Response Body)>)
    responses: RefCell<HashMap<(HttpMethod, String), Result<(u16, String), String>>>,
    pub requests: RefCell<Vec<RecordedRequest>>,
    timeouts: RefCell<Vec<Option<Duration>>>,
    // 请求发出时的回调，用于观察"请求进行中"的状态
    on_send: RefCell<Option<Box<dyn Fn(&HttpRequest)>>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            timeouts: RefCell::new(Vec::new()),
            on_send: RefCell::new(None),
        }
    }

    pub fn mock_response(
        &self,
        method: HttpMethod,
        url: &str,
        status: u16,
        body: serde_json::Value,
    ) {
        self.responses
            .borrow_mut()
            .insert((method, url.to_string()), Ok((status, body.to_string())));
    }

    pub fn mock_empty(&self, method: HttpMethod, url: &str, status: u16) {
        self.responses
            .borrow_mut()
            .insert((method, url.to_string()), Ok((status, String::new())));
    }

    /// 模拟网络失败
    pub fn mock_transport_error(&self, method: HttpMethod, url: &str) {
        self.responses
            .borrow_mut()
            .insert((method, url.to_string()), Err("connection refused".to_string()));
    }

    pub fn on_send(&self, observer: impl Fn(&HttpRequest) + 'static) {
        *self.on_send.borrow_mut() = Some(Box::new(observer));
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }

    /// 最近一次请求携带的超时
    pub fn last_timeout(&self) -> Option<Duration> {
        self.timeouts.borrow().last().copied().flatten()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        if let Some(observer) = self.on_send.borrow().as_ref() {
            observer(&req);
        }

        self.requests.borrow_mut().push((
            req.method,
            req.url.clone(),
            req.headers.clone(),
            req.body.clone(),
        ));
        self.timeouts.borrow_mut().push(req.timeout);

        let responses = self.responses.borrow();
        match responses.get(&(req.method, req.url.clone())) {
            Some(Ok((status, body))) => Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            }),
            Some(Err(reason)) => Err(ApiError::transport(reason.clone())),
            None => Ok(HttpResponse {
                status: 404,
                body: "Not Found".to_string(),
            }),
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_reqwest_timeout_is_transport_error() {
        // 接受连接但从不响应
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let req = HttpRequest::new(&format!("http://{}/items", addr), HttpMethod::Get)
            .with_timeout(Duration::from_millis(200));
        let started = std::time::Instant::now();
        let err = ReqwestHttpClient::new().send(req).await.unwrap_err();

        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_empty_body_decodes_as_unit() {
        let resp = HttpResponse {
            status: 204,
            body: String::new(),
        };
        assert!(resp.is_success());
        resp.json::<()>().unwrap();
    }
}
