use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{HttpClient, HttpRequest};
use travel_market_shared::protocol::ApiRequest;
use travel_market_shared::{CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE};

// =========================================================
// 请求管线: ApiClient
// =========================================================

/// 统一的请求/响应管线
///
/// 负责拼接 URL、设置 JSON 头与超时、记录请求日志并规范化错误。
/// 它不读取会话状态，Token 由调用方传入。
pub struct ApiClient<C: HttpClient> {
    config: ClientConfig,
    client: C,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(config: ClientConfig, client: C) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &C {
        &self.client
    }

    // 这里接受任何实现了 ApiRequest 的端点
    // Token 为空字符串时视为未登录，不附加 Authorization 头
    pub async fn call<R: ApiRequest>(
        &self,
        req: &R,
        token: Option<&str>,
    ) -> ApiResult<R::Response> {
        let method = R::METHOD;
        let path = req.path();
        let url = self.config.url(&path);

        let mut http = HttpRequest::new(&url, method)
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .with_timeout(self.config.timeout);

        if let Some(token) = token.filter(|t| !t.is_empty()) {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("Bearer {}", token));
        }

        if let Some(body) = req.body() {
            let encoded = serde_json::to_string(body)
                .map_err(|e| ApiError::validation(format!("Invalid request body: {}", e)))?;
            http = http.with_body(encoded);
        }

        tracing::debug!(method = %method, url = %url, "API Request");

        let resp = match self.client.send(http).await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::error!(method = %method, url = %url, error = %err, "Request Error");
                return Err(err.in_op_with("api.call", path));
            }
        };

        tracing::debug!(status = resp.status, body = %resp.body, "API Response");

        if !resp.is_success() {
            let err = ApiError::from_response(resp.status, &resp.body).in_op_with("api.call", path);
            tracing::error!(status = resp.status, error = %err, "Response Error");
            return Err(err);
        }

        resp.json::<R::Response>().map_err(|e| e.in_op_with("api.decode", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use crate::request::MockHttpClient;
    use serde_json::json;
    use travel_market_shared::protocol::{DeleteItem, GetSelf, HttpMethod, ListItems, Login};
    use travel_market_shared::Credentials;

    fn client() -> ApiClient<MockHttpClient> {
        ApiClient::new(ClientConfig::default(), MockHttpClient::new())
    }

    #[tokio::test]
    async fn test_bearer_and_json_headers() {
        let api = client();
        api.transport().mock_response(
            HttpMethod::Get,
            "http://localhost:8080/users/self",
            200,
            json!({"userId": 1, "userName": "alice", "userRole": "CUSTOMER"}),
        );

        let user = api.call(&GetSelf {}, Some("abc")).await.unwrap();
        assert_eq!(user.user_name, "alice");

        let (method, _, headers, body) = api.transport().last_request().unwrap();
        assert_eq!(method, HttpMethod::Get);
        assert_eq!(headers.get("Authorization").unwrap(), "Bearer abc");
        assert_eq!(headers.get("Content-Type").unwrap(), "application/json");
        assert!(body.is_none());
    }

    #[tokio::test]
    async fn test_configured_timeout_is_applied() {
        let config = ClientConfig {
            timeout: std::time::Duration::from_millis(1500),
            ..ClientConfig::default()
        };
        let api = ApiClient::new(config, MockHttpClient::new());
        api.transport()
            .mock_response(HttpMethod::Get, "http://localhost:8080/items", 200, json!([]));

        api.call(&ListItems {}, None).await.unwrap();
        assert_eq!(api.transport().last_timeout(), Some(api.config().timeout));

        let api = client();
        api.transport().mock_transport_error(HttpMethod::Get, "http://localhost:8080/items");
        let err = api.call(&ListItems {}, None).await.unwrap_err();
        assert_eq!(
            api.transport().last_timeout(),
            Some(std::time::Duration::from_millis(5000))
        );
        assert_eq!(err.kind, ApiErrorKind::Transport);
    }

    #[tokio::test]
    async fn test_no_authorization_without_token() {
        let api = client();
        api.transport()
            .mock_response(HttpMethod::Get, "http://localhost:8080/items", 200, json!([]));

        api.call(&ListItems {}, None).await.unwrap();
        api.call(&ListItems {}, Some("")).await.unwrap();

        for (_, _, headers, _) in api.transport().requests.borrow().iter() {
            assert!(!headers.contains_key("Authorization"));
        }
    }

    #[tokio::test]
    async fn test_body_is_serialized() {
        let api = client();
        api.transport().mock_response(
            HttpMethod::Post,
            "http://localhost:8080/auth/login",
            200,
            json!({"token": "t"}),
        );
        let login = Login {
            body: Credentials {
                username: "bob".into(),
                password: "pw".into(),
            },
        };
        let resp = api.call(&login, None).await.unwrap();
        assert_eq!(resp.token, "t");

        let (_, _, _, body) = api.transport().last_request().unwrap();
        let sent: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
        assert_eq!(sent, json!({"username": "bob", "password": "pw"}));
    }

    #[tokio::test]
    async fn test_empty_body_decodes_unit() {
        let api = client();
        api.transport().mock_empty(HttpMethod::Delete, "http://localhost:8080/items/3", 204);
        api.call(&DeleteItem { id: 3 }, None).await.unwrap();
    }

    #[tokio::test]
    async fn test_error_normalization() {
        let api = client();
        api.transport().mock_response(
            HttpMethod::Get,
            "http://localhost:8080/items",
            200,
            json!({"unexpected": true}),
        );
        let err = api.call(&ListItems {}, None).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Unknown);

        api.transport().mock_transport_error(HttpMethod::Get, "http://localhost:8080/users/self");
        let err = api.call(&GetSelf {}, Some("abc")).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Transport);
        assert_eq!(err.status, None);

        let err = api.call(&DeleteItem { id: 99 }, None).await.unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.status, Some(404));
    }
}
