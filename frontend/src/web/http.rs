//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient`，超时通过 `AbortController` 中止请求。

use std::time::Duration;

use travel_market::request::{HttpRequest, HttpResponse};
use travel_market::{ApiError, ApiResult, HttpClient};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response};

use super::timer::Timeout;

fn js_error(context: &str, value: JsValue) -> ApiError {
    ApiError::transport(format!("{}: {:?}", context, value))
}

/// 浏览器 fetch 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

impl FetchHttpClient {
    fn build_request(req: &HttpRequest, controller: &AbortController) -> ApiResult<Request> {
        let headers = Headers::new().map_err(|e| js_error("Failed to create Headers", e))?;
        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| js_error("Failed to set header", e))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        opts.set_signal(Some(&controller.signal()));

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| js_error("Failed to build request", e))
    }

    // 超时后中止请求；返回的守卫需要活到请求结束
    fn arm_timeout(controller: &AbortController, timeout: Option<Duration>) -> Option<Timeout> {
        let timeout = timeout?;
        let controller = controller.clone();
        let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);
        match Timeout::new(millis, move || controller.abort()) {
            Ok(guard) => Some(guard),
            Err(e) => {
                tracing::warn!(error = ?e, "Failed to arm request timeout");
                None
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let controller =
            AbortController::new().map_err(|e| js_error("Failed to create AbortController", e))?;
        let request = Self::build_request(&req, &controller)?;
        let _timeout = Self::arm_timeout(&controller, req.timeout);

        let window = web_sys::window().ok_or_else(|| ApiError::transport("window unavailable"))?;

        let resp_value = match JsFuture::from(window.fetch_with_request(&request)).await {
            Ok(value) => value,
            Err(_) if controller.signal().aborted() => {
                let millis = req.timeout.map(|t| t.as_millis()).unwrap_or_default();
                return Err(ApiError::transport(format!(
                    "timeout of {}ms exceeded",
                    millis
                )));
            }
            Err(e) => return Err(js_error("Network Error", e)),
        };

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| js_error("Unexpected fetch result", e))?;
        let status = response.status();

        let promise = response
            .text()
            .map_err(|e| js_error("Failed to read body", e))?;
        let body = JsFuture::from(promise)
            .await
            .map_err(|e| js_error("Failed to read body", e))?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse { status, body })
    }
}
