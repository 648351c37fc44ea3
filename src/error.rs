use serde::Deserialize;
use thiserror::Error;

// =========================================================
// 错误类型枚举
// =========================================================

/// 错误类型枚举
/// 在 HTTP 边界处根据状态码一次性判定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 400 / 409 / 422: 请求校验失败
    Validation,
    /// 401 / 403: 未登录或无权限
    Auth,
    /// 404: 资源未找到
    NotFound,
    /// 网络失败或请求超时
    Transport,
    /// 其它非 2xx 状态，或成功响应体无法解析
    Unknown,
}

impl ApiErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            400 | 409 | 422 => ApiErrorKind::Validation,
            401 | 403 => ApiErrorKind::Auth,
            404 => ApiErrorKind::NotFound,
            _ => ApiErrorKind::Unknown,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ApiErrorKind::Validation => "INVALID_INPUT",
            ApiErrorKind::Auth => "UNAUTHORIZED",
            ApiErrorKind::NotFound => "RESOURCE_NOT_FOUND",
            ApiErrorKind::Transport => "TRANSPORT_ERROR",
            ApiErrorKind::Unknown => "UNKNOWN_ERROR",
        }
    }
}

// =========================================================
// 错误上下文追踪
// =========================================================

/// 结构化的错误追踪片段
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSpan {
    /// 操作名称，如 "items.fetch", "session.login"
    pub operation: String,
    pub detail: Option<String>,
}

fn code_of(kind: &ApiErrorKind) -> &'static str {
    kind.error_code()
}

fn trace_suffix(spans: &[ErrorSpan]) -> String {
    if spans.is_empty() {
        return String::new();
    }
    let trace = spans
        .iter()
        .map(|span| match &span.detail {
            Some(detail) => format!("{}({})", span.operation, detail),
            None => span.operation.clone(),
        })
        .collect::<Vec<_>>()
        .join(" -> ");
    format!(" | trace: {}", trace)
}

// =========================================================
// 核心错误类型
// =========================================================

/// 客户端统一错误
///
/// - kind: 错误类型
/// - status: HTTP 状态码（传输失败时为 None）
/// - message: 人类可读的错误消息
/// - spans: 结构化的调用追踪栈
#[derive(Debug, Clone, Error)]
#[error("[{}] {}{}", code_of(.kind), .message, trace_suffix(.spans))]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: Option<u16>,
    pub message: String,
    /// 消息是否来自服务端错误体
    from_server: bool,
    spans: Vec<ErrorSpan>,
}

/// 服务端错误体的几种形态
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    errors: Option<Vec<ErrorReason>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorReason {
    #[serde(default)]
    reason: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            status: None,
            message: message.into(),
            from_server: false,
            spans: Vec::new(),
        }
    }

    // --- Convenience constructors ---

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Validation, message)
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Auth, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Transport, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Unknown, message)
    }

    /// 从非 2xx 响应构造错误
    ///
    /// 消息优先级：`errors[].reason`（以 "; " 连接）、`message`、`error`，否则使用通用消息。
    pub fn from_response(status: u16, body: &str) -> Self {
        let kind = ApiErrorKind::from_status(status);
        let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();

        let reasons = parsed
            .errors
            .map(|errs| {
                errs.into_iter()
                    .map(|e| e.reason)
                    .filter(|r| !r.is_empty())
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .filter(|joined| !joined.is_empty());

        let server_message = reasons
            .or(parsed.message.filter(|m| !m.is_empty()))
            .or(parsed.error.filter(|m| !m.is_empty()));

        let (message, from_server) = match server_message {
            Some(msg) => (msg, true),
            None => (format!("Request failed with status code {}", status), false),
        };

        Self {
            kind,
            status: Some(status),
            message,
            from_server,
            spans: Vec::new(),
        }
    }

    // --- Context builders ---

    /// 添加操作追踪（无额外细节）
    pub fn in_op(mut self, operation: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: None,
        });
        self
    }

    /// 添加操作追踪（带额外细节）
    pub fn in_op_with(mut self, operation: impl Into<String>, detail: impl Into<String>) -> Self {
        self.spans.push(ErrorSpan {
            operation: operation.into(),
            detail: Some(detail.into()),
        });
        self
    }

    // --- Accessors ---

    pub fn error_code(&self) -> &'static str {
        self.kind.error_code()
    }

    /// 服务端给出的错误消息（若有）
    pub fn server_message(&self) -> Option<&str> {
        self.from_server.then_some(self.message.as_str())
    }

    pub fn spans(&self) -> &[ErrorSpan] {
        &self.spans
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiErrorKind::from_status(400), ApiErrorKind::Validation);
        assert_eq!(ApiErrorKind::from_status(409), ApiErrorKind::Validation);
        assert_eq!(ApiErrorKind::from_status(422), ApiErrorKind::Validation);
        assert_eq!(ApiErrorKind::from_status(401), ApiErrorKind::Auth);
        assert_eq!(ApiErrorKind::from_status(403), ApiErrorKind::Auth);
        assert_eq!(ApiErrorKind::from_status(404), ApiErrorKind::NotFound);
        assert_eq!(ApiErrorKind::from_status(500), ApiErrorKind::Unknown);
    }

    #[test]
    fn test_reasons_are_joined() {
        let err = ApiError::from_response(
            422,
            r#"{"errors":[{"reason":"name is required"},{"reason":"price must be positive"}]}"#,
        );
        assert_eq!(err.kind, ApiErrorKind::Validation);
        assert_eq!(err.message, "name is required; price must be positive");
        assert_eq!(err.server_message(), Some(err.message.as_str()));
    }

    #[test]
    fn test_message_then_error_then_generic() {
        let err = ApiError::from_response(401, r#"{"message":"Bad credentials"}"#);
        assert_eq!(err.server_message(), Some("Bad credentials"));

        let err = ApiError::from_response(500, r#"{"error":"Internal Server Error"}"#);
        assert_eq!(err.server_message(), Some("Internal Server Error"));

        let err = ApiError::from_response(502, "<html>bad gateway</html>");
        assert_eq!(err.server_message(), None);
        assert_eq!(err.message, "Request failed with status code 502");
        assert_eq!(err.status, Some(502));
    }

    #[test]
    fn test_display_includes_trace() {
        let err = ApiError::transport("timeout")
            .in_op_with("items.fetch", "7")
            .in_op("container.items");
        assert_eq!(
            err.to_string(),
            "[TRANSPORT_ERROR] timeout | trace: items.fetch(7) -> container.items"
        );
    }
}
