use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use travel_market_shared::Role;

/// 从会话 Token 中解析出的身份信息
///
/// 只解码 JWT 的 payload 段，不校验签名；签名由后端负责。
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Identity {
    #[serde(deserialize_with = "string_or_number")]
    pub sub: String,
    #[serde(rename = "userRole")]
    pub role: Role,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
}

// 部分后端把 sub 签成数字
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Sub {
        Text(String),
        Number(i64),
    }

    Ok(match Sub::deserialize(deserializer)? {
        Sub::Text(s) => s,
        Sub::Number(n) => n.to_string(),
    })
}

impl Identity {
    /// 解码 Token；缺失段、非法 base64 或非法 JSON 均返回 None
    pub fn decode(token: &str) -> Option<Self> {
        let payload = token.split('.').nth(1)?;
        let payload = payload.trim_end_matches('=');
        if payload.is_empty() {
            return None;
        }

        let bytes = URL_SAFE_NO_PAD
            .decode(payload)
            .or_else(|_| STANDARD_NO_PAD.decode(payload))
            .ok()?;

        serde_json::from_slice(&bytes).ok()
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        self.iat.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.exp.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    /// 没有 exp 的 Token 视为永不过期
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    /// 构造一个未签名的测试 Token
    pub fn make_token(payload: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{}.{}.signature", header, body)
    }

    pub fn token_for(role: &str) -> String {
        make_token(json!({
            "sub": "alice",
            "userRole": role,
            "iat": 1_700_000_000,
            "exp": 4_102_444_800i64
        }))
    }

    #[test]
    fn test_decode_roles() {
        for (raw, role) in [
            ("ADMIN", Role::Admin),
            ("MERCHANT", Role::Merchant),
            ("CUSTOMER", Role::Customer),
        ] {
            let identity = Identity::decode(&token_for(raw)).unwrap();
            assert_eq!(identity.role, role);
            assert_eq!(identity.sub, "alice");
        }
    }

    #[test]
    fn test_numeric_sub() {
        let token = make_token(json!({"sub": 42, "userRole": "CUSTOMER"}));
        let identity = Identity::decode(&token).unwrap();
        assert_eq!(identity.sub, "42");
        assert!(identity.exp.is_none());
        assert!(!identity.is_expired(Utc::now()));
    }

    #[test]
    fn test_undecodable_tokens() {
        assert!(Identity::decode("").is_none());
        assert!(Identity::decode("not-a-jwt").is_none());
        assert!(Identity::decode("a.!!!.c").is_none());
        let not_json = format!("a.{}.c", URL_SAFE_NO_PAD.encode(b"hello"));
        assert!(Identity::decode(&not_json).is_none());
        let unknown_role = make_token(json!({"sub": "x", "userRole": "GUEST"}));
        assert!(Identity::decode(&unknown_role).is_none());
    }

    #[test]
    fn test_expiry() {
        let token = make_token(json!({"sub": "x", "userRole": "ADMIN", "iat": 100, "exp": 200}));
        let identity = Identity::decode(&token).unwrap();
        assert_eq!(identity.issued_at().unwrap().timestamp(), 100);
        assert!(identity.is_expired(DateTime::from_timestamp(200, 0).unwrap()));
        assert!(!identity.is_expired(DateTime::from_timestamp(199, 0).unwrap()));
    }
}
