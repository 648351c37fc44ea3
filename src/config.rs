use std::time::Duration;

// =========================================================
// 动态运行时配置 (Runtime Configuration)
// =========================================================

/// 这些是默认值，如果环境中没有定义对应变量，则使用这些值
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_TITLE_SUFFIX: &str = "Travel";

pub const ENV_BASE_URL: &str = "TRAVEL_API_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "TRAVEL_API_TIMEOUT_MS";
pub const ENV_TITLE_SUFFIX: &str = "TRAVEL_TITLE_SUFFIX";

/// 客户端配置
/// 负责 API 地址、请求超时与页面标题后缀
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub title_suffix: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            title_suffix: DEFAULT_TITLE_SUFFIX.to_string(),
        }
    }
}

impl ClientConfig {
    /// 通过查找函数读取配置，读不到或无法解析时使用默认值
    ///
    /// 原生环境传入进程环境变量，浏览器端传入编译期常量。
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let base_url = lookup(ENV_BASE_URL)
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.base_url);

        let timeout = lookup(ENV_TIMEOUT_MS)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(defaults.timeout);

        let title_suffix = lookup(ENV_TITLE_SUFFIX)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or(defaults.title_suffix);

        Self {
            base_url,
            timeout,
            title_suffix,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 拼接完整 URL
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_missing() {
        let config = ClientConfig::from_lookup(|_| None);
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout, Duration::from_millis(5000));
        assert_eq!(config.url("/items"), "http://localhost:8080/items");
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_BASE_URL, "https://api.example.com/"),
            (ENV_TIMEOUT_MS, "not-a-number"),
            (ENV_TITLE_SUFFIX, "Trips"),
        ]);
        let config = ClientConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.base_url, "https://api.example.com");
        assert_eq!(config.timeout, Duration::from_millis(DEFAULT_TIMEOUT_MS));
        assert_eq!(config.title_suffix, "Trips");
    }
}
