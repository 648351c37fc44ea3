//! 日志初始化（原生环境）
//!
//! 浏览器端使用自己的 writer，见前端的 `web::console`。

use tracing_subscriber::EnvFilter;

/// 安装 fmt 订阅者，过滤规则来自 `RUST_LOG`，默认 `info`
///
/// 可重复调用，之后的调用不做任何事。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_init_is_idempotent() {
        super::init();
        super::init();
        tracing::info!("telemetry ready");
    }
}
