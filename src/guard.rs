use crate::route::{Access, Location, RouteMatch, RouteTable};
use std::collections::HashSet;
use travel_market_shared::Role;

/// 同一次导航最多跟随的重定向次数
const MAX_REDIRECTS: usize = 3;

pub const LOGIN_PATH: &str = "/login";
pub const HOME_PATH: &str = "/";
pub const REDIRECT_QUERY: &str = "redirect";

/// 守卫判断所需的会话信息
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AuthSnapshot {
    pub has_token: bool,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// 需要登录但没有 Token
    LoginRequired,
    /// 非管理员访问管理员页面
    AdminOnly,
    /// 管理员访问个人资料页
    AdminForbidden,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow { title: String },
    Redirect { to: String, reason: RedirectReason },
}

/// 导航前检查，按顺序第一条命中的规则生效
pub fn before_each(target: &RouteMatch, auth: &AuthSnapshot) -> Decision {
    if target.meta.requires_auth && !auth.has_token {
        let to = Location::new(LOGIN_PATH)
            .with_query(REDIRECT_QUERY, &target.full_path())
            .full_path();
        return Decision::Redirect {
            to,
            reason: RedirectReason::LoginRequired,
        };
    }

    let is_admin = auth.role == Some(Role::Admin);
    match target.meta.access {
        Access::AdminOnly if !is_admin => {
            return Decision::Redirect {
                to: HOME_PATH.to_string(),
                reason: RedirectReason::AdminOnly,
            };
        }
        Access::NonAdminOnly if is_admin => {
            return Decision::Redirect {
                to: HOME_PATH.to_string(),
                reason: RedirectReason::AdminForbidden,
            };
        }
        _ => {}
    }

    Decision::Allow {
        title: target.meta.title.resolve(auth.role),
    }
}

/// 导航完成后的扩展点
pub trait AfterNavigate {
    fn after_navigate(&self, to: &RouteMatch, from: Option<&RouteMatch>);
}

/// 一次完成的导航
#[derive(Debug, Clone)]
pub struct Navigation {
    pub route: RouteMatch,
    pub document_title: String,
    /// 发生重定向时，最初请求的完整路径
    pub redirected_from: Option<String>,
    pub needs_refresh: bool,
}

// =========================================================
// 导航器 (Navigator)
// =========================================================

/// 平台无关的导航状态机
///
/// 浏览器端的路由服务负责 History API，这里只做解析、守卫与刷新标记。
pub struct Navigator {
    table: RouteTable,
    title_suffix: String,
    current: Option<RouteMatch>,
    pending_refresh: HashSet<&'static str>,
    hooks: Vec<Box<dyn AfterNavigate>>,
}

impl Navigator {
    pub fn new(table: RouteTable, title_suffix: impl Into<String>) -> Self {
        Self {
            table,
            title_suffix: title_suffix.into(),
            current: None,
            pending_refresh: HashSet::new(),
            hooks: Vec::new(),
        }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    pub fn current(&self) -> Option<&RouteMatch> {
        self.current.as_ref()
    }

    pub fn add_hook(&mut self, hook: impl AfterNavigate + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn navigate(&mut self, full_path: &str, auth: &AuthSnapshot) -> Navigation {
        let mut target = self.table.resolve(full_path);
        let mut redirected_from = None;

        let mut hops = 0;
        let title = loop {
            match before_each(&target, auth) {
                Decision::Allow { title } => break title,
                Decision::Redirect { to, reason } => {
                    let from = target.full_path();
                    tracing::info!(from = %from, to = %to, ?reason, "Navigation redirected");
                    if redirected_from.is_none() {
                        redirected_from = Some(from);
                    }
                    // 重定向成环时落到未找到页面，不提交未通过守卫的路由
                    if hops >= MAX_REDIRECTS {
                        tracing::warn!(to = %to, "Too many redirects, stopping");
                        target = self.table.catch_all(target.location.clone());
                        break target.meta.title.resolve(auth.role);
                    }
                    hops += 1;
                    target = self.table.resolve(&to);
                }
            }
        };

        let needs_refresh = self.mark_refresh(&target);

        let from = self.current.replace(target.clone());
        for hook in &self.hooks {
            hook.after_navigate(&target, from.as_ref());
        }

        Navigation {
            document_title: format!("{} - {}", title, self.title_suffix),
            route: target,
            redirected_from,
            needs_refresh,
        }
    }

    // 来源路由在目标的 refresh_from 中时，给目标打上刷新标记
    fn mark_refresh(&mut self, target: &RouteMatch) -> bool {
        let from_listed = self
            .current
            .as_ref()
            .is_some_and(|from| target.meta.refresh_from.contains(&from.name));
        if from_listed {
            self.pending_refresh.insert(target.name);
        }
        from_listed
    }

    /// 取走刷新标记：返回 true 表示视图应重新拉取数据
    pub fn take_refresh(&mut self, name: &str) -> bool {
        self.pending_refresh.remove(name)
    }
}
