use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;
use travel_market_shared::Role;

// =========================================================
// 页面与元数据 (Pages & Metadata)
// =========================================================

/// 路由对应的页面
///
/// 视图层按需把它映射到具体组件，核心库只关心标识。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Login,
    Home,
    Register,
    Items,
    ItemDetail,
    ItemEdit,
    Users,
    Profile,
    Account,
    Stores,
    StoreCreate,
    StoreDetail,
    ProductDetail,
    ProductApplications,
    NotFound,
}

/// 页面标题：固定文本，或在导航时根据当前角色计算
#[derive(Clone, Copy)]
pub enum Title {
    Literal(&'static str),
    Computed(fn(Option<Role>) -> String),
}

impl Title {
    pub fn resolve(&self, role: Option<Role>) -> String {
        match self {
            Title::Literal(text) => text.to_string(),
            Title::Computed(f) => f(role),
        }
    }
}

impl fmt::Debug for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Title::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Title::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// 角色访问限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Any,
    /// 仅管理员（如用户管理列表）
    AdminOnly,
    /// 管理员以外的角色（如个人资料页）
    NonAdminOnly,
}

#[derive(Debug, Clone, Copy)]
pub struct RouteMeta {
    pub title: Title,
    pub requires_auth: bool,
    pub keep_alive: bool,
    pub hide_sidebar: bool,
    pub access: Access,
    /// 从这些路由跳转过来时，目标页面应重新拉取数据
    pub refresh_from: &'static [&'static str],
}

impl RouteMeta {
    pub const fn new(title: Title) -> Self {
        Self {
            title,
            requires_auth: false,
            keep_alive: false,
            hide_sidebar: false,
            access: Access::Any,
            refresh_from: &[],
        }
    }

    pub const fn titled(title: &'static str) -> Self {
        Self::new(Title::Literal(title))
    }

    pub const fn auth(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    pub const fn keep_alive(mut self) -> Self {
        self.keep_alive = true;
        self
    }

    pub const fn hide_sidebar(mut self) -> Self {
        self.hide_sidebar = true;
        self
    }

    pub const fn access(mut self, access: Access) -> Self {
        self.access = access;
        self
    }

    pub const fn refresh_from(mut self, names: &'static [&'static str]) -> Self {
        self.refresh_from = names;
        self
    }
}

fn home_title(role: Option<Role>) -> String {
    match role {
        Some(Role::Admin) => "Admin Console".to_string(),
        Some(Role::Merchant) => "Merchant Center".to_string(),
        _ => "Travel".to_string(),
    }
}

fn profile_title(role: Option<Role>) -> String {
    match role {
        Some(Role::Merchant) => "Merchant Profile".to_string(),
        _ => "User Profile".to_string(),
    }
}

// =========================================================
// 路径模式 (Path Patterns)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(&'static str),
    Param(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Segments(Vec<Segment>),
    /// 匹配任意路径，如 `/:pathMatch(.*)*`
    CatchAll,
}

impl Pattern {
    fn parse(path: &'static str) -> Self {
        if path.contains("(.*)") {
            return Pattern::CatchAll;
        }
        Pattern::Segments(
            path.split('/')
                .filter(|s| !s.is_empty())
                .map(|s| match s.strip_prefix(':') {
                    Some(name) => Segment::Param(name),
                    None => Segment::Static(s),
                })
                .collect(),
        )
    }

    fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let segments = match self {
            Pattern::CatchAll => return Some(HashMap::new()),
            Pattern::Segments(segments) => segments,
        };

        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != segments.len() {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in segments.iter().zip(parts) {
            match segment {
                Segment::Static(expected) if *expected == part => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    let value = urlencoding::decode(part)
                        .map(|v| v.into_owned())
                        .unwrap_or_else(|_| part.to_string());
                    params.insert(name.to_string(), value);
                }
            }
        }
        Some(params)
    }
}

// =========================================================
// 路由描述与路由表 (Descriptors & Table)
// =========================================================

#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    pub path: &'static str,
    pub name: &'static str,
    pub page: Page,
    pub meta: RouteMeta,
    pattern: Pattern,
}

impl RouteDescriptor {
    pub fn new(path: &'static str, name: &'static str, page: Page, meta: RouteMeta) -> Self {
        Self {
            path,
            name,
            page,
            meta,
            pattern: Pattern::parse(path),
        }
    }

    pub fn is_catch_all(&self) -> bool {
        self.pattern == Pattern::CatchAll
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error("duplicate route name: {0}")]
    DuplicateName(&'static str),
    #[error("catch-all route `{0}` must be the last route")]
    CatchAllNotLast(&'static str),
    #[error("route table has no catch-all route")]
    MissingCatchAll,
}

/// 路由表
///
/// 构造时校验：名称唯一、存在通配路由且位于最后。
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<RouteDescriptor>,
}

impl RouteTable {
    pub fn new(routes: Vec<RouteDescriptor>) -> Result<Self, RouteTableError> {
        let mut names = HashSet::new();
        for route in &routes {
            if !names.insert(route.name) {
                return Err(RouteTableError::DuplicateName(route.name));
            }
        }

        let last = routes.len().saturating_sub(1);
        match routes.iter().position(RouteDescriptor::is_catch_all) {
            None => return Err(RouteTableError::MissingCatchAll),
            Some(i) if i != last => return Err(RouteTableError::CatchAllNotLast(routes[i].name)),
            Some(_) => {}
        }

        Ok(Self { routes })
    }

    /// 应用的标准路由表
    pub fn standard() -> Self {
        use Access::*;
        use Page::*;

        let routes = vec![
            RouteDescriptor::new(
                "/login",
                "login",
                Login,
                RouteMeta::titled("Login").hide_sidebar(),
            ),
            RouteDescriptor::new(
                "/",
                "home",
                Home,
                RouteMeta::new(Title::Computed(home_title)).auth().keep_alive(),
            ),
            RouteDescriptor::new(
                "/register",
                "user-create",
                Register,
                RouteMeta::titled("Register").hide_sidebar(),
            ),
            RouteDescriptor::new(
                "/items",
                "items",
                Items,
                RouteMeta::titled("Task Management")
                    .keep_alive()
                    .refresh_from(&["item-edit"]),
            ),
            RouteDescriptor::new(
                "/items/:id",
                "item-detail",
                ItemDetail,
                RouteMeta::titled("Task Details"),
            ),
            RouteDescriptor::new(
                "/items/:id/edit",
                "item-edit",
                ItemEdit,
                RouteMeta::titled("Edit Task"),
            ),
            RouteDescriptor::new(
                "/users",
                "users",
                Users,
                RouteMeta::titled("User Management")
                    .auth()
                    .keep_alive()
                    .access(AdminOnly),
            ),
            RouteDescriptor::new(
                "/profile",
                "profile",
                Profile,
                RouteMeta::new(Title::Computed(profile_title))
                    .auth()
                    .access(NonAdminOnly),
            ),
            RouteDescriptor::new(
                "/account",
                "account",
                Account,
                RouteMeta::titled("My Account").auth(),
            ),
            RouteDescriptor::new(
                "/stores",
                "stores",
                Stores,
                RouteMeta::titled("Store Management")
                    .keep_alive()
                    .refresh_from(&["store-create"]),
            ),
            RouteDescriptor::new(
                "/stores/new",
                "store-create",
                StoreCreate,
                RouteMeta::titled("Open a Store").auth(),
            ),
            RouteDescriptor::new(
                "/store/:id",
                "store-detail",
                StoreDetail,
                RouteMeta::titled("Store Detail").keep_alive(),
            ),
            RouteDescriptor::new(
                "/products/:id",
                "product-detail",
                ProductDetail,
                RouteMeta::titled("Product Detail"),
            ),
            RouteDescriptor::new(
                "/product-applications",
                "product-applications",
                ProductApplications,
                RouteMeta::titled("Product Applications")
                    .auth()
                    .keep_alive()
                    .refresh_from(&["product-detail"]),
            ),
            RouteDescriptor::new(
                "/:pathMatch(.*)*",
                "not-found",
                NotFound,
                RouteMeta::titled("Page Not Found"),
            ),
        ];

        // 标准表满足构造约束，单元测试覆盖
        Self { routes }
    }

    pub fn routes(&self) -> &[RouteDescriptor] {
        &self.routes
    }

    pub fn by_name(&self, name: &str) -> Option<&RouteDescriptor> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// 解析完整路径（可带查询串），按声明顺序第一个匹配者胜出
    pub fn resolve(&self, full_path: &str) -> RouteMatch {
        let location = Location::parse(full_path);

        let hit = self
            .routes
            .iter()
            .find_map(|route| route.pattern.matches(&location.path).map(|p| (route, p)));

        // 通配路由保证存在且在最后，`find_map` 总会命中
        match hit {
            Some((route, params)) => RouteMatch {
                name: route.name,
                page: route.page,
                meta: route.meta,
                params,
                location,
            },
            None => self.catch_all(location),
        }
    }

    /// 以通配路由（未找到页面）承接给定位置
    pub fn catch_all(&self, location: Location) -> RouteMatch {
        let route = &self.routes[self.routes.len() - 1];
        RouteMatch {
            name: route.name,
            page: route.page,
            meta: route.meta,
            params: HashMap::new(),
            location,
        }
    }
}

// =========================================================
// 位置与匹配结果 (Locations & Matches)
// =========================================================

/// 路径加查询参数
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

fn decode_query(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|v| v.into_owned())
        .unwrap_or(spaced)
}

// 与浏览器路由一致：`/` 与 `:` 保持可读
fn encode_query(raw: &str) -> String {
    urlencoding::encode(raw)
        .replace("%2F", "/")
        .replace("%3A", ":")
}

impl Location {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    /// 解析 `path?query#hash`，hash 被忽略
    pub fn parse(full_path: &str) -> Self {
        let without_hash = full_path.split('#').next().unwrap_or_default();
        let (path, query) = match without_hash.split_once('?') {
            Some((path, query)) => (path, query),
            None => (without_hash, ""),
        };

        let mut path = if path.is_empty() { "/".to_string() } else { path.to_string() };
        if path.len() > 1 && path.ends_with('/') {
            path.pop();
        }

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| match pair.split_once('=') {
                Some((k, v)) => (decode_query(k), decode_query(v)),
                None => (decode_query(pair), String::new()),
            })
            .collect();

        Self { path, query }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn full_path(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", encode_query(k), encode_query(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", self.path, query)
    }
}

#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub name: &'static str,
    pub page: Page,
    pub meta: RouteMeta,
    pub params: HashMap<String, String>,
    pub location: Location,
}

impl RouteMatch {
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// 数字 ID 参数，如 `/items/:id`
    pub fn param_id(&self, key: &str) -> Option<i64> {
        self.param(key).and_then(|v| v.parse().ok())
    }

    pub fn full_path(&self) -> String {
        self.location.full_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table_is_valid() {
        let table = RouteTable::standard();
        let rebuilt = RouteTable::new(table.routes().to_vec());
        assert!(rebuilt.is_ok());
        assert!(table.routes().last().unwrap().is_catch_all());
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let routes = vec![
            RouteDescriptor::new("/a", "same", Page::Home, RouteMeta::titled("A")),
            RouteDescriptor::new("/b", "same", Page::Home, RouteMeta::titled("B")),
            RouteDescriptor::new(
                "/:pathMatch(.*)*",
                "not-found",
                Page::NotFound,
                RouteMeta::titled("404"),
            ),
        ];
        assert_eq!(
            RouteTable::new(routes).unwrap_err(),
            RouteTableError::DuplicateName("same")
        );
    }

    #[test]
    fn test_rejects_misplaced_or_missing_catch_all() {
        let misplaced = vec![
            RouteDescriptor::new(
                "/:pathMatch(.*)*",
                "not-found",
                Page::NotFound,
                RouteMeta::titled("404"),
            ),
            RouteDescriptor::new("/a", "a", Page::Home, RouteMeta::titled("A")),
        ];
        assert_eq!(
            RouteTable::new(misplaced).unwrap_err(),
            RouteTableError::CatchAllNotLast("not-found")
        );

        let missing = vec![RouteDescriptor::new("/a", "a", Page::Home, RouteMeta::titled("A"))];
        assert_eq!(
            RouteTable::new(missing).unwrap_err(),
            RouteTableError::MissingCatchAll
        );
    }

    #[test]
    fn test_resolve_params_and_precedence() {
        let table = RouteTable::standard();

        let m = table.resolve("/items/42/edit");
        assert_eq!(m.name, "item-edit");
        assert_eq!(m.param_id("id"), Some(42));

        let m = table.resolve("/items/42");
        assert_eq!(m.page, Page::ItemDetail);

        assert_eq!(table.resolve("/stores/new").name, "store-create");
        assert_eq!(table.resolve("/store/7").param_id("id"), Some(7));
        assert_eq!(table.resolve("/").name, "home");
        assert_eq!(table.resolve("/users/").name, "users");
        assert_eq!(table.resolve("/no/such/page").page, Page::NotFound);
    }

    #[test]
    fn test_query_round_trip() {
        let loc = Location::new("/login").with_query("redirect", "/items/3?tab=a b");
        assert_eq!(loc.full_path(), "/login?redirect=/items/3%3Ftab%3Da%20b");
        let parsed = Location::parse(&loc.full_path());
        assert_eq!(parsed.query_value("redirect"), Some("/items/3?tab=a b"));
    }

    #[test]
    fn test_computed_titles() {
        let table = RouteTable::standard();
        let home = table.by_name("home").unwrap();
        assert_eq!(home.meta.title.resolve(Some(Role::Admin)), "Admin Console");
        assert_eq!(home.meta.title.resolve(None), "Travel");
        let profile = table.by_name("profile").unwrap();
        assert_eq!(profile.meta.title.resolve(Some(Role::Merchant)), "Merchant Profile");
    }
}
