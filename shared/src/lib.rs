use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 会话 Token 在本地存储中的键
pub const TOKEN_STORAGE_KEY: &str = "token";
/// 上次登录用户名在本地存储中的键（用于登录表单预填）
pub const USERNAME_STORAGE_KEY: &str = "last_username";
pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// 店铺没有图片时使用的默认图片
pub const DEFAULT_STORE_IMAGE: &str = "/restaurant.jpg";

/// 带数字 ID 的实体，状态容器按 ID 替换 / 过滤
pub trait Identified {
    fn id(&self) -> i64;
}

// =========================================================
// 字符串枚举 (String-backed enums)
// =========================================================

// 后端可能返回未知取值，统一落入 `Other` 而不是反序列化失败
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(raw) => raw,
                }
            }
        }

        impl From<String> for $name {
            fn from(raw: String) -> Self {
                match raw.as_str() {
                    $($wire => Self::$variant,)+
                    _ => Self::Other(raw),
                }
            }
        }

        impl From<&str> for $name {
            fn from(raw: &str) -> Self {
                Self::from(raw.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.as_str().to_string(),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// 商品状态
    ProductStatus {
        OnShelf => "ON_SHELF",
        PendingApproval => "PENDING_APPROVAL",
        OffShelf => "OFF_SHELF",
        ApprovalFailed => "APPROVAL_FAILED",
    }
}

string_enum! {
    /// 商品申请类型：新品上架 / 修改已有商品
    ApplicationType {
        New => "NEW",
        Modify => "MODIFY",
    }
}

string_enum! {
    /// 商品申请审核状态
    ApplicationStatus {
        Pending => "PENDING",
        Approved => "APPROVED",
        Rejected => "REJECTED",
    }
}

string_enum! {
    /// 店铺服务类别（后端使用中文取值）
    ServiceCategory {
        Hotel => "酒店",
        Transport => "交通",
        Restaurant => "餐饮",
        Ticket => "景区门票",
    }
}

// =========================================================
// 用户与角色 (Users & Roles)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Merchant,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Merchant => "MERCHANT",
            Role::Customer => "CUSTOMER",
        }
    }

    /// 角色的中文名称
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "系统管理员",
            Role::Merchant => "商户",
            Role::Customer => "普通用户",
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Role::Admin),
            "MERCHANT" => Ok(Role::Merchant),
            "CUSTOMER" => Ok(Role::Customer),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// 任意角色字符串的中文名称，未知角色返回 "未知角色"
pub fn role_label(raw: &str) -> &'static str {
    raw.parse::<Role>().map(|r| r.label()).unwrap_or("未知角色")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: i64,
    pub user_name: String,
    pub user_role: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_tel: String,
}

impl User {
    pub fn role(&self) -> Option<Role> {
        self.user_role.parse().ok()
    }

    pub fn role_label(&self) -> &'static str {
        role_label(&self.user_role)
    }
}

impl Identified for User {
    fn id(&self) -> i64 {
        self.user_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub user_name: String,
    pub password: String,
    pub user_email: String,
    pub user_tel: String,
    pub user_role: Role,
}

// =========================================================
// 店铺 (Stores)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub id: i64,
    pub store_name: String,
    #[serde(default)]
    pub categories: Vec<ServiceCategory>,
    #[serde(default)]
    pub owner_id_number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub registration_address: String,
    #[serde(default)]
    pub registered_capital: f64,
    #[serde(default)]
    pub registration_date: String,
    #[serde(default)]
    pub owner_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Store {
    pub fn has_category(&self, category: &ServiceCategory) -> bool {
        self.categories.contains(category)
    }

    /// 缺少图片时补上默认图片
    pub fn with_default_image(mut self) -> Self {
        if self.image_url.as_deref().is_none_or(str::is_empty) {
            self.image_url = Some(DEFAULT_STORE_IMAGE.to_string());
        }
        self
    }
}

impl Identified for Store {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStoreRequest {
    pub store_name: String,
    pub categories: Vec<ServiceCategory>,
    pub owner_id_number: String,
    pub description: String,
    pub registration_address: String,
    pub registered_capital: f64,
    pub registration_date: String,
}

// =========================================================
// 商品与上架申请 (Products & Applications)
// =========================================================

/// 商品描述的最大长度（字符）
pub const PRODUCT_DESCRIPTION_MAX: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub store_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    #[serde(default)]
    pub image_url: String,
    pub status: ProductStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Identified for Product {
    fn id(&self) -> i64 {
        self.id
    }
}

/// 商品信息草稿：新品上架申请与修改申请共用同一结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub store_id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub image_url: String,
}

impl ProductDraft {
    /// 校验草稿：名称非空、描述不超过 500 字符、价格大于 0 且最多两位小数
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Product name must not be empty".to_string());
        }
        if self.description.chars().count() > PRODUCT_DESCRIPTION_MAX {
            return Err(format!(
                "Product description must be at most {} characters",
                PRODUCT_DESCRIPTION_MAX
            ));
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            return Err("Product price must be greater than 0".to_string());
        }
        let cents = self.price * 100.0;
        if (cents - cents.round()).abs() > 1e-6 {
            return Err("Product price must have at most 2 decimal places".to_string());
        }
        Ok(())
    }
}

pub type CreateProductRequest = ProductDraft;
pub type UpdateProductRequest = ProductDraft;

/// 申请记录中引用的店铺 / 商品摘要
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductApplication {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store: Option<EntityRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<EntityRef>,
    pub application_type: ApplicationType,
    /// 申请提交的商品数据（JSON 字符串）
    #[serde(default)]
    pub requested_data: String,
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewer: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<String>,
}

impl ProductApplication {
    /// 解析 `requestedData` 中的商品草稿
    pub fn requested_product(&self) -> Option<ProductDraft> {
        serde_json::from_str(&self.requested_data).ok()
    }
}

impl Identified for ProductApplication {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewApplicationRequest {
    pub status: ApplicationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_comments: Option<String>,
}

// =========================================================
// 任务条目 (Items)
// =========================================================

// 条目接口的时间字段是 snake_case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Identified for Item {
    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateItemRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateItemRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

// =========================================================
// 账户 (Accounts)
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub account_balance: f64,
    pub account_status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceUpdateRequest {
    pub amount_increment: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_status_falls_back_to_other() {
        let product: Product = serde_json::from_value(json!({
            "id": 1, "storeId": 2, "name": "Tea", "price": 9.5,
            "imageUrl": "", "status": "ARCHIVED"
        }))
        .unwrap();
        assert_eq!(product.status, ProductStatus::Other("ARCHIVED".into()));
        assert_eq!(serde_json::to_value(&product.status).unwrap(), json!("ARCHIVED"));
    }

    #[test]
    fn test_service_category_uses_backend_labels() {
        let store: Store = serde_json::from_value(json!({
            "id": 3, "storeName": "江南小馆", "categories": ["餐饮", "酒店"]
        }))
        .unwrap();
        assert!(store.has_category(&ServiceCategory::Restaurant));
        assert!(store.has_category(&ServiceCategory::Hotel));
        assert!(!store.has_category(&ServiceCategory::Ticket));
        assert_eq!(
            store.with_default_image().image_url.as_deref(),
            Some(DEFAULT_STORE_IMAGE)
        );
    }

    #[test]
    fn test_role_labels() {
        assert_eq!(role_label("ADMIN"), "系统管理员");
        assert_eq!(role_label("MERCHANT"), "商户");
        assert_eq!(role_label("CUSTOMER"), "普通用户");
        assert_eq!(role_label("GUEST"), "未知角色");
    }

    #[test]
    fn test_product_draft_validation() {
        let mut draft = ProductDraft {
            store_id: 1,
            name: "Hot pot".into(),
            description: "Spicy".into(),
            price: 88.8,
            image_url: String::new(),
        };
        assert!(draft.validate().is_ok());

        draft.price = 0.0;
        assert!(draft.validate().is_err());

        draft.price = 1.005;
        assert!(draft.validate().is_err());

        draft.price = f64::INFINITY;
        assert!(draft.validate().is_err());

        draft.price = f64::NAN;
        assert!(draft.validate().is_err());

        draft.price = 12.0;
        draft.description = "x".repeat(PRODUCT_DESCRIPTION_MAX + 1);
        assert!(draft.validate().is_err());
    }

    #[test]
    fn test_requested_product_parses_embedded_json() {
        let app: ProductApplication = serde_json::from_value(json!({
            "id": 7,
            "applicationType": "MODIFY",
            "requestedData": "{\"storeId\":1,\"name\":\"Tea\",\"description\":\"\",\"price\":3.5,\"imageUrl\":\"\"}",
            "status": "PENDING"
        }))
        .unwrap();
        assert_eq!(app.application_type, ApplicationType::Modify);
        assert_eq!(app.requested_product().unwrap().name, "Tea");
    }
}
