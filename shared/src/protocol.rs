use crate::{
    Account, BalanceUpdateRequest, CreateItemRequest, CreateStoreRequest, Credentials, Item,
    LoginResponse, Product, ProductApplication, ProductDraft, RegisterRequest,
    ReviewApplicationRequest, Store, UpdateItemRequest, User,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Paths may embed resource ids, so the path is computed per request instead of being a
/// constant. Requests without a JSON body use `()` as `Body` and return `None`.
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The JSON body sent with this request.
    type Body: Serialize;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The URL path, relative to the API base URL.
    fn path(&self) -> String;

    fn body(&self) -> Option<&Self::Body> {
        None
    }
}

// 声明一个端点：`body` 字段（如有）即请求体
macro_rules! api_request {
    ($(#[$meta:meta])* $name:ident { $($field:ident : $ty:ty),* $(,)? }
        => $method:ident $path:literal $(, $($arg:ident),+)? ; $resp:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $(pub $field: $ty,)*
        }

        impl ApiRequest for $name {
            type Response = $resp;
            type Body = ();
            const METHOD: HttpMethod = HttpMethod::$method;

            fn path(&self) -> String {
                format!($path $(, $($arg = self.$arg),+)?)
            }
        }
    };
    ($(#[$meta:meta])* $name:ident { $($field:ident : $ty:ty),* $(,)? } body $body:ty
        => $method:ident $path:literal $(, $($arg:ident),+)? ; $resp:ty) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $(pub $field: $ty,)*
            pub body: $body,
        }

        impl ApiRequest for $name {
            type Response = $resp;
            type Body = $body;
            const METHOD: HttpMethod = HttpMethod::$method;

            fn path(&self) -> String {
                format!($path $(, $($arg = self.$arg),+)?)
            }

            fn body(&self) -> Option<&Self::Body> {
                Some(&self.body)
            }
        }
    };
}

// =========================================================
// Session
// =========================================================

api_request! {
    /// Exchange credentials for a session token
    Login {} body Credentials => Post "/auth/login"; LoginResponse
}

api_request! {
    /// Create a new account. The backend echoes the created user.
    Register {} body RegisterRequest => Post "/auth/register"; serde_json::Value
}

// =========================================================
// Users
// =========================================================

api_request! {
    /// Administrative user listing
    ListUsers {} => Get "/admin/users"; Vec<User>
}

api_request! {
    GetUser { id: i64 } => Get "/users/{id}", id; User
}

api_request! {
    /// Profile of the user owning the token
    GetSelf {} => Get "/users/self"; User
}

// =========================================================
// Stores
// =========================================================

api_request! {
    ListStores {} => Get "/stores"; Vec<Store>
}

api_request! {
    /// Stores owned by the current merchant
    ListMerchantStores {} => Get "/stores/merchant"; Vec<Store>
}

api_request! {
    GetStore { id: i64 } => Get "/stores/{id}", id; Store
}

api_request! {
    CreateStore {} body CreateStoreRequest => Post "/stores"; Store
}

// =========================================================
// Products & Applications
// =========================================================

api_request! {
    ListStoreProducts { store_id: i64 } => Get "/stores/{store_id}/products", store_id; Vec<Product>
}

api_request! {
    GetProduct { id: i64 } => Get "/products/{id}", id; Product
}

api_request! {
    ListApplications {} => Get "/product-applications"; Vec<ProductApplication>
}

api_request! {
    GetApplication { id: i64 } => Get "/product-applications/{id}", id; ProductApplication
}

api_request! {
    /// Apply for listing a new product
    CreateApplication {} body ProductDraft => Post "/product-applications"; ProductApplication
}

api_request! {
    /// Apply for modifying an existing product
    ModifyProduct { product_id: i64 } body ProductDraft
        => Put "/product-applications/{product_id}", product_id; ProductApplication
}

api_request! {
    /// Approve or reject an application
    ReviewApplication { id: i64 } body ReviewApplicationRequest
        => Patch "/product-applications/{id}", id; ProductApplication
}

api_request! {
    /// Take a listed product off the shelf
    TakeOffShelf { product_id: i64 } => Delete "/product-applications/{product_id}", product_id; ()
}

// =========================================================
// Items
// =========================================================

api_request! {
    ListItems {} => Get "/items"; Vec<Item>
}

api_request! {
    GetItem { id: i64 } => Get "/items/{id}", id; Item
}

api_request! {
    CreateItem {} body CreateItemRequest => Post "/items"; Item
}

api_request! {
    UpdateItem { id: i64 } body UpdateItemRequest => Put "/items/{id}", id; Item
}

api_request! {
    DeleteItem { id: i64 } => Delete "/items/{id}", id; ()
}

// =========================================================
// Accounts
// =========================================================

api_request! {
    GetAccount {} => Get "/account"; Account
}

api_request! {
    /// Top up the current account balance
    TopUp {} body BalanceUpdateRequest => Post "/account/balance"; Account
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_embed_ids() {
        assert_eq!(GetItem { id: 4 }.path(), "/items/4");
        assert_eq!(
            ListStoreProducts { store_id: 9 }.path(),
            "/stores/9/products"
        );
        assert_eq!(
            TakeOffShelf { product_id: 12 }.path(),
            "/product-applications/12"
        );
        assert_eq!(ListUsers {}.path(), "/admin/users");
    }

    #[test]
    fn test_body_only_for_body_requests() {
        let login = Login {
            body: Credentials {
                username: "alice".into(),
                password: "secret".into(),
            },
        };
        assert_eq!(Login::METHOD, HttpMethod::Post);
        assert_eq!(login.body().map(|c| c.username.as_str()), Some("alice"));
        assert!(GetSelf {}.body().is_none());
        assert_eq!(ReviewApplication::METHOD.as_str(), "PATCH");
    }
}
