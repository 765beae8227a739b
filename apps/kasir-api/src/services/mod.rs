//! Service layer.
//!
//! Each service wraps the shared [`AppState`](crate::AppState) and turns
//! repository results into [`ApiError`](crate::ApiError)s with the
//! message the client should see. Handlers stay thin.

pub mod auth_service;
pub mod catalog_service;
pub mod sale_service;
pub mod user_service;

pub use auth_service::{AuthService, LoginTokens};
pub use catalog_service::CatalogService;
pub use sale_service::SaleService;
pub use user_service::UserService;

#[cfg(test)]
pub(crate) mod test_support {
    use kasir_core::{Money, NewCategory, NewProduct, Role, User};
    use kasir_db::{Database, DbConfig};

    use crate::config::ApiConfig;
    use crate::password::hash_password;
    use crate::AppState;

    pub fn config() -> ApiConfig {
        ApiConfig {
            port: 0,
            database_path: ":memory:".to_string(),
            db_max_connections: 1,
            db_connect_timeout_secs: 5,
            cors_allowed_origins: vec!["*".to_string()],
            jwt_access_secret: "test-access-secret".to_string(),
            jwt_refresh_secret: "test-refresh-secret".to_string(),
            jwt_access_lifetime_secs: 900,
            jwt_refresh_lifetime_secs: 604_800,
            bootstrap_admin_username: None,
            bootstrap_admin_password: None,
        }
    }

    pub async fn state() -> AppState {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        AppState::new(db, config())
    }

    pub async fn user(state: &AppState, username: &str, password: &str, role: Role) -> User {
        state
            .db
            .users()
            .insert(username, &hash_password(password).unwrap(), None, role)
            .await
            .unwrap()
    }

    pub async fn category(state: &AppState, name: &str) -> i64 {
        state
            .db
            .categories()
            .insert(&NewCategory {
                name: name.to_string(),
                description: None,
            })
            .await
            .unwrap()
            .id
    }

    /// Inserts a product priced in whole rupiah and returns its id.
    pub async fn product(state: &AppState, category_id: i64, sku: &str, rupiah: i64, stock: i64) -> i64 {
        state
            .db
            .products()
            .insert(&NewProduct {
                category_id,
                sku: sku.to_string(),
                name: format!("Produk {sku}"),
                price: Money::from_major(rupiah),
                stock,
                description: None,
            })
            .await
            .unwrap()
            .id
    }
}
