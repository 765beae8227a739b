//! End-to-end tests: the real router on an ephemeral port, driven over HTTP.

use std::net::SocketAddr;

use kasir_api::config::ApiConfig;
use kasir_api::password::hash_password;
use kasir_api::{build_router, AppState, JwtManager};
use kasir_core::{Money, NewCategory, NewProduct, Role};
use kasir_db::{Database, DbConfig};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

const ACCESS_SECRET: &str = "e2e-access-secret";
const REFRESH_SECRET: &str = "e2e-refresh-secret";

struct TestServer {
    base: String,
    client: Client,
    state: AppState,
}

impl TestServer {
    async fn start() -> Self {
        Self::start_with_origins(&["*"]).await
    }

    async fn start_with_origins(origins: &[&str]) -> Self {
        let config = ApiConfig {
            port: 0,
            database_path: ":memory:".to_string(),
            db_max_connections: 1,
            db_connect_timeout_secs: 5,
            cors_allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
            jwt_access_secret: ACCESS_SECRET.to_string(),
            jwt_refresh_secret: REFRESH_SECRET.to_string(),
            jwt_access_lifetime_secs: 900,
            jwt_refresh_lifetime_secs: 604_800,
            bootstrap_admin_username: None,
            bootstrap_admin_password: None,
        };
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let state = AppState::new(db, config);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let app = build_router(state.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestServer {
            base: format!("http://{addr}"),
            client: Client::new(),
            state,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn add_user(&self, username: &str, password: &str, role: Role) -> i64 {
        self.state
            .db
            .users()
            .insert(username, &hash_password(password).unwrap(), None, role)
            .await
            .unwrap()
            .id
    }

    async fn add_product(&self, sku: &str, rupiah: i64, stock: i64) -> i64 {
        let category_id = match self.state.db.categories().list().await.unwrap().first() {
            Some(category) => category.id,
            None => {
                self.state
                    .db
                    .categories()
                    .insert(&NewCategory {
                        name: "Minuman".to_string(),
                        description: None,
                    })
                    .await
                    .unwrap()
                    .id
            }
        };

        self.state
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

    async fn stock(&self, product_id: i64) -> i64 {
        self.state.db.products().get_by_id(product_id).await.unwrap().unwrap().stock
    }

    async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .unwrap()
    }

    /// Logs in and returns `(accessToken, refreshToken)`.
    async fn tokens(&self, username: &str, password: &str) -> (String, String) {
        let res = self.login(username, password).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = res.json().await.unwrap();
        (
            body["accessToken"].as_str().unwrap().to_string(),
            body["refreshToken"].as_str().unwrap().to_string(),
        )
    }

    async fn admin_token(&self) -> String {
        self.add_user("admin", "passwordadmin", Role::Admin).await;
        self.tokens("admin", "passwordadmin").await.0
    }
}

async fn body(res: reqwest::Response) -> (StatusCode, Value) {
    let status = res.status();
    (status, res.json().await.unwrap())
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn test_admin_login_returns_both_tokens() {
    let server = TestServer::start().await;
    let admin_id = server.add_user("admin", "passwordadmin", Role::Admin).await;

    let (status, json) = body(server.login("admin", "passwordadmin").await).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Login berhasil");
    assert!(json["accessToken"].is_string());
    assert!(json["refreshToken"].is_string());
    assert_eq!(
        server.state.db.refresh_tokens().count_for_user(admin_id).await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_login_failures() {
    let server = TestServer::start().await;
    let kasir_id = server.add_user("kasir1", "rahasia", Role::Cashier).await;

    let (status, json) = body(server.login("kasir1", "salah").await).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "INVALID_CREDENTIALS");

    let res = server
        .client
        .post(server.url("/auth/login"))
        .json(&json!({ "username": "kasir1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    server.state.db.users().deactivate(kasir_id).await.unwrap();
    let (status, json) = body(server.login("kasir1", "rahasia").await).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "ACCOUNT_DISABLED");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let server = TestServer::start().await;

    let res = server
        .client
        .post(server.url("/auth/login"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_refresh_and_logout() {
    let server = TestServer::start().await;
    server.add_user("kasir1", "rahasia", Role::Cashier).await;
    let (access, refresh) = server.tokens("kasir1", "rahasia").await;

    let res = server
        .client
        .post(server.url("/auth/refresh"))
        .json(&json!({ "refreshToken": refresh }))
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Token berhasil diperbarui");
    assert!(json["accessToken"].is_string());
    assert!(json.get("refreshToken").is_none());

    let res = server
        .client
        .post(server.url("/auth/refresh"))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .delete(server.url("/auth/logout"))
        .bearer_auth(&access)
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Logout berhasil.");

    let res = server
        .client
        .post(server.url("/auth/refresh"))
        .json(&json!({ "refreshToken": refresh }))
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "INVALID_TOKEN");
}

// =============================================================================
// Access control
// =============================================================================

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let server = TestServer::start().await;

    let (status, json) = body(server.client.get(server.url("/products")).send().await.unwrap()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "TOKEN_MISSING");
}

#[tokio::test]
async fn test_expired_and_invalid_tokens() {
    let server = TestServer::start().await;
    let admin_id = server.add_user("admin", "passwordadmin", Role::Admin).await;

    let stale = JwtManager::new(ACCESS_SECRET.to_string(), REFRESH_SECRET.to_string(), -60, 600)
        .issue_access(admin_id, "admin", Role::Admin)
        .unwrap();
    let res = server
        .client
        .get(server.url("/products"))
        .bearer_auth(&stale.token)
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "TOKEN_EXPIRED");

    let res = server
        .client
        .get(server.url("/products"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "INVALID_TOKEN");

    // a refresh token is not an access token
    let (_, refresh) = server.tokens("admin", "passwordadmin").await;
    let res = server
        .client
        .get(server.url("/products"))
        .bearer_auth(&refresh)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_cashier_cannot_reach_admin_routes() {
    let server = TestServer::start().await;
    server.add_user("kasir1", "rahasia", Role::Cashier).await;
    let (token, _) = server.tokens("kasir1", "rahasia").await;

    for path in ["/categories", "/products", "/users"] {
        let res = server.client.get(server.url(path)).bearer_auth(&token).send().await.unwrap();
        let (status, json) = body(res).await;
        assert_eq!(status, StatusCode::FORBIDDEN, "{path}");
        assert_eq!(json["code"], "FORBIDDEN");
    }

    let res = server.client.get(server.url("/profile")).bearer_auth(&token).send().await.unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["username"], "kasir1");
    assert!(json.get("password_hash").is_none());

    let res = server
        .client
        .get(server.url("/transactions"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_duplicate_category_is_conflict() {
    let server = TestServer::start().await;
    let token = server.admin_token().await;

    let create = || {
        server
            .client
            .post(server.url("/categories"))
            .bearer_auth(&token)
            .json(&json!({ "name": "Makanan" }))
            .send()
    };

    let (status, json) = body(create().await.unwrap()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Kategori berhasil ditambahkan");
    assert_eq!(json["data"]["name"], "Makanan");

    let (status, json) = body(create().await.unwrap()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "DUPLICATE_KEY");
}

#[tokio::test]
async fn test_referenced_category_delete_is_conflict() {
    let server = TestServer::start().await;
    let token = server.admin_token().await;
    let product_id = server.add_product("TEH-01", 5000, 5).await;
    let category_id = server.state.db.products().get_by_id(product_id).await.unwrap().unwrap().category_id;

    let res = server
        .client
        .delete(server.url(&format!("/categories/{category_id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");

    let res = server
        .client
        .get(server.url("/categories/abc"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_product_crud() {
    let server = TestServer::start().await;
    let token = server.admin_token().await;
    let seed_id = server.add_product("SEED-01", 1000, 1).await;
    let category_id = server.state.db.products().get_by_id(seed_id).await.unwrap().unwrap().category_id;

    let res = server
        .client
        .post(server.url("/products"))
        .bearer_auth(&token)
        .json(&json!({
            "category_id": category_id,
            "sku": "KOPI-01",
            "name": "Kopi Susu",
            "price": 15000,
            "stock": 10
        }))
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["price"], "15000.00");
    assert_eq!(json["data"]["category_name"], "Minuman");
    let id = json["data"]["id"].as_i64().unwrap();

    let res = server
        .client
        .put(server.url(&format!("/products/{id}")))
        .bearer_auth(&token)
        .json(&json!({
            "category_id": category_id,
            "sku": "KOPI-01",
            "name": "Kopi Susu Gula Aren",
            "price": "18000.50",
            "stock": 12
        }))
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Produk berhasil diperbarui");
    assert_eq!(json["data"]["price"], "18000.50");

    let res = server
        .client
        .delete(server.url(&format!("/products/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = server
        .client
        .get(server.url(&format!("/products/{id}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Sales
// =============================================================================

#[tokio::test]
async fn test_sale_over_stock_is_rejected_without_changes() {
    let server = TestServer::start().await;
    let token = server.admin_token().await;
    let product_id = server.add_product("TEH-01", 5000, 5).await;

    let res = server
        .client
        .post(server.url("/transactions"))
        .bearer_auth(&token)
        .json(&json!({
            "items": [{ "product_id": product_id, "quantity": 1000 }],
            "payment_method": "cash"
        }))
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "INSUFFICIENT_STOCK");
    assert!(json["message"].as_str().unwrap().starts_with("Stok tidak cukup"));
    assert_eq!(server.stock(product_id).await, 5);
    assert_eq!(server.state.db.transactions().count().await.unwrap(), 0);
    assert_eq!(server.state.db.transactions().item_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_cashier_records_sale() {
    let server = TestServer::start().await;
    let admin = server.admin_token().await;
    server.add_user("kasir1", "rahasia", Role::Cashier).await;
    let (kasir, _) = server.tokens("kasir1", "rahasia").await;
    let teh = server.add_product("TEH-01", 5000, 5).await;
    let kopi = server.add_product("KOPI-01", 15000, 10).await;

    let res = server
        .client
        .post(server.url("/transactions"))
        .bearer_auth(&kasir)
        .json(&json!({
            "items": [
                { "product_id": teh, "quantity": 2 },
                { "product_id": kopi, "quantity": 1 }
            ],
            "payment_method": "cash",
            "customer_name": "Budi"
        }))
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Transaksi berhasil disimpan!");
    assert_eq!(json["total_amount"], "25000.00");
    let id = json["transaction_id"].as_i64().unwrap();

    assert_eq!(server.stock(teh).await, 3);
    assert_eq!(server.stock(kopi).await, 9);

    let res = server
        .client
        .get(server.url(&format!("/transactions/{id}")))
        .bearer_auth(&kasir)
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
    assert_eq!(json["cashier_username"], "kasir1");

    // status changes are admin-only
    let res = server
        .client
        .put(server.url(&format!("/transactions/{id}")))
        .bearer_auth(&kasir)
        .json(&json!({ "status": "canceled" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    let res = server
        .client
        .put(server.url(&format!("/transactions/{id}")))
        .bearer_auth(&admin)
        .json(&json!({ "status": "canceled" }))
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "canceled");
    assert_eq!(server.stock(teh).await, 3);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn test_self_deactivation_is_blocked() {
    let server = TestServer::start().await;
    let token = server.admin_token().await;
    let admin_id = server.state.jwt.verify_access(&token).unwrap().id;

    let res = server
        .client
        .put(server.url("/deactivate-user"))
        .bearer_auth(&token)
        .json(&json!({ "id": admin_id }))
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "SELF_DEACTIVATION");
}

#[tokio::test]
async fn test_register_then_deactivate() {
    let server = TestServer::start().await;
    let token = server.admin_token().await;

    let res = server
        .client
        .post(server.url("/register"))
        .bearer_auth(&token)
        .json(&json!({ "username": "kasir2", "password": "rahasia", "role": "kasir" }))
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["message"], "Pengguna berhasil didaftarkan.");
    assert_eq!(json["data"]["role"], "kasir");
    let id = json["data"]["id"].as_i64().unwrap();

    let res = server
        .client
        .put(server.url("/deactivate-user"))
        .bearer_auth(&token)
        .json(&json!({ "id": id }))
        .send()
        .await
        .unwrap();
    let (status, json) = body(res).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Pengguna kasir2 berhasil dinonaktifkan.");
    assert_eq!(json["data"]["is_active"], false);

    let res = server.login("kasir2", "rahasia").await;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}

// =============================================================================
// Misc
// =============================================================================

#[tokio::test]
async fn test_banner_health_and_request_id() {
    let server = TestServer::start().await;

    let res = server.client.get(server.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert!(res.text().await.unwrap().starts_with("API Toko Online berjalan."));

    let res = server
        .client
        .get(server.url("/health"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_cors_preflight_allows_any_origin_by_default() {
    let server = TestServer::start().await;

    let res = server
        .client
        .request(reqwest::Method::OPTIONS, server.url("/transactions"))
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "authorization,content-type")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_success());
    assert_eq!(res.headers()["access-control-allow-origin"], "*");
}

#[tokio::test]
async fn test_cors_restricted_to_configured_origins() {
    let server = TestServer::start_with_origins(&["http://kasir.local"]).await;

    let res = server
        .client
        .get(server.url("/"))
        .header("origin", "http://kasir.local")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["access-control-allow-origin"], "http://kasir.local");
    assert!(res.headers()["access-control-expose-headers"]
        .to_str()
        .unwrap()
        .contains("x-request-id"));

    let res = server
        .client
        .get(server.url("/"))
        .header("origin", "http://evil.example")
        .send()
        .await
        .unwrap();
    assert!(!res.headers().contains_key("access-control-allow-origin"));
}
