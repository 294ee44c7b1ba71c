//! 集成测试公共设施
//!
//! 起两个真实的 HTTP 服务：一个进程内的 PostgREST 风格 mock (表读写 +
//! RPC 记录)，和被测服务本身。测试通过 reqwest 打被测服务，然后直接翻
//! mock 的表内容做断言。

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use uuid::Uuid;

use misky_server::core::{Config, ServerState};

/// 进程内 PostgREST 风格 mock
///
/// 表是 `name -> Vec<row>`，行是裸 JSON 对象。支持本服务用到的查询
/// 子集：`select`、`col=eq.value`、`order=field.desc`、`item:items(*)` 内嵌。
#[derive(Clone, Default)]
pub struct MockDb {
    tables: Arc<Mutex<HashMap<String, Vec<Value>>>>,
    rpc_calls: Arc<Mutex<Vec<(String, Value)>>>,
    failing_rpcs: Arc<Mutex<HashSet<String>>>,
    insert_budgets: Arc<Mutex<HashMap<String, usize>>>,
}

impl MockDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/rest/v1/rpc/{name}", post(handle_rpc))
            .route(
                "/rest/v1/{table}",
                get(handle_select)
                    .post(handle_insert)
                    .patch(handle_update),
            )
            .with_state(self.clone())
    }

    /// 表内容快照
    pub fn table(&self, name: &str) -> Vec<Value> {
        self.tables
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// 已记录的 RPC 调用 (名字, 参数)
    pub fn rpc_calls(&self) -> Vec<(String, Value)> {
        self.rpc_calls.lock().unwrap().clone()
    }

    /// 让指定 RPC 开始返回 500
    pub fn fail_rpc(&self, name: &str) {
        self.failing_rpcs.lock().unwrap().insert(name.to_string());
    }

    /// 指定表再接受 `allowed` 次插入，之后的插入返回 500
    pub fn fail_insert_after(&self, table: &str, allowed: usize) {
        self.insert_budgets
            .lock()
            .unwrap()
            .insert(table.to_string(), allowed);
    }

    pub fn insert_row(&self, table: &str, row: Value) {
        self.tables
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(row);
    }

    pub fn seed_profile(&self, user_id: Uuid, role: &str) {
        self.insert_row(
            "profiles",
            json!({
                "user_id": user_id,
                "role": role,
                "display_name": "Test User",
                "profile_picture": null,
            }),
        );
    }

    pub fn seed_item(
        &self,
        restaurant_id: Uuid,
        total_spots: i32,
        num_of_reservations: i32,
        status: &str,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_row(
            "items",
            json!({
                "id": id,
                "restaurant_id": restaurant_id,
                "information": "Surprise bag",
                "price": 4.5,
                "pickup_time": "18:00-19:00",
                "total_spots": total_spots,
                "num_of_reservations": num_of_reservations,
                "status": status,
            }),
        );
        id
    }

    pub fn seed_reservation(
        &self,
        customer_id: Uuid,
        item_id: Uuid,
        quantity: i32,
        status: &str,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_row(
            "reservations",
            json!({
                "id": id,
                "customer_id": customer_id,
                "item_id": item_id,
                "timestamp": "2026-08-01T12:00:00Z",
                "status": status,
                "quantity": quantity,
            }),
        );
        id
    }

    pub fn seed_notification(&self, table: &str, owner_column: &str, owner: Uuid) -> Uuid {
        let id = Uuid::new_v4();
        self.insert_row(
            table,
            json!({
                "id": id,
                owner_column: owner,
                "type": "reservation_cancelled",
                "message": "seeded",
                "created_at": "2026-08-01T12:00:00Z",
                "read": false,
            }),
        );
        id
    }
}

fn field_as_string(row: &Value, key: &str) -> Option<String> {
    row.get(key).map(|v| match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

fn matches_filters(row: &Value, filters: &[(String, String)]) -> bool {
    filters.iter().all(|(column, expected)| {
        field_as_string(row, column).as_deref() == Some(expected.as_str())
    })
}

fn split_params(params: Vec<(String, String)>) -> (Vec<(String, String)>, String, Option<String>) {
    let mut filters = Vec::new();
    let mut select = "*".to_string();
    let mut order = None;
    for (key, value) in params {
        match key.as_str() {
            "select" => select = value,
            "order" => order = Some(value),
            _ => {
                if let Some(rest) = value.strip_prefix("eq.") {
                    filters.push((key, rest.to_string()));
                }
            }
        }
    }
    (filters, select, order)
}

async fn handle_select(
    State(db): State<MockDb>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
) -> Json<Vec<Value>> {
    let (filters, select, order) = split_params(params);
    let tables = db.tables.lock().unwrap();
    let mut rows: Vec<Value> = tables
        .get(&table)
        .map(|rows| {
            rows.iter()
                .filter(|row| matches_filters(row, &filters))
                .cloned()
                .collect()
        })
        .unwrap_or_default();

    // `*,item:items(*)` 内嵌父食品行
    if select.contains("item:items") {
        let items = tables.get("items").cloned().unwrap_or_default();
        for row in &mut rows {
            let item_id = field_as_string(row, "item_id");
            let embedded = items
                .iter()
                .find(|i| field_as_string(i, "id") == item_id)
                .cloned()
                .unwrap_or(Value::Null);
            row["item"] = embedded;
        }
    }

    if let Some(expr) = order
        && let Some(field) = expr.strip_suffix(".desc")
    {
        rows.sort_by(|a, b| field_as_string(b, field).cmp(&field_as_string(a, field)));
    }

    Json(rows)
}

async fn handle_insert(
    State(db): State<MockDb>,
    Path(table): Path<String>,
    Json(mut body): Json<Value>,
) -> impl IntoResponse {
    {
        let mut budgets = db.insert_budgets.lock().unwrap();
        if let Some(remaining) = budgets.get_mut(&table) {
            if *remaining == 0 {
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(vec![json!({"message": "insert failed"})]),
                );
            }
            *remaining -= 1;
        }
    }

    if body.get("id").is_none() {
        body["id"] = json!(Uuid::new_v4());
    }
    if table.starts_with("notifications") && body.get("created_at").is_none() {
        body["created_at"] = json!("2026-08-29T10:00:00Z");
    }
    db.insert_row(&table, body.clone());
    (StatusCode::CREATED, Json(vec![body]))
}

async fn handle_update(
    State(db): State<MockDb>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    Json(patch): Json<Value>,
) -> Json<Vec<Value>> {
    let (filters, _, _) = split_params(params);
    let mut tables = db.tables.lock().unwrap();
    let mut updated = Vec::new();
    if let Some(rows) = tables.get_mut(&table) {
        for row in rows.iter_mut() {
            if matches_filters(row, &filters) {
                if let Some(fields) = patch.as_object() {
                    for (key, value) in fields {
                        row[key.as_str()] = value.clone();
                    }
                }
                updated.push(row.clone());
            }
        }
    }
    Json(updated)
}

async fn handle_rpc(
    State(db): State<MockDb>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> impl IntoResponse {
    db.rpc_calls
        .lock()
        .unwrap()
        .push((name.clone(), args.clone()));

    if db.failing_rpcs.lock().unwrap().contains(&name) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"message": "rpc failed"})));
    }

    // 计数器 RPC 直接改 items 表
    let delta = match name.as_str() {
        "increment_num_of_reservations" => args["amount"].as_i64().unwrap_or(0),
        "decrement_num_of_reservations" => -args["amount"].as_i64().unwrap_or(0),
        _ => 0,
    };
    if delta != 0 {
        let item_id = args["item_uuid"].as_str().unwrap_or_default().to_string();
        let mut tables = db.tables.lock().unwrap();
        if let Some(items) = tables.get_mut("items") {
            for item in items.iter_mut() {
                if field_as_string(item, "id").as_deref() == Some(item_id.as_str()) {
                    let current = item["num_of_reservations"].as_i64().unwrap_or(0);
                    item["num_of_reservations"] = json!(current + delta);
                }
            }
        }
    }

    (StatusCode::OK, Json(Value::Null))
}

/// 被测服务 + mock 下游
pub struct TestApp {
    pub base_url: String,
    pub db: MockDb,
    pub client: reqwest::Client,
}

impl TestApp {
    /// 在随机端口上起 mock 下游和被测服务
    pub async fn spawn() -> Self {
        let db = MockDb::new();

        let mock_router = db.router();
        let mock_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let mock_addr = mock_listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(mock_listener, mock_router).await.unwrap();
        });

        let config = Config::with_overrides(
            format!("http://{}", mock_addr),
            "service-key-for-tests",
            0,
        );
        let state = ServerState::initialize(&config);
        let app = misky_server::api::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            db,
            client: reqwest::Client::new(),
        }
    }

    /// 给任意用户签一个令牌 (密钥无关紧要，服务不验签名)
    pub fn token_for(user_id: Uuid) -> String {
        use jsonwebtoken::{EncodingKey, Header, encode};

        #[derive(serde::Serialize)]
        struct Claims {
            sub: String,
            exp: i64,
        }

        encode(
            &Header::default(),
            &Claims {
                sub: user_id.to_string(),
                exp: 4102444800,
            },
            &EncodingKey::from_secret(b"not-the-platform-secret"),
        )
        .unwrap()
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    pub async fn post_empty(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .send()
            .await
            .unwrap()
    }

    pub async fn patch(&self, path: &str, token: &str, body: Value) -> reqwest::Response {
        self.client
            .patch(format!("{}{}", self.base_url, path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .unwrap()
    }
}
