use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub website: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub company: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub address: Value,
}

/// Body of `POST /users` and `PUT /users/{id}`. Any `id` in the body is ignored.
#[derive(Deserialize)]
pub struct UserInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub company: Value,
    #[serde(default)]
    pub address: Value,
}

impl UserInput {
    fn into_user(self, id: u64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            username: self.username,
            website: self.website,
            company: self.company,
            address: self.address,
        }
    }
}

/// Switches that make the matching handler answer 500.
#[derive(Debug, Default)]
pub struct Faults {
    pub list: AtomicBool,
    pub get: AtomicBool,
    pub create: AtomicBool,
    pub update: AtomicBool,
    pub delete: AtomicBool,
}

impl Faults {
    fn tripped(flag: &AtomicBool) -> Option<Response> {
        flag.load(Ordering::SeqCst).then(|| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "injected failure" })),
            )
                .into_response()
        })
    }
}

#[derive(Debug, Default)]
pub struct Db {
    users: BTreeMap<u64, User>,
    next_id: u64,
}

impl Db {
    pub fn seeded(users: Vec<User>) -> Self {
        let next_id = users.iter().map(|u| u.id).max().unwrap_or(0);
        Self {
            users: users.into_iter().map(|u| (u.id, u)).collect(),
            next_id,
        }
    }
}

#[derive(Clone, Default)]
pub struct AppState {
    pub db: Arc<RwLock<Db>>,
    pub faults: Arc<Faults>,
}

impl AppState {
    pub fn seeded(users: Vec<User>) -> Self {
        Self {
            db: Arc::new(RwLock::new(Db::seeded(users))),
            faults: Arc::default(),
        }
    }
}

pub fn sample_users() -> Vec<User> {
    [
        (1, "Leanne Graham", "Sincere@april.biz", "1-770-736-8031", "Gwenborough"),
        (2, "Ervin Howell", "Shanna@melissa.tv", "010-692-6593", "Wisokyburgh"),
        (3, "Clementine Bauch", "Nathan@yesenia.net", "1-463-123-4447", "McKenziehaven"),
    ]
    .into_iter()
    .map(|(id, name, email, phone, city): (u64, &str, &str, &str, &str)| User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        username: name.split_whitespace().next().unwrap_or_default().to_string(),
        website: "example.org".to_string(),
        company: json!({ "name": "Romaguera-Crona", "catchPhrase": "Multi-layered client-server neural-net" }),
        address: json!({ "street": "Kulas Light", "city": city }),
    })
    .collect()
}

pub fn app() -> Router {
    app_with(AppState::default())
}

pub fn app_with(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, AppState::default()).await
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(state)).await
}

async fn list_users(State(state): State<AppState>) -> Response {
    if let Some(fault) = Faults::tripped(&state.faults.list) {
        return fault;
    }
    let db = state.db.read().await;
    Json(db.users.values().cloned().collect::<Vec<_>>()).into_response()
}

async fn get_user(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    if let Some(fault) = Faults::tripped(&state.faults.get) {
        return fault;
    }
    let db = state.db.read().await;
    match db.users.get(&id) {
        Some(user) => Json(user.clone()).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

async fn create_user(State(state): State<AppState>, Json(input): Json<UserInput>) -> Response {
    if let Some(fault) = Faults::tripped(&state.faults.create) {
        return fault;
    }
    let mut db = state.db.write().await;
    db.next_id += 1;
    let user = input.into_user(db.next_id);
    db.users.insert(user.id, user.clone());
    (StatusCode::CREATED, Json(user)).into_response()
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<UserInput>,
) -> Response {
    if let Some(fault) = Faults::tripped(&state.faults.update) {
        return fault;
    }
    let mut db = state.db.write().await;
    let Some(slot) = db.users.get_mut(&id) else {
        return (StatusCode::NOT_FOUND, Json(json!({}))).into_response();
    };
    *slot = input.into_user(id);
    Json(slot.clone()).into_response()
}

async fn delete_user(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    if let Some(fault) = Faults::tripped(&state.faults.delete) {
        return fault;
    }
    let mut db = state.db.write().await;
    match db.users.remove(&id) {
        Some(_) => Json(json!({})).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({}))).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_to_json() {
        let user = User {
            id: 1,
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            phone: String::new(),
            username: "ann".to_string(),
            website: String::new(),
            company: Value::Null,
            address: json!({ "city": "Oslo" }),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["address"]["city"], "Oslo");
        assert!(json.get("company").is_none());
    }

    #[test]
    fn input_ignores_client_id_and_defaults_decorations() {
        let input: UserInput =
            serde_json::from_str(r#"{"id":"temp-1","name":"Bo","email":"bo@x.com"}"#).unwrap();
        let user = input.into_user(11);
        assert_eq!(user.id, 11);
        assert!(user.phone.is_empty());
        assert!(user.company.is_null());
    }

    #[test]
    fn input_rejects_missing_email() {
        let result: Result<UserInput, _> = serde_json::from_str(r#"{"name":"Bo"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn seeded_db_continues_numbering() {
        let db = Db::seeded(sample_users());
        assert_eq!(db.next_id, 3);
        assert_eq!(db.users.len(), 3);
    }
}
