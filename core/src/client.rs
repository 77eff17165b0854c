//! Stateless HTTP request builder and response parser for the users API.
//!
//! # Design
//! `UsersClient` holds only the base URL and the resource name. Each
//! operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! The caller executes the round-trip, keeping this layer deterministic.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::FetchError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewUser, User, UserId};

pub const DEFAULT_BASE_URL: &str = "https://jsonplaceholder.typicode.com";
pub const DEFAULT_RESOURCE: &str = "users";

/// Synchronous, stateless client for the users resource.
#[derive(Debug, Clone)]
pub struct UsersClient {
    base_url: String,
    resource: String,
}

impl Default for UsersClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl UsersClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_resource(base_url, DEFAULT_RESOURCE)
    }

    pub fn with_resource(base_url: &str, resource: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            resource: resource.trim_matches('/').to_string(),
        }
    }

    /// Full URL of the collection, e.g. `http://host/users`.
    pub fn collection_url(&self) -> String {
        format!("{}/{}", self.base_url, self.resource)
    }

    pub fn build_list_users(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: self.collection_url(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_user(&self, id: &UserId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/{id}", self.collection_url()),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_user(&self, input: &NewUser) -> Result<HttpRequest, FetchError> {
        let body = serde_json::to_string(input).map_err(|e| FetchError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            path: self.collection_url(),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_update_user(&self, id: &UserId, input: &User) -> Result<HttpRequest, FetchError> {
        let body = serde_json::to_string(input).map_err(|e| FetchError::Encode(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Put,
            path: format!("{}/{id}", self.collection_url()),
            headers: json_headers(),
            body: Some(body),
        })
    }

    pub fn build_delete_user(&self, id: &UserId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/{id}", self.collection_url()),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn parse_list_users(&self, response: HttpResponse) -> Result<Vec<User>, FetchError> {
        check_status(&response, "Failed to fetch users")?;
        decode(&response.body)
    }

    pub fn parse_get_user(&self, response: HttpResponse) -> Result<User, FetchError> {
        check_status(&response, "Failed to fetch user details")?;
        let value = non_empty_object(&response.body)?;
        serde_json::from_value(value).map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// The error message prefers the body's `message` field, falling back to
    /// the status text.
    pub fn parse_create_user(&self, response: HttpResponse) -> Result<User, FetchError> {
        if !response.is_success() {
            let message = serde_json::from_str::<Value>(&response.body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
                .unwrap_or_else(|| format!("Failed to create user: {}", response.status_text));
            return Err(FetchError::Status {
                status: response.status,
                message,
            });
        }
        decode(&response.body)
    }

    /// The server echo is laid over `submitted`, and the identifier is
    /// always `submitted.id`.
    pub fn parse_update_user(
        &self,
        response: HttpResponse,
        submitted: &User,
    ) -> Result<User, FetchError> {
        check_status(&response, "Failed to update user")?;
        let echo: Value = decode(&response.body)?;
        let Value::Object(echo) = echo else {
            return Err(FetchError::Decode("expected a JSON object".to_string()));
        };
        let mut merged = serde_json::to_value(submitted).map_err(|e| FetchError::Encode(e.to_string()))?;
        if let Value::Object(fields) = &mut merged {
            fields.extend(echo);
        }
        let mut user: User = serde_json::from_value(merged).map_err(|e| FetchError::Decode(e.to_string()))?;
        user.id = submitted.id.clone();
        Ok(user)
    }

    /// `true` only for a plain 200; other 2xx codes succeed but report `false`.
    pub fn parse_delete_user(&self, response: HttpResponse) -> Result<bool, FetchError> {
        check_status(&response, "Failed to delete user")?;
        Ok(response.status == 200)
    }
}

fn json_headers() -> Vec<(String, String)> {
    vec![
        ("content-type".to_string(), "application/json".to_string()),
        ("accept".to_string(), "application/json".to_string()),
    ]
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))
}

/// Map non-success status codes to the appropriate `FetchError` variant.
fn check_status(response: &HttpResponse, message: &str) -> Result<(), FetchError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(FetchError::NotFound);
    }
    Err(FetchError::Status {
        status: response.status,
        message: message.to_string(),
    })
}

fn non_empty_object(body: &str) -> Result<Value, FetchError> {
    if body.trim().is_empty() {
        return Err(FetchError::EmptyBody);
    }
    let value: Value = decode(body)?;
    match &value {
        Value::Null => Err(FetchError::EmptyBody),
        Value::Object(map) if map.is_empty() => Err(FetchError::EmptyBody),
        _ => Ok(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserFields;

    fn client() -> UsersClient {
        UsersClient::new("http://localhost:3000")
    }

    fn ann() -> User {
        User::placeholder(UserId::Number(1), &UserFields::new("Ann", "ann@x.com", ""))
    }

    #[test]
    fn build_list_users_produces_correct_request() {
        let req = client().build_list_users();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/users");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_get_user_uses_id_in_path() {
        let req = client().build_get_user(&UserId::Number(5));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:3000/users/5");
    }

    #[test]
    fn build_create_user_omits_id() {
        let req = client().build_create_user(&NewUser::from(&ann())).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:3000/users");
        assert!(req
            .headers
            .contains(&("accept".to_string(), "application/json".to_string())));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["name"], "Ann");
        assert_eq!(body["company"]["catchPhrase"], "Example catchphrase");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn build_update_user_sends_full_record() {
        let req = client().build_update_user(&UserId::Number(1), &ann()).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:3000/users/1");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["id"], 1);
        assert_eq!(body["email"], "ann@x.com");
    }

    #[test]
    fn custom_resource_and_trailing_slash() {
        let client = UsersClient::with_resource("http://localhost:3000/", "/people/");
        assert_eq!(client.build_list_users().path, "http://localhost:3000/people");
    }

    #[test]
    fn parse_list_users_keeps_order() {
        let response = HttpResponse::new(
            200,
            r#"[{"id":2,"name":"Bo","email":"bo@x.com"},{"id":1,"name":"Ann","email":"ann@x.com"}]"#,
        );
        let users = client().parse_list_users(response).unwrap();
        let ids: Vec<_> = users.iter().map(|u| u.id.clone()).collect();
        assert_eq!(ids, vec![UserId::Number(2), UserId::Number(1)]);
    }

    #[test]
    fn parse_list_users_failure_status() {
        let err = client()
            .parse_list_users(HttpResponse::new(500, "boom"))
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[test]
    fn parse_get_user_not_found() {
        let err = client().parse_get_user(HttpResponse::new(404, "{}")).unwrap_err();
        assert_eq!(err, FetchError::NotFound);
    }

    #[test]
    fn parse_get_user_empty_object_is_failure() {
        let err = client().parse_get_user(HttpResponse::new(200, "{}")).unwrap_err();
        assert_eq!(err, FetchError::EmptyBody);
        let err = client().parse_get_user(HttpResponse::new(200, "")).unwrap_err();
        assert_eq!(err, FetchError::EmptyBody);
    }

    #[test]
    fn parse_get_user_malformed_is_decode_error() {
        let err = client()
            .parse_get_user(HttpResponse::new(200, r#"{"id":1}"#))
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn parse_create_user_prefers_body_message() {
        let mut response = HttpResponse::new(400, r#"{"message":"email taken"}"#);
        response.status_text = "Bad Request".to_string();
        let err = client().parse_create_user(response).unwrap_err();
        assert_eq!(
            err,
            FetchError::Status {
                status: 400,
                message: "email taken".to_string()
            }
        );
    }

    #[test]
    fn parse_create_user_falls_back_to_status_text() {
        let mut response = HttpResponse::new(503, "");
        response.status_text = "Service Unavailable".to_string();
        let err = client().parse_create_user(response).unwrap_err();
        assert_eq!(err.to_string(), "HTTP 503: Failed to create user: Service Unavailable");
    }

    #[test]
    fn parse_update_user_overlays_echo_and_keeps_id() {
        let response = HttpResponse::new(200, r#"{"id":99,"name":"Annie"}"#);
        let user = client().parse_update_user(response, &ann()).unwrap();
        assert_eq!(user.id, UserId::Number(1));
        assert_eq!(user.name, "Annie");
        assert_eq!(user.email, "ann@x.com");
    }

    #[test]
    fn parse_update_user_rejects_non_object() {
        let err = client()
            .parse_update_user(HttpResponse::new(200, "[]"), &ann())
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn parse_delete_user_reports_plain_ok() {
        assert!(client().parse_delete_user(HttpResponse::new(200, "{}")).unwrap());
        assert!(!client().parse_delete_user(HttpResponse::new(204, "")).unwrap());
        let err = client().parse_delete_user(HttpResponse::new(404, "")).unwrap_err();
        assert_eq!(err, FetchError::NotFound);
    }
}
