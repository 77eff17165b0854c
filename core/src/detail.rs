//! Single-user detail view.
//!
//! Local records render immediately; anything else is fetched once.

use tracing::error;

use crate::api::UsersApi;
use crate::router::Route;
use crate::store::StoreView;
use crate::types::{User, UserId};

const LOAD_FAILED: &str = "Failed to load user details. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Loaded { user: User, source: Source },
    Failed { message: String },
}

#[derive(Debug, Clone)]
pub struct DetailView {
    raw_id: String,
    state: DetailState,
}

impl DetailView {
    /// Resolve `raw_id` against the local collection. Anything not found
    /// there starts in `Loading` and needs [`DetailView::load`].
    pub fn open(raw_id: &str, view: &StoreView) -> Self {
        let state = if raw_id.is_empty() {
            DetailState::Failed {
                message: "No user ID provided".to_string(),
            }
        } else if let Some(record) = view.find_raw(raw_id) {
            DetailState::Loaded {
                user: record.user,
                source: Source::Local,
            }
        } else {
            DetailState::Loading
        };
        Self {
            raw_id: raw_id.to_string(),
            state,
        }
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn needs_fetch(&self) -> bool {
        self.state == DetailState::Loading
    }

    /// Fetch the user if it was not found locally. No-op otherwise.
    pub async fn load(&mut self, api: &UsersApi) {
        if !self.needs_fetch() {
            return;
        }
        let id = UserId::parse(&self.raw_id);
        self.state = match api.get_by_id(&id).await {
            Ok(user) => DetailState::Loaded {
                user,
                source: Source::Remote,
            },
            Err(e) => {
                error!(user_id = %id, error = %e, "Error fetching user");
                DetailState::Failed {
                    message: LOAD_FAILED.to_string(),
                }
            }
        };
    }

    pub fn back(&self) -> Route {
        Route::Dashboard
    }

    pub fn render(&self) -> String {
        match &self.state {
            DetailState::Loading => "Loading user details...\n".to_string(),
            DetailState::Failed { message } => {
                format!("{message}\n[back] Back to Dashboard ({})\n", self.back())
            }
            DetailState::Loaded { user, .. } => {
                let mut out = format!("User Details  [back] Back to Users ({})\n\n", self.back());
                out.push_str(&format!("{}\n{}\n", user.name, user.email));
                for line in [&user.phone, &user.website] {
                    if !line.is_empty() {
                        out.push_str(&format!("{line}\n"));
                    }
                }
                if !user.company.name.is_empty() {
                    out.push_str(&format!("\nCompany\n  {}\n", user.company.name));
                    if !user.company.catch_phrase.is_empty() {
                        out.push_str(&format!("  {}\n", user.company.catch_phrase));
                    }
                }
                if !user.address.city.is_empty() || !user.address.street.is_empty() {
                    out.push_str(&format!(
                        "\nAddress\n  {}, {}\n",
                        user.address.street, user.address.city
                    ));
                }
                out
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::client::UsersClient;
    use crate::store::UserStore;
    use crate::testing::ScriptedTransport;
    use crate::types::UserFields;

    fn api(transport: &Arc<ScriptedTransport>) -> UsersApi {
        UsersApi::new(UsersClient::new("http://api.test"), transport.clone())
    }

    fn store_with_ann() -> UserStore {
        let store = UserStore::new();
        store.replace_all(vec![User::placeholder(
            UserId::Number(1),
            &UserFields::new("Ann", "ann@x.com", ""),
        )]);
        store
    }

    #[tokio::test]
    async fn local_record_renders_without_network() {
        let store = store_with_ann();
        let transport = ScriptedTransport::new();
        let mut view = DetailView::open("1", &store.view());
        assert!(!view.needs_fetch());
        view.load(&api(&transport)).await;
        assert!(transport.requests().is_empty());
        assert!(matches!(view.state(), DetailState::Loaded { source: Source::Local, .. }));
        assert!(view.render().contains("Ann"));
    }

    #[tokio::test]
    async fn missing_record_is_fetched() {
        let store = store_with_ann();
        let transport = ScriptedTransport::new().reply(
            200,
            r#"{"id":4,"name":"Dee","email":"dee@x.com","company":{"name":"Acme","catchPhrase":"Go"}}"#,
        );
        let mut view = DetailView::open("4", &store.view());
        assert_eq!(view.state(), &DetailState::Loading);
        assert!(view.render().contains("Loading"));
        view.load(&api(&transport)).await;
        assert_eq!(transport.requests()[0].path, "http://api.test/users/4");
        let out = view.render();
        assert!(out.contains("Dee"));
        assert!(out.contains("Acme"));
    }

    #[tokio::test]
    async fn fetch_failure_offers_back_action() {
        let transport = ScriptedTransport::new().fail("offline");
        let mut view = DetailView::open("9", &UserStore::new().view());
        view.load(&api(&transport)).await;
        assert_eq!(
            view.state(),
            &DetailState::Failed {
                message: LOAD_FAILED.to_string()
            }
        );
        assert_eq!(view.back(), Route::Dashboard);
        assert!(view.render().contains("Back to Dashboard"));
    }

    #[tokio::test]
    async fn empty_body_is_failure() {
        let transport = ScriptedTransport::new().reply(200, "{}");
        let mut view = DetailView::open("9", &UserStore::new().view());
        view.load(&api(&transport)).await;
        assert!(matches!(view.state(), DetailState::Failed { .. }));
    }

    #[test]
    fn empty_id_fails_immediately() {
        let view = DetailView::open("", &UserStore::new().view());
        assert_eq!(
            view.state(),
            &DetailState::Failed {
                message: "No user ID provided".to_string()
            }
        );
    }
}
