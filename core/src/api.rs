//! Async API client: pairs the sans-IO `UsersClient` with a `Transport`.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use crate::client::UsersClient;
use crate::error::FetchError;
use crate::http::HttpRequest;
use crate::http::HttpResponse;
use crate::transport::Transport;
use crate::types::{NewUser, User, UserId};

/// Where the value returned by [`UsersApi::update`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOrigin {
    /// The server accepted the update and echoed the record.
    Remote,
    /// The server call failed; the value is the submitted data.
    LocalFallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub user: User,
    pub origin: UpdateOrigin,
}

impl UpdateOutcome {
    pub fn is_remote(&self) -> bool {
        self.origin == UpdateOrigin::Remote
    }
}

/// The five operations of the users resource.
#[derive(Clone)]
pub struct UsersApi {
    client: UsersClient,
    transport: Arc<dyn Transport>,
}

impl UsersApi {
    pub fn new(client: UsersClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &UsersClient {
        &self.client
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, FetchError> {
        debug!(method = %request.method, path = %request.path, "Sending request");
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "Received response");
        Ok(response)
    }

    #[instrument(name = "users.api.list", skip(self))]
    pub async fn list(&self) -> Result<Vec<User>, FetchError> {
        let response = self.send(self.client.build_list_users()).await?;
        self.client.parse_list_users(response)
    }

    #[instrument(name = "users.api.get", skip(self), fields(user_id = %id))]
    pub async fn get_by_id(&self, id: &UserId) -> Result<User, FetchError> {
        let response = self.send(self.client.build_get_user(id)).await?;
        self.client.parse_get_user(response)
    }

    /// Any identifier on `user` is ignored; the server assigns one.
    #[instrument(name = "users.api.create", skip(self, user), fields(name = %user.name))]
    pub async fn create(&self, user: &User) -> Result<User, FetchError> {
        let request = self.client.build_create_user(&NewUser::from(user))?;
        let response = self.send(request).await?;
        self.client.parse_create_user(response)
    }

    /// Best-effort update. Never fails: when the server call does not
    /// succeed, the submitted data (with `id` applied) comes back tagged
    /// `LocalFallback`.
    #[instrument(name = "users.api.update", skip(self, user), fields(user_id = %id))]
    pub async fn update(&self, id: &UserId, user: &User) -> UpdateOutcome {
        let mut submitted = user.clone();
        submitted.id = id.clone();
        match self.try_update(&submitted).await {
            Ok(user) => UpdateOutcome {
                user,
                origin: UpdateOrigin::Remote,
            },
            Err(e) => {
                warn!(error = %e, "Update not confirmed by server, using submitted data");
                UpdateOutcome {
                    user: submitted,
                    origin: UpdateOrigin::LocalFallback,
                }
            }
        }
    }

    async fn try_update(&self, submitted: &User) -> Result<User, FetchError> {
        let request = self.client.build_update_user(&submitted.id, submitted)?;
        let response = self.send(request).await?;
        self.client.parse_update_user(response, submitted)
    }

    #[instrument(name = "users.api.delete", skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: &UserId) -> Result<bool, FetchError> {
        let response = self.send(self.client.build_delete_user(id)).await?;
        self.client.parse_delete_user(response)
    }
}
