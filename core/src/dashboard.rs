//! The orchestrator: owns the collection and reconciles it with the server.
//!
//! # Design
//! Creates are optimistic: the pending record is appended before the
//! request goes out and swapped for the server record when it comes back.
//! A failed create keeps the pending record and only raises a banner.
//! Updates never fail at the API level, so the dashboard always applies the
//! returned value; a local-only outcome is surfaced as a banner.
//!
//! At most one create, update or delete may be outstanding per record;
//! overlapping intents are refused with [`DashboardError::Busy`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{error, info, instrument, warn};

use crate::api::{UpdateOrigin, UpdateOutcome, UsersApi};
use crate::error::DashboardError;
use crate::form::{validate, Field, SubmitError, UserForm};
use crate::in_flight::InFlight;
use crate::list::{Intent, UserList};
use crate::router::Route;
use crate::store::{Record, StoreError, StoreView, UserStore};
use crate::types::{User, UserFields, UserId};

const LOAD_FAILED: &str = "Failed to load users. Please try again later.";
const CREATE_LOCAL_ONLY: &str = "User created locally but not saved to server.";
const UPDATE_LOCAL_ONLY: &str = "Changes saved locally; the server did not confirm the update.";
const DELETE_FAILED: &str = "Failed to delete user.";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this user?";

/// Blocking yes/no prompt shown before destructive intents.
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The prompt was declined; nothing was sent.
    Declined,
    Removed,
    /// The server refused; the collection is unchanged.
    Failed,
}

#[derive(Debug)]
struct UiState {
    editing: Option<User>,
    error: Option<String>,
    loading: bool,
    form: UserForm,
}

pub struct Dashboard {
    api: UsersApi,
    store: UserStore,
    in_flight: InFlight,
    confirm: Arc<dyn Confirm>,
    ui: Mutex<UiState>,
}

impl Dashboard {
    /// Starts in the loading state with an empty collection; call
    /// [`Dashboard::load`] to populate it.
    pub fn new(api: UsersApi, confirm: Arc<dyn Confirm>) -> Self {
        Self {
            api,
            store: UserStore::new(),
            in_flight: InFlight::default(),
            confirm,
            ui: Mutex::new(UiState {
                editing: None,
                error: None,
                loading: true,
                form: UserForm::default(),
            }),
        }
    }

    pub fn api(&self) -> &UsersApi {
        &self.api
    }

    pub fn view(&self) -> StoreView {
        self.store.view()
    }

    pub fn records(&self) -> Vec<Record> {
        self.store.view().snapshot()
    }

    pub fn editing(&self) -> Option<User> {
        self.ui.lock().editing.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.ui.lock().error.clone()
    }

    pub fn dismiss_error(&self) {
        self.ui.lock().error = None;
    }

    pub fn is_loading(&self) -> bool {
        self.ui.lock().loading
    }

    pub fn form(&self) -> UserForm {
        self.ui.lock().form.clone()
    }

    fn set_error(&self, message: impl Into<String>) {
        self.ui.lock().error = Some(message.into());
    }

    #[instrument(name = "users.dashboard.load", skip(self))]
    pub async fn load(&self) {
        self.ui.lock().loading = true;
        match self.api.list().await {
            Ok(users) => {
                info!(count = users.len(), "Loaded users");
                self.store.replace_all(users);
                self.ui.lock().error = None;
            }
            Err(e) => {
                error!(error = %e, "Error loading users");
                self.set_error(LOAD_FAILED);
            }
        }
        self.ui.lock().loading = false;
    }

    /// Append a pending record, then try to confirm it with the server.
    ///
    /// Returns the identifier the record ends up under: the server's on
    /// success, the temporary one otherwise.
    #[instrument(name = "users.dashboard.create", skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: UserFields) -> Result<UserId, DashboardError> {
        let errors = validate(&input);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors).into());
        }
        let temp_id = UserId::temporary();
        let _guard = self
            .in_flight
            .begin(&temp_id)
            .ok_or_else(|| DashboardError::Busy(temp_id.clone()))?;
        let pending = User::placeholder(temp_id.clone(), &input);
        self.store.push_pending(pending.clone())?;

        let created = match self.api.create(&pending).await {
            Ok(created) => created,
            Err(e) => {
                warn!(error = %e, "Create not saved to server, keeping local record");
                self.set_error(CREATE_LOCAL_ONLY);
                return Ok(temp_id);
            }
        };
        let id = created.id.clone();
        match self.store.confirm(&temp_id, created) {
            Ok(()) => {
                info!(user_id = %id, "User created");
                Ok(id)
            }
            Err(StoreError::DuplicateId(taken)) => {
                warn!(user_id = %taken, "Server assigned an id already in the list");
                self.set_error(format!(
                    "Server assigned id {taken}, which is already in use; the user is kept locally."
                ));
                Ok(temp_id)
            }
            Err(StoreError::Missing(_)) => {
                warn!(user_id = %id, "Pending user left the list before confirmation");
                Ok(id)
            }
        }
    }

    /// Open the form on an existing record.
    pub fn edit(&self, id: &UserId) -> Result<(), DashboardError> {
        let record = self
            .store
            .view()
            .get(id)
            .ok_or_else(|| DashboardError::UnknownRecord(id.clone()))?;
        let mut ui = self.ui.lock();
        ui.form.reset(Some(&record.user));
        ui.editing = Some(record.user);
        Ok(())
    }

    pub fn cancel_edit(&self) {
        let mut ui = self.ui.lock();
        ui.editing = None;
        ui.form.reset(None);
    }

    /// Apply `input` to the record being edited.
    #[instrument(name = "users.dashboard.update", skip(self, input))]
    pub async fn update(&self, input: UserFields) -> Result<UpdateOrigin, DashboardError> {
        let editing = self.editing().ok_or(DashboardError::NotEditing)?;
        let id = editing.id.clone();
        let errors = validate(&input);
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors).into());
        }
        let Some(record) = self.store.view().get(&id) else {
            self.cancel_edit();
            return Err(DashboardError::UnknownRecord(id));
        };
        if record.is_pending() {
            return Err(DashboardError::PendingRecord(id));
        }
        let _guard = self
            .in_flight
            .begin(&id)
            .ok_or_else(|| DashboardError::Busy(id.clone()))?;

        let UpdateOutcome { user, origin } = self.api.update(&id, &editing.merged(&input)).await;
        if let Err(e) = self.store.replace(&id, user) {
            warn!(error = %e, "Updated user is no longer in the list");
        }
        self.cancel_edit();
        if origin == UpdateOrigin::LocalFallback {
            self.set_error(UPDATE_LOCAL_ONLY);
        }
        Ok(origin)
    }

    /// Ask for confirmation, then delete. Pending records never reached the
    /// server and are dropped locally.
    #[instrument(name = "users.dashboard.delete", skip(self), fields(user_id = %id))]
    pub async fn delete(&self, id: &UserId) -> Result<DeleteOutcome, DashboardError> {
        let record = self
            .store
            .view()
            .get(id)
            .ok_or_else(|| DashboardError::UnknownRecord(id.clone()))?;
        if self.in_flight.contains(id) {
            return Err(DashboardError::Busy(id.clone()));
        }
        if !self.confirm.confirm(DELETE_PROMPT) {
            return Ok(DeleteOutcome::Declined);
        }
        let _guard = self
            .in_flight
            .begin(id)
            .ok_or_else(|| DashboardError::Busy(id.clone()))?;

        if !record.is_pending() {
            if let Err(e) = self.api.delete(id).await {
                error!(error = %e, "Error deleting user");
                self.set_error(DELETE_FAILED);
                return Ok(DeleteOutcome::Failed);
            }
        }
        self.store.remove(id);
        if self.editing().is_some_and(|u| u.id == *id) {
            self.cancel_edit();
        }
        info!("User deleted");
        Ok(DeleteOutcome::Removed)
    }

    pub fn view_intent(&self, id: &UserId) -> Route {
        Route::UserDetail(id.to_string())
    }

    /// Dispatch a row intent. `View` yields the route to navigate to.
    pub async fn handle(&self, intent: Intent) -> Result<Option<Route>, DashboardError> {
        match intent {
            Intent::View(id) => Ok(Some(self.view_intent(&id))),
            Intent::Edit(id) => self.edit(&id).map(|()| None),
            Intent::Delete(id) => self.delete(&id).await.map(|_| None),
        }
    }

    pub fn set_field(&self, field: Field, value: &str) {
        self.ui.lock().form.set(field, value);
    }

    /// Submit the form: update when editing, create otherwise.
    pub async fn submit_form(&self) -> Result<(), DashboardError> {
        let (values, editing) = {
            let ui = self.ui.lock();
            let busy = ui.loading
                || ui
                    .editing
                    .as_ref()
                    .is_some_and(|u| self.in_flight.contains(&u.id));
            (ui.form.submit(busy)?, ui.editing.is_some())
        };
        if editing {
            self.update(values).await?;
        } else {
            self.create(values).await?;
            self.ui.lock().form.submitted();
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        let records = self.records();
        let ui = self.ui.lock();
        let refresh = if ui.loading { "Refreshing..." } else { "Refresh Users" };
        let mut out = format!("User Management Dashboard  [{refresh}]\n");
        if let Some(error) = &ui.error {
            out.push_str(&format!("! {error}\n"));
        }
        out.push('\n');
        out.push_str(&ui.form.render());
        out.push_str("\nUsers\n");
        out.push_str(&UserList::render(&records, ui.loading));
        out
    }
}
