//! Client core for the user-management dashboard.
//!
//! # Overview
//! Keeps an in-memory list of users in sync with a remote REST resource.
//! Creates are optimistic, updates fall back to the submitted data, and
//! deletes are confirmed before anything is sent.
//!
//! # Design
//! - `UsersClient` is stateless and sans-IO: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `UsersApi` pairs it with a host-supplied [`Transport`].
//! - `Dashboard` owns the collection through a `UserStore`; detail views
//!   and renderers read through a `StoreView`.
//! - Every record carries an explicit `SyncState`, and `InFlight` refuses
//!   overlapping operations on the same record.

pub mod api;
pub mod client;
pub mod dashboard;
pub mod detail;
pub mod error;
pub mod form;
pub mod http;
pub mod in_flight;
pub mod list;
pub mod router;
pub mod shell;
pub mod store;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{UpdateOrigin, UpdateOutcome, UsersApi};
pub use client::UsersClient;
pub use dashboard::{Confirm, Dashboard, DeleteOutcome};
pub use detail::{DetailState, DetailView};
pub use error::{DashboardError, FetchError, TransportError};
pub use form::{Field, SubmitError, UserForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use list::{Action, Intent, UserList, UserRow};
pub use router::Route;
pub use shell::Shell;
pub use store::{Record, StoreView, SyncState, UserStore};
pub use transport::Transport;
pub use types::{NewUser, User, UserFields, UserId};
