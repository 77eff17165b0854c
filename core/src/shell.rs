//! Top-level shell: owns the dashboard and the current route.

use tracing::debug;

use crate::dashboard::Dashboard;
use crate::detail::DetailView;
use crate::router::Route;

pub struct Shell {
    dashboard: Dashboard,
    route: Route,
    detail: Option<DetailView>,
}

impl Shell {
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            route: Route::Dashboard,
            detail: None,
        }
    }

    /// Mount the dashboard: the initial load.
    pub async fn start(&mut self) {
        self.dashboard.load().await;
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn detail(&self) -> Option<&DetailView> {
        self.detail.as_ref()
    }

    /// Switch routes without waiting on the network. A detail view that
    /// needs a fetch is left in its loading state until [`Shell::settle`].
    pub fn open(&mut self, path: &str) -> &Route {
        let route = Route::parse(path);
        debug!(route = %route, "Navigating");
        self.detail = match &route {
            Route::UserDetail(id) => Some(DetailView::open(id, &self.dashboard.view())),
            _ => None,
        };
        self.route = route;
        &self.route
    }

    /// Finish any fetch the current view is waiting on.
    pub async fn settle(&mut self) {
        if let Some(detail) = self.detail.as_mut() {
            detail.load(self.dashboard.api()).await;
        }
    }

    pub async fn navigate(&mut self, path: &str) -> &Route {
        self.open(path);
        self.settle().await;
        &self.route
    }

    pub fn back(&mut self) -> &Route {
        let target = match &self.detail {
            Some(detail) => detail.back(),
            None => Route::Dashboard,
        };
        self.open(&target.path())
    }

    pub fn render(&self) -> String {
        let mut out = String::from("User Management\n\n");
        match (&self.route, &self.detail) {
            (Route::UserDetail(_), Some(detail)) => out.push_str(&detail.render()),
            (Route::NotFound(path), _) => out.push_str(&format!("No page at {path}\n")),
            _ => out.push_str(&self.dashboard.render()),
        }
        out
    }
}
