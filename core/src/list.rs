//! Table rendering of the collection and the intents its rows emit.

use crate::router::Route;
use crate::store::Record;
use crate::types::UserId;

const SKELETON_ROWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    View,
    Edit,
    Delete,
}

/// What a row asks the dashboard to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    View(UserId),
    Edit(UserId),
    Delete(UserId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: UserId,
    pub initial: char,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub pending: bool,
}

impl UserRow {
    pub fn from_record(record: &Record) -> Self {
        let user = &record.user;
        Self {
            id: user.id.clone(),
            initial: user
                .name
                .chars()
                .next()
                .and_then(|c| c.to_uppercase().next())
                .unwrap_or('?'),
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            pending: record.is_pending(),
        }
    }

    pub fn view_path(&self) -> String {
        Route::UserDetail(self.id.to_string()).path()
    }

    pub fn intent(&self, action: Action) -> Intent {
        match action {
            Action::View => Intent::View(self.id.clone()),
            Action::Edit => Intent::Edit(self.id.clone()),
            Action::Delete => Intent::Delete(self.id.clone()),
        }
    }
}

pub struct UserList;

impl UserList {
    pub fn rows(records: &[Record]) -> Vec<UserRow> {
        records.iter().map(UserRow::from_record).collect()
    }

    pub fn render(records: &[Record], loading: bool) -> String {
        if loading {
            return "  ░░░░░░░░  ░░░░░░░░░░░░  ░░░░░░\n".repeat(SKELETON_ROWS);
        }
        if records.is_empty() {
            return "  No users found. Add your first user using the form.\n".to_string();
        }
        let mut out = format!("  {:<4} {:<26} {:<28} {:<22}\n", "", "Name", "Email", "Phone");
        for row in Self::rows(records) {
            let marker = if row.pending { " (unsaved)" } else { "" };
            out.push_str(&format!(
                "  [{}] {:<26} {:<28} {:<22} {}{}\n",
                row.initial,
                row.name,
                row.email,
                row.phone,
                row.view_path(),
                marker
            ));
        }
        out
    }
}
