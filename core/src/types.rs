//! Domain DTOs for the users resource.
//!
//! # Design
//! Field names follow the remote resource's JSON (camelCase). Only `id`,
//! `name` and `email` are mandatory on the wire; the decorative fields
//! (`username`, `website`, `company`, `address`) default to empty values so
//! partially-populated records from the server still decode.

use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a user record.
///
/// The remote resource assigns numeric identifiers; locally created records
/// carry a textual temporary identifier until the server confirms them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Number(u64),
    Text(String),
}

impl UserId {
    /// Interpret a path segment: digits become `Number`, anything else `Text`.
    pub fn parse(raw: &str) -> Self {
        raw.parse::<u64>()
            .map(UserId::Number)
            .unwrap_or_else(|_| UserId::Text(raw.to_string()))
    }

    /// A fresh identifier for a record that has not reached the server yet.
    pub fn temporary() -> Self {
        UserId::Text(format!("temp-{}", Uuid::new_v4()))
    }

    /// Whether this identifier renders as `raw` (route parameters are text).
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            UserId::Number(n) => raw.parse::<u64>().is_ok_and(|r| r == *n),
            UserId::Text(s) => s == raw,
        }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserId::Number(n) => write!(f, "{n}"),
            UserId::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for UserId {
    fn from(n: u64) -> Self {
        UserId::Number(n)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        UserId::parse(s)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Company {
    pub name: String,
    pub catch_phrase: String,
    pub bs: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Geo {
    pub lat: String,
    pub lng: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub suite: String,
    pub city: String,
    pub zipcode: String,
    pub geo: Geo,
}

/// A single user record as exchanged with the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub company: Company,
    #[serde(default)]
    pub address: Address,
}

impl User {
    /// Synthesize a local record from form input, filling the decorative
    /// fields with placeholders.
    pub fn placeholder(id: UserId, fields: &UserFields) -> Self {
        Self {
            id,
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            username: username_for(&fields.name),
            website: "example.com".to_string(),
            company: Company {
                name: "Example Inc".to_string(),
                catch_phrase: "Example catchphrase".to_string(),
                bs: "Example bs".to_string(),
            },
            address: Address {
                street: "123 Example St".to_string(),
                suite: "Apt. 1".to_string(),
                city: "Example City".to_string(),
                zipcode: "12345".to_string(),
                geo: Geo {
                    lat: "0".to_string(),
                    lng: "0".to_string(),
                },
            },
        }
    }

    /// Copy of this record with the editable fields replaced.
    pub fn merged(&self, fields: &UserFields) -> Self {
        Self {
            name: fields.name.clone(),
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            ..self.clone()
        }
    }

    pub fn fields(&self) -> UserFields {
        UserFields {
            name: self.name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// The user-editable subset of a record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserFields {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

impl UserFields {
    pub fn new(name: &str, email: &str, phone: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
        }
    }
}

/// Request payload for creating a user. The server assigns the identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub username: String,
    pub website: String,
    pub company: Company,
    pub address: Address,
}

impl From<&User> for NewUser {
    fn from(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone: user.phone.clone(),
            username: user.username.clone(),
            website: user.website.clone(),
            company: user.company.clone(),
            address: user.address.clone(),
        }
    }
}

/// Lower-cased name with whitespace removed, or `user<millis>` when that
/// leaves nothing.
fn username_for(name: &str) -> String {
    let squashed: String = name
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    if squashed.is_empty() {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("user{millis}")
    } else {
        squashed
    }
}
