//! Add/edit form state and validation.
//!
//! The form knows nothing about the network. It is re-initialized for every
//! new target and hands committed values to the dashboard.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::types::{User, UserFields, UserId};

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").expect("email pattern is valid")
});

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\-+()\s]*$").expect("phone pattern is valid"));

const NAME_MIN_CHARS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
}

impl Field {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "name" => Some(Field::Name),
            "email" => Some(Field::Email),
            "phone" => Some(Field::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: &'static str,
}

/// Every rule the current values break, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors(Vec<FieldError>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.iter().find(|e| e.field == field).map(|e| e.message)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message).collect();
        f.write_str(&messages.join("; "))
    }
}

/// Why a submission was refused.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("{0}")]
    Invalid(FormErrors),

    #[error("nothing has changed")]
    Unchanged,

    #[error("another operation is still running")]
    Busy,
}

pub fn validate(fields: &UserFields) -> FormErrors {
    let mut errors = Vec::new();
    let name = fields.name.trim();
    if name.is_empty() {
        errors.push(FieldError {
            field: Field::Name,
            message: "Name is required",
        });
    } else if name.chars().count() < NAME_MIN_CHARS {
        errors.push(FieldError {
            field: Field::Name,
            message: "Name must be at least 2 characters",
        });
    }
    if fields.email.is_empty() {
        errors.push(FieldError {
            field: Field::Email,
            message: "Email is required",
        });
    } else if !EMAIL.is_match(&fields.email) {
        errors.push(FieldError {
            field: Field::Email,
            message: "Invalid email address",
        });
    }
    if !PHONE.is_match(&fields.phone) {
        errors.push(FieldError {
            field: Field::Phone,
            message: "Please enter a valid phone number",
        });
    }
    FormErrors(errors)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit(UserId),
}

#[derive(Debug, Clone)]
pub struct UserForm {
    target: FormTarget,
    title: String,
    initial: UserFields,
    values: UserFields,
}

impl Default for UserForm {
    fn default() -> Self {
        Self::for_target(None)
    }
}

impl UserForm {
    pub fn for_target(user: Option<&User>) -> Self {
        match user {
            Some(user) => Self {
                target: FormTarget::Edit(user.id.clone()),
                title: format!("Edit User: {}", user.name),
                initial: user.fields(),
                values: user.fields(),
            },
            None => Self {
                target: FormTarget::Create,
                title: "Add New User".to_string(),
                initial: UserFields::default(),
                values: UserFields::default(),
            },
        }
    }

    /// Re-initialize for a new target, discarding typed values.
    pub fn reset(&mut self, user: Option<&User>) {
        *self = Self::for_target(user);
    }

    pub fn target(&self) -> &FormTarget {
        &self.target
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn values(&self) -> &UserFields {
        &self.values
    }

    pub fn set(&mut self, field: Field, value: &str) {
        let slot = match field {
            Field::Name => &mut self.values.name,
            Field::Email => &mut self.values.email,
            Field::Phone => &mut self.values.phone,
        };
        *slot = value.to_string();
    }

    pub fn errors(&self) -> FormErrors {
        validate(&self.values)
    }

    pub fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.values != self.initial
    }

    pub fn can_submit(&self, busy: bool) -> bool {
        self.check(busy).is_ok()
    }

    /// Values to hand to the dashboard, or why they cannot be submitted yet.
    pub fn submit(&self, busy: bool) -> Result<UserFields, SubmitError> {
        self.check(busy)?;
        Ok(self.values.clone())
    }

    /// After a successful create the fields are cleared; edits are closed by
    /// the dashboard instead.
    pub fn submitted(&mut self) {
        if self.target == FormTarget::Create {
            self.reset(None);
        }
    }

    fn check(&self, busy: bool) -> Result<(), SubmitError> {
        if busy {
            return Err(SubmitError::Busy);
        }
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(SubmitError::Invalid(errors));
        }
        if !self.is_dirty() {
            return Err(SubmitError::Unchanged);
        }
        Ok(())
    }

    pub fn render(&self) -> String {
        let mut out = format!("{}\n", self.title);
        let errors = self.errors();
        for (field, value, required) in [
            (Field::Name, &self.values.name, true),
            (Field::Email, &self.values.email, true),
            (Field::Phone, &self.values.phone, false),
        ] {
            let marker = if required { "*" } else { " " };
            out.push_str(&format!("  {field:<6}{marker} {value}"));
            if self.is_dirty() {
                if let Some(message) = errors.get(field) {
                    out.push_str(&format!("  ! {message}"));
                }
            }
            out.push('\n');
        }
        out
    }
}
