use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;

use crate::user::errors::IdentityError;

/// Date format accepted for birthdays.
pub const BIRTHDAY_FORMAT: &str = "%Y-%m-%d";

/// User aggregate entity.
///
/// Canonical record as returned by the store. It carries the password hash
/// and is never handed to callers outside the domain; see [`UserProfile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check the invariants required before persisting an update.
    ///
    /// # Errors
    /// * `InvalidEmail` - Email is empty
    /// * `InvalidFirstName` - First name is empty
    /// * `InvalidLastName` - Last name is empty
    pub fn validate_for_update(&self) -> Result<(), IdentityError> {
        validate_required_fields(&self.email, &self.first_name, &self.last_name)
    }
}

/// User unique identifier type, assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl FromStr for UserId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>().map(UserId)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A validated user that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewUser {
    /// Create a new user entity with validation.
    ///
    /// Both timestamps are stamped with `now`.
    ///
    /// # Errors
    /// * `InvalidEmail` - Email is empty
    /// * `InvalidFirstName` - First name is empty
    /// * `InvalidLastName` - Last name is empty
    pub fn new(
        email: String,
        password_hash: String,
        first_name: String,
        last_name: String,
        phone: String,
        birthday: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Self, IdentityError> {
        validate_required_fields(&email, &first_name, &last_name)?;

        Ok(Self {
            email,
            password_hash,
            first_name,
            last_name,
            phone,
            birthday,
            created_at: now,
            updated_at: now,
        })
    }

    /// Attach the identifier assigned by the store.
    pub fn with_id(self, id: UserId) -> User {
        User {
            id,
            email: self.email,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            phone: self.phone,
            birthday: self.birthday,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

fn validate_required_fields(
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<(), IdentityError> {
    if email.is_empty() {
        return Err(IdentityError::InvalidEmail);
    }
    if first_name.is_empty() {
        return Err(IdentityError::InvalidFirstName);
    }
    if last_name.is_empty() {
        return Err(IdentityError::InvalidLastName);
    }
    Ok(())
}

/// Redacted view of a [`User`] safe to return to callers.
///
/// Has no credential field at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub birthday: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Get the user's full name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            birthday: user.birthday,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Parse a `YYYY-MM-DD` birthday.
///
/// # Errors
/// * `InvalidBirthday` - Input is not a calendar date in that format
pub fn parse_birthday(raw: &str) -> Result<NaiveDate, IdentityError> {
    NaiveDate::parse_from_str(raw, BIRTHDAY_FORMAT).map_err(|_| IdentityError::InvalidBirthday)
}

/// Decoded payload of a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    pub user_id: UserId,
    pub email: String,
}

/// Command to register a new user.
#[derive(Debug, Clone)]
pub struct RegisterCommand {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub birthday: NaiveDate,
}

/// Command to update an existing user.
///
/// All fields are optional to support partial updates. A field that is
/// `None` or an empty string leaves the stored value untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserCommand {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub birthday: Option<NaiveDate>,
}

impl UpdateUserCommand {
    /// Apply the provided fields to `user` and stamp `updated_at`.
    pub fn apply_to(self, user: &mut User, now: DateTime<Utc>) {
        if let Some(first_name) = non_empty(self.first_name) {
            user.first_name = first_name;
        }
        if let Some(last_name) = non_empty(self.last_name) {
            user.last_name = last_name;
        }
        if let Some(phone) = non_empty(self.phone) {
            user.phone = phone;
        }
        if let Some(birthday) = self.birthday {
            user.birthday = birthday;
        }
        user.updated_at = now;
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Successful login: an access token plus the user it was issued for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginResult {
    pub token: String,
    pub user: UserProfile,
}
