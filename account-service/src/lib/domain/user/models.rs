use std::fmt;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::user::errors::UserIdError;
use crate::user::errors::ValidationError;
use crate::user::validation;

/// Token type marker returned alongside issued tokens.
pub const TOKEN_TYPE: &str = "Bearer";

/// Fixed palette new accounts draw their avatar colour from.
pub const AVATAR_PALETTE: [&str; 8] = [
    "#EF4444", "#F97316", "#F59E0B", "#10B981", "#3B82F6", "#6366F1", "#8B5CF6", "#EC4899",
];

/// User aggregate entity.
///
/// An inactive user is valid at rest but is never an authentication subject.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub name: DisplayName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub avatar_color: AvatarColor,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

/// User unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserId(pub Uuid);

impl UserId {
    /// Generate a new random user ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a user ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, UserIdError> {
        Uuid::parse_str(s)
            .map(UserId)
            .map_err(|e| UserIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name, 2-100 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    const FIELD: &'static str = "Name";
    const MIN_LENGTH: usize = 2;
    const MAX_LENGTH: usize = 100;

    /// Validate a raw, possibly missing, name.
    ///
    /// # Errors
    /// * `Required` - Missing or blank
    /// * `Length` - Outside 2-100 characters
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let name = validation::validate_required(raw, Self::FIELD)?;
        validation::validate_string_length(name, Self::MIN_LENGTH, Self::MAX_LENGTH, Self::FIELD)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address, the login key.
///
/// Stored trimmed and lower-cased, so uniqueness and lookup are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const FIELD: &'static str = "Email";
    // Shortest shape the format check admits is `a@b.c`.
    const MIN_LENGTH: usize = 5;
    // Width of the `users.email` column.
    const MAX_LENGTH: usize = 255;

    /// Validate and normalize a raw, possibly missing, email.
    ///
    /// # Errors
    /// * `Required` - Missing or blank
    /// * `InvalidEmail` - Not shaped like `local@domain.tld`
    /// * `Length` - Longer than 255 characters once normalized
    pub fn parse(raw: Option<&str>) -> Result<Self, ValidationError> {
        let email = validation::validate_required(raw, Self::FIELD)?;
        let normalized = email.trim().to_lowercase();
        validation::validate_email(&normalized)?;
        validation::validate_string_length(
            &normalized,
            Self::MIN_LENGTH,
            Self::MAX_LENGTH,
            Self::FIELD,
        )?;
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// `#RRGGBB` avatar colour, immutable after account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvatarColor(String);

impl AvatarColor {
    pub fn new(color: String) -> Result<Self, ValidationError> {
        validation::validate_hex_color(&color)?;
        Ok(Self(color))
    }

    /// Palette entry at `index`, wrapping around the palette length.
    pub fn from_palette(index: usize) -> Self {
        Self(AVATAR_PALETTE[index % AVATAR_PALETTE.len()].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity admitted for a protected request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: UserId,
    pub email: EmailAddress,
    pub name: DisplayName,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Raw registration input; fields are validated by the service.
#[derive(Debug, Default)]
pub struct RegisterCommand {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl RegisterCommand {
    pub fn new(name: Option<String>, email: Option<String>, password: Option<String>) -> Self {
        Self {
            name,
            email,
            password,
        }
    }
}

/// Raw login input; fields are validated by the service.
#[derive(Debug, Default)]
pub struct LoginCommand {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl LoginCommand {
    pub fn new(email: Option<String>, password: Option<String>) -> Self {
        Self { email, password }
    }
}

/// Successful login: a signed token plus the user it was issued for.
#[derive(Debug, Clone)]
pub struct Session {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}
