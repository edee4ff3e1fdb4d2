//! Models that represent users, authentication payloads, and the role hierarchy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sqlx::FromRow;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::types::{DepartmentId, UserId};
use crate::validation::rules::validate_username;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Database representation of an authenticated user account.
pub struct User {
    /// Unique identifier for the user.
    pub id: UserId,
    /// Immutable username used for login.
    pub username: String,
    /// Argon2 hash of the user's password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Human-readable full name.
    pub full_name: String,
    /// Position in the role hierarchy.
    pub role: UserRole,
    /// Department the user requests on behalf of.
    pub department_id: Option<DepartmentId>,
    /// Creation timestamp for auditing.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp for auditing.
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, sqlx::Type, ToSchema, Default)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[schema(rename_all = "snake_case")]
/// Roles ordered from least to most privileged.
pub enum UserRole {
    /// Member of a requesting department.
    #[default]
    DepartmentUser,
    /// Approves requests from a budget perspective.
    FinanceManager,
    /// Approves requests and maintains the property catalog.
    PropertyManager,
    /// Oversees both manager groups.
    HigherManager,
    /// Manages users, departments and roles.
    Admin,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::DepartmentUser,
        UserRole::FinanceManager,
        UserRole::PropertyManager,
        UserRole::HigherManager,
        UserRole::Admin,
    ];

    /// Returns the canonical snake_case representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::DepartmentUser => "department_user",
            UserRole::FinanceManager => "finance_manager",
            UserRole::PropertyManager => "property_manager",
            UserRole::HigherManager => "higher_manager",
            UserRole::Admin => "admin",
        }
    }

    /// Position in the hierarchy. Finance and property managers share a rank.
    pub fn rank(&self) -> u8 {
        match self {
            UserRole::DepartmentUser => 0,
            UserRole::FinanceManager | UserRole::PropertyManager => 1,
            UserRole::HigherManager => 2,
            UserRole::Admin => 3,
        }
    }

    /// Managers and above may decide line items.
    pub fn is_approver(&self) -> bool {
        self.rank() >= 1
    }

    pub fn can_manage_catalog(&self) -> bool {
        matches!(
            self,
            UserRole::PropertyManager | UserRole::HigherManager | UserRole::Admin
        )
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        UserRole::ALL
            .into_iter()
            .find(|role| role.as_str() == normalized)
            .ok_or_else(|| format!("unknown role `{}`", s))
    }
}

impl Serialize for UserRole {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        // tolerate legacy casings such as "ADMIN"
        s.parse().map_err(|_| {
            serde::de::Error::unknown_variant(
                &s,
                &[
                    "department_user",
                    "finance_manager",
                    "property_manager",
                    "higher_manager",
                    "admin",
                ],
            )
        })
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
/// Payload for creating a new user account.
pub struct CreateUser {
    #[validate(custom(function = "validate_username"))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    pub role: UserRole,
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Payload for moving a user within the role hierarchy.
pub struct UpdateRolePayload {
    pub role: UserRole,
    /// Replaces the department when present.
    #[serde(default)]
    pub department_id: Option<DepartmentId>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UserListQuery {
    pub department_id: Option<DepartmentId>,
    #[param(value_type = Option<String>)]
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
/// Token returned after a successful login.
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
/// Public-facing representation of a user returned by the API.
pub struct UserResponse {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub department_id: Option<DepartmentId>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            department_id: user.department_id,
        }
    }
}

impl User {
    /// Constructs a new user with a freshly generated identifier.
    pub fn new(
        username: String,
        password_hash: String,
        full_name: String,
        role: UserRole,
        department_id: Option<DepartmentId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: UserId::new(),
            username,
            password_hash,
            full_name,
            role,
            department_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_approver(&self) -> bool {
        self.role.is_approver()
    }
}
