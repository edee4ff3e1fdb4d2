use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::types::DepartmentId;
use crate::validation::rules::validate_not_blank;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// An organizational unit that submits property requests.
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl Department {
    pub fn new(name: String) -> Self {
        Self {
            id: DepartmentId::new(),
            name,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateDepartment {
    #[validate(length(min = 1, max = 100), custom(function = "validate_not_blank"))]
    pub name: String,
}
