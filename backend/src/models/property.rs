//! Shared physical property that departments can borrow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::types::PropertyId;
use crate::validation::rules::validate_not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "TEXT", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PropertyCategory {
    Equipment,
    Furniture,
    Supplies,
}

impl PropertyCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyCategory::Equipment => "equipment",
            PropertyCategory::Furniture => "furniture",
            PropertyCategory::Supplies => "supplies",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub category: PropertyCategory,
    pub description: Option<String>,
    /// Units owned.
    pub total_quantity: i32,
    /// Units not currently handed out on an approved line item.
    pub available_quantity: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Property {
    pub fn new(
        name: String,
        category: PropertyCategory,
        description: Option<String>,
        total_quantity: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: PropertyId::new(),
            name,
            category,
            description,
            total_quantity,
            available_quantity: total_quantity,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Units currently lent out.
    pub fn in_use(&self) -> i32 {
        self.total_quantity - self.available_quantity
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProperty {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: String,
    pub category: PropertyCategory,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub total_quantity: i32,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProperty {
    #[validate(length(min = 1, max = 200), custom(function = "validate_not_blank"))]
    pub name: Option<String>,
    pub category: Option<PropertyCategory>,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(range(min = 0, max = 100000))]
    pub total_quantity: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct PropertyListQuery {
    pub category: Option<PropertyCategory>,
    #[serde(default)]
    pub active_only: bool,
}
