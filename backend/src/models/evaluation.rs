use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::types::{BatchId, EvaluationId, UserId};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
/// Feedback a requesting department leaves once it has used the property.
pub struct Evaluation {
    pub id: EvaluationId,
    pub batch_id: BatchId,
    pub evaluator_id: UserId,
    pub rating: i16,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Evaluation {
    pub fn new(batch_id: BatchId, evaluator_id: UserId, rating: i16, comment: Option<String>) -> Self {
        Self {
            id: EvaluationId::new(),
            batch_id,
            evaluator_id,
            rating,
            comment,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Validate, ToSchema)]
pub struct CreateEvaluation {
    #[validate(range(min = 1, max = 5))]
    pub rating: i16,
    #[validate(length(max = 1000))]
    pub comment: Option<String>,
}
