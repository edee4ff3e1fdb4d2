use sqlx::PgPool;

use crate::models::evaluation::Evaluation;
use crate::types::BatchId;

/// Returns `false` when the batch already carries an evaluation.
pub async fn insert(pool: &PgPool, evaluation: &Evaluation) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO evaluations (id, batch_id, evaluator_id, rating, comment, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6) ON CONFLICT (batch_id) DO NOTHING",
    )
    .bind(evaluation.id)
    .bind(evaluation.batch_id)
    .bind(evaluation.evaluator_id)
    .bind(evaluation.rating)
    .bind(&evaluation.comment)
    .bind(evaluation.created_at)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}
