use sqlx::PgPool;

use crate::models::department::Department;
use crate::types::DepartmentId;

pub async fn list(pool: &PgPool) -> Result<Vec<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>("SELECT id, name, created_at FROM departments ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn find_by_id(
    pool: &PgPool,
    id: DepartmentId,
) -> Result<Option<Department>, sqlx::Error> {
    sqlx::query_as::<_, Department>("SELECT id, name, created_at FROM departments WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn exists_by_name(pool: &PgPool, name: &str) -> Result<bool, sqlx::Error> {
    let found: Option<(i32,)> =
        sqlx::query_as("SELECT 1 FROM departments WHERE LOWER(name) = LOWER($1)")
            .bind(name)
            .fetch_optional(pool)
            .await?;
    Ok(found.is_some())
}

pub async fn insert(pool: &PgPool, department: &Department) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO departments (id, name, created_at) VALUES ($1, $2, $3)")
        .bind(department.id)
        .bind(&department.name)
        .bind(department.created_at)
        .execute(pool)
        .await
        .map(|_| ())
}
