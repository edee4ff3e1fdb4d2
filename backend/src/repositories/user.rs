//! Repository functions for user accounts.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::user::{User, UserListQuery, UserRole};
use crate::repositories::common::push_clause;
use crate::types::{DepartmentId, UserId};

const USER_COLUMNS: &str =
    "id, username, password_hash, full_name, role, department_id, created_at, updated_at";

pub async fn find_by_id(pool: &PgPool, user_id: UserId) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {} FROM users WHERE username = $1",
        USER_COLUMNS
    ))
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn list(pool: &PgPool, filters: &UserListQuery) -> Result<Vec<User>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM users", USER_COLUMNS));
    let mut has_clause = false;
    if let Some(department_id) = filters.department_id {
        push_clause(&mut builder, &mut has_clause);
        builder.push("department_id = ").push_bind(department_id);
    }
    if let Some(role) = filters.role {
        push_clause(&mut builder, &mut has_clause);
        builder.push("role = ").push_bind(role.as_str());
    }
    builder.push(" ORDER BY username");
    builder.build_query_as::<User>().fetch_all(pool).await
}

pub async fn insert(pool: &PgPool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, full_name, role, department_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(user.id)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.full_name)
    .bind(user.role.as_str())
    .bind(user.department_id)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn update_role(
    pool: &PgPool,
    user_id: UserId,
    role: UserRole,
    department_id: Option<DepartmentId>,
    now: DateTime<Utc>,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET role = $1, department_id = $2, updated_at = $3 WHERE id = $4 RETURNING {}",
        USER_COLUMNS
    ))
    .bind(role.as_str())
    .bind(department_id)
    .bind(now)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}
