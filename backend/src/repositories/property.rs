//! Catalog queries and guarded stock movements.

use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::models::property::{Property, PropertyListQuery};
use crate::repositories::common::{push_clause, uuid_array};
use crate::types::PropertyId;

const PROPERTY_COLUMNS: &str = "id, name, category, description, total_quantity, \
     available_quantity, is_active, created_at, updated_at";

pub async fn list(pool: &PgPool, filters: &PropertyListQuery) -> Result<Vec<Property>, sqlx::Error> {
    let mut builder: QueryBuilder<Postgres> =
        QueryBuilder::new(format!("SELECT {} FROM properties", PROPERTY_COLUMNS));
    let mut has_clause = false;
    if let Some(category) = filters.category {
        push_clause(&mut builder, &mut has_clause);
        builder.push("category = ").push_bind(category.as_str());
    }
    if filters.active_only {
        push_clause(&mut builder, &mut has_clause);
        builder.push("is_active = TRUE");
    }
    builder.push(" ORDER BY category, name");
    builder.build_query_as::<Property>().fetch_all(pool).await
}

pub async fn find_by_id(pool: &PgPool, id: PropertyId) -> Result<Option<Property>, sqlx::Error> {
    sqlx::query_as::<_, Property>(&format!(
        "SELECT {} FROM properties WHERE id = $1",
        PROPERTY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn find_many(pool: &PgPool, ids: &[PropertyId]) -> Result<Vec<Property>, sqlx::Error> {
    sqlx::query_as::<_, Property>(&format!(
        "SELECT {} FROM properties WHERE id = ANY($1)",
        PROPERTY_COLUMNS
    ))
    .bind(uuid_array(ids))
    .fetch_all(pool)
    .await
}

/// Locks the property row for the rest of the transaction.
pub async fn lock_for_update(
    conn: &mut PgConnection,
    id: PropertyId,
) -> Result<Option<Property>, sqlx::Error> {
    sqlx::query_as::<_, Property>(&format!(
        "SELECT {} FROM properties WHERE id = $1 FOR UPDATE",
        PROPERTY_COLUMNS
    ))
    .bind(id)
    .fetch_optional(conn)
    .await
}

pub async fn insert(pool: &PgPool, property: &Property) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO properties (id, name, category, description, total_quantity, available_quantity, \
         is_active, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(property.id)
    .bind(&property.name)
    .bind(property.category.as_str())
    .bind(&property.description)
    .bind(property.total_quantity)
    .bind(property.available_quantity)
    .bind(property.is_active)
    .bind(property.created_at)
    .bind(property.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn update(conn: &mut PgConnection, property: &Property) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE properties SET name = $2, category = $3, description = $4, total_quantity = $5, \
         available_quantity = $6, is_active = $7, updated_at = $8 WHERE id = $1",
    )
    .bind(property.id)
    .bind(&property.name)
    .bind(property.category.as_str())
    .bind(&property.description)
    .bind(property.total_quantity)
    .bind(property.available_quantity)
    .bind(property.is_active)
    .bind(property.updated_at)
    .execute(conn)
    .await
    .map(|_| ())
}

/// Takes `quantity` units off the shelf. Returns `false` when not enough
/// units are available, leaving the row unchanged.
pub async fn reserve_stock(
    conn: &mut PgConnection,
    id: PropertyId,
    quantity: i32,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE properties SET available_quantity = available_quantity - $1, updated_at = NOW() \
         WHERE id = $2 AND available_quantity >= $1",
    )
    .bind(quantity)
    .bind(id)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Puts returned units back, never past the owned total.
pub async fn release_stock(
    conn: &mut PgConnection,
    id: PropertyId,
    quantity: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE properties SET available_quantity = LEAST(total_quantity, available_quantity + $1), \
         updated_at = NOW() WHERE id = $2",
    )
    .bind(quantity)
    .bind(id)
    .execute(conn)
    .await
    .map(|_| ())
}
