//! Shared repository utilities.

use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

/// Appends WHERE or AND to the query builder depending on whether a clause has already been added.
pub fn push_clause(builder: &mut QueryBuilder<'_, Postgres>, has_clause: &mut bool) {
    if *has_clause {
        builder.push(" AND ");
    } else {
        builder.push(" WHERE ");
        *has_clause = true;
    }
}

/// Typed ids are bound as plain UUID arrays for `= ANY($1)` filters.
pub fn uuid_array<T: Copy + Into<Uuid>>(ids: &[T]) -> Vec<Uuid> {
    ids.iter().map(|id| (*id).into()).collect()
}
