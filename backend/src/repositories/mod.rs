//! Database access for departments, users, the property catalog, batches and evaluations.

pub mod batch;
pub mod common;
pub mod department;
pub mod evaluation;
pub mod property;
pub mod request_item;
pub mod transaction;
pub mod user;

pub use batch::{BatchListFilters, BatchRepository, BatchRepositoryTrait};
