pub mod batch_query;
pub mod dashboard;
pub mod lifecycle;
pub mod workflow;
