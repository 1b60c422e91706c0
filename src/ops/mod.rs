pub mod analytics;
pub mod grid;
pub mod store;
pub mod task_ops;
