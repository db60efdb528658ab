pub mod filter;
pub mod session;
pub mod task_ops;
