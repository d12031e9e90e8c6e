pub mod pool;
pub mod postgres_task_repository;
pub mod routine;
pub mod timeout;
