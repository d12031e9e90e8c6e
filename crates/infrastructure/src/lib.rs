pub mod database;

pub use database::pool::{commit_transaction, rollback_transaction, Database};
pub use database::postgres_task_repository::PostgresTaskRepository;
pub use database::routine::RoutineCall;
