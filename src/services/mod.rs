pub mod cleanup;
pub mod permissions;
pub mod recurring_tasks;
