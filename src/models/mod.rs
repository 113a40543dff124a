pub mod user;
pub mod permission;
pub mod task;
#[cfg(test)]
pub mod meeting;

pub use user::{User, Role, LoginRequest};
pub use permission::{
    EmployeePermission, Permission, UpdatePermissions,
    get_all_permissions, all_permission_keys, is_known_permission
};
pub use task::{Task, Recurrence};
#[cfg(test)]
pub use meeting::{Meeting, DailyUpdate};
