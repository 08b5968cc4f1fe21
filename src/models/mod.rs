pub mod session;
pub mod task;
pub mod user;

pub use session::AuthSession;
pub use task::{Task, TaskInput, TaskPriority, TaskQuery, TaskRow, TaskStatus, TaskUpdate};
pub use user::{UpdateUserRequest, User, UserRecord};
