pub mod task;
pub mod user;

pub use task::{SortDirection, SortField, Task, TaskInput, TaskListOptions, TaskQuery, TaskSort, TaskUpdate};
pub use user::{User, UserRecord, UserUpdate};
