pub mod task;
pub mod user;

pub use task::{Task, TaskCreate, TaskFilter, TaskQuery, TaskSort, TaskUpdate};
pub use user::{User, UserResponse};
