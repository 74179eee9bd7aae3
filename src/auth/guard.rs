use crate::error::AppError;
use crate::models::{Task, User};

/// Checks that `caller` owns `task`.
///
/// Callers are expected to have handled the not-found case already: a task
/// that does not exist is a 404, a task that exists but belongs to someone
/// else is a 403. Both sides of that distinction are intentional.
pub fn ensure_owner(caller: &User, task: &Task, action: &str) -> Result<(), AppError> {
    if task.user_id == caller.id {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "Not authorized to {} this task",
            action
        )))
    }
}
