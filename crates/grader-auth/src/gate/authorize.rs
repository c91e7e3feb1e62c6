//! Admin check applied after authentication.

use std::future::Future;

use tracing::warn;

use grader_core::error::AppError;
use grader_core::result::AppResult;
use grader_entity::user::User;

/// Rejects non-admin principals with `Authorization`.
pub fn require_admin(principal: &User) -> AppResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        warn!(principal_id = principal.id, "Admin operation refused");
        Err(AppError::authorization("Administrator privileges required"))
    }
}

/// Runs `operation` with the principal only if it is an admin.
pub async fn with_admin<T, F, Fut>(principal: User, operation: F) -> AppResult<T>
where
    F: FnOnce(User) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    require_admin(&principal)?;
    operation(principal).await
}
