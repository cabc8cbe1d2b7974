/**
 * Edit Permissions
 *
 * The single authorization rule for mutating posts and comments: admins
 * may edit anything, everyone else only what they authored. Evaluated
 * fresh on every mutating request.
 *
 * Callers resolve the target's owner first — an absent or soft-deleted
 * target is `NotFound` before this predicate is ever consulted — and map
 * a negative answer to `Forbidden`.
 */

use crate::error::ApiError;
use crate::middleware::auth::AuthenticatedUser;

/// Whether `actor` may mutate an entity owned by `owner_id`.
pub fn can_edit(actor: &AuthenticatedUser, owner_id: i32) -> bool {
    actor.is_admin || actor.user_id == owner_id
}

/// [`can_edit`] with the negative case mapped to `Forbidden`.
pub fn ensure_can_edit(actor: &AuthenticatedUser, owner_id: i32) -> Result<(), ApiError> {
    if can_edit(actor, owner_id) {
        Ok(())
    } else {
        Err(ApiError::forbidden("not the author"))
    }
}
