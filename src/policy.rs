//! Single source of truth for role/ownership permission checks.
//! Handlers never compare roles inline; they call these and bail with 403.

use crate::error::ApiError;
use crate::models::user::Role;

/// Owner, manager or admin may edit project fields, stage, subtasks and tags.
pub fn can_update_project(role: Role, is_owner: bool) -> bool {
    is_owner || matches!(role, Role::Admin | Role::Manager)
}

/// Owner or admin may delete a project.
pub fn can_delete_project(role: Role, is_owner: bool) -> bool {
    is_owner || role == Role::Admin
}

/// Admin only: role changes, deactivation/reactivation, invitation revokes.
pub fn can_manage_users(role: Role) -> bool {
    role == Role::Admin
}

/// Admin or manager may create invitations.
pub fn can_invite(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager)
}

/// Admin or manager may hand a project to a different owner.
pub fn can_reassign_owner(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager)
}

/// Comment author or admin may edit/delete a comment.
pub fn can_edit_comment(role: Role, is_author: bool) -> bool {
    is_author || role == Role::Admin
}

/// Admin or manager may manage the workspace tag registry.
pub fn can_manage_tags(role: Role) -> bool {
    matches!(role, Role::Admin | Role::Manager)
}

/// Turn a policy verdict into the uniform 403.
pub fn ensure(allowed: bool, action: &str) -> Result<(), ApiError> {
    if allowed {
        Ok(())
    } else {
        Err(ApiError::Forbidden(format!("not allowed to {}", action)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_owner_may_update_but_not_delete_for_others() {
        assert!(can_update_project(Role::Member, true));
        assert!(!can_update_project(Role::Member, false));
        assert!(can_delete_project(Role::Member, true));
        assert!(!can_delete_project(Role::Member, false));
    }

    #[test]
    fn manager_updates_any_project_but_cannot_delete_unowned() {
        assert!(can_update_project(Role::Manager, false));
        assert!(!can_delete_project(Role::Manager, false));
    }

    #[test]
    fn admin_is_unrestricted_on_projects() {
        assert!(can_update_project(Role::Admin, false));
        assert!(can_delete_project(Role::Admin, false));
    }

    #[test]
    fn only_admin_manages_users() {
        assert!(can_manage_users(Role::Admin));
        assert!(!can_manage_users(Role::Manager));
        assert!(!can_manage_users(Role::Member));
    }

    #[test]
    fn invitations_take_manager_or_admin() {
        assert!(can_invite(Role::Admin));
        assert!(can_invite(Role::Manager));
        assert!(!can_invite(Role::Member));
    }

    #[test]
    fn comment_edits_need_author_or_admin() {
        assert!(can_edit_comment(Role::Member, true));
        assert!(!can_edit_comment(Role::Member, false));
        assert!(!can_edit_comment(Role::Manager, false));
        assert!(can_edit_comment(Role::Admin, false));
    }

    #[test]
    fn ensure_maps_to_forbidden() {
        assert!(ensure(true, "update projects").is_ok());
        let err = ensure(false, "delete projects").unwrap_err();
        assert_eq!(err.to_string(), "not allowed to delete projects");
    }
}
