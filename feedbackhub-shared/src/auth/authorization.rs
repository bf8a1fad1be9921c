/// Authorization helpers and permission checks
///
/// # Permission Model
///
/// 1. **Global role**: `user` < `manager` < `admin` (carried in the token)
/// 2. **Project access**: owner, active member, or admin
/// 3. **Project management**: owner or admin
/// 4. **Resource ownership**: the resource's author, plus whoever else the
///    caller passes in (typically the project owner), or admin
///
/// # Example
///
/// ```no_run
/// use feedbackhub_shared::auth::authorization::{require_project_access, require_role};
/// use feedbackhub_shared::auth::middleware::AuthContext;
/// use feedbackhub_shared::models::project::Project;
/// use feedbackhub_shared::models::user::UserRole;
/// use sqlx::PgPool;
///
/// async fn check(pool: &PgPool, auth: &AuthContext, project: &Project) -> Result<(), Box<dyn std::error::Error>> {
///     require_role(auth, UserRole::Manager)?;
///     require_project_access(pool, auth, project).await?;
///     Ok(())
/// }
/// ```

use sqlx::PgPool;
use uuid::Uuid;

use super::middleware::AuthContext;
use crate::models::project::Project;
use crate::models::project_member::ProjectMember;
use crate::models::user::UserRole;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// User doesn't have required role
    #[error("Insufficient permissions: requires {required}, has {actual}")]
    InsufficientRole {
        required: UserRole,
        actual: UserRole,
    },

    /// User is neither owner nor member of the project
    #[error("No access to project {0}")]
    NoProjectAccess(Uuid),

    /// User doesn't own the resource
    #[error("Not authorized to access this resource")]
    NotAuthorized,

    /// Database error
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Checks the caller's global role is at least `required`
pub fn require_role(auth: &AuthContext, required: UserRole) -> Result<(), AuthzError> {
    if !auth.role.has_permission(&required) {
        return Err(AuthzError::InsufficientRole {
            required,
            actual: auth.role,
        });
    }

    Ok(())
}

/// Checks the caller can read a project and its feedback
///
/// Owner and admin pass without a query; everyone else needs an active
/// membership row.
pub async fn require_project_access(
    pool: &PgPool,
    auth: &AuthContext,
    project: &Project,
) -> Result<(), AuthzError> {
    if auth.is_admin() || project.owner_id == auth.user_id {
        return Ok(());
    }

    if ProjectMember::is_member(pool, project.id, auth.user_id).await? {
        return Ok(());
    }

    Err(AuthzError::NoProjectAccess(project.id))
}

/// Checks the caller can update/delete a project or manage its members
pub fn require_project_owner(auth: &AuthContext, project: &Project) -> Result<(), AuthzError> {
    require_ownership(auth, &[project.owner_id])
}

/// Checks the caller is one of `owners`, or an admin
pub fn require_ownership(auth: &AuthContext, owners: &[Uuid]) -> Result<(), AuthzError> {
    if auth.is_admin() || owners.contains(&auth.user_id) {
        return Ok(());
    }

    Err(AuthzError::NotAuthorized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_role_hierarchy() {
        let user = AuthContext::new(Uuid::new_v4(), UserRole::User);
        let manager = AuthContext::new(Uuid::new_v4(), UserRole::Manager);
        let admin = AuthContext::new(Uuid::new_v4(), UserRole::Admin);

        assert!(require_role(&user, UserRole::User).is_ok());
        assert!(require_role(&user, UserRole::Manager).is_err());
        assert!(require_role(&manager, UserRole::Manager).is_ok());
        assert!(require_role(&manager, UserRole::Admin).is_err());
        assert!(require_role(&admin, UserRole::Manager).is_ok());
        assert!(require_role(&admin, UserRole::Admin).is_ok());
    }

    #[test]
    fn test_require_ownership() {
        let owner = Uuid::new_v4();
        let author = Uuid::new_v4();

        let as_owner = AuthContext::new(owner, UserRole::User);
        let as_author = AuthContext::new(author, UserRole::User);
        let stranger = AuthContext::new(Uuid::new_v4(), UserRole::Manager);
        let admin = AuthContext::new(Uuid::new_v4(), UserRole::Admin);

        assert!(require_ownership(&as_owner, &[owner, author]).is_ok());
        assert!(require_ownership(&as_author, &[owner, author]).is_ok());
        assert!(matches!(
            require_ownership(&stranger, &[owner, author]),
            Err(AuthzError::NotAuthorized)
        ));
        assert!(require_ownership(&admin, &[owner]).is_ok());
        assert!(require_ownership(&as_owner, &[]).is_err());
    }

    #[test]
    fn test_authz_error_display() {
        let err = AuthzError::InsufficientRole {
            required: UserRole::Admin,
            actual: UserRole::User,
        };
        assert_eq!(err.to_string(), "Insufficient permissions: requires admin, has user");

        assert!(AuthzError::NoProjectAccess(Uuid::nil())
            .to_string()
            .contains("No access to project"));
    }
}
