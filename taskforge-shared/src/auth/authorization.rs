/// Authorization policy: capability and ownership checks
///
/// Every privileged route composes authentication with an explicit check
/// from this module. Admin operations call [`requires`] with the capability
/// they exercise; ownership-scoped routes verify the resource's owner against
/// the authenticated identity.
///
/// # Example
///
/// ```
/// use taskforge_shared::auth::authorization::{requires, require_ownership, Capability};
/// use taskforge_shared::auth::middleware::AuthContext;
/// use taskforge_shared::models::user::UserRole;
/// use uuid::Uuid;
///
/// fn guard(auth: &AuthContext, owner_id: Uuid) -> Result<(), Box<dyn std::error::Error>> {
///     // Admin-only operation
///     requires(auth, Capability::AdminReadAllUsers)?;
///
///     // Owner-scoped operation
///     require_ownership(auth, owner_id)?;
///     Ok(())
/// }
/// ```

use uuid::Uuid;

use super::middleware::AuthContext;

/// Error type for authorization checks
#[derive(Debug, thiserror::Error)]
pub enum AuthzError {
    /// Identity lacks the required capability
    #[error("Missing required capability: {0}")]
    MissingCapability(Capability),

    /// Identity doesn't own the resource
    #[error("Not authorized to access this resource")]
    NotOwner,
}

/// Capabilities gating privileged operations
///
/// All of these currently require the admin role; keeping them distinct
/// makes every admin route name exactly what it exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Read users across owners, including per-user statistics
    AdminReadAllUsers,

    /// Read tasks across owners
    AdminReadAllTasks,

    /// Read projects across owners
    AdminReadAllProjects,

    /// Change roles and delete accounts
    AdminManageUsers,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Capability::AdminReadAllUsers => "admin:read-all-users",
            Capability::AdminReadAllTasks => "admin:read-all-tasks",
            Capability::AdminReadAllProjects => "admin:read-all-projects",
            Capability::AdminManageUsers => "admin:manage-users",
        };
        write!(f, "{}", name)
    }
}

/// Checks that an identity holds a capability
///
/// # Errors
///
/// Returns `MissingCapability` when the identity's role doesn't grant it.
/// The HTTP layer maps this to 403 Forbidden.
pub fn requires(auth: &AuthContext, capability: Capability) -> Result<(), AuthzError> {
    if auth.is_admin() {
        return Ok(());
    }

    Err(AuthzError::MissingCapability(capability))
}

/// Checks that an identity owns a resource
///
/// # Errors
///
/// Returns `NotOwner` when the owner differs from the identity. Routes that
/// hide existence should answer 404 rather than surfacing this as 403; the
/// owner-scoped model queries make that the default path.
pub fn require_ownership(auth: &AuthContext, resource_owner_id: Uuid) -> Result<(), AuthzError> {
    if auth.user_id != resource_owner_id {
        return Err(AuthzError::NotOwner);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::UserRole;

    fn context(role: UserRole) -> AuthContext {
        AuthContext {
            user_id: Uuid::new_v4(),
            email: "test@example.com".to_string(),
            role,
        }
    }

    #[test]
    fn test_admin_holds_all_capabilities() {
        let admin = context(UserRole::Admin);

        assert!(requires(&admin, Capability::AdminReadAllUsers).is_ok());
        assert!(requires(&admin, Capability::AdminReadAllTasks).is_ok());
        assert!(requires(&admin, Capability::AdminReadAllProjects).is_ok());
        assert!(requires(&admin, Capability::AdminManageUsers).is_ok());
    }

    #[test]
    fn test_regular_user_holds_no_admin_capability() {
        let user = context(UserRole::User);

        assert!(requires(&user, Capability::AdminReadAllUsers).is_err());
        assert!(requires(&user, Capability::AdminReadAllTasks).is_err());
        assert!(requires(&user, Capability::AdminReadAllProjects).is_err());
        assert!(requires(&user, Capability::AdminManageUsers).is_err());
    }

    #[test]
    fn test_require_ownership() {
        let auth = context(UserRole::User);

        assert!(require_ownership(&auth, auth.user_id).is_ok());
        assert!(require_ownership(&auth, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_admin_role_does_not_bypass_ownership() {
        // Ownership checks are about the owner, not the role; admins reach
        // cross-owner data only through the admin listings.
        let admin = context(UserRole::Admin);

        assert!(require_ownership(&admin, Uuid::new_v4()).is_err());
    }

    #[test]
    fn test_capability_display() {
        assert_eq!(
            Capability::AdminReadAllUsers.to_string(),
            "admin:read-all-users"
        );
        assert_eq!(
            Capability::AdminManageUsers.to_string(),
            "admin:manage-users"
        );
    }
}
