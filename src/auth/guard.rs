//! Shelter-scoped authorization guard.
//!
//! A `ShelterGuard` is a capability object built from one shelter and its
//! membership list: `assert` confirms that a user holds one of the allowed
//! roles there, or fails with Forbidden. It is read-only; two concurrent
//! checks against the same shelter can both pass while a membership change is
//! in flight.

use crate::errors::AppError;
use crate::models::{Shelter, ShelterMember, ShelterRole, User, UserRole};

/// Role sets for the common permission tiers.
pub const OWNER_ONLY: &[ShelterRole] = &[ShelterRole::Owner];
pub const MANAGER_UP: &[ShelterRole] = &[ShelterRole::Owner, ShelterRole::Manager];
pub const ANY_STAFF: &[ShelterRole] = &[
    ShelterRole::Owner,
    ShelterRole::Manager,
    ShelterRole::Staff,
];

/// Capability object gating operations on one shelter.
pub struct ShelterGuard {
    pub shelter: Shelter,
    members: Vec<ShelterMember>,
    allowed: Vec<ShelterRole>,
}

impl ShelterGuard {
    pub fn new(shelter: Shelter, members: Vec<ShelterMember>, allowed: &[ShelterRole]) -> Self {
        Self {
            shelter,
            members,
            allowed: allowed.to_vec(),
        }
    }

    /// Confirm that `user` may perform the guarded operation, returning the
    /// role the permission derives from. Platform admins bypass membership
    /// and act with owner capability.
    pub fn assert(&self, user: &User) -> Result<ShelterRole, AppError> {
        if user.role == UserRole::Admin {
            return Ok(ShelterRole::Owner);
        }

        let member = self
            .members
            .iter()
            .find(|m| m.user_id == user.id)
            .ok_or_else(|| {
                AppError::Forbidden(format!("Not a member of shelter {}", self.shelter.id))
            })?;

        if self.allowed.contains(&member.role) {
            Ok(member.role)
        } else {
            Err(AppError::Forbidden(format!(
                "Role {} is not sufficient for this operation",
                member.role.as_str()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShelterStatus;

    fn shelter() -> Shelter {
        Shelter {
            id: "s1".to_string(),
            name: "Happy Tails".to_string(),
            contact_email: "hello@happytails.org".to_string(),
            contact_phone: None,
            city: None,
            description: None,
            status: ShelterStatus::Verified,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn member(user_id: &str, role: ShelterRole) -> ShelterMember {
        ShelterMember {
            user_id: user_id.to_string(),
            role,
            joined_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    fn user(id: &str, role: UserRole) -> User {
        User {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            name: id.to_string(),
            avatar_url: None,
            role,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_non_member_is_forbidden() {
        let guard = ShelterGuard::new(shelter(), vec![member("u1", ShelterRole::Owner)], ANY_STAFF);
        let err = guard.assert(&user("u2", UserRole::User)).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_insufficient_role_is_forbidden() {
        let guard =
            ShelterGuard::new(shelter(), vec![member("u1", ShelterRole::Staff)], MANAGER_UP);
        let err = guard.assert(&user("u1", UserRole::User)).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_member_with_allowed_role_passes() {
        let guard =
            ShelterGuard::new(shelter(), vec![member("u1", ShelterRole::Manager)], MANAGER_UP);
        let role = guard.assert(&user("u1", UserRole::User)).unwrap();
        assert_eq!(role, ShelterRole::Manager);
    }

    #[test]
    fn test_admin_bypasses_membership() {
        let guard = ShelterGuard::new(shelter(), vec![], OWNER_ONLY);
        let role = guard.assert(&user("root", UserRole::Admin)).unwrap();
        assert_eq!(role, ShelterRole::Owner);
    }
}
