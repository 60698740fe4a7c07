//! Access Control
//!
//! One administrator principal, fixed at construction, gates privileged
//! configuration such as the default verifier.

use tracing::warn;

use crate::core::Principal;
use crate::protocol::error::{ProtocolError, Result};

/// Single-administrator authority.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessControl {
    admin: Principal,
}

impl AccessControl {
    /// Create with `admin` as the administrator.
    pub fn new(admin: Principal) -> Self {
        Self { admin }
    }

    /// Current administrator.
    pub fn admin(&self) -> &Principal {
        &self.admin
    }

    /// True if `caller` is the administrator.
    pub fn is_admin(&self, caller: &Principal) -> bool {
        *caller == self.admin
    }

    /// Fail with `Unauthorized` unless `caller` is the administrator.
    pub fn authorize(&self, caller: &Principal) -> Result<()> {
        if !self.is_admin(caller) {
            warn!("Rejected privileged call from {}", caller.short());
            return Err(ProtocolError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Hand the role to `new_admin`. Returns the previous administrator.
    pub fn transfer(&mut self, caller: &Principal, new_admin: Principal) -> Result<Principal> {
        self.authorize(caller)?;
        Ok(std::mem::replace(&mut self.admin, new_admin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorize() {
        let admin = Principal::from_name("admin");
        let other = Principal::from_name("other");
        let access = AccessControl::new(admin);

        assert!(access.authorize(&admin).is_ok());

        let err = access.authorize(&other).unwrap_err();
        assert!(matches!(err, ProtocolError::Unauthorized { caller } if caller == other));
        assert!(err.to_string().starts_with("authority: require admin"));
    }

    #[test]
    fn test_transfer() {
        let admin = Principal::from_name("admin");
        let next = Principal::from_name("next");
        let mut access = AccessControl::new(admin);

        // Non-admin cannot transfer
        assert!(access.transfer(&next, next).is_err());
        assert_eq!(access.admin(), &admin);

        assert_eq!(access.transfer(&admin, next).unwrap(), admin);
        assert!(access.is_admin(&next));
        assert!(!access.is_admin(&admin));
    }
}
