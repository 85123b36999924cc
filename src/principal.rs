//! Principals: whoever a check is evaluated for.
//!
//! The identity subsystem is external; all the engine needs is an anonymity flag and a
//! permission test. [`User`] is a plain in-memory implementation for embedding and tests.

use std::collections::HashSet;

/// Identity a permission check is evaluated for.
pub trait Principal {
    fn is_anonymous(&self) -> bool;
    fn has_permission(&self, code: &str) -> bool;

    /// True when the principal holds at least one of `codes`. An empty list is satisfied by
    /// any authenticated principal.
    fn has_any_permission(&self, codes: &[String]) -> bool {
        codes.is_empty() || codes.iter().any(|c| self.has_permission(c))
    }
}

impl<P: Principal + ?Sized> Principal for &P {
    fn is_anonymous(&self) -> bool {
        (**self).is_anonymous()
    }

    fn has_permission(&self, code: &str) -> bool {
        (**self).has_permission(code)
    }
}

/// An absent principal is treated as anonymous.
impl<P: Principal> Principal for Option<P> {
    fn is_anonymous(&self) -> bool {
        self.as_ref().map_or(true, |p| p.is_anonymous())
    }

    fn has_permission(&self, code: &str) -> bool {
        self.as_ref().is_some_and(|p| p.has_permission(code))
    }
}

/// In-memory principal holding an explicit set of permission codes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct User {
    pub username: String,
    anonymous: bool,
    superuser: bool,
    permissions: HashSet<String>,
}

impl User {
    pub fn new(username: &str, codes: &[&str]) -> Self {
        User {
            username: username.to_string(),
            permissions: codes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn anonymous() -> Self {
        User { anonymous: true, ..Default::default() }
    }

    /// Authenticated principal that holds every permission code.
    pub fn superuser(username: &str) -> Self {
        User { username: username.to_string(), superuser: true, ..Default::default() }
    }

    pub fn grant(&mut self, code: &str) {
        self.permissions.insert(code.to_string());
    }

    pub fn revoke(&mut self, code: &str) -> bool {
        self.permissions.remove(code)
    }
}

impl Principal for User {
    fn is_anonymous(&self) -> bool {
        self.anonymous
    }

    fn has_permission(&self, code: &str) -> bool {
        !self.anonymous && (self.superuser || self.permissions.contains(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_permission() {
        let u = User::new("u", &["127000"]);
        assert!(u.has_any_permission(&["127000".into(), "127001".into()]));
        assert!(!u.has_any_permission(&["127001".into()]));
        assert!(u.has_any_permission(&[]));
    }

    #[test]
    fn test_grant_and_revoke() {
        let mut u = User::new("u", &[]);
        u.grant("127002");
        assert!(u.has_permission("127002"));
        assert!(u.revoke("127002"));
        assert!(!u.revoke("127002"));
        assert!(!u.has_permission("127002"));
    }

    #[test]
    fn test_absent_and_anonymous() {
        let none: Option<User> = None;
        assert!(none.is_anonymous());
        assert!(!none.has_permission("127000"));
        assert!(User::anonymous().is_anonymous());
        assert!(!User::superuser("root").is_anonymous());
        assert!(User::superuser("root").has_permission("anything"));
    }
}
