//! Caller identity and the elevated-read capability

use serde::{Deserialize, Serialize};

/// User exposed to field template expressions as `user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub id: i32,
    pub login: String,
    pub name: String,
}

/// Who an operation runs for
#[derive(Debug, Clone, Default)]
pub struct AccessContext {
    user: Option<UserContext>,
}

impl AccessContext {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn for_user(user: UserContext) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&UserContext> {
        self.user.as_ref()
    }

    /// Grant a read that skips record rules, on behalf of this caller
    pub fn elevate(&self) -> ElevatedRead {
        ElevatedRead {
            on_behalf_of: self.user.as_ref().map(|u| u.id),
        }
    }
}

/// Proof that the caller may read attribute values regardless of record rules.
/// Only obtainable through [`AccessContext::elevate`].
#[derive(Debug, Clone, Copy)]
pub struct ElevatedRead {
    on_behalf_of: Option<i32>,
}

impl ElevatedRead {
    pub fn on_behalf_of(&self) -> Option<i32> {
        self.on_behalf_of
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elevate_keeps_caller() {
        let ctx = AccessContext::for_user(UserContext {
            id: 4,
            login: "admin".to_string(),
            name: "Administrator".to_string(),
        });
        assert_eq!(ctx.elevate().on_behalf_of(), Some(4));
        assert_eq!(AccessContext::anonymous().elevate().on_behalf_of(), None);
    }
}
