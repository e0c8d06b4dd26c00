use serde::Deserialize;

use crate::preferences::{KEY_USER, PreferenceStore, read_non_empty};

pub const ROLE_GUEST: i64 = 0;
pub const ROLE_COMMON: i64 = 1;
pub const ROLE_ADMIN: i64 = 10;
pub const ROLE_ROOT: i64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Guest,
    Common,
    Admin,
    Root,
}

impl Role {
    #[must_use]
    pub fn from_level(level: i64) -> Self {
        if level >= ROLE_ROOT {
            Self::Root
        } else if level >= ROLE_ADMIN {
            Self::Admin
        } else if level >= ROLE_COMMON {
            Self::Common
        } else {
            Self::Guest
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Guest => "guest",
            Self::Common => "common",
            Self::Admin => "admin",
            Self::Root => "root",
        }
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        self >= Self::Admin
    }
}

#[derive(Debug, Deserialize)]
struct CachedUser {
    #[serde(default)]
    role: i64,
}

/// Role of the signed-in caller, read from the cached `user` record.
/// Anything missing or unreadable is a guest.
pub fn caller_role<S: PreferenceStore + ?Sized>(store: &S) -> Role {
    let Some(raw) = read_non_empty(store, KEY_USER) else {
        return Role::Guest;
    };
    match serde_json::from_str::<CachedUser>(&raw) {
        Ok(user) => Role::from_level(user.role),
        Err(error) => {
            tracing::warn!(error = %error, "cached user record is unreadable");
            Role::Guest
        }
    }
}
