//! Typed entity identifiers.
//!
//! Accounts and auth sessions are both keyed by UUIDs; wrapping them
//! in a phantom-typed [`Id`] keeps a session id from ever being
//! handed to a query that expects an account id.

use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// A UUID tagged with the entity it identifies.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: Uuid,
    _marker: PhantomData<T>,
}

impl<T> Id<T> {
    /// Mint a fresh random id (UUID v4).
    pub fn new() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap a UUID that already exists (from storage or a token).
    pub fn from_uuid(value: Uuid) -> Self {
        Self {
            value,
            _marker: PhantomData,
        }
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.value
    }

    pub fn into_uuid(self) -> Uuid {
        self.value
    }
}

impl<T> fmt::Debug for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.value)
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Zero-sized tags for [`Id`].
pub mod markers {
    /// Registered account.
    pub struct Account;

    /// Authenticated session backing a session token.
    pub struct AuthSession;
}

pub type AccountId = Id<markers::Account>;
pub type AuthSessionId = Id<markers::AuthSession>;
