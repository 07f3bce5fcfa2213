use serde::{Deserialize, Serialize};

/// Access levels a token can carry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rights {
    Voter,
    Admin,
}

impl Rights {
    /// Does this level grant access at the target level?
    /// Admins can do everything a voter can.
    pub fn permits(self, target: Rights) -> bool {
        match target {
            Rights::Voter => true,
            Rights::Admin => self == Rights::Admin,
        }
    }
}

/// A marker type naming the access level a request guard demands.
pub trait Principal {
    const RIGHTS: Rights;
}

/// Any authenticated account.
pub struct Voter;

impl Principal for Voter {
    const RIGHTS: Rights = Rights::Voter;
}

/// An account with the admin flag set.
pub struct Admin;

impl Principal for Admin {
    const RIGHTS: Rights = Rights::Admin;
}
