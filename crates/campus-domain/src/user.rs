//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UnknownVariant;

/// Credit score every new account starts with.
pub const DEFAULT_CREDIT_SCORE: u32 = 100;

/// Account type. Only `Admin` carries moderation capability.
///
/// Wire format: lowercase key (`"student"`, `"teacher"`, `"admin"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Teacher, Role::Admin];

    /// Symbolic key used on the wire.
    pub fn key(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Teacher => "teacher",
            Self::Admin => "admin",
        }
    }

    /// Display label shown next to a seller's name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Student => "学生",
            Self::Teacher => "教师",
            Self::Admin => "管理员",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.key() == key)
    }

    pub fn can_moderate(self) -> bool {
        self == Self::Admin
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_key(s).ok_or_else(|| UnknownVariant::new("role", s))
    }
}

/// Account lifecycle status. Only active accounts can log in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Active,
    /// Older data files spell this `"inactive"`.
    #[serde(alias = "inactive")]
    Suspended,
}

impl UserStatus {
    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}
