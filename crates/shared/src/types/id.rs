//! Typed IDs for type-safe entity references.
//!
//! A step id and an expense id are both UUIDs on the wire; wrapping them keeps a
//! decision from ever being applied against an expense id by mistake.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Generates a typed ID wrapper around a UUID.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new ID using UUID v7, so ids sort by creation time.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(UserId, "Unique identifier for a directory user.");
typed_id!(CompanyId, "Unique identifier for a company.");
typed_id!(ExpenseId, "Unique identifier for a submitted expense.");
typed_id!(
    ApprovalStepId,
    "Unique identifier for one approver's decision task on an expense."
);
