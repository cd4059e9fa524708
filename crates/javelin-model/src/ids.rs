use std::fmt;

use serde::{Deserialize, Serialize};

/// Index of a class in a [`crate::DeclarationStore`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(u32);

/// Index of a member (field or method) in a [`crate::DeclarationStore`].
///
/// Member ids are the identity used by every cache in the enhancement pass: two members are
/// "the same member" exactly when their ids are equal.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(u32);

macro_rules! arena_id {
    ($ty:ident, $prefix:literal) => {
        impl $ty {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn to_raw(self) -> u32 {
                self.0
            }

            #[inline]
            pub(crate) fn index(self) -> usize {
                self.0 as usize
            }

            pub(crate) fn from_index(index: usize) -> Self {
                let raw: u32 = index
                    .try_into()
                    .expect(concat!("too many entries for ", stringify!($ty)));
                Self(raw)
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

arena_id!(ClassId, "class");
arena_id!(MemberId, "member");
