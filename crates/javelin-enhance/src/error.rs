use std::fmt;

use javelin_model::{ClassId, DeclarationStore, MemberId, Name, RawMember};
use serde::Serialize;

pub type Result<T, E = EnhancementError> = std::result::Result<T, E>;

/// The declaration an error is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MemberOrigin {
    pub member: MemberId,
    pub name: Name,
    /// Binary name of the declaring class, or the class id when the store does not know it.
    pub owner: Name,
}

impl MemberOrigin {
    pub fn of(store: &DeclarationStore, member: &RawMember) -> Self {
        let owner = store
            .class(member.owner)
            .map(|class| class.name.clone())
            .unwrap_or_else(|| Name::new(member.owner.to_string()));
        Self {
            member: member.id,
            name: member.name.clone(),
            owner,
        }
    }
}

impl fmt::Display for MemberOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{} ({})", self.owner, self.name, self.member)
    }
}

/// Errors produced while enhancing foreign members.
///
/// None of these are cached: a failed lookup leaves the scope usable and a later lookup of the
/// same member recomputes it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnhancementError {
    #[error("cannot enhance {origin}: expected {expected}, found {found}")]
    UnexpectedShape {
        origin: MemberOrigin,
        expected: &'static str,
        found: &'static str,
    },

    #[error("{origin} overrides a member of its own class: {overridden}")]
    OverrideCycle {
        origin: MemberOrigin,
        overridden: MemberOrigin,
    },

    #[error("inheritance cycle through {class}")]
    InheritanceCycle { class: Name },

    #[error("{origin} was requested again while its enhancement was in progress")]
    ReentrantEnhancement { origin: MemberOrigin },

    #[error(
        "predefined enhancement for {origin} describes {found} parameters, but the method has {expected}"
    )]
    PredefinedArityMismatch {
        origin: MemberOrigin,
        expected: usize,
        found: usize,
    },

    #[error("unknown member {0}")]
    UnknownMember(MemberId),

    #[error("unknown class {0}")]
    UnknownClass(ClassId),
}

impl EnhancementError {
    /// The foreign declarations themselves are inconsistent (as opposed to a caller or
    /// enhancement-pass bug).
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            EnhancementError::OverrideCycle { .. } | EnhancementError::InheritanceCycle { .. }
        )
    }

    /// An invariant of the enhancement pass itself was violated.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            EnhancementError::ReentrantEnhancement { .. }
                | EnhancementError::PredefinedArityMismatch { .. }
        )
    }

    pub fn origin(&self) -> Option<&MemberOrigin> {
        match self {
            EnhancementError::UnexpectedShape { origin, .. }
            | EnhancementError::OverrideCycle { origin, .. }
            | EnhancementError::ReentrantEnhancement { origin }
            | EnhancementError::PredefinedArityMismatch { origin, .. } => Some(origin),
            EnhancementError::InheritanceCycle { .. }
            | EnhancementError::UnknownMember(_)
            | EnhancementError::UnknownClass(_) => None,
        }
    }
}

impl From<javelin_model::InheritanceCycle> for EnhancementError {
    fn from(err: javelin_model::InheritanceCycle) -> Self {
        EnhancementError::InheritanceCycle { class: err.class }
    }
}
