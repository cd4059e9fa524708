//! Nullability enhancement of foreign (Java) member signatures.
//!
//! [`EnhancementScope`] wraps a [`UseSiteScope`] and, on first lookup of a member, produces an
//! [`EnhancedMember`] whose every type position carries a resolved [`javelin_model::Nullability`].
//! Resolution combines, in order of priority:
//!
//! 1. well-known corrections for standard-library signatures ([`predefined_enhancement`]),
//! 2. nullability annotations on the member and its types ([`AnnotationQualifierResolver`]),
//! 3. the agreement of every member it overrides ([`OverrideResolver`]),
//! 4. default qualifiers inherited from the package and enclosing classes ([`QualifierContext`]),
//!    then a per-variance fallback.

#![forbid(unsafe_code)]

mod cache;
mod context;
mod descriptor;
mod error;
mod member;
mod overrides;
mod predefined;
mod qualifiers;
mod scope;
mod signature;

pub use crate::cache::{CacheState, EnhancementCache};
pub use crate::context::QualifierContext;
pub use crate::descriptor::SignatureDescriptorBuilder;
pub use crate::error::{EnhancementError, MemberOrigin, Result};
pub use crate::member::{
    EnhancedField, EnhancedFunction, EnhancedMember, EnhancedMemberKind, EnhancedParameter,
};
pub use crate::overrides::OverrideResolver;
pub use crate::predefined::{
    predefined_enhancement, predefined_signatures, PredefinedEnhancementInfo, TypeEnhancementInfo,
};
pub use crate::qualifiers::{
    AnnotationQualifierResolver, Jsr305State, NullabilityQualifier, QualifierApplicability,
};
pub use crate::scope::{
    ClassUseSiteScope, EnhancementScope, MemberScope, SupertypesScope, UseSiteScope,
};
pub use crate::signature::{
    NullabilitySource, OverriddenPosition, ResolvedType, SignatureEnhancer, SignatureParts,
    TypeInSignature,
};
