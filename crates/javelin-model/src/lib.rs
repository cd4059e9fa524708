//! Foreign (Java) declaration model consumed by the enhancement pass.
//!
//! Declarations live in a [`DeclarationStore`] arena and are addressed by [`ClassId`] /
//! [`MemberId`]. Nothing in here knows about nullability inference; types only carry the raw
//! annotations they were loaded with (plus an already-resolved nullability for members declared
//! natively).

#![forbid(unsafe_code)]

mod annotation;
mod class;
mod descriptor;
mod error;
mod ids;
mod loader;
mod member;
mod name;
mod store;
mod subtyping;
mod types;

pub use crate::annotation::{Annotation, AnnotationValue};
pub use crate::class::{ClassDecl, ClassKind, ForeignClass};
pub use crate::descriptor::{parse_return_signature, parse_type_signature};
pub use crate::error::{InheritanceCycle, LoadError, Result};
pub use crate::ids::{ClassId, MemberId};
pub use crate::loader::{load_declarations, load_declarations_from_path};
pub use crate::member::{
    DeclarationOrigin, MemberDecl, RawField, RawMember, RawMemberKind, RawMethod, TypeParam,
    ValueParameter,
};
pub use crate::name::{internal_name, package_of, Name};
pub use crate::store::DeclarationStore;
pub use crate::subtyping::{erase, is_subtype, substitute, TypeParamScope};
pub use crate::types::{
    ClassType, JavaType, Mutability, Nullability, PrimitiveType, TypeArgument, TypeRef,
    WildcardBound,
};
