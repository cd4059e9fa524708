use std::fmt;

use javelin_config::{DefaultNullability, FallbackConfig};
use javelin_model::{Annotation, JavaType, Mutability, Nullability, RawMember, RawMemberKind, TypeRef};
use serde::Serialize;

use crate::context::QualifierContext;
use crate::predefined::TypeEnhancementInfo;
use crate::qualifiers::{AnnotationQualifierResolver, NullabilityQualifier, QualifierApplicability, Agreement};

/// A type position inside a member signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeInSignature {
    /// Method return type, or the type of a field.
    Return,
    Receiver,
    ValueParameter(usize),
}

impl TypeInSignature {
    pub fn type_ref(self, member: &RawMember) -> Option<&TypeRef> {
        match (self, &member.kind) {
            (TypeInSignature::Return, RawMemberKind::Field(field)) => Some(&field.ty),
            (TypeInSignature::Return, RawMemberKind::Method(method)) => Some(&method.return_type),
            (TypeInSignature::Receiver, RawMemberKind::Method(method)) => method.receiver.as_ref(),
            (TypeInSignature::ValueParameter(index), RawMemberKind::Method(method)) => {
                method.params.get(index).map(|param| &param.ty)
            }
            (TypeInSignature::Receiver | TypeInSignature::ValueParameter(_), RawMemberKind::Field(_)) => None,
        }
    }

    /// Annotations of the declaration that owns the position: the member itself, or the value
    /// parameter.
    pub fn container_annotations(self, member: &RawMember) -> &[Annotation] {
        match (self, &member.kind) {
            (TypeInSignature::ValueParameter(index), RawMemberKind::Method(method)) => method
                .params
                .get(index)
                .map(|param| param.annotations.as_slice())
                .unwrap_or_default(),
            _ => &member.annotations,
        }
    }

    /// Return positions are read by callers (covariant); receivers and parameters are written.
    pub fn is_covariant(self) -> bool {
        matches!(self, TypeInSignature::Return)
    }

    pub fn applicability(self, member: &RawMember) -> QualifierApplicability {
        match (self, &member.kind) {
            (TypeInSignature::Return, RawMemberKind::Field(_)) => QualifierApplicability::Field,
            (TypeInSignature::Return, RawMemberKind::Method(_)) => {
                QualifierApplicability::MethodReturnType
            }
            (TypeInSignature::Receiver | TypeInSignature::ValueParameter(_), _) => {
                QualifierApplicability::ValueParameter
            }
        }
    }
}

impl fmt::Display for TypeInSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeInSignature::Return => f.write_str("return type"),
            TypeInSignature::Receiver => f.write_str("receiver"),
            TypeInSignature::ValueParameter(index) => write!(f, "parameter #{index}"),
        }
    }
}

/// What decided a position's nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NullabilitySource {
    /// Primitives and `void` cannot be null.
    Primitive,
    Predefined,
    Annotation,
    Overridden,
    ContextDefault,
    Fallback,
}

impl fmt::Display for NullabilitySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NullabilitySource::Primitive => "primitive",
            NullabilitySource::Predefined => "predefined",
            NullabilitySource::Annotation => "annotation",
            NullabilitySource::Overridden => "overridden",
            NullabilitySource::ContextDefault => "context default",
            NullabilitySource::Fallback => "fallback",
        })
    }
}

/// A fully resolved type position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedType {
    pub ty: JavaType,
    pub nullability: Nullability,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mutability: Option<Mutability>,
    pub source: NullabilitySource,
    /// Nullability claimed by annotations that are only reported (JSR-305 at level `warn`) and
    /// that disagrees with or was not used for `nullability`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<Nullability>,
}

impl fmt::Display for ResolvedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mutability {
            Some(Mutability::ReadOnly) => f.write_str("@ReadOnly ")?,
            Some(Mutability::Mutable) => f.write_str("@Mutable ")?,
            None => {}
        }
        write!(f, "{}{}", self.ty, self.nullability.suffix())
    }
}

/// The same position in a member the enhanced member overrides.
#[derive(Debug, Clone)]
pub struct OverriddenPosition<'a> {
    pub type_ref: &'a TypeRef,
    /// The overridden member's own enhancement, for foreign members. It carries nullability the
    /// member inherited in turn.
    pub resolved: Option<&'a ResolvedType>,
    pub container_annotations: &'a [Annotation],
    /// Context of the overridden declaration, down to the position itself.
    pub context: QualifierContext,
    pub applicability: QualifierApplicability,
}

/// Everything the enhancer looks at for one type position.
#[derive(Debug, Clone)]
pub struct SignatureParts<'a> {
    pub position: TypeInSignature,
    pub type_ref: &'a TypeRef,
    pub container_annotations: &'a [Annotation],
    pub overridden: Vec<OverriddenPosition<'a>>,
    /// Container context, already merged with the type's own annotations.
    pub context: QualifierContext,
    pub applicability: QualifierApplicability,
    pub predefined: Option<TypeEnhancementInfo>,
}

/// Decides the nullability and mutability of one type position.
#[derive(Debug, Clone)]
pub struct SignatureEnhancer<'r, 'a> {
    resolver: &'r AnnotationQualifierResolver<'a>,
    fallback: FallbackConfig,
}

impl<'r, 'a> SignatureEnhancer<'r, 'a> {
    pub fn new(resolver: &'r AnnotationQualifierResolver<'a>, fallback: FallbackConfig) -> Self {
        Self { resolver, fallback }
    }

    pub fn enhance(&self, parts: &SignatureParts<'_>) -> ResolvedType {
        let ty = parts.type_ref.ty.clone();
        if ty.is_primitive_or_void() {
            return ResolvedType {
                ty,
                nullability: Nullability::NotNull,
                mutability: None,
                source: NullabilitySource::Primitive,
                warning: None,
            };
        }

        let local = self.resolver.extract_nullability(
            parts
                .type_ref
                .annotations
                .iter()
                .chain(parts.container_annotations),
        );
        let mut warning = local.filter(|q| q.is_warning).map(|q| q.nullability);

        let (nullability, source) = if let Some(nullability) =
            parts.predefined.and_then(|info| info.nullability)
        {
            (nullability, NullabilitySource::Predefined)
        } else if let Some(qualifier) = local.filter(|q| !q.is_warning) {
            (qualifier.nullability, NullabilitySource::Annotation)
        } else if let Some(nullability) = self.overridden_nullability(&parts.overridden) {
            (nullability, NullabilitySource::Overridden)
        } else {
            match parts.context.default_for(parts.applicability) {
                Some(NullabilityQualifier {
                    nullability,
                    is_warning: false,
                }) => (nullability, NullabilitySource::ContextDefault),
                Some(NullabilityQualifier {
                    nullability,
                    is_warning: true,
                }) => {
                    warning.get_or_insert(nullability);
                    (self.fallback(parts.position), NullabilitySource::Fallback)
                }
                None => (self.fallback(parts.position), NullabilitySource::Fallback),
            }
        };

        ResolvedType {
            ty,
            nullability,
            mutability: self.mutability(parts),
            source,
            warning: warning.filter(|claimed| *claimed != nullability),
        }
    }

    /// Nullability every overridden position agrees on, if any.
    fn overridden_nullability(&self, overridden: &[OverriddenPosition<'_>]) -> Option<Nullability> {
        if overridden.is_empty() {
            return None;
        }
        let mut agreement = Agreement::Empty;
        for position in overridden {
            agreement.add(self.declared_nullability(position)?);
        }
        agreement.single()
    }

    /// What an overridden position declares: a native type knows its nullability, an enhanced
    /// foreign one counts unless it only fell back, anything else goes by its annotations and
    /// then its context default.
    fn declared_nullability(&self, position: &OverriddenPosition<'_>) -> Option<Nullability> {
        if position.type_ref.ty.is_primitive_or_void() {
            return Some(Nullability::NotNull);
        }
        if let Some(nullability) = position.type_ref.nullability {
            return Some(nullability);
        }
        if let Some(resolved) = position.resolved {
            return (resolved.source != NullabilitySource::Fallback).then_some(resolved.nullability);
        }
        self.resolver
            .extract_nullability(
                position
                    .type_ref
                    .annotations
                    .iter()
                    .chain(position.container_annotations),
            )
            .filter(|qualifier| !qualifier.is_warning)
            .or_else(|| {
                position
                    .context
                    .default_for(position.applicability)
                    .filter(|qualifier| !qualifier.is_warning)
            })
            .map(|qualifier| qualifier.nullability)
    }

    fn mutability(&self, parts: &SignatureParts<'_>) -> Option<Mutability> {
        if let Some(mutability) = parts.predefined.and_then(|info| info.mutability) {
            return Some(mutability);
        }
        if let Some(mutability) = self.resolver.extract_mutability(
            parts
                .type_ref
                .annotations
                .iter()
                .chain(parts.container_annotations),
        ) {
            return Some(mutability);
        }
        if parts.overridden.is_empty() {
            return None;
        }
        let mut agreement = Agreement::Empty;
        for position in &parts.overridden {
            let declared = match position.resolved {
                Some(resolved) => resolved.mutability,
                None => self.resolver.extract_mutability(
                    position
                        .type_ref
                        .annotations
                        .iter()
                        .chain(position.container_annotations),
                ),
            };
            agreement.add(declared?);
        }
        agreement.single()
    }

    fn fallback(&self, position: TypeInSignature) -> Nullability {
        let configured = if position.is_covariant() {
            self.fallback.covariant
        } else {
            self.fallback.invariant
        };
        match configured {
            DefaultNullability::NotNull => Nullability::NotNull,
            DefaultNullability::Nullable => Nullability::Nullable,
            DefaultNullability::Flexible => Nullability::Flexible,
        }
    }
}
