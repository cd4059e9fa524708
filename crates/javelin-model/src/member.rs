use serde::{Deserialize, Serialize};

use crate::{Annotation, ClassId, JavaType, MemberId, Name, TypeRef};

/// Where a member's declaration came from.
///
/// Only `Foreign` members are subject to enhancement. `Native` members can still show up in
/// supertype scopes (a Java class may extend a natively declared one); their type refs carry
/// resolved nullability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeclarationOrigin {
    #[default]
    Foreign,
    Native,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParam {
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bounds: Vec<JavaType>,
}

impl TypeParam {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<Name>, bound: JavaType) -> Self {
        Self {
            name: name.into(),
            bounds: vec![bound],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueParameter {
    pub name: Option<Name>,
    pub ty: TypeRef,
    pub annotations: Vec<Annotation>,
    pub is_varargs: bool,
}

impl ValueParameter {
    pub fn new(ty: impl Into<TypeRef>) -> Self {
        Self {
            name: None,
            ty: ty.into(),
            annotations: Vec::new(),
            is_varargs: false,
        }
    }

    pub fn named(mut self, name: impl Into<Name>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawField {
    pub ty: TypeRef,
    pub is_static: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMethod {
    pub type_params: Vec<TypeParam>,
    pub receiver: Option<TypeRef>,
    pub params: Vec<ValueParameter>,
    pub return_type: TypeRef,
    pub is_static: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RawMemberKind {
    Field(RawField),
    Method(RawMethod),
}

/// A member exactly as the foreign-declaration loader produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMember {
    pub id: MemberId,
    pub owner: ClassId,
    pub name: Name,
    pub origin: DeclarationOrigin,
    pub annotations: Vec<Annotation>,
    pub kind: RawMemberKind,
}

impl RawMember {
    pub fn as_field(&self) -> Option<&RawField> {
        match &self.kind {
            RawMemberKind::Field(field) => Some(field),
            RawMemberKind::Method(_) => None,
        }
    }

    pub fn as_method(&self) -> Option<&RawMethod> {
        match &self.kind {
            RawMemberKind::Method(method) => Some(method),
            RawMemberKind::Field(_) => None,
        }
    }

    pub fn is_foreign(&self) -> bool {
        self.origin == DeclarationOrigin::Foreign
    }

    pub fn is_static(&self) -> bool {
        match &self.kind {
            RawMemberKind::Field(field) => field.is_static,
            RawMemberKind::Method(method) => method.is_static,
        }
    }

    /// Human readable shape, used in diagnostics ("foreign method", "native field", ...).
    pub fn shape(&self) -> &'static str {
        match (self.origin, &self.kind) {
            (DeclarationOrigin::Foreign, RawMemberKind::Field(_)) => "foreign field",
            (DeclarationOrigin::Foreign, RawMemberKind::Method(_)) => "foreign method",
            (DeclarationOrigin::Native, RawMemberKind::Field(_)) => "native field",
            (DeclarationOrigin::Native, RawMemberKind::Method(_)) => "native method",
        }
    }
}

/// A member before it is registered in a [`crate::DeclarationStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDecl {
    pub name: Name,
    pub origin: DeclarationOrigin,
    pub annotations: Vec<Annotation>,
    pub kind: RawMemberKind,
}

impl MemberDecl {
    pub fn field(name: impl Into<Name>, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            origin: DeclarationOrigin::Foreign,
            annotations: Vec::new(),
            kind: RawMemberKind::Field(RawField {
                ty: ty.into(),
                is_static: false,
                is_final: false,
            }),
        }
    }

    pub fn method(
        name: impl Into<Name>,
        params: Vec<ValueParameter>,
        return_type: impl Into<TypeRef>,
    ) -> Self {
        Self {
            name: name.into(),
            origin: DeclarationOrigin::Foreign,
            annotations: Vec::new(),
            kind: RawMemberKind::Method(RawMethod {
                type_params: Vec::new(),
                receiver: None,
                params,
                return_type: return_type.into(),
                is_static: false,
                is_abstract: false,
            }),
        }
    }

    pub fn native(mut self) -> Self {
        self.origin = DeclarationOrigin::Native;
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        match &mut self.kind {
            RawMemberKind::Field(field) => field.is_static = is_static,
            RawMemberKind::Method(method) => method.is_static = is_static,
        }
        self
    }

    /// Adds a method type parameter; no-op for fields.
    pub fn with_type_param(mut self, param: TypeParam) -> Self {
        if let RawMemberKind::Method(method) = &mut self.kind {
            method.type_params.push(param);
        }
        self
    }

    /// Sets an extension receiver; no-op for fields.
    pub fn with_receiver(mut self, receiver: impl Into<TypeRef>) -> Self {
        if let RawMemberKind::Method(method) = &mut self.kind {
            method.receiver = Some(receiver.into());
        }
        self
    }
}
