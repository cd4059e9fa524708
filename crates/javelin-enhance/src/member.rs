use std::fmt;

use javelin_model::{Annotation, ClassId, MemberId, Name, TypeParam};
use serde::Serialize;

use crate::signature::{ResolvedType, TypeInSignature};

/// A foreign member with every type position resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnhancedMember {
    pub id: MemberId,
    pub owner: ClassId,
    pub owner_name: Name,
    pub name: Name,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    pub kind: EnhancedMemberKind,
    /// Members of supertypes this member overrides, nearest supertype first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overridden: Vec<MemberId>,
    /// Whether a predefined signature correction applied.
    pub predefined: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancedMemberKind {
    Field(EnhancedField),
    Function(EnhancedFunction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnhancedField {
    pub ty: ResolvedType,
    pub is_static: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnhancedFunction {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_params: Vec<TypeParam>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receiver: Option<ResolvedType>,
    pub params: Vec<EnhancedParameter>,
    pub return_type: ResolvedType,
    pub is_static: bool,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnhancedParameter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    pub ty: ResolvedType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    pub is_varargs: bool,
}

impl EnhancedMember {
    pub fn as_field(&self) -> Option<&EnhancedField> {
        match &self.kind {
            EnhancedMemberKind::Field(field) => Some(field),
            EnhancedMemberKind::Function(_) => None,
        }
    }

    pub fn as_function(&self) -> Option<&EnhancedFunction> {
        match &self.kind {
            EnhancedMemberKind::Function(function) => Some(function),
            EnhancedMemberKind::Field(_) => None,
        }
    }

    pub fn resolved_at(&self, position: TypeInSignature) -> Option<&ResolvedType> {
        match (position, &self.kind) {
            (TypeInSignature::Return, EnhancedMemberKind::Field(field)) => Some(&field.ty),
            (TypeInSignature::Return, EnhancedMemberKind::Function(function)) => {
                Some(&function.return_type)
            }
            (TypeInSignature::Receiver, EnhancedMemberKind::Function(function)) => {
                function.receiver.as_ref()
            }
            (TypeInSignature::ValueParameter(index), EnhancedMemberKind::Function(function)) => {
                function.params.get(index).map(|param| &param.ty)
            }
            (_, EnhancedMemberKind::Field(_)) => None,
        }
    }

    /// Every resolved position, return type (or field type) first.
    pub fn resolved_types(&self) -> Vec<&ResolvedType> {
        match &self.kind {
            EnhancedMemberKind::Field(field) => vec![&field.ty],
            EnhancedMemberKind::Function(function) => std::iter::once(&function.return_type)
                .chain(function.receiver.iter())
                .chain(function.params.iter().map(|param| &param.ty))
                .collect(),
        }
    }
}

/// `name: Type` for fields, `Receiver.name(p: Type, ...): Type` for functions. Nullability is
/// rendered as a suffix (`?` nullable, `!` flexible).
impl fmt::Display for EnhancedMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EnhancedMemberKind::Field(field) => write!(f, "{}: {}", self.name, field.ty),
            EnhancedMemberKind::Function(function) => {
                if let Some(receiver) = &function.receiver {
                    write!(f, "{receiver}.")?;
                }
                write!(f, "{}(", self.name)?;
                for (index, param) in function.params.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    match &param.name {
                        Some(name) => write!(f, "{name}: ")?,
                        None => write!(f, "p{index}: ")?,
                    }
                    if param.is_varargs {
                        f.write_str("vararg ")?;
                    }
                    write!(f, "{}", param.ty)?;
                }
                write!(f, "): {}", function.return_type)
            }
        }
    }
}
