use serde::{Deserialize, Serialize};

use crate::{Annotation, ClassId, ClassType, MemberId, Name, TypeArgument, TypeParam};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ForeignClass {
    pub id: ClassId,
    /// Binary name (`java.util.Map$Entry`).
    pub name: Name,
    pub kind: ClassKind,
    pub type_params: Vec<TypeParam>,
    /// Supertypes keep the type arguments they are instantiated with (`extends Box<String>`).
    pub super_class: Option<ClassType>,
    pub interfaces: Vec<ClassType>,
    pub annotations: Vec<Annotation>,
    pub outer: Option<ClassId>,
    pub members: Vec<MemberId>,
}

impl ForeignClass {
    /// Superclass first, then interfaces in declaration order.
    pub fn direct_supertypes(&self) -> impl Iterator<Item = &ClassType> {
        self.super_class.iter().chain(self.interfaces.iter())
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.iter().any(|ann| ann.is(name))
    }

    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|ann| ann.is(name))
    }
}

/// A class before it is registered in a [`crate::DeclarationStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: Name,
    pub kind: ClassKind,
    pub type_params: Vec<TypeParam>,
    pub super_class: Option<ClassType>,
    pub interfaces: Vec<ClassType>,
    pub annotations: Vec<Annotation>,
    pub outer: Option<ClassId>,
}

impl ClassDecl {
    pub fn new(name: impl Into<Name>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_params: Vec::new(),
            super_class: None,
            interfaces: Vec::new(),
            annotations: Vec::new(),
            outer: None,
        }
    }

    pub fn class(name: impl Into<Name>) -> Self {
        Self::new(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<Name>) -> Self {
        Self::new(name, ClassKind::Interface)
    }

    pub fn annotation_class(name: impl Into<Name>) -> Self {
        Self::new(name, ClassKind::Annotation)
    }

    pub fn extends(self, super_class: impl Into<Name>) -> Self {
        self.extends_generic(super_class, Vec::new())
    }

    /// `extends Name<args...>`.
    pub fn extends_generic(
        mut self,
        super_class: impl Into<Name>,
        args: Vec<TypeArgument>,
    ) -> Self {
        self.super_class = Some(ClassType {
            name: super_class.into(),
            args,
        });
        self
    }

    pub fn implements(self, interface: impl Into<Name>) -> Self {
        self.implements_generic(interface, Vec::new())
    }

    pub fn implements_generic(
        mut self,
        interface: impl Into<Name>,
        args: Vec<TypeArgument>,
    ) -> Self {
        self.interfaces.push(ClassType {
            name: interface.into(),
            args,
        });
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_type_param(mut self, param: TypeParam) -> Self {
        self.type_params.push(param);
        self
    }

    pub fn nested_in(mut self, outer: ClassId) -> Self {
        self.outer = Some(outer);
        self
    }
}
