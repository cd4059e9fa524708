use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Annotation, Name};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
}

impl PrimitiveType {
    /// The JVM descriptor letter for this primitive.
    pub fn descriptor_char(self) -> char {
        match self {
            PrimitiveType::Boolean => 'Z',
            PrimitiveType::Byte => 'B',
            PrimitiveType::Char => 'C',
            PrimitiveType::Short => 'S',
            PrimitiveType::Int => 'I',
            PrimitiveType::Long => 'J',
            PrimitiveType::Float => 'F',
            PrimitiveType::Double => 'D',
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Byte => "byte",
            PrimitiveType::Char => "char",
            PrimitiveType::Short => "short",
            PrimitiveType::Int => "int",
            PrimitiveType::Long => "long",
            PrimitiveType::Float => "float",
            PrimitiveType::Double => "double",
        }
    }
}

/// A Java type as it appears in a foreign signature, before any nullability is attached.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JavaType {
    Primitive(PrimitiveType),
    Void,
    Class(ClassType),
    Array(Box<JavaType>),
    TypeVar(Name),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassType {
    /// Binary name, e.g. `java.util.Map$Entry`.
    pub name: Name,
    pub args: Vec<TypeArgument>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeArgument {
    Type(JavaType),
    Wildcard(WildcardBound),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WildcardBound {
    Unbounded,
    Extends(Box<JavaType>),
    Super(Box<JavaType>),
}

impl JavaType {
    pub const OBJECT: &'static str = "java.lang.Object";

    pub fn class(name: impl Into<Name>, args: Vec<TypeArgument>) -> Self {
        JavaType::Class(ClassType {
            name: name.into(),
            args,
        })
    }

    /// A class type without type arguments.
    pub fn named(name: impl Into<Name>) -> Self {
        Self::class(name, Vec::new())
    }

    pub fn object() -> Self {
        Self::named(Self::OBJECT)
    }

    pub fn type_var(name: impl Into<Name>) -> Self {
        JavaType::TypeVar(name.into())
    }

    pub fn array(component: JavaType) -> Self {
        JavaType::Array(Box::new(component))
    }

    /// Primitives and `void` cannot hold `null`, so they never receive a nullability choice.
    pub fn is_primitive_or_void(&self) -> bool {
        matches!(self, JavaType::Primitive(_) | JavaType::Void)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, JavaType::Void)
    }

    pub fn class_name(&self) -> Option<&Name> {
        match self {
            JavaType::Class(ClassType { name, .. }) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for JavaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JavaType::Primitive(p) => f.write_str(p.keyword()),
            JavaType::Void => f.write_str("void"),
            JavaType::Class(ClassType { name, args }) => {
                f.write_str(name.as_str())?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (idx, arg) in args.iter().enumerate() {
                        if idx > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            JavaType::Array(component) => write!(f, "{component}[]"),
            JavaType::TypeVar(name) => f.write_str(name.as_str()),
        }
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Type(ty) => write!(f, "{ty}"),
            TypeArgument::Wildcard(WildcardBound::Unbounded) => f.write_str("?"),
            TypeArgument::Wildcard(WildcardBound::Extends(bound)) => {
                write!(f, "? extends {bound}")
            }
            TypeArgument::Wildcard(WildcardBound::Super(bound)) => write!(f, "? super {bound}"),
        }
    }
}

/// Nullability attached to a resolved type.
///
/// `Flexible` is the platform marker: the type may be used both as nullable and as not-null by
/// native callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Nullability {
    NotNull,
    Nullable,
    Flexible,
}

impl Nullability {
    /// Suffix used when rendering a resolved type (`String`, `String?`, `String!`).
    pub fn suffix(self) -> &'static str {
        match self {
            Nullability::NotNull => "",
            Nullability::Nullable => "?",
            Nullability::Flexible => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mutability {
    ReadOnly,
    Mutable,
}

/// A type position in a raw signature: the type plus the type-use annotations found on it.
///
/// Members declared natively (origin [`crate::DeclarationOrigin::Native`]) already know their
/// nullability; foreign members leave `nullability` empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRef {
    pub ty: JavaType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nullability: Option<Nullability>,
}

impl TypeRef {
    pub fn new(ty: JavaType) -> Self {
        Self {
            ty,
            annotations: Vec::new(),
            nullability: None,
        }
    }

    pub fn resolved(ty: JavaType, nullability: Nullability) -> Self {
        Self {
            ty,
            annotations: Vec::new(),
            nullability: Some(nullability),
        }
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

impl From<JavaType> for TypeRef {
    fn from(ty: JavaType) -> Self {
        Self::new(ty)
    }
}
