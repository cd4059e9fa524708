use serde::{Deserialize, Serialize};

use crate::Name;

/// An annotation as read from a foreign declaration: its binary class name plus the element
/// values that were present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    pub name: Name,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<(Name, AnnotationValue)>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationValue {
    Boolean(bool),
    Int(i64),
    String(String),
    Enum { type_name: Name, constant: Name },
    Class(Name),
    Annotation(Box<Annotation>),
    Array(Vec<AnnotationValue>),
}

impl Annotation {
    pub fn new(name: impl Into<Name>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<Name>, value: AnnotationValue) -> Self {
        self.arguments.push((name.into(), value));
        self
    }

    pub fn is(&self, name: &str) -> bool {
        self.name == name
    }

    pub fn argument(&self, name: &str) -> Option<&AnnotationValue> {
        self.arguments
            .iter()
            .find(|(arg, _)| arg == name)
            .map(|(_, value)| value)
    }

    /// Enum constant names of argument `name`, flattening a single value and an array alike.
    pub fn enum_arguments(&self, name: &str) -> Vec<&Name> {
        fn collect<'a>(value: &'a AnnotationValue, out: &mut Vec<&'a Name>) {
            match value {
                AnnotationValue::Enum { constant, .. } => out.push(constant),
                AnnotationValue::Array(values) => {
                    for value in values {
                        collect(value, out);
                    }
                }
                _ => {}
            }
        }

        let mut out = Vec::new();
        if let Some(value) = self.argument(name) {
            collect(value, &mut out);
        }
        out
    }
}

impl AnnotationValue {
    pub fn enum_constant(type_name: impl Into<Name>, constant: impl Into<Name>) -> Self {
        AnnotationValue::Enum {
            type_name: type_name.into(),
            constant: constant.into(),
        }
    }
}
