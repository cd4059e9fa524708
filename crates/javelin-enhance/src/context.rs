use std::collections::BTreeMap;
use std::sync::Arc;

use javelin_model::Annotation;

use crate::qualifiers::{AnnotationQualifierResolver, NullabilityQualifier, QualifierApplicability};

/// Default nullability qualifiers in effect at some declaration level.
///
/// Contexts form a chain (package, outer classes, class, member, parameter, type). Each level is
/// derived from its parent with [`QualifierContext::merge`] and never mutated afterwards, so a
/// context can be shared freely between the positions that see it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QualifierContext {
    defaults: Arc<BTreeMap<QualifierApplicability, NullabilityQualifier>>,
}

impl QualifierContext {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Layer the default qualifiers declared by `annotations` over this context.
    ///
    /// A new default replaces the parent's for the applicabilities it lists; the others fall
    /// through. Annotations that declare no default are ignored, and when none does the parent is
    /// returned as is.
    pub fn merge<'b>(
        &self,
        resolver: &AnnotationQualifierResolver<'_>,
        annotations: impl IntoIterator<Item = &'b Annotation>,
    ) -> QualifierContext {
        let mut merged: Option<BTreeMap<_, _>> = None;
        for annotation in annotations {
            let Some((qualifier, applicabilities)) = resolver.default_qualifiers(annotation) else {
                continue;
            };
            let defaults = merged.get_or_insert_with(|| (*self.defaults).clone());
            for applicability in applicabilities {
                defaults.insert(applicability, qualifier);
            }
        }

        match merged {
            Some(defaults) => QualifierContext {
                defaults: Arc::new(defaults),
            },
            None => self.clone(),
        }
    }

    /// Default for `applicability`, falling back to the `TYPE_USE` default.
    pub fn default_for(&self, applicability: QualifierApplicability) -> Option<NullabilityQualifier> {
        self.defaults
            .get(&applicability)
            .or_else(|| self.defaults.get(&QualifierApplicability::TypeUse))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.defaults.is_empty()
    }

    /// Whether both contexts are the same snapshot (not merely equal).
    pub fn ptr_eq(&self, other: &QualifierContext) -> bool {
        Arc::ptr_eq(&self.defaults, &other.defaults)
    }
}
