use std::collections::BTreeMap;

use javelin_config::{EnhancementConfig, ReportLevel};
use javelin_model::{Annotation, DeclarationStore, Mutability, Name, Nullability};
use serde::Serialize;

/// Which declarations a default qualifier applies to (`ElementType` of `@TypeQualifierDefault`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualifierApplicability {
    MethodReturnType,
    ValueParameter,
    Field,
    TypeUse,
}

impl QualifierApplicability {
    fn from_element_type(constant: &str) -> Option<Self> {
        match constant {
            "METHOD" => Some(QualifierApplicability::MethodReturnType),
            "PARAMETER" => Some(QualifierApplicability::ValueParameter),
            "FIELD" => Some(QualifierApplicability::Field),
            "TYPE_USE" => Some(QualifierApplicability::TypeUse),
            _ => None,
        }
    }
}

/// A nullability read from annotations.
///
/// Warning-only qualifiers come from JSR-305 annotations at report level `warn`: they are
/// reported alongside the enhanced type but never decide it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NullabilityQualifier {
    pub nullability: Nullability,
    pub is_warning: bool,
}

impl NullabilityQualifier {
    pub fn new(nullability: Nullability) -> Self {
        Self {
            nullability,
            is_warning: false,
        }
    }

    pub fn warning(nullability: Nullability) -> Self {
        Self {
            nullability,
            is_warning: true,
        }
    }

    fn at_level(nullability: Nullability, level: ReportLevel) -> Option<Self> {
        match level {
            ReportLevel::Ignore => None,
            ReportLevel::Warn => Some(Self::warning(nullability)),
            ReportLevel::Strict => Some(Self::new(nullability)),
        }
    }
}

/// How JSR-305 annotations are honored, derived from [`EnhancementConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Jsr305State {
    /// `false` turns off every annotation, JSR-305 or not.
    pub enabled: bool,
    pub global: ReportLevel,
    pub migration: Option<ReportLevel>,
    pub user: BTreeMap<Name, ReportLevel>,
}

impl Jsr305State {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            global: ReportLevel::Ignore,
            migration: None,
            user: BTreeMap::new(),
        }
    }

    pub fn from_config(config: &EnhancementConfig) -> Self {
        if !config.is_enabled() {
            return Self::disabled();
        }
        Self {
            enabled: true,
            global: config.jsr305,
            migration: config.jsr305_migration,
            user: config
                .jsr305_user
                .iter()
                .map(|(name, level)| (Name::from(name.as_str()), *level))
                .collect(),
        }
    }
}

const NULLABLE_ANNOTATIONS: &[&str] = &[
    "org.jetbrains.annotations.Nullable",
    "androidx.annotation.Nullable",
    "androidx.annotation.RecentlyNullable",
    "android.support.annotation.Nullable",
    "android.annotation.Nullable",
    "com.android.annotations.Nullable",
    "org.eclipse.jdt.annotation.Nullable",
    "org.checkerframework.checker.nullness.qual.Nullable",
    "org.checkerframework.checker.nullness.compatqual.NullableDecl",
    "edu.umd.cs.findbugs.annotations.CheckForNull",
    "edu.umd.cs.findbugs.annotations.Nullable",
    "edu.umd.cs.findbugs.annotations.PossiblyNull",
    "io.reactivex.annotations.Nullable",
    "io.reactivex.rxjava3.annotations.Nullable",
    "org.springframework.lang.Nullable",
];

const NOT_NULL_ANNOTATIONS: &[&str] = &[
    "org.jetbrains.annotations.NotNull",
    "androidx.annotation.NonNull",
    "androidx.annotation.RecentlyNonNull",
    "android.support.annotation.NonNull",
    "android.annotation.NonNull",
    "com.android.annotations.NonNull",
    "org.eclipse.jdt.annotation.NonNull",
    "org.checkerframework.checker.nullness.qual.NonNull",
    "org.checkerframework.checker.nullness.compatqual.NonNullDecl",
    "edu.umd.cs.findbugs.annotations.NonNull",
    "lombok.NonNull",
    "io.reactivex.annotations.NonNull",
    "io.reactivex.rxjava3.annotations.NonNull",
    "org.springframework.lang.NonNull",
];

const READ_ONLY_ANNOTATIONS: &[&str] = &[
    "org.jetbrains.annotations.ReadOnly",
    "kotlin.annotations.jvm.ReadOnly",
];

const MUTABLE_ANNOTATIONS: &[&str] = &[
    "org.jetbrains.annotations.Mutable",
    "kotlin.annotations.jvm.Mutable",
];

const JSR305_NONNULL: &str = "javax.annotation.Nonnull";
const JSR305_CHECK_FOR_NULL: &str = "javax.annotation.CheckForNull";
const JSR305_NULLABLE: &str = "javax.annotation.Nullable";
const TYPE_QUALIFIER_NICKNAME: &str = "javax.annotation.meta.TypeQualifierNickname";
const TYPE_QUALIFIER_DEFAULT: &str = "javax.annotation.meta.TypeQualifierDefault";
const PARAMETERS_ARE_NONNULL_BY_DEFAULT: &str = "javax.annotation.ParametersAreNonnullByDefault";
const PARAMETERS_ARE_NULLABLE_BY_DEFAULT: &str = "javax.annotation.ParametersAreNullableByDefault";
const SPRING_NON_NULL_API: &str = "org.springframework.lang.NonNullApi";
const SPRING_NON_NULL_FIELDS: &str = "org.springframework.lang.NonNullFields";
const UNDER_MIGRATION: &str = "kotlin.annotations.jvm.UnderMigration";

/// Reads nullability and mutability qualifiers off annotations.
///
/// Well-known annotation families (JetBrains, AndroidX, Checker Framework, ...) apply whenever
/// enhancement is enabled. JSR-305 annotations, their nicknames and type-qualifier defaults go
/// through the report level of the annotation class: user-defined level first, then the
/// migration level for `@UnderMigration` classes, then the global level.
#[derive(Debug, Clone)]
pub struct AnnotationQualifierResolver<'a> {
    store: &'a DeclarationStore,
    state: Jsr305State,
}

impl<'a> AnnotationQualifierResolver<'a> {
    pub fn new(store: &'a DeclarationStore, config: &EnhancementConfig) -> Self {
        Self::with_state(store, Jsr305State::from_config(config))
    }

    pub fn with_state(store: &'a DeclarationStore, state: Jsr305State) -> Self {
        Self { store, state }
    }

    pub fn state(&self) -> &Jsr305State {
        &self.state
    }

    pub fn is_disabled(&self) -> bool {
        !self.state.enabled
    }

    /// Effective report level of a JSR-305 style annotation class.
    pub fn report_level(&self, annotation: &str) -> ReportLevel {
        if let Some(level) = self.state.user.get(annotation) {
            return *level;
        }
        self.migration_level(annotation)
            .unwrap_or(self.state.global)
    }

    fn migration_level(&self, annotation: &str) -> Option<ReportLevel> {
        let class = self.store.class_by_name(annotation)?;
        let marker = class.annotation(UNDER_MIGRATION)?;
        if let Some(level) = self.state.migration {
            return Some(level);
        }
        let status = marker.enum_arguments("status");
        match status.first().map(|status| status.as_str()) {
            Some("STRICT") => Some(ReportLevel::Strict),
            Some("WARN") => Some(ReportLevel::Warn),
            Some("IGNORE") => Some(ReportLevel::Ignore),
            _ => None,
        }
    }

    pub fn nullability(&self, annotation: &Annotation) -> Option<NullabilityQualifier> {
        if self.is_disabled() {
            return None;
        }
        let name = annotation.name.as_str();
        if NULLABLE_ANNOTATIONS.contains(&name) {
            return Some(NullabilityQualifier::new(Nullability::Nullable));
        }
        if NOT_NULL_ANNOTATIONS.contains(&name) {
            return Some(NullabilityQualifier::new(Nullability::NotNull));
        }
        let nullability = self.jsr305_nullability(annotation)?;
        NullabilityQualifier::at_level(nullability, self.report_level(name))
    }

    /// JSR-305 qualifier carried by `annotation`, directly or as a type qualifier nickname.
    fn jsr305_nullability(&self, annotation: &Annotation) -> Option<Nullability> {
        if let Some(nullability) = jsr305_qualifier(annotation) {
            return Some(nullability);
        }
        let class = self.store.class_by_name(annotation.name.as_str())?;
        if !class.has_annotation(TYPE_QUALIFIER_NICKNAME) {
            return None;
        }
        class.annotations.iter().find_map(jsr305_qualifier)
    }

    pub fn mutability(&self, annotation: &Annotation) -> Option<Mutability> {
        if self.is_disabled() {
            return None;
        }
        let name = annotation.name.as_str();
        if READ_ONLY_ANNOTATIONS.contains(&name) {
            Some(Mutability::ReadOnly)
        } else if MUTABLE_ANNOTATIONS.contains(&name) {
            Some(Mutability::Mutable)
        } else {
            None
        }
    }

    /// The default qualifier `annotation` establishes and the declarations it applies to.
    pub fn default_qualifiers(
        &self,
        annotation: &Annotation,
    ) -> Option<(NullabilityQualifier, Vec<QualifierApplicability>)> {
        if self.is_disabled() {
            return None;
        }
        let name = annotation.name.as_str();
        let (nullability, applicabilities) = match name {
            PARAMETERS_ARE_NONNULL_BY_DEFAULT => (
                Nullability::NotNull,
                vec![QualifierApplicability::ValueParameter],
            ),
            PARAMETERS_ARE_NULLABLE_BY_DEFAULT => (
                Nullability::Nullable,
                vec![QualifierApplicability::ValueParameter],
            ),
            _ => self
                .type_qualifier_default(annotation)
                .or_else(|| spring_default(name))?,
        };
        let qualifier = NullabilityQualifier::at_level(nullability, self.report_level(name))?;
        Some((qualifier, applicabilities))
    }

    fn type_qualifier_default(
        &self,
        annotation: &Annotation,
    ) -> Option<(Nullability, Vec<QualifierApplicability>)> {
        let class = self.store.class_by_name(annotation.name.as_str())?;
        let default = class.annotation(TYPE_QUALIFIER_DEFAULT)?;
        let applicabilities: Vec<_> = default
            .enum_arguments("value")
            .into_iter()
            .filter_map(|element_type| QualifierApplicability::from_element_type(element_type.as_str()))
            .collect();
        if applicabilities.is_empty() {
            return None;
        }
        let nullability = class
            .annotations
            .iter()
            .find_map(|meta| self.jsr305_nullability(meta))?;
        Some((nullability, applicabilities))
    }

    /// Combined nullability of a group of annotations on the same position.
    ///
    /// Strict qualifiers win over warning-only ones; within either group, disagreeing
    /// qualifiers cancel each other.
    pub fn extract_nullability<'b>(
        &self,
        annotations: impl IntoIterator<Item = &'b Annotation>,
    ) -> Option<NullabilityQualifier> {
        let mut strict = Agreement::Empty;
        let mut warning = Agreement::Empty;
        for qualifier in annotations
            .into_iter()
            .filter_map(|annotation| self.nullability(annotation))
        {
            if qualifier.is_warning {
                warning.add(qualifier.nullability);
            } else {
                strict.add(qualifier.nullability);
            }
        }
        match strict {
            Agreement::One(nullability) => Some(NullabilityQualifier::new(nullability)),
            Agreement::Conflict => None,
            Agreement::Empty => warning.single().map(NullabilityQualifier::warning),
        }
    }

    pub fn extract_mutability<'b>(
        &self,
        annotations: impl IntoIterator<Item = &'b Annotation>,
    ) -> Option<Mutability> {
        let mut agreement = Agreement::Empty;
        for mutability in annotations
            .into_iter()
            .filter_map(|annotation| self.mutability(annotation))
        {
            agreement.add(mutability);
        }
        agreement.single()
    }
}

fn jsr305_qualifier(annotation: &Annotation) -> Option<Nullability> {
    match annotation.name.as_str() {
        JSR305_NONNULL => {
            let when = annotation.enum_arguments("when");
            match when.first().map(|constant| constant.as_str()) {
                None | Some("ALWAYS") => Some(Nullability::NotNull),
                Some("MAYBE") | Some("NEVER") => Some(Nullability::Nullable),
                Some("UNKNOWN") => Some(Nullability::Flexible),
                Some(_) => None,
            }
        }
        JSR305_CHECK_FOR_NULL | JSR305_NULLABLE => Some(Nullability::Nullable),
        _ => None,
    }
}

fn spring_default(name: &str) -> Option<(Nullability, Vec<QualifierApplicability>)> {
    match name {
        SPRING_NON_NULL_API => Some((
            Nullability::NotNull,
            vec![
                QualifierApplicability::MethodReturnType,
                QualifierApplicability::ValueParameter,
            ],
        )),
        SPRING_NON_NULL_FIELDS => Some((Nullability::NotNull, vec![QualifierApplicability::Field])),
        _ => None,
    }
}

/// Whether a set of values agrees on a single one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Agreement<T> {
    Empty,
    One(T),
    Conflict,
}

impl<T: PartialEq + Copy> Agreement<T> {
    pub(crate) fn add(&mut self, value: T) {
        *self = match *self {
            Agreement::Empty => Agreement::One(value),
            Agreement::One(current) if current == value => Agreement::One(current),
            Agreement::One(_) | Agreement::Conflict => Agreement::Conflict,
        };
    }

    pub(crate) fn single(self) -> Option<T> {
        match self {
            Agreement::One(value) => Some(value),
            Agreement::Empty | Agreement::Conflict => None,
        }
    }
}
