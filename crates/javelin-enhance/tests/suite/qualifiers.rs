use javelin_config::{EnhancementConfig, ReportLevel};
use javelin_enhance::NullabilitySource;
use javelin_model::{
    Annotation, AnnotationValue, ClassDecl, DeclarationStore, JavaType, MemberDecl, Mutability,
    Nullability, TypeRef, ValueParameter,
};
use pretty_assertions::assert_eq;

use super::fixtures::{scope, string, string_param};

const NONNULL_BY_DEFAULT: &str = "javax.annotation.ParametersAreNonnullByDefault";

fn package_default_store() -> DeclarationStore {
    let mut store = DeclarationStore::new();
    store.set_package_annotations("com.acme", vec![Annotation::new(NONNULL_BY_DEFAULT)]);
    let owner = store.add_class(ClassDecl::class("com.acme.Service"));
    store.add_member(
        owner,
        MemberDecl::method("submit", vec![string_param("job")], string()),
    );
    store
}

#[test]
fn package_defaults_apply_at_strict_level() {
    let store = package_default_store();
    let owner = store.lookup_class("com.acme.Service").unwrap();

    let scope = scope(&store, owner, &EnhancementConfig::strict());
    let submit = &scope.functions_by_name("submit").unwrap()[0];
    let function = submit.as_function().unwrap();

    assert_eq!(function.params[0].ty.nullability, Nullability::NotNull);
    assert_eq!(function.params[0].ty.source, NullabilitySource::ContextDefault);
    // The default only covers parameters.
    assert_eq!(function.return_type.nullability, Nullability::Flexible);
}

#[test]
fn package_defaults_only_warn_at_warn_level() {
    let store = package_default_store();
    let owner = store.lookup_class("com.acme.Service").unwrap();

    let scope = scope(&store, owner, &EnhancementConfig::default());
    let submit = &scope.functions_by_name("submit").unwrap()[0];
    let param = &submit.as_function().unwrap().params[0];

    assert_eq!(param.ty.nullability, Nullability::Nullable);
    assert_eq!(param.ty.source, NullabilitySource::Fallback);
    assert_eq!(param.ty.warning, Some(Nullability::NotNull));
}

#[test]
fn type_qualifier_nicknames_act_as_their_qualifier() {
    let mut store = DeclarationStore::new();
    store.add_class(
        ClassDecl::annotation_class("com.acme.Required")
            .annotated(Annotation::new("javax.annotation.meta.TypeQualifierNickname"))
            .annotated(Annotation::new("javax.annotation.Nonnull")),
    );
    let owner = store.add_class(ClassDecl::class("com.acme.Form"));
    store.add_member(
        owner,
        MemberDecl::field("title", string()).annotated(Annotation::new("com.acme.Required")),
    );

    let mut config = EnhancementConfig::default();
    config
        .jsr305_user
        .insert("com.acme.Required".to_owned(), ReportLevel::Strict);

    let scope = scope(&store, owner, &config);
    let title = &scope.fields_by_name("title").unwrap()[0];
    let ty = &title.as_field().unwrap().ty;
    assert_eq!(ty.nullability, Nullability::NotNull);
    assert_eq!(ty.source, NullabilitySource::Annotation);
}

#[test]
fn under_migration_status_sets_the_level_unless_configured() {
    let mut store = DeclarationStore::new();
    store.add_class(
        ClassDecl::annotation_class("com.acme.Maybe")
            .annotated(Annotation::new("javax.annotation.meta.TypeQualifierNickname"))
            .annotated(Annotation::new("javax.annotation.CheckForNull"))
            .annotated(
                Annotation::new("kotlin.annotations.jvm.UnderMigration").with_argument(
                    "status",
                    AnnotationValue::enum_constant("kotlin.annotations.jvm.MigrationStatus", "STRICT"),
                ),
            ),
    );
    let owner = store.add_class(ClassDecl::class("com.acme.Cache"));
    store.add_member(
        owner,
        MemberDecl::method(
            "lookup",
            vec![string_param("key")],
            TypeRef::new(string()).annotated(Annotation::new("com.acme.Maybe")),
        ),
    );

    let declared = scope(&store, owner, &EnhancementConfig::default());
    let lookup = &declared.functions_by_name("lookup").unwrap()[0];
    assert_eq!(
        lookup.as_function().unwrap().return_type.nullability,
        Nullability::Nullable
    );

    let config = EnhancementConfig {
        jsr305_migration: Some(ReportLevel::Ignore),
        ..EnhancementConfig::default()
    };
    let ignored = scope(&store, owner, &config);
    let lookup = &ignored.functions_by_name("lookup").unwrap()[0];
    let return_type = &lookup.as_function().unwrap().return_type;
    assert_eq!(return_type.nullability, Nullability::Flexible);
    assert_eq!(return_type.warning, None);
}

#[test]
fn type_use_annotations_contribute_defaults_and_mutability() {
    let mut store = DeclarationStore::new();
    store.add_class(
        ClassDecl::annotation_class("com.acme.NonNullByDefault")
            .annotated(Annotation::new("javax.annotation.Nonnull"))
            .annotated(
                Annotation::new("javax.annotation.meta.TypeQualifierDefault").with_argument(
                    "value",
                    AnnotationValue::Array(vec![
                        AnnotationValue::enum_constant("java.lang.annotation.ElementType", "METHOD"),
                        AnnotationValue::enum_constant("java.lang.annotation.ElementType", "FIELD"),
                    ]),
                ),
            ),
    );
    let owner = store.add_class(
        ClassDecl::class("com.acme.Registry")
            .annotated(Annotation::new("com.acme.NonNullByDefault")),
    );
    store.add_member(
        owner,
        MemberDecl::method(
            "names",
            vec![ValueParameter::new(JavaType::named("java.lang.CharSequence"))],
            TypeRef::new(JavaType::named("java.util.List"))
                .annotated(Annotation::new("org.jetbrains.annotations.ReadOnly")),
        ),
    );

    let scope = scope(&store, owner, &EnhancementConfig::strict());
    let names = &scope.functions_by_name("names").unwrap()[0];
    let function = names.as_function().unwrap();

    assert_eq!(function.return_type.nullability, Nullability::NotNull);
    assert_eq!(function.return_type.mutability, Some(Mutability::ReadOnly));
    assert_eq!(function.return_type.source, NullabilitySource::ContextDefault);
    assert_eq!(function.params[0].ty.nullability, Nullability::Nullable);
    assert_eq!(
        names.to_string(),
        "names(p0: java.lang.CharSequence?): @ReadOnly java.util.List"
    );
}
