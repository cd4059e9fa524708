use std::sync::Arc;

use javelin_config::EnhancementConfig;
use javelin_enhance::{CacheState, EnhancementError, NullabilitySource};
use javelin_model::{
    Annotation, ClassDecl, DeclarationStore, JavaType, MemberDecl, Nullability, TypeParam,
    TypeRef, ValueParameter,
};
use pretty_assertions::assert_eq;

use super::fixtures::{annotated_string, scope, string, string_param, NOT_NULL};

#[test]
fn repeated_lookups_share_one_enhanced_member() {
    let mut store = DeclarationStore::new();
    let owner = store.add_class(ClassDecl::class("a.Greeter"));
    store.add_member(
        owner,
        MemberDecl::method("greet", vec![string_param("who")], string()),
    );
    store.add_member(owner, MemberDecl::field("greet", string()));

    let scope = scope(&store, owner, &EnhancementConfig::default());
    let first = scope.lookup_by_name("greet").unwrap();
    let second = scope.lookup_by_name("greet").unwrap();

    assert_eq!(first.len(), 2);
    for (a, b) in first.iter().zip(&second) {
        assert!(Arc::ptr_eq(a, b));
    }
    assert_eq!(scope.cache().len(), 2);
}

#[test]
fn returns_default_to_flexible_and_parameters_to_nullable() {
    let mut store = DeclarationStore::new();
    let owner = store.add_class(ClassDecl::class("a.Repo"));
    store.add_member(
        owner,
        MemberDecl::method("find", vec![string_param("key")], string()),
    );

    let scope = scope(&store, owner, &EnhancementConfig::default());
    let find = &scope.functions_by_name("find").unwrap()[0];
    let function = find.as_function().unwrap();

    assert_eq!(function.return_type.nullability, Nullability::Flexible);
    assert_eq!(function.return_type.source, NullabilitySource::Fallback);
    assert_eq!(function.params[0].ty.nullability, Nullability::Nullable);
    assert_eq!(function.params[0].ty.source, NullabilitySource::Fallback);
    assert_eq!(
        find.to_string(),
        "find(key: java.lang.String?): java.lang.String!"
    );
}

#[test]
fn disabled_mode_ignores_explicit_annotations() {
    let mut store = DeclarationStore::new();
    let owner = store.add_class(ClassDecl::class("a.Repo"));
    store.add_member(
        owner,
        MemberDecl::method(
            "save",
            vec![ValueParameter::new(annotated_string(NOT_NULL))],
            annotated_string(NOT_NULL),
        ),
    );

    let scope = scope(&store, owner, &EnhancementConfig::disabled());
    let save = &scope.functions_by_name("save").unwrap()[0];
    let function = save.as_function().unwrap();

    assert_eq!(function.params[0].ty.nullability, Nullability::Nullable);
    assert_eq!(function.return_type.nullability, Nullability::Flexible);
}

#[test]
fn predefined_corrections_beat_local_annotations() {
    let mut store = DeclarationStore::new();
    let optional = store.add_class(
        ClassDecl::class("java.util.Optional").with_type_param(TypeParam::new("T")),
    );
    store.add_member(
        optional,
        MemberDecl::method(
            "ofNullable",
            vec![ValueParameter::new(
                TypeRef::new(JavaType::type_var("T")).annotated(Annotation::new(NOT_NULL)),
            )
            .named("value")],
            JavaType::class("java.util.Optional", vec![]),
        )
        .with_static(true)
        .with_type_param(TypeParam::new("T")),
    );

    let scope = scope(&store, optional, &EnhancementConfig::default());
    let of_nullable = &scope.functions_by_name("ofNullable").unwrap()[0];
    let function = of_nullable.as_function().unwrap();

    assert!(of_nullable.predefined);
    assert_eq!(function.params[0].ty.nullability, Nullability::Nullable);
    assert_eq!(function.params[0].ty.source, NullabilitySource::Predefined);
    assert_eq!(function.return_type.nullability, Nullability::NotNull);
}

#[test]
fn shape_mismatches_are_reported_and_not_cached() {
    let mut store = DeclarationStore::new();
    let owner = store.add_class(ClassDecl::class("a.Counter"));
    let count = store.add_member(owner, MemberDecl::method("count", vec![], JavaType::object()));
    let native = store.add_member(
        owner,
        MemberDecl::field("total", TypeRef::resolved(JavaType::object(), Nullability::NotNull))
            .native(),
    );

    let scope = scope(&store, owner, &EnhancementConfig::default());

    let err = scope.fields_by_name("count").unwrap_err();
    match &err {
        EnhancementError::UnexpectedShape {
            origin,
            expected,
            found,
        } => {
            assert_eq!(origin.member, count);
            assert_eq!(origin.owner, "a.Counter");
            assert_eq!(*expected, "foreign field");
            assert_eq!(*found, "foreign method");
        }
        other => panic!("expected a shape mismatch, got {other:?}"),
    }
    assert!(!err.is_malformed_input());
    assert_eq!(scope.cache().state(count), CacheState::Unseen);

    // The scope stays usable.
    assert_eq!(scope.functions_by_name("count").unwrap().len(), 1);
    assert_eq!(scope.cache().state(count), CacheState::Done);

    let err = scope.lookup_by_name("total").unwrap_err();
    assert!(
        matches!(err, EnhancementError::UnexpectedShape { found: "native field", .. }),
        "{err:?}"
    );
    assert_eq!(scope.cache().state(native), CacheState::Unseen);
}

#[test]
fn enhanced_members_serialize_for_tooling() {
    let mut store = DeclarationStore::new();
    let owner = store.add_class(ClassDecl::class("a.Holder"));
    store.add_member(
        owner,
        MemberDecl::field("value", annotated_string(NOT_NULL)).with_static(true),
    );

    let scope = scope(&store, owner, &EnhancementConfig::default());
    let value = &scope.fields_by_name("value").unwrap()[0];
    let json = serde_json::to_value(&**value).unwrap();

    assert_eq!(json["owner_name"], "a.Holder");
    assert_eq!(json["kind"]["field"]["ty"]["nullability"], "not_null");
    assert_eq!(json["kind"]["field"]["ty"]["source"], "annotation");
    assert_eq!(json["kind"]["field"]["is_static"], true);
}
