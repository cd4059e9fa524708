use javelin_config::EnhancementConfig;
use javelin_enhance::{
    EnhancementError, EnhancementScope, MemberScope, NullabilitySource, Result, UseSiteScope,
};
use javelin_model::{
    Annotation, ClassDecl, ClassId, DeclarationStore, JavaType, MemberDecl, MemberId, Nullability,
    TypeArgument, TypeParam, TypeRef, ValueParameter,
};
use pretty_assertions::assert_eq;

use super::fixtures::{annotated_string, scope, string, string_param, NOT_NULL, NULLABLE};

#[test]
fn silent_override_inherits_the_base_nullability() {
    let mut store = DeclarationStore::new();
    let base = store.add_class(ClassDecl::class("a.Base"));
    let derived = store.add_class(ClassDecl::class("a.Derived").extends("a.Base"));
    let base_name = store.add_member(
        base,
        MemberDecl::method("name", vec![], annotated_string(NOT_NULL)),
    );
    store.add_member(derived, MemberDecl::method("name", vec![], string()));

    let scope = scope(&store, derived, &EnhancementConfig::default());
    let name = &scope.functions_by_name("name").unwrap()[0];

    assert_eq!(name.overridden, vec![base_name]);
    let return_type = &name.as_function().unwrap().return_type;
    assert_eq!(return_type.nullability, Nullability::NotNull);
    assert_eq!(return_type.source, NullabilitySource::Overridden);
}

#[test]
fn nullability_is_inherited_down_a_chain_of_silent_overrides() {
    let mut store = DeclarationStore::new();
    let top = store.add_class(ClassDecl::class("a.Top"));
    let middle = store.add_class(ClassDecl::class("a.Middle").extends("a.Top"));
    let bottom = store.add_class(ClassDecl::class("a.Bottom").extends("a.Middle"));
    store.add_member(top, MemberDecl::method("name", vec![], annotated_string(NOT_NULL)));
    let middle_name = store.add_member(middle, MemberDecl::method("name", vec![], string()));
    store.add_member(bottom, MemberDecl::method("name", vec![], string()));

    let scope = scope(&store, bottom, &EnhancementConfig::default());
    let name = &scope.functions_by_name("name").unwrap()[0];

    assert_eq!(name.overridden, vec![middle_name]);
    let return_type = &name.as_function().unwrap().return_type;
    assert_eq!(return_type.nullability, Nullability::NotNull);
    assert_eq!(return_type.source, NullabilitySource::Overridden);
}

#[test]
fn the_nearest_declaration_wins_over_a_farther_one() {
    let mut store = DeclarationStore::new();
    let top = store.add_class(ClassDecl::class("a.Top"));
    let middle = store.add_class(ClassDecl::class("a.Middle").extends("a.Top"));
    let bottom = store.add_class(ClassDecl::class("a.Bottom").extends("a.Middle"));
    store.add_member(
        top,
        MemberDecl::method("find", vec![], annotated_string(NOT_NULL)),
    );
    store.add_member(
        middle,
        MemberDecl::method("find", vec![], annotated_string(NULLABLE)),
    );
    store.add_member(bottom, MemberDecl::method("find", vec![], string()));

    let scope = scope(&store, bottom, &EnhancementConfig::default());
    let find = &scope.functions_by_name("find").unwrap()[0];

    assert_eq!(find.overridden.len(), 1);
    assert_eq!(
        find.as_function().unwrap().return_type.nullability,
        Nullability::Nullable
    );
}

#[test]
fn overrides_through_a_parameterized_supertype_are_found() {
    let mut store = DeclarationStore::new();
    let boxed = store.add_class(ClassDecl::class("a.Box").with_type_param(TypeParam::new("T")));
    let strings = store.add_class(ClassDecl::class("a.StringBox").extends_generic(
        "a.Box",
        vec![TypeArgument::Type(string())],
    ));
    let put = store.add_member(
        boxed,
        MemberDecl::method(
            "put",
            vec![ValueParameter::new(
                TypeRef::new(JavaType::type_var("T")).annotated(Annotation::new(NOT_NULL)),
            )],
            JavaType::Void,
        ),
    );
    store.add_member(
        strings,
        MemberDecl::method("put", vec![string_param("value")], JavaType::Void),
    );

    let scope = scope(&store, strings, &EnhancementConfig::default());
    let string_put = &scope.functions_by_name("put").unwrap()[0];

    assert_eq!(string_put.overridden, vec![put]);
    let param = &string_put.as_function().unwrap().params[0];
    assert_eq!(param.ty.nullability, Nullability::NotNull);
    assert_eq!(param.ty.source, NullabilitySource::Overridden);
}

#[test]
fn native_overridden_nullability_counts_even_when_disabled() {
    let mut store = DeclarationStore::new();
    let base = store.add_class(ClassDecl::class("kt.Base"));
    let derived = store.add_class(ClassDecl::class("j.Derived").extends("kt.Base"));
    store.add_member(
        base,
        MemberDecl::method(
            "accept",
            vec![ValueParameter::new(TypeRef::resolved(string(), Nullability::NotNull))],
            JavaType::Void,
        )
        .native(),
    );
    store.add_member(
        derived,
        MemberDecl::method("accept", vec![string_param("value")], JavaType::Void),
    );

    let scope = scope(&store, derived, &EnhancementConfig::disabled());
    let accept = &scope.functions_by_name("accept").unwrap()[0];
    let param = &accept.as_function().unwrap().params[0];
    assert_eq!(param.ty.nullability, Nullability::NotNull);
    assert_eq!(param.ty.source, NullabilitySource::Overridden);
}

#[test]
fn disagreeing_supertypes_fall_back() {
    let mut store = DeclarationStore::new();
    let left = store.add_class(ClassDecl::interface("a.Left"));
    let right = store.add_class(ClassDecl::interface("a.Right"));
    let both = store.add_class(
        ClassDecl::class("a.Both")
            .implements("a.Left")
            .implements("a.Right"),
    );
    store.add_member(left, MemberDecl::method("get", vec![], annotated_string(NOT_NULL)));
    store.add_member(right, MemberDecl::method("get", vec![], annotated_string(NULLABLE)));
    store.add_member(both, MemberDecl::method("get", vec![], string()));

    let scope = scope(&store, both, &EnhancementConfig::default());
    let get = &scope.functions_by_name("get").unwrap()[0];

    assert_eq!(get.overridden.len(), 2);
    let return_type = &get.as_function().unwrap().return_type;
    assert_eq!(return_type.nullability, Nullability::Flexible);
    assert_eq!(return_type.source, NullabilitySource::Fallback);
}

#[test]
fn covariant_return_overrides_but_other_parameter_types_do_not() {
    let mut store = DeclarationStore::new();
    store.add_class(ClassDecl::class("a.Animal"));
    store.add_class(ClassDecl::class("a.Cat").extends("a.Animal"));
    let shelter = store.add_class(ClassDecl::class("a.Shelter"));
    let cats = store.add_class(ClassDecl::class("a.CatShelter").extends("a.Shelter"));

    let adopt = store.add_member(
        shelter,
        MemberDecl::method(
            "adopt",
            vec![ValueParameter::new(annotated_string(NOT_NULL))],
            JavaType::named("a.Animal"),
        ),
    );
    store.add_member(
        cats,
        MemberDecl::method("adopt", vec![string_param("name")], JavaType::named("a.Cat")),
    );
    store.add_member(
        cats,
        MemberDecl::method(
            "adopt",
            vec![ValueParameter::new(JavaType::named("java.lang.CharSequence"))],
            JavaType::named("a.Cat"),
        ),
    );

    let scope = scope(&store, cats, &EnhancementConfig::default());
    let adopts = scope.functions_by_name("adopt").unwrap();

    assert_eq!(adopts[0].overridden, vec![adopt]);
    assert_eq!(
        adopts[0].as_function().unwrap().params[0].ty.nullability,
        Nullability::NotNull
    );
    assert!(adopts[1].overridden.is_empty());
    assert_eq!(
        adopts[1].as_function().unwrap().params[0].ty.nullability,
        Nullability::Nullable
    );
}

#[test]
fn inheritance_cycles_are_malformed_input() {
    let mut store = DeclarationStore::new();
    let a = store.add_class(ClassDecl::class("a.A").extends("a.B"));
    store.add_class(ClassDecl::class("a.B").extends("a.A"));
    store.add_member(a, MemberDecl::method("run", vec![], JavaType::Void));

    let scope = scope(&store, a, &EnhancementConfig::default());
    let err = scope.functions_by_name("run").unwrap_err();

    assert!(matches!(err, EnhancementError::InheritanceCycle { .. }), "{err:?}");
    assert!(err.is_malformed_input());
}

/// Use-site scope whose supertypes are the class' own members.
struct SelfInheriting<'a> {
    store: &'a DeclarationStore,
    owner: ClassId,
}

impl MemberScope for SelfInheriting<'_> {
    fn members_by_name(&self, name: &str) -> Result<Vec<MemberId>> {
        Ok(self
            .store
            .declared_members(self.owner, name)
            .map(|member| member.id)
            .collect())
    }
}

impl UseSiteScope for SelfInheriting<'_> {
    fn owner(&self) -> ClassId {
        self.owner
    }

    fn supertypes_scope(&self) -> &dyn MemberScope {
        self
    }
}

#[test]
fn a_member_overriding_itself_is_a_cycle() {
    let mut store = DeclarationStore::new();
    let owner = store.add_class(ClassDecl::class("a.Loop"));
    let run = store.add_member(owner, MemberDecl::method("run", vec![], JavaType::Void));

    let use_site = SelfInheriting {
        store: &store,
        owner,
    };
    let scope = EnhancementScope::new(&store, use_site, &EnhancementConfig::default());
    let err = scope.functions_by_name("run").unwrap_err();

    match &err {
        EnhancementError::OverrideCycle { origin, overridden } => {
            assert_eq!(origin.member, run);
            assert_eq!(overridden.member, run);
        }
        other => panic!("expected an override cycle, got {other:?}"),
    }
    assert!(err.is_malformed_input());
    assert_eq!(scope.use_site().owner(), owner);
    assert!(scope.cache().is_empty());
}
