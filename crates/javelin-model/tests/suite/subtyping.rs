use javelin_model::{
    erase, is_subtype, parse_type_signature, ClassDecl, DeclarationStore, JavaType, TypeParam,
    TypeParamScope,
};

#[test]
fn erased_generic_return_narrowing_is_a_subtype() {
    let mut store = DeclarationStore::new();
    store.add_class(ClassDecl::interface("java.util.Collection"));
    store.add_class(ClassDecl::interface("java.util.List").implements("java.util.Collection"));

    let params = [TypeParam::bounded(
        "E",
        parse_type_signature("Ljava/util/List<TE;>;").unwrap(),
    )];
    let scope = TypeParamScope::new(&params, &[]);

    let narrowed = erase(&JavaType::type_var("E"), &scope);
    let wide = erase(
        &parse_type_signature("Ljava/util/Collection<*>;").unwrap(),
        &TypeParamScope::default(),
    );
    assert_eq!(narrowed, JavaType::named("java.util.List"));
    assert!(is_subtype(&store, &narrowed, &wide));
    assert!(!is_subtype(&store, &wide, &narrowed));
}
