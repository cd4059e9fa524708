use javelin_model::{
    load_declarations, load_declarations_from_path, DeclarationOrigin, JavaType, LoadError, Name,
    Nullability, TypeArgument, WildcardBound,
};
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn loads_generic_signatures_and_native_members() {
    let json = r#"{
        "classes": [
            {
                "name": "kt.Base",
                "methods": [
                    {
                        "name": "take",
                        "origin": "native",
                        "params": [{ "type": { "signature": "Ljava/lang/String;", "nullability": "not_null" } }],
                        "returns": { "signature": "Ljava/util/List<+Ljava/lang/Number;>;", "nullability": "nullable" }
                    }
                ]
            },
            { "name": "j.Derived", "super_class": "kt.Base" }
        ]
    }"#;

    let store = load_declarations(json).expect("declarations should load");
    let base = store.lookup_class("kt.Base").unwrap();
    let take = store.declared_members(base, "take").next().unwrap();
    assert_eq!(take.origin, DeclarationOrigin::Native);

    let method = take.as_method().unwrap();
    assert_eq!(method.params[0].ty.nullability, Some(Nullability::NotNull));
    assert_eq!(method.return_type.nullability, Some(Nullability::Nullable));
    assert_eq!(
        method.return_type.ty,
        JavaType::class(
            "java.util.List",
            vec![TypeArgument::Wildcard(WildcardBound::Extends(Box::new(
                JavaType::named("java.lang.Number")
            )))]
        )
    );

    let derived = store.lookup_class("j.Derived").unwrap();
    assert_eq!(store.supertypes(derived).unwrap(), vec![base]);
}

#[test]
fn loads_parameterized_supertypes() {
    let json = r#"{
        "classes": [
            { "name": "a.Box", "type_params": [{ "name": "T" }] },
            { "name": "a.Sink", "kind": "interface", "type_params": [{ "name": "E" }] },
            {
                "name": "a.StringBox",
                "super_class": { "signature": "La/Box<Ljava/lang/String;>;" },
                "interfaces": ["a.Sink"]
            }
        ]
    }"#;

    let store = load_declarations(json).expect("declarations should load");
    let boxed = store.lookup_class("a.Box").unwrap();
    let string_box = store.class_by_name("a.StringBox").unwrap();
    let super_class = string_box.super_class.as_ref().unwrap();
    assert_eq!(super_class.name, "a.Box");
    assert_eq!(
        super_class.args,
        vec![TypeArgument::Type(JavaType::named("java.lang.String"))]
    );
    assert!(string_box.interfaces[0].args.is_empty());

    let substitution = store.supertype_substitution(string_box.id, boxed).unwrap();
    assert_eq!(substitution[&Name::new("T")], JavaType::named("java.lang.String"));

    let err = load_declarations(
        r#"{ "classes": [{ "name": "a.A", "super_class": { "signature": "[I" } }] }"#,
    )
    .unwrap_err();
    assert!(matches!(err, LoadError::InvalidSignature(_)), "{err:?}");
}

#[test]
fn loads_from_path() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    write!(file, r#"{{ "classes": [{{ "name": "a.A" }}] }}"#).expect("write");

    let store = load_declarations_from_path(file.path()).expect("declarations should load");
    assert_eq!(store.class_count(), 1);
}

#[test]
fn reports_io_and_json_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = load_declarations_from_path(dir.path().join("missing.json")).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "{err:?}");

    let err = load_declarations(r#"{ "classes": [{ "nam": "a.A" }] }"#).unwrap_err();
    assert!(matches!(err, LoadError::Json(_)), "{err:?}");
}

#[test]
fn rejects_malformed_signatures() {
    let json = r#"{ "classes": [{ "name": "a.A", "methods": [{ "name": "m", "returns": "Ljava/lang/String" }] }] }"#;
    let err = load_declarations(json).unwrap_err();
    assert!(matches!(err, LoadError::InvalidSignature(_)), "{err:?}");
}
