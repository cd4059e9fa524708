//! JSON interchange format for foreign declarations.
//!
//! A real front-end hands the enhancement pass declarations straight from class files; the JSON
//! form exists so fixtures and the CLI can describe the same information without one. Types are
//! written as JVM type signatures (`Ljava/util/List<TT;>;`).

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::Deserialize;

use crate::descriptor::{parse_return_signature, parse_type_signature};
use crate::error::{LoadError, Result};
use crate::{
    Annotation, AnnotationValue, ClassDecl, ClassKind, ClassType, DeclarationOrigin,
    DeclarationStore, JavaType, MemberDecl, Name, Nullability, RawField, RawMemberKind, RawMethod,
    TypeParam, TypeRef,
    ValueParameter,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DeclarationFile {
    #[serde(default)]
    packages: Vec<PackageJson>,
    #[serde(default)]
    classes: Vec<ClassJson>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PackageJson {
    name: String,
    #[serde(default)]
    annotations: Vec<AnnotationJson>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassJson {
    name: String,
    #[serde(default)]
    kind: ClassKind,
    #[serde(default)]
    type_params: Vec<TypeParamJson>,
    #[serde(default)]
    super_class: Option<SupertypeJson>,
    #[serde(default)]
    interfaces: Vec<SupertypeJson>,
    #[serde(default)]
    annotations: Vec<AnnotationJson>,
    #[serde(default)]
    outer: Option<String>,
    #[serde(default)]
    fields: Vec<FieldJson>,
    #[serde(default)]
    methods: Vec<MethodJson>,
}

/// A binary name, or `{ "signature": "La/Box<Ljava/lang/String;>;" }` for a parameterized
/// supertype.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SupertypeJson {
    Name(String),
    Generic { signature: String },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeParamJson {
    name: String,
    #[serde(default)]
    bounds: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeJson {
    signature: String,
    #[serde(default)]
    annotations: Vec<AnnotationJson>,
    #[serde(default)]
    nullability: Option<Nullability>,
}

/// Either a bare signature string or a full object with type-use annotations.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TypeRefJson {
    Signature(String),
    Full(TypeJson),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldJson {
    name: String,
    #[serde(rename = "type")]
    ty: TypeRefJson,
    #[serde(default)]
    annotations: Vec<AnnotationJson>,
    #[serde(default)]
    is_static: bool,
    #[serde(default)]
    is_final: bool,
    #[serde(default)]
    origin: DeclarationOrigin,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MethodJson {
    name: String,
    #[serde(default)]
    type_params: Vec<TypeParamJson>,
    #[serde(default)]
    receiver: Option<TypeRefJson>,
    #[serde(default)]
    params: Vec<ParamJson>,
    returns: TypeRefJson,
    #[serde(default)]
    annotations: Vec<AnnotationJson>,
    #[serde(default)]
    is_static: bool,
    #[serde(default)]
    is_abstract: bool,
    #[serde(default)]
    origin: DeclarationOrigin,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParamJson {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    ty: TypeRefJson,
    #[serde(default)]
    annotations: Vec<AnnotationJson>,
    #[serde(default)]
    is_varargs: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum AnnotationJson {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        arguments: BTreeMap<String, AnnotationValue>,
    },
}

impl From<AnnotationJson> for Annotation {
    fn from(value: AnnotationJson) -> Self {
        match value {
            AnnotationJson::Name(name) => Annotation::new(name),
            AnnotationJson::Full { name, arguments } => Annotation {
                name: Name::from(name),
                arguments: arguments
                    .into_iter()
                    .map(|(name, value)| (Name::from(name), value))
                    .collect(),
            },
        }
    }
}

fn annotations(values: Vec<AnnotationJson>) -> Vec<Annotation> {
    values.into_iter().map(Annotation::from).collect()
}

fn type_ref(value: TypeRefJson, allow_void: bool) -> Result<TypeRef> {
    let parse = |sig: &str| {
        if allow_void {
            parse_return_signature(sig)
        } else {
            parse_type_signature(sig)
        }
    };
    match value {
        TypeRefJson::Signature(sig) => Ok(TypeRef::new(parse(&sig)?)),
        TypeRefJson::Full(TypeJson {
            signature,
            annotations: anns,
            nullability,
        }) => Ok(TypeRef {
            ty: parse(&signature)?,
            annotations: annotations(anns),
            nullability,
        }),
    }
}

fn supertype(value: SupertypeJson) -> Result<ClassType> {
    match value {
        SupertypeJson::Name(name) => Ok(ClassType {
            name: Name::from(name),
            args: Vec::new(),
        }),
        SupertypeJson::Generic { signature } => match parse_type_signature(&signature)? {
            JavaType::Class(class) => Ok(class),
            _ => Err(LoadError::InvalidSignature(signature)),
        },
    }
}

fn type_params(values: Vec<TypeParamJson>) -> Result<Vec<TypeParam>> {
    values
        .into_iter()
        .map(|tp| {
            Ok(TypeParam {
                name: Name::from(tp.name),
                bounds: tp
                    .bounds
                    .iter()
                    .map(|bound| parse_type_signature(bound))
                    .collect::<Result<Vec<_>>>()?,
            })
        })
        .collect()
}

/// Load a [`DeclarationStore`] from the JSON interchange format.
pub fn load_declarations(json: &str) -> Result<DeclarationStore> {
    let file: DeclarationFile = serde_json::from_str(json)?;
    let mut store = DeclarationStore::new();

    for package in file.packages {
        store.set_package_annotations(package.name, annotations(package.annotations));
    }

    // Register every class first so `outer` can refer to classes declared later in the file.
    let mut seen = HashSet::new();
    let mut pending_outer = Vec::new();
    let mut class_ids = Vec::with_capacity(file.classes.len());
    for class in &file.classes {
        if !seen.insert(class.name.clone()) {
            return Err(LoadError::DuplicateClass(Name::from(class.name.as_str())));
        }
        let id = store.add_class(ClassDecl::new(class.name.as_str(), class.kind));
        class_ids.push(id);
        if let Some(outer) = &class.outer {
            pending_outer.push((id, class.name.clone(), outer.clone()));
        }
    }
    for (id, class, outer) in pending_outer {
        let Some(outer_id) = store.lookup_class(&outer) else {
            return Err(LoadError::UnknownOuterClass {
                class: Name::from(class),
                outer: Name::from(outer),
            });
        };
        store.set_outer(id, outer_id);
    }

    let mut member_count = 0usize;
    for (class, id) in file.classes.into_iter().zip(class_ids) {
        let mut decl = ClassDecl::new(class.name.as_str(), class.kind);
        decl.type_params = type_params(class.type_params)?;
        decl.super_class = class.super_class.map(supertype).transpose()?;
        decl.interfaces = class
            .interfaces
            .into_iter()
            .map(supertype)
            .collect::<Result<Vec<_>>>()?;
        decl.annotations = annotations(class.annotations);
        decl.outer = store.class(id).and_then(|c| c.outer);
        store.add_class(decl);

        for field in class.fields {
            store.add_member(
                id,
                MemberDecl {
                    name: Name::from(field.name),
                    origin: field.origin,
                    annotations: annotations(field.annotations),
                    kind: RawMemberKind::Field(RawField {
                        ty: type_ref(field.ty, false)?,
                        is_static: field.is_static,
                        is_final: field.is_final,
                    }),
                },
            );
            member_count += 1;
        }

        for method in class.methods {
            let params = method
                .params
                .into_iter()
                .map(|param| {
                    Ok(ValueParameter {
                        name: param.name.map(Name::from),
                        ty: type_ref(param.ty, false)?,
                        annotations: annotations(param.annotations),
                        is_varargs: param.is_varargs,
                    })
                })
                .collect::<Result<Vec<_>>>()?;
            store.add_member(
                id,
                MemberDecl {
                    name: Name::from(method.name),
                    origin: method.origin,
                    annotations: annotations(method.annotations),
                    kind: RawMemberKind::Method(RawMethod {
                        type_params: type_params(method.type_params)?,
                        receiver: method.receiver.map(|r| type_ref(r, false)).transpose()?,
                        params,
                        return_type: type_ref(method.returns, true)?,
                        is_static: method.is_static,
                        is_abstract: method.is_abstract,
                    }),
                },
            );
            member_count += 1;
        }
    }

    tracing::debug!(
        target: "javelin.model",
        classes = store.class_count(),
        members = member_count,
        "loaded foreign declarations"
    );
    Ok(store)
}

/// Read and load a JSON declarations file.
pub fn load_declarations_from_path(path: impl AsRef<Path>) -> Result<DeclarationStore> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_declarations(&text)
}
