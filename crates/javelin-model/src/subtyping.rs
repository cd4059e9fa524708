use std::collections::{HashMap, HashSet};

use crate::{ClassType, DeclarationStore, JavaType, Name, TypeArgument, TypeParam, WildcardBound};

/// Type parameters in scope for a signature: the method's own, then the owning class'.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeParamScope<'a> {
    pub method: &'a [TypeParam],
    pub class: &'a [TypeParam],
}

impl<'a> TypeParamScope<'a> {
    pub fn new(method: &'a [TypeParam], class: &'a [TypeParam]) -> Self {
        Self { method, class }
    }

    fn lookup(&self, name: &Name) -> Option<&'a TypeParam> {
        self.method
            .iter()
            .find(|tp| &tp.name == name)
            .or_else(|| self.class.iter().find(|tp| &tp.name == name))
    }
}

/// JVM erasure of `ty`: type arguments are dropped and type variables are replaced by the
/// erasure of their first bound (`java.lang.Object` when unbounded or unknown).
pub fn erase(ty: &JavaType, scope: &TypeParamScope<'_>) -> JavaType {
    fn inner(ty: &JavaType, scope: &TypeParamScope<'_>, seen: &mut HashSet<Name>) -> JavaType {
        match ty {
            JavaType::Primitive(_) | JavaType::Void => ty.clone(),
            JavaType::Class(class) => JavaType::named(class.name.clone()),
            JavaType::Array(component) => JavaType::array(inner(component, scope, seen)),
            JavaType::TypeVar(name) => {
                // `T extends U, U extends T` is malformed but must not recurse forever.
                if !seen.insert(name.clone()) {
                    return JavaType::object();
                }
                let erased = scope
                    .lookup(name)
                    .and_then(|tp| tp.bounds.first())
                    .map(|bound| inner(bound, scope, seen))
                    .unwrap_or_else(JavaType::object);
                seen.remove(name);
                erased
            }
        }
    }

    inner(ty, scope, &mut HashSet::new())
}

/// Replace the type variables named in `substitution`, anywhere inside `ty`.
pub fn substitute(ty: &JavaType, substitution: &HashMap<Name, JavaType>) -> JavaType {
    match ty {
        JavaType::Primitive(_) | JavaType::Void => ty.clone(),
        JavaType::TypeVar(name) => substitution.get(name).cloned().unwrap_or_else(|| ty.clone()),
        JavaType::Array(component) => JavaType::array(substitute(component, substitution)),
        JavaType::Class(class) => JavaType::Class(ClassType {
            name: class.name.clone(),
            args: class
                .args
                .iter()
                .map(|arg| substitute_argument(arg, substitution))
                .collect(),
        }),
    }
}

fn substitute_argument(arg: &TypeArgument, substitution: &HashMap<Name, JavaType>) -> TypeArgument {
    match arg {
        TypeArgument::Type(ty) => TypeArgument::Type(substitute(ty, substitution)),
        TypeArgument::Wildcard(WildcardBound::Unbounded) => arg.clone(),
        TypeArgument::Wildcard(WildcardBound::Extends(bound)) => TypeArgument::Wildcard(
            WildcardBound::Extends(Box::new(substitute(bound, substitution))),
        ),
        TypeArgument::Wildcard(WildcardBound::Super(bound)) => TypeArgument::Wildcard(
            WildcardBound::Super(Box::new(substitute(bound, substitution))),
        ),
    }
}

/// Subtyping between two *erased* types (see [`erase`]).
///
/// Arrays are covariant in reference components, primitives only match themselves and `void`
/// only matches `void`.
pub fn is_subtype(store: &DeclarationStore, sub: &JavaType, sup: &JavaType) -> bool {
    match (sub, sup) {
        (JavaType::Primitive(a), JavaType::Primitive(b)) => a == b,
        (JavaType::Void, JavaType::Void) => true,
        (JavaType::Array(a), JavaType::Array(b)) => {
            if a.is_primitive_or_void() || b.is_primitive_or_void() {
                a == b
            } else {
                is_subtype(store, a, b)
            }
        }
        (JavaType::Array(_), JavaType::Class(class)) => matches!(
            class.name.as_str(),
            JavaType::OBJECT | "java.lang.Cloneable" | "java.io.Serializable"
        ),
        (JavaType::Class(a), JavaType::Class(b)) => store.is_subclass(a.name.as_str(), b.name.as_str()),
        (JavaType::TypeVar(a), JavaType::TypeVar(b)) => a == b,
        _ => false,
    }
}
