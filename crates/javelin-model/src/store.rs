use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::InheritanceCycle;
use crate::subtyping::{erase, substitute, TypeParamScope};
use crate::{
    Annotation, ClassDecl, ClassId, ForeignClass, JavaType, MemberDecl, MemberId, Name,
    RawMember, TypeArgument, WildcardBound,
};

/// Arena of foreign declarations.
///
/// The store is immutable from the enhancement pass' point of view; it is populated once by a
/// loader and then shared (by reference) between any number of enhancement scopes.
#[derive(Debug, Default, Clone)]
pub struct DeclarationStore {
    classes: Vec<ForeignClass>,
    members: Vec<RawMember>,
    class_ids: HashMap<Name, ClassId>,
    packages: HashMap<Name, Vec<Annotation>>,
}

impl DeclarationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class. Re-registering an existing binary name replaces its header (kind,
    /// supertypes, annotations, ...) but keeps its id and already-added members.
    pub fn add_class(&mut self, decl: ClassDecl) -> ClassId {
        if let Some(&id) = self.class_ids.get(&decl.name) {
            let class = &mut self.classes[id.index()];
            class.kind = decl.kind;
            class.type_params = decl.type_params;
            class.super_class = decl.super_class;
            class.interfaces = decl.interfaces;
            class.annotations = decl.annotations;
            class.outer = decl.outer;
            return id;
        }

        let id = ClassId::from_index(self.classes.len());
        self.class_ids.insert(decl.name.clone(), id);
        self.classes.push(ForeignClass {
            id,
            name: decl.name,
            kind: decl.kind,
            type_params: decl.type_params,
            super_class: decl.super_class,
            interfaces: decl.interfaces,
            annotations: decl.annotations,
            outer: decl.outer,
            members: Vec::new(),
        });
        id
    }

    /// Register a member of `owner`.
    ///
    /// # Panics
    ///
    /// Panics if `owner` was not produced by this store.
    pub fn add_member(&mut self, owner: ClassId, decl: MemberDecl) -> MemberId {
        let id = MemberId::from_index(self.members.len());
        self.members.push(RawMember {
            id,
            owner,
            name: decl.name,
            origin: decl.origin,
            annotations: decl.annotations,
            kind: decl.kind,
        });
        self.classes[owner.index()].members.push(id);
        id
    }

    pub(crate) fn set_outer(&mut self, class: ClassId, outer: ClassId) {
        self.classes[class.index()].outer = Some(outer);
    }

    /// Annotations found on the `package-info` of `package` (dotted name, empty for the default
    /// package).
    pub fn set_package_annotations(&mut self, package: impl Into<Name>, annotations: Vec<Annotation>) {
        self.packages.insert(package.into(), annotations);
    }

    pub fn package_annotations(&self, package: &str) -> &[Annotation] {
        self.packages
            .get(package)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn class(&self, id: ClassId) -> Option<&ForeignClass> {
        self.classes.get(id.index())
    }

    pub fn lookup_class(&self, binary_name: &str) -> Option<ClassId> {
        self.class_ids.get(binary_name).copied()
    }

    pub fn class_by_name(&self, binary_name: &str) -> Option<&ForeignClass> {
        self.lookup_class(binary_name).and_then(|id| self.class(id))
    }

    pub fn member(&self, id: MemberId) -> Option<&RawMember> {
        self.members.get(id.index())
    }

    pub fn classes(&self) -> impl Iterator<Item = &ForeignClass> {
        self.classes.iter()
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Members declared directly in `class` with the given name, in declaration order.
    pub fn declared_members<'a>(
        &'a self,
        class: ClassId,
        name: &'a str,
    ) -> impl Iterator<Item = &'a RawMember> + 'a {
        self.class(class)
            .into_iter()
            .flat_map(|class| class.members.iter())
            .filter_map(|id| self.member(*id))
            .filter(move |member| member.name == name)
    }

    /// Direct supertypes known to the store: superclass first, then interfaces in declaration
    /// order. Names the store does not know are skipped.
    pub fn direct_supertypes(&self, class: ClassId) -> Vec<ClassId> {
        let Some(class) = self.class(class) else {
            return Vec::new();
        };
        class
            .direct_supertypes()
            .filter_map(|supertype| self.lookup_class(supertype.name.as_str()))
            .collect()
    }

    /// How the type parameters of `ancestor` are instantiated when seen from `class`, following
    /// the nearest supertype path. Raw supertypes instantiate parameters with their erasure.
    ///
    /// Returns `None` when `ancestor` is not a supertype of `class` known to the store.
    pub fn supertype_substitution(
        &self,
        class: ClassId,
        ancestor: ClassId,
    ) -> Option<HashMap<Name, JavaType>> {
        let mut seen = HashSet::from([class]);
        let mut queue = VecDeque::from([(class, HashMap::new())]);

        while let Some((current, substitution)) = queue.pop_front() {
            if current == ancestor {
                return Some(substitution);
            }
            let Some(decl) = self.class(current) else {
                continue;
            };
            for supertype in decl.direct_supertypes() {
                let Some(id) = self.lookup_class(supertype.name.as_str()) else {
                    continue;
                };
                let Some(super_decl) = self.class(id) else {
                    continue;
                };
                if !seen.insert(id) {
                    continue;
                }

                let params = &super_decl.type_params;
                let next: HashMap<Name, JavaType> = if supertype.args.len() == params.len() {
                    params
                        .iter()
                        .zip(&supertype.args)
                        .map(|(param, arg)| {
                            (param.name.clone(), substitute(&argument_type(arg), &substitution))
                        })
                        .collect()
                } else {
                    let scope = TypeParamScope::new(&[], params);
                    params
                        .iter()
                        .map(|param| {
                            let erased = erase(&JavaType::TypeVar(param.name.clone()), &scope);
                            (param.name.clone(), erased)
                        })
                        .collect()
                };
                queue.push_back((id, next));
            }
        }

        None
    }

    /// All transitive supertypes of `class`, nearest first (breadth-first), each listed once.
    pub fn supertypes(&self, class: ClassId) -> Result<Vec<ClassId>, InheritanceCycle> {
        let mut out = Vec::new();
        let mut seen: HashSet<ClassId> = HashSet::new();
        let mut queue: VecDeque<ClassId> = self.direct_supertypes(class).into();

        while let Some(current) = queue.pop_front() {
            if current == class {
                let name = self
                    .class(class)
                    .map(|c| c.name.clone())
                    .unwrap_or_else(|| Name::new(class.to_string()));
                return Err(InheritanceCycle { class: name });
            }
            if !seen.insert(current) {
                continue;
            }
            out.push(current);
            queue.extend(self.direct_supertypes(current));
        }

        Ok(out)
    }

    /// Enclosing classes of `class`, outermost first (not including `class` itself).
    pub fn outer_classes(&self, class: ClassId) -> Vec<ClassId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([class]);
        let mut current = self.class(class).and_then(|c| c.outer);
        while let Some(outer) = current {
            if !seen.insert(outer) {
                break;
            }
            chain.push(outer);
            current = self.class(outer).and_then(|c| c.outer);
        }
        chain.reverse();
        chain
    }

    /// Whether the class named `sub` is `sup` or inherits from it. Every reference type is a
    /// subclass of `java.lang.Object`, known to the store or not.
    pub fn is_subclass(&self, sub: &str, sup: &str) -> bool {
        if sub == sup || sup == JavaType::OBJECT {
            return true;
        }
        let Some(sub) = self.lookup_class(sub) else {
            return false;
        };
        match self.supertypes(sub) {
            Ok(supertypes) => supertypes
                .into_iter()
                .filter_map(|id| self.class(id))
                .any(|class| class.name == sup),
            Err(_) => false,
        }
    }
}

/// Wildcards are not legal supertype arguments; take their bound when one slips through.
fn argument_type(arg: &TypeArgument) -> JavaType {
    match arg {
        TypeArgument::Type(ty) => ty.clone(),
        TypeArgument::Wildcard(WildcardBound::Extends(bound) | WildcardBound::Super(bound)) => {
            (**bound).clone()
        }
        TypeArgument::Wildcard(WildcardBound::Unbounded) => JavaType::object(),
    }
}
