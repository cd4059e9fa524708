use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use javelin_config::{EnhancementConfig, FallbackConfig};
use javelin_model::{package_of, ClassId, DeclarationStore, MemberId, RawMember, RawMemberKind};

use crate::cache::EnhancementCache;
use crate::context::QualifierContext;
use crate::descriptor::SignatureDescriptorBuilder;
use crate::error::{EnhancementError, MemberOrigin, Result};
use crate::member::{
    EnhancedField, EnhancedFunction, EnhancedMember, EnhancedMemberKind, EnhancedParameter,
};
use crate::overrides::OverrideResolver;
use crate::predefined::{predefined_enhancement, PredefinedEnhancementInfo, TypeEnhancementInfo};
use crate::qualifiers::AnnotationQualifierResolver;
use crate::signature::{
    OverriddenPosition, ResolvedType, SignatureEnhancer, SignatureParts, TypeInSignature,
};

/// Source of raw member candidates by name.
pub trait MemberScope {
    fn members_by_name(&self, name: &str) -> Result<Vec<MemberId>>;
}

/// The members of one class as seen from native code, before enhancement.
pub trait UseSiteScope: MemberScope {
    fn owner(&self) -> ClassId;

    /// Members inherited by [`UseSiteScope::owner`], searched for overridden members.
    fn supertypes_scope(&self) -> &dyn MemberScope;
}

/// Members declared in any transitive supertype of a class, nearest supertype first.
#[derive(Debug, Clone, Copy)]
pub struct SupertypesScope<'a> {
    store: &'a DeclarationStore,
    class: ClassId,
}

impl<'a> SupertypesScope<'a> {
    pub fn new(store: &'a DeclarationStore, class: ClassId) -> Self {
        Self { store, class }
    }
}

impl MemberScope for SupertypesScope<'_> {
    fn members_by_name(&self, name: &str) -> Result<Vec<MemberId>> {
        if self.store.class(self.class).is_none() {
            return Err(EnhancementError::UnknownClass(self.class));
        }
        let mut out = Vec::new();
        for supertype in self.store.supertypes(self.class)? {
            out.extend(
                self.store
                    .declared_members(supertype, name)
                    .map(|member| member.id),
            );
        }
        Ok(out)
    }
}

/// Members declared directly in one class of a [`DeclarationStore`].
#[derive(Debug, Clone, Copy)]
pub struct ClassUseSiteScope<'a> {
    store: &'a DeclarationStore,
    owner: ClassId,
    supertypes: SupertypesScope<'a>,
}

impl<'a> ClassUseSiteScope<'a> {
    pub fn new(store: &'a DeclarationStore, owner: ClassId) -> Self {
        Self {
            store,
            owner,
            supertypes: SupertypesScope::new(store, owner),
        }
    }
}

impl MemberScope for ClassUseSiteScope<'_> {
    fn members_by_name(&self, name: &str) -> Result<Vec<MemberId>> {
        if self.store.class(self.owner).is_none() {
            return Err(EnhancementError::UnknownClass(self.owner));
        }
        Ok(self
            .store
            .declared_members(self.owner, name)
            .map(|member| member.id)
            .collect())
    }
}

impl UseSiteScope for ClassUseSiteScope<'_> {
    fn owner(&self) -> ClassId {
        self.owner
    }

    fn supertypes_scope(&self) -> &dyn MemberScope {
        &self.supertypes
    }
}

/// Lazily enhancing view over a use-site scope.
///
/// Each member is enhanced on first lookup and memoized; repeated lookups return the same
/// [`Arc`]. The scope is single-threaded (`!Sync`); give every worker its own scope over the
/// shared [`DeclarationStore`].
pub struct EnhancementScope<'a, S> {
    store: &'a DeclarationStore,
    use_site: S,
    resolver: AnnotationQualifierResolver<'a>,
    fallback: FallbackConfig,
    overrides: OverrideResolver<'a>,
    descriptors: SignatureDescriptorBuilder<'a>,
    class_contexts: RefCell<HashMap<ClassId, QualifierContext>>,
    cache: EnhancementCache,
}

impl<'a, S: UseSiteScope> EnhancementScope<'a, S> {
    pub fn new(store: &'a DeclarationStore, use_site: S, config: &EnhancementConfig) -> Self {
        Self {
            store,
            use_site,
            resolver: AnnotationQualifierResolver::new(store, config),
            fallback: config.fallback,
            overrides: OverrideResolver::new(store),
            descriptors: SignatureDescriptorBuilder::new(store),
            class_contexts: RefCell::new(HashMap::new()),
            cache: EnhancementCache::new(),
        }
    }

    pub fn use_site(&self) -> &S {
        &self.use_site
    }

    pub fn cache(&self) -> &EnhancementCache {
        &self.cache
    }

    /// Every candidate named `name`, fields and methods alike.
    pub fn lookup_by_name(&self, name: &str) -> Result<Vec<Arc<EnhancedMember>>> {
        self.use_site
            .members_by_name(name)?
            .into_iter()
            .map(|id| self.enhanced(id))
            .collect()
    }

    pub fn fields_by_name(&self, name: &str) -> Result<Vec<Arc<EnhancedMember>>> {
        self.lookup_shaped(name, "foreign field", |member| member.as_field().is_some())
    }

    pub fn functions_by_name(&self, name: &str) -> Result<Vec<Arc<EnhancedMember>>> {
        self.lookup_shaped(name, "foreign method", |member| member.as_method().is_some())
    }

    /// Enhance a single member. Only foreign members can be enhanced.
    ///
    /// Members of the use-site class see the use-site's supertypes; members of other classes
    /// (overridden members, mostly) see their own class' supertypes.
    pub fn enhanced(&self, id: MemberId) -> Result<Arc<EnhancedMember>> {
        let raw = self.raw(id)?;
        if !raw.is_foreign() {
            return Err(self.unexpected_shape(raw, "foreign field or method"));
        }
        self.cache
            .get_or_enhance(
                id,
                || MemberOrigin::of(self.store, raw),
                || {
                    if raw.owner == self.use_site.owner() {
                        self.enhance_member(raw, self.use_site.supertypes_scope())
                    } else {
                        self.enhance_member(raw, &SupertypesScope::new(self.store, raw.owner))
                    }
                },
            )
            .inspect_err(|err| {
                if err.is_internal() {
                    tracing::error!(
                        target: "javelin.enhance",
                        member = %id,
                        error = %err,
                        "enhancement invariant violated"
                    );
                }
            })
    }

    fn lookup_shaped(
        &self,
        name: &str,
        expected: &'static str,
        accepts: impl Fn(&RawMember) -> bool,
    ) -> Result<Vec<Arc<EnhancedMember>>> {
        let mut out = Vec::new();
        for id in self.use_site.members_by_name(name)? {
            let raw = self.raw(id)?;
            if !raw.is_foreign() || !accepts(raw) {
                return Err(self.unexpected_shape(raw, expected));
            }
            out.push(self.enhanced(id)?);
        }
        Ok(out)
    }

    fn raw(&self, id: MemberId) -> Result<&'a RawMember> {
        self.store.member(id).ok_or(EnhancementError::UnknownMember(id))
    }

    fn unexpected_shape(&self, raw: &RawMember, expected: &'static str) -> EnhancementError {
        EnhancementError::UnexpectedShape {
            origin: MemberOrigin::of(self.store, raw),
            expected,
            found: raw.shape(),
        }
    }

    /// Defaults in effect inside `class`: its package, then its enclosing classes outermost
    /// first, then the class itself.
    fn class_context(&self, class: ClassId) -> Result<QualifierContext> {
        if let Some(context) = self.class_contexts.borrow().get(&class) {
            return Ok(context.clone());
        }

        let decl = self
            .store
            .class(class)
            .ok_or(EnhancementError::UnknownClass(class))?;
        let mut context = QualifierContext::empty().merge(
            &self.resolver,
            self.store.package_annotations(package_of(decl.name.as_str())),
        );
        for outer in self.store.outer_classes(class) {
            if let Some(outer) = self.store.class(outer) {
                context = context.merge(&self.resolver, &outer.annotations);
            }
        }
        context = context.merge(&self.resolver, &decl.annotations);

        self.class_contexts
            .borrow_mut()
            .insert(class, context.clone());
        Ok(context)
    }

    fn member_context(&self, raw: &RawMember) -> Result<QualifierContext> {
        Ok(self
            .class_context(raw.owner)?
            .merge(&self.resolver, &raw.annotations))
    }

    /// Context for one type position: the member context, then parameter annotations, then the
    /// annotations on the type itself.
    fn position_context(
        &self,
        raw: &RawMember,
        position: TypeInSignature,
        member_context: &QualifierContext,
    ) -> QualifierContext {
        let container = match position {
            TypeInSignature::ValueParameter(_) => {
                member_context.merge(&self.resolver, position.container_annotations(raw))
            }
            TypeInSignature::Return | TypeInSignature::Receiver => member_context.clone(),
        };
        match position.type_ref(raw) {
            Some(type_ref) => container.merge(&self.resolver, &type_ref.annotations),
            None => container,
        }
    }

    fn enhance_member(
        &self,
        raw: &'a RawMember,
        supertypes: &dyn MemberScope,
    ) -> Result<EnhancedMember> {
        let owner_name = self
            .store
            .class(raw.owner)
            .ok_or(EnhancementError::UnknownClass(raw.owner))?
            .name
            .clone();
        let member_context = self.member_context(raw)?;
        let overridden_ids = self.overrides.overridden_members(raw, supertypes)?;
        let mut overridden = Vec::with_capacity(overridden_ids.len());
        for id in overridden_ids.iter() {
            let base = self.raw(*id)?;
            let enhanced = if base.is_foreign() {
                Some(self.enhanced(base.id)?)
            } else {
                None
            };
            overridden.push(OverriddenMember {
                raw: base,
                context: self.member_context(base)?,
                enhanced,
            });
        }

        let enhancer = SignatureEnhancer::new(&self.resolver, self.fallback);
        let resolve = |position: TypeInSignature, predefined: Option<TypeEnhancementInfo>| {
            self.resolve_position(
                &enhancer,
                raw,
                position,
                &member_context,
                &overridden,
                predefined,
            )
        };

        let (kind, predefined) = match &raw.kind {
            RawMemberKind::Field(field) => {
                let ty = resolve(TypeInSignature::Return, None)
                    .ok_or_else(|| self.unexpected_shape(raw, "typed field"))?;
                let kind = EnhancedMemberKind::Field(EnhancedField {
                    ty,
                    is_static: field.is_static,
                    is_final: field.is_final,
                });
                (kind, false)
            }
            RawMemberKind::Method(method) => {
                let info = self.predefined_info(owner_name.as_str(), raw)?;
                let jvm_param = |index: usize| {
                    info.and_then(|info| info.parameters.get(index).copied().flatten())
                };
                let offset = usize::from(method.receiver.is_some());

                let receiver = if method.receiver.is_some() {
                    resolve(TypeInSignature::Receiver, jvm_param(0))
                } else {
                    None
                };
                let mut params = Vec::with_capacity(method.params.len());
                for (index, param) in method.params.iter().enumerate() {
                    let ty = resolve(
                        TypeInSignature::ValueParameter(index),
                        jvm_param(index + offset),
                    )
                    .ok_or_else(|| self.unexpected_shape(raw, "typed parameter"))?;
                    params.push(EnhancedParameter {
                        name: param.name.clone(),
                        ty,
                        annotations: param.annotations.clone(),
                        is_varargs: param.is_varargs,
                    });
                }
                let return_type = resolve(
                    TypeInSignature::Return,
                    info.and_then(|info| info.return_info),
                )
                .ok_or_else(|| self.unexpected_shape(raw, "typed method"))?;

                let kind = EnhancedMemberKind::Function(EnhancedFunction {
                    type_params: method.type_params.clone(),
                    receiver,
                    params,
                    return_type,
                    is_static: method.is_static,
                    is_abstract: method.is_abstract,
                });
                (kind, info.is_some())
            }
        };

        tracing::debug!(
            target: "javelin.enhance",
            member = %raw.id,
            owner = %owner_name,
            name = %raw.name,
            overridden = overridden_ids.len(),
            predefined,
            "enhanced member"
        );

        Ok(EnhancedMember {
            id: raw.id,
            owner: raw.owner,
            owner_name,
            name: raw.name.clone(),
            annotations: raw.annotations.clone(),
            kind,
            overridden: overridden_ids.to_vec(),
            predefined,
        })
    }

    /// Predefined correction for a method, checked against its JVM arity.
    fn predefined_info(
        &self,
        owner: &str,
        raw: &RawMember,
    ) -> Result<Option<&'static PredefinedEnhancementInfo>> {
        let Some(method) = raw.as_method() else {
            return Ok(None);
        };
        let signature = self.descriptors.signature(owner, raw);
        let Some(info) = predefined_enhancement(&signature) else {
            return Ok(None);
        };
        let arity = method.params.len() + usize::from(method.receiver.is_some());
        if info.parameters.len() != arity {
            return Err(EnhancementError::PredefinedArityMismatch {
                origin: MemberOrigin::of(self.store, raw),
                expected: arity,
                found: info.parameters.len(),
            });
        }
        tracing::trace!(target: "javelin.enhance", signature = %signature, "predefined enhancement");
        Ok(Some(info))
    }

    fn resolve_position(
        &self,
        enhancer: &SignatureEnhancer<'_, '_>,
        raw: &RawMember,
        position: TypeInSignature,
        member_context: &QualifierContext,
        overridden: &[OverriddenMember<'_>],
        predefined: Option<TypeEnhancementInfo>,
    ) -> Option<ResolvedType> {
        let type_ref = position.type_ref(raw)?;
        let overridden = overridden
            .iter()
            .filter_map(|base| {
                Some(OverriddenPosition {
                    type_ref: position.type_ref(base.raw)?,
                    resolved: base
                        .enhanced
                        .as_deref()
                        .and_then(|enhanced| enhanced.resolved_at(position)),
                    container_annotations: position.container_annotations(base.raw),
                    context: self.position_context(base.raw, position, &base.context),
                    applicability: position.applicability(base.raw),
                })
            })
            .collect();

        Some(enhancer.enhance(&SignatureParts {
            position,
            type_ref,
            container_annotations: position.container_annotations(raw),
            overridden,
            context: self.position_context(raw, position, member_context),
            applicability: position.applicability(raw),
            predefined,
        }))
    }
}

/// A member overridden by the one being enhanced.
struct OverriddenMember<'a> {
    raw: &'a RawMember,
    context: QualifierContext,
    /// `None` for native members, which are never enhanced.
    enhanced: Option<Arc<EnhancedMember>>,
}

impl<S: UseSiteScope + std::fmt::Debug> std::fmt::Debug for EnhancementScope<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnhancementScope")
            .field("use_site", &self.use_site)
            .field("resolver", &self.resolver)
            .field("cached", &self.cache.len())
            .finish_non_exhaustive()
    }
}
