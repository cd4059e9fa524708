use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use javelin_model::{
    erase, is_subtype, substitute, DeclarationStore, JavaType, MemberId, RawMember, RawMethod,
    TypeParamScope,
};

use crate::error::{EnhancementError, MemberOrigin, Result};
use crate::scope::MemberScope;

/// Finds the supertype members a foreign method overrides.
///
/// Matching is by JVM erasure: same name, same number of parameters, identical erased parameter
/// types and a return type that erases to a subtype of the overridden one. The candidate's
/// signature is first instantiated with the type arguments the member's class passes up to the
/// candidate's class (`StringBox extends Box<String>`). Results are memoized per member; errors
/// are not.
#[derive(Debug)]
pub struct OverrideResolver<'a> {
    store: &'a DeclarationStore,
    cache: RefCell<HashMap<MemberId, Arc<[MemberId]>>>,
}

impl<'a> OverrideResolver<'a> {
    pub fn new(store: &'a DeclarationStore) -> Self {
        Self {
            store,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Members of `supertypes` that `member` overrides, in the scope's order.
    ///
    /// Only the nearest declarations count: a candidate that another matched candidate already
    /// overrides is dropped. Fields and static methods override nothing.
    pub fn overridden_members(
        &self,
        member: &RawMember,
        supertypes: &dyn MemberScope,
    ) -> Result<Arc<[MemberId]>> {
        if let Some(cached) = self.cache.borrow().get(&member.id) {
            return Ok(Arc::clone(cached));
        }

        let mut matched = Vec::new();
        if member.as_method().is_some() && !member.is_static() {
            for candidate_id in supertypes.members_by_name(member.name.as_str())? {
                let candidate = self
                    .store
                    .member(candidate_id)
                    .ok_or(EnhancementError::UnknownMember(candidate_id))?;
                if candidate.id == member.id || candidate.owner == member.owner {
                    return Err(EnhancementError::OverrideCycle {
                        origin: MemberOrigin::of(self.store, member),
                        overridden: MemberOrigin::of(self.store, candidate),
                    });
                }
                if self.is_override_compatible(member, candidate) {
                    tracing::trace!(
                        target: "javelin.enhance",
                        member = %member.id,
                        overridden = %candidate.id,
                        "override matched"
                    );
                    matched.push(candidate);
                }
            }
        }

        let overridden: Arc<[MemberId]> = matched
            .iter()
            .filter(|candidate| !self.is_hidden(candidate, &matched))
            .map(|candidate| candidate.id)
            .collect();
        self.cache
            .borrow_mut()
            .insert(member.id, Arc::clone(&overridden));
        Ok(overridden)
    }

    /// Whether a nearer declaration among `matched` already overrides `candidate`.
    fn is_hidden(&self, candidate: &RawMember, matched: &[&RawMember]) -> bool {
        matched.iter().any(|nearer| {
            nearer.owner != candidate.owner
                && self
                    .store
                    .supertype_substitution(nearer.owner, candidate.owner)
                    .is_some()
                && self.is_override_compatible(nearer, candidate)
        })
    }

    /// Whether `member` can override `candidate`, judging by signatures alone.
    pub fn is_override_compatible(&self, member: &RawMember, candidate: &RawMember) -> bool {
        let (Some(derived), Some(base)) = (member.as_method(), candidate.as_method()) else {
            return false;
        };
        if derived.is_static
            || base.is_static
            || member.name != candidate.name
            || derived.params.len() != base.params.len()
            || derived.receiver.is_some() != base.receiver.is_some()
        {
            return false;
        }

        let derived_erased = self.erased_signature(member, derived);
        let base_erased = self.erased_base_signature(member, candidate, base);
        if derived_erased.params != base_erased.params {
            return false;
        }
        is_subtype(self.store, &derived_erased.returns, &base_erased.returns)
    }

    /// Erasure of `candidate` after instantiating its class' type parameters as `member`'s class
    /// sees them. Unrelated classes fall back to the candidate's own erasure.
    fn erased_base_signature(
        &self,
        member: &RawMember,
        candidate: &RawMember,
        base: &RawMethod,
    ) -> ErasedSignature {
        let Some(mut substitution) = self
            .store
            .supertype_substitution(member.owner, candidate.owner)
        else {
            return self.erased_signature(candidate, base);
        };
        // Method type parameters shadow the class' ones.
        for param in &base.type_params {
            substitution.remove(&param.name);
        }

        let class_params = self
            .store
            .class(member.owner)
            .map(|class| class.type_params.as_slice())
            .unwrap_or_default();
        let scope = TypeParamScope::new(&base.type_params, class_params);
        let erase_in_member = |ty: &JavaType| erase(&substitute(ty, &substitution), &scope);
        ErasedSignature {
            params: base
                .receiver
                .iter()
                .chain(base.params.iter().map(|param| &param.ty))
                .map(|ty| erase_in_member(&ty.ty))
                .collect(),
            returns: erase_in_member(&base.return_type.ty),
        }
    }

    fn erased_signature(&self, member: &RawMember, method: &RawMethod) -> ErasedSignature {
        let class_params = self
            .store
            .class(member.owner)
            .map(|class| class.type_params.as_slice())
            .unwrap_or_default();
        let scope = TypeParamScope::new(&method.type_params, class_params);
        ErasedSignature {
            params: method
                .receiver
                .iter()
                .chain(method.params.iter().map(|param| &param.ty))
                .map(|ty| erase(&ty.ty, &scope))
                .collect(),
            returns: erase(&method.return_type.ty, &scope),
        }
    }
}

struct ErasedSignature {
    params: Vec<JavaType>,
    returns: JavaType,
}
