use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use javelin_model::MemberId;

use crate::error::{EnhancementError, MemberOrigin, Result};
use crate::member::EnhancedMember;

/// Where a member is in its enhancement lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    Unseen,
    InProgress,
    Done,
}

#[derive(Debug)]
enum Entry {
    InProgress,
    Done(Arc<EnhancedMember>),
}

/// Memoizes enhanced members by id.
///
/// A member is enhanced at most once per cache; later lookups return the same `Arc`. Asking for
/// a member while its own enhancement is still running is an error rather than a deadlock, and a
/// failed enhancement leaves no trace, so the next lookup retries from scratch.
#[derive(Debug, Default)]
pub struct EnhancementCache {
    entries: RefCell<HashMap<MemberId, Entry>>,
}

impl EnhancementCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: MemberId) -> CacheState {
        match self.entries.borrow().get(&id) {
            None => CacheState::Unseen,
            Some(Entry::InProgress) => CacheState::InProgress,
            Some(Entry::Done(_)) => CacheState::Done,
        }
    }

    /// Number of finished entries.
    pub fn len(&self) -> usize {
        self.entries
            .borrow()
            .values()
            .filter(|entry| matches!(entry, Entry::Done(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_or_enhance(
        &self,
        id: MemberId,
        origin: impl FnOnce() -> MemberOrigin,
        compute: impl FnOnce() -> Result<EnhancedMember>,
    ) -> Result<Arc<EnhancedMember>> {
        {
            let mut entries = self.entries.borrow_mut();
            match entries.get(&id) {
                Some(Entry::Done(member)) => {
                    tracing::trace!(target: "javelin.enhance", member = %id, "cache hit");
                    return Ok(Arc::clone(member));
                }
                Some(Entry::InProgress) => {
                    return Err(EnhancementError::ReentrantEnhancement { origin: origin() });
                }
                None => {
                    entries.insert(id, Entry::InProgress);
                }
            }
        }

        // `compute` may look up other members through the same cache.
        let result = compute();

        let mut entries = self.entries.borrow_mut();
        match result {
            Ok(member) => {
                let member = Arc::new(member);
                entries.insert(id, Entry::Done(Arc::clone(&member)));
                Ok(member)
            }
            Err(err) => {
                entries.remove(&id);
                Err(err)
            }
        }
    }
}
