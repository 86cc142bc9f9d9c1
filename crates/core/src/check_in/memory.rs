//! In-process [`MemberStore`] backed by a mutex-guarded vector.
//!
//! Used by tests and local demos. The mutex serializes check-ins, which
//! gives the per-member atomicity the processor relies on.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::phone::phones_match;
use crate::types::DbId;

use super::decide_visit;
use super::store::{MemberSnapshot, MemberStore, StoreError, VisitOutcome, VisitRequest};

#[derive(Debug, Default)]
pub struct InMemoryMemberStore {
    members: Mutex<Vec<MemberSnapshot>>,
}

impl InMemoryMemberStore {
    pub fn new(members: Vec<MemberSnapshot>) -> Self {
        Self {
            members: Mutex::new(members),
        }
    }

    /// Current copy of a member, for assertions.
    pub async fn get(&self, id: DbId) -> Option<MemberSnapshot> {
        self.members.lock().await.iter().find(|m| m.id == id).cloned()
    }

    /// Current copy of every member.
    pub async fn all(&self) -> Vec<MemberSnapshot> {
        self.members.lock().await.clone()
    }
}

#[async_trait]
impl MemberStore for InMemoryMemberStore {
    async fn find_by_phone(&self, phone_digits: &str) -> Result<Option<MemberSnapshot>, StoreError> {
        let members = self.members.lock().await;
        Ok(members
            .iter()
            .find(|m| phones_match(&m.phone, phone_digits))
            .cloned())
    }

    async fn record_check_in(
        &self,
        member_id: DbId,
        request: &VisitRequest,
    ) -> Result<Option<VisitOutcome>, StoreError> {
        let mut members = self.members.lock().await;
        let Some(member) = members.iter_mut().find(|m| m.id == member_id) else {
            return Ok(None);
        };

        let Some(update) = decide_visit(member, request) else {
            return Ok(Some(VisitOutcome::AlreadyCheckedIn));
        };

        member.visit_count += 1;
        member.last_visit_date = Some(update.visited_on);
        if update.consume_count {
            if let Some(count) = member.remain_count.as_mut() {
                *count -= 1;
            }
        }

        Ok(Some(VisitOutcome::Recorded {
            update,
            member: member.clone(),
        }))
    }
}
