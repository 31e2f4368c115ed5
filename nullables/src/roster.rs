//! Nullable committee roster.

use lss_external::CommitteeRoster;
use lss_types::Address;
use std::collections::BTreeSet;
use std::sync::Mutex;

#[derive(Default)]
pub struct NullRoster {
    members: Mutex<BTreeSet<Address>>,
}

impl NullRoster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_members(members: impl IntoIterator<Item = Address>) -> Self {
        Self {
            members: Mutex::new(members.into_iter().collect()),
        }
    }

    pub fn add(&self, member: Address) {
        self.members.lock().unwrap().insert(member);
    }

    pub fn remove(&self, member: &Address) {
        self.members.lock().unwrap().remove(member);
    }
}

impl CommitteeRoster for NullRoster {
    fn is_member(&self, account: &Address) -> bool {
        self.members.lock().unwrap().contains(account)
    }

    fn member_count(&self) -> u32 {
        self.members.lock().unwrap().len() as u32
    }
}
