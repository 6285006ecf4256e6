//! The cached view of the five collections.

use gatepass_db::models::notice::Notice;
use gatepass_db::models::pre_approval::PreApproval;
use gatepass_db::models::society::Society;
use gatepass_db::models::user::User;
use gatepass_db::models::visitor::Visitor;

/// Token of the empty snapshot a context starts with.
pub const INITIAL_TOKEN: u64 = 0;

/// Five collections as of the commit identified by `token`.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub token: u64,
    pub users: Vec<User>,
    pub societies: Vec<Society>,
    pub visitors: Vec<Visitor>,
    pub notices: Vec<Notice>,
    pub pre_approvals: Vec<PreApproval>,
}

/// A record type that lives in one collection of the [`Snapshot`].
pub trait CachedRecord: Clone {
    fn record_id(&self) -> &str;

    fn slot(snapshot: &mut Snapshot) -> &mut Vec<Self>;
}

impl Snapshot {
    /// Replace the cached record with the same id, or append it.
    pub fn upsert<T: CachedRecord>(&mut self, record: T) {
        let records = T::slot(self);
        match records
            .iter()
            .position(|r| r.record_id() == record.record_id())
        {
            Some(index) => records[index] = record,
            None => records.push(record),
        }
    }

    pub fn remove<T: CachedRecord>(&mut self, id: &str) {
        T::slot(self).retain(|r| r.record_id() != id);
    }
}

macro_rules! cached_record {
    ($ty:ty, $field:ident) => {
        impl CachedRecord for $ty {
            fn record_id(&self) -> &str {
                &self.id
            }

            fn slot(snapshot: &mut Snapshot) -> &mut Vec<Self> {
                &mut snapshot.$field
            }
        }
    };
}

cached_record!(User, users);
cached_record!(Society, societies);
cached_record!(Visitor, visitors);
cached_record!(Notice, notices);
cached_record!(PreApproval, pre_approvals);
