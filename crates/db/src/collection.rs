//! The five record collections and their storage names.

use std::fmt;

/// A named record collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Users,
    Societies,
    Visitors,
    Notices,
    PreApprovals,
}

impl Collection {
    /// Every collection, in refresh order.
    pub const ALL: [Collection; 5] = [
        Collection::Users,
        Collection::Societies,
        Collection::Visitors,
        Collection::Notices,
        Collection::PreApprovals,
    ];

    /// Storage name (file stem for the local store, `collection` column remotely).
    pub fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Societies => "societies",
            Self::Visitors => "visitors",
            Self::Notices => "notices",
            Self::PreApprovals => "preApprovals",
        }
    }

    /// Visitors and pre-approvals are never deleted, only re-statused.
    pub fn supports_delete(self) -> bool {
        matches!(self, Self::Users | Self::Societies | Self::Notices)
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
