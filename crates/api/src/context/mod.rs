//! Shared cached view of the record store.
//!
//! [`DataContext`] owns one [`Snapshot`] of all five collections over the
//! active [`StorageProvider`]. Derived queries read only the snapshot;
//! lookups named `get_*`/`fetch_*` go to the backend.
//!
//! Every commit to the snapshot carries a token from one monotonic counter.
//! A refresh takes its token when it starts and is only applied if, when its
//! fetch completes, no newer commit has landed in the meantime. A write
//! performs one backend write, commits the confirmed record as a patch under
//! a fresh token, then refreshes. A refresh that started before the write
//! therefore can never overwrite it.

pub mod snapshot;

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use gatepass_core::roles::{RoleKind, RoleStatus};
use gatepass_db::models::notice::{CreateNotice, Notice};
use gatepass_db::models::pre_approval::{CreatePreApproval, PreApproval, UpdatePreApproval};
use gatepass_db::models::society::{CreateSociety, Society, UpdateSociety};
use gatepass_db::models::user::{CreateUser, UpdateUser, User};
use gatepass_db::models::visitor::{CreateVisitor, UpdateVisitor, Visitor};
use gatepass_db::repositories::{NoticeRepo, PreApprovalRepo, SocietyRepo, UserRepo, VisitorRepo};
use gatepass_db::{BackendKind, StorageError, StorageProvider};
use tokio::sync::{Mutex, MutexGuard, RwLock};

pub use snapshot::{CachedRecord, Snapshot, INITIAL_TOKEN};

/// What happened to one call of [`DataContext::refresh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The fetched collections replaced the snapshot.
    Applied { token: u64 },
    /// A newer commit landed while fetching; the result was dropped.
    Discarded { token: u64 },
    /// A collection could not be read; the snapshot is unchanged.
    Failed,
}

pub struct DataContext {
    store: Arc<dyn StorageProvider>,
    cache: RwLock<Snapshot>,
    next_token: AtomicU64,
    in_flight: AtomicUsize,
    pass_transitions: Mutex<()>,
}

/// Decrements the in-flight refresh count on drop.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl DataContext {
    /// Wrap a provider with an empty cache. Call [`refresh`](Self::refresh)
    /// to load it.
    pub fn new(store: Arc<dyn StorageProvider>) -> Self {
        Self {
            store,
            cache: RwLock::new(Snapshot::default()),
            next_token: AtomicU64::new(INITIAL_TOKEN),
            in_flight: AtomicUsize::new(0),
            pass_transitions: Mutex::new(()),
        }
    }

    /// Wrap a provider and load the cache once.
    pub async fn load(store: Arc<dyn StorageProvider>) -> Self {
        let context = Self::new(store);
        context.refresh().await;
        context
    }

    pub fn backend(&self) -> BackendKind {
        self.store.kind()
    }

    pub fn store(&self) -> &dyn StorageProvider {
        self.store.as_ref()
    }

    /// Whether any refresh is currently fetching.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    fn take_token(&self) -> u64 {
        self.next_token.fetch_add(1, Ordering::SeqCst) + 1
    }

    // -----------------------------------------------------------------------
    // Refresh
    // -----------------------------------------------------------------------

    /// Reload all five collections from the backend.
    ///
    /// The collections are fetched concurrently. If any fetch fails the
    /// whole refresh is abandoned and every cached collection is kept.
    pub async fn refresh(&self) -> RefreshOutcome {
        let _in_flight = InFlight::enter(&self.in_flight);
        let token = self.take_token();
        let store = self.store.as_ref();

        let fetched = tokio::try_join!(
            UserRepo::list(store),
            SocietyRepo::list(store),
            VisitorRepo::list(store),
            NoticeRepo::list(store),
            PreApprovalRepo::list(store),
        );

        let (users, societies, visitors, notices, pre_approvals) = match fetched {
            Ok(collections) => collections,
            Err(e) => {
                tracing::warn!(error = %e, token, "Refresh failed, keeping cached data");
                return RefreshOutcome::Failed;
            }
        };

        let mut cache = self.cache.write().await;
        if token < cache.token {
            tracing::debug!(token, current = cache.token, "Discarding stale refresh");
            return RefreshOutcome::Discarded { token };
        }
        *cache = Snapshot {
            token,
            users,
            societies,
            visitors,
            notices,
            pre_approvals,
        };
        RefreshOutcome::Applied { token }
    }

    /// Commit one confirmed record into the cache under a fresh token.
    async fn patch_upsert<T: CachedRecord>(&self, record: T) {
        let mut cache = self.cache.write().await;
        cache.token = self.take_token();
        cache.upsert(record);
    }

    async fn patch_remove<T: CachedRecord>(&self, id: &str) {
        let mut cache = self.cache.write().await;
        cache.token = self.take_token();
        cache.remove::<T>(id);
    }

    /// Patch the cache with a write's result, then refresh.
    async fn settle<T: CachedRecord>(&self, record: T) -> T {
        self.patch_upsert(record.clone()).await;
        self.refresh().await;
        record
    }

    async fn settle_removal<T: CachedRecord>(&self, id: &str) {
        self.patch_remove::<T>(id).await;
        self.refresh().await;
    }

    // -----------------------------------------------------------------------
    // Snapshot accessors
    // -----------------------------------------------------------------------

    /// A copy of the whole snapshot.
    pub async fn snapshot(&self) -> Snapshot {
        self.cache.read().await.clone()
    }

    pub async fn snapshot_token(&self) -> u64 {
        self.cache.read().await.token
    }

    pub async fn users(&self) -> Vec<User> {
        self.cache.read().await.users.clone()
    }

    pub async fn societies(&self) -> Vec<Society> {
        self.cache.read().await.societies.clone()
    }

    pub async fn visitors(&self) -> Vec<Visitor> {
        self.cache.read().await.visitors.clone()
    }

    pub async fn notices(&self) -> Vec<Notice> {
        self.cache.read().await.notices.clone()
    }

    pub async fn pre_approvals(&self) -> Vec<PreApproval> {
        self.cache.read().await.pre_approvals.clone()
    }

    // -----------------------------------------------------------------------
    // Users
    // -----------------------------------------------------------------------

    pub async fn add_user(&self, input: &CreateUser) -> Result<User, StorageError> {
        let user = UserRepo::create(self.store(), input).await?;
        tracing::info!(user_id = %user.id, "User added");
        Ok(self.settle(user).await)
    }

    pub async fn update_user(&self, id: &str, input: &UpdateUser) -> Result<User, StorageError> {
        let user = UserRepo::update(self.store(), id, input).await?;
        Ok(self.settle(user).await)
    }

    pub async fn delete_user(&self, id: &str) -> Result<(), StorageError> {
        UserRepo::delete(self.store(), id).await?;
        tracing::info!(user_id = %id, "User deleted");
        self.settle_removal::<User>(id).await;
        Ok(())
    }

    pub async fn get_user_by_id(&self, id: &str) -> Option<User> {
        degrade(UserRepo::find_by_id(self.store(), id).await, "user by id")
    }

    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        degrade(UserRepo::find_by_email(self.store(), email).await, "user by email")
    }

    pub async fn get_user_by_login_name(&self, login_name: &str) -> Option<User> {
        degrade(
            UserRepo::find_by_login_name(self.store(), login_name).await,
            "user by login name",
        )
    }

    // -----------------------------------------------------------------------
    // Societies
    // -----------------------------------------------------------------------

    pub async fn add_society(&self, input: &CreateSociety) -> Result<Society, StorageError> {
        let society = SocietyRepo::create(self.store(), input).await?;
        tracing::info!(society_id = %society.id, name = %society.name, "Society added");
        Ok(self.settle(society).await)
    }

    pub async fn update_society(
        &self,
        id: &str,
        input: &UpdateSociety,
    ) -> Result<Society, StorageError> {
        let society = SocietyRepo::update(self.store(), id, input).await?;
        Ok(self.settle(society).await)
    }

    pub async fn delete_society(&self, id: &str) -> Result<(), StorageError> {
        SocietyRepo::delete(self.store(), id).await?;
        tracing::info!(society_id = %id, "Society deleted");
        self.settle_removal::<Society>(id).await;
        Ok(())
    }

    /// Cached society by id.
    pub async fn society_by_id(&self, id: &str) -> Option<Society> {
        self.cache
            .read()
            .await
            .societies
            .iter()
            .find(|s| s.id == id)
            .cloned()
    }

    /// Society by id, read from the backend.
    pub async fn fetch_society_by_id(&self, id: &str) -> Option<Society> {
        degrade(SocietyRepo::find_by_id(self.store(), id).await, "society by id")
    }

    /// Whether the cached society's permission window contains the current
    /// time. Unknown ids are inactive.
    pub async fn is_society_active(&self, id: &str) -> bool {
        self.society_by_id(id)
            .await
            .is_some_and(|s| s.is_active_at(Utc::now()))
    }

    // -----------------------------------------------------------------------
    // Visitors
    // -----------------------------------------------------------------------

    pub async fn add_visitor(&self, input: &CreateVisitor) -> Result<Visitor, StorageError> {
        let visitor = VisitorRepo::create(self.store(), input).await?;
        tracing::info!(
            visitor_id = %visitor.id,
            society_id = %visitor.society_id,
            resident_id = %visitor.resident_id,
            "Visitor entry recorded"
        );
        Ok(self.settle(visitor).await)
    }

    /// Apply a partial update to a visitor. Status and exit time are written
    /// as given; workflow guards live in [`crate::workflow::visits`].
    pub async fn update_visitor(
        &self,
        id: &str,
        input: &UpdateVisitor,
    ) -> Result<Visitor, StorageError> {
        let visitor = VisitorRepo::update(self.store(), id, input).await?;
        Ok(self.settle(visitor).await)
    }

    pub async fn get_visitor_by_id(&self, id: &str) -> Option<Visitor> {
        degrade(VisitorRepo::find_by_id(self.store(), id).await, "visitor by id")
    }

    pub async fn visitors_by_society(&self, society_id: &str) -> Vec<Visitor> {
        self.cache
            .read()
            .await
            .visitors
            .iter()
            .filter(|v| v.society_id == society_id)
            .cloned()
            .collect()
    }

    pub async fn visitors_by_resident(&self, resident_id: &str) -> Vec<Visitor> {
        self.cache
            .read()
            .await
            .visitors
            .iter()
            .filter(|v| v.resident_id == resident_id)
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Notices
    // -----------------------------------------------------------------------

    pub async fn add_notice(&self, input: &CreateNotice) -> Result<Notice, StorageError> {
        let notice = NoticeRepo::create(self.store(), input).await?;
        Ok(self.settle(notice).await)
    }

    pub async fn delete_notice(&self, id: &str) -> Result<(), StorageError> {
        NoticeRepo::delete(self.store(), id).await?;
        self.settle_removal::<Notice>(id).await;
        Ok(())
    }

    pub async fn notices_by_society(&self, society_id: &str) -> Vec<Notice> {
        self.cache
            .read()
            .await
            .notices
            .iter()
            .filter(|n| n.society_id == society_id)
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Pre-approvals
    // -----------------------------------------------------------------------

    pub async fn add_pre_approval(
        &self,
        input: &CreatePreApproval,
    ) -> Result<PreApproval, StorageError> {
        let pass = PreApprovalRepo::create(self.store(), input).await?;
        Ok(self.settle(pass).await)
    }

    pub async fn update_pre_approval(
        &self,
        id: &str,
        input: &UpdatePreApproval,
    ) -> Result<PreApproval, StorageError> {
        let pass = PreApprovalRepo::update(self.store(), id, input).await?;
        Ok(self.settle(pass).await)
    }

    /// Hold while a pass is read, checked and moved out of `valid`.
    ///
    /// Every status transition of a pre-approval goes through this guard,
    /// so two gate entries cannot both redeem the same pass.
    pub async fn lock_pre_approvals(&self) -> MutexGuard<'_, ()> {
        self.pass_transitions.lock().await
    }

    /// Return a claimed pass to `valid` and clear its `usedAt`.
    pub async fn release_pre_approval(&self, id: &str) -> Result<PreApproval, StorageError> {
        let pass = PreApprovalRepo::release(self.store(), id).await?;
        tracing::warn!(pre_approval_id = %id, "Pre-approval released");
        Ok(self.settle(pass).await)
    }

    pub async fn get_pre_approval_by_id(&self, id: &str) -> Option<PreApproval> {
        degrade(
            PreApprovalRepo::find_by_id(self.store(), id).await,
            "pre-approval by id",
        )
    }

    pub async fn pre_approvals_by_society(&self, society_id: &str) -> Vec<PreApproval> {
        self.cache
            .read()
            .await
            .pre_approvals
            .iter()
            .filter(|p| p.society_id == society_id)
            .cloned()
            .collect()
    }

    pub async fn pre_approvals_by_resident(&self, resident_id: &str) -> Vec<PreApproval> {
        self.cache
            .read()
            .await
            .pre_approvals
            .iter()
            .filter(|p| p.resident_id == resident_id)
            .cloned()
            .collect()
    }

    // -----------------------------------------------------------------------
    // Membership queries
    // -----------------------------------------------------------------------

    /// The active (non-resigned) superadmin, if any.
    pub async fn superadmin(&self) -> Option<User> {
        self.cache
            .read()
            .await
            .users
            .iter()
            .find(|u| u.is_active_superadmin())
            .cloned()
    }

    pub async fn has_superadmin(&self) -> bool {
        self.cache
            .read()
            .await
            .users
            .iter()
            .any(User::is_active_superadmin)
    }

    async fn users_matching(&self, pred: impl Fn(&User) -> bool) -> Vec<User> {
        self.cache
            .read()
            .await
            .users
            .iter()
            .filter(|u| pred(u))
            .cloned()
            .collect()
    }

    /// Users holding `role` in `society_id`, any status.
    async fn members(&self, role: RoleKind, society_id: &str) -> Vec<User> {
        self.users_matching(|u| u.role_in(role, Some(society_id)).is_some())
            .await
    }

    pub async fn administrators_by_society(&self, society_id: &str) -> Vec<User> {
        self.members(RoleKind::Administrator, society_id).await
    }

    pub async fn residents_by_society(&self, society_id: &str) -> Vec<User> {
        self.members(RoleKind::Resident, society_id).await
    }

    pub async fn security_by_society(&self, society_id: &str) -> Vec<User> {
        self.members(RoleKind::Security, society_id).await
    }

    /// Users with a pending administrator request for any society.
    pub async fn pending_administrators(&self) -> Vec<User> {
        self.users_matching(|u| {
            u.roles
                .iter()
                .any(|r| r.role == RoleKind::Administrator && r.status == RoleStatus::Pending)
        })
        .await
    }

    /// Users with a pending resident request for `society_id`.
    pub async fn pending_residents(&self, society_id: &str) -> Vec<User> {
        self.users_matching(|u| {
            u.has_role_with_status(RoleKind::Resident, Some(society_id), RoleStatus::Pending)
        })
        .await
    }

    /// Users with a pending security request for `society_id`.
    pub async fn pending_security(&self, society_id: &str) -> Vec<User> {
        self.users_matching(|u| {
            u.has_role_with_status(RoleKind::Security, Some(society_id), RoleStatus::Pending)
        })
        .await
    }
}

/// Log a backend lookup failure and treat it as "not found".
fn degrade<T>(result: Result<Option<T>, StorageError>, what: &str) -> Option<T> {
    result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, lookup = what, "Backend lookup failed");
        None
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use chrono::Duration as ChronoDuration;
    use gatepass_core::visitor::{Gender, VisitorStatus};
    use gatepass_db::models::user::UserRole;
    use gatepass_db::providers::MemoryStore;
    use gatepass_db::Collection;

    use super::*;

    fn context() -> (Arc<MemoryStore>, Arc<DataContext>) {
        let store = Arc::new(MemoryStore::new());
        let context = Arc::new(DataContext::new(store.clone()));
        (store, context)
    }

    fn society_input(from_days: i64, to_days: i64) -> CreateSociety {
        let now = Utc::now();
        CreateSociety {
            name: "Palm Grove".into(),
            address: None,
            permission_from_date: now + ChronoDuration::days(from_days),
            permission_to_date: now + ChronoDuration::days(to_days),
        }
    }

    fn visitor_input(society_id: &str, name: &str) -> CreateVisitor {
        CreateVisitor {
            name: name.into(),
            gender: Gender::Female,
            id_proof: Some("DL-4411".into()),
            coming_from: Some("Courier".into()),
            purpose: Some("Delivery".into()),
            contact_number: Some("9876543210".into()),
            resident_id: "r-1".into(),
            society_id: society_id.into(),
            photo: None,
            created_by: Some("g-1".into()),
            pre_approval_id: None,
        }
    }

    fn user_input(login: &str, roles: Vec<UserRole>) -> CreateUser {
        CreateUser {
            name: login.into(),
            email: format!("{login}@example.com"),
            login_name: login.into(),
            password_hash: None,
            roles,
            is_resigned: false,
        }
    }

    fn role(role: RoleKind, society_id: Option<&str>, status: RoleStatus) -> UserRole {
        UserRole {
            role,
            society_id: society_id.map(str::to_string),
            status,
            block: None,
            flat_number: None,
        }
    }

    // -----------------------------------------------------------------------
    // Refresh sequencing
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn refresh_loads_collections_from_backend() {
        let (store, ctx) = context();
        VisitorRepo::create(store.as_ref(), &visitor_input("s-1", "Asha"))
            .await
            .unwrap();

        assert!(ctx.visitors().await.is_empty());
        assert_matches!(ctx.refresh().await, RefreshOutcome::Applied { .. });
        assert_eq!(ctx.visitors().await.len(), 1);
        assert!(!ctx.is_loading());
    }

    #[tokio::test]
    async fn failed_refresh_keeps_every_collection() {
        let (store, ctx) = context();
        ctx.add_society(&society_input(-1, 30)).await.unwrap();
        ctx.add_visitor(&visitor_input("s-1", "Asha")).await.unwrap();

        VisitorRepo::create(store.as_ref(), &visitor_input("s-1", "Bilal"))
            .await
            .unwrap();
        store.fail_reads(Collection::Notices).await;

        let before = ctx.snapshot_token().await;
        assert_eq!(ctx.refresh().await, RefreshOutcome::Failed);
        assert_eq!(ctx.snapshot_token().await, before);
        assert_eq!(ctx.visitors().await.len(), 1, "visitors left as cached");
        assert_eq!(ctx.societies().await.len(), 1);
    }

    #[tokio::test]
    async fn stale_refresh_is_discarded() {
        let (store, ctx) = context();
        store
            .delay_next_read(Collection::Visitors, Duration::from_millis(200))
            .await;

        // Starts first, reads the empty visitors collection, then stalls.
        let slow = tokio::spawn({
            let ctx = ctx.clone();
            async move { ctx.refresh().await }
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(ctx.is_loading());

        let added = ctx.add_visitor(&visitor_input("s-1", "Asha")).await.unwrap();

        assert_matches!(slow.await.unwrap(), RefreshOutcome::Discarded { .. });
        let cached = ctx.visitors_by_society("s-1").await;
        assert_eq!(cached, vec![added]);
    }

    #[tokio::test]
    async fn write_is_visible_even_if_refresh_fails() {
        let (store, ctx) = context();
        store.fail_reads(Collection::Users).await;
        let notice = ctx
            .add_notice(&CreateNotice {
                society_id: "s-1".into(),
                title: "Water supply".into(),
                content: "No water 10am-2pm".into(),
                created_by: None,
            })
            .await
            .unwrap();
        assert_eq!(ctx.notices_by_society("s-1").await, vec![notice]);
    }

    #[tokio::test]
    async fn write_errors_propagate() {
        let (_store, ctx) = context();
        let err = ctx
            .update_visitor("missing", &UpdateVisitor::default())
            .await
            .unwrap_err();
        assert_matches!(err, StorageError::NotFound { .. });
    }

    // -----------------------------------------------------------------------
    // Visitor round-trip and concurrency
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn added_visitor_round_trips_through_refresh() {
        let (_store, ctx) = context();
        let input = visitor_input("s-9", "Kiran");
        let before = Utc::now();
        let added = ctx.add_visitor(&input).await.unwrap();
        ctx.refresh().await;

        let listed = ctx.visitors_by_society("s-9").await;
        assert_eq!(listed.len(), 1);
        let v = &listed[0];
        assert_eq!(v.id, added.id);
        assert_eq!(v.name, input.name);
        assert_eq!(v.gender, input.gender);
        assert_eq!(v.id_proof, input.id_proof);
        assert_eq!(v.coming_from, input.coming_from);
        assert_eq!(v.purpose, input.purpose);
        assert_eq!(v.contact_number, input.contact_number);
        assert_eq!(v.resident_id, input.resident_id);
        assert_eq!(v.status, VisitorStatus::Pending);
        assert!(v.exit_time.is_none());
        assert!(v.entry_time >= before && v.entry_time <= Utc::now());
    }

    #[tokio::test]
    async fn concurrent_adds_both_land_in_cache() {
        let (_store, ctx) = context();
        let input_a = visitor_input("s-1", "Asha");
        let input_b = visitor_input("s-1", "Bilal");
        let (a, b) = tokio::join!(ctx.add_visitor(&input_a), ctx.add_visitor(&input_b),);
        let (a, b) = (a.unwrap(), b.unwrap());

        let ids: Vec<_> = ctx
            .visitors_by_society("s-1")
            .await
            .into_iter()
            .map(|v| v.id)
            .collect();
        assert!(ids.contains(&a.id));
        assert!(ids.contains(&b.id));
    }

    #[tokio::test]
    async fn raw_visitor_update_is_unguarded() {
        let (_store, ctx) = context();
        let v = ctx.add_visitor(&visitor_input("s-1", "Asha")).await.unwrap();
        let first = Utc::now();
        let closed = ctx
            .update_visitor(
                &v.id,
                &UpdateVisitor {
                    exit_time: Some(first),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(closed.status, VisitorStatus::Pending);
        assert!(closed.exit_time.unwrap() >= closed.entry_time);
    }

    // -----------------------------------------------------------------------
    // Derived queries
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn society_activity_tracks_permission_window() {
        let (_store, ctx) = context();
        let active = ctx.add_society(&society_input(-1, 30)).await.unwrap();
        let lapsed = ctx.add_society(&society_input(-60, -1)).await.unwrap();
        let future = ctx.add_society(&society_input(5, 30)).await.unwrap();

        assert!(ctx.is_society_active(&active.id).await);
        assert!(!ctx.is_society_active(&lapsed.id).await);
        assert!(!ctx.is_society_active(&future.id).await);
        assert!(!ctx.is_society_active("unknown").await);
    }

    #[tokio::test]
    async fn membership_queries_filter_by_role_and_status() {
        let (_store, ctx) = context();
        ctx.add_user(&user_input(
            "root",
            vec![role(RoleKind::Superadmin, None, RoleStatus::Approved)],
        ))
        .await
        .unwrap();
        ctx.add_user(&user_input(
            "meera",
            vec![role(RoleKind::Resident, Some("s-1"), RoleStatus::Pending)],
        ))
        .await
        .unwrap();
        ctx.add_user(&user_input(
            "arjun",
            vec![
                role(RoleKind::Administrator, Some("s-2"), RoleStatus::Pending),
                role(RoleKind::Security, Some("s-1"), RoleStatus::Approved),
            ],
        ))
        .await
        .unwrap();

        assert!(ctx.has_superadmin().await);
        assert_eq!(ctx.superadmin().await.unwrap().login_name, "root");
        assert_eq!(ctx.pending_residents("s-1").await.len(), 1);
        assert_eq!(ctx.pending_administrators().await.len(), 1);
        assert_eq!(ctx.security_by_society("s-1").await.len(), 1);
        assert!(ctx.pending_security("s-1").await.is_empty());
        assert!(ctx.residents_by_society("s-2").await.is_empty());
    }

    #[tokio::test]
    async fn resigned_superadmin_does_not_count() {
        let (_store, ctx) = context();
        let mut input = user_input(
            "old-root",
            vec![role(RoleKind::Superadmin, None, RoleStatus::Approved)],
        );
        input.is_resigned = true;
        ctx.add_user(&input).await.unwrap();
        assert!(!ctx.has_superadmin().await);
    }

    #[tokio::test]
    async fn delete_removes_from_cache() {
        let (_store, ctx) = context();
        let s = ctx.add_society(&society_input(-1, 1)).await.unwrap();
        ctx.delete_society(&s.id).await.unwrap();
        assert!(ctx.society_by_id(&s.id).await.is_none());
        assert!(ctx.fetch_society_by_id(&s.id).await.is_none());
    }

    #[tokio::test]
    async fn backend_lookups_degrade_to_none() {
        let (store, ctx) = context();
        let user = ctx.add_user(&user_input("meera", vec![])).await.unwrap();
        store.fail_reads(Collection::Users).await;
        assert!(ctx.get_user_by_id(&user.id).await.is_none());
        assert!(ctx.get_user_by_email("meera@example.com").await.is_none());
        store.clear_failures().await;
        assert!(ctx.get_user_by_login_name("MEERA").await.is_some());
    }
}
