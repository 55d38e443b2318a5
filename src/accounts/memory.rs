//! In-memory [`AccountStore`] for tests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use super::errors::{StoreError, StoreResult, UniqueField};
use super::pagination::PageRequest;
use super::repo::AccountStore;
use super::repo_types::{Account, AccountProfile, NewAccount};

struct Row {
    account: Account,
    deleted: bool,
}

#[derive(Default)]
struct Inner {
    rows: Vec<Row>,
    next_id: i64,
    clock: i64,
}

/// Keeps soft-deleted rows around and enforces live-row uniqueness under one lock,
/// mirroring the partial unique indexes of the SQL schema.
#[derive(Default)]
pub struct MemoryAccountStore {
    inner: Mutex<Inner>,
    /// When set, the `*_taken` pre-checks always answer `false`, so writes reach
    /// the unique-constraint path as they would for the loser of a race.
    skip_prechecks: AtomicBool,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skip_prechecks(&self, skip: bool) {
        self.skip_prechecks.store(skip, Ordering::SeqCst);
    }

    /// Includes soft-deleted rows.
    pub fn raw(&self, id: i64) -> Option<(Account, bool)> {
        let inner = self.inner.lock().expect("store lock");
        let row = inner
            .rows
            .iter()
            .find(|r| r.account.id == id)
            .map(|r| (r.account.clone(), r.deleted));
        row
    }
}

impl Inner {
    // Strictly increasing so newest-first ordering is deterministic.
    fn tick(&mut self) -> OffsetDateTime {
        self.clock += 1;
        OffsetDateTime::UNIX_EPOCH + Duration::days(20_000) + Duration::seconds(self.clock)
    }

    fn live(&self) -> impl Iterator<Item = &Account> + '_ {
        self.rows.iter().filter(|r| !r.deleted).map(|r| &r.account)
    }

    fn others(&self, exclude_id: Option<i64>) -> impl Iterator<Item = &Account> + '_ {
        self.live().filter(move |a| Some(a.id) != exclude_id)
    }

    fn conflict(&self, profile: &AccountProfile, exclude_id: Option<i64>) -> Option<UniqueField> {
        if self.others(exclude_id).any(|a| a.username == profile.username) {
            return Some(UniqueField::Username);
        }
        let email = profile.email()?;
        if self.others(exclude_id).any(|a| a.email.as_deref() == Some(email)) {
            return Some(UniqueField::Email);
        }
        None
    }
}

fn matches_search(account: &Account, needle: &str) -> bool {
    let contains = |field: &str| field.to_lowercase().contains(needle);
    contains(&account.username)
        || contains(&account.name)
        || account.email.as_deref().is_some_and(contains)
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create(&self, account: NewAccount) -> StoreResult<Account> {
        let mut inner = self.inner.lock().expect("store lock");
        if let Some(field) = inner.conflict(&account.profile, None) {
            return Err(StoreError::Conflict(field));
        }
        inner.next_id += 1;
        let now = inner.tick();
        let profile = &account.profile;
        let created = Account {
            id: inner.next_id,
            username: profile.username.clone(),
            name: profile.name.clone(),
            email: profile.email().map(str::to_owned),
            phone: profile.phone.clone(),
            mobile: profile.mobile.clone(),
            image_url: profile.image_url.clone(),
            password_hash: account.password_hash,
            is_active: profile.is_active(),
            role_id: profile.role_id,
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(Row {
            account: created.clone(),
            deleted: false,
        });
        Ok(created)
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Account>> {
        let inner = self.inner.lock().expect("store lock");
        let found = inner.live().find(|a| a.id == id).cloned();
        Ok(found)
    }

    async fn find_by_username(&self, username: &str) -> StoreResult<Option<Account>> {
        let inner = self.inner.lock().expect("store lock");
        let found = inner.live().find(|a| a.username == username).cloned();
        Ok(found)
    }

    async fn update(&self, id: i64, profile: AccountProfile) -> StoreResult<Option<Account>> {
        let mut inner = self.inner.lock().expect("store lock");
        if !inner.live().any(|a| a.id == id) {
            return Ok(None);
        }
        if let Some(field) = inner.conflict(&profile, Some(id)) {
            return Err(StoreError::Conflict(field));
        }
        let now = inner.tick();
        let row = inner
            .rows
            .iter_mut()
            .find(|r| !r.deleted && r.account.id == id)
            .expect("live row checked above");
        let account = &mut row.account;
        account.username = profile.username.clone();
        account.name = profile.name.clone();
        account.email = profile.email().map(str::to_owned);
        account.phone = profile.phone.clone();
        account.mobile = profile.mobile.clone();
        account.image_url = profile.image_url.clone();
        account.is_active = profile.is_active();
        account.role_id = profile.role_id;
        account.updated_at = now;
        Ok(Some(account.clone()))
    }

    async fn soft_delete(&self, id: i64) -> StoreResult<bool> {
        let mut inner = self.inner.lock().expect("store lock");
        let now = inner.tick();
        match inner
            .rows
            .iter_mut()
            .find(|r| !r.deleted && r.account.id == id)
        {
            Some(row) => {
                row.deleted = true;
                row.account.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(
        &self,
        page: PageRequest,
        search: Option<&str>,
    ) -> StoreResult<(Vec<Account>, i64)> {
        let inner = self.inner.lock().expect("store lock");
        let needle = search.map(str::to_lowercase);
        let mut matching: Vec<Account> = inner
            .live()
            .filter(|a| needle.as_deref().map_or(true, |n| matches_search(a, n)))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let total = matching.len() as i64;
        let rows = matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect();
        Ok((rows, total))
    }

    async fn username_taken(&self, username: &str, exclude_id: Option<i64>) -> StoreResult<bool> {
        if self.skip_prechecks.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let inner = self.inner.lock().expect("store lock");
        let taken = inner
            .live()
            .any(|a| a.username == username && Some(a.id) != exclude_id);
        Ok(taken)
    }

    async fn email_taken(&self, email: &str, exclude_id: Option<i64>) -> StoreResult<bool> {
        if self.skip_prechecks.load(Ordering::SeqCst) {
            return Ok(false);
        }
        let inner = self.inner.lock().expect("store lock");
        let taken = inner
            .live()
            .any(|a| a.email.as_deref() == Some(email) && Some(a.id) != exclude_id);
        Ok(taken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_account(username: &str, email: Option<&str>) -> NewAccount {
        NewAccount {
            profile: AccountProfile {
                username: username.into(),
                name: username.into(),
                email: email.map(str::to_owned),
                phone: String::new(),
                mobile: String::new(),
                image_url: String::new(),
                is_active: None,
                role_id: 1,
            },
            password_hash: "hash".into(),
        }
    }

    #[tokio::test]
    async fn lookups_skip_soft_deleted_rows() {
        let store = MemoryAccountStore::new();
        let john = store.create(new_account("john", Some("john@x.com"))).await.unwrap();

        assert_eq!(store.find_by_id(john.id).await.unwrap().unwrap().username, "john");
        assert_eq!(store.find_by_username("john").await.unwrap().unwrap().id, john.id);
        assert!(store.username_taken("john", None).await.unwrap());
        assert!(!store.username_taken("john", Some(john.id)).await.unwrap());
        assert!(store.email_taken("john@x.com", None).await.unwrap());
        assert!(!store.email_taken("john@x.com", Some(john.id)).await.unwrap());

        assert!(store.soft_delete(john.id).await.unwrap());
        assert!(store.find_by_id(john.id).await.unwrap().is_none());
        assert!(store.find_by_username("john").await.unwrap().is_none());
        assert!(!store.username_taken("john", None).await.unwrap());
        assert!(!store.email_taken("john@x.com", None).await.unwrap());
        assert_eq!(store.raw(john.id).map(|(_, deleted)| deleted), Some(true));
    }
}
