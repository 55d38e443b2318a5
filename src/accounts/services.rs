use std::sync::Arc;

use tracing::{error, info, warn};

use super::errors::{AccountError, AccountResult};
use super::pagination::{PageRequest, PaginationInfo};
use super::repo::AccountStore;
use super::repo_types::{Account, AccountProfile, NewAccount};
use crate::auth::{jwt::JwtKeys, password::Passwords};

/// One page of the account listing.
#[derive(Debug)]
pub struct AccountPage {
    pub accounts: Vec<Account>,
    pub pagination: PaginationInfo,
}

/// Account use-cases. Stateless per call; holds only the store, the signing
/// keys and the password hasher, all shared.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn AccountStore>,
    keys: Arc<JwtKeys>,
    passwords: Arc<Passwords>,
}

impl AccountService {
    pub fn new(
        store: Arc<dyn AccountStore>,
        keys: Arc<JwtKeys>,
        passwords: Arc<Passwords>,
    ) -> Self {
        Self {
            store,
            keys,
            passwords,
        }
    }

    /// Validates `token` and resolves the live account it is bound to.
    async fn authenticate(&self, token: &str) -> AccountResult<Account> {
        let account_id = self.keys.validate(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AccountError::InvalidCredential
        })?;
        match self.store.find_by_id(account_id).await? {
            Some(account) => Ok(account),
            None => {
                warn!(account_id, "token bound to missing account");
                Err(AccountError::InvalidCredential)
            }
        }
    }

    /// Pre-checks uniqueness for a create (`exclude_id = None`) or for an update of
    /// `exclude_id`. The store's unique indexes still have the last word.
    async fn ensure_unique(
        &self,
        profile: &AccountProfile,
        exclude_id: Option<i64>,
    ) -> AccountResult<()> {
        if self
            .store
            .username_taken(&profile.username, exclude_id)
            .await?
        {
            warn!(username = %profile.username, "username already exists");
            return Err(AccountError::UsernameTaken);
        }
        if let Some(email) = profile.email() {
            if self.store.email_taken(email, exclude_id).await? {
                warn!(email = %email, "email already exists");
                return Err(AccountError::EmailTaken);
            }
        }
        Ok(())
    }

    async fn insert(&self, profile: AccountProfile, password: &str) -> AccountResult<Account> {
        self.ensure_unique(&profile, None).await?;
        let password_hash = self.passwords.hash(password)?;
        let account = self
            .store
            .create(NewAccount {
                profile,
                password_hash,
            })
            .await?;
        Ok(account)
    }

    fn issue(&self, account_id: i64) -> AccountResult<String> {
        self.keys.issue(account_id).map_err(|e| {
            error!(error = %e, account_id, "jwt sign failed");
            AccountError::Internal(e)
        })
    }

    pub async fn register(&self, profile: AccountProfile, password: &str) -> AccountResult<String> {
        let account = self.insert(profile, password).await?;
        info!(account_id = account.id, username = %account.username, "account registered");
        self.issue(account.id)
    }

    /// Unknown username and wrong password fail identically.
    pub async fn login(&self, username: &str, password: &str) -> AccountResult<String> {
        let Some(account) = self.store.find_by_username(username).await? else {
            // same Argon2 work as a wrong password
            self.passwords.verify_decoy(password);
            warn!(username = %username, "login unknown username");
            return Err(AccountError::InvalidCredential);
        };
        let ok = self.passwords.verify(password, &account.password_hash).unwrap_or_else(|e| {
            error!(error = %e, account_id = account.id, "stored password hash unreadable");
            false
        });
        if !ok {
            warn!(account_id = account.id, "login invalid password");
            return Err(AccountError::InvalidCredential);
        }
        info!(account_id = account.id, "account logged in");
        self.issue(account.id)
    }

    pub async fn get_profile(&self, token: &str) -> AccountResult<Account> {
        self.authenticate(token).await
    }

    /// Any valid token may read any account.
    pub async fn get_user(&self, token: &str, id: i64) -> AccountResult<Account> {
        self.authenticate(token).await?;
        self.store
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)
    }

    pub async fn create_user(
        &self,
        token: &str,
        profile: AccountProfile,
        password: &str,
    ) -> AccountResult<Account> {
        let caller = self.authenticate(token).await?;
        let account = self.insert(profile, password).await?;
        info!(account_id = account.id, created_by = caller.id, "account created");
        Ok(account)
    }

    /// Replaces the whole profile of `id`; fields the caller leaves out are reset,
    /// not merged with what is stored.
    pub async fn update_user(
        &self,
        token: &str,
        id: i64,
        profile: AccountProfile,
    ) -> AccountResult<Account> {
        let caller = self.authenticate(token).await?;
        if self.store.find_by_id(id).await?.is_none() {
            return Err(AccountError::NotFound);
        }
        self.ensure_unique(&profile, Some(id)).await?;
        let account = self
            .store
            .update(id, profile)
            .await?
            .ok_or(AccountError::NotFound)?;
        info!(account_id = account.id, updated_by = caller.id, "account updated");
        Ok(account)
    }

    /// Soft-deletes `id`. A second delete of the same id is `NotFound`.
    pub async fn delete_user(&self, token: &str, id: i64) -> AccountResult<()> {
        let caller = self.authenticate(token).await?;
        if !self.store.soft_delete(id).await? {
            return Err(AccountError::NotFound);
        }
        info!(account_id = id, deleted_by = caller.id, "account deleted");
        Ok(())
    }

    pub async fn list_users(
        &self,
        token: &str,
        page: Option<i64>,
        limit: Option<i64>,
        search: Option<&str>,
    ) -> AccountResult<AccountPage> {
        self.authenticate(token).await?;
        let request = PageRequest::normalize(page, limit);
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        let (accounts, total) = self.store.list(request, search).await?;
        Ok(AccountPage {
            accounts,
            pagination: PaginationInfo::new(request, total),
        })
    }
}
