//! In-memory stand-ins for the repository, notifier and session seams.

use async_trait::async_trait;
use chrono::Utc;
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::{
    entities::{account_credentials, accounts, vendor_profiles},
    repo::{
        account_credentials::AccountCredentialsRepo,
        accounts::{AccountsRepo, CreatedAccount, NewAccount, DEFAULT_LOCATION},
        vendor_profiles::VendorProfilesRepo,
        RepoError,
    },
    service::{
        notify::{Destination, Notifier, NotifyError},
        session::{LoginMethod, SessionData, SessionError, SessionService},
    },
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    accounts: Vec<accounts::Model>,
    credentials: Vec<account_credentials::Model>,
    vendor_profiles: Vec<vendor_profiles::Model>,
}

/// Implements every repository trait over shared vectors, enforcing the same
/// uniqueness rules as the database indexes.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    conflict_on_next_insert: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Makes the next insert fail as if a concurrent writer won the unique index.
    pub fn fail_next_insert_with_conflict(&self) {
        self.conflict_on_next_insert.store(true, Ordering::SeqCst);
    }

    pub fn account_count(&self) -> usize {
        self.tables.lock().unwrap().accounts.len()
    }

    pub fn account(&self, id: i64) -> Option<accounts::Model> {
        self.tables
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|account| account.id == id)
            .cloned()
    }

    pub fn password_hash_for(&self, account_id: i64) -> Option<String> {
        self.tables
            .lock()
            .unwrap()
            .credentials
            .iter()
            .find(|credential| {
                credential.account_id == account_id
                    && credential.provider == account_credentials::PROVIDER_PASSWORD
            })
            .and_then(|credential| credential.password_hash.clone())
    }

    pub fn set_active(&self, id: i64, is_active: bool) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(account) = tables.accounts.iter_mut().find(|account| account.id == id) {
            account.is_active = is_active;
        }
    }

    fn find(&self, predicate: impl Fn(&accounts::Model) -> bool) -> Option<accounts::Model> {
        self.tables
            .lock()
            .unwrap()
            .accounts
            .iter()
            .find(|account| predicate(account))
            .cloned()
    }
}

#[async_trait]
impl AccountsRepo for InMemoryStore {
    async fn insert(&self, new: NewAccount) -> Result<CreatedAccount, RepoError> {
        if self.conflict_on_next_insert.swap(false, Ordering::SeqCst) {
            return Err(RepoError::Conflict("accounts_email_lower_key".to_string()));
        }

        let mut tables = self.tables.lock().unwrap();
        let taken = tables.accounts.iter().any(|account| {
            (new.email.is_some() && account.email == new.email)
                || (new.mobile_number.is_some() && account.mobile_number == new.mobile_number)
        });
        if taken {
            return Err(RepoError::Conflict("accounts identity".to_string()));
        }

        tables.next_id += 1;
        let id = tables.next_id;
        let now = Utc::now().into();
        let attributes = new.attributes;
        let account = accounts::Model {
            id,
            uid: Uuid::new_v4(),
            email: new.email,
            mobile_number: new.mobile_number,
            username: attributes.username,
            first_name: attributes.first_name.unwrap_or_default(),
            last_name: attributes.last_name.unwrap_or_default(),
            date_of_birth: attributes.date_of_birth,
            is_active: attributes.is_active.unwrap_or(true),
            is_staff: new.is_staff,
            is_vendor: new.is_vendor,
            is_superuser: new.is_superuser,
            address: attributes.address,
            gender: attributes.gender.map(|gender| gender.as_str().to_string()),
            profile_picture: attributes.profile_picture,
            email_verified: false,
            phone_verified: false,
            location: attributes
                .location
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            is_routable: attributes.is_routable,
            verification_code: None,
            verification_code_expiry: None,
            latitude: attributes.latitude,
            longitude: attributes.longitude,
            created_at: now,
            updated_at: now,
        };
        tables.accounts.push(account.clone());

        if let Some(password_hash) = new.password_hash {
            let credential_id = tables.credentials.len() as i64 + 1;
            tables.credentials.push(account_credentials::Model {
                id: credential_id,
                account_id: id,
                provider: account_credentials::PROVIDER_PASSWORD.to_string(),
                password_hash: Some(password_hash),
                created_at: now,
                updated_at: now,
            });
        }

        let vendor_profile = new.vendor.map(|vendor| vendor_profiles::Model {
            account_id: id,
            vendor_name: vendor.vendor_name,
            category: vendor.category,
            created_at: now,
            updated_at: now,
        });
        if let Some(profile) = &vendor_profile {
            tables.vendor_profiles.push(profile.clone());
        }

        Ok(CreatedAccount {
            account,
            vendor_profile,
        })
    }

    async fn find_by_uid(&self, uid: Uuid) -> Result<Option<accounts::Model>, RepoError> {
        Ok(self.find(|account| account.uid == uid))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<accounts::Model>, RepoError> {
        Ok(self.find(|account| account.email.as_deref() == Some(email)))
    }

    async fn find_by_mobile_number(
        &self,
        mobile_number: &str,
    ) -> Result<Option<accounts::Model>, RepoError> {
        Ok(self.find(|account| account.mobile_number.as_deref() == Some(mobile_number)))
    }

    async fn update(&self, model: accounts::Model) -> Result<accounts::Model, RepoError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(slot) = tables.accounts.iter_mut().find(|account| account.id == model.id) else {
            return Err(RepoError::Db(sea_orm::DbErr::RecordNotUpdated));
        };
        *slot = accounts::Model {
            updated_at: Utc::now().into(),
            ..model
        };
        Ok(slot.clone())
    }
}

#[async_trait]
impl AccountCredentialsRepo for InMemoryStore {
    async fn find_by_account_and_provider(
        &self,
        account_id: i64,
        provider: &str,
    ) -> Result<Option<account_credentials::Model>, RepoError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .credentials
            .iter()
            .find(|credential| credential.account_id == account_id && credential.provider == provider)
            .cloned())
    }
}

#[async_trait]
impl VendorProfilesRepo for InMemoryStore {
    async fn find_by_account_id(
        &self,
        account_id: i64,
    ) -> Result<Option<vendor_profiles::Model>, RepoError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .vendor_profiles
            .iter()
            .find(|profile| profile.account_id == account_id)
            .cloned())
    }
}

/// Forwards every dispatched code to a channel the test can await.
pub struct RecordingNotifier {
    tx: mpsc::UnboundedSender<(Destination, String)>,
    rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<(Destination, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Arc<Self> {
        let (tx, rx) = mpsc::unbounded_channel();
        Arc::new(Self {
            tx,
            rx: tokio::sync::Mutex::new(rx),
        })
    }

    pub async fn next(&self, wait: Duration) -> Option<(Destination, String)> {
        let mut rx = self.rx.lock().await;
        tokio::time::timeout(wait, rx.recv()).await.ok().flatten()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_otp(&self, destination: &Destination, code: &str) -> Result<(), NotifyError> {
        let _ = self.tx.send((destination.clone(), code.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySessions {
    sessions: Mutex<HashMap<String, SessionData>>,
}

impl InMemorySessions {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn login_method(&self, session_id: &str) -> Option<LoginMethod> {
        self.sessions
            .lock()
            .unwrap()
            .get(session_id)
            .map(|session| session.login_method)
    }
}

#[async_trait]
impl SessionService for InMemorySessions {
    async fn create(
        &self,
        account_uid: Uuid,
        login_method: LoginMethod,
    ) -> Result<String, SessionError> {
        let session_id = Uuid::new_v4().simple().to_string();
        self.sessions.lock().unwrap().insert(
            session_id.clone(),
            SessionData::new(account_uid, login_method, 3600),
        );
        Ok(session_id)
    }

    async fn get(&self, session_id: &str) -> Result<Option<SessionData>, SessionError> {
        Ok(self.sessions.lock().unwrap().get(session_id).cloned())
    }

    async fn delete(&self, session_id: &str) -> Result<(), SessionError> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }
}
