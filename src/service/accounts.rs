use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    entities::{accounts, vendor_profiles},
    repo::{
        accounts::{AccountAttributes, AccountsRepo, NewAccount, NewVendorProfile},
        vendor_profiles::VendorProfilesRepo,
        RepoError,
    },
    service::{
        notify::{self, Destination, Notifier},
        otp,
        password::{self, PasswordHashError},
        validation::{
            self, ValidationError, LATITUDE_LIMIT, LONGITUDE_LIMIT, MOBILE_NUMBER_MAX_LENGTH,
        },
    },
};

const MISSING_IDENTITY: &str = "Please provide an email address or mobile number.";
const DUPLICATE_ACCOUNT: &str =
    "An account with this email address or mobile number already exists.";
const DUPLICATE_MOBILE_NUMBER: &str = "An account with this mobile number already exists.";
const EXISTING_NON_VENDOR: &str =
    "An account with this email address already exists and is not a vendor.";

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("account not found")]
    NotFound,
    #[error(transparent)]
    PasswordHash(#[from] PasswordHashError),
    #[error("storage error: {0}")]
    Storage(#[source] RepoError),
}

impl From<RepoError> for AccountError {
    fn from(err: RepoError) -> Self {
        match err {
            // Lost a race with a concurrent insert that passed the same pre-check.
            RepoError::Conflict(detail) => {
                tracing::debug!(%detail, "unique index rejected account write");
                AccountError::Validation(ValidationError::new(DUPLICATE_ACCOUNT))
            }
            other => AccountError::Storage(other),
        }
    }
}

#[derive(Clone, Default)]
pub struct CreateAccountInput {
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub password: Option<String>,
    pub is_vendor: bool,
    pub is_staff: bool,
    pub attributes: AccountAttributes,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VendorAccount {
    pub account: accounts::Model,
    pub profile: vendor_profiles::Model,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VerificationChannel {
    Email,
    Sms,
}

#[derive(Clone, Copy, Debug)]
pub struct OtpSettings {
    pub length: usize,
    pub ttl_seconds: u64,
}

#[async_trait]
pub trait AccountsService: Send + Sync {
    /// Returns the existing account unchanged when the email is already registered.
    async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError>;
    async fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        attributes: AccountAttributes,
    ) -> Result<accounts::Model, AccountError>;
    async fn create_vendor(
        &self,
        input: CreateAccountInput,
        vendor: NewVendorProfile,
    ) -> Result<VendorAccount, AccountError>;
    async fn register_mobile(&self, mobile_number: &str) -> Result<accounts::Model, AccountError>;
    async fn issue_verification_code(
        &self,
        uid: Uuid,
        channel: VerificationChannel,
    ) -> Result<accounts::Model, AccountError>;
    async fn get(&self, uid: Uuid) -> Result<Option<accounts::Model>, AccountError>;
    async fn get_vendor(&self, uid: Uuid) -> Result<Option<VendorAccount>, AccountError>;
}

enum Provisioned {
    Existing(accounts::Model),
    Created {
        account: accounts::Model,
        vendor_profile: Option<vendor_profiles::Model>,
    },
}

pub struct AccountsServiceImpl {
    accounts_repo: Arc<dyn AccountsRepo>,
    vendor_profiles_repo: Arc<dyn VendorProfilesRepo>,
    notifier: Arc<dyn Notifier>,
    otp: OtpSettings,
}

impl AccountsServiceImpl {
    pub fn new(
        accounts_repo: Arc<dyn AccountsRepo>,
        vendor_profiles_repo: Arc<dyn VendorProfilesRepo>,
        notifier: Arc<dyn Notifier>,
        otp: OtpSettings,
    ) -> Self {
        Self {
            accounts_repo,
            vendor_profiles_repo,
            notifier,
            otp,
        }
    }

    fn normalize_mobile_number(mobile_number: &str) -> Result<String, ValidationError> {
        let cleaned = validation::validate_mobile_number(mobile_number)?;
        if cleaned.len() > MOBILE_NUMBER_MAX_LENGTH {
            return Err(ValidationError::new(format!(
                "Ensure the mobile number has no more than {MOBILE_NUMBER_MAX_LENGTH} digits."
            )));
        }
        Ok(cleaned)
    }

    /// Rejects values the account and vendor columns cannot hold.
    fn check_column_bounds(
        attributes: &AccountAttributes,
        vendor: Option<&NewVendorProfile>,
    ) -> Result<(), ValidationError> {
        for (field, value) in [
            ("username", attributes.username.as_deref()),
            ("first name", attributes.first_name.as_deref()),
            ("last name", attributes.last_name.as_deref()),
            ("address", attributes.address.as_deref()),
            ("profile picture", attributes.profile_picture.as_deref()),
            ("location", attributes.location.as_deref()),
            ("vendor name", vendor.and_then(|v| v.vendor_name.as_deref())),
            ("category", vendor.and_then(|v| v.category.as_deref())),
        ] {
            validation::check_text_length(field, value)?;
        }
        validation::check_coordinate("latitude", attributes.latitude, LATITUDE_LIMIT)?;
        validation::check_coordinate("longitude", attributes.longitude, LONGITUDE_LIMIT)?;
        Ok(())
    }

    async fn provision(
        &self,
        input: CreateAccountInput,
        vendor: Option<NewVendorProfile>,
    ) -> Result<Provisioned, AccountError> {
        let email = validation::non_blank(input.email.as_deref());
        let mobile_number = validation::non_blank(input.mobile_number.as_deref());
        if email.is_none() && mobile_number.is_none() {
            return Err(ValidationError::new(MISSING_IDENTITY).into());
        }

        if let Some(password) = input.password.as_deref() {
            password::validate_password(password)?;
        }

        let email = email.map(validation::normalize_email).transpose()?;
        if let Some(email) = email.as_deref() {
            validation::check_text_length("email", Some(email))?;
            if let Some(existing) = self.accounts_repo.find_by_email(email).await? {
                tracing::debug!(account_uid = %existing.uid, "email already registered, returning existing account");
                return Ok(Provisioned::Existing(existing));
            }
        }

        // The remaining input only matters for a new row.
        let mobile_number = mobile_number
            .map(Self::normalize_mobile_number)
            .transpose()?;

        if let Some(mobile_number) = mobile_number.as_deref() {
            if self
                .accounts_repo
                .find_by_mobile_number(mobile_number)
                .await?
                .is_some()
            {
                return Err(ValidationError::new(DUPLICATE_MOBILE_NUMBER).into());
            }
        }

        Self::check_column_bounds(&input.attributes, vendor.as_ref())?;

        let password_hash = input
            .password
            .as_deref()
            .map(password::hash_password)
            .transpose()?;

        let is_vendor = input.is_vendor || vendor.is_some();
        let vendor = if is_vendor {
            Some(vendor.unwrap_or_default())
        } else {
            None
        };

        let created = self
            .accounts_repo
            .insert(NewAccount {
                email,
                mobile_number,
                password_hash,
                is_staff: input.is_staff,
                is_vendor,
                is_superuser: false,
                attributes: input.attributes,
                vendor,
            })
            .await?;

        tracing::info!(account_uid = %created.account.uid, is_vendor, "account created");
        Ok(Provisioned::Created {
            account: created.account,
            vendor_profile: created.vendor_profile,
        })
    }

    async fn send_code(
        &self,
        mut account: accounts::Model,
        channel: VerificationChannel,
    ) -> Result<accounts::Model, AccountError> {
        let destination = match channel {
            VerificationChannel::Email => account
                .email
                .clone()
                .map(Destination::Email)
                .ok_or_else(|| ValidationError::new("This account has no email address."))?,
            VerificationChannel::Sms => account
                .mobile_number
                .clone()
                .map(Destination::Sms)
                .ok_or_else(|| ValidationError::new("This account has no mobile number."))?,
        };

        let issued = otp::issue(self.otp.length, self.otp.ttl_seconds);
        account.verification_code = Some(issued.code_hash);
        account.verification_code_expiry = Some(issued.expires_at.into());
        let account = self.accounts_repo.update(account).await?;

        notify::dispatch_in_background(self.notifier.clone(), destination, issued.code);
        tracing::info!(account_uid = %account.uid, ?channel, "verification code issued");
        Ok(account)
    }
}

#[async_trait]
impl AccountsService for AccountsServiceImpl {
    async fn create_account(
        &self,
        input: CreateAccountInput,
    ) -> Result<accounts::Model, AccountError> {
        match self.provision(input, None).await? {
            Provisioned::Existing(account) | Provisioned::Created { account, .. } => Ok(account),
        }
    }

    async fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        attributes: AccountAttributes,
    ) -> Result<accounts::Model, AccountError> {
        if let Some(password) = password {
            password::validate_password(password)?;
        }

        let mut account = self
            .create_account(CreateAccountInput {
                email: Some(email.to_string()),
                password: password.map(str::to_string),
                attributes,
                ..Default::default()
            })
            .await?;

        if account.is_staff && account.is_superuser {
            return Ok(account);
        }

        account.is_staff = true;
        account.is_superuser = true;
        let account = self.accounts_repo.update(account).await?;
        tracing::info!(account_uid = %account.uid, "superuser provisioned");
        Ok(account)
    }

    async fn create_vendor(
        &self,
        input: CreateAccountInput,
        vendor: NewVendorProfile,
    ) -> Result<VendorAccount, AccountError> {
        let input = CreateAccountInput {
            is_vendor: true,
            ..input
        };

        match self.provision(input, Some(vendor)).await? {
            Provisioned::Created {
                account,
                vendor_profile: Some(profile),
            } => Ok(VendorAccount { account, profile }),
            Provisioned::Created { account, .. } => {
                let profile = self
                    .vendor_profiles_repo
                    .find_by_account_id(account.id)
                    .await?
                    .ok_or(AccountError::NotFound)?;
                Ok(VendorAccount { account, profile })
            }
            Provisioned::Existing(account) => {
                let profile = if account.is_vendor {
                    self.vendor_profiles_repo
                        .find_by_account_id(account.id)
                        .await?
                } else {
                    None
                };
                match profile {
                    Some(profile) => Ok(VendorAccount { account, profile }),
                    None => Err(ValidationError::new(EXISTING_NON_VENDOR).into()),
                }
            }
        }
    }

    async fn register_mobile(&self, mobile_number: &str) -> Result<accounts::Model, AccountError> {
        let account = self
            .create_account(CreateAccountInput {
                mobile_number: Some(mobile_number.to_string()),
                ..Default::default()
            })
            .await?;

        self.send_code(account, VerificationChannel::Sms).await
    }

    async fn issue_verification_code(
        &self,
        uid: Uuid,
        channel: VerificationChannel,
    ) -> Result<accounts::Model, AccountError> {
        let account = self
            .accounts_repo
            .find_by_uid(uid)
            .await?
            .ok_or(AccountError::NotFound)?;

        self.send_code(account, channel).await
    }

    async fn get(&self, uid: Uuid) -> Result<Option<accounts::Model>, AccountError> {
        Ok(self.accounts_repo.find_by_uid(uid).await?)
    }

    async fn get_vendor(&self, uid: Uuid) -> Result<Option<VendorAccount>, AccountError> {
        let Some(account) = self.accounts_repo.find_by_uid(uid).await? else {
            return Ok(None);
        };
        if !account.is_vendor {
            return Ok(None);
        }

        let profile = self
            .vendor_profiles_repo
            .find_by_account_id(account.id)
            .await?;
        Ok(profile.map(|profile| VendorAccount { account, profile }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::{InMemoryStore, RecordingNotifier};
    use std::time::Duration;

    const STRONG_PASSWORD: &str = "Secur3!ty";

    fn service(store: &Arc<InMemoryStore>, notifier: &Arc<RecordingNotifier>) -> AccountsServiceImpl {
        AccountsServiceImpl::new(
            store.clone(),
            store.clone(),
            notifier.clone(),
            OtpSettings {
                length: 6,
                ttl_seconds: 600,
            },
        )
    }

    fn email_input(email: &str, password: Option<&str>) -> CreateAccountInput {
        CreateAccountInput {
            email: Some(email.to_string()),
            password: password.map(str::to_string),
            ..Default::default()
        }
    }

    fn validation_message(err: AccountError) -> String {
        match err {
            AccountError::Validation(err) => err.message().to_string(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_identity_is_rejected() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let err = svc
            .create_account(CreateAccountInput {
                email: Some("   ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();

        assert_eq!(validation_message(err), MISSING_IDENTITY);
        assert_eq!(store.account_count(), 0);
    }

    #[tokio::test]
    async fn weak_passwords_abort_before_persisting() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        for weak in ["Sh0rt!", "secur3!ty", "SECUR3!TY", "Securi!ty", "Secur3ty"] {
            let err = svc
                .create_account(email_input("weak@example.com", Some(weak)))
                .await
                .unwrap_err();
            assert!(matches!(err, AccountError::Validation(_)), "{weak} accepted");
        }
        assert_eq!(store.account_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_email_returns_existing_account() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let first = svc
            .create_account(email_input("A@B.com", Some(STRONG_PASSWORD)))
            .await
            .unwrap();
        let second = svc
            .create_account(email_input(" a@b.COM ", None))
            .await
            .unwrap();

        assert_eq!(first.email.as_deref(), Some("a@b.com"));
        assert_eq!(first.uid, second.uid);
        assert_eq!(store.account_count(), 1);
        assert!(store.password_hash_for(first.id).is_some());
    }

    #[tokio::test]
    async fn password_is_stored_hashed() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let account = svc
            .create_account(email_input("hash@example.com", Some(STRONG_PASSWORD)))
            .await
            .unwrap();

        let hash = store.password_hash_for(account.id).unwrap();
        assert_ne!(hash, STRONG_PASSWORD);
        assert!(password::verify_password(&hash, STRONG_PASSWORD));
    }

    #[tokio::test]
    async fn defaults_are_applied() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let account = svc
            .create_account(CreateAccountInput {
                mobile_number: Some("5551234".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert!(account.is_active);
        assert!(!account.is_staff && !account.is_superuser && !account.is_vendor);
        assert_eq!(account.location, "Unknown");
        assert_eq!(account.first_name, "");
        assert!(account.email.is_none());
        assert!(store.password_hash_for(account.id).is_none());
    }

    #[tokio::test]
    async fn invalid_mobile_numbers_are_rejected() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        for mobile_number in ["123-456", "+15551234", "1234567890123456"] {
            let err = svc
                .create_account(CreateAccountInput {
                    mobile_number: Some(mobile_number.to_string()),
                    ..Default::default()
                })
                .await
                .unwrap_err();
            assert!(matches!(err, AccountError::Validation(_)), "{mobile_number} accepted");
        }
        assert_eq!(store.account_count(), 0);
    }

    #[tokio::test]
    async fn duplicate_mobile_number_is_rejected() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());
        let input = CreateAccountInput {
            mobile_number: Some("5551234".to_string()),
            ..Default::default()
        };

        svc.create_account(input.clone()).await.unwrap();
        let err = svc.create_account(input).await.unwrap_err();

        assert_eq!(validation_message(err), DUPLICATE_MOBILE_NUMBER);
    }

    #[tokio::test]
    async fn storage_conflict_surfaces_as_validation_error() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());
        store.fail_next_insert_with_conflict();

        let err = svc
            .create_account(email_input("race@example.com", None))
            .await
            .unwrap_err();

        assert_eq!(validation_message(err), DUPLICATE_ACCOUNT);
        assert_eq!(store.account_count(), 0);
    }

    #[tokio::test]
    async fn oversized_fields_are_validation_errors() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let long_email = format!("{}@example.com", "a".repeat(300));
        let err = svc
            .create_account(email_input(&long_email, None))
            .await
            .unwrap_err();
        assert_eq!(
            validation_message(err),
            "Ensure email has at most 255 characters."
        );

        let mut input = email_input("long@example.com", None);
        input.attributes.first_name = Some("x".repeat(1000));
        let err = svc.create_account(input).await.unwrap_err();
        assert_eq!(
            validation_message(err),
            "Ensure first name has at most 255 characters."
        );

        let err = svc
            .create_vendor(
                email_input("long@example.com", None),
                NewVendorProfile {
                    vendor_name: Some("v".repeat(256)),
                    category: None,
                },
            )
            .await
            .unwrap_err();
        assert_eq!(
            validation_message(err),
            "Ensure vendor name has at most 255 characters."
        );
        assert_eq!(store.account_count(), 0);
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_validation_errors() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let mut input = email_input("geo@example.com", None);
        input.attributes.latitude = Some("123456.78".parse().unwrap());
        let err = svc.create_account(input).await.unwrap_err();
        assert_eq!(
            validation_message(err),
            "Ensure latitude is between -90 and 90."
        );

        let mut input = email_input("geo@example.com", None);
        input.attributes.longitude = Some("151.2092961".parse().unwrap());
        let err = svc.create_account(input).await.unwrap_err();
        assert_eq!(
            validation_message(err),
            "Ensure longitude has no more than 6 decimal places."
        );
        assert_eq!(store.account_count(), 0);

        let mut input = email_input("geo@example.com", None);
        input.attributes.latitude = Some("-33.868820".parse().unwrap());
        input.attributes.longitude = Some("151.209296".parse().unwrap());
        let account = svc.create_account(input).await.unwrap();
        assert_eq!(account.latitude, Some("-33.868820".parse().unwrap()));
    }

    #[tokio::test]
    async fn existing_email_wins_over_a_malformed_mobile_number() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let existing = svc
            .create_account(email_input("known@example.com", None))
            .await
            .unwrap();
        let again = svc
            .create_account(CreateAccountInput {
                email: Some("known@example.com".to_string()),
                mobile_number: Some("123-456".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(again.uid, existing.uid);
        assert_eq!(store.account_count(), 1);

        let err = svc
            .create_account(CreateAccountInput {
                email: Some("new@example.com".to_string()),
                mobile_number: Some("123-456".to_string()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(
            validation_message(err),
            "Mobile number must contain only digits."
        );
    }

    #[tokio::test]
    async fn superuser_gets_staff_and_superuser_flags() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let admin = svc
            .create_superuser("admin@x.com", Some(STRONG_PASSWORD), AccountAttributes::default())
            .await
            .unwrap();

        assert!(admin.is_staff);
        assert!(admin.is_superuser);
        let stored = store.account(admin.id).unwrap();
        assert!(stored.is_staff && stored.is_superuser);

        let again = svc
            .create_superuser("ADMIN@x.com", None, AccountAttributes::default())
            .await
            .unwrap();
        assert_eq!(again.uid, admin.uid);
        assert_eq!(store.account_count(), 1);
    }

    #[tokio::test]
    async fn superuser_with_weak_password_is_rejected() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let err = svc
            .create_superuser("admin@x.com", Some("password"), AccountAttributes::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AccountError::Validation(_)));
        assert_eq!(store.account_count(), 0);
    }

    #[tokio::test]
    async fn vendor_gets_profile() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let vendor = svc
            .create_vendor(
                email_input("shop@example.com", Some(STRONG_PASSWORD)),
                NewVendorProfile {
                    vendor_name: Some("Corner Shop".to_string()),
                    category: Some("grocery".to_string()),
                },
            )
            .await
            .unwrap();

        assert!(vendor.account.is_vendor);
        assert_eq!(vendor.profile.account_id, vendor.account.id);
        assert_eq!(vendor.profile.vendor_name.as_deref(), Some("Corner Shop"));

        let fetched = svc.get_vendor(vendor.account.uid).await.unwrap().unwrap();
        assert_eq!(fetched, vendor);

        let again = svc
            .create_vendor(email_input("shop@example.com", None), NewVendorProfile::default())
            .await
            .unwrap();
        assert_eq!(again.account.uid, vendor.account.uid);
        assert_eq!(again.profile.vendor_name.as_deref(), Some("Corner Shop"));
    }

    #[tokio::test]
    async fn vendor_path_rejects_existing_customer_email() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        let customer = svc
            .create_account(email_input("buyer@example.com", None))
            .await
            .unwrap();
        let err = svc
            .create_vendor(email_input("buyer@example.com", None), NewVendorProfile::default())
            .await
            .unwrap_err();

        assert_eq!(validation_message(err), EXISTING_NON_VENDOR);
        assert!(svc.get_vendor(customer.uid).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn register_mobile_stores_hashed_code_and_dispatches_it() {
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::new();
        let svc = service(&store, &notifier);

        let account = svc.register_mobile("5551234").await.unwrap();

        let (destination, code) = notifier
            .next(Duration::from_secs(2))
            .await
            .expect("code dispatched");
        assert_eq!(destination, Destination::Sms("5551234".to_string()));
        assert_eq!(code.len(), 6);
        assert!(code.chars().all(|ch| ch.is_ascii_digit()));

        let stored = store.account(account.id).unwrap();
        assert_eq!(stored.verification_code, Some(otp::hash_otp(&code)));
        let expiry = stored.verification_code_expiry.unwrap();
        assert!(expiry.with_timezone(&chrono::Utc) > chrono::Utc::now());
        assert!(!stored.phone_verified);
    }

    #[tokio::test]
    async fn register_mobile_rejects_taken_number() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        svc.register_mobile("5551234").await.unwrap();
        let err = svc.register_mobile("5551234").await.unwrap_err();

        assert!(matches!(err, AccountError::Validation(_)));
        assert_eq!(store.account_count(), 1);
    }

    #[tokio::test]
    async fn verification_code_needs_a_destination() {
        let store = InMemoryStore::new();
        let notifier = RecordingNotifier::new();
        let svc = service(&store, &notifier);

        let account = svc
            .create_account(email_input("otp@example.com", None))
            .await
            .unwrap();

        let err = svc
            .issue_verification_code(account.uid, VerificationChannel::Sms)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::Validation(_)));

        svc.issue_verification_code(account.uid, VerificationChannel::Email)
            .await
            .unwrap();
        let (destination, _) = notifier.next(Duration::from_secs(2)).await.unwrap();
        assert_eq!(destination, Destination::Email("otp@example.com".to_string()));

        let err = svc
            .issue_verification_code(Uuid::new_v4(), VerificationChannel::Email)
            .await
            .unwrap_err();
        assert!(matches!(err, AccountError::NotFound));
    }

    #[tokio::test]
    async fn unknown_uid_is_none() {
        let store = InMemoryStore::new();
        let svc = service(&store, &RecordingNotifier::new());

        assert!(svc.get(Uuid::new_v4()).await.unwrap().is_none());
        assert!(svc.get_vendor(Uuid::new_v4()).await.unwrap().is_none());
    }
}
