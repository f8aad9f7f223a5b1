pub mod account_credentials;
pub mod accounts;
pub mod vendor_profiles;
