use axum::Router;
use axum_extra::extract::cookie::{Cookie, SameSite};
use cookie::time::Duration;
use std::sync::Arc;

use crate::{config::Config, state::AppState};

pub mod mobile;
pub mod password;

pub fn routes(state: Arc<AppState>) -> Router {
    password::routes(state.clone()).merge(mobile::routes(state))
}

fn same_site(value: &str) -> SameSite {
    match value {
        "strict" => SameSite::Strict,
        "lax" => SameSite::Lax,
        _ => SameSite::None,
    }
}

/// Session cookie carrying the configured name, lifetime and attributes.
pub(crate) fn session_cookie(config: &Config, value: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(config.auth_cookie_name.clone(), value);
    cookie.set_http_only(config.auth_cookie_http_only);
    cookie.set_secure(config.auth_cookie_secure);
    cookie.set_path(config.auth_cookie_path.clone());
    cookie.set_same_site(same_site(&config.auth_cookie_same_site));
    cookie.set_max_age(Duration::seconds(
        i64::try_from(config.auth_cookie_max_age_seconds).unwrap_or(i64::MAX),
    ));
    if let Some(domain) = &config.auth_cookie_domain {
        cookie.set_domain(domain.clone());
    }
    cookie
}

/// Same attributes as [`session_cookie`], expired.
pub(crate) fn cleared_session_cookie(config: &Config) -> Cookie<'static> {
    let mut cookie = session_cookie(config, String::new());
    cookie.set_max_age(Duration::seconds(0));
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::config::{ConfigService, ConfigServiceImpl};

    #[test]
    fn cookie_follows_configuration() {
        let config = ConfigServiceImpl::from_lookup(|_| None).values().clone();
        let cookie = session_cookie(&config, "abc".to_string());

        assert_eq!(cookie.name(), "access");
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(Duration::hours(24)));
        assert_eq!(cookie.domain(), None);

        let cleared = cleared_session_cookie(&config);
        assert_eq!(cleared.value(), "");
        assert_eq!(cleared.max_age(), Some(Duration::ZERO));
    }

    #[test]
    fn same_site_parses_known_values() {
        assert_eq!(same_site("lax"), SameSite::Lax);
        assert_eq!(same_site("strict"), SameSite::Strict);
        assert_eq!(same_site("none"), SameSite::None);
        assert_eq!(same_site("bogus"), SameSite::None);
    }
}
