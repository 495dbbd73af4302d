//! Navigation policy
//!
//! Decides where a caller should be sent given the session state and the
//! route currently shown. Pure; performing the navigation is up to the caller.

use crate::session::SessionState;
use std::fmt;

/// Route keys reachable without a session
pub const AUTH_ROUTES: [&str; 4] = ["login", "register", "reset", "forgot"];

/// A navigation target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    /// Any other route, by key
    Other(String),
}

impl Route {
    /// Parse a path; the key is its last non-empty segment (`""` for `/`)
    pub fn parse(path: &str) -> Self {
        match route_key(path) {
            "login" => Self::Login,
            "home" => Self::Home,
            other => Self::Other(other.to_string()),
        }
    }

    /// Route key without slashes
    pub fn key(&self) -> &str {
        match self {
            Self::Login => "login",
            Self::Home => "home",
            Self::Other(key) => key,
        }
    }

    /// Absolute path, e.g. `/login`
    pub fn path(&self) -> String {
        format!("/{}", self.key())
    }

    /// Check if the route is reachable without a session
    pub fn is_auth(&self) -> bool {
        AUTH_ROUTES.contains(&self.key())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn route_key(path: &str) -> &str {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .unwrap_or("")
}

/// Where to send the caller, or `None` to stay put
pub fn decide_redirect(session: &SessionState, current: &str) -> Option<Route> {
    if session.loading {
        return None;
    }

    let route = Route::parse(current);
    match &session.user {
        None if !route.is_auth() => Some(Route::Login),
        Some(_) if route.key().is_empty() || route.is_auth() => Some(Route::Home),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::user;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn anonymous() -> SessionState {
        SessionState::anonymous()
    }

    fn signed_in() -> SessionState {
        SessionState::signed_in(user("u1"))
    }

    #[test_case("/", "" ; "root")]
    #[test_case("/login", "login" ; "single segment")]
    #[test_case("/restaurants/add", "add" ; "nested")]
    #[test_case("/home/", "home" ; "trailing slash")]
    #[test_case("", "" ; "empty")]
    fn test_route_key(path: &str, expected: &str) {
        assert_eq!(Route::parse(path).key(), expected);
    }

    #[test_case("/" ; "root")]
    #[test_case("/home" ; "home")]
    #[test_case("/profile" ; "profile")]
    #[test_case("/restaurants/add" ; "nested")]
    fn test_anonymous_sent_to_login(path: &str) {
        assert_eq!(decide_redirect(&anonymous(), path), Some(Route::Login));
    }

    #[test_case("/login" ; "login")]
    #[test_case("/register" ; "register")]
    #[test_case("/reset" ; "reset")]
    #[test_case("/forgot" ; "forgot")]
    fn test_anonymous_stays_on_auth_routes(path: &str) {
        assert_eq!(decide_redirect(&anonymous(), path), None);
    }

    #[test_case("/" ; "root")]
    #[test_case("/login" ; "login")]
    #[test_case("/register" ; "register")]
    #[test_case("/reset" ; "reset")]
    #[test_case("/forgot" ; "forgot")]
    fn test_signed_in_sent_home(path: &str) {
        assert_eq!(decide_redirect(&signed_in(), path), Some(Route::Home));
    }

    #[test_case("/home" ; "home")]
    #[test_case("/profile" ; "profile")]
    #[test_case("/restaurants/add" ; "nested")]
    fn test_signed_in_stays(path: &str) {
        assert_eq!(decide_redirect(&signed_in(), path), None);
    }

    #[test]
    fn test_loading_never_redirects() {
        let loading = SessionState::default();
        assert_eq!(decide_redirect(&loading, "/"), None);
        assert_eq!(decide_redirect(&loading, "/profile"), None);
    }

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::Login.path(), "/login");
        assert_eq!(Route::Home.to_string(), "/home");
        assert_eq!(Route::parse("/a/profile").path(), "/profile");
        assert!(Route::parse("/forgot").is_auth());
        assert!(!Route::Home.is_auth());
    }
}
