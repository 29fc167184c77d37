//! Screen routes, the admin route guard and the navigation menu.

use std::fmt;

use super::ConferenceId;
use super::session::SessionState;

/// Every screen the client can show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    ConferenceDetail(ConferenceId),
    AdminDashboard,
    AdminConferences,
    AdminUsers,
}

impl Route {
    /// URL-style path of the route, also its display form.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_owned(),
            Self::Login => "/login".to_owned(),
            Self::ConferenceDetail(id) => format!("/conference/{id}"),
            Self::AdminDashboard => "/admin".to_owned(),
            Self::AdminConferences => "/admin/conferences".to_owned(),
            Self::AdminUsers => "/admin/users".to_owned(),
        }
    }

    /// Only the admin area is guarded; the other screens are public.
    pub fn requires_admin(&self) -> bool {
        matches!(
            self,
            Self::AdminDashboard | Self::AdminConferences | Self::AdminUsers
        )
    }

    /// Guard decision for this route under `session`.
    pub fn decide(&self, session: &SessionState) -> GuardDecision {
        evaluate(
            session.is_authenticated(),
            session.is_admin(),
            self.requires_admin(),
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of the route guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Show the requested screen.
    Render,
    /// No session: go to the login screen.
    RedirectToLogin,
    /// Signed in without the required rights: go home.
    RedirectToHome,
}

impl GuardDecision {
    /// Route the user lands on instead, if redirected.
    pub fn redirect(self) -> Option<Route> {
        match self {
            Self::Render => None,
            Self::RedirectToLogin => Some(Route::Login),
            Self::RedirectToHome => Some(Route::Home),
        }
    }
}

/// Decide whether a screen may render.
///
/// ```
/// use conference_frontend::domain::route_guard::{evaluate, GuardDecision};
///
/// assert_eq!(evaluate(false, false, true), GuardDecision::RedirectToLogin);
/// assert_eq!(evaluate(true, false, true), GuardDecision::RedirectToHome);
/// assert_eq!(evaluate(true, true, true), GuardDecision::Render);
/// ```
pub fn evaluate(token_present: bool, is_admin: bool, require_admin: bool) -> GuardDecision {
    if !require_admin {
        return GuardDecision::Render;
    }
    if !token_present {
        return GuardDecision::RedirectToLogin;
    }
    if is_admin {
        GuardDecision::Render
    } else {
        GuardDecision::RedirectToHome
    }
}

/// Entry of the top navigation menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    /// Link to a screen.
    Link { label: &'static str, route: Route },
    /// Drop the session.
    Logout,
}

impl NavItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Link { label, .. } => *label,
            Self::Logout => "Logout",
        }
    }
}

/// Menu entries for the current session.
pub fn navigation_items(session: &SessionState) -> Vec<NavItem> {
    let mut items = vec![NavItem::Link {
        label: "Home",
        route: Route::Home,
    }];
    if session.is_admin() {
        items.push(NavItem::Link {
            label: "Administration",
            route: Route::AdminDashboard,
        });
    }
    if session.is_authenticated() {
        items.push(NavItem::Logout);
    } else {
        items.push(NavItem::Link {
            label: "Login",
            route: Route::Login,
        });
    }
    items
}
