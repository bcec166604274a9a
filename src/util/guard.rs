//! Route guards and role-driven navigation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every screen applies the same decisions: who may enter a route, which
//! home view a user lands on, and which navigation links they see.

use crate::state::auth::{AuthState, Role};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Login,
    Home,
    Unauthorized,
}

impl Redirect {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Home => "/",
            Self::Unauthorized => "/unauthorized",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Allow,
    Redirect(Redirect),
}

/// Decide entry to a protected route.
///
/// `None` admits any signed-in user. `Some(roles)` requires holding at least
/// one of `roles`, so an empty list admits nobody.
#[must_use]
pub fn check_route(state: &AuthState, required: Option<&[Role]>) -> RouteAccess {
    let Some(session) = state.session() else {
        return RouteAccess::Redirect(Redirect::Login);
    };
    match required {
        None => RouteAccess::Allow,
        Some(roles) if roles.iter().any(|role| session.has_role(*role)) => RouteAccess::Allow,
        Some(_) => RouteAccess::Redirect(Redirect::Unauthorized),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeView {
    Login,
    CatalogDashboard,
    ClientDashboard,
}

#[must_use]
pub fn home_view(state: &AuthState) -> HomeView {
    match state.session() {
        None => HomeView::Login,
        Some(session) if session.is_admin() => HomeView::CatalogDashboard,
        Some(_) => HomeView::ClientDashboard,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
}

/// Links shown in the header. Signed-out users get only the login link.
#[must_use]
pub fn nav_links(state: &AuthState) -> Vec<NavLink> {
    let Some(session) = state.session() else {
        return vec![NavLink { label: "Login", path: "/login" }];
    };

    let mut links = Vec::new();
    if session.has_role(Role::ClientBasic) {
        links.push(NavLink { label: "Home", path: "/" });
        links.push(NavLink { label: "Create Listing", path: "/create-listing" });
    }
    if [Role::AdminBasic, Role::AdminManager, Role::AdminGod].iter().any(|r| session.has_role(*r)) {
        links.push(NavLink { label: "Dashboard", path: "/" });
        links.push(NavLink { label: "Catalog", path: "/catalog" });
    }
    links
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
