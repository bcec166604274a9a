use std::collections::BTreeSet;

use super::*;
use crate::state::auth::Session;

fn signed_in(roles: &[Role]) -> AuthState {
    AuthState::Authenticated(Session {
        subject_id: 1,
        username: "ana".to_owned(),
        email: None,
        phone_number: None,
        roles: roles.iter().copied().collect::<BTreeSet<_>>(),
        token: "t".to_owned(),
    })
}

#[test]
fn unauthenticated_redirects_to_login() {
    assert_eq!(check_route(&AuthState::Unauthenticated, None), RouteAccess::Redirect(Redirect::Login));
}

#[test]
fn missing_role_redirects_to_unauthorized() {
    let state = signed_in(&[Role::ClientBasic]);
    assert_eq!(check_route(&state, Some(&[Role::AdminBasic])), RouteAccess::Redirect(Redirect::Unauthorized));
}

#[test]
fn any_required_role_is_enough() {
    let state = signed_in(&[Role::AdminManager]);
    assert_eq!(check_route(&state, Some(&[Role::AdminBasic, Role::AdminManager])), RouteAccess::Allow);
    assert_eq!(check_route(&state, None), RouteAccess::Allow);
}

#[test]
fn empty_role_list_admits_nobody() {
    let state = signed_in(&[Role::AdminGod, Role::ClientBasic]);
    assert_eq!(check_route(&state, Some(&[])), RouteAccess::Redirect(Redirect::Unauthorized));
    assert_eq!(check_route(&AuthState::Unauthenticated, Some(&[])), RouteAccess::Redirect(Redirect::Login));
}

#[test]
fn home_view_by_role() {
    assert_eq!(home_view(&AuthState::Unauthenticated), HomeView::Login);
    assert_eq!(home_view(&signed_in(&[Role::ClientPlus])), HomeView::ClientDashboard);
    assert_eq!(home_view(&signed_in(&[Role::ClientBasic, Role::AdminGod])), HomeView::CatalogDashboard);
}

#[test]
fn nav_links_by_role() {
    let labels = |state: &AuthState| nav_links(state).iter().map(|l| l.label).collect::<Vec<_>>();
    assert_eq!(labels(&AuthState::Unauthenticated), vec!["Login"]);
    assert_eq!(labels(&signed_in(&[Role::ClientBasic])), vec!["Home", "Create Listing"]);
    assert_eq!(labels(&signed_in(&[Role::AdminBasic])), vec!["Dashboard", "Catalog"]);
    assert!(labels(&signed_in(&[Role::ClientPlus])).is_empty());
}

#[test]
fn redirect_paths() {
    assert_eq!(Redirect::Login.path(), "/login");
    assert_eq!(Redirect::Home.path(), "/");
    assert_eq!(Redirect::Unauthorized.path(), "/unauthorized");
}
