//! Client-side navigation gating as a pure function.
//!
//! This mirrors what the portal frontend runs before each navigation.
//! It is UX-level gating only and carries no authority; every sensitive
//! operation is independently authorized server-side by the bearer
//! middleware.

use crate::models::Role;

/// Who may land on a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Anyone, signed in or not.
    Public,
    /// Only signed-out visitors (login, register, recovery pages).
    GuestOnly,
    /// Any signed-in user.
    Authenticated,
    /// Signed-in users with this role. Admin bypasses the check.
    Role(Role),
}

#[derive(Debug, Clone, Copy)]
pub struct RouteSpec {
    pub path: &'static str,
    pub access: RouteAccess,
}

/// Session flags as the client holds them in local storage.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(&'static str),
}

pub fn role_home(role: Role) -> &'static str {
    match role {
        Role::Patient => "/patient/dashboard",
        Role::Doctor => "/doctor/dashboard",
        Role::Admin => "/admin/dashboard",
    }
}

/// The portal's route table.
pub const ROUTES: &[RouteSpec] = &[
    RouteSpec { path: "/", access: RouteAccess::Public },
    RouteSpec { path: "/login", access: RouteAccess::GuestOnly },
    RouteSpec { path: "/register", access: RouteAccess::GuestOnly },
    RouteSpec { path: "/forgot-password", access: RouteAccess::GuestOnly },
    RouteSpec { path: "/reset-password", access: RouteAccess::GuestOnly },
    RouteSpec { path: "/profile", access: RouteAccess::Authenticated },
    RouteSpec { path: "/patient/dashboard", access: RouteAccess::Role(Role::Patient) },
    RouteSpec { path: "/patient/appointments", access: RouteAccess::Role(Role::Patient) },
    RouteSpec { path: "/doctor/dashboard", access: RouteAccess::Role(Role::Doctor) },
    RouteSpec { path: "/doctor/patients", access: RouteAccess::Role(Role::Doctor) },
    RouteSpec { path: "/admin/dashboard", access: RouteAccess::Role(Role::Admin) },
    RouteSpec { path: "/admin/users", access: RouteAccess::Role(Role::Admin) },
];

pub fn find_route(path: &str) -> Option<&'static RouteSpec> {
    ROUTES.iter().find(|route| route.path == path)
}

/// Evaluates the guard rules in order:
/// 1. unauthenticated visitors may not enter auth-required routes;
/// 2. authenticated users skip guest-only pages;
/// 3. role-gated routes redirect users of other roles to their own
///    home, with admin bypassing the role check.
pub fn evaluate(route: &RouteSpec, session: &SessionState) -> GuardDecision {
    let own_home = session.role.map(role_home).unwrap_or("/login");

    if !session.is_authenticated {
        return match route.access {
            RouteAccess::Public | RouteAccess::GuestOnly => GuardDecision::Allow,
            RouteAccess::Authenticated | RouteAccess::Role(_) => {
                GuardDecision::Redirect("/login")
            }
        };
    }

    match route.access {
        RouteAccess::Public | RouteAccess::Authenticated => GuardDecision::Allow,
        RouteAccess::GuestOnly => GuardDecision::Redirect(own_home),
        RouteAccess::Role(required) => match session.role {
            Some(Role::Admin) => GuardDecision::Allow,
            Some(role) if role == required => GuardDecision::Allow,
            _ => GuardDecision::Redirect(own_home),
        },
    }
}
