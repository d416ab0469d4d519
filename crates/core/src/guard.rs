//! Route guard decision state machine.
//!
//! Runs wherever guarded views are rendered. The guard never renders
//! restricted content while the session is still resolving, and it picks a
//! role-appropriate landing page when access is denied: backoffice roles go
//! to the dashboard, everyone else to their order history.
//!
//! The machine is pure: it owns no session state and performs no I/O. It is
//! re-evaluated from scratch whenever the session or the route's required
//! roles change, so a stale decision can never be cached across navigations.

use crate::types::{EdgeUser, Role};

/// Landing page for unauthenticated visitors.
pub const LOGIN_PATH: &str = "/auth/login";
/// Landing page for backoffice roles denied a route.
pub const DASHBOARD_PATH: &str = "/admin/dashboard";
/// Landing page for customers denied a route.
pub const ORDER_HISTORY_PATH: &str = "/account/orders";

/// What the guard currently knows about the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// Session resolution is still in flight.
    Loading,
    /// Resolution finished; `None` means no user is logged in.
    Resolved(Option<EdgeUser>),
}

/// The guard's decision for a guarded route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Session status unknown; render a placeholder, take no redirect action.
    Loading,
    /// No user; redirect to the login page.
    Unauthenticated,
    /// A user exists but its role is not in the route's required set;
    /// redirect to the contained landing page without rendering.
    Forbidden {
        /// Role-appropriate landing page.
        redirect_to: &'static str,
    },
    /// Role satisfies the requirement; render the guarded content.
    Authorized,
}

impl GuardState {
    /// Evaluate the guard for a route requiring one of `required_roles`.
    ///
    /// An empty `required_roles` slice means the route only requires a login,
    /// not a particular role.
    #[must_use]
    pub fn evaluate(status: &SessionStatus, required_roles: &[Role]) -> Self {
        let user = match status {
            SessionStatus::Loading => return Self::Loading,
            SessionStatus::Resolved(None) => return Self::Unauthenticated,
            SessionStatus::Resolved(Some(user)) => user,
        };

        if required_roles.is_empty() || required_roles.contains(&user.role) {
            Self::Authorized
        } else {
            Self::Forbidden {
                redirect_to: denied_landing_page(user.role),
            }
        }
    }

    /// Where to navigate for this state, if anywhere.
    #[must_use]
    pub const fn redirect_target(&self) -> Option<&'static str> {
        match self {
            Self::Loading | Self::Authorized => None,
            Self::Unauthenticated => Some(LOGIN_PATH),
            Self::Forbidden { redirect_to } => Some(*redirect_to),
        }
    }
}

/// Landing page for a user denied access to a route.
const fn denied_landing_page(role: Role) -> &'static str {
    if role.is_administrative() {
        DASHBOARD_PATH
    } else {
        ORDER_HISTORY_PATH
    }
}
