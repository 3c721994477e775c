//! Route guard.
//!
//! A pure function of the current session and a route requirement. The
//! frontend re-evaluates it whenever the session changes, so signing out on
//! a protected page swaps the content for the prompt immediately.

use crate::route::AppRoute;
use crate::session::Session;

/// What a route needs before its content may render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteRequirement {
    pub require_auth: bool,
    /// Implies `require_auth`.
    pub require_admin: bool,
}

impl RouteRequirement {
    pub const fn public() -> Self {
        Self {
            require_auth: false,
            require_admin: false,
        }
    }

    pub const fn authenticated() -> Self {
        Self {
            require_auth: true,
            require_admin: false,
        }
    }

    pub const fn admin() -> Self {
        Self {
            require_auth: true,
            require_admin: true,
        }
    }

    fn needs_auth(&self) -> bool {
        self.require_auth || self.require_admin
    }
}

/// Content of a blocking prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: &'static str,
    pub message: &'static str,
    pub action_text: &'static str,
    pub action_link: String,
    /// Extra link under the action, if any: (text, target).
    pub secondary_link: Option<(&'static str, String)>,
}

impl Prompt {
    pub fn auth_required() -> Self {
        Self {
            title: "Sign-in required",
            message: "You need to sign in to continue.",
            action_text: "Sign in",
            action_link: AppRoute::Login.to_path(),
            secondary_link: Some((
                "Don't have an account? Register here",
                AppRoute::Register.to_path(),
            )),
        }
    }

    pub fn access_denied() -> Self {
        Self {
            title: "Access denied",
            message: "You need administrator permissions to access this section.",
            action_text: "Go to start",
            action_link: "/".to_string(),
            secondary_link: None,
        }
    }
}

/// Guard decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Render,
    AuthRequired(Prompt),
    AccessDenied(Prompt),
}

impl GuardOutcome {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardOutcome::Render)
    }
}

/// Decides what a route shows for `session`.
pub fn evaluate(session: &Session, requirement: RouteRequirement) -> GuardOutcome {
    if requirement.needs_auth() && !session.is_authenticated {
        return GuardOutcome::AuthRequired(Prompt::auth_required());
    }

    if requirement.require_admin && !session.is_admin() {
        return GuardOutcome::AccessDenied(Prompt::access_denied());
    }

    GuardOutcome::Render
}
