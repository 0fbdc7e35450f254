use thiserror::Error;

use super::Claims;

/// Named authorization rules evaluated against a caller's claims
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Administrator,
}

impl Policy {
    pub fn name(&self) -> &'static str {
        match self {
            Policy::Administrator => "administrator",
        }
    }

    fn is_satisfied_by(&self, user: &AuthUser) -> bool {
        match self {
            Policy::Administrator => user.admin,
        }
    }
}

/// Access rule attached to a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Exempt from any policy check, even when the surrounding resource requires one
    Anonymous,
    Policy(Policy),
}

/// Authenticated user context extracted from a verified token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
    pub admin: bool,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            email: claims.sub,
            admin: claims.admin,
        }
    }
}

/// Who is calling, as far as the bearer credential tells us
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    /// A credential was presented but could not be verified
    InvalidCredential(String),
    Authenticated(AuthUser),
}

impl Caller {
    pub fn satisfies(&self, policy: Policy) -> bool {
        match self {
            Caller::Authenticated(user) => policy.is_satisfied_by(user),
            _ => false,
        }
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            Caller::Authenticated(user) => Some(&user.email),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Denial {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("Policy '{}' is not satisfied", .0.name())]
    PolicyDenied(Policy),
}

/// Evaluate a caller against a route's access rule. Pure; no side effects on denial.
pub fn authorize(caller: &Caller, access: Access) -> Result<(), Denial> {
    let policy = match access {
        Access::Anonymous => return Ok(()),
        Access::Policy(policy) => policy,
    };

    match caller {
        Caller::Anonymous => Err(Denial::Unauthenticated("Missing bearer token".to_string())),
        Caller::InvalidCredential(reason) => Err(Denial::Unauthenticated(reason.clone())),
        Caller::Authenticated(user) if policy.is_satisfied_by(user) => Ok(()),
        Caller::Authenticated(_) => Err(Denial::PolicyDenied(policy)),
    }
}
