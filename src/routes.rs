//! Route table for the author resource.
//!
//! Each entry maps `(method, path pattern)` to the operation it invokes and the
//! access rule guarding it. The authorization middleware resolves every request
//! against this table before any handler runs, and `GET /authors/{segment}` is
//! split into lookup-by-id and search-by-name here rather than in axum.

use axum::http::Method;

use crate::auth::{Access, Policy};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorRoute {
    List,
    GetById,
    SearchByName,
    Create,
    Update,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment {
    Literal(&'static str),
    /// `{id:int}`: only segments that parse as an i32
    Int,
    /// `{name}`: any non-empty segment
    Text,
}

impl Segment {
    fn matches(&self, raw: &str) -> bool {
        match self {
            Segment::Literal(lit) => *lit == raw,
            Segment::Int => raw.parse::<i32>().is_ok(),
            Segment::Text => !raw.is_empty(),
        }
    }
}

#[derive(Debug)]
pub struct RouteSpec {
    pub method: Method,
    pattern: &'static [Segment],
    pub route: AuthorRoute,
    pub access: Access,
}

const ADMIN: Access = Access::Policy(Policy::Administrator);

const COLLECTION: &[Segment] = &[Segment::Literal("authors")];
const BY_ID: &[Segment] = &[Segment::Literal("authors"), Segment::Int];
const BY_NAME: &[Segment] = &[Segment::Literal("authors"), Segment::Text];

/// Order matters: `{id:int}` entries come before the catch-all `{name}`
pub static ROUTES: &[RouteSpec] = &[
    RouteSpec { method: Method::GET, pattern: COLLECTION, route: AuthorRoute::List, access: ADMIN },
    RouteSpec { method: Method::POST, pattern: COLLECTION, route: AuthorRoute::Create, access: ADMIN },
    RouteSpec { method: Method::GET, pattern: BY_ID, route: AuthorRoute::GetById, access: Access::Anonymous },
    RouteSpec { method: Method::PUT, pattern: BY_ID, route: AuthorRoute::Update, access: ADMIN },
    RouteSpec { method: Method::DELETE, pattern: BY_ID, route: AuthorRoute::Delete, access: ADMIN },
    RouteSpec { method: Method::GET, pattern: BY_NAME, route: AuthorRoute::SearchByName, access: ADMIN },
];

#[derive(Debug, PartialEq)]
pub enum Resolution {
    Matched(&'static RouteSpec),
    /// The path exists but not for this method
    MethodNotAllowed,
    NotFound,
}

impl PartialEq for RouteSpec {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method && self.pattern == other.pattern
    }
}

/// Resolve a path relative to the API prefix, e.g. `/authors/12`
pub fn resolve(method: &Method, path: &str) -> Resolution {
    // axum answers HEAD with the GET handler, so it shares GET's access rule
    let method = if *method == Method::HEAD { Method::GET } else { method.clone() };
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let mut path_matched = false;

    for spec in ROUTES {
        let shape_matches = spec.pattern.len() == segments.len()
            && spec.pattern.iter().zip(&segments).all(|(seg, raw)| seg.matches(raw));

        if !shape_matches {
            continue;
        }
        if spec.method == method {
            return Resolution::Matched(spec);
        }
        path_matched = true;
    }

    if path_matched {
        Resolution::MethodNotAllowed
    } else {
        Resolution::NotFound
    }
}
