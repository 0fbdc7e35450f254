use axum::http::{HeaderMap, HeaderName};

use crate::api::dto::{AuthorWithBooksDto, LinkDto};
use crate::auth::{Caller, Policy};

/// Header values that switch link injection off even though the header is present
const FALSY: [&str; 4] = ["false", "0", "no", "off"];

/// Present with any value except an explicit falsy one means "include links"
pub fn links_requested(headers: &HeaderMap, header_name: &str) -> bool {
    // from_bytes lowercases, so configured names like "includeHATEOAS" still match
    let Ok(name) = HeaderName::from_bytes(header_name.as_bytes()) else {
        return false;
    };

    match headers.get(&name) {
        None => false,
        Some(value) => match value.to_str() {
            Ok(v) => {
                let v = v.trim();
                !FALSY.iter().any(|f| v.eq_ignore_ascii_case(f))
            }
            Err(_) => false,
        },
    }
}

/// Append navigational links to a single-author response, limited to what the
/// caller may do. Returns the DTO untouched when links were not requested.
pub fn enrich(
    mut dto: AuthorWithBooksDto,
    caller: &Caller,
    include_links: bool,
    authors_path: &str,
) -> AuthorWithBooksDto {
    if !include_links {
        return dto;
    }

    let href = format!("{}/{}", authors_path, dto.id);
    let mut links = vec![link("self", &href, "GET")];

    if caller.satisfies(Policy::Administrator) {
        links.push(link("update-author", &href, "PUT"));
        links.push(link("delete-author", &href, "DELETE"));
    }

    dto.links = Some(links);
    dto
}

fn link(relation: &str, href: &str, method: &str) -> LinkDto {
    LinkDto {
        relation: relation.to_string(),
        href: href.to_string(),
        method: method.to_string(),
    }
}
