//! Helpers for the IRI identifiers the backend uses (`/api/posts/12`).

/// Return the last non-empty path segment of an IRI, ignoring any query
/// string or fragment. An empty input yields an empty string.
pub fn id_from_iri(iri: &str) -> &str {
    let path = iri.split(['?', '#']).next().unwrap_or_default();
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .next_back()
        .unwrap_or_default()
}

/// Build the IRI of a resource from a collection name and a bare id.
///
/// Values that already look like an IRI are returned unchanged.
pub fn resource_iri(collection: &str, id: &str) -> String {
    if id.starts_with('/') {
        return id.to_string();
    }
    format!("/api/{collection}/{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_trailing_segment() {
        assert_eq!(id_from_iri("/api/posts/12"), "12");
        assert_eq!(id_from_iri("/api/posts/12/"), "12");
    }

    #[test]
    fn ignores_query_and_fragment() {
        assert_eq!(id_from_iri("/api/blogs/3?page=2"), "3");
        assert_eq!(id_from_iri("/api/blogs/3#top"), "3");
    }

    #[test]
    fn empty_inputs_yield_empty_id() {
        assert_eq!(id_from_iri(""), "");
        assert_eq!(id_from_iri("///"), "");
    }

    #[test]
    fn resource_iri_keeps_existing_iri() {
        assert_eq!(resource_iri("blogs", "4"), "/api/blogs/4");
        assert_eq!(resource_iri("blogs", "/api/blogs/4"), "/api/blogs/4");
    }
}
