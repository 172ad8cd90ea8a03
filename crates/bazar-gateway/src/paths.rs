//! Public path matching with ant-style glob patterns.
//!
//! Patterns: `?` matches one character within a segment, `*` any run of
//! characters within a segment, `**` any number of whole segments.
//! Matching runs against the normalized path: query string stripped,
//! leading `/` ensured.

/// Matches request paths against the configured public path patterns.
#[derive(Debug, Clone)]
pub struct PublicPathMatcher {
    patterns: Vec<String>,
}

impl PublicPathMatcher {
    /// Create a matcher over the given patterns.
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Whether the path matches any public pattern.
    pub fn is_public(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        let normalized = normalize_path(path);
        self.patterns
            .iter()
            .any(|pattern| ant_match(pattern, &normalized))
    }
}

/// Strip the query string and ensure a leading `/`.
fn normalize_path(path: &str) -> String {
    let without_query = match path.find('?') {
        Some(idx) => &path[..idx],
        None => path,
    };
    if without_query.starts_with('/') {
        without_query.to_string()
    } else {
        format!("/{without_query}")
    }
}

/// Match an ant-style pattern against a normalized path.
fn ant_match(pattern: &str, path: &str) -> bool {
    let pattern_segments: Vec<&str> = pattern.split('/').filter(|s| !s.is_empty()).collect();
    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    match_segments(&pattern_segments, &path_segments)
}

fn match_segments(pattern: &[&str], path: &[&str]) -> bool {
    match pattern.first() {
        None => path.is_empty(),
        Some(&"**") => {
            // `**` swallows zero or more whole segments.
            match_segments(&pattern[1..], path)
                || (!path.is_empty() && match_segments(pattern, &path[1..]))
        }
        Some(segment) => match path.first() {
            None => false,
            Some(candidate) => {
                match_one_segment(segment.as_bytes(), candidate.as_bytes())
                    && match_segments(&pattern[1..], &path[1..])
            }
        },
    }
}

/// Match a single segment pattern (`*` and `?` wildcards) against a
/// segment.
fn match_one_segment(pattern: &[u8], segment: &[u8]) -> bool {
    match pattern.first() {
        None => segment.is_empty(),
        Some(b'*') => {
            match_one_segment(&pattern[1..], segment)
                || (!segment.is_empty() && match_one_segment(pattern, &segment[1..]))
        }
        Some(b'?') => !segment.is_empty() && match_one_segment(&pattern[1..], &segment[1..]),
        Some(&c) => segment.first() == Some(&c) && match_one_segment(&pattern[1..], &segment[1..]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> PublicPathMatcher {
        PublicPathMatcher::new(vec![
            "/api/v1/auth/register".to_string(),
            "/api/v1/auth/login".to_string(),
            "/api/v1/auth/refresh".to_string(),
            "/.well-known/**".to_string(),
            "/health".to_string(),
            "/docs/**".to_string(),
        ])
    }

    #[test]
    fn exact_paths_match() {
        let m = matcher();
        assert!(m.is_public("/api/v1/auth/login"));
        assert!(m.is_public("/api/v1/auth/register"));
        assert!(m.is_public("/health"));
    }

    #[test]
    fn protected_paths_do_not_match() {
        let m = matcher();
        assert!(!m.is_public("/api/v1/auth/logout"));
        assert!(!m.is_public("/api/v1/auth/logout-all"));
        assert!(!m.is_public("/api/v1/profile/me"));
    }

    #[test]
    fn double_star_spans_segments() {
        let m = matcher();
        assert!(m.is_public("/.well-known/jwks.json"));
        assert!(m.is_public("/docs/openapi/v3.json"));
        assert!(m.is_public("/docs"));
    }

    #[test]
    fn query_string_is_stripped() {
        let m = matcher();
        assert!(m.is_public("/health?verbose=1"));
        assert!(!m.is_public("/api/v1/orders?id=1"));
    }

    #[test]
    fn leading_slash_is_ensured() {
        let m = matcher();
        assert!(m.is_public("api/v1/auth/login"));
    }

    #[test]
    fn single_star_stays_within_segment() {
        let m = PublicPathMatcher::new(vec!["/files/*.png".to_string()]);
        assert!(m.is_public("/files/logo.png"));
        assert!(!m.is_public("/files/nested/logo.png"));
        assert!(!m.is_public("/files/logo.jpg"));
    }

    #[test]
    fn question_mark_matches_one_character() {
        let m = PublicPathMatcher::new(vec!["/v?/ping".to_string()]);
        assert!(m.is_public("/v1/ping"));
        assert!(m.is_public("/v2/ping"));
        assert!(!m.is_public("/v10/ping"));
    }

    #[test]
    fn empty_path_is_not_public() {
        assert!(!matcher().is_public(""));
    }
}
