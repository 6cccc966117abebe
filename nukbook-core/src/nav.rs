//! Navigation targets: auth redirects and active menu entries

/// Where a view should send the user after an auth failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Session missing or rejected; come back to `next` after login
    Login { next: String },
    /// Logged in but not allowed here
    Home,
}

impl Redirect {
    pub fn login(next: impl Into<String>) -> Self {
        Redirect::Login { next: next.into() }
    }

    /// Target URL, e.g. `/login?next=%2Fadmin%2Fauthors`
    pub fn to_url(&self) -> String {
        match self {
            Redirect::Login { next } => format!("/login?next={}", urlencoding::encode(next)),
            Redirect::Home => "/".to_string(),
        }
    }
}

impl std::fmt::Display for Redirect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_url())
    }
}

/// Strip trailing slashes, keeping `/` itself
pub fn normalize_path(path: &str) -> &str {
    if path == "/" {
        return path;
    }
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Pick the menu entry matching `pathname`
///
/// An entry matches on equality or as a path prefix; the longest match wins.
/// `/` only matches the root itself.
pub fn active_href<'a>(hrefs: &[&'a str], pathname: Option<&str>) -> Option<&'a str> {
    let path = normalize_path(pathname?);
    let mut best: Option<&'a str> = None;

    for &href in hrefs {
        let candidate = normalize_path(href);
        if candidate == "/" {
            if path == "/" {
                best = Some(href);
            }
            continue;
        }

        let matches = path == candidate
            || (path.starts_with(candidate) && path[candidate.len()..].starts_with('/'));
        if !matches {
            continue;
        }

        match best {
            Some(current) if normalize_path(current).len() >= candidate.len() => {}
            _ => best = Some(href),
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_redirect_encodes_next() {
        let redirect = Redirect::login("/admin/authors");
        assert_eq!(redirect.to_url(), "/login?next=%2Fadmin%2Fauthors");
        assert_eq!(Redirect::Home.to_url(), "/");
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/shelves///"), "/shelves");
        assert_eq!(normalize_path("/"), "/");
        assert_eq!(normalize_path("//"), "/");
    }

    #[test]
    fn test_active_href_longest_prefix() {
        let hrefs = ["/", "/me", "/me/settings", "/shelves"];
        assert_eq!(active_href(&hrefs, Some("/me/settings/")), Some("/me/settings"));
        assert_eq!(active_href(&hrefs, Some("/me/requests")), Some("/me"));
        assert_eq!(active_href(&hrefs, Some("/shelves/4")), Some("/shelves"));
        assert_eq!(active_href(&hrefs, Some("/")), Some("/"));
    }

    #[test]
    fn test_active_href_requires_segment_boundary() {
        let hrefs = ["/me"];
        assert_eq!(active_href(&hrefs, Some("/media")), None);
        assert_eq!(active_href(&hrefs, None), None);
    }
}
