//! Package URL parsing.

/// The parts of a `pkg:<ecosystem>/<name>[@<version>]` identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Purl {
    pub ecosystem: String,
    /// Kept exactly as written: not percent-decoded, `/` retained.
    pub name: String,
    pub version: Option<String>,
}

/// Parse a purl, or `None` if the string does not have the purl shape.
///
/// A `None` is not a lookup failure; callers fall through to another
/// strategy. The version starts at the first `@` that follows at least one
/// character of name and is itself followed by at least one character, so
/// `pkg:npm/@scope/pkg@1.0.0` keeps the scope in the name.
pub fn parse_purl(purl: &str) -> Option<Purl> {
    if purl.contains(['\n', '\r']) {
        return None;
    }

    let rest = purl.strip_prefix("pkg:")?;
    let (ecosystem, rest) = rest.split_once('/')?;
    if ecosystem.is_empty() || rest.is_empty() {
        return None;
    }

    let split = rest
        .char_indices()
        .skip(1)
        .find(|&(i, c)| c == '@' && i + 1 < rest.len())
        .map(|(i, _)| i);

    let (name, version) = match split {
        Some(i) => (&rest[..i], Some(rest[i + 1..].to_string())),
        None => (rest, None),
    };

    Some(Purl {
        ecosystem: ecosystem.to_string(),
        name: name.to_string(),
        version,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn purl(ecosystem: &str, name: &str, version: Option<&str>) -> Purl {
        Purl {
            ecosystem: ecosystem.to_string(),
            name: name.to_string(),
            version: version.map(str::to_string),
        }
    }

    #[test]
    fn test_simple() {
        assert_eq!(parse_purl("pkg:npm/lodash"), Some(purl("npm", "lodash", None)));
    }

    #[test]
    fn test_with_version() {
        assert_eq!(
            parse_purl("pkg:npm/lodash@4.17.21"),
            Some(purl("npm", "lodash", Some("4.17.21")))
        );
    }

    #[test]
    fn test_scoped_name_not_decoded() {
        assert_eq!(
            parse_purl("pkg:npm/%40babel/core@7.0.0"),
            Some(purl("npm", "%40babel/core", Some("7.0.0")))
        );
        assert_eq!(
            parse_purl("pkg:npm/@babel/core@7.0.0"),
            Some(purl("npm", "@babel/core", Some("7.0.0")))
        );
        assert_eq!(
            parse_purl("pkg:golang/github.com/gorilla/mux"),
            Some(purl("golang", "github.com/gorilla/mux", None))
        );
    }

    #[test]
    fn test_trailing_at_stays_in_name() {
        assert_eq!(parse_purl("pkg:npm/lodash@"), Some(purl("npm", "lodash@", None)));
    }

    #[test]
    fn test_invalid() {
        assert_eq!(parse_purl("not-a-purl"), None);
        assert_eq!(parse_purl("npm/lodash"), None);
        assert_eq!(parse_purl("pkg:npm"), None);
        assert_eq!(parse_purl("pkg:/lodash"), None);
        assert_eq!(parse_purl("pkg:npm/"), None);
        assert_eq!(parse_purl("pkg:npm/lo\ndash"), None);
    }
}
