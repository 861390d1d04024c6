use url::Url;

use super::{CanonicalizeError, CanonicalizeResult};
use crate::types::{Component, is_special_scheme};

const DUMMY_URL: &str = "http://dummy.test";
// Non-special, so query text uses the plain query encode set.
const NON_SPECIAL_DUMMY_URL: &str = "dummy://dummy.test";

fn invalid(component: Component, value: &str) -> CanonicalizeError {
    CanonicalizeError::InvalidValue {
        component,
        value: value.to_string(),
    }
}

fn dummy_url(component: Component, value: &str) -> CanonicalizeResult<Url> {
    Url::parse(DUMMY_URL).map_err(|_| invalid(component, value))
}

fn non_special_dummy_url(component: Component, value: &str) -> CanonicalizeResult<Url> {
    Url::parse(NON_SPECIAL_DUMMY_URL).map_err(|_| invalid(component, value))
}

pub fn canonicalize_protocol(value: &str) -> CanonicalizeResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    Url::parse(&format!("{value}://dummy.test"))
        .map(|url| url.scheme().to_string())
        .map_err(|_| invalid(Component::Protocol, value))
}

pub fn canonicalize_username(value: &str) -> CanonicalizeResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let mut url = dummy_url(Component::Username, value)?;
    url::quirks::set_username(&mut url, value).map_err(|_| invalid(Component::Username, value))?;
    Ok(url.username().to_string())
}

pub fn canonicalize_password(value: &str) -> CanonicalizeResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let mut url = dummy_url(Component::Password, value)?;
    url::quirks::set_password(&mut url, value).map_err(|_| invalid(Component::Password, value))?;
    Ok(url.password().unwrap_or_default().to_string())
}

pub fn canonicalize_hostname(value: &str) -> CanonicalizeResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let mut url = dummy_url(Component::Hostname, value)?;
    url::quirks::set_hostname(&mut url, value).map_err(|_| invalid(Component::Hostname, value))?;
    Ok(url::quirks::hostname(&url).to_string())
}

pub fn canonicalize_ipv6_hostname(value: &str) -> CanonicalizeResult<String> {
    let mut result = String::with_capacity(value.len());
    for ch in value.chars() {
        if !(ch.is_ascii_hexdigit() || matches!(ch, '[' | ']' | ':')) {
            return Err(CanonicalizeError::InvalidIpv6Character {
                value: value.to_string(),
                invalid: ch,
            });
        }
        result.push(ch.to_ascii_lowercase());
    }
    Ok(result)
}

/// Canonicalizes a port, dropping it when it is the default port of `protocol`.
pub fn canonicalize_port(value: &str, protocol: Option<&str>) -> CanonicalizeResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    if !value.bytes().all(|b| b.is_ascii_digit()) || value.parse::<u16>().is_err() {
        return Err(invalid(Component::Port, value));
    }

    let base = match protocol {
        Some(scheme) if is_special_scheme(scheme) && scheme != "file" => {
            format!("{scheme}://dummy.test")
        }
        _ => String::from("dummy://dummy.test"),
    };
    let mut url = Url::parse(&base).map_err(|_| invalid(Component::Port, value))?;
    url::quirks::set_port(&mut url, value).map_err(|_| invalid(Component::Port, value))?;
    Ok(url::quirks::port(&url).to_string())
}

pub fn canonicalize_pathname(value: &str) -> CanonicalizeResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let leading_slash = value.starts_with('/');
    let modified = if leading_slash {
        value.to_string()
    } else {
        format!("/-{value}")
    };

    let mut url = dummy_url(Component::Pathname, value)?;
    url.set_path(&modified);
    let path = url.path();
    if leading_slash {
        Ok(path.to_string())
    } else {
        Ok(path.get(2..).unwrap_or_default().to_string())
    }
}

pub fn canonicalize_opaque_pathname(value: &str) -> CanonicalizeResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    // the `-` keeps a leading `//` from being read as an authority
    let url = Url::parse(&format!("data:-{value}"))
        .map_err(|_| invalid(Component::Pathname, value))?;
    Ok(url.path().get(1..).unwrap_or_default().to_string())
}

pub fn canonicalize_search(value: &str) -> CanonicalizeResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let mut url = non_special_dummy_url(Component::Search, value)?;
    url.set_query(Some(value));
    Ok(url.query().unwrap_or_default().to_string())
}

pub fn canonicalize_hash(value: &str) -> CanonicalizeResult<String> {
    if value.is_empty() {
        return Ok(String::new());
    }
    let mut url = non_special_dummy_url(Component::Hash, value)?;
    url.set_fragment(Some(value));
    Ok(url.fragment().unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protocol_is_lowercased() {
        assert_eq!(canonicalize_protocol("HTTPS").unwrap(), "https");
        assert_eq!(canonicalize_protocol("").unwrap(), "");
    }

    #[test]
    fn protocol_rejects_invalid_scheme() {
        let err = canonicalize_protocol("1http").unwrap_err();
        match err {
            CanonicalizeError::InvalidValue { component, .. } => {
                assert_eq!(component, Component::Protocol)
            }
            other => panic!("expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn username_and_password_are_percent_encoded() {
        assert_eq!(canonicalize_username("user name").unwrap(), "user%20name");
        assert_eq!(canonicalize_password("p@ss").unwrap(), "p%40ss");
    }

    #[test]
    fn hostname_is_lowercased_and_punycoded() {
        assert_eq!(canonicalize_hostname("EXAMPLE.com").unwrap(), "example.com");
        assert_eq!(canonicalize_hostname("münchen.de").unwrap(), "xn--mnchen-3ya.de");
    }

    #[test]
    fn ipv6_hostname_accepts_hex_and_lowercases() {
        assert_eq!(canonicalize_ipv6_hostname("[::AB]").unwrap(), "[::ab]");
        let err = canonicalize_ipv6_hostname("[::g]").unwrap_err();
        match err {
            CanonicalizeError::InvalidIpv6Character { invalid, .. } => assert_eq!(invalid, 'g'),
            other => panic!("expected InvalidIpv6Character, got {other:?}"),
        }
    }

    #[test]
    fn port_drops_default_for_special_protocol() {
        assert_eq!(canonicalize_port("443", Some("https")).unwrap(), "");
        assert_eq!(canonicalize_port("8080", Some("https")).unwrap(), "8080");
        assert_eq!(canonicalize_port("80", None).unwrap(), "80");
    }

    #[test]
    fn port_rejects_non_digits_and_overflow() {
        assert!(canonicalize_port("80a", None).is_err());
        assert!(canonicalize_port("+80", None).is_err());
        assert!(canonicalize_port("70000", None).is_err());
    }

    #[test]
    fn pathname_encodes_relative_fragments() {
        assert_eq!(canonicalize_pathname("/a b").unwrap(), "/a%20b");
        assert_eq!(canonicalize_pathname("books").unwrap(), "books");
        assert_eq!(canonicalize_pathname("/").unwrap(), "/");
    }

    #[test]
    fn opaque_pathname_keeps_text() {
        assert_eq!(canonicalize_opaque_pathname("foo:bar").unwrap(), "foo:bar");
    }

    #[test]
    fn opaque_pathname_keeps_leading_double_slash() {
        assert_eq!(canonicalize_opaque_pathname("//foo").unwrap(), "//foo");
        assert_eq!(canonicalize_opaque_pathname("//x/").unwrap(), "//x/");
    }

    #[test]
    fn search_and_hash_are_encoded() {
        assert_eq!(canonicalize_search("q=a b").unwrap(), "q=a%20b");
        assert_eq!(canonicalize_hash("frag ment").unwrap(), "frag%20ment");
    }

    #[test]
    fn search_keeps_apostrophe_like_non_special_urls() {
        assert_eq!(canonicalize_search("a'b").unwrap(), "a'b");
        assert_eq!(canonicalize_hash("a'b").unwrap(), "a'b");
    }
}
