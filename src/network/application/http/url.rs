//! URL decomposition.
//!
//! Only what an HTTP/1.1 client needs: scheme, optional userinfo, host, port,
//! path and query. The fragment is dropped since it never goes on the wire.
//! All parts borrow from the input string.

use super::error::HttpError;

/// The URL schemes the client understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    /// Port used when the URL does not name one.
    pub fn default_port(&self) -> u16 {
        match self {
            Scheme::Http => 80,
            Scheme::Https => 443,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// A URL split into the parts used to address and build a request.
///
/// ```rust
/// use libiot_http::network::application::http::{ParsedUrl, Scheme};
///
/// let url = ParsedUrl::parse("http://example.com:8080/data?id=7").unwrap();
/// assert_eq!(url.scheme(), Scheme::Http);
/// assert_eq!(url.host(), "example.com");
/// assert_eq!(url.port(), 8080);
/// assert_eq!(url.path(), "/data");
/// assert_eq!(url.query(), Some("id=7"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedUrl<'a> {
    scheme: Scheme,
    userinfo: Option<&'a str>,
    host: &'a str,
    port: Option<u16>,
    path: &'a str,
    query: Option<&'a str>,
}

impl<'a> ParsedUrl<'a> {
    /// Parse an absolute `http://` or `https://` URL.
    ///
    /// # Errors
    ///
    /// [`HttpError::UrlParse`] for an unknown scheme, a missing host, an
    /// invalid port, or whitespace/control characters anywhere in the URL.
    pub fn parse(url: &'a str) -> Result<Self, HttpError> {
        if url
            .bytes()
            .any(|b| b.is_ascii_whitespace() || b.is_ascii_control())
        {
            return Err(HttpError::UrlParse);
        }

        let (scheme, rest) = url.split_once("://").ok_or(HttpError::UrlParse)?;
        let scheme = if scheme.eq_ignore_ascii_case("http") {
            Scheme::Http
        } else if scheme.eq_ignore_ascii_case("https") {
            Scheme::Https
        } else {
            return Err(HttpError::UrlParse);
        };

        let authority_end = rest
            .find(|c: char| c == '/' || c == '?' || c == '#')
            .unwrap_or(rest.len());
        let (authority, mut remainder) = rest.split_at(authority_end);

        if let Some(hash) = remainder.find('#') {
            remainder = &remainder[..hash];
        }

        let (path, query) = match remainder.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (remainder, None),
        };
        let path = if path.is_empty() { "/" } else { path };

        let (userinfo, host_port) = match authority.rsplit_once('@') {
            Some((userinfo, host_port)) => (Some(userinfo), host_port),
            None => (None, authority),
        };
        let (host, port) = split_host_port(host_port)?;

        Ok(Self {
            scheme,
            userinfo,
            host,
            port,
            path,
            query,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// `user:password` part preceding the host, if any.
    pub fn userinfo(&self) -> Option<&'a str> {
        self.userinfo
    }

    /// Host name or address literal. IPv6 literals are returned without brackets.
    pub fn host(&self) -> &'a str {
        self.host
    }

    /// The explicit port, or the scheme's default.
    pub fn port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.scheme.default_port())
    }

    /// Whether [`port`](Self::port) differs from the scheme's default.
    pub fn has_non_default_port(&self) -> bool {
        self.port() != self.scheme.default_port()
    }

    /// Path component, `/` when the URL has none.
    pub fn path(&self) -> &'a str {
        self.path
    }

    /// Query string without the leading `?`.
    pub fn query(&self) -> Option<&'a str> {
        self.query
    }
}

fn split_host_port(authority: &str) -> Result<(&str, Option<u16>), HttpError> {
    if let Some(bracketed) = authority.strip_prefix('[') {
        let (host, tail) = bracketed.split_once(']').ok_or(HttpError::UrlParse)?;
        if host.is_empty() {
            return Err(HttpError::UrlParse);
        }
        return match tail {
            "" => Ok((host, None)),
            _ => {
                let port = tail.strip_prefix(':').ok_or(HttpError::UrlParse)?;
                Ok((host, Some(parse_port(port)?)))
            }
        };
    }

    let (host, port) = match authority.rsplit_once(':') {
        Some((host, port)) => (host, Some(parse_port(port)?)),
        None => (authority, None),
    };
    if host.is_empty() {
        return Err(HttpError::UrlParse);
    }
    Ok((host, port))
}

fn parse_port(port: &str) -> Result<u16, HttpError> {
    if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HttpError::UrlParse);
    }
    port.parse::<u16>().map_err(|_| HttpError::UrlParse)
}
