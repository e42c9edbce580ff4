use std::net::IpAddr;
use thiserror::Error;
use url::Url;

/// Errors that can occur during URL validation.
#[derive(Error, Debug)]
pub enum UrlValidationError {
    /// The URL string could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// The URL uses a scheme other than http or https.
    #[error("Unsupported scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),
    /// The URL has no host component.
    #[error("URL has no host")]
    MissingHost,
    /// The URL contains characters a terminal or shell could misinterpret.
    #[error("URL contains control characters")]
    ControlCharacters,
    /// The URL points to a private/internal IP address.
    #[error("Private IP address not allowed: {0}")]
    PrivateIp(String),
    /// The URL points to localhost.
    #[error("Localhost not allowed")]
    Localhost,
}

fn parse_http(url_str: &str) -> Result<Url, UrlValidationError> {
    if url_str.chars().any(char::is_control) {
        return Err(UrlValidationError::ControlCharacters);
    }

    let url = Url::parse(url_str.trim())?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlValidationError::UnsupportedScheme(scheme.to_owned())),
    }
    if url.host_str().is_none() {
        return Err(UrlValidationError::MissingHost);
    }
    Ok(url)
}

/// Validates the news API endpoint given on the command line or in config.
///
/// Only the scheme and host are checked. Loopback and private hosts are
/// allowed here since self-hosted proxies commonly live on them.
///
/// # Examples
///
/// ```
/// use headlines::util::validate_endpoint;
///
/// assert!(validate_endpoint("http://127.0.0.1:8080").is_ok());
/// assert!(validate_endpoint("ftp://news.example.com").is_err());
/// ```
pub fn validate_endpoint(url_str: &str) -> Result<Url, UrlValidationError> {
    parse_http(url_str)
}

/// Validates an article link before handing it to the system browser.
///
/// Article URLs come from the remote API, so on top of the scheme check this
/// rejects links aimed at localhost or private address ranges (RFC 1918,
/// link-local, unique local IPv6).
///
/// # Examples
///
/// ```
/// use headlines::util::validate_url_for_open;
///
/// assert!(validate_url_for_open("https://example.com/story").is_ok());
/// assert!(validate_url_for_open("javascript:alert(1)").is_err());
/// assert!(validate_url_for_open("http://192.168.1.1/admin").is_err());
/// ```
pub fn validate_url_for_open(url_str: &str) -> Result<Url, UrlValidationError> {
    let url = parse_http(url_str)?;

    if let Some(host) = url.host_str() {
        if host.eq_ignore_ascii_case("localhost") {
            return Err(UrlValidationError::Localhost);
        }

        // Strip brackets from IPv6 addresses for parsing
        let host_for_parse = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);

        if let Ok(ip) = host_for_parse.parse::<IpAddr>() {
            if ip.is_loopback() {
                return Err(UrlValidationError::Localhost);
            }
            if is_private_ip(&ip) {
                return Err(UrlValidationError::PrivateIp(ip.to_string()));
            }
        }
    }

    Ok(url)
}

fn is_private_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            ipv4.is_private() || ipv4.is_link_local() || ipv4.is_unspecified()
        }
        IpAddr::V6(ipv6) => {
            if ipv6.is_unspecified() {
                return true;
            }
            let segments = ipv6.segments();
            // Unique Local (fc00::/7)
            let is_unique_local = (segments[0] & 0xfe00) == 0xfc00;
            // Link-Local (fe80::/10)
            let is_link_local = (segments[0] & 0xffc0) == 0xfe80;
            is_unique_local || is_link_local
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_accepts_public_and_local_hosts() {
        assert!(validate_endpoint("https://news-app.example.com").is_ok());
        assert!(validate_endpoint("http://localhost:3000").is_ok());
        assert!(validate_endpoint("http://10.0.0.5").is_ok());
    }

    #[test]
    fn test_endpoint_rejects_other_schemes() {
        assert!(matches!(
            validate_endpoint("file:///etc/passwd"),
            Err(UrlValidationError::UnsupportedScheme(_))
        ));
        assert!(validate_endpoint("not a url").is_err());
    }

    #[test]
    fn test_open_accepts_article_links() {
        let url = validate_url_for_open("https://www.bbc.co.uk/news/world-123").unwrap();
        assert_eq!(url.host_str(), Some("www.bbc.co.uk"));
        assert!(validate_url_for_open("http://example.org:8080/a?b=c").is_ok());
    }

    #[test]
    fn test_open_rejects_script_and_data_schemes() {
        assert!(validate_url_for_open("javascript:alert(1)").is_err());
        assert!(validate_url_for_open("data:text/html,hi").is_err());
        assert!(validate_url_for_open("file:///home/user").is_err());
    }

    #[test]
    fn test_open_rejects_empty_link() {
        assert!(validate_url_for_open("").is_err());
    }

    #[test]
    fn test_open_rejects_control_characters() {
        assert!(matches!(
            validate_url_for_open("https://example.com/\x1b[31m"),
            Err(UrlValidationError::ControlCharacters)
        ));
        assert!(validate_url_for_open("https://example.com/a\nb").is_err());
    }

    #[test]
    fn test_open_rejects_localhost() {
        assert!(matches!(
            validate_url_for_open("http://localhost/x"),
            Err(UrlValidationError::Localhost)
        ));
        assert!(validate_url_for_open("http://127.0.0.1/x").is_err());
        assert!(validate_url_for_open("http://[::1]/x").is_err());
    }

    #[test]
    fn test_open_rejects_private_ranges() {
        assert!(validate_url_for_open("http://192.168.1.1/x").is_err());
        assert!(validate_url_for_open("http://172.16.0.1:8080/x").is_err());
        assert!(validate_url_for_open("http://169.254.1.1/x").is_err());
        assert!(validate_url_for_open("http://[fe80::1]/x").is_err());
        assert!(validate_url_for_open("http://0.0.0.0/x").is_err());
    }
}
