use thiserror::Error;
use url::Url;

/// Reasons an article link is refused before handing it to the system opener.
#[derive(Error, Debug)]
pub enum LinkError {
    #[error("Article has no link")]
    Missing,
    #[error("Invalid link: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("Refusing to open {0} link (only http/https allowed)")]
    UnsupportedScheme(String),
    #[error("Invalid link: missing host")]
    MissingHost,
}

/// Validate a service-provided article link for opening in a browser.
///
/// The opener hands the string to a platform command, so only absolute
/// `http`/`https` URLs with a host are accepted.
pub fn validate_link_for_open(link: &str) -> Result<Url, LinkError> {
    let link = link.trim();
    if link.is_empty() {
        return Err(LinkError::Missing);
    }

    let url = Url::parse(link)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(LinkError::UnsupportedScheme(url.scheme().to_string()));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(LinkError::MissingHost);
    }
    Ok(url)
}
