use rand::Rng;
use rand::distr::Alphanumeric;
use url::Url;

const AUTHORIZE_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Browser URL that asks Google for an ID token for this client.
///
/// The user finishes sign-in in the browser and pastes the redirected URL
/// (or the bare token) back into the login screen.
///
/// # Errors
///
/// Returns `url::ParseError` if `redirect_uri` produces an invalid URL.
pub fn sign_in_url(client_id: &str, redirect_uri: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(AUTHORIZE_ENDPOINT)?;
    url.query_pairs_mut()
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("response_type", "id_token")
        .append_pair("scope", "openid email profile")
        .append_pair("nonce", &nonce());
    Ok(url)
}

fn nonce() -> String {
    rand::rng()
        .sample_iter(Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

/// Pull an ID token out of whatever the user pasted.
///
/// Accepts a redirect URL carrying `id_token` (or `credential`) in its
/// fragment or query, or the bare token itself.
#[must_use]
pub fn extract_credential(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(url) = Url::parse(input) {
        let from_pairs = |raw: &str| {
            url::form_urlencoded::parse(raw.as_bytes())
                .find(|(key, _)| key == "id_token" || key == "credential")
                .map(|(_, value)| value.into_owned())
        };
        return url
            .fragment()
            .and_then(from_pairs)
            .or_else(|| url.query().and_then(from_pairs))
            .filter(|token| !token.is_empty());
    }
    if input.chars().any(char::is_whitespace) {
        return None;
    }
    Some(input.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_url_requests_id_token() {
        let url = sign_in_url("client-1.apps.googleusercontent.com", "http://localhost").unwrap();
        let pairs: Vec<_> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("response_type".into(), "id_token".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "http://localhost".into())));
        let nonce = pairs.iter().find(|(k, _)| k == "nonce").unwrap();
        assert_eq!(nonce.1.len(), 32);
    }

    #[test]
    fn extracts_from_redirect_fragment_or_raw_token() {
        assert_eq!(
            extract_credential("http://localhost/#state=x&id_token=eyJhbGci.abc.def").as_deref(),
            Some("eyJhbGci.abc.def")
        );
        assert_eq!(
            extract_credential("  eyJhbGci.abc.def \n").as_deref(),
            Some("eyJhbGci.abc.def")
        );
        assert_eq!(extract_credential("http://localhost/#error=access_denied"), None);
        assert_eq!(extract_credential("two words"), None);
        assert_eq!(extract_credential("   "), None);
    }
}
