use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, HeaderValue, request::Parts},
    middleware::Next,
    response::Response
};
use config::IdentityConfig;
use rnd_core::Role;
use security::{LdapEntry, Principal, authorize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::GatewayError;
use crate::state::AppState;
use crate::telemetry;

/// Header bytes as text. Directory DNs may carry UTF-8; anything that is
/// not valid UTF-8 is decoded lossily rather than dropped.
fn header_text(value: &HeaderValue) -> Cow<'_, str> {
    match std::str::from_utf8(value.as_bytes()) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => String::from_utf8_lossy(value.as_bytes())
    }
}

/// Builds the caller's directory entry from the proxy headers.
///
/// Returns `None` when the user header is absent or empty. Every header
/// starting with the attribute prefix becomes an attribute named after the
/// rest of the header name; its value is split on the separator, with
/// blank pieces dropped. Repeated headers accumulate values.
pub fn entry_from_headers(headers: &HeaderMap, identity: &IdentityConfig) -> Option<LdapEntry> {
    let dn = headers
        .get(identity.user_header.as_str())
        .map(header_text)?;
    let dn = dn.trim();
    if dn.is_empty() {
        return None;
    }

    let prefix = identity.attribute_header_prefix.to_ascii_lowercase();
    let mut attributes: HashMap<&str, Vec<String>> = HashMap::new();

    for (name, value) in headers {
        let Some(attribute) = name.as_str().strip_prefix(prefix.as_str()) else {
            continue;
        };
        if attribute.is_empty() {
            continue;
        }
        let value = header_text(value);

        attributes.entry(attribute).or_default().extend(
            value
                .split(identity.value_separator.as_str())
                .map(str::trim)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
        );
    }

    Some(
        attributes
            .into_iter()
            .fold(LdapEntry::new(dn), |entry, (name, values)| {
                entry.with_attribute(name, values)
            })
    )
}

/// Resolves the roles of the forwarded identity and stores the
/// [`Principal`] in the request extensions.
pub async fn identity_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next
) -> Response {
    if let Some(entry) = entry_from_headers(request.headers(), &state.identity) {
        let principal = Principal::from_entry(&entry, state.fetcher.as_ref());
        telemetry::record_resolved_roles(principal.roles.len());
        tracing::debug!(
            username = %principal.username,
            roles = ?principal.roles,
            "Authenticated request"
        );
        request.extensions_mut().insert(principal);
    }

    next.run(request).await
}

/// Extractor for the authenticated principal; rejects with 401 when the
/// request carries no identity.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl Authenticated {
    pub fn username(&self) -> &str {
        &self.0.username
    }

    /// Fails with 403 and `message` unless the principal holds `role`.
    pub fn require(&self, role: Role, message: &str) -> Result<(), GatewayError> {
        authorize(&self.0, role, message).map_err(|denied| {
            telemetry::record_access_denied(denied.role);
            GatewayError::from(denied)
        })
    }
}

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync
{
    type Rejection = GatewayError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(Self)
            .ok_or(GatewayError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use security::{DirectoryEntry, LdapRoleFetcher, RoleFetcher, RoleMapping};

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.append(*name, HeaderValue::from_static(value));
        }
        headers
    }

    #[test]
    fn test_no_user_header_is_anonymous() {
        let headers = headers(&[("x-remote-attr-ismemberof", "CN=RND-Testers,OU=Groups")]);
        assert!(entry_from_headers(&headers, &IdentityConfig::default()).is_none());
    }

    #[test]
    fn test_blank_user_header_is_anonymous() {
        let headers = headers(&[("x-remote-user", "  ")]);
        assert!(entry_from_headers(&headers, &IdentityConfig::default()).is_none());
    }

    #[test]
    fn test_attributes_are_split_and_trimmed() {
        let headers = headers(&[
            ("x-remote-user", "uid=alice,ou=people"),
            (
                "x-remote-attr-ismemberof",
                "CN=RND-Researchers,OU=Groups ; ; CN=Staff,OU=Groups"
            ),
            ("x-remote-attr-mail", "alice@example.org")
        ]);

        let entry = entry_from_headers(&headers, &IdentityConfig::default()).unwrap();
        assert_eq!(entry.dn(), "uid=alice,ou=people");
        assert_eq!(
            entry.attribute("ismemberof").unwrap(),
            ["CN=RND-Researchers,OU=Groups", "CN=Staff,OU=Groups"]
        );
        assert_eq!(entry.attribute("mail").unwrap(), ["alice@example.org"]);
    }

    #[test]
    fn test_empty_attribute_header_is_present_without_values() {
        let headers = headers(&[("x-remote-user", "bob"), ("x-remote-attr-ismemberof", "")]);

        let entry = entry_from_headers(&headers, &IdentityConfig::default()).unwrap();
        assert!(entry.has_attribute("ismemberof"));
        assert_eq!(entry.attribute("ismemberof").unwrap().len(), 0);
    }

    #[test]
    fn test_repeated_headers_accumulate() {
        let headers = headers(&[
            ("x-remote-user", "carol"),
            ("x-remote-attr-ismemberof", "CN=A,OU=G"),
            ("x-remote-attr-ismemberof", "CN=B,OU=G")
        ]);

        let entry = entry_from_headers(&headers, &IdentityConfig::default()).unwrap();
        assert_eq!(entry.attribute("ismemberof").unwrap().len(), 2);
    }

    #[test]
    fn test_custom_identity_headers() {
        let identity = IdentityConfig {
            user_header: "x-forwarded-user".to_string(),
            attribute_header_prefix: "X-LDAP-".to_string(),
            value_separator: "|".to_string()
        };
        let headers = headers(&[
            ("x-forwarded-user", "dave"),
            ("x-ldap-memberof", "CN=A,OU=G|CN=B,OU=G")
        ]);

        let entry = entry_from_headers(&headers, &identity).unwrap();
        assert_eq!(entry.attribute("memberof").unwrap().len(), 2);
    }

    #[test]
    fn test_utf8_group_keeps_other_memberships() {
        let mut headers = headers(&[("x-remote-user", "uid=alice")]);
        headers.append(
            "x-remote-attr-ismemberof",
            HeaderValue::from_bytes("CN=RND-Researchers,OU=G;CN=Équipe,OU=G".as_bytes()).unwrap()
        );

        let entry = entry_from_headers(&headers, &IdentityConfig::default()).unwrap();
        assert_eq!(
            entry.attribute("ismemberof").unwrap(),
            ["CN=RND-Researchers,OU=G", "CN=Équipe,OU=G"]
        );

        let fetcher =
            LdapRoleFetcher::new(RoleMapping::new([("RND-Researchers", "ROLE_CHERCHEUR")]));
        let roles = fetcher.fetch_roles(&entry);
        assert!(roles.contains("ROLE_CHERCHEUR"));
    }

    #[test]
    fn test_utf8_user_header_is_authenticated() {
        let mut headers = HeaderMap::new();
        headers.append(
            "x-remote-user",
            HeaderValue::from_bytes("uid=zoë,ou=people".as_bytes()).unwrap()
        );

        let entry = entry_from_headers(&headers, &IdentityConfig::default()).unwrap();
        assert_eq!(entry.dn(), "uid=zoë,ou=people");
    }

    #[test]
    fn test_invalid_utf8_is_decoded_lossily() {
        let mut headers = headers(&[("x-remote-user", "erin")]);
        headers.append(
            "x-remote-attr-ismemberof",
            HeaderValue::from_bytes(b"CN=A,OU=G;CN=\xff,OU=G").unwrap()
        );

        let entry = entry_from_headers(&headers, &IdentityConfig::default()).unwrap();
        let groups = entry.attribute("ismemberof").unwrap();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0], "CN=A,OU=G");
        assert_eq!(groups[1], "CN=\u{fffd},OU=G");
    }
}
