//! Identity provider client settings.

use serde::Serialize;
use url::Url;

use crate::{DomainError, DomainResult};

/// The authorization code flow is the only response type the client uses.
pub const RESPONSE_TYPE_CODE: &str = "code";

/// Authorization endpoint below the authority (Keycloak realm layout).
const AUTHORIZATION_PATH: [&str; 3] = ["protocol", "openid-connect", "auth"];

/// End-session endpoint below the authority.
const END_SESSION_PATH: [&str; 3] = ["protocol", "openid-connect", "logout"];

/// Validated settings for the identity provider client.
///
/// Construction fails fast on missing or malformed values, so a value of
/// this type is always usable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSettings {
    authority: Url,
    client_id: String,
    redirect_uri: Url,
    post_logout_redirect_uri: Url,
    scope: String,
    load_user_info: bool,
    authorization_endpoint: Url,
    end_session_endpoint: Url,
}

impl AuthSettings {
    /// Validates raw settings.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingSetting`] for blank values and
    /// [`DomainError::InvalidUrl`] for URLs that do not parse or are not http(s).
    pub fn new(
        authority: &str,
        client_id: &str,
        redirect_uri: &str,
        post_logout_redirect_uri: &str,
        scope: &str,
    ) -> DomainResult<Self> {
        let authority = parse_http_url("authority", authority)?;
        let client_id = required("clientId", client_id)?;
        let redirect_uri = parse_http_url("redirectUri", redirect_uri)?;
        let post_logout_redirect_uri =
            parse_http_url("postLogoutRedirectUri", post_logout_redirect_uri)?;
        let scope = required("scope", scope)?;
        let authorization_endpoint = endpoint(&authority, &AUTHORIZATION_PATH)?;
        let end_session_endpoint = endpoint(&authority, &END_SESSION_PATH)?;

        Ok(Self {
            authority,
            client_id,
            redirect_uri,
            post_logout_redirect_uri,
            scope,
            load_user_info: true,
            authorization_endpoint,
            end_session_endpoint,
        })
    }

    /// Toggles fetching the userinfo endpoint after sign-in.
    #[must_use]
    pub const fn with_load_user_info(mut self, load_user_info: bool) -> Self {
        self.load_user_info = load_user_info;
        self
    }

    /// Provider base URL.
    #[must_use]
    pub const fn authority(&self) -> &Url {
        &self.authority
    }

    /// Client identifier registered with the provider.
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// Where the provider sends the browser after sign-in.
    #[must_use]
    pub const fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    /// Where the provider sends the browser after sign-out.
    #[must_use]
    pub const fn post_logout_redirect_uri(&self) -> &Url {
        &self.post_logout_redirect_uri
    }

    /// Space separated scopes requested at sign-in.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Whether profile claims are completed from the userinfo endpoint.
    #[must_use]
    pub const fn load_user_info(&self) -> bool {
        self.load_user_info
    }

    /// OAuth response type requested at sign-in.
    #[must_use]
    pub const fn response_type(&self) -> &'static str {
        RESPONSE_TYPE_CODE
    }

    /// The provider's authorization endpoint.
    #[must_use]
    pub const fn authorization_endpoint(&self) -> &Url {
        &self.authorization_endpoint
    }

    /// The provider's end-session endpoint.
    #[must_use]
    pub const fn end_session_endpoint(&self) -> &Url {
        &self.end_session_endpoint
    }

    /// Authorization request starting the code flow, bound to `state`.
    #[must_use]
    pub fn authorization_url(&self, state: &str) -> Url {
        let mut url = self.authorization_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("response_type", self.response_type())
            .append_pair("client_id", &self.client_id)
            .append_pair("redirect_uri", self.redirect_uri.as_str())
            .append_pair("scope", &self.scope)
            .append_pair("state", state);
        url
    }

    /// End-session request returning to the post-logout URI.
    #[must_use]
    pub fn end_session_url(&self) -> Url {
        let mut url = self.end_session_endpoint.clone();
        url.query_pairs_mut()
            .append_pair("client_id", &self.client_id)
            .append_pair(
                "post_logout_redirect_uri",
                self.post_logout_redirect_uri.as_str(),
            );
        url
    }
}

fn endpoint(authority: &Url, segments: &[&str]) -> DomainResult<Url> {
    let mut url = authority.clone();
    url.set_query(None);
    url.set_fragment(None);
    url.path_segments_mut()
        .map_err(|()| DomainError::InvalidUrl {
            field: "authority",
            message: "cannot hold endpoint paths".to_string(),
        })?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn required(field: &'static str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::MissingSetting(field));
    }
    Ok(value.to_string())
}

fn parse_http_url(field: &'static str, value: &str) -> DomainResult<Url> {
    let value = required(field, value)?;
    let url = Url::parse(&value).map_err(|e| DomainError::InvalidUrl {
        field,
        message: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(DomainError::InvalidUrl {
            field,
            message: format!("unsupported scheme '{other}'"),
        }),
    }
}
