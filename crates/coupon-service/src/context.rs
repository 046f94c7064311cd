//! Per-request context handed to every collaborator call.
//!
//! There is no ambient session: whatever a collaborator needs to
//! authenticate travels here, explicitly.

use std::fmt;
use uuid::Uuid;

/// A bearer credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a raw bearer token.
    pub fn bearer(token: impl Into<String>) -> Self {
        Credential(token.into())
    }

    /// The raw token, for building an `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Identity and correlation data for one pricing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Correlates every log line of one request.
    pub request_id: Uuid,

    /// Credential forwarded to collaborators that need one.
    pub credential: Option<Credential>,
}

impl RequestContext {
    /// Creates an anonymous context with a fresh request id.
    pub fn new() -> Self {
        RequestContext {
            request_id: Uuid::new_v4(),
            credential: None,
        }
    }

    /// Attaches a bearer credential.
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    /// The bearer token, if one was supplied.
    pub fn bearer_token(&self) -> Option<&str> {
        self.credential.as_ref().map(Credential::expose)
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_request_ids() {
        assert_ne!(RequestContext::new().request_id, RequestContext::new().request_id);
    }

    #[test]
    fn test_credential_is_redacted() {
        let ctx = RequestContext::new().with_credential(Credential::bearer("secret-token"));

        assert_eq!(ctx.bearer_token(), Some("secret-token"));
        assert!(!format!("{ctx:?}").contains("secret-token"));
        assert_eq!(RequestContext::new().bearer_token(), None);
    }
}
