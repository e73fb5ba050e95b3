//! Static routing table for server calls.
//!
//! Every outbound request the kiosk makes is described by one [`Endpoint`]
//! constant; pending mutations are mapped to theirs by [`for_mutation`].

use crate::error::{ApiError, Result};
use lockerbox_core::MutationKind;
use reqwest::{Method, Url};
use std::borrow::Cow;

/// Which server an endpoint lives on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The inventory API, relative to `server.base_url`.
    Inventory,
    /// The chat notification API at `notify.url`.
    Notify,
}

/// One HTTP route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Short name used in logs and errors.
    pub name: &'static str,
    pub method: Method,
    pub target: Target,
    /// Path segments appended to the target URL.
    pub segments: &'static [&'static str],
    /// Whether a tracking code is appended as a final path segment.
    pub takes_code: bool,
    /// Whether the bearer token is sent.
    pub authenticated: bool,
}

pub static LIST_ITEMS: Endpoint = Endpoint {
    name: "list-items",
    method: Method::GET,
    target: Target::Inventory,
    segments: &["api", "items"],
    takes_code: false,
    authenticated: false,
};

pub static DELETE_ITEM: Endpoint = Endpoint {
    name: "delete-item",
    method: Method::DELETE,
    target: Target::Inventory,
    segments: &["api", "items"],
    takes_code: true,
    authenticated: true,
};

pub static REGISTER_SUCCESS: Endpoint = Endpoint {
    name: "register-success",
    method: Method::POST,
    target: Target::Inventory,
    segments: &["api", "deliveries"],
    takes_code: false,
    authenticated: true,
};

pub static NOTIFY_DELIVERY: Endpoint = Endpoint {
    name: "notify-delivery",
    method: Method::POST,
    target: Target::Notify,
    segments: &[],
    takes_code: false,
    authenticated: false,
};

/// Route for a queued mutation.
pub fn for_mutation(kind: MutationKind) -> &'static Endpoint {
    match kind {
        MutationKind::DeleteItem => &DELETE_ITEM,
        MutationKind::RegisterSuccess => &REGISTER_SUCCESS,
        MutationKind::NotifyDelivery => &NOTIFY_DELIVERY,
    }
}

impl Endpoint {
    /// Resolve this endpoint against `base`.
    ///
    /// Segments are percent-encoded, so codes containing `#` or `*` are safe.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::ClientBuild` if `base` cannot carry a path or a code is
    /// required but missing.
    pub fn url(&self, base: &Url, code: Option<&str>) -> Result<Url> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::ClientBuild(format!("{base} cannot be a base URL")))?;
            path.pop_if_empty().extend(self.segments);

            if self.takes_code {
                let code = code.ok_or_else(|| {
                    ApiError::ClientBuild(format!("{} requires a tracking code", self.name))
                })?;
                path.push(code);
            }
        }
        Ok(url)
    }
}

/// Human-readable message for an HTTP status code.
///
/// Unknown codes are passed through as their number.
pub fn status_message(code: u16) -> Cow<'static, str> {
    match code {
        200 => Cow::Borrowed("OK"),
        204 => Cow::Borrowed("No content"),
        400 => Cow::Borrowed("Bad request"),
        401 => Cow::Borrowed("Unauthorized"),
        403 => Cow::Borrowed("Forbidden"),
        404 => Cow::Borrowed("Not found"),
        405 => Cow::Borrowed("Method not allowed"),
        500 => Cow::Borrowed("Internal server error"),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn base() -> Url {
        Url::parse("http://kiosk.example:8080/").unwrap()
    }

    #[rstest]
    #[case(200, "OK")]
    #[case(204, "No content")]
    #[case(400, "Bad request")]
    #[case(401, "Unauthorized")]
    #[case(403, "Forbidden")]
    #[case(404, "Not found")]
    #[case(405, "Method not allowed")]
    #[case(500, "Internal server error")]
    #[case(418, "418")]
    #[case(503, "503")]
    fn test_status_message(#[case] code: u16, #[case] expected: &str) {
        assert_eq!(status_message(code), expected);
    }

    #[test]
    fn test_list_items_url() {
        let url = LIST_ITEMS.url(&base(), None).unwrap();
        assert_eq!(url.as_str(), "http://kiosk.example:8080/api/items");
    }

    #[test]
    fn test_delete_item_url_encodes_code() {
        let url = DELETE_ITEM.url(&base(), Some("5555")).unwrap();
        assert_eq!(url.as_str(), "http://kiosk.example:8080/api/items/5555");

        let url = DELETE_ITEM.url(&base(), Some("12#*")).unwrap();
        assert_eq!(url.path(), "/api/items/12%23*");
        assert!(url.fragment().is_none());
    }

    #[test]
    fn test_base_with_prefix() {
        let base = Url::parse("https://host/lockerbox").unwrap();
        let url = REGISTER_SUCCESS.url(&base, None).unwrap();
        assert_eq!(url.as_str(), "https://host/lockerbox/api/deliveries");
    }

    #[test]
    fn test_missing_code_is_rejected() {
        assert!(DELETE_ITEM.url(&base(), None).is_err());
    }

    #[test]
    fn test_mutation_routes() {
        assert_eq!(for_mutation(MutationKind::DeleteItem).method, Method::DELETE);
        assert_eq!(
            for_mutation(MutationKind::RegisterSuccess).method,
            Method::POST
        );
        assert_eq!(
            for_mutation(MutationKind::NotifyDelivery).target,
            Target::Notify
        );
        assert!(!LIST_ITEMS.authenticated);
        assert!(DELETE_ITEM.authenticated && REGISTER_SUCCESS.authenticated);
    }
}
