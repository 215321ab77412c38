//! Signed relay requests.

mod request;

pub use request::{
    canonical_string, format_timestamp, AuthError, AuthenticatedRequest, HttpMethod,
    RequestAuthenticator, AUTHORIZATION_HEADER, CONTENT_TYPE_HEADER, DEVICE_PUBLIC_KEY_HEADER,
    TIMESTAMP_HEADER,
};
