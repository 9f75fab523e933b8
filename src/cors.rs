use axum::{
    http::{header, HeaderMap, HeaderValue},
    response::Response,
};

use crate::error::ApiError;

pub const ALLOW_METHODS: &str = "OPTIONS, POST";

/// Allowed request headers for the translate endpoint
pub const TRANSLATE_ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
     Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

/// Allowed request headers for the contact endpoint
pub const CONTACT_ALLOW_HEADERS: &str = "Content-Type";

/// Origin allow-list check for one endpoint.
///
/// With an empty allow-list every origin is accepted. Otherwise the declared
/// origin must be listed; `origin_required` decides whether a request with no
/// `Origin` header at all is turned away.
#[derive(Debug, Clone, Copy)]
pub struct OriginPolicy<'a> {
    allowed_origins: &'a [String],
    allow_headers: &'static str,
    origin_required: bool,
}

/// Permission to proceed; carries the origin to echo back
#[derive(Debug, Clone)]
pub struct CorsGrant {
    origin: Option<HeaderValue>,
    allow_headers: &'static str,
}

impl<'a> OriginPolicy<'a> {
    /// Policy that also rejects requests without an `Origin` header
    pub fn strict(allowed_origins: &'a [String], allow_headers: &'static str) -> Self {
        Self {
            allowed_origins,
            allow_headers,
            origin_required: true,
        }
    }

    /// Policy that lets requests without an `Origin` header through
    pub fn lenient(allowed_origins: &'a [String], allow_headers: &'static str) -> Self {
        Self {
            allowed_origins,
            allow_headers,
            origin_required: false,
        }
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<CorsGrant, ApiError> {
        let origin = headers.get(header::ORIGIN);

        if !self.allowed_origins.is_empty() {
            match origin {
                Some(value) => {
                    let listed = value
                        .to_str()
                        .map(|o| self.allowed_origins.iter().any(|allowed| allowed == o))
                        .unwrap_or(false);
                    if !listed {
                        return Err(ApiError::AccessDenied);
                    }
                }
                None if self.origin_required => return Err(ApiError::AccessDenied),
                None => {}
            }
        }

        Ok(CorsGrant {
            origin: origin.cloned(),
            allow_headers: self.allow_headers,
        })
    }
}

impl CorsGrant {
    /// Add the cross-origin permission headers, scoped to the request origin
    pub fn apply(&self, mut response: Response) -> Response {
        if let Some(origin) = &self.origin {
            let headers = response.headers_mut();
            headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin.clone());
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOW_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(self.allow_headers),
            );
            headers.insert(header::VARY, HeaderValue::from_static("Origin"));
        }
        response
    }
}
