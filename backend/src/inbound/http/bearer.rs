//! Bearer token extraction, keeping handlers free of header parsing.

use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};

/// Raw bearer token lifted from the `Authorization` header, if any.
///
/// Extraction never fails: a missing or malformed header yields an empty
/// extractor so the handler can respond with the uniform unauthorized
/// error instead of a framework-shaped one.
#[derive(Debug, Clone)]
pub struct BearerAuth(Option<String>);

impl BearerAuth {
    /// The presented token, when a well-formed `Bearer` header was sent.
    pub fn token(&self) -> Option<&str> {
        self.0.as_deref()
    }

    fn from_header(value: Option<&str>) -> Self {
        let token = value
            .and_then(|header| header.split_once(' '))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim())
            .filter(|token| !token.is_empty())
            .map(str::to_owned);
        Self(token)
    }
}

impl FromRequest for BearerAuth {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(actix_web::http::header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());
        ready(Ok(Self::from_header(header)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("Bearer abc.def.ghi"), Some("abc.def.ghi"))]
    #[case(Some("bearer lowercase-scheme"), Some("lowercase-scheme"))]
    #[case(Some("BEARER shouting"), Some("shouting"))]
    #[case(Some("Bearer   padded  "), Some("padded"))]
    fn well_formed_headers_yield_the_token(
        #[case] header: Option<&str>,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(BearerAuth::from_header(header).token(), expected);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(""))]
    #[case(Some("Bearer"))]
    #[case(Some("Bearer "))]
    #[case(Some("Basic dXNlcjpwYXNz"))]
    #[case(Some("token-without-scheme"))]
    fn malformed_headers_yield_nothing(#[case] header: Option<&str>) {
        assert_eq!(BearerAuth::from_header(header).token(), None);
    }
}
