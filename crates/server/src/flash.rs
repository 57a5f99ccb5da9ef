//! One-shot status messages carried across a redirect in a cookie.

use axum::{
    http::{header, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use cookie::{Cookie, SameSite};
use url::form_urlencoded;

pub const FLASH_COOKIE: &str = "flash";

/// Redirects to `location` and leaves `message` for the next page render.
pub fn redirect_with_flash(location: &str, message: impl Into<String>) -> Response {
    let cookie = Cookie::build((FLASH_COOKIE, message.into()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    (
        [(header::SET_COOKIE, cookie.encoded().to_string())],
        Redirect::to(location),
    )
        .into_response()
}

/// Redirects with `message` in the query string instead of a cookie.
pub fn redirect_with_query_message(location: &str, message: &str) -> Response {
    let encoded: String = form_urlencoded::byte_serialize(message.as_bytes()).collect();
    Redirect::to(&format!("{location}?message={encoded}")).into_response()
}

/// Reads the pending flash message from the request cookies, if any.
pub fn read_flash(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse_encoded)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == FLASH_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .filter(|message| !message.is_empty())
}

/// `Set-Cookie` value that expires the flash cookie once it has been shown.
pub fn clear_flash_cookie() -> String {
    Cookie::build((FLASH_COOKIE, ""))
        .path("/")
        .removal()
        .build()
        .to_string()
}

#[cfg(test)]
#[path = "tests/flash_tests.rs"]
mod tests;
