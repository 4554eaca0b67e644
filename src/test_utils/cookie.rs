use axum::{
    body::Body,
    http::{
        HeaderMap, HeaderValue,
        header::{COOKIE, SET_COOKIE},
    },
    response::Response,
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};

/// Build the cookie jar a browser would send back after receiving `response`.
///
/// Cookies that `response` removes are left out.
#[track_caller]
pub(crate) fn jar_from_response(response: &Response<Body>, key: Key) -> PrivateCookieJar {
    let cookies = response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .map(|value| value.to_str().expect("Could not convert to str"))
        .map(|value| Cookie::parse(value.to_owned()).expect("Could not parse cookie"))
        .filter(|cookie| !cookie.value().is_empty())
        .map(|cookie| format!("{}={}", cookie.name(), cookie.value()))
        .collect::<Vec<_>>()
        .join("; ");

    let mut headers = HeaderMap::new();
    headers.insert(
        COOKIE,
        HeaderValue::from_str(&cookies).expect("Could not build cookie header"),
    );

    PrivateCookieJar::from_headers(&headers, key)
}
