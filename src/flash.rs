//! One-shot alert messages that survive a redirect.
//!
//! A handler that redirects stores an [Alert] in an encrypted cookie, and the
//! next page to be rendered takes it out of the cookie jar, which also deletes
//! the cookie.

use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};

use crate::alert::Alert;

pub(crate) const COOKIE_FLASH: &str = "flash";

/// Add `alert` to the cookie jar so it is shown on the next page load.
///
/// If the alert cannot be encoded, the error is logged and the jar is
/// returned unchanged.
pub(crate) fn set_flash(jar: PrivateCookieJar, alert: &Alert) -> PrivateCookieJar {
    match serde_urlencoded::to_string(alert) {
        Ok(value) => jar.add(
            Cookie::build((COOKIE_FLASH, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        ),
        Err(error) => {
            tracing::error!("could not encode flash message {alert:?}: {error}");
            jar
        }
    }
}

/// Remove the flash message from the cookie jar, returning it if there was one.
///
/// A cookie that cannot be decoded is dropped.
pub(crate) fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Alert>) {
    let Some(cookie) = jar.get(COOKIE_FLASH) else {
        return (jar, None);
    };

    let alert = serde_urlencoded::from_str::<Alert>(cookie.value_trimmed())
        .inspect_err(|error| tracing::warn!("could not decode flash message: {error}"))
        .ok();

    let jar = jar.remove(Cookie::build(COOKIE_FLASH).path("/"));

    (jar, alert)
}

#[cfg(test)]
mod tests {
    use axum_extra::extract::{
        PrivateCookieJar,
        cookie::{Cookie, Key},
    };

    use crate::alert::Alert;

    use super::{COOKIE_FLASH, set_flash, take_flash};

    fn get_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::generate())
    }

    #[test]
    fn flash_can_be_taken_once() {
        let want = Alert::success("Expense added successfully!");
        let jar = set_flash(get_jar(), &want);

        let (jar, got) = take_flash(jar);
        assert_eq!(got, Some(want));

        let (_, got) = take_flash(jar);
        assert_eq!(got, None);
    }

    #[test]
    fn empty_jar_has_no_flash() {
        let (_, got) = take_flash(get_jar());

        assert_eq!(got, None);
    }

    #[test]
    fn garbled_flash_is_dropped() {
        let jar = get_jar().add(Cookie::new(COOKIE_FLASH, "kind=shouting"));

        let (jar, got) = take_flash(jar);

        assert_eq!(got, None);
        assert!(jar.get(COOKIE_FLASH).is_none());
    }
}
