//! Defines the page to display when a page or resource cannot be found.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::html::error_view;

pub struct NotFoundError<'a> {
    pub description: &'a str,
    pub fix: &'a str,
}

impl Default for NotFoundError<'_> {
    fn default() -> Self {
        Self {
            description: "Page not found",
            fix: "Check the address or go back to the homepage.",
        }
    }
}

impl NotFoundError<'_> {
    pub fn into_html(self) -> Html<String> {
        Html(error_view("Not Found", "404", self.description, self.fix).into_string())
    }
}

impl IntoResponse for NotFoundError<'_> {
    fn into_response(self) -> Response {
        (StatusCode::NOT_FOUND, self.into_html()).into_response()
    }
}

pub async fn get_404_not_found() -> Response {
    NotFoundError::default().into_response()
}
