//! Alert messages for telling the user about the outcome of an action.

use maud::{Markup, html};
use serde::{Deserialize, Serialize};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Error,
}

/// A message to display to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    /// Create a new success alert
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    /// Create a new error alert
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }

    pub fn into_html(self) -> Markup {
        let style = match self.kind {
            AlertKind::Success => {
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400"
            }
            AlertKind::Error => {
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400"
            }
        };

        html! {
            div class=(style) role="alert" data-alert=(self.kind.as_str())
            {
                p { (self.message) }
            }
        }
    }
}

impl AlertKind {
    fn as_str(self) -> &'static str {
        match self {
            AlertKind::Success => "success",
            AlertKind::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn renders_message_with_kind() {
        let markup = Alert::error("Please fill all fields.").into_html();
        let fragment = Html::parse_fragment(&markup.into_string());

        let selector = Selector::parse("div[data-alert=error] p").unwrap();
        let text = fragment
            .select(&selector)
            .next()
            .expect("No alert found")
            .text()
            .collect::<String>();

        assert_eq!(text, "Please fill all fields.");
    }
}
