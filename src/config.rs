//! Settings that control the behaviour of the app, passed in at startup.

/// The categories offered when adding an expense if none are configured.
pub const DEFAULT_CATEGORIES: [&str; 5] = ["Food", "Transport", "Rent", "Utilities", "Health"];

/// The app configuration.
///
/// This is created once by the server binary and handed to [crate::AppState::new].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// The categories an expense can be filed under, in display order.
    pub categories: Vec<String>,

    /// Whether new expenses must use one of [AppConfig::categories].
    ///
    /// When `false`, any non-empty category is accepted and the list of
    /// categories only controls what the add expense form offers.
    pub enforce_categories: bool,

    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    ///
    /// Used to work out the current date.
    pub local_timezone: String,

    /// The secret used to derive the key for encrypting cookies.
    pub cookie_secret: String,
}

impl AppConfig {
    /// Create a config with the default categories, category enforcement
    /// turned off and the UTC timezone.
    pub fn new(cookie_secret: &str) -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.map(str::to_owned).to_vec(),
            enforce_categories: false,
            local_timezone: "Etc/UTC".to_owned(),
            cookie_secret: cookie_secret.to_owned(),
        }
    }

    /// Set the categories, falling back to [DEFAULT_CATEGORIES] if `categories` is empty.
    pub fn categories(mut self, categories: Vec<String>) -> Self {
        if !categories.is_empty() {
            self.categories = categories;
        }

        self
    }

    /// Set whether categories are checked when adding an expense.
    pub fn enforce_categories(mut self, enforce_categories: bool) -> Self {
        self.enforce_categories = enforce_categories;
        self
    }

    /// Set the local timezone.
    pub fn local_timezone(mut self, local_timezone: &str) -> Self {
        self.local_timezone = local_timezone.to_owned();
        self
    }
}
