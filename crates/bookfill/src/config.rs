//! Fixed locations used by the autofill: remote endpoints and the keys of the form fields.

const GOOGLE_BOOKS_URL: &str = "https://www.googleapis.com/books/v1/volumes";
const DEFAULT_SITE_URL: &str = "http://localhost:8000";

/// Keys of the form fields and selection widgets the autofill reads from or writes to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldKeys {
    /// Text input holding the raw identifier typed by the user.
    pub isbn: String,
    /// Title text input.
    pub title: String,
    /// Publication year input.
    pub year: String,
    /// Page count input.
    pub page_count: String,
    /// Multi-select widget for the authors.
    pub authors: String,
    /// Single-select widget for the publisher.
    pub publisher: String,
}

impl Default for FieldKeys {
    fn default() -> Self {
        Self {
            isbn: "id_isbn".to_owned(),
            title: "id_title".to_owned(),
            year: "id_year".to_owned(),
            page_count: "id_page_count".to_owned(),
            authors: "id_authors".to_owned(),
            publisher: "id_publisher".to_owned(),
        }
    }
}

/// Configuration shared by every autofill component.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    lookup_url: String,
    site_url: String,
    /// Form field keys.
    pub fields: FieldKeys,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lookup_url: GOOGLE_BOOKS_URL.to_owned(),
            site_url: DEFAULT_SITE_URL.to_owned(),
            fields: FieldKeys::default(),
        }
    }
}

impl Config {
    /// Overrides the base URL of the book metadata service.
    #[must_use]
    pub fn lookup_url<S: Into<String>>(mut self, url: S) -> Self {
        self.lookup_url = url.into();
        self
    }

    /// Overrides the origin serving the get-or-create endpoints.
    #[must_use]
    pub fn site_url<S: Into<String>>(mut self, url: S) -> Self {
        self.site_url = url.into();
        self
    }

    /// Base URL of the book metadata service.
    #[must_use]
    pub fn lookup_base(&self) -> &str {
        &self.lookup_url
    }

    /// Joins an absolute endpoint `path` onto the site origin.
    #[must_use]
    pub fn site_endpoint(&self, path: &str) -> String {
        let mut url = self.site_url.trim_end_matches('/').to_owned();
        url.push_str(path);
        url
    }
}
