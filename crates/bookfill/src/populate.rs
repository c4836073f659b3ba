use std::rc::Rc;

use chrono::{DateTime, Datelike, NaiveDate};
use log::trace;

use crate::{
    form::{FieldValue, FormContext},
    resolver::EntityResolver,
    Client, Config, EntityKind, VolumeInfo,
};

/// Extracts the year of a publication date.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD` and RFC 3339 timestamps. Returns [`None`] for anything
/// that is not a calendar date.
///
/// ```
/// assert_eq!(Some(2008), bookfill::published_year("2008-09-01"));
/// assert_eq!(Some(2004), bookfill::published_year("2004"));
/// assert_eq!(None, bookfill::published_year("sometime in 2004"));
/// ```
#[must_use]
pub fn published_year(date: &str) -> Option<i32> {
    let date = date.trim();

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(date) {
        return Some(timestamp.year());
    }

    let full = match date.len() {
        4 => format!("{date}-01-01"),
        7 => format!("{date}-01"),
        _ => date.to_owned(),
    };

    NaiveDate::parse_from_str(&full, "%Y-%m-%d")
        .ok()
        .map(|d| d.year())
}

/// Writes one volume into the form.
///
/// Title, year and page count are written before [`BookPopulator::populate`] returns. Authors and
/// publisher are reset right away and filled in later as their get-or-create requests complete.
pub struct BookPopulator<C, F> {
    form: Rc<F>,
    config: Rc<Config>,
    authors: EntityResolver<C, F>,
    publisher: EntityResolver<C, F>,
}

impl<C, F> BookPopulator<C, F>
where
    C: Client + 'static,
    F: FormContext + 'static,
{
    /// Creates a populator writing into `form`.
    #[must_use]
    pub fn new(client: Rc<C>, form: Rc<F>, config: Rc<Config>) -> Self {
        Self {
            authors: EntityResolver::new(
                EntityKind::Author,
                Rc::clone(&client),
                Rc::clone(&form),
                &config,
            ),
            publisher: EntityResolver::new(
                EntityKind::Publisher,
                client,
                Rc::clone(&form),
                &config,
            ),
            form,
            config,
        }
    }

    /// Fills the form from `info`.
    ///
    /// Missing values are written as [`FieldValue::Absent`] and an unreadable publication date as
    /// [`FieldValue::Invalid`], nothing is skipped.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a [`tokio::task::LocalSet`].
    pub fn populate(&self, info: VolumeInfo) {
        // Deconstruct info to take ownership of fields (avoids cloning).
        let VolumeInfo {
            title,
            authors,
            publisher,
            published_date,
            page_count,
        } = info;
        let fields = &self.config.fields;

        trace!("Populating form for '{}'", title.as_deref().unwrap_or_default());

        self.form.set_field_value(&fields.title, title.into());

        self.authors.replace_selection(authors.unwrap_or_default());
        // no publisher means an empty selection, not a get-or-create for a placeholder name
        self.publisher.replace_selection(publisher);

        let year = published_date
            .as_deref()
            .and_then(published_year)
            .map_or(FieldValue::Invalid, |y| FieldValue::Integer(i64::from(y)));
        self.form.set_field_value(&fields.year, year);

        self.form.set_field_value(&fields.page_count, page_count.into());
    }
}
