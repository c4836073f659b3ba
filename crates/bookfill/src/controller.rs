use std::rc::Rc;

use log::{debug, trace};

use crate::{
    api::google_books::get_volume_info, form::FormContext, BookPopulator, Client, Config, Isbn,
};

/// Entry point of the autofill, run whenever the identifier field changes.
pub struct FetchController<C, F> {
    client: Rc<C>,
    form: Rc<F>,
    config: Rc<Config>,
    populator: Rc<BookPopulator<C, F>>,
}

impl<C, F> FetchController<C, F>
where
    C: Client + 'static,
    F: FormContext + 'static,
{
    /// Creates a controller reading the identifier from, and writing the book into, `form`.
    #[must_use]
    pub fn new(client: Rc<C>, form: Rc<F>, config: Rc<Config>) -> Self {
        let populator =
            BookPopulator::new(Rc::clone(&client), Rc::clone(&form), Rc::clone(&config));

        Self {
            client,
            form,
            config,
            populator: Rc::new(populator),
        }
    }

    /// Validates the identifier field and, when it holds a valid ISBN, starts the lookup.
    ///
    /// Returns as soon as the lookup is spawned. A missing field, an invalid ISBN, a failed lookup
    /// or an empty result all leave the form untouched. Calling this again while a lookup is in
    /// flight starts a second, independent lookup.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a [`tokio::task::LocalSet`].
    pub fn trigger(&self) {
        let Some(raw) = self.form.field_value(&self.config.fields.isbn) else {
            trace!("No '{}' field in the form", self.config.fields.isbn);
            return;
        };

        let isbn = match Isbn::parse(&raw) {
            Ok(isbn) => isbn,
            Err(err) => {
                trace!("{err}");
                return;
            }
        };

        let client = Rc::clone(&self.client);
        let config = Rc::clone(&self.config);
        let populator = Rc::clone(&self.populator);

        tokio::task::spawn_local(async move {
            match get_volume_info(&*client, config.lookup_base(), &isbn).await {
                Ok(info) => populator.populate(info),
                // a failed or empty lookup leaves every field as it was
                Err(err) => debug!("Lookup for ISBN '{isbn}' dropped: {err}"),
            }
        });
    }
}
