#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![warn(missing_docs, rust_2018_idioms)]
#![allow(clippy::module_name_repetitions)]

//! # bookfill
//!
//! bookfill fills a book form from a single ISBN. The identifier is checked locally, looked up with
//! the Google Books API and the first volume found is written into the form: title, year and page
//! count directly, authors and publisher through the site's get-or-create endpoints so that the
//! selection widgets hold real records.
//!
//! The form is reached through the [`FormContext`] trait and HTTP through the [`Client`] trait.
//! Every network call runs as its own task on a [`tokio::task::LocalSet`] and nothing is ever
//! reported back: a failure simply leaves the form as it was.
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use bookfill::{Config, FetchController, MemoryForm};
//!
//! # async fn run() {
//! let form = Rc::new(MemoryForm::new().with_field("id_isbn", "978-0-262-51087-5"));
//! let controller = FetchController::new(
//!     Rc::new(reqwest::Client::new()),
//!     Rc::clone(&form),
//!     Rc::new(Config::default()),
//! );
//!
//! let local = tokio::task::LocalSet::new();
//! local.run_until(async { controller.trigger() }).await;
//! // wait for the lookup and every get-or-create request
//! local.await;
//! # }
//! ```

mod api;
pub mod config;
mod controller;
mod error;
pub mod form;
pub mod isbn;
mod populate;
mod resolver;

pub use api::{
    get_or_create::{Entity, EntityKind, Resolution},
    google_books::VolumeInfo,
    Client, Response,
};
pub use config::{Config, FieldKeys};
pub use controller::FetchController;
pub use error::{Error, ErrorKind};
pub use form::{FieldValue, FormContext, MemoryForm, SelectOption};
pub use isbn::{is_isbn, normalize, Isbn, IsbnFormat};
pub use populate::{published_year, BookPopulator};
pub use resolver::EntityResolver;

use std::rc::Rc;

use log::trace;

/// The HTTP client used when none is supplied.
pub type HttpClient = reqwest::Client;

/// Runs the autofill once against `form` with the default [`HttpClient`].
///
/// The lookup is spawned on the current [`tokio::task::LocalSet`]; await the set to wait for every
/// field to settle.
///
/// # Panics
///
/// Panics when called outside of a [`tokio::task::LocalSet`].
pub fn try_fill_book<F>(form: Rc<F>, config: Config)
where
    F: FormContext + 'static,
{
    trace!("Autofill triggered");
    FetchController::new(Rc::new(HttpClient::new()), form, Rc::new(config)).trigger();
}
