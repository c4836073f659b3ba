#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::perf,
    clippy::style,
    clippy::missing_safety_doc,
    clippy::missing_const_for_fn
)]
#![allow(clippy::mod_module_files)]

use std::process;

mod app;
mod interact;

use bookfill::Config;

use clap::Parser;
use log::{error, trace};

fn main() {
    if let Err(err) = try_main() {
        error!("{:#}", err);
        process::exit(2);
    }
}

fn try_main() -> eyre::Result<()> {
    let Cli {
        isbn,
        site,
        lookup_url,
        csrf_token,
        verbosity,
        quiet,
    } = Cli::parse();

    setup_errlog(usize::from(verbosity), quiet)?;

    let isbn = if let Some(isbn) = isbn {
        trace!("ISBN given as an argument: '{isbn}'");
        isbn
    } else {
        interact::user_input("ISBN")?
    };

    let mut config = Config::default();
    if let Some(site) = site {
        config = config.site_url(site);
    }
    if let Some(lookup_url) = lookup_url {
        config = config.lookup_url(lookup_url);
    }

    let form = app::fill(&isbn, csrf_token, config)?;
    print!("{}", app::render(&form));

    Ok(())
}

fn setup_errlog(verbosity: usize, quiet: bool) -> eyre::Result<()> {
    stderrlog::new().verbosity(log_level(verbosity, quiet)).init()?;
    Ok(())
}

/// Maps the flags onto stderrlog's levels, where `0` shows errors only.
const fn log_level(verbosity: usize, quiet: bool) -> usize {
    // if quiet then ignore verbosity but still show errors
    if quiet {
        0
    } else {
        verbosity
    }
}

#[derive(Parser)]
#[clap(name = "bookfill")]
#[clap(about = "Fill a book form from its ISBN using the Google Books API")]
#[clap(version, author)]
struct Cli {
    /// The ISBN-10 or ISBN-13 to look up, prompted for when missing
    isbn: Option<String>,

    /// Origin of the site serving the author and publisher get-or-create endpoints
    #[clap(short, long)]
    site: Option<String>,

    /// Base URL of the book metadata service
    #[clap(long)]
    lookup_url: Option<String>,

    /// CSRF token sent along with get-or-create requests
    #[clap(short, long)]
    csrf_token: Option<String>,

    /// How chatty the program is when filling the form
    ///
    /// The number of times this flag is used will increase how chatty
    /// the program is.
    #[clap(short, long, parse(from_occurrences))]
    verbosity: u8,

    /// Only show errors, regardless of verbosity.
    #[clap(short, long)]
    quiet: bool,
}

#[test]
fn default_and_quiet_show_errors_only() {
    assert_eq!(0, log_level(0, false));
    assert_eq!(0, log_level(3, true));
}

#[test]
fn each_verbose_flag_raises_the_level() {
    assert_eq!(1, log_level(1, false));
    assert_eq!(3, log_level(3, false));
}
