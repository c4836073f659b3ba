use std::fmt;

use log::trace;
use serde::Deserialize;

use crate::Error;

use super::Client;

/// Status the site answers with when it had to create the entity.
const CREATED: u16 = 201;

/// The kinds of entity the site can get or create by name.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EntityKind {
    /// A book author.
    Author,
    /// A book publisher.
    Publisher,
}

impl EntityKind {
    /// Path of the get-or-create endpoint for this kind.
    #[must_use]
    pub const fn endpoint(self) -> &'static str {
        match self {
            Self::Author => "/api/authors/get_or_create",
            Self::Publisher => "/api/publishers/get_or_create",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Author => f.write_str("author"),
            Self::Publisher => f.write_str("publisher"),
        }
    }
}

/// An author or publisher as stored by the site.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Entity {
    /// Primary key on the site.
    pub id: i64,
    /// Name as stored on the site.
    pub name: String,
}

/// The outcome of a get-or-create call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolution {
    /// The entity the name resolved to.
    pub entity: Entity,
    /// Whether the site created it for this call.
    pub created: bool,
}

/// Posts `name` to the get-or-create endpoint at `url`.
pub(crate) async fn get_or_create<C: Client>(
    client: &C,
    url: &str,
    name: &str,
    csrf_token: Option<&str>,
) -> Result<Resolution, Error> {
    trace!("Get or create '{name}' at '{url}'");
    let response = client.post_form(url, &[("name", name)], csrf_token).await?;

    if !response.is_success() {
        return Err(Error::status(response.status, url));
    }

    let entity = response.json()?;

    Ok(Resolution {
        entity,
        created: response.status == CREATED,
    })
}
