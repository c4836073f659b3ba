use serde::de::DeserializeOwned;

pub(crate) mod get_or_create;
pub(crate) mod google_books;

use crate::{Error, ErrorKind};

const CSRF_HEADER: &str = "X-CSRFToken";

/// The HTTP seam of the autofill.
///
/// Both methods hand back the raw [`Response`] so that each caller decides which statuses count
/// as success.
#[allow(async_fn_in_trait)]
pub trait Client {
    /// Issues a `GET` request to `url`.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the request cannot be sent or the body cannot be read.
    async fn fetch(&self, url: &str) -> Result<Response, Error>;

    /// Issues a url-encoded `POST` of `form` to `url`, carrying the `csrf_token` when there is one.
    ///
    /// # Errors
    ///
    /// An [`Err`] is returned when the request cannot be sent or the body cannot be read.
    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        csrf_token: Option<&str>,
    ) -> Result<Response, Error>;
}

/// Status and body of a completed HTTP exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Body text.
    pub body: String,
}

impl Response {
    /// Creates a response from its parts.
    #[must_use]
    pub const fn new(status: u16, body: String) -> Self {
        Self { status, body }
    }

    /// Whether the status is in the `2xx` range.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Deserializes the body as JSON.
    ///
    /// # Errors
    ///
    /// An [`Err`] of kind [`ErrorKind::Deserialize`] is returned when the body is not valid JSON
    /// for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_str(&self.body).map_err(|e| Error::wrap(ErrorKind::Deserialize, e))
    }

    async fn read(resp: reqwest::Response) -> Result<Self, Error> {
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::wrap(ErrorKind::Deserialize, e))?;

        Ok(Self::new(status, body))
    }
}

impl Client for reqwest::Client {
    async fn fetch(&self, url: &str) -> Result<Response, Error> {
        let resp = self
            .get(url)
            .send()
            .await
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        Response::read(resp).await
    }

    async fn post_form(
        &self,
        url: &str,
        form: &[(&str, &str)],
        csrf_token: Option<&str>,
    ) -> Result<Response, Error> {
        let mut request = self.post(url).form(form);
        if let Some(token) = csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| Error::wrap(ErrorKind::IO, e))?;

        Response::read(resp).await
    }
}

#[cfg(test)]
pub(crate) use test::{assert_urls, entity_reply, recorded_requests, MockClient, Reply, Request};
