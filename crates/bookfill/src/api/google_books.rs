use log::{info, trace};
use serde::Deserialize;

use crate::{Error, ErrorKind, Isbn};

use super::Client;

/// The only status the lookup accepts as a complete answer.
const OK: u16 = 200;

pub(crate) fn lookup_url(base: &str, isbn: &Isbn) -> String {
    format!("{base}?q=isbn%3D{isbn}&maxResults=1")
}

/// Looks `isbn` up and returns the volume information of the first result.
pub(crate) async fn get_volume_info<C: Client>(
    client: &C,
    base: &str,
    isbn: &Isbn,
) -> Result<VolumeInfo, Error> {
    info!("Searching for ISBN '{isbn}' using Google Books API");
    let url = lookup_url(base, isbn);

    let response = client.fetch(&url).await?;
    if response.status != OK {
        return Err(Error::status(response.status, &url));
    }

    trace!("Request was successful");

    let GoogleModel { items } = response.json()?;

    items
        .into_iter()
        .next()
        .map(|item| item.volume_info)
        .ok_or_else(|| Error::new(ErrorKind::NoValue, "No books found!"))
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct GoogleModel {
    // the API leaves the key out when nothing matched
    #[serde(default)]
    items: Vec<Item>,
}

#[derive(Deserialize)]
#[cfg_attr(test, derive(Debug))]
struct Item {
    #[serde(rename = "volumeInfo")]
    volume_info: VolumeInfo,
}

/// Volume information from the Google Books API.
///
/// Every field is optional, a missing field is carried through to the form as is.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeInfo {
    /// Title of the volume.
    pub title: Option<String>,
    /// Author names in the order the API lists them.
    pub authors: Option<Vec<String>>,
    /// Publisher name.
    pub publisher: Option<String>,
    /// Publication date, usually `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub published_date: Option<String>,
    /// Number of pages.
    pub page_count: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::{get_volume_info, GoogleModel};
    use crate::{
        api::{assert_urls, MockClient, Reply},
        ErrorKind, Isbn,
    };

    const BASE: &str = "https://www.googleapis.com/books/v1/volumes";
    const GOOGLE_BOOK_JSON: &str = include_str!("../../tests/data/google_book_json.txt");

    fn isbn(raw: &str) -> Isbn {
        Isbn::parse(raw).expect("test ISBNs are valid")
    }

    #[tokio::test]
    async fn isbn_13_url_format_is_correct() {
        let client = MockClient::new(|_| Reply::Respond(200, GOOGLE_BOOK_JSON.to_owned()));

        assert!(get_volume_info(&client, BASE, &isbn("978-0-262-51087-5")).await.is_ok());
        assert_urls!(
            "https://www.googleapis.com/books/v1/volumes?q=isbn%3D9780262510875&maxResults=1"
        );
    }

    #[tokio::test]
    async fn isbn_10_url_keeps_check_letter() {
        let client = MockClient::new(|_| Reply::Respond(200, GOOGLE_BOOK_JSON.to_owned()));

        assert!(get_volume_info(&client, BASE, &isbn("0-9752298-0-X")).await.is_ok());
        assert_urls!(
            "https://www.googleapis.com/books/v1/volumes?q=isbn%3D097522980X&maxResults=1"
        );
    }

    #[tokio::test]
    async fn first_item_volume_info_is_returned() {
        let client = MockClient::new(|_| Reply::Respond(200, GOOGLE_BOOK_JSON.to_owned()));

        let info = get_volume_info(&client, BASE, &isbn("9780262510875"))
            .await
            .expect("canned response has one item");

        assert_eq!(
            Some("Structure and Interpretation of Computer Programs"),
            info.title.as_deref()
        );
        assert_eq!(
            Some(vec!["Harold Abelson".to_owned(), "Gerald Jay Sussman".to_owned()]),
            info.authors
        );
        assert_eq!(Some("MIT Press"), info.publisher.as_deref());
        assert_eq!(Some("1996-07-25"), info.published_date.as_deref());
        assert_eq!(Some(657), info.page_count);
    }

    #[tokio::test]
    async fn empty_items_returns_no_value() {
        let client = MockClient::new(|_| Reply::Respond(200, r#"{"items": []}"#.to_owned()));

        let err = get_volume_info(&client, BASE, &isbn("9780262510875"))
            .await
            .expect_err("no items");
        assert_eq!(ErrorKind::NoValue, err.kind());
    }

    #[tokio::test]
    async fn missing_items_returns_no_value() {
        let client = MockClient::new(|_| {
            Reply::Respond(200, r#"{"kind": "books#volumes", "totalItems": 0}"#.to_owned())
        });

        let err = get_volume_info(&client, BASE, &isbn("9780262510875"))
            .await
            .expect_err("no items");
        assert_eq!(ErrorKind::NoValue, err.kind());
    }

    #[tokio::test]
    async fn non_200_status_is_rejected() {
        let client = MockClient::new(|_| Reply::Respond(204, String::new()));

        let err = get_volume_info(&client, BASE, &isbn("9780262510875"))
            .await
            .expect_err("only 200 is accepted");
        assert_eq!(ErrorKind::Status, err.kind());
    }

    #[tokio::test]
    async fn network_error_is_passed_on() {
        let client = MockClient::new(|_| Reply::NetworkError);

        let err = get_volume_info(&client, BASE, &isbn("9780262510875"))
            .await
            .expect_err("network error");
        assert_eq!(ErrorKind::IO, err.kind());
    }

    #[test]
    fn sparse_volume_info_deserializes() {
        let model: GoogleModel =
            serde_json::from_str(r#"{"items": [{"volumeInfo": {"title": "Untitled Notes"}}]}"#)
                .unwrap();
        let info = &model.items[0].volume_info;

        assert_eq!(Some("Untitled Notes"), info.title.as_deref());
        assert_eq!(None, info.authors);
        assert_eq!(None, info.page_count);
    }

    #[test]
    fn item_without_volume_info_is_a_deserialize_error() {
        assert!(serde_json::from_str::<GoogleModel>(r#"{"items": [{"id": "x"}]}"#).is_err());
    }
}
