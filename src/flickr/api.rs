use std::time::Duration;

use reqwest::{Client, Error, Request, Response};
use serde::Serialize;
use url::Url;

const METHOD_INTERESTING: &'static str = "flickr.interestingness.getList";
const EXTRAS: &'static str = "url_s";

#[derive(Serialize, Debug)]
pub struct ListingQuery<'a> {
    method: &'static str,
    api_key: &'a str,
    format: &'static str,
    nojsoncallback: u8,
    extras: &'static str,
    page: u32,
    per_page: u32,
}

impl<'a> ListingQuery<'a> {
    pub fn interesting(api_key: &'a str, page: u32, per_page: u32) -> Self {
        ListingQuery {
            method: METHOD_INTERESTING,
            api_key,
            format: "json",
            nojsoncallback: 1,
            extras: EXTRAS,
            page,
            per_page,
        }
    }
}

pub struct Api {
    client: Client,
}

impl Api {
    pub fn new(timeout: Duration) -> Result<Self, Error> {
        let client = Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Api{ client })
    }

    pub fn request(&self, endpoint: &Url, query: &ListingQuery<'_>) -> Result<Request, Error> {
        self.client
            .get(endpoint.clone())
            .query(query)
            .build()
    }

    pub async fn photos(&self, endpoint: &Url, query: &ListingQuery<'_>) -> Result<Response, Error> {
        let request = self.request(endpoint, query)?;
        self.client
            .execute(request)
            .await
    }
}
