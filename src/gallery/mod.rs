pub mod cancel;
pub mod error;
pub mod model;
pub mod util;

#[cfg(test)]
mod test_server;

use std::sync::Arc;

use tokio::task::JoinHandle;
use url::Url;

use crate::config::Config;
use crate::flickr::api::{Api, ListingQuery};
use crate::flickr::photo::{parse_listing, GalleryItem, PhotoListing};
use self::cancel::CancelToken;
use self::error::Error;
use self::util::{endpoint_host, log_res};

/// Fetches pages of photo metadata. One request per call, no retries and no
/// caching; concurrent calls share the HTTP client and nothing else.
pub struct GalleryFetcher {
    api: Api,
    endpoint: Url,
    api_key: String,
    per_page: u32,
}

impl GalleryFetcher {
    pub fn new(config: &Config) -> Result<GalleryFetcher, Error> {
        config.validate()?;
        let api = Api::new(config.timeout())?;
        Ok(GalleryFetcher {
            api,
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            per_page: config.per_page,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// First page of the gallery.
    pub async fn fetch_photos(&self) -> Result<Vec<GalleryItem>, Error> {
        let listing = self.fetch_page(1).await?;
        Ok(listing.into_items())
    }

    pub async fn fetch_page(&self, page: u32) -> Result<PhotoListing, Error> {
        if page == 0 {
            return Err(Error::InvalidPage(page));
        }
        debug!("Fetching page {} from {}.", page, endpoint_host(&self.endpoint));
        let query = ListingQuery::interesting(&self.api_key, page, self.per_page);
        // The request URL carries the api key, keep it out of errors.
        let response = self.api.photos(&self.endpoint, &query)
            .await
            .map_err(reqwest::Error::without_url)?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status));
        }
        let body = response.text()
            .await
            .map_err(reqwest::Error::without_url)?;
        let listing = parse_listing(&body)?;
        Ok(listing)
    }

    /// Runs `fetch_page` on a tokio task. Yields `None` when `token` is
    /// cancelled before the result is ready.
    pub fn spawn_fetch(self: &Arc<Self>, page: u32, token: CancelToken) -> JoinHandle<Option<Result<PhotoListing, Error>>> {
        let fetcher = Arc::clone(self);
        tokio::spawn(async move {
            let result = tokio::select! {
                _ = token.cancelled() => return None,
                result = fetcher.fetch_page(page) => result,
            };
            if token.is_cancelled() {
                return None;
            }
            log_res!(result);
            Some(result)
        })
    }
}
