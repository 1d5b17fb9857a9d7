use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::cancel::CancelToken;
use super::error::Error;
use super::GalleryFetcher;
use crate::flickr::photo::PhotoListing;

#[derive(Clone, Debug)]
pub enum FetchState {
    NotStarted,
    InFlight,
    Succeeded(PhotoListing),
    Failed(Arc<Error>),
}

impl FetchState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FetchState::Succeeded(_) | FetchState::Failed(_))
    }

    /// Outcome of a finished load, `None` while it has not finished.
    pub fn into_result(self) -> Option<Result<PhotoListing, Error>> {
        match self {
            FetchState::Succeeded(listing) => Some(Ok(listing)),
            FetchState::Failed(err) => Some(Err(Error::Fetch(err))),
            FetchState::NotStarted | FetchState::InFlight => None,
        }
    }
}

// Errors have no equality of their own; two failures match when they print the same.
impl PartialEq for FetchState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (FetchState::NotStarted, FetchState::NotStarted) => true,
            (FetchState::InFlight, FetchState::InFlight) => true,
            (FetchState::Succeeded(a), FetchState::Succeeded(b)) => a == b,
            (FetchState::Failed(a), FetchState::Failed(b)) => Arc::ptr_eq(a, b) || a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

/// Holds the latest gallery page for whoever subscribes to it. Subscribers
/// only get a receiver; the model keeps no handle on them.
pub struct GalleryModel {
    fetcher: Arc<GalleryFetcher>,
    state: Arc<watch::Sender<FetchState>>,
    current: Arc<Mutex<Option<CancelToken>>>,
}

impl GalleryModel {
    pub fn new(fetcher: Arc<GalleryFetcher>) -> Self {
        let (state, _) = watch::channel(FetchState::NotStarted);
        GalleryModel {
            fetcher,
            state: Arc::new(state),
            current: Arc::new(Mutex::new(None)),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<FetchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> FetchState {
        self.state.borrow().clone()
    }

    /// Starts loading `page`, superseding any load still in flight.
    pub fn load(&self, page: u32) -> JoinHandle<()> {
        let token = CancelToken::new();
        {
            let mut current = lock(&self.current);
            if let Some(previous) = current.replace(token.clone()) {
                previous.cancel();
            }
            self.state.send_replace(FetchState::InFlight);
        }

        let fetch = self.fetcher.spawn_fetch(page, token.clone());
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.current);
        tokio::spawn(async move {
            let next = match fetch.await {
                Ok(Some(Ok(listing))) => FetchState::Succeeded(listing),
                Ok(Some(Err(err))) => FetchState::Failed(Arc::new(err)),
                Ok(None) => return,
                Err(err) => FetchState::Failed(Arc::new(Error::Task(err.to_string()))),
            };
            // Publish under the lock so a newer load cannot be overwritten.
            let guard = lock(&current);
            if token.is_cancelled() {
                return;
            }
            state.send_replace(next);
            drop(guard);
        })
    }

    /// Drops the result of the load in flight, if any.
    pub fn cancel(&self) {
        if let Some(token) = lock(&self.current).take() {
            token.cancel();
        }
    }
}

impl Drop for GalleryModel {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn lock(current: &Mutex<Option<CancelToken>>) -> MutexGuard<'_, Option<CancelToken>> {
    current.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::config::Config;
    use crate::gallery::test_server::{refused_url, Reply, TestServer};

    const TWO_PHOTOS: &str = r#"{"photo":[{"id":"1","title":"Sunset","url_s":"http://x/1.jpg"},{"id":"2","title":"Lake","url_s":"http://x/2.jpg"}]}"#;

    fn model_for(server: &TestServer) -> GalleryModel {
        model_at(&server.url)
    }

    fn model_at(endpoint: &url::Url) -> GalleryModel {
        let config = Config {
            endpoint: endpoint.clone(),
            api_key: "test-key".into(),
            timeout_secs: 5,
            ..Config::default()
        };
        GalleryModel::new(Arc::new(GalleryFetcher::new(&config).unwrap()))
    }

    #[tokio::test]
    async fn starts_not_started() {
        let server = TestServer::start(Reply::ok(TWO_PHOTOS)).await;
        let model = model_for(&server);
        assert_eq!(model.state(), FetchState::NotStarted);
        assert!(!model.state().is_terminal());
        assert_eq!(server.hits(), 0);
    }

    #[tokio::test]
    async fn subscriber_sees_successful_load() {
        let server = TestServer::start(Reply::ok(TWO_PHOTOS)).await;
        let model = model_for(&server);
        let mut rx = model.subscribe();
        model.load(1).await.unwrap();

        let state = rx.wait_for(FetchState::is_terminal).await.unwrap().clone();
        match state {
            FetchState::Succeeded(listing) => {
                assert_eq!(listing.len(), 2);
                assert_eq!(listing.items()[0].id(), "1");
            },
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_load_is_published() {
        let server = TestServer::start(Reply::ok("{}")).await;
        let model = model_for(&server);
        model.load(1).await.unwrap();
        match model.state() {
            FetchState::Failed(err) => {
                assert!(err.is_parse(), "{:?}", err);
                assert!(err.to_string().contains("photo"), "{}", err);
            },
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[tokio::test]
    async fn failed_load_keeps_transport_class() {
        let model = model_at(&refused_url().await);
        model.load(1).await.unwrap();
        match model.state() {
            FetchState::Failed(err) => {
                assert!(err.is_transport(), "{:?}", err);
                assert!(!err.to_string().contains("test-key"), "{}", err);
            },
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn finished_states_convert_to_results() {
        assert!(FetchState::NotStarted.into_result().is_none());
        assert!(FetchState::InFlight.into_result().is_none());
        let listing = FetchState::Succeeded(PhotoListing::default()).into_result();
        assert!(matches!(listing, Some(Ok(l)) if l.is_empty()));
        let failed = FetchState::Failed(Arc::new(Error::InvalidPage(0))).into_result();
        match failed {
            Some(Err(err)) => assert_eq!(err.to_string(), "Invalid page 0, pages start at 1"),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn cancelled_load_publishes_nothing() {
        let server = TestServer::start(Reply::Stall).await;
        let model = model_for(&server);
        let handle = model.load(1);
        assert_eq!(model.state(), FetchState::InFlight);
        tokio::time::sleep(Duration::from_millis(50)).await;
        model.cancel();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("cancel should end the load")
            .unwrap();
        assert_eq!(model.state(), FetchState::InFlight);
    }

    #[tokio::test]
    async fn new_load_supersedes_old_one() {
        let stalled = TestServer::start(Reply::Stall).await;
        let model = model_for(&stalled);
        let first = model.load(1);
        let second = model.load(2);
        tokio::time::timeout(Duration::from_secs(2), first)
            .await
            .expect("superseded load should end")
            .unwrap();
        assert_eq!(model.state(), FetchState::InFlight);
        model.cancel();
        second.await.unwrap();
    }

    #[tokio::test]
    async fn receivers_outlive_the_model() {
        let server = TestServer::start(Reply::ok(TWO_PHOTOS)).await;
        let model = model_for(&server);
        let rx = model.subscribe();
        model.load(1).await.unwrap();
        drop(model);
        assert!(matches!(*rx.borrow(), FetchState::Succeeded(_)));
    }
}
