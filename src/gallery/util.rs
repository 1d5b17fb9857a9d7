use url::Url;

pub fn endpoint_host(endpoint: &Url) -> String {
    endpoint
        .host_str()
        .unwrap_or(endpoint.as_str())
        .to_string()
}

macro_rules! log_res {
    ( $e:expr ) => {
        match &$e {
            Ok(listing) => debug!("Fetched {} photos.", listing.len()),
            Err(err) => warn!("Fetch failed: {}", err),
        }
    }
}

pub(crate) use log_res;
