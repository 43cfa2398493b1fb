//! Network fetching for remote markdown sources.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use gloo_net::http::Request;
use mdview_core::{ContentFetcher, FetchError};
use url::Url;

/// Fetcher over the browser Fetch API.
///
/// Plain GET with no timeout: a hung request leaves the instance in its last
/// committed state, which is the component's contract.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlooFetcher;

impl ContentFetcher for GlooFetcher {
    fn fetch_text(&self, url: &Url) -> LocalBoxFuture<'static, Result<String, FetchError>> {
        let url = url.to_string();
        async move {
            let response = Request::get(&url)
                .send()
                .await
                .map_err(|err| FetchError::Network(err.to_string()))?;
            if !response.ok() {
                return Err(FetchError::Status(response.status()));
            }
            response.text().await.map_err(|_| FetchError::Body)
        }
        .boxed_local()
    }
}
