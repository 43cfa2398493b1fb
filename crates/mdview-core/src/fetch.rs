//! Remote source fetching contract.

use futures::future::LocalBoxFuture;
use url::Url;

use crate::error::FetchError;

/// Fetches the body text behind a resolved source URL.
///
/// Implementations issue a plain GET and report non-success statuses as
/// errors; the component treats every error the same way (keep the current
/// content, stay quiet). No timeout is imposed here; a hung request simply
/// leaves the instance in its last committed state.
pub trait ContentFetcher {
    fn fetch_text(&self, url: &Url) -> LocalBoxFuture<'static, Result<String, FetchError>>;
}
