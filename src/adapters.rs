use crate::model;

pub mod mock;
pub mod s3;

/// Issues exactly one listing request per call against some object store.
///
/// Implementations hold no per-listing state and are shared between
/// enumerators, hence `Send + Sync`. Retrying is left to the underlying
/// client.
pub trait PageFetcher: Send + Sync {
    fn fetch_page(
        &self,
        request: &model::listing::ListingRequest,
    ) -> model::error::Result<model::listing::Page>;
}

/// Maps an HTTP status returned by a listing call onto the error taxonomy.
pub fn classify_status(status: u16, message: String) -> model::error::Error {
    match status {
        408 | 429 => model::error::Error::TransientFetch(message),
        s if s >= 500 => model::error::Error::TransientFetch(message),
        _ => model::error::Error::FatalFetch(message),
    }
}
