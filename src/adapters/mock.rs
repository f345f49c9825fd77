use std::{collections::VecDeque, sync::Mutex};

use crate::{adapters, model};

/// Scripted fetcher: replays queued responses in order and records every
/// request it receives. Once a single response is left it is replayed for
/// every further call.
#[derive(Default)]
pub struct MockFetcher {
    responses: Mutex<VecDeque<model::error::Result<model::listing::Page>>>,
    requests: Mutex<Vec<model::listing::ListingRequest>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then_return(self, page: model::listing::Page) -> Self {
        self.push(Ok(page))
    }

    pub fn then_fail(self, err: model::error::Error) -> Self {
        self.push(Err(err))
    }

    fn push(self, response: model::error::Result<model::listing::Page>) -> Self {
        self.responses
            .lock()
            .expect("failed to acquire `responses` guard")
            .push_back(response);
        self
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<model::listing::ListingRequest> {
        self.requests
            .lock()
            .expect("failed to acquire `requests` guard")
            .clone()
    }

    pub fn calls(&self) -> usize {
        self.requests
            .lock()
            .expect("failed to acquire `requests` guard")
            .len()
    }
}

impl adapters::PageFetcher for MockFetcher {
    fn fetch_page(
        &self,
        request: &model::listing::ListingRequest,
    ) -> model::error::Result<model::listing::Page> {
        self.requests
            .lock()
            .expect("failed to acquire `requests` guard")
            .push(request.clone());

        let mut responses = self
            .responses
            .lock()
            .expect("failed to acquire `responses` guard");

        match responses.len() {
            0 => Ok(model::listing::Page::default()),
            1 => responses[0].clone(),
            _ => responses
                .pop_front()
                .unwrap_or_else(|| Ok(model::listing::Page::default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::PageFetcher;
    use crate::model::listing::{ListingRequest, ObjectEntry, Page};

    #[test]
    fn test_replays_in_order_then_repeats_last() {
        let fetcher = MockFetcher::new()
            .then_return(Page::truncated(vec![ObjectEntry::new("key1", 1)], "t1"))
            .then_return(Page::last(vec![ObjectEntry::new("key2", 1)]));

        let req = ListingRequest::start("test-bucket", None, None);
        let first = fetcher.fetch_page(&req).unwrap();
        let second = fetcher.fetch_page(&req).unwrap();
        let third = fetcher.fetch_page(&req).unwrap();

        assert_eq!(first.next_cursor(), Some("t1"));
        assert_eq!(second.entries()[0].key, "key2");
        assert_eq!(third, second);
        assert_eq!(fetcher.calls(), 3);
    }

    #[test]
    fn test_empty_script_returns_empty_last_page() {
        let fetcher = MockFetcher::new();
        let page = fetcher
            .fetch_page(&ListingRequest::start("test-bucket", None, None))
            .unwrap();

        assert!(page.entries().is_empty());
        assert!(!page.is_truncated());
    }
}
