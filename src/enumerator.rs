use std::{
    collections::{HashSet, VecDeque},
    sync::Arc,
};

use tracing::{debug, error, info, warn};

use crate::{
    adapters::PageFetcher,
    model::{
        error::{Error, Result},
        listing::{ListingRequest, ObjectEntry},
    },
    pattern::NamePattern,
};

#[derive(Debug, Default)]
struct EnumerationState {
    cursor: Option<String>,
    exhausted: bool,
    buffer: VecDeque<ObjectEntry>,
    failure: Option<Error>,
    last_key: Option<String>,
    fetches: u64,
}

/// Pull-based enumeration of the keys of one bucket, one listing page at a
/// time, in the service's listing order.
pub struct KeyEnumerator {
    fetcher: Arc<dyn PageFetcher>,
    bucket: String,
    prefix: Option<String>,
    start_after: Option<String>,
    max_keys: Option<i32>,
    pattern: NamePattern,
    excluded: HashSet<String>,
    state: EnumerationState,
}

impl KeyEnumerator {
    pub fn new(fetcher: Arc<dyn PageFetcher>, bucket: &str, pattern: NamePattern) -> Result<Self> {
        if bucket.is_empty() {
            return Err(Error::configuration("bucket name must not be empty"));
        }

        Ok(Self {
            fetcher,
            bucket: bucket.to_string(),
            prefix: None,
            start_after: None,
            max_keys: None,
            pattern,
            excluded: HashSet::new(),
            state: EnumerationState::default(),
        })
    }

    pub fn with_prefix(mut self, prefix: Option<String>) -> Self {
        self.prefix = prefix.filter(|p| !p.is_empty());
        self
    }

    pub fn with_start_after(mut self, start_after: Option<String>) -> Self {
        self.start_after = start_after.filter(|k| !k.is_empty());
        self
    }

    pub fn with_max_keys(mut self, max_keys: Option<i32>) -> Self {
        self.max_keys = max_keys;
        self
    }

    pub fn with_excluded_keys<I>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.excluded.extend(keys);
        self
    }

    /// Never yield `key`, including when its page is already buffered.
    pub fn exclude(&mut self, key: impl Into<String>) {
        self.excluded.insert(key.into());
    }

    /// Returns the next matching key, `Ok(None)` once the listing is done.
    ///
    /// A transient error leaves the enumerator untouched: calling again
    /// re-issues the same request. A fatal error is latched and returned by
    /// every later call without touching the store.
    pub fn next_key(&mut self) -> Result<Option<String>> {
        if let Some(err) = &self.state.failure {
            return Err(err.clone());
        }

        loop {
            while self.state.buffer.is_empty() && !self.state.exhausted {
                self.fill()?;
            }

            let Some(entry) = self.state.buffer.pop_front() else {
                return Ok(None);
            };

            if self.excluded.contains(&entry.key) {
                debug!(bucket = %self.bucket, key = %entry.key, "excluded key skipped");
                continue;
            }

            self.state.last_key = Some(entry.key.clone());
            return Ok(Some(entry.key));
        }
    }

    pub fn last_key(&self) -> Option<&str> {
        self.state.last_key.as_deref()
    }

    pub fn fetch_count(&self) -> u64 {
        self.state.fetches
    }

    pub fn is_exhausted(&self) -> bool {
        self.state.exhausted && self.state.buffer.is_empty()
    }

    fn next_request(&self) -> ListingRequest {
        let request = match &self.state.cursor {
            Some(token) => ListingRequest::resume(&self.bucket, token),
            None => ListingRequest::start(
                &self.bucket,
                self.prefix.clone(),
                self.start_after.clone(),
            ),
        };

        request.with_max_keys(self.max_keys)
    }

    fn accepts(&self, entry: &ObjectEntry) -> bool {
        entry.size_bytes > 0 && self.pattern.matches(&entry.key)
    }

    fn fill(&mut self) -> Result<()> {
        let request = self.next_request();
        self.state.fetches += 1;

        let page = match self.fetcher.fetch_page(&request) {
            Ok(page) => page,
            Err(err) if err.is_retryable() => {
                warn!(
                    bucket = %self.bucket,
                    error_message = %err,
                    error_group = err.group(),
                    "fetch_page"
                );
                return Err(err);
            }
            Err(err) => {
                error!(
                    bucket = %self.bucket,
                    error_message = %err,
                    error_group = err.group(),
                    "fetch_page"
                );
                self.state.failure = Some(err.clone());
                return Err(err);
            }
        };

        let (entries, cursor) = page.into_parts();
        let listed = entries.len();
        let before = self.state.buffer.len();
        for entry in entries {
            if self.accepts(&entry) {
                self.state.buffer.push_back(entry);
            }
        }

        debug!(
            bucket = %self.bucket,
            listed = listed,
            kept = self.state.buffer.len() - before,
            truncated = cursor.is_some(),
            "page fetched"
        );

        self.state.exhausted = cursor.is_none();
        self.state.cursor = cursor;

        if self.state.exhausted {
            info!(bucket = %self.bucket, fetches = self.state.fetches, "listing exhausted");
        }

        Ok(())
    }
}
