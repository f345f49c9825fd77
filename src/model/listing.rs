#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectEntry {
    pub key: String,
    pub size_bytes: u64,
}

impl ObjectEntry {
    pub fn new(key: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            key: key.into(),
            size_bytes,
        }
    }
}

/// A page is truncated exactly when it carries a cursor for the next page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    entries: Vec<ObjectEntry>,
    next_cursor: Option<String>,
}

impl Page {
    pub fn last(entries: Vec<ObjectEntry>) -> Self {
        Self {
            entries,
            next_cursor: None,
        }
    }

    pub fn truncated(entries: Vec<ObjectEntry>, cursor: impl Into<String>) -> Self {
        Self {
            entries,
            next_cursor: Some(cursor.into()),
        }
    }

    pub fn entries(&self) -> &[ObjectEntry] {
        &self.entries
    }

    pub fn next_cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref()
    }

    pub fn is_truncated(&self) -> bool {
        self.next_cursor.is_some()
    }

    pub fn into_parts(self) -> (Vec<ObjectEntry>, Option<String>) {
        (self.entries, self.next_cursor)
    }
}

/// Where a listing request starts reading from.
///
/// A continuation token already encodes the prefix and the start-after key of
/// the listing it came from, so a `Continue` request carries nothing else.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Position {
    Start {
        prefix: Option<String>,
        start_after: Option<String>,
    },
    Continue {
        token: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingRequest {
    pub bucket: String,
    pub position: Position,
    /// Page size hint, sent on every request.
    pub max_keys: Option<i32>,
}

impl ListingRequest {
    pub fn start(
        bucket: impl Into<String>,
        prefix: Option<String>,
        start_after: Option<String>,
    ) -> Self {
        Self {
            bucket: bucket.into(),
            position: Position::Start {
                prefix,
                start_after,
            },
            max_keys: None,
        }
    }

    pub fn resume(bucket: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            position: Position::Continue {
                token: token.into(),
            },
            max_keys: None,
        }
    }

    pub fn with_max_keys(mut self, max_keys: Option<i32>) -> Self {
        self.max_keys = max_keys;
        self
    }

    pub fn prefix(&self) -> Option<&str> {
        match &self.position {
            Position::Start { prefix, .. } => prefix.as_deref(),
            Position::Continue { .. } => None,
        }
    }

    pub fn start_after(&self) -> Option<&str> {
        match &self.position {
            Position::Start { start_after, .. } => start_after.as_deref(),
            Position::Continue { .. } => None,
        }
    }

    pub fn continuation_token(&self) -> Option<&str> {
        match &self.position {
            Position::Start { .. } => None,
            Position::Continue { token } => Some(token),
        }
    }
}
