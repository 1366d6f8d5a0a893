//! # Exchange History
//!
//! Every request the suite sends, most recent first, so a failed run can be
//! read back request by request.

use std::collections::VecDeque;

use serde::Serialize;

use crate::http::method::HttpMethod;

/// Maximum number of exchanges to retain.
pub const MAX_HISTORY_ENTRIES: usize = 100;

#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub scenario: usize,
    #[serde(serialize_with = "serialize_method")]
    pub method: HttpMethod,
    pub url: String,
    /// `None` when the request never got a response.
    pub status: Option<u16>,
    pub duration_ms: Option<u64>,
}

fn serialize_method<S: serde::Serializer>(
    method: &HttpMethod,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(method)
}

#[derive(Debug, Clone, Default)]
pub struct History {
    entries: VecDeque<Exchange>,
}

impl History {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::new(),
        }
    }

    /// Add an entry to the front, evicting the oldest once full.
    pub fn push(&mut self, entry: Exchange) {
        if self.entries.len() >= MAX_HISTORY_ENTRIES {
            self.entries.pop_back();
        }
        self.entries.push_front(entry);
    }

    pub fn entries(&self) -> &VecDeque<Exchange> {
        &self.entries
    }
}
