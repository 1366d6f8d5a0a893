use serde_json::Value;

/// Status and parsed body of one exchange. Headers are deliberately not kept.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub duration_ms: u128,
    pub size_bytes: usize,
    pub body: Value,
}

impl HttpResponse {
    /// Look up a top-level key of an object body.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.body.as_object().and_then(|object| object.get(key))
    }
}
