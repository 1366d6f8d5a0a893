use reqwest::Url;
use serde_json::Value;

use super::method::HttpMethod;

#[derive(Debug, Clone)]
pub struct RequestInput {
    pub method: HttpMethod,
    pub url: Url,
    pub body: Option<Value>,
}
