//! # Company Probe
//!
//! The five Company routes behind one trait, so scenarios never see the
//! transport. [`HttpProbe`] talks to the real service.

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::error::ProbeError;
use crate::fixtures::{Company, CompanyId};
use crate::http::client::send_request;
use crate::http::method::HttpMethod;
use crate::http::request::RequestInput;
use crate::http::response::HttpResponse;

#[async_trait]
pub trait CompanyProbe: Send + Sync {
    /// Base collection URL, used for reporting.
    fn base_url(&self) -> &str;

    /// URL of a single Company, as the probe addresses it.
    fn item_url(&self, id: &CompanyId) -> String;

    async fn create(&self, company: &Company) -> Result<HttpResponse, ProbeError>;

    async fn list(&self) -> Result<HttpResponse, ProbeError>;

    async fn get_by_id(&self, id: &CompanyId) -> Result<HttpResponse, ProbeError>;

    async fn update(&self, id: &CompanyId, company: &Company)
    -> Result<HttpResponse, ProbeError>;

    async fn delete(&self, id: &CompanyId) -> Result<HttpResponse, ProbeError>;
}

pub struct HttpProbe {
    client: reqwest::Client,
    base: Url,
}

impl HttpProbe {
    /// The base must be a hierarchical http(s) URL; a trailing slash is dropped.
    pub fn new(client: reqwest::Client, base_url: &str) -> Result<Self, ProbeError> {
        let invalid = |reason: String| ProbeError::InvalidUrl {
            url: base_url.to_string(),
            reason,
        };
        let mut base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        base.path_segments_mut()
            .map_err(|_| invalid("cannot be a base URL".to_string()))?
            .pop_if_empty();
        Ok(Self { client, base })
    }

    /// The id becomes one percent-encoded path segment.
    fn item_location(&self, id: &CompanyId) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(&id.to_string());
        }
        url
    }

    async fn send(
        &self,
        method: HttpMethod,
        url: Url,
        company: Option<&Company>,
    ) -> Result<HttpResponse, ProbeError> {
        let request = RequestInput {
            method,
            url: url.clone(),
            body: company.map(Company::to_json),
        };
        let response = send_request(&self.client, request).await?;
        debug!(
            %method,
            url = %url,
            status = response.status,
            duration_ms = response.duration_ms as u64,
            size_bytes = response.size_bytes,
            "exchange completed"
        );
        Ok(response)
    }
}

#[async_trait]
impl CompanyProbe for HttpProbe {
    fn base_url(&self) -> &str {
        self.base.as_str()
    }

    fn item_url(&self, id: &CompanyId) -> String {
        self.item_location(id).to_string()
    }

    async fn create(&self, company: &Company) -> Result<HttpResponse, ProbeError> {
        self.send(HttpMethod::Post, self.base.clone(), Some(company))
            .await
    }

    async fn list(&self) -> Result<HttpResponse, ProbeError> {
        self.send(HttpMethod::Get, self.base.clone(), None).await
    }

    async fn get_by_id(&self, id: &CompanyId) -> Result<HttpResponse, ProbeError> {
        self.send(HttpMethod::Get, self.item_location(id), None)
            .await
    }

    async fn update(
        &self,
        id: &CompanyId,
        company: &Company,
    ) -> Result<HttpResponse, ProbeError> {
        self.send(HttpMethod::Put, self.item_location(id), Some(company))
            .await
    }

    async fn delete(&self, id: &CompanyId) -> Result<HttpResponse, ProbeError> {
        self.send(HttpMethod::Delete, self.item_location(id), None)
            .await
    }
}
