//! In-memory Company service for exercising the suite without a network.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::ProbeError;
use crate::fixtures::{Company, CompanyId};
use crate::http::response::HttpResponse;
use crate::probe::CompanyProbe;

#[derive(Default)]
struct Store {
    next_id: u64,
    companies: BTreeMap<u64, Company>,
}

pub struct FakeCompanyService {
    store: Mutex<Store>,
    string_ids: bool,
    check_empty_fields: bool,
    return_ids: bool,
    delete_no_content: bool,
}

impl FakeCompanyService {
    /// Honours the whole contract with numeric ids.
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Store::default()),
            string_ids: false,
            check_empty_fields: true,
            return_ids: true,
            delete_no_content: false,
        }
    }

    /// Ids travel as strings, e.g. `"c-1"`.
    pub fn with_string_ids() -> Self {
        Self {
            string_ids: true,
            ..Self::new()
        }
    }

    /// Accepts empty text fields; still checks the cnpj format.
    pub fn lenient() -> Self {
        Self {
            check_empty_fields: false,
            ..Self::new()
        }
    }

    /// Creates succeed but the response carries no id.
    pub fn omitting_ids() -> Self {
        Self {
            return_ids: false,
            ..Self::new()
        }
    }

    /// Deletes answer `204 No Content` with an empty body.
    pub fn no_content_deletes() -> Self {
        Self {
            delete_no_content: true,
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.lock().companies.len()
    }

    pub fn get(&self, id: &CompanyId) -> Option<Company> {
        let key = self.parse_id(id)?;
        self.lock().companies.get(&key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap()
    }

    fn render_id(&self, key: u64) -> Value {
        if self.string_ids {
            Value::String(format!("c-{key}"))
        } else {
            json!(key)
        }
    }

    /// Both `7` and `c-7` are well-formed; anything else is a bad request.
    fn parse_id(&self, id: &CompanyId) -> Option<u64> {
        let token = id.to_string();
        token.strip_prefix("c-").unwrap_or(&token).parse().ok()
    }

    fn validate(&self, company: &Company) -> Result<(), String> {
        if company.cnpj.len() != 14 || !company.cnpj.chars().all(|c| c.is_ascii_digit()) {
            return Err("cnpj must have 14 digits".to_string());
        }
        if self.check_empty_fields {
            for (key, value) in [
                ("name", &company.name),
                ("state", &company.state),
                ("city", &company.city),
                ("address", &company.address),
                ("sector", &company.sector),
            ] {
                if value.is_empty() {
                    return Err(format!("{key} is required"));
                }
            }
        }
        Ok(())
    }

    fn body(&self, key: u64, company: &Company) -> Value {
        let mut body = company.to_json();
        if let Value::Object(fields) = &mut body {
            fields.insert("id".to_string(), self.render_id(key));
            fields.insert("createdAt".to_string(), json!("2024-01-01T00:00:00Z"));
        }
        body
    }
}

fn respond(status: u16, body: Value) -> Result<HttpResponse, ProbeError> {
    Ok(HttpResponse {
        status,
        duration_ms: 0,
        size_bytes: if body.is_null() { 0 } else { body.to_string().len() },
        body,
    })
}

fn error(status: u16, message: &str) -> Result<HttpResponse, ProbeError> {
    respond(status, json!({ "error": message }))
}

#[async_trait]
impl CompanyProbe for FakeCompanyService {
    fn base_url(&self) -> &str {
        "memory://company"
    }

    fn item_url(&self, id: &CompanyId) -> String {
        format!("{}/{}", self.base_url(), id)
    }

    async fn create(&self, company: &Company) -> Result<HttpResponse, ProbeError> {
        if let Err(message) = self.validate(company) {
            return error(400, &message);
        }
        let mut store = self.lock();
        store.next_id += 1;
        let key = store.next_id;
        store.companies.insert(key, company.clone());

        let mut body = self.body(key, company);
        if !self.return_ids {
            if let Value::Object(fields) = &mut body {
                fields.remove("id");
            }
        }
        respond(201, body)
    }

    async fn list(&self) -> Result<HttpResponse, ProbeError> {
        let store = self.lock();
        let items = store
            .companies
            .iter()
            .map(|(key, company)| self.body(*key, company))
            .collect();
        respond(200, Value::Array(items))
    }

    async fn get_by_id(&self, id: &CompanyId) -> Result<HttpResponse, ProbeError> {
        let Some(key) = self.parse_id(id) else {
            return error(400, "invalid id");
        };
        match self.lock().companies.get(&key) {
            Some(company) => respond(200, self.body(key, company)),
            None => error(404, "company not found"),
        }
    }

    async fn update(
        &self,
        id: &CompanyId,
        company: &Company,
    ) -> Result<HttpResponse, ProbeError> {
        let Some(key) = self.parse_id(id) else {
            return error(400, "invalid id");
        };
        if let Err(message) = self.validate(company) {
            return error(400, &message);
        }
        let mut store = self.lock();
        match store.companies.get_mut(&key) {
            Some(existing) => {
                *existing = company.clone();
                respond(200, self.body(key, company))
            }
            None => error(404, "company not found"),
        }
    }

    async fn delete(&self, id: &CompanyId) -> Result<HttpResponse, ProbeError> {
        let Some(key) = self.parse_id(id) else {
            return error(400, "invalid id");
        };
        match self.lock().companies.remove(&key) {
            Some(_) if self.delete_no_content => respond(204, Value::Null),
            Some(_) => respond(200, json!({ "message": "company deleted" })),
            None => error(404, "company not found"),
        }
    }
}
