//! # Company Fixtures
//!
//! Builds Company payloads with plausible random values, plus variants with a
//! single field overridden. A builder can be seeded so a run is reproducible.

use std::fmt::{self, Display};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A cnpj the service must reject for being too short.
pub const MALFORMED_CNPJ: &str = "123";

const CNPJ_MIN: u64 = 10_000_000_000_000;
const CNPJ_MAX: u64 = 99_999_999_999_999;

const NAME_PREFIXES: &[&str] = &[
    "Acme", "Vertex", "Nova", "Atlas", "Horizon", "Pioneer", "Summit", "Aurora", "Granite",
    "Blue River", "Silverline", "Northwind", "Redwood", "Bright", "Cobalt",
];
const NAME_CORES: &[&str] = &[
    "Logistics", "Foods", "Systems", "Textiles", "Energy", "Holdings", "Labs", "Motors",
    "Consulting", "Industries", "Partners", "Digital",
];
const NAME_SUFFIXES: &[&str] = &["Ltd", "LLC", "Inc", "Group", "S.A.", "and Sons", "Co"];

const STATES: &[&str] = &[
    "AC", "AL", "AP", "AM", "BA", "CE", "DF", "ES", "GO", "MA", "MT", "MS", "MG", "PA", "PB",
    "PR", "PE", "PI", "RJ", "RN", "RS", "RO", "RR", "SC", "SP", "SE", "TO",
];
const CITIES: &[&str] = &[
    "Criciuma", "Florianopolis", "Joinville", "Curitiba", "Porto Alegre", "Sao Paulo",
    "Campinas", "Belo Horizonte", "Recife", "Salvador", "Fortaleza", "Manaus", "Goiania",
];
const STREETS: &[&str] = &[
    "Rua Pedro", "Avenida Brasil", "Rua das Flores", "Rua XV de Novembro", "Avenida Paulista",
    "Rua Sete de Setembro", "Travessa do Comercio", "Alameda Santos",
];
const DEPARTMENTS: &[&str] = &[
    "Retail", "Electronics", "Grocery", "Automotive", "Books", "Clothing", "Health", "Home",
    "Garden", "Sports", "Toys", "Industrial", "Beauty", "Music",
];

/// The Company resource as submitted to the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
    pub cnpj: String,
    pub state: String,
    pub city: String,
    pub address: String,
    pub sector: String,
}

/// Payload keys of [`Company`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Cnpj,
    State,
    City,
    Address,
    #[cfg_attr(not(test), allow(dead_code))]
    Sector,
}

impl Company {
    /// A copy of this record with one field replaced.
    pub fn with(&self, field: Field, value: impl Into<String>) -> Company {
        let mut company = self.clone();
        let value = value.into();
        match field {
            Field::Name => company.name = value,
            Field::Cnpj => company.cnpj = value,
            Field::State => company.state = value,
            Field::City => company.city = value,
            Field::Address => company.address = value,
            Field::Sector => company.sector = value,
        }
        company
    }

    pub fn to_json(&self) -> Value {
        // Six string fields; serialization cannot fail.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Server-assigned identifier. Opaque: may come back as a number or a string.
#[derive(Debug, Clone, PartialEq)]
pub struct CompanyId(Value);

impl CompanyId {
    /// Extract the `id` key of a response body.
    pub fn from_response(body: &Value) -> Option<CompanyId> {
        match body.get("id") {
            None | Some(Value::Null) => None,
            Some(id) => Some(CompanyId(id.clone())),
        }
    }

    /// An id known only as a path token, e.g. a sentinel that must not exist.
    pub fn from_token(token: impl Into<String>) -> CompanyId {
        CompanyId(Value::String(token.into()))
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

impl Display for CompanyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(token) => write!(f, "{token}"),
            other => write!(f, "{other}"),
        }
    }
}

/// Random Company generator.
pub struct FixtureBuilder {
    rng: StdRng,
}

impl FixtureBuilder {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Same seed, same sequence of fixtures.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn valid_company(&mut self) -> Company {
        Company {
            name: self.company_name(),
            cnpj: self.cnpj(),
            state: self.pick(STATES),
            city: self.pick(CITIES),
            address: self.street_address(),
            sector: self.pick(DEPARTMENTS),
        }
    }

    /// The fixed invalid update payload: empty name, everything else well-formed.
    pub fn invalid_reference(&mut self) -> Company {
        Company {
            name: String::new(),
            cnpj: self.cnpj(),
            state: "SC".to_string(),
            city: "Criciuma".to_string(),
            address: "Rua Pedro, 123".to_string(),
            sector: self.pick(DEPARTMENTS),
        }
    }

    pub fn company_name(&mut self) -> String {
        let prefix = self.pick(NAME_PREFIXES);
        let core = self.pick(NAME_CORES);
        let suffix = self.pick(NAME_SUFFIXES);
        format!("{prefix} {core} {suffix}")
    }

    pub fn cnpj(&mut self) -> String {
        self.rng.gen_range(CNPJ_MIN..=CNPJ_MAX).to_string()
    }

    fn street_address(&mut self) -> String {
        let street = self.pick(STREETS);
        let number: u16 = self.rng.gen_range(1..=9999);
        format!("{street}, {number}")
    }

    fn pick(&mut self, choices: &[&str]) -> String {
        choices
            .choose(&mut self.rng)
            .map(|choice| choice.to_string())
            .unwrap_or_default()
    }
}

impl Default for FixtureBuilder {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_company_has_every_field_filled() {
        let mut builder = FixtureBuilder::seeded(7);
        for _ in 0..50 {
            let company = builder.valid_company();
            assert!(!company.name.is_empty());
            assert!(!company.state.is_empty());
            assert!(!company.city.is_empty());
            assert!(!company.address.is_empty());
            assert!(!company.sector.is_empty());
            assert_eq!(company.cnpj.len(), 14);
            assert!(company.cnpj.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn same_seed_reproduces_fixtures() {
        let mut a = FixtureBuilder::seeded(42);
        let mut b = FixtureBuilder::seeded(42);
        assert_eq!(a.valid_company(), b.valid_company());
        assert_eq!(a.company_name(), b.company_name());
    }

    #[test]
    fn with_returns_new_record() {
        let mut builder = FixtureBuilder::seeded(1);
        let original = builder.valid_company();
        let emptied = original.with(Field::City, "");
        assert_eq!(emptied.city, "");
        assert!(!original.city.is_empty());
        assert_eq!(emptied.name, original.name);
    }

    #[test]
    fn with_covers_every_field() {
        let original = FixtureBuilder::seeded(5).valid_company();
        for field in [
            Field::Name,
            Field::Cnpj,
            Field::State,
            Field::City,
            Field::Address,
            Field::Sector,
        ] {
            let changed = original.with(field, "x");
            let payload = changed.to_json();
            let changed_keys = payload
                .as_object()
                .unwrap()
                .values()
                .filter(|value| *value == "x")
                .count();
            assert_eq!(changed_keys, 1, "{field:?}");
        }
        assert_eq!(original.with(Field::Sector, "Music").sector, "Music");
    }

    #[test]
    fn invalid_reference_only_breaks_the_name() {
        let company = FixtureBuilder::seeded(3).invalid_reference();
        assert_eq!(company.name, "");
        assert_eq!(company.state, "SC");
        assert_eq!(company.city, "Criciuma");
        assert_eq!(company.address, "Rua Pedro, 123");
        assert_eq!(company.cnpj.len(), 14);
    }

    #[test]
    fn payload_uses_contract_keys() {
        let company = Company {
            name: "Acme Ltd".into(),
            cnpj: "12345678901234".into(),
            state: "SC".into(),
            city: "Criciuma".into(),
            address: "Rua Pedro, 123".into(),
            sector: "Retail".into(),
        };
        assert_eq!(
            company.to_json(),
            json!({
                "name": "Acme Ltd",
                "cnpj": "12345678901234",
                "state": "SC",
                "city": "Criciuma",
                "address": "Rua Pedro, 123",
                "sector": "Retail"
            })
        );
    }

    #[test]
    fn company_id_is_opaque() {
        let numeric = CompanyId::from_response(&json!({"id": 17})).unwrap();
        assert_eq!(numeric.to_string(), "17");

        let textual = CompanyId::from_response(&json!({"id": "abc-1"})).unwrap();
        assert_eq!(textual.to_string(), "abc-1");

        assert!(CompanyId::from_response(&json!({"id": null})).is_none());
        assert!(CompanyId::from_response(&json!({"name": "x"})).is_none());
        assert!(CompanyId::from_response(&json!([])).is_none());
    }
}
