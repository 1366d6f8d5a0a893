use serde_json::Value;
use tracing::debug;

use crate::error::{AssertionFailure, ScenarioError};
use crate::fixtures::{CompanyId, Field, MALFORMED_CNPJ};
use crate::testing::{expect_field, expect_json_like, expect_status, expect_status_in};

use super::{CreatedCompany, Lifecycle, ScenarioContext};

const CREATED: u16 = 201;
const OK: u16 = 200;
const NO_CONTENT: u16 = 204;
const BAD_REQUEST: u16 = 400;
const NOT_FOUND: u16 = 404;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioKind {
    CreateValid,
    CreateMalformedCnpj,
    ListContainsCreated,
    ReadCreated,
    ReadNonexistent,
    UpdateCreated,
    UpdateNonexistent,
    UpdateWithInvalidPayload,
    DeleteCreated,
    ReadDeleted,
    CreateWithEmpty(Field),
    UpdateInvalidIdToken,
}

/// Execution order. Entries 3, 4, 6, 8, 9 need the id from entry 1 and
/// entry 10 needs entry 9 to have deleted it.
pub const CATALOG: [ScenarioKind; 15] = [
    ScenarioKind::CreateValid,
    ScenarioKind::CreateMalformedCnpj,
    ScenarioKind::ListContainsCreated,
    ScenarioKind::ReadCreated,
    ScenarioKind::ReadNonexistent,
    ScenarioKind::UpdateCreated,
    ScenarioKind::UpdateNonexistent,
    ScenarioKind::UpdateWithInvalidPayload,
    ScenarioKind::DeleteCreated,
    ScenarioKind::ReadDeleted,
    ScenarioKind::CreateWithEmpty(Field::Name),
    ScenarioKind::CreateWithEmpty(Field::State),
    ScenarioKind::CreateWithEmpty(Field::City),
    ScenarioKind::CreateWithEmpty(Field::Address),
    ScenarioKind::UpdateInvalidIdToken,
];

impl ScenarioKind {
    pub fn name(self) -> &'static str {
        match self {
            ScenarioKind::CreateValid => "POST /company - successful creation",
            ScenarioKind::CreateMalformedCnpj => "POST /company - rejects malformed cnpj",
            ScenarioKind::ListContainsCreated => "GET /company - lists the created company",
            ScenarioKind::ReadCreated => "GET /company/:id - reads the created company",
            ScenarioKind::ReadNonexistent => "GET /company/:id - unknown id is not found",
            ScenarioKind::UpdateCreated => "PUT /company/:id - updates the created company",
            ScenarioKind::UpdateNonexistent => "PUT /company/:id - unknown id is not found",
            ScenarioKind::UpdateWithInvalidPayload => "PUT /company/:id - rejects empty name",
            ScenarioKind::DeleteCreated => "DELETE /company/:id - deletes the created company",
            ScenarioKind::ReadDeleted => "GET /company/:id - deleted company is not found",
            ScenarioKind::CreateWithEmpty(Field::Name) => "POST /company - rejects empty name",
            ScenarioKind::CreateWithEmpty(Field::State) => "POST /company - rejects empty state",
            ScenarioKind::CreateWithEmpty(Field::City) => "POST /company - rejects empty city",
            ScenarioKind::CreateWithEmpty(Field::Address) => {
                "POST /company - rejects empty address"
            }
            ScenarioKind::CreateWithEmpty(Field::Cnpj) => "POST /company - rejects empty cnpj",
            ScenarioKind::CreateWithEmpty(Field::Sector) => "POST /company - rejects empty sector",
            ScenarioKind::UpdateInvalidIdToken => "PUT /company/:id - rejects malformed id",
        }
    }

    pub async fn run(self, ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
        match self {
            ScenarioKind::CreateValid => create_valid(ctx).await,
            ScenarioKind::CreateMalformedCnpj => create_malformed_cnpj(ctx).await,
            ScenarioKind::ListContainsCreated => list_contains_created(ctx).await,
            ScenarioKind::ReadCreated => read_created(ctx).await,
            ScenarioKind::ReadNonexistent => read_nonexistent(ctx).await,
            ScenarioKind::UpdateCreated => update_created(ctx).await,
            ScenarioKind::UpdateNonexistent => update_nonexistent(ctx).await,
            ScenarioKind::UpdateWithInvalidPayload => update_with_invalid_payload(ctx).await,
            ScenarioKind::DeleteCreated => delete_created(ctx).await,
            ScenarioKind::ReadDeleted => read_deleted(ctx).await,
            ScenarioKind::CreateWithEmpty(field) => create_with_empty(ctx, field).await,
            ScenarioKind::UpdateInvalidIdToken => update_invalid_id_token(ctx).await,
        }
    }
}

async fn create_valid(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let company = ctx.fixtures.valid_company();
    let response = ctx.create(&company).await?;
    expect_status(&response, CREATED)?;

    let id = CompanyId::from_response(&response.body).ok_or_else(|| {
        AssertionFailure::MissingId {
            body: response.body.clone(),
        }
    })?;
    debug!(id = %id, "captured company id");
    ctx.state.created = Some(CreatedCompany {
        id,
        fixture: company.clone(),
    });
    ctx.state.lifecycle = Lifecycle::Created;

    expect_field(&response, "name", &Value::String(company.name))?;
    Ok(())
}

async fn create_malformed_cnpj(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let company = ctx
        .fixtures
        .valid_company()
        .with(Field::Cnpj, MALFORMED_CNPJ);
    let response = ctx.create(&company).await?;
    expect_status(&response, BAD_REQUEST)?;
    Ok(())
}

async fn list_contains_created(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let created = ctx.state.require_created()?.clone();
    let mut entry = created.fixture.to_json();
    if let Value::Object(fields) = &mut entry {
        fields.insert("id".to_string(), created.id.as_json().clone());
    }

    let response = ctx.list().await?;
    expect_status(&response, OK)?;
    expect_json_like(&response, &Value::Array(vec![entry]))?;
    Ok(())
}

async fn read_created(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let created = ctx.state.require_created()?.clone();
    let response = ctx.get_by_id(&created.id).await?;
    expect_status(&response, OK)?;
    expect_json_like(
        &response,
        &serde_json::json!({
            "id": created.id.as_json(),
            "name": created.fixture.name,
        }),
    )?;
    Ok(())
}

async fn read_nonexistent(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = CompanyId::from_token(ctx.settings.nonexistent_id.clone());
    let response = ctx.get_by_id(&id).await?;
    expect_status(&response, NOT_FOUND)?;
    Ok(())
}

async fn update_created(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let created = ctx.state.require_created()?.clone();
    let new_name = ctx.fixtures.company_name();
    let updated = created.fixture.with(Field::Name, new_name.clone());

    let response = ctx.update(&created.id, &updated).await?;
    expect_status(&response, OK)?;

    // The service accepted the update, so track what it now holds.
    ctx.state.created = Some(CreatedCompany {
        id: created.id.clone(),
        fixture: updated,
    });
    ctx.state.lifecycle = Lifecycle::Updated;

    expect_field(&response, "id", created.id.as_json())?;
    expect_field(&response, "name", &Value::String(new_name))?;
    Ok(())
}

async fn update_nonexistent(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = CompanyId::from_token(ctx.settings.nonexistent_id.clone());
    let company = ctx.fixtures.valid_company();
    let response = ctx.update(&id, &company).await?;
    expect_status(&response, NOT_FOUND)?;
    Ok(())
}

async fn update_with_invalid_payload(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = ctx.state.require_created()?.id.clone();
    let company = ctx.fixtures.invalid_reference();
    let response = ctx.update(&id, &company).await?;
    expect_status(&response, BAD_REQUEST)?;
    Ok(())
}

async fn delete_created(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = ctx.state.require_created()?.id.clone();
    let response = ctx.delete(&id).await?;
    expect_status_in(&response, &[OK, NO_CONTENT])?;
    ctx.state.lifecycle = Lifecycle::Deleted;
    Ok(())
}

async fn read_deleted(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = ctx.state.require_created()?.id.clone();
    if ctx.state.lifecycle != Lifecycle::Deleted {
        return Err(ScenarioError::MissingState(
            "the created company was not deleted",
        ));
    }
    let response = ctx.get_by_id(&id).await?;
    expect_status(&response, NOT_FOUND)?;
    Ok(())
}

async fn create_with_empty(
    ctx: &mut ScenarioContext<'_>,
    field: Field,
) -> Result<(), ScenarioError> {
    let company = ctx.fixtures.valid_company().with(field, "");
    let response = ctx.create(&company).await?;
    expect_status(&response, BAD_REQUEST)?;
    Ok(())
}

async fn update_invalid_id_token(ctx: &mut ScenarioContext<'_>) -> Result<(), ScenarioError> {
    let id = CompanyId::from_token(ctx.settings.invalid_id_token.clone());
    let company = ctx.fixtures.valid_company();
    let response = ctx.update(&id, &company).await?;
    expect_status(&response, BAD_REQUEST)?;
    Ok(())
}
