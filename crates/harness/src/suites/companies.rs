//! `/companies` cases

use adminportal_client::api::companies::update_company;
use adminportal_client::cookies::{CookieOverrides, COMPANY};
use anyhow::{ensure, Context};
use chrono::Utc;

use crate::context::TestContext;
use crate::expect;
use crate::runner::{skip, Suite};
use crate::case;

const UNKNOWN_COMPANY: &str = "NONEXISTENT_XYZ_C4T";

pub fn suite() -> Suite {
    Suite::new(
        "companies",
        vec![
            case!(update_company_success),
            case!(update_company_empty_name),
            case!(update_company_missing_company_cookie),
            case!(update_company_unknown_company),
            case!(update_company_unauthorized),
            case!(update_company_name_conflict),
        ],
    )
}

async fn update_company_success(ctx: &mut TestContext) -> anyhow::Result<()> {
    let company = ctx.config().dev_company.clone();
    let original_name = ctx.config().dev_company_name.clone();
    let temp_name = format!(
        "{}_TEMP_{}",
        original_name,
        Utc::now().timestamp_subsec_nanos() % 1000
    );
    let before = ctx.session.cookies().company_mapping()?.unwrap_or_default();

    ctx.restore_company_name_on_teardown(&company, &original_name);
    let response = update_company(&mut ctx.session, &temp_name, &CookieOverrides::new()).await?;

    expect::status(&response, 200)?;
    expect::message_contains_ignore_case(&response, "success")?;

    let after = ctx
        .session
        .cookies()
        .company_mapping()?
        .context("company_mapping cookie not found after update")?;
    ensure!(
        after.get(&company) == Some(&temp_name),
        "company mapping for '{}' not updated: expected '{}', got {:?}",
        company,
        temp_name,
        after.get(&company)
    );
    for (key, name) in before.iter().filter(|(key, _)| **key != company) {
        ensure!(
            after.get(key) == Some(name),
            "rename touched mapping of unrelated company '{}'",
            key
        );
    }
    Ok(())
}

async fn update_company_empty_name(ctx: &mut TestContext) -> anyhow::Result<()> {
    let response = update_company(&mut ctx.session, "", &CookieOverrides::new()).await?;
    expect::status(&response, 405)
}

async fn update_company_missing_company_cookie(ctx: &mut TestContext) -> anyhow::Result<()> {
    let overrides = CookieOverrides::new().omit(COMPANY);
    let response = update_company(&mut ctx.session, "SomeNewNameForMissingCookieTest", &overrides).await?;

    expect::status(&response, 400)?;
    expect::message_contains(&response, "Current company name was not found in cookies.")
}

async fn update_company_unknown_company(ctx: &mut TestContext) -> anyhow::Result<()> {
    let overrides = CookieOverrides::new().replace(COMPANY, UNKNOWN_COMPANY);
    let response = update_company(&mut ctx.session, "ValidNewNameForNonExistentTest", &overrides).await?;

    expect::status(&response, 404)?;
    expect::message_contains(
        &response,
        &format!("Company with name '{}' not found.", UNKNOWN_COMPANY),
    )
}

async fn update_company_unauthorized(ctx: &mut TestContext) -> anyhow::Result<()> {
    let mut anonymous = ctx.anonymous_session()?;
    anonymous
        .cookies_mut()
        .set(COMPANY, ctx.config().dev_company.as_str());

    let response = update_company(&mut anonymous, "AnotherNewNameUnauthorized", &CookieOverrides::new()).await?;
    expect::status(&response, 401)
}

async fn update_company_name_conflict(ctx: &mut TestContext) -> anyhow::Result<()> {
    let Some(conflicting_name) = ctx.config().conflict_company.clone() else {
        return Err(skip("API_TEST_CONFLICT_COMPANY not set"));
    };
    let company = ctx.config().dev_company.clone();
    let original_name = ctx.config().dev_company_name.clone();

    ctx.restore_company_name_on_teardown(&company, &original_name);
    let response = update_company(&mut ctx.session, &conflicting_name, &CookieOverrides::new()).await?;

    expect::status(&response, 409)?;
    expect::message_contains(&response, "Company name already exists")
}
