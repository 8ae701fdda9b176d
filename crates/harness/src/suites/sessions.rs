//! `/sessions` cases

use adminportal_client::api::sessions;
use adminportal_client::cookies::{ACCESS_TOKEN, REFRESH_TOKEN, RETURN};
use adminportal_client::LogoutRequest;
use anyhow::ensure;

use crate::case;
use crate::context::TestContext;
use crate::expect;
use crate::runner::Suite;

pub fn suite() -> Suite {
    Suite::new(
        "sessions",
        vec![
            case!(current_session_success),
            case!(current_session_without_cookies),
            case!(logout_session_success),
            case!(return_session_success),
            case!(return_session_unauthorized),
        ],
    )
}

async fn current_session_success(ctx: &mut TestContext) -> anyhow::Result<()> {
    let response = sessions::current_session(&mut ctx.session).await?;
    expect::status(&response, 200)?;

    let body = expect::json(&response)?;
    let user = body
        .get("user")
        .ok_or_else(|| anyhow::anyhow!("response missing 'user' object: {}", body))?;
    let username = expect::str_field(user, "Username")?;
    ensure!(
        username == ctx.config().dev_username,
        "current user mismatch: expected '{}', got '{}'",
        ctx.config().dev_username,
        username
    );
    ensure!(body.get("companies").is_some(), "response missing 'companies' mapping");
    ensure!(body.get("modules").is_some(), "response missing 'modules' mapping");
    Ok(())
}

async fn current_session_without_cookies(ctx: &mut TestContext) -> anyhow::Result<()> {
    let mut anonymous = ctx.anonymous_session()?;
    let response = sessions::current_session(&mut anonymous).await?;

    expect::status_in(&response, &[401, 400])?;
    if response.status().as_u16() == 400 {
        expect::message_contains(&response, "Username cookies is missing or empty")?;
    }
    Ok(())
}

async fn logout_session_success(ctx: &mut TestContext) -> anyhow::Result<()> {
    let session_id = ctx.session.claims()?.session_id()?;
    let body = LogoutRequest {
        username: ctx.config().dev_username.clone(),
        access_token: ctx.session.cookie(ACCESS_TOKEN).map(ToString::to_string),
        refresh_token: ctx.session.cookie(REFRESH_TOKEN).map(ToString::to_string),
    };

    let response = sessions::logout_session(&mut ctx.session, &session_id, &body).await?;
    expect::status(&response, 200)?;
    expect::message_contains(&response, "Logged out successfully")?;

    ensure!(
        !ctx.session.cookies().contains(ACCESS_TOKEN),
        "access token cookie was not cleared"
    );
    ensure!(
        !ctx.session.cookies().contains(REFRESH_TOKEN),
        "refresh token cookie was not cleared"
    );
    Ok(())
}

async fn return_session_success(ctx: &mut TestContext) -> anyhow::Result<()> {
    let session_id = ctx.session.claims()?.session_id()?;

    let response = sessions::return_session(&mut ctx.session, &session_id).await?;
    expect::status(&response, 200)?;
    expect::message_contains(&response, "Returning, cookies extension completed successfully.")?;

    let returned = ctx.session.cookie(RETURN);
    ensure!(
        returned == Some("true"),
        "return cookie not set to 'true': {:?}",
        returned
    );
    Ok(())
}

async fn return_session_unauthorized(ctx: &mut TestContext) -> anyhow::Result<()> {
    let session_id = ctx.session.claims()?.session_id()?;
    let mut anonymous = ctx.anonymous_session()?;

    let response = sessions::return_session(&mut anonymous, &session_id).await?;
    expect::status(&response, 401)
}
