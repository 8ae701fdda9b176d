//! `/users` cases

use adminportal_client::api::users;
use adminportal_client::UserRecord;
use anyhow::ensure;
use uuid::Uuid;

use crate::case;
use crate::context::TestContext;
use crate::expect;
use crate::runner::Suite;

pub fn suite() -> Suite {
    Suite::new(
        "users",
        vec![
            case!(create_user_success),
            case!(create_user_duplicate_username),
            case!(create_user_invalid_data),
            case!(get_user_success),
            case!(get_user_not_found),
            case!(update_user_success),
            case!(update_user_not_found),
            case!(update_user_username_conflict),
            case!(delete_user_success),
            case!(delete_user_not_found),
            case!(delete_current_user_conflict),
            case!(unauthorized_access),
        ],
    )
}

fn not_found_message(username: &str) -> String {
    format!("User with username '{}' not found.", username)
}

fn missing_username(prefix: &str) -> String {
    format!("{}_{}", prefix, &Uuid::new_v4().simple().to_string()[..8])
}

/// Create `record` and fail the case unless the backend answers 201.
async fn create_fixture_user(ctx: &mut TestContext, record: &UserRecord) -> anyhow::Result<()> {
    let response = ctx.create_and_track_user(record).await?;
    expect::status(&response, 201)
}

async fn create_user_success(ctx: &mut TestContext) -> anyhow::Result<()> {
    let record = ctx.unique_user("newuser");
    let response = ctx.create_and_track_user(&record).await?;
    expect::status(&response, 201)?;

    let created: UserRecord = response.parse()?;
    ensure!(created.username == record.username, "created user username mismatch");
    ensure!(created.powerunit == record.powerunit, "created user powerunit mismatch");
    ensure!(
        created.active_company == record.active_company,
        "created user ActiveCompany mismatch: {:?}",
        created.active_company
    );
    expect::same_set("Companies", created.companies.as_slice(), record.companies.as_slice())?;
    expect::same_set("Modules", created.modules.as_slice(), record.modules.as_slice())
}

async fn create_user_duplicate_username(ctx: &mut TestContext) -> anyhow::Result<()> {
    let record = ctx.unique_user("duplicate");
    create_fixture_user(ctx, &record).await?;

    let response = ctx.create_and_track_user(&record).await?;
    expect::status(&response, 409)?;
    expect::message_contains(&response, "Username is already in use")
}

async fn create_user_invalid_data(ctx: &mut TestContext) -> anyhow::Result<()> {
    let mut record = ctx.unique_user("invalid");
    record.username = String::new();
    record.password = Some("pw".to_string());

    let response = ctx.create_and_track_user(&record).await?;
    expect::status(&response, 400)?;
    expect::body_contains(&response, "required.")
}

async fn get_user_success(ctx: &mut TestContext) -> anyhow::Result<()> {
    let record = ctx.unique_user("gettest");
    create_fixture_user(ctx, &record).await?;

    let response = users::get_user(&mut ctx.session, &record.username).await?;
    expect::status(&response, 200)?;

    let fetched: UserRecord = response.parse()?;
    ensure!(fetched.username == record.username, "fetched username mismatch");
    ensure!(fetched.powerunit == record.powerunit, "fetched powerunit mismatch");
    Ok(())
}

async fn get_user_not_found(ctx: &mut TestContext) -> anyhow::Result<()> {
    let username = missing_username("nonexistent_user");
    let response = users::get_user(&mut ctx.session, &username).await?;

    expect::status(&response, 404)?;
    expect::body_contains(&response, &not_found_message(&username))
}

async fn update_user_success(ctx: &mut TestContext) -> anyhow::Result<()> {
    let record = ctx.unique_user("updatetest");
    create_fixture_user(ctx, &record).await?;

    let unique_id = Uuid::new_v4().simple().to_string();
    let suffix = &unique_id[..8];
    let mut updated = record.clone();
    updated.username = format!("{}_{}", record.username, suffix);
    updated.powerunit = suffix[..3].to_string();
    updated.companies.push("TCS".to_string());
    updated.modules.retain(|module| module != "admin");

    let response = ctx.update_and_track_user(&record.username, &updated).await?;
    expect::status(&response, 200)?;

    let body = expect::json(&response)?;
    ensure!(body.is_object(), "update response is not an object: {}", body);
    for key in ["Username", "Password", "Powerunit"] {
        expect::str_field(&body, key)?;
    }
    for key in ["Companies", "Modules"] {
        expect::array_field(&body, key)?;
    }

    let response = users::get_user(&mut ctx.session, &updated.username).await?;
    expect::status(&response, 200)?;
    let fetched: UserRecord = response.parse()?;
    ensure!(fetched.username == updated.username, "username not updated");
    ensure!(fetched.powerunit == updated.powerunit, "powerunit not updated");
    ensure!(
        fetched.companies.iter().any(|c| c == "TCS"),
        "updated companies missing TCS: {:?}",
        fetched.companies
    );
    ensure!(
        !fetched.modules.iter().any(|m| m == "admin"),
        "updated modules still contain admin: {:?}",
        fetched.modules
    );
    Ok(())
}

async fn update_user_not_found(ctx: &mut TestContext) -> anyhow::Result<()> {
    let username = missing_username("nonexistent_user_for_update");
    let record = ctx.unique_user(&username);

    let response = ctx.update_and_track_user(&username, &record).await?;
    expect::status(&response, 404)?;
    expect::body_contains(&response, &not_found_message(&username))
}

async fn update_user_username_conflict(ctx: &mut TestContext) -> anyhow::Result<()> {
    let to_update = ctx.unique_user("update_this");
    let mut conflicting = ctx.unique_user("conflict_with_this");
    while conflicting.powerunit == to_update.powerunit {
        conflicting = ctx.unique_user("conflict_with_this");
    }
    create_fixture_user(ctx, &to_update).await?;
    create_fixture_user(ctx, &conflicting).await?;

    let mut renamed = to_update.clone();
    renamed.username = conflicting.username.clone();
    let response = ctx.update_and_track_user(&to_update.username, &renamed).await?;
    let checked = expect::status(&response, 409)
        .and_then(|()| expect::message_contains(&response, "Username is already in use"));

    ctx.delete_and_untrack_user(&to_update.username, true).await?;
    ctx.delete_and_untrack_user(&conflicting.username, true).await?;
    checked
}

async fn delete_user_success(ctx: &mut TestContext) -> anyhow::Result<()> {
    let record = ctx.unique_user("deletetest");
    create_fixture_user(ctx, &record).await?;

    let response = ctx.delete_and_untrack_user(&record.username, false).await?;
    expect::status(&response, 204)?;

    let response = users::get_user(&mut ctx.session, &record.username).await?;
    expect::status(&response, 404)
}

async fn delete_user_not_found(ctx: &mut TestContext) -> anyhow::Result<()> {
    let username = missing_username("nonexistent_user_for_delete");
    let response = ctx.delete_and_untrack_user(&username, true).await?;

    expect::status(&response, 404)?;
    expect::body_contains(&response, &not_found_message(&username))
}

async fn delete_current_user_conflict(ctx: &mut TestContext) -> anyhow::Result<()> {
    let username = ctx.config().dev_username.clone();
    let response = ctx.delete_and_untrack_user(&username, true).await?;

    expect::status(&response, 409)?;
    expect::message_contains(&response, "cannot be deleted while in use")
}

async fn unauthorized_access(ctx: &mut TestContext) -> anyhow::Result<()> {
    let mut anonymous = ctx.anonymous_session()?;
    let response = users::get_user(&mut anonymous, &ctx.config().dev_username).await?;
    expect::status(&response, 401)
}
