//! Given steps for invitation lifecycle BDD scenarios.

use super::world::{InvitationWorld, require_handle, run_async};
use chrono::{Duration, Utc};
use eyre::WrapErr;
use invitations::invitation::services::CreateInvitationRequest;
use rstest_bdd_macros::given;

fn issue(
    world: &mut InvitationWorld,
    request: CreateInvitationRequest,
) -> Result<(), eyre::Report> {
    let code = run_async(world.service.create(request)).wrap_err("create invitation")?;
    let handle =
        run_async(world.service.load_by_code(code.as_str())).wrap_err("load invitation")?;
    world.handle = Some(handle);
    Ok(())
}

#[given(r#"an invitation for "{email}" from referrer {referrer:i64} expiring in {minutes:i64} minutes"#)]
fn invitation_expiring_in(
    world: &mut InvitationWorld,
    email: String,
    referrer: i64,
    minutes: i64,
) -> Result<(), eyre::Report> {
    let expires_at = Utc::now() + Duration::minutes(minutes);
    issue(world, CreateInvitationRequest::new(email, referrer, expires_at))
}

#[given(
    r#"a multiple-use invitation for "{email}" from referrer {referrer:i64} expiring in {minutes:i64} minutes"#
)]
fn multiple_use_invitation_expiring_in(
    world: &mut InvitationWorld,
    email: String,
    referrer: i64,
    minutes: i64,
) -> Result<(), eyre::Report> {
    let expires_at = Utc::now() + Duration::minutes(minutes);
    issue(
        world,
        CreateInvitationRequest::new(email, referrer, expires_at).with_multiple_use(true),
    )
}

#[given(r#"an invitation for "{email}" from referrer {referrer:i64} that expired {minutes:i64} minutes ago"#)]
fn invitation_expired_ago(
    world: &mut InvitationWorld,
    email: String,
    referrer: i64,
    minutes: i64,
) -> Result<(), eyre::Report> {
    let expires_at = Utc::now() - Duration::minutes(minutes);
    issue(world, CreateInvitationRequest::new(email, referrer, expires_at))
}

#[given("the invitation has been consumed")]
fn invitation_has_been_consumed(world: &mut InvitationWorld) -> Result<(), eyre::Report> {
    let handle = require_handle(&mut world.handle)?;
    let consumed =
        run_async(world.service.consume(handle)).wrap_err("consume invitation in setup")?;
    eyre::ensure!(consumed, "setup consumption was rejected");
    Ok(())
}

#[given(r#"the unknown invitation code "{code}""#)]
fn unknown_invitation_code(world: &mut InvitationWorld, code: String) -> Result<(), eyre::Report> {
    let handle = run_async(world.service.load_by_code(&code)).wrap_err("load unknown code")?;
    world.handle = Some(handle);
    Ok(())
}
