//! In-memory integration tests for the invitation lifecycle.

use std::sync::Arc;

use chrono::Duration;
use invitations::invitation::{
    adapters::{RandomCodeGenerator, TracingNotifier, memory::InMemoryInvitationRepository},
    domain::{InvitationEventKind, InvitationStatus},
    ports::InvitationRepository,
    services::{
        CreateInvitationRequest, ExpiryPolicy, InvitationConfig, InvitationService,
        ReportedStatus,
    },
};
use mockable::{Clock, DefaultClock};
use rstest::rstest;
use serde_json::json;

use super::helpers::{World, world};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invitation_is_redeemed_by_its_invitee(world: World) -> eyre::Result<()> {
    let expires_at = world.clock.utc() + Duration::days(7);
    let code = world
        .service
        .create(
            CreateInvitationRequest::new("ada@example.com", 11, expires_at).with_before_save(
                |invitation| {
                    invitation.set_attribute("role", json!("editor"));
                },
            ),
        )
        .await?;
    eyre::ensure!(code.as_str().len() == 32, "unexpected code shape {code}");

    world.clock.advance(Duration::days(1));
    let mut handle = world.service.load_by_code(code.as_str()).await?;
    eyre::ensure!(world.service.is_allowed(&mut handle, "ada@example.com").await?);
    eyre::ensure!(world.service.consume(&mut handle).await?);
    eyre::ensure!(world.service.status(&mut handle).await? == ReportedStatus::Invalid);

    let stored = world
        .repository
        .find_by_code(&code)
        .await?
        .ok_or_else(|| eyre::eyre!("invitation missing after consume"))?;
    eyre::ensure!(stored.status() == InvitationStatus::Successful);
    eyre::ensure!(stored.attributes().get("role") == Some(&json!("editor")));
    eyre::ensure!(
        world.notifier.kinds()?
            == vec![InvitationEventKind::Created, InvitationEventKind::Consumed]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn stale_invitation_expires_when_queried(world: World) -> eyre::Result<()> {
    let expires_at = world.clock.utc() + Duration::hours(2);
    let code = world
        .service
        .create(CreateInvitationRequest::new("bo@example.com", 4, expires_at))
        .await?;

    world.clock.advance(Duration::hours(3));
    let mut handle = world.service.load_by_code(code.as_str()).await?;

    eyre::ensure!(!world.service.is_allowed(&mut handle, "bo@example.com").await?);
    eyre::ensure!(world.service.status(&mut handle).await?.as_str() == "Invalid");
    let stored = world
        .repository
        .find_by_code(&code)
        .await?
        .ok_or_else(|| eyre::eyre!("invitation missing after expiry"))?;
    eyre::ensure!(stored.status() == InvitationStatus::Expired);
    eyre::ensure!(stored.valid_until() == expires_at);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn team_invitation_serves_many_invitees(world: World) -> eyre::Result<()> {
    let expires_at = world.clock.utc() + Duration::days(30);
    let code = world
        .service
        .create(
            CreateInvitationRequest::new("team@example.com", 1, expires_at)
                .with_multiple_use(true),
        )
        .await?;

    for _ in 0..5 {
        let mut handle = world.service.require_by_code(code.as_str()).await?;
        eyre::ensure!(world.service.consume(&mut handle).await?);
    }

    let mut handle = world.service.require_by_code(code.as_str()).await?;
    eyre::ensure!(world.service.use_count(&handle) == 5);
    eyre::ensure!(world.service.cancel(&mut handle).await?);
    eyre::ensure!(!world.service.consume(&mut handle).await?);
    eyre::ensure!(world.service.use_count(&handle) == 5);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_creates_yield_distinct_codes(world: World) -> eyre::Result<()> {
    let expires_at = world.clock.utc() + Duration::days(1);
    let mut tasks = Vec::new();
    for referrer_id in 0..16 {
        let service = world.service.clone();
        tasks.push(tokio::spawn(async move {
            service
                .create(CreateInvitationRequest::new(
                    format!("user{referrer_id}@example.com"),
                    referrer_id,
                    expires_at,
                ))
                .await
        }));
    }

    let mut codes = Vec::new();
    for task in tasks {
        codes.push(task.await??);
    }
    codes.sort_by(|left, right| left.as_str().cmp(right.as_str()));
    codes.dedup();

    eyre::ensure!(codes.len() == 16);
    eyre::ensure!(world.repository.len()? == 16);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn tracing_notifier_service_runs_with_loaded_config() -> eyre::Result<()> {
    let config = InvitationConfig::from_json(
        r#"{"max_code_attempts": 2, "expiry_policy": "on_transition"}"#,
    )?;
    eyre::ensure!(config.expiry_policy() == ExpiryPolicy::OnTransition);
    let service = InvitationService::new(
        Arc::new(InMemoryInvitationRepository::new()),
        Arc::new(TracingNotifier),
        Arc::new(RandomCodeGenerator),
        Arc::new(DefaultClock),
    )
    .with_config(config);

    let code = service
        .create(CreateInvitationRequest::new(
            "cy@example.com",
            0,
            chrono::Utc::now() - Duration::minutes(1),
        ))
        .await?;
    let mut handle = service.load_by_code(code.as_str()).await?;

    eyre::ensure!(service.is_expired(&mut handle).await?);
    eyre::ensure!(service.is_expired(&mut handle).await?);
    eyre::ensure!(service.reminder(&handle).await);
    Ok(())
}

#[rstest]
#[case(r#"{"max_code_attempts": 0}"#)]
#[case(r#"{"expiry_policy": "sometimes"}"#)]
#[case(r#"{"retries": 3}"#)]
fn malformed_config_is_rejected(#[case] document: &str) {
    assert!(InvitationConfig::from_json(document).is_err());
}
