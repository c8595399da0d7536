pub mod support;

use std::time::Duration;

use anyhow::Result;
use chrono::{TimeDelta, TimeZone, Utc};

use onboarding_bot::{
    dialogues::{ContentBlock, UserId},
    logic::{
        reminders::ReminderScheduler,
        shifts::{ShiftError, ShiftService, ShiftSummary},
    },
};
use support::RecordingGateway;

#[tokio::test]
async fn check_out_without_check_in_fails() {
    let shifts = ShiftService::new();
    assert_eq!(
        shifts.check_out(UserId(1)).await.unwrap_err(),
        ShiftError::NotStarted
    );
}

#[tokio::test]
async fn double_check_in_fails() -> Result<()> {
    let shifts = ShiftService::new();
    let user = UserId(2);

    shifts.check_in(user).await?;
    assert!(shifts.is_on_shift(user).await);
    assert_eq!(
        shifts.check_in(user).await.unwrap_err(),
        ShiftError::AlreadyStarted
    );
    Ok(())
}

#[tokio::test]
async fn check_out_closes_the_shift() -> Result<()> {
    let shifts = ShiftService::new();
    let user = UserId(3);

    let started_at = shifts.check_in(user).await?;
    let summary = shifts.check_out(user).await?;
    assert_eq!(summary.started_at, started_at);
    assert!(summary.finished_at >= summary.started_at);
    assert!(!shifts.is_on_shift(user).await);

    // A fresh shift can start right away.
    shifts.check_in(user).await?;
    Ok(())
}

#[test]
fn duration_formatting() {
    let started_at = Utc.with_ymd_and_hms(2024, 5, 17, 8, 0, 0).unwrap();
    let summary = ShiftSummary {
        started_at,
        finished_at: started_at + TimeDelta::minutes(95),
    };
    assert_eq!(summary.human_duration(), "1 h 35 min");
}

#[tokio::test]
async fn reminders_rotate_and_stop_after_cancel() -> Result<()> {
    let gateway = RecordingGateway::new();
    let scheduler = ReminderScheduler::with_prompts(
        gateway.clone(),
        Duration::from_millis(20),
        vec!["first".into(), "second".into()],
    );
    let user = UserId(5);

    scheduler.schedule(user);
    tokio::time::sleep(Duration::from_millis(70)).await;
    scheduler.cancel(user);

    let sent = gateway.sent_to(user).await;
    assert!(sent.len() >= 2, "expected at least two prompts, got {}", sent.len());
    assert_eq!(sent[0], ContentBlock::text("first"));
    assert_eq!(sent[1], ContentBlock::text("second"));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(gateway.sent_to(user).await.len(), sent.len());
    Ok(())
}

#[tokio::test]
async fn rescheduling_replaces_the_previous_job() -> Result<()> {
    let gateway = RecordingGateway::new();
    let scheduler = ReminderScheduler::with_prompts(
        gateway.clone(),
        Duration::from_millis(30),
        vec!["ping".into()],
    );
    let user = UserId(6);

    scheduler.schedule(user);
    scheduler.schedule(user);
    tokio::time::sleep(Duration::from_millis(45)).await;
    scheduler.cancel(user);

    // One job, one tick; the replaced job was aborted, not doubled.
    assert_eq!(gateway.sent_to(user).await.len(), 1);
    Ok(())
}
