pub mod support;

use anyhow::Result;
use onboarding_bot::dialogues::{
    engine::{AdvanceResult, EngineError, FlowEngine},
    script::{Choice, FlowScript, Next},
    session::CapturedAnswer,
    ContentBlock, FlowEvent, UserId,
};

use support::{sample_script, MemorySink, RecordingGateway};

fn build_engine(
    script: FlowScript,
    gateway: &RecordingGateway,
    sink: &MemorySink,
) -> FlowEngine<RecordingGateway, MemorySink> {
    FlowEngine::new(script, gateway.clone(), sink.clone())
}

#[tokio::test]
async fn scripted_path_reaches_terminal_and_captures_answers() -> Result<()> {
    let gateway = RecordingGateway::new();
    let sink = MemorySink::new();
    let engine = build_engine(sample_script(), &gateway, &sink);
    let user = UserId(1);

    assert_eq!(
        engine.handle(user, FlowEvent::Start).await?,
        AdvanceResult::Continue
    );
    assert_eq!(
        engine.handle(user, FlowEvent::Choice("agree".into())).await?,
        AdvanceResult::Continue
    );
    assert_eq!(
        engine.handle(user, FlowEvent::Text("Maria".into())).await?,
        AdvanceResult::Continue
    );

    let result = engine.handle(user, FlowEvent::Text("yes".into())).await?;
    let AdvanceResult::Completed(record) = result else {
        panic!("expected completion, got {result:?}");
    };
    assert_eq!(
        record.answers,
        vec![
            CapturedAnswer {
                prompt: "What is your name?".into(),
                answer: "Maria".into(),
            },
            CapturedAnswer {
                prompt: "Do you know X? (yes/no)".into(),
                answer: "yes".into(),
            },
        ]
    );

    let records = sink.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0], record);

    // The farewell interpolates the captured name.
    let sent = gateway.sent_to(user).await;
    assert_eq!(sent.last(), Some(&ContentBlock::text("Thanks, Maria!")));

    // The session is gone once flushed.
    assert_eq!(
        engine.handle(user, FlowEvent::Text("hello?".into())).await?,
        AdvanceResult::NotActive
    );
    Ok(())
}

#[tokio::test]
async fn unknown_choice_token_is_rejected_without_state_change() -> Result<()> {
    let gateway = RecordingGateway::new();
    let sink = MemorySink::new();
    let engine = build_engine(sample_script(), &gateway, &sink);
    let user = UserId(2);

    engine.handle(user, FlowEvent::Start).await?;
    gateway.clear().await;

    assert_eq!(
        engine.handle(user, FlowEvent::Choice("maybe".into())).await?,
        AdvanceResult::Rejected
    );
    // The welcome step is re-emitted, choices included.
    let sent = gateway.sent_to(user).await;
    assert_eq!(sent.len(), 1);
    assert!(matches!(
        &sent[0],
        ContentBlock::TextWithChoices { text, .. } if text == "Welcome"
    ));
    assert!(sink.records().await.is_empty());

    // Free text at a choice step is equally rejected.
    assert_eq!(
        engine.handle(user, FlowEvent::Text("agree".into())).await?,
        AdvanceResult::Rejected
    );

    // The step did not move: the valid token still works.
    assert_eq!(
        engine.handle(user, FlowEvent::Choice("agree".into())).await?,
        AdvanceResult::Continue
    );
    Ok(())
}

#[tokio::test]
async fn empty_answer_reprompts_without_capture() -> Result<()> {
    let gateway = RecordingGateway::new();
    let sink = MemorySink::new();
    let engine = build_engine(sample_script(), &gateway, &sink);
    let user = UserId(3);

    engine.handle(user, FlowEvent::Start).await?;
    engine.handle(user, FlowEvent::Choice("agree".into())).await?;
    gateway.clear().await;

    assert_eq!(
        engine.handle(user, FlowEvent::Text("   ".into())).await?,
        AdvanceResult::Rejected
    );
    assert_eq!(
        engine.handle(user, FlowEvent::Choice("agree".into())).await?,
        AdvanceResult::Rejected
    );
    let sent = gateway.sent_to(user).await;
    assert_eq!(
        sent,
        vec![
            ContentBlock::text("What is your name?"),
            ContentBlock::text("What is your name?"),
        ]
    );

    assert_eq!(
        engine.handle(user, FlowEvent::Text("Maria".into())).await?,
        AdvanceResult::Continue
    );
    Ok(())
}

#[tokio::test]
async fn cancel_session_for_unknown_user_is_noop() -> Result<()> {
    let gateway = RecordingGateway::new();
    let sink = MemorySink::new();
    let engine = build_engine(sample_script(), &gateway, &sink);

    engine.cancel_session(UserId(42)).await;
    assert!(gateway.sent().await.is_empty());
    assert!(sink.records().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn sessions_for_different_users_are_isolated() -> Result<()> {
    let gateway = RecordingGateway::new();
    let sink = MemorySink::new();
    let engine = build_engine(sample_script(), &gateway, &sink);
    let alice = UserId(10);
    let bob = UserId(11);

    engine.handle(alice, FlowEvent::Start).await?;
    engine.handle(bob, FlowEvent::Start).await?;

    engine.handle(alice, FlowEvent::Choice("agree".into())).await?;
    engine.handle(alice, FlowEvent::Text("Alice".into())).await?;

    // Bob is still at the welcome step.
    assert_eq!(
        engine.handle(bob, FlowEvent::Text("Bob".into())).await?,
        AdvanceResult::Rejected
    );

    let result = engine.handle(alice, FlowEvent::Text("yes".into())).await?;
    let AdvanceResult::Completed(record) = result else {
        panic!("expected completion, got {result:?}");
    };
    assert_eq!(record.user_id, alice);
    assert_eq!(record.answers[0].answer, "Alice");

    // Alice's completion did not touch Bob's session.
    assert_eq!(
        engine.handle(bob, FlowEvent::Choice("agree".into())).await?,
        AdvanceResult::Continue
    );
    assert_eq!(sink.records().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn start_mid_flow_restarts_the_session() -> Result<()> {
    let gateway = RecordingGateway::new();
    let sink = MemorySink::new();
    let engine = build_engine(sample_script(), &gateway, &sink);
    let user = UserId(20);

    engine.handle(user, FlowEvent::Start).await?;
    engine.handle(user, FlowEvent::Choice("agree".into())).await?;
    engine.handle(user, FlowEvent::Text("First attempt".into())).await?;

    // Restart drops the collected answers and rewinds to the welcome.
    assert_eq!(
        engine.handle(user, FlowEvent::Start).await?,
        AdvanceResult::Continue
    );
    assert_eq!(
        engine.handle(user, FlowEvent::Text("Maria".into())).await?,
        AdvanceResult::Rejected
    );

    engine.handle(user, FlowEvent::Choice("agree".into())).await?;
    engine.handle(user, FlowEvent::Text("Maria".into())).await?;
    let result = engine.handle(user, FlowEvent::Text("yes".into())).await?;
    let AdvanceResult::Completed(record) = result else {
        panic!("expected completion, got {result:?}");
    };
    assert_eq!(record.answers.len(), 2);
    assert_eq!(record.answers[0].answer, "Maria");
    Ok(())
}

#[tokio::test]
async fn flush_failure_keeps_session_and_retry_records_once() -> Result<()> {
    let gateway = RecordingGateway::new();
    let sink = MemorySink::new();
    let engine = build_engine(sample_script(), &gateway, &sink);
    let user = UserId(30);

    engine.handle(user, FlowEvent::Start).await?;
    engine.handle(user, FlowEvent::Choice("agree".into())).await?;
    engine.handle(user, FlowEvent::Text("Maria".into())).await?;

    sink.fail_next();
    let err = engine
        .handle(user, FlowEvent::Text("yes".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Flush { .. }));
    assert!(sink.records().await.is_empty());

    // The session survived the sink failure; any input retries the flush.
    let result = engine.handle(user, FlowEvent::Text("again".into())).await?;
    let AdvanceResult::Completed(record) = result else {
        panic!("expected completion, got {result:?}");
    };
    // The answer set is exactly the one collected before the failure.
    assert_eq!(record.answers.len(), 2);
    assert_eq!(sink.records().await.len(), 1);
    Ok(())
}

fn branching_script() -> FlowScript {
    let mut b = FlowScript::builder();
    b.entry("start", "welcome");
    b.broadcast(
        "welcome",
        vec![ContentBlock::text("Been here before?")],
        Next::choices([
            Choice::new("Yes", "yes", "ack_yes"),
            Choice::new("No", "no", "ack_no"),
        ]),
    );
    b.broadcast(
        "ack_yes",
        vec![ContentBlock::text("Welcome back!")],
        Next::auto("shared"),
    );
    b.broadcast(
        "ack_no",
        vec![ContentBlock::text("First time then!")],
        Next::auto("shared"),
    );
    b.question("shared", "What brings you here?", None, "end");
    b.terminal("end", vec![ContentBlock::text("Bye")]);
    b.build().expect("branching script is valid")
}

#[tokio::test]
async fn converging_branches_share_one_continuation() -> Result<()> {
    let gateway = RecordingGateway::new();
    let sink = MemorySink::new();
    let engine = build_engine(branching_script(), &gateway, &sink);
    let yes_user = UserId(40);
    let no_user = UserId(41);

    engine.handle(yes_user, FlowEvent::Start).await?;
    engine.handle(no_user, FlowEvent::Start).await?;
    engine.handle(yes_user, FlowEvent::Choice("yes".into())).await?;
    engine.handle(no_user, FlowEvent::Choice("no".into())).await?;

    // Each branch emits its own acknowledgement, then the shared prompt.
    let yes_sent = gateway.sent_to(yes_user).await;
    let no_sent = gateway.sent_to(no_user).await;
    assert_eq!(yes_sent[1], ContentBlock::text("Welcome back!"));
    assert_eq!(no_sent[1], ContentBlock::text("First time then!"));
    assert_eq!(yes_sent[2], ContentBlock::text("What brings you here?"));
    assert_eq!(no_sent[2], ContentBlock::text("What brings you here?"));

    for user in [yes_user, no_user] {
        let result = engine
            .handle(user, FlowEvent::Text("curiosity".into()))
            .await?;
        let AdvanceResult::Completed(record) = result else {
            panic!("expected completion, got {result:?}");
        };
        assert_eq!(record.answers[0].prompt, "What brings you here?");
    }
    Ok(())
}
