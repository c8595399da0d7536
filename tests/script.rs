use onboarding_bot::dialogues::{
    onboarding::{onboarding_script, MENU_ENTRY},
    script::{Choice, FlowScript, Next, ScriptError},
    ContentBlock,
};

#[test]
fn dangling_choice_target_is_rejected() {
    let mut b = FlowScript::builder();
    b.entry("start", "welcome");
    b.broadcast(
        "welcome",
        vec![ContentBlock::text("hi")],
        Next::choices([Choice::new("Go", "go", "nowhere")]),
    );
    assert!(matches!(
        b.build().unwrap_err(),
        ScriptError::DanglingEdge { .. }
    ));
}

#[test]
fn entry_must_point_at_a_defined_step() {
    let mut b = FlowScript::builder();
    b.entry("start", "missing");
    b.terminal("end", vec![ContentBlock::text("bye")]);
    assert!(matches!(
        b.build().unwrap_err(),
        ScriptError::DanglingEntry { .. }
    ));
}

#[test]
fn duplicate_choice_tokens_are_rejected() {
    let mut b = FlowScript::builder();
    b.entry("start", "welcome");
    b.broadcast(
        "welcome",
        vec![ContentBlock::text("hi")],
        Next::choices([
            Choice::new("One", "go", "end"),
            Choice::new("Two", "go", "end"),
        ]),
    );
    b.terminal("end", vec![ContentBlock::text("bye")]);
    assert!(matches!(
        b.build().unwrap_err(),
        ScriptError::DuplicateToken { .. }
    ));
}

#[test]
fn auto_transition_cycles_are_rejected() {
    let mut b = FlowScript::builder();
    b.entry("start", "a");
    b.broadcast("a", vec![ContentBlock::text("a")], Next::auto("b"));
    b.broadcast("b", vec![ContentBlock::text("b")], Next::auto("a"));
    assert!(matches!(b.build().unwrap_err(), ScriptError::AutoCycle(_)));
}

#[test]
fn choices_require_a_trailing_text_block() {
    let mut b = FlowScript::builder();
    b.entry("start", "welcome");
    b.broadcast(
        "welcome",
        vec![ContentBlock::media("pic.jpg", "caption")],
        Next::choices([Choice::new("Go", "go", "end")]),
    );
    b.terminal("end", vec![ContentBlock::text("bye")]);
    assert!(matches!(
        b.build().unwrap_err(),
        ScriptError::ChoicesWithoutPrompt(_)
    ));
}

#[test]
fn duplicate_step_ids_are_rejected() {
    let mut b = FlowScript::builder();
    b.entry("start", "a");
    b.terminal("a", vec![ContentBlock::text("one")]);
    b.terminal("a", vec![ContentBlock::text("two")]);
    assert!(matches!(
        b.build().unwrap_err(),
        ScriptError::DuplicateStep(_)
    ));
}

#[test]
fn production_script_is_valid() {
    let script = onboarding_script().expect("onboarding script must validate");
    assert!(script.entry("start").is_some());
    assert!(script.entry(MENU_ENTRY).is_some());
}
