// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use std::sync::mpsc;
use std::time::Duration;

use anyhow::Result;
use leadgen_assist::{Assistant, chat_reply};

fn fast() -> Assistant {
    Assistant::new(
        Duration::from_millis(10),
        Duration::from_millis(10),
        Duration::from_millis(10),
    )
}

#[test]
fn generation_delivers_leads_on_channel() -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let task = fast().spawn_generation("healthcare founders", move |leads| {
        let _ = tx.send(leads);
    })?;
    assert!(task.join());
    let leads = rx.recv_timeout(Duration::from_secs(1))?;
    assert_eq!(leads[0].name, "Sarah Chen");
    Ok(())
}

#[test]
fn cancelled_chat_reply_is_never_observed() -> Result<()> {
    let (tx, rx) = mpsc::channel();
    let assistant = Assistant::new(
        Duration::from_secs(5),
        Duration::from_secs(5),
        Duration::from_secs(5),
    );
    let task = assistant.spawn_chat_reply("pricing", move |reply| {
        let _ = tx.send(reply);
    })?;
    task.cancel();
    assert!(!task.join());
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());
    Ok(())
}

#[test]
fn chat_reply_echoes_input() {
    assert_eq!(
        chat_reply("pricing"),
        "I understand you're asking about: pricing. This is a simulated response. In a real application, this would connect to an AI service."
    );
}

#[test]
fn draft_requires_prompt() -> Result<()> {
    assert!(fast().spawn_draft("  ", |_| {}).is_err());

    let (tx, rx) = mpsc::channel();
    let task = fast().spawn_draft("intro for fintech", move |draft| {
        let _ = tx.send(draft);
    })?;
    assert!(task.join());
    let draft = rx.recv_timeout(Duration::from_secs(1))?;
    assert!(draft.content.contains("{{firstName}}"));
    Ok(())
}
