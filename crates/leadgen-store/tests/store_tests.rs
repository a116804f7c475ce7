// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use leadgen_store::{
    AuthEvent, AuthSession, KeyValueStore, MemoryStore, SqliteStore, TOKEN_KEY, USER_KEY,
    validate_db_path,
};
use leadgen_testkit::{fixture_datetime, temp_db_path};
use time::macros::datetime;

#[test]
fn login_persists_both_entries_across_reopen() -> Result<()> {
    let temp = tempfile::tempdir()?;
    let path = temp.path().join("nested").join("session.db");

    {
        let mut session = AuthSession::restore(SqliteStore::open(&path)?)?;
        assert!(!session.is_authenticated());
        session.login(
            "admin@leadgen.com",
            "password123",
            datetime!(2026-03-04 05:06:07 UTC),
        )?;
    }

    let reopened = SqliteStore::open(&path)?;
    assert_eq!(reopened.keys()?, vec![TOKEN_KEY.to_owned(), USER_KEY.to_owned()]);
    let session = AuthSession::restore(reopened)?;
    let user = session.user().expect("restored user");
    assert_eq!(user.email, "admin@leadgen.com");
    assert_eq!(user.login_time, datetime!(2026-03-04 05:06:07 UTC));
    Ok(())
}

#[test]
fn any_other_credentials_persist_nothing() -> Result<()> {
    let pairs = [
        ("admin@leadgen.com", ""),
        ("Admin@leadgen.com", "password123"),
        ("someone@example.com", "password123"),
        ("", ""),
    ];
    for (email, password) in pairs {
        let store = MemoryStore::new();
        let mut session = AuthSession::new(store.clone());
        let error = session
            .login(email, password, datetime!(2026-01-01 00:00 UTC))
            .expect_err("credentials should be rejected");
        assert_eq!(
            error.to_string(),
            "Invalid credentials. Use admin@leadgen.com / password123"
        );
        assert!(store.is_empty(), "{email:?} wrote to the store");
    }
    Ok(())
}

#[test]
fn logout_clears_entries_and_notifies_every_subscriber() -> Result<()> {
    let store = MemoryStore::new();
    let mut session = AuthSession::new(store.clone());
    session.login("admin@leadgen.com", "password123", fixture_datetime())?;

    let header = session.subscribe();
    let sidebar = session.subscribe();
    session.logout()?;

    assert_eq!(store.get(TOKEN_KEY)?, None);
    assert_eq!(store.get(USER_KEY)?, None);
    assert!(!session.is_authenticated());
    assert_eq!(header.poll(), vec![AuthEvent::SignedOut]);
    assert_eq!(sidebar.latest(), Some(false));
    Ok(())
}

#[test]
fn second_session_over_shared_store_sees_login_after_refresh() -> Result<()> {
    let store = MemoryStore::new();
    let mut first = AuthSession::new(store.clone());
    let mut second = AuthSession::new(store);
    first.login("admin@leadgen.com", "password123", fixture_datetime())?;
    assert!(!second.is_authenticated());
    assert!(second.refresh()?);
    Ok(())
}

#[test]
fn sqlite_logout_survives_reopen() -> Result<()> {
    let (_temp, path) = temp_db_path()?;
    let mut session = AuthSession::restore(SqliteStore::open(&path)?)?;
    session.login("admin@leadgen.com", "password123", fixture_datetime())?;
    session.logout()?;
    drop(session);

    let reopened = SqliteStore::open(&path)?;
    assert!(reopened.keys()?.is_empty());
    assert!(!AuthSession::restore(reopened)?.is_authenticated());
    Ok(())
}

#[test]
fn sqlite_store_rejects_uri_paths() {
    assert!(validate_db_path("https://example.com/session.db").is_err());
    assert!(validate_db_path("file:session.db").is_err());
    assert!(validate_db_path("session.db?mode=ro").is_err());
    assert!(validate_db_path("").is_err());
    assert!(validate_db_path(":memory:").is_ok());
    assert!(validate_db_path("/tmp/leadgen/session.db").is_ok());
}
