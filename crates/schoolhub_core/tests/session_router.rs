use schoolhub_core::config::DEFAULT_SESSION_KEY;
use schoolhub_core::{
    AuthError, CredentialDirectory, CredentialRecord, Identity, InMemoryKvRepository,
    KvRepository, Role, ScreenSet, SessionRouter, SessionState, SqliteKvRepository,
    StorageConfig,
};
use std::path::Path;

fn open_file_router(path: &Path) -> SessionRouter<SqliteKvRepository> {
    let repo = SqliteKvRepository::open(path, &StorageConfig::default()).unwrap();
    SessionRouter::new(repo)
}

fn anonymous_router() -> SessionRouter<InMemoryKvRepository> {
    let mut router = SessionRouter::new(InMemoryKvRepository::new());
    assert_eq!(router.restore_session(), None);
    router
}

#[test]
fn known_accounts_sign_in_with_matching_role() {
    for (address, role, set) in [
        ("admin@school.com", Role::Admin, ScreenSet::Admin),
        ("teacher@school.com", Role::Teacher, ScreenSet::Teacher),
        ("parent@email.com", Role::Parent, ScreenSet::Parent),
    ] {
        let mut router = anonymous_router();
        let identity = router.resolve_credentials(address, "password123").unwrap();

        assert_eq!(identity.role, role);
        assert_eq!(identity.email, address);
        assert_eq!(router.current_role(), Some(role));
        assert_eq!(router.screen_set(), set);
        assert_eq!(router.state(), &SessionState::Authenticated(identity));
    }
}

#[test]
fn unknown_address_is_rejected_and_stays_anonymous() {
    let mut router = anonymous_router();
    for address in ["nobody@school.com", "admin@school.org", "ADMIN@SCHOOL.COM"] {
        assert_eq!(
            router.resolve_credentials(address, "password123"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(router.state(), &SessionState::Anonymous);
        assert_eq!(router.current_role(), None);
    }
    assert!(router.repository().is_empty());
}

#[test]
fn wrong_secret_is_rejected_and_nothing_is_persisted() {
    let mut router = anonymous_router();
    assert_eq!(
        router.resolve_credentials("admin@school.com", "wrong"),
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(router.current_role(), None);
    assert_eq!(router.repository().get(DEFAULT_SESSION_KEY).unwrap(), None);
}

#[test]
fn sign_in_persists_identity_record() {
    let mut router = anonymous_router();
    let identity = router
        .resolve_credentials("teacher@school.com", "password123")
        .unwrap();

    let raw = router
        .repository()
        .get(DEFAULT_SESSION_KEY)
        .unwrap()
        .expect("record should be stored");
    assert_eq!(Identity::from_record(&raw).unwrap(), identity);
}

#[test]
fn sign_out_clears_state_and_record_and_is_idempotent() {
    let mut router = anonymous_router();
    router
        .resolve_credentials("parent@email.com", "password123")
        .unwrap();

    router.sign_out();
    assert_eq!(router.current_role(), None);
    assert_eq!(router.screen_set(), ScreenSet::Login);
    assert_eq!(router.repository().get(DEFAULT_SESSION_KEY).unwrap(), None);

    router.sign_out();
    assert_eq!(router.state(), &SessionState::Anonymous);
}

#[test]
fn sign_out_then_sign_in_as_another_role() {
    let mut router = anonymous_router();
    router
        .resolve_credentials("admin@school.com", "password123")
        .unwrap();
    router.sign_out();

    router
        .resolve_credentials("teacher@school.com", "password123")
        .unwrap();
    assert_eq!(router.current_role(), Some(Role::Teacher));
}

#[test]
fn restore_session_survives_process_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.db");

    let mut first = open_file_router(&path);
    assert_eq!(first.restore_session(), None);
    let signed_in = first
        .resolve_credentials("admin@school.com", "password123")
        .unwrap();
    drop(first);

    let mut second = open_file_router(&path);
    assert_eq!(second.state(), &SessionState::Unresolved);
    assert_eq!(second.restore_session(), Some(signed_in));
    assert_eq!(second.current_role(), Some(Role::Admin));
    assert_eq!(second.screen_set(), ScreenSet::Admin);
}

#[test]
fn restore_after_sign_out_yields_anonymous() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.db");

    let mut first = open_file_router(&path);
    first.restore_session();
    first
        .resolve_credentials("teacher@school.com", "password123")
        .unwrap();
    first.sign_out();
    drop(first);

    let mut second = open_file_router(&path);
    assert_eq!(second.restore_session(), None);
    assert_eq!(second.state(), &SessionState::Anonymous);
}

#[test]
fn corrupted_record_restores_as_absent_and_is_cleared() {
    let repo = InMemoryKvRepository::new();
    repo.put(DEFAULT_SESSION_KEY, "{not valid json").unwrap();

    let mut router = SessionRouter::new(repo);
    assert_eq!(router.restore_session(), None);
    assert_eq!(router.state(), &SessionState::Anonymous);
    assert_eq!(router.repository().get(DEFAULT_SESSION_KEY).unwrap(), None);
}

#[test]
fn record_with_unknown_role_restores_as_absent() {
    let repo = InMemoryKvRepository::new();
    repo.put(
        DEFAULT_SESSION_KEY,
        r#"{"id":"7","name":"X","role":"principal","email":"x@school.com"}"#,
    )
    .unwrap();

    let mut router = SessionRouter::new(repo);
    assert_eq!(router.restore_session(), None);
    assert_eq!(router.current_role(), None);
}

#[test]
fn restore_reads_storage_only_once() {
    let mut router = anonymous_router();
    router
        .repository()
        .put(
            DEFAULT_SESSION_KEY,
            &Identity::new("1", "Admin User", Role::Admin, "admin@school.com")
                .to_record()
                .unwrap(),
        )
        .unwrap();

    assert_eq!(router.restore_session(), None);
    assert_eq!(router.state(), &SessionState::Anonymous);
}

#[test]
fn sign_in_before_restore_supersedes_stored_record() {
    let repo = InMemoryKvRepository::new();
    repo.put(
        DEFAULT_SESSION_KEY,
        &Identity::new("1", "Admin User", Role::Admin, "admin@school.com")
            .to_record()
            .unwrap(),
    )
    .unwrap();

    let mut router = SessionRouter::new(repo);
    router
        .resolve_credentials("parent@email.com", "password123")
        .unwrap();
    assert_eq!(router.current_role(), Some(Role::Parent));

    let raw = router.repository().get(DEFAULT_SESSION_KEY).unwrap().unwrap();
    assert_eq!(Identity::from_record(&raw).unwrap().role, Role::Parent);
}

#[test]
fn rejected_sign_in_before_restore_keeps_stored_session() {
    let stored = Identity::new("1", "Admin User", Role::Admin, "admin@school.com");
    let repo = InMemoryKvRepository::new();
    repo.put(DEFAULT_SESSION_KEY, &stored.to_record().unwrap())
        .unwrap();

    let mut router = SessionRouter::new(repo);
    assert_eq!(
        router.resolve_credentials("admin@school.com", "wrong"),
        Err(AuthError::InvalidCredentials)
    );
    assert_eq!(router.state(), &SessionState::Unresolved);
    assert_eq!(
        router.resolve_credentials("", "x"),
        Err(AuthError::MissingCredentials)
    );
    assert_eq!(router.state(), &SessionState::Unresolved);

    assert_eq!(router.restore_session(), Some(stored));
    assert_eq!(router.current_role(), Some(Role::Admin));
    assert_eq!(router.screen_set(), ScreenSet::Admin);
}

#[test]
fn custom_directory_and_session_key_are_honoured() {
    let directory = CredentialDirectory::from_records([CredentialRecord::new(
        "guardian@home.net",
        "s3cret",
        Identity::new("p-42", "Ana Diaz", Role::Parent, "guardian@home.net"),
    )])
    .unwrap();
    let mut router = SessionRouter::with_directory(InMemoryKvRepository::new(), directory)
        .with_session_key("custom.session");
    router.restore_session();

    assert_eq!(
        router.resolve_credentials("admin@school.com", "password123"),
        Err(AuthError::InvalidCredentials)
    );
    let identity = router
        .resolve_credentials("guardian@home.net", "s3cret")
        .unwrap();
    assert_eq!(identity.id, "p-42");
    assert!(router.repository().get("custom.session").unwrap().is_some());
    assert_eq!(router.repository().get(DEFAULT_SESSION_KEY).unwrap(), None);
}
