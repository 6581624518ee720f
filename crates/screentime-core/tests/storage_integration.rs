//! Integration tests for persisting a workspace to an on-disk database.

use screentime_core::storage::Config;
use screentime_core::{Database, ExtensionStatus, MembershipStatus, Workspace};

#[test]
fn test_workspace_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("screentime.db");
    let config = Config::default();

    let mut ws = Workspace::seeded();
    ws.sign_in("john@example.com", "pw").unwrap();
    ws.invite("taylor").unwrap();
    ws.request_extension("com.google.ios.youtube", 20, "documentary").unwrap();
    ws.mark_all_as_read();
    {
        let mut db = Database::open_at(&path).unwrap();
        db.save_snapshot(&ws.to_snapshot()).unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    assert!(db.is_initialized().unwrap());
    let mut restored = Workspace::from_snapshot(db.load_snapshot().unwrap(), &config).unwrap();

    assert_eq!(restored.current_user().map(|u| u.id.as_str()), Some("user-1"));
    let group = restored.groups().current_group().unwrap();
    assert_eq!(group.name, "Focus Friends");
    let taylor = group.member_by_user("user-6").unwrap();
    assert_eq!(taylor.status, MembershipStatus::Pending);
    assert_eq!(restored.notifications().unread_count_for("user-1"), 0);

    let request_id = restored.extensions().requests()[0].id.clone();
    restored.sign_out();
    restored.sign_in("jane@example.com", "pw").unwrap();
    restored.respond(&request_id, true, Some("enjoy")).unwrap();
    assert_eq!(
        restored.extensions().get(&request_id).unwrap().status,
        ExtensionStatus::Approved
    );
    assert_eq!(
        restored
            .limits()
            .for_user("user-1")
            .limit_for("com.google.ios.youtube")
            .unwrap()
            .daily_limit_minutes,
        80
    );
}

#[test]
fn test_password_credentials_are_persisted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("screentime.db");
    let mut config = Config::default();
    config.set("auth.mode", "password").unwrap();

    let mut ws = Workspace::seeded_with(&config).unwrap();
    ws.sign_up("pat@example.com", "pat", "hunter2").unwrap();
    let mut db = Database::open_at(&path).unwrap();
    db.save_snapshot(&ws.to_snapshot()).unwrap();

    let mut restored = Workspace::from_snapshot(db.load_snapshot().unwrap(), &config).unwrap();
    assert!(restored.sign_in("pat@example.com", "wrong").is_err());
    restored.sign_in("pat@example.com", "hunter2").unwrap();
    assert_eq!(restored.current_user().and_then(|u| u.username()), Some("pat"));
}
