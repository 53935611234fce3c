//! Access tests: every command requires the admin role or the access group.

use super::fixture;
use crate::{Command, ErrorCode, Principal, Value};

fn all_commands() -> Vec<Command> {
    vec![
        Command::Get {
            connection: "c1".into(),
            bucket: None,
            id: "doc".into(),
        },
        Command::Upsert {
            connection: "c1".into(),
            bucket: None,
            id: "doc".into(),
            content: Value::map([("k", Value::Int(1))]),
        },
        Command::Insert {
            connection: "c1".into(),
            bucket: None,
            id: "doc".into(),
            content: Value::map([("k", Value::Int(1))]),
        },
        Command::Query {
            connection: "c1".into(),
            bucket: None,
            design: "d".into(),
            view: "v".into(),
            params: None,
        },
        Command::UpsertDesignDocument {
            connection: "c1".into(),
            bucket: None,
            name: "d".into(),
            views: Value::map([("views", Value::map(Vec::<(String, Value)>::new()))]),
        },
        Command::InsertDesignDocument {
            connection: "c1".into(),
            bucket: None,
            name: "d".into(),
            views: Value::map([("views", Value::map(Vec::<(String, Value)>::new()))]),
        },
        Command::ListBuckets {
            connection: "c1".into(),
            username: "Administrator".into(),
            password: "password".into(),
        },
        Command::RemoveBucket {
            connection: "c1".into(),
            bucket: Some("travel".into()),
            username: "Administrator".into(),
            password: "password".into(),
        },
        Command::ListConnections,
        Command::ConnectionReport,
    ]
}

#[test]
fn test_outsider_denied_everything() {
    let f = fixture();
    let outsider = Principal::new("guest").with_group("users");

    for cmd in all_commands() {
        let name = cmd.name();
        let err = f.executor.execute(&outsider, cmd).unwrap_err();
        assert_eq!(err.code(), ErrorCode::PermissionDenied, "command {}", name);
    }
    // denied before any store work
    assert_eq!(f.connector.connect_count(), 0);
    assert!(f.connector.document("default", "doc").is_none());
}

#[test]
fn test_group_member_allowed() {
    let f = fixture();
    let member = Principal::new("alice").with_group(crate::ACCESS_GROUP);
    let result = f.executor.execute(&member, Command::ListConnections);
    assert!(result.is_ok());
}

#[test]
fn test_custom_access_group() {
    let f = fixture();
    let executor = f.executor.with_access_group("ops");

    let member = Principal::new("bob").with_group("ops");
    assert!(executor.execute(&member, Command::ListConnections).is_ok());

    let old_group = Principal::new("alice").with_group(crate::ACCESS_GROUP);
    let err = executor
        .execute(&old_group, Command::ListConnections)
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::PermissionDenied);
}
