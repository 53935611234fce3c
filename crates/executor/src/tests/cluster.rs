//! Cluster management and registry command tests.

use super::{admin, fixture};
use crate::{Command, ConnectionState, ErrorCode, Output};

fn list_buckets(password: &str) -> Command {
    Command::ListBuckets {
        connection: "c1".into(),
        username: "Administrator".into(),
        password: password.into(),
    }
}

#[test]
fn test_list_buckets() {
    let f = fixture();
    let output = f.executor.execute(&admin(), list_buckets("password")).unwrap();
    assert_eq!(output, Output::Names(vec!["default".into(), "travel".into()]));
}

#[test]
fn test_list_buckets_bad_credentials() {
    let f = fixture();
    let err = f.executor.execute(&admin(), list_buckets("guess")).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidCredentials);
}

#[test]
fn test_remove_bucket() {
    let f = fixture();
    let remove = Command::RemoveBucket {
        connection: "c1".into(),
        bucket: Some("travel".into()),
        username: "Administrator".into(),
        password: "password".into(),
    };

    assert_eq!(
        f.executor.execute(&admin(), remove.clone()).unwrap(),
        Output::Bool(true)
    );
    assert_eq!(f.executor.execute(&admin(), remove).unwrap(), Output::Bool(false));
}

#[test]
fn test_remove_default_bucket_when_unnamed() {
    let f = fixture();
    let output = f
        .executor
        .execute(
            &admin(),
            Command::RemoveBucket {
                connection: "c1".into(),
                bucket: None,
                username: "Administrator".into(),
                password: "password".into(),
            },
        )
        .unwrap();
    assert_eq!(output, Output::Bool(true));
    assert_eq!(
        f.executor.execute(&admin(), list_buckets("password")).unwrap(),
        Output::Names(vec!["travel".into()])
    );
}

#[test]
fn test_list_connections_and_report() {
    let f = fixture();
    assert_eq!(
        f.executor.execute(&admin(), Command::ListConnections).unwrap(),
        Output::Names(vec!["c1".into()])
    );

    let report = match f.executor.execute(&admin(), Command::ConnectionReport).unwrap() {
        Output::Report(report) => report,
        other => panic!("expected Report, got {:?}", other),
    };
    assert_eq!(report.connections.len(), 1);
    assert_eq!(report.connections[0].state, ConnectionState::Idle);
    assert_eq!(report.connections[0].seeds, vec!["host:8091"]);

    f.executor.execute(&admin(), list_buckets("password")).unwrap();
    let report = f.executor.registry().report();
    assert_eq!(report.connections[0].state, ConnectionState::Connected);
}

#[test]
fn test_execute_many_keeps_order() {
    let f = fixture();
    let results = f.executor.execute_many(
        &admin(),
        vec![
            Command::ListConnections,
            list_buckets("guess"),
            Command::ListConnections,
        ],
    );
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert_eq!(
        results[1].as_ref().unwrap_err().code(),
        ErrorCode::InvalidCredentials
    );
    assert!(results[2].is_ok());
}
