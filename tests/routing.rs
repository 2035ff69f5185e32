//! Single-shot routing and the redirection state machine.

mod common;

use bytes::Bytes;
use common::{connection_table, slot_map, MockConnection};
use shardis::command::{commands, Request};
use shardis::{key_slot, Error, Frame, RouterBuilder};

const NODE_A: &str = "redis://10.0.0.1:6379";
const NODE_B: &str = "redis://10.0.0.2:6379";

/// Two ranges: slots 0-8191 on A, 8192-16383 on B.
fn two_node_setup(
    a: &MockConnection,
    b: &MockConnection,
) -> shardis::ClusterRouter<MockConnection> {
    RouterBuilder::new(
        slot_map(&[(0, 8191, &[NODE_A]), (8192, 16383, &[NODE_B])]),
        connection_table(&[(NODE_A, a), (NODE_B, b)]),
    )
    .default_endpoint(NODE_A)
    .build()
}

#[tokio::test]
async fn get_routes_to_the_masters_slot() {
    let a = MockConnection::new();
    let b = MockConnection::new()
        .reply(Ok(Frame::BulkString(Some(Bytes::from("bar-value")))));
    let router = two_node_setup(&a, &b);

    // "foo" hashes to 12182, which lives on node B
    assert_eq!(key_slot(b"foo"), 12182);
    let reply = router
        .send(Request::cmd(&commands::GET).arg("foo"))
        .await
        .unwrap();

    assert_eq!(reply, Frame::BulkString(Some(Bytes::from("bar-value"))));
    assert!(a.sent().is_empty());
    assert_eq!(b.sent_names(), vec!["get"]);
    assert_eq!(b.sent()[0].args(), &[Bytes::from("foo")]);
}

#[tokio::test]
async fn moved_is_surfaced_unchanged_without_retry() {
    let a = MockConnection::new();
    let b = MockConnection::new().reply(Err(Error::Moved {
        slot: 3999,
        address: "10.0.0.3:6379".to_string(),
    }));
    let router = two_node_setup(&a, &b);

    let error = router
        .send(Request::cmd(&commands::GET).arg("foo"))
        .await
        .unwrap_err();

    assert_eq!(error.to_string(), "MOVED 3999 10.0.0.3:6379");
    assert_eq!(b.sent_names(), vec!["get"], "no retry after MOVED");
}

#[tokio::test]
async fn ask_runs_asking_then_redispatches_to_the_target() {
    let a = MockConnection::new();
    let b = MockConnection::new()
        .reply(Err(Error::Ask {
            slot: 12182,
            address: "10.0.0.9:6380".to_string(),
        }))
        .reply(Ok(Frame::ok()));
    let target = MockConnection::new()
        .reply(Ok(Frame::BulkString(Some(Bytes::from("42")))));

    let router = RouterBuilder::new(
        slot_map(&[(0, 8191, &[NODE_A]), (8192, 16383, &[NODE_B])]),
        connection_table(&[
            (NODE_A, &a),
            (NODE_B, &b),
            ("redis://10.0.0.9:6380", &target),
        ]),
    )
    .default_endpoint(NODE_A)
    .build();

    let reply = router
        .send(Request::cmd(&commands::GET).arg("foo"))
        .await
        .unwrap();

    assert_eq!(reply, Frame::BulkString(Some(Bytes::from("42"))));
    assert_eq!(b.sent_names(), vec!["get", "asking"]);
    assert_eq!(target.sent_names(), vec!["get"]);
    assert_eq!(target.sent()[0].args(), &[Bytes::from("foo")]);
}

#[tokio::test]
async fn ask_to_an_unknown_endpoint_is_a_missing_connection() {
    let a = MockConnection::new();
    let b = MockConnection::new()
        .reply(Err(Error::Ask {
            slot: 12182,
            address: "10.9.9.9:7777".to_string(),
        }))
        .reply(Ok(Frame::ok()));
    let router = two_node_setup(&a, &b);

    let error = router
        .send(Request::cmd(&commands::GET).arg("foo"))
        .await
        .unwrap_err();

    match error {
        Error::MissingConnection { endpoint } => {
            assert_eq!(endpoint, "redis://10.9.9.9:7777");
        }
        other => panic!("expected MissingConnection, got {other}"),
    }
}

#[tokio::test]
async fn a_failed_asking_surfaces_its_own_error() {
    let a = MockConnection::new();
    let b = MockConnection::new()
        .reply(Err(Error::Ask {
            slot: 12182,
            address: "10.0.0.9:6380".to_string(),
        }))
        .reply(Err(Error::Server {
            message: "DENIED".to_string(),
        }));
    let router = two_node_setup(&a, &b);

    let error = router
        .send(Request::cmd(&commands::GET).arg("foo"))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Server { message } if message == "DENIED"));
    assert_eq!(b.sent_names(), vec!["get", "asking"]);
}

#[tokio::test(start_paused = true)]
async fn tryagain_retries_with_backoff_until_success() {
    let a = MockConnection::new();
    let b = MockConnection::new()
        .reply(Err(Error::TryAgain))
        .reply(Err(Error::TryAgain))
        .reply(Ok(Frame::ok()));
    let router = two_node_setup(&a, &b);

    let reply = router
        .send(Request::cmd(&commands::GET).arg("foo"))
        .await
        .unwrap();

    assert_eq!(reply, Frame::ok());
    assert_eq!(b.sent_names(), vec!["get", "get", "get"]);
}

#[tokio::test(start_paused = true)]
async fn clusterdown_retries_with_backoff() {
    let a = MockConnection::new();
    let b = MockConnection::new()
        .reply(Err(Error::ClusterDown))
        .reply(Ok(Frame::ok()));
    let router = two_node_setup(&a, &b);

    let reply = router
        .send(Request::cmd(&commands::GET).arg("foo"))
        .await
        .unwrap();

    assert_eq!(reply, Frame::ok());
    assert_eq!(b.sent_names(), vec!["get", "get"]);
}

#[tokio::test]
async fn tryagain_with_exhausted_budget_is_surfaced() {
    let a = MockConnection::new();
    let b = MockConnection::new().reply(Err(Error::TryAgain));
    let router = RouterBuilder::new(
        slot_map(&[(0, 8191, &[NODE_A]), (8192, 16383, &[NODE_B])]),
        connection_table(&[(NODE_A, &a), (NODE_B, &b)]),
    )
    .default_endpoint(NODE_A)
    .retries(0)
    .build();

    let error = router
        .send(Request::cmd(&commands::GET).arg("foo"))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::TryAgain));
    assert_eq!(b.sent_names(), vec!["get"], "no second attempt at zero budget");
}

#[tokio::test]
async fn unsupported_command_fails_before_any_io() {
    let a = MockConnection::new();
    let b = MockConnection::new();
    let router = two_node_setup(&a, &b);

    let error = router
        .send(Request::cmd(&commands::SUBSCRIBE).arg("ch"))
        .await
        .unwrap_err();

    match error {
        Error::Unsupported { message } => {
            assert!(message.contains("subscribe"));
            assert!(message.contains("single-node client"));
        }
        other => panic!("expected Unsupported, got {other}"),
    }
    assert!(a.sent().is_empty());
    assert!(b.sent().is_empty());
}

#[tokio::test]
async fn flushall_rejection_points_at_flushdb() {
    let a = MockConnection::new();
    let b = MockConnection::new();
    let router = two_node_setup(&a, &b);

    let error = router
        .send(Request::cmd(&commands::FLUSHALL))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::Unsupported { message } if message.contains("flushdb")));
}

#[tokio::test]
async fn movable_keys_commands_are_rejected() {
    let a = MockConnection::new();
    let b = MockConnection::new();
    let router = two_node_setup(&a, &b);

    let error = router
        .send(
            Request::cmd(&commands::EVAL)
                .arg("return 1")
                .arg("0"),
        )
        .await
        .unwrap_err();

    assert!(matches!(error, Error::MovableKeys));
    assert!(a.sent().is_empty());
    assert!(b.sent().is_empty());
}

#[tokio::test]
async fn a_slot_without_a_connected_endpoint_is_a_missing_connection() {
    let a = MockConnection::new();
    // slot map knows node B, the table does not
    let router = RouterBuilder::new(
        slot_map(&[(0, 8191, &[NODE_A]), (8192, 16383, &[NODE_B])]),
        connection_table(&[(NODE_A, &a)]),
    )
    .default_endpoint(NODE_A)
    .build();

    let error = router
        .send(Request::cmd(&commands::GET).arg("foo"))
        .await
        .unwrap_err();

    assert!(matches!(error, Error::MissingConnection { endpoint } if endpoint == NODE_B));
}

#[tokio::test]
async fn a_single_key_command_without_arguments_is_invalid() {
    let a = MockConnection::new();
    let b = MockConnection::new();
    let router = two_node_setup(&a, &b);

    let error = router.send(Request::cmd(&commands::GET)).await.unwrap_err();
    assert!(matches!(error, Error::InvalidArgument { .. }));
}

#[tokio::test]
async fn custom_unsupported_reason_wins_over_defaults() {
    let a = MockConnection::new();
    let b = MockConnection::new();
    let router = RouterBuilder::new(
        slot_map(&[(0, 8191, &[NODE_A]), (8192, 16383, &[NODE_B])]),
        connection_table(&[(NODE_A, &a), (NODE_B, &b)]),
    )
    .default_endpoint(NODE_A)
    .unsupported_reason(&commands::GETDEL, "disabled here")
    .build();

    assert!(router.unsupported_reason(&commands::SCAN).is_some());
    assert!(router.unsupported_reason(&commands::GET).is_none());

    let error = router
        .send(Request::cmd(&commands::GETDEL).arg("foo"))
        .await
        .unwrap_err();
    assert!(matches!(error, Error::Unsupported { message } if message == "disabled here"));
}
