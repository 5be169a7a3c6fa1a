//! End-to-end test of the TCP transport: a real `redbank-net::serve`
//! listener fed by a real `redbank_net::call_request`/`call_dump` client,
//! wrapping a single in-process [`Replica`].

use std::net::SocketAddr;

use redbank_engine::{Replica, ReplicaConfig};
use redbank_types::{ClientRequest, Cmd, INITIAL_BALANCE};

async fn spawn_listening_replica() -> SocketAddr {
    let (replica, handle) = Replica::new(ReplicaConfig { id: 0, cluster_size: 1 });
    replica.spawn();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    tokio::spawn(redbank_net::serve(addr, handle));
    // Give the listener a moment to bind before the first connection.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    addr
}

#[tokio::test]
async fn request_round_trips_over_tcp() {
    let addr = spawn_listening_replica().await;

    let response =
        redbank_net::call_request(addr, ClientRequest::new(Cmd::Check, 42, 0.0)).await.unwrap();
    assert!(response.is_ok());
    assert_eq!(response.balance, INITIAL_BALANCE);

    let deposit =
        redbank_net::call_request(addr, ClientRequest::new(Cmd::Deposit, 42, 250.0)).await.unwrap();
    assert!(deposit.is_ok());
    assert_eq!(deposit.balance, INITIAL_BALANCE + 250.0);
}

#[tokio::test]
async fn invalid_account_id_round_trips_as_a_rejection() {
    let addr = spawn_listening_replica().await;

    let response =
        redbank_net::call_request(addr, ClientRequest::new(Cmd::Deposit, -1, 10.0)).await.unwrap();
    assert!(!response.is_ok());
    assert_eq!(response.message, "Invalid Account Id");
}

#[tokio::test]
async fn dump_reports_the_replicas_clock_state() {
    let addr = spawn_listening_replica().await;

    let text = redbank_net::call_dump(addr).await.unwrap();
    assert!(text.starts_with("#0["), "unexpected dump format: {text}");
}
