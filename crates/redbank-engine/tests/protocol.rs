//! End-to-end tests for a small in-process cluster, covering the
//! concrete scenarios named in spec §8.

use std::collections::HashMap;
use std::sync::Arc;

use redbank_engine::{InProcessPeerLink, PeerLink, Replica, ReplicaConfig, ReplicaHandle};
use redbank_types::{ClientRequest, Cmd};

/// Spawns a `size`-replica cluster, fully wired with in-process peer
/// links, and returns each replica's handle.
fn spawn_cluster(size: usize) -> Vec<ReplicaHandle> {
    let mut built: Vec<(Replica, ReplicaHandle)> = (0..size)
        .map(|id| Replica::new(ReplicaConfig { id, cluster_size: size }))
        .collect();
    let handles: Vec<ReplicaHandle> = built.iter().map(|(_, h)| h.clone()).collect();

    for (replica, handle) in &mut built {
        let mut peers: HashMap<usize, Arc<dyn PeerLink>> = HashMap::new();
        for other in &handles {
            if other.id() != handle.id() {
                peers.insert(other.id(), Arc::new(InProcessPeerLink::new(other.clone())));
            }
        }
        replica.set_peers(peers);
    }

    for (replica, _) in built {
        replica.spawn();
    }
    handles
}

/// Waits out several token rotations and shadow-delivery delays so the
/// cluster reaches a quiescent state.
async fn quiesce() {
    tokio::time::sleep(redbank_types::TOKEN_HOLD * 4).await;
}

fn deposit(aid: i64, amount: f64) -> ClientRequest {
    ClientRequest { cmd: Cmd::Deposit, aid, amount }
}

fn withdraw(aid: i64, amount: f64) -> ClientRequest {
    ClientRequest { cmd: Cmd::Withdraw, aid, amount }
}

fn check(aid: i64) -> ClientRequest {
    ClientRequest { cmd: Cmd::Check, aid, amount: 0.0 }
}

#[tokio::test(start_paused = true)]
async fn blue_commutativity_across_replicas() {
    let cluster = spawn_cluster(3);

    let r0 = cluster[0].request(deposit(20, 1000.0)).await;
    assert!(r0.is_ok());
    assert_eq!(r0.balance, 2000.0);

    let r1 = cluster[1].request(deposit(20, 1100.0)).await;
    assert!(r1.is_ok());
    assert_eq!(r1.balance, 2100.0);

    quiesce().await;

    for handle in &cluster {
        let resp = handle.request(check(20)).await;
        assert_eq!(resp.balance, 3100.0);
    }
}

#[tokio::test(start_paused = true)]
async fn interest_uses_author_local_balance_at_generation_time() {
    let cluster = spawn_cluster(3);
    cluster[0].request(deposit(20, 1000.0)).await;
    cluster[1].request(deposit(20, 1100.0)).await;
    quiesce().await;

    let interest = cluster[0].request(ClientRequest { cmd: Cmd::Interest, aid: 20, amount: 0.0 }).await;
    assert!(interest.is_ok());
    assert!((interest.balance - 3224.0).abs() < 1e-9);

    quiesce().await;
    for handle in &cluster {
        let resp = handle.request(check(20)).await;
        assert!((resp.balance - 3224.0).abs() < 1e-9);
    }
}

#[tokio::test(start_paused = true)]
async fn withdraw_at_non_primary_is_deferred_until_token_arrives() {
    let cluster = spawn_cluster(3);
    cluster[0].request(deposit(20, 2500.0)).await;
    quiesce().await;

    // replica 1 is not the bootstrap primary; its WITHDRAW must still
    // eventually be answered once the token rotates to it.
    let resp = cluster[1].request(withdraw(20, 2500.0)).await;
    assert!(resp.is_ok());
    assert_eq!(resp.balance, 1000.0);
}

#[tokio::test(start_paused = true)]
async fn concurrent_conflicting_withdraws_never_double_spend() {
    let cluster = spawn_cluster(3);

    let (a, b) = tokio::join!(cluster[0].request(withdraw(21, 800.0)), cluster[1].request(withdraw(21, 800.0)));
    quiesce().await;

    let successes = [&a, &b].into_iter().filter(|r| r.is_ok()).count();
    assert!(successes <= 1, "at most one concurrent withdraw of the full balance may succeed");

    for handle in &cluster {
        let resp = handle.request(check(21)).await;
        assert!(resp.balance == 200.0 || resp.balance == 1000.0);
        assert!(resp.balance >= 0.0);
    }
}

#[tokio::test(start_paused = true)]
async fn invalid_account_id_is_rejected_without_touching_state() {
    let cluster = spawn_cluster(3);
    let resp = cluster[0].request(deposit(10_000, 50.0)).await;
    assert!(!resp.is_ok());
    assert_eq!(resp.message, "Invalid Account Id");
    assert_eq!(resp.balance, 0.0);
}

#[tokio::test(start_paused = true)]
async fn check_does_not_replicate_to_peers() {
    let cluster = spawn_cluster(3);
    cluster[0].request(deposit(55, 500.0)).await;
    quiesce().await;

    cluster[0].request(check(55)).await;
    quiesce().await;

    let r1 = cluster[1].request(check(55)).await;
    let r2 = cluster[2].request(check(55)).await;
    assert_eq!(r1.balance, 1500.0);
    assert_eq!(r2.balance, 1500.0);
}
