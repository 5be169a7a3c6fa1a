//! Scripted demonstration client, standing in for the original
//! `test-client/test_client.py`: drives the concrete scenarios from
//! spec §8 against a live cluster and reports whether each converged
//! the way the protocol promises.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use redbank_types::{ClientRequest, Cmd, TOKEN_HOLD};

use super::parse_addresses;
use crate::style::SemanticStyle;

/// Runs the scripted scenarios of spec §8 against the cluster at `addrs`.
pub async fn run(addrs: &[String]) -> Result<()> {
    let cluster = parse_addresses(addrs)?;
    if cluster.len() < 2 {
        anyhow::bail!("sim needs at least 2 replica addresses to demonstrate replication");
    }

    println!("{}", "redbank scripted demonstration".header());
    println!("  {}: {} replicas", "cluster".muted(), cluster.len());
    println!();

    let mut passed = 0usize;
    let mut failed = 0usize;

    for scenario in scenarios(&cluster) {
        print!("{:<40}", scenario.name);
        match scenario.run().await {
            Ok(()) => {
                println!("{}", "ok".success());
                passed += 1;
            }
            Err(err) => {
                println!("{}", "FAILED".error());
                println!("    {err:#}");
                failed += 1;
            }
        }
    }

    println!();
    println!("{passed} passed, {failed} failed");
    if failed > 0 {
        anyhow::bail!("{failed} scenario(s) failed");
    }
    Ok(())
}

struct Scenario {
    name: &'static str,
    fut: std::pin::Pin<Box<dyn std::future::Future<Output = Result<()>> + Send>>,
}

impl Scenario {
    async fn run(self) -> Result<()> {
        self.fut.await
    }
}

fn scenarios(cluster: &[SocketAddr]) -> Vec<Scenario> {
    let cluster = cluster.to_vec();
    vec![
        Scenario {
            name: "blue commutativity across replicas",
            fut: Box::pin(blue_commutativity(cluster.clone())),
        },
        Scenario {
            name: "invalid account id is rejected",
            fut: Box::pin(invalid_account(cluster.clone())),
        },
        Scenario {
            name: "check does not replicate",
            fut: Box::pin(check_is_read_only(cluster.clone())),
        },
        Scenario { name: "red withdraw serialization", fut: Box::pin(red_serialization(cluster)) },
    ]
}

async fn deposit(addr: SocketAddr, aid: i64, amount: f64) -> Result<f64> {
    let resp = redbank_net::call_request(addr, ClientRequest::new(Cmd::Deposit, aid, amount))
        .await
        .context("DEPOSIT call failed")?;
    anyhow::ensure!(resp.is_ok(), "deposit rejected: {}", resp.message);
    Ok(resp.balance)
}

async fn check(addr: SocketAddr, aid: i64) -> Result<f64> {
    let resp = redbank_net::call_request(addr, ClientRequest::new(Cmd::Check, aid, 0.0))
        .await
        .context("CHECK call failed")?;
    Ok(resp.balance)
}

async fn quiesce() {
    tokio::time::sleep(TOKEN_HOLD * 4 + Duration::from_millis(500)).await;
}

/// spec §8 scenario 1: two deposits at distinct replicas, quiesce, every
/// replica converges to the sum.
async fn blue_commutativity(cluster: Vec<SocketAddr>) -> Result<()> {
    const AID: i64 = 20;
    deposit(cluster[0], AID, 1000.0).await?;
    deposit(cluster[1], AID, 1100.0).await?;
    quiesce().await;

    for addr in &cluster {
        let balance = check(*addr, AID).await?;
        anyhow::ensure!(
            (balance - 3100.0).abs() < 1e-6,
            "replica {addr} did not converge: expected 3100.00, got {balance:.2}"
        );
    }
    Ok(())
}

/// spec §8 scenario 5: an out-of-range account id is rejected without
/// touching any replica's state.
async fn invalid_account(cluster: Vec<SocketAddr>) -> Result<()> {
    let resp =
        redbank_net::call_request(cluster[0], ClientRequest::new(Cmd::Deposit, 10_000, 50.0))
            .await
            .context("DEPOSIT call failed")?;
    anyhow::ensure!(!resp.is_ok(), "expected invalid account id to be rejected");
    anyhow::ensure!(resp.message == "Invalid Account Id", "unexpected message: {}", resp.message);
    Ok(())
}

/// spec §8 scenario 6: CHECK never emits a shadow, so peers are
/// unaffected by it.
async fn check_is_read_only(cluster: Vec<SocketAddr>) -> Result<()> {
    const AID: i64 = 55;
    deposit(cluster[0], AID, 500.0).await?;
    quiesce().await;

    check(cluster[0], AID).await?;
    quiesce().await;

    for addr in cluster.iter().skip(1) {
        let balance = check(*addr, AID).await?;
        anyhow::ensure!(
            (balance - 1500.0).abs() < 1e-6,
            "replica {addr} diverged after a read-only CHECK: {balance:.2}"
        );
    }
    Ok(())
}

/// spec §8 scenario 3: a WITHDRAW submitted at a non-primary replica is
/// answered once the token rotates there, and the debit is visible
/// everywhere once quiescent.
async fn red_serialization(cluster: Vec<SocketAddr>) -> Result<()> {
    const AID: i64 = 30;
    deposit(cluster[0], AID, 2500.0).await?;
    quiesce().await;

    let resp = redbank_net::call_request(cluster[1], ClientRequest::new(Cmd::Withdraw, AID, 2500.0))
        .await
        .context("WITHDRAW call failed")?;
    anyhow::ensure!(resp.is_ok(), "withdraw was rejected: {}", resp.message);

    quiesce().await;
    for addr in &cluster {
        let balance = check(*addr, AID).await?;
        anyhow::ensure!(
            (balance - 1000.0).abs() < 1e-6,
            "replica {addr} did not converge to 1000.00 after the withdraw: {balance:.2}"
        );
    }
    Ok(())
}
