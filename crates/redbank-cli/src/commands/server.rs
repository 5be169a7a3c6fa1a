//! `redbank server <hex_index> <addr0> <addr1> ...` (spec §6.2).

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use redbank_engine::{PeerLink, Replica, ReplicaConfig};
use redbank_net::TcpPeerLink;
use tracing::info;

use super::parse_addresses;

pub async fn run(hex_index: &str, addrs: &[String]) -> Result<()> {
    let index = usize::try_from(
        u32::from_str_radix(hex_index.trim_start_matches("0x"), 16)
            .with_context(|| format!("'{hex_index}' is not a valid base-16 replica index"))?,
    )
    .expect("replica index fits in usize on any supported platform");

    let cluster_addrs = parse_addresses(addrs)?;
    if index >= cluster_addrs.len() {
        bail!(
            "replica index {index} is out of range for a {}-replica cluster",
            cluster_addrs.len()
        );
    }

    let (mut replica, handle) =
        Replica::new(ReplicaConfig { id: index, cluster_size: cluster_addrs.len() });

    let mut peers: HashMap<usize, Arc<dyn PeerLink>> = HashMap::new();
    for (peer_id, addr) in cluster_addrs.iter().enumerate() {
        if peer_id != index {
            peers.insert(peer_id, Arc::new(TcpPeerLink::new(*addr)));
        }
    }
    replica.set_peers(peers);
    replica.spawn();

    let own_addr = cluster_addrs[index];
    info!(replica = index, %own_addr, cluster_size = cluster_addrs.len(), "starting redbank replica");
    println!("redbank replica {index} listening on {own_addr}");

    redbank_net::serve(own_addr, handle).await.context("replica listener stopped")?;
    Ok(())
}
