//! The replica engine and its main event loop (spec §4.3, §5) — the
//! largest single piece of the core.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use redbank_clock::VectorClock;
use redbank_store::AccountStore;
use redbank_types::{
    ClientRequest, ClientResponse, Cmd, Color, INTEREST_RATE, ReplicaId, TOKEN_HOLD,
    validate_account_id,
};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::peer::PeerLink;
use crate::request::RequestItem;
use crate::shadow::ShadowOp;

/// Static configuration a [`Replica`] is spawned with.
#[derive(Debug, Clone)]
pub struct ReplicaConfig {
    pub id: ReplicaId,
    pub cluster_size: usize,
}

/// A cheaply-cloneable handle to a running replica's mailboxes. This is
/// the *only* way anything outside the replica's own task touches its
/// state (spec §5: "those calls MUST only push onto the respective
/// mailbox ... MUST NOT touch replica state directly").
#[derive(Clone)]
pub struct ReplicaHandle {
    id: ReplicaId,
    req_tx: mpsc::UnboundedSender<RequestItem>,
    shadow_tx: mpsc::UnboundedSender<ShadowOp>,
    token_tx: mpsc::UnboundedSender<u64>,
    dump_tx: mpsc::UnboundedSender<oneshot::Sender<String>>,
}

impl ReplicaHandle {
    #[must_use]
    pub fn id(&self) -> ReplicaId {
        self.id
    }

    /// `request()` (spec §6.1): blocks until this replica has produced a
    /// response for the submitted request.
    pub async fn request(&self, request: ClientRequest) -> ClientResponse {
        let (item, rx) = RequestItem::new(request);
        if self.req_tx.send(item).is_err() {
            return ClientResponse::rejected(0.0, "replica is not running");
        }
        rx.await.unwrap_or_else(|_| ClientResponse::rejected(0.0, "replica dropped the request"))
    }

    /// `add_shadow_op(shadow)` (spec §6.1): enqueues, never rejects.
    pub fn add_shadow_op(&self, shadow: ShadowOp) {
        let _ = self.shadow_tx.send(shadow);
    }

    /// `pass_token(max_r)` (spec §6.1): enqueues a token arrival.
    pub fn pass_token(&self, max_r: u64) {
        let _ = self.token_tx.send(max_r);
    }

    /// `dump()` (spec §4.3): diagnostic-only snapshot of the clock state.
    pub async fn dump(&self) -> Option<String> {
        let (tx, rx) = oneshot::channel();
        self.dump_tx.send(tx).ok()?;
        rx.await.ok()
    }
}

/// Owns one account store, one clock, the deferred queues, and the three
/// ingress mailboxes described in spec §3/§5. A single task ever touches
/// this state — see `Replica::run`.
pub struct Replica {
    id: ReplicaId,
    cluster_size: usize,
    peers: HashMap<ReplicaId, Arc<dyn PeerLink>>,
    store: AccountStore,
    now: VectorClock,
    max_r: u64,
    has_token: bool,
    op_list: VecDeque<ShadowOp>,
    red_list: VecDeque<RequestItem>,

    req_rx: mpsc::UnboundedReceiver<RequestItem>,
    shadow_rx: mpsc::UnboundedReceiver<ShadowOp>,
    token_rx: mpsc::UnboundedReceiver<u64>,
    dump_rx: mpsc::UnboundedReceiver<oneshot::Sender<String>>,
    token_tx: mpsc::UnboundedSender<u64>,
}

impl Replica {
    /// Builds an un-started replica and its [`ReplicaHandle`], with no
    /// peer links yet. Split from [`Replica::spawn`] so a cluster's
    /// handles can all be created first and then wired into each other's
    /// peer maps before any engine starts running (spec §9's "cyclic
    /// reference" note: a peer link only ever needs a handle, never a
    /// reference to the engine itself, so this ordering is safe even
    /// though no replica's task is running yet).
    #[must_use]
    pub fn new(config: ReplicaConfig) -> (Self, ReplicaHandle) {
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (shadow_tx, shadow_rx) = mpsc::unbounded_channel();
        let (token_tx, token_rx) = mpsc::unbounded_channel();
        let (dump_tx, dump_rx) = mpsc::unbounded_channel();

        let replica = Replica {
            id: config.id,
            cluster_size: config.cluster_size,
            peers: HashMap::new(),
            store: AccountStore::new(),
            now: VectorClock::new(config.cluster_size),
            max_r: 0,
            has_token: config.id == 0,
            op_list: VecDeque::new(),
            red_list: VecDeque::new(),
            req_rx,
            shadow_rx,
            token_rx,
            dump_rx,
            token_tx: token_tx.clone(),
        };
        let handle = ReplicaHandle { id: config.id, req_tx, shadow_tx, token_tx, dump_tx };
        (replica, handle)
    }

    /// Attaches this replica's outbound links to its peers, keyed by
    /// peer id (the replica's own id MUST NOT appear as a key).
    pub fn set_peers(&mut self, peers: HashMap<ReplicaId, Arc<dyn PeerLink>>) {
        self.peers = peers;
    }

    /// Spawns the replica's main loop as its own Tokio task. Replica
    /// index 0 bootstraps holding the token (spec §3 "Token").
    pub fn spawn(self) -> JoinHandle<()> {
        if self.has_token {
            info!(replica = self.id, "bootstrapping with the token");
            self.arm_token_hold_timer();
        }
        tokio::spawn(self.run())
    }

    /// `primary() ⇔ has_token ∧ (max_r == now.R)` (spec §4.3).
    fn primary(&self) -> bool {
        self.has_token && self.max_r == self.now.red()
    }

    fn arm_token_hold_timer(&self) {
        let tx = self.token_tx.clone();
        let max_r = self.max_r;
        tokio::spawn(async move {
            tokio::time::sleep(TOKEN_HOLD).await;
            // Carries the locally-observed max_r at arm time; irrelevant
            // if the token has since moved on, and ignored on the
            // "still holding -> forward" branch regardless (spec §5).
            let _ = tx.send(max_r);
        });
    }

    /// Step 1 of the main loop: handles one arrival on `token_inbox`.
    fn handle_token_arrival(&mut self, peer_max_r: u64) {
        if self.has_token {
            let next_id = (self.id + 1) % self.cluster_size;
            if let Some(peer) = self.peers.get(&next_id) {
                self.has_token = false;
                debug!(replica = self.id, next_id, max_r = self.max_r, "passing token");
                peer.pass_token(self.max_r);
            }
            // No connected next peer: hold onto the token rather than
            // drop it (losing the only token would stall reds forever).
        } else {
            self.max_r = peer_max_r;
            self.has_token = true;
            debug!(replica = self.id, max_r = self.max_r, "token arrived");
            self.arm_token_hold_timer();
        }
    }

    /// `do_request` (spec §4.3). Returns `Ok(())` once a response has
    /// been written to `item`'s reply channel, or `Err(item)` if the
    /// request must be deferred onto `red_list` (a WITHDRAW submitted
    /// while this replica is not primary).
    fn do_request(&mut self, item: RequestItem) -> Result<(), RequestItem> {
        let Some(aid) = validate_account_id(item.request.aid) else {
            item.respond(ClientResponse::rejected(0.0, "Invalid Account Id"));
            return Ok(());
        };

        let bal = self.store.balance(aid);
        let mut shadow = ShadowOp::blue_read(aid, self.id, self.now.snapshot());
        let response = match item.request.cmd {
            Cmd::Deposit => {
                shadow.amount = item.request.amount;
                ClientResponse::ok(bal + item.request.amount)
            }
            Cmd::Interest => {
                let delta = self.store.account(aid).compute_interest(INTEREST_RATE);
                shadow.amount = delta;
                ClientResponse::ok(bal + delta)
            }
            Cmd::Check => ClientResponse::ok(bal),
            Cmd::Withdraw => {
                if !self.primary() {
                    return Err(item);
                }
                if bal >= item.request.amount {
                    shadow.amount = -item.request.amount;
                    shadow.color = Color::Red;
                    ClientResponse::ok(bal - item.request.amount)
                } else {
                    // Rejected withdraw: blue zero-amount shadow, never
                    // emitted (spec §9 "only successful WITHDRAWs are RED").
                    ClientResponse::rejected(bal, "Insufficient balance")
                }
            }
        };

        item.respond(response);
        self.dispatch_shadow(shadow);
        Ok(())
    }

    /// Applies and fans out a locally produced shadow (spec §4.3
    /// "Dispatch of a locally produced shadow"). No-op for read-only or
    /// rejected-withdraw placeholders.
    fn dispatch_shadow(&mut self, shadow: ShadowOp) {
        if shadow.is_no_op() {
            return;
        }
        shadow.apply(&mut self.store);
        self.now.tick(shadow.author_id, shadow.color);
        self.max_r = self.max_r.max(self.now.red());
        for peer in self.peers.values() {
            peer.add_shadow_op_async(shadow.clone());
        }
    }

    /// Step 4: scans `op_list` to a fixed point, applying every shadow
    /// whose dependency has become ready. Returns whether anything moved.
    fn apply_ready_shadows(&mut self) -> bool {
        let mut progressed = false;
        loop {
            let Some(ready_idx) = self.op_list.iter().position(|s| s.depend.ready(&self.now))
            else {
                break;
            };
            let shadow = self.op_list.remove(ready_idx).expect("index just found by position");
            debug!(replica = self.id, aid = shadow.aid, "applying ready shadow");
            shadow.apply(&mut self.store);
            self.now.tick(shadow.author_id, shadow.color);
            self.max_r = self.max_r.max(self.now.red());
            progressed = true;
        }
        progressed
    }

    /// Step 5: if this replica just became primary, replays every
    /// deferred red request. Every replay must be accepted; if one is
    /// not, that is a protocol invariant violation (spec §4.3, §7).
    fn drain_red_list_if_primary(&mut self) -> bool {
        if self.red_list.is_empty() || !self.primary() {
            return false;
        }
        let deferred = std::mem::take(&mut self.red_list);
        for item in deferred {
            if let Err(_item) = self.do_request(item) {
                panic!(
                    "replica {}: red request still not accepted after becoming primary \
                     (protocol invariant violation)",
                    self.id
                );
            }
        }
        true
    }

    /// The main loop (spec §4.3/§5): drains the three inboxes in a fixed
    /// order, applies ready shadows to a fixed point, drains `red_list`
    /// if now primary, and otherwise waits on any mailbox.
    async fn run(mut self) {
        info!(replica = self.id, cluster_size = self.cluster_size, "replica started");
        loop {
            let mut progressed = false;

            while let Ok(peer_max_r) = self.token_rx.try_recv() {
                self.handle_token_arrival(peer_max_r);
                progressed = true;
            }
            while let Ok(shadow) = self.shadow_rx.try_recv() {
                self.op_list.push_back(shadow);
                progressed = true;
            }
            while let Ok(item) = self.req_rx.try_recv() {
                if let Err(item) = self.do_request(item) {
                    self.red_list.push_back(item);
                }
                progressed = true;
            }
            while let Ok(reply) = self.dump_rx.try_recv() {
                let _ = reply.send(self.now.dump(self.id));
            }

            progressed |= self.apply_ready_shadows();
            progressed |= self.drain_red_list_if_primary();

            if progressed {
                continue;
            }

            tokio::select! {
                maybe = self.token_rx.recv() => {
                    match maybe {
                        Some(peer_max_r) => self.handle_token_arrival(peer_max_r),
                        None => break,
                    }
                }
                maybe = self.shadow_rx.recv() => {
                    match maybe {
                        Some(shadow) => self.op_list.push_back(shadow),
                        None => break,
                    }
                }
                maybe = self.req_rx.recv() => {
                    match maybe {
                        Some(item) => {
                            if let Err(item) = self.do_request(item) {
                                self.red_list.push_back(item);
                            }
                        }
                        None => break,
                    }
                }
                maybe = self.dump_rx.recv() => {
                    match maybe {
                        Some(reply) => { let _ = reply.send(self.now.dump(self.id)); }
                        None => break,
                    }
                }
            }
        }
        warn!(replica = self.id, "all mailboxes closed, replica shutting down");
    }
}
