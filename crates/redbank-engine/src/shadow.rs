//! The shadow operation: the commutative, replicated record of a mutation
//! (spec §3, §4.2).

use redbank_clock::VectorClock;
use redbank_store::AccountStore;
use redbank_types::{AccountId, Color, ReplicaId};

/// Immutable once created. `depend` is the authoring replica's clock
/// *just before* this op's own tick — i.e. the author's last observed
/// state, excluding the op itself (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowOp {
    pub aid: AccountId,
    pub author_id: ReplicaId,
    pub depend: VectorClock,
    pub amount: f64,
    pub color: Color,
}

impl ShadowOp {
    /// A zero-amount blue placeholder for a read or a request that may
    /// turn out not to mutate state. `dispatch_shadow` (see
    /// [`crate::Replica`]) skips transmitting and applying these.
    #[must_use]
    pub fn blue_read(aid: AccountId, author_id: ReplicaId, depend: VectorClock) -> Self {
        Self { aid, author_id, depend, amount: 0.0, color: Color::Blue }
    }

    /// Applies this op's delta to the given store (spec §4.2).
    pub fn apply(&self, store: &mut AccountStore) {
        store.apply_delta(self.aid, self.amount);
    }

    /// True for the zero-amount placeholder that `dispatch_shadow` must
    /// neither apply a second time nor transmit to peers.
    #[must_use]
    pub fn is_no_op(&self) -> bool {
        self.amount == 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_adds_amount_to_the_target_account() {
        let mut store = AccountStore::new();
        let before = store.balance(7);
        let shadow = ShadowOp {
            aid: 7,
            author_id: 0,
            depend: VectorClock::new(1),
            amount: 42.5,
            color: Color::Blue,
        };
        shadow.apply(&mut store);
        assert_eq!(store.balance(7), before + 42.5);
    }

    #[test]
    fn zero_amount_shadow_is_a_no_op() {
        let shadow = ShadowOp::blue_read(3, 0, VectorClock::new(1));
        assert!(shadow.is_no_op());
    }
}
