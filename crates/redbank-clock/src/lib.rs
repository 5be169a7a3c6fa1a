//! The causal vector clock described in spec §3/§4.1: per-replica blue
//! progress counters `B[0..K)` plus a single monotonic red counter `R`
//! serialized by the rotating token.
//!
//! Two parts capture two different orderings: `B` gives every replica a
//! partial, causal view of all applied operations (blue and red alike),
//! while `R` gives every replica *agreement* on the total order of red
//! operations, because only the token holder issues them and `R` only
//! ever advances when a red op is applied.

use redbank_types::{Color, ReplicaId};
use serde::{Deserialize, Serialize};

/// `(B[0..K), R)` as defined in spec §3. Cloning is a deep value copy —
/// embedding a clock as a [`ShadowOp`](../redbank_engine/struct.ShadowOp.html)
/// dependency must not alias the author's live clock, or `ready` checks
/// silently break once the author ticks again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorClock {
    b: Vec<u64>,
    r: u64,
}

impl VectorClock {
    /// Creates a fresh clock for a cluster of `num_replicas` replicas.
    #[must_use]
    pub fn new(num_replicas: usize) -> Self {
        Self { b: vec![0; num_replicas], r: 0 }
    }

    /// Builds a clock directly from its parts, e.g. when decoding a
    /// `ShadowOp` dependency off the wire.
    #[must_use]
    pub fn from_parts(b: Vec<u64>, r: u64) -> Self {
        Self { b, r }
    }

    /// Number of replicas `K` this clock was sized for.
    #[must_use]
    pub fn len(&self) -> usize {
        self.b.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// The per-replica blue progress counters.
    #[must_use]
    pub fn blue_counters(&self) -> &[u64] {
        &self.b
    }

    /// The global red counter `R`.
    #[must_use]
    pub fn red(&self) -> u64 {
        self.r
    }

    /// `dep.ready(now)`: true iff every component of `dep` is componentwise
    /// `<=` the matching component of `now` (spec §3 "Ready relation").
    /// A remote shadow whose dependency is ready may be applied.
    ///
    /// # Panics
    /// Panics if `self` and `now` were not sized for the same cluster —
    /// per spec §4.2 a peer of a different `K` is a configuration error,
    /// not a runtime condition this protocol needs to tolerate.
    #[must_use]
    pub fn ready(&self, now: &VectorClock) -> bool {
        assert_eq!(
            self.b.len(),
            now.b.len(),
            "vector clock length mismatch: cluster is misconfigured"
        );
        self.b.iter().zip(now.b.iter()).all(|(dep, cur)| dep <= cur) && self.r <= now.r
    }

    /// Applies the tick for a shadow authored by `author` of the given
    /// `color`: bumps `B[author]`, and `R` too if `color` is `Red`.
    /// Returns a snapshot of the clock *before* the tick, which is what
    /// the caller embeds as the new shadow's dependency (spec §4.1).
    pub fn tick(&mut self, author: ReplicaId, color: Color) -> VectorClock {
        let before = self.snapshot();
        self.b[author] += 1;
        if color == Color::Red {
            self.r += 1;
        }
        before
    }

    /// A deep copy suitable for embedding as a `ShadowOp` dependency.
    #[must_use]
    pub fn snapshot(&self) -> VectorClock {
        self.clone()
    }

    /// Human-readable dump in the style of the original `VectorClock.print`,
    /// e.g. `#2[0 3 1 |5]` for replica 2. Diagnostic only — see the `dump()`
    /// RPC method in spec §4.3.
    #[must_use]
    pub fn dump(&self, replica: ReplicaId) -> String {
        let b = self
            .b
            .iter()
            .map(u64::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        format!("#{replica}[{b} |{r}]", r = self.r)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_clock_is_all_zero() {
        let vc = VectorClock::new(3);
        assert_eq!(vc.blue_counters(), &[0, 0, 0]);
        assert_eq!(vc.red(), 0);
    }

    #[test]
    fn tick_returns_pre_tick_snapshot() {
        let mut vc = VectorClock::new(2);
        vc.tick(0, Color::Blue);
        let before = vc.tick(1, Color::Red);
        assert_eq!(before.blue_counters(), &[1, 0]);
        assert_eq!(before.red(), 0);
        assert_eq!(vc.blue_counters(), &[1, 1]);
        assert_eq!(vc.red(), 1);
    }

    #[test]
    fn ready_is_reflexive() {
        let mut vc = VectorClock::new(3);
        vc.tick(0, Color::Red);
        assert!(vc.ready(&vc));
    }

    #[test]
    fn ready_fails_when_a_component_is_ahead() {
        let mut dep = VectorClock::new(2);
        dep.tick(0, Color::Blue);
        let now = VectorClock::new(2);
        assert!(!dep.ready(&now));
    }

    #[test]
    fn red_op_not_ready_until_r_catches_up() {
        let mut dep = VectorClock::new(2);
        dep.tick(0, Color::Red);
        let mut now = VectorClock::new(2);
        now.tick(0, Color::Blue); // B catches up but R does not
        assert!(!dep.ready(&now));
    }

    #[test]
    #[should_panic(expected = "misconfigured")]
    fn ready_panics_on_length_mismatch() {
        let dep = VectorClock::new(2);
        let now = VectorClock::new(3);
        let _ = dep.ready(&now);
    }

    proptest! {
        #[test]
        fn tick_is_monotonic(author in 0usize..4, red in any::<bool>()) {
            let mut vc = VectorClock::new(4);
            let before = vc.snapshot();
            let color = if red { Color::Red } else { Color::Blue };
            vc.tick(author, color);
            prop_assert!(before.ready(&vc));
            prop_assert!(!vc.ready(&before) || vc == before);
        }

        #[test]
        fn a_clock_is_always_ready_against_itself_after_any_sequence_of_ticks(
            ticks in proptest::collection::vec((0usize..3, any::<bool>()), 0..20)
        ) {
            let mut vc = VectorClock::new(3);
            for (author, red) in ticks {
                vc.tick(author, if red { Color::Red } else { Color::Blue });
            }
            prop_assert!(vc.ready(&vc));
        }
    }
}
