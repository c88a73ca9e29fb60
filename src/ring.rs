//! Consistent-hash ring mapping keys to owning nodes.
//!
//! Each node contributes a fixed number of replica positions, derived by
//! hashing the node address together with a replica index, so a small
//! cluster still spreads keys evenly despite hash skew. The ring is
//! rebuilt wholesale whenever the node set changes and is never mutated
//! in place.

use std::collections::BTreeMap;

/// Replica positions per node when the caller does not say otherwise.
/// A few dozen is enough to smooth out crc32 skew for small clusters.
pub const DEFAULT_REPLICAS: usize = 50;

/// Deterministic key-to-node mapping.
///
/// For a fixed node set the mapping is pure: the same key always lands on
/// the same node, regardless of the order nodes were supplied in.
#[derive(Debug, Clone)]
pub struct Ring {
    replicas: usize,
    positions: BTreeMap<u32, String>,
}

impl Ring {
    /// Build a ring for the given node set.
    pub fn new<I, S>(replicas: usize, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let replicas = replicas.max(1);
        let mut sorted: Vec<String> = nodes.into_iter().map(Into::into).collect();
        // Sorting keeps position collisions (rare but possible with 32-bit
        // hashes) resolving the same way for any insertion order.
        sorted.sort();
        sorted.dedup();

        let mut positions = BTreeMap::new();
        for node in &sorted {
            for i in 0..replicas {
                let position = crc32fast::hash(format!("{node}#{i}").as_bytes());
                positions.insert(position, node.clone());
            }
        }

        Self { replicas, positions }
    }

    /// A ring with no nodes; every lookup returns `None`.
    pub fn empty(replicas: usize) -> Self {
        Self {
            replicas: replicas.max(1),
            positions: BTreeMap::new(),
        }
    }

    /// Whether any node is configured.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Replica positions per node.
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// The node owning `key`: the first position at or after the key's
    /// hash, wrapping around to the smallest position at the top of the
    /// ring. `None` only when no nodes are configured.
    pub fn pick_node(&self, key: &str) -> Option<&str> {
        if self.positions.is_empty() {
            return None;
        }
        let hash = crc32fast::hash(key.as_bytes());
        self.positions
            .range(hash..)
            .next()
            .or_else(|| self.positions.iter().next())
            .map(|(_, node)| node.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes() -> Vec<String> {
        vec![
            "http://10.0.0.1:8001".to_owned(),
            "http://10.0.0.2:8001".to_owned(),
            "http://10.0.0.3:8001".to_owned(),
        ]
    }

    #[test]
    fn test_empty_ring_picks_nothing() {
        let ring = Ring::empty(DEFAULT_REPLICAS);
        assert!(ring.is_empty());
        assert!(ring.pick_node("anything").is_none());
    }

    #[test]
    fn test_single_node_owns_every_key() {
        let ring = Ring::new(DEFAULT_REPLICAS, ["http://10.0.0.1:8001"]);
        for i in 0..100 {
            assert_eq!(
                ring.pick_node(&format!("key-{i}")),
                Some("http://10.0.0.1:8001")
            );
        }
    }

    #[test]
    fn test_pick_is_deterministic() {
        let ring = Ring::new(DEFAULT_REPLICAS, nodes());
        for i in 0..200 {
            let key = format!("key-{i}");
            let first = ring.pick_node(&key).map(str::to_owned);
            assert_eq!(ring.pick_node(&key).map(str::to_owned), first);
        }
    }

    #[test]
    fn test_insertion_order_does_not_change_the_mapping() {
        let forward = Ring::new(DEFAULT_REPLICAS, nodes());
        let mut reversed = nodes();
        reversed.reverse();
        let backward = Ring::new(DEFAULT_REPLICAS, reversed);

        for i in 0..500 {
            let key = format!("key-{i}");
            assert_eq!(forward.pick_node(&key), backward.pick_node(&key));
        }
    }

    #[test]
    fn test_every_node_gets_a_share() {
        let ring = Ring::new(DEFAULT_REPLICAS, nodes());
        let mut owners = std::collections::HashSet::new();
        for i in 0..1_000 {
            if let Some(node) = ring.pick_node(&format!("key-{i}")) {
                owners.insert(node.to_owned());
            }
        }
        assert_eq!(owners.len(), 3);
    }

    #[test]
    fn test_picked_node_is_always_a_member() {
        let ring = Ring::new(3, nodes());
        let members = nodes();
        for i in 0..1_000 {
            let owner = ring.pick_node(&format!("key-{i}")).map(str::to_owned);
            assert!(members.contains(&owner.expect("non-empty ring always picks")));
        }
    }

    #[test]
    fn test_duplicate_nodes_collapse() {
        let ring = Ring::new(
            DEFAULT_REPLICAS,
            ["http://10.0.0.1:8001", "http://10.0.0.1:8001"],
        );
        assert_eq!(ring.pick_node("k"), Some("http://10.0.0.1:8001"));
    }

    #[test]
    fn test_replicas_floor_at_one() {
        let ring = Ring::new(0, nodes());
        assert_eq!(ring.replicas(), 1);
        assert!(!ring.is_empty());
    }
}
