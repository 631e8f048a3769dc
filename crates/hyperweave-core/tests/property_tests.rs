//! # Property-Based Tests
//!
//! Structural invariants checked over random edge lists with proptest.

use hyperweave_core::{
    DiHypergraph, FilterMode, Hypergraph, HypergraphRead, Id, SimplicialComplex, StatsAccess,
    from_interchange, from_json, to_interchange, to_json,
};
use proptest::collection::{btree_set, vec};
use proptest::prelude::*;
use std::collections::BTreeSet;

fn edge_lists() -> impl Strategy<Value = Vec<BTreeSet<i64>>> {
    vec(btree_set(0i64..20, 0..6), 0..25)
}

fn build(edges: &[BTreeSet<i64>]) -> Hypergraph {
    let mut hg = Hypergraph::new();
    hg.add_edges_from(edges.iter().map(|e| e.iter().copied()))
        .expect("edges");
    hg
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// `e ∈ memberships(n)` iff `n ∈ members(e)`, after removals too.
    #[test]
    fn incidence_is_dual(edges in edge_lists(), drop_node in 0i64..20, drop_edge in 0i64..25) {
        let mut hg = build(&edges);
        if hg.has_node(&Id::from(drop_node)) {
            hg.remove_node(&Id::from(drop_node)).expect("remove node");
        }
        if hg.has_edge(&Id::from(drop_edge)) {
            hg.remove_edge(&Id::from(drop_edge)).expect("remove edge");
        }

        let members = hg.members_map();
        let memberships = hg.memberships_map();
        for (edge, nodes) in &members {
            for node in nodes {
                prop_assert!(memberships[node].contains(edge));
            }
        }
        for (node, edges) in &memberships {
            for edge in edges {
                prop_assert!(members[edge].contains(node));
            }
        }
    }

    /// Every stored simplex has all of its faces stored, and coface removal
    /// keeps it that way.
    #[test]
    fn complexes_stay_closed(
        simplices in vec(btree_set(0i64..8, 1..5), 1..8),
        drop in 0usize..8
    ) {
        let mut sc = SimplicialComplex::new();
        sc.add_simplices_from(simplices.iter().map(|s| s.iter().copied()), None)
            .expect("simplices");
        prop_assert!(sc.is_closed());

        let ids: Vec<Id> = sc.edges().cloned().collect();
        if let Some(id) = ids.get(drop % ids.len().max(1)) {
            sc.remove_simplex_with_cofaces(id).expect("remove");
        }
        prop_assert!(sc.is_closed());
    }

    /// Removing by identifier drops exactly one simplex and nothing else.
    #[test]
    fn simplex_removal_is_exact(
        simplices in vec(btree_set(0i64..8, 1..5), 1..8),
        drop in 0usize..8
    ) {
        let mut sc = SimplicialComplex::new();
        sc.add_simplices_from(simplices.iter().map(|s| s.iter().copied()), None)
            .expect("simplices");
        let mut before = sc.members_map();
        let ids: Vec<Id> = before.keys().cloned().collect();
        let id = &ids[drop % ids.len()];

        let members = sc.remove_simplex_id(id).expect("remove");

        prop_assert_eq!(before.remove(id), Some(members));
        prop_assert_eq!(sc.members_map(), before);
    }

    /// `geq ⊇ gt` and `eq = geq ∩ leq`.
    #[test]
    fn filters_are_monotone(edges in edge_lists(), value in 0i64..5) {
        let hg = build(&edges);
        let nodes = hg.node_view();
        let ids = |mode| -> BTreeSet<Id> {
            nodes
                .filterby("degree", value, mode)
                .expect("filter")
                .ids()
                .into_iter()
                .collect()
        };

        let (eq, gt, geq, leq) = (
            ids(FilterMode::Eq),
            ids(FilterMode::Gt),
            ids(FilterMode::Geq),
            ids(FilterMode::Leq),
        );
        prop_assert!(gt.is_subset(&geq));
        prop_assert_eq!(eq, geq.intersection(&leq).cloned().collect::<BTreeSet<_>>());
    }

    /// Interchange JSON round-trips members and identifiers.
    #[test]
    fn interchange_round_trip(edges in edge_lists()) {
        let hg = build(&edges);
        let record = to_interchange(&hg).expect("export");
        let text = to_json(&record).expect("json");
        let back = from_interchange(&from_json(&text).expect("parse")).expect("import");

        prop_assert_eq!(back.as_read().members_map(), hg.members_map());
        prop_assert_eq!(to_interchange(back.as_read()).expect("export"), record);
    }

    /// Directed records keep tails and heads apart through JSON.
    #[test]
    fn directed_interchange_round_trip(
        edges in vec((btree_set(0i64..12, 0..4), btree_set(0i64..12, 0..4)), 0..15)
    ) {
        let mut dh = DiHypergraph::new();
        dh.add_edges_from(edges.iter().map(|(t, h)| (t.iter().copied(), h.iter().copied())))
            .expect("edges");
        let record = to_interchange(&dh).expect("export");
        let text = to_json(&record).expect("json");
        let back = from_interchange(&from_json(&text).expect("parse")).expect("import");

        let directed = back.as_read().as_directed().expect("directed");
        for (edge, (tail, head)) in edges.iter().enumerate() {
            let edge = Id::from(edge as i64);
            let tail: BTreeSet<Id> = tail.iter().map(|&n| Id::from(n)).collect();
            let head: BTreeSet<Id> = head.iter().map(|&n| Id::from(n)).collect();
            prop_assert_eq!(directed.tail(&edge).expect("tail"), &tail);
            prop_assert_eq!(directed.head(&edge).expect("head"), &head);
        }
        prop_assert_eq!(to_interchange(back.as_read()).expect("export"), record);
    }

    /// Simplicial records come back closed with the same simplices and
    /// identifiers.
    #[test]
    fn simplicial_interchange_round_trip(
        simplices in vec(btree_set(0i64..8, 1..5), 0..6)
    ) {
        let mut sc = SimplicialComplex::new();
        sc.add_simplices_from(simplices.iter().map(|s| s.iter().copied()), None)
            .expect("simplices");
        let record = to_interchange(&sc).expect("export");
        let text = to_json(&record).expect("json");
        let back = from_interchange(&from_json(&text).expect("parse")).expect("import");

        prop_assert_eq!(back.as_read().members_map(), sc.members_map());
        prop_assert_eq!(to_interchange(back.as_read()).expect("export"), record);
        if let hyperweave_core::Network::Simplicial(restored) = &back {
            prop_assert!(restored.is_closed());
        } else {
            prop_assert!(false, "expected a simplicial complex");
        }
    }

    /// Degrees sum to the total edge size.
    #[test]
    fn degree_sum_matches_sizes(edges in edge_lists()) {
        let hg = build(&edges);
        let total: usize = edges.iter().map(BTreeSet::len).sum();
        let degree_sum = hg.node_view().stat("degree").expect("stat").sum().expect("sum");

        prop_assert_eq!(degree_sum as usize, total);
    }
}
