//! # Validation Tier Tests (T0-T4)
//!
//! If ANY tier fails, the library is INVALID.
//!
//! ## Tiers
//! - T0: Incidence Duality
//! - T1: Simplicial Closure
//! - T2: Stats and Filters
//! - T3: Freezing and Views
//! - T4: Conversion Round-Trips

use hyperweave_core::{
    DiHypergraph, EntityKind, FilterMode, Hypergraph, HypergraphRead, HyperweaveError, Id,
    SimplicialComplex, StatValue, StatsAccess,
};
use std::collections::BTreeSet;

fn sample() -> Hypergraph {
    let mut hg = Hypergraph::new();
    hg.add_edges_from(vec![vec![1, 2, 3], vec![4], vec![5, 6], vec![6, 7, 8]])
        .expect("edges");
    hg
}

fn set(values: &[i64]) -> BTreeSet<Id> {
    values.iter().map(|&v| Id::from(v)).collect()
}

fn is_dual(net: &dyn HypergraphRead) -> bool {
    let members = net.members_map();
    let memberships = net.memberships_map();
    members
        .iter()
        .all(|(e, nodes)| nodes.iter().all(|n| memberships[n].contains(e)))
        && memberships
            .iter()
            .all(|(n, edges)| edges.iter().all(|e| members[e].contains(n)))
}

// =============================================================================
// TIER T0: INCIDENCE DUALITY
// =============================================================================

mod t0_incidence_duality {
    use super::*;

    /// T0.1: Every mutation keeps both directions of the incidence in step.
    #[test]
    fn mutations_keep_duality() {
        let mut hg = sample();
        assert!(is_dual(&hg));

        hg.add_node_to_edge(1, 9).expect("add member");
        assert!(is_dual(&hg));
        hg.remove_node_from_edge(&Id::from(0), &Id::from(2), false)
            .expect("remove member");
        assert!(is_dual(&hg));
        hg.remove_edge(&Id::from(3)).expect("remove edge");
        assert!(is_dual(&hg));
        hg.remove_node(&Id::from(6)).expect("remove node");
        assert!(is_dual(&hg));
        assert!(hg.is_consistent());
    }

    /// T0.2: Directed edges keep tail and head memberships dual.
    #[test]
    fn directed_duality() {
        let mut dh = DiHypergraph::new();
        dh.add_edges_from(vec![(vec![1, 2], vec![3]), (vec![3], vec![1, 4])])
            .expect("edges");
        assert!(is_dual(&dh));

        dh.remove_node(&Id::from(3)).expect("remove");
        assert!(is_dual(&dh));
        assert!(dh.is_consistent());
    }

    /// T0.3: Unknown identifiers name their collection.
    #[test]
    fn not_found_is_reported() {
        let hg = sample();
        assert_eq!(
            hg.members(&Id::from(99)),
            Err(HyperweaveError::EdgeNotFound(Id::from(99)))
        );
        assert_eq!(
            hg.memberships(&Id::from(99)),
            Err(HyperweaveError::NodeNotFound(Id::from(99)))
        );
    }

    /// T0.4: Taken edge identifiers are skipped, not fatal.
    #[test]
    fn duplicate_edge_id_is_skipped() {
        let mut hg = sample();
        let added = hg
            .add_edges_from_dict(vec![(0, vec![9]), (10, vec![9])])
            .expect("batch");

        assert_eq!(added, vec![Id::from(10)]);
        assert_eq!(hg.members(&Id::from(0)).expect("members"), &set(&[1, 2, 3]));
    }
}

// =============================================================================
// TIER T1: SIMPLICIAL CLOSURE
// =============================================================================

mod t1_simplicial_closure {
    use super::*;

    /// T1.1: A triangle stores itself and its three edges.
    #[test]
    fn triangle_stores_four_simplices() {
        let mut sc = SimplicialComplex::new();
        sc.add_simplex(vec![1, 2, 3]).expect("simplex");

        let stored: BTreeSet<BTreeSet<Id>> = sc.members_map().into_values().collect();
        let expected: BTreeSet<BTreeSet<Id>> =
            [set(&[1, 2, 3]), set(&[1, 2]), set(&[1, 3]), set(&[2, 3])]
                .into_iter()
                .collect();
        assert_eq!(stored, expected);
    }

    /// T1.2: Re-inserting the same nodes in another order changes nothing.
    #[test]
    fn reinsert_is_noop() {
        let mut sc = SimplicialComplex::new();
        sc.add_simplex(vec![1, 2, 3]).expect("simplex");
        let before = sc.members_map();

        assert_eq!(sc.add_simplex(vec![2, 1, 3]).expect("simplex"), None);
        assert_eq!(sc.members_map(), before);
    }

    /// T1.3: Removing a simplex by identifier removes exactly that simplex,
    /// even when a stored coface still contains it.
    #[test]
    fn removing_a_face_removes_only_that_simplex() {
        let mut sc = SimplicialComplex::new();
        sc.add_simplex(vec![1, 2, 3]).expect("simplex");
        let face = sc.simplex_id(&set(&[2, 3])).expect("face id");

        assert_eq!(sc.remove_simplex_id(&face).expect("remove"), set(&[2, 3]));

        assert_eq!(sc.num_edges(), 3);
        assert!(sc.has_simplex(&set(&[1, 2, 3])));
        assert!(sc.has_simplex(&set(&[1, 2])));
        assert!(!sc.has_simplex(&set(&[2, 3])));
        assert!(!sc.is_closed());
    }

    /// T1.4: Coface removal keeps closure; node removal keeps it too.
    #[test]
    fn closure_survives_coface_removal() {
        let mut sc = SimplicialComplex::new();
        sc.add_simplices_from(vec![vec![1, 2, 3, 4], vec![4, 5, 6]], None)
            .expect("simplices");
        assert!(sc.is_closed());

        let face = sc.simplex_id(&set(&[1, 2])).expect("face id");
        let removed = sc.remove_simplex_with_cofaces(&face).expect("remove");
        assert_eq!(removed.first(), Some(&face));
        assert_eq!(removed.len(), 4);
        assert!(!sc.has_simplex(&set(&[1, 2, 3])));
        assert!(sc.has_simplex(&set(&[1, 3, 4])));
        assert!(sc.is_closed());

        sc.remove_node(&Id::from(4)).expect("remove node");
        assert!(sc.is_closed());
        assert!(is_dual(&sc));
    }

    /// T1.5: Closure carries simpliciality 1 on every metric.
    #[test]
    fn complexes_are_fully_simplicial() {
        use hyperweave_core::{
            SimplicialityParams, edit_simpliciality, face_edit_simpliciality, simplicial_fraction,
        };

        let mut sc = SimplicialComplex::new();
        sc.add_simplices_from(vec![vec![1, 2, 3], vec![3, 4, 5, 6]], None)
            .expect("simplices");
        let params = SimplicialityParams::default();

        assert_eq!(simplicial_fraction(&sc, params), 1.0);
        assert_eq!(edit_simpliciality(&sc, params), 1.0);
        assert_eq!(face_edit_simpliciality(&sc, params), 1.0);
    }

    /// T1.6: Removing a node strips it from every simplex and keeps the
    /// shrunken sets, including duplicates.
    #[test]
    fn node_removal_keeps_shrunken_simplices() {
        let mut sc = SimplicialComplex::new();
        sc.add_simplex(vec![1, 2, 3]).expect("simplex");

        sc.remove_node(&Id::from(3)).expect("remove node");

        let mut stored: Vec<BTreeSet<Id>> = sc.members_map().into_values().collect();
        stored.sort();
        assert_eq!(stored, vec![set(&[1]), set(&[1, 2]), set(&[1, 2]), set(&[2])]);
        assert!(sc.has_simplex(&set(&[1, 2])));
        assert!(is_dual(&sc));
    }
}

// =============================================================================
// TIER T2: STATS AND FILTERS
// =============================================================================

mod t2_stats_and_filters {
    use super::*;

    /// T2.1: Degrees of the reference hypergraph.
    #[test]
    fn reference_degrees() {
        let hg = sample();
        let degree = hg.node_view().stat("degree").expect("stat");

        assert_eq!(degree.get(&Id::from(6)).expect("get"), StatValue::Int(2));
        assert_eq!(degree.get(&Id::from(4)).expect("get"), StatValue::Int(1));
    }

    /// T2.2: Orders of the reference hypergraph.
    #[test]
    fn reference_orders() {
        let hg = sample();
        let orders = hg.edge_view().stat("order").expect("stat").as_map().expect("map");

        let expected = [(0, 2), (1, 0), (2, 1), (3, 2)]
            .into_iter()
            .map(|(e, o)| (Id::from(e), StatValue::Int(o)))
            .collect();
        assert_eq!(orders, expected);
    }

    /// T2.3: Filtering nodes by degree two.
    #[test]
    fn reference_filter() {
        let hg = sample();
        let hubs = hg
            .node_view()
            .filterby("degree", 2, FilterMode::default())
            .expect("filter");

        assert_eq!(hubs.ids(), vec![Id::from(6)]);
    }

    /// T2.4: Stats bound before a mutation see the mutation.
    #[test]
    fn detached_spec_tracks_mutation() {
        let mut hg = sample();
        let spec: hyperweave_core::StatSpec = "degree".parse().expect("spec");
        let node = [Id::from(4)];

        let before = spec.eval(&hg, EntityKind::Node, &node).expect("eval");
        hg.add_edge(vec![4, 5]).expect("edge");
        let after = spec.eval(&hg, EntityKind::Node, &node).expect("eval");

        assert_eq!(before[&Id::from(4)], StatValue::Int(1));
        assert_eq!(after[&Id::from(4)], StatValue::Int(2));
    }

    /// T2.5: Unknown stats and bunch misses are distinct errors.
    #[test]
    fn stat_errors() {
        let hg = sample();
        assert!(matches!(
            hg.node_view().stat("no_such_stat"),
            Err(HyperweaveError::UnknownStat(_))
        ));
        assert!(matches!(
            hg.edge_view().stat("degree"),
            Err(HyperweaveError::UnknownStat(_))
        ));

        let hubs = hg
            .node_view()
            .filterby("degree", 2, FilterMode::Eq)
            .expect("filter");
        assert_eq!(
            hubs.stat("degree").expect("stat").get(&Id::from(1)),
            Err(HyperweaveError::IdNotInBunch(Id::from(1)))
        );
        assert!(matches!(
            "almost".parse::<FilterMode>(),
            Err(HyperweaveError::InvalidFilterMode(_))
        ));
    }

    /// T2.6: Histogram bins put interior boundaries in the upper bin and the
    /// maximum in the last bin.
    #[test]
    fn histogram_bin_boundaries() {
        let hg = sample();
        let orders = hg.edge_view().stat("order").expect("stat");

        let unit = orders.ashist(None, false).expect("hist");
        let edges: Vec<(f64, f64, f64)> = unit.iter().map(|b| (b.lo, b.hi, b.value)).collect();
        assert_eq!(
            edges,
            vec![(-0.5, 0.5, 1.0), (0.5, 1.5, 1.0), (1.5, 2.5, 2.0)]
        );

        let halves = orders.ashist(Some(2), false).expect("hist");
        let edges: Vec<(f64, f64, f64)> =
            halves.iter().map(|b| (b.lo, b.hi, b.value)).collect();
        assert_eq!(edges, vec![(0.0, 1.0, 1.0), (1.0, 2.0, 3.0)]);

        let density = orders.ashist(None, true).expect("hist");
        let total: f64 = density.iter().map(|b| b.value * (b.hi - b.lo)).sum();
        assert_eq!(total, 1.0);
    }

    /// T2.7: argmax and argmin return the first identifier on ties.
    #[test]
    fn extremes_break_ties_by_first_id() {
        let hg = sample();
        let orders = hg.edge_view().stat("order").expect("stat");
        assert_eq!(orders.argmax().expect("argmax"), Some(Id::from(0)));
        assert_eq!(orders.argmin().expect("argmin"), Some(Id::from(1)));

        let degrees = hg.node_view().stat("degree").expect("stat");
        assert_eq!(degrees.argmin().expect("argmin"), Some(Id::from(1)));
        assert_eq!(degrees.argmax().expect("argmax"), Some(Id::from(6)));
    }

    /// T2.8: Raw and central moments of the reference degrees.
    #[test]
    fn reference_moments() {
        let hg = sample();
        let degrees = hg.node_view().stat("degree").expect("stat");

        assert_eq!(degrees.moment(1, false).expect("moment"), Some(1.125));
        assert_eq!(degrees.moment(2, false).expect("moment"), Some(1.375));
        assert_eq!(degrees.moment(1, true).expect("moment"), Some(0.0));
        assert_eq!(degrees.moment(2, true).expect("moment"), Some(0.109375));
        assert_eq!(degrees.var().expect("var"), Some(0.109375));
    }
}

// =============================================================================
// TIER T3: FREEZING AND VIEWS
// =============================================================================

mod t3_freezing_and_views {
    use super::*;

    /// T3.1: A frozen structure rejects every mutation and freezing twice is
    /// harmless.
    #[test]
    fn frozen_rejects_mutation() {
        let mut hg = sample();
        hg.freeze();
        hg.freeze();

        assert!(hg.is_frozen());
        assert_eq!(hg.add_node(99), Err(HyperweaveError::Frozen));
        assert_eq!(hg.add_edge(vec![1, 9]), Err(HyperweaveError::Frozen));
        assert_eq!(hg.remove_edge(&Id::from(0)), Err(HyperweaveError::Frozen));
        assert_eq!(
            hg.set_node_attr(&Id::from(1), "x", 1),
            Err(HyperweaveError::Frozen)
        );

        hg.unfreeze();
        assert!(hg.add_node(99).expect("add"));
    }

    /// T3.2: Views read through to the source and report frozen.
    #[test]
    fn views_mirror_source() {
        let hg = sample();
        let sub = hg.subhypergraph(set(&[5, 6, 7, 8]));

        assert!(sub.is_frozen());
        assert_eq!(sub.num_nodes(), 4);
        assert_eq!(sub.edges().cloned().collect::<BTreeSet<_>>(), set(&[2, 3]));
        for edge in sub.edges() {
            assert_eq!(sub.members(edge), hg.members(edge));
        }
        assert_eq!(
            sub.memberships(&Id::from(6)).expect("memberships"),
            set(&[2, 3])
        );
    }

    /// T3.3: Stats work the same over a view.
    #[test]
    fn stats_over_views() {
        let hg = sample();
        let sub = hg.edge_subhypergraph(set(&[0, 3]));
        let degree = sub.node_view().stat("degree").expect("stat");

        assert_eq!(degree.get(&Id::from(6)).expect("get"), StatValue::Int(1));
        assert_eq!(sub.node_view().len(), 6);
    }
}

// =============================================================================
// TIER T4: CONVERSION ROUND-TRIPS
// =============================================================================

mod t4_conversion {
    use super::*;
    use hyperweave_core::{
        IncidenceMatrix, Network, from_bipartite_pairs, from_edge_dict, from_edge_list,
        from_incidence_matrix, from_interchange, from_json, to_bipartite_pairs, to_edge_dict,
        to_incidence_matrix, to_interchange, to_json,
    };

    /// T4.1: All four construction forms build the same structure.
    #[test]
    fn construction_forms_agree() {
        let edges = vec![vec![1, 2, 3], vec![4], vec![5, 6], vec![6, 7, 8]];
        let reference = from_edge_list(edges.clone()).expect("list");

        let dict = from_edge_dict(to_edge_dict(&reference)).expect("dict");
        let matrix: IncidenceMatrix = to_incidence_matrix(&reference);
        let from_matrix = from_incidence_matrix(&matrix).expect("matrix");
        let pairs = from_bipartite_pairs(to_bipartite_pairs(&reference)).expect("pairs");

        for built in [&dict, &from_matrix, &pairs] {
            assert_eq!(built.members_map(), reference.members_map());
            assert_eq!(built.memberships_map(), reference.memberships_map());
        }
    }

    /// T4.2: Interchange JSON round-trips every family.
    #[test]
    fn interchange_round_trip() {
        let mut hg = sample();
        hg.set_node_attr(&Id::from(1), "name", "one").expect("attr");
        let mut dh = DiHypergraph::new();
        dh.add_edge(vec![1], vec![2, 3]).expect("edge");
        let mut sc = SimplicialComplex::new();
        sc.add_simplex(vec!["a", "b", "c"]).expect("simplex");

        let networks = [Network::from(hg), Network::from(dh), Network::from(sc)];
        for network in &networks {
            let text = to_json(&network.to_interchange().expect("export")).expect("json");
            let back = from_interchange(&from_json(&text).expect("parse")).expect("import");

            let (a, b) = (network.as_read(), back.as_read());
            assert_eq!(back.kind(), network.kind());
            assert_eq!(b.members_map(), a.members_map());
            assert_eq!(b.nodes().collect::<Vec<_>>(), a.nodes().collect::<Vec<_>>());
            for node in a.nodes() {
                assert_eq!(b.node_attrs(node), a.node_attrs(node));
            }
            assert_eq!(
                to_interchange(b).expect("export"),
                to_interchange(a).expect("export")
            );
        }
    }
}
