//! # Interchange Records
//!
//! A neutral, self-describing record of a whole structure: metadata, node and
//! edge attribute records, and one row per incidence. The `network-type` tag
//! tells readers which structure to rebuild; directed records tag every
//! incidence with its side.
//!
//! ```json
//! {
//!   "version": 1,
//!   "network-type": "dihypergraph",
//!   "metadata": { "name": "toy" },
//!   "nodes": [ { "node": 1, "attrs": {} } ],
//!   "edges": [ { "edge": 0, "attrs": { "w": 2 } } ],
//!   "incidences": [ { "edge": 0, "node": 1, "direction": "tail" } ]
//! }
//! ```
//!
//! Members travel as incidence rows rather than as an edge-to-members
//! mapping, so that directed records can tag each row with its side. An edge
//! with no rows is an empty edge. [`InterchangeRecord::edge_members`] groups
//! the rows back into the mapping.
//!
//! Imports are all-or-nothing: an inconsistent record is rejected before any
//! structure is returned. Simplicial records need not be closed; missing
//! faces are filled in under fresh identifiers that never collide with
//! recorded ones.

use crate::network::{HypergraphRead, NetworkKind};
use crate::{
    Attrs, DiHypergraph, Direction, Hypergraph, HyperweaveError, Id, SimplicialComplex,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// RECORD FORMAT
// =============================================================================

/// Current interchange format version.
pub const INTERCHANGE_VERSION: u8 = 1;

fn default_version() -> u8 {
    INTERCHANGE_VERSION
}

/// One node with its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub node: Id,
    #[serde(default)]
    pub attrs: Attrs,
}

/// One edge with its attributes. Members are listed as incidences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub edge: Id,
    #[serde(default)]
    pub attrs: Attrs,
}

/// One node-in-edge row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incidence {
    pub edge: Id,
    pub node: Id,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
}

/// A whole structure in interchange form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct InterchangeRecord {
    #[serde(default = "default_version")]
    pub version: u8,
    pub network_type: NetworkKind,
    #[serde(default)]
    pub metadata: Attrs,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
    #[serde(default)]
    pub incidences: Vec<Incidence>,
}

impl InterchangeRecord {
    /// Check the record is self-consistent.
    pub fn validate(&self) -> Result<(), HyperweaveError> {
        if self.version == 0 || self.version > INTERCHANGE_VERSION {
            return Err(HyperweaveError::SerializationError(format!(
                "unsupported interchange version {}",
                self.version
            )));
        }
        let directed = self.network_type == NetworkKind::DiHypergraph;
        let mut edges: BTreeSet<&Id> = BTreeSet::new();
        for e in &self.edges {
            if !edges.insert(&e.edge) {
                return Err(HyperweaveError::MalformedInput(format!(
                    "edge {} is recorded twice",
                    e.edge
                )));
            }
        }
        for row in &self.incidences {
            if !edges.contains(&row.edge) {
                return Err(HyperweaveError::MalformedInput(format!(
                    "incidence ({}, {}) names an unknown edge",
                    row.edge, row.node
                )));
            }
            match (directed, row.direction) {
                (true, None) => {
                    return Err(HyperweaveError::MalformedInput(format!(
                        "incidence ({}, {}) has no direction in a directed record",
                        row.edge, row.node
                    )));
                }
                (false, Some(_)) => {
                    return Err(HyperweaveError::MalformedInput(format!(
                        "incidence ({}, {}) has a direction in an undirected record",
                        row.edge, row.node
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Member sets keyed by edge, both sides merged for directed records.
    /// Edges without incidence rows map to the empty set.
    #[must_use]
    pub fn edge_members(&self) -> BTreeMap<Id, BTreeSet<Id>> {
        let mut members: BTreeMap<Id, BTreeSet<Id>> = self
            .edges
            .iter()
            .map(|e| (e.edge.clone(), BTreeSet::new()))
            .collect();
        for row in &self.incidences {
            members
                .entry(row.edge.clone())
                .or_default()
                .insert(row.node.clone());
        }
        members
    }

    /// Tail and head sets, keyed by edge.
    fn sides(&self) -> BTreeMap<Id, (BTreeSet<Id>, BTreeSet<Id>)> {
        let mut sides: BTreeMap<Id, (BTreeSet<Id>, BTreeSet<Id>)> = BTreeMap::new();
        for row in &self.incidences {
            let entry = sides.entry(row.edge.clone()).or_default();
            match row.direction {
                Some(Direction::Tail) => entry.0.insert(row.node.clone()),
                Some(Direction::Head) => entry.1.insert(row.node.clone()),
                None => false,
            };
        }
        sides
    }
}

// =============================================================================
// NETWORK
// =============================================================================

/// Any of the three structure families, as rebuilt from a record.
#[derive(Debug, Clone)]
pub enum Network {
    Hypergraph(Hypergraph),
    DiHypergraph(DiHypergraph),
    Simplicial(SimplicialComplex),
}

impl Network {
    #[must_use]
    pub fn kind(&self) -> NetworkKind {
        self.as_read().kind()
    }

    /// Read access regardless of family.
    #[must_use]
    pub fn as_read(&self) -> &dyn HypergraphRead {
        match self {
            Self::Hypergraph(hg) => hg,
            Self::DiHypergraph(dh) => dh,
            Self::Simplicial(sc) => sc,
        }
    }

    pub fn to_interchange(&self) -> Result<InterchangeRecord, HyperweaveError> {
        to_interchange(self.as_read())
    }
}

impl From<Hypergraph> for Network {
    fn from(hg: Hypergraph) -> Self {
        Self::Hypergraph(hg)
    }
}

impl From<DiHypergraph> for Network {
    fn from(dh: DiHypergraph) -> Self {
        Self::DiHypergraph(dh)
    }
}

impl From<SimplicialComplex> for Network {
    fn from(sc: SimplicialComplex) -> Self {
        Self::Simplicial(sc)
    }
}

// =============================================================================
// EXPORT / IMPORT
// =============================================================================

/// Export any readable structure, views included.
pub fn to_interchange(net: &dyn HypergraphRead) -> Result<InterchangeRecord, HyperweaveError> {
    let mut nodes = Vec::with_capacity(net.num_nodes());
    for node in net.nodes() {
        nodes.push(NodeRecord {
            node: node.clone(),
            attrs: net.node_attrs(node)?.clone(),
        });
    }

    let mut edges = Vec::with_capacity(net.num_edges());
    let mut incidences = Vec::new();
    let directed = net.as_directed();
    for edge in net.edges() {
        edges.push(EdgeRecord {
            edge: edge.clone(),
            attrs: net.edge_attrs(edge)?.clone(),
        });
        match directed {
            Some(dir) => {
                let sides = [
                    (Direction::Tail, dir.tail(edge)?),
                    (Direction::Head, dir.head(edge)?),
                ];
                for (side, set) in sides {
                    incidences.extend(set.iter().map(|node| Incidence {
                        edge: edge.clone(),
                        node: node.clone(),
                        direction: Some(side),
                    }));
                }
            }
            None => {
                incidences.extend(net.members(edge)?.iter().map(|node| Incidence {
                    edge: edge.clone(),
                    node: node.clone(),
                    direction: None,
                }));
            }
        }
    }

    Ok(InterchangeRecord {
        version: INTERCHANGE_VERSION,
        network_type: net.kind(),
        metadata: net.net_attrs().clone(),
        nodes,
        edges,
        incidences,
    })
}

/// Rebuild the structure a record describes.
pub fn from_interchange(record: &InterchangeRecord) -> Result<Network, HyperweaveError> {
    record.validate()?;
    let network = match record.network_type {
        NetworkKind::Hypergraph => {
            let mut hg = Hypergraph::with_attrs(record.metadata.clone());
            for n in &record.nodes {
                hg.add_node_with_attrs(n.node.clone(), n.attrs.clone())?;
            }
            let mut members = record.edge_members();
            for e in &record.edges {
                let set = members.remove(&e.edge).unwrap_or_default();
                hg.add_edge_with_attrs(set, Some(e.edge.clone()), e.attrs.clone())?;
            }
            Network::Hypergraph(hg)
        }
        NetworkKind::DiHypergraph => {
            let mut dh = DiHypergraph::with_attrs(record.metadata.clone());
            for n in &record.nodes {
                dh.add_node_with_attrs(n.node.clone(), n.attrs.clone())?;
            }
            let mut sides = record.sides();
            for e in &record.edges {
                let (tail, head) = sides.remove(&e.edge).unwrap_or_default();
                dh.add_edge_with_attrs(tail, head, Some(e.edge.clone()), e.attrs.clone())?;
            }
            Network::DiHypergraph(dh)
        }
        NetworkKind::Simplicial => {
            let mut sc = SimplicialComplex::with_attrs(record.metadata.clone());
            for n in &record.nodes {
                sc.add_node_with_attrs(n.node.clone(), n.attrs.clone())?;
            }
            let mut members = record.edge_members();
            let mut simplices: Vec<(&EdgeRecord, BTreeSet<Id>)> = record
                .edges
                .iter()
                .map(|e| (e, members.remove(&e.edge).unwrap_or_default()))
                .collect();
            // Faces first, so every stored face keeps its recorded identifier.
            simplices.sort_by_key(|(_, set)| set.len());
            sc.reserve_simplex_ids(record.edges.iter().map(|e| &e.edge));
            for (e, set) in simplices {
                sc.restore_simplex(set, e.edge.clone(), e.attrs.clone())?;
            }
            Network::Simplicial(sc)
        }
    };
    tracing::debug!(
        kind = %record.network_type,
        nodes = record.nodes.len(),
        edges = record.edges.len(),
        "imported interchange record"
    );
    Ok(network)
}

/// Serialize a record as pretty-printed JSON.
pub fn to_json(record: &InterchangeRecord) -> Result<String, HyperweaveError> {
    serde_json::to_string_pretty(record)
        .map_err(|e| HyperweaveError::SerializationError(e.to_string()))
}

/// Parse and validate a JSON record.
pub fn from_json(text: &str) -> Result<InterchangeRecord, HyperweaveError> {
    let record: InterchangeRecord = serde_json::from_str(text)
        .map_err(|e| HyperweaveError::SerializationError(e.to_string()))?;
    record.validate()?;
    Ok(record)
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::attrs;
    use serde_json::json;

    #[test]
    fn hypergraph_round_trip() {
        let mut hg = Hypergraph::with_attrs(attrs([("name", "toy")]));
        hg.add_edges_from(vec![vec![1, 2, 3], vec![4]]).expect("edges");
        hg.add_node_with_attrs(9, attrs([("color", "red")])).expect("node");
        hg.set_edge_attr(&Id::from(0), "w", 2).expect("attr");

        let record = to_interchange(&hg).expect("export");
        let text = to_json(&record).expect("json");
        let back = from_interchange(&from_json(&text).expect("parse")).expect("import");

        let Network::Hypergraph(back) = back else {
            panic!("wrong family");
        };
        assert_eq!(back.members_map(), hg.members_map());
        assert_eq!(back.node_attrs(&Id::from(9)).expect("attrs"), &attrs([("color", "red")]));
        assert_eq!(back.edge_attrs(&Id::from(0)).expect("attrs")["w"], json!(2));
        assert_eq!(back.net_attrs()["name"], json!("toy"));
    }

    #[test]
    fn directed_round_trip() {
        let mut dh = DiHypergraph::new();
        dh.add_edges_from(vec![(vec![1, 2], vec![3]), (vec![3], vec![1])])
            .expect("edges");

        let record = to_interchange(&dh).expect("export");
        assert_eq!(record.network_type, NetworkKind::DiHypergraph);
        assert!(record.incidences.iter().all(|i| i.direction.is_some()));

        let Network::DiHypergraph(back) = from_interchange(&record).expect("import") else {
            panic!("wrong family");
        };
        let dir = back.as_directed().expect("directed");
        assert_eq!(dir.tail(&Id::from(0)).expect("tail").len(), 2);
        assert_eq!(dir.head(&Id::from(1)).expect("head"), &[Id::from(1)].into_iter().collect());
    }

    #[test]
    fn simplicial_round_trip_keeps_face_ids() {
        let mut sc = SimplicialComplex::new();
        sc.add_simplex(vec![1, 2, 3]).expect("simplex");
        sc.set_edge_attr(&Id::from(0), "top", true).expect("attr");

        let record = Network::from(sc.clone()).to_interchange().expect("export");
        let Network::Simplicial(back) = from_interchange(&record).expect("import") else {
            panic!("wrong family");
        };
        assert_eq!(back.members_map(), sc.members_map());
        assert_eq!(back.edge_attrs(&Id::from(0)).expect("attrs")["top"], json!(true));
        assert!(back.is_closed());
    }

    #[test]
    fn open_simplicial_record_keeps_every_simplex() {
        let open = json!({
            "network-type": "simplicial",
            "edges": [{"edge": 0}, {"edge": 1}],
            "incidences": [
                {"edge": 0, "node": 1}, {"edge": 0, "node": 2}, {"edge": 0, "node": 3},
                {"edge": 1, "node": 7}, {"edge": 1, "node": 8}, {"edge": 1, "node": 9}
            ]
        });
        let record = from_json(&open.to_string()).expect("parse");
        let Network::Simplicial(sc) = from_interchange(&record).expect("import") else {
            panic!("wrong family");
        };

        let ids = |v: &[i64]| v.iter().map(|&n| Id::from(n)).collect::<Vec<_>>();
        assert_eq!(sc.simplex_id(&ids(&[1, 2, 3])), Some(Id::from(0)));
        assert_eq!(sc.simplex_id(&ids(&[7, 8, 9])), Some(Id::from(1)));
        assert_eq!(sc.num_edges(), 8);
        assert!(sc.is_closed());
    }

    #[test]
    fn shrunken_simplices_survive_a_round_trip() {
        let mut sc = SimplicialComplex::new();
        sc.add_simplices_from(vec![vec![1, 2, 3], vec![3, 4], vec![3]], None)
            .expect("simplices");
        sc.remove_node(&Id::from(3)).expect("remove node");

        let record = to_interchange(&sc).expect("export");
        let Network::Simplicial(back) = from_interchange(&record).expect("import") else {
            panic!("wrong family");
        };
        assert_eq!(back.members_map(), sc.members_map());
        assert_eq!(record.edge_members(), sc.members_map());
    }

    #[test]
    fn repeated_edge_records_are_rejected() {
        let repeated = json!({
            "network-type": "hypergraph",
            "edges": [{"edge": 0}, {"edge": 0}],
            "incidences": []
        });
        assert!(matches!(
            from_json(&repeated.to_string()),
            Err(HyperweaveError::MalformedInput(_))
        ));
    }

    #[test]
    fn inconsistent_records_are_rejected() {
        let unknown_edge = json!({
            "network-type": "hypergraph",
            "edges": [{"edge": 0}],
            "incidences": [{"edge": 1, "node": 1}]
        });
        assert!(matches!(
            from_json(&unknown_edge.to_string()),
            Err(HyperweaveError::MalformedInput(_))
        ));

        let missing_direction = json!({
            "network-type": "dihypergraph",
            "edges": [{"edge": 0}],
            "incidences": [{"edge": 0, "node": 1}]
        });
        assert!(matches!(
            from_json(&missing_direction.to_string()),
            Err(HyperweaveError::MalformedInput(_))
        ));

        let stray_direction = json!({
            "network-type": "simplicial",
            "edges": [{"edge": 0}],
            "incidences": [{"edge": 0, "node": 1, "direction": "head"}]
        });
        assert!(matches!(
            from_json(&stray_direction.to_string()),
            Err(HyperweaveError::MalformedInput(_))
        ));

        assert!(matches!(
            from_json("{ not json"),
            Err(HyperweaveError::SerializationError(_))
        ));
    }
}
