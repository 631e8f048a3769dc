//! # File Loaders and Writers
//!
//! Text formats understood by the CLI:
//!
//! - `json`: an interchange record (any structure family)
//! - `edgelist`: one edge per line, members separated by whitespace or a
//!   chosen delimiter
//! - `pairs`: two columns per line, node then edge
//!
//! Blank lines and lines starting with `#` are skipped. Any other line that
//! cannot be parsed aborts the whole load; no partial structure is returned.

use clap::ValueEnum;
use hyperweave_core::{
    HypergraphRead, HyperweaveError, Id, Network, from_bipartite_pairs, from_edge_list,
    from_interchange, from_json, to_bipartite_pairs, to_edge_list, to_incidence_matrix,
    to_interchange, to_json,
};
use std::path::Path;

/// Maximum input file size (256 MB).
pub const MAX_INPUT_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Input file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum InputFormat {
    #[default]
    Json,
    Edgelist,
    Pairs,
}

/// Output format for `convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Edgelist,
    Pairs,
    Incidence,
}

/// How text tokens become identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NodeType {
    /// Every token must parse as an integer.
    #[default]
    Int,
    /// Tokens are kept as strings.
    Str,
}

impl NodeType {
    /// Coerce one token read from `line` (1-based).
    pub fn coerce(self, token: &str, line: usize) -> Result<Id, HyperweaveError> {
        match self {
            Self::Int => token.parse::<i64>().map(Id::from).map_err(|_| {
                HyperweaveError::MalformedInput(format!(
                    "line {line}: `{token}` is not an integer identifier"
                ))
            }),
            Self::Str => Ok(Id::from(token)),
        }
    }
}

/// Non-blank, non-comment lines with their 1-based numbers.
fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn tokens(line: &str, delimiter: Option<char>) -> Vec<&str> {
    match delimiter {
        Some(d) => line.split(d).map(str::trim).filter(|t| !t.is_empty()).collect(),
        None => line.split_whitespace().collect(),
    }
}

/// Parse an edge list.
pub fn parse_edgelist(
    text: &str,
    node_type: NodeType,
    delimiter: Option<char>,
) -> Result<Vec<Vec<Id>>, HyperweaveError> {
    data_lines(text)
        .map(|(number, line)| {
            tokens(line, delimiter)
                .into_iter()
                .map(|token| node_type.coerce(token, number))
                .collect()
        })
        .collect()
}

/// Parse a two-column pair file into `(node, edge)` rows. Both columns are
/// coerced with `node_type`.
pub fn parse_pairs(
    text: &str,
    node_type: NodeType,
    delimiter: Option<char>,
) -> Result<Vec<(Id, Id)>, HyperweaveError> {
    data_lines(text)
        .map(|(number, line)| match tokens(line, delimiter).as_slice() {
            [node, edge] => Ok((
                node_type.coerce(node, number)?,
                node_type.coerce(edge, number)?,
            )),
            other => Err(HyperweaveError::MalformedInput(format!(
                "line {number}: expected 2 columns, found {}",
                other.len()
            ))),
        })
        .collect()
}

/// Read a whole input file, refusing oversized ones.
pub fn read_input(path: &Path) -> Result<String, HyperweaveError> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        HyperweaveError::IoError(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    if metadata.len() > MAX_INPUT_FILE_SIZE {
        return Err(HyperweaveError::IoError(format!(
            "File size {} bytes exceeds maximum allowed {} bytes",
            metadata.len(),
            MAX_INPUT_FILE_SIZE
        )));
    }
    std::fs::read_to_string(path)
        .map_err(|e| HyperweaveError::IoError(format!("Cannot read '{}': {}", path.display(), e)))
}

/// Build a structure from text in `format`.
pub fn parse_network(
    text: &str,
    format: InputFormat,
    node_type: NodeType,
    delimiter: Option<char>,
) -> Result<Network, HyperweaveError> {
    let network = match format {
        InputFormat::Json => from_interchange(&from_json(text)?)?,
        InputFormat::Edgelist => {
            Network::from(from_edge_list(parse_edgelist(text, node_type, delimiter)?)?)
        }
        InputFormat::Pairs => {
            Network::from(from_bipartite_pairs(parse_pairs(text, node_type, delimiter)?)?)
        }
    };
    let net = network.as_read();
    tracing::info!(
        kind = %net.kind(),
        nodes = net.num_nodes(),
        edges = net.num_edges(),
        "loaded network"
    );
    Ok(network)
}

/// Load and build a structure from a file.
pub fn load_network(
    path: &Path,
    format: InputFormat,
    node_type: NodeType,
    delimiter: Option<char>,
) -> Result<Network, HyperweaveError> {
    let text = read_input(path)?;
    parse_network(&text, format, node_type, delimiter)
}

fn join(ids: impl IntoIterator<Item = impl ToString>) -> String {
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render a structure in `format`.
pub fn render_network(
    net: &dyn HypergraphRead,
    format: OutputFormat,
) -> Result<String, HyperweaveError> {
    let mut out = String::new();
    match format {
        OutputFormat::Json => out = to_json(&to_interchange(net)?)?,
        OutputFormat::Edgelist => {
            for members in to_edge_list(net) {
                out.push_str(&join(members));
                out.push('\n');
            }
        }
        OutputFormat::Pairs => {
            for (node, edge) in to_bipartite_pairs(net) {
                out.push_str(&format!("{node} {edge}\n"));
            }
        }
        OutputFormat::Incidence => {
            let matrix = to_incidence_matrix(net);
            out.push_str(&format!("node {}\n", join(&matrix.edges)));
            for (node, row) in matrix.nodes.iter().zip(&matrix.rows) {
                out.push_str(&format!("{node} {}\n", join(row)));
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edgelist_skips_comments_and_blanks() {
        let text = "# header\n1 2 3\n\n4\n5,6\n";
        let edges = parse_edgelist(text, NodeType::Str, None).expect("parse");
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2], vec![Id::from("5,6")]);

        let edges = parse_edgelist("5,6\n", NodeType::Int, Some(',')).expect("parse");
        assert_eq!(edges[0], vec![Id::from(5), Id::from(6)]);
    }

    #[test]
    fn bad_token_names_its_line() {
        let err = parse_edgelist("1 2\n3 x\n", NodeType::Int, None).expect_err("bad token");
        assert_eq!(
            err,
            HyperweaveError::MalformedInput("line 2: `x` is not an integer identifier".to_string())
        );
    }

    #[test]
    fn pairs_need_two_columns() {
        let rows = parse_pairs("1 a\n2 a\n", NodeType::Str, None).expect("parse");
        assert_eq!(rows[1], (Id::from("2"), Id::from("a")));

        assert!(matches!(
            parse_pairs("1 a b\n", NodeType::Str, None),
            Err(HyperweaveError::MalformedInput(_))
        ));
    }

    #[test]
    fn renders_each_form() {
        let network = parse_network("1 2\n2 3\n", InputFormat::Edgelist, NodeType::Int, None)
            .expect("parse");
        let net = network.as_read();

        assert_eq!(
            render_network(net, OutputFormat::Edgelist).expect("render"),
            "1 2\n2 3\n"
        );
        assert_eq!(
            render_network(net, OutputFormat::Pairs).expect("render"),
            "1 0\n2 0\n2 1\n3 1\n"
        );
        assert_eq!(
            render_network(net, OutputFormat::Incidence).expect("render"),
            "node 0 1\n1 1 0\n2 1 1\n3 0 1\n"
        );
    }
}
