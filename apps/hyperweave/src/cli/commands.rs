//! # CLI Command Implementations
//!
//! Each command reads through `&dyn HypergraphRead` and returns the text to
//! print, either human-readable or JSON.

use crate::loaders::{OutputFormat, render_network};
use hyperweave_core::{
    EntityKind, FilterArg, FilterMode, HypergraphRead, HyperweaveError, IdView, SimplicialityParams,
    StatSpec, StatValue, connected_components, density, edit_simpliciality,
    face_edit_simpliciality, is_connected, simplicial_fraction, unique_edge_sizes,
};
use serde_json::{Map, Value, json};
use std::path::Path;

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_default()
}

// =============================================================================
// FILTER PARSING
// =============================================================================

/// Parse a literal from the command line: integer, float, boolean or string.
pub fn parse_value(token: &str) -> StatValue {
    if let Ok(i) = token.parse::<i64>() {
        return StatValue::Int(i);
    }
    if let Ok(x) = token.parse::<f64>() {
        return StatValue::Float(x);
    }
    match token {
        "true" => StatValue::Attr(Value::Bool(true)),
        "false" => StatValue::Attr(Value::Bool(false)),
        other => StatValue::from(other),
    }
}

/// Parse `"<stat> <mode> <value>[,<value>]"`. The stat spec may itself
/// contain spaces inside its parentheses.
pub fn parse_filter(text: &str) -> Result<(StatSpec, FilterMode, FilterArg), HyperweaveError> {
    let malformed = || {
        HyperweaveError::MalformedInput(format!(
            "filter `{text}` is not `<stat> <mode> <value>[,<value>]`"
        ))
    };
    let mut parts = text.trim().rsplitn(3, char::is_whitespace);
    let value = parts.next().ok_or_else(malformed)?;
    let mode: FilterMode = parts.next().ok_or_else(malformed)?.parse()?;
    let spec: StatSpec = parts.next().ok_or_else(malformed)?.trim().parse()?;

    let arg = match value.split_once(',') {
        Some((lo, hi)) => FilterArg::range(parse_value(lo), parse_value(hi)),
        None => FilterArg::from(parse_value(value)),
    };
    mode.check(&arg)?;
    Ok((spec, mode, arg))
}

// =============================================================================
// INFO COMMAND
// =============================================================================

/// Summarize the structure.
pub fn cmd_info(net: &dyn HypergraphRead, json_mode: bool) -> Result<String, HyperweaveError> {
    let sizes = unique_edge_sizes(net);
    let components = connected_components(net).len();
    let connected = is_connected(net);
    let dens = density(net, None, false);

    if json_mode {
        return Ok(pretty(&json!({
            "type": net.kind(),
            "nodes": net.num_nodes(),
            "edges": net.num_edges(),
            "edge_sizes": sizes,
            "components": components,
            "connected": connected,
            "density": dens,
        })));
    }

    let mut out = String::new();
    out.push_str("Hyperweave Network Summary\n");
    out.push_str("==========================\n");
    out.push_str(&format!("Type:        {}\n", net.kind()));
    out.push_str(&format!("Nodes:       {}\n", net.num_nodes()));
    out.push_str(&format!("Edges:       {}\n", net.num_edges()));
    out.push_str(&format!("Edge sizes:  {sizes:?}\n"));
    out.push_str(&format!("Components:  {components}\n"));
    out.push_str(&format!("Connected:   {connected}\n"));
    out.push_str(&format!("Density:     {dens:.6}\n"));
    Ok(out)
}

// =============================================================================
// STATS COMMAND
// =============================================================================

/// Evaluate stats over a (possibly filtered) bunch.
pub fn cmd_stats(
    net: &dyn HypergraphRead,
    json_mode: bool,
    kind: EntityKind,
    stats: &[String],
    filter: Option<&str>,
) -> Result<String, HyperweaveError> {
    let mut bunch = IdView::new(net, kind);
    if let Some(text) = filter {
        let (spec, mode, arg) = parse_filter(text)?;
        bunch = bunch.filterby(spec, arg, mode)?;
        tracing::debug!(filter = text, kept = bunch.len(), "filtered bunch");
    }

    let multi = bunch.multi(stats.iter().map(String::as_str))?;
    let records = multi.as_map()?;

    if json_mode {
        let mut object = Map::new();
        for (id, record) in records {
            let mut row = Map::new();
            for (name, value) in record {
                row.insert(name, serde_json::to_value(value).unwrap_or(Value::Null));
            }
            object.insert(id.to_string(), Value::Object(row));
        }
        return Ok(pretty(&Value::Object(object)));
    }

    let mut out = format!("{}\t{}\n", kind, multi.names().join("\t"));
    for (id, record) in records {
        let values: Vec<String> = record.iter().map(|(_, v)| v.to_string()).collect();
        out.push_str(&format!("{id}\t{}\n", values.join("\t")));
    }
    Ok(out)
}

// =============================================================================
// HIST COMMAND
// =============================================================================

/// Histogram of one stat.
pub fn cmd_hist(
    net: &dyn HypergraphRead,
    json_mode: bool,
    kind: EntityKind,
    stat: &str,
    bins: Option<usize>,
    density: bool,
) -> Result<String, HyperweaveError> {
    let hist = IdView::new(net, kind).stat(stat)?.ashist(bins, density)?;

    if json_mode {
        return Ok(pretty(&serde_json::to_value(&hist).unwrap_or(Value::Null)));
    }

    let mut out = String::from("center\tlo\thi\tvalue\n");
    for bin in hist {
        out.push_str(&format!(
            "{}\t{}\t{}\t{}\n",
            bin.center, bin.lo, bin.hi, bin.value
        ));
    }
    Ok(out)
}

// =============================================================================
// SIMPLICIALITY COMMAND
// =============================================================================

/// Simplicial fraction, edit and face-edit simpliciality.
pub fn cmd_simpliciality(
    net: &dyn HypergraphRead,
    json_mode: bool,
    params: SimplicialityParams,
) -> Result<String, HyperweaveError> {
    let fraction = simplicial_fraction(net, params);
    let edit = edit_simpliciality(net, params);
    let face_edit = face_edit_simpliciality(net, params);

    if json_mode {
        return Ok(pretty(&json!({
            "min_size": params.min_size,
            "exclude_min_size": params.exclude_min_size,
            "simplicial_fraction": fraction,
            "edit_simpliciality": edit,
            "face_edit_simpliciality": face_edit,
        })));
    }

    Ok(format!(
        "Simplicial fraction:      {fraction:.6}\n\
         Edit simpliciality:       {edit:.6}\n\
         Face-edit simpliciality:  {face_edit:.6}\n"
    ))
}

// =============================================================================
// COMPONENTS COMMAND
// =============================================================================

/// Connected components, one per line.
pub fn cmd_components(
    net: &dyn HypergraphRead,
    json_mode: bool,
) -> Result<String, HyperweaveError> {
    let components = connected_components(net);

    if json_mode {
        return Ok(pretty(&json!(components)));
    }

    let mut out = String::new();
    for (i, component) in components.iter().enumerate() {
        let ids: Vec<String> = component.iter().map(ToString::to_string).collect();
        out.push_str(&format!("{i}: {}\n", ids.join(" ")));
    }
    Ok(out)
}

// =============================================================================
// CONVERT COMMAND
// =============================================================================

/// Render the structure in `to`, writing to `output` or returning the text.
pub fn cmd_convert(
    net: &dyn HypergraphRead,
    to: OutputFormat,
    output: Option<&Path>,
) -> Result<String, HyperweaveError> {
    let rendered = render_network(net, to)?;
    let Some(path) = output else {
        return Ok(rendered);
    };

    std::fs::write(path, &rendered).map_err(|e| {
        HyperweaveError::IoError(format!("Cannot write '{}': {}", path.display(), e))
    })?;
    tracing::info!(path = %path.display(), format = ?to, "wrote network");
    Ok(format!("Wrote {}\n", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyperweave_core::{Hypergraph, Id};

    fn sample() -> Hypergraph {
        let mut hg = Hypergraph::new();
        hg.add_edges_from(vec![vec![1, 2, 3], vec![4], vec![5, 6], vec![6, 7, 8]])
            .expect("edges");
        hg
    }

    #[test]
    fn literals_parse_by_shape() {
        assert_eq!(parse_value("2"), StatValue::Int(2));
        assert_eq!(parse_value("2.5"), StatValue::Float(2.5));
        assert_eq!(parse_value("red"), StatValue::from("red"));
    }

    #[test]
    fn filters_parse_with_spaced_specs() {
        let (spec, mode, arg) =
            parse_filter("degree(order=1, weight=w) between 1,3").expect("parse");
        assert_eq!(spec.name(), "degree");
        assert_eq!(mode, FilterMode::Between);
        assert_eq!(arg, FilterArg::range(1, 3));

        assert!(matches!(
            parse_filter("degree"),
            Err(HyperweaveError::MalformedInput(_))
        ));
        assert!(matches!(
            parse_filter("degree about 2"),
            Err(HyperweaveError::InvalidFilterMode(_))
        ));
    }

    #[test]
    fn stats_json_is_keyed_by_id() {
        let hg = sample();
        let text = cmd_stats(
            &hg,
            true,
            EntityKind::Node,
            &["degree".to_string()],
            Some("degree eq 2"),
        )
        .expect("stats");

        let value: Value = serde_json::from_str(&text).expect("json");
        assert_eq!(value, json!({"6": {"degree": 2}}));
    }

    #[test]
    fn components_in_text() {
        let hg = sample();
        let text = cmd_components(&hg, false).expect("components");
        assert_eq!(text, "0: 1 2 3\n1: 4\n2: 5 6 7 8\n");
        assert!(hg.has_node(&Id::from(8)));
    }
}
