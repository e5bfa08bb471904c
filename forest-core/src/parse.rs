//! Loader for textual forest descriptions.
//!
//! The format has three sections introduced by the literal marker lines
//! `trees:`, `nodes:` and `branches:`. Lines under `nodes:` are
//! `<1-based-index>, <name>`; lines under `branches:` are
//! `<parent-index>, <child-index>`, both referencing node declaration
//! order. A load either succeeds completely or fails with the first
//! offending line.

use crate::config::LayoutConfig;
use crate::forest::Forest;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("line {line}: malformed input line: {content:?}")]
    MalformedLine { line: usize, content: String },
    #[error("line {line}: branch references node {index}, but only {count} nodes are declared")]
    DanglingEdge {
        line: usize,
        index: u32,
        count: usize,
    },
}

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Preamble,
    Trees,
    Nodes,
    Branches,
}

/// Parses a full forest description into a [`Forest`].
///
/// Nodes receive their pre-layout position (a column down the left edge)
/// and an estimated label width from `cfg`; a renderer may re-measure the
/// widths with real font metrics before layout runs.
pub fn parse_forest(text: &str, cfg: &LayoutConfig) -> Result<Forest, ParseError> {
    let mut forest = Forest::new();
    let mut section = Section::Preamble;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }

        match line {
            "trees:" => {
                section = Section::Trees;
                continue;
            }
            "nodes:" => {
                section = Section::Nodes;
                continue;
            }
            "branches:" => {
                section = Section::Branches;
                continue;
            }
            _ => {}
        }

        match section {
            // Tree titles are informational; the trees themselves emerge
            // from the branch edges.
            Section::Trees => {}
            Section::Nodes => node_line(&mut forest, cfg, line, line_no)?,
            Section::Branches => branch_line(&mut forest, line, line_no)?,
            Section::Preamble => return Err(malformed(line_no, line)),
        }
    }

    log::debug!("loaded forest with {} nodes", forest.nodes.len());
    Ok(forest)
}

fn malformed(line: usize, content: &str) -> ParseError {
    ParseError::MalformedLine {
        line,
        content: content.to_string(),
    }
}

fn node_line(
    forest: &mut Forest,
    cfg: &LayoutConfig,
    line: &str,
    line_no: usize,
) -> Result<(), ParseError> {
    let Some((index, name)) = line.split_once(", ") else {
        return Err(malformed(line_no, line));
    };
    if name.is_empty() {
        return Err(malformed(line_no, line));
    }
    let id: u32 = index
        .trim()
        .parse()
        .map_err(|_| malformed(line_no, line))?;

    let initial = cfg.initial_position(forest.nodes.len());
    forest.add_node(id, name.to_string(), initial, cfg.label_width(name));
    Ok(())
}

fn branch_line(forest: &mut Forest, line: &str, line_no: usize) -> Result<(), ParseError> {
    let Some((left, right)) = line.split_once(", ") else {
        return Err(malformed(line_no, line));
    };
    let parent_index: u32 = left
        .trim()
        .parse()
        .map_err(|_| malformed(line_no, line))?;
    let child_index: u32 = right
        .trim()
        .parse()
        .map_err(|_| malformed(line_no, line))?;

    let count = forest.nodes.len();
    let dangling = |index| ParseError::DanglingEdge {
        line: line_no,
        index,
        count,
    };
    let parent = forest
        .by_input_index(parent_index)
        .ok_or_else(|| dangling(parent_index))?;
    let child = forest
        .by_input_index(child_index)
        .ok_or_else(|| dangling(child_index))?;

    forest.link(parent, child);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    const SAMPLE: &str = "\
trees:
broadleaf
nodes:
1, Oak
2, Ash
3, Elm
branches:
1, 2
1, 3
";

    #[test]
    fn parses_nodes_and_branches() {
        let cfg = LayoutConfig::default();
        let forest = parse_forest(SAMPLE, &cfg).expect("sample should load");

        assert_eq!(forest.nodes.len(), 3);
        assert_eq!(forest.nodes[0].name, "Oak");
        assert_eq!(forest.nodes[0].id, 1);

        // Edges reference declaration order, recorded in both directions.
        assert_eq!(forest.nodes[0].children, vec![1, 2]);
        assert_eq!(forest.nodes[1].parents, vec![0]);
        assert_eq!(forest.nodes[2].parents, vec![0]);

        // Only Oak has no parents.
        assert_eq!(forest.roots(), vec![0]);
    }

    #[test]
    fn initial_positions_stack_down_the_left_edge() {
        let cfg = LayoutConfig::default();
        let forest = parse_forest(SAMPLE, &cfg).expect("sample should load");

        for (i, node) in forest.nodes.iter().enumerate() {
            let expected = IVec2::new(cfg.initial_x, cfg.root_y0 + cfg.node_height * i as i32);
            assert_eq!(node.pos, expected, "node {} starts in the load column", i);
            assert_eq!(node.view_pos, node.pos);
        }
    }

    #[test]
    fn label_width_estimate_is_seeded_from_config() {
        let cfg = LayoutConfig::default();
        let forest = parse_forest(SAMPLE, &cfg).expect("sample should load");

        assert_eq!(forest.nodes[0].display_width, cfg.label_width("Oak"));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let cfg = LayoutConfig::default();
        let text = "nodes:\n\n1, Oak\n\nbranches:\n\n";
        let forest = parse_forest(text, &cfg).expect("blank lines are tolerated");
        assert_eq!(forest.nodes.len(), 1);
    }

    #[test]
    fn non_integer_node_index_fails_the_load() {
        let cfg = LayoutConfig::default();
        let err = parse_forest("nodes:\nfirst, Oak\n", &cfg).unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedLine {
                line: 2,
                content: "first, Oak".to_string(),
            }
        );
    }

    #[test]
    fn missing_field_separator_fails_the_load() {
        let cfg = LayoutConfig::default();
        let err = parse_forest("nodes:\n1 Oak\n", &cfg).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn branch_to_undeclared_node_fails_the_load() {
        let cfg = LayoutConfig::default();
        let text = "nodes:\n1, Oak\n2, Ash\nbranches:\n1, 9\n";
        let err = parse_forest(text, &cfg).unwrap_err();
        assert_eq!(
            err,
            ParseError::DanglingEdge {
                line: 5,
                index: 9,
                count: 2,
            }
        );
    }

    #[test]
    fn data_before_any_section_marker_fails_the_load() {
        let cfg = LayoutConfig::default();
        let err = parse_forest("1, Oak\n", &cfg).unwrap_err();
        assert!(matches!(err, ParseError::MalformedLine { line: 1, .. }));
    }
}
