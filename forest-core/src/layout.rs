//! Recursive placement of forest nodes.
//!
//! The traversal visits every root in name order and walks each tree
//! depth-first:
//! 1. the node is assigned a position from its parent's position and the
//!    running leaf count, then the partial layout is published,
//! 2. recursion descends into the node's name-sorted, unvisited children,
//! 3. once fresh children have been placed, the node is re-centered
//!    vertically between its first and last descendant leaf and the
//!    corrected layout is published again.
//!
//! The leaf counter and the baseline row are traversal state owned by one
//! [`layout`] invocation, so repeated runs are independent.

use crate::{config::LayoutConfig, forest::Forest, publish::LayoutPublisher, types::NodeId};
use glam::IVec2;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LayoutError {
    #[error("forest has no root node to start the layout from")]
    EmptyForest,
}

/// Traversal state for a single [`layout`] run.
struct Pass {
    /// Count of leaves (and leaf-equivalent shared parents) placed so far;
    /// drives vertical spacing and only ever increases.
    leaf_count: i32,
    /// Row established by the first root; every later Y hangs off it.
    baseline_y: Option<i32>,
}

/// Lays out the whole forest, publishing each partial state.
///
/// Roots are processed in name order. Roots already visited by an earlier
/// run are skipped, so calling this again without
/// [`Forest::reset_layout`] leaves the forest unchanged and returns 0.
///
/// Returns the number of leaf rows placed.
pub fn layout(
    forest: &mut Forest,
    cfg: &LayoutConfig,
    publisher: &mut LayoutPublisher,
) -> Result<i32, LayoutError> {
    let roots = forest.roots();
    if roots.is_empty() {
        return Err(LayoutError::EmptyForest);
    }

    let mut pass = Pass {
        leaf_count: 0,
        baseline_y: None,
    };
    for root in roots {
        if !forest.nodes[root].visited {
            log::debug!("laying out tree rooted at {:?}", forest.nodes[root].name);
            place(forest, root, None, cfg, &mut pass, publisher);
        }
    }
    Ok(pass.leaf_count)
}

/// Places one node, recurses into its children, and re-centers it.
fn place(
    forest: &mut Forest,
    id: NodeId,
    parent: Option<NodeId>,
    cfg: &LayoutConfig,
    pass: &mut Pass,
    publisher: &mut LayoutPublisher,
) {
    forest.nodes[id].visited = true;

    let pos = model_position(forest, parent, cfg, pass);
    forest.nodes[id].pos = pos;
    forest.nodes[id].view_pos = pos;
    publisher.publish(forest);

    if forest.nodes[id].children.is_empty() {
        pass.leaf_count += 1;
    }

    forest.sort_children_by_name(id);
    let children = forest.nodes[id].children.clone();

    // Vacuously true for a leaf; the extra count below still requires
    // children. A non-leaf whose children were all placed under an earlier
    // sibling contributes no fresh leaves, so it takes one spacing row of
    // its own.
    let all_children_pre_visited = children.iter().all(|&c| forest.nodes[c].visited);
    if all_children_pre_visited && !children.is_empty() {
        pass.leaf_count += 1;
    }

    for &child in &children {
        if !forest.nodes[child].visited {
            place(forest, child, Some(id), cfg, pass, publisher);
        }
    }

    if !all_children_pre_visited {
        recenter(forest, id);
        publisher.publish(forest);
    }
}

/// Model position for a node about to be placed.
fn model_position(
    forest: &Forest,
    parent: Option<NodeId>,
    cfg: &LayoutConfig,
    pass: &mut Pass,
) -> IVec2 {
    match parent {
        None => {
            let y = cfg.root_y0 + cfg.node_height * pass.leaf_count;
            pass.baseline_y.get_or_insert(y);
            IVec2::new(cfg.root_x, y)
        }
        Some(pid) => {
            let p = &forest.nodes[pid];
            let baseline = pass
                .baseline_y
                .expect("children are always placed after some root");
            IVec2::new(
                p.pos.x + p.display_width + cfg.inner_margin + cfg.node_distance,
                baseline + cfg.node_height * pass.leaf_count,
            )
        }
    }
}

/// Moves a node's view position to the midpoint of its first and last
/// descendant leaf rows. X stays put; the model position is untouched.
fn recenter(forest: &mut Forest, id: NodeId) {
    let first = first_leaf_y(forest, id);
    let last = last_leaf_y(forest, id);
    let node = &mut forest.nodes[id];
    node.view_pos = IVec2::new(node.pos.x, (first + last) / 2);
}

/// Y of the leaf reached by always descending into the first child.
fn first_leaf_y(forest: &Forest, id: NodeId) -> i32 {
    let children = &forest.nodes[id].children;
    assert!(!children.is_empty(), "first_leaf_y called on a leaf node");
    let first = children[0];
    if forest.nodes[first].children.is_empty() {
        forest.nodes[first].pos.y
    } else {
        first_leaf_y(forest, first)
    }
}

/// Y of the leaf reached by always descending into the last child.
fn last_leaf_y(forest: &Forest, id: NodeId) -> i32 {
    let children = &forest.nodes[id].children;
    assert!(!children.is_empty(), "last_leaf_y called on a leaf node");
    let last = children[children.len() - 1];
    if forest.nodes[last].children.is_empty() {
        forest.nodes[last].pos.y
    } else {
        last_leaf_y(forest, last)
    }
}
