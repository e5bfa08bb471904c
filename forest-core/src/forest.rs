use crate::types::NodeId;
use glam::IVec2;

/// A single labeled node of the forest.
///
/// `pos` is the model position computed during placement; `view_pos` is
/// what renderers draw and may be overwritten once by re-centering.
#[derive(Debug)]
pub struct Node {
    /// 1-based identifier from the `nodes:` section.
    pub id: u32,
    pub name: String,
    pub pos: IVec2,
    pub view_pos: IVec2,
    /// Pixel width of the rendered label box.
    pub display_width: i32,
    /// Set once the layout engine has placed this node; guards re-entry
    /// through children shared by several parents.
    pub visited: bool,
    pub parents: Vec<NodeId>,
    pub children: Vec<NodeId>,
}

/// Owns every node of the forest; edges are index references.
///
/// Nodes are stored in declaration order and never removed, so a `NodeId`
/// stays valid for the lifetime of the store. Name ordering is a separate
/// presentation concern, see [`Forest::presentation_order`].
#[derive(Debug, Default)]
pub struct Forest {
    pub nodes: Vec<Node>,
}

impl Forest {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Appends a node and returns its id.
    pub fn add_node(
        &mut self,
        id: u32,
        name: String,
        initial_pos: IVec2,
        display_width: i32,
    ) -> NodeId {
        let node_id = self.nodes.len();
        self.nodes.push(Node {
            id,
            name,
            pos: initial_pos,
            view_pos: initial_pos,
            display_width,
            visited: false,
            parents: Vec::new(),
            children: Vec::with_capacity(4),
        });
        node_id
    }

    /// Records a parent/child edge in both directions.
    ///
    /// No cycle or duplicate-parent validation happens here; malformed
    /// input yields an undefined traversal order, not an error.
    pub fn link(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent].children.push(child);
        self.nodes[child].parents.push(parent);
    }

    /// Resolves a 1-based declaration index from the input file.
    pub fn by_input_index(&self, index: u32) -> Option<NodeId> {
        if index >= 1 && (index as usize) <= self.nodes.len() {
            Some(index as usize - 1)
        } else {
            None
        }
    }

    /// All node ids, sorted by name.
    pub fn presentation_order(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = (0..self.nodes.len()).collect();
        ids.sort_by(|&a, &b| self.nodes[a].name.cmp(&self.nodes[b].name));
        ids
    }

    /// Parentless nodes in name order; the layout entry points.
    pub fn roots(&self) -> Vec<NodeId> {
        self.presentation_order()
            .into_iter()
            .filter(|&id| self.nodes[id].parents.is_empty())
            .collect()
    }

    /// Re-sorts one node's children by name, ascending.
    pub fn sort_children_by_name(&mut self, id: NodeId) {
        let mut children = std::mem::take(&mut self.nodes[id].children);
        children.sort_by(|&a, &b| self.nodes[a].name.cmp(&self.nodes[b].name));
        self.nodes[id].children = children;
    }

    /// Clears the per-run visited flags so a fresh layout can be made.
    pub fn reset_layout(&mut self) {
        for node in &mut self.nodes {
            node.visited = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::IVec2;

    fn plain_node(forest: &mut Forest, id: u32, name: &str) -> NodeId {
        forest.add_node(id, name.to_string(), IVec2::new(10, 30), 20)
    }

    #[test]
    fn link_records_edge_in_both_directions() {
        let mut forest = Forest::new();
        let oak = plain_node(&mut forest, 1, "Oak");
        let ash = plain_node(&mut forest, 2, "Ash");

        forest.link(oak, ash);

        assert_eq!(forest.nodes[oak].children, vec![ash]);
        assert_eq!(forest.nodes[ash].parents, vec![oak]);
        assert!(forest.nodes[ash].children.is_empty());
    }

    #[test]
    fn by_input_index_resolves_declaration_order() {
        let mut forest = Forest::new();
        // The id column is carried verbatim; resolution goes by position.
        plain_node(&mut forest, 7, "Oak");
        plain_node(&mut forest, 3, "Ash");

        assert_eq!(forest.by_input_index(1), Some(0));
        assert_eq!(forest.by_input_index(2), Some(1));
        assert_eq!(forest.by_input_index(0), None);
        assert_eq!(forest.by_input_index(3), None);
    }

    #[test]
    fn roots_are_parentless_and_name_sorted() {
        let mut forest = Forest::new();
        let willow = plain_node(&mut forest, 1, "Willow");
        let ash = plain_node(&mut forest, 2, "Ash");
        let elm = plain_node(&mut forest, 3, "Elm");
        forest.link(willow, elm);

        assert_eq!(forest.roots(), vec![ash, willow]);
    }

    #[test]
    fn presentation_order_sorts_all_nodes_by_name() {
        let mut forest = Forest::new();
        let c = plain_node(&mut forest, 1, "Cedar");
        let a = plain_node(&mut forest, 2, "Alder");
        let b = plain_node(&mut forest, 3, "Beech");

        assert_eq!(forest.presentation_order(), vec![a, b, c]);
    }

    #[test]
    fn sort_children_by_name_reorders_in_place() {
        let mut forest = Forest::new();
        let root = plain_node(&mut forest, 1, "Root");
        let pine = plain_node(&mut forest, 2, "Pine");
        let birch = plain_node(&mut forest, 3, "Birch");
        forest.link(root, pine);
        forest.link(root, birch);

        forest.sort_children_by_name(root);

        assert_eq!(forest.nodes[root].children, vec![birch, pine]);
    }

    #[test]
    fn reset_layout_clears_visited_flags() {
        let mut forest = Forest::new();
        let id = plain_node(&mut forest, 1, "Oak");
        forest.nodes[id].visited = true;

        forest.reset_layout();

        assert!(!forest.nodes[id].visited);
    }
}
