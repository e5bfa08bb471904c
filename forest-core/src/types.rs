/// Identifier for a node in a [`crate::forest::Forest`].
///
/// This is an index into `Forest::nodes`, and is only meaningful within
/// the lifetime of a given `Forest` instance.
pub type NodeId = usize;
