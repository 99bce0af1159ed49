//! Transitive containment between classifier placements.
//!
//! Containment relationships form a directed graph from parent to child. The
//! hierarchy answers ancestor queries over its transitive closure; cycles are
//! tolerated and simply make their members ancestors of each other.

use std::collections::HashSet;

use log::debug;
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::{Dfs, Walker},
};

use super::data::{ClassifierIndex, LayoutData, LayoutRelationship};

/// Returns true if the relationship nests one placement inside another
pub(crate) fn is_nesting(relationship: &LayoutRelationship<'_>) -> bool {
    relationship.relationship().kind().is_containment()
        && relationship.from_classifier() != relationship.to_classifier()
}

#[derive(Debug)]
pub(crate) struct ContainmentHierarchy {
    graph: DiGraph<ClassifierIndex, ()>,
    descendants: Vec<HashSet<ClassifierIndex>>,
}

impl ContainmentHierarchy {
    pub(crate) fn new(data: &LayoutData<'_>) -> Self {
        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = data
            .classifier_indices()
            .map(|index| graph.add_node(index))
            .collect();

        for relationship in data.relationships().iter().filter(|r| is_nesting(r)) {
            graph.update_edge(
                nodes[relationship.from_classifier().index()],
                nodes[relationship.to_classifier().index()],
                (),
            );
        }

        let descendants: Vec<HashSet<ClassifierIndex>> = nodes
            .iter()
            .map(|&start| {
                Dfs::new(&graph, start)
                    .iter(&graph)
                    .filter(|&node| node != start)
                    .map(|node| graph[node])
                    .collect()
            })
            .collect();

        debug!(
            placements = nodes.len(),
            nestings = graph.edge_count();
            "Built containment hierarchy"
        );
        Self { graph, descendants }
    }

    /// Returns true if `descendant` is transitively contained in `ancestor`
    pub(crate) fn is_ancestor(
        &self,
        ancestor: ClassifierIndex,
        descendant: ClassifierIndex,
    ) -> bool {
        self.descendants
            .get(ancestor.index())
            .is_some_and(|set| set.contains(&descendant))
    }

    pub(crate) fn descendant_count(&self, index: ClassifierIndex) -> usize {
        self.descendants.get(index.index()).map_or(0, HashSet::len)
    }

    /// Returns true if the placements are identical or one contains the other
    pub(crate) fn are_related(&self, a: ClassifierIndex, b: ClassifierIndex) -> bool {
        a == b || self.is_ancestor(a, b) || self.is_ancestor(b, a)
    }

    /// Returns true if both placements contain each other
    pub(crate) fn is_cyclic(&self, a: ClassifierIndex, b: ClassifierIndex) -> bool {
        self.is_ancestor(a, b) && self.is_ancestor(b, a)
    }

    /// Returns the placement itself and all of its ancestors
    pub(crate) fn lineage(&self, index: ClassifierIndex) -> impl Iterator<Item = ClassifierIndex> {
        self.graph
            .node_weights()
            .copied()
            .filter(move |&other| other == index || self.is_ancestor(other, index))
    }
}
