//! Name → strategy lookup.

use std::collections::BTreeMap;
use std::fmt;

use rn_core::NodeId;
use rn_network::SimplifiedGraph;

use crate::{
    AStarSearch, DijkstraSearch, GreedyBestFirstSearch, Path, PathSearch, SearchError,
    SearchResult, UniformCostSearch,
};

/// Registry of path-search strategies keyed by name.
///
/// Names are matched exactly (case-sensitive).  Iteration order is
/// alphabetical so listings are stable.
#[derive(Default)]
pub struct AlgorithmRegistry {
    strategies: BTreeMap<String, Box<dyn PathSearch>>,
}

impl AlgorithmRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the four built-in strategies under their own names.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(DijkstraSearch);
        registry.register(AStarSearch);
        registry.register(UniformCostSearch);
        registry.register(GreedyBestFirstSearch);
        registry
    }

    /// Register `strategy` under [`PathSearch::name`], replacing any strategy
    /// already registered under that name.
    pub fn register<S: PathSearch + 'static>(&mut self, strategy: S) {
        let name = strategy.name().to_string();
        self.register_as(name, Box::new(strategy));
    }

    /// Register `strategy` under an explicit name.
    pub fn register_as(&mut self, name: impl Into<String>, strategy: Box<dyn PathSearch>) {
        self.strategies.insert(name.into(), strategy);
    }

    pub fn get(&self, name: &str) -> SearchResult<&dyn PathSearch> {
        self.strategies
            .get(name)
            .map(|s| s.as_ref())
            .ok_or_else(|| SearchError::InvalidAlgorithm(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.strategies.contains_key(name)
    }

    /// Registered names, alphabetically.
    pub fn names(&self) -> Vec<&str> {
        self.strategies.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run the strategy registered as `name`.
    ///
    /// Fails with `InvalidAlgorithm` for an unknown name and `NodeNotFound`
    /// when either endpoint is outside `graph`.  An unreachable goal is
    /// `Ok(None)`, not an error.
    pub fn search(
        &self,
        name:  &str,
        graph: &SimplifiedGraph,
        start: NodeId,
        goal:  NodeId,
    ) -> SearchResult<Option<Path>> {
        let strategy = self.get(name)?;
        for node in [start, goal] {
            if !graph.contains_node(node) {
                return Err(SearchError::NodeNotFound(node));
            }
        }
        Ok(strategy.search(graph, start, goal))
    }
}

impl fmt::Debug for AlgorithmRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlgorithmRegistry").field("names", &self.names()).finish()
    }
}
