// src/dag/graph.rs

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::errors::ScheduleError;
use crate::stage::{StageId, StageTemplate};

/// Internal node structure: stores immediate deps and dependents as indices
/// into the template slice.
#[derive(Debug, Clone, Default)]
struct StageNode {
    deps: Vec<usize>,
    dependents: Vec<usize>,
}

/// A dependency id that does not name any stage in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingEdge {
    pub stage: StageId,
    pub dependency: StageId,
}

/// In-memory dependency graph over a template slice.
///
/// Nodes are positions in the slice, so the catalog order is always
/// recoverable. Dependency ids that name no stage are kept aside as
/// [`DanglingEdge`]s and never become edges.
#[derive(Debug, Clone)]
pub struct StageGraph {
    ids: Vec<StageId>,
    index: HashMap<StageId, usize>,
    nodes: Vec<StageNode>,
    dangling: Vec<DanglingEdge>,
    duplicates: Vec<StageId>,
}

impl StageGraph {
    pub fn from_templates(templates: &[StageTemplate]) -> Self {
        let mut index: HashMap<StageId, usize> = HashMap::with_capacity(templates.len());
        let mut duplicates = Vec::new();

        for (i, t) in templates.iter().enumerate() {
            if index.contains_key(&t.id) {
                duplicates.push(t.id.clone());
            } else {
                index.insert(t.id.clone(), i);
            }
        }

        let mut nodes = vec![StageNode::default(); templates.len()];
        let mut dangling = Vec::new();

        for (i, t) in templates.iter().enumerate() {
            let mut seen = HashSet::new();
            for dep in &t.dependencies {
                match index.get(dep) {
                    Some(&d) => {
                        if seen.insert(d) {
                            nodes[i].deps.push(d);
                            nodes[d].dependents.push(i);
                        }
                    }
                    None => dangling.push(DanglingEdge {
                        stage: t.id.clone(),
                        dependency: dep.clone(),
                    }),
                }
            }
        }

        Self {
            ids: templates.iter().map(|t| t.id.clone()).collect(),
            index,
            nodes,
            dangling,
            duplicates,
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Stage ids in catalog order.
    pub fn stages(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(|s| s.as_str())
    }

    /// Immediate, resolvable dependencies of a stage.
    pub fn dependencies_of(&self, id: &str) -> Vec<&str> {
        self.lookup(id)
            .map(|i| self.nodes[i].deps.iter().map(|&d| self.ids[d].as_str()).collect())
            .unwrap_or_default()
    }

    /// Immediate dependents of a stage (stages listing it as a dependency).
    pub fn dependents_of(&self, id: &str) -> Vec<&str> {
        self.lookup(id)
            .map(|i| {
                self.nodes[i]
                    .dependents
                    .iter()
                    .map(|&d| self.ids[d].as_str())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every stage a change to `id` may cascade into, in catalog order.
    pub fn downstream_of(&self, id: &str) -> Vec<&str> {
        let Some(start) = self.lookup(id) else {
            return Vec::new();
        };

        let mut visited = vec![false; self.nodes.len()];
        let mut stack = self.nodes[start].dependents.clone();

        while let Some(i) = stack.pop() {
            if visited[i] {
                continue;
            }
            visited[i] = true;
            stack.extend(self.nodes[i].dependents.iter().copied());
        }

        visited
            .iter()
            .enumerate()
            .filter(|&(i, &v)| v && i != start)
            .map(|(i, _)| self.ids[i].as_str())
            .collect()
    }

    /// Dependency ids that name no stage.
    pub fn unknown_dependencies(&self) -> &[DanglingEdge] {
        &self.dangling
    }

    /// Ids that occur more than once in the catalog (second and later hits).
    pub fn duplicate_ids(&self) -> &[StageId] {
        &self.duplicates
    }

    /// Fail with [`ScheduleError::CycleDetected`] if the dependency edges are
    /// not a DAG. Self-dependencies count as cycles.
    pub fn check_acyclic(&self) -> Result<(), ScheduleError> {
        // Edge direction: dep -> stage.
        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();

        for i in 0..self.nodes.len() {
            graph.add_node(i);
        }
        for (i, node) in self.nodes.iter().enumerate() {
            for &d in &node.deps {
                graph.add_edge(d, i, ());
            }
        }

        match toposort(&graph, None) {
            Ok(_) => Ok(()),
            Err(cycle) => Err(ScheduleError::CycleDetected {
                stage: self.ids[cycle.node_id()].clone(),
            }),
        }
    }

    /// Topological order of node indices, stable with respect to catalog
    /// order: whenever several stages are ready, the earliest one goes first.
    ///
    /// For an already-sorted catalog this is exactly `0..len`.
    pub fn topological_order(&self) -> Result<Vec<usize>, ScheduleError> {
        self.check_acyclic()?;

        let mut remaining: Vec<usize> = self.nodes.iter().map(|n| n.deps.len()).collect();
        let mut ready: BinaryHeap<Reverse<usize>> = remaining
            .iter()
            .enumerate()
            .filter(|&(_, &n)| n == 0)
            .map(|(i, _)| Reverse(i))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(i)) = ready.pop() {
            order.push(i);
            for &d in &self.nodes[i].dependents {
                remaining[d] -= 1;
                if remaining[d] == 0 {
                    ready.push(Reverse(d));
                }
            }
        }

        Ok(order)
    }

    pub(crate) fn deps_by_index(&self, i: usize) -> &[usize] {
        &self.nodes[i].deps
    }

    fn lookup(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }
}
