//! Dependency graph construction and topological ordering
//!
//! The graph is an explicit structure built fresh for every sort: an
//! id-to-position index over the working set plus an adjacency list.
//! Nothing is stored back on the documents, so there is no visitation
//! state to reset between runs.

use std::collections::HashMap;
use std::fmt;

use super::document::ModelDocument;

/// Error returned when the dependency relation contains a cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError {
    /// Id of the document at which the cycle was detected
    pub model_id: String,
}

impl fmt::Display for CycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "circular dependency detected at model '{}'",
            self.model_id
        )
    }
}

impl std::error::Error for CycleError {}

/// Per-document bookkeeping during the depth-first sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VisitState {
    Unvisited,
    InProgress,
    Done,
}

/// Dependency graph over one working set of model documents
pub struct DependencyGraph<'a> {
    documents: &'a [ModelDocument],
    /// Positions of each document's in-set dependencies, declaration order
    edges: Vec<Vec<usize>>,
}

impl<'a> DependencyGraph<'a> {
    /// Resolves every document's dependency ids against the working set.
    ///
    /// Ids with no match in the set are dropped: they reference models the
    /// service already knows about and are not part of this ordering
    /// problem. A duplicate id within the set resolves to its first
    /// occurrence; later occurrences are logged and never become resolution
    /// targets.
    pub fn build(documents: &'a [ModelDocument]) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(documents.len());
        for (position, document) in documents.iter().enumerate() {
            if index.contains_key(document.id.as_str()) {
                log::warn!(
                    "duplicate model id '{}' in the working set, keeping the first occurrence",
                    document.id
                );
                continue;
            }
            index.insert(document.id.as_str(), position);
        }

        let edges = documents
            .iter()
            .map(|document| {
                document
                    .dependency_ids
                    .iter()
                    .filter_map(|id| index.get(id.as_str()).copied())
                    .collect()
            })
            .collect();

        Self { documents, edges }
    }

    /// Orders the working set so that every document appears after the
    /// documents it depends on.
    ///
    /// The result is deterministic for a fixed input order: the outer walk
    /// follows the input sequence and dependencies are visited in
    /// declaration order. Any cycle, including a document referencing its
    /// own id, fails the whole sort.
    pub fn sort(&self) -> Result<Vec<&'a ModelDocument>, CycleError> {
        let mut states = vec![VisitState::Unvisited; self.documents.len()];
        let mut order = Vec::with_capacity(self.documents.len());

        for position in 0..self.documents.len() {
            if states[position] == VisitState::Unvisited {
                self.visit(position, &mut states, &mut order)?;
            }
        }

        Ok(order)
    }

    /// Deletion order: dependents before the documents they depend on
    pub fn delete_order(&self) -> Result<Vec<&'a ModelDocument>, CycleError> {
        let mut order = self.sort()?;
        order.reverse();
        Ok(order)
    }

    fn visit(
        &self,
        position: usize,
        states: &mut [VisitState],
        order: &mut Vec<&'a ModelDocument>,
    ) -> Result<(), CycleError> {
        match states[position] {
            VisitState::Done => return Ok(()),
            VisitState::InProgress => {
                return Err(CycleError {
                    model_id: self.documents[position].id.clone(),
                });
            }
            VisitState::Unvisited => {}
        }

        states[position] = VisitState::InProgress;
        for &dependency in &self.edges[position] {
            self.visit(dependency, states, order)?;
        }
        states[position] = VisitState::Done;

        // Post-order append: every dependency is already in the output
        order.push(&self.documents[position]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn model(id: &str, extends: &[&str]) -> ModelDocument {
        let mut value = json!({ "@id": id, "@type": "Interface" });
        match extends {
            [] => {}
            [parent] => {
                value["extends"] = json!(parent);
            }
            parents => {
                value["extends"] = json!(parents);
            }
        }
        ModelDocument::from_value(value).unwrap()
    }

    fn model_with_component(id: &str, component_schema: &str) -> ModelDocument {
        ModelDocument::from_value(json!({
            "@id": id,
            "@type": "Interface",
            "contents": [
                { "@type": "Component", "name": "part", "schema": component_schema }
            ]
        }))
        .unwrap()
    }

    fn position(order: &[&ModelDocument], id: &str) -> usize {
        order
            .iter()
            .position(|document| document.id == id)
            .unwrap_or_else(|| panic!("model '{}' missing from the order", id))
    }

    #[test]
    fn sorts_dependencies_before_dependents() {
        let models = vec![
            model("building", &[]),
            model("meetingroom", &["room"]),
            model("room", &["space"]),
            model("space", &[]),
        ];

        let graph = DependencyGraph::build(&models);
        let order = graph.sort().unwrap();

        assert_eq!(order.len(), 4);
        assert!(position(&order, "space") < position(&order, "room"));
        assert!(position(&order, "room") < position(&order, "meetingroom"));
    }

    #[test]
    fn sorts_the_sample_catalog() {
        // space has no dependencies, everything else leads back to it
        let models = vec![
            model_with_component(
                "dtmi:digitaltwins:testing:core:building;1",
                "dtmi:digitaltwins:testing:core:space;1",
            ),
            model("dtmi:digitaltwins:testing:core:level;1", &[
                "dtmi:digitaltwins:testing:core:space;1",
            ]),
            model("dtmi:digitaltwins:testing:core:meetingroom;1", &[
                "dtmi:digitaltwins:testing:core:room;1",
            ]),
            model("dtmi:digitaltwins:testing:core:room;1", &[
                "dtmi:digitaltwins:testing:core:space;1",
            ]),
            model("dtmi:digitaltwins:testing:core:space;1", &[]),
        ];

        let graph = DependencyGraph::build(&models);
        let order = graph.sort().unwrap();

        assert_eq!(order.len(), 5);
        assert_eq!(position(&order, "dtmi:digitaltwins:testing:core:space;1"), 0);
        assert!(
            position(&order, "dtmi:digitaltwins:testing:core:space;1")
                < position(&order, "dtmi:digitaltwins:testing:core:room;1")
        );
        assert!(
            position(&order, "dtmi:digitaltwins:testing:core:room;1")
                < position(&order, "dtmi:digitaltwins:testing:core:meetingroom;1")
        );
    }

    #[test]
    fn sort_is_deterministic_for_a_fixed_input_order() {
        let models = vec![
            model("building", &[]),
            model("level", &["space"]),
            model("room", &["space"]),
            model("space", &[]),
        ];

        let graph = DependencyGraph::build(&models);
        let first: Vec<String> = graph.sort().unwrap().iter().map(|m| m.id.clone()).collect();
        let second: Vec<String> = graph.sort().unwrap().iter().map(|m| m.id.clone()).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn cycle_fails_the_whole_sort() {
        let models = vec![
            model("space", &[]),
            model("room", &["meetingroom"]),
            model("meetingroom", &["room"]),
        ];

        let graph = DependencyGraph::build(&models);
        let error = graph.sort().unwrap_err();

        assert!(error.model_id == "room" || error.model_id == "meetingroom");
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let models = vec![model("space", &["space"])];

        let graph = DependencyGraph::build(&models);
        let error = graph.sort().unwrap_err();

        assert_eq!(error.model_id, "space");
    }

    #[test]
    fn unresolved_dependencies_are_ignored() {
        let models = vec![
            model("room", &["dtmi:external:space;1"]),
            model("meetingroom", &["room"]),
        ];

        let graph = DependencyGraph::build(&models);
        let order = graph.sort().unwrap();

        assert_eq!(order.len(), 2);
        assert!(position(&order, "room") < position(&order, "meetingroom"));
    }

    #[test]
    fn duplicate_ids_resolve_to_the_first_occurrence() {
        let first = ModelDocument::from_value(json!({ "@id": "space", "marker": "first" })).unwrap();
        let shadow =
            ModelDocument::from_value(json!({ "@id": "space", "marker": "second" })).unwrap();
        let models = vec![first, shadow, model("room", &["space"])];

        let graph = DependencyGraph::build(&models);
        let order = graph.sort().unwrap();

        assert_eq!(order.len(), 3);
        let first_space = order
            .iter()
            .position(|document| {
                document.id == "space"
                    && document.content().get("marker") == Some(&json!("first"))
            })
            .unwrap();
        assert!(first_space < position(&order, "room"));
    }

    #[test]
    fn delete_order_reverses_the_sort() {
        let models = vec![
            model("space", &[]),
            model("room", &["space"]),
            model("meetingroom", &["room"]),
        ];

        let graph = DependencyGraph::build(&models);

        let sorted: Vec<String> = graph.sort().unwrap().iter().map(|m| m.id.clone()).collect();
        assert_eq!(sorted, vec!["space", "room", "meetingroom"]);

        let deletes: Vec<String> = graph
            .delete_order()
            .unwrap()
            .iter()
            .map(|m| m.id.clone())
            .collect();
        assert_eq!(deletes, vec!["meetingroom", "room", "space"]);
    }

    #[test]
    fn empty_working_set_sorts_to_nothing() {
        let models: Vec<ModelDocument> = Vec::new();

        let graph = DependencyGraph::build(&models);

        assert!(graph.sort().unwrap().is_empty());
    }
}
