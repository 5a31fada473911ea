use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::map::{Location, Route};

/// Minimum Jaro-Winkler similarity for a location to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GraphMode {
    /// Every route can be travelled in both directions.
    Bidirectional,
    /// Routes can only be travelled as recorded.
    Directed,
}

/// Position of the source route inside the graph's route list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteIndex(pub usize);

/// Edge within the routing graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: Location,
    pub distance: f64,
    pub route: RouteIndex,
}

/// Graph structure used by the path finder.
#[derive(Debug, Clone)]
pub struct Graph {
    routes: Arc<Vec<Route>>,
    adjacency: Arc<HashMap<Location, Vec<Edge>>>,
}

impl Graph {
    /// Return the outgoing edges of a location, in route input order.
    pub fn neighbours(&self, location: &str) -> &[Edge] {
        self.adjacency
            .get(location)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether the location appears as an endpoint of any route.
    pub fn contains(&self, location: &str) -> bool {
        self.adjacency.contains_key(location)
    }

    /// Return the graph's own copy of a location label, if it is known.
    pub fn resolve(&self, location: &str) -> Option<&str> {
        self.adjacency
            .get_key_value(location)
            .map(|(key, _)| key.as_str())
    }

    /// The route an edge was derived from.
    pub fn route(&self, index: RouteIndex) -> &Route {
        &self.routes[index.0]
    }

    pub fn location_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Iterate over every known location (unordered).
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Suggest up to `limit` known locations whose names resemble `name`.
    pub fn fuzzy_location_matches(&self, name: &str, limit: usize) -> Vec<String> {
        let needle = name.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .locations()
            .map(|candidate| {
                (
                    strsim::jaro_winkler(&needle, &candidate.to_lowercase()),
                    candidate,
                )
            })
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();

        scored.sort_by(|a, b| compare_score(b.0, a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, candidate)| candidate.to_string())
            .collect()
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self {
            routes: Arc::new(Vec::new()),
            adjacency: Arc::new(HashMap::new()),
        }
    }
}

/// Build the default delivery graph, where each route is travelable both ways.
///
/// A route `A -> B` registers the edge `A -> B` and the reverse edge `B -> A`,
/// both carrying the same distance and pointing back at the same route.
pub fn build_graph(routes: &[Route]) -> Graph {
    Graph {
        routes: Arc::new(routes.to_vec()),
        adjacency: Arc::new(build_adjacency(routes, GraphMode::Bidirectional)),
    }
}

/// Build a graph that only follows routes in their recorded direction.
pub fn build_directed_graph(routes: &[Route]) -> Graph {
    Graph {
        routes: Arc::new(routes.to_vec()),
        adjacency: Arc::new(build_adjacency(routes, GraphMode::Directed)),
    }
}

fn build_adjacency(routes: &[Route], mode: GraphMode) -> HashMap<Location, Vec<Edge>> {
    let mut adjacency: HashMap<Location, Vec<Edge>> = HashMap::new();
    for (index, route) in routes.iter().enumerate() {
        let index = RouteIndex(index);
        adjacency
            .entry(route.origin.clone())
            .or_default()
            .push(Edge {
                target: route.destination.clone(),
                distance: route.distance,
                route: index,
            });

        let reverse = adjacency.entry(route.destination.clone()).or_default();
        if mode == GraphMode::Bidirectional {
            reverse.push(Edge {
                target: route.origin.clone(),
                distance: route.distance,
                route: index,
            });
        }
    }
    adjacency
}

fn compare_score(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Less)
}
