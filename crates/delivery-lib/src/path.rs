use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};

use crate::fuel::FuelConfig;
use crate::graph::{Edge, Graph};
use crate::map::{Location, Route};

/// Cheapest route sequence for a delivery, with its totals.
///
/// Routes are reported as they were recorded in the map, so a leg travelled
/// against its recorded direction still shows its original origin and
/// destination. [`EconomicalPath::stops`] gives the locations in travel order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EconomicalPath {
    pub routes: Vec<Route>,
    pub total_distance: f64,
    pub total_cost: f64,
    #[serde(skip)]
    stops: Vec<Location>,
}

impl EconomicalPath {
    /// Zero-length path for a delivery that starts where it ends.
    pub fn stationary(location: &str) -> Self {
        Self {
            routes: Vec::new(),
            total_distance: 0.0,
            total_cost: 0.0,
            stops: vec![location.to_string()],
        }
    }

    /// Number of routes travelled.
    pub fn leg_count(&self) -> usize {
        self.routes.len()
    }

    /// Visited locations from origin to destination.
    ///
    /// Empty when the path was deserialized rather than computed.
    pub fn stops(&self) -> &[Location] {
        &self.stops
    }
}

/// Find the cheapest path between `origin` and `destination`.
///
/// Runs Dijkstra's algorithm weighted by distance. Because cost is
/// `distance / autonomy * liter_price` for a fixed query, the shortest path
/// is also the cheapest one. Among equally distant candidates the location
/// discovered first is settled first, which keeps results deterministic.
///
/// Returns `None` when either endpoint is missing from the graph or no walk
/// connects them. A query whose origin equals its destination always yields a
/// zero-length path, even on an empty graph.
pub fn find_economical_path(
    graph: &Graph,
    origin: &str,
    destination: &str,
    fuel: &FuelConfig,
) -> Option<EconomicalPath> {
    if origin == destination {
        return Some(EconomicalPath::stationary(origin));
    }

    let start = graph.resolve(origin)?;
    let goal = graph.resolve(destination)?;

    let states = run_dijkstra(graph, start, goal);
    let reached = states.get(goal).filter(|state| state.settled)?;
    let total_distance = reached.distance;

    let (routes, stops) = reconstruct_path(graph, &states, start, goal);
    Some(EconomicalPath {
        routes,
        total_distance,
        total_cost: fuel.cost_for(total_distance),
        stops,
    })
}

#[derive(Debug, Clone)]
struct NodeState<'g> {
    distance: f64,
    order: usize,
    settled: bool,
    parent: Option<(&'g str, &'g Edge)>,
}

impl NodeState<'_> {
    fn unreached(order: usize) -> Self {
        Self {
            distance: f64::INFINITY,
            order,
            settled: false,
            parent: None,
        }
    }
}

fn run_dijkstra<'g>(graph: &'g Graph, start: &'g str, goal: &'g str) -> HashMap<&'g str, NodeState<'g>> {
    let mut states: HashMap<&str, NodeState> = HashMap::new();
    let mut queue = BinaryHeap::new();
    let mut discovered = 1;

    states.insert(
        start,
        NodeState {
            distance: 0.0,
            ..NodeState::unreached(0)
        },
    );
    queue.push(QueueEntry::new(start, 0.0, 0));

    while let Some(entry) = queue.pop() {
        let current_distance = match states.get_mut(entry.node) {
            Some(state) if state.settled || entry.cost.0 > state.distance => continue,
            Some(state) => {
                state.settled = true;
                state.distance
            }
            None => continue,
        };

        if entry.node == goal {
            break;
        }

        for edge in graph.neighbours(entry.node) {
            let next = match states.entry(edge.target.as_str()) {
                Entry::Occupied(occupied) => occupied.into_mut(),
                Entry::Vacant(vacant) => {
                    let order = discovered;
                    discovered += 1;
                    vacant.insert(NodeState::unreached(order))
                }
            };
            if next.settled {
                continue;
            }

            let next_cost = current_distance + edge.distance;
            if next_cost < next.distance {
                next.distance = next_cost;
                next.parent = Some((entry.node, edge));
                queue.push(QueueEntry::new(edge.target.as_str(), next_cost, next.order));
            }
        }
    }

    states
}

fn reconstruct_path(
    graph: &Graph,
    states: &HashMap<&str, NodeState<'_>>,
    start: &str,
    goal: &str,
) -> (Vec<Route>, Vec<Location>) {
    let mut routes = Vec::new();
    let mut stops = vec![goal.to_string()];
    let mut current = goal;
    while current != start {
        let Some((previous, edge)) = states.get(current).and_then(|state| state.parent) else {
            break;
        };
        routes.push(graph.route(edge.route).clone());
        stops.push(previous.to_string());
        current = previous;
    }
    routes.reverse();
    stops.reverse();
    (routes, stops)
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry<'g> {
    node: &'g str,
    cost: FloatOrd,
    order: usize,
}

impl<'g> QueueEntry<'g> {
    fn new(node: &'g str, cost: f64, order: usize) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            order,
        }
    }
}

impl Ord for QueueEntry<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost, then by discovery order.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for QueueEntry<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
