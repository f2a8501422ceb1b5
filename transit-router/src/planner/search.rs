//! Dijkstra search over (node, arrival mode, arrival line) states.

use std::cmp::Ordering;
use std::collections::hash_map::Entry;
use std::collections::{BinaryHeap, HashMap, HashSet};

use tracing::debug;

use super::result::{PathResult, PathSegment};
use crate::domain::{Edge, Mode, ModeMask, filter_modes, parse_modes, segment_time};
use crate::graph::Graph;

/// Invalid route query input.
///
/// Distinct from a valid query that has no route, which is a
/// `PathResult` with `found == false`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// Start node does not exist
    #[error("unknown start node: {0}")]
    UnknownStart(String),

    /// End node does not exist
    #[error("unknown end node: {0}")]
    UnknownEnd(String),

    /// No recognised travel mode was requested
    #[error("no valid travel mode requested")]
    NoModes,
}

/// Check that both endpoints exist and at least one mode is known.
///
/// Returns the parsed mode mask.
pub fn validate_query<I, S>(
    graph: &Graph,
    start: &str,
    end: &str,
    modes: I,
) -> Result<ModeMask, QueryError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if !graph.contains(start) {
        return Err(QueryError::UnknownStart(start.to_string()));
    }
    if !graph.contains(end) {
        return Err(QueryError::UnknownEnd(end.to_string()));
    }

    let mask = parse_modes(modes);
    if mask.is_empty() {
        return Err(QueryError::NoModes);
    }

    Ok(mask)
}

/// How a node was reached. The cost of the next edge depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct State<'g> {
    node: &'g str,
    mode: Option<Mode>,
    line: Option<&'g str>,
}

/// Best known arrival at a state.
#[derive(Debug, Clone, Copy)]
struct Label<'g> {
    cost: f64,
    /// Previous state and the edge taken from it; `None` at the origin.
    via: Option<(State<'g>, &'g Edge)>,
}

/// Priority queue entry, ordered so that `BinaryHeap` pops the cheapest.
#[derive(Debug, Clone, Copy)]
struct Queued<'g> {
    cost: f64,
    state: State<'g>,
}

impl PartialEq for Queued<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Queued<'_> {}

impl Ord for Queued<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.cost.total_cmp(&self.cost)
    }
}

impl PartialOrd for Queued<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Graph {
    /// Find the fastest route, rejecting invalid input.
    ///
    /// Unknown endpoints and mode lists with no recognised mode are
    /// errors; an unreachable destination is `Ok` with `found == false`.
    pub fn find_path<I, S>(&self, start: &str, end: &str, modes: I) -> Result<PathResult, QueryError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mask = validate_query(self, start, end, modes)?;
        Ok(self.shortest_path(start, end, mask))
    }

    /// Find the fastest route from `start` to `end` using only modes in
    /// `allowed`.
    ///
    /// Missing endpoints and an empty mask give a not-found result.
    pub fn shortest_path(&self, start: &str, end: &str, allowed: ModeMask) -> PathResult {
        let (Some(start_node), Some(end_node)) = (self.node(start), self.node(end)) else {
            return PathResult::not_found();
        };
        if allowed.is_empty() {
            return PathResult::not_found();
        }

        let origin = State {
            node: start_node.id.as_str(),
            mode: None,
            line: None,
        };
        let target = end_node.id.as_str();

        let mut labels: HashMap<State<'_>, Label<'_>> = HashMap::new();
        let mut settled: HashSet<State<'_>> = HashSet::new();
        let mut queue = BinaryHeap::new();

        labels.insert(origin, Label { cost: 0.0, via: None });
        queue.push(Queued {
            cost: 0.0,
            state: origin,
        });

        let mut reached = None;

        while let Some(Queued { cost, state }) = queue.pop() {
            if !settled.insert(state) {
                continue;
            }
            if state.node == target {
                reached = Some(state);
                break;
            }

            for edge in self.neighbors(state.node, allowed) {
                // Edges into unknown nodes are stored but never traversed.
                if !self.contains(&edge.to) {
                    continue;
                }

                let available = filter_modes(&edge.modes, allowed);
                if available.is_empty() {
                    continue;
                }

                let (time, mode) =
                    segment_time(edge.distance, &available, state.mode, state.line, edge.line());
                let next = State {
                    node: edge.to.as_str(),
                    mode: Some(mode),
                    line: edge.line(),
                };
                if settled.contains(&next) {
                    continue;
                }

                let candidate = cost + time;
                let label = Label {
                    cost: candidate,
                    via: Some((state, edge)),
                };
                match labels.entry(next) {
                    Entry::Occupied(mut best) if candidate < best.get().cost => {
                        best.insert(label);
                    }
                    Entry::Occupied(_) => continue,
                    Entry::Vacant(slot) => {
                        slot.insert(label);
                    }
                }
                queue.push(Queued {
                    cost: candidate,
                    state: next,
                });
            }
        }

        debug!(
            start,
            end,
            ?allowed,
            settled = settled.len(),
            found = reached.is_some(),
            "route search complete"
        );

        match reached {
            Some(state) => reconstruct(&labels, origin, state, allowed),
            None => PathResult::not_found(),
        }
    }
}

/// Rebuild the route ending at `goal` and re-price each segment from the
/// same running mode/line state the search used.
fn reconstruct<'g>(
    labels: &HashMap<State<'g>, Label<'g>>,
    origin: State<'g>,
    goal: State<'g>,
    allowed: ModeMask,
) -> PathResult {
    let mut edges: Vec<&Edge> = Vec::new();
    let mut cursor = goal;
    while let Some((prev, edge)) = labels.get(&cursor).and_then(|l| l.via) {
        edges.push(edge);
        cursor = prev;
    }
    edges.reverse();

    let mut path = vec![origin.node.to_string()];
    let mut segments = Vec::with_capacity(edges.len());
    let mut distance = 0.0;
    let mut estimated_time = 0.0;
    let mut mode: Option<Mode> = None;
    let mut line: Option<&str> = None;

    for edge in edges {
        let available = filter_modes(&edge.modes, allowed);
        let (time, used) = segment_time(edge.distance, &available, mode, line, edge.line());

        distance += edge.distance;
        estimated_time += time;
        path.push(edge.to.clone());
        segments.push(PathSegment {
            from_id: edge.from.clone(),
            to_id: edge.to.clone(),
            distance: edge.distance,
            time,
            modes: available,
            used_mode: used,
            line_id: edge.line_id.clone(),
            desc: edge.description.clone(),
        });

        mode = Some(used);
        line = edge.line();
    }

    PathResult {
        path,
        segments,
        distance,
        estimated_time,
        found: true,
    }
}
