use log::trace;

use crate::advisor_assert_moderate;
use crate::advisor_assert_simple;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;

crate::storage_key!(
    /// Addresses a vertex of a [`FlowGraph`].
    pub VertexId
);

crate::storage_key!(
    /// Addresses an edge of a [`FlowGraph`]. Every edge is stored next to its residual twin, so
    /// the reverse of edge `i` is edge `i ^ 1`.
    pub EdgeId
);

/// A directed edge together with the flow currently routed through it.
///
/// Residual edges are stored as ordinary edges with zero capacity and negated cost; their flow is
/// always the negation of the flow on their twin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub src: VertexId,
    pub dst: VertexId,
    pub cap: i64,
    pub cost: i64,
    pub flow: i64,
}

impl Edge {
    fn residual(&self) -> i64 {
        self.cap - self.flow
    }
}

/// Counters describing one run of [`FlowGraph::min_cost_max_flow`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlowSummary {
    /// The amount of flow that reached the sink.
    pub flow: i64,
    /// The total cost of the routed flow.
    pub cost: i64,
    pub augmenting_paths: u64,
    pub bellman_ford_rounds: u64,
}

/// A directed graph with capacities and costs on which a min-cost maximum flow can be computed.
#[derive(Debug, Clone, Default)]
pub struct FlowGraph {
    edges: KeyedVec<EdgeId, Edge>,
    outgoing: KeyedVec<VertexId, Vec<EdgeId>>,
}

impl FlowGraph {
    pub fn add_vertex(&mut self) -> VertexId {
        self.outgoing.push(Vec::new())
    }

    pub fn num_vertices(&self) -> usize {
        self.outgoing.len()
    }

    /// Adds an edge from `src` to `dst` and its residual twin. Returns the forward edge.
    pub fn add_edge(&mut self, src: VertexId, dst: VertexId, cap: i64, cost: i64) -> EdgeId {
        advisor_assert_simple!(cap >= 0, "edges cannot have a negative capacity");
        advisor_assert_simple!(src.index() < self.outgoing.len());
        advisor_assert_simple!(dst.index() < self.outgoing.len());

        let forward = self.edges.push(Edge {
            src,
            dst,
            cap,
            cost,
            flow: 0,
        });
        let backward = self.edges.push(Edge {
            src: dst,
            dst: src,
            cap: 0,
            cost: -cost,
            flow: 0,
        });
        self.outgoing[src].push(forward);
        self.outgoing[dst].push(backward);

        forward
    }

    pub fn edge(&self, edge: EdgeId) -> &Edge {
        &self.edges[edge]
    }

    /// Iterates over the edges added with [`FlowGraph::add_edge`], skipping residual twins.
    pub fn forward_edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        self.edges
            .iter_with_keys()
            .filter(|(id, _)| id.index() % 2 == 0)
    }

    /// The sum of the flow on the forward edges leaving `vertex`.
    pub fn outflow(&self, vertex: VertexId) -> i64 {
        self.outgoing[vertex]
            .iter()
            .filter(|edge| edge.index() % 2 == 0)
            .map(|&edge| self.edges[edge].flow)
            .sum()
    }

    /// Routes as much flow as possible from `source` to `sink`, and among all maximum flows picks
    /// one of minimum cost.
    ///
    /// Uses successive shortest augmenting paths. Residual edges carry negative costs, so
    /// shortest paths are found with Bellman-Ford. Edges are relaxed in the order they were
    /// added and only strictly shorter paths replace known ones, which makes the result
    /// deterministic.
    ///
    /// The graph must not contain a negative cost cycle.
    pub fn min_cost_max_flow(&mut self, source: VertexId, sink: VertexId) -> FlowSummary {
        let mut summary = FlowSummary::default();
        if source == sink {
            return summary;
        }

        while let Some(path) = self.shortest_path(source, sink, &mut summary) {
            let bottleneck = path
                .iter()
                .map(|&edge| self.edges[edge].residual())
                .min()
                .unwrap_or(0);
            advisor_assert_simple!(bottleneck > 0, "augmenting paths must carry flow");

            for &edge in &path {
                self.push_flow(edge, bottleneck);
                summary.cost += bottleneck * self.edges[edge].cost;
            }
            summary.flow += bottleneck;
            summary.augmenting_paths += 1;
            trace!(
                "Augmented {bottleneck} units along a path of {} edges",
                path.len()
            );
        }

        advisor_assert_moderate!(self.is_conserving(source, sink));
        summary
    }

    fn push_flow(&mut self, edge: EdgeId, amount: i64) {
        let twin = EdgeId::create_from_index(edge.index() ^ 1);
        self.edges[edge].flow += amount;
        self.edges[twin].flow -= amount;
    }

    /// Finds a cheapest path with residual capacity, returned as its edges from source to sink.
    fn shortest_path(
        &self,
        source: VertexId,
        sink: VertexId,
        summary: &mut FlowSummary,
    ) -> Option<Vec<EdgeId>> {
        let mut distance: KeyedVec<VertexId, Option<i64>> =
            KeyedVec::filled(self.outgoing.len(), None);
        let mut predecessor: KeyedVec<VertexId, Option<EdgeId>> =
            KeyedVec::filled(self.outgoing.len(), None);
        distance[source] = Some(0);

        for _ in 0..self.outgoing.len() {
            summary.bellman_ford_rounds += 1;
            let mut updated = false;

            for (id, edge) in self.edges.iter_with_keys() {
                if edge.residual() <= 0 {
                    continue;
                }
                let Some(from) = distance[edge.src] else {
                    continue;
                };
                let candidate = from + edge.cost;
                if distance[edge.dst].map_or(true, |known| candidate < known) {
                    distance[edge.dst] = Some(candidate);
                    predecessor[edge.dst] = Some(id);
                    updated = true;
                }
            }

            if !updated {
                break;
            }
        }

        if distance[sink].is_none() {
            return None;
        }

        let mut path = Vec::new();
        let mut current = sink;
        while current != source {
            let edge = predecessor[current]?;
            path.push(edge);
            current = self.edges[edge].src;
            advisor_assert_simple!(path.len() <= self.outgoing.len(), "cycle in predecessors");
        }
        path.reverse();
        Some(path)
    }

    /// Every vertex except the source and the sink receives exactly as much as it sends.
    fn is_conserving(&self, source: VertexId, sink: VertexId) -> bool {
        let mut balance: KeyedVec<VertexId, i64> = KeyedVec::filled(self.outgoing.len(), 0);
        for (_, edge) in self.forward_edges() {
            balance[edge.src] -= edge.flow;
            balance[edge.dst] += edge.flow;
        }
        let conserving = balance
            .iter_with_keys()
            .all(|(vertex, &net)| vertex == source || vertex == sink || net == 0);
        conserving
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_is_limited_by_the_bottleneck() {
        let mut graph = FlowGraph::default();
        let source = graph.add_vertex();
        let middle = graph.add_vertex();
        let sink = graph.add_vertex();
        let _ = graph.add_edge(source, middle, 10, 0);
        let bottleneck = graph.add_edge(middle, sink, 4, 0);

        let summary = graph.min_cost_max_flow(source, sink);

        assert_eq!(summary.flow, 4);
        assert_eq!(graph.edge(bottleneck).flow, 4);
    }

    #[test]
    fn cheaper_paths_are_preferred() {
        let mut graph = FlowGraph::default();
        let source = graph.add_vertex();
        let cheap = graph.add_vertex();
        let expensive = graph.add_vertex();
        let sink = graph.add_vertex();
        let _ = graph.add_edge(source, expensive, 5, 10);
        let _ = graph.add_edge(source, cheap, 5, 1);
        let via_expensive = graph.add_edge(expensive, sink, 5, 0);
        let via_cheap = graph.add_edge(cheap, sink, 5, 0);

        let summary = graph.min_cost_max_flow(source, sink);

        assert_eq!(summary.flow, 10);
        assert_eq!(summary.cost, 55);
        assert_eq!(graph.edge(via_cheap).flow, 5);
        assert_eq!(graph.edge(via_expensive).flow, 5);
    }

    #[test]
    fn residual_edges_reroute_flow_to_reach_the_maximum() {
        // The first path takes `a -> c`, which blocks `b` until it is undone.
        let mut graph = FlowGraph::default();
        let source = graph.add_vertex();
        let a = graph.add_vertex();
        let b = graph.add_vertex();
        let c = graph.add_vertex();
        let d = graph.add_vertex();
        let sink = graph.add_vertex();
        let _ = graph.add_edge(source, a, 1, 0);
        let _ = graph.add_edge(source, b, 1, 0);
        let a_to_c = graph.add_edge(a, c, 1, 0);
        let a_to_d = graph.add_edge(a, d, 1, 0);
        let b_to_c = graph.add_edge(b, c, 1, 0);
        let _ = graph.add_edge(c, sink, 1, 0);
        let _ = graph.add_edge(d, sink, 1, 0);

        let summary = graph.min_cost_max_flow(source, sink);

        assert_eq!(summary.flow, 2);
        assert_eq!(summary.augmenting_paths, 2);
        assert_eq!(graph.edge(a_to_c).flow, 0);
        assert_eq!(graph.edge(a_to_d).flow, 1);
        assert_eq!(graph.edge(b_to_c).flow, 1);
    }

    #[test]
    fn ties_follow_edge_order() {
        let mut graph = FlowGraph::default();
        let source = graph.add_vertex();
        let first = graph.add_vertex();
        let second = graph.add_vertex();
        let sink = graph.add_vertex();
        let to_first = graph.add_edge(source, first, 3, 0);
        let to_second = graph.add_edge(source, second, 3, 0);
        let _ = graph.add_edge(first, sink, 3, 0);
        let _ = graph.add_edge(second, sink, 3, 0);

        let mut limited = graph.clone();
        let summary = graph.min_cost_max_flow(source, sink);
        assert_eq!(summary.flow, 6);

        // With a single unit of demand only the first discovered branch is used.
        let capped_sink = limited.add_vertex();
        let _ = limited.add_edge(sink, capped_sink, 1, 0);
        let summary = limited.min_cost_max_flow(source, capped_sink);
        assert_eq!(summary.flow, 1);
        assert_eq!(limited.edge(to_first).flow, 1);
        assert_eq!(limited.edge(to_second).flow, 0);
    }

    #[test]
    fn unreachable_sink_carries_no_flow() {
        let mut graph = FlowGraph::default();
        let source = graph.add_vertex();
        let sink = graph.add_vertex();

        let summary = graph.min_cost_max_flow(source, sink);

        assert_eq!(summary, FlowSummary {
            bellman_ford_rounds: 1,
            ..FlowSummary::default()
        });
        assert_eq!(graph.outflow(source), 0);
    }
}
