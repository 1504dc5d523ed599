//! Trellis graph construction and shortest-path solving
//!
//! The trellis is a layered DAG: vertex 0 is a virtual start, layer `k + 1`
//! holds one vertex per IK sample of waypoint `k`, and edges only connect
//! samples of adjacent waypoints. Zero-weight edges from the virtual start to
//! every reachable first-layer sample let a single Dijkstra run discover the
//! best starting sample together with the rest of the path.

use num_traits::Float;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

use crate::containers::DenseSamplesContainer;
use crate::error::{PlanningError, PlanningResult};
use crate::planner_traits::{
    EdgeEvaluator, EdgeProperties, PointId, PointSampler, SampleGroup, SamplesContainer,
    VertexProperties, VIRTUAL_POINT_ID,
};

/// Properties of the virtual start vertex.
const VIRTUAL_VERTEX: VertexProperties = VertexProperties {
    point_id: VIRTUAL_POINT_ID,
    sample_index: 0,
};

#[derive(Debug, Clone)]
struct GraphEdge<FloatT: Float> {
    target: usize,
    props: EdgeProperties<FloatT>,
}

/// Selects one sample per waypoint so that the summed transition cost along
/// the waypoint sequence is minimal. `build` constructs the trellis from the
/// given samplers, `solve` runs Dijkstra from the virtual start and extracts
/// the winning sample of every waypoint.
pub struct GraphSolver<FloatT, C = DenseSamplesContainer<FloatT>>
where
    FloatT: Float + Debug,
    C: SamplesContainer<FloatT>,
{
    edge_evaluator: Arc<dyn EdgeEvaluator<FloatT>>,
    container: C,
    /// Sample descriptors per vertex id; index 0 is the virtual start.
    vertices: Vec<VertexProperties>,
    /// Outgoing edges per vertex id.
    adjacency: Vec<Vec<GraphEdge<FloatT>>>,
    /// Last-layer vertices that were reached by at least one valid edge,
    /// ascending. Kept explicit so an unreachable end of the trellis is cheap
    /// to detect.
    terminals: Vec<usize>,
    num_points: usize,
    built: bool,
}

impl<FloatT: Float + Debug> GraphSolver<FloatT, DenseSamplesContainer<FloatT>> {
    /// Creates a solver with the default in-memory sample store.
    pub fn new(edge_evaluator: Arc<dyn EdgeEvaluator<FloatT>>) -> Self {
        Self::with_container(edge_evaluator, DenseSamplesContainer::new())
    }
}

impl<FloatT, C> GraphSolver<FloatT, C>
where
    FloatT: Float + Debug,
    C: SamplesContainer<FloatT>,
{
    /// Creates a solver over a caller-supplied sample store.
    pub fn with_container(edge_evaluator: Arc<dyn EdgeEvaluator<FloatT>>, container: C) -> Self {
        GraphSolver {
            edge_evaluator,
            container,
            vertices: Vec::new(),
            adjacency: Vec::new(),
            terminals: Vec::new(),
            num_points: 0,
            built: false,
        }
    }

    /// Builds the trellis for the given ordered waypoints. On any failure the
    /// solver is reset to the empty state, so it can be reused for another
    /// attempt. The previous graph is discarded either way.
    pub fn build(&mut self, points: &[Arc<dyn PointSampler<FloatT>>]) -> PlanningResult<()> {
        self.reset();
        match self.build_trellis(points) {
            Ok(()) => {
                self.built = true;
                debug!(
                    "Trellis built: {} waypoints, {} vertices, {} edges, {} terminals",
                    self.num_points,
                    self.vertices.len(),
                    self.num_edges(),
                    self.terminals.len()
                );
                Ok(())
            }
            Err(error) => {
                self.reset();
                Err(error)
            }
        }
    }

    /// Finds the cheapest waypoint-to-waypoint path through the built trellis
    /// and returns the selected sample of every waypoint as a single-sample
    /// group, in waypoint order. Requires a successful prior `build`; does not
    /// mutate the solver, so repeated calls return identical results.
    pub fn solve(&self) -> PlanningResult<Vec<SampleGroup<FloatT>>> {
        if !self.built {
            return Err(PlanningError::NotBuilt);
        }

        let (dist, pred) = self.shortest_paths();

        // Cheapest terminal wins; terminals are kept ascending and the
        // comparison is strict, so equal costs resolve to the smaller vertex id.
        let mut best: Option<(usize, FloatT)> = None;
        for &terminal in &self.terminals {
            if dist[terminal].is_finite() && best.map_or(true, |(_, cost)| dist[terminal] < cost) {
                best = Some((terminal, dist[terminal]));
            }
        }
        let (terminal, total_cost) = best.ok_or(PlanningError::NoFeasiblePath)?;
        debug!("Cheapest terminal is vertex {terminal}, path cost {total_cost:?}");

        // Walk the predecessor chain back to the virtual start, noting the
        // selected sample of each waypoint on the way.
        let mut selected: Vec<Option<usize>> = vec![None; self.num_points];
        let mut current = terminal;
        while current != 0 {
            let vertex = self.vertices.get(current).copied().ok_or_else(|| {
                PlanningError::InternalInconsistency(format!(
                    "vertex {} is not part of the graph",
                    current
                ))
            })?;
            if vertex.point_id < 0 || vertex.point_id as usize >= self.num_points {
                return Err(PlanningError::InternalInconsistency(format!(
                    "vertex {} carries waypoint {} outside of [0, {})",
                    current, vertex.point_id, self.num_points
                )));
            }
            let point = vertex.point_id as usize;
            if selected[point].is_some() {
                return Err(PlanningError::InternalInconsistency(format!(
                    "more than one sample was assigned to waypoint {}",
                    point
                )));
            }
            selected[point] = Some(vertex.sample_index);
            current = pred[current].ok_or_else(|| {
                PlanningError::InternalInconsistency(format!(
                    "predecessor chain broke at vertex {} before reaching the start",
                    current
                ))
            })?;
        }

        // Every waypoint must have received exactly one sample.
        let mut solution = Vec::with_capacity(self.num_points);
        for (point, selection) in selected.iter().enumerate() {
            let sample_index = selection.ok_or(PlanningError::IncompletePath { point })?;
            let group = self.container.at(point).ok_or_else(|| {
                PlanningError::InternalInconsistency(format!(
                    "no samples stored for waypoint {}",
                    point
                ))
            })?;
            let sample = group.at(sample_index).ok_or_else(|| {
                PlanningError::InternalInconsistency(format!(
                    "sample {} is out of range for waypoint {}",
                    sample_index, point
                ))
            })?;
            solution.push(SampleGroup::from_point(&sample));
        }
        Ok(solution)
    }

    /// True after a successful `build`.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Number of waypoints of the current plan.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Number of graph vertices, the virtual start included.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of graph edges, virtual-start edges included.
    pub fn num_edges(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum()
    }

    /// Sample descriptor of the given vertex.
    pub fn vertex_properties(&self, vertex_id: usize) -> Option<&VertexProperties> {
        self.vertices.get(vertex_id)
    }

    /// Last-layer vertices reachable by at least one valid edge, ascending.
    pub fn terminals(&self) -> &[usize] {
        &self.terminals
    }

    fn reset(&mut self) {
        self.vertices.clear();
        self.adjacency.clear();
        self.terminals.clear();
        self.container.clear();
        self.num_points = 0;
        self.built = false;
    }

    fn add_vertex(&mut self, properties: VertexProperties) -> usize {
        let id = self.vertices.len();
        self.vertices.push(properties);
        self.adjacency.push(Vec::new());
        id
    }

    fn build_trellis(&mut self, points: &[Arc<dyn PointSampler<FloatT>>]) -> PlanningResult<()> {
        if points.is_empty() {
            return Err(PlanningError::NoWaypoints);
        }
        let num_points = points.len();
        self.num_points = num_points;
        self.container.allocate(num_points);
        self.add_vertex(VIRTUAL_VERTEX);

        // Sample every waypoint and lay out one vertex layer per waypoint.
        // offsets[k] is the vertex id of the first sample of waypoint k.
        let mut offsets = Vec::with_capacity(num_points);
        let mut dofs = 0;
        for (point, sampler) in points.iter().enumerate() {
            let mut group = sampler
                .generate()
                .map_err(|_| PlanningError::SamplingFailed { point })?;
            validate_group(point, &group, &mut dofs)?;
            group.point_id = point as PointId;

            offsets.push(self.vertices.len());
            self.vertices.reserve(group.num_samples);
            self.adjacency.reserve(group.num_samples);
            for sample_index in 0..group.num_samples {
                self.add_vertex(VertexProperties {
                    point_id: point as PointId,
                    sample_index,
                });
            }
            debug!("Waypoint {point}: {} candidate samples", group.num_samples);
            self.container.put(point, group);
        }

        // A single-waypoint plan has no transitions to score: expose every
        // sample as both a start and a terminal and let the tie-break pick.
        if num_points == 1 {
            for vertex in 1..self.vertices.len() {
                let dst_vtx = self.vertices[vertex];
                self.adjacency[0].push(GraphEdge {
                    target: vertex,
                    props: EdgeProperties {
                        weight: FloatT::zero(),
                        valid: true,
                        src_vtx: VIRTUAL_VERTEX,
                        dst_vtx,
                    },
                });
                self.terminals.push(vertex);
            }
            return Ok(());
        }

        // Score the transitions of every adjacent waypoint pair and insert the
        // valid ones. Invalid transitions are not inserted at all.
        let mut edge_keys: HashSet<(usize, usize)> = HashSet::new();
        let mut terminals: Vec<usize> = Vec::new();
        for pair in 0..num_points - 1 {
            let (edges, n1, n2) = {
                let s1 = self.stored_group(pair)?;
                let s2 = self.stored_group(pair + 1)?;
                let edges = self.edge_evaluator.evaluate(s1, s2, &[], &[]);
                (edges, s1.num_samples, s2.num_samples)
            };

            let num_valid = edges.iter().filter(|edge| edge.valid).count();
            if num_valid == 0 {
                return Err(PlanningError::NoValidTransition {
                    from: pair,
                    to: pair + 1,
                });
            }
            debug!(
                "Waypoints ({pair}, {}): {num_valid} valid transitions out of {}",
                pair + 1,
                edges.len()
            );

            for edge in edges.into_iter().filter(|edge| edge.valid) {
                if edge.src_vtx.sample_index >= n1 || edge.dst_vtx.sample_index >= n2 {
                    return Err(PlanningError::InternalInconsistency(format!(
                        "evaluator returned sample indices ({}, {}) outside of ({}, {})",
                        edge.src_vtx.sample_index, edge.dst_vtx.sample_index, n1, n2
                    )));
                }
                if !edge.weight.is_finite() || edge.weight < FloatT::zero() {
                    return Err(PlanningError::InternalInconsistency(format!(
                        "evaluator returned weight {:?} for a valid transition",
                        edge.weight
                    )));
                }

                let src = offsets[pair] + edge.src_vtx.sample_index;
                let dst = offsets[pair + 1] + edge.dst_vtx.sample_index;

                // Each first-layer sample with a valid continuation gets one
                // zero-weight edge from the virtual start.
                if pair == 0 && edge_keys.insert((0, src)) {
                    self.adjacency[0].push(GraphEdge {
                        target: src,
                        props: EdgeProperties {
                            weight: FloatT::zero(),
                            valid: true,
                            src_vtx: VIRTUAL_VERTEX,
                            dst_vtx: edge.src_vtx,
                        },
                    });
                }

                if !edge_keys.insert((src, dst)) {
                    return Err(PlanningError::DuplicateEdge { src, dst });
                }
                self.adjacency[src].push(GraphEdge { target: dst, props: edge });

                if pair == num_points - 2 {
                    terminals.push(dst);
                }
            }
        }

        terminals.sort_unstable();
        terminals.dedup();
        self.terminals = terminals;
        Ok(())
    }

    fn stored_group(&self, point: usize) -> PlanningResult<&SampleGroup<FloatT>> {
        self.container.at(point).ok_or_else(|| {
            PlanningError::InternalInconsistency(format!(
                "no samples stored for waypoint {}",
                point
            ))
        })
    }

    /// Uniform-cost Dijkstra from the virtual start over the whole trellis.
    fn shortest_paths(&self) -> (Vec<FloatT>, Vec<Option<usize>>) {
        let num_vertices = self.vertices.len();
        let mut dist = vec![FloatT::infinity(); num_vertices];
        let mut pred: Vec<Option<usize>> = vec![None; num_vertices];
        let mut queue = BinaryHeap::with_capacity(num_vertices);

        dist[0] = FloatT::zero();
        queue.push(QueueEntry {
            cost: FloatT::zero(),
            vertex: 0,
        });

        while let Some(QueueEntry { cost, vertex }) = queue.pop() {
            if cost > dist[vertex] {
                continue; // stale queue entry
            }
            for edge in &self.adjacency[vertex] {
                let candidate = cost + edge.props.weight;
                if candidate < dist[edge.target] {
                    dist[edge.target] = candidate;
                    pred[edge.target] = Some(vertex);
                    queue.push(QueueEntry {
                        cost: candidate,
                        vertex: edge.target,
                    });
                }
            }
        }
        (dist, pred)
    }

    #[cfg(test)]
    pub(crate) fn edge_pairs(&self) -> Vec<(usize, usize)> {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(src, edges)| edges.iter().map(move |edge| (src, edge.target)))
            .collect()
    }
}

fn validate_group<FloatT: Float>(
    point: usize,
    group: &SampleGroup<FloatT>,
    dofs: &mut usize,
) -> PlanningResult<()> {
    if group.num_samples == 0 || group.values.is_empty() {
        return Err(PlanningError::SamplingFailed { point });
    }
    if group.num_dofs == 0 {
        return Err(PlanningError::InvalidSamples {
            point,
            reason: "samples have zero degrees of freedom".to_string(),
        });
    }
    if group.values.len() != group.num_samples * group.num_dofs {
        return Err(PlanningError::InvalidSamples {
            point,
            reason: format!(
                "{} values do not hold {} samples of {} dofs",
                group.values.len(),
                group.num_samples,
                group.num_dofs
            ),
        });
    }
    // all waypoints of one plan must agree on the DOF count
    if *dofs == 0 {
        *dofs = group.num_dofs;
    } else if group.num_dofs != *dofs {
        return Err(PlanningError::InvalidSamples {
            point,
            reason: format!("expected {} dofs, got {}", dofs, group.num_dofs),
        });
    }
    Ok(())
}

/// Priority queue entry; the smallest accumulated cost must surface first.
#[derive(Debug, PartialEq)]
struct QueueEntry<FloatT: Float> {
    cost: FloatT,
    vertex: usize,
}

impl<FloatT: Float> Ord for QueueEntry<FloatT> {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

impl<FloatT: Float> PartialOrd for QueueEntry<FloatT> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<FloatT: Float> Eq for QueueEntry<FloatT> {}
