//! A* search over a [`NavGraph`].
use std::cmp::Ordering;

use bevy::math::Vec3;
use indexmap::map::Entry::{Occupied, Vacant};

use crate::{
    graph::NavGraph,
    heap::{HeapItem, IndexedHeap},
    path::Path,
    FxIndexMap, NodeId,
};

/// A node waiting in the open set.
#[derive(Debug, Clone, Copy)]
struct OpenNode {
    id: NodeId,
    g_cost: f32,
    h_cost: f32,
}

impl OpenNode {
    fn f_cost(&self) -> f32 {
        self.g_cost + self.h_cost
    }
}

impl HeapItem for OpenNode {
    type Key = NodeId;

    fn key(&self) -> NodeId {
        self.id
    }

    // Lowest f first, ties go to the node closer to the goal.
    fn priority_cmp(&self, other: &Self) -> Ordering {
        self.f_cost()
            .total_cmp(&other.f_cost())
            .then_with(|| self.h_cost.total_cmp(&other.h_cost))
    }
}

/// Per-query bookkeeping for a node the search has reached.
#[derive(Debug, Clone, Copy)]
struct Visit {
    /// Index of the parent in the visited map, `usize::MAX` for the start.
    parent: usize,
    g_cost: f32,
    closed: bool,
}

/// Straight line distance, used both as edge length and as heuristic.
#[inline(always)]
pub(crate) fn heuristic(a: Vec3, b: Vec3) -> f32 {
    a.distance(b)
}

/// A* search from `start` to `goal`.
///
/// All search state lives in this call, so a graph can be searched by many
/// queries at once. Unwalkable neighbors are skipped even though a built
/// grid never links them.
///
/// # Arguments
/// * `graph` - The graph to search.
/// * `start` - Id of the start node.
/// * `goal` - Id of the goal node.
/// * `size_hint` - A hint for the size of the open set.
///
/// # Returns
/// * `Option<Path>` - The positions from `goal` back to the node after `start`
///   (the start itself is not included) and the total edge length, or `None`
///   if the open set runs dry before the goal is reached.
pub(crate) fn astar_graph<G: NavGraph + ?Sized>(
    graph: &G,
    start: NodeId,
    goal: NodeId,
    size_hint: usize,
) -> Option<Path> {
    let goal_pos = graph.node(goal)?.position;

    let mut to_visit: IndexedHeap<OpenNode> = IndexedHeap::with_capacity(size_hint / 2);
    let mut visited: FxIndexMap<NodeId, Visit> = FxIndexMap::default();

    visited.insert(
        start,
        Visit {
            parent: usize::MAX,
            g_cost: 0.0,
            closed: false,
        },
    );
    to_visit.add(OpenNode {
        id: start,
        g_cost: 0.0,
        h_cost: heuristic(graph.node(start)?.position, goal_pos),
    });

    while let Some(OpenNode { id, g_cost, .. }) = to_visit.remove_best() {
        let index = visited.get_index_of(&id)?;

        if id == goal {
            return Some(backtrace(graph, &visited, index, g_cost));
        }

        visited[index].closed = true;

        let Some(node) = graph.node(id) else {
            continue;
        };

        for neighbor in node.neighbors.iter() {
            let Some(neighbor_node) = graph.node(neighbor.id) else {
                continue;
            };
            if !neighbor_node.walkable {
                continue;
            }

            let new_cost = g_cost + neighbor.distance;

            match visited.entry(neighbor.id) {
                Vacant(e) => {
                    e.insert(Visit {
                        parent: index,
                        g_cost: new_cost,
                        closed: false,
                    });
                    to_visit.add(OpenNode {
                        id: neighbor.id,
                        g_cost: new_cost,
                        h_cost: heuristic(neighbor_node.position, goal_pos),
                    });
                }
                Occupied(mut e) => {
                    let visit = e.get_mut();
                    if visit.closed || visit.g_cost <= new_cost {
                        continue;
                    }

                    visit.parent = index;
                    visit.g_cost = new_cost;

                    let open = OpenNode {
                        id: neighbor.id,
                        g_cost: new_cost,
                        h_cost: heuristic(neighbor_node.position, goal_pos),
                    };
                    if !to_visit.update_item(open) {
                        to_visit.add(open);
                    }
                }
            }
        }
    }

    None
}

// Walks parent links from the goal, stopping before the start.
fn backtrace<G: NavGraph + ?Sized>(
    graph: &G,
    visited: &FxIndexMap<NodeId, Visit>,
    goal_index: usize,
    cost: f32,
) -> Path {
    let mut steps = Vec::new();
    let mut current = goal_index;

    while let Some((&id, visit)) = visited.get_index(current) {
        if visit.parent == usize::MAX {
            break;
        }
        if let Some(node) = graph.node(id) {
            steps.push(node.position);
        }
        current = visit.parent;
    }

    Path::new(steps, cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::NavNode;

    /// Flat `width` x `height` grid on the XZ plane with 8-way links.
    /// `blocked` cells are unwalkable and unlinked.
    fn flat_grid(width: usize, height: usize, blocked: &[(usize, usize)]) -> Vec<NavNode> {
        let id = |x: usize, y: usize| y * width + x;
        let mut nodes: Vec<NavNode> = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                NavNode::new(
                    Vec3::new(x as f32, 0.0, y as f32),
                    !blocked.contains(&(x, y)),
                )
            })
            .collect();

        for y in 0..height {
            for x in 0..width {
                if !nodes[id(x, y)].walkable {
                    continue;
                }
                for dy in -1i32..=1 {
                    for dx in -1i32..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let (nx, ny) = (x as i32 + dx, y as i32 + dy);
                        if nx < 0 || ny < 0 || nx >= width as i32 || ny >= height as i32 {
                            continue;
                        }
                        let n = id(nx as usize, ny as usize);
                        if nodes[n].walkable {
                            let pos = nodes[n].position;
                            nodes[id(x, y)].add_neighbor(n, pos);
                        }
                    }
                }
            }
        }

        nodes
    }

    #[test]
    fn test_astar_flat_grid_chebyshev_length() {
        let nodes = flat_grid(8, 8, &[]);
        let id = |x: usize, y: usize| y * 8 + x;

        for (start, goal) in [((0, 0), (7, 7)), ((0, 0), (7, 2)), ((3, 1), (3, 6)), ((6, 5), (1, 0))] {
            let path = astar_graph(&nodes, id(start.0, start.1), id(goal.0, goal.1), 64).unwrap();

            let dx = (start.0 as i32 - goal.0 as i32).unsigned_abs() as usize;
            let dy = (start.1 as i32 - goal.1 as i32).unsigned_abs() as usize;
            assert_eq!(path.len(), dx.max(dy), "{start:?} -> {goal:?}");

            // Octile distance
            let (long, short) = (dx.max(dy) as f32, dx.min(dy) as f32);
            let expected = long - short + short * std::f32::consts::SQRT_2;
            assert!((path.cost() - expected).abs() < 1e-4);
        }
    }

    #[test]
    fn test_astar_path_order_excludes_start() {
        let nodes = flat_grid(5, 1, &[]);

        let path = astar_graph(&nodes, 0, 4, 16).unwrap();

        assert_eq!(
            path.path(),
            &[
                Vec3::new(4.0, 0.0, 0.0),
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
            ]
        );
        assert_eq!(path.cost(), 4.0);
    }

    #[test]
    fn test_astar_same_start_and_goal() {
        let nodes = flat_grid(3, 3, &[]);
        let path = astar_graph(&nodes, 4, 4, 16).unwrap();
        assert!(path.is_empty());
        assert_eq!(path.cost(), 0.0);
    }

    #[test]
    fn test_astar_with_wall() {
        // Wall across x = 2 with a gap at the top
        let wall: Vec<(usize, usize)> = (0..4).map(|y| (2, y)).collect();
        let nodes = flat_grid(5, 5, &wall);
        let id = |x: usize, y: usize| y * 5 + x;

        let path = astar_graph(&nodes, id(0, 0), id(4, 0), 64).unwrap();

        assert!(path.is_position_in_path(Vec3::new(2.0, 0.0, 4.0)));
        for y in 0..4 {
            assert!(!path.is_position_in_path(Vec3::new(2.0, 0.0, y as f32)));
        }
    }

    #[test]
    fn test_astar_unreachable() {
        // Goal in the corner boxed in by walls
        let nodes = flat_grid(5, 5, &[(3, 4), (3, 3), (4, 3)]);
        let id = |x: usize, y: usize| y * 5 + x;

        assert!(astar_graph(&nodes, id(0, 0), id(4, 4), 64).is_none());
    }

    #[test]
    fn test_astar_relaxes_open_nodes() {
        // 0 -> 3 has a long direct edge and two shorter detours through 1 and 2.
        // 3 is first queued through the long edge and must be relaxed.
        let mut nodes = vec![
            NavNode::new(Vec3::new(0.0, 0.0, 0.0), true),
            NavNode::new(Vec3::new(1.0, 1.0, 0.0), true),
            NavNode::new(Vec3::new(1.0, -0.1, 0.0), true),
            NavNode::new(Vec3::new(2.0, 0.0, 0.0), true),
            NavNode::new(Vec3::new(3.0, 0.0, 0.0), true),
        ];
        let link = |nodes: &mut Vec<NavNode>, a: usize, b: usize, distance: f32| {
            nodes[a].neighbors.push(crate::node::Neighbor { id: b, distance });
            nodes[b].neighbors.push(crate::node::Neighbor { id: a, distance });
        };
        link(&mut nodes, 0, 3, 10.0);
        link(&mut nodes, 0, 1, 1.5);
        link(&mut nodes, 1, 3, 1.5);
        link(&mut nodes, 0, 2, 1.0);
        link(&mut nodes, 2, 3, 1.0);
        link(&mut nodes, 3, 4, 1.0);

        let path = astar_graph(&nodes, 0, 4, 16).unwrap();

        assert_eq!(path.cost(), 3.0);
        assert_eq!(
            path.path(),
            &[
                Vec3::new(3.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(1.0, -0.1, 0.0),
            ]
        );
    }
}
