//! Path queries: resolve world positions to nodes, validate them and run the search.
use bevy::{log, math::Vec3};

use crate::{astar::astar_graph, graph::NavGraph, path::Path, NodeId};

/// Finds a path between the nodes closest to `start` and `goal`.
///
/// This function is provided if you want to supply your own [`NavGraph`].
/// If you're using the built in [`crate::grid::SphereGrid`] use
/// [`crate::grid::SphereGrid::find_path`] instead.
///
/// # Arguments
/// * `graph` - The graph to search.
/// * `start` - World position the path starts from.
/// * `goal` - World position the path should reach.
///
/// # Returns
/// The path from the goal node back toward the start node, or `None` if either
/// end lands on an unwalkable node or the goal cannot be reached.
pub fn pathfind<G: NavGraph + ?Sized>(graph: &G, start: Vec3, goal: Vec3) -> Option<Path> {
    let start_id = graph.closest_node(start)?;
    let goal_id = graph.closest_node(goal)?;

    pathfind_nodes(graph, start_id, goal_id)
}

/// Same as [`pathfind`] for already resolved node ids.
pub fn pathfind_nodes<G: NavGraph + ?Sized>(
    graph: &G,
    start: NodeId,
    goal: NodeId,
) -> Option<Path> {
    let start_node = graph.node(start)?;
    let goal_node = graph.node(goal)?;

    if !start_node.walkable || !goal_node.walkable {
        log::debug!(
            "Path endpoints are not walkable: start {} ({}), goal {} ({})",
            start,
            start_node.walkable,
            goal,
            goal_node.walkable
        );
        return None;
    }

    let path = astar_graph(graph, start, goal, graph.node_count());

    if path.is_none() {
        log::debug!("No path found from node {} to node {}", start, goal);
    }

    path
}
