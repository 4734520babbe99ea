//! Bevy plugin that answers path requests against the [`SphereGrid`] resource.
use bevy::{log, prelude::*};

use crate::{grid::SphereGrid, path::Path};

/// Answers [`PathRequest`] components using the [`SphereGrid`] resource.
///
/// Entities get a [`Path`] component when a path is found, or a
/// [`PathFailed`] marker when there is none. Changing the request clears the
/// previous answer and the request is answered again.
#[derive(Default)]
pub struct SphereNavPlugin;

impl Plugin for SphereNavPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            (clear_stale_answers, answer_path_requests)
                .chain()
                .in_set(PathingSet),
        );
    }
}

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathingSet;

/// Ask for a path between two world positions on the sphere.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PathRequest {
    pub start: Vec3,
    pub goal: Vec3,
}

impl PathRequest {
    pub fn new(start: Vec3, goal: Vec3) -> Self {
        PathRequest { start, goal }
    }
}

/// Marker inserted when a [`PathRequest`] has no path.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct PathFailed;

fn clear_stale_answers(
    mut commands: Commands,
    query: Query<Entity, (Changed<PathRequest>, Or<(With<Path>, With<PathFailed>)>)>,
) {
    for entity in query.iter() {
        commands.entity(entity).remove::<(Path, PathFailed)>();
    }
}

fn answer_path_requests(
    mut commands: Commands,
    grid: Option<Res<SphereGrid>>,
    query: Query<(Entity, &PathRequest), (Without<Path>, Without<PathFailed>)>,
) {
    // Requests wait until a built grid is available
    let Some(grid) = grid else {
        return;
    };
    if !grid.is_built() {
        return;
    }

    for (entity, request) in query.iter() {
        log::debug!("Pathfinding for entity: {:?}", entity);

        match grid.find_path(request.start, request.goal) {
            Some(path) => {
                commands.entity(entity).insert(path);
            }
            None => {
                commands.entity(entity).insert(PathFailed);
            }
        }
    }
}
