use glam::Vec2;
use scroller_core::{CellCoord, Command, Event, MapModel, Marker, Viewport};
use scroller_world::{
    apply,
    camera::{CameraConfig, PROJECTION_HALF_HEIGHT},
    query, World,
};

fn apply_all(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        apply(world, command, &mut events);
    }
    events
}

#[test]
fn world_starts_without_map_or_selection() {
    let world = World::default();

    assert!(query::map(&world).is_none());
    assert!(query::selection(&world).is_none());
    assert_eq!(
        query::camera(&world).zoom(),
        CameraConfig::DEFAULT_INITIAL_ZOOM
    );
}

#[test]
fn replacing_the_map_announces_dimensions() {
    let mut world = World::default();
    let events = apply_all(
        &mut world,
        [Command::ReplaceMap {
            map: MapModel::fallback(),
        }],
    );

    assert_eq!(
        events,
        vec![Event::MapReplaced {
            width: 10,
            height: 10
        }]
    );
    assert_eq!(
        query::marker_at(&world, CellCoord::new(0, 0)),
        Some(Marker::Tank)
    );
}

#[test]
fn replacing_the_map_drops_the_selection() {
    let mut world = World::default();
    let _ = apply_all(
        &mut world,
        [
            Command::ReplaceMap {
                map: MapModel::fallback(),
            },
            Command::SelectCell {
                cell: CellCoord::new(1, 0),
            },
        ],
    );
    assert_eq!(query::selection(&world), Some(CellCoord::new(1, 0)));

    let events = apply_all(
        &mut world,
        [Command::ReplaceMap {
            map: MapModel::fallback(),
        }],
    );

    assert_eq!(events[0], Event::SelectionChanged { cell: None });
    assert!(query::selection(&world).is_none());
}

#[test]
fn resize_is_reported_only_when_dimensions_change() {
    let mut world = World::default();
    let viewport = Viewport::new(1080, 1920);
    let events = apply_all(
        &mut world,
        [
            Command::ResizeViewport { viewport },
            Command::ResizeViewport { viewport },
        ],
    );

    assert_eq!(events, vec![Event::ViewportResized { viewport }]);
    assert_eq!(query::camera(&world).viewport(), viewport);
}

#[test]
fn scroll_commands_accumulate() {
    let mut world = World::default();
    let events = apply_all(
        &mut world,
        [
            Command::ScrollCamera {
                delta: Vec2::new(0.5, 0.0),
            },
            Command::ScrollCamera {
                delta: Vec2::new(0.25, -1.0),
            },
        ],
    );

    assert_eq!(
        events.last(),
        Some(&Event::CameraScrolled {
            scroll: Vec2::new(0.75, -1.0)
        })
    );
    assert_eq!(query::camera(&world).scroll(), Vec2::new(0.75, -1.0));
}

#[test]
fn zoom_outside_bounds_is_rejected_and_state_is_kept() {
    let mut world = World::default();
    let events = apply_all(
        &mut world,
        [
            Command::ZoomCamera { factor: 2.0 },
            Command::ZoomCamera { factor: 4.0 },
        ],
    );

    assert_eq!(
        events,
        vec![
            Event::ZoomChanged {
                factor: 2.0,
                zoom: 2.0
            },
            Event::ZoomRejected { factor: 4.0 },
        ]
    );
    assert_eq!(query::camera(&world).zoom(), 2.0);
}

#[test]
fn zoom_scales_visible_half_height() {
    let mut world = World::default();
    let _ = apply_all(
        &mut world,
        [
            Command::ResizeViewport {
                viewport: Viewport::new(100, 100),
            },
            Command::ZoomCamera { factor: 2.0 },
        ],
    );

    let half = query::camera(&world).half_extents();
    assert!((half.y - PROJECTION_HALF_HEIGHT / 2.0).abs() < 1e-6);
}

#[test]
fn taps_carry_the_scroll_offset_at_the_time_they_land() {
    let mut world = World::default();
    let events = apply_all(
        &mut world,
        [
            Command::ScrollCamera {
                delta: Vec2::new(1.0, 2.0),
            },
            Command::TapAt {
                world: Vec2::new(-0.5, 0.5),
            },
        ],
    );

    assert_eq!(
        events.last(),
        Some(&Event::Tapped {
            world: Vec2::new(-0.5, 0.5),
            scroll: Vec2::new(1.0, 2.0),
        })
    );
}

#[test]
fn selecting_outside_the_map_clears_the_selection() {
    let mut world = World::default();
    let _ = apply_all(
        &mut world,
        [
            Command::ReplaceMap {
                map: MapModel::fallback(),
            },
            Command::SelectCell {
                cell: CellCoord::new(0, 0),
            },
        ],
    );

    let events = apply_all(
        &mut world,
        [Command::SelectCell {
            cell: CellCoord::new(10, 0),
        }],
    );

    assert_eq!(events, vec![Event::SelectionChanged { cell: None }]);
    assert!(query::selection(&world).is_none());
}

#[test]
fn selecting_without_a_map_is_ignored() {
    let mut world = World::default();
    let events = apply_all(
        &mut world,
        [Command::SelectCell {
            cell: CellCoord::new(0, 0),
        }],
    );

    assert!(events.is_empty());
    assert!(query::selection(&world).is_none());
}

#[test]
fn clearing_the_selection_is_always_announced() {
    let mut world = World::default();
    let events = apply_all(&mut world, [Command::ClearSelection]);

    assert_eq!(events, vec![Event::SelectionChanged { cell: None }]);
}
