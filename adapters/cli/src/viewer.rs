use scroller_core::{Command, Event, SelectionReport};
use scroller_network::{AssetHandoff, SelectionNotifier};
use scroller_rendering::{
    frame::FrameRenderer, geometry::GeometryCache, DrawBackend, FrameInput,
};
use scroller_system_gestures::GestureController;
use scroller_system_selection::SelectionController;
use scroller_world::{apply, query, World};
use tracing::{debug, info, trace, warn};

/// Destination for selection reports produced on the render thread.
pub(crate) trait ReportOutbox {
    /// Hands over a report without blocking.
    fn deliver(&mut self, report: SelectionReport);
}

impl ReportOutbox for SelectionNotifier {
    fn deliver(&mut self, report: SelectionReport) {
        self.notify(report);
    }
}

impl<T: ReportOutbox> ReportOutbox for Option<T> {
    fn deliver(&mut self, report: SelectionReport) {
        match self {
            Some(outbox) => outbox.deliver(report),
            None => debug!(x = report.x, y = report.y, "offline, selection not reported"),
        }
    }
}

/// Owns every piece of per-frame state and runs the frame pipeline.
pub(crate) struct Viewer<O> {
    world: World,
    gestures: GestureController,
    selection: SelectionController,
    geometry: GeometryCache,
    renderer: FrameRenderer,
    handoff: AssetHandoff,
    outbox: O,
}

impl<O: ReportOutbox> Viewer<O> {
    pub(crate) fn new(
        world: World,
        selection: SelectionController,
        handoff: AssetHandoff,
        outbox: O,
    ) -> Self {
        Self {
            world,
            gestures: GestureController::new(),
            selection,
            geometry: GeometryCache::default(),
            renderer: FrameRenderer::new(),
            handoff,
            outbox,
        }
    }

    /// Advances the viewer by one frame and draws it.
    pub(crate) fn frame<B>(&mut self, input: FrameInput, backend: &mut B)
    where
        B: DrawBackend + ?Sized,
    {
        let mut events = Vec::new();
        let mut commands = Vec::new();

        if let Some(assets) = self.handoff.poll() {
            info!(
                origin = ?assets.origin,
                width = assets.map.width(),
                height = assets.map.height(),
                "map ready"
            );
            commands.push(Command::ReplaceMap { map: assets.map });
            if let Some(png) = assets.sprite {
                if let Err(error) = self.renderer.attach_sprite(backend, &png) {
                    warn!(%error, "sprite rejected, tanks will not be drawn");
                }
            }
        }
        commands.push(Command::ResizeViewport {
            viewport: input.viewport,
        });
        self.apply_all(commands.drain(..), &mut events);

        let gesture_start = events.len();
        self.gestures
            .handle_batch(&input.touches, query::camera(&self.world), &mut commands);
        self.apply_all(commands.drain(..), &mut events);
        self.gestures.observe(&events[gesture_start..]);
        log_camera_events(&events[gesture_start..]);

        let mut reports = Vec::new();
        self.selection.handle(
            &events[gesture_start..],
            query::map(&self.world),
            &mut commands,
            &mut reports,
        );
        self.apply_all(commands.drain(..), &mut events);

        self.geometry.handle(&events);
        let _ = self
            .geometry
            .refresh(query::map(&self.world), query::selection(&self.world));
        self.renderer.observe(&events);

        for report in reports {
            debug!(x = report.x, y = report.y, "tank selected");
            self.outbox.deliver(report);
        }

        let camera = query::camera(&self.world);
        self.renderer.render(
            backend,
            input.viewport,
            || camera.projection_matrix(),
            camera.model_matrix(),
            self.geometry.buffers(),
        );
    }

    fn apply_all(&mut self, commands: impl Iterator<Item = Command>, events: &mut Vec<Event>) {
        for command in commands {
            apply(&mut self.world, command, events);
        }
    }

    #[cfg(test)]
    fn world(&self) -> &World {
        &self.world
    }

    #[cfg(test)]
    fn outbox(&self) -> &O {
        &self.outbox
    }
}

fn log_camera_events(events: &[Event]) {
    for event in events {
        match event {
            Event::CameraScrolled { scroll } => trace!(x = scroll.x, y = scroll.y, "scrolled"),
            Event::ZoomChanged { zoom, .. } => debug!(zoom, "zoomed"),
            Event::ZoomRejected { factor } => debug!(factor, "zoom step out of bounds"),
            Event::Tapped { world, .. } => debug!(x = world.x, y = world.y, "tap"),
            _ => {}
        }
    }
}
