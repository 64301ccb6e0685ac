//! The viewer context.
//!
//! [`Viewer`] owns every piece of interaction state and is the only thing the
//! host talks to: input handlers go in, a frame tick drives animation, and
//! side effects come out through [`ViewerEffects`].

use chrono::{Local, NaiveTime};
use winit::event::{DeviceEvent, KeyEvent};

use crate::{
    animation::tween::TweenEngine,
    config::ViewerConfig,
    error::{RegistryError, ViewerError},
    gfx::{
        camera::{CameraManager, CameraUniform},
        picking::ObjectPicker,
        scene::{NodeId, SceneGraph},
    },
    interaction::{
        actions::{Action, ActionTable},
        ambient::AmbientAnimator,
        effects::{CursorStyle, ViewerEffects},
        hover::{HoverMachine, HoverState},
        intro::{IntroChoreographer, IntroPhase},
        modal::{ModalGate, ModalState},
        pointer::{InputSource, PointerTracker},
        registry::{InteractiveObject, OrderingPolicy, SceneRegistry},
        variants::WorldVariant,
    },
    world::{PanelId, World},
};

pub struct Viewer {
    world: World,
    registry: SceneRegistry,
    loaded: bool,
    variant: WorldVariant,
    ordering: OrderingPolicy,
    intro_delay: f32,
    pointer: PointerTracker,
    hover: HoverMachine,
    modal: ModalGate,
    intro: IntroChoreographer,
    engine: TweenEngine,
    camera: CameraManager,
    picker: ObjectPicker,
    ambient: AmbientAnimator,
    actions: ActionTable,
    /// Nearest registered object under the pointer as of the last frame
    nearest: Option<NodeId>,
    last_timestamp: Option<f64>,
}

impl Viewer {
    /// Viewer for a `width` x `height` viewport, waiting for its model
    pub fn new(config: &ViewerConfig, width: u32, height: u32) -> Result<Self, ViewerError> {
        let variant = config.world_variant()?;
        let aspect = width.max(1) as f32 / height.max(1) as f32;

        log::info!("Viewer using the {} layout", variant.name);
        Ok(Self {
            world: World::default(),
            registry: SceneRegistry::new(),
            loaded: false,
            variant,
            ordering: config.ordering,
            intro_delay: config.intro_delay,
            pointer: PointerTracker::new(width as f32, height as f32),
            hover: HoverMachine::new(config.hover),
            modal: ModalGate::new(config.modal),
            intro: IntroChoreographer::new(),
            engine: TweenEngine::new(),
            camera: config.camera.camera_manager(aspect),
            picker: ObjectPicker::new(),
            ambient: AmbientAnimator::new(),
            actions: config.action_table(),
            nearest: None,
            last_timestamp: None,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn hover_state(&self) -> HoverState {
        self.hover.state()
    }

    pub fn modal_state(&self) -> ModalState {
        self.modal.state()
    }

    pub fn intro_phase(&self) -> IntroPhase {
        self.intro.phase()
    }

    pub fn pointer(&self) -> &PointerTracker {
        &self.pointer
    }

    pub fn camera(&self) -> &CameraManager {
        &self.camera
    }

    pub fn camera_uniform(&self) -> CameraUniform {
        self.camera.camera.uniform
    }

    pub fn orbit_enabled(&self) -> bool {
        self.camera.controller.is_enabled()
    }

    /// Registered object under the pointer as of the last frame
    pub fn nearest_hit(&self) -> Option<&InteractiveObject> {
        self.nearest.and_then(|node| self.registry.object(node))
    }

    /// Takes the loaded model, registers its objects and schedules the intro.
    ///
    /// Returns `Ok(false)` if a model was already loaded; the second scene is
    /// dropped and nothing restarts.
    pub fn on_model_loaded(&mut self, mut scene: SceneGraph) -> Result<bool, RegistryError> {
        if self.loaded {
            log::warn!("Model already loaded, ignoring duplicate load event");
            return Ok(false);
        }

        scene.center_on_origin();
        self.registry = SceneRegistry::populate(&mut scene, &self.variant.registry, self.ordering)?;
        self.world.scene = scene;
        self.loaded = true;

        let timeline = self.variant.intro.build(&self.registry);
        self.intro.schedule(timeline, self.intro_delay);
        Ok(true)
    }

    pub fn on_mouse_move(&mut self, x: f32, y: f32) {
        self.pointer.on_move(x, y);
    }

    pub fn on_touch_start(&mut self, x: f32, y: f32) {
        if self.modal.is_open() {
            return;
        }
        self.pointer.on_touch_start(x, y);
    }

    /// Lift-off acts as a click at the touch point
    pub fn on_touch_end(&mut self, x: f32, y: f32, effects: &mut dyn ViewerEffects) {
        if self.modal.is_open() {
            return;
        }
        self.pointer.on_touch_end(x, y);
        // Touch has no hover frames before it, so pick at the lift-off point
        if self.loaded {
            self.nearest = self.pick();
        }
        self.resolve_click(effects);
    }

    pub fn on_click(&mut self, effects: &mut dyn ViewerEffects) {
        if self.modal.is_open() {
            return;
        }
        if !self.pointer.accepts(InputSource::Mouse) {
            log::debug!("Dropping click that follows a touch");
            return;
        }
        self.resolve_click(effects);
    }

    /// Exit button of the open panel, by mouse or touch
    pub fn on_exit_button(&mut self, source: InputSource) -> bool {
        match source {
            InputSource::Touch => self.pointer.mark_touch(),
            InputSource::Mouse if !self.pointer.accepts(InputSource::Mouse) => {
                log::debug!("Dropping exit click that follows a touch");
                return false;
            }
            InputSource::Mouse => {}
        }
        self.close_panel()
    }

    /// Closes the open panel regardless of input source, e.g. from a key
    pub fn close_panel(&mut self) -> bool {
        self.modal.close(&mut self.engine)
    }

    /// Tapping the dimmed overlay closes the panel too
    pub fn on_overlay_touch_end(&mut self) -> bool {
        self.pointer.mark_touch();
        self.close_panel()
    }

    /// A mouse click on the overlay acts as the exit button
    pub fn on_overlay_click(&mut self) -> bool {
        self.on_exit_button(InputSource::Mouse)
    }

    pub fn on_resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.pointer.resize(width as f32, height as f32);
        self.camera.camera.resize_projection(width, height);
    }

    /// Raw mouse motion, buttons and wheel for orbiting
    pub fn on_device_event(&mut self, event: &DeviceEvent) {
        self.camera.process_event(event);
    }

    pub fn on_keyboard_event(&mut self, event: &KeyEvent) {
        self.camera.process_keyboard_event(event);
    }

    /// Advances one frame. `timestamp` is in seconds since any fixed origin.
    pub fn render_tick(&mut self, timestamp: f64, effects: &mut dyn ViewerEffects) {
        self.render_tick_at(timestamp, Local::now().time(), effects);
    }

    /// [`render_tick`](Self::render_tick) with an explicit wall-clock time
    pub fn render_tick_at(
        &mut self,
        timestamp: f64,
        clock: NaiveTime,
        effects: &mut dyn ViewerEffects,
    ) {
        let dt = self
            .last_timestamp
            .map(|last| (timestamp - last).max(0.0) as f32)
            .unwrap_or(0.0);
        self.last_timestamp = Some(timestamp);

        self.camera.update();

        if self.loaded {
            self.ambient
                .tick(timestamp, clock, &self.registry, &mut self.world);
        }

        self.engine.advance(dt, &mut self.world);

        if self
            .modal
            .poll(&mut self.world, &mut self.engine, effects)
            .is_some()
        {
            self.camera.controller.set_enabled(true);
        }

        self.intro.tick(dt, &mut self.engine);

        if self.loaded && !self.modal.is_open() {
            self.nearest = self.pick();
            let hit = self.nearest.and_then(|node| self.registry.object(node));
            self.hover.update(hit, &self.registry, &mut self.engine);

            let cursor = match hit {
                Some(object) if object.tags.pointer_cursor => CursorStyle::Pointer,
                _ => CursorStyle::Default,
            };
            effects.set_cursor(cursor);
        }

        self.world.scene.update_world_transforms();
    }

    /// Nearest ray cast target under the pointer, resolved to its registered node
    fn pick(&self) -> Option<NodeId> {
        let ray = self
            .picker
            .ray_from_ndc(self.pointer.ndc(), &self.camera.camera);
        let hits = self.picker.intersect(
            &ray,
            &self.world.scene,
            self.registry.raycast_targets(),
        );
        let nearest = hits.first()?;
        self.registered_ancestor(nearest.node)
    }

    /// Child geometry of a target reports the target itself
    fn registered_ancestor(&self, node: NodeId) -> Option<NodeId> {
        let mut current = Some(node);
        while let Some(id) = current {
            if self.registry.object(id).is_some() {
                return Some(id);
            }
            current = self.world.scene.node(id).and_then(|node| node.parent);
        }
        None
    }

    fn resolve_click(&mut self, effects: &mut dyn ViewerEffects) {
        let Some(object) = self.nearest_hit() else {
            return;
        };
        let actions = self.actions.resolve(object);
        log::debug!("Click on {} resolves to {actions:?}", object.name);

        for action in actions {
            match action {
                Action::OpenUrl(url) => effects.open_url(&url),
                Action::OpenPanel(panel) => {
                    self.open_panel(panel, effects);
                }
            }
        }
    }

    /// Opens `panel`, exiting any hover and freezing orbit input
    pub fn open_panel(&mut self, panel: PanelId, effects: &mut dyn ViewerEffects) -> bool {
        if !self
            .modal
            .open(panel, &mut self.world, &mut self.engine, effects)
        {
            return false;
        }

        if let Some(previous) = self.hover.force_idle(&self.registry, &mut self.engine) {
            log::debug!("Panel open ends hover on {previous:?}");
        }
        self.nearest = None;
        self.camera.controller.set_enabled(false);
        effects.set_cursor(CursorStyle::Default);
        true
    }
}
