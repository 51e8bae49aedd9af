//! The interactive annotation viewport.
//!
//! [`AnnotationViewport`] ties the pieces together: it owns the transform,
//! the pick registry and surface, the label store, and the gesture state,
//! and turns decoded input events into label mutations. Handlers return the
//! observable consequences as [`ViewerEvent`]s so the embedding layer can
//! react (persist, update chrome, schedule a repaint) without callbacks.

use std::time::{Duration, Instant};

use kurbo::{Point, Size, Vec2};
use log::debug;

use crate::defer::Deferred;
use crate::error::ViewportResult;
use crate::input::{Key, Modifiers, MouseButton, PointerEvent};
use crate::label::{BoxLabel, CursorStyle, Label, LabelId, LabelStore, LabelTemplate};
use crate::picking::{OffscreenPickSurface, PickRegistry};
use crate::raster::Raster;
use crate::shapes::{PickShape, ShapeId};
use crate::viewport::{ViewportTransform, SCALE_RATIO};

/// How long after a first click a second one may still complete a
/// double-click before deferred creation runs.
pub const DOUBLE_CLICK_WAIT: Duration = Duration::from_millis(300);

/// Debounce window for re-rendering the pick surface after zoom changes.
pub const PICK_REFRESH_DEBOUNCE: Duration = Duration::from_millis(150);

/// How clicks on empty space create labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CreationMode {
    /// A single click creates immediately (drag tools like boxes).
    #[default]
    SingleClick,
    /// Creation waits out the double-click window (vertex tools, where a
    /// plain click must stay ambiguous until the timer expires).
    DoubleClick,
}

/// Observable consequences of a handled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    SelectionChanged(Option<LabelId>),
    HoverChanged(Option<LabelId>),
    LabelCreated(LabelId),
    LabelDeleted(LabelId),
    SaveRequested,
    NavigatePrev,
    NavigateNext,
    /// Track-link mode entered (true) or left (false); the linking
    /// semantics themselves live outside this crate.
    LinkMode(bool),
    SequenceEnded,
    LabelLayerVisibility(bool),
    RedrawNeeded,
}

/// Builds a label of the embedder's choosing from the active template at an
/// image point.
pub type LabelFactory = Box<dyn Fn(&LabelTemplate, Point) -> Box<dyn Label>>;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Gesture {
    Idle,
    /// Structural-modifier drag scrolling the zoomed canvas.
    Panning { anchor: Point, origin: Vec2 },
    /// Pointer held, gesture forwarded to the selected label.
    Dragging,
    /// Pointer held over empty space in double-click mode.
    DownNoTarget,
}

/// Interaction controller for one image.
pub struct AnnotationViewport {
    transform: ViewportTransform,
    registry: PickRegistry,
    surface: OffscreenPickSurface,
    labels: LabelStore,
    label_layer: Raster,
    template: LabelTemplate,
    factory: LabelFactory,
    creation_mode: CreationMode,
    selected: Option<LabelId>,
    hovered: Option<LabelId>,
    hovered_shape: Option<ShapeId>,
    gesture: Gesture,
    linking: bool,
    labels_visible: bool,
    active: bool,
    deferred_create: Deferred<Point>,
    pick_refresh: Deferred<()>,
}

impl AnnotationViewport {
    /// Viewport creating [`BoxLabel`]s on empty-space clicks.
    pub fn new(image_size: Size, container_size: Size) -> ViewportResult<Self> {
        Self::with_factory(
            image_size,
            container_size,
            Box::new(|template, point| Box::new(BoxLabel::new(template, point))),
        )
    }

    /// Viewport with a custom label factory.
    pub fn with_factory(
        image_size: Size,
        container_size: Size,
        factory: LabelFactory,
    ) -> ViewportResult<Self> {
        let transform = ViewportTransform::new(image_size, container_size)?;
        let mut viewport = Self {
            transform,
            registry: PickRegistry::new(),
            surface: OffscreenPickSurface::new(),
            labels: LabelStore::new(),
            label_layer: Raster::new(0, 0),
            template: LabelTemplate::default(),
            factory,
            creation_mode: CreationMode::default(),
            selected: None,
            hovered: None,
            hovered_shape: None,
            gesture: Gesture::Idle,
            linking: false,
            labels_visible: true,
            active: true,
            deferred_create: Deferred::new(),
            pick_refresh: Deferred::new(),
        };
        let mut events = Vec::new();
        viewport.refresh_all(&mut events);
        Ok(viewport)
    }

    pub fn transform(&self) -> &ViewportTransform {
        &self.transform
    }

    pub fn labels(&self) -> &LabelStore {
        &self.labels
    }

    /// Mutable label access for external edits; call
    /// [`Self::notify_labels_changed`] afterwards.
    pub fn labels_mut(&mut self) -> &mut LabelStore {
        &mut self.labels
    }

    /// The rendered label layer at buffer resolution.
    pub fn label_layer(&self) -> &Raster {
        &self.label_layer
    }

    pub fn selected(&self) -> Option<LabelId> {
        self.selected
    }

    pub fn hovered(&self) -> Option<LabelId> {
        self.hovered
    }

    pub fn set_template(&mut self, template: LabelTemplate) {
        self.template = template;
    }

    pub fn set_creation_mode(&mut self, mode: CreationMode) {
        self.creation_mode = mode;
    }

    pub fn current_zoom_scale(&self) -> f64 {
        self.transform.scale()
    }

    /// Set the zoom scale, rendering both layers synchronously. Returns
    /// false (and changes nothing) for scales outside the accepted range.
    pub fn set_zoom(&mut self, scale: f64, pivot: Option<Point>) -> bool {
        if !self.transform.set_scale(scale, pivot) {
            return false;
        }
        let mut events = Vec::new();
        self.refresh_all(&mut events);
        true
    }

    /// Adopt a new container size.
    pub fn resize(&mut self, container_size: Size) -> Vec<ViewerEvent> {
        let mut events = Vec::new();
        self.transform.resize(container_size);
        self.refresh_all(&mut events);
        events
    }

    pub fn screen_to_image(&self, position: Point) -> Point {
        self.clamp_to_image(self.transform.display_to_image(position))
    }

    pub fn image_to_screen(&self, point: Point) -> Point {
        self.transform.image_to_display(point)
    }

    /// Which shape the pick surface resolves at an image point.
    pub fn resolve_shape_at(&self, image_point: Point) -> Option<&PickShape> {
        self.surface.pick(&self.registry, image_point, &self.transform)
    }

    /// Cursor to show, by priority: panning, then an active drag, then the
    /// hovered shape's preference, then the drawing crosshair.
    pub fn cursor(&self) -> CursorStyle {
        match self.gesture {
            Gesture::Panning { .. } => CursorStyle::Grabbing,
            Gesture::Dragging => CursorStyle::Move,
            _ => match (self.hovered_shape, self.hovered) {
                (Some(shape), Some(owner)) => self
                    .labels
                    .get(owner)
                    .map(|label| label.cursor_for(shape))
                    .unwrap_or(CursorStyle::Crosshair),
                _ => CursorStyle::Crosshair,
            },
        }
    }

    /// Stop reacting to input, discarding any gesture in flight. Nothing is
    /// committed: pending creation and pick refresh are dropped.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.gesture = Gesture::Idle;
        self.deferred_create.cancel();
        self.pick_refresh.cancel();
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    /// Re-validate after external label edits: drops labels whose geometry
    /// became meaningless, clearing selection and hover when they pointed at
    /// one, then redraws.
    pub fn notify_labels_changed(&mut self) -> Vec<ViewerEvent> {
        let mut events = Vec::new();
        if self.labels.retain_valid(self.selected) {
            self.selected = None;
            events.push(ViewerEvent::SelectionChanged(None));
        }
        if let Some(hovered) = self.hovered {
            if self.labels.get(hovered).is_none() {
                self.hovered = None;
                self.hovered_shape = None;
                events.push(ViewerEvent::HoverChanged(None));
            }
        }
        self.refresh_all(&mut events);
        events
    }

    /// Advance timers. Call with a monotonic now; fires at most one
    /// deferred creation and one pick refresh per call.
    pub fn tick(&mut self, now: Instant) -> Vec<ViewerEvent> {
        let mut events = Vec::new();
        if !self.active {
            return events;
        }
        if let Some(point) = self.deferred_create.fire(now) {
            if self.selected.is_none() {
                debug!("deferred creation at {point:?}");
                self.create_label(point, &mut events);
                self.refresh_all(&mut events);
            }
        }
        if self.pick_refresh.fire(now).is_some() {
            self.rebuild_registry();
            self.surface.render(&self.registry, &self.transform);
        }
        events
    }

    /// Handle one pointer event.
    pub fn handle_pointer(&mut self, event: PointerEvent, now: Instant) -> Vec<ViewerEvent> {
        let mut events = Vec::new();
        if !self.active {
            return events;
        }
        match event {
            PointerEvent::Down {
                position,
                button: MouseButton::Left,
                modifiers,
            } => self.on_down(position, modifiers, &mut events),
            PointerEvent::Up {
                position,
                button: MouseButton::Left,
                ..
            } => self.on_up(position, now, &mut events),
            PointerEvent::Move {
                position,
                modifiers,
            } => self.on_move(position, modifiers, &mut events),
            PointerEvent::DoubleClick {
                position,
                modifiers,
            } => self.on_double_click(position, modifiers, &mut events),
            PointerEvent::Wheel {
                position,
                delta,
                modifiers,
            } => self.on_wheel(position, delta, modifiers, now, &mut events),
            _ => {}
        }
        events
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: Key, modifiers: Modifiers) -> Vec<ViewerEvent> {
        let mut events = Vec::new();
        if !self.active {
            return events;
        }
        if modifiers.structural {
            self.on_command_key(key, &mut events);
        } else {
            self.on_plain_key(key, &mut events);
        }
        events
    }

    fn on_down(&mut self, position: Point, modifiers: Modifiers, events: &mut Vec<ViewerEvent>) {
        if modifiers.structural {
            // Structural clicks never touch labels; they pan when there is
            // anything to pan.
            if self.transform.content_exceeds_container() {
                self.gesture = Gesture::Panning {
                    anchor: position,
                    origin: self.transform.scroll(),
                };
            }
            return;
        }
        let image = self.screen_to_image(position);
        let target = self.resolve_target(image);
        match self.creation_mode {
            CreationMode::SingleClick => match target {
                Some((shape, owner)) => {
                    self.select(Some(owner), events);
                    self.forward_down(image, Some(shape));
                    // The selection's edit handles must be pickable before
                    // the next query, and the highlight drawn now.
                    self.refresh_all(events);
                }
                None => {
                    self.create_label(image, events);
                    self.forward_down(image, None);
                    self.refresh_all(events);
                }
            },
            CreationMode::DoubleClick => {
                if self.selected.is_some() {
                    self.forward_down(image, target.map(|(shape, _)| shape));
                } else if let Some((shape, owner)) = target {
                    self.select(Some(owner), events);
                    self.forward_down(image, Some(shape));
                    self.refresh_all(events);
                } else {
                    self.gesture = Gesture::DownNoTarget;
                }
            }
        }
    }

    fn on_up(&mut self, position: Point, now: Instant, events: &mut Vec<ViewerEvent>) {
        let image = self.screen_to_image(position);
        match self.gesture {
            Gesture::Panning { .. } => {}
            Gesture::Dragging => {
                if let Some(id) = self.selected {
                    if let Some(label) = self.labels.get_mut(id) {
                        label.pointer_up(image);
                    }
                }
                self.refresh_all(events);
            }
            Gesture::DownNoTarget => {
                // First click of a potential double-click: creation waits
                // out the disambiguation window. A selection arriving before
                // the deadline cancels it.
                if self.selected.is_none() {
                    self.deferred_create.schedule(now + DOUBLE_CLICK_WAIT, image);
                }
            }
            Gesture::Idle => {}
        }
        self.gesture = Gesture::Idle;
    }

    fn on_move(&mut self, position: Point, modifiers: Modifiers, events: &mut Vec<ViewerEvent>) {
        match self.gesture {
            Gesture::Panning { anchor, origin } => {
                self.transform.set_scroll(origin + (anchor - position));
                events.push(ViewerEvent::RedrawNeeded);
            }
            Gesture::Dragging => {
                let image = self.screen_to_image(position);
                let mut changed = false;
                if let Some(id) = self.selected {
                    if let Some(label) = self.labels.get_mut(id) {
                        changed = label.pointer_move(image);
                    }
                }
                if changed {
                    self.render_labels();
                    events.push(ViewerEvent::RedrawNeeded);
                }
                // Hover keeps tracking through the drag.
                if !modifiers.structural {
                    self.update_hover(image, events);
                }
            }
            _ => {
                if !modifiers.structural {
                    let image = self.screen_to_image(position);
                    self.update_hover(image, events);
                }
            }
        }
    }

    fn on_double_click(
        &mut self,
        position: Point,
        modifiers: Modifiers,
        events: &mut Vec<ViewerEvent>,
    ) {
        if modifiers.structural {
            return;
        }
        let image = self.screen_to_image(position);
        let target = self.resolve_target(image);
        if let Some(id) = self.selected {
            let owned = target
                .filter(|(_, owner)| *owner == id)
                .map(|(shape, _)| shape);
            if let Some(label) = self.labels.get_mut(id) {
                label.double_click(owned);
            }
        } else if let Some((shape, owner)) = target {
            self.select(Some(owner), events);
            if let Some(label) = self.labels.get_mut(owner) {
                label.double_click(Some(shape));
            }
            self.refresh_all(events);
        }
    }

    fn on_wheel(
        &mut self,
        position: Point,
        delta: Vec2,
        modifiers: Modifiers,
        now: Instant,
        events: &mut Vec<ViewerEvent>,
    ) {
        if !modifiers.structural {
            return;
        }
        let scale = if delta.y < 0.0 {
            self.transform.scale() * SCALE_RATIO
        } else {
            self.transform.scale() / SCALE_RATIO
        };
        if self.transform.set_scale(scale, Some(position)) {
            // The visible layer follows immediately; the pick surface is
            // refreshed once the wheel settles.
            self.render_labels();
            events.push(ViewerEvent::RedrawNeeded);
        }
        // Every structural wheel re-arms the refresh window, including
        // no-op ticks at the zoom bounds.
        self.pick_refresh.schedule(now + PICK_REFRESH_DEBOUNCE, ());
    }

    fn on_command_key(&mut self, key: Key, events: &mut Vec<ViewerEvent>) {
        match key {
            Key::Char('s') => events.push(ViewerEvent::SaveRequested),
            Key::Char('f') => {
                if let Some(id) = self.selected {
                    if self.labels.bring_to_front(id) {
                        self.refresh_all(events);
                    }
                }
            }
            Key::Char('b') => {
                if let Some(id) = self.selected {
                    if self.labels.send_to_back(id) {
                        self.refresh_all(events);
                    }
                }
            }
            Key::Char('h') => {
                self.labels_visible = !self.labels_visible;
                events.push(ViewerEvent::LabelLayerVisibility(self.labels_visible));
                self.render_labels();
                events.push(ViewerEvent::RedrawNeeded);
            }
            Key::Char('l') => {
                self.linking = !self.linking;
                events.push(ViewerEvent::LinkMode(self.linking));
            }
            Key::Char('e') => events.push(ViewerEvent::SequenceEnded),
            _ => {}
        }
    }

    fn on_plain_key(&mut self, key: Key, events: &mut Vec<ViewerEvent>) {
        match key {
            Key::Escape => {
                if self.selected.is_some() {
                    self.select(None, events);
                    self.refresh_all(events);
                }
            }
            Key::Delete => {
                if let Some(id) = self.selected.take() {
                    self.labels.remove(id);
                    events.push(ViewerEvent::LabelDeleted(id));
                    events.push(ViewerEvent::SelectionChanged(None));
                    self.refresh_all(events);
                }
            }
            Key::ArrowLeft => events.push(ViewerEvent::NavigatePrev),
            Key::ArrowRight => events.push(ViewerEvent::NavigateNext),
            Key::ArrowUp => {
                if let Some(id) = self.selected {
                    if self.labels.raise(id) {
                        self.refresh_all(events);
                    }
                }
            }
            Key::ArrowDown => {
                if let Some(id) = self.selected {
                    if self.labels.lower(id) {
                        self.refresh_all(events);
                    }
                }
            }
            Key::ZoomIn => {
                if self.set_zoom(self.transform.scale() * SCALE_RATIO, None) {
                    events.push(ViewerEvent::RedrawNeeded);
                }
            }
            Key::ZoomOut => {
                if self.set_zoom(self.transform.scale() / SCALE_RATIO, None) {
                    events.push(ViewerEvent::RedrawNeeded);
                }
            }
            Key::Enter => {
                if self.linking {
                    self.linking = false;
                    events.push(ViewerEvent::LinkMode(false));
                }
            }
            _ => {}
        }
    }

    fn create_label(&mut self, image: Point, events: &mut Vec<ViewerEvent>) {
        let label = (self.factory)(&self.template, image);
        let id = self.labels.push(label);
        debug!("created label {id} at {image:?}");
        events.push(ViewerEvent::LabelCreated(id));
        self.select(Some(id), events);
    }

    fn select(&mut self, next: Option<LabelId>, events: &mut Vec<ViewerEvent>) {
        if self.selected == next {
            return;
        }
        if let Some(prev) = self.selected.take() {
            let mut drop_prev = false;
            if let Some(label) = self.labels.get_mut(prev) {
                label.on_deselected();
                drop_prev = !label.is_geometrically_valid();
            }
            // A label abandoned before it grew to a usable size was an
            // accidental click.
            if drop_prev {
                self.labels.remove(prev);
                events.push(ViewerEvent::LabelDeleted(prev));
            }
        }
        if let Some(id) = next {
            self.deferred_create.cancel();
            if let Some(label) = self.labels.get_mut(id) {
                label.on_selected();
            }
        }
        self.selected = next;
        events.push(ViewerEvent::SelectionChanged(next));
    }

    fn forward_down(&mut self, image: Point, target: Option<ShapeId>) {
        if let Some(id) = self.selected {
            if let Some(label) = self.labels.get_mut(id) {
                label.pointer_down(image, target);
            }
        }
        self.gesture = Gesture::Dragging;
    }

    fn update_hover(&mut self, image: Point, events: &mut Vec<ViewerEvent>) {
        let target = self.resolve_target(image);
        self.hovered_shape = target.map(|(shape, _)| shape);
        let owner = target.map(|(_, owner)| owner);
        if owner != self.hovered {
            self.hovered = owner;
            events.push(ViewerEvent::HoverChanged(owner));
        }
    }

    fn resolve_target(&self, image: Point) -> Option<(ShapeId, LabelId)> {
        let shape = self
            .surface
            .pick(&self.registry, image, &self.transform)?
            .id();
        let owner = self.labels.owner_of(shape)?;
        Some((shape, owner))
    }

    fn rebuild_registry(&mut self) {
        let shapes = self.labels.pick_shapes(self.selected);
        self.registry.clear();
        self.registry.register_all(shapes);
        self.registry.remove_duplicates();
    }

    fn render_labels(&mut self) {
        let (width, height) = self.transform.buffer_size();
        if width != self.label_layer.width() || height != self.label_layer.height() {
            self.label_layer.resize(width, height);
        }
        self.label_layer.clear(0);
        if self.labels_visible {
            self.labels
                .render_all(&mut self.label_layer, &self.transform, self.selected);
        }
    }

    fn refresh_all(&mut self, events: &mut Vec<ViewerEvent>) {
        self.rebuild_registry();
        self.surface.render(&self.registry, &self.transform);
        self.render_labels();
        events.push(ViewerEvent::RedrawNeeded);
    }

    fn clamp_to_image(&self, point: Point) -> Point {
        let size = self.transform.image_size();
        Point::new(
            point.x.clamp(0.0, size.width),
            point.y.clamp(0.0, size.height),
        )
    }
}
