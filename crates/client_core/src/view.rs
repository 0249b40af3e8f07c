//! View surface abstraction and the in-memory element tree the desktop shell renders from.

use std::{
    collections::{BTreeMap, HashMap},
    time::Instant,
};

/// Opaque reference to an element resolved from a [`ViewSurface`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementHandle(pub usize);

/// The operations view code needs from whatever actually draws elements.
///
/// Identifiers are resolved once into handles; a surface that does not know
/// an identifier returns `None` and callers skip it.
pub trait ViewSurface {
    fn resolve(&self, id: &str) -> Option<ElementHandle>;
    fn set_visible(&mut self, element: ElementHandle, visible: bool);
    fn set_text(&mut self, element: ElementHandle, text: &str);
    /// Non-interactive elements are drawn dimmed and ignore pointer input.
    fn set_interactive(&mut self, element: ElementHandle, interactive: bool);
    fn remove_class(&mut self, element: ElementHandle, class: &str);
    fn add_class(&mut self, element: ElementHandle, class: &str);
    fn flush_layout(&mut self);

    /// Restarts a class-driven animation even when the class is already present.
    fn replay_class(&mut self, element: ElementHandle, class: &str) {
        self.remove_class(element, class);
        self.flush_layout();
        self.add_class(element, class);
    }
}

pub const DISABLED_OPACITY: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct ElementState {
    id: String,
    visible: bool,
    text: String,
    interactive: bool,
    classes: BTreeMap<String, Instant>,
    class_additions: HashMap<String, u32>,
}

impl ElementState {
    fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            visible: true,
            text: String::new(),
            interactive: true,
            classes: BTreeMap::new(),
            class_additions: HashMap::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn opacity(&self) -> f32 {
        if self.interactive {
            1.0
        } else {
            DISABLED_OPACITY
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains_key(class)
    }

    /// When `class` was last (re-)added, if it is currently present.
    pub fn class_added_at(&self, class: &str) -> Option<Instant> {
        self.classes.get(class).copied()
    }

    /// How many times `class` has been added over the element's lifetime.
    pub fn class_additions(&self, class: &str) -> u32 {
        self.class_additions.get(class).copied().unwrap_or(0)
    }
}

/// Flat, id-addressed element store. Elements start visible and interactive,
/// matching a freshly loaded page.
#[derive(Debug, Clone, Default)]
pub struct ElementTree {
    elements: Vec<ElementState>,
    index: HashMap<String, ElementHandle>,
    layout_flushes: u64,
}

impl ElementTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut tree = Self::new();
        for id in ids {
            tree.insert(id);
        }
        tree
    }

    /// Adds an element, returning the existing handle if the id is already present.
    pub fn insert(&mut self, id: &str) -> ElementHandle {
        if let Some(handle) = self.index.get(id) {
            return *handle;
        }
        let handle = ElementHandle(self.elements.len());
        self.elements.push(ElementState::new(id));
        self.index.insert(id.to_string(), handle);
        handle
    }

    pub fn get(&self, id: &str) -> Option<&ElementState> {
        self.index.get(id).map(|handle| &self.elements[handle.0])
    }

    pub fn element(&self, handle: ElementHandle) -> Option<&ElementState> {
        self.elements.get(handle.0)
    }

    /// Missing elements count as hidden.
    pub fn is_visible(&self, id: &str) -> bool {
        self.get(id).is_some_and(ElementState::is_visible)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.get(id).map(ElementState::text)
    }

    pub fn visible_ids(&self) -> Vec<&str> {
        self.elements
            .iter()
            .filter(|element| element.visible)
            .map(|element| element.id.as_str())
            .collect()
    }

    pub fn layout_flushes(&self) -> u64 {
        self.layout_flushes
    }

    fn element_mut(&mut self, handle: ElementHandle) -> Option<&mut ElementState> {
        let element = self.elements.get_mut(handle.0);
        if element.is_none() {
            tracing::debug!(handle = handle.0, "ignoring stale element handle");
        }
        element
    }
}

impl ViewSurface for ElementTree {
    fn resolve(&self, id: &str) -> Option<ElementHandle> {
        self.index.get(id).copied()
    }

    fn set_visible(&mut self, element: ElementHandle, visible: bool) {
        if let Some(element) = self.element_mut(element) {
            element.visible = visible;
        }
    }

    fn set_text(&mut self, element: ElementHandle, text: &str) {
        if let Some(element) = self.element_mut(element) {
            element.text.clear();
            element.text.push_str(text);
        }
    }

    fn set_interactive(&mut self, element: ElementHandle, interactive: bool) {
        if let Some(element) = self.element_mut(element) {
            element.interactive = interactive;
        }
    }

    fn remove_class(&mut self, element: ElementHandle, class: &str) {
        if let Some(element) = self.element_mut(element) {
            element.classes.remove(class);
        }
    }

    fn add_class(&mut self, element: ElementHandle, class: &str) {
        if let Some(element) = self.element_mut(element) {
            element.classes.insert(class.to_string(), Instant::now());
            *element.class_additions.entry(class.to_string()).or_insert(0) += 1;
        }
    }

    fn flush_layout(&mut self) {
        self.layout_flushes += 1;
    }
}
