use uuid::Uuid;

use crate::document::ImageEntry;

/// Ordered collection of loaded images for the current session, tracking
/// which one is active in the editor. In-memory only; images are never
/// removed until the session ends.
#[derive(Default)]
pub struct SessionStore {
    entries: Vec<ImageEntry>,
    active: Option<Uuid>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a freshly loaded image and select it, so the most recently added
    /// image is always the one on screen.
    pub fn push(&mut self, entry: ImageEntry) -> Uuid {
        let id = entry.id();
        self.entries.push(entry);
        self.active = Some(id);
        id
    }

    pub fn select(&mut self, id: Uuid) -> bool {
        if self.entries.iter().any(|e| e.id() == id) {
            self.active = Some(id);
            true
        } else {
            false
        }
    }

    pub fn active_id(&self) -> Option<Uuid> {
        self.active
    }

    pub fn active_entry(&self) -> Option<&ImageEntry> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn active_entry_mut(&mut self) -> Option<&mut ImageEntry> {
        let id = self.active?;
        self.get_mut(id)
    }

    pub fn get(&self, id: Uuid) -> Option<&ImageEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut ImageEntry> {
        self.entries.iter_mut().find(|e| e.id() == id)
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
