use std::collections::HashSet;

pub trait ReviewItem: Clone {
    fn id(&self) -> &str;
}

/// Shared select-then-act state for the operator queues. Selection is
/// an id plus a pure lookup into the current list, never a separately
/// mutated copy, so a refreshed list can never leave a stale object
/// selected. Comment drafts are ephemeral until submitted.
#[derive(Debug)]
pub struct ReviewQueueState<T: ReviewItem> {
    items: Vec<T>,
    selected: Option<String>,
    busy: HashSet<String>,
    comment: String,
}

impl<T: ReviewItem> Default for ReviewQueueState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            selected: None,
            busy: HashSet::new(),
            comment: String::new(),
        }
    }
}

impl<T: ReviewItem> ReviewQueueState<T> {
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Swap in a fresh server snapshot. The selection survives a
    /// refresh as long as the item still exists, so the operator keeps
    /// seeing the item they acted on in its updated state.
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
        if let Some(id) = &self.selected {
            if !self.items.iter().any(|i| i.id() == id) {
                self.selected = None;
                self.comment.clear();
            }
        }
    }

    /// Selecting a different item discards the unsaved comment draft.
    pub fn select(&mut self, id: Option<&str>) {
        let next = id.map(str::to_string);
        if next != self.selected {
            self.comment.clear();
        }
        self.selected = next;
    }

    pub fn selected(&self) -> Option<&T> {
        let id = self.selected.as_deref()?;
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|i| i.id() == id)
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    pub fn set_comment(&mut self, comment: &str) {
        self.comment = comment.to_string();
    }

    pub fn clear_comment(&mut self) {
        self.comment.clear();
    }

    /// The draft as an optional payload: whitespace-only drafts are not
    /// worth persisting on the request.
    pub fn comment_payload(&self) -> Option<String> {
        let trimmed = self.comment.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.busy.contains(id)
    }

    pub fn begin(&mut self, id: &str) -> bool {
        self.busy.insert(id.to_string())
    }

    pub fn finish(&mut self, id: &str) {
        self.busy.remove(id);
    }
}
