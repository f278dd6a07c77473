//! The notebook: an ordered, append-only list of page snapshots and the index
//! of the page currently on the canvas.

use sketch_core::Snapshot;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq)]
pub struct Notebook {
    notebook_id: Uuid,
    pages: Vec<Snapshot>,
    current: usize,
}

impl Notebook {
    /// A notebook always has at least one page.
    pub fn new(first_page: Snapshot) -> Self {
        let notebook_id = Uuid::new_v4();
        tracing::info!(notebook_id = %notebook_id, "creating notebook");
        Self {
            notebook_id,
            pages: vec![first_page],
            current: 0,
        }
    }

    pub fn notebook_id(&self) -> Uuid {
        self.notebook_id
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn page(&self, index: usize) -> Option<&Snapshot> {
        self.pages.get(index)
    }

    pub fn current_page(&self) -> &Snapshot {
        &self.pages[self.current]
    }

    /// Overwrite the stored snapshot of the current page.
    pub fn save_current(&mut self, snapshot: Snapshot) {
        self.pages[self.current] = snapshot;
    }

    /// Append a page and make it current. Returns its index.
    pub fn push_page(&mut self, snapshot: Snapshot) -> usize {
        self.pages.push(snapshot);
        self.current = self.pages.len() - 1;
        self.current
    }

    /// Move to `index` if it exists.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index >= self.pages.len() {
            return false;
        }
        self.current = index;
        true
    }

    pub fn has_previous(&self) -> bool {
        self.current > 0
    }

    pub fn has_next(&self) -> bool {
        self.current + 1 < self.pages.len()
    }

    /// `"{current}/{total}"`, 1-based.
    pub fn page_indicator(&self) -> String {
        format!("{}/{}", self.current + 1, self.pages.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(tag: &str) -> Snapshot {
        Snapshot::from_data_url(tag)
    }

    #[test]
    fn test_new_notebook_has_one_page() {
        let notebook = Notebook::new(page("p0"));
        assert_eq!(notebook.page_count(), 1);
        assert_eq!(notebook.current_index(), 0);
        assert_eq!(notebook.page_indicator(), "1/1");
        assert!(!notebook.has_previous());
        assert!(!notebook.has_next());
    }

    #[test]
    fn test_push_page_moves_to_it() {
        let mut notebook = Notebook::new(page("p0"));
        assert_eq!(notebook.push_page(page("p1")), 1);
        assert_eq!(notebook.push_page(page("p2")), 2);
        assert_eq!(notebook.page_indicator(), "3/3");
        assert_eq!(notebook.current_page(), &page("p2"));
    }

    #[test]
    fn test_set_current_is_bounds_checked() {
        let mut notebook = Notebook::new(page("p0"));
        notebook.push_page(page("p1"));

        assert!(notebook.set_current(0));
        assert!(!notebook.set_current(2));
        assert_eq!(notebook.current_index(), 0);
        assert!(notebook.has_next());
    }

    #[test]
    fn test_save_current_replaces_only_current() {
        let mut notebook = Notebook::new(page("p0"));
        notebook.push_page(page("p1"));
        notebook.save_current(page("p1-edited"));

        assert_eq!(notebook.page(0), Some(&page("p0")));
        assert_eq!(notebook.page(1), Some(&page("p1-edited")));
        assert_eq!(notebook.page_count(), 2);
    }
}
