//! Design state store: the single owner of the design and the selection.

use crate::design::Design;
use crate::element::{Element, ElementId, ElementPatch};
use crate::factory;
use crate::notify::{ConfirmPrompt, Notifier, messages, report_error, report_success};
use crate::storage::DesignGateway;

/// Owns the current [`Design`] and selection.
///
/// Every mutation goes through a named operation. Design mutations bump
/// [`revision`](Self::revision) so observers can tell how many commits
/// happened; selection changes don't.
pub struct DesignStore {
    design: Design,
    selection: Option<ElementId>,
    revision: u64,
    default_design: Design,
    gateway: Box<dyn DesignGateway>,
    notifier: Box<dyn Notifier>,
}

impl DesignStore {
    /// Create a store holding whatever the gateway loads.
    pub fn load(gateway: impl DesignGateway + 'static, notifier: impl Notifier + 'static) -> Self {
        let design = gateway.load();
        Self::with_design(design, gateway, notifier)
    }

    /// Create a store holding `design`.
    pub fn with_design(
        design: Design,
        gateway: impl DesignGateway + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        Self {
            design,
            selection: None,
            revision: 0,
            default_design: Design::default(),
            gateway: Box::new(gateway),
            notifier: Box::new(notifier),
        }
    }

    /// Replace the canonical design used by [`reset`](Self::reset).
    pub fn with_default_design(mut self, default_design: Design) -> Self {
        self.default_design = default_design;
        self
    }

    pub fn design(&self) -> &Design {
        &self.design
    }

    /// Number of design mutations so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Get an element by ID.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.design.element(id)
    }

    /// The raw selected identifier, which may be stale.
    pub fn selected_id(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    /// The selected element, if the selection still refers to one.
    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.as_deref().and_then(|id| self.design.element(id))
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn set_background_color(&mut self, color: impl Into<String>) {
        self.design.background_color = color.into();
        self.touch();
    }

    /// Set the canvas width. Existing elements are not repositioned.
    pub fn set_canvas_width(&mut self, width: f64) {
        self.design.canvas_width = width;
        self.touch();
    }

    /// Set the canvas height. Existing elements are not repositioned.
    pub fn set_canvas_height(&mut self, height: f64) {
        self.design.canvas_height = height;
        self.touch();
    }

    /// Set or clear the selection. The identifier isn't checked here;
    /// [`selected_element`](Self::selected_element) re-validates on read.
    pub fn select(&mut self, id: Option<&str>) {
        self.selection = id.map(str::to_string);
    }

    /// Append an element on top and select it.
    pub fn add_element(&mut self, element: Element) {
        log::debug!("Adding element {}", element.id());
        self.selection = Some(element.id().to_string());
        self.design.elements.push(element);
        self.touch();
    }

    /// Merge `patch` into the element with `id`. Unknown ids are ignored.
    pub fn update_element(&mut self, id: &str, patch: &ElementPatch) {
        match self.design.element_mut(id) {
            Some(element) => {
                element.apply(patch);
                self.touch();
            }
            None => log::debug!("Ignoring update for missing element {id}"),
        }
    }

    /// Remove an element, clearing the selection if it was selected.
    pub fn delete_element(&mut self, id: &str) {
        if self.design.remove_element(id).is_some() {
            self.touch();
        }
        if self.selection.as_deref() == Some(id) {
            self.selection = None;
        }
    }

    /// Create an element of the named type centred on the canvas and add it.
    ///
    /// Returns the new element's id, or `None` if the type is unknown (the
    /// failure is logged and reported to the user).
    pub fn add_element_of_type(&mut self, type_name: &str) -> Option<ElementId> {
        match factory::create_element_by_name(
            type_name,
            self.design.canvas_width,
            self.design.canvas_height,
        ) {
            Ok(element) => {
                let id = element.id().to_string();
                self.add_element(element);
                Some(id)
            }
            Err(e) => {
                log::warn!("Rejected element type: {e}");
                report_error(
                    self.notifier.as_ref(),
                    &messages::ELEMENT_CREATE_FAILED,
                    Some("add element"),
                );
                None
            }
        }
    }

    /// Apply `patch` to the selected element, if any.
    pub fn update_selected(&mut self, patch: &ElementPatch) {
        if let Some(id) = self.selection.clone() {
            self.update_element(&id, patch);
        }
    }

    /// Delete the selected element, if any.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selection.clone() {
            self.delete_element(&id);
        }
    }

    /// Persist the current design and tell the user how it went.
    ///
    /// In-memory state is untouched either way.
    pub fn save(&self) -> bool {
        let saved = self.gateway.save(&self.design);
        if saved {
            report_success(self.notifier.as_ref(), messages::DESIGN_SAVED);
        } else {
            report_error(self.notifier.as_ref(), &messages::DESIGN_SAVE_FAILED, Some("save"));
        }
        saved
    }

    /// Ask for confirmation, then restore the canonical design and clear
    /// stored state. Returns whether the reset happened.
    ///
    /// The in-memory reset stands even if clearing storage fails.
    pub fn reset(&mut self, prompt: &mut dyn ConfirmPrompt) -> bool {
        if !prompt.confirm(messages::RESET_CONFIRMATION) {
            log::debug!("Reset cancelled");
            return false;
        }

        self.design = self.default_design.clone();
        self.selection = None;
        self.touch();

        if self.gateway.clear() {
            report_success(self.notifier.as_ref(), messages::DESIGN_RESET);
        } else {
            report_error(
                self.notifier.as_ref(),
                &messages::DESIGN_RESET_NOT_CLEARED,
                Some("reset"),
            );
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ElementType, TextStyle};
    use crate::factory::create_element;
    use crate::notify::{RecordingNotifier, Severity};
    use crate::storage::{MemoryStorage, StorageGateway};
    use kurbo::Point;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Gateway double that counts calls and can be told to fail.
    #[derive(Default)]
    struct FakeGateway {
        saved: Cell<usize>,
        cleared: Cell<usize>,
        fail: bool,
    }

    impl DesignGateway for FakeGateway {
        fn load(&self) -> Design {
            Design::default()
        }

        fn save(&self, _design: &Design) -> bool {
            self.saved.set(self.saved.get() + 1);
            !self.fail
        }

        fn clear(&self) -> bool {
            self.cleared.set(self.cleared.get() + 1);
            !self.fail
        }
    }

    fn empty_design() -> Design {
        Design {
            elements: Vec::new(),
            ..Design::default()
        }
    }

    fn store_with(gateway: Rc<FakeGateway>) -> (DesignStore, Rc<RecordingNotifier>) {
        let notifier = Rc::new(RecordingNotifier::new());
        let store = DesignStore::with_design(empty_design(), gateway, Rc::clone(&notifier));
        (store, notifier)
    }

    fn store() -> DesignStore {
        store_with(Rc::new(FakeGateway::default())).0
    }

    fn text(id: &str) -> Element {
        Element::new(id, "Hi", Point::new(10.0, 10.0), ElementKind::Text(TextStyle::default()))
    }

    #[test]
    fn test_add_selects_new_element() {
        let mut store = store();
        store.add_element(text("a"));
        store.add_element(text("b"));

        assert_eq!(store.selected_id(), Some("b"));
        assert_eq!(store.selected_element().map(Element::id), Some("b"));
        let ids: Vec<_> = store.design().elements.iter().map(Element::id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_update_merges_and_is_idempotent() {
        let mut store = store();
        store.add_element(text("a"));
        let patch = ElementPatch {
            content: Some("Hello".to_string()),
            x: Some(50.0),
            ..ElementPatch::default()
        };

        store.update_element("a", &patch);
        let once = store.element("a").cloned();
        store.update_element("a", &patch);

        assert_eq!(store.element("a").cloned(), once);
        let el = store.element("a").unwrap();
        assert_eq!(el.content, "Hello");
        assert_eq!(el.position(), Point::new(50.0, 10.0));
        assert_eq!(el.element_type(), ElementType::Text);
    }

    #[test]
    fn test_update_missing_is_silent_noop() {
        let mut store = store();
        store.add_element(text("a"));
        let before = store.design().clone();
        let revision = store.revision();

        store.update_element("missing", &ElementPatch::position(1.0, 1.0));

        assert_eq!(store.design(), &before);
        assert_eq!(store.revision(), revision);
    }

    #[test]
    fn test_delete_selected_clears_selection() {
        let mut store = store();
        store.add_element(text("a"));
        store.delete_element("a");

        assert!(store.selected_id().is_none());
        assert!(store.design().elements.is_empty());
    }

    #[test]
    fn test_delete_other_keeps_selection() {
        let mut store = store();
        store.add_element(text("a"));
        store.add_element(text("b"));
        store.delete_element("a");

        assert_eq!(store.selected_id(), Some("b"));
    }

    #[test]
    fn test_stale_selection_reads_as_none() {
        let mut store = store();
        store.add_element(text("a"));
        store.select(Some("ghost"));

        assert_eq!(store.selected_id(), Some("ghost"));
        assert!(store.selected_element().is_none());

        store.select(None);
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn test_canvas_settings() {
        let mut store = store();
        store.add_element(text("a"));
        store.set_background_color("#000000");
        store.set_canvas_width(5.0);
        store.set_canvas_height(8.0);

        assert_eq!(store.design().background_color, "#000000");
        assert_eq!(store.design().canvas_width, 5.0);
        assert_eq!(store.design().canvas_height, 8.0);
        // Shrinking the canvas doesn't move anything.
        assert_eq!(store.element("a").unwrap().position(), Point::new(10.0, 10.0));
    }

    #[test]
    fn test_add_element_of_type() {
        let (mut store, notifier) = store_with(Rc::new(FakeGateway::default()));

        let id = store.add_element_of_type("button").unwrap();
        assert_eq!(store.selected_id(), Some(id.as_str()));
        assert_eq!(store.element(&id).unwrap().position(), Point::new(190.0, 230.0));

        assert!(store.add_element_of_type("carousel").is_none());
        assert_eq!(store.design().elements.len(), 1);
        assert_eq!(
            notifier.last(),
            Some((Severity::Error, messages::ELEMENT_CREATE_FAILED.to_string()))
        );
    }

    #[test]
    fn test_selected_helpers() {
        let mut store = store();
        store.update_selected(&ElementPatch::position(1.0, 1.0));
        store.delete_selected();
        assert_eq!(store.revision(), 0);

        store.add_element(create_element(ElementType::Input, 500.0, 500.0));
        store.update_selected(&ElementPatch {
            content: Some("Name".to_string()),
            ..ElementPatch::default()
        });
        assert_eq!(store.selected_element().unwrap().content, "Name");

        store.delete_selected();
        assert!(store.design().elements.is_empty());
        assert!(store.selected_id().is_none());
    }

    #[test]
    fn test_save_reports_outcome() {
        let gateway = Rc::new(FakeGateway::default());
        let (store, notifier) = store_with(Rc::clone(&gateway));

        assert!(store.save());
        assert_eq!(gateway.saved.get(), 1);
        assert_eq!(
            notifier.last(),
            Some((Severity::Success, messages::DESIGN_SAVED.to_string()))
        );

        let failing = Rc::new(FakeGateway {
            fail: true,
            ..FakeGateway::default()
        });
        let (mut store, notifier) = store_with(failing);
        store.add_element(text("a"));
        let before = store.design().clone();

        assert!(!store.save());
        assert_eq!(store.design(), &before);
        assert_eq!(
            notifier.last(),
            Some((Severity::Error, messages::DESIGN_SAVE_FAILED.to_string()))
        );
    }

    #[test]
    fn test_reset_without_confirmation() {
        let gateway = Rc::new(FakeGateway::default());
        let (mut store, notifier) = store_with(Rc::clone(&gateway));
        store.add_element(text("a"));
        let before = store.design().clone();

        assert!(!store.reset(&mut |_: &str| false));

        assert_eq!(store.design(), &before);
        assert_eq!(store.selected_id(), Some("a"));
        assert_eq!(gateway.cleared.get(), 0);
        assert!(notifier.entries().is_empty());
    }

    #[test]
    fn test_reset_with_confirmation() {
        let gateway = Rc::new(FakeGateway::default());
        let (mut store, notifier) = store_with(Rc::clone(&gateway));
        store.add_element(text("a"));
        let mut asked = 0;

        assert!(store.reset(&mut |message: &str| {
            asked += 1;
            message == messages::RESET_CONFIRMATION
        }));

        assert_eq!(asked, 1);
        assert_eq!(store.design(), &Design::default());
        assert!(store.selected_id().is_none());
        assert_eq!(gateway.cleared.get(), 1);
        assert_eq!(
            notifier.last(),
            Some((Severity::Success, messages::DESIGN_RESET.to_string()))
        );
    }

    #[test]
    fn test_reset_still_happens_when_clear_fails() {
        let gateway = Rc::new(FakeGateway {
            fail: true,
            ..FakeGateway::default()
        });
        let (mut store, notifier) = store_with(gateway);
        store.add_element(text("a"));

        assert!(store.reset(&mut |_: &str| true));

        assert_eq!(store.design(), &Design::default());
        assert_eq!(
            notifier.last(),
            Some((Severity::Error, messages::DESIGN_RESET_NOT_CLEARED.to_string()))
        );
    }

    #[test]
    fn test_custom_default_design() {
        let custom = Design::with_canvas(320.0, 480.0);
        let mut store = store().with_default_design(custom.clone());

        assert!(store.reset(&mut |_: &str| true));
        assert_eq!(store.design(), &custom);
    }

    #[test]
    fn test_save_load_round_trip_through_storage() {
        let storage = Rc::new(MemoryStorage::new());
        let mut store = DesignStore::load(
            StorageGateway::new(Rc::clone(&storage)),
            RecordingNotifier::new(),
        );
        store.add_element_of_type("graphic");
        store.set_background_color("#FAFAFA");
        let before = store.design().updated_at;

        assert!(store.save());

        let reloaded = DesignStore::load(StorageGateway::new(storage), RecordingNotifier::new());
        let mut expected = store.design().clone();
        expected.updated_at = reloaded.design().updated_at;
        assert_eq!(reloaded.design(), &expected);
        assert!(reloaded.design().updated_at >= before);
    }
}
