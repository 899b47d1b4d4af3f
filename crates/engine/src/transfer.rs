//! Drag-and-drop routing between the pending list and category targets.
//!
//! The coordinator owns the transient "currently dragging" state and decides
//! what a drop carries: dragging a selected concept moves the whole
//! selection, dragging an unselected one moves just that concept. It never
//! writes classification state itself; drops go through `Store::assign`.

use crate::category::Category;
use crate::concept::ConceptKey;
use crate::error::EngineError;
use crate::selection::Selection;
use crate::store::ClassificationStore;

/// Transient drag state for one closing screen.
#[derive(Debug, Default)]
pub struct TransferCoordinator {
    dragging: Option<ConceptKey>,
}

impl TransferCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging a concept. Any stale drag state is replaced.
    pub fn begin_drag(&mut self, key: ConceptKey) {
        self.dragging = Some(key);
    }

    pub fn dragging(&self) -> Option<&ConceptKey> {
        self.dragging.as_ref()
    }

    /// What a drop of `dragged` carries given the current selection.
    ///
    /// Dragging a selected concept carries the whole selection (in key
    /// order); dragging an unselected one carries just itself, leaving the
    /// selection alone.
    pub fn resolve_payload(dragged: &ConceptKey, selection: &Selection) -> Vec<ConceptKey> {
        if selection.contains(dragged) {
            selection.sorted_keys()
        } else {
            vec![dragged.clone()]
        }
    }

    /// Drop the current drag onto a category target.
    ///
    /// Assigns the resolved payload, then clears the selection and the drag
    /// state. The drag state is cleared even when the assignment fails (the
    /// catalog may have refreshed mid-drag), and a drop with no drag in
    /// progress carries nothing. Returns the payload size.
    pub fn drop_on(
        &mut self,
        store: &mut ClassificationStore,
        target: Category,
    ) -> Result<usize, EngineError> {
        let Some(dragged) = self.dragging.take() else {
            return Ok(0);
        };

        let payload = Self::resolve_payload(&dragged, store.selection());
        store.assign(&payload, target)?;
        store.clear_selection();
        Ok(payload.len())
    }

    /// Drop outside every category target: classify nothing, clear the
    /// transient state. The selection stays.
    pub fn drop_outside(&mut self) {
        self.dragging = None;
    }
}
