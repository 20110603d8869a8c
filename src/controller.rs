use crate::api::StageApi;
use crate::dom::{Action, Document, NodeId};
use crate::refresh::{RefreshOutcome, RefreshQueue};
use crate::stage::{Stage, StageData, StageId};
use crate::view::{self, PageElements, ViewError};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiEvent {
    PageLoad,
    Submit,
    AddUrlInputs,
    DeleteClicked(StageId),
}

impl From<Action> for UiEvent {
    fn from(action: Action) -> Self {
        match action {
            Action::SubmitForm => UiEvent::Submit,
            Action::AddUrlInputs => UiEvent::AddUrlInputs,
            Action::DeleteStage(id) => UiEvent::DeleteClicked(id),
        }
    }
}

/// Drives the stage page: fetches, renders and submits mutations.
///
/// Every failure is logged and swallowed. The view only ever changes through
/// a full list+render refresh.
pub struct StageController {
    api: Arc<dyn StageApi>,
    document: Mutex<Document>,
    page: PageElements,
    refresh: RefreshQueue,
}

impl StageController {
    pub fn new(api: Arc<dyn StageApi>) -> Self {
        let (document, page) = view::build_page();
        Self::from_parts(api, document, page)
    }

    /// Attaches to existing markup, which must carry the page element ids.
    pub fn with_document(api: Arc<dyn StageApi>, document: Document) -> Result<Self, ViewError> {
        let page = PageElements::locate(&document)?;
        Ok(Self::from_parts(api, document, page))
    }

    fn from_parts(api: Arc<dyn StageApi>, document: Document, page: PageElements) -> Self {
        StageController {
            api,
            document: Mutex::new(document),
            page,
            refresh: RefreshQueue::new(),
        }
    }

    pub fn document(&self) -> MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn page(&self) -> PageElements {
        self.page
    }

    pub fn refresh_queue(&self) -> &RefreshQueue {
        &self.refresh
    }

    /// Fetches all stages, degrading to an empty list on any failure.
    pub async fn list(&self) -> Vec<Stage> {
        match self.api.list().await {
            Ok(stages) => stages,
            Err(e) => {
                log::error!("Error fetching stages: {}", e);
                Vec::new()
            }
        }
    }

    pub fn render(&self, stages: &[Stage]) {
        let mut doc = self.document();
        view::render_stages(&mut doc, self.page.container, stages);
    }

    pub async fn refresh(&self) -> RefreshOutcome {
        let ticket = self.refresh.request();
        let _turn = self.refresh.turn().await;
        if !self.refresh.is_latest(ticket) {
            log::debug!("refresh #{} superseded before fetch", ticket.number());
            return RefreshOutcome::Superseded;
        }
        let stages = self.list().await;
        if !self.refresh.is_latest(ticket) {
            log::debug!("refresh #{} superseded during fetch", ticket.number());
            return RefreshOutcome::Superseded;
        }
        self.render(&stages);
        RefreshOutcome::Rendered(stages.len())
    }

    /// Returns whether the server accepted the stage.
    pub async fn create(&self, data: &StageData) -> bool {
        match self.api.create(data).await {
            Ok(()) => {
                log::info!("Stage created successfully!");
                self.refresh().await;
                true
            }
            Err(e) => {
                log::error!("Failed to create stage: {}", e);
                false
            }
        }
    }

    pub async fn update(&self, id: StageId, data: &StageData) -> bool {
        match self.api.update(id, data).await {
            Ok(()) => {
                log::info!("Stage {} updated successfully!", id);
                self.refresh().await;
                true
            }
            Err(e) => {
                log::error!("Failed to update stage {}: {}", id, e);
                false
            }
        }
    }

    pub async fn delete(&self, id: StageId) -> bool {
        match self.api.delete(id).await {
            Ok(()) => {
                log::info!("Stage deleted successfully!");
                self.refresh().await;
                true
            }
            Err(e) => {
                log::error!("Failed to delete stage {}: {}", id, e);
                false
            }
        }
    }

    /// Reads and resets the form, then creates the stage. Returns whether a
    /// create request was sent and accepted.
    pub async fn on_submit(&self) -> bool {
        let data = {
            let mut doc = self.document();
            let form = view::read_form(&doc, &self.page);
            match form.assemble() {
                Ok(data) => {
                    view::reset_form(&mut doc, &self.page);
                    data
                }
                Err(e) => {
                    log::error!("{}", e);
                    return false;
                }
            }
        };
        self.create(&data).await
    }

    pub fn add_url_inputs(&self) -> NodeId {
        let mut doc = self.document();
        view::add_url_inputs(&mut doc, self.page.stage_urls)
    }

    pub async fn on_page_load(&self) -> RefreshOutcome {
        self.add_url_inputs();
        self.refresh().await
    }

    pub async fn dispatch(&self, event: UiEvent) {
        log::debug!("dispatching {:?}", event);
        match event {
            UiEvent::PageLoad => {
                self.on_page_load().await;
            }
            UiEvent::Submit => {
                self.on_submit().await;
            }
            UiEvent::AddUrlInputs => {
                self.add_url_inputs();
            }
            UiEvent::DeleteClicked(id) => {
                self.delete(id).await;
            }
        }
    }

    /// Clicks `node`; does nothing unless it is attached and bound.
    pub async fn click(&self, node: NodeId) {
        let action = self.document().click(node);
        if let Some(action) = action {
            self.dispatch(action.into()).await;
        }
    }

    pub async fn submit(&self) {
        let action = self.document().submit(self.page.form);
        if let Some(action) = action {
            self.dispatch(action.into()).await;
        }
    }

    /// Sets a text input's value, as typing would.
    pub fn type_into(&self, node: NodeId, value: &str) {
        self.document().set_value(node, value);
    }

    /// Returns the `(label, url)` inputs of every url row in order.
    pub fn url_inputs(&self) -> Vec<(Option<NodeId>, Option<NodeId>)> {
        let doc = self.document();
        doc.children(self.page.stage_urls)
            .iter()
            .map(|row| view::url_row_inputs(&doc, *row))
            .collect()
    }

    pub fn html(&self) -> String {
        self.document().to_html()
    }
}
