use crate::dom::{Action, Document, NodeId};
use crate::form::{StageForm, UrlPair};
use crate::stage::Stage;
use thiserror::Error;

pub const STAGES_CONTAINER_ID: &str = "stages-container";
pub const CREATE_FORM_ID: &str = "create-stage-form";
pub const STAGE_NAME_ID: &str = "stage-name";
pub const STAGE_URLS_ID: &str = "stage-urls";

pub const STAGE_CLASS: &str = "stage";
pub const URL_PAIR_CLASS: &str = "url-pair";
pub const URL_LABEL_CLASS: &str = "url-label";
pub const URL_VALUE_CLASS: &str = "url-value";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("page has no element with id '{0}'")]
    MissingElement(&'static str),
}

/// The elements the page markup must provide.
#[derive(Debug, Clone, Copy)]
pub struct PageElements {
    pub container: NodeId,
    pub form: NodeId,
    pub stage_name: NodeId,
    pub stage_urls: NodeId,
}

impl PageElements {
    pub fn locate(doc: &Document) -> Result<Self, ViewError> {
        let find = |id: &'static str| doc.get_element_by_id(id).ok_or(ViewError::MissingElement(id));
        Ok(PageElements {
            container: find(STAGES_CONTAINER_ID)?,
            form: find(CREATE_FORM_ID)?,
            stage_name: find(STAGE_NAME_ID)?,
            stage_urls: find(STAGE_URLS_ID)?,
        })
    }
}

/// Builds the stage page: the create form followed by the stage list.
pub fn build_page() -> (Document, PageElements) {
    let mut doc = Document::new();
    let root = doc.root();

    let form = doc.create_element("form");
    doc.set_id(form, CREATE_FORM_ID);
    doc.bind(form, Action::SubmitForm);
    doc.append_child(root, form);

    let name = doc.create_element("input");
    doc.set_id(name, STAGE_NAME_ID);
    doc.set_attr(name, "type", "text");
    doc.set_attr(name, "name", "stage_name");
    doc.set_attr(name, "placeholder", "Stage name");
    doc.append_child(form, name);

    let urls = doc.create_element("ul");
    doc.set_id(urls, STAGE_URLS_ID);
    doc.append_child(form, urls);

    let add = doc.create_element("button");
    doc.set_attr(add, "type", "button");
    doc.set_text(add, "Add URL");
    doc.bind(add, Action::AddUrlInputs);
    doc.append_child(form, add);

    let submit = doc.create_element("button");
    doc.set_attr(submit, "type", "submit");
    doc.set_text(submit, "Create Stage");
    doc.append_child(form, submit);

    let container = doc.create_element("div");
    doc.set_id(container, STAGES_CONTAINER_ID);
    doc.append_child(root, container);

    let page = PageElements {
        container,
        form,
        stage_name: name,
        stage_urls: urls,
    };
    (doc, page)
}

/// Replaces the children of `container` with one block per stage.
pub fn render_stages(doc: &mut Document, container: NodeId, stages: &[Stage]) {
    doc.clear_children(container);
    for stage in stages {
        let block = doc.create_element("div");
        doc.add_class(block, STAGE_CLASS);
        doc.set_attr(block, "data-stage-id", stage.id.to_string());

        let heading = doc.create_element("h2");
        doc.set_text(heading, stage.stage_name.clone());
        doc.append_child(block, heading);

        let list = doc.create_element("ul");
        for line in stage.url_lines() {
            let item = doc.create_element("li");
            doc.set_text(item, line);
            doc.append_child(list, item);
        }
        doc.append_child(block, list);

        let delete = doc.create_element("button");
        doc.set_text(delete, "Delete");
        doc.bind(delete, Action::DeleteStage(stage.id));
        doc.append_child(block, delete);

        doc.append_child(container, block);
    }
}

/// Appends one empty label/url row, numbered after the rows already present.
pub fn add_url_inputs(doc: &mut Document, stage_urls: NodeId) -> NodeId {
    let n = doc.child_element_count(stage_urls) + 1;
    let row = doc.create_element("li");
    doc.add_class(row, URL_PAIR_CLASS);

    let label = doc.create_element("input");
    doc.add_class(label, URL_LABEL_CLASS);
    doc.set_attr(label, "type", "text");
    doc.set_attr(label, "name", format!("label{}", n));
    doc.set_attr(label, "placeholder", format!("Label {}", n));
    doc.append_child(row, label);

    let url = doc.create_element("input");
    doc.add_class(url, URL_VALUE_CLASS);
    doc.set_attr(url, "type", "text");
    doc.set_attr(url, "name", format!("url{}", n));
    doc.set_attr(url, "placeholder", format!("URL {}", n));
    doc.append_child(row, url);

    doc.append_child(stage_urls, row);
    row
}

/// Returns the `(label, url)` inputs of a row appended by [`add_url_inputs`].
pub fn url_row_inputs(doc: &Document, row: NodeId) -> (Option<NodeId>, Option<NodeId>) {
    let inputs = doc.descendants_by_tag(row, "input");
    let find = |class: &str| inputs
        .iter()
        .copied()
        .find(|i| doc.get(*i).is_some_and(|e| e.has_class(class)));
    (find(URL_LABEL_CLASS), find(URL_VALUE_CLASS))
}

/// Reads the form as typed, one [`UrlPair`] per row.
pub fn read_form(doc: &Document, page: &PageElements) -> StageForm {
    let pairs = doc
        .children(page.stage_urls)
        .iter()
        .map(|row| {
            let (label, url) = url_row_inputs(doc, *row);
            let value = |node: Option<NodeId>| node.map(|n| doc.value(n).to_string()).unwrap_or_default();
            UrlPair::new(value(label), value(url))
        })
        .collect();
    StageForm::new(doc.value(page.stage_name), pairs)
}

/// Clears the name field and leaves exactly one empty url row.
pub fn reset_form(doc: &mut Document, page: &PageElements) {
    doc.set_value(page.stage_name, "");
    doc.clear_children(page.stage_urls);
    add_url_inputs(doc, page.stage_urls);
}

/// Plain-text rendering used by the CLI.
pub fn render_text(stages: &[Stage]) -> String {
    let mut out = String::new();
    for stage in stages {
        out.push_str(&format!("[{}] {}\n", stage.id, stage.stage_name));
        for line in stage.url_lines() {
            out.push_str(&format!("  {}\n", line));
        }
    }
    out
}
