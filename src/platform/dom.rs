//! DOM application of view models

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlImageElement, HtmlInputElement};

use crate::app::EditorForm;
use crate::view::{CardView, EditorView, ModeIndicator, card_class};

/// Handles to the page's fixed elements
pub struct Page {
    pub document: Document,
    pub grid: Element,
    pub toggle_edit: Element,
    pub edit_state: Element,
    pub save_json: Element,
    pub load_json: HtmlInputElement,
    pub reset_all: Element,
    pub editor: Element,
    pub close_editor: Element,
    pub text_input: HtmlInputElement,
    pub image_input: HtmlInputElement,
    pub save_card: Element,
    pub flip_preview: Element,
    pub editor_index: Element,
}

fn by_id(document: &Document, id: &str) -> Result<Element, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{}", id)))
}

fn input_by_id(document: &Document, id: &str) -> Result<HtmlInputElement, JsValue> {
    Ok(by_id(document, id)?.dyn_into()?)
}

impl Page {
    /// Look up every element the app drives
    pub fn find(document: Document) -> Result<Self, JsValue> {
        Ok(Self {
            grid: by_id(&document, "grid")?,
            toggle_edit: by_id(&document, "toggleEdit")?,
            edit_state: by_id(&document, "editState")?,
            save_json: by_id(&document, "saveJSON")?,
            load_json: input_by_id(&document, "loadJSON")?,
            reset_all: by_id(&document, "resetAll")?,
            editor: by_id(&document, "editor")?,
            close_editor: by_id(&document, "closeEditor")?,
            text_input: input_by_id(&document, "textInput")?,
            image_input: input_by_id(&document, "imageInput")?,
            save_card: by_id(&document, "saveCard")?,
            flip_preview: by_id(&document, "flipPreview")?,
            editor_index: by_id(&document, "editorIndex")?,
            document,
        })
    }

    fn div(&self, class: &str) -> Result<Element, JsValue> {
        let el = self.document.create_element("div")?;
        el.set_class_name(class);
        Ok(el)
    }

    fn card_element(&self, view: &CardView) -> Result<Element, JsValue> {
        let el = self.div(view.class_name())?;
        el.set_attribute("data-index", &view.index.to_string())?;

        let inner = self.div("card-inner")?;

        let front = self.div("card-face front")?;
        let img: HtmlImageElement = self.document.create_element("img")?.dyn_into()?;
        img.set_alt(&view.image_alt);
        img.set_src(&view.image_src);
        front.append_child(&img)?;

        let back = self.div("card-face back")?;
        let text = self.div("card-text")?;
        text.set_text_content(Some(&view.text));
        back.append_child(&text)?;

        inner.append_child(&front)?;
        inner.append_child(&back)?;
        el.append_child(&inner)?;
        Ok(el)
    }

    /// Rebuild the whole grid
    pub fn render_grid(&self, views: &[CardView]) -> Result<(), JsValue> {
        self.grid.set_inner_html("");
        for view in views {
            let el = self.card_element(view)?;
            self.grid.append_child(&el)?;
        }
        Ok(())
    }

    /// Update one card's flipped class in place
    pub fn set_card_flipped(&self, index: usize, flipped: bool) -> Result<(), JsValue> {
        let selector = format!(".card[data-index=\"{}\"]", index);
        if let Some(el) = self.grid.query_selector(&selector)? {
            el.set_class_name(card_class(flipped));
        }
        Ok(())
    }

    pub fn render_mode(&self, indicator: ModeIndicator) -> Result<(), JsValue> {
        self.edit_state.set_text_content(Some(indicator.label));
        self.toggle_edit
            .class_list()
            .toggle_with_force("primary", indicator.primary)?;
        Ok(())
    }

    pub fn render_editor(&self, view: &EditorView) -> Result<(), JsValue> {
        match view {
            EditorView::Hidden => {
                self.editor.class_list().add_1("hidden")?;
                self.editor.set_attribute("aria-hidden", "true")?;
            }
            EditorView::Shown { index_label, form } => {
                self.editor_index.set_text_content(Some(index_label));
                self.text_input.set_value(&form.text);
                self.image_input.set_value(&form.image);
                self.editor.class_list().remove_1("hidden")?;
                self.editor.set_attribute("aria-hidden", "false")?;
            }
        }
        Ok(())
    }

    /// Current editor field values
    pub fn read_form(&self) -> EditorForm {
        EditorForm {
            text: self.text_input.value(),
            image: self.image_input.value(),
        }
    }

    /// Index of the card an event landed on, if any
    pub fn card_index_of(target: &Element) -> Option<usize> {
        target
            .closest(".card")
            .ok()
            .flatten()?
            .get_attribute("data-index")?
            .parse()
            .ok()
    }
}
