//! View models
//!
//! Pure projections of app state into what the page shows. The DOM layer
//! applies these without looking at the cards itself.

use crate::app::{App, EditorForm, EditorSession, Mode};
use crate::cards::{Card, CardCollection};
use crate::consts::PLACEHOLDER_IMAGE;
use crate::persistence::KeyValueStore;

/// One rendered card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub index: usize,
    /// `src` of the front-face image
    pub image_src: String,
    pub image_alt: String,
    /// Back-face text
    pub text: String,
    pub flipped: bool,
}

impl CardView {
    pub fn new(index: usize, card: &Card) -> Self {
        let image_src = if card.image.is_empty() {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            card.image.clone()
        };
        Self {
            index,
            image_src,
            image_alt: format!("Imagen de la carta {}", index + 1),
            text: card.text.clone(),
            flipped: card.flipped,
        }
    }

    /// Class list for the outer card element
    pub fn class_name(&self) -> &'static str {
        card_class(self.flipped)
    }
}

pub fn card_class(flipped: bool) -> &'static str {
    if flipped { "card flipped" } else { "card" }
}

/// Every card in display order
pub fn grid(cards: &CardCollection) -> Vec<CardView> {
    cards
        .iter()
        .enumerate()
        .map(|(i, card)| CardView::new(i, card))
        .collect()
}

/// Edit-mode indicator next to the toggle button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeIndicator {
    pub label: &'static str,
    /// Toggle button highlighted
    pub primary: bool,
}

impl From<Mode> for ModeIndicator {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Edit => Self {
                label: "ON",
                primary: true,
            },
            Mode::Play => Self {
                label: "OFF",
                primary: false,
            },
        }
    }
}

/// Editor overlay contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorView {
    Hidden,
    Shown {
        /// `#N` heading
        index_label: String,
        form: EditorForm,
    },
}

impl EditorView {
    pub fn shown(index: usize, form: EditorForm) -> Self {
        EditorView::Shown {
            index_label: format!("#{}", index + 1),
            form,
        }
    }

    /// Overlay for the app's current session, with fields from the card
    pub fn of<S: KeyValueStore>(app: &App<S>) -> Self {
        match app.editor() {
            EditorSession::Closed => EditorView::Hidden,
            EditorSession::Open(index) => match app.cards().get(index) {
                Some(card) => EditorView::shown(
                    index,
                    EditorForm {
                        text: card.text.clone(),
                        image: card.image.clone(),
                    },
                ),
                None => EditorView::Hidden,
            },
        }
    }
}
