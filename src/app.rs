//! Application state machine
//!
//! One value holds the cards, the play/edit mode and the editor session.
//! Every mutation persists before returning, and the return value tells the
//! caller how much of the view to redraw.

use crate::cards::{CardCollection, default_label};
use crate::consts::PLACEHOLDER_IMAGE;
use crate::error::Result;
use crate::persistence::KeyValueStore;
use crate::store::{self, CardStore};

/// How card clicks are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Click flips the card
    #[default]
    Play,
    /// Click opens the editor
    Edit,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Mode::Play => Mode::Edit,
            Mode::Edit => Mode::Play,
        }
    }

    pub fn is_edit(self) -> bool {
        self == Mode::Edit
    }
}

/// Editor overlay binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorSession {
    #[default]
    Closed,
    Open(usize),
}

/// Editor form field values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorForm {
    pub text: String,
    pub image: String,
}

/// Result of clicking a card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardClick {
    /// Play mode: only this card's flipped state changed
    Flipped { index: usize, flipped: bool },
    /// Edit mode: editor is now open on `index`
    EditorOpened { index: usize, form: EditorForm },
    /// Index out of range
    Ignored,
}

/// Cards plus interaction state, bound to a store
#[derive(Debug)]
pub struct App<S> {
    store: CardStore<S>,
    cards: CardCollection,
    mode: Mode,
    editor: EditorSession,
}

impl<S: KeyValueStore> App<S> {
    /// Load persisted cards (or defaults) and start in play mode
    pub fn load(store: CardStore<S>) -> Self {
        let cards = store.load_or_initialize();
        Self {
            store,
            cards,
            mode: Mode::Play,
            editor: EditorSession::Closed,
        }
    }

    pub fn cards(&self) -> &CardCollection {
        &self.cards
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn editor(&self) -> EditorSession {
        self.editor
    }

    pub fn store(&self) -> &CardStore<S> {
        &self.store
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
    }

    pub fn toggle_mode(&mut self) -> Mode {
        self.mode = self.mode.toggled();
        log::debug!("Mode: {:?}", self.mode);
        self.mode
    }

    /// Route a card click according to the current mode
    pub fn click_card(&mut self, index: usize) -> Result<CardClick> {
        if self.cards.get(index).is_none() {
            return Ok(CardClick::Ignored);
        }

        match self.mode {
            Mode::Edit => Ok(self
                .open_editor(index)
                .map(|form| CardClick::EditorOpened { index, form })
                .unwrap_or(CardClick::Ignored)),
            Mode::Play => {
                let Some(flipped) = self.cards.toggle_flip(index) else {
                    return Ok(CardClick::Ignored);
                };
                self.store.persist(&self.cards)?;
                Ok(CardClick::Flipped { index, flipped })
            }
        }
    }

    /// Bind the editor to `index` and return the form contents.
    ///
    /// Only possible in edit mode.
    pub fn open_editor(&mut self, index: usize) -> Option<EditorForm> {
        if !self.mode.is_edit() {
            return None;
        }
        let form = self.form_for(index)?;
        self.editor = EditorSession::Open(index);
        Some(form)
    }

    fn form_for(&self, index: usize) -> Option<EditorForm> {
        self.cards.get(index).map(|card| EditorForm {
            text: card.text.clone(),
            image: card.image.clone(),
        })
    }

    /// Drop the session and any unsaved edits
    pub fn close_editor(&mut self) {
        self.editor = EditorSession::Closed;
    }

    /// Write the form into the bound card.
    ///
    /// Returns false (and does nothing) when no editor session is open.
    pub fn commit_save(&mut self, form: &EditorForm) -> Result<bool> {
        let EditorSession::Open(index) = self.editor else {
            return Ok(false);
        };
        let Some(card) = self.cards.get_mut(index) else {
            self.editor = EditorSession::Closed;
            return Ok(false);
        };

        let text = form.text.trim();
        card.text = if text.is_empty() {
            default_label(index)
        } else {
            text.to_string()
        };
        let image = form.image.trim();
        card.image = if image.is_empty() {
            PLACEHOLDER_IMAGE.to_string()
        } else {
            image.to_string()
        };

        self.store.persist(&self.cards)?;
        self.mode = Mode::Edit;
        self.editor = EditorSession::Closed;
        log::info!("Card #{} saved", index + 1);
        Ok(true)
    }

    /// Flip the bound card while keeping the editor open on it.
    ///
    /// Returns the repopulated form, or None when no session is open.
    pub fn toggle_preview_flip(&mut self) -> Result<Option<EditorForm>> {
        let EditorSession::Open(index) = self.editor else {
            return Ok(None);
        };
        if self.cards.toggle_flip(index).is_none() {
            return Ok(None);
        }
        self.store.persist(&self.cards)?;
        Ok(self.form_for(index))
    }

    /// Replace every card with defaults if `confirm` agrees
    pub fn reset_all(&mut self, confirm: impl FnOnce() -> bool) -> Result<bool> {
        if !confirm() {
            return Ok(false);
        }
        self.cards = store::reset_to_defaults();
        self.store.persist(&self.cards)?;
        log::info!("All cards reset");
        Ok(true)
    }

    /// Replace the collection with an imported snapshot.
    ///
    /// On an import error nothing changes, in memory or in storage.
    pub fn import(&mut self, raw: &str) -> Result<()> {
        let cards = store::import_from(raw)?;
        self.cards = cards;
        self.store.persist(&self.cards)?;
        log::info!("Imported cards");
        Ok(())
    }

    /// Pretty-printed snapshot of the current cards
    pub fn export(&self) -> std::result::Result<String, serde_json::Error> {
        store::export_snapshot(&self.cards)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::consts::{CARD_COUNT, STORAGE_KEY};
    use crate::error::{Error, ImportError, StorageError};
    use crate::persistence::MemoryStore;

    fn new_app() -> App<MemoryStore> {
        App::load(CardStore::new(MemoryStore::new()))
    }

    fn stored_cards(app: &App<MemoryStore>) -> CardCollection {
        // Reload through a fresh store sharing the same backend contents
        CardStore::new(app.store().backend().clone()).load_or_initialize()
    }

    /// Backend whose writes always fail
    struct FullStore;

    impl KeyValueStore for FullStore {
        fn get(&self, _key: &str) -> Option<String> {
            None
        }

        fn set(&mut self, _key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Write("quota exceeded".into()))
        }
    }

    #[test]
    fn test_starts_in_play_mode_closed() {
        let app = new_app();
        assert_eq!(app.mode(), Mode::Play);
        assert_eq!(app.editor(), EditorSession::Closed);
        assert_eq!(app.cards().len(), CARD_COUNT);
    }

    #[test]
    fn test_play_click_flips_and_persists() {
        let mut app = new_app();
        let click = app.click_card(7).unwrap();
        assert_eq!(click, CardClick::Flipped { index: 7, flipped: true });

        for (i, card) in app.cards().iter().enumerate() {
            assert_eq!(card.flipped, i == 7);
        }
        assert_eq!(&stored_cards(&app), app.cards());

        app.click_card(7).unwrap();
        assert!(!app.cards().get(7).unwrap().flipped);
        assert_eq!(&stored_cards(&app), app.cards());
    }

    #[test]
    fn test_edit_click_opens_editor_without_mutation() {
        let mut app = new_app();
        app.toggle_mode();
        let click = app.click_card(7).unwrap();
        assert_eq!(
            click,
            CardClick::EditorOpened {
                index: 7,
                form: EditorForm {
                    text: "Carta 8".into(),
                    image: crate::consts::PLACEHOLDER_IMAGE.into(),
                },
            }
        );
        assert_eq!(app.editor(), EditorSession::Open(7));
        assert_eq!(app.cards(), &CardCollection::defaults());
        assert!(app.store().raw().is_none(), "nothing persisted");
    }

    #[test]
    fn test_click_out_of_range() {
        let mut app = new_app();
        assert_eq!(app.click_card(CARD_COUNT).unwrap(), CardClick::Ignored);
        app.toggle_mode();
        assert_eq!(app.click_card(CARD_COUNT).unwrap(), CardClick::Ignored);
        assert_eq!(app.editor(), EditorSession::Closed);
    }

    #[test]
    fn test_editor_requires_edit_mode() {
        let mut app = new_app();
        assert_eq!(app.open_editor(3), None);
        assert_eq!(app.editor(), EditorSession::Closed);
    }

    #[test]
    fn test_commit_save() {
        let mut app = new_app();
        app.toggle_mode();
        app.click_card(5).unwrap();
        app.click_card(5).unwrap();

        let saved = app
            .commit_save(&EditorForm {
                text: "  Hello  ".into(),
                image: "".into(),
            })
            .unwrap();
        assert!(saved);
        assert_eq!(
            app.cards().get(5),
            Some(&Card {
                text: "Hello".into(),
                image: crate::consts::PLACEHOLDER_IMAGE.into(),
                flipped: false,
            })
        );
        assert_eq!(app.mode(), Mode::Edit);
        assert_eq!(app.editor(), EditorSession::Closed);
        assert_eq!(&stored_cards(&app), app.cards());
    }

    #[test]
    fn test_commit_keeps_flip_state_and_trims_image() {
        let mut app = new_app();
        app.click_card(2).unwrap();
        app.toggle_mode();
        app.open_editor(2);
        app.commit_save(&EditorForm {
            text: "Dos".into(),
            image: "  img/2.png ".into(),
        })
        .unwrap();
        let card = app.cards().get(2).unwrap();
        assert_eq!(card.image, "img/2.png");
        assert!(card.flipped);
    }

    #[test]
    fn test_commit_blank_text_gets_label() {
        let mut app = new_app();
        app.toggle_mode();
        app.open_editor(9);
        app.commit_save(&EditorForm {
            text: "   ".into(),
            image: "x.png".into(),
        })
        .unwrap();
        assert_eq!(app.cards().get(9).unwrap().text, "Carta 10");
    }

    #[test]
    fn test_close_discards() {
        let mut app = new_app();
        app.toggle_mode();
        app.open_editor(1);
        app.close_editor();
        assert_eq!(app.editor(), EditorSession::Closed);
        assert!(!app
            .commit_save(&EditorForm {
                text: "ignored".into(),
                image: "".into(),
            })
            .unwrap());
        assert_eq!(app.cards(), &CardCollection::defaults());
        assert!(app.store().raw().is_none());
    }

    #[test]
    fn test_preview_flip_without_session_is_noop() {
        let mut app = new_app();
        assert_eq!(app.toggle_preview_flip().unwrap(), None);
        assert_eq!(app.cards(), &CardCollection::defaults());
        assert!(app.store().raw().is_none());
    }

    #[test]
    fn test_preview_flip_keeps_session() {
        let mut app = new_app();
        app.toggle_mode();
        app.open_editor(4);
        let form = app.toggle_preview_flip().unwrap();
        assert_eq!(
            form,
            Some(EditorForm {
                text: "Carta 5".into(),
                image: crate::consts::PLACEHOLDER_IMAGE.into(),
            })
        );
        assert_eq!(app.editor(), EditorSession::Open(4));
        assert!(app.cards().get(4).unwrap().flipped);
        assert_eq!(&stored_cards(&app), app.cards());
    }

    #[test]
    fn test_mode_toggle_leaves_cards() {
        let mut app = new_app();
        app.click_card(0).unwrap();
        let before = app.cards().clone();
        assert_eq!(app.toggle_mode(), Mode::Edit);
        assert_eq!(app.toggle_mode(), Mode::Play);
        assert_eq!(app.cards(), &before);
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let mut app = new_app();
        app.click_card(0).unwrap();
        let before = app.cards().clone();
        let raw_before = app.store().raw();

        assert!(!app.reset_all(|| false).unwrap());
        assert_eq!(app.cards(), &before);
        assert_eq!(app.store().raw(), raw_before);

        assert!(app.reset_all(|| true).unwrap());
        assert_eq!(app.cards(), &CardCollection::defaults());
        assert_eq!(stored_cards(&app), CardCollection::defaults());
    }

    #[test]
    fn test_import_replaces_and_persists() {
        let mut app = new_app();
        app.click_card(0).unwrap();
        app.import(r#"{"cards":[{"text":"X","flipped":true}]}"#).unwrap();
        assert_eq!(app.cards().get(0).unwrap().text, "X");
        assert!(app.cards().iter().all(|c| !c.flipped));
        assert_eq!(&stored_cards(&app), app.cards());
    }

    #[test]
    fn test_bad_import_leaves_state() {
        let mut app = new_app();
        app.click_card(3).unwrap();
        let before = app.cards().clone();
        let raw_before = app.store().raw();

        let err = app.import(r#"{"foo":1}"#).unwrap_err();
        assert!(matches!(err, Error::Import(ImportError::Malformed)));
        let err = app.import("{{{").unwrap_err();
        assert!(matches!(err, Error::Import(ImportError::Unparsable(_))));

        assert_eq!(app.cards(), &before);
        assert_eq!(app.store().raw(), raw_before);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut app = new_app();
        app.click_card(1).unwrap();
        let exported = app.export().unwrap();

        let mut other = new_app();
        other.import(&exported).unwrap();
        for (a, b) in app.cards().iter().zip(other.cards().iter()) {
            assert_eq!(a.text, b.text);
            assert_eq!(a.image, b.image);
            assert!(!b.flipped);
        }
    }

    #[test]
    fn test_loads_existing_snapshot() {
        let mut app = new_app();
        app.click_card(50).unwrap();
        let raw = app.store().raw().unwrap();

        let reloaded = App::load(CardStore::new(MemoryStore::with_entry(STORAGE_KEY, &raw)));
        assert!(reloaded.cards().get(50).unwrap().flipped);
        assert_eq!(reloaded.mode(), Mode::Play);
    }

    #[test]
    fn test_write_failure_propagates() {
        let mut app = App::load(CardStore::new(FullStore));
        let err = app.click_card(0).unwrap_err();
        assert!(matches!(err, Error::Storage(StorageError::Write(_))));
    }
}
