//! Flip Cards entry point
//!
//! Wires the page's controls to the app state and renders it.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, Event, MouseEvent};

    use flip_cards::consts::*;
    use flip_cards::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use flip_cards::platform::{self, Page, js_error};
    use flip_cards::view::{self, EditorView, ModeIndicator};
    use flip_cards::{App, CardClick, CardStore, Error};

    type Store = Box<dyn KeyValueStore>;

    /// App state plus the page it is drawn on
    struct Board {
        app: App<Store>,
        page: Page,
    }

    impl Board {
        fn render_grid(&self) -> Result<(), JsValue> {
            self.page.render_grid(&view::grid(self.app.cards()))
        }

        fn render_mode(&self) -> Result<(), JsValue> {
            self.page.render_mode(ModeIndicator::from(self.app.mode()))
        }

        fn render_editor(&self) -> Result<(), JsValue> {
            self.page.render_editor(&EditorView::of(&self.app))
        }

        fn render_all(&self) -> Result<(), JsValue> {
            self.render_grid()?;
            self.render_mode()?;
            self.render_editor()
        }
    }

    type Shared = Rc<RefCell<Board>>;

    fn open_store() -> Store {
        match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::error!("{}, cards will not survive a reload", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_error)?;

        log::info!("Flip Cards starting...");

        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let page = Page::find(document)?;

        let app = App::load(CardStore::new(open_store()));
        let board = Rc::new(RefCell::new(Board { app, page }));
        board.borrow().render_all()?;

        setup_toolbar(&board)?;
        setup_grid(&board)?;
        setup_editor(&board)?;

        log::info!("Flip Cards running!");
        Ok(())
    }

    /// Register a click handler that may fail; failures surface as thrown errors
    fn on_click(
        target: &Element,
        handler: impl FnMut(MouseEvent) -> Result<(), JsValue> + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(MouseEvent) -> Result<(), JsValue>>::new(handler);
        target.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_toolbar(board: &Shared) -> Result<(), JsValue> {
        let b = board.borrow();

        // Edit mode toggle
        {
            let board = board.clone();
            on_click(&b.page.toggle_edit, move |_| {
                let mut b = board.borrow_mut();
                b.app.toggle_mode();
                b.render_mode()
            })?;
        }

        // Export
        {
            let board = board.clone();
            on_click(&b.page.save_json, move |_| {
                let b = board.borrow();
                let json = b.app.export().map_err(js_error)?;
                platform::offer_download(&b.page.document, EXPORT_FILENAME, EXPORT_MIME, &json)
            })?;
        }

        // Reset all
        {
            let board = board.clone();
            on_click(&b.page.reset_all, move |_| {
                let mut b = board.borrow_mut();
                if b.app.reset_all(|| platform::confirm(RESET_PROMPT)).map_err(js_error)? {
                    b.render_grid()?;
                }
                Ok(())
            })?;
        }

        // Import
        {
            let board = board.clone();
            let input = b.page.load_json.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                let Some(file) = input.files().and_then(|files| files.get(0)) else {
                    return;
                };
                let board = board.clone();
                let input = input.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    import_file(&board, &file).await;
                    // Allow picking the same file again
                    input.set_value("");
                });
            });
            b.page
                .load_json
                .add_event_listener_with_callback("change", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    async fn import_file(board: &Shared, file: &web_sys::File) {
        let text = match platform::read_file_text(file).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Could not read {}: {:?}", file.name(), e);
                platform::alert(READ_FAILED_NOTICE);
                return;
            }
        };

        let result = board.borrow_mut().app.import(&text);
        match result {
            Ok(()) => {
                if let Err(e) = board.borrow().render_grid() {
                    log::error!("Render after import failed: {:?}", e);
                }
                log::info!("Imported {}", file.name());
                platform::alert(IMPORT_OK_NOTICE);
            }
            Err(Error::Import(e)) => {
                log::warn!("Rejected {}: {}", file.name(), e);
                platform::alert(&e.to_string());
            }
            Err(e) => {
                log::error!("Import of {} failed: {}", file.name(), e);
                platform::alert(READ_FAILED_NOTICE);
            }
        }
    }

    fn setup_grid(board: &Shared) -> Result<(), JsValue> {
        // One delegated listener; grid rebuilds never leave stale handlers behind
        let b = board.borrow();
        let handler_board = board.clone();
        on_click(&b.page.grid, move |event| {
            let Some(index) = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| Page::card_index_of(&el))
            else {
                return Ok(());
            };

            let mut b = handler_board.borrow_mut();
            let click = b.app.click_card(index).map_err(js_error)?;
            match click {
                CardClick::Flipped { index, flipped } => b.page.set_card_flipped(index, flipped),
                CardClick::EditorOpened { index, form } => {
                    b.page.render_editor(&EditorView::shown(index, form))
                }
                CardClick::Ignored => Ok(()),
            }
        })
    }

    fn setup_editor(board: &Shared) -> Result<(), JsValue> {
        let b = board.borrow();

        // Close button
        {
            let board = board.clone();
            on_click(&b.page.close_editor, move |_| {
                let mut b = board.borrow_mut();
                b.app.close_editor();
                b.render_editor()
            })?;
        }

        // Backdrop click (outside the content box)
        {
            let board = board.clone();
            let editor = b.page.editor.clone();
            on_click(&b.page.editor, move |event| {
                let on_backdrop = event
                    .target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .is_some_and(|el| el == editor);
                if !on_backdrop {
                    return Ok(());
                }
                let mut b = board.borrow_mut();
                b.app.close_editor();
                b.render_editor()
            })?;
        }

        // Save
        {
            let board = board.clone();
            on_click(&b.page.save_card, move |_| {
                let mut b = board.borrow_mut();
                let form = b.page.read_form();
                if b.app.commit_save(&form).map_err(js_error)? {
                    b.render_all()?;
                }
                Ok(())
            })?;
        }

        // Flip preview
        {
            let board = board.clone();
            on_click(&b.page.flip_preview, move |_| {
                let mut b = board.borrow_mut();
                if b.app.toggle_preview_flip().map_err(js_error)?.is_some() {
                    b.render_grid()?;
                    b.render_editor()?;
                }
                Ok(())
            })?;
        }

        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flip Cards (native) starting...");
    log::info!("The board needs a browser - run with `trunk serve` for the web version");

    let app = flip_cards::App::load(flip_cards::CardStore::new(flip_cards::MemoryStore::new()));
    log::info!(
        "{} cards ready, first is {:?}",
        app.cards().len(),
        app.cards().get(0).map(|c| c.text.as_str())
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
