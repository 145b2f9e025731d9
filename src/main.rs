//! Fruit Slice entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlCanvasElement, HtmlElement, HtmlInputElement, MouseEvent,
        TouchEvent,
    };

    use fruit_slice::assets::SpriteSheet;
    use fruit_slice::audio::AudioManager;
    use fruit_slice::persistence::{
        LocalStorageStore, MemoryStore, Store, load_ranked_scores, save_ranked_scores,
    };
    use fruit_slice::renderer::{CanvasRenderer, PopupLayer, Snapshot};
    use fruit_slice::sim::{
        Achievement, GameState, Playfield, PointerEvent, PowerupKind, TickInput, tick,
    };
    use fruit_slice::{HighScores, InitError, NotificationQueue, Settings};

    const CANVAS_ID: &str = "gameCanvas";
    /// Longest frame fed to the simulation (tab switches, debugger pauses)
    const MAX_FRAME_MS: f64 = 100.0;
    /// Entries shown on the game over screen
    const GAME_OVER_SCORES: usize = 5;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: CanvasRenderer,
        canvas: HtmlCanvasElement,
        document: Document,
        sprites: SpriteSheet,
        audio: AudioManager,
        settings: Settings,
        store: Box<dyn Store>,
        high_scores: HighScores,
        notifications: NotificationQueue,
        popups: PopupLayer,
        input: TickInput,
        last_time: f64,
        /// An animation frame is scheduled
        running: bool,
    }

    impl Game {
        /// Begin a new run; level and achievements carry over
        fn start_run(&mut self) {
            self.fit_canvas();
            self.state.start();
            self.input.clear();
            self.notifications.clear();
            self.popups.clear();
            self.last_time = 0.0;
            self.audio.resume();

            for id in ["startScreen", "gameOverScreen", "highScoresScreen"] {
                set_hidden(&self.document, id, true);
            }
            for kind in PowerupKind::ALL {
                set_class(&self.document, &powerup_button_id(kind), "active", false);
            }
            self.update_hud();
        }

        /// Step the quality preset, apply it and save it
        fn cycle_quality(&mut self) {
            if let Err(e) = self.settings.cycle_quality(self.store.as_mut()) {
                log::warn!("Failed to save settings: {}", e);
            }
            self.state.apply_settings(&self.settings);
            self.notifications
                .push(format!("Quality: {}", self.settings.quality.as_str()));
            if !self.running {
                self.render();
            }
        }

        /// Match the canvas to its container
        fn fit_canvas(&mut self) {
            let (w, h) = match self.canvas.parent_element() {
                Some(parent) => (parent.client_width(), parent.client_height()),
                None => (self.canvas.client_width(), self.canvas.client_height()),
            };
            let (w, h) = (w.max(1) as u32, h.max(1) as u32);
            if w != self.canvas.width() || h != self.canvas.height() {
                self.canvas.set_width(w);
                self.canvas.set_height(h);
                self.state.resize(w as f32, h as f32);
                log::info!("Canvas resized to {}x{}", w, h);
            }
        }

        /// Run one simulation tick and route its events
        fn update(&mut self, dt_ms: f32) {
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt_ms);

            for event in self.state.drain_events() {
                self.audio.play_event(&event);
                self.notifications.push_event(&event);
                self.popups.push_event(&event);
            }

            self.notifications.update(dt_ms);
            self.popups.update(dt_ms);
        }

        /// Render the current frame
        fn render(&self) {
            self.renderer.draw(
                &Snapshot::of(&self.state),
                &self.sprites,
                &self.popups,
                self.settings.slice_trails,
            );
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let doc = &self.document;
            let progress = &self.state.progression;

            set_text(doc, "score", &progress.score.to_string());
            set_text(doc, "combo", &format!("x{}", progress.combo));
            set_width_pct(doc, "comboFill", progress.combo_fill());

            if let Some(container) = doc.get_element_by_id("livesContainer") {
                if let Ok(lives) = container.query_selector_all(".life") {
                    for i in 0..lives.length() {
                        if let Some(el) = lives.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
                            let _ = el
                                .class_list()
                                .toggle_with_force("lost", i >= progress.lives as u32);
                        }
                    }
                }
            }

            for kind in PowerupKind::ALL {
                set_class(
                    doc,
                    &powerup_button_id(kind),
                    "active",
                    self.state.effects.is_active(kind),
                );
            }

            match self.notifications.current() {
                Some(text) => {
                    set_text(doc, "notification", text);
                    set_class(doc, "notification", "show", true);
                }
                None => set_class(doc, "notification", "show", false),
            }
        }

        /// Fill in and reveal the game over screen
        fn show_game_over(&mut self) {
            let doc = &self.document;
            let progress = &self.state.progression;

            self.notifications.clear();
            set_class(doc, "notification", "show", false);

            set_text(doc, "finalScore", &progress.score.to_string());
            set_text(doc, "playerLevel", &progress.level.to_string());
            set_width_pct(doc, "levelProgress", progress.level_fill());

            let qualifies = self.high_scores.qualifies(progress.score);
            set_hidden(doc, "newHighScoreForm", !qualifies);
            if qualifies {
                if let Some(input) = element::<HtmlInputElement>(doc, "playerNameInput") {
                    input.set_value("");
                    let _ = input.focus();
                }
            }

            show_high_scores(doc, "highScoresList", &self.high_scores, GAME_OVER_SCORES, None);
            show_achievements(doc, self.state.progression.achievements.iter().copied());
            set_hidden(doc, "gameOverScreen", false);
        }

        /// Record the finished run under the entered name
        fn save_score(&mut self) {
            let name = element::<HtmlInputElement>(&self.document, "playerNameInput")
                .map(|input| input.value())
                .unwrap_or_default();
            let progress = &self.state.progression;
            let rank = self.high_scores.add_score(
                &name,
                progress.score,
                progress.level,
                js_sys::Date::now(),
            );
            if let Err(e) = save_ranked_scores(self.store.as_mut(), &self.high_scores) {
                log::error!("Failed to save high scores: {}", e);
            }

            set_hidden(&self.document, "newHighScoreForm", true);
            show_high_scores(
                &self.document,
                "highScoresList",
                &self.high_scores,
                GAME_OVER_SCORES,
                rank,
            );
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"logger already initialised".into());
        }

        log::info!("Fruit Slice starting...");

        if let Err(e) = init().await {
            log::error!("Startup failed: {}", e);
            report_init_error(&e);
        }
    }

    async fn init() -> Result<(), InitError> {
        let window = web_sys::window().ok_or(InitError::NoWindow)?;
        let document = window.document().ok_or(InitError::NoDocument)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| InitError::MissingElement(CANVAS_ID.to_string()))?
            .dyn_into()
            .map_err(|_| InitError::WrongElementType(CANVAS_ID.to_string()))?;
        let renderer = CanvasRenderer::new(canvas.clone())?;

        let store: Box<dyn Store> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{}; scores will not persist", e);
                Box::new(MemoryStore::new())
            }
        };
        let settings = Settings::load_from(store.as_ref());
        let high_scores = load_ranked_scores(store.as_ref());

        let sprites = SpriteSheet::load(&document).await;

        let mut audio = AudioManager::new();
        audio.apply_settings(&settings);

        let seed = js_sys::Date::now() as u64;
        let playfield = Playfield::new(canvas.width() as f32, canvas.height() as f32);
        let mut game = Game {
            state: GameState::with_settings(seed, playfield, &settings),
            renderer,
            canvas: canvas.clone(),
            document: document.clone(),
            sprites,
            audio,
            settings,
            store,
            high_scores,
            notifications: NotificationQueue::new(),
            popups: PopupLayer::new(),
            input: TickInput::default(),
            last_time: 0.0,
            running: false,
        };
        game.fit_canvas();
        game.render();

        let game = Rc::new(RefCell::new(game));

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_window_handlers(game);

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.class_list().add_1("hidden");
        }
        log::info!("Fruit Slice ready");
        Ok(())
    }

    /// Write a startup failure into the page's diagnostics box
    fn report_init_error(error: &InitError) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if let Some(el) = document.get_element_by_id("debugInfo") {
            el.set_text_content(Some(&format!("Error during initialization: {}", error)));
            let _ = el.class_list().remove_1("hidden");
        }
    }

    /// Typed element lookup
    fn element<T: JsCast>(doc: &Document, id: &str) -> Option<T> {
        doc.get_element_by_id(id)?.dyn_into::<T>().ok()
    }

    fn set_text(doc: &Document, id: &str, text: &str) {
        if let Some(el) = doc.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_class(doc: &Document, id: &str, class: &str, on: bool) {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_hidden(doc: &Document, id: &str, hidden: bool) {
        set_class(doc, id, "hidden", hidden);
    }

    fn set_width_pct(doc: &Document, id: &str, fraction: f32) {
        if let Some(el) = element::<HtmlElement>(doc, id) {
            let pct = (fraction.clamp(0.0, 1.0) * 100.0) as f64;
            let _ = el.style().set_property("width", &format!("{}%", pct));
        }
    }

    fn powerup_button_id(kind: PowerupKind) -> String {
        format!("{}Powerup", kind.as_str())
    }

    /// Render the ranked list into a container, optionally highlighting a rank
    fn show_high_scores(
        doc: &Document,
        id: &str,
        scores: &HighScores,
        limit: usize,
        highlight: Option<usize>,
    ) {
        let Some(container) = doc.get_element_by_id(id) else {
            return;
        };
        container.set_inner_html("");

        let shown = scores.top(limit);
        if shown.is_empty() {
            if let Ok(row) = doc.create_element("div") {
                row.set_class_name("high-score-entry");
                row.set_text_content(Some("No high scores yet!"));
                let _ = container.append_child(&row);
            }
            return;
        }

        for (i, entry) in shown.iter().enumerate() {
            let Ok(row) = doc.create_element("div") else {
                continue;
            };
            row.set_class_name("high-score-entry");
            if highlight == Some(i + 1) {
                let _ = row.class_list().add_1("highlight");
            }
            let cells = [
                ("high-score-rank", (i + 1).to_string()),
                ("high-score-name", entry.name.clone()),
                ("high-score-score", entry.score.to_string()),
            ];
            for (class, text) in cells {
                if let Ok(cell) = doc.create_element("div") {
                    cell.set_class_name(class);
                    cell.set_text_content(Some(&text));
                    let _ = row.append_child(&cell);
                }
            }
            let _ = container.append_child(&row);
        }
    }

    fn show_achievements(doc: &Document, unlocked: impl Iterator<Item = Achievement>) {
        let Some(container) = doc.get_element_by_id("achievementsDisplay") else {
            return;
        };
        container.set_inner_html("");
        let unlocked: Vec<_> = unlocked.collect();

        for achievement in Achievement::ALL {
            let Ok(badge) = doc.create_element("div") else {
                continue;
            };
            badge.set_class_name("achievement");
            let _ = badge
                .class_list()
                .toggle_with_force("unlocked", unlocked.contains(&achievement));
            badge.set_text_content(Some(achievement.title()));
            let _ = badge.set_attribute("data-id", achievement.id());
            let _ = container.append_child(&badge);
        }
    }

    /// Canvas-relative position of a client coordinate
    fn canvas_point(canvas: &HtmlCanvasElement, client_x: i32, client_y: i32) -> glam::Vec2 {
        let rect = canvas.get_bounding_client_rect();
        glam::Vec2::new(
            (client_x as f64 - rect.left()) as f32,
            (client_y as f64 - rect.top()) as f32,
        )
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse down - start a slice
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().input.pointer.push(PointerEvent::Down(p));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse move - extend the slice while pressed
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let p = canvas_point(&canvas_clone, event.client_x(), event.client_y());
                game.borrow_mut().input.pointer.push(PointerEvent::Move(p));
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let p = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    game.borrow_mut().input.pointer.push(PointerEvent::Down(p));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let p = canvas_point(&canvas_clone, touch.client_x(), touch.client_y());
                    game.borrow_mut().input.pointer.push(PointerEvent::Move(p));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Release ends the slice
        for event_name in ["mouseup", "touchend"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().input.pointer.push(PointerEvent::Up);
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard - 1/2/3 trigger power-ups like the HUD buttons, Q cycles quality
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                // Typing a high score name
                let in_field = event
                    .target()
                    .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
                    .is_some();
                if in_field {
                    return;
                }
                let kind = match event.key().as_str() {
                    "1" => PowerupKind::Freeze,
                    "2" => PowerupKind::Double,
                    "3" => PowerupKind::Magnet,
                    "q" | "Q" => {
                        game.borrow_mut().cycle_quality();
                        return;
                    }
                    _ => return,
                };
                game.borrow_mut().input.activate.push(kind);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(doc: &Document, id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = doc.get_element_by_id(id) else {
            log::warn!("Button #{} not found", id);
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(doc: &Document, game: Rc<RefCell<Game>>) {
        for id in ["startButton", "restartButton"] {
            let game = game.clone();
            on_click(doc, id, move || start_game(game.clone()));
        }

        for kind in PowerupKind::ALL {
            let game = game.clone();
            on_click(doc, &powerup_button_id(kind), move || {
                game.borrow_mut().input.activate.push(kind);
            });
        }

        {
            let game = game.clone();
            on_click(doc, "viewHighScoresButton", move || {
                let g = game.borrow();
                set_hidden(&g.document, "startScreen", true);
                set_hidden(&g.document, "highScoresScreen", false);
                show_high_scores(
                    &g.document,
                    "highScoresListFull",
                    &g.high_scores,
                    fruit_slice::highscores::MAX_HIGH_SCORES,
                    None,
                );
            });
        }

        {
            let game = game.clone();
            on_click(doc, "backButton", move || {
                let g = game.borrow();
                set_hidden(&g.document, "highScoresScreen", true);
                set_hidden(&g.document, "startScreen", false);
            });
        }

        on_click(doc, "saveScoreButton", move || game.borrow_mut().save_score());
    }

    fn setup_window_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Resize
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.fit_canvas();
                if !g.running {
                    g.render();
                }
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mute on blur
        for (event_name, muted) in [("blur", true), ("focus", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.settings.mute_on_blur {
                    g.audio.set_muted(muted);
                }
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn start_game(game: Rc<RefCell<Game>>) {
        let schedule = {
            let mut g = game.borrow_mut();
            g.start_run();
            log::info!("Run started from the menu");
            let idle = !g.running;
            g.running = true;
            idle
        };
        if schedule {
            request_animation_frame(game);
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_running = {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                (time - g.last_time).clamp(0.0, MAX_FRAME_MS) as f32
            } else {
                0.0
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();

            if g.state.is_playing() {
                true
            } else {
                g.running = false;
                g.show_game_over();
                false
            }
        };

        // The loop ends with the run
        if keep_running {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Fruit Slice (native) starting...");
    log::info!("The playable build targets the browser; running a headless demo instead");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless auto-slicer: plays one run and records it on a leaderboard
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use fruit_slice::persistence::{MemoryStore, load_ranked_scores, save_ranked_scores};
    use fruit_slice::renderer::PopupLayer;
    use fruit_slice::sim::{
        GameState, Playfield, PointerEvent, TickInput, segment_intersects_circle, tick,
    };
    use fruit_slice::{NotificationQueue, Settings};

    const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Ten minutes of frames
    const MAX_FRAMES: u32 = 60 * 60 * 10;
    /// Frames between swipes
    const SWIPE_EVERY: u32 = 12;
    const SWIPE_HALF_LENGTH: f32 = 70.0;

    /// Horizontal swipe through the highest visible fruit that keeps clear of bombs
    fn plan_swipe(state: &GameState) -> Option<(Vec2, Vec2)> {
        let visible = state.playfield.height - 40.0;
        state
            .fruits
            .iter()
            .filter(|f| !f.kind.is_bomb() && f.pos.y < visible && f.pos.y > 0.0)
            .map(|f| {
                let half = Vec2::new(SWIPE_HALF_LENGTH, 0.0);
                (f.pos - half, f.pos + half)
            })
            .filter(|(a, b)| {
                !state
                    .fruits
                    .iter()
                    .filter(|f| f.kind.is_bomb())
                    // Bombs move between planning and the next tick
                    .any(|bomb| segment_intersects_circle(*a, *b, bomb.pos, bomb.hit_radius() + 30.0))
            })
            .min_by(|x, y| x.0.y.total_cmp(&y.0.y))
    }

    pub fn run(seed: u64) {
        let mut store = MemoryStore::new();
        let settings = Settings::load_from(&store);
        let mut state = GameState::with_settings(seed, Playfield::default(), &settings);
        let mut notifications = NotificationQueue::new();
        let mut popups = PopupLayer::new();
        let mut input = TickInput::default();

        state.start();

        let mut frames = 0;
        while state.is_playing() && frames < MAX_FRAMES {
            if frames % SWIPE_EVERY == 0 {
                if let Some((from, to)) = plan_swipe(&state) {
                    input.pointer.extend([
                        PointerEvent::Down(from),
                        PointerEvent::Move(to),
                        PointerEvent::Up,
                    ]);
                }
            }

            tick(&mut state, &input, FRAME_MS);
            input.clear();

            for event in state.drain_events() {
                if notifications.push_event(&event) {
                    if let Some(text) = notifications.current() {
                        log::info!("[{:>6.1}s] {}", state.elapsed_ms / 1000.0, text);
                    }
                }
                popups.push_event(&event);
                log::debug!("event: {}", event.key());
            }
            notifications.update(FRAME_MS);
            popups.update(FRAME_MS);
            frames += 1;
        }

        let progress = &state.progression;
        log::info!(
            "Demo finished after {:.1}s: score {}, level {}, {} fruits sliced, {} critical, {} achievements",
            state.elapsed_ms / 1000.0,
            progress.score,
            progress.level,
            progress.fruits_sliced,
            progress.critical_hits,
            progress.achievements.len()
        );

        let mut scores = load_ranked_scores(&store);
        let timestamp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0);
        if let Some(rank) = scores.add_score("demo", progress.score, progress.level, timestamp) {
            log::info!("Demo run ranked #{}", rank);
        }
        if let Err(e) = save_ranked_scores(&mut store, &scores) {
            log::error!("Failed to save demo score: {}", e);
        }
    }
}
