//! Neon Strike entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    use neon_strike::audio::{AudioManager, SoundEffect};
    use neon_strike::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
    use neon_strike::render::Renderer;
    use neon_strike::settings::{Difficulty, Settings};
    use neon_strike::sim::{GamePhase, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        renderer: Renderer,
        audio: AudioManager,
        settings: Settings,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, renderer: Renderer) -> Self {
            let settings = Settings::load();
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_sfx_volume(settings.sfx_volume);
            let state = GameState::new(settings.difficulty, seed);
            Self {
                state,
                renderer,
                audio,
                settings,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run one frame: simulate, sound, draw
        fn update(&mut self, time: f64) {
            let input = self.input;
            tick(&mut self.state, &input, time);

            // Clear one-shot inputs after processing
            self.input.pause = false;
            self.input.toggle_auto_fire = false;
            self.input.start = false;
            self.input.quit = false;

            for event in self.state.drain_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }

            self.renderer.draw(&self.state, &self.settings);
        }

        fn set_difficulty(&mut self, difficulty: Difficulty) {
            self.settings.difficulty = difficulty;
            self.settings.save();
            self.state.set_difficulty(difficulty);
            log::info!("Difficulty set to {}", difficulty.as_str());
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.query_selector("#hud-score .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.score.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-wave .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.wave.current_wave.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-level .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.state.player.level.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-weapon .hud-value").ok().flatten() {
                el.set_text_content(Some(self.state.player.weapon.name));
            }
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }

            // Bars are styled by width percentage
            if let Some(el) = document
                .get_element_by_id("health-bar-fill")
                .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
            {
                let percent =
                    (self.state.player.health / self.state.player.max_health * 100.0).max(0.0);
                let _ = el.style().set_property("width", &format!("{percent:.0}%"));
            }
            if let Some(el) = document
                .get_element_by_id("exp-bar-fill")
                .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
            {
                let percent = self.state.player.exp_progress() * 100.0;
                let _ = el.style().set_property("width", &format!("{percent:.0}%"));
            }

            // Score multiplier badge
            if let Some(el) = document.get_element_by_id("hud-multiplier") {
                if self.state.player.score_multiplier > 1 {
                    let _ = el.set_attribute("class", "hud-item");
                    el.set_text_content(Some(&format!("x{}", self.state.player.score_multiplier)));
                } else {
                    let _ = el.set_attribute("class", "hud-item hidden");
                }
            }

            // Wave rest banner
            if let Some(el) = document.get_element_by_id("wave-banner") {
                if self.state.wave.is_resting() {
                    let _ = el.set_attribute("class", "");
                } else {
                    let _ = el.set_attribute("class", "hidden");
                }
            }

            // Phase overlays
            show_if(&document, "menu-screen", self.state.phase == GamePhase::Menu);
            show_if(&document, "pause-menu", self.state.phase == GamePhase::Paused);
            let game_over = self.state.phase == GamePhase::GameOver;
            show_if(&document, "game-over", game_over);
            if game_over {
                if let Some(el) = document.get_element_by_id("final-score") {
                    el.set_text_content(Some(&self.state.score.to_string()));
                }
                if let Some(el) = document.get_element_by_id("final-wave") {
                    el.set_text_content(Some(&self.state.wave.current_wave.to_string()));
                }
            }
        }
    }

    fn show_if(document: &web_sys::Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Neon Strike starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(PLAYFIELD_WIDTH as u32);
        canvas.set_height(PLAYFIELD_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .expect("get_context failed")
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, Renderer::new(ctx))));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(game.clone());
        setup_menu_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Neon Strike running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Keydown: held movement plus one-shot actions
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                // Audio needs a user gesture before it can start
                g.audio.resume();
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => g.input.movement.up = true,
                    "ArrowDown" | "s" | "S" => g.input.movement.down = true,
                    "ArrowLeft" | "a" | "A" => g.input.movement.left = true,
                    "ArrowRight" | "d" | "D" => g.input.movement.right = true,
                    " " => {
                        event.prevent_default();
                        if g.state.phase == GamePhase::Playing {
                            g.input.movement.fire = true;
                        } else {
                            g.input.start = true;
                        }
                    }
                    "Enter" => g.input.start = true,
                    "Escape" | "p" | "P" => g.input.pause = true,
                    "f" | "F" => g.input.toggle_auto_fire = true,
                    "q" | "Q" => g.input.quit = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyup: release held movement
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowUp" | "w" | "W" => g.input.movement.up = false,
                    "ArrowDown" | "s" | "S" => g.input.movement.down = false,
                    "ArrowLeft" | "a" | "A" => g.input.movement.left = false,
                    "ArrowRight" | "d" | "D" => g.input.movement.right = false,
                    " " => g.input.movement.fire = false,
                    _ => {}
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Difficulty buttons carry their level in the element id
        for (id, difficulty) in [
            ("difficulty-easy", Difficulty::Easy),
            ("difficulty-normal", Difficulty::Normal),
            ("difficulty-hard", Difficulty::Hard),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Menu {
                        g.set_difficulty(difficulty);
                        mark_selected_difficulty(difficulty);
                    }
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.start = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.pause = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("quit-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                game.borrow_mut().input.quit = true;
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn mark_selected_difficulty(difficulty: Difficulty) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for (id, d) in [
            ("difficulty-easy", Difficulty::Easy),
            ("difficulty-normal", Difficulty::Normal),
            ("difficulty-hard", Difficulty::Hard),
        ] {
            if let Some(el) = document.get_element_by_id(id) {
                let class = if d == difficulty {
                    "difficulty-btn selected"
                } else {
                    "difficulty-btn"
                };
                let _ = el.set_attribute("class", class);
            }
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.state.phase == GamePhase::Playing {
                        g.input.pause = true;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Playing {
                    g.input.pause = true;
                    log::info!("Auto-paused (window blur)");
                }
                if g.settings.mute_on_blur {
                    g.audio.set_muted(true);
                }
            });
            let _ =
                window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Focus restores audio
        {
            let window2 = web_sys::window().unwrap();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().audio.set_muted(false);
            });
            let _ =
                window2.add_event_listener_with_callback("focus", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.update_hud();
        }
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {}

/// Headless demo: runs a short automated session and logs the outcome.
/// The playable build is the wasm target (`trunk serve`).
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use neon_strike::settings::Settings;
    use neon_strike::sim::{GamePhase, GameState, InputState, TickInput, tick};

    env_logger::init();

    let settings = Settings::load();
    let mut state = GameState::new(settings.difficulty, 0xDEADBEEF);
    state.start(0.0);

    let frame_ms = 1000.0 / 60.0;
    let input = TickInput {
        movement: InputState {
            fire: true,
            ..Default::default()
        },
        ..Default::default()
    };

    let mut now = 0.0;
    for _ in 0..(60 * 120) {
        now += frame_ms;
        tick(&mut state, &input, now);
        state.drain_events();
        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Session ended: score {}, wave {}, player level {}",
        state.score,
        state.wave.current_wave,
        state.player.level
    );
    println!(
        "score={} wave={} level={} phase={:?}",
        state.score,
        state.wave.current_wave,
        state.player.level,
        state.phase
    );
}
