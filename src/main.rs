//! Mondalak entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use mondalak::audio::AudioManager;
    use mondalak::consts::*;
    use mondalak::persistence::LocalStorage;
    use mondalak::platform::now_ms;
    use mondalak::platform::web::{DEFAULT_API_BASE, RemoteScores};
    use mondalak::renderer::CanvasSink;
    use mondalak::services::{AssetProvider, AudioCues, Cue, Services, StaticAssets};
    use mondalak::sim::{FrameClock, FrameTime, GamePhase, Session, TickInput, Tuning};
    use mondalak::{Settings, TransactionLog};
    use glam::Vec2;

    /// Lets the page keep a handle on the audio the session owns
    struct SharedAudio(Rc<RefCell<AudioManager>>);

    impl AudioCues for SharedAudio {
        fn play_cue(&mut self, cue: Cue) {
            self.0.borrow_mut().play_cue(cue);
        }

        fn stop_all(&mut self) {
            self.0.borrow_mut().stop_all();
        }
    }

    /// Game instance holding all state
    struct Game {
        session: Session,
        clock: FrameClock,
        input: TickInput,
        settings: Settings,
        audio: Rc<RefCell<AudioManager>>,
        sink: CanvasSink,
    }

    impl Game {
        /// Run one display frame and draw it
        fn frame(&mut self) {
            let now = now_ms();
            let multiplier = self.clock.observe(now);
            self.session
                .frame(&self.input, FrameTime::new(now, multiplier));

            for event in self.session.take_events() {
                log::debug!("{:?}", event);
            }

            self.session.snapshot(&self.settings).draw(&mut self.sink);
        }

        /// Enter: start from the menu or play again after game over
        fn confirm(&mut self) {
            let now = now_ms();
            self.audio.borrow().resume();
            let result = match self.session.phase() {
                GamePhase::Menu => self.session.start(now),
                GamePhase::GameOver => self.session.restart(now),
                _ => return,
            };
            if let Err(e) = result {
                log::warn!("{}", e);
            }
        }

        /// Escape: back to the menu
        fn stop(&mut self) {
            if let Err(e) = self.session.stop(now_ms()) {
                log::debug!("{}", e);
            }
            self.input = TickInput::default();
        }

        fn toggle_sound(&mut self) {
            self.settings.sound_on = !self.settings.sound_on;
            self.audio.borrow_mut().apply_settings(&self.settings);
            if let Some(mut storage) = LocalStorage::open() {
                self.settings.save(&mut storage);
            }
            log::info!("Sound {}", if self.settings.sound_on { "on" } else { "off" });
        }

        /// Map a key to a movement flag; WASD on Latin, Russian and Ukrainian layouts
        fn movement_key(&mut self, key: &str, down: bool) -> bool {
            let flag = match key.to_lowercase().as_str() {
                "w" | "ц" | "arrowup" => &mut self.input.move_up,
                "s" | "ы" | "і" | "arrowdown" => &mut self.input.move_down,
                "a" | "ф" | "arrowleft" => &mut self.input.move_left,
                "d" | "в" | "arrowright" => &mut self.input.move_right,
                _ => return false,
            };
            *flag = down;
            true
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mondalak starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(CANVAS_WIDTH as u32);
        canvas.set_height(CANVAS_HEIGHT as u32);

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("not a 2d context");

        let (settings, transactions) = match LocalStorage::open() {
            Some(storage) => (Settings::load(&storage), TransactionLog::load(&storage)),
            None => {
                log::warn!("LocalStorage unavailable, nothing will persist");
                (Settings::default(), TransactionLog::new())
            }
        };

        let assets = StaticAssets::default();
        let explosion_frames = assets.explosion_frames();
        let audio = Rc::new(RefCell::new(AudioManager::new(&settings)));
        let scores = RemoteScores::new(Rc::new(RefCell::new(transactions)), DEFAULT_API_BASE);
        let services = Services::new(
            Box::new(assets),
            Box::new(SharedAudio(audio.clone())),
            Box::new(scores),
        );

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game {
            session: Session::new(seed, Tuning::default(), services),
            clock: FrameClock::new(),
            input: TickInput::default(),
            settings,
            audio,
            sink: CanvasSink::new(ctx, explosion_frames),
        }));

        log::info!("Game initialized with seed: {}", seed);

        setup_keyboard(game.clone());
        setup_mouse(&canvas, game.clone());
        setup_visibility(&document, game.clone());

        request_animation_frame(game);

        log::info!("Mondalak running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if g.movement_key(&key, true) {
                    event.prevent_default();
                    return;
                }
                match key.as_str() {
                    "Enter" => g.confirm(),
                    "Escape" => g.stop(),
                    " " => {
                        g.input.firing = true;
                        event.prevent_default();
                    }
                    "m" | "M" | "ь" | "Ь" => g.toggle_sound(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if !g.movement_key(&key, false) && key == " " {
                    g.input.firing = false;
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pointer position in logical canvas space, whatever the CSS size
    fn canvas_point(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let scale_x = if rect.width() > 0.0 { CANVAS_WIDTH as f64 / rect.width() } else { 1.0 };
        let scale_y = if rect.height() > 0.0 { CANVAS_HEIGHT as f64 / rect.height() } else { 1.0 };
        Vec2::new(
            ((event.client_x() as f64 - rect.left()) * scale_x) as f32,
            ((event.client_y() as f64 - rect.top()) * scale_y) as f32,
        )
    }

    fn setup_mouse(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().input.pointer = canvas_point(&target, &event);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let game = game.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.input.pointer = canvas_point(&target, &event);
                g.input.firing = true;
                g.audio.borrow().resume();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.firing = false;
            });
            if let Some(window) = web_sys::window() {
                let _ = window
                    .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }
    }

    /// A hidden tab gets no animation frames; restart frame timing on return
    /// so the first frame back is not clamped to the maximum step
    fn setup_visibility(document: &web_sys::Document, game: Rc<RefCell<Game>>) {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut g = game.borrow_mut();
            g.clock.reset();
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                // Key-up events are lost while hidden
                g.input = TickInput::default();
                log::info!("Tab hidden");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        game.borrow_mut().frame();
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: an autopilot plays one session at 60 Hz of simulated time.
/// An optional first argument names a tuning JSON file.
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    use mondalak::TransactionLog;
    use mondalak::consts::REFERENCE_FRAME_MS;
    use mondalak::services::{ScoreSink, Services};
    use mondalak::sim::{FrameClock, FrameTime, GamePhase, Session, TickInput, Tuning};

    /// Keeps the run's transactions readable after the session takes the sink
    struct SharedLog(Rc<RefCell<TransactionLog>>);

    impl ScoreSink for SharedLog {
        fn record_kill_or_death(&mut self, total_score: u64, is_death: bool) {
            self.0.borrow_mut().record_kill_or_death(total_score, is_death);
        }

        fn record_mint(&mut self, kill_count: u32) {
            self.0.borrow_mut().record_mint(kill_count);
        }
    }

    env_logger::init();
    log::info!("Mondalak (native) starting headless run...");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => tuning,
                Err(e) => {
                    log::error!("{}: {}", path, e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                log::error!("Cannot read {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Tuning::default(),
    };

    let seed = 0x6d6f_6e64;
    let transactions = Rc::new(RefCell::new(TransactionLog::new()));
    let services = Services::headless(Box::new(SharedLog(transactions.clone())));
    let mut session = Session::new(seed, tuning, services);
    let mut clock = FrameClock::new();
    let mut now = 0.0;
    if let Err(e) = session.start(now) {
        log::error!("{}", e);
        return;
    }

    // Five simulated minutes at most
    let max_frames = 5 * 60 * 60;
    for frame in 0..max_frames {
        now += REFERENCE_FRAME_MS;
        let state = session.state();
        let player = state.player.pos;
        let target = state
            .enemies
            .iter()
            .min_by(|a, b| a.pos.distance_squared(player).total_cmp(&b.pos.distance_squared(player)))
            .map(|e| e.pos)
            .unwrap_or(player + Vec2::X);

        // Circle-strafe: switch direction every two seconds
        let leg = (frame / 120) % 4;
        let input = TickInput {
            move_up: leg == 0,
            move_right: leg == 1,
            move_down: leg == 2,
            move_left: leg == 3,
            pointer: target,
            firing: true,
        };

        let multiplier = clock.observe(now);
        session.frame(&input, FrameTime::new(now, multiplier));
        session.take_events();

        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    let stats = &session.state().stats;
    println!(
        "{:?} after {:.1}s: score {}, kills {} ({} fire), damage dealt {} taken {}, heals {}, buffs {}",
        session.phase(),
        now / 1000.0,
        stats.total_score,
        stats.kill_count,
        stats.fire_kill_count,
        stats.damage_given,
        stats.damage_taken,
        stats.heals_used,
        stats.buffs_taken
    );

    // Offline run: entries stay pending
    let transactions = transactions.borrow();
    println!("{} transactions, newest first:", transactions.len());
    for tx in transactions.entries().iter().take(5) {
        println!("  #{} {} [{}]", tx.id, tx.kind, tx.link);
    }
}
