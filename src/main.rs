//! Breakout entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlElement, KeyboardEvent, MouseEvent};

    use breakout::platform::MountRetry;
    use breakout::render::{RenderSink, present_frame, present_session};
    use breakout::sim::{Ball, Block, Direction, Paddle};
    use breakout::{Command, Game, GamePhase, Observer, Scheduler, SetupError, Settings};

    const CONTAINER_SELECTOR: &str = ".game-container";

    /// `setInterval`-backed scheduler
    #[derive(Default)]
    struct IntervalTimer {
        handle: Option<i32>,
        callback: Option<js_sys::Function>,
    }

    impl Scheduler for IntervalTimer {
        fn start(&mut self, period: Duration) {
            let Some(callback) = self.callback.as_ref() else {
                log::error!("Tick callback not installed");
                return;
            };
            let Some(window) = web_sys::window() else {
                return;
            };
            match window.set_interval_with_callback_and_timeout_and_arguments_0(
                callback,
                period.as_millis() as i32,
            ) {
                Ok(handle) => self.handle = Some(handle),
                Err(e) => log::error!("setInterval failed: {:?}", e),
            }
        }

        fn stop(&mut self) {
            if let Some(handle) = self.handle.take() {
                if let Some(window) = web_sys::window() {
                    window.clear_interval_with_handle(handle);
                }
            }
        }
    }

    /// Swaps the status text and end-of-game message
    struct Messages {
        state_display: Option<Element>,
        message: Option<Element>,
    }

    impl Messages {
        fn set_message(&self, text: &str) {
            if let Some(el) = &self.message {
                el.set_text_content(Some(text));
            }
        }
    }

    impl Observer for Messages {
        fn on_phase_changed(&mut self, _from: GamePhase, to: GamePhase) {
            if let Some(el) = &self.state_display {
                el.set_text_content(Some(to.as_str()));
            }
            match to {
                GamePhase::InProgress => self.set_message("Good luck!"),
                GamePhase::Quit => self.set_message("Quit. Press start to play again."),
                _ => {}
            }
        }

        fn on_won(&mut self) {
            self.set_message("You won!");
        }

        fn on_lost(&mut self) {
            self.set_message("Game over.");
        }
    }

    /// Absolutely positioned divs inside the game container
    struct DomSink {
        container: Element,
        blocks: Vec<Option<HtmlElement>>,
        ball: Option<HtmlElement>,
        paddle: Option<HtmlElement>,
    }

    impl DomSink {
        fn new(container: Element) -> Self {
            Self {
                container,
                blocks: Vec::new(),
                ball: None,
                paddle: None,
            }
        }
    }

    fn create_div(container: &Element, class: &str) -> Option<HtmlElement> {
        let document = web_sys::window()?.document()?;
        let el: HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
        let _ = el.class_list().add_1(class);
        let _ = container.append_child(&el);
        Some(el)
    }

    fn place(el: &HtmlElement, left: f32, top: f32, width: f32, height: f32) {
        let style = el.style();
        let _ = style.set_property("left", &format!("{}px", left));
        let _ = style.set_property("top", &format!("{}px", top));
        let _ = style.set_property("width", &format!("{}px", width));
        let _ = style.set_property("height", &format!("{}px", height));
    }

    impl RenderSink for DomSink {
        fn draw_blocks(&mut self, blocks: &[Block]) {
            // Fresh session: drop whatever the previous one left behind
            self.container.set_inner_html("");
            self.ball = None;
            self.paddle = None;
            self.blocks = blocks
                .iter()
                .map(|block| {
                    let el = create_div(&self.container, "layout-block")?;
                    let r = &block.rect;
                    place(&el, r.left(), r.top(), r.width(), r.height());
                    Some(el)
                })
                .collect();
        }

        fn draw_ball(&mut self, ball: &Ball, diameter: f32) {
            if self.ball.is_none() {
                self.ball = create_div(&self.container, "breakout-ball");
            }
            if let Some(el) = &self.ball {
                place(el, ball.left(), ball.top(), diameter, diameter);
            }
        }

        fn draw_paddle(&mut self, paddle: &Paddle) {
            if self.paddle.is_none() {
                self.paddle = create_div(&self.container, "player-block");
            }
            if let Some(el) = &self.paddle {
                place(el, paddle.position, paddle.top, paddle.width, paddle.height);
            }
        }

        fn remove_block(&mut self, slot: usize) {
            if let Some(el) = self.blocks.get_mut(slot).and_then(Option::take) {
                el.remove();
            }
        }

        fn show_phase(&mut self, phase: GamePhase) {
            let _ = self.container.set_attribute("data-phase", phase.as_str());
        }
    }

    /// Game instance holding all state
    struct App {
        game: Game<IntervalTimer, Messages>,
        sink: DomSink,
    }

    impl App {
        fn command(&mut self, command: Command) {
            let was = self.game.phase();
            if let Err(e) = self.game.handle(command) {
                log::error!("Command {:?} failed: {}", command, e);
                return;
            }

            let now = self.game.phase();
            let started = was != GamePhase::InProgress && now == GamePhase::InProgress;
            if let Some(session) = self.game.session() {
                if started {
                    present_session(&mut self.sink, session);
                } else {
                    self.sink.draw_paddle(&session.paddle);
                }
            }
            self.sink.show_phase(self.game.phase());
        }

        fn tick(&mut self) {
            self.game.on_tick();
            if let Some(session) = self.game.session_mut() {
                present_frame(&mut self.sink, session);
            }
            self.sink.show_phase(self.game.phase());
        }
    }

    async fn sleep(delay: Duration) {
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window() {
                let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                    &resolve,
                    delay.as_millis() as i32,
                );
            }
        });
        let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
    }

    async fn find_container(retry: MountRetry) -> Result<Element, SetupError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| retry.exhausted(CONTAINER_SELECTOR))?;

        let lookup = || document.query_selector(CONTAINER_SELECTOR).ok().flatten();
        retry.locate(CONTAINER_SELECTOR, lookup, sleep).await
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Breakout starting...");

        let container = match find_container(MountRetry::default()).await {
            Ok(el) => el,
            Err(e) => {
                log::error!("Setup failed: {}", e);
                return;
            }
        };

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let messages = Messages {
            state_display: document.get_element_by_id("state-display"),
            message: document.query_selector(".game-msg").ok().flatten(),
        };
        let app = Rc::new(RefCell::new(App {
            game: Game::new(settings, seed, IntervalTimer::default(), messages),
            sink: DomSink::new(container.clone()),
        }));

        log::info!("Game initialized with seed: {}", seed);

        {
            let tick_app = app.clone();
            let closure = Closure::<dyn FnMut()>::new(move || {
                tick_app.borrow_mut().tick();
            });
            let callback = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
            app.borrow_mut().game.scheduler_mut().callback = Some(callback);
            closure.forget();
        }

        setup_start_button(&document, app.clone());
        setup_input_handlers(&window, &container, app.clone());

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                app.borrow_mut().game.stop_session();
            });
            let _ = window
                .add_event_listener_with_callback("unload", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        log::info!("Breakout running!");
    }

    fn setup_start_button(document: &web_sys::Document, app: Rc<RefCell<App>>) {
        if let Some(btn) = document.get_element_by_id("start-game-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                app.borrow_mut().command(Command::Start);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No start button found");
        }
    }

    fn setup_input_handlers(window: &web_sys::Window, container: &Element, app: Rc<RefCell<App>>) {
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let command = match event.key().as_str() {
                    "ArrowLeft" | "a" => Command::StepPaddle(Direction::Left),
                    "ArrowRight" | "d" => Command::StepPaddle(Direction::Right),
                    "Q" | "q" if event.shift_key() => Command::Quit,
                    _ => return,
                };
                app.borrow_mut().command(command);
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let container = container.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let left = container.get_bounding_client_rect().left();
                let x = (event.client_x() as f64 - left) as f32;
                app.borrow_mut().command(Command::MovePaddleTo(x));
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::time::Duration;

    use breakout::platform::IntervalScheduler;
    use breakout::render::{RenderSink, present_frame, present_session};
    use breakout::sim::{Ball, Block, Paddle};
    use breakout::{Game, GamePhase, Observer, Settings};

    /// Give up after ten minutes of game time
    const MAX_GAME_TIME: Duration = Duration::from_secs(600);

    /// Render sink that narrates block removals
    #[derive(Default)]
    struct LogSink {
        total: usize,
        removed: usize,
    }

    impl RenderSink for LogSink {
        fn draw_blocks(&mut self, blocks: &[Block]) {
            self.total = blocks.len();
            self.removed = 0;
        }

        fn draw_ball(&mut self, ball: &Ball, _diameter: f32) {
            log::trace!("Ball at ({:.1}, {:.1})", ball.left(), ball.top());
        }

        fn draw_paddle(&mut self, paddle: &Paddle) {
            log::trace!("Paddle at {:.1}", paddle.position);
        }

        fn remove_block(&mut self, slot: usize) {
            self.removed += 1;
            log::info!("Block {} down ({}/{})", slot, self.removed, self.total);
        }

        fn show_phase(&mut self, phase: GamePhase) {
            log::info!("Phase: {}", phase.as_str());
        }
    }

    struct Outcome;

    impl Observer for Outcome {
        fn on_won(&mut self) {
            log::info!("All blocks cleared!");
        }

        fn on_lost(&mut self) {
            log::info!("Ball lost.");
        }
    }

    /// Play one session with the paddle tracking the ball
    pub fn run(seed: u64) -> GamePhase {
        let settings = Settings::load();
        let period = settings.playfield.tick_period();
        let mut game = Game::new(settings, seed, IntervalScheduler::new(), Outcome);
        let mut sink = LogSink::default();

        if let Err(e) = game.start_session() {
            log::error!("Failed to start session: {}", e);
            return game.phase();
        }
        if let Some(session) = game.session() {
            present_session(&mut sink, session);
        }

        let mut elapsed = Duration::ZERO;
        while game.is_ticking() && elapsed < MAX_GAME_TIME {
            // One frame per tick period
            let due = game.scheduler_mut().advance(period);
            elapsed += period;

            for _ in 0..due {
                if let Some(target) = game.session().map(|s| s.autopilot_target()) {
                    game.move_paddle_to(target);
                }
                game.on_tick();
            }
            if let Some(session) = game.session_mut() {
                present_frame(&mut sink, session);
            }
        }

        if game.is_ticking() {
            log::info!("Time limit reached");
            game.quit();
        }
        sink.show_phase(game.phase());
        game.phase()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Breakout (headless) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    log::info!("Seed: {}", seed);

    let phase = headless::run(seed);
    println!("Finished: {}", phase.as_str());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
