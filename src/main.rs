//! Canvas Arcade entry point
//!
//! WASM: mounts whichever game widgets the host page provides (looked up
//! by element id) and drives them off requestAnimationFrame. Native: runs
//! a short headless demo of both simulations.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, KeyboardEvent,
        MouseEvent, TouchEvent,
    };

    use canvas_arcade::driver::{FrameClock, FrameScheduler, LoopControl, RafScheduler};
    use canvas_arcade::input::{KeyLatch, SnakeKey, heli_thrust_key, snake_key, swipe_direction};
    use canvas_arcade::snake::state::{CELL_SIZE, GRID_SIZE};
    use canvas_arcade::storage::{HELI_SCORE_KEY, LocalScoreStore, SNAKE_SCORE_KEY};
    use canvas_arcade::{Mode, frames, heli, snake};

    /// Minimum swipe distance before a touch counts as a turn
    const SWIPE_THRESHOLD: f64 = 30.0;

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("canvas-arcade starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let heli_mounted = mount_heli(&document);
        let snake_mounted = mount_snake(&document);
        if !heli_mounted && !snake_mounted {
            log::warn!("no game canvas found on this page");
        }
    }

    fn canvas_by_id(document: &Document, id: &str) -> Option<HtmlCanvasElement> {
        document.get_element_by_id(id)?.dyn_into().ok()
    }

    fn canvas_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
        canvas
            .get_context("2d")
            .ok()
            .flatten()?
            .dyn_into()
            .ok()
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = if hidden {
                el.class_list().add_1("hidden")
            } else {
                el.class_list().remove_1("hidden")
            };
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Suppress (or restore) page scrolling while the helicopter captures
    /// touch input. Must be undone on every exit path.
    fn lock_page_scroll(lock: bool) {
        let body = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body());
        if let Some(body) = body {
            let value = if lock { "hidden" } else { "" };
            let _ = body.style().set_property("overflow", value);
        }
    }

    /// Native fullscreen with a graceful degrade: when the request is
    /// rejected or unsupported, toggle an expanded-layout class instead.
    fn toggle_fullscreen(container: &Element) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if document.fullscreen_element().is_some() {
            document.exit_fullscreen();
            return;
        }
        if let Err(e) = container.request_fullscreen() {
            log::warn!("fullscreen unavailable, using expanded layout: {:?}", e);
            let _ = container.class_list().toggle("expanded");
        }
    }

    fn setup_fullscreen_button(document: &Document, button_id: &str, container: Option<Element>) {
        let Some(container) = container else { return };
        if let Some(btn) = document.get_element_by_id(button_id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                toggle_fullscreen(&container);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    // === Helicopter widget ===

    struct HeliWidget {
        game: heli::HeliState,
        input: heli::TickInput,
        clock: FrameClock,
        latch: KeyLatch,
        ctx: CanvasRenderingContext2d,
    }

    fn mount_heli(document: &Document) -> bool {
        let Some(canvas) = canvas_by_id(document, "heli-canvas") else {
            return false;
        };
        let width = (canvas.client_width().max(1)) as u32;
        let height = (canvas.client_height().max(1)) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let Some(ctx) = canvas_2d(&canvas) else {
            log::error!("helicopter canvas has no 2d context");
            return false;
        };

        let seed = js_sys::Date::now() as u64;
        let store = LocalScoreStore::new(HELI_SCORE_KEY);
        let game = heli::HeliState::new(Box::new(store), width as f32, height as f32, seed);

        let widget = Rc::new(RefCell::new(HeliWidget {
            game,
            input: heli::TickInput::default(),
            clock: FrameClock::new(),
            latch: KeyLatch::new(),
            ctx,
        }));
        let scheduler = Rc::new(RefCell::new(RafScheduler::new()));

        // Draw the idle field behind the menu overlay
        {
            let w = widget.borrow();
            heli::render::render(&w.game, &w.ctx);
        }

        setup_heli_pointer(&canvas, widget.clone());
        setup_heli_touch(&canvas, widget.clone());
        setup_heli_keys(widget.clone());
        setup_fullscreen_button(document, "heli-fullscreen", canvas.parent_element());

        if let Some(btn) = document.get_element_by_id("heli-play") {
            let widget = widget.clone();
            let scheduler = scheduler.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                widget.borrow_mut().game.start();
                widget.borrow_mut().input = heli::TickInput::default();
                set_hidden(&document, "heli-overlay", true);
                start_heli_loop(widget.clone(), scheduler.clone(), document.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        log::info!("helicopter widget mounted ({}x{})", width, height);
        true
    }

    fn start_heli_loop(
        widget: Rc<RefCell<HeliWidget>>,
        scheduler: Rc<RefCell<RafScheduler>>,
        document: Document,
    ) {
        widget.borrow_mut().clock.reset();
        let w = widget.clone();
        scheduler.borrow_mut().start(Box::new(move |now| {
            let mut wd = w.borrow_mut();
            let elapsed = wd.clock.elapsed(now);
            let input = wd.input;
            // Update fully completes before render reads the state
            heli::tick(&mut wd.game, &input, frames(elapsed));
            heli::render::render(&wd.game, &wd.ctx);

            if wd.game.mode == Mode::Over {
                lock_page_scroll(false);
                show_heli_overlay(&document, &wd.game);
                LoopControl::Stop
            } else {
                LoopControl::Continue
            }
        }));
    }

    fn show_heli_overlay(document: &Document, game: &heli::HeliState) {
        set_text(document, "heli-final-score", &game.score.to_string());
        let new_best = game.score > 0 && game.score == game.best_score;
        set_hidden(document, "heli-new-best", !new_best);
        set_hidden(document, "heli-overlay", false);
    }

    fn setup_heli_pointer(canvas: &HtmlCanvasElement, widget: Rc<RefCell<HeliWidget>>) {
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                widget.borrow_mut().input.thrust = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                widget.borrow_mut().input.thrust = false;
            });
            let _ = canvas
                .add_event_listener_with_callback("mouseup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_heli_touch(canvas: &HtmlCanvasElement, widget: Rc<RefCell<HeliWidget>>) {
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut wd = widget.borrow_mut();
                if wd.game.mode == Mode::Running {
                    lock_page_scroll(true);
                }
                wd.input.thrust = true;
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for event_name in ["touchend", "touchcancel"] {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                widget.borrow_mut().input.thrust = false;
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            // Block scroll/pull-to-refresh gestures mid-flight
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if widget.borrow().game.mode == Mode::Running {
                    event.prevent_default();
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_heli_keys(widget: Rc<RefCell<HeliWidget>>) {
        let window = web_sys::window().expect("no window");
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if heli_thrust_key(&code) {
                    event.prevent_default();
                    let mut wd = widget.borrow_mut();
                    // Held keys re-fire keydown; only the edge counts
                    if wd.latch.press(&code) {
                        wd.input.thrust = true;
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if heli_thrust_key(&code) {
                    let mut wd = widget.borrow_mut();
                    if wd.latch.release(&code) {
                        wd.input.thrust = false;
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    // === Snake widget ===

    struct SnakeWidget {
        game: snake::SnakeState,
        input: snake::TickInput,
        clock: FrameClock,
        latch: KeyLatch,
        ctx: CanvasRenderingContext2d,
        touch_start: Option<(f64, f64)>,
    }

    fn mount_snake(document: &Document) -> bool {
        let Some(canvas) = canvas_by_id(document, "snake-canvas") else {
            return false;
        };
        // Fixed resolution for crisp pixels; CSS scales the element
        let side = (GRID_SIZE as f64 * CELL_SIZE) as u32;
        canvas.set_width(side);
        canvas.set_height(side);

        let Some(ctx) = canvas_2d(&canvas) else {
            log::error!("snake canvas has no 2d context");
            return false;
        };

        let seed = js_sys::Date::now() as u64;
        let store = LocalScoreStore::new(SNAKE_SCORE_KEY);
        let game = snake::SnakeState::new(Box::new(store), seed);

        let widget = Rc::new(RefCell::new(SnakeWidget {
            game,
            input: snake::TickInput::default(),
            clock: FrameClock::new(),
            latch: KeyLatch::new(),
            ctx,
            touch_start: None,
        }));
        let scheduler = Rc::new(RefCell::new(RafScheduler::new()));

        {
            let w = widget.borrow();
            snake::render::render(&w.game, &w.ctx);
        }

        setup_snake_keys(widget.clone());
        setup_snake_touch(&canvas, widget.clone());
        setup_snake_auto_pause(document, widget.clone());
        setup_fullscreen_button(document, "snake-fullscreen", canvas.parent_element());

        if let Some(btn) = document.get_element_by_id("snake-play") {
            let widget = widget.clone();
            let scheduler = scheduler.clone();
            let document = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                widget.borrow_mut().game.start();
                widget.borrow_mut().input = snake::TickInput::default();
                set_hidden(&document, "snake-overlay", true);
                start_snake_loop(widget.clone(), scheduler.clone(), document.clone());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        log::info!("snake widget mounted ({0}x{0})", side);
        true
    }

    fn start_snake_loop(
        widget: Rc<RefCell<SnakeWidget>>,
        scheduler: Rc<RefCell<RafScheduler>>,
        document: Document,
    ) {
        widget.borrow_mut().clock.reset();
        let w = widget.clone();
        scheduler.borrow_mut().start(Box::new(move |now| {
            let mut wd = w.borrow_mut();
            let elapsed = wd.clock.elapsed(now);
            let input = wd.input;
            snake::tick(&mut wd.game, &input, elapsed);
            // One-shot commands are consumed by exactly one update
            wd.input.turn = None;
            wd.input.pause = false;
            snake::render::render(&wd.game, &wd.ctx);

            // The loop keeps running while paused so the overlay stays
            // live; the update step freezes gameplay on its own
            if wd.game.mode == Mode::Over {
                show_snake_overlay(&document, &wd.game);
                LoopControl::Stop
            } else {
                LoopControl::Continue
            }
        }));
    }

    fn show_snake_overlay(document: &Document, game: &snake::SnakeState) {
        set_text(document, "snake-final-score", &game.score.to_string());
        set_text(document, "snake-final-length", &game.body.len().to_string());
        let new_best = game.score > 0 && game.score == game.best_score;
        set_hidden(document, "snake-new-best", !new_best);
        set_hidden(document, "snake-overlay", false);
    }

    fn setup_snake_keys(widget: Rc<RefCell<SnakeWidget>>) {
        let window = web_sys::window().expect("no window");
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                match snake_key(&code) {
                    Some(SnakeKey::Pause) => {
                        event.prevent_default();
                        let mut wd = widget.borrow_mut();
                        if wd.latch.press(&code) {
                            wd.input.pause = true;
                        }
                    }
                    Some(SnakeKey::Turn(dir)) => {
                        event.prevent_default();
                        widget.borrow_mut().input.turn = Some(dir);
                    }
                    None => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                widget.borrow_mut().latch.release(&event.code());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_snake_touch(canvas: &HtmlCanvasElement, widget: Rc<RefCell<SnakeWidget>>) {
        {
            let widget = widget.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    widget.borrow_mut().touch_start =
                        Some((touch.client_x() as f64, touch.client_y() as f64));
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut wd = widget.borrow_mut();
                let Some((sx, sy)) = wd.touch_start.take() else {
                    return;
                };
                if let Some(touch) = event.changed_touches().get(0) {
                    let dx = touch.client_x() as f64 - sx;
                    let dy = touch.client_y() as f64 - sy;
                    if let Some(dir) = swipe_direction(dx, dy, SWIPE_THRESHOLD) {
                        wd.input.turn = Some(dir);
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Freeze the game when the tab goes hidden; nobody enjoys a blind death
    fn setup_snake_auto_pause(document: &Document, widget: Rc<RefCell<SnakeWidget>>) {
        let doc = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut wd = widget.borrow_mut();
                if wd.game.mode == Mode::Running {
                    wd.input.pause = true;
                    log::info!("auto-paused (tab hidden)");
                }
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    web::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("canvas-arcade (native) starting...");

    let heli_score = demo::heli();
    println!("helicopter demo: score {heli_score}");
    let snake_score = demo::snake();
    println!("snake demo: score {snake_score}");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main; this satisfies the bin target
}

/// Headless scripted runs through the manual scheduler, exercising the
/// same driver contract the browser shell uses
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::RefCell;
    use std::rc::Rc;

    use canvas_arcade::driver::{FrameClock, FrameScheduler, LoopControl, ManualScheduler};
    use canvas_arcade::snake::state::Dir;
    use canvas_arcade::storage::MemoryScoreStore;
    use canvas_arcade::{Mode, frames, heli, snake};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    const DEMO_FRAMES: usize = 3600;

    /// Bang-bang autopilot: thrust whenever the copter sinks below midline
    pub fn heli() -> u32 {
        let game = Rc::new(RefCell::new(heli::HeliState::new(
            Box::new(MemoryScoreStore::new()),
            800.0,
            400.0,
            0xC0FFEE,
        )));
        game.borrow_mut().start();

        let clock = Rc::new(RefCell::new(FrameClock::new()));
        let mut scheduler = ManualScheduler::new();
        {
            let game = game.clone();
            let clock = clock.clone();
            scheduler.start(Box::new(move |now| {
                let mut g = game.borrow_mut();
                let dt = clock.borrow_mut().elapsed(now);
                let input = heli::TickInput {
                    thrust: g.copter.y > g.field_h / 2.0,
                };
                heli::tick(&mut g, &input, frames(dt));
                if g.mode == Mode::Over {
                    LoopControl::Stop
                } else {
                    LoopControl::Continue
                }
            }));
        }

        pump(&mut scheduler);
        let score = game.borrow().score;
        score
    }

    /// Wanderer that cycles turn intents; reversals are filtered by the sim
    pub fn snake() -> u32 {
        let game = Rc::new(RefCell::new(snake::SnakeState::new(
            Box::new(MemoryScoreStore::new()),
            0xBEEF,
        )));
        game.borrow_mut().start();

        let clock = Rc::new(RefCell::new(FrameClock::new()));
        let mut scheduler = ManualScheduler::new();
        {
            let game = game.clone();
            let clock = clock.clone();
            let mut frame = 0usize;
            scheduler.start(Box::new(move |now| {
                let mut g = game.borrow_mut();
                let dt = clock.borrow_mut().elapsed(now);
                const TURNS: [Dir; 4] = [Dir::Up, Dir::Right, Dir::Down, Dir::Left];
                let turn = if frame % 25 == 0 {
                    Some(TURNS[(frame / 25) % TURNS.len()])
                } else {
                    None
                };
                frame += 1;
                let input = snake::TickInput { turn, pause: false };
                snake::tick(&mut g, &input, dt);
                if g.mode == Mode::Over {
                    LoopControl::Stop
                } else {
                    LoopControl::Continue
                }
            }));
        }

        pump(&mut scheduler);
        let score = game.borrow().score;
        score
    }

    fn pump(scheduler: &mut ManualScheduler) {
        let mut now = 0.0;
        for _ in 0..DEMO_FRAMES {
            if !scheduler.pump(now) {
                break;
            }
            now += FRAME_MS;
        }
    }
}
