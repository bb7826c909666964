//! Phrase Party entry point
//!
//! Browser build wires DOM input into the round controller; the native build
//! runs a round in the terminal.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{DeviceOrientationEvent, EventTarget, PointerEvent};

    use phrase_party::consts::TIMER_POLL_MS;
    use phrase_party::platform::{MotionPermission, PermissionOutcome};
    use phrase_party::{Action, Card, GameError, Mode, RoundController, RoundEvent, Settings};

    const FALLBACK_DECK: &[(&str, &str)] = &[
        ("Brushing teeth", "Morning routine"),
        ("Moonwalk", "Dance move"),
        ("Lighthouse", "Coastal building"),
        ("Pancake flip", "Breakfast trick"),
        ("Karaoke", "Singing with friends"),
    ];

    /// DOM listener that unregisters itself on drop
    struct Listener {
        target: EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Listener {
        fn new(
            target: &EventTarget,
            kind: &'static str,
            handler: impl FnMut(web_sys::Event) + 'static,
        ) -> Option<Self> {
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
            target
                .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
                .ok()?;
            Some(Self {
                target: target.clone(),
                kind,
                closure,
            })
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
        }
    }

    /// `DeviceOrientationEvent.requestPermission`, present only on iOS Safari
    fn request_permission_fn() -> Option<(JsValue, js_sys::Function)> {
        let ctor = js_sys::Reflect::get(&js_sys::global(), &"DeviceOrientationEvent".into()).ok()?;
        if ctor.is_undefined() {
            return None;
        }
        let func = js_sys::Reflect::get(&ctor, &"requestPermission".into()).ok()?;
        let func = func.dyn_into::<js_sys::Function>().ok()?;
        Some((ctor, func))
    }

    async fn request_motion_permission() -> PermissionOutcome {
        let Some((ctor, func)) = request_permission_fn() else {
            return Ok(());
        };
        let promise = func
            .call0(&ctor)
            .ok()
            .and_then(|p| p.dyn_into::<js_sys::Promise>().ok())
            .ok_or(GameError::PermissionDenied)?;
        match wasm_bindgen_futures::JsFuture::from(promise).await {
            Ok(state) if state.as_string().as_deref() == Some("granted") => Ok(()),
            _ => Err(GameError::PermissionDenied),
        }
    }

    #[derive(Default)]
    struct BrowserPermission {
        granted: bool,
    }

    impl MotionPermission for BrowserPermission {
        fn gate_required(&self) -> bool {
            request_permission_fn().is_some()
        }

        fn granted(&self) -> bool {
            self.granted
        }
    }

    struct App {
        controller: RoundController,
        permission: BrowserPermission,
        source: Vec<Card>,
        orientation: Option<Listener>,
        /// Listeners detached from inside their own callback; dropped on the next poll
        retired: Vec<Listener>,
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn element(id: &str) -> Option<web_sys::Element> {
        web_sys::window()?.document()?.get_element_by_id(id)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = element(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Deck from `<script id="deck" type="application/json">`, if present
    fn load_deck() -> Vec<Card> {
        let json = element("deck").and_then(|el| el.text_content());
        if let Some(json) = json {
            match serde_json::from_str::<Vec<Card>>(&json) {
                Ok(cards) => return cards,
                Err(e) => log::warn!("Deck JSON ignored: {}", e),
            }
        }
        FALLBACK_DECK
            .iter()
            .map(|(phrase, hint)| Card::new(*phrase, *hint))
            .collect()
    }

    fn render_card(app: &App) {
        let show_hints = app.controller.settings().show_hints;
        match app.controller.current_card() {
            Some(card) => {
                set_text("phrase", &card.phrase);
                set_text("hint", if show_hints { &card.hint } else { "" });
            }
            None => {
                set_text("phrase", "");
                set_text("hint", "");
            }
        }
    }

    /// Apply queued controller events to the DOM and listener registry
    fn pump(app: &Rc<RefCell<App>>) {
        let events = app.borrow_mut().controller.drain_events();
        for event in events {
            match event {
                RoundEvent::Started { time_left_secs, .. } => {
                    set_text("timer", &time_left_secs.to_string());
                    set_text("got", "0");
                    set_text("pass", "0");
                    set_text("results", "");
                    render_card(&app.borrow());
                }
                RoundEvent::ActionApplied {
                    action, counters, ..
                } => {
                    set_text("got", &counters.got.to_string());
                    set_text("pass", &counters.pass.to_string());
                    let flash = match action {
                        Action::Got => "Got it!",
                        Action::Pass => "Pass",
                        Action::Next => "Skipped",
                    };
                    set_text("phrase", flash);
                    set_text("hint", "");
                }
                RoundEvent::CardRevealed { .. } => render_card(&app.borrow()),
                RoundEvent::TimeLeft(secs) => set_text("timer", &secs.to_string()),
                RoundEvent::Status(status) => set_text("tilt-status", status.as_str()),
                RoundEvent::TiltAttached => attach_orientation(app),
                RoundEvent::TiltDetached => {
                    let mut a = app.borrow_mut();
                    if let Some(listener) = a.orientation.take() {
                        a.retired.push(listener);
                    }
                    log::info!("Orientation listener detached");
                }
                RoundEvent::SaveSettings(settings) => settings.save(),
                RoundEvent::Finished(results) => {
                    render_card(&app.borrow());
                    set_text(
                        "results",
                        &format!(
                            "{}: {} shown, {} got, {} passed (deck of {})",
                            results.reason,
                            results.shown,
                            results.got,
                            results.pass,
                            results.deck_size
                        ),
                    );
                }
            }
        }
    }

    fn attach_orientation(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handler_app = app.clone();
        let listener = Listener::new(window.as_ref(), "deviceorientation", move |event| {
            let beta = event
                .dyn_ref::<DeviceOrientationEvent>()
                .and_then(|e| e.beta());
            handler_app
                .borrow_mut()
                .controller
                .orientation_sample(beta, now());
            pump(&handler_app);
        });
        if listener.is_some() {
            log::info!("Orientation listener attached");
        }
        app.borrow_mut().orientation = listener;
    }

    fn start(app: &Rc<RefCell<App>>, again: bool) {
        let needs_grant = {
            let a = app.borrow();
            a.controller.settings().tilt_enabled
                && a.permission.gate_required()
                && !a.permission.granted
        };

        let result = {
            let mut guard = app.borrow_mut();
            let a = &mut *guard;
            if again {
                a.controller.play_again(&a.permission, now())
            } else {
                a.controller.start_round(&a.source, &a.permission, now())
            }
        };
        if let Err(e) = result {
            set_text("results", &e.to_string());
            return;
        }
        pump(app);

        // Must run inside the click handler's user gesture on iOS
        if needs_grant {
            let app = app.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = request_motion_permission().await;
                {
                    let mut a = app.borrow_mut();
                    a.permission.granted = outcome.is_ok();
                    a.controller.resolve_permission(outcome);
                }
                pump(&app);
            });
        }
    }

    fn on_click(app: &Rc<RefCell<App>>, id: &str, f: impl Fn(&Rc<RefCell<App>>) + 'static) {
        let Some(el) = element(id) else {
            log::warn!("Missing #{} button", id);
            return;
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| f(&app));
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn tap(app: &Rc<RefCell<App>>, action: Action) {
        app.borrow_mut().controller.tap(action, now());
        pump(app);
    }

    fn setup_input_handlers(app: &Rc<RefCell<App>>) {
        on_click(app, "start", |app| start(app, false));
        on_click(app, "again", |app| start(app, true));
        on_click(app, "btn-got", |app| tap(app, Action::Got));
        on_click(app, "btn-pass", |app| tap(app, Action::Pass));
        on_click(app, "btn-next", |app| tap(app, Action::Next));
        on_click(app, "btn-end", |app| {
            app.borrow_mut().controller.end_now();
            pump(app);
        });
        on_click(app, "edit", |app| {
            app.borrow_mut().controller.reset();
            pump(app);
        });

        let Some(stage) = element("stage") else {
            log::warn!("Missing #stage element, swipes disabled");
            return;
        };

        // Pointer down
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut a = app.borrow_mut();
                if a.controller.mode() != Mode::Running {
                    return;
                }
                event.prevent_default();
                a.controller
                    .pointer_down(event.client_x() as f32, event.client_y() as f32, now());
            });
            let _ = stage
                .add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pointer up
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                app.borrow_mut().controller.pointer_up(
                    event.client_x() as f32,
                    event.client_y() as f32,
                    now(),
                );
                pump(&app);
            });
            let _ = stage
                .add_event_listener_with_callback("pointerup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_timer(app: &Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let app = app.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            {
                let mut a = app.borrow_mut();
                a.retired.clear();
                a.controller.tick(now());
            }
            pump(&app);
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            TIMER_POLL_MS as i32,
        );
        closure.forget();
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Phrase Party starting...");

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let app = Rc::new(RefCell::new(App {
            controller: RoundController::new(settings, seed),
            permission: BrowserPermission::default(),
            source: load_deck(),
            orientation: None,
            retired: Vec::new(),
        }));
        log::info!("Loaded {} phrases", app.borrow().source.len());

        setup_input_handlers(&app);
        setup_timer(&app);
        log::info!("Phrase Party ready!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod terminal {
    use std::error::Error;
    use std::io::{self, BufRead, Write};
    use std::time::{Instant, SystemTime, UNIX_EPOCH};

    use phrase_party::platform::NoPermissionGate;
    use phrase_party::{Action, Card, RoundController, RoundEvent, Settings};

    const DEMO_DECK: &[(&str, &str)] = &[
        ("Brushing teeth", "Morning routine"),
        ("Moonwalk", "Dance move"),
        ("Lighthouse", "Coastal building"),
        ("Pancake flip", "Breakfast trick"),
        ("Karaoke", "Singing with friends"),
        ("Thunderstorm", "Weather"),
        ("Juggling", "Circus skill"),
        ("Penguin", "Tuxedo bird"),
    ];

    fn report(rc: &mut RoundController) {
        for event in rc.drain_events() {
            match event {
                RoundEvent::Started {
                    deck_size,
                    time_left_secs,
                } => println!("Round started: {deck_size} cards, {time_left_secs}s on the clock"),
                RoundEvent::ActionApplied {
                    action, counters, ..
                } => println!(
                    "{:?} (got {}, passed {})",
                    action, counters.got, counters.pass
                ),
                RoundEvent::TimeLeft(secs) => println!("{secs}s left"),
                RoundEvent::SaveSettings(settings) => settings.save(),
                RoundEvent::Finished(r) => println!(
                    "Round over, {}: {} shown, {} got, {} passed",
                    r.reason, r.shown, r.got, r.pass
                ),
                RoundEvent::CardRevealed { .. }
                | RoundEvent::Status(_)
                | RoundEvent::TiltAttached
                | RoundEvent::TiltDetached => {}
            }
        }
        if let Some(card) = rc.current_card() {
            println!("\n    {}", card.phrase);
            if rc.settings().show_hints && !card.hint.is_empty() {
                println!("    ({})", card.hint);
            }
        }
    }

    pub fn run() -> Result<(), Box<dyn Error>> {
        let seed = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let mut rc = RoundController::new(Settings::load(), seed);
        let deck: Vec<Card> = DEMO_DECK
            .iter()
            .map(|(phrase, hint)| Card::new(*phrase, *hint))
            .collect();

        let clock = Instant::now();
        let now = || clock.elapsed().as_secs_f64() * 1000.0;

        println!("g = got, p = pass, n = next, e = end, a = play again, q = quit");
        rc.start_round(&deck, &NoPermissionGate, now())?;
        report(&mut rc);

        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            let t = now();
            // Catch the timer up before applying the input
            rc.tick(t);
            match line.trim() {
                "g" => rc.tap(Action::Got, t),
                "p" => rc.tap(Action::Pass, t),
                "n" => rc.tap(Action::Next, t),
                "e" => rc.end_now(),
                "a" => rc.play_again(&NoPermissionGate, t)?,
                "q" => break,
                "" => {}
                other => println!("unknown command: {other}"),
            }
            report(&mut rc);
            print!("> ");
            io::stdout().flush()?;
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Phrase Party (native) starting...");

    if let Err(e) = terminal::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
