//! Oval Arena entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use oval_arena::consts::*;
    use oval_arena::platform::{CONTROLS_HINT, action_for_key, suppress_default, toggle_for_key};
    use oval_arena::renderer::RenderState;
    use oval_arena::sim::{FixedStep, GameEvent, GameState, InputEvent, InputQueue, tick};
    use oval_arena::{Settings, SettingsToggle, Tuning};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<RenderState>,
        step: FixedStep,
        last_time: f64,
        input: InputQueue,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        hits: u32,
    }

    impl Game {
        fn new(tuning: Tuning, settings: Settings) -> Self {
            Self {
                state: GameState::new(tuning),
                settings,
                render_state: None,
                step: FixedStep::new(),
                last_time: 0.0,
                input: InputQueue::new(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                hits: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            for _ in 0..self.step.advance(dt) {
                let input = self.input.drain();
                tick(&mut self.state, &input, SIM_DT);
            }

            for event in self.state.drain_events() {
                if let GameEvent::ProjectileDespawned { target, .. } = event {
                    log::info!("Projectile hit {}", target.tag.as_str());
                    self.hits += 1;
                }
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Flip a preference, persist it and refresh what it controls
        fn toggle_setting(&mut self, toggle: SettingsToggle) {
            let enabled = self.settings.toggle(toggle);
            log::info!("{toggle:?} -> {enabled}");
            self.settings.save();
            if toggle == SettingsToggle::ShowControlsHint {
                show_controls_hint(enabled);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-fps") {
                let class = if self.settings.show_fps { "hud-item" } else { "hud-item hidden" };
                let _ = el.set_attribute("class", class);
            }
            if let Some(el) = document.query_selector("#hud-fps .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.fps.to_string()));
            }
            if let Some(el) = document.query_selector("#hud-hits .hud-value").ok().flatten() {
                el.set_text_content(Some(&self.hits.to_string()));
            }
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Oval Arena starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (width, height) = fit_canvas(&window, &canvas);

        let settings = Settings::load();
        if let Some(el) = document.get_element_by_id("controls-hint") {
            el.set_text_content(Some(CONTROLS_HINT));
        }
        show_controls_hint(settings.show_controls_hint);

        let game = Rc::new(RefCell::new(Game::new(Tuning::default(), settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = {
            let g = game.borrow();
            RenderState::new(surface, &adapter, width, height, &g.state)
                .await
                .map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, game.clone());
        setup_resize(canvas, game.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        // Start game loop
        request_animation_frame(game);
        log::info!("Oval Arena running!");
        Ok(())
    }

    fn show_controls_hint(visible: bool) {
        let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("controls-hint"))
        else {
            return;
        };
        let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
    }

    /// Size the canvas backing store to its CSS size at device pixel ratio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = ((canvas.client_width() as f64 * dpr) as u32).max(1);
        let height = ((canvas.client_height() as f64 * dpr) as u32).max(1);
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height)
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Held keys
        for (event_name, pressed) in [("keydown", true), ("keyup", false)] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if pressed && !event.repeat() {
                    if let Some(toggle) = toggle_for_key(&key) {
                        game.borrow_mut().toggle_setting(toggle);
                        return;
                    }
                }
                let Some(action) = action_for_key(&key) else {
                    return;
                };
                if suppress_default(&key) {
                    event.prevent_default();
                }
                let input = if pressed {
                    InputEvent::ActionPressed(action)
                } else {
                    InputEvent::ActionReleased(action)
                };
                game.borrow_mut().input.push(input);
            });
            let _ = window
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse button: one fire request per press of the primary button
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().input.push(InputEvent::PointerDown {
                    button: event.button(),
                });
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Vertical pointer motion adjusts the camera height
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let mut g = game.borrow_mut();
                let dy = g.settings.scale_pointer_dy(event.movement_y() as f32);
                g.input.push(InputEvent::PointerMove { dy });
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyups are lost while unfocused; release everything on blur
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.release_all();
                log::info!("Window blur, released held input");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let (width, height) = fit_canvas(&window, &canvas);
            if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
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
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Oval Arena (native) starting...");
    log::info!("Rendering needs a browser canvas - run with `trunk serve`; running a headless session");

    let tuning = match std::env::args().nth(1) {
        Some(path) => match oval_arena::Tuning::from_path(&path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {path}");
                tuning
            }
            Err(e) => {
                log::error!("{path}: {e}");
                std::process::exit(1);
            }
        },
        None => oval_arena::Tuning::default(),
    };

    headless::run(tuning);
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    //! Scripted session driving the simulation through the same input queue
    //! and fixed-step loop the browser uses.

    use oval_arena::Tuning;
    use oval_arena::consts::SIM_DT;
    use oval_arena::sim::{
        Action, FixedStep, GameEvent, GameState, InputEvent, InputQueue, PRIMARY_BUTTON, tick,
    };

    /// (second, event) pairs, in order
    fn script() -> Vec<(f32, InputEvent)> {
        use InputEvent::*;
        vec![
            (0.0, ActionPressed(Action::Forward)),
            (0.5, PointerDown { button: PRIMARY_BUTTON }),
            (1.0, ActionPressed(Action::Sprint)),
            (2.0, ActionPressed(Action::Jump)),
            (2.1, ActionReleased(Action::Jump)),
            (2.5, PointerMove { dy: -60.0 }),
            // Runs into the fence and slides
            (6.0, ActionPressed(Action::TurnLeft)),
            (6.5, ActionReleased(Action::TurnLeft)),
            (7.0, PointerDown { button: PRIMARY_BUTTON }),
            (7.0, PointerDown { button: 2 }),
            (8.0, ActionReleased(Action::Sprint)),
            (9.0, ActionReleased(Action::Forward)),
        ]
    }

    pub fn run(tuning: Tuning) {
        let mut state = GameState::new(tuning);
        let mut queue = InputQueue::new();
        let mut step = FixedStep::new();
        let mut script = script().into_iter().peekable();

        // Uneven frame pacing: 60 Hz with a dropped frame every so often
        let frames = (0..720).map(|i| if i % 7 == 0 { SIM_DT * 2.0 } else { SIM_DT });
        let mut clock = 0.0f32;
        let (mut spawned, mut despawned) = (0u32, 0u32);

        for frame_dt in frames {
            clock += frame_dt;
            while let Some((_, event)) = script.next_if(|(at, _)| *at <= clock) {
                queue.push(event);
            }

            for _ in 0..step.advance(frame_dt) {
                let input = queue.drain();
                tick(&mut state, &input, SIM_DT);
            }

            for event in state.drain_events() {
                match event {
                    GameEvent::ProjectileSpawned { id, position, .. } => {
                        spawned += 1;
                        log::info!("Projectile {id} fired from {position:.2}");
                    }
                    GameEvent::ProjectileDespawned {
                        id,
                        position,
                        target,
                    } => {
                        despawned += 1;
                        log::info!("Projectile {id} hit {} at {position:.2}", target.tag.as_str());
                    }
                }
            }
        }

        if let Some(player) = &state.player {
            log::info!(
                "After {} ticks: player at {:.2} yaw {:.2}, speed {:.3}",
                state.time_ticks,
                player.transform.position,
                player.transform.yaw,
                player.motion.speed
            );
        }
        log::info!(
            "Projectiles: {spawned} fired, {despawned} hit, {} in flight; camera base height {:.2}",
            state.projectiles.len(),
            state.camera.base_height
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
