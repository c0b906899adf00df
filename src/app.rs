//! Windowed game loop
//!
//! Owns the winit window and the wgpu renderer, turns key presses into
//! `InputEvent`s, advances the spawn timer with wall-clock time and runs one
//! simulation tick per frame.

use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::consts::MAX_FRAME_DELTA_MS;
use crate::error::{RunError, SetupError};
use crate::headless::RunSummary;
use crate::renderer::{RenderState, create_instance, scene};
use crate::settings::{Settings, clock_seed};
use crate::sim::{InputEvent, Session, Snapshot, SpawnTimer, autopilot};

pub const WINDOW_TITLE: &str = "Jumpy-fish";

/// What a key press means to the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Jump,
    Quit,
    Restart,
}

/// Map a key press to an action, given whether the session is still running
pub fn key_action(code: KeyCode, running: bool) -> Option<KeyAction> {
    match code {
        KeyCode::Escape => Some(KeyAction::Quit),
        KeyCode::Space if running => Some(KeyAction::Jump),
        KeyCode::Space | KeyCode::KeyR if !running => Some(KeyAction::Restart),
        _ => None,
    }
}

/// Elapsed time fed to the spawn timer, capped so a stall cannot release a
/// burst of pipes
pub fn clamp_frame_delta(dt: Duration) -> Duration {
    dt.min(Duration::from_millis(MAX_FRAME_DELTA_MS))
}

/// Game instance holding all state
struct App {
    settings: Settings,
    autopilot: bool,
    session: Session,
    spawner: SpawnTimer,
    snapshot: Snapshot,
    /// Events collected since the last tick
    pending: Vec<InputEvent>,
    instance: wgpu::Instance,
    window: Option<Arc<Window>>,
    render_state: Option<RenderState>,
    last_frame: Option<Instant>,
    next_frame: Instant,
    /// Ticks run in the current session
    ticks: u64,
    frames_rendered: u64,
    setup_error: Option<SetupError>,
}

impl App {
    fn new(settings: Settings, session: Session, autopilot: bool) -> Self {
        let spawner = SpawnTimer::new(session.config().spawn_interval());
        let snapshot = session.snapshot();
        Self {
            settings,
            autopilot,
            session,
            spawner,
            snapshot,
            pending: Vec::new(),
            instance: create_instance(),
            window: None,
            render_state: None,
            last_frame: None,
            next_frame: Instant::now(),
            ticks: 0,
            frames_rendered: 0,
            setup_error: None,
        }
    }

    fn play_size(&self) -> Vec2 {
        let config = self.session.config();
        Vec2::new(config.play_width, config.play_height)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: SetupError) {
        log::error!("{err}");
        self.setup_error = Some(err);
        event_loop.exit();
    }

    /// Run one simulation tick with everything gathered since the last one
    fn step(&mut self, now: Instant) {
        let dt = self
            .last_frame
            .map(|last| clamp_frame_delta(now.saturating_duration_since(last)))
            .unwrap_or_default();
        self.last_frame = Some(now);

        if !self.snapshot.is_running() {
            self.pending.clear();
            return;
        }

        let mut events = std::mem::take(&mut self.pending);
        events.extend(self.spawner.spawn_events(dt));
        if self.autopilot {
            events.extend(autopilot(&self.snapshot));
        }
        self.snapshot = self.session.tick(&events);
        self.ticks += 1;
    }

    /// End the run and close the window
    fn quit(&mut self, event_loop: &ActiveEventLoop) {
        self.pending.push(InputEvent::Quit);
        self.step(Instant::now());
        event_loop.exit();
    }

    fn restart(&mut self) {
        let seed = clock_seed();
        // The config was accepted once already, so this cannot fail
        match Session::new(self.session.config().clone(), seed) {
            Ok(session) => {
                log::info!("Restarting with seed {seed}");
                self.session = session;
                self.snapshot = self.session.snapshot();
                self.spawner.reset();
                self.pending.clear();
                self.last_frame = None;
                self.ticks = 0;
            }
            Err(err) => log::error!("Could not restart: {err}"),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: &KeyEvent) {
        if event.state != ElementState::Pressed || event.repeat {
            return;
        }
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };

        match key_action(code, self.snapshot.is_running()) {
            Some(KeyAction::Jump) => self.pending.push(InputEvent::Jump),
            Some(KeyAction::Quit) => self.quit(event_loop),
            Some(KeyAction::Restart) => self.restart(),
            None => {}
        }
    }

    fn render(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_state) = self.render_state.as_mut() else {
            return;
        };

        match render_state.render(&scene(&self.snapshot)) {
            Ok(()) => self.frames_rendered += 1,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost or outdated, reconfiguring");
                render_state.reconfigure();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory");
                event_loop.exit();
            }
            Err(err) => log::warn!("Skipping frame: {err}"),
        }
    }

    fn summary(&self) -> RunSummary {
        RunSummary::new(&self.session, self.ticks, self.frames_rendered)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let play_size = self.play_size();
        let attributes = Window::default_attributes()
            .with_title(WINDOW_TITLE)
            .with_inner_size(LogicalSize::new(play_size.x as f64, play_size.y as f64));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => return self.fail(event_loop, err.into()),
        };

        match pollster::block_on(RenderState::for_window(
            &self.instance,
            window.clone(),
            play_size,
        )) {
            Ok(render_state) => {
                let (w, h) = render_state.size;
                log::info!("Window ready ({w}x{h})");
                self.render_state = Some(render_state);
            }
            Err(err) => return self.fail(event_loop, err),
        }

        window.request_redraw();
        self.window = Some(window);
        self.next_frame = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => self.quit(event_loop),
            WindowEvent::Resized(size) => {
                if let Some(render_state) = self.render_state.as_mut() {
                    render_state.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(event_loop, &event),
            WindowEvent::RedrawRequested => self.render(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = self.window.clone() else {
            return;
        };

        let now = Instant::now();
        if now >= self.next_frame {
            self.step(now);
            window.request_redraw();

            let frame = self.settings.frame_duration();
            self.next_frame += frame;
            // Fell behind: pace from now instead of catching up
            if self.next_frame < now {
                self.next_frame = now + frame;
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_frame));
    }
}

/// Open the game window and play until it is closed
///
/// Returns the summary of the last session played.
pub fn run(settings: Settings, autopilot: bool) -> Result<RunSummary, RunError> {
    let seed = settings.run_seed();
    let session = Session::new(settings.sim.clone(), seed)?;
    log::info!("Starting windowed session with seed {seed}");

    let event_loop = EventLoop::new().map_err(SetupError::from)?;
    let mut app = App::new(settings, session, autopilot);
    event_loop.run_app(&mut app).map_err(SetupError::from)?;

    if let Some(err) = app.setup_error.take() {
        return Err(err.into());
    }
    Ok(app.summary())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_space_jumps_while_running() {
        assert_eq!(key_action(KeyCode::Space, true), Some(KeyAction::Jump));
        assert_eq!(key_action(KeyCode::KeyR, true), None);
    }

    #[test]
    fn test_restart_keys_after_end() {
        assert_eq!(key_action(KeyCode::Space, false), Some(KeyAction::Restart));
        assert_eq!(key_action(KeyCode::KeyR, false), Some(KeyAction::Restart));
    }

    #[test]
    fn test_escape_always_quits() {
        assert_eq!(key_action(KeyCode::Escape, true), Some(KeyAction::Quit));
        assert_eq!(key_action(KeyCode::Escape, false), Some(KeyAction::Quit));
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(key_action(KeyCode::KeyA, true), None);
        assert_eq!(key_action(KeyCode::ArrowUp, false), None);
    }

    #[test]
    fn test_frame_delta_is_clamped() {
        assert_eq!(
            clamp_frame_delta(Duration::from_millis(16)),
            Duration::from_millis(16)
        );
        assert_eq!(
            clamp_frame_delta(Duration::from_secs(5)),
            Duration::from_millis(MAX_FRAME_DELTA_MS)
        );
    }
}
