//! The frame driver: owns the backend, the camera, the listener chains and
//! the render queue, and runs drain-events / render / pace once per frame.

use crate::backend::{EventSource, InputEvent, KeyCode, MouseButton, RenderBackend};
use crate::camera::Camera;
use crate::config::EngineConfig;
use crate::dispatch::EventDispatcher;
use crate::error::{EngineError, Result};
use crate::render::Renderable;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    Stopped,
}

/// What listeners may touch while an event is being dispatched.
pub struct FrameControl<'a> {
    pub camera: &'a mut Camera,
    stop_requested: &'a mut bool,
}

impl<'a> FrameControl<'a> {
    pub fn new(camera: &'a mut Camera, stop_requested: &'a mut bool) -> Self {
        Self {
            camera,
            stop_requested,
        }
    }

    /// Stops the loop at the end of the current frame.
    pub fn request_stop(&mut self) {
        *self.stop_requested = true;
    }

    pub fn stop_requested(&self) -> bool {
        *self.stop_requested
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    /// Work time of the last frame, pacing excluded.
    pub last_frame: Duration,
}

impl FrameStats {
    pub fn fps(&self) -> u32 {
        if self.last_frame.is_zero() {
            return 0;
        }
        (1.0 / self.last_frame.as_secs_f64()).round() as u32
    }
}

/// Remaining time to wait so a frame that took `elapsed` lasts `target`.
/// Zero once the frame has overrun.
pub fn pacing_delay(elapsed: Duration, target: Duration) -> Duration {
    target.saturating_sub(elapsed)
}

pub struct GameContext<B: RenderBackend, E: EventSource> {
    backend: B,
    events: E,
    pub camera: Camera,
    pub dispatcher: EventDispatcher,
    render_queue: Vec<Box<dyn Renderable<B>>>,
    config: EngineConfig,
    state: RunState,
    stop_requested: bool,
    stats: FrameStats,
}

impl<B: RenderBackend, E: EventSource> GameContext<B, E> {
    pub fn new(backend: B, events: E, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let mut camera = Camera::new();
        camera.set_zoom(config.initial_zoom);
        info!(title = %config.title, target_fps = config.target_fps, "game context created");
        Ok(Self {
            backend,
            events,
            camera,
            dispatcher: EventDispatcher::new(),
            render_queue: Vec::new(),
            config,
            state: RunState::Running,
            stop_requested: false,
            stats: FrameStats::default(),
        })
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    pub fn set_target_fps(&mut self, fps: u32) -> Result<()> {
        if fps == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "invalid target framerate {fps}, should be greater than 0"
            )));
        }
        self.config.target_fps = fps;
        Ok(())
    }

    /// Drawn every frame after everything registered before it.
    pub fn add_renderable<R: Renderable<B> + 'static>(&mut self, renderable: R) {
        self.render_queue.push(Box::new(renderable));
    }

    pub fn add_movement_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&mut FrameControl<'_>, i32, i32) -> bool + 'static,
    {
        self.dispatcher.add_movement_listener(listener);
    }

    pub fn add_click_listener<F>(&mut self, listener: F)
    where
        F: FnMut(&mut FrameControl<'_>, i32, i32, MouseButton, bool) -> bool + 'static,
    {
        self.dispatcher.add_click_listener(listener);
    }

    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    /// Routes one event. Pointer events go through the listener chains and
    /// the return value says whether one consumed it; quit and Escape bypass
    /// the chains.
    pub fn handle_event(&mut self, event: InputEvent) -> bool {
        let mut ctl = FrameControl::new(&mut self.camera, &mut self.stop_requested);
        match event {
            InputEvent::Quit => {
                info!("quit requested");
                ctl.request_stop();
                true
            }
            InputEvent::Key {
                code: KeyCode::Escape,
                pressed: true,
            } => {
                info!("escape pressed");
                ctl.request_stop();
                true
            }
            InputEvent::Key { code, pressed } => {
                trace!(?code, pressed, "unhandled key");
                false
            }
            InputEvent::PointerMove { x, y } => self.dispatcher.dispatch_movement(&mut ctl, x, y),
            InputEvent::PointerButton {
                x,
                y,
                button,
                pressed,
            } => self
                .dispatcher
                .dispatch_click(&mut ctl, x, y, button, pressed),
        }
    }

    fn drain_events(&mut self) {
        while let Some(event) = self.events.poll_event() {
            self.handle_event(event);
        }
    }

    /// One full render pass: clear, every renderable in order, present.
    pub fn render(&mut self) -> Result<()> {
        self.backend.clear(self.config.clear_color)?;
        for renderable in &mut self.render_queue {
            renderable.render(&mut self.backend, &self.camera)?;
        }
        self.backend.present()?;
        Ok(())
    }

    /// Runs one iteration without pacing and returns the state after it.
    pub fn step(&mut self) -> Result<RunState> {
        if self.state == RunState::Stopped {
            return Ok(RunState::Stopped);
        }

        let start = Instant::now();
        self.drain_events();
        if let Err(e) = self.render() {
            error!(error = %e, frame = self.stats.frames, "render pass failed");
            self.state = RunState::Stopped;
            return Err(e);
        }

        self.stats.frames += 1;
        self.stats.last_frame = start.elapsed();

        if self.stop_requested {
            info!(frames = self.stats.frames, "frame loop stopped");
            self.state = RunState::Stopped;
        }
        Ok(self.state)
    }

    /// Blocking loop paced to the configured frame interval.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let start = Instant::now();
            if self.step()? == RunState::Stopped {
                return Ok(());
            }
            self.pace(start.elapsed());
        }
    }

    /// Loop for hosts driven by macroquad's `next_frame`.
    pub async fn run_async(&mut self) -> Result<()> {
        loop {
            let start = Instant::now();
            if self.step()? == RunState::Stopped {
                return Ok(());
            }
            macroquad::window::next_frame().await;
            self.pace(start.elapsed());
        }
    }

    fn pace(&self, elapsed: Duration) {
        let delay = pacing_delay(elapsed, self.config.frame_interval());
        if delay.is_zero() {
            debug!(elapsed_ms = elapsed.as_millis() as u64, "frame overran its budget");
        } else {
            std::thread::sleep(delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pacing_never_goes_negative() {
        let target = Duration::from_millis(33);
        assert_eq!(pacing_delay(Duration::from_millis(10), target), Duration::from_millis(23));
        assert_eq!(pacing_delay(Duration::from_millis(33), target), Duration::ZERO);
        assert_eq!(pacing_delay(Duration::from_millis(50), target), Duration::ZERO);
    }

    #[test]
    fn fps_from_last_frame() {
        let stats = FrameStats {
            frames: 1,
            last_frame: Duration::from_millis(10),
        };
        assert_eq!(stats.fps(), 100);
        assert_eq!(FrameStats::default().fps(), 0);
    }

    #[test]
    fn frame_control_records_stop() {
        let mut camera = Camera::new();
        let mut stop = false;
        let mut ctl = FrameControl::new(&mut camera, &mut stop);
        assert!(!ctl.stop_requested());
        ctl.request_stop();
        assert!(ctl.stop_requested());
        assert!(stop);
    }
}
