#![forbid(unsafe_code)]

//! The frame loop: drains input, dispatches events, renders when dirty,
//! and paces itself to a target frame rate.

use std::io::{self, Write};
use std::time::{Duration, Instant};

use loomterm_core::event::{Event, TickEvent};
use loomterm_core::event_queue::EventQueue;
use loomterm_core::geometry::Rect;
use loomterm_core::terminal_capabilities::detect_color_profile;
use loomterm_render::renderer::Renderer;
use loomterm_term::{TerminalConfig, TerminalController, TtyEventSource};

use crate::render_context::RenderContext;
use crate::widget::{EventResult, Widget};

/// Frame-loop tuning: target frame rate, whether per-frame ticks are
/// dispatched, and the bounded event queue's capacity.
#[derive(Debug, Clone, Copy)]
pub struct AppConfig {
    pub target_fps: u32,
    pub enable_ticks: bool,
    pub queue_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { target_fps: 60, enable_ticks: false, queue_capacity: 256 }
    }
}

/// Owns the terminal, renderer, event queue, and the root widget for one
/// application run.
///
/// `'a` is the lifetime of the borrowed root widget set via
/// [`App::set_root`]; the app never takes ownership of it.
pub struct App<'a, W: Write> {
    controller: TerminalController<W>,
    events: TtyEventSource,
    renderer: Renderer,
    queue: EventQueue,
    config: AppConfig,
    running: bool,
    root: Option<&'a mut dyn Widget>,
    start: Instant,
    last_tick: Instant,
    tick_number: u64,
}

impl<'a, W: Write> App<'a, W> {
    /// Construct the terminal controller, a renderer sized to the event
    /// source's current dimensions, the parser (owned by `events`), and
    /// the event queue. Setup runs immediately; on failure no state
    /// persists.
    pub fn init(
        output: W,
        terminal_config: TerminalConfig,
        events: TtyEventSource,
        config: AppConfig,
    ) -> io::Result<Self> {
        let mut controller = TerminalController::new(output, terminal_config);
        controller.setup()?;
        let (cols, rows) = events.size();
        let renderer = Renderer::new(cols, rows, detect_color_profile());
        let now = Instant::now();
        Ok(Self {
            controller,
            events,
            renderer,
            queue: EventQueue::new(config.queue_capacity.max(1)),
            config,
            running: false,
            root: None,
            start: now,
            last_tick: now,
            tick_number: 0,
        })
    }

    /// Record the widget tree root. Borrowed, not owned: the caller keeps
    /// it alive for the duration of [`App::run`].
    pub fn set_root(&mut self, widget: &'a mut dyn Widget) {
        self.root = Some(widget);
    }

    /// Signal the loop to stop. Level-triggered: observed at the next
    /// top-of-loop check, never interrupts in-flight dispatch.
    pub fn request_quit(&mut self) {
        self.running = false;
    }

    /// Tear down the terminal controller. Idempotent.
    pub fn deinit(&mut self) {
        self.controller.teardown();
    }

    fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.config.target_fps.max(1)))
    }

    /// Run the loop until [`App::request_quit`] is called or the root
    /// returns [`EventResult::Quit`].
    pub fn run(&mut self) -> io::Result<()> {
        self.running = true;
        while self.running {
            self.step()?;
        }
        Ok(())
    }

    /// Run exactly one frame. Public so tests can drive the loop
    /// deterministically instead of through `run`'s `while running` spin.
    pub fn step(&mut self) -> io::Result<usize> {
        if !self.running {
            return Ok(0);
        }
        #[cfg(feature = "tracing")]
        tracing::trace!(tick = self.tick_number, "frame start");
        let frame_start = Instant::now();
        let interval = self.frame_interval();
        let deadline = frame_start + interval;

        self.drain_input(deadline)?;

        let mut needs_redraw = false;
        let mut resized = false;
        while let Some(event) = self.queue.pop() {
            if let Event::Resize { cols, rows } = event {
                self.renderer.resize(cols, rows);
                resized = true;
            }
            if self.dispatch(&event) {
                needs_redraw = true;
            }
        }

        if self.config.enable_ticks {
            let now = Instant::now();
            let delta = now.duration_since(self.last_tick);
            let elapsed = now.duration_since(self.start);
            self.tick_number += 1;
            let tick = Event::Tick(TickEvent {
                number: self.tick_number,
                delta_ns: delta.as_nanos() as u64,
                elapsed_ns: elapsed.as_nanos() as u64,
            });
            self.last_tick = now;
            if self.dispatch(&tick) {
                needs_redraw = true;
            }
        }

        let bytes_written = if needs_redraw || resized {
            self.render_and_flush()?
        } else {
            0
        };

        let elapsed = frame_start.elapsed();
        #[cfg(feature = "tracing")]
        tracing::debug!(bytes_written, redrawn = needs_redraw || resized, "frame end");
        if elapsed < interval {
            std::thread::sleep(interval - elapsed);
        }
        Ok(bytes_written)
    }

    /// Dispatch one event to the root, returning whether it requested a
    /// redraw. A `quit` result stops the loop at the next top-of-loop
    /// check.
    fn dispatch(&mut self, event: &Event) -> bool {
        let Some(root) = self.root.as_deref_mut() else { return false };
        match root.handle_event(event) {
            EventResult::Quit => {
                self.running = false;
                false
            }
            EventResult::NeedsRedraw => true,
            EventResult::Consumed | EventResult::Ignored | EventResult::Propagate => false,
        }
    }

    fn drain_input(&mut self, deadline: Instant) -> io::Result<()> {
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        if self.events.poll_event(deadline - now)? {
            while let Some(event) = self.events.read_event()? {
                self.queue.push(event);
            }
        }
        Ok(())
    }

    fn render_and_flush(&mut self) -> io::Result<usize> {
        self.renderer.begin_frame();
        if let Some(root) = self.root.as_deref_mut() {
            let (width, height) = {
                let screen = self.renderer.back();
                (screen.width(), screen.height())
            };
            let mut ctx = RenderContext::new(self.renderer.back(), Rect::new(0, 0, width, height));
            root.render(&mut ctx);
        }
        self.renderer.flush(self.controller.output_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loomterm_core::event::Key;

    struct EchoWidget {
        quit_on: Option<char>,
        renders: u32,
    }

    impl Widget for EchoWidget {
        fn render(&mut self, ctx: &mut RenderContext<'_>) {
            self.renders += 1;
            ctx.put_str(0, 0, "hi");
        }

        fn handle_event(&mut self, event: &Event) -> EventResult {
            match event {
                Event::Key(k) if Some(k.key) == self.quit_on.map(Key::Char) => EventResult::Quit,
                Event::Key(_) => EventResult::NeedsRedraw,
                _ => EventResult::Ignored,
            }
        }
    }

    #[test]
    fn step_with_no_events_renders_nothing() {
        let events = TtyEventSource::new(4, 2);
        let mut app =
            App::init(Vec::new(), TerminalConfig::default(), events, AppConfig {
                target_fps: 1000,
                enable_ticks: false,
                queue_capacity: 8,
            })
            .unwrap();
        app.running = true;
        let written = app.step().unwrap();
        assert_eq!(written, 0);
    }

    #[test]
    fn quit_event_stops_the_loop() {
        let events = TtyEventSource::new(4, 2);
        let mut app =
            App::init(Vec::new(), TerminalConfig::default(), events, AppConfig {
                target_fps: 1000,
                enable_ticks: false,
                queue_capacity: 8,
            })
            .unwrap();
        let mut widget = EchoWidget { quit_on: Some('q'), renders: 0 };
        app.set_root(&mut widget);
        app.running = true;
        app.queue.push(Event::key(Key::Char('q')));
        app.step().unwrap();
        assert!(!app.running);
    }

    #[test]
    fn resize_event_always_reallocates_renderer_even_without_redraw_result() {
        let events = TtyEventSource::new(4, 2);
        let mut app =
            App::init(Vec::new(), TerminalConfig::default(), events, AppConfig {
                target_fps: 1000,
                enable_ticks: false,
                queue_capacity: 8,
            })
            .unwrap();
        app.running = true;
        app.queue.push(Event::Resize { cols: 10, rows: 5 });
        app.step().unwrap();
        assert_eq!(app.renderer.back().width(), 10);
        assert_eq!(app.renderer.back().height(), 5);
    }
}
