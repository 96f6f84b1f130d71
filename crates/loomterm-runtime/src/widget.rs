#![forbid(unsafe_code)]

//! The application-facing widget contract: `render` and `handle_event`.

use loomterm_core::event::Event;

use crate::render_context::RenderContext;

/// What happened when a widget was given a chance to handle an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventResult {
    /// The widget had no interest in this event.
    Ignored,
    /// The widget handled it; no further action needed.
    Consumed,
    /// The widget handled it and the screen must be redrawn this frame.
    NeedsRedraw,
    /// The widget did not fully handle it; a parent may still act on it.
    Propagate,
    /// The application should exit at the next top-of-loop check.
    Quit,
}

/// Anything the app loop can render and dispatch events to.
///
/// Structural dispatch (two methods on a trait object) rather than a tagged
/// enum of built-in kinds: the loop only ever calls these two operations on
/// the root.
pub trait Widget {
    /// Draw into `ctx`, a sub-screen bounded to this widget's rectangle.
    fn render(&mut self, ctx: &mut RenderContext<'_>);

    /// React to one event. Returning [`EventResult::Quit`] stops the loop
    /// at the next top-of-loop check.
    fn handle_event(&mut self, event: &Event) -> EventResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use loomterm_core::event::Key;

    struct Counter {
        hits: u32,
    }

    impl Widget for Counter {
        fn render(&mut self, ctx: &mut RenderContext<'_>) {
            ctx.put_str(0, 0, "x");
        }

        fn handle_event(&mut self, event: &Event) -> EventResult {
            match event {
                Event::Key(k) if k.key == Key::Char('q') => EventResult::Quit,
                Event::Key(_) => {
                    self.hits += 1;
                    EventResult::NeedsRedraw
                }
                _ => EventResult::Ignored,
            }
        }
    }

    #[test]
    fn widget_dispatch_updates_state_and_returns_result() {
        let mut w = Counter { hits: 0 };
        let result = w.handle_event(&Event::key(Key::Char('a')));
        assert_eq!(result, EventResult::NeedsRedraw);
        assert_eq!(w.hits, 1);
    }

    #[test]
    fn widget_quit_event_returns_quit() {
        let mut w = Counter { hits: 0 };
        assert_eq!(w.handle_event(&Event::key(Key::Char('q'))), EventResult::Quit);
    }
}
