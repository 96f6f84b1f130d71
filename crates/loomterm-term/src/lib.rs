#![forbid(unsafe_code)]
//! Native Unix terminal platform adapter.
//!
//! Owns raw mode, feature negotiation (alt screen, mouse, bracketed paste,
//! focus reporting), and the byte-level event source that feeds
//! [`loomterm_core::input_parser::InputParser`].
//!
//! | feature           | enable                    | disable                   |
//! |-------------------|---------------------------|---------------------------|
//! | alternate screen  | `CSI ? 1049 h`            | `CSI ? 1049 l`            |
//! | mouse (SGR)       | `CSI ? 1000;1002;1003;1006 h` | `CSI ? 1000;1002;1003;1006 l` |
//! | bracketed paste   | `CSI ? 2004 h`            | `CSI ? 2004 l`            |
//! | focus events      | `CSI ? 1004 h`            | `CSI ? 1004 l`            |
//! | cursor show/hide  | `CSI ? 25 h`              | `CSI ? 25 l`              |

use std::collections::VecDeque;
use std::io::{self, Read, Write};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use loomterm_core::event::Event;
use loomterm_core::input_parser::InputParser;
use loomterm_render::ansi;

#[cfg(unix)]
use signal_hook::consts::signal::SIGWINCH;
#[cfg(unix)]
use signal_hook::iterator::Signals;

// ── Raw mode guard ───────────────────────────────────────────────────────

/// RAII guard that saves the original termios and restores it on drop.
///
/// Cleanup must run even on panic, so restoration lives in `Drop` rather
/// than an explicit call the caller could skip.
#[cfg(unix)]
pub struct RawModeGuard {
    original_termios: nix::sys::termios::Termios,
    tty: std::fs::File,
}

#[cfg(unix)]
impl RawModeGuard {
    pub fn enter() -> io::Result<Self> {
        let tty = std::fs::File::open("/dev/tty")?;
        let original_termios = nix::sys::termios::tcgetattr(&tty).map_err(io::Error::other)?;
        let mut raw = original_termios.clone();
        nix::sys::termios::cfmakeraw(&mut raw);
        nix::sys::termios::tcsetattr(&tty, nix::sys::termios::SetArg::TCSAFLUSH, &raw)
            .map_err(io::Error::other)?;
        Ok(Self { original_termios, tty })
    }
}

#[cfg(unix)]
impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = nix::sys::termios::tcsetattr(
            &self.tty,
            nix::sys::termios::SetArg::TCSAFLUSH,
            &self.original_termios,
        );
    }
}

// ── Terminal controller ──────────────────────────────────────────────────

/// Which escape-sequence features to negotiate on setup/teardown.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfig {
    pub alternate_screen: bool,
    pub hide_cursor: bool,
    pub enable_mouse: bool,
    pub enable_paste: bool,
    pub enable_focus: bool,
}

/// Owns the output handle and the setup/teardown lifecycle for a terminal
/// session.
///
/// Setup order: raw mode, then alt-screen/hide-cursor/mouse/paste/focus (each
/// conditioned on its config flag), then clear-screen and home. Teardown
/// reverses that order (focus, paste, mouse, cursor, SGR reset, leave
/// alt-screen) and only then restores raw mode, so the terminal still
/// receives the disable sequences while still attached to the pty.
///
/// Teardown is idempotent and suppresses write errors: it must fully run
/// even when the terminal has gone away mid-session.
pub struct TerminalController<W: Write> {
    out: W,
    config: TerminalConfig,
    setup_done: bool,
    #[cfg(unix)]
    raw_mode: Option<RawModeGuard>,
}

impl<W: Write> TerminalController<W> {
    #[must_use]
    pub fn new(out: W, config: TerminalConfig) -> Self {
        Self {
            out,
            config,
            setup_done: false,
            #[cfg(unix)]
            raw_mode: None,
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.setup_done
    }

    /// Direct access to the output handle, for the frame loop's flush
    /// write. The controller itself only ever writes setup/teardown
    /// escape sequences to it.
    pub fn output_mut(&mut self) -> &mut W {
        &mut self.out
    }

    fn write_setup_sequence(&mut self) -> io::Result<()> {
        if self.config.alternate_screen {
            self.out.write_all(ansi::ALT_SCREEN_ENTER)?;
            #[cfg(feature = "tracing")]
            tracing::info!("alternate screen enabled");
        }
        if self.config.hide_cursor {
            self.out.write_all(ansi::CURSOR_HIDE)?;
            #[cfg(feature = "tracing")]
            tracing::info!("cursor hidden");
        }
        if self.config.enable_mouse {
            self.out.write_all(ansi::MOUSE_ENABLE)?;
            #[cfg(feature = "tracing")]
            tracing::info!("mouse capture enabled");
        }
        if self.config.enable_paste {
            self.out.write_all(ansi::BRACKETED_PASTE_ENABLE)?;
            #[cfg(feature = "tracing")]
            tracing::info!("bracketed paste enabled");
        }
        if self.config.enable_focus {
            self.out.write_all(ansi::FOCUS_ENABLE)?;
            #[cfg(feature = "tracing")]
            tracing::info!("focus events enabled");
        }
        self.out.write_all(ansi::CLEAR_SCREEN)?;
        self.out.write_all(ansi::CURSOR_HOME)?;
        self.out.flush()
    }

    fn write_teardown_sequence(&mut self) {
        if self.config.enable_focus {
            let _ = self.out.write_all(ansi::FOCUS_DISABLE);
            #[cfg(feature = "tracing")]
            tracing::info!("focus events disabled");
        }
        if self.config.enable_paste {
            let _ = self.out.write_all(ansi::BRACKETED_PASTE_DISABLE);
            #[cfg(feature = "tracing")]
            tracing::info!("bracketed paste disabled");
        }
        if self.config.enable_mouse {
            let _ = self.out.write_all(ansi::MOUSE_DISABLE);
            #[cfg(feature = "tracing")]
            tracing::info!("mouse capture disabled");
        }
        if self.config.hide_cursor {
            let _ = self.out.write_all(ansi::CURSOR_SHOW);
            #[cfg(feature = "tracing")]
            tracing::info!("cursor shown");
        }
        let _ = self.out.write_all(ansi::SGR_RESET);
        if self.config.alternate_screen {
            let _ = self.out.write_all(ansi::ALT_SCREEN_LEAVE);
            #[cfg(feature = "tracing")]
            tracing::info!("alternate screen disabled");
        }
        let _ = self.out.flush();
    }

    /// Enter raw mode and negotiate features. On failure, best-effort
    /// teardown runs for whatever was partially enabled before the error
    /// propagates.
    #[cfg(unix)]
    pub fn setup(&mut self) -> io::Result<()> {
        if self.setup_done {
            return Ok(());
        }
        let raw = RawModeGuard::enter()?;
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode enabled");
        if let Err(err) = self.write_setup_sequence() {
            self.write_teardown_sequence();
            return Err(err);
        }
        self.raw_mode = Some(raw);
        self.setup_done = true;
        Ok(())
    }

    /// Reverse whatever setup enabled, then restore raw mode. Safe to call
    /// more than once; the second call is a no-op.
    pub fn teardown(&mut self) {
        if !self.setup_done {
            return;
        }
        self.write_teardown_sequence();
        #[cfg(unix)]
        {
            self.raw_mode = None;
        }
        self.setup_done = false;
        #[cfg(feature = "tracing")]
        tracing::info!("terminal raw mode disabled");
    }
}

impl<W: Write> Drop for TerminalController<W> {
    fn drop(&mut self) {
        self.teardown();
    }
}

// ── Resize signal ────────────────────────────────────────────────────────

#[cfg(unix)]
struct ResizeSignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl ResizeSignalGuard {
    fn new(tx: mpsc::SyncSender<()>) -> io::Result<Self> {
        let mut signals = Signals::new([SIGWINCH]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for _ in signals.forever() {
                let _ = tx.try_send(());
            }
        });
        Ok(Self { handle, thread: Some(thread) })
    }
}

#[cfg(unix)]
impl Drop for ResizeSignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

// ── Event source ─────────────────────────────────────────────────────────

/// Reads raw bytes from the controlling tty (or an arbitrary reader in
/// tests), feeding them through [`InputParser`] to produce [`Event`]s.
pub struct TtyEventSource {
    width: u16,
    height: u16,
    #[cfg(unix)]
    resize_rx: Option<mpsc::Receiver<()>>,
    #[cfg(unix)]
    _resize_guard: Option<ResizeSignalGuard>,
    parser: InputParser,
    queue: VecDeque<Event>,
    reader: Option<std::fs::File>,
}

impl TtyEventSource {
    /// Headless source: no I/O, useful for tests and for apps with no
    /// controlling terminal.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            #[cfg(unix)]
            resize_rx: None,
            #[cfg(unix)]
            _resize_guard: None,
            parser: InputParser::new(),
            queue: VecDeque::new(),
            reader: None,
        }
    }

    /// Open `/dev/tty` and install a SIGWINCH handler that forwards resize
    /// notifications into the event queue.
    #[cfg(unix)]
    pub fn live(width: u16, height: u16) -> io::Result<Self> {
        let reader = std::fs::File::open("/dev/tty")?;
        let mut w = width;
        let mut h = height;
        if let Ok(ws) = rustix::termios::tcgetwinsize(&reader) {
            if ws.ws_col > 0 && ws.ws_row > 0 {
                w = ws.ws_col;
                h = ws.ws_row;
            }
        }
        let (resize_guard, resize_rx) = {
            let (tx, rx) = mpsc::sync_channel(1);
            match ResizeSignalGuard::new(tx) {
                Ok(guard) => (Some(guard), Some(rx)),
                Err(_) => (None, None),
            }
        };
        Ok(Self {
            width: w,
            height: h,
            resize_rx,
            _resize_guard: resize_guard,
            parser: InputParser::new(),
            queue: VecDeque::new(),
            reader: Some(reader),
        })
    }

    /// Build a source reading from an arbitrary file (e.g. a pipe), for
    /// tests that want to drive the parser without a real tty.
    #[cfg(test)]
    fn from_reader(width: u16, height: u16, reader: std::fs::File) -> Self {
        Self {
            width,
            height,
            #[cfg(unix)]
            resize_rx: None,
            #[cfg(unix)]
            _resize_guard: None,
            parser: InputParser::new(),
            queue: VecDeque::new(),
            reader: Some(reader),
        }
    }

    #[must_use]
    pub const fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn drain_resize_notifications(&mut self) {
        #[cfg(unix)]
        {
            let Some(rx) = self.resize_rx.as_ref() else { return };
            let mut resized = false;
            while rx.try_recv().is_ok() {
                resized = true;
            }
            if !resized {
                return;
            }
            let Some(reader) = self.reader.as_ref() else { return };
            if let Ok(ws) = rustix::termios::tcgetwinsize(reader) {
                if ws.ws_col > 0 && ws.ws_row > 0 && (ws.ws_col, ws.ws_row) != (self.width, self.height)
                {
                    self.width = ws.ws_col;
                    self.height = ws.ws_row;
                    #[cfg(feature = "tracing")]
                    tracing::debug!(cols = self.width, rows = self.height, "resize detected");
                    self.queue.push_back(Event::Resize { cols: self.width, rows: self.height });
                }
            }
        }
    }

    fn drain_available_bytes(&mut self) -> io::Result<()> {
        let Some(reader) = self.reader.as_mut() else { return Ok(()) };
        let mut buf = [0u8; 1024];
        match reader.read(&mut buf) {
            Ok(0) => Ok(()),
            Ok(n) => {
                let events = self.parser.parse(&buf[..n], Instant::now());
                self.queue.extend(events);
                Ok(())
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => Ok(()),
            Err(e) => Err(e),
        }
    }

    #[cfg(unix)]
    fn poll_tty(&mut self, timeout: Duration) -> io::Result<bool> {
        use std::os::fd::AsFd;
        self.drain_resize_notifications();
        let ready = {
            let Some(reader) = self.reader.as_ref() else { return Ok(false) };
            let mut poll_fds = [nix::poll::PollFd::new(reader.as_fd(), nix::poll::PollFlags::POLLIN)];
            let timeout_ms: u16 = timeout.as_millis().try_into().unwrap_or(u16::MAX);
            match nix::poll::poll(&mut poll_fds, nix::poll::PollTimeout::from(timeout_ms)) {
                Ok(n) => n,
                Err(nix::errno::Errno::EINTR) => 0,
                Err(e) => return Err(io::Error::other(e)),
            }
        };
        if ready > 0 {
            self.drain_available_bytes()?;
        }
        if let Some(event) = self.parser.poll_timeout(Instant::now()) {
            self.queue.push_back(event);
        }
        Ok(!self.queue.is_empty())
    }

    #[cfg(not(unix))]
    fn poll_tty(&mut self, _timeout: Duration) -> io::Result<bool> {
        Ok(false)
    }

    /// Block up to `timeout` for the next event to become available.
    pub fn poll_event(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.queue.is_empty() {
            return Ok(true);
        }
        self.poll_tty(timeout)
    }

    /// Pop the next buffered event, if any.
    pub fn read_event(&mut self) -> io::Result<Option<Event>> {
        Ok(self.queue.pop_front())
    }
}
