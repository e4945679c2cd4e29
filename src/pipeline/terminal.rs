//! Terminal driver - viewport detection and the frame loop.
//!
//! Crossterm supplies the terminal size and resize events. Each [`tick`]
//! polls input for at most one frame interval, feeds resizes into the stage
//! and then runs one frame boundary.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::{info, warn};

use crate::types::Viewport;

use super::mount::Stage;

/// Viewport used when the terminal cannot be queried.
pub const FALLBACK_VIEWPORT: (u16, u16) = (80, 24);

// =============================================================================
// Viewport Detection
// =============================================================================

/// Current terminal size in cells, or [`FALLBACK_VIEWPORT`].
pub fn detect_viewport() -> Viewport {
    match crossterm::terminal::size() {
        Ok(size) => Viewport::from(size),
        Err(err) => {
            warn!(%err, "terminal size unavailable; using fallback");
            Viewport::from(FALLBACK_VIEWPORT)
        }
    }
}

/// The new viewport carried by a resize event.
pub fn viewport_from_event(event: &Event) -> Option<Viewport> {
    match event {
        Event::Resize(width, height) => Some(Viewport::from((*width, *height))),
        _ => None,
    }
}

/// Ctrl+C.
pub fn is_quit(event: &Event) -> bool {
    matches!(
        event,
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL)
    )
}

// =============================================================================
// Event Loop
// =============================================================================

/// Run the loop once.
///
/// Polls events for up to one frame interval, then runs a frame with the
/// elapsed time.
///
/// # Returns
///
/// * `Ok(true)` - Continue running
/// * `Ok(false)` - Ctrl+C pressed
/// * `Err(e)` - I/O error while polling
pub fn tick(stage: &Stage) -> io::Result<bool> {
    let started = Instant::now();
    let interval = stage.config().frame_interval;

    loop {
        let remaining = interval.saturating_sub(started.elapsed());
        if remaining.is_zero() || !event::poll(remaining)? {
            break;
        }
        let event = event::read()?;
        if is_quit(&event) {
            info!("quit requested");
            return Ok(false);
        }
        if let Some(viewport) = viewport_from_event(&event) {
            stage.resize(viewport);
        }
    }

    stage.frame(started.elapsed().max(Duration::from_millis(1)));
    Ok(true)
}

/// Run the loop until Ctrl+C.
pub fn run(stage: &Stage) -> io::Result<()> {
    while tick(stage)? {}
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resize_event_maps_to_viewport() {
        let event = Event::Resize(120, 40);
        assert_eq!(viewport_from_event(&event), Some(Viewport::new(120.0, 40.0)));
        assert_eq!(viewport_from_event(&Event::FocusGained), None);
    }

    #[test]
    fn test_ctrl_c_quits() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let plain_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE));

        assert!(is_quit(&ctrl_c));
        assert!(!is_quit(&plain_c));
        assert!(!is_quit(&Event::Resize(1, 1)));
    }

    #[test]
    fn test_detect_viewport_never_negative() {
        let viewport = detect_viewport();
        assert!(viewport.width >= 0.0);
        assert!(viewport.height >= 0.0);
    }
}
