//! Local input delivered to a running client.

use tokio::sync::mpsc;

/// Something the local user did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// The pointer moved to page coordinates.
    PointerMoved { page_x: f64, page_y: f64 },
    /// Primary click on the board: reveal.
    Click { page_x: f64, page_y: f64 },
    /// Secondary click on the board: flag.
    ContextClick { page_x: f64, page_y: f64 },
    /// The status line was clicked.
    ResetClicked,
    /// The viewport changed size.
    Resized,
}

/// Cloneable sender of [`InputEvent`]s into a [`Client`](crate::Client).
///
/// Every method returns `false` once the client has stopped.
#[derive(Debug, Clone)]
pub struct InputHandle {
    tx: mpsc::UnboundedSender<InputEvent>,
}

impl InputHandle {
    pub(crate) fn channel() -> (Self, mpsc::UnboundedReceiver<InputEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn pointer_moved(&self, page_x: f64, page_y: f64) -> bool {
        self.send(InputEvent::PointerMoved { page_x, page_y })
    }

    pub fn click(&self, page_x: f64, page_y: f64) -> bool {
        self.send(InputEvent::Click { page_x, page_y })
    }

    pub fn context_click(&self, page_x: f64, page_y: f64) -> bool {
        self.send(InputEvent::ContextClick { page_x, page_y })
    }

    pub fn reset_clicked(&self) -> bool {
        self.send(InputEvent::ResetClicked)
    }

    pub fn resized(&self) -> bool {
        self.send(InputEvent::Resized)
    }

    /// Sends a raw event.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_events_arrive_in_order() {
        let (handle, mut rx) = InputHandle::channel();
        assert!(handle.pointer_moved(1.0, 2.0));
        assert!(handle.clone().context_click(3.0, 4.0));
        assert!(handle.reset_clicked());

        assert_eq!(rx.try_recv().unwrap(), InputEvent::PointerMoved { page_x: 1.0, page_y: 2.0 });
        assert_eq!(rx.try_recv().unwrap(), InputEvent::ContextClick { page_x: 3.0, page_y: 4.0 });
        assert_eq!(rx.try_recv().unwrap(), InputEvent::ResetClicked);
    }

    #[test]
    fn test_send_fails_after_client_is_gone() {
        let (handle, rx) = InputHandle::channel();
        drop(rx);
        assert!(!handle.click(0.0, 0.0));
    }
}
