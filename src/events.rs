use async_channel::{Sender, TrySendError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmenuEvent {
    Expanded,
    Collapsed,
}

/// Observer of submenu expand/collapse transitions.
pub trait SubmenuListener {
    fn on_menu_expanded(&mut self);
    fn on_menu_collapsed(&mut self);
}

/// Listener built from a pair of closures.
pub struct FnListener<E, C> {
    on_expanded: E,
    on_collapsed: C,
}

impl<E, C> FnListener<E, C>
where
    E: FnMut(),
    C: FnMut(),
{
    pub fn new(on_expanded: E, on_collapsed: C) -> Self {
        Self {
            on_expanded,
            on_collapsed,
        }
    }
}

impl<E, C> SubmenuListener for FnListener<E, C>
where
    E: FnMut(),
    C: FnMut(),
{
    fn on_menu_expanded(&mut self) {
        (self.on_expanded)()
    }

    fn on_menu_collapsed(&mut self) {
        (self.on_collapsed)()
    }
}

/// Forwards transitions to a channel. Never blocks the UI thread: a full or
/// closed channel drops the event.
impl SubmenuListener for Sender<SubmenuEvent> {
    fn on_menu_expanded(&mut self) {
        forward(self, SubmenuEvent::Expanded);
    }

    fn on_menu_collapsed(&mut self) {
        forward(self, SubmenuEvent::Collapsed);
    }
}

fn forward(tx: &Sender<SubmenuEvent>, event: SubmenuEvent) {
    match tx.try_send(event) {
        Ok(()) => {}
        Err(TrySendError::Full(e)) => log::warn!("Submenu event channel full, dropping {:?}", e),
        Err(TrySendError::Closed(e)) => log::debug!("Submenu event channel closed, dropping {:?}", e),
    }
}
