//! Event sinks.

use crate::Event;

/// Receives parser events as they are produced.
pub trait ParseCallback {
    /// Handle one event. Return `false` to stop parsing; the parser then
    /// unwinds every enclosing include and returns
    /// [`Completion::Stopped`](crate::Completion::Stopped).
    fn event(&mut self, event: Event) -> bool;
}

impl ParseCallback for Vec<Event> {
    fn event(&mut self, event: Event) -> bool {
        self.push(event);
        true
    }
}

impl<C: ParseCallback + ?Sized> ParseCallback for &mut C {
    fn event(&mut self, event: Event) -> bool {
        (**self).event(event)
    }
}
