mod bus;
mod events;

pub use bus::EventBus;
pub use events::SurfaceEvent;

pub trait EventHandler: Send {
    fn handle_event(&mut self, event: &SurfaceEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(&SurfaceEvent) + Send,
{
    fn handle_event(&mut self, event: &SurfaceEvent) {
        self(event)
    }
}
