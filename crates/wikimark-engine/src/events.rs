//! A small observer capability embedded by value in components that
//! announce what they did.

/// Handle returned by [`Emitter::on`], used to remove the listener again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener<E> = Box<dyn Fn(&E) + Send + Sync>;

pub struct Emitter<E> {
    listeners: Vec<(ListenerId, Listener<E>)>,
    next_id: u64,
}

impl<E> Default for Emitter<E> {
    fn default() -> Self {
        Self {
            listeners: vec![],
            next_id: 0,
        }
    }
}

impl<E> std::fmt::Debug for Emitter<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<E> Emitter<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, listener: impl Fn(&E) + Send + Sync + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns false if it was already gone.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    /// Calls every listener in registration order.
    pub fn emit(&self, event: &E) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
