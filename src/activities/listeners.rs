//! Observer list with stable unsubscribe tokens.
//!
//! Both controllers notify subscribers synchronously, in subscription order.
//! Each `subscribe` call is its own registration; removal is by token.

/// Token returned by `subscribe`. Never reused within one list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub struct Listeners<F: ?Sized> {
    next_id: u64,
    entries: Vec<(ListenerId, Box<F>)>,
}

impl<F: ?Sized> Default for Listeners<F> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<F: ?Sized> Listeners<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Box<F>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Remove a registration. Returns `false` if the token was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    /// Call `f` on every listener, oldest registration first.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(&mut F)) {
        for (_, listener) in self.entries.iter_mut() {
            f(listener.as_mut());
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
