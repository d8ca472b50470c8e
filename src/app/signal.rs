use tokio::sync::watch;

/// Observable value shared with presentation code.
///
/// Reads go through [`Signal::get`]; interested parties call
/// [`Signal::subscribe`] and await `changed()` on the receiver.
#[derive(Debug)]
pub struct Signal<T> {
    tx: watch::Sender<T>,
}

impl<T: Clone> Signal<T> {
    pub fn new(initial: T) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }

    pub fn set(&self, value: T) {
        self.tx.send_replace(value);
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }
}

impl<T: Clone + Default> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl Signal<bool> {
    /// Raise the flag until the returned guard is dropped, including when
    /// the surrounding future is cancelled.
    pub fn raise(&self) -> FlagGuard<'_> {
        self.set(true);
        FlagGuard { signal: self }
    }
}

pub struct FlagGuard<'a> {
    signal: &'a Signal<bool>,
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.signal.set(false);
    }
}
