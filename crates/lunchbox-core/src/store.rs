//! The document store: holds the current state and notifies observers.

use std::fmt;

use crate::action::Action;
use crate::model::AppState;
use crate::reducer::Reducer;

/// Handle returned by [`Store::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Observer = Box<dyn FnMut(&AppState)>;

/// Holds the current [`AppState`] and applies actions through a [`Reducer`].
///
/// Observers are called synchronously after each dispatch that changes the
/// state, in subscription order.
pub struct Store {
    state: AppState,
    reducer: Reducer,
    observers: Vec<(Subscription, Observer)>,
    next_subscription: u64,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::new(), Reducer::default())
    }
}

impl Store {
    /// Create a store with an initial state.
    pub fn new(state: AppState, reducer: Reducer) -> Self {
        Self {
            state,
            reducer,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn current_state(&self) -> &AppState {
        &self.state
    }

    pub fn reducer(&self) -> &Reducer {
        &self.reducer
    }

    /// Apply an action. Returns whether the state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        log::debug!("dispatch {}", action.name());
        let next = self.reducer.reduce(&self.state, &action);
        if next == self.state {
            return false;
        }
        self.state = next;
        log::trace!("state after {}:\n{}", action.name(), self.state.describe());
        for (_, observer) in &mut self.observers {
            observer(&self.state);
        }
        true
    }

    /// Register an observer for state changes.
    pub fn subscribe(&mut self, observer: impl FnMut(&AppState) + 'static) -> Subscription {
        let subscription = Subscription(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((subscription, Box::new(observer)));
        subscription
    }

    /// Remove an observer. Returns false if it was not subscribed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(s, _)| *s != subscription);
        self.observers.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockType;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_dispatch_updates_state() {
        let mut store = Store::default();
        assert!(store.dispatch(Action::add_block(BlockType::Label, None, None)));
        assert_eq!(store.current_state().selected_page().unwrap().groups().len(), 1);
    }

    #[test]
    fn test_observers_notified_on_change() {
        let mut store = Store::default();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |state: &AppState| {
            let count = state.selected_page().map_or(0, |p| p.groups().len());
            sink.borrow_mut().push(count);
        });

        store.dispatch(Action::add_block(BlockType::Label, None, None));
        store.dispatch(Action::add_block(BlockType::Label, None, None));
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_noop_dispatch_does_not_notify() {
        let mut store = Store::default();
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        store.subscribe(move |_: &AppState| *counter.borrow_mut() += 1);

        assert!(!store.dispatch(Action::DeleteAllGroups));
        assert!(!store.dispatch(Action::SelectGroup { group: None }));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = Store::default();
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let subscription = store.subscribe(move |_: &AppState| *counter.borrow_mut() += 1);

        store.dispatch(Action::add_block(BlockType::Label, None, None));
        assert!(store.unsubscribe(subscription));
        assert!(!store.unsubscribe(subscription));
        store.dispatch(Action::add_block(BlockType::Label, None, None));
        assert_eq!(*calls.borrow(), 1);
    }
}
