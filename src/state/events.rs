//! Typed state notifications
//!
//! A small publish/subscribe bus with named channels. Any number of
//! subscribers can listen on a channel; delivery is synchronous and in
//! subscription order. The bus is single-threaded, like the rest of the
//! state layer.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::models::{Category, Expense, MonthKey};
use crate::stats::MonthlyStats;

/// Named notification channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    ExpenseUpdate,
    BudgetUpdate,
    MonthChange,
    StateChange,
}

/// Complete view of the coordinator state at one point in time
#[derive(Debug, Clone)]
pub struct StateSnapshot {
    /// Selected month
    pub month: MonthKey,
    /// Every stored expense
    pub expenses: Vec<Expense>,
    /// Expenses falling in the selected month
    pub monthly_expenses: Vec<Expense>,
    /// Budgets for the selected month, every category present
    pub budgets: BTreeMap<Category, f64>,
    /// Stats derived for the selected month
    pub stats: MonthlyStats,
}

/// Payload delivered to subscribers
#[derive(Debug, Clone)]
pub enum StateEvent {
    ExpenseUpdate {
        expenses: Vec<Expense>,
        monthly_expenses: Vec<Expense>,
    },
    BudgetUpdate {
        budgets: BTreeMap<Category, f64>,
        month: MonthKey,
    },
    MonthChange {
        month: MonthKey,
    },
    StateChange(StateSnapshot),
}

impl StateEvent {
    /// The channel this event is delivered on
    pub fn channel(&self) -> Channel {
        match self {
            StateEvent::ExpenseUpdate { .. } => Channel::ExpenseUpdate,
            StateEvent::BudgetUpdate { .. } => Channel::BudgetUpdate,
            StateEvent::MonthChange { .. } => Channel::MonthChange,
            StateEvent::StateChange(_) => Channel::StateChange,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&StateEvent)>;

/// Multi-subscriber event dispatch
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: HashMap<Channel, Vec<(SubscriptionId, Callback)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback on a channel
    pub fn subscribe<F>(&mut self, channel: Channel, callback: F) -> SubscriptionId
    where
        F: FnMut(&StateEvent) + 'static,
    {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers
            .entry(channel)
            .or_default()
            .push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription. Returns false if the id is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for subs in self.subscribers.values_mut() {
            if let Some(pos) = subs.iter().position(|(sub_id, _)| *sub_id == id) {
                subs.remove(pos);
                return true;
            }
        }
        false
    }

    /// Deliver an event to every subscriber on its channel, in
    /// subscription order
    pub fn emit(&mut self, event: &StateEvent) {
        if let Some(subs) = self.subscribers.get_mut(&event.channel()) {
            for (_, callback) in subs.iter_mut() {
                callback(event);
            }
        }
    }

    pub fn subscriber_count(&self, channel: Channel) -> usize {
        self.subscribers.get(&channel).map_or(0, Vec::len)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self
            .subscribers
            .iter()
            .map(|(channel, subs)| (channel, subs.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("subscribers", &counts)
            .finish()
    }
}
