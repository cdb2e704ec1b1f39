//! Commander order queue.

use std::collections::VecDeque;

use skirmish_core::{Order, OrderKind};

/// FIFO queue of pending orders where heals jump the line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct OrderQueue {
    pending: VecDeque<Order>,
}

impl OrderQueue {
    /// Queues `order`; heal orders go to the front.
    pub(crate) fn push(&mut self, order: Order) {
        if order.kind() == OrderKind::Heal {
            self.pending.push_front(order);
        } else {
            self.pending.push_back(order);
        }
    }

    /// Removes the first heal anywhere in the queue, else the front order.
    pub(crate) fn take_next(&mut self) -> Option<Order> {
        match self
            .pending
            .iter()
            .position(|order| order.kind() == OrderKind::Heal)
        {
            Some(index) => self.pending.remove(index),
            None => self.pending.pop_front(),
        }
    }

    pub(crate) fn has_pending(&self, kind: OrderKind) -> bool {
        self.pending.iter().any(|order| order.kind() == kind)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Order> {
        self.pending.iter()
    }
}
