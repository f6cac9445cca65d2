//! Market orders emitted by the signal engine.

use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    Buy,
    Sell,
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderAction::Buy => write!(f, "buy"),
            OrderAction::Sell => write!(f, "sell"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub action: OrderAction,
    pub size: u64,
    pub bar_date: NaiveDate,
}

impl Order {
    pub fn buy(size: u64, bar_date: NaiveDate) -> Self {
        Self {
            action: OrderAction::Buy,
            size,
            bar_date,
        }
    }

    pub fn sell(size: u64, bar_date: NaiveDate) -> Self {
        Self {
            action: OrderAction::Sell,
            size,
            bar_date,
        }
    }
}
