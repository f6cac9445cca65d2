//! Paper-trading order sink.
//!
//! Fills every market order immediately at the close of the most recently
//! marked bar, charging a proportional commission on the traded value.
//! Buys need enough cash for cost plus commission; sells cannot exceed the
//! shares held.

use chrono::NaiveDate;

use crate::domain::bar::Bar;
use crate::domain::error::OrderError;
use crate::domain::order::{Order, OrderAction};
use crate::ports::order_port::OrderSink;

pub const DEFAULT_INITIAL_CAPITAL: f64 = 100_000.0;
pub const DEFAULT_COMMISSION_RATE: f64 = 0.0002;

#[derive(Debug, Clone, PartialEq)]
pub struct Fill {
    pub date: NaiveDate,
    pub action: OrderAction,
    pub size: u64,
    pub price: f64,
    pub commission: f64,
    /// Cash after the fill.
    pub cash: f64,
}

#[derive(Debug, Clone)]
pub struct PaperBroker {
    cash: f64,
    initial_capital: f64,
    shares: u64,
    commission_rate: f64,
    last_close: Option<f64>,
    fills: Vec<Fill>,
}

impl PaperBroker {
    pub fn new(initial_capital: f64, commission_rate: f64) -> Self {
        Self {
            cash: initial_capital,
            initial_capital,
            shares: 0,
            commission_rate,
            last_close: None,
            fills: Vec::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn shares(&self) -> u64 {
        self.shares
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// cash + shares × last close.
    pub fn value(&self) -> f64 {
        self.cash + self.shares as f64 * self.last_close.unwrap_or(0.0)
    }

    pub fn total_commission(&self) -> f64 {
        self.fills.iter().map(|f| f.commission).sum()
    }
}

impl OrderSink for PaperBroker {
    fn place(&mut self, order: &Order) -> Result<(), OrderError> {
        if order.size == 0 {
            return Err(OrderError::Rejected {
                reason: "order size must be positive".to_string(),
            });
        }
        let price = self.last_close.ok_or_else(|| OrderError::Rejected {
            reason: "no price marked yet".to_string(),
        })?;

        let value = order.size as f64 * price;
        let commission = value * self.commission_rate;

        match order.action {
            OrderAction::Buy => {
                let needed = value + commission;
                if needed > self.cash {
                    return Err(OrderError::InsufficientCash {
                        needed,
                        available: self.cash,
                    });
                }
                self.cash -= needed;
                self.shares += order.size;
            }
            OrderAction::Sell => {
                if order.size > self.shares {
                    return Err(OrderError::InsufficientShares {
                        requested: order.size,
                        held: self.shares,
                    });
                }
                self.cash += value - commission;
                self.shares -= order.size;
            }
        }

        self.fills.push(Fill {
            date: order.bar_date,
            action: order.action,
            size: order.size,
            price,
            commission,
            cash: self.cash,
        });
        Ok(())
    }

    fn on_bar(&mut self, bar: &Bar) {
        self.last_close = Some(bar.close);
    }

    fn portfolio_value(&self) -> Option<f64> {
        Some(self.value())
    }
}
