//! Order sink port trait.

use crate::domain::bar::Bar;
use crate::domain::error::OrderError;
use crate::domain::order::Order;

/// Destination for orders emitted by the signal engine.
///
/// Fill timing, commission and slippage are the sink's business. The engine
/// only learns whether an order was accepted.
pub trait OrderSink {
    fn place(&mut self, order: &Order) -> Result<(), OrderError>;

    /// Called by the run driver before each bar is stepped.
    fn on_bar(&mut self, _bar: &Bar) {}

    /// Portfolio value as the sink's owner reports it, if it tracks one.
    fn portfolio_value(&self) -> Option<f64> {
        None
    }
}

impl<S: OrderSink + ?Sized> OrderSink for &mut S {
    fn place(&mut self, order: &Order) -> Result<(), OrderError> {
        (**self).place(order)
    }

    fn on_bar(&mut self, bar: &Bar) {
        (**self).on_bar(bar)
    }

    fn portfolio_value(&self) -> Option<f64> {
        (**self).portfolio_value()
    }
}
