//! Host-runtime seams for cross-exchange arbitrage.
//!
//! The strategy core never talks to an exchange API directly. It depends on:
//!
//! - [`ExchangeConnector`]: per exchange quote and balance queries.
//! - [`ExecutionEngine`]: accepts an [`ArbitrageRequest`] and returns an
//!   [`ExecutionHandle`] the strategy polls until it reports a [`CloseType`].
//!
//! Two implementations ship with the crate: [`mock`] for deterministic tests
//! and [`paper`] for dry runs against live (or simulated) quotes.

pub mod connector;
pub mod engine;
pub mod error;
pub mod mock;
pub mod paper;
pub mod quote;

pub use connector::{ConnectorMap, ConnectorRef, ExchangeConnector};
pub use engine::{ArbitrageRequest, CloseType, ExecutionEngine, ExecutionHandle};
pub use error::{ConnectorError, ExecutionError};
pub use quote::Quote;
