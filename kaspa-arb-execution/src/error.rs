use kaspa_arb_instrument::{AssetName, ExchangeId};
use thiserror::Error;

/// Failure of a point-in-time request against an exchange connector.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectorError {
    #[error("{exchange} connectivity error: {message}")]
    Connectivity {
        exchange: ExchangeId,
        message: String,
    },

    #[error("{exchange} does not hold asset {asset}")]
    UnknownAsset {
        exchange: ExchangeId,
        asset: AssetName,
    },
}

impl ConnectorError {
    pub fn connectivity(exchange: impl Into<ExchangeId>, message: impl Into<String>) -> Self {
        Self::Connectivity {
            exchange: exchange.into(),
            message: message.into(),
        }
    }
}

/// Failure to start an arbitrage attempt on the execution engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    #[error("execution engine rejected attempt: {0}")]
    Rejected(String),

    #[error(transparent)]
    Connector(#[from] ConnectorError),
}
