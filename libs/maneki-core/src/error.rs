use thiserror::Error;

/// Local, pre-submission checks. Reported synchronously, never logged
/// remotely, never block a retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("enter an amount")]
    AmountMissing,
    #[error("minimum withdrawal is {min} {currency}")]
    BelowMinimum { min: f64, currency: String },
    #[error("maximum withdrawal is {max} {currency}")]
    AboveMaximum { max: f64, currency: String },
    #[error("insufficient funds")]
    InsufficientFunds,
    #[error("amount is too small after network fees, minimum payout is {floor} {currency}")]
    BelowFeeFloor { floor: f64, currency: String },
    #[error("enter destination details")]
    DestinationMissing,
    #[error("this item is not eligible for a refund request")]
    RefundNotAvailable,
}

#[derive(Debug, Error)]
pub enum SettlementError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The remote verification call failed or returned an unexpected
    /// shape. State is left untouched and the action stays available.
    #[error("payment check failed, please try again")]
    Verification(#[source] anyhow::Error),

    #[error("payment verification is not available for this order")]
    VerificationUnavailable,

    /// The server refused a transition (e.g. stale state). The caller
    /// refreshes from the server to resync.
    #[error("{0}")]
    TransitionRejected(String),

    /// Another call for the same entity is still in flight.
    #[error("another operation is already in progress")]
    Busy,

    /// No current preview matches the amount being submitted; a fresh
    /// one must resolve first.
    #[error("the fee preview is still loading")]
    PreviewPending,

    /// The id does not exist in the latest snapshot.
    #[error("item not found")]
    NotFound,

    #[error(transparent)]
    Api(#[from] anyhow::Error),
}
