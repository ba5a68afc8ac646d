use harbor::error::ErrorCode;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum CdpError {
    #[doc = "AlreadyInitialized"]
    AlreadyInitialized = 1,
    #[doc = "NotInitialized"]
    NotInitialized = 2,
    #[doc = "Unauthorized"]
    Unauthorized = 3,
    #[doc = "InvalidParams"]
    InvalidParams = 4,
    #[doc = "InvalidAddress"]
    InvalidAddress = 5,
    #[doc = "InvalidCoins"]
    InvalidCoins = 6,
    #[doc = "EmptyCollateralType"]
    EmptyCollateralType = 7,
    #[doc = "CollateralTypeNotFound"]
    CollateralTypeNotFound = 8,
    #[doc = "NotFound"]
    NotFound = 9,
    #[doc = "CdpAlreadyExists"]
    CdpAlreadyExists = 10,
    #[doc = "BelowLiquidationRatio"]
    BelowLiquidationRatio = 11,
    #[doc = "DebtCeilingExceeded"]
    DebtCeilingExceeded = 12,
    #[doc = "BelowDebtFloor"]
    BelowDebtFloor = 13,
    #[doc = "PriceUnavailable"]
    PriceUnavailable = 14,
    #[doc = "NotUnderCollateralized"]
    NotUnderCollateralized = 15,
    #[doc = "Expired"]
    Expired = 16,
    #[doc = "InvalidBid"]
    InvalidBid = 17,
    #[doc = "AuctionNotExpired"]
    AuctionNotExpired = 18,
    #[doc = "InsufficientBalance"]
    InsufficientBalance = 19,
    #[doc = "InvalidAuction"]
    InvalidAuction = 20,
    #[doc = "DuplicateAuctionId"]
    DuplicateAuctionId = 21,
    #[doc = "AuctionIdTooHigh"]
    AuctionIdTooHigh = 22,
    #[doc = "GenesisBalanceMismatch"]
    GenesisBalanceMismatch = 23,
    #[doc = "EncodingFailure"]
    EncodingFailure = 24,
    #[doc = "MathError"]
    MathError = 25,
}

impl From<ErrorCode> for CdpError {
    fn from(error: ErrorCode) -> Self {
        match error {
            ErrorCode::MathError | ErrorCode::BnConversionError => {
                CdpError::MathError
            }
            ErrorCode::OracleUnavailable | ErrorCode::OracleStale | ErrorCode::OracleNonPositive => {
                CdpError::PriceUnavailable
            }
            ErrorCode::InvalidAddress => CdpError::InvalidAddress,
        }
    }
}
