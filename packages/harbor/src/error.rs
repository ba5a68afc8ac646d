use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ErrorCode {
    MathError = 1,
    BnConversionError = 3,
    OracleUnavailable = 4,
    OracleStale = 5,
    OracleNonPositive = 6,
    InvalidAddress = 7,
}

pub type HarborResult<T = ()> = Result<T, ErrorCode>;
