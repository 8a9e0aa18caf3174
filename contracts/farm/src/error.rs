use curve::CurveError;
use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 700,
    InvalidAmount = 701,
    InsufficientBalance = 702,
    CapacityExceeded = 703,
    Unauthorized = 704,
    InvalidBonusConfig = 705,
    InvalidShareRatio = 706,
    ScheduleInvalid = 707,
    ConfigNotSet = 708,
    AdminNotSet = 709,
}

impl From<CurveError> for ContractError {
    fn from(_: CurveError) -> Self {
        ContractError::ScheduleInvalid
    }
}
