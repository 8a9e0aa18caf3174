use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ContractError {
    AlreadyInitialized = 800,
    Unauthorized = 801,
    DuplicateFarm = 802,
    UnknownFarm = 803,
    InvalidInput = 804,
    AdminNotSet = 805,
}
