use soroban_sdk::{contracttype, Vec};

use crate::distribution::UnlockSchedule;
use crate::storage::Config;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ConfigResponse {
    pub config: Config,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakedResponse {
    /// Aggregated staked amount
    pub amount: i128,
    /// Weighted-average deposit timestamp of the position
    pub deposit_time: u64,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchedulesResponse {
    pub schedules: Vec<UnlockSchedule>,
    /// Reward tokens ever committed to this farm
    pub total_locked: u128,
    /// Reward tokens released up to the query instant
    pub released: u128,
}

/// Non-mutating simulation of the settlement an unstake would trigger.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPreviewResponse {
    /// Reward the user would receive, net of the exit fee
    pub reward_amount: i128,
    /// Exit fee routed to the fee recipient
    pub fee_amount: i128,
}

/// Advisory farm lifecycle state; never restricts access.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FarmState {
    Active,
    Depleted,
}
