use harvest::ttl::{PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};
use soroban_sdk::{contracttype, log, panic_with_error, symbol_short, Address, Env, Symbol, Vec};

use crate::error::ContractError;

pub const CONFIG: Symbol = symbol_short!("CONFIG");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Token users deposit into this farm
    pub stake_token: Address,
    /// Token this farm pays rewards in
    pub reward_token: Address,
    /// Accounting token minted 1:1 (times `initial_shares_per_token`) against principal.
    /// The farm is the token admin, which is what makes mint/burn farm-only.
    pub receipt_token: Address,
    /// Router allowed to move stakes in and out of this farm
    pub farmer: Address,
    /// Receiver of the exit fee, paid in reward tokens
    pub fee_recipient: Address,
    /// Exit fee in bps, applied to reward payouts only - never to principal
    pub fee_bps: i64,
    /// Upper bound on concurrently tracked unlock schedules
    pub max_unlock_schedules: u32,
    /// Receipt tokens minted per staked token
    pub initial_shares_per_token: i128,
    /// Multiplier a fresh stake starts at, scaled by 10^bonus_decimals
    pub bonus_start: u64,
    /// Fixed-point precision of the bonus multiplier
    pub bonus_decimals: u32,
    /// Seconds of seasoning until the multiplier saturates at 1.0
    pub bonus_period: u64,
}

pub fn get_config(env: &Env) -> Config {
    let config = env.storage().persistent().get(&CONFIG).unwrap_or_else(|| {
        log!(&env, "Farm: Get config: Config not set");
        panic_with_error!(&env, ContractError::ConfigNotSet);
    });
    env.storage().persistent().extend_ttl(
        &CONFIG,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );

    config
}

pub fn save_config(env: &Env, config: Config) {
    env.storage().persistent().set(&CONFIG, &config);
    env.storage().persistent().extend_ttl(
        &CONFIG,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

/// A user's aggregated stake in this farm. Top-ups merge into the same
/// record by moving `deposit_time` to the amount-weighted average of the
/// old and new deposits; withdrawals leave `deposit_time` untouched.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq, Default)]
pub struct StakePosition {
    /// The amount of staked tokens
    pub amount: i128,
    /// Weighted-average timestamp across all merged deposits
    pub deposit_time: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    TotalStaked,
    Stakers,
    Position(Address),
}

pub fn get_position(env: &Env, key: &Address) -> StakePosition {
    let position = env
        .storage()
        .persistent()
        .get(&DataKey::Position(key.clone()))
        .unwrap_or_default();
    env.storage()
        .persistent()
        .has(&DataKey::Position(key.clone()))
        .then(|| {
            env.storage().persistent().extend_ttl(
                &DataKey::Position(key.clone()),
                PERSISTENT_LIFETIME_THRESHOLD,
                PERSISTENT_BUMP_AMOUNT,
            );
        });

    position
}

pub fn save_position(env: &Env, key: &Address, position: &StakePosition) {
    env.storage()
        .persistent()
        .set(&DataKey::Position(key.clone()), position);
    env.storage().persistent().extend_ttl(
        &DataKey::Position(key.clone()),
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

pub fn remove_position(env: &Env, key: &Address) {
    env.storage()
        .persistent()
        .remove(&DataKey::Position(key.clone()));
}

pub mod utils {
    use super::*;

    use harvest::ttl::{INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD};

    pub const ADMIN: Symbol = symbol_short!("ADMIN");

    pub fn is_initialized(e: &Env) -> bool {
        e.storage()
            .instance()
            .get(&DataKey::Initialized)
            .unwrap_or(false)
    }

    pub fn set_initialized(e: &Env) {
        e.storage().instance().set(&DataKey::Initialized, &true);
        e.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    pub fn save_admin(e: &Env, address: &Address) {
        e.storage().instance().set(&ADMIN, address);
        e.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
    }

    pub fn get_admin(e: &Env) -> Address {
        e.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

        e.storage().instance().get(&ADMIN).unwrap_or_else(|| {
            log!(e, "Farm: Get admin: Admin not set");
            panic_with_error!(&e, ContractError::AdminNotSet)
        })
    }

    pub fn init_total_staked(e: &Env) {
        e.storage().persistent().set(&DataKey::TotalStaked, &0i128);
        e.storage().persistent().extend_ttl(
            &DataKey::TotalStaked,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }

    pub fn increase_total_staked(e: &Env, amount: &i128) {
        let count = get_total_staked_counter(e);
        e.storage()
            .persistent()
            .set(&DataKey::TotalStaked, &(count + amount));

        e.storage().persistent().extend_ttl(
            &DataKey::TotalStaked,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }

    pub fn decrease_total_staked(e: &Env, amount: &i128) {
        let count = get_total_staked_counter(e);
        e.storage()
            .persistent()
            .set(&DataKey::TotalStaked, &(count - amount));

        e.storage().persistent().extend_ttl(
            &DataKey::TotalStaked,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }

    pub fn get_total_staked_counter(env: &Env) -> i128 {
        let total_staked = env
            .storage()
            .persistent()
            .get(&DataKey::TotalStaked)
            .unwrap_or(0i128);
        env.storage().persistent().extend_ttl(
            &DataKey::TotalStaked,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );

        total_staked
    }

    // Registry of addresses with a live position, so settlement can walk
    // the whole pool when it recomputes the bonus-weighted total.
    pub fn get_stakers(e: &Env) -> Vec<Address> {
        let stakers = e
            .storage()
            .persistent()
            .get(&DataKey::Stakers)
            .unwrap_or_else(|| soroban_sdk::vec![e]);
        e.storage().persistent().has(&DataKey::Stakers).then(|| {
            e.storage().persistent().extend_ttl(
                &DataKey::Stakers,
                PERSISTENT_LIFETIME_THRESHOLD,
                PERSISTENT_BUMP_AMOUNT,
            )
        });

        stakers
    }

    pub fn add_staker(e: &Env, address: &Address) {
        let mut stakers = get_stakers(e);
        if !stakers.contains(address) {
            stakers.push_back(address.clone());
            save_stakers(e, &stakers);
        }
    }

    pub fn remove_staker(e: &Env, address: &Address) {
        let mut stakers = get_stakers(e);
        if let Some(index) = stakers.iter().position(|s| &s == address) {
            stakers.remove(index as u32);
            save_stakers(e, &stakers);
        }
    }

    fn save_stakers(e: &Env, stakers: &Vec<Address>) {
        e.storage().persistent().set(&DataKey::Stakers, stakers);
        e.storage().persistent().extend_ttl(
            &DataKey::Stakers,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        );
    }
}
