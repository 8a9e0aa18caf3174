use harvest::ttl::{
    INSTANCE_BUMP_AMOUNT, INSTANCE_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT,
    PERSISTENT_LIFETIME_THRESHOLD,
};
use soroban_sdk::{contracttype, log, panic_with_error, Address, Env, Vec};

use crate::error::ContractError;

/// Key of the denormalized per-user balance mirror. It always equals the
/// underlying farm's recorded position, which is why farms only accept
/// stake movements routed through this contract.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct JoinedKey {
    pub owner: Address,
    pub stake_token: Address,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Admin,
    Initialized,
    FarmTokens,
    Farm(Address),
    Joined(JoinedKey),
}

/// Mirror of the farm's reward preview response; decoded across the
/// contract boundary by matching field names.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RewardPreviewResponse {
    pub reward_amount: i128,
    pub fee_amount: i128,
}

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
    e.storage().instance().set(&DataKey::Admin, address);
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn get_admin(e: &Env) -> Address {
    e.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);

    e.storage()
        .instance()
        .get(&DataKey::Admin)
        .unwrap_or_else(|| {
            log!(e, "Farmer: Get admin: Admin not set");
            panic_with_error!(&e, ContractError::AdminNotSet)
        })
}

pub fn get_farm(env: &Env, stake_token: &Address) -> Option<Address> {
    let farm = env
        .storage()
        .persistent()
        .get(&DataKey::Farm(stake_token.clone()));
    env.storage()
        .persistent()
        .has(&DataKey::Farm(stake_token.clone()))
        .then(|| {
            env.storage().persistent().extend_ttl(
                &DataKey::Farm(stake_token.clone()),
                PERSISTENT_LIFETIME_THRESHOLD,
                PERSISTENT_BUMP_AMOUNT,
            )
        });

    farm
}

pub fn save_farm(env: &Env, stake_token: &Address, farm: &Address) {
    env.storage()
        .persistent()
        .set(&DataKey::Farm(stake_token.clone()), farm);
    env.storage().persistent().extend_ttl(
        &DataKey::Farm(stake_token.clone()),
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

// Keep track of all registered stake tokens to be able to iterate over them
pub fn get_farm_tokens(env: &Env) -> Vec<Address> {
    let tokens = env
        .storage()
        .persistent()
        .get(&DataKey::FarmTokens)
        .unwrap_or_else(|| soroban_sdk::vec![env]);
    env.storage()
        .persistent()
        .has(&DataKey::FarmTokens)
        .then(|| {
            env.storage().persistent().extend_ttl(
                &DataKey::FarmTokens,
                PERSISTENT_LIFETIME_THRESHOLD,
                PERSISTENT_BUMP_AMOUNT,
            )
        });

    tokens
}

pub fn save_farm_tokens(env: &Env, tokens: &Vec<Address>) {
    env.storage().persistent().set(&DataKey::FarmTokens, tokens);
    env.storage().persistent().extend_ttl(
        &DataKey::FarmTokens,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

pub fn get_joined(env: &Env, owner: &Address, stake_token: &Address) -> i128 {
    let key = DataKey::Joined(JoinedKey {
        owner: owner.clone(),
        stake_token: stake_token.clone(),
    });
    let joined = env.storage().persistent().get(&key).unwrap_or(0i128);
    env.storage().persistent().has(&key).then(|| {
        env.storage().persistent().extend_ttl(
            &key,
            PERSISTENT_LIFETIME_THRESHOLD,
            PERSISTENT_BUMP_AMOUNT,
        )
    });

    joined
}

pub fn save_joined(env: &Env, owner: &Address, stake_token: &Address, amount: i128) {
    let key = DataKey::Joined(JoinedKey {
        owner: owner.clone(),
        stake_token: stake_token.clone(),
    });
    if amount == 0 {
        env.storage().persistent().remove(&key);
        return;
    }
    env.storage().persistent().set(&key, &amount);
    env.storage().persistent().extend_ttl(
        &key,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}
