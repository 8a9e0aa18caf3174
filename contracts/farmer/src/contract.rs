use soroban_sdk::{
    contract, contractimpl, contractmeta, log, vec, Address, Env, IntoVal, Symbol, Val, Vec,
};

use crate::error::ContractError;
use crate::storage::{
    get_admin, get_farm, get_farm_tokens, get_joined, is_initialized, save_admin, save_farm,
    save_farm_tokens, save_joined, set_initialized, RewardPreviewResponse,
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "Contract to fan out staking operations across multiple farms"
);

#[contract]
pub struct Farmer;

pub trait FarmerTrait {
    fn initialize(env: Env, admin: Address) -> Result<(), ContractError>;

    fn add_farm(
        env: Env,
        sender: Address,
        stake_token: Address,
        farm: Address,
    ) -> Result<(), ContractError>;

    fn join(
        env: Env,
        sender: Address,
        stake_tokens: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), ContractError>;

    fn leave(
        env: Env,
        sender: Address,
        stake_tokens: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), ContractError>;

    // QUERIES

    fn query_joined(env: Env, stake_token: Address, owner: Address)
        -> Result<i128, ContractError>;

    fn query_farm(env: Env, stake_token: Address) -> Result<Address, ContractError>;

    fn query_farm_tokens(env: Env) -> Result<Vec<Address>, ContractError>;

    fn query_current_user_rewards(
        env: Env,
        owner: Address,
        stake_tokens: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<Vec<i128>, ContractError>;
}

#[contractimpl]
impl FarmerTrait for Farmer {
    fn initialize(env: Env, admin: Address) -> Result<(), ContractError> {
        if is_initialized(&env) {
            log!(
                &env,
                "Farmer: Initialize: initializing contract twice is not allowed"
            );
            return Err(ContractError::AlreadyInitialized);
        }

        set_initialized(&env);
        save_admin(&env, &admin);

        env.events()
            .publish(("initialize", "Harvest farm router"), admin);

        Ok(())
    }

    fn add_farm(
        env: Env,
        sender: Address,
        stake_token: Address,
        farm: Address,
    ) -> Result<(), ContractError> {
        sender.require_auth();

        let admin = get_admin(&env);
        if sender != admin {
            log!(&env, "Farmer: Add farm: Only the admin can register farms");
            return Err(ContractError::Unauthorized);
        }

        if get_farm(&env, &stake_token).is_some() {
            log!(
                &env,
                "Farmer: Add farm: Farm for this stake token already registered"
            );
            return Err(ContractError::DuplicateFarm);
        }

        save_farm(&env, &stake_token, &farm);
        let mut tokens = get_farm_tokens(&env);
        tokens.push_back(stake_token.clone());
        save_farm_tokens(&env, &tokens);

        env.events().publish(("add_farm", "stake_token"), &stake_token);
        env.events().publish(("add_farm", "farm"), &farm);

        Ok(())
    }

    fn join(
        env: Env,
        sender: Address,
        stake_tokens: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), ContractError> {
        sender.require_auth();

        let farms = resolve_farms(&env, &stake_tokens, &amounts)?;

        let stake_fn = Symbol::new(&env, "stake");
        for i in 0..stake_tokens.len() {
            let stake_token = stake_tokens.get(i).unwrap();
            let amount = amounts.get(i).unwrap();
            let farm = farms.get(i).unwrap();

            let call_args: Vec<Val> = (sender.clone(), amount).into_val(&env);
            env.invoke_contract::<Val>(&farm, &stake_fn, call_args);

            let joined = get_joined(&env, &sender, &stake_token);
            save_joined(&env, &sender, &stake_token, joined + amount);
        }

        env.events().publish(("join", "user"), &sender);
        env.events()
            .publish(("join", "farms"), stake_tokens.len());

        Ok(())
    }

    fn leave(
        env: Env,
        sender: Address,
        stake_tokens: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), ContractError> {
        sender.require_auth();

        let farms = resolve_farms(&env, &stake_tokens, &amounts)?;

        let unstake_fn = Symbol::new(&env, "unstake");
        for i in 0..stake_tokens.len() {
            let stake_token = stake_tokens.get(i).unwrap();
            let amount = amounts.get(i).unwrap();
            let farm = farms.get(i).unwrap();

            let call_args: Vec<Val> = (sender.clone(), amount).into_val(&env);
            env.invoke_contract::<Val>(&farm, &unstake_fn, call_args);

            let joined = get_joined(&env, &sender, &stake_token);
            save_joined(&env, &sender, &stake_token, joined - amount);
        }

        env.events().publish(("leave", "user"), &sender);
        env.events()
            .publish(("leave", "farms"), stake_tokens.len());

        Ok(())
    }

    // QUERIES

    fn query_joined(
        env: Env,
        stake_token: Address,
        owner: Address,
    ) -> Result<i128, ContractError> {
        Ok(get_joined(&env, &owner, &stake_token))
    }

    fn query_farm(env: Env, stake_token: Address) -> Result<Address, ContractError> {
        get_farm(&env, &stake_token).ok_or(ContractError::UnknownFarm)
    }

    fn query_farm_tokens(env: Env) -> Result<Vec<Address>, ContractError> {
        Ok(get_farm_tokens(&env))
    }

    fn query_current_user_rewards(
        env: Env,
        owner: Address,
        stake_tokens: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<Vec<i128>, ContractError> {
        let farms = resolve_farms(&env, &stake_tokens, &amounts)?;

        let preview_fn = Symbol::new(&env, "query_reward_preview");
        let mut rewards: Vec<i128> = vec![&env];
        for i in 0..stake_tokens.len() {
            let amount = amounts.get(i).unwrap();
            let farm = farms.get(i).unwrap();

            let call_args: Vec<Val> = (owner.clone(), amount).into_val(&env);
            let preview: RewardPreviewResponse =
                env.invoke_contract(&farm, &preview_fn, call_args);
            rewards.push_back(preview.reward_amount);
        }

        Ok(rewards)
    }
}

/// Validation phase of every fan-out call: the input arrays must line up
/// and every stake token must have a registered farm, before any farm is
/// touched.
fn resolve_farms(
    env: &Env,
    stake_tokens: &Vec<Address>,
    amounts: &Vec<i128>,
) -> Result<Vec<Address>, ContractError> {
    if stake_tokens.is_empty() || stake_tokens.len() != amounts.len() {
        log!(
            env,
            "Farmer: Trying to operate on {} tokens with {} amounts",
            stake_tokens.len(),
            amounts.len()
        );
        return Err(ContractError::InvalidInput);
    }

    let mut farms: Vec<Address> = vec![env];
    for stake_token in stake_tokens.iter() {
        match get_farm(env, &stake_token) {
            Some(farm) => farms.push_back(farm),
            None => {
                log!(env, "Farmer: No farm registered for the given stake token");
                return Err(ContractError::UnknownFarm);
            }
        }
    }

    Ok(farms)
}
