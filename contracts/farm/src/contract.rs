use harvest::validate_bps;
use soroban_sdk::{contract, contractimpl, contractmeta, log, token, Address, Env};

use crate::{
    distribution::{
        get_rewards_paid, get_schedules, get_total_locked, get_total_paid, merged_deposit_time,
        pending_rewards, refresh_release_checkpoints, released_as_of, remove_rewards_paid,
        save_rewards_paid, save_schedules, save_total_locked, save_total_paid, split_fee,
        stake_weight, UnlockSchedule,
    },
    error::ContractError,
    msg::{ConfigResponse, FarmState, RewardPreviewResponse, SchedulesResponse, StakedResponse},
    storage::{
        get_config, get_position, remove_position, save_config, save_position,
        utils::{self, get_admin},
        Config,
    },
};

// Metadata that is added on to the WASM custom section
contractmeta!(
    key = "Description",
    val = "Harvest Protocol single-pair staking farm"
);

#[contract]
pub struct Farm;

pub trait FarmTrait {
    /// Sets the token addresses, the fee policy and the bonus ramp for this farm
    #[allow(clippy::too_many_arguments)]
    fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
        receipt_token: Address,
        farmer: Address,
        fee_recipient: Address,
        fee_bps: i64,
        max_unlock_schedules: u32,
        initial_shares_per_token: i128,
        bonus_start: u64,
        bonus_decimals: u32,
        bonus_period: u64,
    ) -> Result<(), ContractError>;

    fn lock_tokens(
        env: Env,
        sender: Address,
        amount: i128,
        duration: u64,
    ) -> Result<(), ContractError>;

    fn stake(env: Env, sender: Address, amount: i128) -> Result<(), ContractError>;

    fn unstake(env: Env, sender: Address, amount: i128) -> Result<(), ContractError>;

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError>;

    fn query_admin(env: Env) -> Result<Address, ContractError>;

    fn query_staked(env: Env, address: Address) -> Result<StakedResponse, ContractError>;

    fn query_total_staked(env: Env) -> Result<i128, ContractError>;

    fn query_total_locked(env: Env) -> Result<u128, ContractError>;

    fn query_schedules(env: Env) -> Result<SchedulesResponse, ContractError>;

    fn query_reward_preview(
        env: Env,
        address: Address,
        amount: i128,
    ) -> Result<RewardPreviewResponse, ContractError>;

    fn query_farm_state(env: Env) -> Result<FarmState, ContractError>;
}

#[contractimpl]
impl FarmTrait for Farm {
    #[allow(clippy::too_many_arguments)]
    fn initialize(
        env: Env,
        admin: Address,
        stake_token: Address,
        reward_token: Address,
        receipt_token: Address,
        farmer: Address,
        fee_recipient: Address,
        fee_bps: i64,
        max_unlock_schedules: u32,
        initial_shares_per_token: i128,
        bonus_start: u64,
        bonus_decimals: u32,
        bonus_period: u64,
    ) -> Result<(), ContractError> {
        if utils::is_initialized(&env) {
            log!(
                &env,
                "Farm: Initialize: initializing contract twice is not allowed"
            );
            return Err(ContractError::AlreadyInitialized);
        }

        validate_bps!(fee_bps);

        if initial_shares_per_token <= 0 {
            log!(
                &env,
                "Farm: Initialize: initial shares per token must be positive"
            );
            return Err(ContractError::InvalidShareRatio);
        }

        // the bonus scale must fit u128 math and bound the start value
        if bonus_decimals > 18 || bonus_start as u128 > 10u128.pow(bonus_decimals) {
            log!(
                &env,
                "Farm: Initialize: bonus start {} does not fit {} decimals",
                bonus_start,
                bonus_decimals
            );
            return Err(ContractError::InvalidBonusConfig);
        }

        let config = Config {
            stake_token: stake_token.clone(),
            reward_token,
            receipt_token,
            farmer,
            fee_recipient,
            fee_bps,
            max_unlock_schedules,
            initial_shares_per_token,
            bonus_start,
            bonus_decimals,
            bonus_period,
        };
        save_config(&env, config);

        utils::save_admin(&env, &admin);
        utils::init_total_staked(&env);
        utils::set_initialized(&env);

        env.events()
            .publish(("initialize", "Harvest staking farm"), &stake_token);

        Ok(())
    }

    fn lock_tokens(
        env: Env,
        sender: Address,
        amount: i128,
        duration: u64,
    ) -> Result<(), ContractError> {
        sender.require_auth();

        let admin = get_admin(&env);
        if sender != admin {
            log!(&env, "Farm: Lock tokens: Only the admin can fund rewards");
            return Err(ContractError::Unauthorized);
        }

        let config = get_config(&env);

        if amount <= 0 {
            log!(
                &env,
                "Farm: Lock tokens: Trying to lock {} which is not a positive amount!",
                amount
            );
            return Err(ContractError::InvalidAmount);
        }

        let now = env.ledger().timestamp();
        refresh_release_checkpoints(&env, now);

        let mut schedules = get_schedules(&env);
        if schedules.len() >= config.max_unlock_schedules {
            log!(
                &env,
                "Farm: Lock tokens: Maximum of {} unlock schedules reached",
                config.max_unlock_schedules
            );
            return Err(ContractError::CapacityExceeded);
        }

        // the reward commitment must be in the farm's custody before the
        // schedule starts releasing it
        let reward_token_client = token::Client::new(&env, &config.reward_token);
        reward_token_client.transfer(&sender, &env.current_contract_address(), &amount);

        let schedule = UnlockSchedule {
            total_amount: amount as u128,
            duration,
            start_time: now,
            released: 0,
        };

        // the release curve must grow towards exactly the locked amount
        let release_curve = schedule.release_curve();
        release_curve.validate_monotonic_increasing()?;
        if release_curve.range().1 != amount as u128 {
            log!(&env, "Farm: Lock tokens: Release curve validation failed");
            return Err(ContractError::ScheduleInvalid);
        }

        schedules.push_back(schedule);
        save_schedules(&env, &schedules);
        save_total_locked(&env, &(get_total_locked(&env) + amount as u128));

        env.events().publish(("lock_tokens", "amount"), amount);
        env.events().publish(("lock_tokens", "duration"), duration);

        Ok(())
    }

    fn stake(env: Env, sender: Address, amount: i128) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env);
        // all stake movements flow through the router, which keeps its
        // joined mirror consistent with this farm's ledger
        config.farmer.require_auth();

        if amount <= 0 {
            log!(
                &env,
                "Farm: Stake: Trying to stake {} which is not a positive amount!",
                amount
            );
            return Err(ContractError::InvalidAmount);
        }

        let now = env.ledger().timestamp();
        refresh_release_checkpoints(&env, now);
        settle_rewards(&env, &config, &sender, now);

        let stake_token_client = token::Client::new(&env, &config.stake_token);
        stake_token_client.transfer(&sender, &env.current_contract_address(), &amount);

        let mut position = get_position(&env, &sender);
        position.deposit_time = merged_deposit_time(&position, amount, now);
        position.amount += amount;
        save_position(&env, &sender, &position);
        utils::add_staker(&env, &sender);
        utils::increase_total_staked(&env, &amount);

        token::StellarAssetClient::new(&env, &config.receipt_token)
            .mint(&sender, &(amount * config.initial_shares_per_token));

        env.events().publish(("stake", "user"), &sender);
        env.events().publish(("stake", "token"), &config.stake_token);
        env.events().publish(("stake", "amount"), amount);

        Ok(())
    }

    fn unstake(env: Env, sender: Address, amount: i128) -> Result<(), ContractError> {
        sender.require_auth();

        let config = get_config(&env);
        config.farmer.require_auth();

        if amount <= 0 {
            log!(
                &env,
                "Farm: Unstake: Trying to unstake {} which is not a positive amount!",
                amount
            );
            return Err(ContractError::InvalidAmount);
        }

        let position = get_position(&env, &sender);
        if amount > position.amount {
            log!(
                &env,
                "Farm: Unstake: Trying to unstake {} with only {} staked",
                amount,
                position.amount
            );
            return Err(ContractError::InsufficientBalance);
        }

        let now = env.ledger().timestamp();
        refresh_release_checkpoints(&env, now);
        settle_rewards(&env, &config, &sender, now);

        token::Client::new(&env, &config.receipt_token)
            .burn(&sender, &(amount * config.initial_shares_per_token));

        let stake_token_client = token::Client::new(&env, &config.stake_token);
        stake_token_client.transfer(&env.current_contract_address(), &sender, &amount);

        let mut position = get_position(&env, &sender);
        position.amount -= amount;
        if position.amount == 0 {
            // a fully exited user starts from scratch if they come back
            remove_position(&env, &sender);
            remove_rewards_paid(&env, &sender);
            utils::remove_staker(&env, &sender);
        } else {
            save_position(&env, &sender, &position);
        }
        utils::decrease_total_staked(&env, &amount);

        env.events().publish(("unstake", "user"), &sender);
        env.events().publish(("unstake", "token"), &config.stake_token);
        env.events().publish(("unstake", "amount"), amount);

        Ok(())
    }

    // QUERIES

    fn query_config(env: Env) -> Result<ConfigResponse, ContractError> {
        Ok(ConfigResponse {
            config: get_config(&env),
        })
    }

    fn query_admin(env: Env) -> Result<Address, ContractError> {
        Ok(get_admin(&env))
    }

    fn query_staked(env: Env, address: Address) -> Result<StakedResponse, ContractError> {
        let position = get_position(&env, &address);
        Ok(StakedResponse {
            amount: position.amount,
            deposit_time: position.deposit_time,
        })
    }

    fn query_total_staked(env: Env) -> Result<i128, ContractError> {
        Ok(utils::get_total_staked_counter(&env))
    }

    fn query_total_locked(env: Env) -> Result<u128, ContractError> {
        Ok(get_total_locked(&env))
    }

    fn query_schedules(env: Env) -> Result<SchedulesResponse, ContractError> {
        let schedules = get_schedules(&env);
        let released = released_as_of(&schedules, env.ledger().timestamp());
        Ok(SchedulesResponse {
            schedules,
            total_locked: get_total_locked(&env),
            released,
        })
    }

    fn query_reward_preview(
        env: Env,
        address: Address,
        amount: i128,
    ) -> Result<RewardPreviewResponse, ContractError> {
        let config = get_config(&env);

        if amount <= 0 {
            log!(
                &env,
                "Farm: Reward preview: Trying to preview {} which is not a positive amount!",
                amount
            );
            return Err(ContractError::InvalidAmount);
        }

        let position = get_position(&env, &address);
        if amount > position.amount {
            log!(
                &env,
                "Farm: Reward preview: Trying to preview {} with only {} staked",
                amount,
                position.amount
            );
            return Err(ContractError::InsufficientBalance);
        }

        let now = env.ledger().timestamp();
        let schedules = get_schedules(&env);
        let released = released_as_of(&schedules, now);
        let owed = pending_rewards(
            released,
            stake_weight(&config, &position, now),
            total_stake_weight(&env, &config, now),
            get_rewards_paid(&env, &address),
            get_total_paid(&env),
        );
        let (payout, fee) = split_fee(owed, config.fee_bps);

        Ok(RewardPreviewResponse {
            reward_amount: payout as i128,
            fee_amount: fee as i128,
        })
    }

    fn query_farm_state(env: Env) -> Result<FarmState, ContractError> {
        let schedules = get_schedules(&env);
        let now = env.ledger().timestamp();
        let nothing_staked = utils::get_total_staked_counter(&env) == 0;
        let all_released =
            !schedules.is_empty() && schedules.iter().all(|s| s.is_fully_released(now));

        if nothing_staked && all_released {
            Ok(FarmState::Depleted)
        } else {
            Ok(FarmState::Active)
        }
    }
}

/// Bonus-weighted total over every live position; the denominator of the
/// pro-rata split. Recomputed fresh because other users' bonuses move with
/// time.
fn total_stake_weight(env: &Env, config: &Config, now: u64) -> u128 {
    let mut total = 0u128;
    for staker in utils::get_stakers(env).iter() {
        let position = get_position(env, &staker);
        total += stake_weight(config, &position, now);
    }
    total
}

/// Pays out whatever the user is owed from the released rewards at `now`,
/// splitting off the exit fee, and advances both the per-user and the
/// pool-wide paid counters. Returns (payout, fee).
fn settle_rewards(env: &Env, config: &Config, owner: &Address, now: u64) -> (u128, u128) {
    let position = get_position(env, owner);
    if position.amount <= 0 {
        return (0, 0);
    }

    let schedules = get_schedules(env);
    let released = released_as_of(&schedules, now);
    let total_paid = get_total_paid(env);
    let already_paid = get_rewards_paid(env, owner);

    let owed = pending_rewards(
        released,
        stake_weight(config, &position, now),
        total_stake_weight(env, config, now),
        already_paid,
        total_paid,
    );
    if owed == 0 {
        return (0, 0);
    }

    let (payout, fee) = split_fee(owed, config.fee_bps);
    let reward_token_client = token::Client::new(env, &config.reward_token);
    if payout > 0 {
        reward_token_client.transfer(&env.current_contract_address(), owner, &(payout as i128));
    }
    if fee > 0 {
        reward_token_client.transfer(
            &env.current_contract_address(),
            &config.fee_recipient,
            &(fee as i128),
        );
    }

    save_rewards_paid(env, owner, &(already_paid + owed));
    save_total_paid(env, &(total_paid + owed));

    env.events().publish(("settle_rewards", "user"), owner);
    env.events()
        .publish(("settle_rewards", "reward_amount"), payout);
    env.events().publish(("settle_rewards", "fee_amount"), fee);

    (payout, fee)
}
