use curve::Curve;
use harvest::ttl::{PERSISTENT_BUMP_AMOUNT, PERSISTENT_LIFETIME_THRESHOLD};
use soroban_decimal::Decimal;
use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::storage::{Config, StakePosition};

/// One operator-funded reward commitment. `total_amount` releases linearly
/// over `duration` seconds starting at `start_time`; a zero duration
/// releases everything instantly.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnlockSchedule {
    /// Reward tokens committed by this schedule
    pub total_amount: u128,
    /// Seconds over which the commitment releases
    pub duration: u64,
    /// Ledger timestamp the release starts at
    pub start_time: u64,
    /// Checkpoint of the released amount, refreshed on mutating calls.
    /// Only an optimization cursor - `released_as_of` recomputes from
    /// `start_time` and never reads it.
    pub released: u128,
}

impl UnlockSchedule {
    /// The monotonically increasing released-so-far curve of this schedule.
    pub fn release_curve(&self) -> Curve {
        if self.duration == 0 {
            Curve::constant(self.total_amount)
        } else {
            Curve::saturating_linear(
                (self.start_time, 0),
                (self.start_time + self.duration, self.total_amount),
            )
        }
    }

    pub fn is_fully_released(&self, now: u64) -> bool {
        match self.release_curve().end() {
            Some(end) => now >= end,
            // instant releases are done the moment they are created
            None => true,
        }
    }
}

#[contracttype]
#[derive(Clone)]
pub enum ScheduleDataKey {
    Schedules,
    TotalLocked,
    TotalPaid,
    RewardsPaid(Address),
}

pub fn get_schedules(env: &Env) -> Vec<UnlockSchedule> {
    let schedules = env
        .storage()
        .persistent()
        .get(&ScheduleDataKey::Schedules)
        .unwrap_or_else(|| soroban_sdk::vec![env]);
    env.storage()
        .persistent()
        .has(&ScheduleDataKey::Schedules)
        .then(|| {
            env.storage().persistent().extend_ttl(
                &ScheduleDataKey::Schedules,
                PERSISTENT_LIFETIME_THRESHOLD,
                PERSISTENT_BUMP_AMOUNT,
            )
        });

    schedules
}

pub fn save_schedules(env: &Env, schedules: &Vec<UnlockSchedule>) {
    env.storage()
        .persistent()
        .set(&ScheduleDataKey::Schedules, schedules);
    env.storage().persistent().extend_ttl(
        &ScheduleDataKey::Schedules,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

pub fn get_total_locked(env: &Env) -> u128 {
    env.storage()
        .persistent()
        .get(&ScheduleDataKey::TotalLocked)
        .unwrap_or(0u128)
}

pub fn save_total_locked(env: &Env, total: &u128) {
    env.storage()
        .persistent()
        .set(&ScheduleDataKey::TotalLocked, total);
    env.storage().persistent().extend_ttl(
        &ScheduleDataKey::TotalLocked,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

/// Cumulative gross reward payouts (user payouts plus fees) of this farm.
pub fn get_total_paid(env: &Env) -> u128 {
    env.storage()
        .persistent()
        .get(&ScheduleDataKey::TotalPaid)
        .unwrap_or(0u128)
}

pub fn save_total_paid(env: &Env, total: &u128) {
    env.storage()
        .persistent()
        .set(&ScheduleDataKey::TotalPaid, total);
    env.storage().persistent().extend_ttl(
        &ScheduleDataKey::TotalPaid,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

/// Running total of rewards already settled to a user. Tracked by the farm
/// itself - the ledger cannot derive it once shares and release totals have
/// moved on - so settlement never pays the same release twice.
pub fn get_rewards_paid(env: &Env, user: &Address) -> u128 {
    env.storage()
        .persistent()
        .get(&ScheduleDataKey::RewardsPaid(user.clone()))
        .unwrap_or(0u128)
}

pub fn save_rewards_paid(env: &Env, user: &Address, paid: &u128) {
    env.storage()
        .persistent()
        .set(&ScheduleDataKey::RewardsPaid(user.clone()), paid);
    env.storage().persistent().extend_ttl(
        &ScheduleDataKey::RewardsPaid(user.clone()),
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

pub fn remove_rewards_paid(env: &Env, user: &Address) {
    env.storage()
        .persistent()
        .remove(&ScheduleDataKey::RewardsPaid(user.clone()));
}

/// Total reward released across all schedules up to `now`. Pure in the
/// persisted state: each schedule vests linearly and independently and a
/// fully vested schedule contributes exactly its total.
pub fn released_as_of(schedules: &Vec<UnlockSchedule>, now: u64) -> u128 {
    let mut released = 0u128;
    for schedule in schedules.iter() {
        released += schedule.release_curve().value(now);
    }
    released
}

/// Refresh the stored `released` cursors. Only called from mutating
/// entrypoints; queries always recompute.
pub fn refresh_release_checkpoints(env: &Env, now: u64) {
    let schedules = get_schedules(env);
    if schedules.is_empty() {
        return;
    }
    let mut refreshed = soroban_sdk::vec![env];
    for schedule in schedules.iter() {
        let released = schedule.release_curve().value(now);
        refreshed.push_back(UnlockSchedule {
            released,
            ..schedule
        });
    }
    save_schedules(env, &refreshed);
}

/// Seasoning multiplier of a position, scaled by `10^bonus_decimals`.
/// Starts at `bonus_start` and ramps linearly to the full scale once
/// `bonus_period` seconds have passed since the weighted deposit time.
pub fn bonus_multiplier(config: &Config, position: &StakePosition, now: u64) -> u128 {
    let scale = 10u128.pow(config.bonus_decimals);
    let start = config.bonus_start as u128;
    let elapsed = now.saturating_sub(position.deposit_time);
    if config.bonus_period == 0 || elapsed >= config.bonus_period {
        return scale;
    }
    start + (scale - start) * elapsed as u128 / config.bonus_period as u128
}

/// A position's weight in the pro-rata split: `amount * multiplier`. The
/// multiplier scale cancels out in the share ratio, so it is left in.
pub fn stake_weight(config: &Config, position: &StakePosition, now: u64) -> u128 {
    position.amount as u128 * bonus_multiplier(config, position, now)
}

/// The weighted-average deposit timestamp after merging `amount` staked at
/// `now` into an existing position. Topping up dilutes accrued seasoning
/// proportionally; that is the anti-gaming property of the single-record
/// ledger.
pub fn merged_deposit_time(position: &StakePosition, amount: i128, now: u64) -> u64 {
    let old_amount = position.amount as u128;
    let new_amount = amount as u128;
    let weighted = old_amount * position.deposit_time as u128 + new_amount * now as u128;
    (weighted / (old_amount + new_amount)) as u64
}

/// Reward owed to a position holding `weight` out of `total_weight`, given
/// `released` cumulative release, the user's `already_paid` running total
/// and the pool-wide `total_paid`. Never negative; never lets cumulative
/// payouts exceed the released amount.
pub fn pending_rewards(
    released: u128,
    weight: u128,
    total_weight: u128,
    already_paid: u128,
    total_paid: u128,
) -> u128 {
    if total_weight == 0 {
        return 0;
    }
    let entitled = released * Decimal::from_ratio(weight, total_weight);
    let owed = entitled.saturating_sub(already_paid);
    owed.min(released.saturating_sub(total_paid))
}

/// Split a gross reward payout into (user payout, exit fee).
pub fn split_fee(owed: u128, fee_bps: i64) -> (u128, u128) {
    let fee = owed * Decimal::bps(fee_bps as u64);
    (owed - fee, fee)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::{testutils::Address as _, vec};
    use test_case::test_case;

    const ONE_DAY: u64 = 86_400;
    const TWO_WEEKS: u64 = 14 * ONE_DAY;

    fn test_config(env: &Env) -> Config {
        Config {
            stake_token: Address::generate(env),
            reward_token: Address::generate(env),
            receipt_token: Address::generate(env),
            farmer: Address::generate(env),
            fee_recipient: Address::generate(env),
            fee_bps: 200,
            max_unlock_schedules: 10,
            initial_shares_per_token: 1,
            bonus_start: 0,
            bonus_decimals: 3,
            bonus_period: TWO_WEEKS,
        }
    }

    #[test]
    fn released_as_of_sums_overlapping_schedules() {
        let env = Env::default();
        let schedules = vec![
            &env,
            UnlockSchedule {
                total_amount: 1_000,
                duration: 100,
                start_time: 0,
                released: 0,
            },
            UnlockSchedule {
                total_amount: 500,
                duration: 200,
                start_time: 50,
                released: 0,
            },
        ];

        assert_eq!(released_as_of(&schedules, 0), 0);
        // first schedule half way, second not started
        assert_eq!(released_as_of(&schedules, 50), 500);
        // 1000 + 125
        assert_eq!(released_as_of(&schedules, 100), 1_000 + 125);
        // both saturated
        assert_eq!(released_as_of(&schedules, 250), 1_500);
        assert_eq!(released_as_of(&schedules, u64::MAX), 1_500);
    }

    #[test]
    fn released_as_of_is_monotonic() {
        let env = Env::default();
        let schedules = vec![
            &env,
            UnlockSchedule {
                total_amount: 1_875,
                duration: TWO_WEEKS,
                start_time: 1_000,
                released: 0,
            },
        ];

        let mut last = 0;
        for now in (0..TWO_WEEKS * 2).step_by(ONE_DAY as usize) {
            let released = released_as_of(&schedules, now);
            assert!(released >= last);
            last = released;
        }
        assert_eq!(last, 1_875);
    }

    #[test]
    fn zero_duration_schedule_releases_instantly() {
        let env = Env::default();
        let schedules = vec![
            &env,
            UnlockSchedule {
                total_amount: 777,
                duration: 0,
                start_time: 500,
                released: 0,
            },
        ];

        assert_eq!(released_as_of(&schedules, 500), 777);
        assert!(schedules.get(0).unwrap().is_fully_released(500));
    }

    #[test_case(0, 0; "fresh stake starts at bonus_start")]
    #[test_case(TWO_WEEKS / 2, 500; "half the period gives half the ramp")]
    #[test_case(TWO_WEEKS, 1_000; "full period saturates")]
    #[test_case(TWO_WEEKS * 10, 1_000; "never exceeds the scale")]
    fn bonus_multiplier_ramp(elapsed: u64, expected: u128) {
        let env = Env::default();
        let config = test_config(&env);
        let position = StakePosition {
            amount: 100,
            deposit_time: 1_000,
        };

        assert_eq!(bonus_multiplier(&config, &position, 1_000 + elapsed), expected);
    }

    #[test]
    fn bonus_multiplier_respects_start_floor() {
        let env = Env::default();
        let mut config = test_config(&env);
        // 0.4 at three decimals, ramping over one year
        config.bonus_start = 400;
        config.bonus_period = 365 * ONE_DAY;
        let position = StakePosition {
            amount: 100,
            deposit_time: 0,
        };

        assert_eq!(bonus_multiplier(&config, &position, 0), 400);
        let half = bonus_multiplier(&config, &position, config.bonus_period / 2);
        assert_eq!(half, 700);
        assert_eq!(
            bonus_multiplier(&config, &position, config.bonus_period),
            1_000
        );
    }

    #[test]
    fn merged_deposit_time_is_amount_weighted() {
        let position = StakePosition {
            amount: 100,
            deposit_time: 1_000,
        };
        // equal top-up lands exactly between the two deposit times
        assert_eq!(merged_deposit_time(&position, 100, 2_000), 1_500);
        // a large top-up pulls the clock towards now
        assert_eq!(merged_deposit_time(&position, 300, 2_000), 1_750);
    }

    #[test]
    fn merging_never_rewinds_the_clock() {
        // the merged clock never moves before the old one (top-ups can only
        // dilute seasoning, not add to it)
        let position = StakePosition {
            amount: 1_000,
            deposit_time: 5_000,
        };
        for amount in [1i128, 10, 1_000, 100_000] {
            let merged = merged_deposit_time(&position, amount, 9_000);
            assert!(merged >= 5_000);
            assert!(merged <= 9_000);
        }
    }

    #[test]
    fn pending_rewards_splits_pro_rata() {
        // 25% / 75% weights over 1000 released
        assert_eq!(pending_rewards(1_000, 100, 400, 0, 0), 250);
        assert_eq!(pending_rewards(1_000, 300, 400, 0, 0), 750);
    }

    #[test]
    fn pending_rewards_subtracts_already_paid() {
        assert_eq!(pending_rewards(1_000, 1, 1, 400, 400), 600);
        // fully caught up
        assert_eq!(pending_rewards(1_000, 1, 1, 1_000, 1_000), 0);
    }

    #[test]
    fn pending_rewards_never_goes_negative() {
        // entitlement shrank below what was already paid out - owed floors
        // at zero instead of clawing back
        assert_eq!(pending_rewards(1_000, 100, 400, 900, 900), 0);
    }

    #[test]
    fn pending_rewards_clamped_by_pool_payouts() {
        // a sole staker joining after 600 of 1000 were already paid to
        // earlier participants can only take what is left
        assert_eq!(pending_rewards(1_000, 1, 1, 0, 600), 400);
    }

    #[test]
    fn pending_rewards_empty_pool_pays_nothing() {
        assert_eq!(pending_rewards(1_000, 0, 0, 0, 0), 0);
    }

    #[test]
    fn split_fee_takes_bps_of_reward() {
        let (payout, fee) = split_fee(10_000, 200);
        assert_eq!(payout, 9_800);
        assert_eq!(fee, 200);

        let (payout, fee) = split_fee(10_000, 0);
        assert_eq!(payout, 10_000);
        assert_eq!(fee, 0);
    }

    #[test]
    fn split_fee_rounds_in_favor_of_user() {
        let (payout, fee) = split_fee(99, 100);
        assert_eq!(fee, 0);
        assert_eq!(payout, 99);
    }

    #[test]
    fn stake_weight_scales_with_bonus() {
        let env = Env::default();
        let config = test_config(&env);
        let position = StakePosition {
            amount: 100,
            deposit_time: 0,
        };

        assert_eq!(stake_weight(&config, &position, 0), 0);
        assert_eq!(stake_weight(&config, &position, TWO_WEEKS / 2), 100 * 500);
        assert_eq!(stake_weight(&config, &position, TWO_WEEKS), 100 * 1_000);
    }
}
