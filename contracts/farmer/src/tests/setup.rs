use soroban_sdk::{testutils::Address as _, token, Address, Env};

use harvest_farm::contract::{Farm, FarmClient};

use crate::contract::{Farmer, FarmerClient};

pub const ONE_DAY: u64 = 86_400;
pub const ONE_WEEK: u64 = 7 * ONE_DAY;
pub const TWO_WEEKS: u64 = 2 * ONE_WEEK;

pub const FEE_BPS: i64 = 200;
pub const MAX_UNLOCK_SCHEDULES: u32 = 40;
pub const INITIAL_SHARES_PER_TOKEN: i128 = 1;
pub const BONUS_START: u64 = 0;
pub const BONUS_DECIMALS: u32 = 3;

pub fn deploy_token_contract<'a>(
    env: &Env,
    admin: &Address,
) -> (token::Client<'a>, token::StellarAssetClient<'a>) {
    let contract_address = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    (
        token::Client::new(env, &contract_address),
        token::StellarAssetClient::new(env, &contract_address),
    )
}

pub fn deploy_farmer_contract<'a>(env: &Env, admin: &Address) -> FarmerClient<'a> {
    let farmer = FarmerClient::new(env, &env.register_contract(None, Farmer {}));
    farmer.initialize(admin);
    farmer
}

/// One stake token with its farm and receipt token, wired to the router.
pub struct FarmSetup<'a> {
    pub stake_token: token::Client<'a>,
    pub stake_token_admin: token::StellarAssetClient<'a>,
    pub receipt_token: token::Client<'a>,
    pub farm: FarmClient<'a>,
}

/// Deploys a stake token, its receipt token and a farm gated on the given
/// router, and registers the farm with the router.
pub fn deploy_farm_for_new_token<'a>(
    env: &Env,
    admin: &Address,
    farmer: &FarmerClient,
    reward_token: &Address,
    fee_recipient: &Address,
) -> FarmSetup<'a> {
    let (stake_token, stake_token_admin) = deploy_token_contract(env, admin);

    let farm = FarmClient::new(env, &env.register_contract(None, Farm {}));
    let receipt_address = env
        .register_stellar_asset_contract_v2(admin.clone())
        .address();
    token::StellarAssetClient::new(env, &receipt_address).set_admin(&farm.address);

    farm.initialize(
        admin,
        &stake_token.address,
        reward_token,
        &receipt_address,
        &farmer.address,
        fee_recipient,
        &FEE_BPS,
        &MAX_UNLOCK_SCHEDULES,
        &INITIAL_SHARES_PER_TOKEN,
        &BONUS_START,
        &BONUS_DECIMALS,
        &TWO_WEEKS,
    );

    farmer.add_farm(admin, &stake_token.address, &farm.address);

    FarmSetup {
        stake_token,
        stake_token_admin,
        receipt_token: token::Client::new(env, &receipt_address),
        farm,
    }
}
