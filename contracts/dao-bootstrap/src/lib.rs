//! Meridian - DAO Bootstrap (Soroban)
//! One-shot deploy-time handshake that hands a ledger and its execution gate
//! over to DAO governance. Runs as a single host transaction, so a failure in
//! any step unwinds the whole sequence and never reaches renunciation. The
//! deployer authorizes every nested grant, schedule and renounce call.
//!
//! Events:
//! - ("bootstrap", "done"): [token: Address, timelock: Address, dao: Address]

#![no_std]
use meridian_common_roles as roles;
use meridian_governance_token::GovernanceTokenContractClient;
use meridian_timelock_controller::TimelockControllerContractClient;
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, vec, Address, Env, IntoVal, Symbol,
};

#[contracttype]
pub enum DataKey {
    Done,
}

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;

#[contract]
pub struct DaoBootstrapContract;

/// The DAO becomes the only proposer; execution is opened to anyone via the
/// zero-identity placeholder; the gate becomes the token's admin.
fn grant_governance_roles(
    env: &Env,
    deployer: &Address,
    token: &GovernanceTokenContractClient,
    timelock: &TimelockControllerContractClient,
    dao: &Address,
) {
    timelock.grant_role(deployer, &roles::proposer_role(env), dao);
    timelock.grant_role(deployer, &roles::executor_role(env), &roles::anyone(env));
    token.grant_role(deployer, &roles::default_admin_role(env), &timelock.address);
}

/// Schedule the real minimum delay on the gate and execute it immediately,
/// while the gate is still at delay zero and the deployer still proposes and
/// executes.
fn apply_min_delay(
    env: &Env,
    deployer: &Address,
    timelock: &TimelockControllerContractClient,
    min_delay: u64,
) {
    let args = vec![env, min_delay.into_val(env)];
    let id = timelock.schedule(
        deployer,
        &timelock.address,
        &Symbol::new(env, "update_delay"),
        &args,
        &0u64,
    );
    timelock.execute(deployer, &id);
}

/// The irreversible handoff: the deployer drops every privileged role it
/// still holds on the gate and the token.
fn renounce_deployer_roles(
    env: &Env,
    deployer: &Address,
    token: &GovernanceTokenContractClient,
    timelock: &TimelockControllerContractClient,
) {
    timelock.renounce_role(deployer, &roles::timelock_admin_role(env));
    timelock.renounce_role(deployer, &roles::proposer_role(env));
    timelock.renounce_role(deployer, &roles::executor_role(env));
    token.renounce_role(deployer, &roles::default_admin_role(env));
}

#[contractimpl]
impl DaoBootstrapContract {
    /// Wire a deployed token, timelock gate and DAO together and lock the
    /// deployer out. Preconditions: the deployer initialized the gate with
    /// `min_delay = 0` and itself as admin, sole proposer and sole executor,
    /// and holds the token's admin role.
    pub fn run(
        env: Env,
        deployer: Address,
        token: Address,
        timelock: Address,
        dao: Address,
        min_delay: u64,
    ) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        if env.storage().instance().has(&DataKey::Done) {
            panic!("already bootstrapped");
        }
        deployer.require_auth();

        let token_client = GovernanceTokenContractClient::new(&env, &token);
        let timelock_client = TimelockControllerContractClient::new(&env, &timelock);

        grant_governance_roles(&env, &deployer, &token_client, &timelock_client, &dao);
        apply_min_delay(&env, &deployer, &timelock_client, min_delay);
        renounce_deployer_roles(&env, &deployer, &token_client, &timelock_client);

        env.storage().instance().set(&DataKey::Done, &true);

        env.events().publish(
            (symbol_short!("bootstrap"), symbol_short!("done")),
            (token, timelock, dao),
        );
    }

    pub fn is_done(env: Env) -> bool {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage().instance().get(&DataKey::Done).unwrap_or(false)
    }
}
