//! Meridian - Timelock Controller (Soroban)
//! Delay-enforcing execution gate: operations are scheduled by proposers,
//! mature after a minimum delay and are then invoked on their target contract
//! by an executor. Granting EXECUTOR_ROLE to the zero-identity placeholder
//! opens execution to any caller.
//!
//! Events:
//! - ("timelock", "queued"): [id: u64, proposer: Address]
//! - ("timelock", "executed"): [id: u64]
//! - ("timelock", "cancelled"): [id: u64]
//! - ("timelock", "delay"): [new_delay: u64]
//! - ("role", "grant" | "revoke" | "renounce"): [role: BytesN<32>, account: Address]

#![no_std]
use meridian_common_roles as roles;
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, BytesN, Env, Symbol, TryFromVal,
    Val, Vec,
};

// ============================================================
// Data Types
// ============================================================

#[contracttype]
#[derive(Clone, Debug, PartialEq)]
pub enum OperationStatus {
    Queued,
    Executed,
    Cancelled,
}

#[contracttype]
#[derive(Clone)]
pub struct Operation {
    pub id: u64,
    pub proposer: Address,
    pub target: Address,
    pub function: Symbol,
    pub args: Vec<Val>,
    pub eta: u64, // Earliest time of execution (timestamp)
    pub status: OperationStatus,
    pub queued_at: u64,
    pub executed_at: Option<u64>,
}

// ============================================================
// Storage Keys
// ============================================================

#[contracttype]
pub enum DataKey {
    MinDelay,
    OpCounter,
    Operation(u64),
    Role(BytesN<32>, Address),
}

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 120_960;
const PERSISTENT_BUMP_AMOUNT: u32 = 1_051_200;

// ============================================================
// Contract
// ============================================================

#[contract]
pub struct TimelockControllerContract;

fn ensure_role(env: &Env, role: &BytesN<32>, account: &Address) {
    if !roles::has(env, &DataKey::Role(role.clone(), account.clone())) {
        panic!("unauthorized");
    }
}

fn set_min_delay(env: &Env, new_delay: u64) {
    env.storage().instance().set(&DataKey::MinDelay, &new_delay);

    env.events().publish(
        (symbol_short!("timelock"), symbol_short!("delay")),
        new_delay,
    );
}

/// Self-targeted operations cannot go through `invoke_contract` (the host
/// forbids re-entry); the gate's own administrative surface is dispatched
/// here. Self-call argument conventions: `update_delay` takes `[new_delay:
/// u64]`, `grant_role` and `revoke_role` take `[role: BytesN<32>, account:
/// Address]` — the executed operation itself is the authorization, so there
/// is no caller argument.
fn apply_self_call(env: &Env, function: &Symbol, args: &Vec<Val>) {
    if *function == Symbol::new(env, "update_delay") {
        let new_delay = args
            .get(0)
            .and_then(|v| u64::try_from_val(env, &v).ok())
            .expect("invalid args");
        set_min_delay(env, new_delay);
    } else if *function == Symbol::new(env, "grant_role") {
        let (role, account) = role_args(env, args);
        roles::grant(env, &DataKey::Role(role.clone(), account.clone()));
        env.events().publish(
            (symbol_short!("role"), symbol_short!("grant")),
            (role, account),
        );
    } else if *function == Symbol::new(env, "revoke_role") {
        let (role, account) = role_args(env, args);
        roles::revoke(env, &DataKey::Role(role.clone(), account.clone()));
        env.events().publish(
            (symbol_short!("role"), symbol_short!("revoke")),
            (role, account),
        );
    } else {
        panic!("unknown self call");
    }
}

fn role_args(env: &Env, args: &Vec<Val>) -> (BytesN<32>, Address) {
    let role = args
        .get(0)
        .and_then(|v| BytesN::try_from_val(env, &v).ok())
        .expect("invalid args");
    let account = args
        .get(1)
        .and_then(|v| Address::try_from_val(env, &v).ok())
        .expect("invalid args");
    (role, account)
}

fn write_operation(env: &Env, op: &Operation) {
    let key = DataKey::Operation(op.id);
    env.storage().persistent().set(&key, op);
    env.storage().persistent().extend_ttl(
        &key,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

#[contractimpl]
impl TimelockControllerContract {
    /// Set up the gate. The admin role also goes to the contract itself, so
    /// later delay updates can only arrive through an executed operation.
    pub fn initialize(
        env: Env,
        admin: Address,
        min_delay: u64,
        proposers: Vec<Address>,
        executors: Vec<Address>,
    ) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        if env.storage().instance().has(&DataKey::MinDelay) {
            panic!("already initialized");
        }
        admin.require_auth();

        env.storage().instance().set(&DataKey::MinDelay, &min_delay);
        env.storage().instance().set(&DataKey::OpCounter, &0u64);

        let admin_role = roles::timelock_admin_role(&env);
        roles::grant(&env, &DataKey::Role(admin_role.clone(), admin));
        roles::grant(
            &env,
            &DataKey::Role(admin_role, env.current_contract_address()),
        );
        for proposer in proposers.iter() {
            roles::grant(&env, &DataKey::Role(roles::proposer_role(&env), proposer));
        }
        for executor in executors.iter() {
            roles::grant(&env, &DataKey::Role(roles::executor_role(&env), executor));
        }
    }

    /// Queue a call for later execution. Caller must hold PROPOSER_ROLE and
    /// the delay must be at least the configured minimum.
    pub fn schedule(
        env: Env,
        proposer: Address,
        target: Address,
        function: Symbol,
        args: Vec<Val>,
        delay: u64,
    ) -> u64 {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        proposer.require_auth();
        ensure_role(&env, &roles::proposer_role(&env), &proposer);

        let min_delay: u64 = env.storage().instance().get(&DataKey::MinDelay).unwrap();
        if delay < min_delay {
            panic!("insufficient delay");
        }

        let counter: u64 = env
            .storage()
            .instance()
            .get(&DataKey::OpCounter)
            .unwrap_or(0);
        let id = counter + 1;
        let now = env.ledger().timestamp();

        let op = Operation {
            id,
            proposer: proposer.clone(),
            target,
            function,
            args,
            eta: now + delay,
            status: OperationStatus::Queued,
            queued_at: now,
            executed_at: None,
        };

        write_operation(&env, &op);
        env.storage().instance().set(&DataKey::OpCounter, &id);

        env.events().publish(
            (symbol_short!("timelock"), symbol_short!("queued")),
            (id, proposer),
        );

        id
    }

    /// Invoke a matured operation on its target. Caller must hold
    /// EXECUTOR_ROLE unless the role is held by the zero-identity
    /// placeholder, in which case anyone may execute.
    pub fn execute(env: Env, executor: Address, id: u64) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        executor.require_auth();

        let executor_role = roles::executor_role(&env);
        let open = roles::has(
            &env,
            &DataKey::Role(executor_role.clone(), roles::anyone(&env)),
        );
        if !open {
            ensure_role(&env, &executor_role, &executor);
        }

        let mut op: Operation = env
            .storage()
            .persistent()
            .get(&DataKey::Operation(id))
            .expect("operation not found");

        if op.status != OperationStatus::Queued {
            panic!("operation not queued");
        }

        let now = env.ledger().timestamp();
        if now < op.eta {
            panic!("timelock not ready");
        }

        op.status = OperationStatus::Executed;
        op.executed_at = Some(now);
        write_operation(&env, &op);

        // The host forbids contract re-entry, so operations targeting the
        // gate itself are applied in-process instead of invoked.
        if op.target == env.current_contract_address() {
            apply_self_call(&env, &op.function, &op.args);
        } else {
            env.invoke_contract::<Val>(&op.target, &op.function, op.args.clone());
        }

        env.events().publish(
            (symbol_short!("timelock"), symbol_short!("executed")),
            id,
        );
    }

    /// Cancel a queued operation. Caller must hold PROPOSER_ROLE.
    pub fn cancel(env: Env, proposer: Address, id: u64) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        proposer.require_auth();
        ensure_role(&env, &roles::proposer_role(&env), &proposer);

        let mut op: Operation = env
            .storage()
            .persistent()
            .get(&DataKey::Operation(id))
            .expect("operation not found");

        if op.status != OperationStatus::Queued {
            panic!("operation not queued");
        }

        op.status = OperationStatus::Cancelled;
        write_operation(&env, &op);

        env.events().publish(
            (symbol_short!("timelock"), symbol_short!("cancelled")),
            id,
        );
    }

    /// Grant `role` to `account`. Caller must hold TIMELOCK_ADMIN_ROLE.
    pub fn grant_role(env: Env, caller: Address, role: BytesN<32>, account: Address) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        caller.require_auth();
        ensure_role(&env, &roles::timelock_admin_role(&env), &caller);

        roles::grant(&env, &DataKey::Role(role.clone(), account.clone()));

        env.events().publish(
            (symbol_short!("role"), symbol_short!("grant")),
            (role, account),
        );
    }

    /// Revoke `role` from `account`. Caller must hold TIMELOCK_ADMIN_ROLE.
    pub fn revoke_role(env: Env, caller: Address, role: BytesN<32>, account: Address) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        caller.require_auth();
        ensure_role(&env, &roles::timelock_admin_role(&env), &caller);

        roles::revoke(&env, &DataKey::Role(role.clone(), account.clone()));

        env.events().publish(
            (symbol_short!("role"), symbol_short!("revoke")),
            (role, account),
        );
    }

    /// Drop one of the caller's own roles. Always succeeds.
    pub fn renounce_role(env: Env, caller: Address, role: BytesN<32>) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        caller.require_auth();

        roles::revoke(&env, &DataKey::Role(role.clone(), caller.clone()));

        env.events().publish(
            (symbol_short!("role"), symbol_short!("renounce")),
            (role, caller),
        );
    }

    /// Check role membership
    pub fn has_role(env: Env, role: BytesN<32>, account: Address) -> bool {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        roles::has(&env, &DataKey::Role(role, account))
    }

    /// Get the minimum schedule delay in seconds
    pub fn min_delay(env: Env) -> u64 {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage().instance().get(&DataKey::MinDelay).unwrap()
    }

    pub fn get_operation(env: Env, id: u64) -> Option<Operation> {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage().persistent().get(&DataKey::Operation(id))
    }

    pub fn is_ready(env: Env, id: u64) -> bool {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        if let Some(op) = env
            .storage()
            .persistent()
            .get::<DataKey, Operation>(&DataKey::Operation(id))
        {
            op.status == OperationStatus::Queued && env.ledger().timestamp() >= op.eta
        } else {
            false
        }
    }
}
