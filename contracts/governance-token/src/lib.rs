//! Meridian - Governance Token (Soroban)
//! Account-balance ledger with keccak-derived role gates on mint and burn.
//! Transfers to the token contract's own address are always rejected.
//!
//! Events:
//! - ("mint",): [to: Address, amount: i128]
//! - ("burn",): [from: Address, amount: i128]
//! - ("transfer",): [from: Address, to: Address, amount: i128]
//! - ("role", "grant" | "revoke" | "renounce"): [role: BytesN<32>, account: Address]

#![no_std]
use meridian_common_roles as roles;
use soroban_sdk::{
    contract, contractimpl, contracttype, symbol_short, Address, BytesN, Env, String,
};

// ============================================================
// Data Types
// ============================================================

#[contracttype]
#[derive(Clone)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u32,
}

// ============================================================
// Storage Keys
// ============================================================

#[contracttype]
pub enum DataKey {
    Metadata,
    TotalSupply,
    Balance(Address),
    Role(BytesN<32>, Address),
}

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 34_560;
const PERSISTENT_BUMP_AMOUNT: u32 = 259_200;

// ============================================================
// Contract
// ============================================================

#[contract]
pub struct GovernanceTokenContract;

fn read_balance(env: &Env, account: &Address) -> i128 {
    env.storage()
        .persistent()
        .get(&DataKey::Balance(account.clone()))
        .unwrap_or(0)
}

fn write_balance(env: &Env, account: &Address, amount: i128) {
    let key = DataKey::Balance(account.clone());
    env.storage().persistent().set(&key, &amount);
    env.storage().persistent().extend_ttl(
        &key,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

fn ensure_role(env: &Env, role: &BytesN<32>, account: &Address) {
    if !roles::has(env, &DataKey::Role(role.clone(), account.clone())) {
        panic!("unauthorized");
    }
}

#[contractimpl]
impl GovernanceTokenContract {
    /// Initialize the ledger. `admin` receives the all-zero admin role and,
    /// when `initial_supply > 0`, the whole initial balance.
    pub fn initialize(
        env: Env,
        admin: Address,
        name: String,
        symbol: String,
        initial_supply: i128,
    ) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        if env.storage().instance().has(&DataKey::Metadata) {
            panic!("already initialized");
        }
        admin.require_auth();

        if initial_supply < 0 {
            panic!("invalid amount");
        }

        let metadata = TokenMetadata {
            name,
            symbol,
            decimals: 18,
        };
        env.storage().instance().set(&DataKey::Metadata, &metadata);
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &initial_supply);

        roles::grant(
            &env,
            &DataKey::Role(roles::default_admin_role(&env), admin.clone()),
        );

        if initial_supply > 0 {
            write_balance(&env, &admin, initial_supply);
            // Indexers learn about the genesis supply the same way as any
            // later mint.
            env.events()
                .publish((symbol_short!("mint"),), (admin, initial_supply));
        }
    }

    /// Get token name
    pub fn name(env: Env) -> String {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        let meta: TokenMetadata = env.storage().instance().get(&DataKey::Metadata).unwrap();
        meta.name
    }

    /// Get token symbol
    pub fn symbol(env: Env) -> String {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        let meta: TokenMetadata = env.storage().instance().get(&DataKey::Metadata).unwrap();
        meta.symbol
    }

    /// Get token decimals
    pub fn decimals(env: Env) -> u32 {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        let meta: TokenMetadata = env.storage().instance().get(&DataKey::Metadata).unwrap();
        meta.decimals
    }

    /// Get balance of an address
    pub fn balance(env: Env, account: Address) -> i128 {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        read_balance(&env, &account)
    }

    /// Get total supply
    pub fn total_supply(env: Env) -> i128 {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0)
    }

    /// Mint new tokens. Caller must hold MINTER_ROLE.
    pub fn mint(env: Env, caller: Address, to: Address, amount: i128) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        caller.require_auth();
        ensure_role(&env, &roles::minter_role(&env), &caller);

        if amount < 0 {
            panic!("invalid amount");
        }

        write_balance(&env, &to, read_balance(&env, &to) + amount);

        let supply: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &(supply + amount));

        env.events()
            .publish((symbol_short!("mint"),), (to, amount));
    }

    /// Burn tokens from an account. Caller must hold BURNER_ROLE.
    pub fn burn(env: Env, caller: Address, from: Address, amount: i128) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        caller.require_auth();
        ensure_role(&env, &roles::burner_role(&env), &caller);

        if amount < 0 {
            panic!("invalid amount");
        }

        let balance = read_balance(&env, &from);
        if balance < amount {
            panic!("insufficient balance");
        }

        write_balance(&env, &from, balance - amount);

        let supply: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalSupply)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::TotalSupply, &(supply - amount));

        env.events()
            .publish((symbol_short!("burn"),), (from, amount));
    }

    /// Transfer tokens. The token contract's own address is never a valid
    /// destination, whatever the amount.
    pub fn transfer(env: Env, from: Address, to: Address, amount: i128) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        from.require_auth();

        if to == env.current_contract_address() {
            panic!("self transfer forbidden");
        }
        if amount < 0 {
            panic!("invalid amount");
        }

        let from_balance = read_balance(&env, &from);
        if from_balance < amount {
            panic!("insufficient balance");
        }

        write_balance(&env, &from, from_balance - amount);
        write_balance(&env, &to, read_balance(&env, &to) + amount);

        env.events()
            .publish((symbol_short!("transfer"),), (from, to, amount));
    }

    /// Grant `role` to `account`. Caller must hold the all-zero admin role.
    pub fn grant_role(env: Env, caller: Address, role: BytesN<32>, account: Address) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        caller.require_auth();
        ensure_role(&env, &roles::default_admin_role(&env), &caller);

        roles::grant(&env, &DataKey::Role(role.clone(), account.clone()));

        env.events().publish(
            (symbol_short!("role"), symbol_short!("grant")),
            (role, account),
        );
    }

    /// Revoke `role` from `account`. Caller must hold the all-zero admin role.
    pub fn revoke_role(env: Env, caller: Address, role: BytesN<32>, account: Address) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        caller.require_auth();
        ensure_role(&env, &roles::default_admin_role(&env), &caller);

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
}
