//! Meridian - Governance DAO (Soroban)
//! Construction surface of the DAO: binds the governance token and the
//! timelock gate and persists the governor configuration. The proposal and
//! voting machinery itself lives in the externally-owned governor; the wiring
//! only needs this contract's address and configuration.

#![no_std]
use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, String};

// ============================================================
// Data Types
// ============================================================

#[contracttype]
#[derive(Clone)]
pub struct GovernorSettings {
    pub quorum_fraction: u32, // percent of supply that must vote in favor
    pub voting_delay: u64,    // blocks between proposal and voting start
    pub voting_period: u64,   // seconds a proposal stays open
}

// ============================================================
// Storage Keys
// ============================================================

#[contracttype]
pub enum DataKey {
    Token,
    Timelock,
    Name,
    Settings,
}

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;

// ============================================================
// Contract
// ============================================================

#[contract]
pub struct GovernanceDaoContract;

#[contractimpl]
impl GovernanceDaoContract {
    pub fn initialize(
        env: Env,
        token: Address,
        timelock: Address,
        name: String,
        quorum_fraction: u32,
        voting_delay: u64,
        voting_period: u64,
    ) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        if env.storage().instance().has(&DataKey::Token) {
            panic!("already initialized");
        }

        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::Timelock, &timelock);
        env.storage().instance().set(&DataKey::Name, &name);
        env.storage().instance().set(
            &DataKey::Settings,
            &GovernorSettings {
                quorum_fraction,
                voting_delay,
                voting_period,
            },
        );
    }

    /// Get governance token address
    pub fn token(env: Env) -> Address {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage().instance().get(&DataKey::Token).unwrap()
    }

    /// Get timelock gate address
    pub fn timelock(env: Env) -> Address {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage().instance().get(&DataKey::Timelock).unwrap()
    }

    /// Get DAO name
    pub fn name(env: Env) -> String {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage().instance().get(&DataKey::Name).unwrap()
    }

    /// Get governor configuration
    pub fn settings(env: Env) -> GovernorSettings {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage().instance().get(&DataKey::Settings).unwrap()
    }
}
