//! Meridian - Token Migrator (Soroban)
//! One-way conversion between two role-gated ledgers at a fixed 18-decimal
//! rate: burns from the source ledger, mints the converted amount into the
//! destination ledger, for the caller only.
//!
//! Events:
//! - ("migrated",): [account: Address, destination_amount: i128]

#![no_std]
use meridian_common_roles as roles;
use meridian_governance_token::GovernanceTokenContractClient;
use soroban_sdk::{contract, contractimpl, contracttype, symbol_short, Address, Env};

/// 18-decimal fixed-point scale of the migration rate.
pub const RATE_SCALE: i128 = 1_000_000_000_000_000_000;

// ============================================================
// Storage Keys
// ============================================================

#[contracttype]
pub enum DataKey {
    Source,
    Destination,
    MigrationRate,
}

const INSTANCE_LIFETIME_THRESHOLD: u32 = 17_280;
const INSTANCE_BUMP_AMOUNT: u32 = 86_400;

// ============================================================
// Contract
// ============================================================

#[contract]
pub struct TokenMigratorContract;

#[contractimpl]
impl TokenMigratorContract {
    /// Bind the migrator to a source ledger, a destination ledger and a
    /// fixed-point conversion rate. All three are immutable afterwards.
    pub fn initialize(env: Env, source: Address, destination: Address, migration_rate: i128) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        if env.storage().instance().has(&DataKey::Source) {
            panic!("already initialized");
        }
        if migration_rate < 0 {
            panic!("invalid amount");
        }
        env.storage().instance().set(&DataKey::Source, &source);
        env.storage()
            .instance()
            .set(&DataKey::Destination, &destination);
        env.storage()
            .instance()
            .set(&DataKey::MigrationRate, &migration_rate);
    }

    /// Get source ledger address
    pub fn source(env: Env) -> Address {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage().instance().get(&DataKey::Source).unwrap()
    }

    /// Get destination ledger address
    pub fn destination(env: Env) -> Address {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage().instance().get(&DataKey::Destination).unwrap()
    }

    /// Get fixed-point migration rate
    pub fn migration_rate(env: Env) -> i128 {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        env.storage()
            .instance()
            .get(&DataKey::MigrationRate)
            .unwrap()
    }

    /// Convert `amount` of the caller's source-ledger balance into
    /// `amount * rate / 10^18` (floored) on the destination ledger. The
    /// migrator must hold BURNER_ROLE on the source and MINTER_ROLE on the
    /// destination; a single "not authorized" covers either missing grant.
    pub fn migrate(env: Env, caller: Address, amount: i128) {
        env.storage()
            .instance()
            .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
        caller.require_auth();

        if amount < 0 {
            panic!("invalid amount");
        }

        let source: Address = env.storage().instance().get(&DataKey::Source).unwrap();
        let destination: Address = env.storage().instance().get(&DataKey::Destination).unwrap();
        let rate: i128 = env
            .storage()
            .instance()
            .get(&DataKey::MigrationRate)
            .unwrap();

        let me = env.current_contract_address();
        let src = GovernanceTokenContractClient::new(&env, &source);
        let dst = GovernanceTokenContractClient::new(&env, &destination);

        if !src.has_role(&roles::burner_role(&env), &me)
            || !dst.has_role(&roles::minter_role(&env), &me)
        {
            panic!("not authorized");
        }

        // Floor division: conversion never rounds in the caller's favor.
        let dest_amount = amount * rate / RATE_SCALE;

        src.burn(&me, &caller, &amount);
        dst.mint(&me, &caller, &dest_amount);

        env.events()
            .publish((symbol_short!("migrated"),), (caller, dest_amount));
    }
}

mod test;
