//! Meridian - Shared role table helpers (Soroban)
//! Role-identifier derivation and role-set storage operations used by every
//! role-gated Meridian contract.

#![no_std]
use soroban_sdk::{Address, Bytes, BytesN, Env, IntoVal, TryFromVal, Val};

const PERSISTENT_LIFETIME_THRESHOLD: u32 = 34_560;
const PERSISTENT_BUMP_AMOUNT: u32 = 259_200;

/// Open-role placeholder: granting a role to this account opens it to anyone.
pub const ANYONE: &str = "GAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAWHF";

/// Derive a 32-byte role identifier from a role name, keccak-256 over the
/// ASCII bytes. Identical derivation to existing deployed ledgers, so grants
/// interoperate (e.g. role_id("MINTER_ROLE") == 0x9f2d..56a6).
pub fn role_id(env: &Env, name: &str) -> BytesN<32> {
    let preimage = Bytes::from_slice(env, name.as_bytes());
    env.crypto().keccak256(&preimage).into()
}

/// The all-zero admin role identifier.
pub fn default_admin_role(env: &Env) -> BytesN<32> {
    BytesN::from_array(env, &[0u8; 32])
}

pub fn minter_role(env: &Env) -> BytesN<32> {
    role_id(env, "MINTER_ROLE")
}

pub fn burner_role(env: &Env) -> BytesN<32> {
    role_id(env, "BURNER_ROLE")
}

pub fn proposer_role(env: &Env) -> BytesN<32> {
    role_id(env, "PROPOSER_ROLE")
}

pub fn executor_role(env: &Env) -> BytesN<32> {
    role_id(env, "EXECUTOR_ROLE")
}

pub fn timelock_admin_role(env: &Env) -> BytesN<32> {
    role_id(env, "TIMELOCK_ADMIN_ROLE")
}

/// The zero-identity placeholder account.
pub fn anyone(env: &Env) -> Address {
    Address::from_str(env, ANYONE)
}

pub fn has<K>(env: &Env, key: &K) -> bool
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val>,
{
    env.storage().persistent().get(key).unwrap_or(false)
}

pub fn grant<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val>,
{
    env.storage().persistent().set(key, &true);
    env.storage().persistent().extend_ttl(
        key,
        PERSISTENT_LIFETIME_THRESHOLD,
        PERSISTENT_BUMP_AMOUNT,
    );
}

pub fn revoke<K>(env: &Env, key: &K)
where
    K: IntoVal<Env, Val> + TryFromVal<Env, Val>,
{
    env.storage().persistent().remove(key);
}
