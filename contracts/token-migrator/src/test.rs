#![cfg(test)]
use super::*;
use meridian_governance_token::{GovernanceTokenContract, GovernanceTokenContractClient};
use soroban_sdk::{
    testutils::{Address as _, Events as _},
    vec, Address, Env, IntoVal, String,
};

const INITIAL_SUPPLY: i128 = 10_000;
const MIGRATION_RATE: i128 = 100 * RATE_SCALE;
const MINT_AMOUNT: i128 = 1_500;
const MIGRATION_AMOUNT: i128 = 600;

struct Setup<'a> {
    source: GovernanceTokenContractClient<'a>,
    destination: GovernanceTokenContractClient<'a>,
    migrator: TokenMigratorContractClient<'a>,
    deployer: Address,
    migrant: Address,
}

fn token<'a>(env: &'a Env, admin: &Address, supply: i128) -> GovernanceTokenContractClient<'a> {
    let id = env.register_contract(None, GovernanceTokenContract);
    let c = GovernanceTokenContractClient::new(env, &id);
    c.initialize(
        admin,
        &String::from_str(env, "NAME"),
        &String::from_str(env, "SYMBOL"),
        &supply,
    );
    c
}

fn setup(env: &Env, rate: i128) -> Setup<'_> {
    let deployer = Address::generate(env);
    let migrant = Address::generate(env);

    let source = token(env, &deployer, INITIAL_SUPPLY);
    let destination = token(env, &deployer, 0);

    let id = env.register_contract(None, TokenMigratorContract);
    let migrator = TokenMigratorContractClient::new(env, &id);
    migrator.initialize(&source.address, &destination.address, &rate);

    source.grant_role(&deployer, &roles::minter_role(env), &deployer);
    source.grant_role(&deployer, &roles::burner_role(env), &migrator.address);
    destination.grant_role(&deployer, &roles::minter_role(env), &migrator.address);

    source.mint(&deployer, &migrant, &MINT_AMOUNT);

    Setup {
        source,
        destination,
        migrator,
        deployer,
        migrant,
    }
}

#[test]
fn test_constructor_args() {
    let env = Env::default();
    env.mock_all_auths();
    let s = setup(&env, MIGRATION_RATE);
    assert_eq!(s.migrator.source(), s.source.address);
    assert_eq!(s.migrator.destination(), s.destination.address);
    assert_eq!(s.migrator.migration_rate(), MIGRATION_RATE);
}

#[test]
#[should_panic(expected = "already initialized")]
fn test_initialize_twice() {
    let env = Env::default();
    env.mock_all_auths();
    let s = setup(&env, MIGRATION_RATE);
    s.migrator
        .initialize(&s.source.address, &s.destination.address, &MIGRATION_RATE);
}

#[test]
fn test_migrate() {
    let env = Env::default();
    env.mock_all_auths();
    let s = setup(&env, MIGRATION_RATE);

    let source_supply = s.source.total_supply();
    let dest_supply = s.destination.total_supply();
    let expected = MIGRATION_AMOUNT * MIGRATION_RATE / RATE_SCALE;

    s.migrator.migrate(&s.migrant, &MIGRATION_AMOUNT);

    assert_eq!(s.source.balance(&s.migrant), MINT_AMOUNT - MIGRATION_AMOUNT);
    assert_eq!(s.source.total_supply(), source_supply - MIGRATION_AMOUNT);
    assert_eq!(s.destination.balance(&s.migrant), expected);
    assert_eq!(s.destination.total_supply(), dest_supply + expected);
}

#[test]
fn test_migrate_emits_event() {
    let env = Env::default();
    env.mock_all_auths();
    let s = setup(&env, MIGRATION_RATE);
    let expected = MIGRATION_AMOUNT * MIGRATION_RATE / RATE_SCALE;

    s.migrator.migrate(&s.migrant, &MIGRATION_AMOUNT);

    let events = env.events().all();
    assert_eq!(
        events.slice(events.len() - 1..),
        vec![
            &env,
            (
                s.migrator.address.clone(),
                (symbol_short!("migrated"),).into_val(&env),
                (s.migrant.clone(), expected).into_val(&env),
            ),
        ]
    );
}

#[test]
fn test_migrate_twice_not_cumulative() {
    let env = Env::default();
    env.mock_all_auths();
    let s = setup(&env, MIGRATION_RATE);
    let expected = MIGRATION_AMOUNT * MIGRATION_RATE / RATE_SCALE;

    s.migrator.migrate(&s.migrant, &MIGRATION_AMOUNT);
    s.migrator.migrate(&s.migrant, &MIGRATION_AMOUNT);

    // The second call emits its own event with the same amount. Checked
    // first: the recorder only holds the latest invocation's events.
    let events = env.events().all();
    assert_eq!(
        events.slice(events.len() - 1..),
        vec![
            &env,
            (
                s.migrator.address.clone(),
                (symbol_short!("migrated"),).into_val(&env),
                (s.migrant.clone(), expected).into_val(&env),
            ),
        ]
    );

    assert_eq!(
        s.source.balance(&s.migrant),
        MINT_AMOUNT - 2 * MIGRATION_AMOUNT
    );
    assert_eq!(s.destination.balance(&s.migrant), 2 * expected);
}

#[test]
fn test_migrate_rounds_down() {
    let env = Env::default();
    env.mock_all_auths();
    // 1.5 destination units per source unit.
    let s = setup(&env, 3 * RATE_SCALE / 2);

    s.migrator.migrate(&s.migrant, &3i128);

    assert_eq!(s.destination.balance(&s.migrant), 4);
}

#[test]
#[should_panic]
fn test_migrate_exceeds_balance() {
    let env = Env::default();
    env.mock_all_auths();
    let s = setup(&env, MIGRATION_RATE);
    s.migrator.migrate(&s.migrant, &(MINT_AMOUNT + 1));
}

#[test]
fn test_failed_migrate_leaves_state() {
    let env = Env::default();
    env.mock_all_auths();
    let s = setup(&env, MIGRATION_RATE);

    assert!(s.migrator.try_migrate(&s.migrant, &(MINT_AMOUNT + 1)).is_err());

    assert_eq!(s.source.balance(&s.migrant), MINT_AMOUNT);
    assert_eq!(s.destination.balance(&s.migrant), 0);
    assert_eq!(s.destination.total_supply(), 0);
}

#[test]
#[should_panic(expected = "not authorized")]
fn test_migrate_without_burn_role() {
    let env = Env::default();
    env.mock_all_auths();
    let s = setup(&env, MIGRATION_RATE);
    s.source.revoke_role(
        &s.deployer,
        &roles::burner_role(&env),
        &s.migrator.address,
    );
    s.migrator.migrate(&s.migrant, &MIGRATION_AMOUNT);
}

#[test]
#[should_panic(expected = "not authorized")]
fn test_migrate_without_mint_role() {
    let env = Env::default();
    env.mock_all_auths();
    let s = setup(&env, MIGRATION_RATE);
    s.destination.revoke_role(
        &s.deployer,
        &roles::minter_role(&env),
        &s.migrator.address,
    );
    s.migrator.migrate(&s.migrant, &MIGRATION_AMOUNT);
}

#[test]
fn test_missing_role_leaves_state() {
    let env = Env::default();
    env.mock_all_auths();
    let s = setup(&env, MIGRATION_RATE);
    s.source.revoke_role(
        &s.deployer,
        &roles::burner_role(&env),
        &s.migrator.address,
    );

    assert!(s.migrator.try_migrate(&s.migrant, &MIGRATION_AMOUNT).is_err());

    assert_eq!(s.source.balance(&s.migrant), MINT_AMOUNT);
    assert_eq!(s.destination.balance(&s.migrant), 0);
}
