use super::*;
use oracle_types::instruction::OracleInstruction;
use oracle_types::principal::Principal;

const DEPLOYER: Principal = Principal([1u8; 32]);
const ALICE: Principal = Principal([2u8; 32]);

fn ctx(caller: Principal, height: u64) -> CallContext {
    CallContext { caller, height }
}

#[test]
fn test_register_oracle_always_succeeds() {
    let mut service = OracleService::new();

    assert_eq!(service.register_oracle(&ctx(DEPLOYER, 1)), Ok(true));
    assert_eq!(service.register_oracle(&ctx(DEPLOYER, 2)), Ok(true));
    assert_eq!(service.register_oracle(&ctx(ALICE, 2)), Ok(true));

    let registration = service.state().registry.registration(&DEPLOYER).unwrap();
    assert_eq!(registration.registered_at, 1);
    assert_eq!(service.state().registry.len(), 2);
}

#[test]
fn test_registered_oracle_publishes_price() {
    let mut service = OracleService::new();
    service.register_oracle(&ctx(DEPLOYER, 1)).unwrap();

    let result = service.update_price(&ctx(DEPLOYER, 2), "STX", 100, 6, "Binance");
    assert_eq!(result, Ok(true));

    let record = service.get_price("STX").unwrap();
    assert_eq!(record.symbol, "STX");
    assert_eq!(record.price, 100);
    assert_eq!(record.decimals, 6);
    assert_eq!(record.source, "Binance");
    assert_eq!(record.updated_by, DEPLOYER);
    assert_eq!(record.updated_at, 2);
}

#[test]
fn test_unregistered_caller_cannot_update() {
    let mut service = OracleService::new();

    let err = service
        .update_price(&ctx(ALICE, 1), "STX", 100, 6, "Binance")
        .unwrap_err();
    assert_eq!(err, OracleError::NotAuthorized);
    assert_eq!(err.code(), 100);
    assert!(service.get_price("STX").is_none());
}

#[test]
fn test_unregistered_caller_cannot_overwrite() {
    let mut service = OracleService::new();
    service.register_oracle(&ctx(DEPLOYER, 1)).unwrap();
    service
        .update_price(&ctx(DEPLOYER, 1), "STX", 100, 6, "Binance")
        .unwrap();
    let before = service.state().clone();

    let err = service
        .update_price(&ctx(ALICE, 2), "STX", 1, 0, "Spoofed")
        .unwrap_err();
    assert_eq!(err.code(), 100);
    assert_eq!(service.state(), &before);
}

#[test]
fn test_latest_update_replaces_record() {
    let mut service = OracleService::new();
    service.register_oracle(&ctx(DEPLOYER, 1)).unwrap();
    service
        .update_price(&ctx(DEPLOYER, 2), "STX", 100, 6, "Binance")
        .unwrap();
    service
        .update_price(&ctx(DEPLOYER, 3), "STX", 105, 6, "Coinbase")
        .unwrap();

    let record = service.get_price("STX").unwrap();
    assert_eq!(record.price, 105);
    assert_eq!(record.source, "Coinbase");
    assert_eq!(record.updated_at, 3);
    assert_eq!(service.state().prices.len(), 1);
}

#[test]
fn test_other_oracle_takes_over_provenance() {
    let mut service = OracleService::new();
    service.register_oracle(&ctx(DEPLOYER, 1)).unwrap();
    service.register_oracle(&ctx(ALICE, 1)).unwrap();
    service
        .update_price(&ctx(DEPLOYER, 2), "BTC", 90_000, 2, "Kraken")
        .unwrap();
    service
        .update_price(&ctx(ALICE, 3), "BTC", 91_000, 2, "Bybit")
        .unwrap();

    assert_eq!(service.get_price("BTC").unwrap().updated_by, ALICE);
}

#[test]
fn test_unknown_symbol_is_absent() {
    let mut service = OracleService::new();
    assert!(service.get_price("STX").is_none());
    assert!(service.get_price("").is_none());

    service.register_oracle(&ctx(DEPLOYER, 1)).unwrap();
    service
        .update_price(&ctx(DEPLOYER, 1), "STX", 100, 6, "Binance")
        .unwrap();
    assert!(service.get_price("stx").is_none());
    assert!(service.get_price("BTC").is_none());
}

#[test]
fn test_invalid_input_leaves_state_untouched() {
    let mut service = OracleService::new();
    service.register_oracle(&ctx(DEPLOYER, 1)).unwrap();
    let before = service.state().clone();

    let cases: Vec<(&str, u32, &str)> = vec![
        ("", 6, "Binance"),
        ("STX", 6, ""),
        ("STX", 19, "Binance"),
        ("STX", u32::MAX, "Binance"),
    ];

    for (symbol, decimals, source) in cases {
        let err = service
            .update_price(&ctx(DEPLOYER, 2), symbol, 100, decimals, source)
            .unwrap_err();
        assert_eq!(err.code(), 101, "{:?}", (symbol, decimals, source));
    }
    assert_eq!(service.state(), &before);
}

#[test]
fn test_decimal_bounds_inclusive() {
    let mut service = OracleService::new();
    service.register_oracle(&ctx(DEPLOYER, 1)).unwrap();

    assert!(service.update_price(&ctx(DEPLOYER, 1), "A", 0, 0, "s").is_ok());
    assert!(service.update_price(&ctx(DEPLOYER, 1), "B", u128::MAX, 18, "s").is_ok());
    assert_eq!(service.get_price("B").unwrap().decimals, 18);
}

#[test]
fn test_long_multibyte_text_is_accepted() {
    let mut service = OracleService::new();
    service.register_oracle(&ctx(DEPLOYER, 1)).unwrap();

    let symbol = "€".repeat(11);
    let source = "€".repeat(22);
    assert_eq!(
        service.update_price(&ctx(DEPLOYER, 2), &symbol, 100, 6, "Binance"),
        Ok(true)
    );
    assert_eq!(
        service.update_price(&ctx(DEPLOYER, 3), "STX", 100, 6, &source),
        Ok(true)
    );

    let long_symbol = "S".repeat(1024);
    assert_eq!(
        service.update_price(&ctx(DEPLOYER, 4), &long_symbol, 1, 0, &source),
        Ok(true)
    );

    assert_eq!(service.get_price(&symbol).unwrap().source, "Binance");
    assert_eq!(service.get_price("STX").unwrap().source, source);
    assert_eq!(service.get_price(&long_symbol).unwrap().updated_at, 4);
}

#[test]
fn test_authorization_checked_before_validation() {
    let mut service = OracleService::new();
    let err = service
        .update_price(&ctx(ALICE, 1), "", 100, 99, "")
        .unwrap_err();
    assert_eq!(err, OracleError::NotAuthorized);
}

#[test]
fn test_execute_dispatch() {
    let mut service = OracleService::new();
    let update = OracleInstruction::UpdatePrice {
        symbol: "STX".to_string(),
        price: 100,
        decimals: 6,
        source: "Binance".to_string(),
    };

    assert_eq!(
        service.execute(&ctx(DEPLOYER, 1), &update),
        Err(OracleError::NotAuthorized)
    );
    assert_eq!(
        service.execute(&ctx(DEPLOYER, 1), &OracleInstruction::RegisterOracle),
        Ok(true)
    );
    assert_eq!(service.execute(&ctx(DEPLOYER, 1), &update), Ok(true));
    assert_eq!(service.get_price("STX").unwrap().price, 100);
}

#[test]
fn test_state_round_trips_through_service() {
    let mut service = OracleService::new();
    service.register_oracle(&ctx(DEPLOYER, 4)).unwrap();
    let state = service.into_state();

    let restored = OracleService::from_state(state);
    assert!(restored.is_registered(&DEPLOYER));
    assert!(!restored.is_registered(&ALICE));
}
