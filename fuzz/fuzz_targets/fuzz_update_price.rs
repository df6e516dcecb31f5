#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use oracle_execution::{CallContext, OracleService};
use oracle_types::principal::Principal;

#[derive(Arbitrary, Debug)]
struct UpdateInput {
    caller: [u8; 32],
    registered: bool,
    height: u64,
    symbol: String,
    price: u128,
    decimals: u32,
    source: String,
}

fuzz_target!(|data: UpdateInput| {
    let mut service = OracleService::new();
    let seed = CallContext {
        caller: Principal([0xee; 32]),
        height: 0,
    };
    service.register_oracle(&seed).unwrap();
    service.update_price(&seed, "STX", 100, 6, "Binance").unwrap();

    let ctx = CallContext {
        caller: Principal(data.caller),
        height: data.height,
    };
    if data.registered {
        service.register_oracle(&ctx).unwrap();
    }
    let before = service.state().clone();

    match service.update_price(&ctx, &data.symbol, data.price, data.decimals, &data.source) {
        Ok(ok) => {
            assert!(ok);
            assert!(service.is_registered(&ctx.caller));
            let record = service.get_price(&data.symbol).unwrap();
            assert_eq!(record.price, data.price);
            assert_eq!(u32::from(record.decimals), data.decimals);
            assert_eq!(record.source, data.source);
            assert_eq!(record.updated_by, ctx.caller);
            assert_eq!(record.updated_at, ctx.height);
        }
        Err(_) => assert_eq!(service.state(), &before),
    }
});
