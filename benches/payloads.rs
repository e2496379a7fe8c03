use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stonfi_types::prelude::*;

fn addr(byte: u8) -> StdAddr {
    StdAddr::new(0, HashBytes([byte; 32]))
}

fn swap(offer_asset: Asset) -> DexOperation {
    let mut body = SwapBody::new(addr(4), Tokens::new(1_000_000), addr(2));
    body.referral = Some(addr(5));
    body.deadline = Some(1_700_000_000);

    DexOperation::Swap(SwapParams {
        router: addr(1),
        user: addr(2),
        offer_asset,
        ask_asset: Asset::Jetton(addr(11)),
        offer_wallet: addr(3),
        offer_amount: Tokens::new(1_000_000_000),
        body,
        query_id: 0,
        gas: GasOverrides::NONE,
        pton: None,
    })
}

fn build_swap(c: &mut Criterion) {
    for (name, version, offer) in [
        ("v1_jetton", VersionTag::new(1, 0), Asset::Jetton(addr(10))),
        ("v2_1_jetton", VersionTag::new(2, 1), Asset::Jetton(addr(10))),
        ("v2_1_native", VersionTag::new(2, 1), Asset::Native),
    ] {
        let operation = swap(offer);
        let set = resolve_operation_set(version).unwrap();

        let id = BenchmarkId::new("build_swap", name);
        c.bench_with_input(id, &operation, |b, operation| {
            b.iter(|| {
                let tx = set.build(operation).unwrap();
                black_box(tx);
            });
        });
    }
}

fn encode_swap_boc(c: &mut Criterion) {
    let set = resolve_operation_set(VersionTag::new(2, 1)).unwrap();
    let operation = swap(Asset::Jetton(addr(10)));
    let tx = set.build(&operation).unwrap();

    c.bench_function("encode_swap_boc", |b| {
        b.iter(|| {
            let bytes = Boc::encode(&tx.body);
            black_box(bytes);
        });
    });
}

criterion_group!(benches, build_swap, encode_swap_boc);
criterion_main!(benches);
