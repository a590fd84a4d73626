//! Latency benchmarks for order construction and request signing.
//!
//! Run with: `cargo bench --bench latency`

use std::str::FromStr;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_decimal::Decimal;

use clob_auth::build_hmac_signature;
use clob_core::config::POLYGON_CHAIN_ID;
use clob_core::order::{
    limit_order_amounts, resolve_market_price, FixedSalt, OrderCodec, TickSize,
};
use clob_core::signing::{OrderSide, OrderSigner};
use clob_core::types::{
    CreateOrderOptions, OrderBookSummary, OrderIntent, OrderType, PriceLevel, UserOrder,
};

const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const SECRET: &str = "c2VjcmV0LWtleS1ieXRlcyE=";

fn codec() -> OrderCodec {
    OrderCodec::new(
        OrderSigner::from_private_key(TEST_PRIVATE_KEY).unwrap(),
        POLYGON_CHAIN_ID,
    )
    .unwrap()
    .with_salt_generator(Arc::new(FixedSalt(42)))
}

/// Synthetic book with `depth` levels per side, stored worst to best.
fn generate_book(depth: usize) -> OrderBookSummary {
    let mut bids = Vec::with_capacity(depth);
    let mut asks = Vec::with_capacity(depth);

    for i in 0..depth {
        let offset = Decimal::new((depth - i) as i64, 3);
        bids.push(PriceLevel::new(
            Decimal::new(50, 2) - offset,
            Decimal::new(100 + i as i64 * 10, 0),
        ));
        asks.push(PriceLevel::new(
            Decimal::new(51, 2) + offset,
            Decimal::new(100 + i as i64 * 10, 0),
        ));
    }

    OrderBookSummary {
        bids,
        asks,
        ..Default::default()
    }
}

/// Benchmark raw amount computation across tick sizes.
fn bench_order_amounts(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_amounts");
    let size = Decimal::from_str("21.04").unwrap();

    for tick in TickSize::ALL {
        let price = tick.max_price();
        group.bench_with_input(BenchmarkId::new("limit_buy", tick), &price, |b, price| {
            b.iter(|| {
                black_box(limit_order_amounts(
                    OrderSide::Buy,
                    black_box(size),
                    black_box(*price),
                    tick.round_config(),
                ))
            })
        });
    }

    group.finish();
}

/// Benchmark full build: amounts, EIP-712 hash and ECDSA signature.
fn bench_order_signing(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_signing");
    let codec = codec();
    let intent = OrderIntent::from(UserOrder::new(
        "1234567890",
        Decimal::new(56, 2),
        Decimal::new(2104, 2),
        OrderSide::Buy,
    ));

    group.throughput(Throughput::Elements(1));
    for neg_risk in [false, true] {
        let options = CreateOrderOptions::new(TickSize::Hundredth, neg_risk);
        group.bench_with_input(
            BenchmarkId::new("build", if neg_risk { "neg_risk" } else { "standard" }),
            &options,
            |b, options| b.iter(|| black_box(codec.build(black_box(&intent), options))),
        );
    }

    group.finish();
}

/// Benchmark market price discovery against books of growing depth.
fn bench_market_price(c: &mut Criterion) {
    let mut group = c.benchmark_group("market_price");

    for depth in [5, 10, 50, 100].iter() {
        let book = generate_book(*depth);
        // Enough to walk about half the asks
        let amount = Decimal::from(*depth as i64 * 30);

        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::new("buy_fok", depth), &book, |b, book| {
            b.iter(|| {
                black_box(resolve_market_price(
                    black_box(book),
                    OrderSide::Buy,
                    amount,
                    OrderType::Fok,
                ))
            })
        });
    }

    group.finish();
}

/// Benchmark L2 request signing.
fn bench_hmac_signature(c: &mut Criterion) {
    let mut group = c.benchmark_group("hmac_signature");
    let body = serde_json::json!({"orderID": "0x1234", "owner": "key"}).to_string();

    group.bench_function("get_no_body", |b| {
        b.iter(|| black_box(build_hmac_signature(SECRET, 1_700_000_000, "GET", "/data/orders", None)))
    });

    group.bench_function("post_with_body", |b| {
        b.iter(|| {
            black_box(build_hmac_signature(
                SECRET,
                1_700_000_000,
                "POST",
                "/order",
                Some(black_box(&body)),
            ))
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_order_amounts,
    bench_order_signing,
    bench_market_price,
    bench_hmac_signature,
);

criterion_main!(benches);
