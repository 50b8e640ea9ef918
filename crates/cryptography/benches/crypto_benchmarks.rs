//! Performance benchmarks for the secp256k1 core.
//!
//! These measure key derivation, ECDSA signing and verification, and the
//! hashes used by the wallet encodings.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ecwallet_cryptography::{
    hash::{hash160, hash256, sha256},
    sign, verify, ECCurve, PrivateKey, PublicKey,
};
use num_bigint::BigUint;

fn test_key() -> PrivateKey {
    PrivateKey::from_slice(&[0x42; 32]).unwrap()
}

/// Benchmark point arithmetic
fn bench_scalar_multiplication(c: &mut Criterion) {
    let mut group = c.benchmark_group("scalar_multiplication");
    let g = ECCurve::secp256k1().generator();
    let k = BigUint::from_bytes_be(&[0x42; 32]);

    group.bench_function("multiply_constant_time", |b| {
        b.iter(|| black_box(g.multiply(black_box(&k))))
    });

    group.bench_function("multiply_vartime", |b| {
        b.iter(|| black_box(g.multiply_vartime(black_box(&k))))
    });

    group.finish();
}

/// Benchmark key operations
fn bench_key_operations(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_operations");
    let key = test_key();
    let public = key.public_key();
    let compressed = public.to_compressed();

    group.bench_function("derive_public_key", |b| {
        b.iter(|| black_box(key.public_key()))
    });

    group.bench_function("decompress_public_key", |b| {
        b.iter(|| black_box(PublicKey::from_sec1_bytes(black_box(&compressed)).unwrap()))
    });

    group.finish();
}

/// Benchmark ECDSA signing and verification
fn bench_ecdsa(c: &mut Criterion) {
    let mut group = c.benchmark_group("ecdsa");
    let key = test_key();
    let public = key.public_key();
    let digest = sha256(b"benchmark message");
    let signature = sign(&digest, &key).unwrap();

    group.bench_function("sign", |b| {
        b.iter(|| black_box(sign(black_box(&digest), &key).unwrap()))
    });

    group.bench_function("verify", |b| {
        b.iter(|| black_box(verify(black_box(&digest), &signature, &public)))
    });

    group.finish();
}

/// Benchmark hash functions
fn bench_hash_functions(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_functions");

    for size in [32usize, 65, 1024] {
        let data = vec![0xabu8; size];
        group.bench_with_input(BenchmarkId::new("hash160", size), &data, |b, data| {
            b.iter(|| black_box(hash160(black_box(data))))
        });
        group.bench_with_input(BenchmarkId::new("hash256", size), &data, |b, data| {
            b.iter(|| black_box(hash256(black_box(data))))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_scalar_multiplication,
    bench_key_operations,
    bench_ecdsa,
    bench_hash_functions
);
criterion_main!(benches);
