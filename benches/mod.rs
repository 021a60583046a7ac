use criterion::{criterion_group, criterion_main};


criterion_group!(
    benches,
    network::application::mqttsn::codec::bench_encode,
    network::application::mqttsn::codec::bench_decode,
    network::application::mqttsn::codec::bench_session_publish
);
criterion_main!(benches);
