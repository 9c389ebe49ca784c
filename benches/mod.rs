use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    network::application::http::parser::bench_content_length,
    network::application::http::parser::bench_chunked,
    network::application::http::parser::bench_exchange
);
criterion_main!(benches);
