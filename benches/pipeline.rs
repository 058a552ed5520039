//! Pipeline benchmarks for rust-ddlparser
//!
//! This benchmark module measures:
//! - Tokenization
//! - Grammar: tokens -> statement trees
//! - Normalization and rendering
//! - Full pipeline: text -> JSON value
//!
//! Run with: cargo bench
//! Compare against baseline: cargo bench -- --save-baseline before
//!                          (make changes)
//!                          cargo bench -- --baseline before

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_ddlparser::{model, parse_ddl, parser, OutputMode, ParseOptions};

/// Build a script of `tables` tables, each with an index and an ALTER
fn generate_script(tables: usize) -> String {
    let mut sql = String::from("CREATE SCHEMA IF NOT EXISTS bench;\n");
    for i in 0..tables {
        sql.push_str(&format!(
            "CREATE TABLE bench.t{i} (\n\
               id BIGINT NOT NULL PRIMARY KEY,\n\
               name VARCHAR(255) DEFAULT 'n/a',\n\
               amount NUMERIC(12, 2) CHECK (amount >= 0),\n\
               tags ARRAY<STRUCT<k STRING, v STRING>>,\n\
               parent_id BIGINT REFERENCES bench.t0 (id) ON DELETE CASCADE\n\
             );\n\
             CREATE INDEX ix_t{i}_name ON bench.t{i} (name DESC);\n\
             ALTER TABLE bench.t{i} ADD CONSTRAINT uq_t{i} UNIQUE (name);\n"
        ));
    }
    sql
}

fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    for tables in [10, 100] {
        let sql = generate_script(tables);
        group.throughput(Throughput::Bytes(sql.len() as u64));
        group.bench_with_input(BenchmarkId::new("tables", tables), &sql, |b, sql| {
            b.iter(|| parser::tokenize(black_box(sql)).unwrap())
        });
    }
    group.finish();
}

fn bench_grammar(c: &mut Criterion) {
    let mut group = c.benchmark_group("grammar");
    for tables in [10, 100] {
        let tokens = parser::tokenize(&generate_script(tables)).unwrap();
        group.throughput(Throughput::Elements(tokens.len() as u64));
        group.bench_with_input(BenchmarkId::new("tables", tables), &tokens, |b, tokens| {
            b.iter(|| parser::parse_token_stream(black_box(tokens.clone())).unwrap())
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");
    let statements = parser::parse_statements(&generate_script(100)).unwrap();
    let options = ParseOptions {
        group_by_type: true,
        output_mode: OutputMode::Generic,
    };
    group.throughput(Throughput::Elements(statements.len() as u64));
    group.bench_function("build_and_render", |b| {
        b.iter(|| {
            let output = model::build_model(black_box(statements.clone())).unwrap();
            model::render(&output, &options).unwrap()
        })
    });
    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    let sql = generate_script(100);
    for mode in [OutputMode::Generic, OutputMode::BigQuery, OutputMode::Redshift] {
        let options = ParseOptions {
            group_by_type: true,
            output_mode: mode,
        };
        group.bench_function(mode.name(), |b| {
            b.iter(|| parse_ddl(black_box(&sql), &options).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_tokenize,
    bench_grammar,
    bench_normalize,
    bench_full_pipeline
);
criterion_main!(benches);
