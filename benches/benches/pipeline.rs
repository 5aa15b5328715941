use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use houdini_config::ProjectConfig;
use houdini_core::{run, Cancellation, IrStore};
use houdini_ir::insert_raw_document;
use houdini_loader::{load_documents_with, LoadOptions, DEFAULT_CHANNEL_CAPACITY};
use houdini_schema::import_schema;
use houdini_types::{DiagnosticSink, SourceOffset};
use houdini_validation::validate;
use std::hint::black_box;

const POOL_SIZE: usize = 8;

const SCHEMA: &str = r"
type Query {
  user(id: ID!): User
  users(first: Int, after: String): [User!]!
  post(id: ID!): Post
  feed(tag: String): [FeedItem!]!
}

interface Node {
  id: ID!
}

type User implements Node {
  id: ID!
  name: String!
  email: String!
  avatar(size: Int): String
  friends(first: Int = 10): [User!]!
  posts: [Post!]!
}

type Post implements Node {
  id: ID!
  title: String!
  content: String!
  author: User!
}

union FeedItem = User | Post
";

/// One route's worth of documents: a query and the fragments it spreads
fn route_documents(index: usize) -> String {
    format!(
        r"
query UserPage{index}($id: ID!, $size: Int) {{
  user(id: $id) {{
    ...UserCard{index}
    friends {{
      ...UserCard{index}
    }}
    posts {{
      id
      title
      author {{ id name }}
    }}
  }}
  feed {{
    ... on User {{ id name }}
    ... on Post {{ id title }}
  }}
}}

fragment UserCard{index} on User {{
  id
  name
  avatar(size: $size)
}}
"
    )
}

fn store_with_documents(count: usize) -> IrStore {
    let store = IrStore::in_memory(POOL_SIZE).unwrap();
    let conn = store.get().unwrap();
    for index in 0..count {
        insert_raw_document(
            &conn,
            &format!("src/routes/page{index}/+page.gql"),
            &route_documents(index),
            SourceOffset::default(),
        )
        .unwrap();
    }
    drop(conn);
    store
}

fn bench_schema_import(c: &mut Criterion) {
    c.bench_function("schema_import", |b| {
        b.iter_batched(
            || IrStore::in_memory(1).unwrap(),
            |store| black_box(import_schema(&store, SCHEMA, "schema.graphql").unwrap()),
            BatchSize::SmallInput,
        );
    });
}

fn bench_load_documents(c: &mut Criterion) {
    let mut group = c.benchmark_group("load_documents");
    for workers in [1, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(workers), &workers, |b, &workers| {
            b.iter_batched(
                || {
                    let store = store_with_documents(200);
                    import_schema(&store, SCHEMA, "schema.graphql").unwrap();
                    store
                },
                |store| {
                    let options = LoadOptions {
                        workers,
                        channel_capacity: DEFAULT_CHANNEL_CAPACITY,
                    };
                    let sink = DiagnosticSink::new();
                    black_box(
                        load_documents_with(&store, options, &Cancellation::new(), &sink).unwrap(),
                    )
                },
                BatchSize::LargeInput,
            );
        });
    }
    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let store = store_with_documents(200);
    let config = ProjectConfig::new(".");
    run(&store, &config, SCHEMA, &Cancellation::new()).unwrap();

    c.bench_function("validate", |b| {
        b.iter(|| {
            let sink = DiagnosticSink::new();
            black_box(validate(&store, &config, &Cancellation::new(), &sink).unwrap())
        });
    });
}

fn bench_pipeline_cold(c: &mut Criterion) {
    let config = ProjectConfig::new(".");
    c.bench_function("pipeline_cold", |b| {
        b.iter_batched(
            || store_with_documents(200),
            |store| black_box(run(&store, &config, SCHEMA, &Cancellation::new()).unwrap()),
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_schema_import,
    bench_load_documents,
    bench_validate,
    bench_pipeline_cold,
);

criterion_main!(benches);
