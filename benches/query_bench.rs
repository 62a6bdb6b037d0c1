/// Query construction benchmarks - parameter validation, filter composition
/// and statement rendering, no database involved
use std::sync::Arc;

use async_trait::async_trait;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use contract_state_api::application::filler::ResultFiller;
use contract_state_api::application::ports::{
    AssetRepository, QueryExecutor, RepositoryError, SaleRepository,
};
use contract_state_api::application::query::{RequestParams, SqlValue};
use contract_state_api::application::use_cases::{ListAssetsUseCase, ListSalesUseCase};
use contract_state_api::domain::entities::{Asset, Sale};

struct NoStore;

#[async_trait]
impl QueryExecutor for NoStore {
    async fn fetch_ids(&self, _: &str, _: &[SqlValue]) -> Result<Vec<i64>, RepositoryError> {
        Ok(Vec::new())
    }

    async fn fetch_count(&self, _: &str, _: &[SqlValue]) -> Result<i64, RepositoryError> {
        Ok(0)
    }
}

#[async_trait]
impl AssetRepository for NoStore {
    async fn fetch_by_ids(&self, _: &str, _: &[i64]) -> Result<Vec<Asset>, RepositoryError> {
        Ok(Vec::new())
    }

    async fn template_mint(&self, _: &str, _: i64) -> Result<Option<i64>, RepositoryError> {
        Ok(None)
    }
}

#[async_trait]
impl SaleRepository for NoStore {
    async fn fetch_by_ids(&self, _: &str, _: &[i64]) -> Result<Vec<Sale>, RepositoryError> {
        Ok(Vec::new())
    }
}

fn params(pairs: &[(&str, &str)]) -> RequestParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn filler() -> Arc<ResultFiller> {
    Arc::new(ResultFiller::new(
        Arc::new(NoStore),
        Arc::new(NoStore),
        "atomicassets",
        "atomicmarket",
    ))
}

fn asset_query_benchmarks(c: &mut Criterion) {
    let use_case = ListAssetsUseCase::new(Arc::new(NoStore), filler(), 1000);
    let mut group = c.benchmark_group("asset_list_query");

    let cases = [
        ("defaults", params(&[])),
        (
            "owner_collection",
            params(&[("owner", "alice,bob"), ("collection_name", "heroes"), ("limit", "50")]),
        ),
        (
            "attributes_and_sort",
            params(&[
                ("collection_whitelist", "heroes,villains,pets"),
                ("data.rarity", "rare"),
                ("data:number.level", "5"),
                ("sort", "data:number.level"),
                ("min_template_mint", "1"),
                ("max_template_mint", "100"),
            ]),
        ),
    ];

    for (name, request) in cases.iter() {
        group.bench_with_input(BenchmarkId::new("build", name), request, |b, request| {
            b.iter(|| {
                let page = use_case.build_query(request).unwrap().into_page_query();
                (page.build_string(), page.variable_count())
            });
        });
    }

    group.finish();
}

fn sale_query_benchmarks(c: &mut Criterion) {
    let use_case = ListSalesUseCase::new(Arc::new(NoStore), filler(), 1000);
    let mut group = c.benchmark_group("sale_list_query");

    let cases = [
        ("defaults", params(&[])),
        (
            "listed_by_price",
            params(&[("state", "1"), ("symbol", "WAX"), ("min_price", "1.5"), ("sort", "price")]),
        ),
        (
            "offer_assets",
            params(&[
                ("state", "1,4"),
                ("owner", "alice"),
                ("template_id", "1,2,3"),
                ("data.rarity", "rare"),
                ("collection_blacklist", "spam"),
            ]),
        ),
    ];

    for (name, request) in cases.iter() {
        group.bench_with_input(BenchmarkId::new("build", name), request, |b, request| {
            b.iter(|| use_case.build_query(request).unwrap().count_statement());
        });
    }

    group.finish();
}

criterion_group!(benches, asset_query_benchmarks, sale_query_benchmarks);
criterion_main!(benches);
