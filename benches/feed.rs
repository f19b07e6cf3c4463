use chrono::{DateTime, Duration, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use txs_feed::display::Normalizer;
use txs_feed::fetch::InMemoryFetcher;
use txs_feed::view::build_groups;
use txs_feed::{Amount, FeedConfig, FeedController, FeedFilter, Transaction, TransactionType};

/// Generates a newest-first transaction history for benchmarking.
///
/// Pattern (repeating): transfer, top-up, transfer, spaced six hours apart,
/// cycling through a handful of counterparties and currencies.
pub struct TxGenerator {
    next_id: u64,
    count: u64,
    start: DateTime<Utc>,
}

impl TxGenerator {
    const COUNTERPARTIES: [&'static str; 4] = ["alice", "bob", "carol", "payroll"];
    const CURRENCIES: [&'static str; 3] = ["USD", "EUR", "JPY"];

    pub fn new(count: u64) -> Self {
        Self {
            next_id: 0,
            count,
            start: Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap(),
        }
    }
}

impl Iterator for TxGenerator {
    type Item = Transaction;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next_id >= self.count {
            return None;
        }
        let n = self.next_id;
        self.next_id += 1;

        let kind = if n % 3 == 1 {
            TransactionType::Topup
        } else {
            TransactionType::Transfer
        };
        Some(Transaction {
            id: format!("tx-{n}"),
            amount: Amount::from_minor(1_000 + (n as i64 % 97) * 13),
            currency: Self::CURRENCIES[n as usize % 3].to_string(),
            kind,
            status: "completed".to_string(),
            created_at: self.start - Duration::hours(6 * n as i64),
            counterparty: Self::COUNTERPARTIES[n as usize % 4].to_string(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.count - self.next_id) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for TxGenerator {}

fn bench_build_groups(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_groups");
    let normalizer = Normalizer::new(&FeedConfig::default());

    for count in [1_000u64, 10_000, 100_000] {
        let records: Vec<_> = TxGenerator::new(count).collect();
        group.bench_with_input(BenchmarkId::from_parameter(count), &records, |b, records| {
            b.iter(|| black_box(build_groups(records, FeedFilter::All, "", &normalizer)));
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    let normalizer = Normalizer::new(&FeedConfig::default());
    let records: Vec<_> = TxGenerator::new(10_000).collect();

    for (filter, query) in [
        (FeedFilter::All, "alice"),
        (FeedFilter::Sent, "eur"),
        (FeedFilter::Received, "nobody"),
    ] {
        let label = format!("{filter:?}_{query}");
        group.bench_function(label, |b| {
            b.iter(|| black_box(build_groups(&records, filter, query, &normalizer)));
        });
    }

    group.finish();
}

/// Page through the whole history, the way a scrolling client would.
fn bench_paging(c: &mut Criterion) {
    let mut group = c.benchmark_group("paging");
    group.sample_size(10);

    for (count, page_size) in [(1_000u64, 20usize), (10_000, 50)] {
        let label = format!("{count}tx_{page_size}pp");
        let fetcher = InMemoryFetcher::paginate(TxGenerator::new(count).collect(), page_size);
        group.bench_function(label, |b| {
            b.iter(|| {
                let mut controller = FeedController::new(FeedConfig::default());
                let mut next = Some(controller.refresh());
                loop {
                    while let Some(request) = next {
                        let result = fetcher.page(request.page);
                        next = controller.on_page_loaded(request, result);
                    }
                    next = controller.load_more();
                    if next.is_none() {
                        break;
                    }
                }
                black_box(controller.state().visible_count())
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_groups, bench_search, bench_paging);
criterion_main!(benches);
