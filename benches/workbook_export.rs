use std::hint::black_box;

use chat_ledger::export::SpreadsheetExporter;
use chat_ledger::models::Message;
use chat_ledger::service::{CompletionService, ServiceError};
use chat_ledger::session::{ChatSession, SessionOptions};
use criterion::{BatchSize, BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use tempfile::TempDir;

/// Answers every request with a fixed multi-line reply
struct CannedReplies;

impl CompletionService for CannedReplies {
    fn list_models(&self) -> Result<Vec<String>, ServiceError> {
        Ok(Vec::new())
    }

    fn create_completion(
        &self,
        _model: &str,
        _messages: &[Message],
    ) -> Result<Message, ServiceError> {
        Ok(Message::assistant("First line of the answer.\nSecond line.\nThird line of detail."))
    }
}

/// Build a summarized session with N turns
fn generate_session(num_turns: usize) -> ChatSession {
    let mut session = ChatSession::new("gpt-bench", SessionOptions::default());
    session.assign_role(Some("You are a benchmark")).unwrap();

    for i in 0..num_turns {
        session.accept_input(&format!("Question number {}", i)).unwrap();
        session.complete_turn(&CannedReplies).unwrap();
    }

    session.accept_input("exit()").unwrap();
    session.summarize(&CannedReplies).unwrap();
    session
}

fn bench_append_new_workbook(c: &mut Criterion) {
    let mut group = c.benchmark_group("append_new_workbook");

    for turns in [10, 100, 1_000].iter() {
        let session = generate_session(*turns);

        group.throughput(Throughput::Elements(*turns as u64));
        group.bench_with_input(BenchmarkId::from_parameter(turns), turns, |b, _| {
            b.iter_batched(
                || TempDir::new().unwrap(),
                |dir| {
                    let exporter = SpreadsheetExporter::new(dir.path().join("bench.xlsx"));
                    exporter.append(black_box(&session)).unwrap();
                    dir
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_append_new_workbook);
criterion_main!(benches);
