//! Pipeline driver.
//!
//! Streams records in input order through cache filter, resolver and batch
//! buffer, writing every non-cached record to exactly one sink. Progress is
//! durable row by row, so an interrupted run resumes from the cache.

use std::collections::HashSet;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;

use crate::batch::{BatchDisambiguator, BatchItem, FlushStats};
use crate::cache::CacheStore;
use crate::record::{SourceRow, TagRecord};
use crate::resolver::NameResolver;
use crate::translator::Translator;
use crate::writer::ResolutionSink;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Streaming,
    Draining,
    Done,
}

/// What happened to a single record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    CacheHit,
    DirectResolve(String),
    NoCandidates,
    Buffered,
}

/// Counts reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub read: usize,
    pub cache_hits: usize,
    pub skipped_rows: usize,
    pub direct: usize,
    pub ai_resolved: usize,
    pub failed: usize,
    pub batches: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn resolved(&self) -> usize {
        self.direct + self.ai_resolved
    }

    fn add_flush(&mut self, stats: FlushStats) {
        if stats.submitted > 0 {
            self.batches += 1;
        }
        self.ai_resolved += stats.resolved;
        self.failed += stats.failed;
    }
}

pub struct PipelineOptions {
    pub prompt_prefix: String,
    /// Pause after every record that was not a cache hit.
    pub record_delay: Duration,
}

pub struct Pipeline<'a> {
    cache: &'a CacheStore,
    resolver: &'a mut NameResolver,
    translator: &'a dyn Translator,
    batch: BatchDisambiguator,
    options: PipelineOptions,
    seen: HashSet<String>,
    state: PipelineState,
    summary: RunSummary,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        cache: &'a CacheStore,
        resolver: &'a mut NameResolver,
        translator: &'a dyn Translator,
        batch: BatchDisambiguator,
        options: PipelineOptions,
    ) -> Self {
        Self {
            cache,
            resolver,
            translator,
            batch,
            options,
            seen: HashSet::new(),
            state: PipelineState::Idle,
            summary: RunSummary::default(),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    fn transition(&mut self, next: PipelineState) {
        tracing::debug!("Pipeline state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    /// Processes every row of `rows`, then drains the batch buffer.
    ///
    /// Row read errors and sink errors abort the run; everything already
    /// written stays in the sinks.
    pub fn run<I>(&mut self, rows: I, sink: &mut dyn ResolutionSink) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<SourceRow>>,
    {
        let start = Instant::now();
        self.transition(PipelineState::Streaming);

        for row in rows {
            match row? {
                SourceRow::Record(record) => {
                    self.summary.read += 1;
                    let outcome = self.process_record(record, sink)?;
                    if outcome != RecordOutcome::CacheHit && !self.options.record_delay.is_zero() {
                        thread::sleep(self.options.record_delay);
                    }
                }
                SourceRow::Malformed => self.summary.skipped_rows += 1,
            }
        }

        self.transition(PipelineState::Draining);
        self.flush_batch(sink)?;

        self.transition(PipelineState::Done);
        self.summary.elapsed = start.elapsed();
        Ok(self.summary.clone())
    }

    /// Routes one record to the cache filter, a sink, or the batch buffer.
    pub fn process_record(
        &mut self,
        record: TagRecord,
        sink: &mut dyn ResolutionSink,
    ) -> Result<RecordOutcome> {
        if self.cache.contains(&record.tag) || !self.seen.insert(record.tag.clone()) {
            self.summary.cache_hits += 1;
            return Ok(RecordOutcome::CacheHit);
        }

        tracing::debug!(
            tag = %record.tag,
            genre = ?record.genre(),
            usage = ?record.usage(),
            related = ?record.related_tags(),
            "Processing record"
        );
        let result = self.resolver.resolve(&record.tag);

        if let Some(name) = result.name() {
            tracing::info!(tag = %record.tag, name = %name, "{} → {}", record.tag, name);
            sink.success(&record, name)?;
            self.summary.direct += 1;
            return Ok(RecordOutcome::DirectResolve(name.to_string()));
        }

        if result.candidates.is_empty() {
            tracing::warn!(tag = %record.tag, "translation failed: no candidates");
            sink.failure(&record)?;
            self.summary.failed += 1;
            return Ok(RecordOutcome::NoCandidates);
        }

        tracing::debug!(
            tag = %record.tag,
            candidates = ?result.candidates,
            "Deferring to AI disambiguation"
        );
        if self.batch.enqueue(BatchItem::new(record, result.candidates)) {
            self.flush_batch(sink)?;
        }
        Ok(RecordOutcome::Buffered)
    }

    fn flush_batch(&mut self, sink: &mut dyn ResolutionSink) -> Result<()> {
        let stats = self
            .batch
            .flush(self.translator, &self.options.prompt_prefix, sink)?;
        self.summary.add_flush(stats);
        Ok(())
    }
}
