//! Batched AI disambiguation.
//!
//! Ambiguous tags are buffered until the batch is full (or the input ends),
//! then sent to the translator as a single prompt. Answers are matched to
//! items by position only.

use anyhow::Result;

use crate::rate_limit::RateLimiter;
use crate::record::TagRecord;
use crate::translator::Translator;
use crate::writer::ResolutionSink;

/// An ambiguous tag waiting for the next flush.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub tag: String,
    pub candidates: Vec<String>,
    pub record: TagRecord,
}

impl BatchItem {
    pub fn new(record: TagRecord, candidates: Vec<String>) -> Self {
        Self {
            tag: record.tag.clone(),
            candidates,
            record,
        }
    }
}

/// Outcome counts of a single flush.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub submitted: usize,
    pub resolved: usize,
    pub failed: usize,
}

/// Replaces underscores with spaces so the model sees natural words.
pub fn sanitize(tag: &str) -> String {
    tag.replace('_', " ")
}

/// Renders the prompt for one batch: the prefix followed by one block per item.
pub fn format_prompt(prefix: &str, items: &[BatchItem]) -> String {
    let blocks: Vec<String> = items
        .iter()
        .map(|item| {
            format!(
                "Tag: {}\nCandidates: {}",
                sanitize(&item.tag),
                item.candidates.join(",")
            )
        })
        .collect();
    format!("{}{}", prefix, blocks.join("\n"))
}

pub struct BatchDisambiguator {
    items: Vec<BatchItem>,
    capacity: usize,
    limiter: RateLimiter,
}

impl BatchDisambiguator {
    pub fn new(capacity: usize, limiter: RateLimiter) -> Self {
        let capacity = capacity.max(1);
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
            limiter,
        }
    }

    /// Buffers `item`; returns true once the batch is full and should be flushed.
    pub fn enqueue(&mut self, item: BatchItem) -> bool {
        self.items.push(item);
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sends the buffered items to the translator and reports each outcome to `sink`.
    ///
    /// A translator error fails every item of the batch. The buffer is empty
    /// afterwards regardless of the outcome; only sink errors are returned.
    pub fn flush(
        &mut self,
        translator: &dyn Translator,
        prompt_prefix: &str,
        sink: &mut dyn ResolutionSink,
    ) -> Result<FlushStats> {
        if self.items.is_empty() {
            return Ok(FlushStats::default());
        }

        let items = std::mem::take(&mut self.items);
        let prompt = format_prompt(prompt_prefix, &items);

        tracing::debug!(
            provider = translator.provider_name(),
            items = items.len(),
            "Submitting batch"
        );

        let answers = match self.limiter.call(|| translator.translate(&prompt)) {
            Ok(answers) => answers,
            Err(err) => {
                tracing::warn!(
                    provider = translator.provider_name(),
                    items = items.len(),
                    error = %err,
                    "Batch translation failed"
                );
                Vec::new()
            }
        };

        if answers.len() != items.len() {
            tracing::warn!(
                expected = items.len(),
                received = answers.len(),
                "Batch answer count mismatch"
            );
        }
        if answers.len() > items.len() {
            tracing::debug!(extra = ?&answers[items.len()..], "Ignoring extra answers");
        }

        let mut stats = FlushStats {
            submitted: items.len(),
            ..FlushStats::default()
        };
        for (i, item) in items.iter().enumerate() {
            match answers.get(i).map(|a| a.trim()).filter(|a| !a.is_empty()) {
                Some(name) => {
                    tracing::info!(tag = %item.tag, name = %name, "{} → {} (AI)", item.tag, name);
                    sink.success(&item.record, name)?;
                    stats.resolved += 1;
                }
                None => {
                    tracing::warn!(tag = %item.tag, "translation failed: AI returned no answer");
                    sink.failure(&item.record)?;
                    stats.failed += 1;
                }
            }
        }

        Ok(stats)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::cell::{Cell, RefCell};

    use anyhow::bail;

    use super::*;
    use crate::translator::split_answers;

    /// Translator returning canned answers and remembering the prompts it saw.
    pub(crate) struct FakeTranslator {
        pub answers: Vec<String>,
        pub fail: bool,
        pub prompts: RefCell<Vec<String>>,
        pub calls: Cell<usize>,
    }

    impl FakeTranslator {
        pub(crate) fn answering(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                fail: false,
                prompts: RefCell::new(Vec::new()),
                calls: Cell::new(0),
            }
        }

        /// Answers parsed from a raw model reply, as the real providers do.
        pub(crate) fn replying(reply: &str) -> Self {
            Self {
                answers: split_answers(reply),
                ..Self::answering(&[])
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::answering(&[])
            }
        }
    }

    impl Translator for FakeTranslator {
        fn provider_name(&self) -> &str {
            "fake"
        }

        fn translate(&self, prompt: &str) -> Result<Vec<String>> {
            self.calls.set(self.calls.get() + 1);
            self.prompts.borrow_mut().push(prompt.to_string());
            if self.fail {
                bail!("provider unavailable");
            }
            Ok(self.answers.clone())
        }
    }

    /// Sink that keeps outcomes in memory.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub successes: Vec<(String, String)>,
        pub failures: Vec<String>,
    }

    impl ResolutionSink for RecordingSink {
        fn success(&mut self, record: &TagRecord, name: &str) -> Result<()> {
            self.successes.push((record.tag.clone(), name.to_string()));
            Ok(())
        }

        fn failure(&mut self, record: &TagRecord) -> Result<()> {
            self.failures.push(record.tag.clone());
            Ok(())
        }
    }

    fn item(tag: &str, candidates: &[&str]) -> BatchItem {
        BatchItem::new(
            TagRecord::new(tag, vec!["4".into()]),
            candidates.iter().map(|c| c.to_string()).collect(),
        )
    }

    fn batch(capacity: usize) -> BatchDisambiguator {
        BatchDisambiguator::new(capacity, RateLimiter::from_rate(0.0))
    }

    #[test]
    fn test_format_prompt() {
        let items = vec![
            item("hakurei_reimu", &["博麗霊夢", "はくれいれいむ"]),
            item("chen", &["橙", "チェン"]),
        ];
        let prompt = format_prompt("Pick one name per tag.\n", &items);
        insta::assert_snapshot!(prompt, @r"
        Pick one name per tag.
        Tag: hakurei reimu
        Candidates: 博麗霊夢,はくれいれいむ
        Tag: chen
        Candidates: 橙,チェン
        ");
    }

    #[test]
    fn test_enqueue_reports_full() {
        let mut batch = batch(2);
        assert!(!batch.enqueue(item("a", &["x", "y"])));
        assert!(batch.enqueue(item("b", &["x", "y"])));
        assert_eq!(batch.len(), 2);
    }

    #[test]
    fn test_flush_all_answered() {
        let mut batch = batch(3);
        batch.enqueue(item("a", &["1", "2"]));
        batch.enqueue(item("b", &["1", "2"]));
        let translator = FakeTranslator::answering(&[" 甲 ", "乙"]);
        let mut sink = RecordingSink::default();

        let stats = batch.flush(&translator, "", &mut sink).unwrap();

        assert_eq!(stats, FlushStats { submitted: 2, resolved: 2, failed: 0 });
        assert_eq!(
            sink.successes,
            vec![("a".to_string(), "甲".to_string()), ("b".to_string(), "乙".to_string())]
        );
        assert!(batch.is_empty());
    }

    #[test]
    fn test_flush_short_answer_fails_missing_index() {
        let mut batch = batch(3);
        batch.enqueue(item("a", &["1", "2"]));
        batch.enqueue(item("b", &["1", "2"]));
        batch.enqueue(item("c", &["1", "2"]));
        let translator = FakeTranslator::answering(&["甲", "乙"]);
        let mut sink = RecordingSink::default();

        let stats = batch.flush(&translator, "", &mut sink).unwrap();

        assert_eq!(stats.resolved, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(
            sink.successes,
            vec![("a".to_string(), "甲".to_string()), ("b".to_string(), "乙".to_string())]
        );
        assert_eq!(sink.failures, vec!["c"]);
    }

    #[test]
    fn test_flush_blank_answer_fails_only_that_item() {
        let mut batch = batch(3);
        batch.enqueue(item("a", &["1", "2"]));
        batch.enqueue(item("b", &["1", "2"]));
        batch.enqueue(item("c", &["1", "2"]));
        let translator = FakeTranslator::answering(&["甲", "   ", "丙"]);
        let mut sink = RecordingSink::default();

        batch.flush(&translator, "", &mut sink).unwrap();

        assert_eq!(sink.failures, vec!["b"]);
        assert_eq!(sink.successes[1], ("c".to_string(), "丙".to_string()));
    }

    #[test]
    fn test_flush_blank_reply_line_keeps_alignment() {
        let mut batch = batch(3);
        batch.enqueue(item("a", &["1", "2"]));
        batch.enqueue(item("b", &["1", "2"]));
        batch.enqueue(item("c", &["1", "2"]));
        let translator = FakeTranslator::replying("甲\n\n丙\n");
        let mut sink = RecordingSink::default();

        let stats = batch.flush(&translator, "", &mut sink).unwrap();

        assert_eq!(stats, FlushStats { submitted: 3, resolved: 2, failed: 1 });
        assert_eq!(
            sink.successes,
            vec![("a".to_string(), "甲".to_string()), ("c".to_string(), "丙".to_string())]
        );
        assert_eq!(sink.failures, vec!["b"]);
    }

    #[test]
    fn test_flush_extra_answers_ignored() {
        let mut batch = batch(2);
        batch.enqueue(item("a", &["1", "2"]));
        let translator = FakeTranslator::answering(&["甲", "乙", "丙"]);
        let mut sink = RecordingSink::default();

        let stats = batch.flush(&translator, "", &mut sink).unwrap();

        assert_eq!(stats, FlushStats { submitted: 1, resolved: 1, failed: 0 });
        assert_eq!(sink.successes, vec![("a".to_string(), "甲".to_string())]);
    }

    #[test]
    fn test_flush_translator_error_fails_whole_batch() {
        let mut batch = batch(2);
        batch.enqueue(item("a", &["1", "2"]));
        batch.enqueue(item("b", &["1", "2"]));
        let translator = FakeTranslator::failing();
        let mut sink = RecordingSink::default();

        let stats = batch.flush(&translator, "", &mut sink).unwrap();

        assert_eq!(stats.failed, 2);
        assert_eq!(sink.failures, vec!["a", "b"]);
        assert!(batch.is_empty());
        assert_eq!(translator.calls.get(), 1);
    }

    #[test]
    fn test_flush_empty_buffer_skips_translator() {
        let mut batch = batch(2);
        let translator = FakeTranslator::answering(&["甲"]);
        let mut sink = RecordingSink::default();

        let stats = batch.flush(&translator, "", &mut sink).unwrap();

        assert_eq!(stats, FlushStats::default());
        assert_eq!(translator.calls.get(), 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let mut batch = batch(0);
        assert!(batch.enqueue(item("a", &["1", "2"])));
    }
}
