/// Batch orchestrator — walks the scan directory and summarizes every image
/// that has no summary yet.
///
/// Strictly sequential: each remote call is awaited before the next file.
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use anyhow::Result;
use captionforge_core::{
    AnalysisOutcome, BatchReport, FailurePolicy, ImageAnalyzer, ImageFile, SkipMarker,
    PLACEHOLDER_RESULT,
};
use captionforge_media::{list_image_files, should_process, summary_path, write_summary};
use tracing::{debug, error, info, warn};

use crate::progress::BatchProgress;

#[derive(Debug, Clone)]
pub struct OrchestratorOptions {
    pub skip_marker: SkipMarker,
    pub failure_policy: FailurePolicy,
    /// Text written for a failed image under `FailurePolicy::WritePlaceholder`.
    pub placeholder: String,
    pub show_progress: bool,
}

impl Default for OrchestratorOptions {
    fn default() -> Self {
        Self {
            skip_marker: SkipMarker::default(),
            failure_policy: FailurePolicy::default(),
            placeholder: PLACEHOLDER_RESULT.to_string(),
            show_progress: true,
        }
    }
}

pub struct BatchOrchestrator<A> {
    analyzer: A,
    options: OrchestratorOptions,
}

impl<A: ImageAnalyzer> BatchOrchestrator<A> {
    pub fn new(analyzer: A, options: OrchestratorOptions) -> Self {
        Self { analyzer, options }
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    /// Images under `dir` that a run would send to the analyzer.
    pub async fn plan(&self, dir: &Path) -> Result<Vec<ImageFile>> {
        let images = list_image_files(dir).await?;
        warn_on_shared_summaries(&images);

        let mut pending = Vec::new();
        for image in images {
            if should_process(image.path(), self.options.skip_marker).await {
                pending.push(image);
            }
        }
        Ok(pending)
    }

    /// Summarize every unprocessed image under `dir`.
    ///
    /// Only a failed scan aborts the run; per-file problems are logged and
    /// counted in the report.
    ///
    /// A summary written earlier in the same run never counts as the marker
    /// for another image, so `a.jpg` and `a.png` are both analyzed and the
    /// later one's text is what stays in `a_summary.txt`.
    pub async fn run(&self, dir: &Path) -> Result<BatchReport> {
        let images = list_image_files(dir).await?;
        warn_on_shared_summaries(&images);
        info!(
            dir = %dir.display(),
            images = images.len(),
            analyzer = self.analyzer.name(),
            "Starting batch"
        );

        let progress = BatchProgress::new(images.len(), self.options.show_progress);
        let mut report = BatchReport { total: images.len(), ..Default::default() };
        let mut written: HashSet<PathBuf> = HashSet::new();

        for image in &images {
            let pending = written.contains(&summary_path(image.path()))
                || should_process(image.path(), self.options.skip_marker).await;
            if pending {
                progress.set_current(&image.file_name);
                if let Some(path) = self.process_one(image, &mut report).await {
                    written.insert(path);
                }
            } else {
                debug!(path = %image, "Already summarized; skipping");
                report.skipped += 1;
            }
            progress.advance();
        }

        progress.finish();
        info!(
            total = report.total,
            processed = report.processed,
            skipped = report.skipped,
            succeeded = report.succeeded,
            failed = report.failed,
            "Batch complete"
        );
        Ok(report)
    }

    /// Analyze and record one image. Returns the summary path if one was written.
    async fn process_one(&self, image: &ImageFile, report: &mut BatchReport) -> Option<PathBuf> {
        report.processed += 1;
        let outcome = self.analyzer.analyze(image).await;

        if let AnalysisOutcome::Failed { reason } = &outcome {
            if self.options.failure_policy == FailurePolicy::SkipWrite {
                warn!(path = %image, %reason, "Analysis failed; leaving no summary so it is retried");
                report.failed += 1;
                return None;
            }
        }

        match write_summary(image.path(), outcome.text_or(&self.options.placeholder)).await {
            Ok(path) => {
                if outcome.is_success() {
                    report.succeeded += 1;
                } else {
                    report.failed += 1;
                }
                Some(path)
            }
            Err(e) => {
                error!(path = %image, error = %e, "Failed to write summary");
                report.failed += 1;
                None
            }
        }
    }
}

/// Warn once per image whose summary path was already claimed by an earlier
/// image in the listing.
fn warn_on_shared_summaries(images: &[ImageFile]) {
    let mut owners: HashMap<PathBuf, &ImageFile> = HashMap::new();
    for image in images {
        let summary = summary_path(image.path());
        match owners.get(&summary) {
            Some(first) => warn!(
                first = %first,
                second = %image,
                summary = %summary.display(),
                "Images share a summary file; both are analyzed and the later one wins"
            ),
            None => {
                owners.insert(summary, image);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies per file name; unknown names get a generic description.
    #[derive(Default)]
    struct ScriptedAnalyzer {
        replies: HashMap<String, AnalysisOutcome>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedAnalyzer {
        fn reply(mut self, file_name: &str, outcome: AnalysisOutcome) -> Self {
            self.replies.insert(file_name.to_string(), outcome);
            self
        }

        fn calls(&self) -> Vec<String> {
            let mut calls = self.calls.lock().unwrap().clone();
            calls.sort();
            calls
        }
    }

    #[async_trait]
    impl ImageAnalyzer for ScriptedAnalyzer {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn analyze(&self, image: &ImageFile) -> AnalysisOutcome {
            self.calls.lock().unwrap().push(image.file_name.clone());
            self.replies
                .get(&image.file_name)
                .cloned()
                .unwrap_or_else(|| AnalysisOutcome::described(format!("about {}", image.file_name)))
        }
    }

    fn scratch_dir(files: &[(&str, &str)]) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cf-pipeline-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        for (name, content) in files {
            std::fs::write(dir.join(name), content).unwrap();
        }
        dir
    }

    fn options(skip_marker: SkipMarker) -> OrchestratorOptions {
        OrchestratorOptions { skip_marker, show_progress: false, ..Default::default() }
    }

    fn read(path: PathBuf) -> String {
        std::fs::read_to_string(path).unwrap()
    }

    #[tokio::test]
    async fn legacy_marker_reprocesses_summarized_image() {
        let dir = scratch_dir(&[("a.jpg", "jpg"), ("b.png", "png"), ("b_summary.txt", "stale")]);
        let orchestrator =
            BatchOrchestrator::new(ScriptedAnalyzer::default(), options(SkipMarker::LegacyTxt));

        let report = orchestrator.run(&dir).await.unwrap();

        assert_eq!(orchestrator.analyzer().calls(), vec!["a.jpg", "b.png"]);
        assert_eq!(report, BatchReport { total: 2, processed: 2, skipped: 0, succeeded: 2, failed: 0 });
        assert_eq!(read(dir.join("a_summary.txt")), "about a.jpg");
        assert_eq!(read(dir.join("b_summary.txt")), "about b.png");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn legacy_marker_honours_plain_txt() {
        let dir = scratch_dir(&[("a.jpg", "jpg"), ("a.txt", "")]);
        let orchestrator =
            BatchOrchestrator::new(ScriptedAnalyzer::default(), options(SkipMarker::LegacyTxt));

        let report = orchestrator.run(&dir).await.unwrap();

        assert!(orchestrator.analyzer().calls().is_empty());
        assert_eq!(report.skipped, 1);
        assert!(!dir.join("a_summary.txt").exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn summary_marker_skips_summarized_image() {
        let dir = scratch_dir(&[("a.jpg", "jpg"), ("b.png", "png"), ("b_summary.txt", "kept")]);
        let orchestrator =
            BatchOrchestrator::new(ScriptedAnalyzer::default(), options(SkipMarker::Summary));

        let report = orchestrator.run(&dir).await.unwrap();

        assert_eq!(orchestrator.analyzer().calls(), vec!["a.jpg"]);
        assert_eq!(report, BatchReport { total: 2, processed: 1, skipped: 1, succeeded: 1, failed: 0 });
        assert_eq!(read(dir.join("b_summary.txt")), "kept");

        // A second run finds nothing left to do.
        let again = orchestrator.run(&dir).await.unwrap();
        assert_eq!(again.skipped, 2);
        assert_eq!(orchestrator.analyzer().calls(), vec!["a.jpg"]);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn images_sharing_a_stem_are_all_analyzed() {
        let dir = scratch_dir(&[("a.jpg", "jpg"), ("a.png", "png")]);
        let orchestrator =
            BatchOrchestrator::new(ScriptedAnalyzer::default(), options(SkipMarker::Summary));

        assert_eq!(orchestrator.plan(&dir).await.unwrap().len(), 2);
        let report = orchestrator.run(&dir).await.unwrap();

        assert_eq!(orchestrator.analyzer().calls(), vec!["a.jpg", "a.png"]);
        assert_eq!(report, BatchReport { total: 2, processed: 2, skipped: 0, succeeded: 2, failed: 0 });
        let summary = read(dir.join("a_summary.txt"));
        assert!(summary == "about a.jpg" || summary == "about a.png", "got {summary}");

        let again = orchestrator.run(&dir).await.unwrap();
        assert_eq!(again.skipped, 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn unreadable_image_gets_placeholder_from_real_client() {
        use captionforge_understanding::{BedrockVisionClient, VisionSettings};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = scratch_dir(&[("ok.png", "png")]);
        std::os::unix::fs::symlink(dir.join("missing.jpg"), dir.join("x.jpg")).unwrap();
        let client = BedrockVisionClient::new(VisionSettings {
            endpoint: format!("http://{addr}"),
            ..Default::default()
        })
        .unwrap();
        let orchestrator = BatchOrchestrator::new(client, options(SkipMarker::Summary));

        let report = orchestrator.run(&dir).await.unwrap();

        assert_eq!(report.total, 2);
        assert_eq!(report.failed, 2);
        assert_eq!(read(dir.join("x_summary.txt")), "Error occurred during analysis.");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn empty_directory_makes_no_calls() {
        let dir = scratch_dir(&[("notes.md", "# not an image")]);
        let orchestrator =
            BatchOrchestrator::new(ScriptedAnalyzer::default(), options(SkipMarker::Summary));

        let report = orchestrator.run(&dir).await.unwrap();

        assert_eq!(report, BatchReport::default());
        assert!(orchestrator.analyzer().calls().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn failure_writes_placeholder() {
        let dir = scratch_dir(&[("broken.jpg", "not really a jpeg"), ("ok.jpeg", "jpg")]);
        let analyzer = ScriptedAnalyzer::default()
            .reply("broken.jpg", AnalysisOutcome::failed("failed to read image"));
        let orchestrator = BatchOrchestrator::new(analyzer, options(SkipMarker::Summary));

        let report = orchestrator.run(&dir).await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(report.succeeded, 1);
        assert_eq!(read(dir.join("broken_summary.txt")), "Error occurred during analysis.");
        assert_eq!(read(dir.join("ok_summary.txt")), "about ok.jpeg");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn raw_fallback_text_is_written_verbatim() {
        let raw = r#"{"id":"msg_1","stop_reason":"end_turn"}"#;
        let dir = scratch_dir(&[("a.png", "png")]);
        let analyzer = ScriptedAnalyzer::default()
            .reply("a.png", AnalysisOutcome::Described { text: raw.to_string(), raw_fallback: true });
        let orchestrator = BatchOrchestrator::new(analyzer, options(SkipMarker::Summary));

        orchestrator.run(&dir).await.unwrap();
        assert_eq!(read(dir.join("a_summary.txt")), raw);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn skip_write_policy_leaves_failed_image_pending() {
        let dir = scratch_dir(&[("a.jpg", "jpg")]);
        let analyzer =
            ScriptedAnalyzer::default().reply("a.jpg", AnalysisOutcome::failed("throttled"));
        let orchestrator = BatchOrchestrator::new(
            analyzer,
            OrchestratorOptions {
                failure_policy: FailurePolicy::SkipWrite,
                ..options(SkipMarker::Summary)
            },
        );

        let report = orchestrator.run(&dir).await.unwrap();

        assert_eq!(report.failed, 1);
        assert!(!summary_path(&dir.join("a.jpg")).exists());
        assert_eq!(orchestrator.plan(&dir).await.unwrap().len(), 1);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn plan_lists_pending_without_calling_analyzer() {
        let dir = scratch_dir(&[("a.jpg", "jpg"), ("b.jpg", "jpg"), ("b_summary.txt", "done")]);
        let orchestrator =
            BatchOrchestrator::new(ScriptedAnalyzer::default(), options(SkipMarker::Summary));

        let pending = orchestrator.plan(&dir).await.unwrap();

        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].file_name, "a.jpg");
        assert!(orchestrator.analyzer().calls().is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn unreachable_service_records_placeholder() {
        use captionforge_understanding::{BedrockVisionClient, VisionSettings};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let dir = scratch_dir(&[("street.jpg", "jpg")]);
        let client = BedrockVisionClient::new(VisionSettings {
            endpoint: format!("http://{addr}"),
            ..Default::default()
        })
        .unwrap();
        let orchestrator = BatchOrchestrator::new(client, options(SkipMarker::Summary));

        let report = orchestrator.run(&dir).await.unwrap();

        assert_eq!(report.failed, 1);
        assert_eq!(read(dir.join("street_summary.txt")), PLACEHOLDER_RESULT);

        std::fs::remove_dir_all(&dir).ok();
    }
}
