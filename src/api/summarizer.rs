//! 多视频摘要器

use crate::api::models::SummaryPlan;
use crate::core::criteria::{Collaborators, LexiconSubjectivityClassifier, SubjectivityClassifier};
use crate::core::error::Result;
use crate::core::video::{Dataset, DatasetLoader, FrameStore};
use crate::core::visual::{BovwQualityScorer, QualityScorer};
use crate::core::{Pipeline, SummarizerConfig, SummaryContext};
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// 多视频摘要 - 片头 + 主观性过滤 + 跨视频去冗余
///
/// ```no_run
/// use multivid_summ::api::summarizer::MultiVideoSummarizer;
/// use multivid_summ::core::video::Dataset;
/// use multivid_summ::core::SummarizerConfig;
///
/// let dataset = Dataset::new("bolos", "data/bolos", vec!["v1".into(), "v2".into()]);
/// let summarizer =
///     MultiVideoSummarizer::create(dataset, "video_frames/bolos", SummarizerConfig::default())?;
/// let plan = summarizer.summarize()?;
/// println!("{}", plan.to_json()?);
/// # Ok::<(), multivid_summ::core::SummaryError>(())
/// ```
pub struct MultiVideoSummarizer {
    loader: DatasetLoader,
    collaborators: Collaborators,
    pipeline: Pipeline,
}

impl MultiVideoSummarizer {
    /// 创建摘要器，默认使用 BoVW 质量评分
    pub fn create(dataset: Dataset, frames_root: impl Into<PathBuf>, config: SummarizerConfig) -> Result<Self> {
        let loader = DatasetLoader::new(dataset, frames_root)?;
        let frames: Arc<dyn FrameStore> = Arc::new(loader.frame_store().clone());
        let quality = Arc::new(BovwQualityScorer::new(frames.clone(), config.visual.clone()));
        let collaborators = Collaborators::new(
            config,
            frames,
            quality,
            Arc::new(LexiconSubjectivityClassifier::default()),
        )?;

        info!(
            "🎬 MultiVideoSummarizer: created for '{}'",
            loader.dataset().name
        );
        Ok(Self {
            loader,
            collaborators,
            pipeline: Pipeline::default(),
        })
    }

    pub fn with_pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn with_subjectivity(mut self, classifier: Arc<dyn SubjectivityClassifier>) -> Self {
        self.collaborators.subjectivity = classifier;
        self
    }

    /// 加载 SentiLex 词典作为主观性分类器
    pub fn with_sentilex(self, path: impl AsRef<Path>) -> Result<Self> {
        let classifier = LexiconSubjectivityClassifier::from_sentilex_file(path)?;
        Ok(self.with_subjectivity(Arc::new(classifier)))
    }

    pub fn with_quality_scorer(mut self, scorer: Arc<dyn QualityScorer>) -> Self {
        self.collaborators.quality = scorer;
        self
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &SummarizerConfig {
        &self.collaborators.config
    }

    /// Runs the pipeline and returns the full context, remaining videos included.
    pub fn run(&self) -> Result<SummaryContext> {
        let videos = self.loader.load_videos()?;
        self.pipeline.run(videos, &self.collaborators)
    }

    /// 执行摘要，返回剪辑计划
    pub fn summarize(&self) -> Result<SummaryPlan> {
        let ctx = self.run()?;
        Ok(SummaryPlan::from_summary(
            self.loader.dataset().name.clone(),
            &ctx.summary,
        ))
    }
}

impl Drop for MultiVideoSummarizer {
    fn drop(&mut self) {
        info!("🗑️ MultiVideoSummarizer: released");
    }
}
