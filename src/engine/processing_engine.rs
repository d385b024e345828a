// EnhancementEngine - 依存性注入による一括補正エンジン
// ディレクトリ列挙から stats.txt の書き出しまでを統括する

use super::{pipeline::EnhancementPipeline, reconcile::reconcile};
use crate::{
    core::{
        EnhanceError, EnhanceJob, EnhanceResult, EnhanceTask, OutcomeCounts, ProcessingConfig,
        ProgressReporter, ReportPersistence, RunClock, RunReport, TaskOutcome, TaskResult,
    },
    enhancer::EnhancementBackend,
    image_loader::ImageLoaderBackend,
    storage::{StorageBackend, StorageItem},
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 一括補正エンジン
///
/// 全ての依存関係をコンストラクタで受け取る。
/// ワーカー間で共有するものは最初からArcで保持する。
pub struct EnhancementEngine<L, E, S, C, R, P> {
    loader: Arc<L>,
    enhancer: Arc<E>,
    storage: Arc<S>,
    config: Arc<C>,
    reporter: Arc<R>,
    persistence: Arc<P>,
}

/// ディスパッチ前の計画
#[derive(Debug, Default)]
struct DispatchPlan {
    input_names: Vec<String>,
    tasks: Vec<EnhanceTask>,
    duplicates: Vec<TaskResult>,
}

impl<L, E, S, C, R, P> EnhancementEngine<L, E, S, C, R, P>
where
    L: ImageLoaderBackend + 'static,
    E: EnhancementBackend + 'static,
    S: StorageBackend + 'static,
    C: ProcessingConfig,
    R: ProgressReporter + 'static,
    P: ReportPersistence + 'static,
{
    pub fn new(
        loader: L,
        enhancer: E,
        storage: S,
        config: C,
        reporter: R,
        persistence: P,
    ) -> Self {
        Self {
            loader: Arc::new(loader),
            enhancer: Arc::new(enhancer),
            storage: Arc::new(storage),
            config: Arc::new(config),
            reporter: Arc::new(reporter),
            persistence: Arc::new(persistence),
        }
    }

    /// 入力ディレクトリを一括補正し、レポートを保存して返す
    ///
    /// ファイル単位の失敗は結果に記録されるだけで、ここではエラーにならない。
    /// 入力ディレクトリの読み込み失敗、出力ディレクトリの作成失敗、
    /// レポートの保存失敗のみが致命的エラーとなる。
    pub async fn run(&self, job: &EnhanceJob) -> EnhanceResult<RunReport> {
        self.validate(job)?;

        let items = self
            .storage
            .list_items(&job.source_dir)
            .await
            .map_err(|e| EnhanceError::source_unreadable(job.source_dir.display().to_string(), e))?;

        self.storage
            .ensure_directory(&job.output_dir)
            .await
            .map_err(|e| EnhanceError::output_unwritable(job.output_dir.display().to_string(), e))?;

        let plan = self.plan(job, items);
        let worker_count = self.config.worker_count();

        info!(
            source = %job.source_dir.display(),
            output = %job.output_dir.display(),
            entries = plan.input_names.len(),
            worker_count,
            "補正処理を開始"
        );

        // 時間予算はここで一度だけ開始する
        let clock = RunClock::start(self.config.time_budget());
        debug!(budget = ?clock.budget(), "時間予算");

        let pipeline = EnhancementPipeline::new(Arc::clone(&self.loader), Arc::clone(&self.enhancer));
        let mut outcomes = pipeline
            .execute(
                plan.tasks,
                clock,
                self.config.as_ref(),
                Arc::clone(&self.reporter),
            )
            .await
            .map_err(|e| match e.downcast::<tokio::task::JoinError>() {
                Ok(join_error) => EnhanceError::task(join_error),
                Err(e) => EnhanceError::parallel_execution(format!("パイプライン実行エラー: {e}")),
            })?;

        let elapsed_seconds = clock.elapsed().as_secs_f64();

        outcomes.extend(plan.duplicates);
        outcomes.sort_by(|a, b| a.filename.cmp(&b.filename));

        let matched_count = reconcile(self.storage.as_ref(), &plan.input_names, &job.output_dir)
            .await
            .map_err(|e| EnhanceError::output_unwritable(job.output_dir.display().to_string(), e))?;

        let report = RunReport {
            matched_count,
            total_input_count: plan.input_names.len(),
            output_dir: job.output_dir.clone(),
            elapsed_seconds,
            worker_count,
            factors: job.factors,
            counts: OutcomeCounts::tally(&outcomes),
            outcomes,
        };

        self.persistence
            .persist(&report)
            .await
            .map_err(EnhanceError::report_persistence)?;

        info!(
            matched = report.matched_count,
            total = report.total_input_count,
            elapsed = report.elapsed_rounded(),
            failed = report.counts.failed,
            "補正処理が完了"
        );

        Ok(report)
    }

    /// 設定と係数の検証
    fn validate(&self, job: &EnhanceJob) -> EnhanceResult<()> {
        if self.config.worker_count() == 0 {
            return Err(EnhanceError::configuration(
                "ワーカー数は1以上である必要があります",
            ));
        }

        if self.config.channel_buffer_size() == 0 {
            return Err(EnhanceError::configuration(
                "チャンネルバッファサイズは1以上である必要があります",
            ));
        }

        job.factors.validate()?;
        Ok(())
    }

    /// 列挙結果からタスクを組み立てる
    ///
    /// 大文字小文字だけが異なる画像名は、整列順で最初のものだけを処理する。
    fn plan(&self, job: &EnhanceJob, mut items: Vec<StorageItem>) -> DispatchPlan {
        items.sort_by(|a, b| a.name.cmp(&b.name));

        let mut plan = DispatchPlan::default();
        let mut claimed = HashSet::new();

        for item in items {
            if self.storage.is_image_file(&item) && !claimed.insert(item.name.to_lowercase()) {
                warn!(filename = %item.name, "大文字小文字違いの同名ファイルのためスキップ");
                plan.duplicates.push(TaskResult::new(
                    item.name.clone(),
                    TaskOutcome::SkippedDuplicate,
                    0,
                ));
            } else {
                plan.tasks.push(job.task_for(item.os_name()));
            }
            plan.input_names.push(item.name);
        }

        debug!(
            tasks = plan.tasks.len(),
            duplicates = plan.duplicates.len(),
            "ディスパッチ計画"
        );
        plan
    }

    /// 設定への参照を取得
    pub fn config(&self) -> &C {
        &self.config
    }

    /// 永続化への参照を取得
    pub fn persistence(&self) -> &P {
        &self.persistence
    }
}
