//! Bundler orchestration
//!
//! Runs the selected plugins through configure → validate → make and
//! aggregates their results. Each plugin is built from its factory and run
//! inside its own tokio task in both modes, so a panicking factory or plugin
//! is reported as an `Internal` failure of that plugin instead of tearing
//! down the run.
//!
//! With `fail_fast` the first failure cancels the run context shared by all
//! plugins. Every spawned task is still awaited before `make` returns.

use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::StreamExt;
use futures::stream::FuturesUnordered;
use tokio::task::JoinError;
use tracing::{debug, info, warn};

use super::registry::PluginFactory;
use super::{
    BundleError, BundleOutput, BundleResult, BundleStage, BundleType, BundlerConfig, Context,
    Registry,
};
use crate::error::{
    Result,
    bundler::{failed, internal},
    fs::write_failed,
    recipe::invalid_request,
};
use crate::recipe::Recipe;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One plugin at a time, ordered by bundle type
    Sequential,
    /// One task per plugin, all started at once
    #[default]
    Parallel,
}

#[derive(Debug, Clone, Default)]
pub struct BundleOptions {
    /// Bundlers to run; empty runs every registered bundler
    pub types: Vec<BundleType>,
    pub fail_fast: bool,
    pub mode: ExecutionMode,
}

/// Outcome of one plugin run
struct Attempt {
    bundle_type: BundleType,
    duration: Duration,
    outcome: std::result::Result<BundleResult, BundleError>,
}

/// Everything a plugin task owns
struct Job {
    bundle_type: BundleType,
    factory: PluginFactory,
    ctx: Context,
    recipe: Arc<Recipe>,
    config: Arc<BundlerConfig>,
    output_dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Bundler {
    registry: Arc<Registry>,
    config: Arc<BundlerConfig>,
}

impl Bundler {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            config: Arc::new(BundlerConfig::default()),
        }
    }

    /// Configuration handed to every `Configurable` plugin
    pub fn with_config(mut self, config: BundlerConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Run the selected bundlers against `recipe`, writing under `output_dir`
    ///
    /// # Errors
    ///
    /// - `InvalidRequest` when no recipe is supplied
    /// - `FileWriteFailed` when the output directory cannot be created
    /// - `BundlerFailed` for the first failure when `fail_fast` is set
    ///
    /// Without `fail_fast`, plugin failures are reported in
    /// [`BundleOutput::errors`] and the call succeeds.
    pub async fn make(
        &self,
        ctx: &Context,
        recipe: Option<&Recipe>,
        output_dir: &Path,
        options: &BundleOptions,
    ) -> Result<BundleOutput> {
        let started = Instant::now();
        let recipe = recipe.ok_or_else(|| invalid_request("recipe is required"))?;
        let output_dir = prepare_output_dir(output_dir).await?;

        let selected = self.select(&options.types);
        let mut output = BundleOutput::new(output_dir.clone());
        if selected.is_empty() {
            warn!("No bundlers selected");
            output.total_duration = started.elapsed();
            return Ok(output);
        }

        info!(
            count = selected.len(),
            mode = ?options.mode,
            fail_fast = options.fail_fast,
            output_dir = %output_dir.display(),
            "Running bundlers"
        );

        let run_ctx = ctx.child();
        let recipe = Arc::new(recipe.clone());
        let jobs = selected.into_iter().map(|(bundle_type, factory)| Job {
            bundle_type,
            factory,
            ctx: run_ctx.clone(),
            recipe: Arc::clone(&recipe),
            config: Arc::clone(&self.config),
            output_dir: output_dir.clone(),
        });

        let attempts = match options.mode {
            ExecutionMode::Sequential => run_sequential(jobs, &run_ctx, options.fail_fast).await,
            ExecutionMode::Parallel => run_parallel(jobs, &run_ctx, options.fail_fast).await,
        };

        let mut first_failure: Option<BundleError> = None;
        for attempt in attempts {
            match attempt.outcome {
                Ok(result) => {
                    debug!(
                        bundler = %attempt.bundle_type,
                        files = result.files.len(),
                        size = result.size,
                        "Bundler finished"
                    );
                    output.push_success(result);
                }
                Err(error) => {
                    warn!(
                        bundler = %error.bundler_type,
                        stage = %error.stage,
                        error = %error.message,
                        "Bundler failed"
                    );
                    if first_failure.is_none() {
                        first_failure = Some(error.clone());
                    }
                    output.push_failure(error, attempt.duration);
                }
            }
        }
        output.total_duration = started.elapsed();

        if options.fail_fast {
            if let Some(error) = first_failure {
                return Err(failed(&error));
            }
        }

        info!(
            succeeded = output.successes().count(),
            failed = output.errors.len(),
            total_files = output.total_files,
            total_size = output.total_size,
            "Bundling complete"
        );
        Ok(output)
    }

    /// Factories for the requested types, sorted by type
    fn select(&self, requested: &[BundleType]) -> Vec<(BundleType, PluginFactory)> {
        let mut selected: Vec<(BundleType, PluginFactory)> = if requested.is_empty() {
            self.registry
                .registered_types()
                .into_iter()
                .filter_map(|t| self.registry.factory(&t).map(|factory| (t, factory)))
                .collect()
        } else {
            let mut seen = Vec::new();
            requested
                .iter()
                .filter(|t| {
                    if seen.contains(*t) {
                        return false;
                    }
                    seen.push((*t).clone());
                    true
                })
                .filter_map(|t| match self.registry.factory(t) {
                    Some(factory) => Some((t.clone(), factory)),
                    None => {
                        warn!(bundler = %t, "Skipping unknown bundler");
                        None
                    }
                })
                .collect()
        };
        selected.sort_by(|a, b| a.0.cmp(&b.0));
        selected
    }
}

async fn prepare_output_dir(output_dir: &Path) -> Result<PathBuf> {
    let dir = if output_dir.as_os_str().is_empty() {
        std::env::current_dir()?
    } else {
        output_dir.to_path_buf()
    };
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| write_failed(dir.display().to_string(), e.to_string()))?;
    Ok(dir)
}

async fn run_sequential(
    jobs: impl Iterator<Item = Job>,
    run_ctx: &Context,
    fail_fast: bool,
) -> Vec<Attempt> {
    let mut attempts = Vec::new();
    for job in jobs {
        let attempt = spawn_job(job).await;
        let stop = fail_fast && attempt.outcome.is_err();
        attempts.push(attempt);
        if stop {
            run_ctx.cancel();
            break;
        }
    }
    attempts
}

async fn run_parallel(
    jobs: impl Iterator<Item = Job>,
    run_ctx: &Context,
    fail_fast: bool,
) -> Vec<Attempt> {
    let mut pending: FuturesUnordered<_> = jobs.map(spawn_job).collect();
    let mut attempts = Vec::with_capacity(pending.len());
    while let Some(attempt) = pending.next().await {
        if fail_fast && attempt.outcome.is_err() && !run_ctx.is_cancelled() {
            debug!(bundler = %attempt.bundle_type, "Cancelling remaining bundlers");
            run_ctx.cancel();
        }
        attempts.push(attempt);
    }
    attempts
}

/// Spawn the job immediately and resolve to its attempt
fn spawn_job(job: Job) -> impl std::future::Future<Output = Attempt> {
    let bundle_type = job.bundle_type.clone();
    let started = Instant::now();
    let handle = tokio::spawn(run_lifecycle(job));
    async move {
        let outcome = match handle.await {
            Ok(outcome) => outcome,
            Err(join_error) => Err(BundleError::new(
                bundle_type.clone(),
                BundleStage::Execution,
                &internal(join_failure(&bundle_type, join_error)),
            )),
        };
        Attempt {
            bundle_type,
            duration: started.elapsed(),
            outcome,
        }
    }
}

async fn run_lifecycle(job: Job) -> std::result::Result<BundleResult, BundleError> {
    let Job {
        bundle_type,
        factory,
        ctx,
        recipe,
        config,
        output_dir,
    } = job;
    let attribute = |stage: BundleStage| {
        let bundle_type = bundle_type.clone();
        move |err: crate::error::StackError| BundleError::new(bundle_type, stage, &err)
    };

    let mut plugin = factory();

    if let Some(configurable) = plugin.as_configurable() {
        debug!(bundler = %bundle_type, "Configuring bundler");
        configurable
            .configure(&config)
            .map_err(attribute(BundleStage::Configuration))?;
    }

    if let Some(validatable) = plugin.as_validatable() {
        debug!(bundler = %bundle_type, "Validating recipe");
        validatable
            .validate(&ctx, &recipe)
            .await
            .map_err(attribute(BundleStage::Validation))?;
    }

    debug!(bundler = %bundle_type, "Generating bundle");
    let mut result = plugin
        .make(&ctx, &recipe, &output_dir)
        .await
        .map_err(attribute(BundleStage::Execution))?;
    result.bundler_type = bundle_type;
    Ok(result)
}

fn join_failure(bundle_type: &BundleType, join_error: JoinError) -> String {
    if join_error.is_panic() {
        format!(
            "bundler '{bundle_type}' panicked: {}",
            panic_message(join_error.into_panic())
        )
    } else {
        format!("bundler '{bundle_type}' task was cancelled")
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundler::BundlePlugin;
    use crate::bundler::writer::BundleWriter;
    use crate::error::ErrorKind;
    use crate::measurement::{Measurement, MeasurementType};
    use crate::recipe::Query;
    use async_trait::async_trait;
    use chrono::Utc;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Copy)]
    enum Behavior {
        Succeed,
        Fail,
        Panic,
        WaitForCancel,
    }

    #[derive(Debug)]
    struct Scripted {
        id: &'static str,
        behavior: Behavior,
    }

    #[async_trait]
    impl BundlePlugin for Scripted {
        fn bundle_type(&self) -> BundleType {
            BundleType::new(self.id)
        }

        async fn make(&self, ctx: &Context, _recipe: &Recipe, out: &Path) -> Result<BundleResult> {
            match self.behavior {
                Behavior::Succeed => {
                    let mut writer = BundleWriter::create(out, &self.bundle_type()).await?;
                    writer.write("values.yaml", "ok: true\n").await?;
                    Ok(writer.finish())
                }
                Behavior::Fail => Err(internal(format!("{} exploded", self.id))),
                Behavior::Panic => panic!("scripted panic"),
                Behavior::WaitForCancel => {
                    ctx.done().await;
                    ctx.check(self.id)?;
                    Ok(BundleResult::new(self.bundle_type()))
                }
            }
        }
    }

    fn registry(plugins: Vec<(&'static str, Behavior)>) -> Arc<Registry> {
        let mut registry = Registry::new();
        for (id, behavior) in plugins {
            registry
                .register(id, move || {
                    Box::new(Scripted { id, behavior }) as Box<dyn BundlePlugin>
                })
                .unwrap();
        }
        Arc::new(registry)
    }

    fn recipe() -> Recipe {
        Recipe {
            request: Query::new(),
            measurements: vec![Measurement::new(MeasurementType::K8s)],
            matched_rules: vec![],
            generated_at: Utc::now(),
            payload_version: "test".to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_recipe_is_invalid_request() {
        let temp = TempDir::new().unwrap();
        let bundler = Bundler::new(registry(vec![]));
        let err = bundler
            .make(&Context::new(), None, temp.path(), &BundleOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::StackError::InvalidRequest { .. }));
    }

    #[tokio::test]
    async fn test_sequential_fail_fast_stops_after_first_failure() {
        let temp = TempDir::new().unwrap();
        let bundler = Bundler::new(registry(vec![
            ("a", Behavior::Fail),
            ("b", Behavior::Succeed),
        ]));
        let options = BundleOptions {
            fail_fast: true,
            mode: ExecutionMode::Sequential,
            ..BundleOptions::default()
        };

        let err = bundler
            .make(&Context::new(), Some(&recipe()), temp.path(), &options)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("a exploded"));
        assert!(!temp.path().join("b").exists());
    }

    #[tokio::test]
    async fn test_parallel_fail_fast_cancels_siblings() {
        let temp = TempDir::new().unwrap();
        let bundler = Bundler::new(registry(vec![
            ("fails", Behavior::Fail),
            ("waits", Behavior::WaitForCancel),
        ]));
        let options = BundleOptions {
            fail_fast: true,
            ..BundleOptions::default()
        };

        let err = bundler
            .make(&Context::new(), Some(&recipe()), temp.path(), &options)
            .await
            .unwrap_err();
        match err {
            crate::error::StackError::BundlerFailed {
                bundler_type,
                stage,
                ..
            } => {
                assert_eq!(bundler_type, "fails");
                assert_eq!(stage, BundleStage::Execution);
            }
            other => panic!("Expected BundlerFailed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_panic_is_contained() {
        let temp = TempDir::new().unwrap();
        let bundler = Bundler::new(registry(vec![
            ("boom", Behavior::Panic),
            ("fine", Behavior::Succeed),
        ]));

        let output = bundler
            .make(
                &Context::new(),
                Some(&recipe()),
                temp.path(),
                &BundleOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(output.results.len(), 2);
        assert_eq!(output.errors.len(), 1);
        assert_eq!(output.errors[0].bundler_type.as_str(), "boom");
        assert!(output.errors[0].message.contains("scripted panic"));
        assert_eq!(output.errors[0].kind, ErrorKind::Internal);
        assert_eq!(output.errors[0].code.as_deref(), Some("stackforge::internal"));
        assert!(output.result(&BundleType::new("fine")).unwrap().success);
    }

    #[tokio::test]
    async fn test_panicking_factory_is_contained() {
        let temp = TempDir::new().unwrap();
        let mut registry = Registry::new();
        registry
            .register("broken", || -> Box<dyn BundlePlugin> {
                panic!("factory exploded")
            })
            .unwrap();
        registry
            .register("fine", || {
                Box::new(Scripted {
                    id: "fine",
                    behavior: Behavior::Succeed,
                }) as Box<dyn BundlePlugin>
            })
            .unwrap();
        let bundler = Bundler::new(Arc::new(registry));

        for mode in [ExecutionMode::Parallel, ExecutionMode::Sequential] {
            let options = BundleOptions {
                mode,
                ..BundleOptions::default()
            };
            let output = bundler
                .make(&Context::new(), Some(&recipe()), temp.path(), &options)
                .await
                .unwrap();

            assert_eq!(output.errors.len(), 1);
            let error = &output.errors[0];
            assert_eq!(error.bundler_type.as_str(), "broken");
            assert_eq!(error.stage, BundleStage::Execution);
            assert_eq!(error.kind, ErrorKind::Internal);
            assert!(error.message.contains("factory exploded"));
            assert!(output.result(&BundleType::new("fine")).unwrap().success);
        }
    }

    #[tokio::test]
    async fn test_fail_fast_keeps_timeout_kind() {
        let temp = TempDir::new().unwrap();
        let bundler = Bundler::new(registry(vec![("waits", Behavior::WaitForCancel)]));
        let options = BundleOptions {
            fail_fast: true,
            ..BundleOptions::default()
        };

        let err = bundler
            .make(
                &Context::with_timeout(Duration::ZERO),
                Some(&recipe()),
                temp.path(),
                &options,
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Timeout);
        assert_eq!(
            err.context().get("cause").map(String::as_str),
            Some("stackforge::timeout")
        );
    }

    #[tokio::test]
    async fn test_duplicate_and_unknown_names_in_selection() {
        let temp = TempDir::new().unwrap();
        let bundler = Bundler::new(registry(vec![("a", Behavior::Succeed)]));
        let options = BundleOptions {
            types: vec![
                BundleType::new("a"),
                BundleType::new("missing"),
                BundleType::new("a"),
            ],
            ..BundleOptions::default()
        };

        let output = bundler
            .make(&Context::new(), Some(&recipe()), temp.path(), &options)
            .await
            .unwrap();
        assert_eq!(output.results.len(), 1);
        assert!(output.errors.is_empty());
    }

    #[tokio::test]
    async fn test_output_dir_is_created() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("nested/out");
        let bundler = Bundler::new(registry(vec![("a", Behavior::Succeed)]));

        let output = bundler
            .make(
                &Context::new(),
                Some(&recipe()),
                &target,
                &BundleOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(output.output_dir, target);
        assert!(target.join("a/values.yaml").is_file());
    }
}
