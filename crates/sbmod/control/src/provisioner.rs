//! The provisioning pass: validate, build, reconcile, apply, project

use crate::config::EngineConfig;
use crate::error::{ProvisionError, Result};
use dashmap::DashMap;
use sbmod_catalog::ConstraintCatalog;
use sbmod_graph::{GraphBuilder, ResourceGraph};
use sbmod_output::{project, OutputSet};
use sbmod_reconcile::{
    ApplyBackend, ApplyReport, InMemoryBackend, ObservedStateReader, PlanApplier, Reconciler,
    ReconciliationPlan,
};
use sbmod_types::RawNamespaceConfig;
use sbmod_validator::{ValidatedConfig, Validator};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, instrument};

/// Result of a planning pass
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub config: ValidatedConfig,
    pub desired: ResourceGraph,
    pub plan: ReconciliationPlan,
    /// Outputs as they will read once the plan is applied
    pub outputs: OutputSet,
}

/// Result of an apply pass
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub plan: ReconciliationPlan,
    pub report: ApplyReport,
    pub outputs: OutputSet,
}

impl ApplyOutcome {
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }

    /// Turn failed or skipped nodes into an error
    pub fn ensure_applied(self) -> Result<Self> {
        if self.report.is_success() {
            return Ok(self);
        }
        let report = self.report.clone();
        report.into_result()?;
        Ok(self)
    }
}

/// Runs provisioning passes against one backend.
///
/// Passes for the same namespace are serialized; passes for different
/// namespaces run concurrently.
pub struct Provisioner {
    validator: Validator,
    builder: GraphBuilder,
    reconciler: Reconciler,
    applier: PlanApplier,
    backend: Arc<dyn ApplyBackend>,
    observed: Arc<dyn ObservedStateReader>,
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl Provisioner {
    pub fn builder() -> ProvisionerBuilder {
        ProvisionerBuilder::new()
    }

    /// Validate a raw document without touching any backend
    pub fn validate(&self, raw: RawNamespaceConfig) -> Result<ValidatedConfig> {
        Ok(self.validator.validate(raw)?)
    }

    /// Validate and plan against the current observed state
    #[instrument(skip(self, raw), fields(resource_group = %raw.resource_group_name))]
    pub async fn plan(&self, raw: RawNamespaceConfig) -> Result<PlanOutcome> {
        let config = self.validate(raw)?;
        let desired = self.builder.build(&config);
        let observed = self
            .observed
            .read(&config.name)
            .await
            .map_err(ProvisionError::ObservedState)?;

        let plan = self.reconciler.reconcile(&desired, observed.as_ref());
        let outputs = project(&desired, &plan);

        Ok(PlanOutcome {
            config,
            desired,
            plan,
            outputs,
        })
    }

    /// Validate, plan and apply under the namespace lock.
    ///
    /// Node failures are reported in the outcome; see
    /// [`ApplyOutcome::ensure_applied`].
    #[instrument(skip(self, raw), fields(resource_group = %raw.resource_group_name))]
    pub async fn apply(&self, raw: RawNamespaceConfig) -> Result<ApplyOutcome> {
        let config = self.validate(raw)?;
        let _lease = self.lease(&config.name).await;

        let desired = self.builder.build(&config);
        let observed = self
            .observed
            .read(&config.name)
            .await
            .map_err(ProvisionError::ObservedState)?;

        let plan = self.reconciler.reconcile(&desired, observed.as_ref());
        info!(namespace = %config.name, summary = %plan.summary(), "Applying plan");

        let report = self.applier.apply(&plan, self.backend.as_ref()).await;
        let outputs = project(&desired, &plan);

        Ok(ApplyOutcome {
            plan,
            report,
            outputs,
        })
    }

    async fn lease(&self, namespace: &str) -> NamespaceLease<'_> {
        let lock = self
            .locks
            .entry(namespace.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        NamespaceLease {
            locks: &self.locks,
            namespace: namespace.to_string(),
            guard: Some(lock.lock_owned().await),
        }
    }
}

/// Exclusive hold on one namespace; the lock entry is dropped with the last holder
struct NamespaceLease<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    namespace: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for NamespaceLease<'_> {
    fn drop(&mut self) {
        self.guard.take();
        // Waiters hold their own clone, so a count of one means only the table remains
        self.locks
            .remove_if(&self.namespace, |_, lock| Arc::strong_count(lock) == 1);
    }
}

/// Builder for [`Provisioner`]
pub struct ProvisionerBuilder {
    config: EngineConfig,
    catalog: &'static ConstraintCatalog,
    backend: Option<Arc<dyn ApplyBackend>>,
    observed: Option<Arc<dyn ObservedStateReader>>,
}

impl Default for ProvisionerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvisionerBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            catalog: ConstraintCatalog::standard(),
            backend: None,
            observed: None,
        }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_catalog(mut self, catalog: &'static ConstraintCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_backend(mut self, backend: Arc<dyn ApplyBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn with_observed_state(mut self, reader: Arc<dyn ObservedStateReader>) -> Self {
        self.observed = Some(reader);
        self
    }

    /// Use one in-memory backend as both apply target and state reader
    pub fn with_in_memory(self, backend: Arc<InMemoryBackend>) -> Self {
        self.with_backend(backend.clone())
            .with_observed_state(backend)
    }

    pub fn build(self) -> Result<Provisioner> {
        let backend = self
            .backend
            .ok_or(ProvisionError::MissingComponent("apply backend"))?;
        let observed = self
            .observed
            .ok_or(ProvisionError::MissingComponent("observed state reader"))?;

        Ok(Provisioner {
            validator: Validator::new(self.catalog),
            builder: GraphBuilder::new(self.config.provider.subscription_id),
            reconciler: Reconciler::new(),
            applier: PlanApplier::new()
                .with_stop_on_first_failure(self.config.apply.stop_on_first_failure),
            backend,
            observed,
            locks: DashMap::new(),
        })
    }
}
