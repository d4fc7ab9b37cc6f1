//! Override engine
//!
//! For every configured chart: find the `HelmRelease`, resolve the chart
//! reference and the override values, then rewrite `spec.chart.ref` and merge
//! the values under `spec.values`.

use chartpatch_domain::{
    CHART_REF_PATH, ChartOverride, GlobalTable, Gvk, NestedPatch, OverrideConfig, Resource,
    ResourceId, VALUES_PATH, Value, set_existing,
};
use tracing::{Dispatch, debug, error, info, info_span, warn};

use super::state::{EngineState, RunReport};
use crate::error::{EngineError, EngineResult};
use crate::ports::{ResourceCollection, ResourceFactory, ResourceHandle};
use crate::variable_resolver::VariableResolver;

enum ChartOutcome {
    Patched,
    Skipped,
}

/// Applies chart overrides to `HelmRelease` resources.
///
/// # Example
///
/// ```
/// use chartpatch_application::OverrideEngine;
/// use chartpatch_application::ports::ResourceFactory;
/// use chartpatch_domain::{Resource, ValueMap};
///
/// struct Plain;
///
/// impl ResourceFactory for Plain {
///     fn from_map(&self, map: ValueMap) -> Resource {
///         Resource::from_map(map)
///     }
/// }
///
/// let engine = OverrideEngine::configure(b"global: {env: prod}\ncharts: []\n", Plain).unwrap();
/// assert!(engine.charts().is_empty());
/// ```
pub struct OverrideEngine<F> {
    globals: GlobalTable,
    charts: Vec<ChartOverride>,
    factory: F,
    dispatch: Option<Dispatch>,
    state: EngineState,
}

impl<F: ResourceFactory> OverrideEngine<F> {
    /// Parses YAML configuration bytes and builds an engine.
    ///
    /// No resource is touched while configuring.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the bytes do not decode or a
    /// chart has no name, and [`EngineError::MissingCharts`] if the `charts`
    /// list is absent.
    pub fn configure(bytes: &[u8], factory: F) -> EngineResult<Self> {
        let config: OverrideConfig = serde_yaml::from_slice(bytes)
            .map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        Self::from_config(config, factory)
    }

    /// Builds an engine from an already decoded configuration.
    ///
    /// # Errors
    ///
    /// See [`OverrideEngine::configure`].
    pub fn from_config(config: OverrideConfig, factory: F) -> EngineResult<Self> {
        let charts = config.charts.ok_or(EngineError::MissingCharts)?;
        if let Some(index) = charts.iter().position(|chart| chart.name.is_empty()) {
            return Err(EngineError::InvalidConfig(format!(
                "charts[{index}] has an empty chartName"
            )));
        }

        Ok(Self {
            globals: config.global,
            charts,
            factory,
            dispatch: None,
            state: EngineState::Configured,
        })
    }

    /// Routes the engine's logs to `dispatch` instead of the default subscriber.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    /// Returns the global variables.
    #[must_use]
    pub const fn globals(&self) -> &GlobalTable {
        &self.globals
    }

    /// Returns the configured charts in application order.
    #[must_use]
    pub fn charts(&self) -> &[ChartOverride] {
        &self.charts
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &EngineState {
        &self.state
    }

    /// Applies every chart override to `collection`.
    ///
    /// A chart whose target is absent is logged and skipped. Any other
    /// failure stops the run; changes made for earlier charts stay in place.
    ///
    /// # Errors
    ///
    /// Returns the first error encountered.
    pub fn run<C: ResourceCollection>(&mut self, collection: &mut C) -> EngineResult<RunReport> {
        self.state = EngineState::Running;

        let outcome = match &self.dispatch {
            Some(dispatch) => {
                tracing::dispatcher::with_default(dispatch, || self.apply_all(collection))
            }
            None => self.apply_all(collection),
        };

        self.state = match &outcome {
            Ok(_) => EngineState::Succeeded,
            Err(e) => EngineState::Failed {
                error: e.to_string(),
            },
        };
        outcome
    }

    /// Builds the patch document for one chart without touching any resource.
    ///
    /// The result has the shape `{spec: {values: <nested overrides>}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if a value references an undefined global or two
    /// override paths collide.
    pub fn patch_for(&self, chart: &ChartOverride) -> EngineResult<Resource> {
        self.build_patch(&VariableResolver::new(&self.globals), chart)
    }

    fn apply_all<C: ResourceCollection>(&self, collection: &mut C) -> EngineResult<RunReport> {
        let resolver = VariableResolver::new(&self.globals);
        let mut report = RunReport::default();

        for chart in &self.charts {
            let span = info_span!("chart_override", chart = %chart.name);
            let _entered = span.enter();

            match self.apply_chart(&resolver, chart, collection)? {
                ChartOutcome::Patched => report.patched.push(chart.name.clone()),
                ChartOutcome::Skipped => report.skipped.push(chart.name.clone()),
            }
        }

        info!(
            patched = report.patched.len(),
            skipped = report.skipped.len(),
            "chart overrides applied"
        );
        Ok(report)
    }

    fn apply_chart<C: ResourceCollection>(
        &self,
        resolver: &VariableResolver<'_>,
        chart: &ChartOverride,
        collection: &mut C,
    ) -> EngineResult<ChartOutcome> {
        let id = ResourceId::new(Gvk::helm_release(), chart.name.as_str());
        let target = collection
            .find_by_id(&id)
            .map_err(|source| EngineError::LookupFailed {
                name: chart.name.clone(),
                source,
            })?;
        let Some(target) = target else {
            warn!("target not found: {}", chart.name);
            return Ok(ChartOutcome::Skipped);
        };

        // Everything that can fail on configuration content is resolved
        // before the target is written.
        let reference = chart
            .reference()
            .map(|reference| resolver.resolve(&Value::from(reference)))
            .transpose()?;
        let patch = self.build_patch(resolver, chart)?;

        if let Some(reference) = reference {
            debug!(reference = %reference, "rewriting chart reference");
            set_existing(target.fields_mut(), &CHART_REF_PATH, reference).map_err(|source| {
                EngineError::MalformedTarget {
                    name: chart.name.clone(),
                    source,
                }
            })?;
        }

        if let Err(source) = target.apply_patch(&patch) {
            error!("patch error: {source}");
            return Err(EngineError::PatchFailed {
                name: chart.name.clone(),
                source,
            });
        }

        info!(values = chart.overrides.len(), "patched HelmRelease {}", chart.name);
        Ok(ChartOutcome::Patched)
    }

    fn build_patch(
        &self,
        resolver: &VariableResolver<'_>,
        chart: &ChartOverride,
    ) -> EngineResult<Resource> {
        let mut values = NestedPatch::new();
        for (path, value) in &chart.overrides {
            let resolved = resolver.resolve(value)?;
            values.insert_dotted(path, resolved)?;
        }

        let mut envelope = NestedPatch::new();
        envelope.insert(&VALUES_PATH, values.into_value())?;
        Ok(self.factory.from_map(envelope.into_map()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{CollectionError, PatchError};
    use chartpatch_domain::{DomainError, ValueMap};
    use pretty_assertions::assert_eq;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing_test::traced_test;

    struct TestFactory;

    impl ResourceFactory for TestFactory {
        fn from_map(&self, map: ValueMap) -> Resource {
            Resource::from_map(map)
        }
    }

    struct MockHandle {
        resource: Resource,
        patches: Vec<Resource>,
        reject_patch: bool,
    }

    impl ResourceHandle for MockHandle {
        fn fields_mut(&mut self) -> &mut ValueMap {
            self.resource.fields_mut()
        }

        fn apply_patch(&mut self, patch: &Resource) -> Result<(), PatchError> {
            if self.reject_patch {
                return Err(PatchError::Rejected("immutable field".to_string()));
            }
            self.patches.push(patch.clone());
            self.resource.merge(patch);
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockCollection {
        handles: Vec<MockHandle>,
        fail_lookup: bool,
    }

    impl MockCollection {
        fn with_releases(names: &[&str]) -> Self {
            Self {
                handles: names
                    .iter()
                    .map(|name| MockHandle {
                        resource: release(name),
                        patches: Vec::new(),
                        reject_patch: false,
                    })
                    .collect(),
                fail_lookup: false,
            }
        }

        fn resource(&self, name: &str) -> &Resource {
            &self.handle(name).resource
        }

        fn handle(&self, name: &str) -> &MockHandle {
            self.handles
                .iter()
                .find(|h| h.resource.id().unwrap().name == name)
                .unwrap()
        }

        fn snapshot(&self) -> Vec<Resource> {
            self.handles.iter().map(|h| h.resource.clone()).collect()
        }
    }

    impl ResourceCollection for MockCollection {
        type Handle = MockHandle;

        fn find_by_id(
            &mut self,
            id: &ResourceId,
        ) -> Result<Option<&mut MockHandle>, CollectionError> {
            if self.fail_lookup {
                return Err(CollectionError::Backend("connection refused".to_string()));
            }
            Ok(self
                .handles
                .iter_mut()
                .find(|h| h.resource.id().is_ok_and(|found| id.selects(&found))))
        }
    }

    fn release(name: &str) -> Resource {
        serde_yaml::from_str(&format!(
            r"
apiVersion: helm.fluxcd.io/v1
kind: HelmRelease
metadata:
  name: {name}
spec:
  chart:
    repository: https://charts.example.com
    name: {name}
    ref: main
  values:
    conf:
      replicas: 1
"
        ))
        .unwrap()
    }

    fn yaml(text: &str) -> Value {
        serde_yaml::from_str(text).unwrap()
    }

    fn engine(config: &str) -> OverrideEngine<TestFactory> {
        OverrideEngine::configure(config.as_bytes(), TestFactory).unwrap()
    }

    const DB_CONFIG: &str = r"
global:
  env: prod
charts:
  - chartName: db
    chartRef: repo/$(env)-chart
    override:
      conf.replicas: 3
      conf.tag: $(env)-v1
";

    #[test]
    fn test_configure_rejects_invalid_yaml() {
        let result = OverrideEngine::configure(b"charts: [unclosed", TestFactory);
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_configure_requires_charts() {
        let result = OverrideEngine::configure(b"global:\n  env: prod\n", TestFactory);
        assert!(matches!(result, Err(EngineError::MissingCharts)));
    }

    #[test]
    fn test_configure_rejects_unnamed_chart() {
        let result = OverrideEngine::configure(b"charts:\n  - chartRef: v1\n", TestFactory);
        assert!(matches!(result, Err(EngineError::InvalidConfig(msg)) if msg.contains("charts[0]")));
    }

    #[test]
    fn test_empty_charts_is_a_successful_run() {
        let mut engine = engine("charts: []\n");
        let mut collection = MockCollection::with_releases(&["db"]);

        let report = engine.run(&mut collection).unwrap();

        assert_eq!(report, RunReport::default());
        assert_eq!(engine.state(), &EngineState::Succeeded);
        assert_eq!(collection.resource("db"), &release("db"));
    }

    #[test]
    fn test_rewrites_reference_and_patches_values() {
        let mut engine = engine(DB_CONFIG);
        let mut collection = MockCollection::with_releases(&["db"]);

        let report = engine.run(&mut collection).unwrap();

        assert_eq!(report.patched, vec!["db"]);
        let db = collection.handle("db");
        assert_eq!(
            db.resource.get(&CHART_REF_PATH),
            Some(&Value::from("repo/prod-chart"))
        );
        assert_eq!(db.patches.len(), 1);
        assert_eq!(
            db.patches[0].clone().into_value(),
            yaml("{spec: {values: {conf: {replicas: 3, tag: prod-v1}}}}")
        );
        assert_eq!(
            db.resource.get(&VALUES_PATH),
            Some(&yaml("{conf: {replicas: 3, tag: prod-v1}}"))
        );
    }

    #[test]
    fn test_reference_keeps_global_type() {
        let mut engine = engine("global: {version: 2}\ncharts:\n  - chartName: db\n    chartRef: $(version)\n");
        let mut collection = MockCollection::with_releases(&["db"]);

        engine.run(&mut collection).unwrap();

        assert_eq!(
            collection.resource("db").get(&CHART_REF_PATH),
            Some(&Value::Integer(2))
        );
    }

    #[test]
    fn test_without_reference_field_is_untouched() {
        let mut engine = engine("charts:\n  - chartName: db\n    override:\n      conf.tag: v2\n");
        let mut collection = MockCollection::with_releases(&["db"]);

        engine.run(&mut collection).unwrap();

        assert_eq!(
            collection.resource("db").get(&CHART_REF_PATH),
            Some(&Value::from("main"))
        );
    }

    #[test]
    #[traced_test]
    fn test_missing_target_is_skipped() {
        let mut engine = engine(DB_CONFIG);
        let mut collection = MockCollection::with_releases(&["cache"]);
        let before = collection.snapshot();

        let report = engine.run(&mut collection).unwrap();

        assert_eq!(report.skipped, vec!["db"]);
        assert!(report.patched.is_empty());
        assert_eq!(engine.state(), &EngineState::Succeeded);
        assert_eq!(collection.snapshot(), before);
        assert!(logs_contain("target not found: db"));
    }

    #[test]
    fn test_skip_continues_with_next_chart() {
        let mut engine = engine(
            "charts:\n  - chartName: absent\n  - chartName: db\n    override: {conf.tag: v2}\n",
        );
        let mut collection = MockCollection::with_releases(&["db"]);

        let report = engine.run(&mut collection).unwrap();

        assert_eq!(report.skipped, vec!["absent"]);
        assert_eq!(report.patched, vec!["db"]);
        assert_eq!(report.total(), 2);
    }

    #[test]
    fn test_undefined_variable_aborts_without_mutation() {
        let mut engine = engine(
            r"
global: {env: prod}
charts:
  - chartName: db
    chartRef: repo/$(env)-chart
    override:
      conf.tag: $(missing)
  - chartName: cache
    override:
      conf.tag: $(env)
",
        );
        let mut collection = MockCollection::with_releases(&["db", "cache"]);
        let before = collection.snapshot();

        let err = engine.run(&mut collection).unwrap_err();

        assert!(matches!(err, EngineError::UndefinedVariable(ref name) if name == "missing"));
        assert_eq!(collection.snapshot(), before);
        assert!(matches!(engine.state(), EngineState::Failed { .. }));
    }

    #[test]
    fn test_recursive_global_aborts_without_mutation() {
        let mut engine = engine(
            "global:\n  d: $(d)$(d)\ncharts:\n  - chartName: db\n    chartRef: p$(d)\n",
        );
        let mut collection = MockCollection::with_releases(&["db"]);
        let before = collection.snapshot();

        let err = engine.run(&mut collection).unwrap_err();

        assert!(matches!(err, EngineError::RecursiveReference(ref name) if name == "d"));
        assert_eq!(collection.snapshot(), before);
    }

    #[test]
    fn test_earlier_charts_persist_after_failure() {
        let mut engine = engine(
            r"
charts:
  - chartName: db
    override: {conf.tag: v2}
  - chartName: cache
    chartRef: $(missing)
",
        );
        let mut collection = MockCollection::with_releases(&["db", "cache"]);

        let err = engine.run(&mut collection).unwrap_err();

        assert!(matches!(err, EngineError::UndefinedVariable(_)));
        assert_eq!(
            collection.resource("db").get(&["spec", "values", "conf", "tag"]),
            Some(&Value::from("v2"))
        );
        assert_eq!(collection.resource("cache"), &release("cache"));
    }

    #[test]
    fn test_lookup_failure_aborts() {
        let mut engine = engine(DB_CONFIG);
        let mut collection = MockCollection {
            fail_lookup: true,
            ..MockCollection::with_releases(&["db"])
        };

        let err = engine.run(&mut collection).unwrap_err();

        assert!(matches!(err, EngineError::LookupFailed { ref name, .. } if name == "db"));
    }

    #[test]
    #[traced_test]
    fn test_patch_failure_is_logged_and_propagated() {
        let mut engine = engine(DB_CONFIG);
        let mut collection = MockCollection::with_releases(&["db"]);
        collection.handles[0].reject_patch = true;

        let err = engine.run(&mut collection).unwrap_err();

        assert!(matches!(err, EngineError::PatchFailed { source: PatchError::Rejected(_), .. }));
        assert!(logs_contain("patch error: patch rejected: immutable field"));
    }

    #[test]
    fn test_reference_requires_chart_mapping() {
        let mut engine = engine("charts:\n  - chartName: db\n    chartRef: v2\n");
        let mut collection = MockCollection::with_releases(&["db"]);
        collection.handles[0]
            .resource
            .fields_mut()
            .insert("spec".to_string(), yaml("{values: {}}"));

        let err = engine.run(&mut collection).unwrap_err();

        assert!(matches!(
            err,
            EngineError::MalformedTarget { source: DomainError::MissingField { ref field }, .. }
                if field == "spec.chart"
        ));
    }

    #[test]
    fn test_path_collision_aborts() {
        let mut engine = engine(
            "charts:\n  - chartName: db\n    override:\n      image: nginx\n      image.tag: '1.25'\n",
        );
        let mut collection = MockCollection::with_releases(&["db"]);
        let before = collection.snapshot();

        let err = engine.run(&mut collection).unwrap_err();

        assert!(matches!(
            err,
            EngineError::Domain(DomainError::PathCollision(ref path)) if path == "image.tag"
        ));
        assert_eq!(collection.snapshot(), before);
    }

    #[test]
    fn test_running_twice_is_idempotent() {
        let mut engine = engine(DB_CONFIG);
        let mut collection = MockCollection::with_releases(&["db"]);

        engine.run(&mut collection).unwrap();
        let first = collection.snapshot();
        engine.run(&mut collection).unwrap();

        assert_eq!(collection.snapshot(), first);
    }

    #[test]
    fn test_patch_for_builds_envelope() {
        let engine = engine(DB_CONFIG);

        let patch = engine.patch_for(&engine.charts()[0]).unwrap();

        assert_eq!(
            patch.into_value(),
            yaml("{spec: {values: {conf: {replicas: 3, tag: prod-v1}}}}")
        );
    }

    #[test]
    fn test_state_starts_configured() {
        let engine = engine(DB_CONFIG);
        assert_eq!(engine.state(), &EngineState::Configured);
        assert!(!engine.state().is_finished());
        assert_eq!(engine.globals().lookup("env"), Some(&Value::from("prod")));
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_injected_dispatch_receives_logs() {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let mut engine = engine(DB_CONFIG).with_dispatch(Dispatch::new(subscriber));
        let mut collection = MockCollection::default();
        engine.run(&mut collection).unwrap();

        let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("target not found: db"));
    }
}
