//! Composition Planner - Config to ordered file plan.
//!
//! Walks the cluster table in its fixed order, keeps the clusters whose
//! predicate holds, expands each cluster's entries and seeded examples, and
//! sorts every cluster's files by path. The result depends only on the
//! Config and the registry version.

use tracing::{debug, instrument};

use crate::{
    application::ports::TemplateRegistry,
    domain::{
        Artifact, ArtifactKind, CLUSTER_REGISTRY, ClusterDef, CompositionPlan, Config, DomainValidator,
        DriverSelection, PlanEntry, PlanError, RelativePath, Seed, TestType, WriteOp, fan_out,
    },
    error::QfgResult,
};

pub struct CompositionPlanner;

impl CompositionPlanner {
    /// Compute the plan for `config` and check every template key against
    /// the registry's active version.
    ///
    /// # Errors
    /// - `PlanError::UnknownTemplateKey` for the first key the registry lacks
    /// - `PlanError::DuplicatePath` if two clusters claim the same file
    #[instrument(skip_all, fields(project = %config.project_name(), driver = %config.driver_selection()))]
    pub fn plan(config: &Config, registry: &dyn TemplateRegistry) -> QfgResult<CompositionPlan> {
        let plan = Self::layout(config)?;
        let version = registry.version();

        for key in plan.template_keys() {
            registry.resolve(key, &version)?;
        }

        debug!(files = plan.len(), registry = %version, "Plan composed");
        Ok(plan)
    }

    /// The plan without registry checks.
    ///
    /// The validator uses this to know which files a project should have.
    pub fn layout(config: &Config) -> Result<CompositionPlan, PlanError> {
        let mut entries = Vec::new();

        for cluster in CLUSTER_REGISTRY.iter().filter(|c| c.applies_to(config)) {
            let mut files = Self::expand(cluster, config)?;
            files.sort_by(|a, b| a.path.cmp(&b.path));
            entries.extend(files);
        }

        let plan = CompositionPlan::new(entries);
        DomainValidator::validate_plan(&plan)?;
        Ok(plan)
    }

    fn expand(cluster: &ClusterDef, config: &Config) -> Result<Vec<PlanEntry>, PlanError> {
        let settings = config.settings();

        let mut files = cluster
            .entries
            .iter()
            .map(|entry| {
                Ok(PlanEntry {
                    path: RelativePath::try_new(entry.path(&settings))?,
                    template_key: entry.key(&settings),
                    cluster: cluster.id,
                    artifact: None,
                })
            })
            .collect::<Result<Vec<_>, PlanError>>()?;

        let seeds = match cluster.seed {
            Seed::None => Vec::new(),
            Seed::Driver(driver) => {
                let drivers = DriverSelection::single(driver);
                vec![
                    (Artifact::example(ArtifactKind::Page, TestType::Ui), drivers),
                    (Artifact::example(ArtifactKind::Test, TestType::Ui), drivers),
                ]
            }
            Seed::ApiTest => vec![(
                Artifact::example(ArtifactKind::Test, TestType::Api),
                config.driver_selection(),
            )],
        };

        // Registry files are planned as whole files already listing the
        // examples, so only the creates of a seed's fan-out are kept.
        for (artifact, drivers) in seeds {
            for op in fan_out(&artifact, drivers, &settings)? {
                if let WriteOp::Create { path, template_key } = op {
                    files.push(PlanEntry {
                        path,
                        template_key,
                        cluster: cluster.id,
                        artifact: Some(artifact.clone()),
                    });
                }
            }
        }

        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockTemplateRegistry, RegistryVersion, TemplateBody};
    use crate::domain::{Browser, ClusterId, Feature, Settings, TestDataFormat};

    fn config(driver: DriverSelection) -> Config {
        Config::builder("Shop", "https://shop.test", driver)
            .browsers([Browser::Chrome])
            .build()
            .unwrap()
    }

    fn permissive_registry() -> MockTemplateRegistry {
        let mut registry = MockTemplateRegistry::new();
        registry
            .expect_version()
            .returning(|| RegistryVersion::new("1"));
        registry
            .expect_resolve()
            .returning(|key, _| Ok(TemplateBody::new(key, "")));
        registry
    }

    #[test]
    fn selenium_plan_has_no_playwright_paths() {
        let plan = CompositionPlanner::layout(&config(DriverSelection::Selenium)).unwrap();
        assert!(plan.paths().all(|p| !p.starts_with("pages_pw") && !p.starts_with("tests_pw")));
        assert!(plan.contains("pages/example_page.py"));
        assert!(plan.contains("tests/test_example.py"));
        assert!(plan.contains("pages/locators.py"));
    }

    #[test]
    fn playwright_only_gets_its_own_conftest() {
        let plan = CompositionPlanner::layout(&config(DriverSelection::Playwright)).unwrap();
        let conftest: Vec<_> = plan
            .entries()
            .iter()
            .filter(|e| e.path.as_str() == "conftest.py")
            .collect();
        assert_eq!(conftest.len(), 1);
        assert_eq!(conftest[0].cluster, ClusterId::PlaywrightConftest);
        assert!(!plan.contains("pages/base_page.py"));
    }

    #[test]
    fn both_includes_both_layouts_with_selenium_conftest() {
        let plan = CompositionPlanner::layout(&config(DriverSelection::Both)).unwrap();
        assert!(plan.contains("pages/example_page.py"));
        assert!(plan.contains("pages_pw/example_page_pw.py"));
        assert!(plan.contains("tests_pw/test_example_pw.py"));
        assert_eq!(plan.in_cluster(ClusterId::PlaywrightConftest).count(), 0);
    }

    #[test]
    fn clusters_keep_order_and_sort_within() {
        let config = Config::builder("Shop", "https://shop.test", DriverSelection::Both)
            .browsers([Browser::Chrome])
            .feature(Feature::Docker, true)
            .feature(Feature::ApiTesting, true)
            .build()
            .unwrap();
        let plan = CompositionPlanner::layout(&config).unwrap();

        let clusters: Vec<ClusterId> = plan.entries().iter().map(|e| e.cluster).collect();
        let mut sorted = clusters.clone();
        sorted.sort();
        assert_eq!(clusters, sorted);

        for id in [ClusterId::Base, ClusterId::Selenium, ClusterId::Api] {
            let paths: Vec<&str> = plan.in_cluster(id).map(|e| e.path.as_str()).collect();
            let mut expected = paths.clone();
            expected.sort();
            assert_eq!(paths, expected, "cluster {id}");
        }

        assert!(plan.contains("tests/test_example_api.py"));
        assert!(plan.contains("docker-compose.yml"));
    }

    #[test]
    fn settings_pick_variant_files() {
        let config = Config::builder("Shop", "https://shop.test", DriverSelection::Playwright)
            .settings(Settings {
                test_data_format: TestDataFormat::Json,
                playwright_async: false,
                ..Settings::default()
            })
            .build()
            .unwrap();
        let plan = CompositionPlanner::layout(&config).unwrap();

        assert!(plan.contains("tests/data/test_data.json"));
        let keys = plan.template_keys();
        assert!(keys.contains(&"playwright/page-sync"));
        assert!(keys.contains(&"playwright-conftest/conftest-sync"));
        assert!(!keys.contains(&"playwright/page-async"));
    }

    #[test]
    fn plan_is_deterministic() {
        let c = config(DriverSelection::Both);
        let registry = permissive_registry();
        let first = CompositionPlanner::plan(&c, &registry).unwrap();
        let second = CompositionPlanner::plan(&c, &registry).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn unknown_key_fails_the_plan() {
        let mut registry = MockTemplateRegistry::new();
        registry
            .expect_version()
            .returning(|| RegistryVersion::new("1"));
        registry.expect_resolve().returning(|key, version| {
            if key == "selenium/locators" {
                Err(PlanError::UnknownTemplateKey {
                    key: key.to_string(),
                    version: version.to_string(),
                })
            } else {
                Ok(TemplateBody::new(key, ""))
            }
        });

        let err = CompositionPlanner::plan(&config(DriverSelection::Selenium), &registry)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::QfgError::Plan(PlanError::UnknownTemplateKey { ref key, .. })
                if key == "selenium/locators"
        ));
    }
}
