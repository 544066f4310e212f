//! Orchestration of a full project creation run
//!
//! Stages advance strictly in order:
//! `Init → ManifestResolved → Generated → Staged → Adapted → Renamed →
//! Merged → Published → Installed`. The first error moves the pipeline to
//! `Failed` and nothing further is attempted.
//!
//! The project is assembled inside a private build directory next to the
//! target and published with a single directory rename, so a failed run
//! never leaves a half-built project at the target path.

use crate::error::{Result, ScaffoldError};
use crate::product::{ProductConfig, Sources};
use crate::report::Reporter;
use crate::runtime::{
    CommandInstaller, GenerateRequest, Installer, PackageManager, ProjectGenerator,
    ReactNativeGenerator,
};
use crate::templates::{
    self, Decompress, Fetch, HttpFetcher, LanguageVariant, ResolvedVersion, ZipDecompressor,
};
use std::path::{Path, PathBuf};

/// Pipeline progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ManifestResolved,
    Generated,
    Staged,
    Adapted,
    Renamed,
    Merged,
    Published,
    Installed,
    Failed,
}

/// What the user asked for
#[derive(Debug, Clone)]
pub struct ProjectRequest {
    /// Absolute path of the project to create; must not exist yet
    pub target_dir: PathBuf,
    /// Starter version override; the manifest default otherwise
    pub starter_version: Option<String>,
    /// Keep the typed entry point
    pub use_typed: bool,
    /// Install with npm even when yarn is available
    pub force_npm: bool,
}

/// Summary of a successful run
#[derive(Debug, Clone)]
pub struct Outcome {
    pub project_dir: PathBuf,
    pub project_name: String,
    pub version: ResolvedVersion,
    pub package_manager: PackageManager,
}

impl Outcome {
    /// Instructions for launching the new project on each platform
    pub fn run_instructions(&self) -> Vec<String> {
        let dir = self.project_dir.display();
        let ios_dir = self.project_dir.join("ios");
        let workspace = ios_dir.join(format!("{}.xcworkspace", self.project_name));
        let xcode_project = if workspace.exists() {
            workspace
        } else {
            ios_dir.join(format!("{}.xcodeproj", self.project_name))
        };

        vec![
            "Run instructions for iOS:".to_string(),
            format!("  • cd {} && react-native run-ios", dir),
            "  - or -".to_string(),
            format!("  • Open {} in Xcode", xcode_project.display()),
            "  • Hit the Run button".to_string(),
            "Run instructions for Android:".to_string(),
            "  • Have an Android emulator running (quickest way to get started), or a device connected."
                .to_string(),
            format!("  • cd {} && react-native run-android", dir),
        ]
    }
}

/// Sequencer for one project creation run
pub struct Pipeline<'a, C, F, D, G, I> {
    config: &'a C,
    sources: Sources,
    reporter: &'a dyn Reporter,
    fetcher: F,
    decompressor: D,
    generator: G,
    installer: I,
    stage: Stage,
}

impl<'a, C: ProductConfig>
    Pipeline<'a, C, HttpFetcher, ZipDecompressor, ReactNativeGenerator, CommandInstaller>
{
    /// Pipeline wired to the network, `react-native` and the package managers
    pub fn production(config: &'a C, reporter: &'a dyn Reporter) -> Result<Self> {
        let sources = Sources::from_config(config)?;
        Ok(Self::new(
            config,
            sources,
            reporter,
            HttpFetcher::new(config.user_agent()),
            ZipDecompressor,
            ReactNativeGenerator::new(config.generator_program()),
            CommandInstaller,
        ))
    }
}

impl<'a, C, F, D, G, I> Pipeline<'a, C, F, D, G, I>
where
    C: ProductConfig,
    F: Fetch,
    D: Decompress,
    G: ProjectGenerator,
    I: Installer,
{
    pub fn new(
        config: &'a C,
        sources: Sources,
        reporter: &'a dyn Reporter,
        fetcher: F,
        decompressor: D,
        generator: G,
        installer: I,
    ) -> Self {
        Self {
            config,
            sources,
            reporter,
            fetcher,
            decompressor,
            generator,
            installer,
            stage: Stage::Init,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Create the project described by `request`
    ///
    /// A failure is passed to [`Reporter::fail`] before it is returned.
    pub async fn run(&mut self, request: &ProjectRequest) -> Result<Outcome> {
        match self.run_stages(request).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                self.stage = Stage::Failed;
                self.reporter.fail(&e.to_string());
                Err(e)
            }
        }
    }

    async fn run_stages(&mut self, request: &ProjectRequest) -> Result<Outcome> {
        let target = request.target_dir.as_path();
        let name = project_name(target)?;
        let parent = target
            .parent()
            .ok_or_else(|| ScaffoldError::InvalidName(target.to_path_buf()))?;
        ensure_absent(target)?;

        self.reporter.step("Parse version manifest");
        let version = templates::resolve(
            &self.fetcher,
            &self.sources.manifest,
            request.starter_version.as_deref(),
        )
        .await?;
        self.reporter.done("Parsed version manifest");
        self.reporter
            .info(&format!("Run with starter v{}", version.starter_version));
        self.stage = Stage::ManifestResolved;

        let build_dir = tempfile::Builder::new()
            .prefix(&format!(".{}-", self.config.name()))
            .tempdir_in(parent)
            .map_err(|e| ScaffoldError::io(parent, e))?;
        let build_project = build_dir.path().join(&name);

        self.generate(&build_project, &name, &version, request).await?;
        self.stage = Stage::Generated;

        self.integrate(&build_project, &name, &version, request.use_typed)
            .await?;

        ensure_absent(target)?;
        tokio::fs::rename(&build_project, target)
            .await
            .map_err(|e| ScaffoldError::io(target, e))?;
        self.stage = Stage::Published;

        let package_manager = PackageManager::select(request.force_npm);
        self.installer
            .install(target, package_manager, self.reporter)
            .await?;
        self.stage = Stage::Installed;

        Ok(Outcome {
            project_dir: target.to_path_buf(),
            project_name: name,
            version,
            package_manager,
        })
    }

    async fn generate(
        &mut self,
        project_dir: &Path,
        name: &str,
        version: &ResolvedVersion,
        request: &ProjectRequest,
    ) -> Result<()> {
        let workdir = project_dir
            .parent()
            .ok_or_else(|| ScaffoldError::InvalidName(project_dir.to_path_buf()))?;
        let generate = GenerateRequest {
            workdir,
            name,
            generator_version: &version.generator_version,
            use_typed: request.use_typed,
            force_npm: request.force_npm,
        };

        match self.generator.generate(&generate).await {
            Ok(()) => Ok(()),
            // Generator post-steps can fail after the tree is already written.
            Err(e) if project_dir.is_dir() => {
                self.reporter.fail(&e.to_string());
                self.reporter
                    .warn("Continuing with the partially generated project");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Overlay the starter onto an already generated project
    async fn integrate(
        &mut self,
        project_dir: &Path,
        name: &str,
        version: &ResolvedVersion,
        use_typed: bool,
    ) -> Result<()> {
        self.reporter.step("Integrating");

        let staging = templates::stage(
            &self.fetcher,
            &self.decompressor,
            &self.sources.archive_base,
            &version.starter_version,
            project_dir,
            self.reporter,
        )
        .await?;
        self.stage = Stage::Staged;

        LanguageVariant::from_config(self.config)
            .adapt(
                &staging,
                project_dir,
                use_typed,
                &version.generator_version,
                self.reporter,
            )
            .await?;
        self.stage = Stage::Adapted;

        templates::rename_tree(&staging, name, self.config.placeholder()).await?;
        self.stage = Stage::Renamed;

        templates::merge(&staging, project_dir).await?;
        self.stage = Stage::Merged;

        self.reporter.done("Integrated");
        Ok(())
    }
}

fn project_name(target: &Path) -> Result<String> {
    target
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ScaffoldError::InvalidName(target.to_path_buf()))
}

fn ensure_absent(target: &Path) -> Result<()> {
    if std::fs::symlink_metadata(target).is_ok() {
        return Err(ScaffoldError::PathExists(target.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::tests::RecordingReporter;
    use crate::templates::fetcher::tests::MemoryFetcher;
    use crate::templates::stager::tests::zip_bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use url::Url;

    const MANIFEST_URL: &str = "https://example.com/starter/raw/master/corr.yml";
    const ARCHIVE_BASE: &str = "https://example.com/starter/releases/download/0.1.0";

    #[derive(Clone)]
    struct E2eProduct;

    impl ProductConfig for E2eProduct {
        fn name(&self) -> &'static str {
            "starter-e2e"
        }

        fn display_name(&self) -> &'static str {
            "Starter E2E"
        }

        fn manifest_url(&self) -> &'static str {
            MANIFEST_URL
        }

        fn manifest_url_env(&self) -> &'static str {
            "STARTER_E2E_MANIFEST_URL"
        }

        fn archive_base_url(&self) -> &'static str {
            ARCHIVE_BASE
        }

        fn archive_base_url_env(&self) -> &'static str {
            "STARTER_E2E_ARCHIVE_URL"
        }

        fn typed_entry_point(&self) -> &'static Path {
            Path::new("YourAppName/YourAppName.tsx")
        }
    }

    #[derive(Default)]
    struct FakeGenerator {
        fail: bool,
        skip_tree: bool,
        calls: AtomicUsize,
    }

    impl ProjectGenerator for FakeGenerator {
        async fn generate(&self, request: &GenerateRequest<'_>) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.skip_tree {
                let project = request.workdir.join(request.name);
                std::fs::create_dir_all(&project).unwrap();
                std::fs::write(
                    project.join("package.json"),
                    format!(
                        "{{\n  \"dependencies\": {{\n    \"react-native\": \"{}\"\n  }}\n}}",
                        request.generator_version
                    ),
                )
                .unwrap();
                std::fs::write(project.join("index.js"), "// generated").unwrap();
            }
            if self.fail {
                return Err(ScaffoldError::GeneratorCommandFailed {
                    command: "react-native init".to_string(),
                    reason: "exit code 1".to_string(),
                });
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeInstaller {
        installed: Mutex<Vec<PathBuf>>,
    }

    impl Installer for FakeInstaller {
        async fn install(
            &self,
            project_dir: &Path,
            _package_manager: PackageManager,
            _reporter: &dyn Reporter,
        ) -> Result<()> {
            self.installed.lock().unwrap().push(project_dir.to_path_buf());
            Ok(())
        }
    }

    fn fetcher() -> MemoryFetcher {
        let archive = zip_bytes(&[
            ("YourAppName/YourAppName.tsx", b"// YourAppName.tsx entry"),
            ("yourappname-icon.png", &[0x89, b'P', b'N', b'G']),
            ("package-lock.json", b"{}"),
        ]);
        MemoryFetcher::default()
            .with(
                MANIFEST_URL,
                b"default: 1.0.0\n1.0.0:\n  react-native: 0.60.0\n".to_vec(),
            )
            .with(&format!("{}/modify-1.0.0.zip", ARCHIVE_BASE), archive)
    }

    fn sources() -> Sources {
        Sources {
            manifest: Url::parse(MANIFEST_URL).unwrap(),
            archive_base: Url::parse(ARCHIVE_BASE).unwrap(),
        }
    }

    fn request(parent: &Path, use_typed: bool) -> ProjectRequest {
        ProjectRequest {
            target_dir: parent.join("MyApp"),
            starter_version: None,
            use_typed,
            force_npm: true,
        }
    }

    #[tokio::test]
    async fn test_untyped_project_end_to_end() {
        let parent = tempfile::tempdir().unwrap();
        let reporter = RecordingReporter::default();
        let installer = FakeInstaller::default();
        let mut pipeline = Pipeline::new(
            &E2eProduct,
            sources(),
            &reporter,
            fetcher(),
            ZipDecompressor,
            FakeGenerator::default(),
            &installer,
        );

        let outcome = pipeline.run(&request(parent.path(), false)).await.unwrap();
        let project = parent.path().join("MyApp");

        assert_eq!(pipeline.stage(), Stage::Installed);
        assert_eq!(outcome.version.generator_version, "0.60.0");
        assert_eq!(outcome.package_manager, PackageManager::Npm);
        assert_eq!(
            std::fs::read_to_string(project.join("MyApp/MyApp.js")).unwrap(),
            "// MyApp.js entry"
        );
        assert!(project.join("myapp-icon.png").is_file());
        assert!(project.join("index.js").is_file());
        assert!(!project.join("temp").exists());
        assert!(!project.join("package-lock.json").exists());
        assert!(std::fs::read_to_string(project.join("package.json"))
            .unwrap()
            .contains("\"react-native-unimodules\": \"^0.4.1\""));
        assert_eq!(*installer.installed.lock().unwrap(), vec![project]);

        // Only the published project remains next to the target.
        assert_eq!(std::fs::read_dir(parent.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_typed_project_end_to_end() {
        let parent = tempfile::tempdir().unwrap();
        let reporter = RecordingReporter::default();
        let mut pipeline = Pipeline::new(
            &E2eProduct,
            sources(),
            &reporter,
            fetcher(),
            ZipDecompressor,
            FakeGenerator::default(),
            FakeInstaller::default(),
        );

        pipeline.run(&request(parent.path(), true)).await.unwrap();
        let project = parent.path().join("MyApp");

        assert!(project.join("MyApp/MyApp.tsx").is_file());
        assert!(!project.join("MyApp/MyApp.js").exists());
        assert!(project.join("myapp-icon.png").is_file());
    }

    #[tokio::test]
    async fn test_existing_target_is_refused() {
        let parent = tempfile::tempdir().unwrap();
        std::fs::create_dir(parent.path().join("MyApp")).unwrap();
        let reporter = RecordingReporter::default();
        let generator = FakeGenerator::default();
        let mut pipeline = Pipeline::new(
            &E2eProduct,
            sources(),
            &reporter,
            fetcher(),
            ZipDecompressor,
            &generator,
            FakeInstaller::default(),
        );

        let err = pipeline.run(&request(parent.path(), false)).await.unwrap_err();

        assert!(matches!(err, ScaffoldError::PathExists(_)));
        assert_eq!(pipeline.stage(), Stage::Failed);
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert_eq!(reporter.count("fail"), 1);
    }

    #[tokio::test]
    async fn test_unknown_starter_version_stops_before_generation() {
        let parent = tempfile::tempdir().unwrap();
        let reporter = RecordingReporter::default();
        let generator = FakeGenerator::default();
        let mut pipeline = Pipeline::new(
            &E2eProduct,
            sources(),
            &reporter,
            fetcher(),
            ZipDecompressor,
            &generator,
            FakeInstaller::default(),
        );
        let mut req = request(parent.path(), false);
        req.starter_version = Some("9.9".to_string());

        let err = pipeline.run(&req).await.unwrap_err();

        assert!(matches!(err, ScaffoldError::UnknownVersion(_)));
        assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
        assert!(!parent.path().join("MyApp").exists());
    }

    #[tokio::test]
    async fn test_generator_without_output_is_fatal() {
        let parent = tempfile::tempdir().unwrap();
        let reporter = RecordingReporter::default();
        let generator = FakeGenerator {
            fail: true,
            skip_tree: true,
            ..Default::default()
        };
        let mut pipeline = Pipeline::new(
            &E2eProduct,
            sources(),
            &reporter,
            fetcher(),
            ZipDecompressor,
            generator,
            FakeInstaller::default(),
        );

        let err = pipeline.run(&request(parent.path(), false)).await.unwrap_err();

        assert!(matches!(err, ScaffoldError::GeneratorCommandFailed { .. }));
        assert_eq!(pipeline.stage(), Stage::Failed);
        assert_eq!(std::fs::read_dir(parent.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_generator_failure_after_output_continues() {
        let parent = tempfile::tempdir().unwrap();
        let reporter = RecordingReporter::default();
        let generator = FakeGenerator {
            fail: true,
            ..Default::default()
        };
        let mut pipeline = Pipeline::new(
            &E2eProduct,
            sources(),
            &reporter,
            fetcher(),
            ZipDecompressor,
            generator,
            FakeInstaller::default(),
        );

        pipeline.run(&request(parent.path(), false)).await.unwrap();

        assert_eq!(pipeline.stage(), Stage::Installed);
        assert!(reporter.contains("warn"));
        assert!(parent.path().join("MyApp/MyApp/MyApp.js").is_file());
    }

    #[tokio::test]
    async fn test_failed_integration_leaves_no_project_behind() {
        let parent = tempfile::tempdir().unwrap();
        let reporter = RecordingReporter::default();
        let fetcher = MemoryFetcher::default().with(
            MANIFEST_URL,
            b"default: 1.0.0\n1.0.0:\n  react-native: 0.60.0\n".to_vec(),
        );
        let mut pipeline = Pipeline::new(
            &E2eProduct,
            sources(),
            &reporter,
            fetcher,
            ZipDecompressor,
            FakeGenerator::default(),
            FakeInstaller::default(),
        );

        let err = pipeline.run(&request(parent.path(), false)).await.unwrap_err();

        assert!(matches!(err, ScaffoldError::Fetch { .. }));
        assert!(!parent.path().join("MyApp").exists());
        assert_eq!(std::fs::read_dir(parent.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_run_instructions_fall_back_to_xcodeproj() {
        let outcome = Outcome {
            project_dir: PathBuf::from("/projects/MyApp"),
            project_name: "MyApp".to_string(),
            version: ResolvedVersion {
                starter_version: "1.0.0".to_string(),
                generator_version: "0.60.0".to_string(),
            },
            package_manager: PackageManager::Yarn,
        };

        let lines = outcome.run_instructions();
        assert!(lines.iter().any(|l| l.contains("MyApp.xcodeproj")));
        assert!(lines.iter().any(|l| l.contains("react-native run-android")));
    }
}
