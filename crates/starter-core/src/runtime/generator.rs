//! External base-project generator

use super::command::{display_command, run_inherited};
use crate::error::{Result, ScaffoldError};
use std::future::Future;
use std::path::Path;

/// Inputs for one generator invocation
#[derive(Debug, Clone)]
pub struct GenerateRequest<'a> {
    /// Directory the generator runs in; the project lands in `workdir/name`
    pub workdir: &'a Path,
    pub name: &'a str,
    pub generator_version: &'a str,
    pub use_typed: bool,
    pub force_npm: bool,
}

/// Capability to produce the base project tree
pub trait ProjectGenerator: Send + Sync {
    fn generate(&self, request: &GenerateRequest<'_>) -> impl Future<Output = Result<()>> + Send;
}

impl<T: ProjectGenerator> ProjectGenerator for &T {
    fn generate(&self, request: &GenerateRequest<'_>) -> impl Future<Output = Result<()>> + Send {
        (**self).generate(request)
    }
}

/// Generator running `react-native init`
#[derive(Debug, Clone)]
pub struct ReactNativeGenerator {
    program: &'static str,
}

impl ReactNativeGenerator {
    pub fn new(program: &'static str) -> Self {
        Self { program }
    }

    fn args(request: &GenerateRequest<'_>) -> Vec<String> {
        let mut args = vec![
            "init".to_string(),
            request.name.to_string(),
            "--version".to_string(),
            request.generator_version.to_string(),
        ];
        if request.use_typed {
            args.push("--template".to_string());
            args.push("typescript".to_string());
        }
        if request.force_npm {
            args.push("--npm".to_string());
        }
        args
    }
}

impl ProjectGenerator for ReactNativeGenerator {
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<()> {
        let args = Self::args(request);
        run_inherited(self.program, &args, request.workdir)
            .await
            .map_err(|reason| ScaffoldError::GeneratorCommandFailed {
                command: display_command(self.program, &args),
                reason,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(use_typed: bool, force_npm: bool) -> GenerateRequest<'static> {
        GenerateRequest {
            workdir: Path::new("."),
            name: "MyApp",
            generator_version: "0.60.4",
            use_typed,
            force_npm,
        }
    }

    #[test]
    fn test_untyped_args() {
        assert_eq!(
            ReactNativeGenerator::args(&request(false, false)),
            vec!["init", "MyApp", "--version", "0.60.4"]
        );
    }

    #[test]
    fn test_typed_npm_args() {
        assert_eq!(
            ReactNativeGenerator::args(&request(true, true)),
            vec!["init", "MyApp", "--version", "0.60.4", "--template", "typescript", "--npm"]
        );
    }

    #[tokio::test]
    async fn test_missing_generator_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let generator = ReactNativeGenerator::new("definitely-not-react-native");
        let mut req = request(false, false);
        req.workdir = dir.path();

        let err = generator.generate(&req).await.unwrap_err();
        assert!(matches!(
            err,
            ScaffoldError::GeneratorCommandFailed { command, .. }
                if command.starts_with("definitely-not-react-native init MyApp")
        ));
    }
}
