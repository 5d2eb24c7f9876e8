use super::{Detector, ScanContext};
use crate::command::CommandRunner;
use crate::error::Result;
use crate::model::{PackageIdentifier, Source};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Upper bound on a single dependency listing.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

pub struct DependencyTreeDetector {
    runner: Arc<dyn CommandRunner>,
    timeout: Duration,
}

impl DependencyTreeDetector {
    pub fn new(runner: Arc<dyn CommandRunner>, timeout: Duration) -> Self {
        Self { runner, timeout }
    }
}

/// Asks the package manager for its resolved tree and looks for `name@version`.
///
/// Stdout and stderr are searched together. A non-zero exit, a failure to
/// start the program and a timeout all mean "not found".
pub async fn check_dependency_tree(
    runner: &dyn CommandRunner,
    ctx: &ScanContext,
    id: &PackageIdentifier,
    timeout: Duration,
) -> bool {
    let spec = ctx.kind.list_command(id.name(), &ctx.root);
    debug!(command = %spec, "listing dependency tree");

    let output = match tokio::time::timeout(timeout, runner.run(&spec)).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            warn!(
                command = %spec,
                error = %e,
                "could not run package manager, treating as not found"
            );
            return false;
        }
        Err(_) => {
            warn!(
                command = %spec,
                timeout_secs = timeout.as_secs(),
                "dependency listing timed out, treating as not found"
            );
            return false;
        }
    };

    if !output.success() {
        debug!(command = %spec, exit_code = output.exit_code, "package manager exited non-zero");
    }

    output.combined().contains(id.as_str())
}

#[async_trait]
impl Detector for DependencyTreeDetector {
    fn source(&self) -> Source {
        Source::DependencyTree
    }

    async fn detect(&self, ctx: &ScanContext, id: &PackageIdentifier) -> Result<bool> {
        let found = check_dependency_tree(self.runner.as_ref(), ctx, id, self.timeout).await;
        debug!(identifier = %id, found, "checked dependency tree");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{CommandOutput, CommandSpec};
    use crate::project::PackageManagerKind;
    use std::io;
    use std::sync::Mutex;

    enum Reply {
        Output(CommandOutput),
        SpawnError,
        Hang,
    }

    struct FakeRunner {
        reply: Reply,
        calls: Mutex<Vec<CommandSpec>>,
    }

    impl FakeRunner {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn output(stdout: &str, stderr: &str, exit_code: i32) -> Self {
            Self::new(Reply::Output(CommandOutput {
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
                exit_code,
            }))
        }
    }

    #[async_trait]
    impl CommandRunner for FakeRunner {
        async fn run(&self, spec: &CommandSpec) -> io::Result<CommandOutput> {
            self.calls.lock().unwrap().push(spec.clone());
            match &self.reply {
                Reply::Output(output) => Ok(output.clone()),
                Reply::SpawnError => Err(io::Error::new(io::ErrorKind::NotFound, "npm not found")),
                Reply::Hang => {
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    Ok(CommandOutput::default())
                }
            }
        }

        async fn exists(&self, _program: &str) -> bool {
            true
        }
    }

    fn id(raw: &str) -> PackageIdentifier {
        PackageIdentifier::parse(raw).unwrap()
    }

    fn ctx(kind: PackageManagerKind) -> ScanContext {
        ScanContext::new("/project", kind)
    }

    async fn check_npm(runner: &FakeRunner, raw: &str) -> bool {
        let npm = ctx(PackageManagerKind::Npm);
        check_dependency_tree(runner, &npm, &id(raw), DEFAULT_TIMEOUT).await
    }

    #[tokio::test]
    async fn test_match_in_stdout() {
        let runner = FakeRunner::output("└── malware@1.0.0", "", 0);
        assert!(check_npm(&runner, "malware@1.0.0").await);
    }

    #[tokio::test]
    async fn test_absent_from_tree() {
        let runner = FakeRunner::output("└── express@4.18.0", "", 0);
        assert!(!check_npm(&runner, "malware@1.0.0").await);
    }

    #[tokio::test]
    async fn test_match_in_stderr_with_failing_exit() {
        let runner = FakeRunner::output("", "└── malware@1.0.0", 1);
        assert!(check_npm(&runner, "malware@1.0.0").await);
    }

    #[tokio::test]
    async fn test_non_zero_exit_without_match_is_not_found() {
        let runner = FakeRunner::output("", "", 1);
        assert!(!check_npm(&runner, "malware@1.0.0").await);
    }

    #[tokio::test]
    async fn test_spawn_failure_is_not_found() {
        let runner = FakeRunner::new(Reply::SpawnError);
        assert!(!check_npm(&runner, "malware@1.0.0").await);
    }

    #[tokio::test]
    async fn test_timeout_is_not_found() {
        let runner = FakeRunner::new(Reply::Hang);
        assert!(
            !check_dependency_tree(
                &runner,
                &ctx(PackageManagerKind::Npm),
                &id("malware@1.0.0"),
                Duration::from_millis(50)
            )
            .await
        );
    }

    #[tokio::test]
    async fn test_command_per_package_manager() {
        let cases = [
            (PackageManagerKind::Npm, "npm ls malware --prefix /project --all"),
            (PackageManagerKind::YarnClassic, "yarn list --pattern malware --depth=Infinity"),
            (PackageManagerKind::YarnModern, "yarn info malware --all --recursive"),
        ];

        for (kind, expected) in cases {
            let runner = FakeRunner::output("", "", 0);
            check_dependency_tree(&runner, &ctx(kind), &id("malware@1.0.0"), DEFAULT_TIMEOUT).await;

            let calls = runner.calls.lock().unwrap();
            assert_eq!(calls.len(), 1);
            if cfg!(not(target_os = "windows")) {
                assert_eq!(calls[0].to_string(), expected);
            }
        }
    }

    #[tokio::test]
    async fn test_detector_never_errors() {
        let runner = Arc::new(FakeRunner::new(Reply::SpawnError));
        let detector = DependencyTreeDetector::new(runner, DEFAULT_TIMEOUT);
        let found = detector
            .detect(&ctx(PackageManagerKind::YarnModern), &id("@scope/malware@1.0.0"))
            .await
            .unwrap();
        assert!(!found);
    }
}
