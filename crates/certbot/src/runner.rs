//! Certbot process execution.

use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, error, info};

use crate::error::RunnerError;

/// Locate the certbot executable and check that it can actually be run.
///
/// A value containing a path separator is checked directly; a bare name is
/// searched on `PATH`. The resolved file must exist and carry an execute
/// permission bit.
pub fn validate_certbot_path(path: &str) -> Result<PathBuf, RunnerError> {
    if path.is_empty() {
        return Err(RunnerError::EmptyPath);
    }

    let resolved = if path.contains(std::path::MAIN_SEPARATOR) {
        let candidate = PathBuf::from(path);
        if !candidate.is_file() {
            return Err(RunnerError::NotFound(path.to_string()));
        }
        candidate
    } else {
        search_path(path).ok_or_else(|| RunnerError::NotFound(path.to_string()))?
    };

    if !is_executable(&resolved) {
        return Err(RunnerError::NotExecutable(resolved));
    }

    info!(path = %resolved.display(), "validated certbot executable");
    Ok(resolved)
}

fn search_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Render a command line for logging, masking the value that follows any
/// `--*-token` flag. DNS plugin tokens are credentials and must not land
/// in the logs.
fn render_command(executable: &Path, args: &[String]) -> String {
    let mut rendered = Vec::with_capacity(args.len() + 1);
    rendered.push(executable.display().to_string());
    let mut redact_next = false;
    for arg in args {
        if redact_next {
            rendered.push("<redacted>".to_string());
            redact_next = false;
            continue;
        }
        redact_next = arg.starts_with("--") && arg.ends_with("-token");
        rendered.push(arg.clone());
    }
    rendered.join(" ")
}

/// Executes the certbot binary with fully-formed argument vectors.
///
/// Output streams are captured separately and surfaced through logging; a
/// non-zero or abnormal exit is an error. No retries — retry policy belongs
/// to the scheduler, not the runner.
pub struct CertbotRunner {
    executable: PathBuf,
}

impl CertbotRunner {
    /// Validate `path` and wrap it in a runner.
    pub fn new(path: &str) -> Result<Self, RunnerError> {
        Ok(Self {
            executable: validate_certbot_path(path)?,
        })
    }

    /// Build a runner from an already-resolved executable path, skipping
    /// validation. Used by tests with freshly written script files.
    pub fn from_resolved(executable: PathBuf) -> Self {
        Self { executable }
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    /// Spawn certbot with `args`, capture stdout and stderr separately, and
    /// wait for completion.
    pub async fn run(&self, args: &[String]) -> Result<(), RunnerError> {
        debug!(
            command = %render_command(&self.executable, args),
            "running certbot"
        );

        let output = Command::new(&self.executable)
            .args(args)
            .output()
            .await
            .map_err(|source| RunnerError::Spawn {
                command: self.executable.display().to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.trim();
        if !stdout.is_empty() {
            debug!("certbot stdout:\n{stdout}");
        }

        if output.status.success() {
            info!("certbot finished successfully (exit code 0)");
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        let code = output.status.code().unwrap_or(-1);
        error!(code, stderr = %stderr, "certbot command failed");
        Err(RunnerError::CommandFailed { code, stderr })
    }

    /// Run the recurring renewal check: `certbot renew --quiet`. Which
    /// certificates actually renew is certbot's decision, based on the
    /// state it owns.
    pub async fn renew(&self) -> Result<(), RunnerError> {
        info!("checking for certificate renewals");
        self.run(&["renew".to_string(), "--quiet".to_string()])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[cfg(unix)]
    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh\n{body}").unwrap();
        file.flush().unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_render_command_masks_token_values() {
        let args = vec![
            "certonly".to_string(),
            "--authenticator".to_string(),
            "dns-duckdns".to_string(),
            "--dns-duckdns-token".to_string(),
            "s3cret".to_string(),
            "--dns-duckdns-propagation-seconds".to_string(),
            "60".to_string(),
        ];
        let rendered = render_command(Path::new("/usr/bin/certbot"), &args);
        assert!(!rendered.contains("s3cret"));
        assert_eq!(
            rendered,
            "/usr/bin/certbot certonly --authenticator dns-duckdns \
             --dns-duckdns-token <redacted> --dns-duckdns-propagation-seconds 60"
        );
    }

    #[test]
    fn test_render_command_leaves_plain_args_intact() {
        let args = vec![
            "certonly".to_string(),
            "--webroot".to_string(),
            "-w".to_string(),
            "/var/www/acme".to_string(),
        ];
        let rendered = render_command(Path::new("certbot"), &args);
        assert_eq!(rendered, "certbot certonly --webroot -w /var/www/acme");
    }

    #[test]
    fn test_empty_path_rejected() {
        assert!(matches!(
            validate_certbot_path(""),
            Err(RunnerError::EmptyPath)
        ));
    }

    #[test]
    fn test_missing_path_rejected() {
        assert!(matches!(
            validate_certbot_path("/nonexistent/certbot"),
            Err(RunnerError::NotFound(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_non_executable_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("certbot");
        std::fs::write(&path, "not a script").unwrap();
        let err = validate_certbot_path(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, RunnerError::NotExecutable(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_run_success_and_failure() {
        let dir = tempfile::tempdir().unwrap();

        let ok = write_script(dir.path(), "certbot-ok", "exit 0");
        let runner = CertbotRunner::new(ok.to_str().unwrap()).unwrap();
        runner.run(&["certonly".to_string()]).await.unwrap();

        let fail = write_script(dir.path(), "certbot-fail", "echo boom >&2\nexit 3");
        let runner = CertbotRunner::new(fail.to_str().unwrap()).unwrap();
        let err = runner.run(&[]).await.unwrap_err();
        match err {
            RunnerError::CommandFailed { code, stderr } => {
                assert_eq!(code, 3);
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_renew_passes_expected_args() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("invocations.log");
        let script = write_script(
            dir.path(),
            "certbot",
            &format!("echo \"$@\" >> {}\nexit 0", log.display()),
        );

        let runner = CertbotRunner::new(script.to_str().unwrap()).unwrap();
        runner.renew().await.unwrap();

        let logged = std::fs::read_to_string(&log).unwrap();
        assert_eq!(logged.trim(), "renew --quiet");
    }
}
