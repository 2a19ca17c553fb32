//! Access to the external container runtime CLI.
//!
//! Every image operation the pipelines need is behind [ContainerRuntime] so
//! the batch stages can run against a fake in tests instead of a real
//! `docker`/`podman`.

use crate::error::*;
use std::{
    path::Path,
    process::{Command, Stdio},
};

/// The image operations the export/import stages rely on. One call maps to
/// one subprocess invocation; success is the subprocess exiting zero.
pub trait ContainerRuntime {
    /// Check the runtime is reachable at all. Stage setup fails fatally when
    /// this does.
    fn ping(&self) -> Result<()>;

    fn pull(&self, reference: &str) -> Result<()>;

    fn save(&self, reference: &str, output: &Path) -> Result<()>;

    fn load(&self, archive: &Path) -> Result<()>;

    fn tag(&self, source: &str, target: &str) -> Result<()>;

    fn push(&self, reference: &str) -> Result<()>;

    fn remove_image(&self, reference: &str) -> Result<()>;

    /// IDs of containers, running or stopped, created from `reference`.
    fn containers_from(&self, reference: &str) -> Result<Vec<String>>;
}

/// Drives a docker-compatible CLI (`docker`, `podman`, ...) as subprocesses.
pub struct DockerCli {
    program: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerCli {
    pub fn new(program: &str) -> Self {
        DockerCli {
            program: program.to_string(),
        }
    }

    /// Run to completion, inheriting stdio so runtime progress output stays
    /// visible.
    fn run(&self, args: &[&str]) -> Result<()> {
        let status = Command::new(&self.program).args(args).status()?;
        if status.success() {
            Ok(())
        } else {
            Err(Error::CommandFailed {
                command: format!("{} {}", self.program, args.join(" ")),
                status,
            })
        }
    }

    /// Run to completion capturing stdout.
    fn run_captured(&self, args: &[&str]) -> Result<String> {
        let output = Command::new(&self.program)
            .args(args)
            .stderr(Stdio::inherit())
            .output()?;
        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            Err(Error::CommandFailed {
                command: format!("{} {}", self.program, args.join(" ")),
                status: output.status,
            })
        }
    }
}

impl ContainerRuntime for DockerCli {
    fn ping(&self) -> Result<()> {
        let available = Command::new(&self.program)
            .arg("version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|status| status.success())
            .unwrap_or(false);
        if available {
            Ok(())
        } else {
            Err(Error::RuntimeUnreachable(self.program.clone()))
        }
    }

    fn pull(&self, reference: &str) -> Result<()> {
        self.run(&["pull", reference])
    }

    fn save(&self, reference: &str, output: &Path) -> Result<()> {
        let output = output
            .to_str()
            .ok_or_else(|| Error::NotAFile(output.to_path_buf()))?;
        self.run(&["save", "-o", output, reference])
    }

    fn load(&self, archive: &Path) -> Result<()> {
        let archive = archive
            .to_str()
            .ok_or_else(|| Error::NotAFile(archive.to_path_buf()))?;
        self.run(&["load", "-i", archive])
    }

    fn tag(&self, source: &str, target: &str) -> Result<()> {
        self.run(&["tag", source, target])
    }

    fn push(&self, reference: &str) -> Result<()> {
        self.run(&["push", reference])
    }

    fn remove_image(&self, reference: &str) -> Result<()> {
        self.run(&["rmi", reference])
    }

    fn containers_from(&self, reference: &str) -> Result<Vec<String>> {
        let filter = format!("ancestor={}", reference);
        let stdout = self.run_captured(&["ps", "-a", "-q", "--filter", &filter])?;
        Ok(stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::{cell::RefCell, collections::HashSet, fs, path::PathBuf};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Call {
        Ping,
        Pull(String),
        Save(String, PathBuf),
        Load(PathBuf),
        Tag(String, String),
        Push(String),
        RemoveImage(String),
        ContainersFrom(String),
    }

    /// Records every call; operations listed in `failing` and references
    /// listed in `pull_failures` fail. `save` writes an empty file so the
    /// exporter's output directory fills up like it would for real.
    #[derive(Default)]
    pub struct FakeRuntime {
        pub calls: RefCell<Vec<Call>>,
        pub failing: HashSet<&'static str>,
        pub pull_failures: HashSet<String>,
        /// References that some container was created from.
        pub in_use: HashSet<String>,
    }

    impl FakeRuntime {
        pub fn failing(ops: &[&'static str]) -> Self {
            FakeRuntime {
                failing: ops.iter().copied().collect(),
                ..Self::default()
            }
        }

        fn record(&self, op: &'static str, call: Call) -> Result<()> {
            self.calls.borrow_mut().push(call);
            if self.failing.contains(op) {
                Err(Error::RuntimeUnreachable(format!("fake {} failure", op)))
            } else {
                Ok(())
            }
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl ContainerRuntime for FakeRuntime {
        fn ping(&self) -> Result<()> {
            self.record("ping", Call::Ping)
        }

        fn pull(&self, reference: &str) -> Result<()> {
            self.record("pull", Call::Pull(reference.to_string()))?;
            if self.pull_failures.contains(reference) {
                return Err(Error::RuntimeUnreachable("fake pull failure".to_string()));
            }
            Ok(())
        }

        fn save(&self, reference: &str, output: &Path) -> Result<()> {
            self.record(
                "save",
                Call::Save(reference.to_string(), output.to_path_buf()),
            )?;
            fs::write(output, b"")?;
            Ok(())
        }

        fn load(&self, archive: &Path) -> Result<()> {
            self.record("load", Call::Load(archive.to_path_buf()))
        }

        fn tag(&self, source: &str, target: &str) -> Result<()> {
            self.record("tag", Call::Tag(source.to_string(), target.to_string()))
        }

        fn push(&self, reference: &str) -> Result<()> {
            self.record("push", Call::Push(reference.to_string()))
        }

        fn remove_image(&self, reference: &str) -> Result<()> {
            self.record("rmi", Call::RemoveImage(reference.to_string()))
        }

        fn containers_from(&self, reference: &str) -> Result<Vec<String>> {
            self.record("ps", Call::ContainersFrom(reference.to_string()))?;
            if self.in_use.contains(reference) {
                Ok(vec!["0123456789ab".to_string()])
            } else {
                Ok(Vec::new())
            }
        }
    }
}
