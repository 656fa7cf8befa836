//! Cpuset discovery
//!
//! Reads the CPU list of a named cgroup cpuset. The cpuset hierarchy names
//! its CPU list file either `cpus` (mounted with `noprefix`) or `cpuset.cpus`;
//! the root directory tells which.

use log::debug;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::domain::CpusetError;

/// Default cpuset mount directory
pub const DEFAULT_MOUNT_DIR: &str = "/sys/fs/cgroup/cpuset";

/// Kernel table of registered filesystem types
pub const DEFAULT_FILESYSTEMS_FILE: &str = "/proc/filesystems";

const CPUS_FILE: &str = "cpus";
const CPUSET_PREFIX: &str = "cpuset.";

#[derive(Debug, Clone)]
pub struct CpusetResolver {
    filesystems_file: PathBuf,
    mount_dir: PathBuf,
}

impl Default for CpusetResolver {
    fn default() -> Self {
        Self::new(DEFAULT_FILESYSTEMS_FILE, DEFAULT_MOUNT_DIR)
    }
}

impl CpusetResolver {
    pub fn new(filesystems_file: impl Into<PathBuf>, mount_dir: impl Into<PathBuf>) -> Self {
        Self { filesystems_file: filesystems_file.into(), mount_dir: mount_dir.into() }
    }

    /// Locate the cpuset mount.
    ///
    /// # Errors
    /// `Unsupported` if the kernel does not register a `cpuset` filesystem,
    /// `NotMounted` if the mount directory is missing.
    pub fn resolve_root(&self) -> Result<PathBuf, CpusetError> {
        let table = fs::read_to_string(&self.filesystems_file).map_err(|source| {
            CpusetError::Read { path: self.filesystems_file.clone(), source }
        })?;
        if !lists_cpuset(&table) {
            return Err(CpusetError::Unsupported(self.filesystems_file.clone()));
        }
        if !self.mount_dir.is_dir() {
            return Err(CpusetError::NotMounted(self.mount_dir.clone()));
        }
        Ok(self.mount_dir.clone())
    }

    /// Work out whether cpuset files under `root` carry the `cpuset.` prefix.
    ///
    /// # Errors
    /// `PrefixUnknown` if neither `cpus` nor `cpuset.cpus` exists in `root`.
    pub fn resolve_prefix(root: &Path) -> Result<&'static str, CpusetError> {
        if root.join(CPUS_FILE).is_file() {
            Ok("")
        } else if root.join(format!("{CPUSET_PREFIX}{CPUS_FILE}")).is_file() {
            Ok(CPUSET_PREFIX)
        } else {
            Err(CpusetError::PrefixUnknown(root.to_path_buf()))
        }
    }

    /// Read the trimmed CPU list of cpuset `name`.
    ///
    /// # Errors
    /// `NotFound` if `<root>/<name>/<prefix>cpus` does not exist, `Read` if it
    /// cannot be read.
    pub fn read_cpu_list(root: &Path, prefix: &str, name: &str) -> Result<String, CpusetError> {
        // `/rt` names the same cpuset as `rt`; never leave the mount
        let relative = Path::new(name.trim_start_matches('/'));
        let path = root.join(relative).join(format!("{prefix}{CPUS_FILE}"));
        let escapes = relative.components().any(|c| matches!(c, Component::ParentDir));
        if escapes || !path.is_file() {
            return Err(CpusetError::NotFound { name: name.to_string(), path });
        }
        let content =
            fs::read_to_string(&path).map_err(|source| CpusetError::Read { path: path.clone(), source })?;
        debug!("{} = {:?}", path.display(), content.trim());
        Ok(content.trim().to_string())
    }

    /// Resolve root and prefix, then read the CPU list of cpuset `name`.
    ///
    /// # Errors
    /// Any of the errors of [`Self::resolve_root`], [`Self::resolve_prefix`]
    /// and [`Self::read_cpu_list`].
    pub fn cpu_list(&self, name: &str) -> Result<String, CpusetError> {
        let root = self.resolve_root()?;
        let prefix = Self::resolve_prefix(&root)?;
        Self::read_cpu_list(&root, prefix, name)
    }
}

/// `/proc/filesystems` lines look like `nodev\tcpuset`
fn lists_cpuset(table: &str) -> bool {
    table.lines().any(|line| line.split_whitespace().last() == Some("cpuset"))
}
