//! Turn a `--cpu` argument into a [`CpuMask`].
//!
//! The argument is either a CPU list (`3`, `0-1`, `0-3,8`) or the name of a
//! cpuset. Anything starting with a digit and made only of digits, `-` and
//! `,` is a CPU list and never looked up as a cpuset, even if a cpuset with
//! that name exists.

use log::debug;

use super::cpuset::CpusetResolver;
use super::mask::compute;
use super::range_parser::parse;
use crate::domain::{CpuArgError, CpuMask, SelectionFailure};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CpuSelection {
    /// CPU index or range list given directly
    List(String),
    /// Name of a cpuset whose CPU list is read from the cpuset filesystem
    Cpuset(String),
}

impl CpuSelection {
    #[must_use]
    pub fn classify(arg: &str) -> Self {
        let is_list = arg.starts_with(|c: char| c.is_ascii_digit())
            && arg.chars().all(|c| c.is_ascii_digit() || c == '-' || c == ',');
        if is_list {
            Self::List(arg.to_string())
        } else {
            Self::Cpuset(arg.to_string())
        }
    }

    /// Compute the mask, consulting `resolver` only for cpusets.
    ///
    /// # Errors
    /// Range errors from the list, cpuset errors from discovery.
    pub fn resolve(&self, resolver: &CpusetResolver) -> Result<CpuMask, SelectionFailure> {
        let list = match self {
            Self::List(list) => list.clone(),
            Self::Cpuset(name) => {
                let list = resolver.cpu_list(name)?;
                debug!("cpuset {name} has cpus {list}");
                list
            }
        };
        Ok(compute(&parse(&list)?)?)
    }
}

/// Compute the CPU mask for a `--cpu` argument.
///
/// # Errors
/// `InvalidCpuArgument` wrapping whatever went wrong underneath.
pub fn select(arg: &str, resolver: &CpusetResolver) -> Result<CpuMask, CpuArgError> {
    CpuSelection::classify(arg)
        .resolve(resolver)
        .map_err(|source| CpuArgError { arg: arg.to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CpusetError, RangeError};
    use std::fs;
    use tempfile::TempDir;

    fn resolver_with_cpuset(name: &str, cpus: &str) -> (TempDir, CpusetResolver) {
        let dir = TempDir::new().unwrap();
        let table = dir.path().join("filesystems");
        fs::write(&table, "nodev\tcpuset\n").unwrap();
        let mount = dir.path().join("cpuset");
        fs::create_dir_all(mount.join(name)).unwrap();
        fs::write(mount.join("cpus"), "0-7").unwrap();
        fs::write(mount.join(name).join("cpus"), cpus).unwrap();
        (dir, CpusetResolver::new(table, mount))
    }

    #[test]
    fn test_classify() {
        assert_eq!(CpuSelection::classify("0"), CpuSelection::List("0".into()));
        assert_eq!(CpuSelection::classify("0-1"), CpuSelection::List("0-1".into()));
        assert_eq!(CpuSelection::classify("0-1,4"), CpuSelection::List("0-1,4".into()));
        assert_eq!(CpuSelection::classify("rt"), CpuSelection::Cpuset("rt".into()));
        assert_eq!(CpuSelection::classify("2cores"), CpuSelection::Cpuset("2cores".into()));
        assert_eq!(CpuSelection::classify("-1"), CpuSelection::Cpuset("-1".into()));
        assert_eq!(CpuSelection::classify(""), CpuSelection::Cpuset(String::new()));
    }

    #[test]
    fn test_integer_never_consults_cpusets() {
        let (_dir, resolver) = resolver_with_cpuset("3", "0-1");
        let mask = select("3", &resolver).unwrap();
        assert_eq!(mask.to_string(), "8");
    }

    #[test]
    fn test_integer_works_without_cpuset_support() {
        let resolver = CpusetResolver::new("/nonexistent/filesystems", "/nonexistent/cpuset");
        assert_eq!(select("0-1", &resolver).unwrap().to_string(), "3");
    }

    #[test]
    fn test_cpuset_mask() {
        let (_dir, resolver) = resolver_with_cpuset("mycpuset", "0-2\n");
        let mask = select("mycpuset", &resolver).unwrap();
        assert_eq!(mask.to_string(), "7");
        assert_eq!(mask.count(), 3);
    }

    #[test]
    fn test_missing_cpuset_is_wrapped() {
        let (_dir, resolver) = resolver_with_cpuset("rt", "1");
        let err = select("notacpuset", &resolver).unwrap_err();
        assert_eq!(err.arg, "notacpuset");
        assert!(matches!(err.source, SelectionFailure::Cpuset(CpusetError::NotFound { .. })));
    }

    #[test]
    fn test_bad_list_is_wrapped() {
        let resolver = CpusetResolver::default();
        let err = select("3-1", &resolver).unwrap_err();
        assert!(matches!(err.source, SelectionFailure::Range(RangeError::InvalidRange { .. })));
    }

    #[test]
    fn test_empty_cpuset_is_rejected() {
        let (_dir, resolver) = resolver_with_cpuset("empty", "\n");
        let err = select("empty", &resolver).unwrap_err();
        assert!(matches!(err.source, SelectionFailure::Range(RangeError::InvalidRange { .. })));
    }
}
