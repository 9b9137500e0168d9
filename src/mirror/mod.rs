//! Mirror planning and materialization
//!
//! The configure workflow runs these pieces in order: the planner picks the
//! remote dependencies out of the manifest pins, [`RepositoryMirror`] puts each
//! one under the mirror root, and [`MirrorRegistry`] records the mapping with
//! the package manager. [`UpdateOrchestrator`] is independent of the others and
//! only walks the mirror root.

pub mod planner;
pub mod registry;
pub mod repository;
pub mod update;

use std::collections::BTreeMap;

pub use planner::{Dependency, MirrorPlan, MirrorPlanner, SkippedPin};
pub use registry::{MirrorRegistry, RegistrationReport};
pub use repository::{mirror_directory_name, MirrorKind, MirrorOutcome, RepositoryMirror};
pub use update::{UpdateOrchestrator, UpdateReport};

/// Suffix git hosting URLs commonly carry; mirrors are registered with and without it
pub const VCS_SUFFIX: &str = ".git";

/// Expand dependency URLs into every original that should map to a mirror.
///
/// A URL without [`VCS_SUFFIX`] also yields its suffixed twin. When the twin is
/// itself a dependency URL, the dependency's own mirror wins. Each original
/// appears once, sorted.
pub fn expand_originals<'a, M, I>(mirrors: I) -> BTreeMap<String, M>
where
    I: IntoIterator<Item = (&'a String, M)>,
    M: Clone,
{
    let mirrors: Vec<_> = mirrors.into_iter().collect();
    let mut originals = BTreeMap::new();

    for (url, mirror) in &mirrors {
        if !url.ends_with(VCS_SUFFIX) {
            originals.insert(format!("{url}{VCS_SUFFIX}"), mirror.clone());
        }
    }
    for (url, mirror) in mirrors {
        originals.insert(url.clone(), mirror);
    }

    originals
}
