use crate::manifest::{Pin, PinKind};
use std::collections::HashMap;
use tracing::info;

/// A remote dependency that should be mirrored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub url: String,
    pub revision: Option<String>,
}

/// A pin left out of the plan and the reason it was left out
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPin {
    pub identity: String,
    pub kind: PinKind,
}

/// Result of classifying the manifest pins
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorPlan {
    /// Unique by URL, in order of first appearance
    pub dependencies: Vec<Dependency>,
    pub skipped: Vec<SkippedPin>,
}

impl MirrorPlan {
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

/// Turns resolved pins into the set of remote dependencies to mirror
pub struct MirrorPlanner;

impl MirrorPlanner {
    /// Classify `pins` and dedupe remote ones by URL.
    ///
    /// A URL pinned more than once keeps the revision of its last pin.
    pub fn plan(pins: &[Pin]) -> MirrorPlan {
        let mut plan = MirrorPlan::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for pin in pins {
            match &pin.kind {
                PinKind::RemoteSourceControl => {
                    info!("Found a dependency: {}", pin.identity);
                    let dependency = Dependency {
                        url: pin.location.clone(),
                        revision: pin.revision.clone(),
                    };
                    match positions.get(&pin.location) {
                        Some(&index) => {
                            info!(
                                "Dependency {} is pinned more than once, using the last pin",
                                pin.location
                            );
                            plan.dependencies[index] = dependency;
                        }
                        None => {
                            positions.insert(pin.location.clone(), plan.dependencies.len());
                            plan.dependencies.push(dependency);
                        }
                    }
                }
                PinKind::LocalSourceControl => {
                    info!("Found a dependency that's already local: {}", pin.identity);
                    plan.skipped.push(SkippedPin {
                        identity: pin.identity.clone(),
                        kind: pin.kind.clone(),
                    });
                }
                PinKind::Other(kind) => {
                    info!(
                        "Found a dependency I don't know how to mirror: {}, kind: {}",
                        pin.identity, kind
                    );
                    plan.skipped.push(SkippedPin {
                        identity: pin.identity.clone(),
                        kind: pin.kind.clone(),
                    });
                }
            }
        }

        plan
    }
}
