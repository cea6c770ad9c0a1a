//! Registration table of the extensions this package provides
//!
//! The host tool discovers plugins by entry point group and name. The groups
//! and names here must stay stable since other packages refer to them.

use crate::commands::{verb_names, Command, TestResultCommand};
use crate::test_result::{provider_names, EXTENSION_POINT_NAME};

/// Package name as seen by the host tool
pub const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

/// Package version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package license
pub const LICENSE: &str = env!("CARGO_PKG_LICENSE");

/// One registration of an implementation under a group and name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryPoint {
    pub group: &'static str,
    pub name: &'static str,
    pub target: &'static str,
}

pub const ENTRY_POINTS: &[EntryPoint] = &[
    EntryPoint {
        group: "colcon_core.extension_point",
        name: EXTENSION_POINT_NAME,
        target: "colcon_test_result::test_result::TestResultProvider",
    },
    EntryPoint {
        group: "colcon_core.verb",
        name: "test-result",
        target: "colcon_test_result::commands::TestResultCommand",
    },
    EntryPoint {
        group: EXTENSION_POINT_NAME,
        name: "xunit",
        target: "colcon_test_result::test_result::XunitTestResult",
    },
];

/// Look up an entry point by group and name
pub fn find(group: &str, name: &str) -> Option<&'static EntryPoint> {
    ENTRY_POINTS
        .iter()
        .find(|ep| ep.group == group && ep.name == name)
}

/// Check that an entry point names something this crate can instantiate
pub fn resolves(entry_point: &EntryPoint) -> bool {
    match entry_point.group {
        "colcon_core.extension_point" => entry_point.name == EXTENSION_POINT_NAME,
        "colcon_core.verb" => {
            verb_names().contains(&entry_point.name)
                && TestResultCommand::new(None).name() == entry_point.name
        }
        EXTENSION_POINT_NAME => provider_names().contains(&entry_point.name),
        _ => false,
    }
}
