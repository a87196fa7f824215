//! Static lookup tables between internal enums and server wire enums.
//!
//! Every table is built at compile time from a constant slice and never
//! mutated, so lookups are lock-free from any thread. A lookup miss falls
//! back to the table's documented default instead of failing: newer
//! internal values must degrade gracefully against older server schemas.

pub mod v411;
pub mod v470;

use crate::models::settings::{
    AddressFormat, AuthenticationType, DetectionType, ProxyType, ScanLevel, ScanScope,
};
use crate::server::WireSchema;

/// One-directional table from an internal value to a wire value.
#[derive(Debug)]
pub struct MappingTable<I: 'static, T: 'static> {
    entries: &'static [(I, T)],
    default: T,
}

impl<I: Copy + PartialEq, T: Copy + PartialEq> MappingTable<I, T> {
    pub const fn new(entries: &'static [(I, T)], default: T) -> Self {
        Self { entries, default }
    }

    /// Exact lookup without fallback.
    pub fn get(&self, value: I) -> Option<T> {
        self.entries
            .iter()
            .find(|(from, _)| *from == value)
            .map(|(_, to)| *to)
    }

    /// Lookup that falls back to the table default on a miss.
    pub fn map(&self, value: I) -> T {
        self.get(value).unwrap_or(self.default)
    }

    pub fn default_value(&self) -> T {
        self.default
    }

    /// True when some internal value maps to `target` or `target` is the default.
    pub fn covers(&self, target: T) -> bool {
        target == self.default || self.entries.iter().any(|(_, to)| *to == target)
    }
}

/// Map `value` through `table`, falling back to the table default.
pub fn map_value<I, T>(value: I, table: &MappingTable<I, T>) -> T
where
    I: Copy + PartialEq,
    T: Copy + PartialEq,
{
    table.map(value)
}

/// The black-box tables every supported server version provides.
#[derive(Debug)]
pub struct BlackBoxTables<S: WireSchema> {
    pub scan_level: MappingTable<ScanLevel, S::ScanLevel>,
    pub scan_scope: MappingTable<ScanScope, S::ScanScope>,
    pub auth_type: MappingTable<AuthenticationType, S::AuthType>,
    pub proxy_type: MappingTable<ProxyType, S::ProxyType>,
    pub form_detection: MappingTable<DetectionType, S::FormDetection>,
    pub address_format: MappingTable<AddressFormat, S::AddressFormat>,
}
