//! SBMOD Constraint Catalog
//!
//! Static, read-only table of tier-dependent limits. Every tier-specific
//! decision the validator makes is a lookup here, so supporting a new tier
//! is a new [`TierProfile`] row rather than new branching in the checks.
//!
//! ```
//! use sbmod_catalog::ConstraintCatalog;
//! use sbmod_types::{Sku, TlsVersion};
//!
//! let catalog = ConstraintCatalog::standard();
//! let premium = catalog.profile(Sku::Premium);
//! assert!(premium.accepts_capacity(Some(4)));
//! assert!(!premium.accepts_capacity(Some(20)));
//! assert_eq!(catalog.tls_floor, TlsVersion::V1_2);
//! ```

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

use sbmod_types::{Sku, TlsVersion};
use std::ops::RangeInclusive;
use std::time::Duration;

/// How a tier treats the `capacity` setting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityRule {
    /// Not billed per messaging unit: unset, or at most `ceiling`
    Unmetered { ceiling: u32 },
    /// Billed per messaging unit: exactly one of the listed values
    OneOf(&'static [u32]),
}

/// Limits and capabilities of one tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TierProfile {
    pub sku: Sku,
    pub capacity: CapacityRule,
    /// Capacity recorded when the document leaves it unset
    pub default_capacity: u32,
    /// Allowed premium messaging partition counts; empty when unsupported
    pub partitions: &'static [u32],
    pub partitions_per_capacity_unit: u32,
    pub max_entity_size_mb: u32,
    pub supports_topics: bool,
    pub supports_sessions: bool,
    pub supports_duplicate_detection: bool,
}

impl TierProfile {
    pub fn accepts_capacity(&self, capacity: Option<u32>) -> bool {
        match (self.capacity, capacity) {
            (CapacityRule::Unmetered { .. }, None) => true,
            (CapacityRule::Unmetered { ceiling }, Some(value)) => value <= ceiling,
            (CapacityRule::OneOf(_), None) => true,
            (CapacityRule::OneOf(allowed), Some(value)) => allowed.contains(&value),
        }
    }

    pub fn effective_capacity(&self, capacity: Option<u32>) -> u32 {
        capacity.unwrap_or(self.default_capacity)
    }

    /// Values accepted for capacity, empty for unmetered tiers
    pub fn allowed_capacities(&self) -> &'static [u32] {
        match self.capacity {
            CapacityRule::Unmetered { .. } => &[],
            CapacityRule::OneOf(allowed) => allowed,
        }
    }

    pub fn supports_partitioning(&self) -> bool {
        !self.partitions.is_empty()
    }

    /// Largest partition count the given capacity can host
    pub fn max_partitions_for(&self, capacity: u32) -> u32 {
        capacity.saturating_mul(self.partitions_per_capacity_unit)
    }

    /// Partition count recorded when the document leaves it unset
    pub fn default_partitions(&self) -> u32 {
        self.partitions.first().copied().unwrap_or(0)
    }
}

/// Tier-independent entity limits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityLimits {
    pub min_entity_size_mb: u32,
    pub delivery_count: RangeInclusive<u32>,
    pub max_lock_duration: Duration,
    pub duplicate_detection_window: RangeInclusive<Duration>,
}

/// Values used when the document leaves an entity field unset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDefaults {
    pub lock_duration_secs: u64,
    pub max_size_in_megabytes: u32,
    pub duplicate_detection_window_secs: u64,
    pub max_delivery_count: u32,
}

/// The full constraint table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintCatalog {
    /// One row per tier, in [`Sku::ALL`] order
    tiers: [TierProfile; 3],
    pub tls_floor: TlsVersion,
    pub limits: EntityLimits,
    pub defaults: EntityDefaults,
}

const PREMIUM_CAPACITIES: &[u32] = &[1, 2, 4, 8, 16];
const PREMIUM_PARTITIONS: &[u32] = &[1, 2, 4];

static CATALOG: ConstraintCatalog = ConstraintCatalog {
    tiers: [
        TierProfile {
            sku: Sku::Basic,
            capacity: CapacityRule::Unmetered { ceiling: 1 },
            default_capacity: 0,
            partitions: &[],
            partitions_per_capacity_unit: 0,
            max_entity_size_mb: 5 * 1024,
            supports_topics: false,
            supports_sessions: false,
            supports_duplicate_detection: false,
        },
        TierProfile {
            sku: Sku::Standard,
            capacity: CapacityRule::Unmetered { ceiling: 1 },
            default_capacity: 0,
            partitions: &[],
            partitions_per_capacity_unit: 0,
            max_entity_size_mb: 5 * 1024,
            supports_topics: true,
            supports_sessions: true,
            supports_duplicate_detection: true,
        },
        TierProfile {
            sku: Sku::Premium,
            capacity: CapacityRule::OneOf(PREMIUM_CAPACITIES),
            default_capacity: 1,
            partitions: PREMIUM_PARTITIONS,
            partitions_per_capacity_unit: 1,
            max_entity_size_mb: 80 * 1024,
            supports_topics: true,
            supports_sessions: true,
            supports_duplicate_detection: true,
        },
    ],
    tls_floor: TlsVersion::V1_2,
    limits: EntityLimits {
        min_entity_size_mb: 1,
        delivery_count: RangeInclusive::new(1, 2000),
        max_lock_duration: Duration::from_secs(5 * 60),
        duplicate_detection_window: RangeInclusive::new(
            Duration::from_secs(20),
            Duration::from_secs(7 * 24 * 60 * 60),
        ),
    },
    defaults: EntityDefaults {
        lock_duration_secs: 60,
        max_size_in_megabytes: 1024,
        duplicate_detection_window_secs: 10 * 60,
        max_delivery_count: 10,
    },
};

impl ConstraintCatalog {
    /// The built-in catalog
    pub fn standard() -> &'static ConstraintCatalog {
        &CATALOG
    }

    pub fn profile(&self, sku: Sku) -> &TierProfile {
        let slot = match sku {
            Sku::Basic => 0,
            Sku::Standard => 1,
            Sku::Premium => 2,
        };
        &self.tiers[slot]
    }

    pub fn tiers(&self) -> &[TierProfile] {
        &self.tiers
    }

    pub fn accepts_tls(&self, version: TlsVersion) -> bool {
        version >= self.tls_floor
    }

    pub fn accepts_delivery_count(&self, count: u32) -> bool {
        self.limits.delivery_count.contains(&count)
    }

    pub fn accepts_entity_size(&self, sku: Sku, size_mb: u32) -> bool {
        size_mb >= self.limits.min_entity_size_mb
            && size_mb <= self.profile(sku).max_entity_size_mb
    }

    pub fn accepts_lock_duration(&self, lock: Duration) -> bool {
        !lock.is_zero() && lock <= self.limits.max_lock_duration
    }

    pub fn accepts_duplicate_window(&self, window: Duration) -> bool {
        self.limits.duplicate_detection_window.contains(&window)
    }
}
