//! Validated configuration wrapper

use sbmod_types::NamespaceConfig;
use std::ops::Deref;

/// A [`NamespaceConfig`] that passed every check.
///
/// Only the validator constructs this, so holding one is proof that the
/// configuration is internally consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedConfig(NamespaceConfig);

impl ValidatedConfig {
    pub(crate) fn new(config: NamespaceConfig) -> Self {
        Self(config)
    }

    pub fn config(&self) -> &NamespaceConfig {
        &self.0
    }

    pub fn into_inner(self) -> NamespaceConfig {
        self.0
    }
}

impl Deref for ValidatedConfig {
    type Target = NamespaceConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<NamespaceConfig> for ValidatedConfig {
    fn as_ref(&self) -> &NamespaceConfig {
        &self.0
    }
}
