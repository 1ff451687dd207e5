//! Error accumulation shared by every check

use sbmod_types::{EntityStatus, ErrorKind, FieldError, IsoDuration, ValidationErrors};
use std::collections::HashMap;
use tracing::debug;

/// Collects field errors for one validation pass
#[derive(Debug, Default)]
pub(crate) struct ErrorCollector {
    errors: Vec<FieldError>,
}

impl ErrorCollector {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) {
        let error = FieldError::new(field, kind, message);
        debug!(field = %error.field, kind = %error.kind, "Field rejected");
        self.errors.push(error);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn require(&mut self, field: &str, value: &str) {
        if value.trim().is_empty() {
            self.push(field, ErrorKind::Required, format!("{} must not be empty", field));
        }
    }

    /// Parse an optional ISO-8601 value, recording `MalformedDuration` on failure
    pub(crate) fn duration(&mut self, field: &str, value: Option<&str>) -> Option<IsoDuration> {
        let text = value?;
        match IsoDuration::parse(text) {
            Ok(duration) => Some(duration),
            Err(e) => {
                self.push(
                    field,
                    ErrorKind::MalformedDuration,
                    format!("invalid ISO-8601 duration '{}': {}", text, e),
                );
                None
            }
        }
    }

    /// Parse an optional status, defaulting to `Active`
    pub(crate) fn status(&mut self, field: &str, value: Option<&str>) -> EntityStatus {
        let Some(text) = value else {
            return EntityStatus::default();
        };
        match text.parse::<EntityStatus>() {
            Ok(status) => status,
            Err(other) => {
                self.push(
                    field,
                    ErrorKind::InvalidEnum,
                    format!(
                        "invalid status '{}', expected one of {}",
                        other,
                        EntityStatus::ALL.map(|s| s.as_str()).join(", ")
                    ),
                );
                EntityStatus::default()
            }
        }
    }

    /// Names within one scope: each non-empty, each unique.
    ///
    /// Empty names are reported on `{scope}[i].name`; each duplicated name is
    /// reported once on `scope` itself.
    pub(crate) fn check_names<'a>(&mut self, scope: &str, names: impl IntoIterator<Item = &'a str>) {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let mut order = Vec::new();

        for (i, name) in names.into_iter().enumerate() {
            if name.trim().is_empty() {
                self.push(
                    format!("{}[{}].name", scope, i),
                    ErrorKind::Required,
                    "name must not be empty",
                );
                continue;
            }
            let count = counts.entry(name).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(name);
            }
        }

        for name in order {
            self.push(
                scope,
                ErrorKind::DuplicateName,
                format!("'{}' is declared {} times in {}", name, counts[name], scope),
            );
        }
    }

    pub(crate) fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(self.errors))
        }
    }
}
