use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingRequiredFields(Vec<&'static str>),
}

/// Ordered column/value pairs destined for an INSERT or UPDATE.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    columns: Vec<(&'static str, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        if let Some(slot) = self.columns.iter_mut().find(|(c, _)| *c == column) {
            slot.1 = value.into();
        } else {
            self.columns.push((column, value.into()));
        }
        self
    }

    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.columns.iter().map(|(c, _)| *c)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> + '_ {
        self.columns.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Collects required fields that are absent (or blank, for text) in an input body.
#[derive(Debug, Default)]
pub struct Required {
    missing: Vec<&'static str>,
}

impl Required {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, field: &'static str, value: &Option<String>) -> Self {
        if value.as_deref().map_or(true, |v| v.trim().is_empty()) {
            self.missing.push(field);
        }
        self
    }

    pub fn value<T>(mut self, field: &'static str, value: &Option<T>) -> Self {
        if value.is_none() {
            self.missing.push(field);
        }
        self
    }

    pub fn check(self) -> Result<(), RecordError> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            Err(RecordError::MissingRequiredFields(self.missing))
        }
    }
}
