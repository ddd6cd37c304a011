//! Audit entry data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Types of operations that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// Entity was created
    Create,
    /// Entity was changed (joined, contributed to, deposited into)
    Update,
    /// Whole ledger was replaced from a backup
    Restore,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Create => write!(f, "CREATE"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Restore => write!(f, "RESTORE"),
        }
    }
}

/// Types of entities that can be audited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Stokvel,
    Ledger,
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityType::User => write!(f, "User"),
            EntityType::Stokvel => write!(f, "Stokvel"),
            EntityType::Ledger => write!(f, "Ledger"),
        }
    }
}

/// A single audit log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// When the operation occurred (UTC)
    pub timestamp: DateTime<Utc>,

    pub operation: Operation,

    pub entity_type: EntityType,

    /// Username or stokvel name
    pub entity_id: String,

    /// User who performed the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,

    /// Short human-readable description, e.g. "contributed R100.00"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    /// JSON snapshot of the entity after the operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
}

impl AuditEntry {
    fn new(operation: Operation, entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self {
            timestamp: Utc::now(),
            operation,
            entity_type,
            entity_id: entity_id.into(),
            actor: None,
            details: None,
            after: None,
        }
    }

    /// Entry for a newly created entity
    pub fn create(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self::new(Operation::Create, entity_type, entity_id)
    }

    /// Entry for a change to an existing entity
    pub fn update(entity_type: EntityType, entity_id: impl Into<String>) -> Self {
        Self::new(Operation::Update, entity_type, entity_id)
    }

    /// Entry for a ledger restored from a backup file
    pub fn restore(source: impl Into<String>) -> Self {
        Self::new(Operation::Restore, EntityType::Ledger, source)
    }

    pub fn by(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Attach a snapshot; entities that fail to serialize are skipped
    pub fn snapshot<T: Serialize>(mut self, entity: &T) -> Self {
        self.after = serde_json::to_value(entity).ok();
        self
    }

    /// Format the entry for human-readable output
    pub fn format_human_readable(&self) -> String {
        let mut output = format!(
            "[{}] {} {} {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.operation,
            self.entity_type,
            self.entity_id
        );

        if let Some(actor) = &self.actor {
            output.push_str(&format!(" by {}", actor));
        }

        if let Some(details) = &self.details {
            output.push_str(&format!(": {}", details));
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_operation_display() {
        assert_eq!(Operation::Create.to_string(), "CREATE");
        assert_eq!(Operation::Update.to_string(), "UPDATE");
        assert_eq!(Operation::Restore.to_string(), "RESTORE");
    }

    #[test]
    fn test_builder() {
        let entry = AuditEntry::update(EntityType::Stokvel, "SavingsCircle")
            .by("alice")
            .details("contributed R100.00")
            .snapshot(&json!({"balance": 10000}));

        assert_eq!(entry.operation, Operation::Update);
        assert_eq!(entry.actor.as_deref(), Some("alice"));
        assert_eq!(entry.after.unwrap()["balance"], 10000);
    }

    #[test]
    fn test_optional_fields_skipped() {
        let entry = AuditEntry::create(EntityType::User, "alice");
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("actor"));
        assert!(!json.contains("after"));
        assert!(json.contains("\"entity_type\":\"user\""));
    }

    #[test]
    fn test_human_readable_format() {
        let entry = AuditEntry::update(EntityType::Stokvel, "SavingsCircle")
            .by("bob")
            .details("joined");

        let formatted = entry.format_human_readable();
        assert!(formatted.contains("UPDATE Stokvel SavingsCircle by bob: joined"));
    }
}
