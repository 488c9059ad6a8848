use std::fmt;

/// Schema-qualified object name. Equality is case-sensitive and
/// component-wise: `(None, "T")` and `(Some("dbo"), "T")` are distinct.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SchemaQualifiedName {
    pub schema: Option<String>,
    pub name: String,
}

impl SchemaQualifiedName {
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: name.into(),
        }
    }

    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Splits a dotted name into `(schema, name)`. Only the first dot is
    /// significant; a name without a dot has no schema part.
    pub fn parse(qualified: &str) -> Self {
        match qualified.split_once('.') {
            Some((schema, name)) => Self::new(schema, name),
            None => Self::bare(qualified),
        }
    }

    #[must_use]
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        Self {
            schema: self.schema.clone(),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn with_schema(&self, schema: impl Into<String>) -> Self {
        Self {
            schema: Some(schema.into()),
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for SchemaQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}
