use crate::types::{KeeperError, Result};
use std::fmt;

/// Identifier of a remote management object, `domain:key=value[,key=value...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectName {
    domain: String,
    properties: Vec<(String, String)>,
}

impl ObjectName {
    pub fn parse(raw: &str) -> Result<Self> {
        let malformed = |why: &str| {
            KeeperError::Configuration(format!("Malformed object name '{}': {}", raw, why))
        };

        let (domain, props) = raw.split_once(':').ok_or_else(|| malformed("missing ':'"))?;
        if domain.is_empty() {
            return Err(malformed("empty domain"));
        }
        if props.is_empty() {
            return Err(malformed("no key properties"));
        }

        let mut properties: Vec<(String, String)> = Vec::new();
        for pair in props.split(',') {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| malformed("property without '='"))?;
            if key.is_empty() || value.is_empty() {
                return Err(malformed("empty key or value"));
            }
            if key.contains(':') || value.contains(':') {
                return Err(malformed("':' inside a property"));
            }
            if properties.iter().any(|(k, _)| k == key) {
                return Err(malformed("duplicate key"));
            }
            properties.push((key.to_string(), value.to_string()));
        }

        Ok(Self {
            domain: domain.to_string(),
            properties,
        })
    }

}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.domain)?;
        for (i, (k, v)) in self.properties.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}
