//! SKUs

use std::fmt;

/// Stock keeping unit: an opaque identifier for a kind of item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sku(String);

impl Sku {
    /// Create a new SKU from any string-like code.
    pub fn new(code: impl Into<String>) -> Self {
        Sku(code.into())
    }

    /// Return the SKU code.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(code: &str) -> Self {
        Sku(code.to_string())
    }
}

impl From<String> for Sku {
    fn from(code: String) -> Self {
        Sku(code)
    }
}

impl From<char> for Sku {
    fn from(code: char) -> Self {
        Sku(code.to_string())
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_char_and_str_are_equal() {
        assert_eq!(Sku::from('A'), Sku::from("A"));
    }

    #[test]
    fn displays_code() {
        let sku = Sku::new("APPLE-1");

        assert_eq!(sku.to_string(), "APPLE-1");
        assert_eq!(sku.as_str(), "APPLE-1");
    }
}
