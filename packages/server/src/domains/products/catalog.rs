use std::path::Path;

use anyhow::{Context, Result};

/// Curated product list, one free-text entry per line.
///
/// Loaded once at startup and shared read-only between requests. An empty
/// catalog is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductCatalog {
    entries: Vec<String>,
}

impl ProductCatalog {
    /// Build from lines; blank lines are dropped, order is kept.
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            entries: lines
                .into_iter()
                .map(Into::into)
                .map(|line| line.trim_end().to_string())
                .filter(|line| !line.trim().is_empty())
                .collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.lines())
    }

    /// Read a catalog file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read product catalog {}", path.display()))?;
        Ok(Self::from_text(&text))
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries joined one per line, exactly as loaded.
    pub fn to_prompt_block(&self) -> String {
        self.entries().join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_blank_lines_and_keeps_order() {
        let catalog = ProductCatalog::from_text(
            "LEVOIT Humidifier - https://htgsupply.com/products/levoit\n\n   \nAC Infinity Fan - https://acinfinity.com/fan\r\n",
        );
        assert_eq!(catalog.len(), 2);
        assert_eq!(
            catalog.to_prompt_block(),
            "LEVOIT Humidifier - https://htgsupply.com/products/levoit\nAC Infinity Fan - https://acinfinity.com/fan"
        );
    }

    #[test]
    fn missing_file_is_an_error_for_the_caller() {
        let err = ProductCatalog::load("/definitely/not/here.txt").unwrap_err();
        assert!(err.to_string().contains("product catalog"));
    }

    #[test]
    fn empty_catalog() {
        assert!(ProductCatalog::empty().is_empty());
        assert_eq!(ProductCatalog::empty().to_prompt_block(), "");
    }
}
