use serde::{Deserialize, Serialize};

/// One format category and the file extensions that belong to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormatCategory {
    pub name: String,
    pub extensions: Vec<String>,
}

/// Ordered extension → format-category table.
///
/// Lookups return the first category listing the extension, so earlier
/// categories take precedence when extensions overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileFormatRegistry {
    categories: Vec<FormatCategory>,
}

impl FileFormatRegistry {
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    pub fn with_category<I, S>(mut self, name: impl Into<String>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories.push(FormatCategory {
            name: name.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn categories(&self) -> &[FormatCategory] {
        &self.categories
    }

    pub fn category_of(&self, extension: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.extensions.iter().any(|e| e == extension))
            .map(|c| c.name.as_str())
    }
}

impl Default for FileFormatRegistry {
    fn default() -> Self {
        Self::empty()
            .with_category("image", ["svg", "png", "ico", "bmp", "jpg", "gif"])
            .with_category("markdown", ["md", "markdown", "mdown", "mkdn", "mkd"])
            .with_category("htmlmixed", ["html", "xhtml", "htm"])
            .with_category("text/x-java", ["java"])
            .with_category("text/x-groovy", ["groovy"])
            .with_category("text/x-scala", ["scala"])
            .with_category(
                "javascript",
                ["js", "json", "javascript", "jscript", "ecmascript", "form"],
            )
            .with_category("xml", ["xml", "xsd", "wsdl", "atom"])
            .with_category("text/x-yaml", ["yaml", "yml"])
            .with_category("properties", ["properties"])
    }
}
