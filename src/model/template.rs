use regex::Regex;
use serde::Serialize;

const FILE_NAME_PATTERN: &str = r"^[a-zA-Z0-9._-]*$";
const FILE_NAME_INVALID: &str = "Name must be: letters, numbers, and . _ or - characters";

const LOWER_CASE_FILE_NAME_PATTERN: &str = r"^[a-z0-9._-]*$";
const LOWER_CASE_FILE_NAME_INVALID: &str =
    "Name must be: lower-case letters, numbers, and . _ or - characters";

/// A creatable content type offered by the new-document wizard.
///
/// Templates with children are groups; everything else is a leaf that names
/// an exemplar file and the pattern new names must match.
#[derive(Debug, Clone)]
pub struct DocumentTemplate {
    pub label: String,
    pub tooltip: String,
    pub exemplar: Option<String>,
    pub pattern: Option<Regex>,
    pub invalid: Option<String>,
    pub extension: Option<String>,
    pub icon: Option<String>,
    pub folder: bool,
    pub children: Vec<DocumentTemplate>,
}

impl DocumentTemplate {
    pub fn group(label: &str, tooltip: &str, children: Vec<DocumentTemplate>) -> Self {
        Self {
            label: label.to_string(),
            tooltip: tooltip.to_string(),
            exemplar: None,
            pattern: None,
            invalid: None,
            extension: None,
            icon: None,
            folder: false,
            children,
        }
    }

    pub fn file(
        label: &str,
        tooltip: &str,
        exemplar: &str,
        extension: &str,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            label: label.to_string(),
            tooltip: tooltip.to_string(),
            exemplar: Some(exemplar.to_string()),
            pattern: Some(Regex::new(FILE_NAME_PATTERN)?),
            invalid: Some(FILE_NAME_INVALID.to_string()),
            extension: Some(extension.to_string()),
            icon: None,
            folder: false,
            children: Vec::new(),
        })
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(icon.to_string());
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Check a user-entered name against this template's pattern, returning
    /// the template's invalid-message on mismatch.
    pub fn validate_name(&self, name: &str) -> Result<(), String> {
        match &self.pattern {
            Some(pattern) if !pattern.is_match(name) => Err(self
                .invalid
                .clone()
                .unwrap_or_else(|| format!("Invalid name: {}", name))),
            _ => Ok(()),
        }
    }

    /// Leaves whose exemplar does not satisfy their own pattern.
    pub fn invalid_exemplars(&self) -> Vec<&DocumentTemplate> {
        let mut found = Vec::new();
        self.collect_invalid(&mut found);
        found
    }

    fn collect_invalid<'a>(&'a self, found: &mut Vec<&'a DocumentTemplate>) {
        if self.is_leaf() {
            let valid = match &self.exemplar {
                Some(exemplar) => self.validate_name(exemplar).is_ok(),
                None => false,
            };
            if !valid {
                found.push(self);
            }
        }
        for child in &self.children {
            child.collect_invalid(found);
        }
    }
}

/// The wizard's template catalogue.
pub fn document_templates() -> Result<Vec<DocumentTemplate>, regex::Error> {
    let folder = DocumentTemplate {
        label: "Folder".to_string(),
        tooltip: "Create a new folder to contain documents".to_string(),
        exemplar: Some("myfolder".to_string()),
        pattern: Some(Regex::new(LOWER_CASE_FILE_NAME_PATTERN)?),
        invalid: Some(LOWER_CASE_FILE_NAME_INVALID.to_string()),
        extension: None,
        icon: Some("/img/icons/wiki/folder.gif".to_string()),
        folder: true,
        children: Vec::new(),
    };

    Ok(vec![
        folder,
        DocumentTemplate::file(
            "Properties File",
            "A properties file typically used to configure Java classes",
            "properties-file.properties",
            ".properties",
        )?,
        DocumentTemplate::file(
            "JSON File",
            "A file containing JSON data",
            "document.json",
            ".json",
        )?,
        DocumentTemplate::file(
            "Markdown Document",
            "A basic markup document using the Markdown wiki markup, particularly useful for ReadMe files in directories",
            "ReadMe.md",
            ".md",
        )?,
        DocumentTemplate::file("Text Document", "A plain text file", "document.text", ".txt")?,
        DocumentTemplate::file(
            "HTML Document",
            "A HTML document you can edit directly using the HTML markup",
            "document.html",
            ".html",
        )?,
        DocumentTemplate::file("XML Document", "An empty XML document", "document.xml", ".xml")?,
        DocumentTemplate::group(
            "Integration Flows",
            "Camel routes for defining your integration flows",
            vec![
                DocumentTemplate::file(
                    "Camel XML document",
                    "A vanilla Camel XML document for integration flows",
                    "camel.xml",
                    ".xml",
                )?
                .with_icon("/img/icons/camel.svg"),
                DocumentTemplate::file(
                    "Camel OSGi Blueprint XML document",
                    "A vanilla Camel XML document for integration flows when using OSGi Blueprint",
                    "camel-blueprint.xml",
                    ".xml",
                )?
                .with_icon("/img/icons/camel.svg"),
                DocumentTemplate::file(
                    "Camel Spring XML document",
                    "A vanilla Camel XML document for integration flows when using the Spring framework",
                    "camel-spring.xml",
                    ".xml",
                )?
                .with_icon("/img/icons/camel.svg"),
            ],
        ),
        DocumentTemplate::group(
            "Source code",
            "Create a source file",
            vec![
                DocumentTemplate::file("Java", "A Java language file", "document.java", ".java")?
                    .with_icon("/img/icons/java.svg"),
                DocumentTemplate::file("Go", "A Go language file", "document.go", ".go")?
                    .with_icon("/img/icons/gopher.png"),
                DocumentTemplate::file("Python", "A Python language file", "document.py", ".py")?
                    .with_icon("/img/icons/python.png"),
                DocumentTemplate::file(
                    "JavaScript",
                    "A JavaScript language file",
                    "document.js",
                    ".js",
                )?
                .with_icon("/img/icons/javascript.png"),
                DocumentTemplate::file("Ruby", "A Ruby language file", "document.rb", ".rb")?
                    .with_icon("/img/icons/ruby.png"),
                DocumentTemplate::file("Swift", "A Swift language file", "document.swift", ".swift")?
                    .with_icon("/img/icons/swift.png"),
            ],
        ),
        DocumentTemplate::file(
            "Data Mapping Document",
            "Dozer based configuration of mapping documents",
            "dozer-mapping.xml",
            ".xml",
        )?
        .with_icon("/img/icons/dozer/dozer.gif"),
    ])
}

/// Node of the tree the creation wizard renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardNode {
    pub title: String,
    pub key: String,
    pub tooltip: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub is_folder: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    pub children: Vec<WizardNode>,
}

/// Build the wizard tree rooted at "New Documents".
pub fn create_wizard_tree(templates: &[DocumentTemplate]) -> WizardNode {
    WizardNode {
        title: "New Documents".to_string(),
        key: String::new(),
        tooltip: String::new(),
        icon: None,
        is_folder: true,
        extension: None,
        children: templates.iter().map(|t| wizard_node(t, "")).collect(),
    }
}

fn wizard_node(template: &DocumentTemplate, parent_key: &str) -> WizardNode {
    let own_key = template.exemplar.as_deref().unwrap_or(&template.label);
    let key = if parent_key.is_empty() {
        own_key.to_string()
    } else {
        format!("{}_{}", parent_key, own_key)
    };

    WizardNode {
        title: template.label.clone(),
        tooltip: template.tooltip.clone(),
        icon: template.icon.clone(),
        is_folder: template.folder,
        extension: template.extension.clone(),
        children: template
            .children
            .iter()
            .map(|child| wizard_node(child, &key))
            .collect(),
        key,
    }
}
