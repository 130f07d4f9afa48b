use log::debug;

use crate::logic::links::LinkResolver;
use crate::logic::paths::file_extension;
use crate::model::{FileEntry, WikiLinkContext};

pub const CAMEL_NAMESPACES: &[&str] = &[
    "http://camel.apache.org/schema/spring",
    "http://camel.apache.org/schema/blueprint",
];
pub const SPRING_NAMESPACES: &[&str] = &["http://www.springframework.org/schema/beans"];
pub const DOZER_NAMESPACES: &[&str] = &["http://dozer.sourceforge.net"];
pub const ACTIVEMQ_NAMESPACES: &[&str] = &["http://activemq.apache.org/schema/core"];

/// Icon chosen for a listed file: an image URL or a font-awesome class.
#[derive(Debug, Clone, PartialEq)]
pub enum FileIcon {
    Image(String),
    /// Image content fetched through the authenticated forge API
    GitImage { url: String, svg: bool },
    Css(&'static str),
}

impl FileIcon {
    pub fn to_html(&self) -> String {
        match self {
            FileIcon::Image(src) => format!("<img src=\"{}\">", escape_attr(&asset_url(src))),
            FileIcon::GitImage { url, svg } => format!(
                "<img http-src=\"{}\"{} http-src-changed=\"child.downloadURL\" />",
                escape_attr(url),
                if *svg { " media-type=\"image/svg+xml\"" } else { "" }
            ),
            FileIcon::Css(class) => format!("<i class=\"{}\"></i>", class),
        }
    }
}

fn any_namespace_in(namespaces: &[String], known: &[&str]) -> bool {
    namespaces.iter().any(|ns| known.contains(&ns.as_str()))
}

fn special_file_icon(name: &str) -> Option<&'static str> {
    match name.to_lowercase().as_str() {
        "pom.xml" => Some("img/maven-icon.png"),
        "web.config" => Some("img/icons/dotnet.png"),
        "jenkinsfile" => Some("img/jenkins-icon.svg"),
        "fabric8.yml" => Some("img/fabric8_icon.svg"),
        "funktion.yml" => Some("img/icons/funktion.png"),
        _ => None,
    }
}

/// Pick the icon for a file listing row.
pub fn file_icon(
    resolver: &LinkResolver,
    entry: &FileEntry,
    ctx: &WikiLinkContext,
    forge_api_url: &str,
) -> FileIcon {
    let extension = file_extension(&entry.name);

    let icon_url = entry
        .icon_url
        .clone()
        .or_else(|| special_file_icon(&entry.name).map(str::to_string));
    if let Some(url) = icon_url {
        return FileIcon::Image(url);
    }

    if !entry.xml_namespaces.is_empty() {
        if any_namespace_in(&entry.xml_namespaces, CAMEL_NAMESPACES) {
            return FileIcon::Image("img/icons/camel.svg".to_string());
        } else if any_namespace_in(&entry.xml_namespaces, DOZER_NAMESPACES) {
            return FileIcon::Image("img/icons/dozer/dozer.gif".to_string());
        } else if any_namespace_in(&entry.xml_namespaces, ACTIVEMQ_NAMESPACES) {
            return FileIcon::Image("img/icons/messagebroker.svg".to_string());
        }
        debug!(
            "file {} has namespaces {:?}",
            entry.name, entry.xml_namespaces
        );
    }

    if entry.directory {
        return match extension.as_str() {
            "profile" => FileIcon::Css("fa fa-book"),
            _ => FileIcon::Css("fa fa-folder folder-icon"),
        };
    }

    let image = |path: &str| FileIcon::Image(path.to_string());
    match extension.as_str() {
        "cs" => image("img/icons/csharp.png"),
        "java" => image("img/java.svg"),
        "go" => image("img/icons/gopher.png"),
        "groovy" => image("img/icons/groovy.svg"),
        "js" => image("img/icons/javascript.png"),
        "php" => image("img/icons/php.png"),
        "py" => image("img/icons/python.png"),
        "rb" => image("img/icons/ruby.png"),
        "swift" => image("img/icons/swift.png"),
        "png" | "svg" | "jpg" | "gif" => FileIcon::GitImage {
            url: resolver.git_rest_url(ctx, forge_api_url, &entry.path, entry.branch.as_deref()),
            svg: extension == "svg",
        },
        "json" | "xml" => FileIcon::Css("fa fa-file-text"),
        "md" => FileIcon::Css("fa fa-file-text-o"),
        _ => FileIcon::Css("fa fa-file-o"),
    }
}

pub fn file_icon_html(
    resolver: &LinkResolver,
    entry: &FileEntry,
    ctx: &WikiLinkContext,
    forge_api_url: &str,
) -> String {
    file_icon(resolver, entry, ctx, forge_api_url).to_html()
}

/// Compact icon class used by grid rows.
pub fn icon_class(entry: &FileEntry) -> &'static str {
    if entry.directory {
        return "fa fa-folder";
    }
    match file_extension(&entry.name).as_str() {
        "xml" => "fa fa-cog",
        "md" => "fa fa-file-text-o",
        _ => "fa fa-file-o",
    }
}

fn asset_url(path: &str) -> String {
    if path.starts_with('/') || path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

fn escape_attr(value: &str) -> String {
    value
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
