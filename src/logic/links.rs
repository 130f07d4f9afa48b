use crate::logic::paths::{encode_path, file_extension, is_index_page, join_url, trim_leading};
use crate::model::{FileFormatRegistry, Location, ViewMode, WikiLinkContext};

/// Custom views available under a wiki start link.
pub const CUSTOM_WIKI_VIEW_PAGES: &[&str] = &[
    "/formTable",
    "/camel/diagram",
    "/camel/canvas",
    "/camel/properties",
    "/dozer/mappings",
];

/// File named like this has no extension but is a groovy script.
const JENKINSFILE: &str = "Jenkinsfile";

/// Builds the hash-fragment links wiki views navigate with.
///
/// Every method is a pure function of its arguments and the format registry
/// given at construction.
#[derive(Debug, Clone, Default)]
pub struct LinkResolver {
    registry: FileFormatRegistry,
}

impl LinkResolver {
    pub fn new(registry: FileFormatRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &FileFormatRegistry {
        &self.registry
    }

    pub fn project_link(&self, ctx: &WikiLinkContext) -> String {
        join_url(&[
            "/workspaces",
            ctx.effective_namespace(),
            "projects",
            &ctx.project_id,
        ])
    }

    /// `#<project>/wiki[/branch/<branch>]`
    pub fn start_link(&self, ctx: &WikiLinkContext) -> String {
        let project = self.project_link(ctx);
        let start = match ctx.branch.as_deref() {
            Some(branch) => join_url(&[&project, "wiki", "branch", branch]),
            None => join_url(&[&project, "wiki"]),
        };
        format!("#{}", start)
    }

    pub fn view_link(
        &self,
        ctx: &WikiLinkContext,
        page_id: &str,
        location: &Location,
        file_name: Option<&str>,
    ) -> String {
        let mut link = if page_id.is_empty() {
            rewrite_location(&location.path, ViewMode::view_sources(), ViewMode::View.segment())
        } else {
            let mode = if is_index_page(page_id) {
                ViewMode::Book
            } else {
                ViewMode::View
            };
            format!(
                "{}/{}/{}",
                self.start_link(ctx),
                mode,
                encode_path(trim_leading(page_id, "/"))
            )
        };

        if let Some(name) = file_name.map(|n| trim_leading(n, "/")).filter(|n| !n.is_empty()) {
            if !page_id.is_empty() && page_id.ends_with(name) {
                return link;
            }
            if !link.ends_with('/') {
                link.push('/');
            }
            link.push_str(name);
        }
        link
    }

    pub fn branch_link(
        &self,
        ctx: &WikiLinkContext,
        page_id: &str,
        location: &Location,
        file_name: Option<&str>,
    ) -> String {
        self.view_link(ctx, page_id, location, file_name)
    }

    pub fn edit_link(&self, ctx: &WikiLinkContext, page_id: &str, location: &Location) -> Option<String> {
        self.custom_edit_link(ctx, page_id, location, ViewMode::Edit.segment())
    }

    /// `None` for images, which have no text form to edit.
    pub fn custom_edit_link(
        &self,
        ctx: &WikiLinkContext,
        page_id: &str,
        location: &Location,
        edit_view: &str,
    ) -> Option<String> {
        if self.file_format(page_id) == Some("image") {
            return None;
        }

        if page_id.is_empty() {
            Some(rewrite_location(&location.path, ViewMode::edit_sources(), edit_view))
        } else {
            Some(join_url(&[
                &self.start_link(ctx),
                edit_view,
                &encode_path(page_id),
            ]))
        }
    }

    /// Creation always targets a folder: unless the view lists children or is
    /// a form table, the trailing file name is dropped.
    pub fn create_link(&self, ctx: &WikiLinkContext, page_id: &str, location: &Location) -> String {
        let mut link = if page_id.is_empty() {
            rewrite_location(&location.path, ViewMode::create_sources(), ViewMode::Create.segment())
        } else {
            format!(
                "{}/{}/{}",
                self.start_link(ctx),
                ViewMode::Create,
                encode_path(trim_leading(page_id, "/"))
            )
        };

        let on_form_table = location_mode(&location.path) == Some(ViewMode::FormTable);
        if let Some(idx) = link.rfind('/') {
            if idx > 0 && !ctx.has_children && !on_form_table {
                link.truncate(idx + 1);
            }
        }
        link
    }

    pub fn history_link(&self, ctx: &WikiLinkContext, page_id: &str) -> String {
        format!(
            "{}/{}/{}",
            self.start_link(ctx),
            ViewMode::History,
            encode_path(trim_leading(page_id, "/"))
        )
    }

    pub fn diff_link(
        &self,
        ctx: &WikiLinkContext,
        commit_id: &str,
        other_commit_id: &str,
        path: &str,
    ) -> String {
        join_url(&[
            &self.start_link(ctx),
            ViewMode::Diff.segment(),
            commit_id,
            other_commit_id,
            &encode_path(trim_leading(path, "/")),
        ])
    }

    pub fn version_link(&self, ctx: &WikiLinkContext, path: &str, commit_id: &str) -> String {
        join_url(&[
            &self.start_link(ctx),
            ViewMode::Version.segment(),
            &encode_path(trim_leading(path, "/")),
            commit_id,
        ])
    }

    /// Links to the custom views for the context's branch, without the `#`.
    pub fn custom_view_links(&self, ctx: &WikiLinkContext) -> Vec<String> {
        let start = self.start_link(ctx);
        let prefix = trim_leading(&start, "#");
        CUSTOM_WIKI_VIEW_PAGES
            .iter()
            .map(|page| format!("{}{}", prefix, page))
            .collect()
    }

    pub fn file_format(&self, name: &str) -> Option<&str> {
        let extension = if name == JENKINSFILE {
            "groovy".to_string()
        } else {
            file_extension(name)
        };
        self.registry.category_of(&extension)
    }

    /// URL for raw file content of the context's project in the forge API.
    pub fn git_rest_url(
        &self,
        ctx: &WikiLinkContext,
        forge_api_url: &str,
        path: &str,
        branch: Option<&str>,
    ) -> String {
        let url = join_url(&[
            forge_api_url,
            "repos/project",
            ctx.effective_namespace(),
            &ctx.project_id,
            "raw",
            path,
        ]);
        let branch = branch
            .filter(|b| !b.is_empty())
            .unwrap_or_else(|| ctx.effective_branch());
        format!("{}?branch={}", url, branch)
    }
}

/// Index of the view-mode segment in a split location path.
///
/// The mode follows the `wiki` segment (and an optional `branch/<name>` pair);
/// paths without a `wiki` segment use their first segment naming a mode.
fn mode_index(segments: &[&str]) -> Option<usize> {
    match segments.iter().position(|s| *s == "wiki") {
        Some(wiki) => {
            let mut idx = wiki + 1;
            if segments.get(idx) == Some(&"branch") {
                idx += 2;
            }
            segments
                .get(idx)
                .and_then(|s| s.parse::<ViewMode>().ok())
                .map(|_| idx)
        }
        None => segments.iter().position(|s| s.parse::<ViewMode>().is_ok()),
    }
}

/// View mode of a location path, if it names one.
pub fn location_mode(path: &str) -> Option<ViewMode> {
    let segments: Vec<&str> = path.split('/').collect();
    mode_index(&segments).and_then(|idx| segments[idx].parse().ok())
}

/// Swap the view mode of `path` to `to` when it is one of `from`, as a `#` link.
///
/// Only the mode segment is considered; pages whose names merely contain a
/// mode name are left alone.
pub fn rewrite_location(path: &str, from: &[ViewMode], to: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').collect();
    if let Some(idx) = mode_index(&segments) {
        let current = segments[idx].parse::<ViewMode>().ok();
        if current.map(|m| from.contains(&m)).unwrap_or(false) {
            segments[idx] = to;
        }
    }
    format!("#{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> LinkResolver {
        LinkResolver::new(FileFormatRegistry::default())
    }

    fn ctx() -> WikiLinkContext {
        WikiLinkContext::new("demo")
            .with_namespace("team")
            .with_branch("master")
    }

    const START: &str = "#/workspaces/team/projects/demo/wiki/branch/master";

    #[test]
    fn start_link_includes_branch_only_when_set() {
        let r = resolver();
        assert_eq!(r.start_link(&ctx()), START);
        assert_eq!(
            r.start_link(&WikiLinkContext::new("demo")),
            "#/workspaces/default/projects/demo/wiki"
        );
    }

    #[test]
    fn index_pages_use_book_view() {
        let r = resolver();
        let loc = Location::default();
        assert_eq!(
            r.view_link(&ctx(), "index.md", &loc, None),
            format!("{}/book/index.md", START)
        );
        assert_eq!(
            r.view_link(&ctx(), "readme.txt", &loc, None),
            format!("{}/view/readme.txt", START)
        );
    }

    #[test]
    fn view_link_trims_and_encodes_page() {
        let link = resolver().view_link(&ctx(), "/my docs/a b.md", &Location::default(), None);
        assert_eq!(link, format!("{}/view/my%20docs/a%20b.md", START));
    }

    #[test]
    fn view_link_appends_file_name_once() {
        let r = resolver();
        let loc = Location::default();
        assert_eq!(
            r.view_link(&ctx(), "docs", &loc, Some("a.md")),
            format!("{}/view/docs/a.md", START)
        );
        assert_eq!(
            r.view_link(&ctx(), "docs/a.md", &loc, Some("a.md")),
            format!("{}/view/docs/a.md", START)
        );
    }

    #[test]
    fn view_link_without_page_rewrites_location() {
        let loc = Location::new("/workspaces/team/projects/demo/wiki/edit/docs/a.md");
        assert_eq!(
            resolver().view_link(&ctx(), "", &loc, None),
            "#/workspaces/team/projects/demo/wiki/view/docs/a.md"
        );
    }

    #[test]
    fn rewrite_only_touches_the_mode_segment() {
        let loc = "/workspaces/team/projects/edit/wiki/branch/create/edit/credit.md";
        assert_eq!(
            rewrite_location(loc, ViewMode::view_sources(), "view"),
            "#/workspaces/team/projects/edit/wiki/branch/create/view/credit.md"
        );
    }

    #[test]
    fn rewrite_leaves_other_modes_alone() {
        assert_eq!(
            rewrite_location("/wiki/history/a.md", ViewMode::view_sources(), "view"),
            "#/wiki/history/a.md"
        );
    }

    #[test]
    fn edit_link_refuses_images() {
        let r = resolver();
        let loc = Location::default();
        assert_eq!(r.edit_link(&ctx(), "logo.png", &loc), None);
        assert_eq!(
            r.edit_link(&ctx(), "docs/a.md", &loc),
            Some(format!("{}/edit/docs/a.md", START))
        );
    }

    #[test]
    fn custom_edit_link_uses_given_view() {
        let r = resolver();
        assert_eq!(
            r.custom_edit_link(&ctx(), "camel.xml", &Location::default(), "camel/canvas"),
            Some(format!("{}/camel/canvas/camel.xml", START))
        );
        let loc = Location::new("/wiki/view/camel.xml");
        assert_eq!(
            r.custom_edit_link(&ctx(), "", &loc, "edit"),
            Some("#/wiki/edit/camel.xml".to_string())
        );
    }

    #[test]
    fn create_link_targets_containing_folder() {
        let link = resolver().create_link(&ctx(), "a/b/c.md", &Location::default());
        assert!(link.ends_with("/a/b/"), "{}", link);
        assert_eq!(link, format!("{}/create/a/b/", START));
    }

    #[test]
    fn create_link_trims_leading_slash() {
        let r = resolver();
        let page = crate::model::PageId::new("/a/b/c.md");
        assert_eq!(
            r.create_link(&ctx(), page.as_str(), &Location::default()),
            format!("{}/create/a/b/", START)
        );
        assert_eq!(
            r.create_link(&ctx(), crate::model::PageId::root().as_str(), &Location::default()),
            format!("{}/create/", START)
        );
    }

    #[test]
    fn create_link_keeps_file_for_folder_views() {
        let r = resolver();
        let with_children = ctx().with_children(true);
        assert_eq!(
            r.create_link(&with_children, "a/b", &Location::default()),
            format!("{}/create/a/b", START)
        );

        let form_table = Location::new("/wiki/formTable/a/b");
        assert_eq!(
            r.create_link(&ctx(), "", &form_table),
            "#/wiki/create/a/b"
        );
    }

    #[test]
    fn create_link_without_page_rewrites_then_truncates() {
        let loc = Location::new("/wiki/branch/master/view/a/b.md");
        assert_eq!(
            resolver().create_link(&ctx(), "", &loc),
            "#/wiki/branch/master/create/a/"
        );
    }

    #[test]
    fn history_diff_and_version_links() {
        let r = resolver();
        assert_eq!(
            r.history_link(&ctx(), "/docs/a.md"),
            format!("{}/history/docs/a.md", START)
        );
        assert_eq!(
            r.diff_link(&ctx(), "abc", "def", "docs/a.md"),
            format!("{}/diff/abc/def/docs/a.md", START)
        );
        assert_eq!(
            r.version_link(&ctx(), "docs/a.md", "abc"),
            format!("{}/version/docs/a.md/abc", START)
        );
    }

    #[test]
    fn diff_and_version_links_trim_leading_slash() {
        let r = resolver();
        assert_eq!(
            r.diff_link(&ctx(), "a", "b", "/a/b/c.md"),
            format!("{}/diff/a/b/a/b/c.md", START)
        );
        assert_eq!(
            r.version_link(&ctx(), "/docs/a.md", "abc"),
            format!("{}/version/docs/a.md/abc", START)
        );
        assert_eq!(
            r.version_link(&ctx(), "/", "abc"),
            format!("{}/version/abc", START)
        );
    }

    #[test]
    fn view_link_file_name_gets_one_slash() {
        let r = resolver();
        assert_eq!(
            r.view_link(&ctx(), "docs", &Location::default(), Some("/a.md")),
            format!("{}/view/docs/a.md", START)
        );
        assert_eq!(
            r.view_link(&ctx(), "docs/", &Location::default(), Some("/a.md")),
            format!("{}/view/docs/a.md", START)
        );
    }

    #[test]
    fn custom_view_links_drop_hash() {
        let links = resolver().custom_view_links(&ctx());
        assert_eq!(links.len(), CUSTOM_WIKI_VIEW_PAGES.len());
        assert_eq!(
            links[0],
            "/workspaces/team/projects/demo/wiki/branch/master/formTable"
        );
    }

    #[test]
    fn jenkinsfile_is_groovy() {
        let r = resolver();
        assert_eq!(r.file_format("Jenkinsfile"), Some("text/x-groovy"));
        assert_eq!(r.file_format("build.groovy"), Some("text/x-groovy"));
        assert_eq!(r.file_format("readme"), Some("markdown"));
        assert_eq!(r.file_format("archive.tar"), None);
    }

    #[test]
    fn git_rest_url_defaults_branch() {
        let r = resolver();
        let ctx = WikiLinkContext::new("demo");
        assert_eq!(
            r.git_rest_url(&ctx, "http://forge/api/forge", "img/logo.png", None),
            "http://forge/api/forge/repos/project/default/demo/raw/img/logo.png?branch=master"
        );
        assert_eq!(
            r.git_rest_url(&ctx, "http://forge/api/forge", "a.png", Some("dev")),
            "http://forge/api/forge/repos/project/default/demo/raw/a.png?branch=dev"
        );
    }

    #[test]
    fn location_mode_reads_wiki_segment() {
        assert_eq!(location_mode("/wiki/formTable/a"), Some(ViewMode::FormTable));
        assert_eq!(location_mode("/x/wiki/branch/dev/book/index.md"), Some(ViewMode::Book));
        assert_eq!(location_mode("/x/wiki/camel/canvas"), None);
    }
}
