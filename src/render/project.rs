//! Project list entries and project detail pages.
//!
//! Detail page layout:
//!
//! ```text
//! div.project-page#{id}
//! ├── header.project-header   [ page_title ]  [ X ] VOLTAR
//! └── div.project-content
//!     ├── div.project-column              summary, technologies, findings?, links?
//!     └── div.project-column.visuals-column   gallery?, code?
//! ```

use super::markup::{Markup, attr, class_list};
use crate::content::Project;

/// Visual class used when an image or snippet does not name one.
const DEFAULT_VISUAL_TYPE: &str = "principal";

const BACK_LABEL: &str = "Voltar para a área de trabalho";

/// Entry of `#project-list-container`.
pub fn list_entry(project: &Project, m: Markup) -> String {
    format!(
        r##"<li><a href="#" class="project-link" data-project-target="{}">&gt; {}</a></li>"##,
        attr(&project.id),
        m.text(&project.menu_title)
    )
}

/// Full detail page for one project.
pub fn detail_page(project: &Project, m: Markup) -> String {
    let left = [
        format!("<h4>// RESUMO</h4>{}", m.paragraphs(&project.summary)),
        format!(
            r#"<h4>// TECNOLOGIAS</h4><div class="tag-list">{}</div>"#,
            m.each("span", &project.technologies)
        ),
        findings(project, m),
        links(project, m),
    ]
    .concat();
    let right = gallery(project) + &code(project, m);

    format!(
        concat!(
            r#"<div class="project-page" id="{id}">"#,
            r#"<header class="project-header"><h3>[ {title} ]</h3>"#,
            r#"<button class="back-button" aria-label="{back}">[ X ] VOLTAR</button></header>"#,
            r#"<div class="project-content">"#,
            r#"<div class="project-column">{left}</div>"#,
            r#"<div class="project-column visuals-column">{right}</div>"#,
            r#"</div></div>"#,
        ),
        id = attr(&project.id),
        title = m.text(&project.page_title),
        back = BACK_LABEL,
        left = left,
        right = right,
    )
}

/// Gallery classed by the first image's type; each item also carries its own.
fn gallery(project: &Project) -> String {
    let Some(first) = project.images.first() else {
        return String::new();
    };
    let gallery_type = non_empty(&first.kind).unwrap_or(DEFAULT_VISUAL_TYPE);

    let items: String = project
        .images
        .iter()
        .map(|image| {
            format!(
                r#"<div class="{}"><img src="{}" alt="{}"></div>"#,
                class_list(["gallery-item", image.kind.as_deref().unwrap_or_default()]),
                attr(&image.src),
                attr(&image.alt)
            )
        })
        .collect();

    format!(
        r#"<div class="{}"><h4>// VISUALIZAÇÃO</h4><div class="image-gallery">{items}</div></div>"#,
        class_list(["visual-item", gallery_type])
    )
}

/// Snippets follow the same escaping policy as other text, so trusted
/// content may carry highlighting markup.
fn code(project: &Project, m: Markup) -> String {
    let Some(snippet) = non_empty(&project.code_snippet) else {
        return String::new();
    };
    let code_type = non_empty(&project.code_type).unwrap_or(DEFAULT_VISUAL_TYPE);
    format!(
        r#"<div class="{}"><h4>// CÓDIGO</h4><div class="terminal-window"><pre><code>{}</code></pre></div></div>"#,
        class_list(["visual-item", code_type]),
        m.text(snippet)
    )
}

/// An empty string counts as absent.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

fn findings(project: &Project, m: Markup) -> String {
    if project.findings.is_empty() {
        return String::new();
    }
    format!(
        "<h4>// RESULTADOS</h4><ul>{}</ul>",
        m.each("li", &project.findings)
    )
}

fn links(project: &Project, m: Markup) -> String {
    project
        .links
        .iter()
        .map(|link| m.neon_link(&link.url, &link.text))
        .collect::<Vec<_>>()
        .join(" ")
}
