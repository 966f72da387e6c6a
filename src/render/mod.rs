//! Renderer: content file → page markup.
//!
//! [`render`] is pure: the same [`SiteData`] always yields the same
//! [`Fragments`]. [`apply`] then writes the fragments into the page shell,
//! skipping any element the shell does not have.

mod apply;
mod markup;
mod project;

pub use apply::apply;
pub use markup::Markup;

use crate::content::SiteData;

/// `src`/`alt` for `#profile-image`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileImage {
    pub src: String,
    pub alt: String,
}

/// Title and heading text of one window, set as plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowText {
    pub id: String,
    pub title: Option<String>,
    pub heading: Option<String>,
}

/// One `div.project-page`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPage {
    pub id: String,
    pub html: String,
}

/// Every piece of markup the page shell receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragments {
    pub page_title: String,
    pub profile_image: Option<ProfileImage>,
    /// `#nav-container`
    pub nav: String,
    /// Only windows present in the content file.
    pub windows: Vec<WindowText>,
    /// `#about-text-container`
    pub about_text: String,
    /// `#readme-text-container`, when the readme window has text.
    pub readme_text: Option<String>,
    /// `#contact-links-container`, when the contact window has links.
    pub contact_links: Option<String>,
    /// `#project-list-container`
    pub project_list: String,
    /// Children of `#project-view`, in list order.
    pub project_pages: Vec<ProjectPage>,
}

/// Render every section for the windows named in `window_ids`.
pub fn render(site: &SiteData, window_ids: &[String], m: Markup) -> Fragments {
    let info = &site.personal_info;

    let profile_image = info.profile_image.as_ref().map(|src| ProfileImage {
        src: src.clone(),
        alt: format!("Foto de {}", info.name),
    });

    let nav = site
        .navigation
        .iter()
        .map(|item| {
            format!(
                r##"<li><a href="#" class="nav-link" data-window-target="{}">{}</a></li>"##,
                markup::attr(&item.target),
                m.text(&item.text)
            )
        })
        .collect();

    let windows = window_ids
        .iter()
        .filter_map(|id| {
            let content = site.window(id)?;
            Some(WindowText {
                id: id.clone(),
                title: content.title.clone(),
                heading: content.heading.clone(),
            })
        })
        .collect();

    let readme_text = site
        .window("readme")
        .and_then(|w| w.text.as_deref())
        .map(|text| m.paragraphs(text));

    let contact_links = site
        .window("contact")
        .and_then(|w| w.links.as_deref())
        .map(|links| {
            links
                .iter()
                .map(|link| format!("<li>{}</li>", m.neon_link(&link.url, &link.name)))
                .collect()
        });

    let project_list = site
        .visible_projects()
        .map(|p| project::list_entry(p, m))
        .collect();

    let project_pages = site
        .visible_projects()
        .map(|p| ProjectPage {
            id: p.id.clone(),
            html: project::detail_page(p, m),
        })
        .collect();

    Fragments {
        page_title: info.page_title.clone(),
        profile_image,
        nav,
        windows,
        about_text: m.paragraphs(&info.about_text),
        readme_text,
        contact_links,
        project_list,
        project_pages,
    }
}
