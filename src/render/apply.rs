//! Writing rendered fragments into the page shell.

use super::Fragments;
use crate::{
    dom::{Document, DomError},
    log,
};

/// Populate the shell. Elements the shell lacks are skipped; markup that
/// does not parse is inserted verbatim and reported on the `render` channel.
pub fn apply(doc: &mut Document, fragments: &Fragments) {
    doc.set_title(&fragments.page_title);

    let profile = doc.get_element_by_id("profile-image");
    if let (Some(image), Some(node)) = (&fragments.profile_image, profile) {
        doc.set_attr(node, "src", &image.src);
        doc.set_attr(node, "alt", &image.alt);
    }

    set_html(doc, "nav-container", &fragments.nav);

    for window in &fragments.windows {
        if let Some(title) = &window.title {
            set_text(doc, &format!("{}-title", window.id), title);
        }
        if let Some(heading) = &window.heading {
            set_text(doc, &format!("{}-heading", window.id), heading);
        }
    }

    set_html(doc, "about-text-container", &fragments.about_text);
    if let Some(readme) = &fragments.readme_text {
        set_html(doc, "readme-text-container", readme);
    }
    if let Some(contact) = &fragments.contact_links {
        set_html(doc, "contact-links-container", contact);
    }

    set_html(doc, "project-list-container", &fragments.project_list);
    if let Some(view) = doc.get_element_by_id("project-view") {
        report("project-view", doc.set_inner_html(view, ""));
        for page in &fragments.project_pages {
            report(&page.id, doc.append_html(view, &page.html));
        }
    }
}

fn set_text(doc: &mut Document, id: &str, text: &str) {
    if let Some(node) = doc.get_element_by_id(id) {
        doc.set_text(node, text);
    }
}

fn set_html(doc: &mut Document, id: &str, html: &str) {
    if let Some(node) = doc.get_element_by_id(id) {
        report(id, doc.set_inner_html(node, html));
    }
}

fn report(target: &str, result: Result<(), DomError>) {
    if let Err(err) = result {
        log!("render"; "#{target}: {err}, inserted as-is");
    }
}
