//! Scripted user input for `snapshot` and `serve` query replay.
//!
//! | Form              | User input                                   |
//! |-------------------|----------------------------------------------|
//! | `window:ID`       | click the nav link targeting window `ID`     |
//! | `project:ID`      | click the project link targeting `ID`        |
//! | `close:ID`        | click the close button of window `ID`        |
//! | `back`            | click the back button on the shown page      |
//! | `drag:ID:DX,DY`   | drag window `ID` by its title bar            |

use crate::dom::{Document, NodeId};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid action `{input}`: {reason}")]
pub struct GestureError {
    input: String,
    reason: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    Window(String),
    Project(String),
    Close(String),
    Back,
    Drag { window: String, dx: f64, dy: f64 },
}

impl FromStr for Gesture {
    type Err = GestureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = |reason| GestureError {
            input: s.to_string(),
            reason,
        };
        let s = s.trim();
        if s == "back" {
            return Ok(Self::Back);
        }

        let (kind, rest) = s
            .split_once(':')
            .ok_or_else(|| err("expected KIND:ID or `back`"))?;
        if rest.is_empty() {
            return Err(err("missing id"));
        }
        match kind {
            "window" => Ok(Self::Window(rest.to_string())),
            "project" => Ok(Self::Project(rest.to_string())),
            "close" => Ok(Self::Close(rest.to_string())),
            "drag" => {
                let (window, delta) = rest
                    .split_once(':')
                    .ok_or_else(|| err("expected drag:ID:DX,DY"))?;
                let (dx, dy) = delta
                    .split_once(',')
                    .ok_or_else(|| err("expected drag:ID:DX,DY"))?;
                let parse = |v: &str| v.trim().parse::<f64>().ok().filter(|v| v.is_finite());
                match (window.is_empty(), parse(dx), parse(dy)) {
                    (false, Some(dx), Some(dy)) => Ok(Self::Drag {
                        window: window.to_string(),
                        dx,
                        dy,
                    }),
                    (true, ..) => Err(err("missing id")),
                    _ => Err(err("drag offsets must be numbers")),
                }
            }
            _ => Err(err("unknown kind, expected window, project, close, back or drag")),
        }
    }
}

impl Gesture {
    /// The node a user would click. `None` for drags and missing controls.
    pub fn target(&self, doc: &Document) -> Option<NodeId> {
        match self {
            Self::Window(id) => find_link(doc, "nav-link", "data-window-target", id),
            Self::Project(id) => find_link(doc, "project-link", "data-project-target", id),
            Self::Close(id) => {
                let window = doc.get_element_by_id(id)?;
                doc.elements_by_class_in(window, "close-btn").first().copied()
            }
            Self::Back => {
                let buttons = doc.elements_by_class("back-button");
                buttons
                    .iter()
                    .copied()
                    .find(|&button| {
                        doc.closest(button, "project-page")
                            .is_some_and(|page| doc.style(page, "display").as_deref() == Some("block"))
                    })
                    .or_else(|| buttons.first().copied())
            }
            Self::Drag { .. } => None,
        }
    }
}

fn find_link(doc: &Document, class: &str, attr: &str, id: &str) -> Option<NodeId> {
    doc.elements_by_class(class)
        .into_iter()
        .find(|&node| doc.attr(node, attr).as_deref() == Some(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        assert_eq!("window:about".parse(), Ok(Gesture::Window("about".into())));
        assert_eq!("project:proj1".parse(), Ok(Gesture::Project("proj1".into())));
        assert_eq!("close:about".parse(), Ok(Gesture::Close("about".into())));
        assert_eq!("back".parse(), Ok(Gesture::Back));
        assert_eq!(
            "drag:about:30,-12.5".parse(),
            Ok(Gesture::Drag {
                window: "about".into(),
                dx: 30.0,
                dy: -12.5
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "open:about", "window:", "drag:about", "drag:about:1", "drag::1,2", "drag:a:x,1"] {
            assert!(bad.parse::<Gesture>().is_err(), "{bad} should fail");
        }
        let err = "drag:a:x,1".parse::<Gesture>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid action `drag:a:x,1`: drag offsets must be numbers"
        );
    }

    #[test]
    fn test_targets() {
        let doc = Document::parse(
            r##"<a class="nav-link" data-window-target="about" id="n">Sobre</a>
<a class="project-link" data-project-target="proj1" id="p">P</a>
<div class="window" id="about"><button class="close-btn" id="c">x</button></div>
<div class="project-page" id="proj1" style="display: none"><button class="back-button" id="b1">x</button></div>
<div class="project-page" id="proj3" style="display: block"><button class="back-button" id="b3">x</button></div>"##,
        )
        .unwrap();
        let id = |s| doc.get_element_by_id(s);

        assert_eq!(Gesture::Window("about".into()).target(&doc), id("n"));
        assert_eq!(Gesture::Project("proj1".into()).target(&doc), id("p"));
        assert_eq!(Gesture::Close("about".into()).target(&doc), id("c"));
        assert_eq!(Gesture::Back.target(&doc), id("b3"));
        assert_eq!(Gesture::Window("contact".into()).target(&doc), None);
    }
}
