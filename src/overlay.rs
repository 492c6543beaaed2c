//! Status overlay
//!
//! A small fixed-position label shown in a screen corner while the check is
//! idle, running, finished without reload, or failed. Nothing is shown once a
//! reload was requested.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;

use crate::check::state::CheckState;
use crate::config::{CheckConfig, DisplayMode};

pub const LOADING_TEXT: &str = "loading version...";
pub const ERROR_TEXT: &str = "version error";
pub const VERSION_TEXT: &str = "version: ";

const DEFAULT_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("bottom", "0"),
    ("zIndex", "99999"),
    ("padding", "3px 7px"),
    ("fontSize", "12px"),
    ("background", "#5d5d5d"),
    ("color", "white"),
    ("letterSpacing", "1px"),
    ("fontFamily", "Helvetica"),
];

static UPPERCASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-Z]").expect("valid regex"));

/// Rendered overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub text: String,
    /// Version shown in a `<code>` element after `text`
    pub code: Option<String>,
    pub class_name: String,
    /// Style properties with camelCase names, in insertion order
    pub style: IndexMap<String, String>,
}

impl Overlay {
    /// Inline CSS with kebab-case property names, e.g. `z-index: 99999;`
    pub fn style_attribute(&self) -> String {
        self.style
            .iter()
            .map(|(key, value)| format!("{}: {};", to_kebab_case(key), value))
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            "<div style=\"{}\"",
            escape_html(&self.style_attribute())
        );
        if !self.class_name.is_empty() {
            html.push_str(&format!(" class=\"{}\"", escape_html(&self.class_name)));
        }
        html.push('>');
        html.push_str(&escape_html(&self.text));
        if let Some(code) = &self.code {
            html.push_str(&format!("<code>{}</code>", escape_html(code)));
        }
        html.push_str("</div>");
        html
    }
}

/// Overlay for `state`, or `None` when hidden or a reload was requested
pub fn render(state: CheckState, config: &CheckConfig) -> Option<Overlay> {
    if state == CheckState::Stale || config.display == DisplayMode::Hidden {
        return None;
    }

    let (text, code) = match state {
        CheckState::Checking => (LOADING_TEXT.to_string(), None),
        CheckState::Error => (ERROR_TEXT.to_string(), None),
        _ => (
            VERSION_TEXT.to_string(),
            Some(config.current_version.clone()),
        ),
    };

    Some(Overlay {
        text,
        code,
        class_name: config.class_name.clone(),
        style: merged_style(config),
    })
}

/// Side position, then the default style, then the caller's overrides
fn merged_style(config: &CheckConfig) -> IndexMap<String, String> {
    let mut style = IndexMap::new();
    style.insert(config.side.as_str().to_string(), "0".to_string());

    for (key, value) in DEFAULT_STYLE {
        style.insert(key.to_string(), value.to_string());
    }

    for (key, value) in &config.style {
        style.insert(key.clone(), value.clone());
    }

    style
}

fn to_kebab_case(key: &str) -> String {
    UPPERCASE
        .replace_all(key, |caps: &regex::Captures| {
            format!("-{}", caps[0].to_ascii_lowercase())
        })
        .into_owned()
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
