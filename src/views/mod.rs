//! Server-side HTML rendering.
//!
//! Every function here is pure: it takes the roster (or a slice of it) and
//! returns markup. Handlers decide which notices and page to show.

pub mod admin;
pub mod judging;
pub mod layout;
pub mod leaderboard;
pub mod roster;

use crate::{dto::notice::Notice, navigation::Page, state::Roster};

/// Everything needed to render one full page.
pub struct PageView<'a> {
    pub base: &'a str,
    pub page: Page,
    pub roster: &'a Roster,
    pub notices: &'a [Notice],
    pub degraded: bool,
    /// Current roster filter, echoed back into the search box.
    pub search: &'a str,
    /// Pre-filled participant count on the admin page.
    pub test_data_count: usize,
}

/// Render the complete HTML document for `view.page`.
pub fn render_page(view: &PageView<'_>) -> String {
    let body = match view.page {
        Page::Checkin => roster::render(view.base, view.roster, view.search),
        Page::Judging => judging::render(view.base, view.roster),
        Page::Leaderboard => leaderboard::render(view.roster),
        Page::Admin => admin::render(view.base, view.test_data_count),
    };
    layout::render(view, &body)
}

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Team A1"), "Team A1");
    }

    #[test]
    fn renders_every_page_inside_the_layout() {
        let roster = Roster::default();
        for page in Page::all() {
            let html = render_page(&PageView {
                base: "/PEO",
                page,
                roster: &roster,
                notices: &[],
                degraded: false,
                search: "",
                test_data_count: 50,
            });
            assert!(html.starts_with("<!DOCTYPE html>"));
            assert!(html.contains(&format!("id=\"{}-page\"", page.slug())));
        }
    }
}
