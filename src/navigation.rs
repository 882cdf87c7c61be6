//! Page set and URL handling for the HTML front end.

use std::{fmt, sync::LazyLock};

use indexmap::IndexMap;

/// One of the fixed pages of the front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Page {
    /// Participant roster with check-in actions.
    #[default]
    Checkin,
    /// Score entry for checked-in teams.
    Judging,
    /// Junior and senior rankings.
    Leaderboard,
    /// CSV import and test-data generation.
    Admin,
}

/// Pages keyed by their URL segment, in navigation bar order.
static PAGES: LazyLock<IndexMap<&'static str, Page>> = LazyLock::new(|| {
    [Page::Checkin, Page::Judging, Page::Leaderboard, Page::Admin]
        .into_iter()
        .map(|page| (page.slug(), page))
        .collect()
});

impl Page {
    /// URL segment naming the page.
    pub fn slug(self) -> &'static str {
        match self {
            Page::Checkin => "checkin",
            Page::Judging => "judging",
            Page::Leaderboard => "leaderboard",
            Page::Admin => "admin",
        }
    }

    /// Label shown in the navigation bar.
    pub fn title(self) -> &'static str {
        match self {
            Page::Checkin => "Check-in",
            Page::Judging => "Judging",
            Page::Leaderboard => "Leaderboard",
            Page::Admin => "Admin",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        PAGES.get(slug).copied()
    }

    /// Every page, in navigation bar order.
    pub fn all() -> impl Iterator<Item = Page> {
        PAGES.values().copied()
    }

    /// Absolute URL of the page under `base`.
    pub fn url(self, base: &str) -> String {
        format!("{base}/{}", self.slug())
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// Page addressed by `path`, falling back to the default page for an empty
/// or unknown segment.
pub fn resolve(base: &str, path: &str) -> Page {
    let rest = path.strip_prefix(base).unwrap_or(path);
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    Page::from_slug(rest.trim_end_matches('/')).unwrap_or_default()
}

/// Switches pages in place: nav clicks fetch the target page, swap its
/// `<main>` in and push a history entry; back/forward swaps the page of the
/// restored URL without pushing. Scripts of the new page are re-run.
const SWITCHER: &str = "\
const resolve=(path)=>{\
let rest=path.startsWith(base)?path.slice(base.length):path;\
rest=rest.replace(/^\\//,'').replace(/\\/+$/,'');\
return slugs.includes(rest)?rest:slugs[0];};\
const show=async(url,push)=>{\
const response=await fetch(url);\
if(!response.ok){window.location.assign(url);return;}\
const next=new DOMParser().parseFromString(await response.text(),'text/html');\
document.querySelector('main').replaceWith(next.querySelector('main'));\
document.title=next.title;\
const slug=resolve(new URL(url,window.location.href).pathname);\
document.querySelectorAll('nav a[data-page]').forEach((link)=>link.classList.toggle('active',link.dataset.page===slug));\
if(push){history.pushState({page:slug},'',url);}\
document.querySelectorAll('main script').forEach((stale)=>{\
const script=document.createElement('script');script.textContent=stale.textContent;stale.replaceWith(script);});};\
document.querySelector('nav').addEventListener('click',(event)=>{\
const link=event.target.closest('a[data-page]');\
if(!link){return;}\
event.preventDefault();show(link.href,true);});\
window.addEventListener('popstate',()=>show(window.location.href,false));";

/// Inline script wiring the navigation bar to [`SWITCHER`], with the page
/// slugs in navigation bar order so the browser resolves paths the same way
/// [`resolve`] does.
pub fn client_script(base: &str) -> String {
    let slugs: Vec<&str> = PAGES.keys().copied().collect();
    format!(
        "<script>(()=>{{const base={};const slugs={};{SWITCHER}}})();</script>",
        script_literal(&base),
        script_literal(&slugs),
    )
}

/// JSON literal that cannot close the surrounding `<script>` element.
fn script_literal(value: &impl serde::Serialize) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".into())
        .replace('<', "\\u003c")
}
