//! Page-window arithmetic for the pagination control.
//!
//! `max_visible` counts the first and last page slots. When everything fits,
//! every page is listed; otherwise a sliding window of `max_visible - 2` pages
//! follows the current page, bracketed by page 1 and the last page with
//! ellipses wherever pages are skipped.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_VISIBLE: u32 = 7;

/// Narrowest window that still leaves room for a boundary page on each side.
const MIN_MAX_VISIBLE: u32 = 3;

/// One entry in the rendered page control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageToken {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(page) => write!(f, "{page}"),
            Self::Ellipsis => f.write_str("…"),
        }
    }
}

/// Ordered sequence of tokens to render.
pub type Window = Vec<PageToken>;

/// Compute the window for `current` out of `total_pages`.
///
/// `current` is clamped into `[1, total_pages]` first. An empty window means
/// the control should not be rendered at all.
#[must_use]
pub fn page_window(current: u32, total_pages: u32, max_visible: u32) -> Window {
    if total_pages <= 1 {
        return Vec::new();
    }
    let current = current.clamp(1, total_pages);
    let max_visible = max_visible.max(MIN_MAX_VISIBLE);

    if total_pages <= max_visible {
        return (1..=total_pages).map(PageToken::Page).collect();
    }

    let (start, end) = sliding_range(current, total_pages, max_visible - 2);

    let mut tokens = Vec::with_capacity(max_visible as usize + 2);
    if start > 1 {
        tokens.push(PageToken::Page(1));
        if start > 2 {
            tokens.push(PageToken::Ellipsis);
        }
    }
    tokens.extend((start..=end).map(PageToken::Page));
    if end < total_pages {
        if end < total_pages - 1 {
            tokens.push(PageToken::Ellipsis);
        }
        tokens.push(PageToken::Page(total_pages));
    }
    tokens
}

/// Inclusive range of `width` pages centred on `current`, shifted to fit.
fn sliding_range(current: u32, total_pages: u32, width: u32) -> (u32, u32) {
    let width = width.clamp(1, total_pages);
    let half = width / 2;

    let mut start = current.saturating_sub(half).max(1);
    let mut end = start + width - 1;
    if end > total_pages {
        end = total_pages;
        start = end + 1 - width;
    }
    (start, end)
}
