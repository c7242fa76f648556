//! Queue pagination

use crate::command::ButtonAction;
use std::ops::Range;

/// One page of a list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Item indices shown on this page
    pub range: Range<usize>,
    /// 0-based, clamped into `0..total_pages`
    pub current_page: usize,
    /// At least 1, even for an empty list
    pub total_pages: usize,
}

impl Page {
    /// `Page 2/3`
    pub fn label(&self) -> String {
        format!("Page {}/{}", self.current_page + 1, self.total_pages)
    }
}

/// Slice `len` items into pages of `size`, clamping `page`
pub fn paginate(len: usize, page: usize, size: usize) -> Page {
    let size = size.max(1);
    let total_pages = len.div_ceil(size).max(1);
    let current_page = page.min(total_pages - 1);
    let start = (current_page * size).min(len);
    let end = (start + size).min(len);

    Page {
        range: start..end,
        current_page,
        total_pages,
    }
}

/// Page reached by pressing a navigation button
///
/// Non-navigation buttons leave the page unchanged.
pub fn turn(current: usize, action: ButtonAction, total_pages: usize) -> usize {
    let last = total_pages.saturating_sub(1);
    match action {
        ButtonAction::FirstPage => 0,
        ButtonAction::PrevPage => current.saturating_sub(1),
        ButtonAction::NextPage => (current + 1).min(last),
        ButtonAction::LastPage => last,
        _ => current.min(last),
    }
}
