//! Page window computation for pagination controls

use serde::Serialize;

/// Rows per page when none is given.
pub const DEFAULT_LIMIT: usize = 10;

/// Starting row when none is given.
pub const DEFAULT_OFFSET: usize = 0;

/// Number of page links in a window when none is given.
pub const DEFAULT_PADDING: usize = 10;

/// Block multiplier for the window start. Deliberately independent of padding.
const BLOCK_SIZE: usize = 10;

/// One page link in a pagination control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Page {
    /// Whether this is the page currently shown.
    pub selected: bool,
    /// 1-based page number.
    pub number: usize,
    /// Rows per page.
    pub limit: usize,
    /// Offset of the first row on this page.
    pub offset: usize,
}

/// Computes the window of page links for a result set.
///
/// The window always starts with page 1 and ends with the last page, with a
/// block of up to `padding` pages around the current one in between.
///
/// Construction is fail-soft: invalid input (unparsable or negative text, or
/// a zero `limit` or `padding`) resets every field to its default instead of
/// failing.
///
/// # Example
///
/// ```
/// use dodotable_lib::Pager;
///
/// let pager = Pager::new(10, 0, 95, 10);
/// let numbers: Vec<_> = pager.pages().iter().map(|p| p.number).collect();
/// assert_eq!(numbers, (1..=10).collect::<Vec<_>>());
/// assert!(pager.pages()[0].selected);
///
/// let pager = Pager::parse("x", "0", "95", "10");
/// assert_eq!(pager, Pager::default());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pager {
    limit: usize,
    offset: usize,
    count: usize,
    padding: usize,
}

impl Pager {
    /// Creates a pager. A zero `limit` or `padding` resets to defaults.
    pub fn new(limit: usize, offset: usize, count: usize, padding: usize) -> Self {
        if limit == 0 || padding == 0 {
            return Self::default();
        }
        Self {
            limit,
            offset,
            count,
            padding,
        }
    }

    /// Creates a pager from textual input, as it arrives in a request.
    pub fn parse(limit: &str, offset: &str, count: &str, padding: &str) -> Self {
        let parse = |s: &str| s.trim().parse::<usize>().ok();
        match (parse(limit), parse(offset), parse(count), parse(padding)) {
            (Some(limit), Some(offset), Some(count), Some(padding)) => {
                Self::new(limit, offset, count, padding)
            }
            _ => Self::default(),
        }
    }

    /// Returns the number of rows per page.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Returns the offset of the current page's first row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the total number of rows.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the window size.
    pub fn padding(&self) -> usize {
        self.padding
    }

    /// Returns the total number of pages.
    pub fn page_count(&self) -> usize {
        self.count.div_ceil(self.limit)
    }

    /// Returns the 1-based number of the current page.
    pub fn current_page(&self) -> usize {
        (self.offset / self.limit).saturating_add(1)
    }

    /// Returns the (unselected) page with the given number.
    pub fn from_page_number(&self, number: usize) -> Page {
        Page {
            selected: false,
            number,
            limit: self.limit,
            offset: number.saturating_sub(1).saturating_mul(self.limit),
        }
    }

    /// Returns the window of pages to show.
    ///
    /// The window block is picked with `padding`, but its start is computed
    /// with a fixed multiplier of 10. For a padding other than 10 the current
    /// page may therefore fall outside the window. Page arithmetic saturates,
    /// so an offset near `usize::MAX` only ever yields page 1.
    pub fn pages(&self) -> Vec<Page> {
        let page_count = self.page_count();
        let current = self.current_page();
        let block = (current - 1) / self.padding;
        let start = block.saturating_mul(BLOCK_SIZE).saturating_add(1);
        let end = start.saturating_add(self.padding - 1).min(page_count);

        let mut numbers = vec![1];
        numbers.extend((start..=end).filter(|&n| n > 1 && n <= page_count));
        if numbers.last().is_some_and(|&last| last < page_count) {
            numbers.push(page_count);
        }

        numbers
            .into_iter()
            .map(|number| Page {
                selected: number == current,
                ..self.from_page_number(number)
            })
            .collect()
    }
}

impl Default for Pager {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
            count: 0,
            padding: DEFAULT_PADDING,
        }
    }
}
