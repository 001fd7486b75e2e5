//! Paging post processor.

use once_cell::sync::OnceCell;

use crate::grid::GridContext;
use crate::processor::{ProcessorType, RowProcessor};
use crate::rows::Rows;

/// Keeps one page of rows.
///
/// The current page comes from the `{grid}-Page` query key (1-based) on first
/// use and is frozen after that. Missing, zero or unparseable pages mean page
/// one. A `rows_per_page` of zero disables paging.
#[derive(Debug, Default)]
pub struct Pager {
    rows_per_page: usize,
    current_page: OnceCell<usize>,
}

impl Pager {
    pub fn new(rows_per_page: usize) -> Self {
        Pager {
            rows_per_page,
            current_page: OnceCell::new(),
        }
    }

    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// The 1-based page to show.
    pub fn current_page(&self, ctx: &GridContext<'_>) -> usize {
        *self.current_page.get_or_init(|| {
            let key = format!("{}-Page", ctx.name());
            ctx.query()
                .get(&key)
                .and_then(|page| page.trim().parse::<usize>().ok())
                .filter(|page| *page > 0)
                .unwrap_or(1)
        })
    }

    /// Sets the page, bypassing and freezing query resolution. Zero means
    /// page one.
    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = OnceCell::with_value(page.max(1));
    }

    /// Number of pages needed for `total_rows`. Always at least one.
    pub fn page_count(&self, total_rows: usize) -> usize {
        if self.rows_per_page == 0 {
            return 1;
        }
        total_rows.div_ceil(self.rows_per_page).max(1)
    }
}

impl<T> RowProcessor<T> for Pager {
    fn processor_type(&self) -> ProcessorType {
        ProcessorType::Post
    }

    fn process<'a>(&self, rows: Rows<'a, T>, ctx: &GridContext<'_>) -> Rows<'a, T> {
        if self.rows_per_page == 0 {
            return rows;
        }

        let page = self.current_page(ctx);
        let skip = (page - 1).saturating_mul(self.rows_per_page);
        tracing::trace!(
            grid = ctx.name(),
            page,
            rows_per_page = self.rows_per_page,
            total = rows.len(),
            "page pass"
        );
        rows.slice(skip, self.rows_per_page)
    }
}
