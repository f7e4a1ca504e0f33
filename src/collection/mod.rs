//! Client-side search, filter, sort and pagination over a fully fetched list.
//!
//! A [`CollectionView`] owns the full item list plus the view inputs and
//! recomputes the filtered, sorted sequence synchronously on every change.
//! What "matches" and how items order is supplied per entity by a
//! [`ViewSpec`].

pub mod entities;

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

pub use entities::*;

pub const PAGE_SIZE: usize = 10;

/// Width of the page-number strip shown under a table.
const PAGE_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Per-entity view definition.
pub trait ViewSpec {
    type Item: Clone;
    /// All categorical filters of the page. `Default` means "no filter".
    type Filter: Clone + Default;
    type SortKey: Copy + PartialEq;

    /// `term` is non-empty and already lowercased.
    fn matches_search(&self, item: &Self::Item, term: &str) -> bool;
    fn matches_filter(&self, item: &Self::Item, filter: &Self::Filter) -> bool;
    fn compare(&self, a: &Self::Item, b: &Self::Item, key: Self::SortKey) -> Ordering;
}

/// One page of the filtered, sorted collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSlice<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

pub struct CollectionView<S: ViewSpec> {
    spec: S,
    items: Vec<S::Item>,
    search_term: String,
    filter: S::Filter,
    sort: Option<(S::SortKey, SortDirection)>,
    page: usize,
    filtered: Vec<S::Item>,
}

impl<S: ViewSpec> CollectionView<S> {
    pub fn new(spec: S) -> Self {
        Self {
            spec,
            items: Vec::new(),
            search_term: String::new(),
            filter: S::Filter::default(),
            sort: None,
            page: 1,
            filtered: Vec::new(),
        }
    }

    pub fn with_sort(mut self, key: S::SortKey, direction: SortDirection) -> Self {
        self.sort = Some((key, direction));
        self.refresh();
        self
    }

    pub fn spec(&self) -> &S {
        &self.spec
    }

    pub fn spec_mut(&mut self) -> &mut S {
        &mut self.spec
    }

    /// Replaces the full collection. View inputs are kept.
    pub fn set_items(&mut self, items: Vec<S::Item>) {
        self.items = items;
        self.refresh();
    }

    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    /// Applies `update` to every item matching `predicate`; returns how many.
    pub fn update_where(&mut self, predicate: impl Fn(&S::Item) -> bool, mut update: impl FnMut(&mut S::Item)) -> usize {
        let mut touched = 0;
        for item in self.items.iter_mut().filter(|item| predicate(item)) {
            update(item);
            touched += 1;
        }
        if touched > 0 {
            self.refresh();
        }
        touched
    }

    pub fn remove_where(&mut self, predicate: impl Fn(&S::Item) -> bool) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !predicate(item));
        let removed = before - self.items.len();
        if removed > 0 {
            self.refresh();
        }
        removed
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
        self.refresh();
    }

    pub fn filter(&self) -> &S::Filter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: S::Filter) {
        self.filter = filter;
        self.page = 1;
        self.refresh();
    }

    pub fn update_filter(&mut self, change: impl FnOnce(&mut S::Filter)) {
        change(&mut self.filter);
        self.page = 1;
        self.refresh();
    }

    pub fn sort(&self) -> Option<(S::SortKey, SortDirection)> {
        self.sort
    }

    /// Same key flips the direction; a new key sorts ascending.
    pub fn sort_by(&mut self, key: S::SortKey) {
        self.sort = match self.sort {
            Some((current, direction)) if current == key => Some((key, direction.flipped())),
            _ => Some((key, SortDirection::Asc)),
        };
        self.refresh();
    }

    pub fn page(&self) -> usize {
        self.page
    }

    /// Ignored unless `1 <= page <= total_pages`.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page >= 1 && page <= self.total_pages() {
            self.page = page;
            true
        } else {
            false
        }
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.page + 1)
    }

    pub fn previous_page(&mut self) -> bool {
        self.page > 1 && self.go_to_page(self.page - 1)
    }

    pub fn total_pages(&self) -> usize {
        self.filtered.len().div_ceil(PAGE_SIZE)
    }

    pub fn filtered(&self) -> &[S::Item] {
        &self.filtered
    }

    pub fn page_items(&self) -> &[S::Item] {
        let start = (self.page - 1) * PAGE_SIZE;
        if start >= self.filtered.len() {
            return &[];
        }
        let end = (start + PAGE_SIZE).min(self.filtered.len());
        &self.filtered[start..end]
    }

    pub fn page_slice(&self) -> PageSlice<S::Item> {
        PageSlice {
            items: self.page_items().to_vec(),
            page: self.page,
            total_pages: self.total_pages(),
            total_items: self.filtered.len(),
        }
    }

    /// At most five page numbers, centred on the current page where possible.
    pub fn page_numbers(&self) -> Vec<usize> {
        let total = self.total_pages();
        if total == 0 {
            return Vec::new();
        }
        let half = PAGE_WINDOW / 2;
        let mut start = self.page.saturating_sub(half).max(1);
        let end = (start + PAGE_WINDOW - 1).min(total);
        if end + 1 - start < PAGE_WINDOW {
            start = end.saturating_sub(PAGE_WINDOW - 1).max(1);
        }
        (start..=end).collect()
    }

    /// Recomputes the filtered sequence and clamps the page into range.
    /// The search term is matched as typed, surrounding whitespace included.
    pub fn refresh(&mut self) {
        let term = self.search_term.to_lowercase();
        let mut filtered: Vec<S::Item> = self
            .items
            .iter()
            .filter(|item| term.is_empty() || self.spec.matches_search(item, &term))
            .filter(|item| self.spec.matches_filter(item, &self.filter))
            .cloned()
            .collect();

        if let Some((key, direction)) = self.sort {
            filtered.sort_by(|a, b| self.spec.compare(a, b, key));
            if direction == SortDirection::Desc {
                filtered.reverse();
            }
        }

        self.filtered = filtered;
        self.page = self.page.min(self.total_pages()).max(1);
    }
}

/// Case-insensitive ordering by Unicode code point, not locale collation:
/// accented letters sort after `z`. Ties fall back to the exact text.
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

pub fn compare_number(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Missing timestamps sort as the epoch.
pub fn compare_time(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> Ordering {
    let millis = |t: Option<DateTime<Utc>>| t.map(|t| t.timestamp_millis()).unwrap_or(0);
    millis(a).cmp(&millis(b))
}

pub fn contains_term(haystack: &str, term: &str) -> bool {
    haystack.to_lowercase().contains(term)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Row {
        name: String,
        group: u8,
    }

    #[derive(Clone, Copy, PartialEq, Debug)]
    enum RowKey {
        Name,
        Group,
    }

    struct RowSpec;

    impl ViewSpec for RowSpec {
        type Item = Row;
        type Filter = Option<u8>;
        type SortKey = RowKey;

        fn matches_search(&self, item: &Row, term: &str) -> bool {
            contains_term(&item.name, term)
        }

        fn matches_filter(&self, item: &Row, filter: &Option<u8>) -> bool {
            filter.map_or(true, |group| item.group == group)
        }

        fn compare(&self, a: &Row, b: &Row, key: RowKey) -> Ordering {
            match key {
                RowKey::Name => compare_text(&a.name, &b.name),
                RowKey::Group => a.group.cmp(&b.group),
            }
        }
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row {
                name: format!("row {:02}", i),
                group: (i % 3) as u8,
            })
            .collect()
    }

    fn view(n: usize) -> CollectionView<RowSpec> {
        let mut view = CollectionView::new(RowSpec);
        view.set_items(rows(n));
        view
    }

    #[test]
    fn test_pages_partition_the_filtered_set() {
        let mut view = view(23);
        assert_eq!(view.total_pages(), 3);

        let mut seen = Vec::new();
        for page in 1..=view.total_pages() {
            assert!(view.go_to_page(page));
            seen.extend(view.page_items().iter().cloned());
        }
        assert_eq!(seen, view.filtered().to_vec());
        assert_eq!(view.page_items().len(), 3);
    }

    #[test]
    fn test_go_to_page_rejects_out_of_range() {
        let mut view = view(15);
        assert!(!view.go_to_page(0));
        assert!(!view.go_to_page(3));
        assert_eq!(view.page(), 1);
        assert!(view.next_page());
        assert!(!view.next_page());
        assert!(view.previous_page());
        assert!(!view.previous_page());
    }

    #[test]
    fn test_search_and_filter_reset_page() {
        let mut view = view(40);
        view.go_to_page(3);
        view.set_search_term("ROW 1");
        assert_eq!(view.page(), 1);
        assert_eq!(view.filtered().len(), 10);

        view.go_to_page(1);
        view.set_filter(Some(0));
        assert_eq!(view.page(), 1);
        assert!(view.filtered().iter().all(|r| r.group == 0 && r.name.starts_with("row 1")));
    }

    #[test]
    fn test_search_term_is_not_trimmed() {
        let mut view = view(12);
        view.items[3].name = "row03".into();
        view.refresh();

        view.set_search_term(" ");
        assert_eq!(view.filtered().len(), 11);
        assert!(view.filtered().iter().all(|r| r.name != "row03"));

        view.set_search_term(" row 1");
        assert!(view.filtered().is_empty());

        view.set_search_term("");
        assert_eq!(view.filtered().len(), 12);
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let mut view = view(30);
        view.set_search_term("2");
        view.set_filter(Some(2));
        let once = view.filtered().to_vec();
        view.refresh();
        view.set_search_term("2");
        assert_eq!(view.filtered(), once.as_slice());
    }

    #[test]
    fn test_sort_toggle_reverses() {
        let mut view = view(12);
        view.sort_by(RowKey::Name);
        let ascending = view.filtered().to_vec();
        view.sort_by(RowKey::Name);
        assert_eq!(view.sort(), Some((RowKey::Name, SortDirection::Desc)));
        let mut expected = ascending.clone();
        expected.reverse();
        assert_eq!(view.filtered(), expected.as_slice());

        view.sort_by(RowKey::Group);
        assert_eq!(view.sort(), Some((RowKey::Group, SortDirection::Asc)));
    }

    #[test]
    fn test_page_clamped_when_collection_shrinks() {
        let mut view = view(35);
        view.go_to_page(4);
        view.set_items(rows(12));
        assert_eq!(view.page(), 2);
        view.set_items(Vec::new());
        assert_eq!(view.page(), 1);
        assert_eq!(view.total_pages(), 0);
        assert!(view.page_items().is_empty());
        assert!(view.page_numbers().is_empty());
    }

    #[test]
    fn test_page_numbers_window() {
        let mut view = view(95);
        assert_eq!(view.page_numbers(), vec![1, 2, 3, 4, 5]);
        view.go_to_page(6);
        assert_eq!(view.page_numbers(), vec![4, 5, 6, 7, 8]);
        view.go_to_page(10);
        assert_eq!(view.page_numbers(), vec![6, 7, 8, 9, 10]);

        let small = self::view(25);
        assert_eq!(small.page_numbers(), vec![1, 2, 3]);
    }

    #[test]
    fn test_compare_helpers() {
        assert_eq!(compare_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_text("Zoe", "Émile"), Ordering::Less);
        assert_eq!(compare_text("abc", "ABC"), Ordering::Greater);
        assert_eq!(compare_time(None, Some(Utc::now())), Ordering::Less);
        assert_eq!(compare_number(2.5, 2.5), Ordering::Equal);
    }
}
