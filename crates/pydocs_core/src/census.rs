use crate::{Cell, Table};

pub const CENSUS_HEADER: [&str; 2] = ["Статус", "Количество"];
pub const TOTAL_LABEL: &str = "Total";

/// Running count of observed PEP statuses, kept in first-seen order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusCensus {
    counts: Vec<(String, u64)>,
    total: u64,
}

impl StatusCensus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status: &str) {
        match self.counts.iter_mut().find(|(label, _)| label == status) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((status.to_string(), 1)),
        }
        self.total += 1;
    }

    pub fn count(&self, status: &str) -> u64 {
        self.counts
            .iter()
            .find(|(label, _)| label == status)
            .map_or(0, |(_, count)| *count)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn statuses(&self) -> impl Iterator<Item = (&str, u64)> {
        self.counts.iter().map(|(label, count)| (label.as_str(), *count))
    }

    /// Header, one row per status, then the `Total` row.
    pub fn into_table(self) -> Table {
        let mut table = Table::new(CENSUS_HEADER);
        table.rows.extend(
            self.counts
                .into_iter()
                .map(|(label, count)| vec![Cell::Text(label), Cell::Count(count)]),
        );
        table
            .rows
            .push(vec![Cell::from(TOTAL_LABEL), Cell::Count(self.total)]);
        table
    }
}
