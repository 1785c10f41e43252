//! Rolling window of the latest quotes.

use model::TickHistory;
use rust_decimal::Decimal;

/// Fixed-capacity window of recent quotes, newest first.
#[derive(Debug, Clone)]
pub struct TickWindow {
    quotes: Vec<Decimal>,
    capacity: usize,
}

impl TickWindow {
    pub fn new(capacity: usize) -> Self {
        Self {
            quotes: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Replace the window contents with the newest `capacity` quotes of a
    /// history block.
    pub fn seed_from_history(&mut self, history: &TickHistory) {
        self.quotes = history
            .prices
            .iter()
            .rev() // history runs oldest to newest
            .take(self.capacity)
            .copied()
            .collect();
    }

    /// Push a live quote to the front, dropping the oldest past capacity.
    pub fn push(&mut self, quote: Decimal) {
        self.quotes.insert(0, quote);
        self.quotes.truncate(self.capacity);
    }

    /// The most recent quote.
    pub fn latest(&self) -> Option<Decimal> {
        self.quotes.first().copied()
    }

    /// Quotes newest first.
    pub fn quotes(&self) -> &[Decimal] {
        &self.quotes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }

    pub fn clear(&mut self) {
        self.quotes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_push_keeps_newest_first_and_caps() {
        let mut window = TickWindow::new(3);

        window.push(dec!(1));
        window.push(dec!(2));
        window.push(dec!(3));
        window.push(dec!(4));

        assert_eq!(window.quotes(), &[dec!(4), dec!(3), dec!(2)]);
        assert_eq!(window.latest(), Some(dec!(4)));
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_seed_takes_newest_quotes() {
        let mut window = TickWindow::new(3);
        let history = TickHistory {
            prices: vec![dec!(10), dec!(11), dec!(12), dec!(13), dec!(14)],
            times: vec![1, 2, 3, 4, 5],
        };

        window.seed_from_history(&history);

        assert_eq!(window.quotes(), &[dec!(14), dec!(13), dec!(12)]);
        assert_eq!(window.latest(), Some(dec!(14)));
    }

    #[test]
    fn test_seed_replaces_previous_contents() {
        let mut window = TickWindow::new(3);
        window.push(dec!(999));

        window.seed_from_history(&TickHistory {
            prices: vec![dec!(1)],
            times: vec![1],
        });

        assert_eq!(window.quotes(), &[dec!(1)]);
    }

    #[test]
    fn test_empty_window() {
        let window = TickWindow::new(3);
        assert!(window.is_empty());
        assert_eq!(window.latest(), None);
    }
}
