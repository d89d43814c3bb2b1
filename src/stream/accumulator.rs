//! Delta accumulation
//!
//! Collects the text fragments of a decoded stream in arrival order while
//! keeping malformed frames aside as warnings.

use super::error::FrameError;
use super::frame::{FrameResult, StreamEvent, Usage};

/// Fragments, warnings and usage of one stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Accumulator {
    fragments: Vec<String>,
    warnings: Vec<FrameError>,
    usage: Option<Usage>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one decoded item, returning the fragment it added if any
    pub fn record(&mut self, item: FrameResult) -> Option<&str> {
        match item {
            Ok(StreamEvent::Delta(fragment)) => {
                self.fragments.push(fragment);
                self.fragments.last().map(String::as_str)
            }
            Ok(StreamEvent::Usage(usage)) => {
                self.usage = Some(usage);
                None
            }
            Err(warning) => {
                self.warnings.push(warning);
                None
            }
        }
    }

    /// Fragments in arrival order
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Concatenation of all fragments
    pub fn text(&self) -> String {
        self.fragments.concat()
    }

    pub fn warnings(&self) -> &[FrameError] {
        &self.warnings
    }

    /// Usage reported by the stream, if it sent any
    pub fn usage(&self) -> Option<Usage> {
        self.usage
    }

    pub fn into_text(self) -> String {
        self.fragments.concat()
    }

    /// Lazily record `items`, yielding each fragment as it arrives
    ///
    /// ```rust
    /// use tmdl_er_sdk::stream::{Accumulator, StreamEvent};
    ///
    /// let mut accumulator = Accumulator::new();
    /// let items = vec![
    ///     Ok(StreamEvent::Delta("Hel".to_string())),
    ///     Ok(StreamEvent::Delta("lo".to_string())),
    /// ];
    /// let shown: Vec<String> = accumulator.consume(items).collect();
    ///
    /// assert_eq!(shown, ["Hel", "lo"]);
    /// assert_eq!(accumulator.text(), "Hello");
    /// ```
    pub fn consume<I>(&mut self, items: I) -> Accumulating<'_, I::IntoIter>
    where
        I: IntoIterator<Item = FrameResult>,
    {
        Accumulating {
            accumulator: self,
            items: items.into_iter(),
        }
    }
}

/// Iterator returned by [`Accumulator::consume`]
#[derive(Debug)]
pub struct Accumulating<'a, I> {
    accumulator: &'a mut Accumulator,
    items: I,
}

impl<I> Iterator for Accumulating<'_, I>
where
    I: Iterator<Item = FrameResult>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for item in self.items.by_ref() {
            if let Some(fragment) = self.accumulator.record(item) {
                return Some(fragment.to_string());
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_keeps_order_and_warnings() {
        let mut accumulator = Accumulator::new();
        assert_eq!(
            accumulator.record(Ok(StreamEvent::Delta("a".to_string()))),
            Some("a")
        );
        assert_eq!(
            accumulator.record(Err(FrameError::InvalidUtf8 { len: 3 })),
            None
        );
        accumulator.record(Ok(StreamEvent::Delta(String::new())));
        accumulator.record(Ok(StreamEvent::Delta("b".to_string())));

        assert_eq!(accumulator.fragments(), ["a", "", "b"]);
        assert_eq!(accumulator.text(), "ab");
        assert_eq!(accumulator.warnings().len(), 1);
        assert_eq!(accumulator.usage(), None);
    }

    #[test]
    fn test_usage_is_kept() {
        let mut accumulator = Accumulator::new();
        let usage = Usage {
            prompt_tokens: 1,
            completion_tokens: 2,
            total_tokens: 3,
        };
        accumulator.record(Ok(StreamEvent::Usage(usage)));
        assert_eq!(accumulator.usage(), Some(usage));
        assert!(accumulator.fragments().is_empty());
    }

    #[test]
    fn test_consume_is_lazy() {
        let mut accumulator = Accumulator::new();
        let items = vec![
            Ok(StreamEvent::Delta("x".to_string())),
            Err(FrameError::InvalidUtf8 { len: 1 }),
            Ok(StreamEvent::Delta("y".to_string())),
        ];
        let mut fragments = accumulator.consume(items);
        assert_eq!(fragments.next().as_deref(), Some("x"));
        drop(fragments);

        assert_eq!(accumulator.text(), "x");
        assert!(accumulator.warnings().is_empty());
    }
}
