use std::sync::Arc;

use super::alphabet::Alphabet;

/// A run of `length` consecutive positions drawn from one alphabet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub alphabet: Alphabet,
    pub length: usize,
}

impl Segment {
    pub fn new(alphabet: Alphabet, length: usize) -> Self {
        Self { alphabet, length }
    }
}

/// Mixed-radix counter over one or more segments.
///
/// Every position is a wheel over its segment's alphabet. The rightmost wheel
/// turns fastest and the leftmost slowest, so the sequence is the
/// lexicographic product of the segments in wheel order. For
/// `[lowercase × 2, digits × 1]` the 0-based index of a candidate is
/// `(c0 · 26 + c1) · 10 + c2`; `"ab3"` is index 13.
///
/// The generator is forward-only. Enumerating the same space again requires a
/// new `Odometer`, which reproduces the identical sequence.
#[derive(Debug, Clone)]
pub struct Odometer {
    wheels: Vec<Arc<[char]>>,
    digits: Vec<usize>,
    remaining: u64,
}

impl Odometer {
    pub fn new(segments: &[Segment]) -> Self {
        let wheels: Vec<Arc<[char]>> = segments
            .iter()
            .flat_map(|segment| {
                std::iter::repeat_n(segment.alphabet.shared_symbols(), segment.length)
            })
            .collect();

        Self {
            digits: vec![0; wheels.len()],
            remaining: Self::total(segments).unwrap_or(u64::MAX),
            wheels,
        }
    }

    /// Number of candidates in the space, or `None` if it does not fit in a `u64`.
    pub fn total(segments: &[Segment]) -> Option<u64> {
        segments.iter().try_fold(1u64, |acc, segment| {
            let length = u32::try_from(segment.length).ok()?;
            let size = segment.alphabet.len() as u64;
            acc.checked_mul(size.checked_pow(length)?)
        })
    }

    /// Position of `candidate` in the sequence `Odometer::new(segments)` yields.
    pub fn index_of(segments: &[Segment], candidate: &str) -> Option<u64> {
        let mut symbols = candidate.chars();
        let mut index = 0u64;

        for segment in segments {
            let radix = segment.alphabet.len() as u64;
            for _ in 0..segment.length {
                let digit = segment.alphabet.position(symbols.next()?)? as u64;
                index = index.checked_mul(radix)?.checked_add(digit)?;
            }
        }

        // Candidate longer than the shape
        if symbols.next().is_some() {
            return None;
        }
        Some(index)
    }

    /// Candidates not yet yielded.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    fn current(&self) -> String {
        self.digits
            .iter()
            .zip(&self.wheels)
            .map(|(&digit, wheel)| wheel[digit])
            .collect()
    }

    fn advance(&mut self) {
        for (digit, wheel) in self.digits.iter_mut().zip(&self.wheels).rev() {
            *digit += 1;
            if *digit < wheel.len() {
                return;
            }
            *digit = 0;
        }
    }
}

impl Iterator for Odometer {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.remaining == 0 {
            return None;
        }

        let candidate = self.current();
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(candidate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn letters_then_digits(letters: usize, digits: usize) -> Vec<Segment> {
        vec![
            Segment::new(Alphabet::lowercase(), letters),
            Segment::new(Alphabet::digits(), digits),
        ]
    }

    #[test]
    fn test_count_matches_product_of_radices() {
        let segments = letters_then_digits(2, 2);
        let candidates: Vec<String> = Odometer::new(&segments).collect();

        assert_eq!(Odometer::total(&segments), Some(26 * 26 * 100));
        assert_eq!(candidates.len(), 26 * 26 * 100);

        let distinct: HashSet<&String> = candidates.iter().collect();
        assert_eq!(distinct.len(), candidates.len());
    }

    #[test]
    fn test_leftmost_position_varies_slowest() {
        let segments = letters_then_digits(2, 1);
        let first: Vec<String> = Odometer::new(&segments).take(12).collect();

        assert_eq!(first[0], "aa0");
        assert_eq!(first[9], "aa9");
        assert_eq!(first[10], "ab0");
        assert_eq!(first[11], "ab1");
        assert_eq!(Odometer::new(&segments).last().as_deref(), Some("zz9"));
    }

    #[test]
    fn test_documented_index_of_worked_example() {
        let segments = letters_then_digits(2, 1);

        assert_eq!(Odometer::index_of(&segments, "ab3"), Some(13));
        assert_eq!(
            Odometer::new(&segments).nth(13).as_deref(),
            Some("ab3")
        );
    }

    #[test]
    fn test_index_of_rejects_foreign_candidates() {
        let segments = letters_then_digits(2, 1);

        assert_eq!(Odometer::index_of(&segments, "a13"), None);
        assert_eq!(Odometer::index_of(&segments, "ab"), None);
        assert_eq!(Odometer::index_of(&segments, "ab34"), None);
        assert_eq!(Odometer::index_of(&segments, "AB3"), None);
    }

    #[test]
    fn test_index_of_agrees_with_enumeration() {
        let segments = vec![
            Segment::new(Alphabet::digits(), 1),
            Segment::new(Alphabet::custom("xyz").unwrap(), 2),
        ];

        for (expected, candidate) in Odometer::new(&segments).enumerate() {
            assert_eq!(Odometer::index_of(&segments, &candidate), Some(expected as u64));
        }
    }

    #[test]
    fn test_repeated_construction_is_deterministic() {
        let segments = vec![Segment::new(Alphabet::alphanumeric(), 2)];
        let first: Vec<String> = Odometer::new(&segments).collect();
        let second: Vec<String> = Odometer::new(&segments).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_size_hint_is_exact_while_consuming() {
        let segments = letters_then_digits(1, 1);
        let mut odometer = Odometer::new(&segments);
        assert_eq!(odometer.size_hint(), (260, Some(260)));

        odometer.next();
        odometer.next();
        assert_eq!(odometer.size_hint(), (258, Some(258)));
        assert_eq!(odometer.remaining(), 258);
    }

    #[test]
    fn test_total_reports_overflow() {
        let segments = vec![Segment::new(Alphabet::alphanumeric(), 40)];
        assert_eq!(Odometer::total(&segments), None);
    }
}
