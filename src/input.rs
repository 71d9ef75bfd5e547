//! Line oriented reader for a batch of test cases.
//!
//! ```text
//! T
//! N M
//! A 5        N lines: garrison label (A, B or -) and cost
//! 1 2        M lines: 1-based cities joined by a road
//! ```
//!
//! The `N M` block repeats `T` times. Blank lines are skipped.

use crate::error::InputError;
use crate::graph::{Garrison, Graph};
use std::io::{BufRead, Lines};
use std::str::{FromStr, SplitWhitespace};

#[derive(Debug, Clone)]
pub struct TestCase {
    /// 1-based position in the batch.
    pub number: usize,
    pub graph: Graph,
}

pub fn parse_input(reader: impl BufRead) -> Result<Vec<TestCase>, InputError> {
    Cases::new(reader)?.collect()
}

/// Reads test cases one at a time so each graph can be dropped after use.
pub struct Cases<R> {
    lines: NumberedLines<R>,
    total: usize,
    next: usize,
}

impl<R: BufRead> Cases<R> {
    pub fn new(reader: R) -> Result<Cases<R>, InputError> {
        let mut lines = NumberedLines {
            lines: reader.lines(),
            number: 0,
        };
        let header = lines.next_line("test case count")?;
        let mut fields = header.fields();
        let total = header.parse_field(&mut fields, "test case count")?;
        header.finish(fields)?;
        tracing::info!(cases = total, "reading test cases");
        Ok(Cases {
            lines,
            total,
            next: 1,
        })
    }

    /// Number of test cases announced by the header.
    pub fn total(&self) -> usize {
        self.total
    }

    fn read_case(&mut self) -> Result<TestCase, InputError> {
        let sizes = self.lines.next_line("city and road counts")?;
        let mut fields = sizes.fields();
        let cities: u32 = sizes.parse_field(&mut fields, "city count")?;
        let roads: usize = sizes.parse_field(&mut fields, "road count")?;
        sizes.finish(fields)?;
        tracing::debug!(case = self.next, cities, roads, "test case");

        let mut graph = Graph::new(cities as usize);
        for v in 0..cities {
            let line = self.lines.next_line("city description")?;
            let (garrison, cost) = line.city()?;
            graph.set_city(v, cost, garrison);
        }
        for _ in 0..roads {
            let line = self.lines.next_line("road")?;
            let mut fields = line.fields();
            let u = line.city_index(&mut fields, cities)?;
            let v = line.city_index(&mut fields, cities)?;
            line.finish(fields)?;
            graph.add_edge(u, v);
        }

        let case = TestCase {
            number: self.next,
            graph,
        };
        self.next += 1;
        Ok(case)
    }
}

impl<R: BufRead> Iterator for Cases<R> {
    type Item = Result<TestCase, InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.total {
            return None;
        }
        let case = self.read_case();
        if case.is_err() {
            // the rest of the stream cannot be trusted
            self.next = self.total + 1;
        }
        Some(case)
    }
}

struct NumberedLines<R> {
    lines: Lines<R>,
    number: usize,
}

impl<R: BufRead> NumberedLines<R> {
    fn next_line(&mut self, expected: &'static str) -> Result<Line, InputError> {
        for text in self.lines.by_ref() {
            let text = text?;
            self.number += 1;
            if !text.trim().is_empty() {
                return Ok(Line {
                    number: self.number,
                    text,
                });
            }
        }
        Err(InputError::UnexpectedEof { expected })
    }
}

struct Line {
    number: usize,
    text: String,
}

impl Line {
    fn fields(&self) -> SplitWhitespace<'_> {
        self.text.split_whitespace()
    }

    fn parse_field<T: FromStr>(
        &self,
        fields: &mut SplitWhitespace<'_>,
        field: &'static str,
    ) -> Result<T, InputError> {
        let value = fields.next().unwrap_or_default();
        value.parse().map_err(|_| InputError::InvalidNumber {
            line: self.number,
            field,
            value: value.to_string(),
        })
    }

    fn finish(&self, mut fields: SplitWhitespace<'_>) -> Result<(), InputError> {
        match fields.next() {
            None => Ok(()),
            Some(rest) => Err(InputError::TrailingInput {
                line: self.number,
                rest: rest.to_string(),
            }),
        }
    }

    /// A city line is `LABEL COST`, or just `COST` for a city without an army.
    fn city(&self) -> Result<(Garrison, u64), InputError> {
        let mut fields = self.fields();
        let garrison = match self.fields().count() {
            1 => Garrison::Unassigned,
            _ => {
                let label = fields.next().unwrap_or_default();
                Garrison::from_label(label).ok_or_else(|| InputError::InvalidGarrison {
                    line: self.number,
                    label: label.to_string(),
                })?
            }
        };
        let cost = self.parse_field(&mut fields, "city cost")?;
        self.finish(fields)?;
        Ok((garrison, cost))
    }

    /// Reads a 1-based city and returns its 0-based index.
    fn city_index(
        &self,
        fields: &mut SplitWhitespace<'_>,
        cities: u32,
    ) -> Result<u32, InputError> {
        let city: u64 = self.parse_field(fields, "city index")?;
        if city == 0 || city > u64::from(cities) {
            return Err(InputError::CityOutOfRange {
                line: self.number,
                city,
                cities,
            });
        }
        Ok((city - 1) as u32)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn parse(input: &str) -> Result<Vec<TestCase>, InputError> {
        parse_input(input.as_bytes())
    }

    #[test]
    fn reads_a_batch() {
        let cases = parse("2\n2 1\nA 5\nB 3\n1 2\n\n3 0\n- 1\n4\nA 0\n").unwrap();
        assert_eq!(cases.len(), 2);

        let first = &cases[0].graph;
        assert_eq!(cases[0].number, 1);
        assert_eq!(first.len(), 2);
        assert_eq!(first.garrison(0), Garrison::FactionA);
        assert_eq!(first.cost(1), 3);
        assert_eq!(first.neighbours(0), &[1]);

        let second = &cases[1].graph;
        assert_eq!(cases[1].number, 2);
        assert_eq!(second.garrison(0), Garrison::Unassigned);
        assert_eq!(second.cost(0), 1);
        assert_eq!(second.garrison(1), Garrison::Unassigned);
        assert_eq!(second.cost(1), 4);
        assert_eq!(second.garrison(2), Garrison::FactionA);
        assert_eq!(second.road_count(), 0);
    }

    #[test]
    fn empty_batch() {
        assert!(parse("0\n").unwrap().is_empty());
    }

    #[test]
    fn missing_lines() {
        let err = parse("1\n2 1\nA 5\nB 3\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::UnexpectedEof { expected: "road" }
        ));
        assert!(matches!(
            parse("").unwrap_err(),
            InputError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn bad_numbers() {
        let err = parse("1\n2 x\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::InvalidNumber { line: 2, field: "road count", .. }
        ));
        let err = parse("1\n1 0\nA -3\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::InvalidNumber { line: 3, field: "city cost", .. }
        ));
    }

    #[test]
    fn bad_label() {
        let err = parse("1\n1 0\nC 3\n").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 3: unknown garrison label \"C\" (expected A, B or -)"
        );
    }

    #[test]
    fn road_out_of_range() {
        let err = parse("1\n2 1\nA 1\nB 1\n1 3\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::CityOutOfRange { line: 5, city: 3, cities: 2 }
        ));
        let err = parse("1\n2 1\nA 1\nB 1\n0 1\n").unwrap_err();
        assert!(matches!(err, InputError::CityOutOfRange { city: 0, .. }));
    }

    #[test]
    fn oversized_city_count() {
        let err = parse("1\n18446744073709551615 0\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::InvalidNumber { line: 2, field: "city count", .. }
        ));
        let err = parse("1\n4294967296 0\n").unwrap_err();
        assert!(matches!(
            err,
            InputError::InvalidNumber { field: "city count", .. }
        ));
    }

    #[test]
    fn trailing_fields() {
        let err = parse("1\n2 1 7\n").unwrap_err();
        assert!(matches!(err, InputError::TrailingInput { line: 2, .. }));
    }

    #[test]
    fn streaming_stops_after_error() {
        let mut cases = Cases::new("2\n1 0\nQ 1\n1 0\nA 1\n".as_bytes()).unwrap();
        assert_eq!(cases.total(), 2);
        assert!(cases.next().unwrap().is_err());
        assert!(cases.next().is_none());
    }
}
