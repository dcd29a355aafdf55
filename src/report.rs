//src/report.rs

use std::io;

use crate::tally::RankTally;
use crate::types::RankLabel;

/// Final rarefaction data: one column per sample, increasing rate.
///
/// Rows, in output order: `rates`, `reads`, then one distinct-taxa row per
/// rank from domains down to subspecies.
#[derive(Debug, Clone, PartialEq)]
pub struct RarefactionTable {
    pub rates: Vec<f64>,
    pub reads: Vec<u64>,
    /// Indexed by [`RankLabel::index`].
    pub distinct: [Vec<usize>; RankLabel::COUNT],
}

impl RarefactionTable {
    pub fn from_samples(samples: &[RankTally]) -> Self {
        let mut distinct: [Vec<usize>; RankLabel::COUNT] = Default::default();
        for rank in RankLabel::ALL {
            distinct[rank.index()] = samples.iter().map(|s| s.distinct_count(rank)).collect();
        }

        Self {
            rates: samples.iter().map(|s| s.rate()).collect(),
            reads: samples.iter().map(|s| s.read_count()).collect(),
            distinct,
        }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn distinct(&self, rank: RankLabel) -> &[usize] {
        &self.distinct[rank.index()]
    }

    /// Generate the CSV text on demand.
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        // Debug keeps the decimal point on whole rates ("1.0", not "1")
        write_row(&mut output, "rates", self.rates.iter().map(|r| format!("{:?}", r)));
        write_row(&mut output, "reads", self.reads.iter().map(|n| n.to_string()));
        for rank in RankLabel::ALL {
            write_row(
                &mut output,
                rank.plural(),
                self.distinct(rank).iter().map(|n| n.to_string()),
            );
        }
        output
    }

    pub fn write_csv<W: io::Write>(&self, mut out: W) -> io::Result<()> {
        out.write_all(self.to_csv().as_bytes())?;
        out.flush()
    }
}

fn write_row<I: Iterator<Item = String>>(output: &mut String, label: &str, values: I) {
    output.push_str(label);
    for value in values {
        output.push(',');
        output.push_str(&value);
    }
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_csv_layout() {
        let mut half = RankTally::new(0.5);
        let mut full = RankTally::new(1.0);
        let r1 = path(&["d__Bacteria", "p__Firmicutes"]);
        let r3 = path(&["d__Bacteria", "s__X"]);

        half.include(Some(&r1));
        half.include(Some(&r3));
        full.include(Some(&r1));
        full.include(None);
        full.include(Some(&r3));

        let table = RarefactionTable::from_samples(&[half, full]);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.to_csv(),
            "rates,0.5,1.0\n\
             reads,2,3\n\
             domains,1,1\n\
             phylums,1,1\n\
             classes,0,0\n\
             orders,0,0\n\
             families,0,0\n\
             genera,0,0\n\
             species,1,1\n\
             subspecies,0,0\n"
        );
    }

    #[test]
    fn test_write_csv_matches_to_csv() {
        let mut sample = RankTally::new(1.0);
        sample.include(Some(&path(&["d__Archaea", "s1__strain"])));
        let table = RarefactionTable::from_samples(&[sample]);

        let mut buf = Vec::new();
        table.write_csv(&mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), table.to_csv());
        assert_eq!(table.distinct(RankLabel::Subspecies), &[1]);
        assert_eq!(table.distinct(RankLabel::Species), &[0]);
    }

    #[test]
    fn test_rows_follow_sample_order() {
        let samples: Vec<_> = [0.25, 0.5, 0.75, 1.0]
            .iter()
            .map(|&rate| RankTally::new(rate))
            .collect();
        let table = RarefactionTable::from_samples(&samples);
        let first_line = table.to_csv().lines().next().unwrap().to_string();
        assert_eq!(first_line, "rates,0.25,0.5,0.75,1.0");
    }
}
