//src/types.rs

/// Separator between a rank prefix and the taxon name in `kraken-translate`
/// output, e.g. `d__Bacteria`.
pub const KRAKEN_SEPARATOR: &str = "__";

/// Marker in the first column of the untranslated kraken output for a
/// classified read.
pub const CLASSIFIED: char = 'C';

/// The principal classification ranks tracked per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RankLabel {
    Domain,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
    Subspecies,
}

impl RankLabel {
    pub const COUNT: usize = 8;

    /// All ranks, broadest first. Also the order of the output rows.
    pub const ALL: [RankLabel; RankLabel::COUNT] = [
        RankLabel::Domain,
        RankLabel::Phylum,
        RankLabel::Class,
        RankLabel::Order,
        RankLabel::Family,
        RankLabel::Genus,
        RankLabel::Species,
        RankLabel::Subspecies,
    ];

    /// Prefix preceding `__` in a translated rank token.
    pub fn prefix(self) -> &'static str {
        match self {
            RankLabel::Domain => "d",
            RankLabel::Phylum => "p",
            RankLabel::Class => "c",
            RankLabel::Order => "o",
            RankLabel::Family => "f",
            RankLabel::Genus => "g",
            RankLabel::Species => "s",
            RankLabel::Subspecies => "s1",
        }
    }

    /// Row label used in the rarefaction output.
    pub fn plural(self) -> &'static str {
        match self {
            RankLabel::Domain => "domains",
            RankLabel::Phylum => "phylums",
            RankLabel::Class => "classes",
            RankLabel::Order => "orders",
            RankLabel::Family => "families",
            RankLabel::Genus => "genera",
            RankLabel::Species => "species",
            RankLabel::Subspecies => "subspecies",
        }
    }

    /// Position of this rank in [`RankLabel::ALL`].
    pub fn index(self) -> usize {
        self as usize
    }

    /// Classify a token such as `s__Prevotella_enoeca` by its prefix.
    ///
    /// Returns `None` for tokens without a recognised `<prefix>__` head.
    /// `s1__x` is a subspecies, never a species.
    pub fn of_token(token: &str) -> Option<RankLabel> {
        let (prefix, _name) = token.split_once(KRAKEN_SEPARATOR)?;
        match prefix {
            "d" => Some(RankLabel::Domain),
            "p" => Some(RankLabel::Phylum),
            "c" => Some(RankLabel::Class),
            "o" => Some(RankLabel::Order),
            "f" => Some(RankLabel::Family),
            "g" => Some(RankLabel::Genus),
            "s" => Some(RankLabel::Species),
            "s1" => Some(RankLabel::Subspecies),
            _ => None,
        }
    }
}

/// One read, as seen by the rarefaction pass.
///
/// Built by [`crate::reader::PairedRecordReader`] from one untranslated
/// line and, when classified, the matching translated line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadRecord {
    /// 1-based line number in the untranslated stream.
    pub line: u64,
    /// Read identifier from the translated line (classified reads only).
    pub read_id: Option<String>,
    /// Lineage tokens, present iff the read is classified.
    pub rank_path: Option<Vec<String>>,
}

impl ReadRecord {
    pub fn unclassified(line: u64) -> Self {
        Self {
            line,
            read_id: None,
            rank_path: None,
        }
    }

    pub fn classified(line: u64, read_id: String, rank_path: Vec<String>) -> Self {
        Self {
            line,
            read_id: Some(read_id),
            rank_path: Some(rank_path),
        }
    }

    pub fn is_classified(&self) -> bool {
        self.rank_path.is_some()
    }
}

/// Split a `kraken-translate` lineage on `|`.
pub fn parse_rank_path(classification: &str) -> Vec<String> {
    classification
        .trim()
        .split('|')
        .map(|rank| rank.to_string())
        .collect()
}
