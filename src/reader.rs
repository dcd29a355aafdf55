//src/reader.rs

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;

use crate::error::{RarefactionError, Result, Stream};
use crate::types::{parse_rank_path, ReadRecord, CLASSIFIED};

/// Open a kraken output file, transparently decompressing `.gz`.
pub fn open_kraken_stream(path: &Path, stream: Stream) -> Result<Box<dyn BufRead>> {
    if !path.is_file() {
        return Err(RarefactionError::InputNotFound {
            stream,
            path: path.to_path_buf(),
        });
    }

    let f = File::open(path).map_err(|source| RarefactionError::Io {
        stream,
        path: path.to_path_buf(),
        source,
    })?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let reader: Box<dyn BufRead> = if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    Ok(reader)
}

/// Walks the untranslated and translated kraken outputs in lockstep.
///
/// Every untranslated line yields one [`ReadRecord`]. The translated stream
/// advances exactly once per classified (`C`) line and never otherwise, so
/// the two can only drift apart through bad input, which is reported as
/// [`RarefactionError::StreamDesync`].
pub struct PairedRecordReader<U: BufRead, T: BufRead> {
    untranslated: U,
    translated: T,
    untranslated_path: PathBuf,
    translated_path: PathBuf,
    /// Untranslated lines consumed so far.
    line: u64,
    /// Translated lines consumed so far.
    translated_line: u64,
    untranslated_buf: String,
    translated_buf: String,
    failed: bool,
}

impl PairedRecordReader<Box<dyn BufRead>, Box<dyn BufRead>> {
    /// Open both files. Fails with `InputNotFound` before reading anything
    /// if either is missing.
    pub fn open<P: AsRef<Path>, Q: AsRef<Path>>(untranslated: P, translated: Q) -> Result<Self> {
        let untranslated = untranslated.as_ref();
        let translated = translated.as_ref();

        let u = open_kraken_stream(untranslated, Stream::Untranslated)?;
        let t = open_kraken_stream(translated, Stream::Translated)?;

        let mut reader = Self::new(u, t);
        reader.untranslated_path = untranslated.to_path_buf();
        reader.translated_path = translated.to_path_buf();
        Ok(reader)
    }
}

impl<U: BufRead, T: BufRead> PairedRecordReader<U, T> {
    pub fn new(untranslated: U, translated: T) -> Self {
        Self {
            untranslated,
            translated,
            untranslated_path: PathBuf::new(),
            translated_path: PathBuf::new(),
            line: 0,
            translated_line: 0,
            untranslated_buf: String::new(),
            translated_buf: String::new(),
            failed: false,
        }
    }

    /// Untranslated lines read so far.
    pub fn lines_read(&self) -> u64 {
        self.line
    }

    /// Translated lines read so far.
    pub fn translations_read(&self) -> u64 {
        self.translated_line
    }

    /// Read the next record, or `None` once the untranslated stream ends.
    pub fn next_record(&mut self) -> Result<Option<ReadRecord>> {
        self.untranslated_buf.clear();
        let n = self
            .untranslated
            .read_line(&mut self.untranslated_buf)
            .map_err(|source| RarefactionError::Io {
                stream: Stream::Untranslated,
                path: self.untranslated_path.clone(),
                source,
            })?;
        if n == 0 {
            return Ok(None);
        }
        self.line += 1;

        if !self.untranslated_buf.starts_with(CLASSIFIED) {
            return Ok(Some(ReadRecord::unclassified(self.line)));
        }

        // Classified: the translation is the next translated line.
        self.translated_buf.clear();
        let n = self
            .translated
            .read_line(&mut self.translated_buf)
            .map_err(|source| RarefactionError::Io {
                stream: Stream::Translated,
                path: self.translated_path.clone(),
                source,
            })?;
        if n == 0 {
            return Err(RarefactionError::StreamDesync {
                line: self.line,
                detail: format!(
                    "translated stream exhausted after {} lines",
                    self.translated_line
                ),
            });
        }
        self.translated_line += 1;

        let mut tokens = self.translated_buf.split_whitespace();
        let (read_id, classification) = match (tokens.next(), tokens.next()) {
            (Some(read_id), Some(classification)) => (read_id, classification),
            _ => {
                return Err(RarefactionError::StreamDesync {
                    line: self.line,
                    detail: format!(
                        "translated line {} has no classification: {:?}",
                        self.translated_line,
                        self.translated_buf.trim_end()
                    ),
                })
            }
        };

        Ok(Some(ReadRecord::classified(
            self.line,
            read_id.to_string(),
            parse_rank_path(classification),
        )))
    }

    /// Count non-blank translated lines left unread.
    ///
    /// Only meaningful once the untranslated stream is exhausted; anything
    /// left over means the translated file has more reads than were
    /// classified.
    pub fn leftover_translations(&mut self) -> Result<u64> {
        let mut leftover = 0;
        loop {
            self.translated_buf.clear();
            let n = self
                .translated
                .read_line(&mut self.translated_buf)
                .map_err(|source| RarefactionError::Io {
                    stream: Stream::Translated,
                    path: self.translated_path.clone(),
                    source,
                })?;
            if n == 0 {
                break;
            }
            if !self.translated_buf.trim().is_empty() {
                leftover += 1;
            }
        }
        Ok(leftover)
    }
}

impl<U: BufRead, T: BufRead> Iterator for PairedRecordReader<U, T> {
    type Item = Result<ReadRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_record() {
            Ok(record) => record.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};
    use tempfile::tempdir;

    fn reader(u: &str, t: &str) -> PairedRecordReader<Cursor<Vec<u8>>, Cursor<Vec<u8>>> {
        PairedRecordReader::new(
            Cursor::new(u.as_bytes().to_vec()),
            Cursor::new(t.as_bytes().to_vec()),
        )
    }

    #[test]
    fn test_lockstep_pairing() {
        let mut r = reader(
            "C\tr1\t2\t150\t2:120\nU\tr2\t0\t150\t0:120\nC\tr3\t1279\t150\t1279:120\n",
            "r1\td__Bacteria|p__Firmicutes\nr3\td__Bacteria|s__X\n",
        );

        let first = r.next_record().unwrap().unwrap();
        assert_eq!(first.line, 1);
        assert_eq!(first.read_id.as_deref(), Some("r1"));
        assert_eq!(
            first.rank_path,
            Some(vec!["d__Bacteria".to_string(), "p__Firmicutes".to_string()])
        );

        let second = r.next_record().unwrap().unwrap();
        assert_eq!(second, ReadRecord::unclassified(2));

        let third = r.next_record().unwrap().unwrap();
        assert_eq!(third.read_id.as_deref(), Some("r3"));
        assert_eq!(
            third.rank_path,
            Some(vec!["d__Bacteria".to_string(), "s__X".to_string()])
        );

        assert!(r.next_record().unwrap().is_none());
        assert_eq!(r.lines_read(), 3);
        assert_eq!(r.translations_read(), 2);
        assert_eq!(r.leftover_translations().unwrap(), 0);
    }

    #[test]
    fn test_translated_exhausted_is_desync() {
        let mut r = reader("C\nC\n", "r1\td__Bacteria\n");
        assert!(r.next_record().unwrap().is_some());

        let err = r.next_record().unwrap_err();
        match err {
            RarefactionError::StreamDesync { line, .. } => assert_eq!(line, 2),
            other => panic!("expected desync, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_classification_token_is_desync() {
        let mut r = reader("C\n", "r1\n");
        assert!(matches!(
            r.next_record(),
            Err(RarefactionError::StreamDesync { line: 1, .. })
        ));
    }

    #[test]
    fn test_iterator_stops_after_error() {
        let r = reader("C\nU\n", "");
        let items: Vec<_> = r.collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
    }

    #[test]
    fn test_unclassified_lines_never_touch_translated() {
        let mut r = reader("U\n\nX\n", "r1\td__Bacteria\n");
        let records: Vec<_> = r.by_ref().map(|rec| rec.unwrap()).collect();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|rec| !rec.is_classified()));
        assert_eq!(r.translations_read(), 0);
        assert_eq!(r.leftover_translations().unwrap(), 1);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempdir().unwrap();
        let present = dir.path().join("kraken.out");
        std::fs::write(&present, "U\n").unwrap();
        let missing = dir.path().join("kraken.translated");

        match PairedRecordReader::open(&present, &missing) {
            Err(RarefactionError::InputNotFound { stream, path }) => {
                assert_eq!(stream, Stream::Translated);
                assert_eq!(path, missing);
            }
            _ => panic!("expected InputNotFound"),
        }

        match PairedRecordReader::open(&missing, &present) {
            Err(RarefactionError::InputNotFound { stream, .. }) => {
                assert_eq!(stream, Stream::Untranslated)
            }
            _ => panic!("expected InputNotFound"),
        }
    }

    #[test]
    fn test_open_gzipped_inputs() {
        let dir = tempdir().unwrap();
        let untranslated = dir.path().join("kraken.out.gz");
        let translated = dir.path().join("kraken.translated");

        let mut gz = GzEncoder::new(File::create(&untranslated).unwrap(), Compression::default());
        gz.write_all(b"C\tr1\nU\tr2\n").unwrap();
        gz.finish().unwrap();
        std::fs::write(&translated, "r1\td__Archaea|p__Euryarchaeota\n").unwrap();

        let records: Vec<_> = PairedRecordReader::open(&untranslated, &translated)
            .unwrap()
            .map(|rec| rec.unwrap())
            .collect();
        assert_eq!(records.len(), 2);
        assert!(records[0].is_classified());
        assert!(!records[1].is_classified());
    }
}
