//! CSV dataset persistence.
//!
//! The on-disk file carries a UTF-8 byte-order mark so spreadsheet tools
//! pick the right encoding and Hangul survives a round-trip. Column order is
//! fixed by the field order of [`PostRecord`]; the csv crate derives the
//! header row from the struct via serde.

use std::fs;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use crate::error::HarvestError;
use crate::models::PostRecord;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Write the accumulated records, discovery order preserved.
pub fn write_dataset(path: &Path, records: &[PostRecord]) -> Result<(), HarvestError> {
    let mut bytes = Vec::from(UTF8_BOM);
    bytes.extend(to_csv_bytes(records)?);
    fs::write(path, bytes)?;
    info!(path = %path.display(), rows = records.len(), "Wrote dataset CSV");
    Ok(())
}

/// Serialize rows to CSV bytes, header included, no signature. Shared by the
/// writer above and the uploader's re-serialization.
pub fn to_csv_bytes<T: Serialize>(rows: &[T]) -> Result<Vec<u8>, HarvestError> {
    let mut out = Vec::new();
    {
        let mut writer = csv::Writer::from_writer(&mut out);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    Ok(out)
}

/// Read a dataset back, tolerating the signature this module writes.
pub fn read_dataset(path: &Path) -> Result<Vec<PostRecord>, HarvestError> {
    let raw = fs::read(path)?;
    let body = raw.strip_prefix(UTF8_BOM).unwrap_or(&raw);

    let mut reader = csv::Reader::from_reader(body);
    let mut records = Vec::new();
    for row in reader.deserialize() {
        records.push(row?);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn records() -> Vec<PostRecord> {
        vec![
            PostRecord {
                content: "수강신청 일정 안내\n자세한 내용은 본문 참조".to_owned(),
                image_content: "포스터: 11월 4일부터".to_owned(),
                published_at: "2024-11-01 09:30:00.0".to_owned(),
                title: "수강신청 안내".to_owned(),
                link: "https://www.hansung.ac.kr/bbs/hansung/143/264710/artclView.do".to_owned(),
                author: "학사지원팀".to_owned(),
                category: "학사".to_owned(),
            },
            PostRecord {
                content: "장학금 신청, \"마감 엄수\"".to_owned(),
                image_content: String::new(),
                published_at: "2024-11-02 10:00:00.0".to_owned(),
                title: "장학금 공고".to_owned(),
                link: "https://www.hansung.ac.kr/bbs/hansung/143/264711/artclView.do".to_owned(),
                author: "장학팀".to_owned(),
                category: "장학".to_owned(),
            },
        ]
    }

    #[test]
    fn test_round_trip_preserves_rows_and_hangul() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");

        let original = records();
        write_dataset(&path, &original).unwrap();
        let restored = read_dataset(&path).unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn test_file_starts_with_utf8_signature() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");

        write_dataset(&path, &records()).unwrap();
        let raw = std::fs::read(&path).unwrap();
        assert!(raw.starts_with(b"\xef\xbb\xbf"));
    }

    #[test]
    fn test_header_row_and_column_order() {
        let bytes = to_csv_bytes(&records()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(header, "content,image_content,date,title,link,author,category");
    }

    #[test]
    fn test_embedded_newlines_survive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.csv");

        write_dataset(&path, &records()).unwrap();
        let restored = read_dataset(&path).unwrap();
        assert!(restored[0].content.contains('\n'));
    }

    #[test]
    fn test_empty_dataset_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");

        write_dataset(&path, &[]).unwrap();
        assert!(read_dataset(&path).unwrap().is_empty());
    }
}
