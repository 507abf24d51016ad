//! JSON file source
//!
//! The file is re-read on every scan, so each query observes the file's
//! current contents. Supported layouts:
//! - `json`: a top-level array of row objects
//! - `json_lines`: one row object per line, blank lines ignored
//!
//! Each row object carries the key under the id column name and one field per
//! declared attribute. Float32 attributes are delivered as Float64 values.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::dictionary::DictionaryStructure;
use crate::types::{AttributeUnderlyingType, Value};

use super::block::{Block, Column};
use super::errors::{SourceError, SourceResult};
use super::session::{DictionarySource, ScanSession};

type Row = Map<String, JsonValue>;

/// File layout of a [`FileSource`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    #[default]
    Json,
    JsonLines,
}

/// A source that reads rows from a JSON file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    format: FileFormat,
    block_size: usize,
    id_column: String,
    attributes: Vec<(String, AttributeUnderlyingType)>,
}

impl FileSource {
    /// Creates a file source yielding blocks of at most `block_size` rows
    pub fn new(
        path: impl Into<PathBuf>,
        format: FileFormat,
        block_size: usize,
        id_column: impl Into<String>,
        attributes: Vec<(String, AttributeUnderlyingType)>,
    ) -> Self {
        Self {
            path: path.into(),
            format,
            block_size: block_size.max(1),
            id_column: id_column.into(),
            attributes,
        }
    }

    /// Creates a file source whose columns follow a dictionary structure
    pub fn for_structure(
        path: impl Into<PathBuf>,
        format: FileFormat,
        block_size: usize,
        structure: &DictionaryStructure,
    ) -> Self {
        let attributes = structure
            .attributes
            .iter()
            .map(|a| (a.name.clone(), a.underlying_type))
            .collect();

        Self::new(path, format, block_size, structure.id.name.clone(), attributes)
    }

    /// Returns the file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    fn load_rows(&self) -> SourceResult<Vec<Row>> {
        let content =
            fs::read_to_string(&self.path).map_err(|e| SourceError::io(self.origin(), e))?;

        match self.format {
            FileFormat::Json => {
                let parsed: JsonValue = serde_json::from_str(&content)
                    .map_err(|e| SourceError::malformed(self.origin(), format!("invalid JSON: {}", e)))?;
                let items = match parsed {
                    JsonValue::Array(items) => items,
                    _ => {
                        return Err(SourceError::malformed(
                            self.origin(),
                            "expected a top-level array of rows",
                        ))
                    }
                };
                items
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| self.expect_object(idx, item))
                    .collect()
            }
            FileFormat::JsonLines => content
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(idx, line)| {
                    let item: JsonValue = serde_json::from_str(line).map_err(|e| {
                        SourceError::malformed(self.origin(), format!("line {}: {}", idx + 1, e))
                    })?;
                    self.expect_object(idx, item)
                })
                .collect(),
        }
    }

    fn expect_object(&self, idx: usize, item: JsonValue) -> SourceResult<Row> {
        match item {
            JsonValue::Object(row) => Ok(row),
            other => Err(SourceError::malformed(
                self.origin(),
                format!("row {}: expected an object, got {}", idx, other),
            )),
        }
    }

    fn build_block(&self, first_row: usize, rows: &[Row]) -> SourceResult<Block> {
        let mut ids = Vec::with_capacity(rows.len());
        let mut columns: Vec<Vec<Value>> = self
            .attributes
            .iter()
            .map(|_| Vec::with_capacity(rows.len()))
            .collect();

        for (offset, row) in rows.iter().enumerate() {
            let row_number = first_row + offset;

            let key = row
                .get(&self.id_column)
                .and_then(JsonValue::as_u64)
                .ok_or_else(|| {
                    SourceError::malformed(
                        self.origin(),
                        format!("row {}: missing or invalid key '{}'", row_number, self.id_column),
                    )
                })?;
            ids.push(key);

            for ((name, ty), column) in self.attributes.iter().zip(columns.iter_mut()) {
                let raw = row.get(name).ok_or_else(|| {
                    SourceError::malformed(
                        self.origin(),
                        format!("row {}: missing attribute '{}'", row_number, name),
                    )
                })?;
                let value = Value::from_json(ty.source_type(), raw).map_err(|reason| {
                    SourceError::malformed(
                        self.origin(),
                        format!("row {}: attribute '{}': {}", row_number, name, reason),
                    )
                })?;
                column.push(value);
            }
        }

        let columns = self
            .attributes
            .iter()
            .zip(columns)
            .map(|((name, _), values)| Column::new(name.clone(), values))
            .collect();

        Block::new(ids, columns)
    }
}

impl DictionarySource for FileSource {
    fn open_scan(&self) -> SourceResult<Box<dyn ScanSession + '_>> {
        Ok(Box::new(FileScan {
            source: self,
            rows: Vec::new(),
            position: 0,
        }))
    }

    fn describe(&self) -> String {
        format!("file '{}' ({:?})", self.path.display(), self.format)
    }

    fn clone_source(&self) -> Box<dyn DictionarySource> {
        Box::new(self.clone())
    }
}

struct FileScan<'a> {
    source: &'a FileSource,
    rows: Vec<Row>,
    position: usize,
}

impl ScanSession for FileScan<'_> {
    fn read_prefix(&mut self) -> SourceResult<()> {
        self.rows = self.source.load_rows()?;
        self.position = 0;
        Ok(())
    }

    fn read(&mut self) -> SourceResult<Option<Block>> {
        if self.position >= self.rows.len() {
            return Ok(None);
        }

        let end = (self.position + self.source.block_size).min(self.rows.len());
        let block = self
            .source
            .build_block(self.position, &self.rows[self.position..end])?;
        self.position = end;
        Ok(Some(block))
    }

    fn read_suffix(&mut self) -> SourceResult<()> {
        self.rows.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn region_source(dir: &TempDir, content: &str, format: FileFormat, block_size: usize) -> FileSource {
        let path = dir.path().join("rows.json");
        fs::write(&path, content).unwrap();
        FileSource::new(
            path,
            format,
            block_size,
            "id",
            vec![
                ("region".to_string(), AttributeUnderlyingType::String),
                ("weight".to_string(), AttributeUnderlyingType::Float32),
            ],
        )
    }

    fn read_all(source: &FileSource) -> SourceResult<Vec<Block>> {
        let mut session = source.open_scan()?;
        session.read_prefix()?;
        let mut blocks = Vec::new();
        while let Some(block) = session.read()? {
            blocks.push(block);
        }
        session.read_suffix()?;
        Ok(blocks)
    }

    #[test]
    fn test_json_array_is_split_into_blocks() {
        let tmp = TempDir::new().unwrap();
        let rows = json!([
            {"id": 1, "region": "US", "weight": 0.5},
            {"id": 2, "region": "CA", "weight": 1.5},
            {"id": 3, "region": "MX", "weight": 2.5}
        ]);
        let source = region_source(&tmp, &rows.to_string(), FileFormat::Json, 2);

        let blocks = read_all(&source).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].ids(), &[1, 2]);
        assert_eq!(blocks[1].ids(), &[3]);
        assert_eq!(
            blocks[0].column("region").unwrap().values()[1],
            Value::String("CA".into())
        );
    }

    #[test]
    fn test_float32_attribute_is_delivered_wide() {
        let tmp = TempDir::new().unwrap();
        let source = region_source(
            &tmp,
            r#"{"id": 1, "region": "US", "weight": 0.1}"#,
            FileFormat::JsonLines,
            10,
        );

        let blocks = read_all(&source).unwrap();
        assert_eq!(
            blocks[0].column("weight").unwrap().values()[0],
            Value::Float64(0.1)
        );
    }

    #[test]
    fn test_json_lines_skip_blank_lines() {
        let tmp = TempDir::new().unwrap();
        let content = "{\"id\": 1, \"region\": \"US\", \"weight\": 1}\n\n{\"id\": 2, \"region\": \"CA\", \"weight\": 2}\n";
        let source = region_source(&tmp, content, FileFormat::JsonLines, 10);

        let blocks = read_all(&source).unwrap();
        assert_eq!(blocks[0].ids(), &[1, 2]);
    }

    #[test]
    fn test_missing_attribute_is_malformed() {
        let tmp = TempDir::new().unwrap();
        let source = region_source(&tmp, r#"[{"id": 1, "region": "US"}]"#, FileFormat::Json, 10);

        let err = read_all(&source).unwrap_err();
        assert_eq!(err.code(), "DICT_SOURCE_MALFORMED");
        assert!(err.to_string().contains("weight"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let source = FileSource::new("/nonexistent/rows.json", FileFormat::Json, 10, "id", vec![]);
        let mut session = source.open_scan().unwrap();
        assert_eq!(session.read_prefix().unwrap_err().code(), "DICT_SOURCE_IO");
    }

    #[test]
    fn test_file_is_reread_on_every_scan() {
        let tmp = TempDir::new().unwrap();
        let source = region_source(
            &tmp,
            r#"[{"id": 1, "region": "US", "weight": 1}]"#,
            FileFormat::Json,
            10,
        );
        assert_eq!(read_all(&source).unwrap()[0].ids(), &[1]);

        fs::write(source.path(), r#"[{"id": 7, "region": "US", "weight": 1}]"#).unwrap();
        assert_eq!(read_all(&source).unwrap()[0].ids(), &[7]);
    }
}
