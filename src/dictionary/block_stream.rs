//! Downstream block materialization
//!
//! Keys are enumerated once when the stream is opened. Each yielded block
//! covers the next `max_block_size` keys and costs one lookup scan per
//! requested attribute.

use crate::observability::{log_event_with_fields, Event};
use crate::source::{Block, Column};
use crate::types::{Key, Value};

use super::direct::DirectDictionary;
use super::errors::{DictionaryError, DictionaryResult};

/// Lazy, restartable sequence of result blocks
#[derive(Debug)]
pub struct DictionaryBlockStream<'a> {
    dictionary: &'a DirectDictionary,
    ids: Vec<Key>,
    columns: Vec<String>,
    max_block_size: usize,
    position: usize,
}

impl<'a> DictionaryBlockStream<'a> {
    pub(crate) fn open(
        dictionary: &'a DirectDictionary,
        columns: &[&str],
        max_block_size: usize,
    ) -> DictionaryResult<Self> {
        if max_block_size == 0 {
            return Err(DictionaryError::InvalidBlockSize {
                dictionary: dictionary.full_name().to_string(),
            });
        }

        let id_name = dictionary.structure().id.name.as_str();
        let columns: Vec<String> = if columns.is_empty() {
            std::iter::once(id_name)
                .chain(dictionary.attributes().iter().map(|a| a.name()))
                .map(str::to_string)
                .collect()
        } else {
            columns.iter().map(|c| c.to_string()).collect()
        };

        if let Some(unknown) = columns
            .iter()
            .find(|c| c.as_str() != id_name && dictionary.attributes().get(c).is_none())
        {
            return Err(DictionaryError::UnknownColumn {
                dictionary: dictionary.full_name().to_string(),
                column: unknown.clone(),
            });
        }

        let ids = dictionary.get_ids()?;

        let keys = ids.len().to_string();
        let column_list = columns.join(",");
        log_event_with_fields(
            Event::BlockStreamOpened,
            &[
                ("dictionary", dictionary.full_name()),
                ("keys", &keys),
                ("columns", &column_list),
            ],
        );

        Ok(Self {
            dictionary,
            ids,
            columns,
            max_block_size,
            position: 0,
        })
    }

    /// Keys covered by the stream, in scan order
    pub fn ids(&self) -> &[Key] {
        &self.ids
    }

    /// Column names emitted per block
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Rewinds to the first block. Keys are not re-enumerated.
    pub fn restart(&mut self) {
        self.position = 0;
    }

    fn build_block(&self, ids: &[Key]) -> DictionaryResult<Block> {
        let id_name = self.dictionary.structure().id.name.as_str();

        let mut columns = Vec::with_capacity(self.columns.len());
        for name in &self.columns {
            if name == id_name {
                let values = ids.iter().map(|id| Value::UInt64(*id)).collect();
                columns.push(Column::new(id_name, values));
            } else {
                columns.push(self.dictionary.get_column(name, ids)?);
            }
        }

        Block::new(ids.to_vec(), columns)
            .map_err(|e| DictionaryError::from_source(self.dictionary.full_name(), e))
    }
}

impl Iterator for DictionaryBlockStream<'_> {
    type Item = DictionaryResult<Block>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.ids.len() {
            return None;
        }

        let end = (self.position + self.max_block_size).min(self.ids.len());
        let block = self.build_block(&self.ids[self.position..end]);
        self.position = end;
        Some(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{AttributeSpec, DictionaryLifetime, DictionaryStructure};
    use crate::source::MemorySource;
    use crate::types::AttributeUnderlyingType;

    fn dictionary() -> DirectDictionary {
        let block = Block::new(
            vec![10, 20, 30],
            vec![
                Column::new(
                    "code",
                    vec![
                        Value::String("a".into()),
                        Value::String("b".into()),
                        Value::String("c".into()),
                    ],
                ),
                Column::new("weight", vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]),
            ],
        )
        .unwrap();

        DirectDictionary::new(
            "",
            "codes",
            DictionaryStructure::new(vec![
                AttributeSpec::string("code", ""),
                AttributeSpec::new("weight", AttributeUnderlyingType::Int32),
            ])
            .with_id_name("key"),
            Box::new(MemorySource::new(vec![block])),
            DictionaryLifetime::default(),
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_attribute_cannot_shadow_key_column() {
        let block = Block::new(
            vec![1, 2],
            vec![Column::new("id", vec![Value::UInt32(100), Value::UInt32(200)])],
        )
        .unwrap();

        let err = DirectDictionary::new(
            "",
            "shadowed",
            DictionaryStructure::new(vec![AttributeSpec::new("id", AttributeUnderlyingType::UInt32)]),
            Box::new(MemorySource::new(vec![block])),
            DictionaryLifetime::default(),
            None,
        )
        .unwrap_err();
        assert_eq!(err.code(), "DICT_ID_ATTRIBUTE_COLLISION");
    }

    #[test]
    fn test_stream_chunks_keys() {
        let dict = dictionary();
        let blocks: Vec<Block> = dict
            .block_stream(&["weight"], 2)
            .unwrap()
            .collect::<DictionaryResult<_>>()
            .unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].ids(), &[10, 20]);
        assert_eq!(blocks[1].ids(), &[30]);
        assert_eq!(blocks[1].column("weight").unwrap().values(), &[Value::Int32(3)]);
        assert!(blocks[0].column("key").is_none());
    }

    #[test]
    fn test_empty_column_list_selects_all() {
        let dict = dictionary();
        let stream = dict.block_stream(&[], 8).unwrap();
        assert_eq!(stream.column_names(), &["key", "code", "weight"]);

        let blocks: Vec<Block> = stream.collect::<DictionaryResult<_>>().unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(
            blocks[0].column("key").unwrap().values(),
            &[Value::UInt64(10), Value::UInt64(20), Value::UInt64(30)]
        );
    }

    #[test]
    fn test_restart_replays_blocks() {
        let dict = dictionary();
        let mut stream = dict.block_stream(&["code"], 2).unwrap();

        let first: Vec<Block> = stream.by_ref().collect::<DictionaryResult<_>>().unwrap();
        assert!(stream.next().is_none());

        stream.restart();
        let second: Vec<Block> = stream.collect::<DictionaryResult<_>>().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let dict = dictionary();
        let err = dict.block_stream(&["missing"], 2).unwrap_err();
        assert_eq!(err.code(), "DICT_UNKNOWN_COLUMN");

        let err = dict.block_stream(&["code"], 0).unwrap_err();
        assert_eq!(err.code(), "DICT_INVALID_BLOCK_SIZE");
    }
}
