//! Append-only string storage
//!
//! A string attribute owns one arena holding its null-default bytes. Readers
//! get `&str` views tied to the arena's lifetime; nothing is ever removed.

/// Location of a string inside a [`StringArena`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringRef {
    offset: usize,
    len: usize,
}

impl StringRef {
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Append-only byte store for string data
#[derive(Debug, Default)]
pub struct StringArena {
    buffer: String,
}

impl StringArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `s` into the arena
    pub fn insert(&mut self, s: &str) -> StringRef {
        let offset = self.buffer.len();
        self.buffer.push_str(s);
        StringRef {
            offset,
            len: s.len(),
        }
    }

    /// Returns the string at `r`.
    ///
    /// `r` must come from this arena; a foreign reference yields `None`.
    pub fn get(&self, r: StringRef) -> Option<&str> {
        self.buffer.get(r.offset..r.offset + r.len)
    }

    /// Bytes of string data held
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Bytes reserved by the backing buffer
    pub fn allocated_bytes(&self) -> usize {
        self.buffer.capacity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get() {
        let mut arena = StringArena::new();
        let unknown = arena.insert("unknown");
        let empty = arena.insert("");
        let utf8 = arena.insert("Zürich");

        assert_eq!(arena.get(unknown), Some("unknown"));
        assert_eq!(arena.get(empty), Some(""));
        assert_eq!(arena.get(utf8), Some("Zürich"));
        assert!(empty.is_empty());
        assert_eq!(arena.size(), "unknown".len() + "Zürich".len());
    }

    #[test]
    fn test_earlier_refs_survive_growth() {
        let mut arena = StringArena::new();
        let first = arena.insert("a");
        for _ in 0..1000 {
            arena.insert("padding");
        }
        assert_eq!(arena.get(first), Some("a"));
        assert!(arena.allocated_bytes() >= arena.size());
    }
}
