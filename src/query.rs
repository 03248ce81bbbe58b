//! Loading tab-separated entries into a trie and rendering query results.
//!
//! Input is one `key<TAB>value` pair per line. Blank lines and lines starting with
//! `#` are skipped; a later line for the same key overwrites the earlier one.

use std::io::BufRead;

use serde::Serialize;

use crate::data_structures::lanai_trie::{LanaiTrie, LanaiTrieConfig};
use crate::error::{LanaiError, LanaiResult};

/// One key-value pair in query output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// The key, lossily decoded as UTF-8
    pub key: String,
    /// The stored value
    pub value: String,
}

/// Builds a trie from tab-separated lines.
///
/// # Errors
///
/// Fails on read errors, on a non-comment line without a tab, and on any trie
/// error, reporting the 1-based line number for the last two.
pub fn load_entries<R: BufRead>(reader: R, config: LanaiTrieConfig) -> LanaiResult<LanaiTrie<String>> {
    let mut trie = LanaiTrie::with_config(config);
    let mut overwritten = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = index + 1;
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((key, value)) = line.split_once('\t') else {
            return Err(LanaiError::Custom(format!(
                "line {line_no}: expected key<TAB>value"
            )));
        };

        let inserted = trie.insert(key, value.to_string()).map_err(|e| {
            LanaiError::Custom(format!("line {line_no}: {e}"))
        })?;
        if !inserted {
            overwritten += 1;
        }
    }

    tracing::info!(keys = trie.len(), overwritten, "Loaded entries");
    Ok(trie)
}

/// Looks up a single key.
pub fn lookup(trie: &LanaiTrie<String>, key: &str) -> Option<Entry> {
    trie.find(key).map(|value| Entry {
        key: key.to_string(),
        value: value.clone(),
    })
}

/// Collects every entry under `prefix` no longer than `max_key_len`, ascending.
pub fn prefix_entries(
    trie: &LanaiTrie<String>,
    prefix: &str,
    max_key_len: usize,
) -> LanaiResult<Vec<Entry>> {
    let Some(iter) = trie.find_all(prefix, max_key_len)? else {
        return Ok(Vec::new());
    };

    Ok(iter
        .map(|(key, value)| Entry {
            key: String::from_utf8_lossy(&key).into_owned(),
            value: value.clone(),
        })
        .collect())
}

/// Renders entries as `key<TAB>value` lines.
pub fn render_plain(entries: &[Entry]) -> String {
    entries
        .iter()
        .map(|entry| format!("{}\t{}\n", entry.key, entry.value))
        .collect()
}

/// Renders entries as a JSON array.
pub fn render_json(entries: &[Entry]) -> LanaiResult<String> {
    Ok(serde_json::to_string_pretty(entries)?)
}
