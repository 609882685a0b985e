//! On-disk input journal: line-delimited JSON guarded by a SHA-256 hash chain.
//!
//! Line 1 is the header (format version, build id, seed, config). Every later
//! line is one input record that also stores the digest of the record before
//! it and its own digest, so edited, dropped, or reordered lines fail to load.
//! Records are flushed as they are written; a crash leaves a loadable prefix
//! at worst followed by one incomplete line.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::mem;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::SimConfig;
use crate::journal::{InputJournal, InputPayload, InputRecord};

/// Digest that precedes the first record.
const CHAIN_ROOT: &str = "0000000000000000000000000000000000000000000000000000000000000000";

#[derive(Serialize, Deserialize)]
struct Header {
    format_version: u16,
    build_id: String,
    seed: u64,
    config: SimConfig,
}

/// The hashed part of a record.
#[derive(Serialize)]
struct Entry<'a> {
    seq: u64,
    payload: &'a InputPayload,
}

#[derive(Serialize, Deserialize)]
struct ChainedLine {
    seq: u64,
    payload: InputPayload,
    prev: String,
    digest: String,
}

impl ChainedLine {
    fn entry(&self) -> Entry<'_> {
        Entry { seq: self.seq, payload: &self.payload }
    }
}

/// Running tip of the hash chain.
struct HashChain {
    tip: String,
}

impl HashChain {
    fn new() -> Self {
        Self { tip: CHAIN_ROOT.to_string() }
    }

    /// `hex(SHA-256(entry_json || tip))`
    fn digest_of(&self, entry_json: &str) -> String {
        let digest = Sha256::new()
            .chain_update(entry_json.as_bytes())
            .chain_update(self.tip.as_bytes())
            .finalize();
        format!("{digest:064x}")
    }

    fn link(&mut self, seq: u64, payload: InputPayload) -> serde_json::Result<ChainedLine> {
        let digest = self.digest_of(&serde_json::to_string(&Entry { seq, payload: &payload })?);
        let prev = mem::replace(&mut self.tip, digest.clone());
        Ok(ChainedLine { seq, payload, prev, digest })
    }

    /// Accepts `line` only if it extends the current tip.
    fn verify(&mut self, line: &ChainedLine) -> serde_json::Result<bool> {
        if line.prev != self.tip {
            return Ok(false);
        }
        if line.digest != self.digest_of(&serde_json::to_string(&line.entry())?) {
            return Ok(false);
        }
        self.tip.clone_from(&line.digest);
        Ok(true)
    }
}

/// Appends inputs to a journal file as they are accepted.
pub struct JournalWriter {
    out: BufWriter<File>,
    chain: HashChain,
    next_seq: u64,
}

impl JournalWriter {
    /// Creates (or truncates) `path`, making parent directories, and writes the header.
    pub fn create(path: &Path, journal: &InputJournal) -> io::Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut writer =
            Self { out: BufWriter::new(File::create(path)?), chain: HashChain::new(), next_seq: 0 };
        let header = Header {
            format_version: journal.format_version,
            build_id: journal.build_id.clone(),
            seed: journal.seed,
            config: journal.config.clone(),
        };
        writer.write_line(&header)?;
        Ok(writer)
    }

    /// Appends one input. Non-finite tick values are stored the way the game reads them.
    pub fn append(&mut self, payload: &InputPayload) -> io::Result<()> {
        let line =
            self.chain.link(self.next_seq, payload.sanitized()).map_err(io::Error::other)?;
        self.write_line(&line)?;
        self.next_seq += 1;
        Ok(())
    }

    pub fn next_seq(&self) -> u64 {
        self.next_seq
    }

    fn write_line(&mut self, value: &impl Serialize) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, value).map_err(io::Error::other)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

#[derive(Debug, Error)]
pub enum JournalLoadError {
    #[error("journal I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("journal file is empty")]
    EmptyFile,
    #[error("invalid journal header at line {line}: {message}")]
    InvalidHeader { line: usize, message: String },
    #[error("invalid journal record at line {line}: {message}")]
    InvalidRecord { line: usize, message: String },
    /// The file ended without a trailing newline.
    #[error("incomplete journal line at line {line}")]
    IncompleteLine { line: usize },
    #[error("SHA-256 hash chain broken at line {line}")]
    HashChainBroken { line: usize },
}

/// Loads a journal file, rejecting it at the first malformed or unchained line.
pub fn load_journal_from_file(path: &Path) -> Result<InputJournal, JournalLoadError> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();
    let Some((header_line, record_lines)) = lines.split_first() else {
        return Err(JournalLoadError::EmptyFile);
    };
    if !content.ends_with('\n') {
        return Err(JournalLoadError::IncompleteLine { line: lines.len() });
    }

    let header: Header = serde_json::from_str(header_line)
        .map_err(|e| JournalLoadError::InvalidHeader { line: 1, message: e.to_string() })?;
    let mut journal = InputJournal {
        format_version: header.format_version,
        build_id: header.build_id,
        seed: header.seed,
        config: header.config,
        inputs: Vec::with_capacity(record_lines.len()),
    };

    let mut chain = HashChain::new();
    // Header is line 1.
    for (line, text) in (2..).zip(record_lines) {
        let invalid = |message: String| JournalLoadError::InvalidRecord { line, message };
        let record: ChainedLine = serde_json::from_str(text).map_err(|e| invalid(e.to_string()))?;
        let expected = journal.next_seq();
        if record.seq != expected {
            return Err(invalid(format!("expected seq {expected}, found {}", record.seq)));
        }
        if !chain.verify(&record).map_err(|e| invalid(e.to_string()))? {
            return Err(JournalLoadError::HashChainBroken { line });
        }
        journal.inputs.push(InputRecord { seq: record.seq, payload: record.payload });
    }

    Ok(journal)
}

/// Writes a complete in-memory journal to `path`.
pub fn save_journal_to_file(path: &Path, journal: &InputJournal) -> io::Result<()> {
    let mut writer = JournalWriter::create(path, journal)?;
    for record in &journal.inputs {
        writer.append(&record.payload)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests;
