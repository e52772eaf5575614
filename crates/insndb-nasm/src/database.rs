//! The instruction database: an immutable list of parsed entries plus
//! the lookup front end a decoder drives.

use insndb_x86::Instruction;

use crate::entry::NasmInsnsEntry;
use crate::error::{MatchError, ParseError};
use crate::matcher::{match_entry, MatchOutcome};
use crate::parser::parse_line;

/// A database of `insns.dat` entries.
///
/// Built once, single-threaded, then read-only: every lookup borrows
/// the database immutably, so a decoder may share one database across
/// threads freely.
#[derive(Debug, Clone, Default)]
pub struct InsnsDatabase {
    entries: Vec<NasmInsnsEntry>,
}

/// A successful lookup: the chosen entry and the derived layout facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupMatch<'a> {
    pub entry: &'a NasmInsnsEntry,
    pub has_modrm: bool,
    pub immediate_size: u8,
}

/// Result of a database lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup<'a> {
    /// Exactly one layout matched (several entries may have agreed on it).
    Match(LookupMatch<'a>),
    /// No entry matched.
    NoMatch,
    /// Entries matched with conflicting ModR/M / immediate layouts.
    Ambiguous,
}

impl<'a> Lookup<'a> {
    /// The match, if any.
    pub fn matched(self) -> Option<LookupMatch<'a>> {
        match self {
            Self::Match(m) => Some(m),
            Self::NoMatch | Self::Ambiguous => None,
        }
    }
}

impl InsnsDatabase {
    /// Creates an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a whole `insns.dat` text. Errors carry the 1-based line
    /// number of the offending line.
    pub fn parse(text: &str) -> Result<Self, ParseError> {
        let mut db = Self::new();
        for (index, line) in text.lines().enumerate() {
            db.push_line(line).map_err(|e| e.at_line(index + 1))?;
        }
        Ok(db)
    }

    /// Parse and append one line. Blank and comment lines are skipped.
    pub fn push_line(&mut self, line: &str) -> Result<(), ParseError> {
        if let Some(entry) = parse_line(line)? {
            self.entries.push(entry);
        }
        Ok(())
    }

    /// Append an already-parsed entry.
    pub fn push_entry(&mut self, entry: NasmInsnsEntry) {
        self.entries.push(entry);
    }

    /// The entries in database order.
    pub fn entries(&self) -> &[NasmInsnsEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &NasmInsnsEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look an instruction up by everything decoded so far (prefixes,
    /// extended prefix, opcode map, main byte): runs every entry in
    /// `up_to_opcode` mode.
    ///
    /// The first matching entry is kept. A later match that derives a
    /// *different* ModR/M presence or immediate size makes the result
    /// [`Lookup::Ambiguous`]; later matches that agree are ignored.
    pub fn try_lookup(&self, insn: &Instruction) -> Result<Lookup<'_>, MatchError> {
        let mut found: Option<(usize, MatchOutcome)> = None;
        for (index, entry) in self.entries.iter().enumerate() {
            let Some(outcome) = match_entry(entry, insn, true)? else {
                continue;
            };
            match found {
                None => found = Some((index, outcome)),
                Some((_, prev)) if prev == outcome => {}
                Some(_) => return Ok(Lookup::Ambiguous),
            }
        }
        Ok(match found {
            Some((index, outcome)) => Lookup::Match(LookupMatch {
                entry: &self.entries[index],
                has_modrm: outcome.has_modrm,
                immediate_size: outcome.immediate_size,
            }),
            None => Lookup::NoMatch,
        })
    }
}

impl<'a> IntoIterator for &'a InsnsDatabase {
    type Item = &'a NasmInsnsEntry;
    type IntoIter = std::slice::Iter<'a, NasmInsnsEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
