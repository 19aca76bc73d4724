//! Approximate-name fighter lookup.
//!
//! Each catalog entry gets a set of padded per-word trigrams built once
//! from its name and aliases. A query is scored against every entry by
//! trigram intersection-over-union; the best score wins, ties prefer the
//! shorter catalog name. Query trigram sets are memoized since the same
//! few strings get typed over and over during a match.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, OnceLock};

use rand::Rng;

use crate::common::error::RosterError;
use crate::roster::data::{FighterData, FIGHTERS};

/// Index into the roster; identity of a fighter for the whole process.
pub type FighterId = usize;

type Trigram = (char, char, char);

#[derive(Debug)]
struct Entry {
    data: &'static FighterData,
    trigrams: HashSet<Trigram>,
}

/// The fighter catalog. Immutable after construction.
#[derive(Debug)]
pub struct Roster {
    entries: Vec<Entry>,
    query_trigrams: Mutex<HashMap<String, HashSet<Trigram>>>,
}

impl Roster {
    /// Build a roster from a static fighter table.
    pub fn new(fighters: &'static [FighterData]) -> Self {
        let entries = fighters
            .iter()
            .map(|data| {
                let mut set = trigrams(&data.name.to_lowercase());
                for alias in data.aliases {
                    set.extend(trigrams(&alias.to_lowercase()));
                }
                Entry { data, trigrams: set }
            })
            .collect();

        Self {
            entries,
            query_trigrams: Mutex::new(HashMap::new()),
        }
    }

    /// The process-wide roster, built on first use.
    pub fn global() -> &'static Roster {
        static ROSTER: OnceLock<Roster> = OnceLock::new();
        ROSTER.get_or_init(|| Roster::new(FIGHTERS))
    }

    /// Resolve free text to the closest fighter.
    ///
    /// Fails with `NotFound` when no entry shares a single trigram with
    /// the query.
    pub fn resolve(&self, query: &str) -> Result<FighterId, RosterError> {
        let query_set = self.trigrams_for(query);
        if query_set.is_empty() {
            return Err(RosterError::NotFound {
                query: query.to_string(),
            });
        }

        // (score, name length, id) — ties go to the shorter name, then
        // to catalog order, which keeps resolution deterministic.
        let mut best: Option<(f64, usize, FighterId)> = None;
        for (id, entry) in self.entries.iter().enumerate() {
            let inter = entry.trigrams.intersection(&query_set).count();
            if inter == 0 {
                continue;
            }
            let union = entry.trigrams.len() + query_set.len() - inter;
            let score = inter as f64 / union as f64;
            let name_len = entry.data.name.len();

            let better = match best {
                None => true,
                Some((bs, bl, _)) => score > bs || (score == bs && name_len < bl),
            };
            if better {
                best = Some((score, name_len, id));
            }
        }

        best.map(|(_, _, id)| id).ok_or_else(|| RosterError::NotFound {
            query: query.to_string(),
        })
    }

    /// A uniformly random fighter.
    pub fn random(&self) -> FighterId {
        rand::thread_rng().gen_range(0..self.entries.len())
    }

    pub fn name(&self, id: FighterId) -> &'static str {
        self.entries[id].data.name
    }

    pub fn color(&self, id: FighterId) -> u32 {
        self.entries[id].data.color
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn trigrams_for(&self, query: &str) -> HashSet<Trigram> {
        let key = query.to_lowercase();
        let mut cache = self.query_trigrams.lock().unwrap();
        if let Some(set) = cache.get(&key) {
            return set.clone();
        }
        let set = trigrams(&key);
        cache.insert(key, set.clone());
        set
    }

    #[cfg(test)]
    fn cached_queries(&self) -> usize {
        self.query_trigrams.lock().unwrap().len()
    }
}

/// Padded per-word trigrams of already-lowercased text.
///
/// "link" yields `" li"`, `"lin"`, `"ink"`, `"nk "`; one- and two-letter
/// words still produce at least one trigram thanks to the padding.
fn trigrams(text: &str) -> HashSet<Trigram> {
    let mut set = HashSet::new();
    for word in text.split(|c: char| !c.is_alphanumeric()) {
        if word.is_empty() {
            continue;
        }
        let padded: Vec<char> = std::iter::once(' ')
            .chain(word.chars())
            .chain(std::iter::once(' '))
            .collect();
        for window in padded.windows(3) {
            set.insert((window[0], window[1], window[2]));
        }
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigram_padding() {
        let set = trigrams("link");
        assert!(set.contains(&(' ', 'l', 'i')));
        assert!(set.contains(&('l', 'i', 'n')));
        assert!(set.contains(&('i', 'n', 'k')));
        assert!(set.contains(&('n', 'k', ' ')));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_trigram_short_words() {
        assert_eq!(trigrams("x").len(), 1);
        assert_eq!(trigrams("dk").len(), 2);
        assert!(trigrams("...").is_empty());
    }

    #[test]
    fn test_exact_names_resolve() {
        let roster = Roster::global();
        for query in ["Mario", "pikachu", "KIRBY", "King K. Rool"] {
            let id = roster.resolve(query).unwrap();
            assert_eq!(roster.name(id).to_lowercase(), query.to_lowercase());
        }
    }

    #[test]
    fn test_fuzzy_linc_resolves_to_link() {
        let roster = Roster::global();
        let id = roster.resolve("linc").unwrap();
        assert_eq!(roster.name(id), "Link");
    }

    #[test]
    fn test_no_overlap_is_not_found() {
        let roster = Roster::global();
        let err = roster.resolve("zzzqqq").unwrap_err();
        assert_eq!(
            err,
            RosterError::NotFound {
                query: "zzzqqq".to_string()
            }
        );
    }

    #[test]
    fn test_empty_query_is_not_found() {
        let roster = Roster::global();
        assert!(roster.resolve("").is_err());
        assert!(roster.resolve("!!!").is_err());
    }

    #[test]
    fn test_aliases_resolve() {
        let roster = Roster::global();
        let cases = [
            ("dk", "Donkey Kong"),
            ("doc", "Dr. Mario"),
            ("zss", "Zero Suit Samus"),
            ("ganon", "Ganondorf"),
            ("rob", "R.O.B."),
        ];
        for (query, expected) in cases {
            let id = roster.resolve(query).unwrap();
            assert_eq!(roster.name(id), expected, "query {:?}", query);
        }
    }

    #[test]
    fn test_plain_name_beats_superstring_entry() {
        // "mario" scores 1.0 against Mario but is diluted against
        // Dr. Mario's larger trigram set.
        let roster = Roster::global();
        let id = roster.resolve("mario").unwrap();
        assert_eq!(roster.name(id), "Mario");
    }

    #[test]
    fn test_tie_prefers_shorter_name() {
        // Duplicate words produce identical trigram sets, so both
        // entries score the same; the shorter name must win even though
        // it sits later in the table.
        const TIED: &[FighterData] = &[
            FighterData {
                name: "Aaa Aaa",
                color: 0,
                aliases: &[],
            },
            FighterData {
                name: "Aaa",
                color: 0,
                aliases: &[],
            },
        ];
        let roster = Roster::new(TIED);
        let id = roster.resolve("aaa").unwrap();
        assert_eq!(roster.name(id), "Aaa");
    }

    #[test]
    fn test_query_memoization() {
        let roster = Roster::new(FIGHTERS);
        let first = roster.resolve("falcon").unwrap();
        let second = roster.resolve("FALCON").unwrap();
        assert_eq!(first, second);
        // Case-normalized, so two spellings share one cache slot.
        assert_eq!(roster.cached_queries(), 1);
    }

    #[test]
    fn test_random_in_range() {
        let roster = Roster::global();
        for _ in 0..32 {
            assert!(roster.random() < roster.len());
        }
    }

    #[test]
    fn test_names_unique() {
        let mut seen = std::collections::HashSet::new();
        for f in FIGHTERS {
            assert!(seen.insert(f.name), "duplicate roster name {}", f.name);
        }
    }
}
