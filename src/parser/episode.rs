//! Season and episode number inference from file names.
//!
//! Naming conventions are tried in a fixed priority order and the first one
//! that matches wins. Nothing here fails: a name that matches no convention
//! lands in the specials season with no episode numbers.

use crate::domain::{EpisodeNumber, SeasonNumber};
use crate::parser::get_regex;
use crate::scanner::disc::naming_base;
use regex::Regex;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Candidates starting closer than this to the previous accepted match are
/// treated as noise (resolution tags, codec numbers) rather than episodes.
const MIN_MATCH_GAP: usize = 5;

/// Numbers inferred for one file group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inference {
    pub season: SeasonNumber,
    pub episodes: Vec<EpisodeNumber>,
}

/// Infers season and episode numbers from the primary file of a group.
#[must_use]
pub fn infer(files: &[PathBuf]) -> Inference {
    let Some(primary) = files.first() else {
        return Inference {
            season: SeasonNumber::NO_SEASON,
            episodes: Vec::new(),
        };
    };

    let name = naming_base(primary);
    Inference {
        season: parse_season(&name),
        episodes: parse_episodes(&name),
    }
}

#[must_use]
pub fn parse_season(name: &str) -> SeasonNumber {
    season_from_sxxe(name)
        .or_else(|| season_from_cross(name))
        .or_else(|| season_from_compact(name))
        .or_else(|| season_from_words(name))
        .map_or(SeasonNumber::SPECIALS, SeasonNumber::new)
}

fn season_from_sxxe(name: &str) -> Option<i32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = get_regex(&RE, r"(?i)S(\d+)[._\-]?E");

    re.captures(name)?.get(1)?.as_str().parse().ok()
}

fn season_from_cross(name: &str) -> Option<i32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = get_regex(&RE, r"(?i)(\d+)?x(\d+)");

    // A first match without a season ("x264") means this rule does not apply.
    re.captures(name)?.get(1)?.as_str().parse().ok()
}

fn season_from_compact(name: &str) -> Option<i32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = get_regex(&RE, r"(\d+)(\d{2})");

    re.captures(name)?.get(1)?.as_str().parse().ok()
}

fn season_from_words(name: &str) -> Option<i32> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = get_regex(&RE, r"(?i)Season[._ ]?(\d+)[._ ]?Episode");

    re.captures(name)?.get(1)?.as_str().parse().ok()
}

fn episode_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"(?i)S(\d+)[._\-]?E(\d+)").expect("Invalid Regex"),
            Regex::new(r"(?i)S(\d+)EP(\d+)").expect("Invalid Regex"),
            Regex::new(r"(?i)(\d+)x(\d+)").expect("Invalid Regex"),
            Regex::new(r"(\d+)(\d{2})").expect("Invalid Regex"),
            Regex::new(r"(?i)Season[._ ]?(\d+)[._ ]?Episode[._ ]?(\d+)").expect("Invalid Regex"),
        ]
    })
}

/// Episode numbers in `name`, in the order they appear.
///
/// Multi-episode files are recognised either by repeated full markers
/// (`1x01 and 1x02`) or by a shorthand continuation right after the first
/// marker (`S01E05E06`, `S01E01-02`).
#[must_use]
pub fn parse_episodes(name: &str) -> Vec<EpisodeNumber> {
    for pattern in episode_patterns() {
        let mut episodes = Vec::new();
        let mut last_end: Option<usize> = None;

        for caps in pattern.captures_iter(name) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if let Some(end) = last_end
                && whole.start() < end + MIN_MATCH_GAP
            {
                continue;
            }
            let Some(number) = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok()) else {
                continue;
            };
            episodes.push(EpisodeNumber::new(number));
            last_end = Some(whole.end());
        }

        if episodes.is_empty() {
            continue;
        }

        if episodes.len() == 1
            && let Some(end) = last_end
        {
            episodes.extend(continuation_episodes(name, end));
        }
        return episodes;
    }

    Vec::new()
}

fn continuation_episodes(name: &str, mut pos: usize) -> Vec<EpisodeNumber> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = get_regex(&RE, r"(?i)^[-_EX]+([0-9]+)($|[-._\sE])");

    let mut found = Vec::new();
    while let Some(caps) = re.captures(&name[pos..]) {
        let (Some(whole), Some(number), Some(terminator)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            break;
        };
        if let Ok(number) = number.as_str().parse::<u32>() {
            found.push(EpisodeNumber::new(number));
        }
        // The terminator may open the next marker ("E05E06"), so leave it unread.
        pos += whole.end() - terminator.len();
    }
    found
}
