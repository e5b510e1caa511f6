use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::config::SnapshotConfig;
use crate::grid::{is_text, strip_text, Grid};

/// Recognised rule states
pub const YOU: &str = "you";
pub const WIN: &str = "win";
pub const STOP: &str = "stop";
pub const DEFEAT: &str = "defeat";
pub const HOT: &str = "hot";
pub const MELT: &str = "melt";

/// An active `entity is state` sentence read off the grid
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rule {
    pub entity: String,
    pub state: String,
}

impl Rule {
    pub fn new(entity: impl Into<String>, state: impl Into<String>) -> Self {
        Rule {
            entity: entity.into(),
            state: state.into(),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} is {}", self.entity, self.state)
    }
}

impl FromStr for Rule {
    type Err = String;

    /// Parse `"baba is you"`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let words: Vec<&str> = s.split_whitespace().collect();
        match words.as_slice() {
            [entity, "is", state] => Ok(Rule::new(*entity, *state)),
            _ => Err(format!("expected '<entity> is <state>', got '{}'", s.trim())),
        }
    }
}

/// Every rule active in one snapshot, deduplicated by value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: BTreeSet<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the rule was already present
    pub fn insert(&mut self, rule: Rule) -> bool {
        self.rules.insert(rule)
    }

    pub fn contains(&self, entity: &str, state: &str) -> bool {
        self.rules
            .iter()
            .any(|r| r.entity == entity && r.state == state)
    }

    /// Whether anything at all holds `state`
    pub fn has_state(&self, state: &str) -> bool {
        self.rules.iter().any(|r| r.state == state)
    }

    /// Entities holding `state`, alphabetically
    pub fn entities_with(&self, state: &str) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.state == state)
            .map(|r| r.entity.as_str())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        RuleSet {
            rules: iter.into_iter().collect(),
        }
    }
}

impl Extend<Rule> for RuleSet {
    fn extend<I: IntoIterator<Item = Rule>>(&mut self, iter: I) {
        self.rules.extend(iter);
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::collections::btree_set::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Read every `<noun> is <property>` sentence laid out left-to-right in a row or
/// top-to-bottom in a column
pub fn extract_rules(grid: &Grid, config: &SnapshotConfig) -> RuleSet {
    let mut rules = RuleSet::new();

    for y in 0..grid.rows {
        let words: Vec<Vec<String>> = grid
            .row(y)
            .iter()
            .map(|cell| rule_words(cell, config))
            .collect();
        rules.extend(sentences(&words, &config.connective));
    }

    for x in 0..grid.cols {
        let words: Vec<Vec<String>> = grid
            .column(x)
            .into_iter()
            .map(|cell| rule_words(cell, config))
            .collect();
        rules.extend(sentences(&words, &config.connective));
    }

    log::debug!("extracted {} active rules", rules.len());
    rules
}

/// Text tokens of one cell with the marker stripped; other occupants are ignored
fn rule_words(cell: &[String], config: &SnapshotConfig) -> Vec<String> {
    cell.iter()
        .filter(|t| is_text(t, &config.text_prefix))
        .map(|t| strip_text(t, &config.text_prefix))
        .collect()
}

/// Match strictly adjacent noun / connective / property triples along one line of cells
fn sentences(line: &[Vec<String>], connective: &str) -> Vec<Rule> {
    let mut found = Vec::new();
    for i in 1..line.len().saturating_sub(1) {
        if !line[i].iter().any(|w| w == connective) {
            continue;
        }
        // The topmost word wins when several rule blocks share a cell
        let (Some(noun), Some(property)) = (line[i - 1].last(), line[i + 1].last()) else {
            continue;
        };
        if noun == connective || property == connective {
            continue;
        }
        log::trace!("rule sentence: {} {} {}", noun, connective, property);
        found.push(Rule::new(noun.clone(), property.clone()));
    }
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        Grid::from_rows(
            rows.iter()
                .map(|row| {
                    row.iter()
                        .map(|cell| {
                            cell.split('<')
                                .filter(|t| !t.is_empty())
                                .map(str::to_string)
                                .collect()
                        })
                        .collect()
                })
                .collect(),
        )
    }

    #[test]
    fn horizontal_sentence() {
        let g = grid(&[&["text_baba", "text_is", "text_you", ""]]);
        let rules = extract_rules(&g, &SnapshotConfig::default());
        assert!(rules.contains("baba", "you"));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn vertical_sentence_matches_horizontal() {
        let horizontal = grid(&[&["text_baba", "text_is", "text_you"]]);
        let vertical = grid(&[&["text_baba"], &["text_is"], &["text_you"]]);
        let config = SnapshotConfig::default();
        assert_eq!(extract_rules(&horizontal, &config), extract_rules(&vertical, &config));
    }

    #[test]
    fn gap_breaks_sentence() {
        let g = grid(&[&["text_baba", "", "text_is", "text_you"]]);
        assert!(extract_rules(&g, &SnapshotConfig::default()).is_empty());
    }

    #[test]
    fn non_text_neighbours_do_not_count() {
        let g = grid(&[&["baba", "text_is", "text_you"]]);
        assert!(extract_rules(&g, &SnapshotConfig::default()).is_empty());
    }

    #[test]
    fn stacked_occupants_do_not_interfere() {
        let g = grid(&[&["rock<text_wall", "baba<text_is", "text_stop<flag"]]);
        let rules = extract_rules(&g, &SnapshotConfig::default());
        assert!(rules.contains("wall", "stop"));
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn crossing_sentences_share_connective() {
        let g = grid(&[
            &["", "text_rock", ""],
            &["text_wall", "text_is", "text_stop"],
            &["", "text_push", ""],
        ]);
        let rules = extract_rules(&g, &SnapshotConfig::default());
        assert!(rules.contains("wall", "stop"));
        assert!(rules.contains("rock", "push"));
        assert_eq!(rules.len(), 2);
    }

    #[test]
    fn duplicate_sentences_collapse() {
        let g = grid(&[
            &["text_baba", "text_is", "text_you"],
            &["text_baba", "text_is", "text_you"],
        ]);
        assert_eq!(extract_rules(&g, &SnapshotConfig::default()).len(), 1);
    }

    #[test]
    fn rule_display_and_parse() {
        let rule = Rule::new("baba", "you");
        assert_eq!(rule.to_string(), "baba is you");
        assert_eq!("baba is you".parse::<Rule>(), Ok(rule));
        assert!("baba you".parse::<Rule>().is_err());
    }

    #[test]
    fn rule_set_queries() {
        let rules: RuleSet = [Rule::new("baba", YOU), Rule::new("keke", YOU), Rule::new("wall", STOP)]
            .into_iter()
            .collect();
        assert_eq!(rules.entities_with(YOU), vec!["baba", "keke"]);
        assert!(rules.has_state(STOP));
        assert!(!rules.has_state(WIN));
    }
}
