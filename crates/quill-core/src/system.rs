// this_file: crates/quill-core/src/system.rs

//! The geometry store: validated glyph, mode, phrase and rule dictionaries
//!
//! A [`System`] is built once from a [`SystemSource`] and then only read.
//! Building it is where bad data gets caught: empty geometry, empty strokes
//! and non-finite coordinates are fatal, while regexes that don't compile
//! only disable the entry they belong to and leave a [`Warning`].

use kurbo::Point;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::{EntryKind, SystemError};
use crate::geometry::{Stroke, TokenGeometry};
use crate::source::{RawStrokes, SystemSource};
use crate::warning::Warning;
use crate::Selection;

static NEXT_SYSTEM_ID: AtomicU64 = AtomicU64::new(1);

/// Extra tokenizer tie-break criteria, applied in order after the built-in ones
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Prefer the tokenization whose entries have longer source patterns.
    /// A glyph's pattern is its regex-escaped key, a mode's is its regex.
    PatternLength,
}

/// System-wide behaviour switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemOptions {
    #[serde(default)]
    pub tie_breaks: Vec<TieBreak>,
}

/// Literal-keyed stroke definition
#[derive(Debug, Clone)]
pub struct Glyph {
    pub key: String,
    pub geometry: Arc<TokenGeometry>,
    pattern_len: usize,
}

impl Glyph {
    /// Length in chars of the escaped key, used by [`TieBreak::PatternLength`]
    pub fn pattern_len(&self) -> usize {
        self.pattern_len
    }
}

/// Regex-keyed stroke definition
#[derive(Debug, Clone)]
pub struct Mode {
    pub name: String,
    pub pattern: String,
    pub geometry: Arc<TokenGeometry>,
    regex: Regex,
}

impl Mode {
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn pattern_len(&self) -> usize {
        self.pattern.chars().count()
    }
}

/// Whole-phrase stroke definition
#[derive(Debug, Clone)]
pub struct Phrase {
    pub key: String,
    pub geometry: Arc<TokenGeometry>,
}

/// Ordered text rewrite
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub pattern: String,
    /// Replacement in `regex` crate syntax
    pub replacement: String,
    compiled: std::result::Result<Regex, String>,
}

impl Rule {
    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    /// Why the pattern failed to compile
    pub fn error(&self) -> Option<&str> {
        self.compiled.as_ref().err().map(String::as_str)
    }

    /// Rewrite every match in `text`; `None` if the rule is unusable
    pub fn apply<'t>(&self, text: &'t str) -> Option<Cow<'t, str>> {
        let regex = self.compiled.as_ref().ok()?;
        Some(regex.replace_all(text, self.replacement.as_str()))
    }
}

/// An immutable shorthand system
#[derive(Debug, Clone)]
pub struct System {
    id: u64,
    glyphs: Vec<Glyph>,
    glyphs_by_first_char: HashMap<char, Vec<usize>>,
    modes: Vec<Mode>,
    phrases: Vec<Phrase>,
    phrases_by_key: HashMap<String, usize>,
    rules: Vec<Rule>,
    options: SystemOptions,
    unmapped: Arc<TokenGeometry>,
    warnings: Vec<Warning>,
}

impl System {
    /// Validate `source` and build the lookup structures
    pub fn from_source(source: SystemSource) -> Result<Self, SystemError> {
        let mut warnings = Vec::new();
        let SystemSource {
            glyphs,
            modes,
            phrases,
            rules,
            options,
        } = source;

        let glyphs = present(glyphs, "glyphs", &mut warnings);
        let modes = present(modes, "modes", &mut warnings);
        let phrases = present(phrases, "phrases", &mut warnings);
        let rules = present(rules, "rules", &mut warnings);

        let mut built_glyphs = Vec::with_capacity(glyphs.len());
        let mut glyphs_by_first_char: HashMap<char, Vec<usize>> = HashMap::new();
        for (key, strokes) in glyphs.0 {
            let Some(first) = key.chars().next() else {
                return Err(SystemError::EmptyKey {
                    kind: EntryKind::Glyph,
                });
            };
            let geometry = build_geometry(EntryKind::Glyph, &key, strokes)?;
            glyphs_by_first_char
                .entry(first)
                .or_default()
                .push(built_glyphs.len());
            built_glyphs.push(Glyph {
                pattern_len: regex::escape(&key).chars().count(),
                key,
                geometry: Arc::new(geometry),
            });
        }

        let mut built_modes = Vec::with_capacity(modes.len());
        for (name, raw) in modes.0 {
            let geometry = build_geometry(EntryKind::Mode, &name, raw.points)?;
            match Regex::new(&raw.pattern) {
                Ok(regex) => built_modes.push(Mode {
                    name,
                    pattern: raw.pattern,
                    geometry: Arc::new(geometry),
                    regex,
                }),
                Err(err) => {
                    let warning = Warning::InvalidMode {
                        name,
                        message: err.to_string(),
                    };
                    log::warn!("{warning}");
                    warnings.push(warning);
                },
            }
        }

        let mut built_phrases = Vec::with_capacity(phrases.len());
        let mut phrases_by_key = HashMap::with_capacity(phrases.len());
        for (key, strokes) in phrases.0 {
            if key.trim().is_empty() {
                return Err(SystemError::EmptyKey {
                    kind: EntryKind::Phrase,
                });
            }
            let geometry = build_geometry(EntryKind::Phrase, &key, strokes)?;
            phrases_by_key.insert(key.clone(), built_phrases.len());
            built_phrases.push(Phrase {
                key,
                geometry: Arc::new(geometry),
            });
        }

        let mut built_rules = Vec::with_capacity(rules.len());
        for raw in rules {
            let compiled = Regex::new(&raw.regex).map_err(|err| err.to_string());
            if let Err(message) = &compiled {
                let warning = Warning::InvalidRule {
                    name: raw.name.clone(),
                    message: message.clone(),
                };
                log::warn!("{warning}");
                warnings.push(warning);
            }
            built_rules.push(Rule {
                replacement: translate_replacement(&raw.replacement),
                name: raw.name,
                pattern: raw.regex,
                compiled,
            });
        }

        let system = Self {
            id: NEXT_SYSTEM_ID.fetch_add(1, Ordering::Relaxed),
            glyphs: built_glyphs,
            glyphs_by_first_char,
            modes: built_modes,
            phrases: built_phrases,
            phrases_by_key,
            rules: built_rules,
            options,
            unmapped: Arc::new(TokenGeometry::sentinel()),
            warnings,
        };

        log::debug!(
            "Loaded system {}: {} glyphs, {} modes, {} phrases, {} rules",
            system.id,
            system.glyphs.len(),
            system.modes.len(),
            system.phrases.len(),
            system.rules.len()
        );

        Ok(system)
    }

    /// Process-unique identity, used to key caches
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// Glyphs whose key starts with `first`, in declaration order
    pub fn glyphs_starting_with(&self, first: char) -> impl Iterator<Item = &Glyph> + '_ {
        self.glyphs_by_first_char
            .get(&first)
            .into_iter()
            .flatten()
            .map(|&index| &self.glyphs[index])
    }

    pub fn modes(&self) -> &[Mode] {
        &self.modes
    }

    /// Modes enabled by `selection`, in declaration order
    pub fn active_modes<'a>(&'a self, selection: &'a Selection) -> impl Iterator<Item = &'a Mode> {
        self.modes
            .iter()
            .filter(move |mode| selection.contains(&mode.name))
    }

    pub fn phrases(&self) -> &[Phrase] {
        &self.phrases
    }

    pub fn phrase(&self, key: &str) -> Option<&Phrase> {
        self.phrases_by_key.get(key).map(|&index| &self.phrases[index])
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Rules enabled by `selection`, in the system's declared order
    pub fn active_rules<'a>(&'a self, selection: &'a Selection) -> impl Iterator<Item = &'a Rule> {
        self.rules
            .iter()
            .filter(move |rule| selection.contains(&rule.name))
    }

    pub fn options(&self) -> &SystemOptions {
        &self.options
    }

    /// Shared geometry for text nothing in the system covers
    pub fn unmapped_geometry(&self) -> Arc<TokenGeometry> {
        Arc::clone(&self.unmapped)
    }

    /// Problems found while building the system
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }
}

fn present<T: Default>(value: Option<T>, dictionary: &str, warnings: &mut Vec<Warning>) -> T {
    value.unwrap_or_else(|| {
        let warning = Warning::MissingDictionary {
            dictionary: dictionary.to_string(),
        };
        log::warn!("{warning}");
        warnings.push(warning);
        T::default()
    })
}

fn build_geometry(
    kind: EntryKind,
    key: &str,
    strokes: RawStrokes,
) -> Result<TokenGeometry, SystemError> {
    let mut built = Vec::with_capacity(strokes.len());
    for (stroke_index, raw) in strokes.into_iter().enumerate() {
        let mut points = Vec::with_capacity(raw.len());
        for (point_index, [x, y]) in raw.into_iter().enumerate() {
            if !x.is_finite() || !y.is_finite() {
                return Err(SystemError::NonFiniteCoordinate {
                    kind,
                    key: key.to_string(),
                    stroke: stroke_index,
                    point: point_index,
                });
            }
            points.push(Point::new(x, y));
        }
        let stroke = Stroke::new(points).ok_or_else(|| SystemError::EmptyStroke {
            kind,
            key: key.to_string(),
            stroke: stroke_index,
        })?;
        built.push(stroke);
    }

    TokenGeometry::new(built).ok_or_else(|| SystemError::EmptyGeometry {
        kind,
        key: key.to_string(),
    })
}

/// Convert a replacement written for Python or JavaScript regexes into
/// `regex` crate syntax.
///
/// `\1` and `$1` become `${1}`, `\g<name>` becomes `${name}`, `$&` becomes
/// `${0}`, `\\` is a literal backslash and `\n`/`\t` are control characters.
/// `$$` and `${...}` pass through untouched. Any other `$` is literal text,
/// as it is in both source dialects, and is escaped to `$$`.
pub fn translate_replacement(replacement: &str) -> String {
    let chars: Vec<char> = replacement.chars().collect();
    let mut out = String::with_capacity(replacement.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        match (chars[i], chars.get(i + 1).copied()) {
            ('\\', Some(d)) if d.is_ascii_digit() => {
                let end = digits_end(&chars, i + 1);
                push_group(&mut out, &chars[i + 1..end]);
                i = end;
            },
            ('\\', Some('g')) if chars.get(i + 2) == Some(&'<') => {
                match chars[i + 3..].iter().position(|&c| c == '>') {
                    Some(len) => {
                        push_group(&mut out, &chars[i + 3..i + 3 + len]);
                        i += 4 + len;
                    },
                    None => {
                        out.push_str("\\g");
                        i += 2;
                    },
                }
            },
            ('\\', Some('\\')) => {
                out.push('\\');
                i += 2;
            },
            ('\\', Some('n')) => {
                out.push('\n');
                i += 2;
            },
            ('\\', Some('t')) => {
                out.push('\t');
                i += 2;
            },
            ('$', Some(d)) if d.is_ascii_digit() => {
                let end = digits_end(&chars, i + 1);
                push_group(&mut out, &chars[i + 1..end]);
                i = end;
            },
            ('$', Some('&')) => {
                out.push_str("${0}");
                i += 2;
            },
            ('$', Some('$')) => {
                out.push_str("$$");
                i += 2;
            },
            ('$', Some('{')) if chars[i + 2..].contains(&'}') => {
                while chars[i] != '}' {
                    out.push(chars[i]);
                    i += 1;
                }
                out.push('}');
                i += 1;
            },
            ('$', _) => {
                out.push_str("$$");
                i += 1;
            },
            (c, _) => {
                out.push(c);
                i += 1;
            },
        }
    }

    out
}

fn digits_end(chars: &[char], start: usize) -> usize {
    let mut end = start;
    while end < chars.len() && chars[end].is_ascii_digit() {
        end += 1;
    }
    end
}

fn push_group(out: &mut String, name: &[char]) {
    out.push_str("${");
    out.extend(name.iter());
    out.push('}');
}
