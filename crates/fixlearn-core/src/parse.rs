//! Extraction of the fixed code and concept list from a completion.
//!
//! The expected shape is the one requested by [`crate::prompt`]:
//!
//! ````text
//! ### FIXED CODE
//! ```python
//! ...
//! ```
//!
//! ### CONCEPTS
//! - Variable Initialization
//! ````
//!
//! Models drift from that contract, so the scanner is lenient: header
//! decoration and case are ignored, an unlabelled fenced block is accepted as
//! the code, and list items are collected even when the concepts header is
//! missing. Only a completion with no code at all is a [`ParseError`].

use crate::{ParseError, fix::FixResponse};

/// The two pieces pulled out of a completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFix {
  pub fixed_code: String,
  pub concepts:   Vec<String>,
  /// `true` when the completion could not be parsed and `fixed_code` is the
  /// raw completion text.
  pub partial:    bool,
}

impl ParsedFix {
  pub fn into_response(self) -> FixResponse {
    FixResponse {
      success:    true,
      fixed_code: self.fixed_code,
      concepts:   self.concepts,
      partial:    self.partial,
    }
  }
}

/// Parse `completion` strictly: fail if no code can be identified.
pub fn parse_completion(completion: &str) -> Result<ParsedFix, ParseError> {
  let scan = scan(completion);
  let fixed_code = scan.code.ok_or(ParseError::NoCode)?;
  Ok(ParsedFix { fixed_code, concepts: scan.concepts, partial: false })
}

/// Parse `completion`, falling back to the trimmed raw text as the code.
///
/// Concepts are still extracted on a best-effort basis in the fallback case.
pub fn parse_or_raw(completion: &str) -> ParsedFix {
  let scan = scan(completion);
  match scan.code {
    Some(fixed_code) => {
      ParsedFix { fixed_code, concepts: scan.concepts, partial: false }
    }
    None => ParsedFix {
      fixed_code: completion.trim().to_owned(),
      concepts:   scan.concepts,
      partial:    true,
    },
  }
}

// ─── Scanner ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
  Code,
  Concepts,
}

struct Fence<'a> {
  section: Option<Section>,
  lines:   Vec<&'a str>,
}

struct Item {
  section: Option<Section>,
  indent:  usize,
  text:    String,
}

struct Scan {
  code:     Option<String>,
  concepts: Vec<String>,
}

fn scan(completion: &str) -> Scan {
  let mut section: Option<Section> = None;
  let mut saw_concepts_header = false;
  let mut fences: Vec<Fence<'_>> = Vec::new();
  let mut open: Option<Fence<'_>> = None;
  let mut loose_code: Vec<&str> = Vec::new();
  let mut items: Vec<Item> = Vec::new();

  for line in completion.lines() {
    let trimmed = line.trim();
    let is_fence = trimmed.starts_with("```") || trimmed.starts_with("~~~");

    if let Some(mut fence) = open.take() {
      if is_fence {
        // Whatever follows the fixed code is no longer part of it.
        if fence.section == Some(Section::Code) {
          section = None;
        }
        fences.push(fence);
      } else {
        fence.lines.push(line);
        open = Some(fence);
      }
      continue;
    }

    if is_fence {
      open = Some(Fence { section, lines: Vec::new() });
      continue;
    }

    if let Some(header) = header_kind(trimmed) {
      section = Some(header);
      saw_concepts_header |= header == Section::Concepts;
      continue;
    }

    if let Some((indent, text)) = list_item(line) {
      items.push(Item { section, indent, text });
    } else if section == Some(Section::Code) {
      loose_code.push(line);
    }
  }
  // An unterminated fence still counts.
  if let Some(fence) = open {
    fences.push(fence);
  }

  let code = fences
    .iter()
    .find(|f| f.section == Some(Section::Code))
    .or_else(|| fences.first())
    .map(|f| trim_blank_lines(&f.lines))
    .filter(|c| !c.is_empty())
    .or_else(|| Some(trim_blank_lines(&loose_code)).filter(|c| !c.is_empty()));

  let candidates: Vec<&Item> = if saw_concepts_header {
    items
      .iter()
      .filter(|i| i.section == Some(Section::Concepts))
      .collect()
  } else {
    items
      .iter()
      .filter(|i| i.section != Some(Section::Code))
      .collect()
  };
  // Nested bullets are explanations of their parent; keep the outer level.
  let outer = candidates.iter().map(|i| i.indent).min().unwrap_or(0);
  let concepts = candidates
    .into_iter()
    .filter(|i| i.indent == outer)
    .map(|i| i.text.clone())
    .collect();

  Scan { code, concepts }
}

/// Recognise a section header line, ignoring markdown decoration.
///
/// Only `#` headings, fully bold lines and lines ending in `:` qualify, so a
/// `* Code` bullet stays a list item.
fn header_kind(trimmed: &str) -> Option<Section> {
  let bolded = trimmed.starts_with("**")
    && (trimmed.ends_with("**") || trimmed.ends_with(':'));
  let labelled = trimmed.ends_with(':') && !is_bullet(trimmed);
  if !(trimmed.starts_with('#') || bolded || labelled) {
    return None;
  }

  let bare = trimmed
    .trim_start_matches(|c: char| c == '#' || c == '*' || c.is_whitespace())
    .trim_end_matches(|c: char| c == '*' || c.is_whitespace());
  let bare = bare.strip_suffix(':').unwrap_or(bare);
  let bare = bare.trim_end_matches('*').trim();

  match bare.to_ascii_uppercase().as_str() {
    "FIXED CODE" | "CORRECTED CODE" | "CODE" => Some(Section::Code),
    "CONCEPTS" | "PROGRAMMING CONCEPTS" | "KEY CONCEPTS" => {
      Some(Section::Concepts)
    }
    _ => None,
  }
}

const BULLETS: [&str; 4] = ["- ", "* ", "+ ", "• "];

fn is_bullet(trimmed: &str) -> bool {
  BULLETS.iter().any(|marker| trimmed.starts_with(marker))
}

/// Split a bullet or numbered line into `(indent, cleaned text)`.
fn list_item(line: &str) -> Option<(usize, String)> {
  let rest = line.trim_start();
  let indent = line.len() - rest.len();

  let body = if let Some(r) = BULLETS
    .iter()
    .find_map(|marker| rest.strip_prefix(marker))
  {
    r
  } else {
    let digits = rest.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
      return None;
    }
    let after = &rest[digits..];
    after
      .strip_prefix(". ")
      .or_else(|| after.strip_prefix(") "))?
  };

  let text = clean_concept(body);
  (!text.is_empty()).then_some((indent, text))
}

/// Strip emphasis and trailing punctuation from a concept label. A bold
/// lead-in (`**Name**: explanation`) yields just the bold part.
fn clean_concept(body: &str) -> String {
  let body = body.trim();
  if let Some(rest) = body.strip_prefix("**")
    && let Some(end) = rest.find("**")
  {
    return tidy(&rest[..end]);
  }
  tidy(body)
}

fn tidy(text: &str) -> String {
  let text = text.replace('`', "");
  let text = text.trim();
  text.strip_suffix(':').unwrap_or(text).trim().to_owned()
}

fn trim_blank_lines(lines: &[&str]) -> String {
  let start = lines.iter().position(|l| !l.trim().is_empty());
  let end = lines.iter().rposition(|l| !l.trim().is_empty());
  match (start, end) {
    (Some(s), Some(e)) => lines[s..=e].join("\n"),
    _ => String::new(),
  }
}
