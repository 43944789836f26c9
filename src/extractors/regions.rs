//! Region scanner
//!
//! Regions are named, nestable ranges delimited by marker comments. Several
//! marker grammars can be active at once; any end marker closes the innermost
//! open region. End markers with nothing open are ignored, and regions still
//! open at the end of the file are dropped.

use regex::Regex;
use serde::Serialize;
use tracing::warn;

use crate::config::RegionRule;
use crate::extractors::base::{SchemaNode, SourceLocation, SyntaxTree};

/// Name given to regions whose begin marker carries no title
pub const DEFAULT_REGION_NAME: &str = "Region";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Region {
    pub name: String,
    /// From the start of the begin comment to the end of the end comment
    pub location: SourceLocation,
    pub children: Vec<Region>,
}

impl Region {
    fn open(name: String, location: SourceLocation) -> Self {
        Region {
            name,
            location,
            children: Vec::new(),
        }
    }
}

impl SchemaNode for Region {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn location(&self) -> Option<SourceLocation> {
        Some(self.location)
    }

    fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    fn children(&self) -> Vec<Box<dyn SchemaNode>> {
        self.children
            .iter()
            .map(|child| Box::new(child.clone()) as Box<dyn SchemaNode>)
            .collect()
    }
}

struct CompiledRule {
    begin: Regex,
    end: Regex,
}

/// Region marker grammars compiled once per configuration
pub struct RegionMatcher {
    rules: Vec<CompiledRule>,
}

enum Marker {
    Begin(String),
    End,
}

impl RegionMatcher {
    /// Compile `rules`; a rule with an invalid pattern is skipped
    pub fn new(rules: &[RegionRule]) -> Self {
        let rules = rules
            .iter()
            .filter_map(|rule| match (Regex::new(&rule.begin_regex), Regex::new(&rule.end_regex)) {
                (Ok(begin), Ok(end)) => Some(CompiledRule { begin, end }),
                (Err(e), _) | (_, Err(e)) => {
                    warn!("Skipping region rule {:?}: {}", rule, e);
                    None
                }
            })
            .collect();
        RegionMatcher { rules }
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn classify(&self, comment: &str) -> Option<Marker> {
        for rule in &self.rules {
            if let Some(captures) = rule.begin.captures(comment) {
                let name = captures
                    .name("name")
                    .map(|m| m.as_str().trim())
                    .filter(|name| !name.is_empty())
                    .unwrap_or(DEFAULT_REGION_NAME);
                return Some(Marker::Begin(name.to_string()));
            }
        }
        self.rules
            .iter()
            .any(|rule| rule.end.is_match(comment))
            .then_some(Marker::End)
    }

    /// Top-level regions of `tree` in source order
    pub fn scan(&self, tree: Option<&SyntaxTree>) -> Vec<Region> {
        let Some(tree) = tree else {
            return Vec::new();
        };

        let mut stack: Vec<Region> = Vec::new();
        let mut regions = Vec::new();

        for comment in tree.comments() {
            let text = tree.get_node_text(&comment).trim();
            match self.classify(text) {
                Some(Marker::Begin(name)) => stack.push(Region::open(name, tree.location(&comment))),
                Some(Marker::End) => {
                    let Some(mut region) = stack.pop() else {
                        continue;
                    };
                    region.location = region.location.span_to(&tree.location(&comment));
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(region),
                        None => regions.push(region),
                    }
                }
                None => {}
            }
        }

        if !stack.is_empty() {
            warn!("Dropping {} unclosed region(s)", stack.len());
        }
        regions
    }
}

/// Compile `rules` and scan `tree` in one go
pub fn scan_regions(tree: Option<&SyntaxTree>, rules: &[RegionRule]) -> Vec<Region> {
    RegionMatcher::new(rules).scan(tree)
}
