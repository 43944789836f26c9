//! LensManager - the analysis session for the active document
//!
//! Holds the single current syntax tree and file path, the configuration, the
//! resource cache and the subscriber list. Every update is a full replace of
//! the tree, bracketed by `BeforeUpdate` and `AfterUpdate` notifications; a
//! failed parse leaves no tree and still sends `AfterUpdate`.
//!
//! Read operations work on whatever tree is current when they are called and
//! return owned snapshots.

use serde_json::Value;
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use tracing::{debug, error, info};
use tree_sitter::{InputEdit, Parser, Point, Tree};

use crate::completion::{self, CompletionItem};
use crate::config::Config;
use crate::descriptor::{self, InFlight};
use crate::error::{LensError, Result};
use crate::events::{EventBus, LensEvent};
use crate::extractors::base::{SyntaxTree, TreeItem};
use crate::extractors::highlights::{self, Highlight, HighlightRule};
use crate::extractors::regions::{Region, RegionMatcher};
use crate::extractors::schema::{self, CaptionLookup, SchemaRootItem};
use crate::language::{create_parser, is_schema_source};
use crate::resources::{
    format_hover, resource_key_from_line, ResourceResolver, ResourceSet, ResourceSnippets,
    ResourceValue,
};
use crate::utils::paths;

/// Replace `start_byte..old_end_byte` of the current text with `new_text`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start_byte: usize,
    pub old_end_byte: usize,
    pub new_text: String,
}

pub struct LensManager {
    parser: Parser,
    file_path: Option<PathBuf>,
    source: String,
    /// Last parser output, kept even when it has errors so edits can reuse it
    last_parse: Option<Tree>,
    tree: Option<SyntaxTree>,
    config: Config,
    highlight_rules: Vec<HighlightRule>,
    regions: RegionMatcher,
    resources: ResourceResolver,
    in_flight: InFlight,
    events: EventBus,
}

impl LensManager {
    /// Start a session with the default configuration
    pub fn new() -> Result<Self> {
        Self::activate(Config::default())
    }

    pub fn activate(config: Config) -> Result<Self> {
        let parser = create_parser().map_err(|e| LensError::Grammar(e.to_string()))?;
        info!("Creatio lens session activated");
        Ok(Self {
            parser,
            file_path: None,
            source: String::new(),
            last_parse: None,
            tree: None,
            regions: RegionMatcher::new(&config.region.rules),
            config,
            highlight_rules: highlights::default_rules(),
            resources: ResourceResolver::new(),
            in_flight: InFlight::default(),
            events: EventBus::new(),
        })
    }

    /// End the session, dropping caches and subscribers
    pub fn deactivate(self) {
        self.resources.clear();
        self.events.clear();
        info!("Creatio lens session deactivated");
    }

    pub fn subscribe(&self) -> Receiver<LensEvent> {
        self.events.subscribe()
    }

    fn report(&self, failure: impl Display) {
        let message = failure.to_string();
        error!("{}", message);
        self.events.publish(LensEvent::Error(message));
    }

    // ---- configuration ----

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Deep-merge a partial JSON configuration into the current one
    pub fn apply_config(&mut self, overrides: &Value) -> Result<()> {
        let config = self.config.apply(overrides)?;
        self.set_config(config);
        Ok(())
    }

    pub fn reset_config(&mut self) {
        self.set_config(Config::default());
    }

    fn set_config(&mut self, config: Config) {
        if config.region.rules != self.config.region.rules {
            self.regions = RegionMatcher::new(&config.region.rules);
        }
        self.config = config;
        debug!("Configuration updated: {:?}", self.config);
    }

    pub fn highlight_rules(&self) -> &[HighlightRule] {
        &self.highlight_rules
    }

    pub fn set_highlight_rules(&mut self, rules: Vec<HighlightRule>) {
        self.highlight_rules = rules;
    }

    // ---- document updates ----

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn syntax_tree(&self) -> Option<&SyntaxTree> {
        self.tree.as_ref()
    }

    /// Replace the active document
    ///
    /// Files that are not client schemas get no tree; resource lookups still
    /// work for them.
    pub fn update(&mut self, file_path: Option<&Path>, text: &str) {
        self.events.publish(LensEvent::BeforeUpdate);

        self.file_path = file_path.map(Path::to_path_buf);
        self.source = text.to_string();
        let analyzable = file_path.map_or(true, is_schema_source);
        self.last_parse = if analyzable {
            self.parser.parse(text, None)
        } else {
            None
        };
        self.replace_tree();

        self.events.publish(LensEvent::AfterUpdate);
    }

    /// Apply an edit to the current text and reparse incrementally
    pub fn apply_edit(&mut self, edit: &TextEdit) -> Result<()> {
        let len = self.source.len();
        let in_bounds = edit.start_byte <= edit.old_end_byte
            && edit.old_end_byte <= len
            && self.source.is_char_boundary(edit.start_byte)
            && self.source.is_char_boundary(edit.old_end_byte);
        if !in_bounds {
            return Err(LensError::InvalidEdit {
                start: edit.start_byte,
                end: edit.old_end_byte,
                len,
            });
        }

        self.events.publish(LensEvent::BeforeUpdate);

        let start_position = point_at(&self.source, edit.start_byte);
        let old_end_position = point_at(&self.source, edit.old_end_byte);
        self.source
            .replace_range(edit.start_byte..edit.old_end_byte, &edit.new_text);
        let new_end_byte = edit.start_byte + edit.new_text.len();
        let new_end_position = point_at(&self.source, new_end_byte);

        let input_edit = InputEdit {
            start_byte: edit.start_byte,
            old_end_byte: edit.old_end_byte,
            new_end_byte,
            start_position,
            old_end_position,
            new_end_position,
        };
        let previous = self.last_parse.take().map(|mut tree| {
            tree.edit(&input_edit);
            tree
        });
        let analyzable = self.file_path.as_deref().map_or(true, is_schema_source);
        self.last_parse = if analyzable {
            self.parser.parse(&self.source, previous.as_ref())
        } else {
            None
        };
        self.replace_tree();

        self.events.publish(LensEvent::AfterUpdate);
        Ok(())
    }

    fn replace_tree(&mut self) {
        self.tree = self
            .last_parse
            .clone()
            .and_then(|tree| SyntaxTree::from_tree(tree, self.source.clone()));
        debug!(
            "Updated tree for {:?}: {}",
            self.file_path,
            if self.tree.is_some() { "ok" } else { "none" }
        );
    }

    // ---- analysis ----

    /// Category roots of the current schema
    pub fn schema_roots(&self) -> Vec<SchemaRootItem> {
        if !self.config.schema {
            return Vec::new();
        }
        let captions = self.current_resources();
        schema::extract_schema_roots(
            self.tree.as_ref(),
            captions.as_deref().map(|set| set as &dyn CaptionLookup),
        )
    }

    pub fn schema_tree_items(&self) -> Vec<TreeItem> {
        let file = self.file_key();
        self.schema_roots()
            .iter()
            .map(|root| TreeItem::from_node(root, &file))
            .collect()
    }

    pub fn constant_highlights(&self) -> Vec<Highlight> {
        if !self.config.highlight {
            return Vec::new();
        }
        highlights::annotate(self.tree.as_ref(), &self.highlight_rules)
    }

    /// Highlights for the visible lines (1-based, inclusive)
    pub fn visible_highlights(&self, first_line: u32, last_line: u32) -> Vec<Highlight> {
        highlights::visible_highlights(&self.constant_highlights(), first_line, last_line)
    }

    pub fn regions(&self) -> Vec<Region> {
        if !self.config.region.enabled {
            return Vec::new();
        }
        self.regions.scan(self.tree.as_ref())
    }

    pub fn region_tree_items(&self) -> Vec<TreeItem> {
        let file = self.file_key();
        self.regions()
            .iter()
            .map(|region| TreeItem::from_node(region, &file))
            .collect()
    }

    fn file_key(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(|path| paths::to_unix_style(path).ok())
            .unwrap_or_default()
    }

    // ---- resources ----

    fn load_resources(&self, path: &Path) -> Option<Arc<ResourceSet>> {
        if !self.config.resource {
            return None;
        }
        match self.resources.load(path) {
            Ok(set) => set,
            Err(e) => {
                self.report(e);
                None
            }
        }
    }

    fn current_resources(&self) -> Option<Arc<ResourceSet>> {
        self.file_path
            .as_deref()
            .and_then(|path| self.load_resources(path))
    }

    /// Localized values of `key` for the file at `path`
    pub fn resource_values(&self, path: &Path, key: &str) -> Option<Vec<ResourceValue>> {
        self.load_resources(path).map(|set| set.format_values(key))
    }

    /// Hover text for the resource referenced on `line` before `character`
    pub fn hover(&self, line: &str, character: usize) -> Option<String> {
        let key = resource_key_from_line(line, Some(character))?;
        let set = self.current_resources()?;
        Some(format_hover(&set.format_values(&key)))
    }

    /// Load the resource list of `path` and publish it
    pub fn update_resources_list(&self, path: Option<&Path>) -> Option<Arc<ResourceSet>> {
        let set = path.and_then(|p| self.load_resources(p));
        self.events
            .publish(LensEvent::ResourcesUpdated(set.clone()));
        set
    }

    /// References to `key` that can be inserted into source
    pub fn resource_snippets(&self, key: &str) -> Option<ResourceSnippets> {
        let name = paths::schema_name(self.file_path.as_deref()?)?;
        Some(ResourceSnippets::new(&name, key))
    }

    // ---- save hooks ----

    /// Bump the descriptor timestamp next to a saved file; `true` if it was written
    pub fn update_descriptor(&self, saved: &Path) -> bool {
        if !self.config.descriptor {
            return false;
        }
        let Some(path) = paths::descriptor_path(saved) else {
            debug!("No descriptor next to {}", saved.display());
            return false;
        };
        let Some(_guard) = self.in_flight.begin(&path) else {
            return false;
        };

        match descriptor::rewrite_timestamp(&path, descriptor::now_millis()) {
            Ok(()) => true,
            Err(e) => {
                self.report(format!("{:#}", e));
                false
            }
        }
    }

    pub fn completion_items(&self, line_prefix: &str) -> Vec<CompletionItem> {
        completion::completion_items(line_prefix)
    }
}

/// Row/column (bytes) of `byte` in `text`
fn point_at(text: &str, byte: usize) -> Point {
    let before = &text.as_bytes()[..byte];
    let row = before.iter().filter(|b| **b == b'\n').count();
    let column = match before.iter().rposition(|b| *b == b'\n') {
        Some(newline) => byte - newline - 1,
        None => byte,
    };
    Point::new(row, column)
}
