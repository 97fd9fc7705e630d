//! Analysis session: owns every piece of mutable state.
//!
//! Documents are rebuilt only when the host hands out a different source
//! text (pointer identity of the `Rc<str>`). Component discovery for every
//! host file is absorbed before any file is analyzed.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use litho_carton::{lower_name, CompactString, FxHashMap, FxHashSet, SourceRange};
use litho_croquis::builtins::{builtin_collection, extension_collection};
use litho_croquis::discovery::{definition_names, definitions_to_collection};
use litho_croquis::{
    BindingTypeCache, ComponentDefinition, ComponentDiscovery, DiscoveryDiagnostic, DiscoveryResult,
    HtmlKnowledgeBase, KnowledgeLayer, TypeProvider,
};
use litho_patina::{
    CheckResult, DiagnosticKind, DocumentRef, MarkupInput, RuleEngine, RuleSettings, Severity,
    TemplateDiagnostic,
};
use litho_relief::TemplateDocument;
use litho_stencil::{extract_documents, Dialect, LiteralTags, VirtualDocument};

use crate::config::LithoConfig;

/// Rule name carried by diagnostics the discovery collaborator reports.
pub const DISCOVERY_RULE: &str = "component-discovery";

/// The host program being analyzed.
pub trait HostProgram {
    /// Every source file of the program.
    fn source_files(&self) -> Vec<CompactString>;

    /// Current text of a file. A new `Rc` means the file changed.
    fn source_text(&self, file_name: &str) -> Option<Rc<str>>;

    /// Files a file imports, directly or transitively.
    fn imported_files(&self, file_name: &str) -> Vec<CompactString>;
}

/// One virtual document and what was derived from it.
pub(crate) struct DocumentEntry {
    pub document: VirtualDocument,
    /// Parsed tree, for markup documents
    pub tree: Option<TemplateDocument>,
    pub cache: BindingTypeCache,
    /// Knowledge generation `cache` was filled under
    generation: Cell<u64>,
}

impl DocumentEntry {
    fn new(document: VirtualDocument, tree: Option<TemplateDocument>, generation: u64) -> Self {
        Self {
            document,
            tree,
            cache: BindingTypeCache::new(),
            generation: Cell::new(generation),
        }
    }
}

pub(crate) struct FileEntry {
    source: Rc<str>,
    pub documents: Vec<DocumentEntry>,
}

struct DiscoveredFile {
    source: Rc<str>,
    result: DiscoveryResult,
}

/// Template analysis for one host program.
pub struct AnalysisSession {
    host: Box<dyn HostProgram>,
    types: Box<dyn TypeProvider>,
    discovery: Box<dyn ComponentDiscovery>,

    config: LithoConfig,
    settings: RuleSettings,
    literal_tags: LiteralTags,
    pub(crate) knowledge: HtmlKnowledgeBase,
    engine: RuleEngine,

    pub(crate) files: FxHashMap<CompactString, FileEntry>,
    discovered: FxHashMap<CompactString, DiscoveredFile>,
    /// Bumped whenever the knowledge base changes
    generation: u64,
}

impl AnalysisSession {
    /// Create a session with the default configuration.
    pub fn new(
        host: Box<dyn HostProgram>,
        types: Box<dyn TypeProvider>,
        discovery: Box<dyn ComponentDiscovery>,
    ) -> Self {
        let mut knowledge = HtmlKnowledgeBase::new();
        knowledge.absorb(KnowledgeLayer::BuiltIn, builtin_collection());
        knowledge.absorb(KnowledgeLayer::DeclaredExtension, extension_collection());

        let config = LithoConfig::default();
        Self {
            host,
            types,
            discovery,
            settings: config.rule_settings(),
            literal_tags: config.literal_tags(),
            config,
            knowledge,
            engine: RuleEngine::new(),
            files: FxHashMap::default(),
            discovered: FxHashMap::default(),
            generation: 0,
        }
    }

    /// Create a session configured from `litho.config.json` in `dir`.
    pub fn with_config_dir(
        host: Box<dyn HostProgram>,
        types: Box<dyn TypeProvider>,
        discovery: Box<dyn ComponentDiscovery>,
        dir: &Path,
    ) -> Self {
        let mut session = Self::new(host, types, discovery);
        session.update_config(crate::config::load_config(dir), Some(dir));
        session
    }

    pub fn config(&self) -> &LithoConfig {
        &self.config
    }

    pub fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    pub fn knowledge(&self) -> &HtmlKnowledgeBase {
        &self.knowledge
    }

    /// Replace the configuration.
    ///
    /// Rebuilds the UserConfig layer and drops every document, since the
    /// literal tag sets may have changed.
    pub fn update_config(&mut self, config: LithoConfig, base_dir: Option<&Path>) {
        self.knowledge.clear_layer(KnowledgeLayer::UserConfig);
        self.knowledge
            .absorb(KnowledgeLayer::UserConfig, config.user_collection(base_dir));
        self.settings = config.rule_settings();
        self.literal_tags = config.literal_tags();
        self.config = config;
        self.files.clear();
        self.generation += 1;

        tracing::info!(
            built_in = self.knowledge.layer_len(KnowledgeLayer::BuiltIn),
            user_config = self.knowledge.layer_len(KnowledgeLayer::UserConfig),
            discovered = self.knowledge.layer_len(KnowledgeLayer::StaticallyDiscovered),
            "configuration updated"
        );
    }

    /// Drop everything derived from a file that no longer exists.
    pub fn file_removed(&mut self, file_name: &str) {
        self.files.remove(file_name);
        if let Some(old) = self.discovered.remove(file_name) {
            self.forget_definitions(&old.result);
        }
    }

    /// Analyze every template and stylesheet literal of a file.
    ///
    /// Diagnostics come in document order, followed by the diagnostics the
    /// discovery collaborator reported for the file.
    pub fn analyze_file(&mut self, file_name: &str) -> Vec<TemplateDiagnostic> {
        self.sync_discovery();
        self.ensure_documents(file_name);

        let mut visible: FxHashSet<CompactString> =
            self.host.imported_files(file_name).into_iter().collect();
        visible.insert(file_name.into());

        let mut diagnostics = Vec::new();
        if let Some(entry) = self.files.get(file_name) {
            for document in &entry.documents {
                diagnostics.extend(self.analyze_document(document, &visible).diagnostics);
            }
        }
        if let Some(discovered) = self.discovered.get(file_name) {
            diagnostics.extend(
                discovered
                    .result
                    .diagnostics
                    .iter()
                    .map(|d| discovery_diagnostic(d, discovered.source.len() as u32)),
            );
        }
        diagnostics
    }

    fn analyze_document(
        &self,
        entry: &DocumentEntry,
        visible: &FxHashSet<CompactString>,
    ) -> CheckResult {
        match entry.document.dialect() {
            Dialect::Markup => {
                let Some(tree) = entry.tree.as_ref() else {
                    return CheckResult::default();
                };
                if entry.generation.get() != self.generation {
                    entry.cache.clear();
                    entry.generation.set(self.generation);
                }
                self.engine.check_markup(MarkupInput {
                    document: &entry.document,
                    tree,
                    knowledge: &self.knowledge,
                    types: self.types.as_ref(),
                    cache: &entry.cache,
                    settings: &self.settings,
                    visible_files: Some(visible),
                })
            }
            Dialect::Stylesheet => self
                .engine
                .check_stylesheet(&entry.document, &self.settings),
        }
    }

    /// Absorb discovery results of every changed host file.
    pub(crate) fn sync_discovery(&mut self) {
        let files = self.host.source_files();
        let current: FxHashSet<&str> = files.iter().map(CompactString::as_str).collect();

        let removed: Vec<CompactString> = self
            .discovered
            .keys()
            .filter(|name| !current.contains(name.as_str()))
            .cloned()
            .collect();
        for name in removed {
            self.file_removed(&name);
        }

        for file_name in &files {
            let Some(source) = self.host.source_text(file_name) else {
                tracing::warn!(file = %file_name, "no source text for file");
                continue;
            };
            if let Some(old) = self.discovered.get(file_name) {
                if Rc::ptr_eq(&old.source, &source) {
                    continue;
                }
            }

            let result = self.discovery.discover(file_name, &source);
            if let Some(old) = self.discovered.remove(file_name) {
                self.forget_definitions(&old.result);
            }
            if !result.definitions.is_empty() {
                tracing::debug!(
                    file = %file_name,
                    definitions = result.definitions.len(),
                    "absorbing discovered components"
                );
                self.knowledge.absorb(
                    KnowledgeLayer::StaticallyDiscovered,
                    definitions_to_collection(&result.definitions),
                );
                self.generation += 1;
            }
            self.discovered
                .insert(file_name.clone(), DiscoveredFile { source, result });
        }
    }

    /// Forget a file's definitions. The file must already be gone from
    /// `discovered`; tags another file still defines are absorbed again.
    fn forget_definitions(&mut self, result: &DiscoveryResult) {
        if result.definitions.is_empty() {
            return;
        }
        let names = definition_names(&result.definitions);
        self.knowledge.forget(KnowledgeLayer::StaticallyDiscovered, &names);

        let mut owners: Vec<&CompactString> = self.discovered.keys().collect();
        owners.sort();
        let survivors: Vec<ComponentDefinition> = owners
            .into_iter()
            .filter_map(|file| self.discovered.get(file))
            .flat_map(|file| file.result.definitions.iter())
            .filter(|definition| names.tags.contains(&lower_name(&definition.tag_name)))
            .cloned()
            .collect();
        if !survivors.is_empty() {
            tracing::debug!(
                definitions = survivors.len(),
                "restoring components defined by other files"
            );
            self.knowledge.absorb(
                KnowledgeLayer::StaticallyDiscovered,
                definitions_to_collection(&survivors),
            );
        }
        self.generation += 1;
    }

    /// Make sure a file's documents match its current source text.
    pub(crate) fn ensure_documents(&mut self, file_name: &str) {
        let Some(source) = self.host.source_text(file_name) else {
            tracing::warn!(file = %file_name, "no source text for file");
            self.files.remove(file_name);
            return;
        };
        if let Some(entry) = self.files.get(file_name) {
            if Rc::ptr_eq(&entry.source, &source) {
                return;
            }
        }

        let documents = match extract_documents(file_name, &source, &self.literal_tags) {
            Ok(documents) => documents,
            Err(error) => {
                tracing::warn!(%error, "skipping file");
                Vec::new()
            }
        };

        let mut entries = Vec::with_capacity(documents.len());
        for document in documents {
            match document.dialect() {
                Dialect::Markup => {
                    let tree = litho_armature::parse(&document);
                    let styles: Vec<VirtualDocument> = tree
                        .style_content_ranges()
                        .into_iter()
                        .map(|range| document.sub_document(range, Dialect::Stylesheet))
                        .collect();
                    entries.push(DocumentEntry::new(document, Some(tree), self.generation));
                    entries.extend(
                        styles
                            .into_iter()
                            .map(|style| DocumentEntry::new(style, None, self.generation)),
                    );
                }
                Dialect::Stylesheet => {
                    entries.push(DocumentEntry::new(document, None, self.generation));
                }
            }
        }

        tracing::debug!(
            file = %file_name,
            documents = entries.len(),
            "rebuilt documents"
        );
        self.files.insert(
            file_name.into(),
            FileEntry {
                source,
                documents: entries,
            },
        );
    }
}

fn discovery_diagnostic(diagnostic: &DiscoveryDiagnostic, source_len: u32) -> TemplateDiagnostic {
    TemplateDiagnostic::new(
        DISCOVERY_RULE,
        Severity::Warning,
        DocumentRef {
            file_name: diagnostic.file_name.clone(),
            location: SourceRange::new(0, source_len),
        },
        diagnostic.range,
        diagnostic.message.as_str(),
    )
    .with_kind(DiagnosticKind::Discovery)
}
