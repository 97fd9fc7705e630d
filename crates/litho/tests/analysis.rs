//! Session-level tests driving `AnalysisSession` with stub collaborators.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use litho::{
    AnalysisSession, CompletionKind, ComponentDefinition, ComponentDiscovery, ComponentMember,
    ComponentSlot, DeclarationRef, DiagnosticKind, DiagnosticPayload, DiscoveryDiagnostic,
    DiscoveryResult, HostExpression, HostProgram, LithoConfig, Severity, SimpleType,
    TemplateDiagnostic, TypeProvider, DISCOVERY_RULE,
};
use litho_carton::{CompactString, FxHashMap, SourceRange};

#[derive(Default)]
struct Program {
    files: RefCell<Vec<(CompactString, Rc<str>)>>,
    imports: RefCell<FxHashMap<CompactString, Vec<CompactString>>>,
    discoveries: RefCell<FxHashMap<CompactString, DiscoveryResult>>,
    discover_calls: Cell<usize>,
    types: RefCell<FxHashMap<CompactString, SimpleType>>,
}

impl Program {
    fn set_file(&self, name: &str, text: &str) {
        let mut files = self.files.borrow_mut();
        files.retain(|(file, _)| file != name);
        files.push((name.into(), Rc::from(text)));
    }

    fn remove_file(&self, name: &str) {
        self.files.borrow_mut().retain(|(file, _)| file != name);
        self.discoveries.borrow_mut().remove(name);
    }

    fn import(&self, from: &str, to: &str) {
        self.imports
            .borrow_mut()
            .entry(from.into())
            .or_default()
            .push(to.into());
    }
}

#[derive(Clone, Default)]
struct Shared(Rc<Program>);

impl HostProgram for Shared {
    fn source_files(&self) -> Vec<CompactString> {
        self.0.files.borrow().iter().map(|(name, _)| name.clone()).collect()
    }

    fn source_text(&self, file_name: &str) -> Option<Rc<str>> {
        self.0
            .files
            .borrow()
            .iter()
            .find(|(name, _)| name == file_name)
            .map(|(_, text)| text.clone())
    }

    fn imported_files(&self, file_name: &str) -> Vec<CompactString> {
        self.0
            .imports
            .borrow()
            .get(file_name)
            .cloned()
            .unwrap_or_default()
    }
}

impl TypeProvider for Shared {
    fn type_of(&self, _file_name: &str, expression: &HostExpression) -> SimpleType {
        self.0
            .types
            .borrow()
            .get(expression.text.trim())
            .cloned()
            .unwrap_or(SimpleType::Unknown)
    }
}

impl ComponentDiscovery for Shared {
    fn discover(&self, file_name: &str, _source: &str) -> DiscoveryResult {
        self.0.discover_calls.set(self.0.discover_calls.get() + 1);
        self.0
            .discoveries
            .borrow()
            .get(file_name)
            .cloned()
            .unwrap_or_default()
    }
}

fn declaration(file_name: &str) -> DeclarationRef {
    DeclarationRef {
        file_name: file_name.into(),
        range: SourceRange::new(0, 20),
    }
}

fn components() -> DiscoveryResult {
    let mut element = ComponentDefinition::new("x-el", declaration("components.ts"));
    element
        .members
        .push(ComponentMember::property("food", SimpleType::String));

    let mut card = ComponentDefinition::new("x-card", declaration("components.ts"));
    card.slots = ["", "right"]
        .into_iter()
        .map(|name| ComponentSlot {
            name: name.into(),
            description: None,
        })
        .collect();

    DiscoveryResult {
        definitions: vec![element, card],
        diagnostics: Vec::new(),
    }
}

fn setup() -> (Shared, AnalysisSession) {
    let shared = Shared::default();
    shared.0.set_file("components.ts", "export class XEl {}");
    shared
        .0
        .discoveries
        .borrow_mut()
        .insert("components.ts".into(), components());
    shared.0.import("main.ts", "components.ts");
    let session = AnalysisSession::new(
        Box::new(shared.clone()),
        Box::new(shared.clone()),
        Box::new(shared.clone()),
    );
    (shared, session)
}

fn analyze(shared: &Shared, session: &mut AnalysisSession, source: &str) -> Vec<TemplateDiagnostic> {
    shared.0.set_file("main.ts", source);
    session.analyze_file("main.ts")
}

fn messages(diagnostics: &[TemplateDiagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .map(|d| format!("{}: {}", d.rule, d.message))
        .collect()
}

#[test]
fn test_attribute_literals() {
    let (shared, mut session) = setup();
    let diagnostics = analyze(
        &shared,
        &mut session,
        r#"html`<input maxlength="50"><input maxlength="abc"><input disabled="">`;"#,
    );
    insta::assert_debug_snapshot!(messages(&diagnostics), @r#"
    [
        "no-incompatible-type-binding: Type '\"abc\"' is not assignable to 'number'.",
    ]
    "#);
    assert_eq!(diagnostics[0].severity, Severity::Error);
}

#[test]
fn test_host_range() {
    let (shared, mut session) = setup();
    let source = r#"const view = html`<input maxlength="abc">`;"#;
    let diagnostics = analyze(&shared, &mut session, source);
    assert_eq!(diagnostics.len(), 1);
    let range = diagnostics[0].host_range();
    assert_eq!(range.slice(source), Some(r#"maxlength="abc""#));
}

#[test]
fn test_unknown_property_suggestion() {
    let (shared, mut session) = setup();
    let diagnostics = analyze(&shared, &mut session, "html`<x-el .foo=${v}></x-el>`");
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.rule, "no-unknown-property");
    assert_eq!(diagnostic.help.as_deref(), Some("Did you mean '.food'?"));
    assert_eq!(
        diagnostic.payload,
        DiagnosticPayload::UnknownTarget {
            name: "foo".into(),
            suggested_name: Some("food".into()),
        }
    );
}

#[test]
fn test_invalid_slot_name() {
    let (shared, mut session) = setup();
    let diagnostics = analyze(
        &shared,
        &mut session,
        r#"html`<x-card><div slot="nope"></div></x-card>`"#,
    );
    insta::assert_debug_snapshot!(messages(&diagnostics), @r#"
    [
        "no-unknown-slot: Invalid slot name 'nope'. Valid slot names are \"\" | \"right\".",
    ]
    "#);
}

#[test]
fn test_if_defined_directive() {
    let (shared, mut session) = setup();
    shared.0.types.borrow_mut().insert(
        "maybeUndefinedString".into(),
        SimpleType::union([SimpleType::String, SimpleType::Undefined]),
    );
    let diagnostics = analyze(
        &shared,
        &mut session,
        r#"html`<a href="${ifDefined(maybeUndefinedString)}"></a>`"#,
    );
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));

    let diagnostics = analyze(
        &shared,
        &mut session,
        r#"html`<a href="${maybeUndefinedString}"></a>`"#,
    );
    insta::assert_debug_snapshot!(messages(&diagnostics), @r#"
    [
        "no-nullable-attribute-binding: This attribute binds the type 'string | undefined' which can be 'undefined'.",
    ]
    "#);
}

#[test]
fn test_discovery_runs_once_per_source() {
    let (shared, mut session) = setup();
    analyze(&shared, &mut session, "html`<x-el></x-el>`");
    let calls = shared.0.discover_calls.get();

    session.analyze_file("main.ts");
    assert_eq!(shared.0.discover_calls.get(), calls);

    // Same text, new identity.
    shared.0.set_file("components.ts", "export class XEl {}");
    session.analyze_file("main.ts");
    assert_eq!(shared.0.discover_calls.get(), calls + 1);
}

#[test]
fn test_rediscovery_is_idempotent() {
    let (shared, mut session) = setup();
    analyze(&shared, &mut session, "html`<x-el></x-el>`");
    let tags = session.knowledge().all_tags().len();

    shared.0.set_file("components.ts", "export class XEl {}");
    session.analyze_file("main.ts");
    assert_eq!(session.knowledge().all_tags().len(), tags);
}

#[test]
fn test_removed_components_are_forgotten() {
    let (shared, mut session) = setup();
    let diagnostics = analyze(&shared, &mut session, "html`<x-el .food=${v}></x-el>`");
    assert!(diagnostics.is_empty());

    shared.0.discoveries.borrow_mut().clear();
    shared.0.set_file("components.ts", "");
    let diagnostics = session.analyze_file("main.ts");
    insta::assert_debug_snapshot!(messages(&diagnostics), @r#"
    [
        "no-unknown-tag-name: Unknown tag <x-el>.",
    ]
    "#);
}

#[test]
fn test_tag_defined_by_two_files_survives_either() {
    let (shared, mut session) = setup();
    let mut duplicate = ComponentDefinition::new("x-el", declaration("more.ts"));
    duplicate
        .members
        .push(ComponentMember::property("food", SimpleType::String));
    shared.0.set_file("more.ts", "export class XEl {}");
    shared.0.discoveries.borrow_mut().insert(
        "more.ts".into(),
        DiscoveryResult {
            definitions: vec![duplicate],
            diagnostics: Vec::new(),
        },
    );
    shared.0.import("main.ts", "more.ts");

    let diagnostics = analyze(&shared, &mut session, "html`<x-el .food=${v}></x-el>`");
    assert!(diagnostics.is_empty());

    shared.0.discoveries.borrow_mut().remove("components.ts");
    shared.0.set_file("components.ts", "");
    let diagnostics = session.analyze_file("main.ts");
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));
    assert_eq!(
        session.definition_at("main.ts", 7).map(|d| d.file_name),
        Some("more.ts".into())
    );

    shared.0.set_file("components.ts", "export class XEl {}");
    shared
        .0
        .discoveries
        .borrow_mut()
        .insert("components.ts".into(), components());
    session.analyze_file("main.ts");
    shared.0.remove_file("more.ts");
    let diagnostics = session.analyze_file("main.ts");
    assert!(diagnostics.is_empty(), "{:?}", messages(&diagnostics));

    shared.0.remove_file("components.ts");
    let diagnostics = session.analyze_file("main.ts");
    insta::assert_debug_snapshot!(messages(&diagnostics), @r#"
    [
        "no-unknown-tag-name: Unknown tag <x-el>.",
    ]
    "#);
}

#[test]
fn test_discovery_diagnostics_passthrough() {
    let (shared, mut session) = setup();
    shared.0.discoveries.borrow_mut().insert(
        "main.ts".into(),
        DiscoveryResult {
            definitions: Vec::new(),
            diagnostics: vec![DiscoveryDiagnostic {
                file_name: "main.ts".into(),
                range: SourceRange::new(0, 5),
                message: "Could not resolve the base class.".into(),
            }],
        },
    );
    let diagnostics = analyze(&shared, &mut session, "class A {}\nhtml`<div></div>`");
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.rule, DISCOVERY_RULE);
    assert_eq!(diagnostic.kind, DiagnosticKind::Discovery);
    assert_eq!(diagnostic.host_range(), SourceRange::new(0, 5));
}

#[test]
fn test_stylesheets() {
    let (shared, mut session) = setup();
    let diagnostics = analyze(
        &shared,
        &mut session,
        "const styles = css`:host { display: block; margin: ${gap}px; }`;",
    );
    assert!(diagnostics.is_empty());

    let source = "html`<div></div><style>.a..b { color: red; }</style>`";
    let diagnostics = analyze(&shared, &mut session, source);
    assert_eq!(diagnostics.len(), 1);
    let diagnostic = &diagnostics[0];
    assert_eq!(diagnostic.rule, "no-invalid-css");
    assert_eq!(diagnostic.kind, DiagnosticKind::Stylesheet);
    let style_start = source.find(".a..b").unwrap() as u32;
    assert_eq!(diagnostic.document.location.start, style_start);
}

#[test]
fn test_config_update() {
    let (shared, mut session) = setup();
    let config: LithoConfig = serde_json::from_str(
        r#"{ "globalAttributes": ["x-theme"], "rules": { "no-unknown-attribute": "warn" } }"#,
    )
    .unwrap();
    session.update_config(config, None);

    let diagnostics = analyze(
        &shared,
        &mut session,
        r#"html`<div x-theme="dark" x-other="1"></div>`"#,
    );
    insta::assert_debug_snapshot!(messages(&diagnostics), @r#"
    [
        "no-unknown-attribute: Unknown attribute 'x-other' on <div>.",
    ]
    "#);
    assert_eq!(diagnostics[0].severity, Severity::Warning);
}

#[test]
fn test_missing_import() {
    let (shared, mut session) = setup();
    let config: LithoConfig =
        serde_json::from_str(r#"{ "rules": { "no-missing-import": "warn" } }"#).unwrap();
    session.update_config(config, None);

    shared.0.set_file("other.ts", "html`<x-el></x-el>`");
    let diagnostics = session.analyze_file("other.ts");
    insta::assert_debug_snapshot!(messages(&diagnostics), @r#"
    [
        "no-missing-import: Missing import for <x-el>.",
    ]
    "#);

    let diagnostics = analyze(&shared, &mut session, "html`<x-el></x-el>`");
    assert!(diagnostics.is_empty());
}

#[test]
fn test_custom_literal_tags() {
    let (shared, mut session) = setup();
    let config: LithoConfig =
        serde_json::from_str(r#"{ "htmlTemplateTags": ["markup"] }"#).unwrap();
    session.update_config(config, None);

    let diagnostics = analyze(
        &shared,
        &mut session,
        r#"html`<input maxlength="abc">`; markup`<x-nope></x-nope>`"#,
    );
    insta::assert_debug_snapshot!(messages(&diagnostics), @r#"
    [
        "no-unknown-tag-name: Unknown tag <x-nope>.",
    ]
    "#);
}

#[test]
fn test_completions() {
    let (shared, mut session) = setup();

    let source = "html`<input @cl>`";
    shared.0.set_file("main.ts", source);
    let offset = source.find("@cl").unwrap() as u32 + 3;
    let completions = session.completions_at("main.ts", offset);
    assert!(completions
        .iter()
        .any(|c| c.label == "@click" && c.kind == CompletionKind::Event));

    let source = "html`<x-el .fo></x-el>`";
    shared.0.set_file("main.ts", source);
    let offset = source.find(".fo").unwrap() as u32 + 3;
    let completions = session.completions_at("main.ts", offset);
    assert!(completions
        .iter()
        .any(|c| c.label == ".food" && c.kind == CompletionKind::Property));

    let source = "html`<di`";
    shared.0.set_file("main.ts", source);
    let offset = source.find("di").unwrap() as u32 + 2;
    let completions = session.completions_at("main.ts", offset);
    assert!(completions.iter().any(|c| c.label == "div"));
    assert!(completions.iter().any(|c| c.label == "x-card"));
    assert!(completions.iter().all(|c| c.kind == CompletionKind::Tag));
}

#[test]
fn test_hover_and_definition() {
    let (shared, mut session) = setup();
    let source = r#"html`<input maxlength="5"><x-el .food=${v}></x-el>`"#;
    shared.0.set_file("main.ts", source);

    let offset = source.find("maxlength").unwrap() as u32 + 2;
    let hover = session.hover_at("main.ts", offset).unwrap();
    assert!(hover.contents.starts_with("(attribute) maxlength: number"));
    assert_eq!(hover.range.slice(source), Some(r#"maxlength="5""#));

    let offset = source.find("food").unwrap() as u32 + 1;
    let hover = session.hover_at("main.ts", offset).unwrap();
    assert!(hover.contents.starts_with("(property) food: string"));

    let offset = source.find("x-el").unwrap() as u32 + 1;
    let definition = session.definition_at("main.ts", offset).unwrap();
    assert_eq!(definition, declaration("components.ts"));

    let offset = source.find("<input").unwrap() as u32 + 2;
    assert!(session.definition_at("main.ts", offset).is_none());
}

#[test]
fn test_closing_tag() {
    let (shared, mut session) = setup();
    let source = "html`<div><span>`";
    shared.0.set_file("main.ts", source);
    let offset = source.find("<span>").unwrap() as u32 + "<span>".len() as u32;
    assert_eq!(
        session.closing_tag_at("main.ts", offset).as_deref(),
        Some("</span>")
    );
    assert_eq!(session.closing_tag_at("main.ts", 0), None);
}
