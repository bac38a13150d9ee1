use super::*;
use crate::kernel::services::adapters::{
    BufferEditor, MemoryPreview, MemoryStore, ScriptedPrompt,
};
use crate::kernel::services::ports::PlaygroundConfig;
use crate::kernel::vfs::{Panel, VfsPorts};

fn sources(html: &str, css: &str, js: &str) -> SharedSources {
    SharedSources {
        html: html.to_string(),
        css: css.to_string(),
        js: js.to_string(),
    }
}

fn bare_vfs(store: &MemoryStore) -> Vfs {
    let ports = VfsPorts {
        store: PersistentStore::new(Box::new(store.clone()), "lib"),
        primary: Box::new(BufferEditor::new()),
        secondary: Box::new(BufferEditor::new()),
        preview: Box::new(MemoryPreview::new()),
        prompt: Box::new(ScriptedPrompt::default()),
    };
    let config = PlaygroundConfig {
        starter_files: false,
        ..PlaygroundConfig::default()
    };
    Vfs::load(ports, &config)
}

#[test]
fn add_replaces_snippets_with_the_same_name() {
    let mut library = Library::default();
    assert!(library.add("card", sources("<div></div>", "", "")));
    assert!(!library.add("card", sources("<section></section>", "", "")));
    assert_eq!(library.len(), 1);
    assert_eq!(library.get("card").unwrap().sources.html, "<section></section>");
}

#[test]
fn remove_reports_whether_anything_went() {
    let mut library = Library::default();
    library.add("a", SharedSources::default());
    assert!(library.remove("a"));
    assert!(!library.remove("a"));
    assert!(library.is_empty());
}

#[test]
fn library_survives_a_store_round_trip() {
    let backend = MemoryStore::new();
    let mut store = PersistentStore::new(Box::new(backend.clone()), "lib");
    let mut library = Library::default();
    library.add("one", sources("<p>1</p>", "p{}", ""));
    library.add("two", sources("", "", "two()"));
    library.save(&mut store);

    let raw: serde_json::Value =
        serde_json::from_str(&backend.raw("lib.library").unwrap()).unwrap();
    assert_eq!(raw["snippets"][0]["name"], "one");
    assert_eq!(raw["snippets"][0]["html"], "<p>1</p>");

    let loaded = Library::load(&store);
    let names: Vec<&str> = loaded.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["one", "two"]);
    assert_eq!(loaded.get("two").unwrap().sources.js, "two()");
}

#[test]
fn unreadable_library_loads_empty() {
    let backend = MemoryStore::new();
    backend.insert_raw("lib.library", "{\"snippets\": 7}");
    let store = PersistentStore::new(Box::new(backend), "lib");
    assert!(Library::load(&store).is_empty());
}

#[test]
fn import_without_a_project_shows_a_notice() {
    let snippet = Snippet {
        name: "card".to_string(),
        sources: sources("<div></div>", "", ""),
        created: 0,
    };
    let mut notices = ScriptedPrompt::default();

    assert_eq!(import_snippet(None, &snippet, &mut notices), None);
    assert_eq!(notices.notices().len(), 1);
    assert!(notices.notices()[0].contains("card"));
}

#[test]
fn import_creates_a_folder_with_non_empty_sources() {
    let store = MemoryStore::new();
    let mut vfs = bare_vfs(&store);
    let snippet = Snippet {
        name: "card".to_string(),
        sources: sources("<div></div>", "", "init()"),
        created: 0,
    };
    let mut notices = ScriptedPrompt::default();

    let folder = import_snippet(Some(&mut vfs), &snippet, &mut notices).unwrap();

    assert_eq!(vfs.folder(&folder).unwrap().name, "card");
    let files: Vec<(String, Option<FolderId>)> = vfs
        .files()
        .map(|f| (f.name.clone(), f.folder_id.clone()))
        .collect();
    assert_eq!(
        files,
        vec![
            ("card.html".to_string(), Some(folder.clone())),
            ("card.js".to_string(), Some(folder.clone())),
        ]
    );
    let active = vfs.active_file(Panel::Primary).cloned().unwrap();
    assert_eq!(vfs.file(&active).unwrap().name, "card.html");
    assert!(notices.notices().is_empty());
}
