use super::*;
use crate::kernel::format::format_css;
use crate::kernel::services::adapters::{BufferEditor, MemoryPreview, MemoryStore, ScriptedPrompt};
use crate::kernel::services::ports::{EditorSurface, PersistentStore, PlaygroundConfig};
use crate::kernel::share::{self, SharedSources};
use crate::kernel::split::{DividerTrack, Orientation, PanelSizes};
use crate::models::{FileId, FileKind, FolderId};
use std::time::{Duration, Instant};

struct Harness {
    store: MemoryStore,
    primary: BufferEditor,
    secondary: BufferEditor,
    preview: MemoryPreview,
    prompt: ScriptedPrompt,
}

impl Harness {
    fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            primary: BufferEditor::new(),
            secondary: BufferEditor::new(),
            preview: MemoryPreview::new(),
            prompt: ScriptedPrompt::default(),
        }
    }

    fn ports(&self) -> VfsPorts {
        VfsPorts {
            store: PersistentStore::new(Box::new(self.store.clone()), "test"),
            primary: Box::new(self.primary.clone()),
            secondary: Box::new(self.secondary.clone()),
            preview: Box::new(self.preview.clone()),
            prompt: Box::new(self.prompt.clone()),
        }
    }

    /// Empty project, no starter files.
    fn load(&self) -> Vfs {
        Vfs::load(self.ports(), &bare_config())
    }

    fn load_with(&self, config: &PlaygroundConfig) -> Vfs {
        Vfs::load(self.ports(), config)
    }

    fn stored(&self, key: &str) -> serde_json::Value {
        let raw = self
            .store
            .raw(&format!("test.{}", key))
            .unwrap_or_else(|| panic!("nothing stored under {}", key));
        serde_json::from_str(&raw).unwrap()
    }

    fn put(&self, key: &str, value: &str) {
        self.store.insert_raw(&format!("test.{}", key), value);
    }
}

fn bare_config() -> PlaygroundConfig {
    PlaygroundConfig {
        starter_files: false,
        ..PlaygroundConfig::default()
    }
}

fn names(vfs: &Vfs) -> Vec<String> {
    vfs.files().map(|f| f.name.clone()).collect()
}

fn html(vfs: &mut Vfs, name: &str, content: &str) -> FileId {
    vfs.create_file(name, FileKind::Html, content, None)
}

/// Four open html files `f0..f3`.
fn four_tabs(vfs: &mut Vfs) -> Vec<FileId> {
    let ids: Vec<FileId> = (0..4)
        .map(|i| html(vfs, &format!("f{}.html", i), &format!("<p>{}</p>", i)))
        .collect();
    for id in &ids {
        vfs.open_tab(id);
    }
    ids
}

#[test]
fn first_run_seeds_starter_trio_with_html_active() {
    let h = Harness::new();
    let vfs = h.load_with(&PlaygroundConfig::default());

    assert_eq!(names(&vfs), vec!["index.html", "style.css", "script.js"]);
    assert_eq!(vfs.open_tabs().len(), 3);
    let active = vfs.active_file(Panel::Primary).cloned().unwrap();
    assert_eq!(vfs.file(&active).unwrap().name, "index.html");
    assert_eq!(h.primary.get_value(), vfs.file(&active).unwrap().content);
    assert!(h.primary.is_enabled());
    assert!(!h.secondary.is_enabled());
    assert_eq!(h.stored("vfs")["files"].as_object().unwrap().len(), 3);
}

#[test]
fn bare_config_starts_empty_and_disabled() {
    let h = Harness::new();
    let vfs = h.load();
    assert_eq!(vfs.file_count(), 0);
    assert!(vfs.active_file(Panel::Primary).is_none());
    assert!(!h.primary.is_enabled());
}

#[test]
fn create_file_persists_and_bumps_tree() {
    let h = Harness::new();
    let mut vfs = h.load();
    let before = vfs.tree_version();

    let a = html(&mut vfs, "a.html", "<p>a</p>");
    let b = html(&mut vfs, "a.html", "<p>b</p>");

    assert_ne!(a, b);
    assert!(vfs.tree_version() > before);
    let stored = h.stored("vfs");
    assert_eq!(stored["files"][a.as_str()]["content"], "<p>a</p>");
    assert_eq!(stored["files"][b.as_str()]["type"], "html");
}

#[test]
fn create_file_in_unknown_folder_lands_at_root() {
    let h = Harness::new();
    let mut vfs = h.load();
    let id = vfs.create_file("x.js", FileKind::JavaScript, "", Some(FolderId::new("nope")));
    assert_eq!(vfs.file(&id).unwrap().folder_id, None);
}

#[test]
fn switching_tabs_flushes_the_edited_buffer() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "old a");
    let b = html(&mut vfs, "b.html", "old b");
    vfs.open_tab(&a);

    h.primary.type_text("edited a");
    vfs.switch_to_tab(&b, Panel::Primary);

    assert_eq!(vfs.file(&a).unwrap().content, "edited a");
    assert_eq!(h.primary.get_value(), "old b");
    assert_eq!(h.stored("vfs")["files"][a.as_str()]["content"], "edited a");
    assert_eq!(h.stored("tabs")["activeTab"], b.as_str());
}

#[test]
fn opening_an_open_tab_just_activates_it() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);

    vfs.open_tab(&ids[1]);
    assert_eq!(vfs.open_tabs(), ids.as_slice());
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[1]));
}

#[test]
fn closing_the_active_tab_flushes_first() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "old");
    vfs.open_tab(&a);

    h.primary.type_text("unsaved");
    assert!(vfs.close_tab(&a));

    assert_eq!(vfs.file(&a).unwrap().content, "unsaved");
    assert_eq!(h.stored("vfs")["files"][a.as_str()]["content"], "unsaved");
}

#[test]
fn closing_active_tab_falls_back_to_previous_index() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);

    vfs.open_tab(&ids[2]);
    vfs.close_tab(&ids[2]);
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[1]));
    assert_eq!(h.primary.get_value(), "<p>1</p>");

    vfs.open_tab(&ids[0]);
    vfs.close_tab(&ids[0]);
    assert_eq!(vfs.open_tabs(), &[ids[1].clone(), ids[3].clone()]);
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[1]));
}

#[test]
fn closing_an_inactive_tab_keeps_the_active_one() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);

    vfs.close_tab(&ids[0]);
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[3]));
    assert_eq!(h.primary.get_value(), "<p>3</p>");
}

#[test]
fn closing_the_last_tab_disables_the_editor() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "<p>a</p>");
    vfs.open_tab(&a);
    assert!(h.primary.is_enabled());

    vfs.close_tab(&a);
    assert!(vfs.open_tabs().is_empty());
    assert!(vfs.active_file(Panel::Primary).is_none());
    assert!(!h.primary.is_enabled());
    assert_eq!(h.primary.get_value(), "");
    assert!(!vfs.close_tab(&a));
}

#[test]
fn save_current_content_without_active_file_is_a_no_op() {
    let h = Harness::new();
    let mut vfs = h.load();
    vfs.save_current_content();
    vfs.save_secondary_content();
    assert!(h.store.raw("test.vfs").is_none());
}

#[test]
fn declined_file_delete_changes_nothing() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "x");
    vfs.open_tab(&a);

    h.prompt.push_answers([false]);
    assert!(!vfs.delete_file(&a));
    assert!(vfs.file(&a).is_some());
    assert_eq!(vfs.open_tabs(), &[a.clone()]);
    assert_eq!(h.prompt.asked(), vec!["Delete file \"a.html\"?".to_string()]);
}

#[test]
fn accepted_file_delete_closes_its_tab_first() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "x");
    let b = html(&mut vfs, "b.html", "y");
    vfs.open_tab(&a);
    vfs.open_tab(&b);

    h.prompt.push_answers([true]);
    assert!(vfs.delete_file(&b));
    assert!(vfs.file(&b).is_none());
    assert_eq!(vfs.open_tabs(), &[a.clone()]);
    assert_eq!(vfs.active_file(Panel::Primary), Some(&a));
    assert!(h.stored("vfs")["files"].get(b.as_str()).is_none());
}

#[test]
fn deleting_unknown_ids_does_not_prompt() {
    let h = Harness::new();
    let mut vfs = h.load();
    assert!(!vfs.delete_file(&FileId::new("ghost")));
    assert!(!vfs.delete_folder(&FolderId::new("ghost")));
    assert!(h.prompt.asked().is_empty());
}

struct Nested {
    root: FolderId,
    sub: FolderId,
    in_root: FileId,
    in_sub: FileId,
    loose: FileId,
}

fn nested(vfs: &mut Vfs) -> Nested {
    let root = vfs.create_folder("root", None);
    let sub = vfs.create_folder("sub", Some(root.clone()));
    let in_root = vfs.create_file("r.html", FileKind::Html, "r", Some(root.clone()));
    let in_sub = vfs.create_file("s.css", FileKind::Css, "s", Some(sub.clone()));
    let loose = vfs.create_file("x.js", FileKind::JavaScript, "x", None);
    Nested {
        root,
        sub,
        in_root,
        in_sub,
        loose,
    }
}

#[test]
fn folder_delete_cascades_through_descendants() {
    let h = Harness::new();
    let mut vfs = h.load();
    let n = nested(&mut vfs);
    vfs.open_tab(&n.loose);
    vfs.open_tab(&n.in_sub);
    vfs.toggle_folder(&n.sub);

    h.prompt.push_answers([true, true]);
    assert!(vfs.delete_folder(&n.root));

    assert_eq!(h.prompt.asked().len(), 2);
    assert_eq!(vfs.folder_count(), 0);
    assert_eq!(names(&vfs), vec!["x.js"]);
    assert!(vfs.file(&n.in_root).is_none());
    assert_eq!(vfs.open_tabs(), &[n.loose.clone()]);
    assert_eq!(vfs.active_file(Panel::Primary), Some(&n.loose));
    assert!(!vfs.is_collapsed(&n.sub));

    let stored = h.stored("vfs");
    assert!(stored["folders"].as_object().unwrap().is_empty());
    assert!(stored["collapsedFolders"].as_object().unwrap().is_empty());
}

#[test]
fn declining_either_folder_prompt_leaves_tree_identical() {
    for answers in [vec![false], vec![true, false]] {
        let h = Harness::new();
        let mut vfs = h.load();
        let n = nested(&mut vfs);
        vfs.open_tab(&n.in_sub);

        let record = vfs.vfs_record();
        let stored = h.store.raw("test.vfs");
        let tabs = vfs.tabs().clone();

        h.prompt.push_answers(answers.clone());
        assert!(!vfs.delete_folder(&n.root));

        assert_eq!(h.prompt.asked().len(), answers.len());
        assert_eq!(vfs.vfs_record(), record);
        assert_eq!(h.store.raw("test.vfs"), stored);
        assert_eq!(vfs.tabs(), &tabs);
    }
}

#[test]
fn empty_folder_needs_a_single_confirmation() {
    let h = Harness::new();
    let mut vfs = h.load();
    let empty = vfs.create_folder("empty", None);

    h.prompt.push_answers([true]);
    assert!(vfs.delete_folder(&empty));
    assert_eq!(h.prompt.asked(), vec!["Delete folder \"empty\"?".to_string()]);
    assert_eq!(vfs.folder_count(), 0);
}

#[test]
fn split_round_trip_restores_the_single_active_file() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);
    vfs.open_tab(&ids[2]);

    assert!(vfs.toggle_split_view());
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[2]));
    assert_eq!(vfs.active_file(Panel::Secondary), Some(&ids[1]));
    assert_eq!(h.secondary.get_value(), "<p>1</p>");
    assert!(h.secondary.is_enabled());
    assert_eq!(h.stored("split")["splitMode"], true);

    assert!(!vfs.toggle_split_view());
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[2]));
    assert!(vfs.active_file(Panel::Secondary).is_none());
    assert!(!h.secondary.is_enabled());
    assert_eq!(h.stored("split")["splitMode"], false);
}

#[test]
fn split_with_one_tab_duplicates_it() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "<p>a</p>");
    vfs.open_tab(&a);

    vfs.toggle_split_view();
    assert_eq!(vfs.active_file(Panel::Primary), Some(&a));
    assert_eq!(vfs.active_file(Panel::Secondary), Some(&a));
    assert_eq!(h.secondary.get_value(), "<p>a</p>");
}

#[test]
fn leaving_split_flushes_both_panels() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);
    vfs.open_tab(&ids[0]);
    vfs.toggle_split_view();

    h.primary.type_text("left");
    h.secondary.type_text("right");
    vfs.toggle_split_view();

    assert_eq!(vfs.file(&ids[0]).unwrap().content, "left");
    assert_eq!(vfs.file(&ids[1]).unwrap().content, "right");
}

#[test]
fn switching_the_second_panel_flushes_it() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);
    vfs.open_tab(&ids[0]);
    vfs.toggle_split_view();

    h.secondary.type_text("panel two edit");
    vfs.switch_to_tab(&ids[3], Panel::Secondary);

    assert_eq!(vfs.file(&ids[1]).unwrap().content, "panel two edit");
    assert_eq!(h.secondary.get_value(), "<p>3</p>");
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[0]));
    assert_eq!(h.stored("split")["activeTab2"], ids[3].as_str());
}

#[test]
fn loading_a_file_shown_in_the_other_panel_picks_up_its_edits() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);
    vfs.open_tab(&ids[0]);
    vfs.toggle_split_view();

    h.secondary.type_text("fresh");
    vfs.switch_to_tab(&ids[1], Panel::Primary);

    assert_eq!(h.primary.get_value(), "fresh");
}

#[test]
fn entering_split_with_one_tab_keeps_unsaved_edits() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "orig");
    vfs.open_tab(&a);

    h.primary.type_text("edited");
    vfs.toggle_split_view();
    assert_eq!(h.secondary.get_value(), "edited");
    assert_eq!(h.stored("vfs")["files"][a.as_str()]["content"], "edited");

    vfs.toggle_split_view();
    assert_eq!(vfs.file(&a).unwrap().content, "edited");
    assert_eq!(h.primary.get_value(), "edited");
}

#[test]
fn entering_split_on_the_second_tab_keeps_unsaved_edits() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);
    vfs.open_tab(&ids[1]);

    h.primary.type_text("second edited");
    vfs.toggle_split_view();
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[1]));
    assert_eq!(vfs.active_file(Panel::Secondary), Some(&ids[1]));
    assert_eq!(h.secondary.get_value(), "second edited");

    vfs.toggle_split_view();
    assert_eq!(vfs.file(&ids[1]).unwrap().content, "second edited");
}

#[test]
fn saving_one_panel_refreshes_the_other_on_the_same_file() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "orig");
    vfs.open_tab(&a);
    vfs.toggle_split_view();

    h.primary.type_text("left edit");
    vfs.save_current_content();
    assert_eq!(h.secondary.get_value(), "left edit");

    vfs.toggle_split_view();
    assert_eq!(vfs.file(&a).unwrap().content, "left edit");
}

#[test]
fn closing_a_tab_in_split_flushes_the_fallback_in_the_other_panel() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);
    vfs.open_tab(&ids[0]);
    vfs.toggle_split_view();

    h.secondary.type_text("b edited");
    assert!(vfs.close_tab(&ids[0]));

    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[1]));
    assert_eq!(vfs.active_file(Panel::Secondary), Some(&ids[1]));
    assert_eq!(h.primary.get_value(), "b edited");
    assert_eq!(h.secondary.get_value(), "b edited");
    assert_eq!(vfs.file(&ids[1]).unwrap().content, "b edited");
    assert_eq!(h.stored("vfs")["files"][ids[1].as_str()]["content"], "b edited");
}

#[test]
fn closing_a_tab_active_in_both_panels_keeps_the_edit() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);
    vfs.open_tab(&ids[1]);
    vfs.toggle_split_view();

    h.primary.type_text("shared edit");
    assert!(vfs.close_tab(&ids[1]));

    assert_eq!(vfs.file(&ids[1]).unwrap().content, "shared edit");
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[0]));
    assert_eq!(vfs.active_file(Panel::Secondary), Some(&ids[0]));
    assert_eq!(h.primary.get_value(), "<p>0</p>");
    assert_eq!(h.secondary.get_value(), "<p>0</p>");
}

#[test]
fn alternate_click_toggles_the_target_panel() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);
    assert!(!vfs.assign_tab_to_other_panel(&ids[2]));

    vfs.open_tab(&ids[0]);
    vfs.toggle_split_view();

    assert!(vfs.assign_tab_to_other_panel(&ids[2]));
    assert_eq!(vfs.active_file(Panel::Secondary), Some(&ids[2]));
    assert!(vfs.assign_tab_to_other_panel(&ids[2]));
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[2]));
    assert_eq!(vfs.active_file(Panel::Secondary), Some(&ids[2]));
}

#[test]
fn divider_drag_clamps_and_persists_on_release() {
    let h = Harness::new();
    let mut vfs = h.load();
    let ids = four_tabs(&mut vfs);
    vfs.open_tab(&ids[0]);
    assert!(!vfs.begin_divider_drag(DividerTrack::new(0.0, 400.0)));

    vfs.toggle_split_view();
    assert!(vfs.begin_divider_drag(DividerTrack::new(0.0, 400.0)));

    let live = vfs.drag_divider(380.0).unwrap();
    assert_eq!(live, PanelSizes { panel1: 80.0, panel2: 20.0 });
    assert_eq!(vfs.layout().panel_widths, live);
    assert_eq!(h.stored("split")["panelWidths"]["panel1"], 50.0);

    assert_eq!(vfs.end_divider_drag(), Some(live));
    assert_eq!(h.stored("split")["panelWidths"]["panel1"], 80.0);
    assert_eq!(h.stored("split")["panelWidths"]["panel2"], 20.0);
    assert!(vfs.drag_divider(100.0).is_none());
}

#[test]
fn vertical_orientation_drags_heights() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "");
    vfs.open_tab(&a);
    vfs.toggle_split_view();

    assert_eq!(vfs.toggle_orientation(), Orientation::Vertical);
    vfs.begin_divider_drag(DividerTrack::new(100.0, 200.0));
    vfs.drag_divider(110.0);
    vfs.end_divider_drag();

    assert_eq!(vfs.layout().panel_heights.panel1, 20.0);
    assert_eq!(vfs.layout().panel_widths, PanelSizes::default());
    assert_eq!(h.stored("split")["splitOrientation"], "vertical");
}

#[test]
fn output_inlines_css_and_html_verbatim() {
    let h = Harness::new();
    let mut vfs = h.load();
    vfs.create_file("a.html", FileKind::Html, "<p>hi</p>", None);
    vfs.create_file("b.css", FileKind::Css, "p{color:red}", None);

    let document = vfs.update_output().unwrap();
    let style = &document[document.find("<style>").unwrap()..document.find("</style>").unwrap()];
    assert!(style.contains("p{color:red}"));
    let body = &document[document.find("<body>").unwrap()..];
    assert!(body.contains("<p>hi</p>"));
    assert!(document.starts_with("<!DOCTYPE html>"));
    assert_eq!(h.preview.document(), Some(document));
}

#[test]
fn output_concatenates_in_insertion_order() {
    let h = Harness::new();
    let mut vfs = h.load();
    vfs.create_file("one.js", FileKind::JavaScript, "first()", None);
    vfs.create_file("page.html", FileKind::Html, "<main></main>", None);
    vfs.create_file("two.js", FileKind::JavaScript, "second()", None);

    let sources = vfs.sources();
    assert_eq!(sources.js, "first()\nsecond()");
    assert_eq!(sources.html, "<main></main>");
    assert_eq!(sources.css, "");
}

#[test]
fn output_without_html_clears_the_preview() {
    let h = Harness::new();
    let mut vfs = h.load();
    let page = html(&mut vfs, "a.html", "<p>x</p>");
    vfs.create_file("b.css", FileKind::Css, "p{}", None);
    assert!(vfs.update_output().is_some());

    h.prompt.push_answers([true]);
    vfs.delete_file(&page);
    assert_eq!(vfs.update_output(), None);
    assert_eq!(h.preview.document(), None);
}

#[test]
fn output_reads_live_buffers() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "<p>stored</p>");
    vfs.open_tab(&a);
    h.primary.type_text("<p>typed</p>");

    let document = vfs.update_output().unwrap();
    assert!(document.contains("<p>typed</p>"));
    assert_eq!(vfs.file(&a).unwrap().content, "<p>stored</p>");
}

#[test]
fn detached_preview_mirrors_until_closed() {
    let h = Harness::new();
    let mut vfs = h.load();
    html(&mut vfs, "a.html", "<p>x</p>");
    let detached = MemoryPreview::new();

    vfs.attach_detached_preview(Box::new(detached.clone()));
    assert_eq!(detached.renders(), 1);
    let document = vfs.update_output();
    assert_eq!(detached.document(), document);
    assert_eq!(detached.renders(), 2);

    detached.close();
    vfs.update_output();
    assert_eq!(detached.renders(), 2);
    assert!(!vfs.has_detached_preview());
    assert_eq!(h.preview.renders(), 2);
}

#[test]
fn export_bundle_concatenates_all_sources() {
    let h = Harness::new();
    let mut vfs = h.load();
    vfs.create_file("a.html", FileKind::Html, "<b>a</b>", None);
    vfs.create_file("a.js", FileKind::JavaScript, "go()", None);
    assert_eq!(vfs.export_bundle(), "<b>a</b>go()");
}

#[test]
fn autosave_and_preview_are_debounced() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "<p>old</p>");
    vfs.open_tab(&a);
    let t0 = Instant::now();

    h.primary.type_text("<p>new</p>");
    vfs.on_editor_input(Panel::Primary, t0);
    assert!(vfs.has_pending_work());
    assert!(!vfs.tick(t0 + Duration::from_millis(100)));

    assert!(vfs.tick(t0 + Duration::from_millis(350)));
    assert_eq!(h.preview.renders(), 1);
    assert_eq!(vfs.file(&a).unwrap().content, "<p>old</p>");

    assert!(vfs.tick(t0 + Duration::from_millis(600)));
    assert_eq!(vfs.file(&a).unwrap().content, "<p>new</p>");
    assert_eq!(h.stored("vfs")["files"][a.as_str()]["content"], "<p>new</p>");
    assert!(!vfs.has_pending_work());
    assert!(!vfs.tick(t0 + Duration::from_millis(5_000)));
}

#[test]
fn each_keystroke_restarts_the_quiet_period() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "");
    vfs.open_tab(&a);
    let t0 = Instant::now();

    h.primary.type_text("a");
    vfs.on_editor_input(Panel::Primary, t0);
    h.primary.type_text("ab");
    vfs.on_editor_input(Panel::Primary, t0 + Duration::from_millis(400));

    vfs.tick(t0 + Duration::from_millis(600));
    assert_eq!(vfs.file(&a).unwrap().content, "");
    vfs.tick(t0 + Duration::from_millis(900));
    assert_eq!(vfs.file(&a).unwrap().content, "ab");
}

#[test]
fn input_without_active_file_schedules_nothing() {
    let h = Harness::new();
    let mut vfs = h.load();
    vfs.on_editor_input(Panel::Primary, Instant::now());
    vfs.on_editor_input(Panel::Secondary, Instant::now());
    assert!(!vfs.has_pending_work());
}

#[test]
fn format_active_rewrites_buffer_and_record() {
    let h = Harness::new();
    let mut vfs = h.load();
    let raw = "a{color:red;}";
    let id = vfs.create_file("s.css", FileKind::Css, raw, None);
    vfs.open_tab(&id);

    assert!(vfs.format_active(Panel::Primary));
    let expected = format_css(raw);
    assert_eq!(h.primary.get_value(), expected);
    assert_eq!(vfs.file(&id).unwrap().content, expected);
    assert!(!vfs.format_active(Panel::Primary));
    assert!(!vfs.format_active(Panel::Secondary));
}

#[test]
fn shared_token_replaces_the_project() {
    let h = Harness::new();
    let mut vfs = h.load();
    let n = nested(&mut vfs);
    vfs.open_tab(&n.loose);

    let token = share::encode(&SharedSources {
        html: "<p>shared</p>".to_string(),
        css: String::new(),
        js: "run()".to_string(),
    });
    assert!(vfs.load_shared(&token));

    assert_eq!(names(&vfs), vec!["shared.html", "shared.css", "shared.js"]);
    assert_eq!(vfs.folder_count(), 0);
    assert_eq!(vfs.open_tabs().len(), 3);
    let active = vfs.active_file(Panel::Primary).cloned().unwrap();
    assert_eq!(vfs.file(&active).unwrap().name, "shared.html");
    assert_eq!(h.primary.get_value(), "<p>shared</p>");
    assert!(h.preview.document().unwrap().contains("run()"));
    assert_eq!(h.stored("vfs")["files"].as_object().unwrap().len(), 3);
}

#[test]
fn malformed_token_leaves_state_untouched() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "keep");
    let record = vfs.vfs_record();

    assert!(!vfs.load_shared("%%%"));
    assert!(!vfs.on_fragment_change("#"));
    assert_eq!(vfs.vfs_record(), record);
    assert!(vfs.file(&a).is_some());
}

#[test]
fn fragment_change_loads_into_both_panels_in_split_mode() {
    let h = Harness::new();
    let mut vfs = h.load();
    let a = html(&mut vfs, "a.html", "");
    vfs.open_tab(&a);
    vfs.toggle_split_view();

    let sources = SharedSources {
        html: "<h1>t</h1>".to_string(),
        css: "h1{}".to_string(),
        js: String::new(),
    };
    assert!(vfs.on_fragment_change(&share::to_fragment(&sources)));

    assert_eq!(h.primary.get_value(), "<h1>t</h1>");
    assert_eq!(h.secondary.get_value(), "h1{}");
    assert_eq!(vfs.share_token(), share::encode(&sources));
}

#[test]
fn tree_rows_list_folders_first_and_honor_collapse() {
    let h = Harness::new();
    let mut vfs = h.load();
    let loose = html(&mut vfs, "top.html", "");
    let folder = vfs.create_folder("styles", None);
    vfs.create_file("a.css", FileKind::Css, "", Some(folder.clone()));
    vfs.open_tab(&loose);

    let rows = vfs.tree_rows();
    let shape: Vec<(usize, &str)> = rows.iter().map(|r| (r.depth, r.name.as_str())).collect();
    assert_eq!(shape, vec![(0, "styles"), (1, "a.css"), (0, "top.html")]);
    assert!(matches!(
        rows[2].entry,
        TreeEntry::File {
            open: true,
            active: true,
            ..
        }
    ));

    let version = vfs.tree_version();
    assert!(vfs.toggle_folder(&folder));
    assert!(vfs.tree_version() > version);
    let rows = vfs.tree_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(
        rows[0].entry,
        TreeEntry::Folder {
            id: folder.clone(),
            collapsed: true
        }
    );
    assert_eq!(h.stored("vfs")["collapsedFolders"][folder.as_str()], true);
}

#[test]
fn rename_and_move_validate_their_input() {
    let h = Harness::new();
    let mut vfs = h.load();
    let n = nested(&mut vfs);

    assert_eq!(vfs.rename_file(&n.loose, "  "), Err(VfsError::EmptyName));
    assert_eq!(vfs.rename_file(&n.loose, "main.js"), Ok(true));
    assert_eq!(vfs.rename_folder(&n.sub, "sub"), Ok(false));
    assert_eq!(
        vfs.move_folder(&n.root, Some(n.sub.clone())),
        Err(VfsError::MoveIntoDescendant)
    );
    assert_eq!(
        vfs.move_folder(&n.root, Some(n.root.clone())),
        Err(VfsError::MoveIntoDescendant)
    );
    assert_eq!(vfs.move_folder(&n.sub, None), Ok(true));
    assert!(vfs.move_file(&n.loose, Some(n.sub.clone())));
    assert!(!vfs.move_file(&n.loose, Some(FolderId::new("ghost"))));
    assert_eq!(vfs.file(&n.loose).unwrap().folder_id, Some(n.sub.clone()));
    assert_eq!(vfs.file(&n.in_root).unwrap().folder_id, Some(n.root.clone()));
}

#[test]
fn reload_restores_files_tabs_and_layout() {
    let h = Harness::new();
    let (ids, folder) = {
        let mut vfs = h.load();
        let ids = four_tabs(&mut vfs);
        let folder = vfs.create_folder("lib", None);
        vfs.toggle_folder(&folder);
        vfs.open_tab(&ids[3]);
        vfs.toggle_split_view();
        vfs.set_split_ratio(30.0);
        (ids, folder)
    };

    let vfs = h.load();
    assert_eq!(vfs.file_count(), 4);
    assert_eq!(vfs.open_tabs(), ids.as_slice());
    assert!(vfs.is_split());
    assert!(vfs.is_collapsed(&folder));
    assert_eq!(vfs.active_file(Panel::Primary), Some(&ids[3]));
    assert_eq!(vfs.active_file(Panel::Secondary), Some(&ids[1]));
    assert_eq!(vfs.layout().panel_widths.panel1, 30.0);
    assert_eq!(h.primary.get_value(), "<p>3</p>");
    assert_eq!(h.secondary.get_value(), "<p>1</p>");
}

#[test]
fn legacy_bare_files_map_is_accepted() {
    let h = Harness::new();
    h.put(
        "vfs",
        r#"{"old1": {"id": "stale", "name": "old.html", "type": "html", "content": "<b>x</b>", "created": 5}}"#,
    );

    let vfs = h.load();
    let id = FileId::new("old1");
    assert_eq!(vfs.file(&id).unwrap().content, "<b>x</b>");
    assert_eq!(vfs.file(&id).unwrap().id, id);
    assert_eq!(vfs.folder_count(), 0);
}

#[test]
fn corrupt_record_falls_back_to_starter_files() {
    let h = Harness::new();
    h.put("vfs", "{not json");
    h.put("tabs", "[1, 2");
    h.put("split", "\"sideways\"");

    let vfs = h.load_with(&PlaygroundConfig::default());
    assert_eq!(vfs.file_count(), 3);
    assert_eq!(vfs.open_tabs().len(), 3);
    assert!(!vfs.is_split());
}

#[test]
fn legacy_editor_keys_are_migrated() {
    let h = Harness::new();
    h.store.insert_raw("HtmlTextEditorData", "<i>old page</i>");
    h.store.insert_raw("JavascriptTextEditorData", "legacy()");

    let vfs = h.load_with(&PlaygroundConfig::default());
    let files: Vec<(String, String)> = vfs
        .files()
        .map(|f| (f.name.clone(), f.content.clone()))
        .collect();
    assert_eq!(
        files,
        vec![
            ("index.html".to_string(), "<i>old page</i>".to_string()),
            ("style.css".to_string(), String::new()),
            ("script.js".to_string(), "legacy()".to_string()),
        ]
    );
    assert_eq!(h.primary.get_value(), "<i>old page</i>");
}

#[test]
fn dangling_tab_references_are_dropped() {
    let h = Harness::new();
    h.put(
        "vfs",
        r#"{"files": {"f1": {"id": "f1", "name": "a.html", "type": "html", "content": "a"}}}"#,
    );
    h.put("tabs", r#"{"openTabs": ["ghost", "f1", "f1"], "activeTab": "ghost"}"#);
    h.put(
        "split",
        r#"{"splitMode": true, "activeTab1": "ghost", "panelWidths": {"panel1": 99, "panel2": 1}}"#,
    );

    let vfs = h.load();
    let f1 = FileId::new("f1");
    assert_eq!(vfs.open_tabs(), &[f1.clone()]);
    assert_eq!(vfs.active_file(Panel::Primary), Some(&f1));
    assert_eq!(vfs.active_file(Panel::Secondary), Some(&f1));
    assert_eq!(vfs.layout().panel_widths, PanelSizes::from_ratio(80.0));
}

#[test]
fn cyclic_folders_are_repaired_on_load() {
    let h = Harness::new();
    h.put(
        "vfs",
        r#"{"files": {}, "folders": {
            "dA": {"id": "dA", "name": "A", "parentId": "dB", "created": 1},
            "dB": {"id": "dB", "name": "B", "parentId": "dA", "created": 2},
            "dC": {"id": "dC", "name": "C", "parentId": "missing", "created": 3}
        }}"#,
    );

    let mut vfs = h.load();
    let shape: Vec<(usize, String)> = vfs
        .tree_rows()
        .into_iter()
        .map(|r| (r.depth, r.name))
        .collect();
    assert_eq!(
        shape,
        vec![(0, "A".to_string()), (1, "B".to_string()), (0, "C".to_string())]
    );

    h.prompt.push_answers([true, true]);
    assert!(vfs.delete_folder(&FolderId::new("dA")));
    assert_eq!(vfs.folder_count(), 1);
}
