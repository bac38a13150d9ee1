//codepad/src/main.rs
use std::io::{self, Read, Write};
use std::path::PathBuf;

use codepad::kernel::services::adapters::{
    ensure_settings_file, load_settings, BufferEditor, DataDirs, FilePreview, FileStore,
    TerminalPrompt,
};
use codepad::kernel::services::ports::{PersistentStore, Settings};
use codepad::kernel::{import_snippet, share, Library, Panel, TreeEntry, Vfs, VfsPorts};
use codepad::models::{FileId, FileKind, FolderId};

mod logging;

const USAGE: &str = "\
usage: codepad [--yes] <command>

commands:
  ls                        show the file tree and open tabs
  new <name> [folder]       create a file (kind from the extension)
  mkdir <name> [parent]     create a folder
  open <file> | close <file>
  cat <file>                print a file
  write <file>              replace a file with stdin
  rm <file> | rmdir <folder>
  mv <file> <folder|->      move a file (- for the root)
  fmt <file>                format a file
  build [out.html]          render the preview document
  share | load <token>      print or load a share token
  split | orient            toggle split view / orientation
  ratio <percent>           set the first panel size
  export                    print all sources as one text
  snippet save|load <name>  store or import a snippet
  snippet ls                list snippets
  paths                     print data locations";

#[derive(Debug, Clone, PartialEq)]
enum Command {
    List,
    New { name: String, folder: Option<String> },
    Mkdir { name: String, parent: Option<String> },
    Open(String),
    Close(String),
    Cat(String),
    Write(String),
    Remove(String),
    RemoveDir(String),
    Move { file: String, folder: Option<String> },
    Format(String),
    Build(Option<PathBuf>),
    Share,
    Load(String),
    Split,
    Orient,
    Ratio(f64),
    Export,
    SnippetSave(String),
    SnippetLoad(String),
    SnippetList,
    Paths,
}

#[derive(Debug, Clone, PartialEq)]
struct Cli {
    assume_yes: bool,
    command: Command,
}

fn parse_args(args: &[String]) -> Result<Cli, String> {
    let mut assume_yes = false;
    let mut words = Vec::new();
    for arg in args {
        match arg.as_str() {
            "--yes" | "-y" => assume_yes = true,
            _ => words.push(arg.as_str()),
        }
    }

    let missing = |what: &str| format!("missing {}", what);
    let command = match words.as_slice() {
        [] | ["ls"] => Command::List,
        ["new", name, rest @ ..] if rest.len() <= 1 => Command::New {
            name: name.to_string(),
            folder: rest.first().map(|s| s.to_string()),
        },
        ["mkdir", name, rest @ ..] if rest.len() <= 1 => Command::Mkdir {
            name: name.to_string(),
            parent: rest.first().map(|s| s.to_string()),
        },
        ["open", file] => Command::Open(file.to_string()),
        ["close", file] => Command::Close(file.to_string()),
        ["cat", file] => Command::Cat(file.to_string()),
        ["write", file] => Command::Write(file.to_string()),
        ["rm", file] => Command::Remove(file.to_string()),
        ["rmdir", folder] => Command::RemoveDir(folder.to_string()),
        ["mv", file, folder] => Command::Move {
            file: file.to_string(),
            folder: (*folder != "-").then(|| folder.to_string()),
        },
        ["fmt", file] => Command::Format(file.to_string()),
        ["build"] => Command::Build(None),
        ["build", out] => Command::Build(Some(PathBuf::from(out))),
        ["share"] => Command::Share,
        ["load", token] => Command::Load(token.to_string()),
        ["split"] => Command::Split,
        ["orient"] => Command::Orient,
        ["ratio", percent] => Command::Ratio(
            percent
                .trim_end_matches('%')
                .parse()
                .map_err(|_| format!("invalid percentage: {}", percent))?,
        ),
        ["export"] => Command::Export,
        ["snippet", "save", name] => Command::SnippetSave(name.to_string()),
        ["snippet", "load", name] => Command::SnippetLoad(name.to_string()),
        ["snippet", "ls"] => Command::SnippetList,
        ["paths"] => Command::Paths,
        ["new"] | ["mkdir"] => return Err(missing("name")),
        ["open" | "close" | "cat" | "write" | "rm" | "fmt" | "mv"] => {
            return Err(missing("file"))
        }
        ["mv", _] => return Err(missing("folder")),
        ["load"] => return Err(missing("token")),
        [other, ..] => return Err(format!("unknown command: {}", other)),
    };

    Ok(Cli {
        assume_yes,
        command,
    })
}

fn invalid(msg: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, msg.into())
}

/// Accepts an id, or a name that matches exactly one file.
fn resolve_file(vfs: &Vfs, key: &str) -> io::Result<FileId> {
    let id = FileId::new(key);
    if vfs.file(&id).is_some() {
        return Ok(id);
    }
    let matches: Vec<&FileId> = vfs.files().filter(|f| f.name == key).map(|f| &f.id).collect();
    match matches.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Err(invalid(format!("no such file: {}", key))),
        _ => Err(invalid(format!("ambiguous file name, use an id: {}", key))),
    }
}

fn resolve_folder(vfs: &Vfs, key: &str) -> io::Result<FolderId> {
    let id = FolderId::new(key);
    if vfs.folder(&id).is_some() {
        return Ok(id);
    }
    let matches: Vec<&FolderId> = vfs
        .folders()
        .filter(|f| f.name == key)
        .map(|f| &f.id)
        .collect();
    match matches.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Err(invalid(format!("no such folder: {}", key))),
        _ => Err(invalid(format!("ambiguous folder name, use an id: {}", key))),
    }
}

fn print_tree(vfs: &Vfs, out: &mut impl Write) -> io::Result<()> {
    for row in vfs.tree_rows() {
        let indent = "  ".repeat(row.depth);
        match row.entry {
            TreeEntry::Folder { id, collapsed } => {
                let marker = if collapsed { "+" } else { "-" };
                writeln!(out, "{}{} {}/  [{}]", indent, marker, row.name, id)?;
            }
            TreeEntry::File {
                id, open, active, ..
            } => {
                let marker = if active {
                    "*"
                } else if open {
                    "o"
                } else {
                    " "
                };
                writeln!(out, "{}{} {}  [{}]", indent, marker, row.name, id)?;
            }
        }
    }

    let layout = vfs.layout();
    if layout.split_mode {
        let sizes = layout.sizes();
        writeln!(
            out,
            "split: {:?} {:.0}/{:.0}",
            layout.split_orientation, sizes.panel1, sizes.panel2
        )?;
    }
    Ok(())
}

fn run(
    cli: Cli,
    dirs: &DataDirs,
    settings: &Settings,
    log_guard: Option<&logging::LoggingGuard>,
) -> io::Result<()> {
    let config = &settings.playground;
    let store_dir = dirs.ensure_store_dir()?;
    let store = PersistentStore::new(Box::new(FileStore::new(&store_dir)), &config.namespace);
    let preview_path = dirs.preview_path();

    let ports = VfsPorts {
        store,
        primary: Box::new(BufferEditor::new()),
        secondary: Box::new(BufferEditor::new()),
        preview: Box::new(FilePreview::new(&preview_path)),
        prompt: Box::new(TerminalPrompt::new(cli.assume_yes)),
    };
    let mut vfs = Vfs::load(ports, config);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::List => print_tree(&vfs, &mut out)?,
        Command::New { name, folder } => {
            let kind = FileKind::from_name(&name)
                .ok_or_else(|| invalid(format!("unsupported file type: {}", name)))?;
            let folder = folder.map(|f| resolve_folder(&vfs, &f)).transpose()?;
            let id = vfs.create_file(&name, kind, "", folder);
            vfs.open_tab(&id);
            writeln!(out, "{}", id)?;
        }
        Command::Mkdir { name, parent } => {
            let parent = parent.map(|p| resolve_folder(&vfs, &p)).transpose()?;
            let id = vfs.create_folder(&name, parent);
            writeln!(out, "{}", id)?;
        }
        Command::Open(key) => {
            let id = resolve_file(&vfs, &key)?;
            vfs.open_tab(&id);
        }
        Command::Close(key) => {
            let id = resolve_file(&vfs, &key)?;
            vfs.close_tab(&id);
        }
        Command::Cat(key) => {
            let id = resolve_file(&vfs, &key)?;
            write!(out, "{}", vfs.content_of(&id).unwrap_or_default())?;
        }
        Command::Write(key) => {
            let id = resolve_file(&vfs, &key)?;
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            vfs.open_tab(&id);
            vfs.editor_mut(Panel::Primary).set_value(&text);
            vfs.save_current_content();
        }
        Command::Remove(key) => {
            let id = resolve_file(&vfs, &key)?;
            if !vfs.delete_file(&id) {
                writeln!(out, "cancelled")?;
            }
        }
        Command::RemoveDir(key) => {
            let id = resolve_folder(&vfs, &key)?;
            if !vfs.delete_folder(&id) {
                writeln!(out, "cancelled")?;
            }
        }
        Command::Move { file, folder } => {
            let id = resolve_file(&vfs, &file)?;
            let folder = folder.map(|f| resolve_folder(&vfs, &f)).transpose()?;
            vfs.move_file(&id, folder);
        }
        Command::Format(key) => {
            let id = resolve_file(&vfs, &key)?;
            vfs.open_tab(&id);
            if !vfs.format_active(Panel::Primary) {
                writeln!(out, "already formatted")?;
            }
        }
        Command::Build(target) => {
            if let Some(path) = &target {
                vfs.attach_detached_preview(Box::new(FilePreview::new(path)));
            }
            match vfs.update_output() {
                Some(_) => {
                    let shown = target.as_ref().unwrap_or(&preview_path);
                    writeln!(out, "{}", shown.display())?;
                }
                None => writeln!(out, "no HTML file, preview cleared")?,
            }
        }
        Command::Share => writeln!(out, "{}", share::to_fragment(&vfs.sources()))?,
        Command::Load(token) => {
            if !vfs.load_shared(&token) {
                return Err(invalid("malformed share token"));
            }
        }
        Command::Split => {
            let on = vfs.toggle_split_view();
            writeln!(out, "split: {}", if on { "on" } else { "off" })?;
        }
        Command::Orient => {
            let orientation = vfs.toggle_orientation();
            writeln!(out, "orientation: {:?}", orientation)?;
        }
        Command::Ratio(percent) => {
            let sizes = vfs.set_split_ratio(percent);
            writeln!(out, "{:.0}/{:.0}", sizes.panel1, sizes.panel2)?;
        }
        Command::Export => write!(out, "{}", vfs.export_bundle())?,
        Command::SnippetSave(name) => {
            let mut library = Library::load(vfs.store());
            library.add(&name, vfs.sources());
            library.save(vfs.store_mut());
        }
        Command::SnippetLoad(name) => {
            let library = Library::load(vfs.store());
            let snippet = library
                .get(&name)
                .ok_or_else(|| invalid(format!("no such snippet: {}", name)))?;
            let mut notices = TerminalPrompt::new(cli.assume_yes);
            if let Some(folder) = import_snippet(Some(&mut vfs), snippet, &mut notices) {
                writeln!(out, "{}", folder)?;
            }
        }
        Command::SnippetList => {
            let library = Library::load(vfs.store());
            for snippet in library.iter() {
                writeln!(out, "{}", snippet.name)?;
            }
        }
        Command::Paths => {
            writeln!(out, "store: {}", store_dir.display())?;
            writeln!(out, "preview: {}", preview_path.display())?;
            if let Some(guard) = log_guard {
                writeln!(out, "logs: {}", guard.log_dir().display())?;
            }
        }
    }

    out.flush()
}

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.iter().any(|a| a == "--help" || a == "-h") {
        println!("{}", USAGE);
        return Ok(());
    }
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(msg) => {
            eprintln!("codepad: {}\n\n{}", msg, USAGE);
            std::process::exit(2);
        }
    };

    let dirs = DataDirs::resolve_or_temp();
    let logging_guard = logging::init(&dirs);
    if let Err(e) = ensure_settings_file() {
        tracing::warn!(error = %e, "failed to create settings file");
    }
    let settings = load_settings().unwrap_or_default();

    if let Err(e) = run(cli, &dirs, &settings, logging_guard.as_ref()) {
        tracing::error!(error = %e, "command failed");
        eprintln!("codepad: {}", e);
        drop(logging_guard);
        std::process::exit(1);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/cli_args.rs"]
mod tests;
