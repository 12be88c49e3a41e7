mod file_store;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use ddb_core::core_api::{ActorId, Clock, ImportConfig, Importer, SystemClock, Translator};
use ddb_render::{
    FieldSelection, JsonStyle, render_actor_document, render_json_full, render_json_selected,
    render_text, selected_pairs,
};
use serde_json::Value as JsonValue;
use tracing_subscriber::EnvFilter;

use file_store::{ConsoleNotifier, JsonFileStore};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Cli {
    /// Envelope copied from the browser extension; `-` reads stdin.
    #[arg(value_name = "ENVELOPE.json", required_unless_present = "status")]
    path: Option<PathBuf>,
    #[arg(long)]
    name: bool,
    #[arg(long)]
    abilities: bool,
    #[arg(long)]
    hp: bool,
    #[arg(long = "max-hp")]
    max_hp: bool,
    #[arg(long = "temp-hp")]
    temp_hp: bool,
    #[arg(long)]
    ac: bool,
    #[arg(long)]
    speed: bool,
    #[arg(long)]
    prof: bool,
    #[arg(long)]
    race: bool,
    #[arg(long)]
    background: bool,
    #[arg(long)]
    alignment: bool,
    #[arg(long)]
    level: bool,
    #[arg(long)]
    size: bool,
    #[arg(long)]
    classes: bool,
    #[arg(long)]
    json: bool,
    /// Print the full host record (`name`, `type`, `system`, `flags`).
    #[arg(long = "actor-json", conflicts_with = "json")]
    actor_json: bool,
    /// Import into this JSON store file instead of only printing.
    #[arg(long, value_name = "STORE.json")]
    store: Option<PathBuf>,
    /// Update this record instead of looking one up by name.
    #[arg(long, value_name = "ID", requires = "store")]
    target: Option<String>,
    /// Print the stored sync status of a record and exit.
    #[arg(long, value_name = "ID", requires = "store", conflicts_with = "path")]
    status: Option<String>,
    #[arg(long = "flag-scope", value_name = "SCOPE")]
    flag_scope: Option<String>,
    #[arg(long = "actor-type", value_name = "TYPE")]
    actor_type: Option<String>,
}

impl Cli {
    fn fields(&self) -> FieldSelection {
        FieldSelection {
            name: self.name,
            abilities: self.abilities,
            hp: self.hp,
            max_hp: self.max_hp,
            temp_hp: self.temp_hp,
            ac: self.ac,
            speed: self.speed,
            prof: self.prof,
            race: self.race,
            background: self.background,
            alignment: self.alignment,
            level: self.level,
            size: self.size,
            classes: self.classes,
        }
    }

    fn config(&self) -> ImportConfig {
        let mut config = ImportConfig::default();
        if let Some(scope) = &self.flag_scope {
            config.flag_scope = scope.clone();
        }
        if let Some(actor_type) = &self.actor_type {
            config.actor_type = actor_type.clone();
        }
        config
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let fields = cli.fields();
    let config = cli.config();

    if let Some(id) = &cli.status {
        let Some(store_path) = cli.store.as_deref() else {
            eprintln!("--status requires --store");
            process::exit(2);
        };
        print_status(store_path, &ActorId::new(id.clone()), config);
        return;
    }

    let Some(path) = cli.path.as_deref() else {
        eprintln!("an input path is required");
        process::exit(2);
    };
    let raw = read_input(path).unwrap_or_else(|e| {
        eprintln!("Error reading {}: {e}", path.display());
        process::exit(1);
    });

    if let Some(store_path) = &cli.store {
        if cli.json || cli.actor_json || fields.is_any_selected() {
            eprintln!("--store cannot be combined with output flags");
            process::exit(2);
        }
        let target = cli.target.clone().map(ActorId::new);
        run_import(store_path, &raw, target.as_ref(), config);
        return;
    }

    let translation = Translator::new().open_str(&raw).unwrap_or_else(|e| {
        eprintln!("Error translating character data: {}", path.display());
        eprintln!("  {}", e);
        process::exit(1);
    });
    let sheet = translation.sheet();

    if cli.actor_json {
        let metadata = translation.metadata(SystemClock.now());
        print_json(&render_actor_document(sheet, Some(&metadata), &config));
        return;
    }

    if cli.json {
        let json = if fields.is_any_selected() {
            render_json_selected(sheet, &fields, JsonStyle::CanonicalV1)
        } else {
            render_json_full(sheet, JsonStyle::CanonicalV1)
        };
        print_json(&json);
        return;
    }

    if fields.is_any_selected() {
        for (key, value) in selected_pairs(sheet, &fields) {
            println!("{key}={value}");
        }
        return;
    }

    print!("{}", render_text(sheet));
}

fn run_import(store_path: &Path, raw: &str, target: Option<&ActorId>, config: ImportConfig) {
    let store = open_store(store_path);
    let mut importer = Importer::new(store, ConsoleNotifier, config);

    // Notices already describe the failure on stderr.
    let outcome = importer
        .import_text(raw, target)
        .unwrap_or_else(|_| process::exit(1));

    println!("id={}", outcome.actor_id);
    println!("name={}", outcome.name);
    println!("created={}", outcome.created);
}

fn print_status(store_path: &Path, id: &ActorId, config: ImportConfig) {
    let store = open_store(store_path);
    let importer = Importer::new(store, ConsoleNotifier, config);
    let status = importer.sync_status(id).unwrap_or_else(|e| {
        eprintln!("Error reading sync status for {id}: {}", e.message);
        process::exit(1);
    });

    println!(
        "character_url={}",
        status.character_url.as_deref().unwrap_or("")
    );
    println!("last_sync={}", status.last_sync_display());
}

fn open_store(path: &Path) -> JsonFileStore {
    JsonFileStore::open(path).unwrap_or_else(|e| {
        eprintln!("Error opening store: {e}");
        process::exit(1);
    })
}

fn read_input(path: &Path) -> io::Result<String> {
    if path.as_os_str() == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(path)
}

fn print_json(value: &JsonValue) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        eprintln!("Error rendering JSON output: {e}");
        process::exit(1);
    });
    println!("{rendered}");
}
