use anyhow::{Context, Result};
use linkdeck::browser::action::{ActionContext, ActionExecutor, ActionRegistry};
use linkdeck::browser::{BrowserEntry, FileBrowserModel};
use linkdeck::config::AppConfig;
use linkdeck::events::{AppEvent, EventBus};
use linkdeck::fs::{FileEntry, FileKind, FilePath, LocalFileSystem};
use linkdeck::issues::BusSink;
use linkdeck::providers::{DataStoreProviders, ProviderLoader};
use linkdeck::store::{codec, StoreConfigManager};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError};
use tokio::sync::broadcast::error::RecvError;

const USAGE: &str = "usage: linkdeck <providers | stores | ls [dir] | new-file <dir> <name> | new-dir <dir> <name>>";

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let config = AppConfig::load()?;
    let events = Arc::new(EventBus::new());
    spawn_event_logger(&events);

    let providers = DataStoreProviders::new(codec::shared(), Arc::new(BusSink::new(events.clone())));
    providers.load(ProviderLoader::discover(&config))?;
    events.send(AppEvent::ProvidersLoaded { ids: providers.ids()? });
    providers.init()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let result = run(&args, &config, &providers, events.clone());

    providers.reset()?;
    result
}

fn spawn_event_logger(events: &EventBus) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => match serde_json::to_string(&event) {
                    Ok(json) => log::debug!("Event: {}", json),
                    Err(e) => log::debug!("Unserializable event {:?}: {}", event, e),
                },
                Err(RecvError::Lagged(skipped)) => log::debug!("Event logger skipped {} event(s)", skipped),
                Err(RecvError::Closed) => break,
            }
        }
    });
}

fn run(args: &[String], config: &AppConfig, providers: &DataStoreProviders, events: Arc<EventBus>) -> Result<()> {
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args.as_slice() {
        ["providers"] => list_providers(providers),
        ["stores"] => list_stores(providers),
        ["ls"] => list_dir(&start_dir(config)?, events),
        ["ls", dir] => list_dir(Path::new(dir), events),
        ["new-file", dir, name] => run_action("newFile", Path::new(dir), name, config, events),
        ["new-dir", dir, name] => run_action("newDirectory", Path::new(dir), name, config, events),
        _ => {
            eprintln!("{}", USAGE);
            Ok(())
        }
    }
}

fn start_dir(config: &AppConfig) -> Result<PathBuf> {
    match &config.start_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().context("Could not determine current directory"),
    }
}

fn list_providers(providers: &DataStoreProviders) -> Result<()> {
    for provider in providers.all()? {
        let tags: Vec<&str> = provider.store_classes().iter().map(|c| c.tag()).collect();
        println!("{}\t{}", provider.id(), tags.join(", "));
    }
    Ok(())
}

fn list_stores(providers: &DataStoreProviders) -> Result<()> {
    let manager = StoreConfigManager::new()?;
    let shared = codec::shared();
    let stores = {
        let codec = shared.read().unwrap_or_else(PoisonError::into_inner);
        manager.load_stores(&codec)?
    };

    for named in &stores {
        let provider = providers.by_store(named.store.as_ref())?;
        println!("{}\t{}\t{:?}", named.name, provider.id(), named.store);
    }
    Ok(())
}

fn browser_model(dir: &Path, events: Arc<EventBus>) -> FileBrowserModel {
    FileBrowserModel::new(Arc::new(LocalFileSystem), FilePath::from(dir)).with_events(events)
}

fn list_dir(dir: &Path, events: Arc<EventBus>) -> Result<()> {
    let model = browser_model(dir, events);
    model.cd(FilePath::from(dir))?;
    print_entries(&model.entries());
    Ok(())
}

fn run_action(id: &str, dir: &Path, name: &str, config: &AppConfig, events: Arc<EventBus>) -> Result<()> {
    let model = Arc::new(browser_model(dir, events));
    let kind = if dir.is_dir() { FileKind::Directory } else { FileKind::Other };
    let selection = vec![BrowserEntry::new(FileEntry::new(dir, kind))];

    let registry = ActionRegistry::with_builtins();
    let action = registry.create(id, ActionContext::new(model.clone(), selection), json!({ "name": name }))?;

    ActionExecutor::new(config.read_only).execute(action.as_ref())?;
    print_entries(&model.entries());
    Ok(())
}

fn print_entries(entries: &[BrowserEntry]) {
    for entry in entries {
        let marker = match entry.kind() {
            FileKind::Directory => "d",
            FileKind::Link => "l",
            FileKind::File => "-",
            FileKind::Other => "?",
        };
        println!("{} {}", marker, entry.path());
    }
}
