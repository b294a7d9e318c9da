use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process;

use memo_core::{ops, render_tree, MemoEngine, MemoryDiagSink};
use memo_persistence::{DirConfig, DirStore};

fn main() {
    // Cargar .env si existe para obtener MEMO_CACHE_DIR
    let _ = dotenvy::dotenv();
    // CLI mínima: `memo-cli demo [--cache-dir DIR] [--no-write] [--no-read]`
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || args[1] != "demo" {
        eprintln!("usage: memo-cli demo [--cache-dir DIR] [--no-write] [--no-read]");
        process::exit(2);
    }

    let mut cache_dir: Option<PathBuf> = None;
    let mut write = true;
    let mut read = true;
    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--cache-dir" => {
                i += 1;
                if i < args.len() {
                    cache_dir = Some(PathBuf::from(&args[i]));
                }
            }
            "--no-write" => write = false,
            "--no-read" => read = false,
            other => {
                eprintln!("[memo demo] unknown flag: {other}");
                process::exit(2);
            }
        }
        i += 1;
    }

    let root = cache_dir.unwrap_or_else(|| DirConfig::from_env().root);
    let store = match DirStore::open(&root) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[memo demo] cannot open cache dir {}: {e}", root.display());
            process::exit(5);
        }
    };

    let mut engine = MemoEngine::builder(store).diag(MemoryDiagSink::new())
                                               .write_default(write)
                                               .read_default(read)
                                               .build();

    // Grafo de demostración: total = add(add(2, 3), record.offset)
    let a = engine.call(ops::add(), vec![2.into(), 3.into()], BTreeMap::new());
    let record = engine.endpoint(serde_json::json!({"offset": 10}));
    let offset = engine.get_attr(&record, "offset");
    let total = engine.call(ops::add(), vec![a.into(), offset.into()], BTreeMap::new());

    println!("pending tree:\n{}", render_tree(&total));

    match engine.resolve(&total) {
        Ok(value) => println!("total = {value}"),
        Err(e) => {
            eprintln!("[memo demo] resolve failed: {e}");
            process::exit(4);
        }
    }
    // Segunda resolución: sale entera del memo en proceso.
    let _ = engine.resolve(&total);

    println!("diagnostics:");
    for ev in &engine.diag().events {
        println!("  {:>2}  {:<9}  {}", ev.seq, ev.tag.as_str(), ev.fingerprint);
    }
    println!("cache dir: {} ({} entries)", root.display(), engine.store().len());
}
